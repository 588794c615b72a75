use crate::error::ValidationError;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tokio::time::timeout;

/// Configuration for the HTTP client
#[derive(Debug, Clone, PartialEq)]
pub struct HttpClientConfig {
    /// Per-request timeout in seconds. `None` waits for as long as the server takes.
    pub timeout_seconds: Option<u64>,
    /// User agent string
    pub user_agent: String,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: None,
            user_agent: default_user_agent(),
        }
    }
}

pub fn default_user_agent() -> String {
    format!("changelog-validate/{}", env!("CARGO_PKG_VERSION"))
}

/// Status and body of a completed GET
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl FetchResponse {
    pub fn is_ok(&self) -> bool {
        self.status == 200
    }
}

/// Anything that can issue a GET and report the status
///
/// An `Err` means no response arrived at all (DNS, connect, TLS, timeout, ...).
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UrlFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<FetchResponse, ValidationError>;
}

/// Async HTTP client used for liveness probes
pub struct AsyncHttpClient {
    client: Client,
    config: HttpClientConfig,
}

impl AsyncHttpClient {
    /// Create a new async HTTP client with the given configuration
    pub fn new(config: HttpClientConfig) -> Result<Self, ValidationError> {
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .pool_idle_timeout(Duration::from_secs(30))
            .build()
            .map_err(ValidationError::from)?;

        Ok(Self { client, config })
    }

    /// Make a single GET request. The optional timeout covers the whole exchange, body
    /// included, and is the only deadline applied.
    async fn make_request(&self, url: &str) -> Result<FetchResponse, ValidationError> {
        let request = async {
            let response = self.client.get(url).send().await?;
            let status = response.status().as_u16();
            let body = response.bytes().await?;
            Ok::<_, reqwest::Error>(FetchResponse {
                status,
                body: body.to_vec(),
            })
        };

        match self.config.timeout_seconds {
            Some(secs) => timeout(Duration::from_secs(secs), request)
                .await
                .map_err(|_| ValidationError::Timeout {
                    url: url.to_string(),
                    timeout_seconds: secs,
                })?
                .map_err(ValidationError::from),
            None => request.await.map_err(ValidationError::from),
        }
    }

    /// Get the client configuration
    pub fn config(&self) -> &HttpClientConfig {
        &self.config
    }
}

#[async_trait]
impl UrlFetcher for AsyncHttpClient {
    async fn fetch(&self, url: &str) -> Result<FetchResponse, ValidationError> {
        self.make_request(url).await
    }
}
