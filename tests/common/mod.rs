#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{Value, json};
use tempfile::TempDir;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use changelog_validate::{
    FetchResponse, Output, Pipeline, UrlFetcher, ValidationError, VerbosityLevel,
};

/// A structurally valid entry; `n` makes the id, title and URLs unique
pub fn valid_entry(n: usize) -> Value {
    json!({
        "id": format!("f81d4fae-7dec-11d0-a765-{:012x}", n),
        "author": "Jane Doe",
        "author_image_url": format!("https://cdn.example.com/authors/{n}.png"),
        "title": format!("Release {n}"),
        "date": "2016-05-12T10:30:00Z",
        "message": format!("Notes for release {n}."),
        "image_url": format!("https://cdn.example.com/images/{n}.png"),
        "blog_url": format!("https://blog.example.com/releases/{n}")
    })
}

pub fn valid_document(count: usize) -> Value {
    Value::Array((1..=count).map(valid_entry).collect())
}

/// Write a document into a fresh temp dir and return both
pub fn write_document(document: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("entries.json");
    std::fs::write(&path, document).unwrap();
    (temp_dir, path)
}

/// In-memory fetcher: answers 200 unless told otherwise and records every URL it sees
#[derive(Default)]
pub struct RecordingFetcher {
    statuses: Mutex<HashMap<String, u16>>,
    hung: Mutex<HashSet<String>>,
    requests: Mutex<Vec<String>>,
}

impl RecordingFetcher {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn respond_with(&self, url: &str, status: u16) {
        self.statuses
            .lock()
            .unwrap()
            .insert(url.to_string(), status);
    }

    /// Make `url` fail without a response, as a timed-out request does
    pub fn time_out(&self, url: &str) {
        self.hung.lock().unwrap().insert(url.to_string());
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl UrlFetcher for RecordingFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchResponse, ValidationError> {
        self.requests.lock().unwrap().push(url.to_string());

        if self.hung.lock().unwrap().contains(url) {
            return Err(ValidationError::Timeout {
                url: url.to_string(),
                timeout_seconds: 1,
            });
        }

        let status = self
            .statuses
            .lock()
            .unwrap()
            .get(url)
            .copied()
            .unwrap_or(200);
        Ok(FetchResponse {
            status,
            body: b"<html></html>".to_vec(),
        })
    }
}

pub fn quiet_pipeline(fetcher: Arc<RecordingFetcher>) -> Pipeline {
    Pipeline::new(fetcher, Output::plain(VerbosityLevel::Quiet))
}

/// Minimal HTTP/1.1 responder on localhost.
///
/// Paths in `routes` answer with their status; `/hang` never answers; anything else is 404.
pub async fn spawn_http_server(routes: HashMap<&'static str, u16>) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let routes = Arc::new(routes);

    tokio::spawn(async move {
        loop {
            let Ok((mut socket, _)) = listener.accept().await else {
                break;
            };
            let routes = Arc::clone(&routes);

            tokio::spawn(async move {
                let mut request = Vec::new();
                let mut buf = [0u8; 1024];
                loop {
                    match socket.read(&mut buf).await {
                        Ok(0) | Err(_) => return,
                        Ok(n) => request.extend_from_slice(&buf[..n]),
                    }
                    if request.windows(4).any(|w| w == b"\r\n\r\n") {
                        break;
                    }
                }

                let head = String::from_utf8_lossy(&request);
                let path = head.split_whitespace().nth(1).unwrap_or("/").to_string();

                if path == "/hang" {
                    tokio::time::sleep(Duration::from_secs(3600)).await;
                    return;
                }

                let status = routes.get(path.as_str()).copied().unwrap_or(404);
                let body = format!("status {status}");
                let response = format!(
                    "HTTP/1.1 {status} Test\r\nContent-Length: {}\r\nContent-Type: text/plain\r\nConnection: close\r\n\r\n{body}",
                    body.len()
                );
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            });
        }
    });

    addr
}
