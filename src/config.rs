use crate::cli::{Cli, VerbosityLevel};
use crate::http_client::{HttpClientConfig, default_user_agent};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Trait for abstracting environment variable access
pub trait EnvProvider {
    fn get(&self, key: &str) -> Option<String>;
}

/// System environment variable provider for production use
pub struct SystemEnvProvider;

impl EnvProvider for SystemEnvProvider {
    fn get(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlParsing(#[from] toml::de::Error),

    #[error("JSON parsing error: {0}")]
    JsonParsing(#[from] serde_json::Error),

    #[error("Configuration validation error: {0}")]
    Validation(String),

    #[error("Environment variable error: {0}")]
    Environment(String),

    #[error("Unsupported configuration file format: {0}")]
    UnsupportedFormat(String),

    #[error("Unknown target: {0}")]
    UnknownTarget(String),

    #[error("No changelog files given and no targets configured")]
    NoInputs,
}

pub type Result<T> = std::result::Result<T, ConfigError>;

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Config {
    /// Named sets of changelog files, e.g. one per deployment environment
    pub targets: BTreeMap<String, TargetConfig>,
    pub network: NetworkConfig,
    pub output: OutputConfig,
}

/// A named validation target
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct TargetConfig {
    /// Changelog files validated for this target, in order
    pub src: Vec<PathBuf>,
}

/// Network configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct NetworkConfig {
    /// Per-request timeout for URL checks; unset waits indefinitely
    pub timeout_seconds: Option<u64>,
    pub user_agent: String,
}

/// Output configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct OutputConfig {
    pub verbose: bool,
    pub quiet: bool,
    pub debug: bool,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: None,
            user_agent: default_user_agent(),
        }
    }
}

impl Config {
    pub fn verbosity(&self) -> VerbosityLevel {
        if self.output.quiet {
            VerbosityLevel::Quiet
        } else if self.output.debug {
            VerbosityLevel::Debug
        } else if self.output.verbose {
            VerbosityLevel::Verbose
        } else {
            VerbosityLevel::Normal
        }
    }

    pub fn http_client_config(&self) -> HttpClientConfig {
        HttpClientConfig {
            timeout_seconds: self.network.timeout_seconds,
            user_agent: self.network.user_agent.clone(),
        }
    }
}

/// One file to run through the pipeline, tagged with the target it came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationInput {
    pub target: Option<String>,
    pub path: PathBuf,
}

/// Configuration manager for loading and merging configurations
pub struct ConfigManager;

impl ConfigManager {
    /// Load configuration with precedence: file -> environment -> CLI
    pub async fn load_config(cli: &Cli) -> Result<Config> {
        let mut config = Config::default();

        if let Some(config_path) = &cli.config {
            let file_config = Self::load_from_file(config_path).await?;
            config = Self::merge_configs(config, file_config);
        } else if let Some(found_config) = Self::find_config_file().await? {
            config = Self::merge_configs(config, found_config);
        }

        config = Self::apply_environment_overrides(config)?;
        config = Self::merge_with_cli(config, cli);

        Self::validate_config(&config)?;

        Ok(config)
    }

    /// Load configuration from a file (TOML or JSON)
    pub async fn load_from_file(path: &Path) -> Result<Config> {
        let content = tokio::fs::read_to_string(path).await?;

        match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => Ok(toml::from_str(&content)?),
            Some("json") => Ok(serde_json::from_str(&content)?),
            Some(ext) => Err(ConfigError::UnsupportedFormat(ext.to_string())),
            None => {
                // Try to parse as TOML first, then JSON
                if let Ok(config) = toml::from_str::<Config>(&content) {
                    Ok(config)
                } else {
                    Ok(serde_json::from_str(&content)?)
                }
            }
        }
    }

    /// Find configuration file in standard locations
    pub async fn find_config_file() -> Result<Option<Config>> {
        let config_names = [
            "changelog-validate.toml",
            "changelog-validate.json",
            ".changelog-validate.toml",
            ".changelog-validate.json",
        ];

        for name in &config_names {
            let path = PathBuf::from(name);
            if path.exists() {
                return Ok(Some(Self::load_from_file(&path).await?));
            }
        }

        if let Some(config_dir) = dirs::config_dir() {
            let app_config_dir = config_dir.join("changelog-validate");
            for name in &config_names {
                let path = app_config_dir.join(name);
                if path.exists() {
                    return Ok(Some(Self::load_from_file(&path).await?));
                }
            }
        }

        Ok(None)
    }

    /// Apply environment variable overrides using the system environment
    pub fn apply_environment_overrides(config: Config) -> Result<Config> {
        Self::apply_environment_overrides_with(&SystemEnvProvider, config)
    }

    /// Apply environment variable overrides with a custom environment provider
    pub fn apply_environment_overrides_with(
        env: &impl EnvProvider,
        mut config: Config,
    ) -> Result<Config> {
        if let Some(timeout) = env.get("CHANGELOG_VALIDATE_TIMEOUT") {
            config.network.timeout_seconds = Some(timeout.parse().map_err(|_| {
                ConfigError::Environment(format!(
                    "Invalid CHANGELOG_VALIDATE_TIMEOUT value: {}",
                    timeout
                ))
            })?);
        }

        if let Some(user_agent) = env.get("CHANGELOG_VALIDATE_USER_AGENT") {
            config.network.user_agent = user_agent;
        }

        if let Some(verbose) = env.get("CHANGELOG_VALIDATE_VERBOSE") {
            config.output.verbose = verbose.parse().map_err(|_| {
                ConfigError::Environment(format!(
                    "Invalid CHANGELOG_VALIDATE_VERBOSE value: {}",
                    verbose
                ))
            })?;
        }

        if let Some(quiet) = env.get("CHANGELOG_VALIDATE_QUIET") {
            config.output.quiet = quiet.parse().map_err(|_| {
                ConfigError::Environment(format!(
                    "Invalid CHANGELOG_VALIDATE_QUIET value: {}",
                    quiet
                ))
            })?;
        }

        Ok(config)
    }

    /// Merge CLI arguments with configuration (CLI takes precedence)
    pub fn merge_with_cli(mut config: Config, cli: &Cli) -> Config {
        if cli.timeout.is_some() {
            config.network.timeout_seconds = cli.timeout;
        }

        if let Some(level) = cli.verbosity() {
            config.output.quiet = level == VerbosityLevel::Quiet;
            config.output.verbose = level >= VerbosityLevel::Verbose;
            config.output.debug = level == VerbosityLevel::Debug;
        }

        config
    }

    /// Merge two configurations (second takes precedence)
    pub fn merge_configs(mut base: Config, override_config: Config) -> Config {
        base.targets.extend(override_config.targets);

        if override_config.network.timeout_seconds.is_some() {
            base.network.timeout_seconds = override_config.network.timeout_seconds;
        }
        if !override_config.network.user_agent.is_empty() {
            base.network.user_agent = override_config.network.user_agent;
        }

        base.output = override_config.output;

        base
    }

    /// Validate configuration values
    pub fn validate_config(config: &Config) -> Result<()> {
        if config.network.timeout_seconds == Some(0) {
            return Err(ConfigError::Validation(
                "Timeout must be greater than 0".to_string(),
            ));
        }

        if config.output.verbose && config.output.quiet {
            return Err(ConfigError::Validation(
                "Cannot enable both verbose and quiet modes".to_string(),
            ));
        }

        for (name, target) in &config.targets {
            if target.src.is_empty() {
                return Err(ConfigError::Validation(format!(
                    "Target '{}' has no src files",
                    name
                )));
            }
        }

        Ok(())
    }

    /// Work out which files to validate: explicit files win, then the selected targets,
    /// then every configured target in name order
    pub fn resolve_inputs(config: &Config, cli: &Cli) -> Result<Vec<ValidationInput>> {
        if !cli.files.is_empty() {
            return Ok(cli
                .files
                .iter()
                .map(|path| ValidationInput {
                    target: None,
                    path: path.clone(),
                })
                .collect());
        }

        let selected: Vec<(&String, &TargetConfig)> = if cli.targets.is_empty() {
            config.targets.iter().collect()
        } else {
            cli.targets
                .iter()
                .map(|name| {
                    config
                        .targets
                        .get_key_value(name)
                        .ok_or_else(|| ConfigError::UnknownTarget(name.clone()))
                })
                .collect::<Result<_>>()?
        };

        let inputs: Vec<ValidationInput> = selected
            .into_iter()
            .flat_map(|(name, target)| {
                target.src.iter().map(move |path| ValidationInput {
                    target: Some(name.clone()),
                    path: path.clone(),
                })
            })
            .collect();

        if inputs.is_empty() {
            return Err(ConfigError::NoInputs);
        }
        Ok(inputs)
    }
}
