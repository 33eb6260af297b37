use crate::error::{Result, ScrapeError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_CONFIG_FILE: &str = "mangascrape.toml";
pub const ENV_PREFIX: &str = "MANGASCRAPE";
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/84.0.4147.105 Safari/537.36";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    /// Per-request timeout in milliseconds, 0 means no timeout
    pub timeout_ms: u64,
    /// Attempts per URL before giving up
    pub max_retries: u32,
    pub download_directory: String,
    /// Chapters downloaded at the same time
    pub concurrency: usize,
    pub user_agent: String,
    pub backoff: BackoffConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BackoffConfig {
    pub initial_interval_ms: u64,
    pub max_interval_ms: u64,
    pub multiplier: f64,
}

impl Config {
    /// Layers defaults, the optional config file and `MANGASCRAPE_*` environment variables.
    ///
    /// An explicitly passed file must exist; the default `mangascrape.toml` is optional.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let (file, required) = match path {
            Some(p) => (p.to_path_buf(), true),
            None => (PathBuf::from(DEFAULT_CONFIG_FILE), false),
        };

        let config: Config = ::config::Config::builder()
            .add_source(::config::Config::try_from(&Config::default())?)
            .add_source(::config::File::from(file).required(required))
            .add_source(
                ::config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        config.validate()?;
        Ok(config)
    }

    /// Applies command line values. Zero timeouts and retry counts are ignored.
    pub fn with_overrides(
        mut self,
        timeout_ms: Option<u64>,
        max_retries: Option<u32>,
        download_directory: Option<String>,
        concurrency: Option<usize>,
    ) -> Self {
        if let Some(timeout) = timeout_ms.filter(|t| *t > 0) {
            self.timeout_ms = timeout;
        }
        if let Some(retries) = max_retries.filter(|r| *r > 0) {
            self.max_retries = retries;
        }
        if let Some(dir) = download_directory {
            self.download_directory = dir;
        }
        if let Some(limit) = concurrency.filter(|c| *c > 0) {
            self.concurrency = limit;
        }
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_retries == 0 {
            return Err(ScrapeError::Config(::config::ConfigError::Message(
                "max_retries must be at least 1".to_string(),
            )));
        }
        if self.concurrency == 0 {
            return Err(ScrapeError::Config(::config::ConfigError::Message(
                "concurrency must be at least 1".to_string(),
            )));
        }
        if self.backoff.multiplier < 1.0 {
            return Err(ScrapeError::Config(::config::ConfigError::Message(
                "backoff.multiplier must be at least 1.0".to_string(),
            )));
        }
        Ok(())
    }

    pub fn timeout(&self) -> Option<Duration> {
        (self.timeout_ms > 0).then(|| Duration::from_millis(self.timeout_ms))
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            timeout_ms: 0,
            max_retries: 90,
            download_directory: "./manga_downloads".to_string(),
            concurrency: 5,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            backoff: BackoffConfig::default(),
        }
    }
}

impl Default for BackoffConfig {
    fn default() -> Self {
        BackoffConfig {
            initial_interval_ms: 250,
            max_interval_ms: 10_000,
            multiplier: 2.0,
        }
    }
}
