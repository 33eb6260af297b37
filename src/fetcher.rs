use crate::config::Config;
use crate::error::{Result, ScrapeError};
use crate::traits::PageFetcher;
use backoff::backoff::Backoff;
use backoff::ExponentialBackoff;
use futures::StreamExt;
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::{Client, Response, StatusCode};
use std::future::Future;
use std::path::Path;
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tracing::debug;

/// How often and how patiently a URL is retried
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub initial_interval: Duration,
    pub max_interval: Duration,
    pub multiplier: f64,
}

impl RetryPolicy {
    pub fn from_config(config: &Config) -> Self {
        Self {
            max_attempts: config.max_retries,
            initial_interval: Duration::from_millis(config.backoff.initial_interval_ms),
            max_interval: Duration::from_millis(config.backoff.max_interval_ms),
            multiplier: config.backoff.multiplier,
        }
    }

    /// Retries back to back with no delay.
    pub fn immediate(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            initial_interval: Duration::ZERO,
            max_interval: Duration::ZERO,
            multiplier: 1.0,
        }
    }

    pub fn backoff(&self) -> ExponentialBackoff {
        ExponentialBackoff {
            current_interval: self.initial_interval,
            initial_interval: self.initial_interval,
            max_interval: self.max_interval,
            multiplier: self.multiplier,
            max_elapsed_time: None,
            ..ExponentialBackoff::default()
        }
    }
}

/// Runs `op` until it succeeds or `max_attempts` attempts have failed.
///
/// Every error counts as one attempt. The error of the last attempt is
/// dropped in favour of an opaque [`ScrapeError::FetchFailed`].
pub async fn retry_attempts<T, F, Fut>(policy: &RetryPolicy, url: &str, mut op: F) -> Result<T>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let mut backoff = policy.backoff();

    for attempt in 1..=policy.max_attempts {
        match op(attempt).await {
            Ok(value) => return Ok(value),
            Err(e) => {
                debug!(attempt, max_attempts = policy.max_attempts, error = %e, "Request to {} failed", url);
                if attempt == policy.max_attempts {
                    break;
                }
                if let Some(delay) = backoff.next_backoff() {
                    if !delay.is_zero() {
                        tokio::time::sleep(delay).await;
                    }
                }
            }
        }
    }

    Err(ScrapeError::FetchFailed {
        url: url.to_string(),
        attempts: policy.max_attempts,
    })
}

#[derive(Clone)]
pub struct HttpFetcher {
    client: Client,
    policy: RetryPolicy,
}

impl HttpFetcher {
    pub fn new(config: &Config) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert("DNT", HeaderValue::from_static("1"));

        let mut builder = Client::builder()
            .user_agent(config.user_agent.clone())
            .default_headers(headers);
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            policy: RetryPolicy::from_config(config),
        })
    }

    /// One GET, accepted only on a 200 response.
    async fn get_ok(&self, url: &str) -> Result<Response> {
        let response = self.client.get(url).send().await?;

        if response.status() != StatusCode::OK {
            return Err(ScrapeError::scraping(format!(
                "unexpected status {} from {}",
                response.status(),
                url
            )));
        }

        Ok(response)
    }
}

#[async_trait::async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch_text(&self, url: &str) -> Result<String> {
        retry_attempts(&self.policy, url, |_| async move {
            let response = self.get_ok(url).await?;
            let body = response.text().await?;
            Ok::<_, ScrapeError>(body)
        })
        .await
    }

    async fn fetch_to_file(&self, url: &str, path: &Path) -> Result<u64> {
        retry_attempts(&self.policy, url, |_| async move {
            let response = self.get_ok(url).await?;
            write_body(response, path).await
        })
        .await
    }
}

async fn write_body(response: Response, path: &Path) -> Result<u64> {
    let mut file = tokio::fs::File::create(path).await?;
    let mut stream = response.bytes_stream();
    let mut written = 0u64;

    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        file.write_all(&chunk).await?;
        written += chunk.len() as u64;
    }

    file.flush().await?;
    Ok(written)
}
