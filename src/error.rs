use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScrapeError {
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] ::config::ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("URL parsing error: {0}")]
    Url(#[from] url::ParseError),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid selector {selector:?}: {reason}")]
    Selector { selector: String, reason: String },

    #[error("Invalid manga URL: {0}")]
    InvalidUrl(String),

    #[error("Manga domain name {0} not found")]
    UnknownSite(String),

    #[error("Manga site error: {url}")]
    CatalogUnreachable { url: String },

    #[error("Could not fetch {url} after {attempts} attempts")]
    FetchFailed { url: String, attempts: u32 },

    #[error("Scraping error: {0}")]
    Scraping(String),
}

impl ScrapeError {
    pub fn scraping(msg: impl Into<String>) -> Self {
        Self::Scraping(msg.into())
    }

    pub fn unknown_site(domain: impl Into<String>) -> Self {
        Self::UnknownSite(domain.into())
    }

    pub fn invalid_url(url: impl Into<String>) -> Self {
        Self::InvalidUrl(url.into())
    }

    /// Failures that end the whole run rather than a single chapter or page.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::UnknownSite(_) | Self::InvalidUrl(_) | Self::CatalogUnreachable { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, ScrapeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_run_level_failures_are_fatal() {
        assert!(ScrapeError::unknown_site("example.org").is_fatal());
        assert!(ScrapeError::invalid_url("nope").is_fatal());
        assert!(ScrapeError::CatalogUnreachable { url: "u".into() }.is_fatal());

        assert!(!ScrapeError::FetchFailed { url: "u".into(), attempts: 3 }.is_fatal());
        assert!(!ScrapeError::scraping("bad page").is_fatal());
        assert!(!ScrapeError::Io(std::io::Error::from(std::io::ErrorKind::PermissionDenied)).is_fatal());
    }
}
