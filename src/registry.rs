use crate::error::{Result, ScrapeError};
use crate::sites::mangapanda::MangaPanda;
use crate::traits::SiteAdapter;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;
use url::Url;

/// Registry mapping a hostname to its site adapter
pub struct AdapterRegistry {
    adapters: HashMap<String, Arc<dyn SiteAdapter>>,
}

impl AdapterRegistry {
    pub fn empty() -> Self {
        Self {
            adapters: HashMap::new(),
        }
    }

    pub fn with_builtin() -> Result<Self> {
        let mut registry = Self::empty();

        // Register built-in sites
        registry.register(Arc::new(MangaPanda::new()?));

        Ok(registry)
    }

    pub fn register(&mut self, adapter: Arc<dyn SiteAdapter>) {
        self.adapters
            .insert(adapter.domain().to_ascii_lowercase(), adapter);
    }

    pub fn resolve(&self, domain: &str) -> Result<Arc<dyn SiteAdapter>> {
        self.adapters
            .get(&domain.to_ascii_lowercase())
            .cloned()
            .ok_or_else(|| ScrapeError::unknown_site(domain))
    }

    /// Resolves the adapter for the host of `manga_url`.
    pub fn resolve_url(&self, manga_url: &str) -> Result<Arc<dyn SiteAdapter>> {
        let url = Url::parse(manga_url).map_err(|_| ScrapeError::invalid_url(manga_url))?;
        let host = url
            .host_str()
            .ok_or_else(|| ScrapeError::invalid_url(manga_url))?;

        let adapter = self.resolve(host)?;
        debug!("Resolved {} to {}", host, adapter.site_name());
        Ok(adapter)
    }

    pub fn domains(&self) -> Vec<&str> {
        let mut domains: Vec<&str> = self.adapters.keys().map(String::as_str).collect();
        domains.sort_unstable();
        domains
    }
}
