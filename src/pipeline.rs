use crate::config::Config;
use crate::downloaders::ChapterDownloader;
use crate::error::{Result, ScrapeError};
use crate::extractor::extract_catalog;
use crate::fetcher::HttpFetcher;
use crate::models::ChapterOutcome;
use crate::registry::AdapterRegistry;
use crate::report::RunReport;
use crate::storage::{ensure_dir, naming_title, StorageLayout};
use crate::traits::PageFetcher;
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, error, info, warn};

/// Scrapes one manga: catalog first, then every chapter through a bounded pool.
pub struct MangaScraper {
    config: Config,
    registry: AdapterRegistry,
    fetcher: Arc<dyn PageFetcher>,
}

impl MangaScraper {
    pub fn new(config: Config) -> Result<Self> {
        let fetcher = HttpFetcher::new(&config)?;
        Ok(Self::with_parts(
            config,
            AdapterRegistry::with_builtin()?,
            Arc::new(fetcher),
        ))
    }

    pub fn with_parts(
        config: Config,
        registry: AdapterRegistry,
        fetcher: Arc<dyn PageFetcher>,
    ) -> Self {
        Self {
            config,
            registry,
            fetcher,
        }
    }

    /// Unknown sites and an unreachable catalog end the run before anything is
    /// written to disk. Chapter failures only show up in the report.
    pub async fn scrape(&self, manga_url: &str) -> Result<RunReport> {
        info!("Manga URL: {}", manga_url);

        let adapter = self.registry.resolve_url(manga_url)?;
        info!("Manga domain name: {} ({})", adapter.domain(), adapter.site_name());

        let markup = match self.fetcher.fetch_text(manga_url).await {
            Ok(markup) => markup,
            Err(e) => {
                debug!("Catalog fetch failed: {}", e);
                return Err(ScrapeError::CatalogUnreachable {
                    url: manga_url.to_string(),
                });
            }
        };

        let catalog = extract_catalog(&markup, adapter.as_ref());
        info!("Manga name: {}", catalog.metadata.title);
        info!("Alternate Name: {}", catalog.metadata.alternate_title);
        info!("Number of chapters: {}", catalog.metadata.chapter_count);

        let layout = StorageLayout::new(
            &self.config.download_directory,
            adapter.site_name(),
            &naming_title(&catalog.metadata.title, manga_url),
        );
        ensure_dir(layout.manga_dir()).await?;
        info!("Manga download directory: {:?}", layout.manga_dir());

        let mut report = RunReport::new(
            adapter.site_name(),
            manga_url,
            layout.manga_dir().to_path_buf(),
            catalog.metadata.clone(),
        );

        let downloader = Arc::new(ChapterDownloader::new(
            self.fetcher.clone(),
            adapter.clone(),
            layout.clone(),
        ));
        let permits = Arc::new(Semaphore::new(self.config.concurrency));
        let mut tasks = JoinSet::new();

        for chapter in catalog.chapters {
            let chapter_dir = layout.chapter_dir(&chapter);
            let index = report.push(chapter.clone());

            if let Err(e) = ensure_dir(&chapter_dir).await {
                warn!("Could not create {:?}: {}", chapter_dir, e);
                report.set_outcome(index, ChapterOutcome::abandoned(e.to_string()));
                continue;
            }

            let downloader = downloader.clone();
            let permits = permits.clone();
            tasks.spawn(async move {
                // the semaphore is never closed, so acquiring only waits
                let _permit = permits.acquire_owned().await.ok();
                debug!("Starting Chapter {} - {}", chapter.number, chapter.name);
                let outcome = downloader.download(&chapter).await;
                (index, outcome)
            });
        }

        info!(
            "Started {} chapter downloads, {} at a time",
            tasks.len(),
            self.config.concurrency
        );

        let progress = ProgressBar::new(tasks.len() as u64);
        if let Ok(style) = ProgressStyle::with_template(
            "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} chapters",
        ) {
            progress.set_style(style.progress_chars("#>-"));
        }

        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((index, outcome)) => report.set_outcome(index, outcome),
                Err(e) => error!("Chapter task failed: {}", e),
            }
            progress.inc(1);
        }
        progress.finish_and_clear();

        for row in report.rows.iter_mut().filter(|row| row.outcome.is_none()) {
            row.outcome = Some(ChapterOutcome::abandoned("download task failed"));
        }

        info!(
            "Finished: {} completed, {} abandoned, {} pages downloaded",
            report.completed(),
            report.abandoned(),
            report.pages_downloaded()
        );

        Ok(report)
    }
}
