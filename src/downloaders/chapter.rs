use crate::downloaders::image::download_image;
use crate::error::Result;
use crate::extractor::{page_count, page_image_url};
use crate::models::{ChapterOutcome, ChapterRecord, DownloadTarget};
use crate::storage::StorageLayout;
use crate::traits::{PageFetcher, SiteAdapter};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Downloads every page of a chapter, one page at a time.
///
/// The first page tells how many pages there are. If it cannot be fetched or
/// read, the chapter is abandoned. Any later page that fails is logged and
/// skipped, the remaining pages are still attempted.
pub struct ChapterDownloader {
    fetcher: Arc<dyn PageFetcher>,
    adapter: Arc<dyn SiteAdapter>,
    layout: StorageLayout,
}

impl ChapterDownloader {
    pub fn new(
        fetcher: Arc<dyn PageFetcher>,
        adapter: Arc<dyn SiteAdapter>,
        layout: StorageLayout,
    ) -> Self {
        Self {
            fetcher,
            adapter,
            layout,
        }
    }

    /// Expects the chapter directory to exist already.
    pub async fn download(&self, chapter: &ChapterRecord) -> ChapterOutcome {
        let first_url = self.adapter.chapter_page_url(&chapter.url, 1);

        let first_page = match self.fetcher.fetch_text(&first_url).await {
            Ok(markup) => markup,
            Err(e) => {
                warn!(
                    "Error downloading Chapter {} - {}: {}",
                    chapter.number, chapter.name, e
                );
                return ChapterOutcome::abandoned(e.to_string());
            }
        };

        let total = match page_count(&first_page, self.adapter.as_ref()) {
            Ok(total) => total,
            Err(e) => {
                warn!(
                    "Error reading page count of Chapter {} - {}: {}",
                    chapter.number, chapter.name, e
                );
                return ChapterOutcome::abandoned(e.to_string());
            }
        };

        info!(
            "Chapter {} - {} has {} pages",
            chapter.number, chapter.name, total
        );

        let chapter_dir = self.layout.chapter_dir(chapter);
        let mut prefetched = Some(first_page);
        let mut downloaded = 0;

        for page in 1..=total {
            match self
                .download_page(chapter, &chapter_dir, page, total, prefetched.take())
                .await
            {
                Ok(path) => {
                    debug!("Saved {:?}", path);
                    downloaded += 1;
                }
                Err(e) => {
                    warn!(
                        "Error downloading Chapter {} - {} Page: {}/{}: {}",
                        chapter.number, chapter.name, page, total, e
                    );
                }
            }
        }

        ChapterOutcome::Completed {
            pages_total: total,
            pages_downloaded: downloaded,
        }
    }

    async fn download_page(
        &self,
        chapter: &ChapterRecord,
        chapter_dir: &std::path::Path,
        page: u32,
        total: u32,
        prefetched: Option<String>,
    ) -> Result<PathBuf> {
        let page_url = self.adapter.chapter_page_url(&chapter.url, page);

        let markup = match prefetched {
            Some(markup) => markup,
            None => self.fetcher.fetch_text(&page_url).await?,
        };
        let image_url = page_image_url(&markup, self.adapter.as_ref(), &page_url)?;

        let target = DownloadTarget {
            chapter_number: chapter.number,
            chapter_name: chapter.name.clone(),
            page,
            total_pages: total,
            dest_dir: chapter_dir.to_path_buf(),
            file_name: self.layout.page_file_name(chapter, page),
        };

        download_image(self.fetcher.as_ref(), &image_url, &target).await
    }
}
