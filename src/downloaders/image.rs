use crate::error::Result;
use crate::models::DownloadTarget;
use crate::traits::PageFetcher;
use std::path::PathBuf;
use tracing::info;

/// Streams one page image to `<dest_dir>/<file_name>.jpg`, replacing any older file.
pub async fn download_image(
    fetcher: &dyn PageFetcher,
    image_url: &str,
    target: &DownloadTarget,
) -> Result<PathBuf> {
    let path = target.path();
    let bytes = fetcher.fetch_to_file(image_url, &path).await?;

    info!(
        bytes,
        "Downloaded chapter {} - {} page {}/{}",
        target.chapter_number,
        target.chapter_name,
        target.page,
        target.total_pages
    );

    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ScrapeError;
    use crate::testing::FakeFetcher;

    fn target(dir: &std::path::Path) -> DownloadTarget {
        DownloadTarget {
            chapter_number: 1,
            chapter_name: "Uzumaki Naruto".to_string(),
            page: 2,
            total_pages: 3,
            dest_dir: dir.to_path_buf(),
            file_name: "Naruto 1 - Uzumaki Naruto - Page 2".to_string(),
        }
    }

    #[tokio::test]
    async fn writes_jpg_named_after_target() {
        let dir = tempfile::tempdir().unwrap();
        let fetcher = FakeFetcher::new().with_image("https://i.example/2.jpg", b"jpeg");

        let path = download_image(&fetcher, "https://i.example/2.jpg", &target(dir.path()))
            .await
            .unwrap();

        assert_eq!(path, dir.path().join("Naruto 1 - Uzumaki Naruto - Page 2.jpg"));
        assert_eq!(std::fs::read(&path).unwrap(), b"jpeg");
    }

    #[tokio::test]
    async fn failure_leaves_no_file() {
        let dir = tempfile::tempdir().unwrap();
        let fetcher = FakeFetcher::new();

        let result = download_image(&fetcher, "https://i.example/404.jpg", &target(dir.path())).await;

        assert!(matches!(result, Err(ScrapeError::FetchFailed { .. })));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }
}
