use crate::error::Result;
use crate::models::ChapterRecord;
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use tracing::debug;
use url::Url;

fn illegal_characters() -> &'static Regex {
    static ILLEGAL: OnceLock<Regex> = OnceLock::new();
    ILLEGAL.get_or_init(|| Regex::new(r"[^a-zA-Z0-9\-_.]").expect("static pattern"))
}

/// Replaces every character outside `[A-Za-z0-9-_.]` with a space.
pub fn sanitize_path_name(name: &str) -> String {
    illegal_characters().replace_all(name, " ").into_owned()
}

/// Title used for naming, falling back to the last segment of the catalog URL
/// when the scraped title would sanitize to nothing.
pub fn naming_title(title: &str, manga_url: &str) -> String {
    if !sanitize_path_name(title).trim().is_empty() {
        return title.to_string();
    }

    Url::parse(manga_url)
        .ok()
        .and_then(|url| {
            url.path_segments()?
                .rev()
                .find(|segment| !sanitize_path_name(segment).trim().is_empty())
                .map(str::to_string)
        })
        .unwrap_or_else(|| "untitled".to_string())
}

/// Creates a directory and its parents, succeeding if it already exists.
pub async fn ensure_dir(path: &Path) -> Result<()> {
    tokio::fs::create_dir_all(path).await?;
    debug!("Ensured directory {:?}", path);
    Ok(())
}

/// Directory and file naming for one manga download
#[derive(Debug, Clone)]
pub struct StorageLayout {
    manga_dir: PathBuf,
    manga_title: String,
}

impl StorageLayout {
    /// `<root>/<site name>/<sanitized title>`
    pub fn new(root: impl AsRef<Path>, site_name: &str, manga_title: &str) -> Self {
        let manga_title = sanitize_path_name(manga_title);
        let manga_dir = root.as_ref().join(site_name).join(&manga_title);
        Self {
            manga_dir,
            manga_title,
        }
    }

    pub fn manga_dir(&self) -> &Path {
        &self.manga_dir
    }

    pub fn chapter_dir(&self, chapter: &ChapterRecord) -> PathBuf {
        self.manga_dir
            .join(format!("Chapter {} - {}", chapter.number, chapter.name))
    }

    /// File stem of a page image, without extension
    pub fn page_file_name(&self, chapter: &ChapterRecord, page: u32) -> String {
        format!(
            "{} {} - {} - Page {}",
            self.manga_title, chapter.number, chapter.name, page
        )
    }
}
