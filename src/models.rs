use serde::Serialize;
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct MangaMetadata {
    pub title: String,
    pub alternate_title: String,
    pub year: String,
    pub status: String,
    pub author: String,
    pub chapter_count: usize,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ChapterRecord {
    /// Already sanitized for use in paths
    pub name: String,
    pub number: u32,
    pub url: String,
    pub date: String,
}

/// One image to save: where it goes and which page it is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadTarget {
    pub chapter_number: u32,
    pub chapter_name: String,
    pub page: u32,
    pub total_pages: u32,
    pub dest_dir: PathBuf,
    /// File stem, the `.jpg` extension is added when writing
    pub file_name: String,
}

impl DownloadTarget {
    pub fn path(&self) -> PathBuf {
        self.dest_dir.join(format!("{}.jpg", self.file_name))
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ChapterOutcome {
    Completed {
        pages_total: u32,
        pages_downloaded: u32,
    },
    Abandoned {
        reason: String,
    },
}

impl ChapterOutcome {
    pub fn abandoned(reason: impl Into<String>) -> Self {
        Self::Abandoned {
            reason: reason.into(),
        }
    }

    pub fn pages_failed(&self) -> u32 {
        match self {
            Self::Completed {
                pages_total,
                pages_downloaded,
            } => pages_total.saturating_sub(*pages_downloaded),
            Self::Abandoned { .. } => 0,
        }
    }
}

impl std::fmt::Display for ChapterOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChapterOutcome::Completed {
                pages_total,
                pages_downloaded,
            } if pages_total == pages_downloaded => write!(f, "Done"),
            ChapterOutcome::Completed { pages_downloaded, pages_total } => {
                write!(f, "Partial ({}/{})", pages_downloaded, pages_total)
            }
            ChapterOutcome::Abandoned { .. } => write!(f, "Abandoned"),
        }
    }
}
