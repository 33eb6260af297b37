use crate::models::{ChapterOutcome, ChapterRecord, MangaMetadata};
use serde::Serialize;
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize)]
pub struct ReportRow {
    #[serde(flatten)]
    pub chapter: ChapterRecord,
    /// `None` until the chapter task has been drained
    pub outcome: Option<ChapterOutcome>,
}

/// Summary of one run, one row per discovered chapter in catalog order
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub site: String,
    pub manga_url: String,
    pub download_directory: PathBuf,
    pub metadata: MangaMetadata,
    pub rows: Vec<ReportRow>,
}

impl RunReport {
    pub fn new(
        site: impl Into<String>,
        manga_url: impl Into<String>,
        download_directory: PathBuf,
        metadata: MangaMetadata,
    ) -> Self {
        Self {
            site: site.into(),
            manga_url: manga_url.into(),
            download_directory,
            metadata,
            rows: Vec::new(),
        }
    }

    pub fn push(&mut self, chapter: ChapterRecord) -> usize {
        self.rows.push(ReportRow {
            chapter,
            outcome: None,
        });
        self.rows.len() - 1
    }

    pub fn set_outcome(&mut self, index: usize, outcome: ChapterOutcome) {
        if let Some(row) = self.rows.get_mut(index) {
            row.outcome = Some(outcome);
        }
    }

    pub fn completed(&self) -> usize {
        self.rows
            .iter()
            .filter(|row| matches!(row.outcome, Some(ChapterOutcome::Completed { .. })))
            .count()
    }

    pub fn abandoned(&self) -> usize {
        self.rows
            .iter()
            .filter(|row| matches!(row.outcome, Some(ChapterOutcome::Abandoned { .. })))
            .count()
    }

    pub fn pages_downloaded(&self) -> u32 {
        self.rows
            .iter()
            .filter_map(|row| match row.outcome {
                Some(ChapterOutcome::Completed { pages_downloaded, .. }) => Some(pages_downloaded),
                _ => None,
            })
            .sum()
    }

    pub fn render(&self) -> String {
        let m = &self.metadata;
        let mut lines = vec![
            format!("| # Manga URL: {}", self.manga_url),
            format!("| # Site: {}", self.site),
            format!("| # Manga name: {}", m.title),
            format!("| # Alternate Name: {}", m.alternate_title),
            format!("| # Year of release: {}", m.year),
            format!("| # Status: {}", m.status),
            format!("| # Author: {}", m.author),
            format!("| # Number of chapters: {}", m.chapter_count),
            format!(
                "| # Manga download directory: {}",
                self.download_directory.display()
            ),
            format!("|{}", "-".repeat(62)),
            format!(
                "{:<40} {:<8} {:<50} {:<12} {:<8} {}",
                "Chapter Name", "Number", "URL", "Release", "Pages", "Status"
            ),
            "-".repeat(130),
        ];

        for row in &self.rows {
            let (pages, status) = match &row.outcome {
                Some(outcome @ ChapterOutcome::Completed { pages_downloaded, pages_total }) => {
                    (format!("{}/{}", pages_downloaded, pages_total), outcome.to_string())
                }
                Some(outcome @ ChapterOutcome::Abandoned { reason }) => {
                    ("-".to_string(), format!("{}: {}", outcome, reason))
                }
                None => ("-".to_string(), "Pending".to_string()),
            };

            lines.push(format!(
                "{:<40} {:<8} {:<50} {:<12} {:<8} {}",
                row.chapter.name, row.chapter.number, row.chapter.url, row.chapter.date, pages, status
            ));
        }

        lines.push(format!(
            "{} chapters, {} completed, {} abandoned, {} pages downloaded",
            self.rows.len(),
            self.completed(),
            self.abandoned(),
            self.pages_downloaded()
        ));

        let mut out = lines.join("\n");
        out.push('\n');
        out
    }
}
