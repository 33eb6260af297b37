use crate::error::Result;
use crate::sites::SiteSelectors;
use crate::storage::sanitize_path_name;
use std::path::Path;
use url::Url;

/// Extraction rules for one manga site
pub trait SiteAdapter: Send + Sync {
    fn site_name(&self) -> &str;

    /// Hostname the registry matches on
    fn domain(&self) -> &str;

    /// Chapter links are resolved against this URL
    fn base_url(&self) -> &Url;

    fn selectors(&self) -> &SiteSelectors;

    /// Class names of chapter list rows that are not chapters
    fn skippable_classes(&self) -> &[&str];

    /// Page URL template with a `{page}` placeholder, appended to the chapter URL
    fn page_url_template(&self) -> &str;

    fn is_skippable(&self, class: Option<&str>) -> bool {
        match class {
            Some(class) => self.skippable_classes().iter().any(|skip| *skip == class),
            None => false,
        }
    }

    fn chapter_page_url(&self, chapter_url: &str, page: u32) -> String {
        let suffix = self
            .page_url_template()
            .replace("{page}", &page.to_string());
        format!("{}/{}", chapter_url.trim_end_matches('/'), suffix)
    }

    fn extract_chapter_number(&self, text: &str) -> Option<u32> {
        chapter_number_before_colon(text)
    }

    fn extract_chapter_name(&self, text: &str) -> String {
        chapter_name_after_colon(text)
    }
}

/// Source of page markup and image bytes
#[async_trait::async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetch a page body as text
    async fn fetch_text(&self, url: &str) -> Result<String>;

    /// Stream a response body into `path`, truncating it. Returns bytes written.
    async fn fetch_to_file(&self, url: &str, path: &Path) -> Result<u64>;
}

/// `"Naruto 1 : Uzumaki Naruto"` -> `1`. The number sits between the last
/// letter before the first colon and the colon itself.
pub fn chapter_number_before_colon(text: &str) -> Option<u32> {
    let colon = text.find(':')?;
    let head = &text[..colon];
    let start = head
        .char_indices()
        .rev()
        .find(|(_, c)| c.is_alphabetic())
        .map(|(i, c)| i + c.len_utf8())
        .unwrap_or(0);

    head[start..]
        .trim_matches(|c: char| !c.is_ascii_digit())
        .parse::<u32>()
        .ok()
}

pub fn chapter_name_after_colon(text: &str) -> String {
    let name = match text.find(':') {
        Some(colon) => &text[colon + 1..],
        None => text,
    };
    sanitize_path_name(name.trim())
}
