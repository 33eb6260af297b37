use crate::error::{Result, ScrapeError};
use crate::models::{ChapterRecord, MangaMetadata};
use crate::parser::{parse_chapter, ChapterParse, SkipReason};
use crate::traits::SiteAdapter;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, warn};
use url::Url;

/// A parsed catalog page
pub struct CatalogDocument {
    document: Html,
}

/// One row of the chapter listing, before parsing
#[derive(Clone, Copy)]
pub struct ChapterFragment<'a> {
    element: ElementRef<'a>,
}

impl<'a> ChapterFragment<'a> {
    pub fn new(element: ElementRef<'a>) -> Self {
        Self { element }
    }

    pub fn class(&self) -> Option<&'a str> {
        self.element.value().attr("class")
    }

    pub fn element(&self) -> ElementRef<'a> {
        self.element
    }
}

/// Everything a run needs from the catalog page
#[derive(Debug, Clone)]
pub struct Catalog {
    pub metadata: MangaMetadata,
    pub chapters: Vec<ChapterRecord>,
    pub skipped: usize,
}

impl CatalogDocument {
    pub fn parse(markup: &str) -> Self {
        Self {
            document: Html::parse_document(markup),
        }
    }

    /// Fields whose selector matches nothing are left empty.
    pub fn metadata(&self, adapter: &dyn SiteAdapter) -> MangaMetadata {
        let selectors = adapter.selectors();
        let root = self.document.root_element();

        let title = first_text(root, &selectors.title);
        let alternate_title = first_text(root, &selectors.alternate_title);
        let year = first_text(root, &selectors.year);
        let status = first_text(root, &selectors.status);
        let author = first_text(root, &selectors.author);

        let chapter_count = self
            .chapter_fragments(adapter)
            .iter()
            .filter(|fragment| !adapter.is_skippable(fragment.class()))
            .count();

        MangaMetadata {
            title,
            alternate_title,
            year,
            status,
            author,
            chapter_count,
        }
    }

    /// Chapter listing rows in document order, header rows included.
    pub fn chapter_fragments(&self, adapter: &dyn SiteAdapter) -> Vec<ChapterFragment<'_>> {
        self.document
            .select(&adapter.selectors().chapter_list)
            .map(ChapterFragment::new)
            .collect()
    }
}

pub fn extract_catalog(markup: &str, adapter: &dyn SiteAdapter) -> Catalog {
    let document = CatalogDocument::parse(markup);
    let metadata = document.metadata(adapter);

    let mut chapters = Vec::new();
    let mut skipped = 0;

    for (index, fragment) in document.chapter_fragments(adapter).iter().enumerate() {
        match parse_chapter(fragment, adapter) {
            ChapterParse::Record(record) => chapters.push(record),
            ChapterParse::Skip(SkipReason::Marker) => {
                debug!("Skipping chapter list row {} ({:?})", index, fragment.class());
                skipped += 1;
            }
            ChapterParse::Skip(reason) => {
                warn!("Skipping chapter list row {}: {}", index, reason);
                skipped += 1;
            }
        }
    }

    debug!(
        "Extracted {} chapters ({} rows skipped) for {:?}",
        chapters.len(),
        skipped,
        metadata.title
    );

    Catalog {
        metadata,
        chapters,
        skipped,
    }
}

/// Number of pages announced on a chapter page.
pub fn page_count(markup: &str, adapter: &dyn SiteAdapter) -> Result<u32> {
    let document = Html::parse_document(markup);
    let text = first_text(document.root_element(), &adapter.selectors().page_count);

    text.parse::<u32>()
        .map_err(|_| ScrapeError::scraping(format!("invalid page count {:?}", text)))
}

/// Absolute URL of the image shown on a chapter page.
pub fn page_image_url(markup: &str, adapter: &dyn SiteAdapter, page_url: &str) -> Result<String> {
    let document = Html::parse_document(markup);
    let src = document
        .select(&adapter.selectors().page_image)
        .next()
        .and_then(|img| img.value().attr("src"))
        .map(str::trim)
        .filter(|src| !src.is_empty())
        .ok_or_else(|| ScrapeError::scraping("no image source on page"))?;

    Ok(Url::parse(page_url)?.join(src)?.to_string())
}

/// Trimmed text of the first match under `root`, or empty.
pub fn first_text(root: ElementRef<'_>, selector: &Selector) -> String {
    root.select(selector)
        .next()
        .map(|el| el.text().collect::<String>().trim().to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sites::mangapanda::MangaPanda;
    use crate::testing::{catalog_html, chapter_page_html};

    #[test]
    fn metadata_fields_in_order() {
        let site = MangaPanda::new().unwrap();
        let doc = CatalogDocument::parse(&catalog_html(3));
        let metadata = doc.metadata(&site);

        assert_eq!(metadata.title, "Naruto");
        assert_eq!(metadata.alternate_title, "ナルト");
        assert_eq!(metadata.year, "1999");
        assert_eq!(metadata.status, "Completed");
        assert_eq!(metadata.author, "Kishimoto Masashi");
        assert_eq!(metadata.chapter_count, 3);
    }

    #[test]
    fn missing_metadata_is_empty_not_an_error() {
        let site = MangaPanda::new().unwrap();
        let doc = CatalogDocument::parse("<html><body><h2 class=\"aname\">Bleach</h2></body></html>");
        let metadata = doc.metadata(&site);

        assert_eq!(metadata.title, "Bleach");
        assert_eq!(metadata.alternate_title, "");
        assert_eq!(metadata.author, "");
        assert_eq!(metadata.chapter_count, 0);
    }

    #[test]
    fn fragments_keep_document_order_and_header() {
        let site = MangaPanda::new().unwrap();
        let doc = CatalogDocument::parse(&catalog_html(3));
        let fragments = doc.chapter_fragments(&site);

        assert_eq!(fragments.len(), 4);
        assert_eq!(fragments[0].class(), Some("table_head"));
        assert_eq!(fragments[1].class(), None);
    }

    #[test]
    fn extract_catalog_parses_records() {
        let site = MangaPanda::new().unwrap();
        let catalog = extract_catalog(&catalog_html(3), &site);

        assert_eq!(catalog.skipped, 1);
        let numbers: Vec<u32> = catalog.chapters.iter().map(|c| c.number).collect();
        assert_eq!(numbers, vec![1, 2, 3]);
        assert_eq!(catalog.chapters[0].name, "Chapter title 1");
        assert_eq!(catalog.chapters[0].url, "https://www.mangapanda.com/naruto/1");
        assert_eq!(catalog.chapters[2].date, "07/03/2009");
    }

    #[test]
    fn page_count_from_last_option() {
        let site = MangaPanda::new().unwrap();
        let html = chapter_page_html(17, "https://i.mangapanda.com/naruto/1/1.jpg");
        assert_eq!(page_count(&html, &site).unwrap(), 17);
    }

    #[test]
    fn page_count_rejects_garbage() {
        let site = MangaPanda::new().unwrap();
        let html = "<select id=\"pageMenu\"><option>last</option></select>";
        assert!(page_count(html, &site).is_err());
        assert!(page_count("<p>nothing</p>", &site).is_err());
    }

    #[test]
    fn image_url_is_resolved_against_page() {
        let site = MangaPanda::new().unwrap();
        let page_url = "https://www.mangapanda.com/naruto/1/2";

        let absolute = chapter_page_html(2, "https://i.mangapanda.com/naruto/1/2.jpg");
        assert_eq!(
            page_image_url(&absolute, &site, page_url).unwrap(),
            "https://i.mangapanda.com/naruto/1/2.jpg"
        );

        let relative = chapter_page_html(2, "/images/2.jpg");
        assert_eq!(
            page_image_url(&relative, &site, page_url).unwrap(),
            "https://www.mangapanda.com/images/2.jpg"
        );

        assert!(page_image_url("<div id=\"img\"></div>", &site, page_url).is_err());
    }
}
