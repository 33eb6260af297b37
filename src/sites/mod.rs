pub mod mangapanda;

use crate::error::{Result, ScrapeError};
use scraper::Selector;

/// Selector strings for one site, as written by hand
#[derive(Debug, Clone, Copy)]
pub struct SelectorRules {
    pub title: &'static str,
    pub alternate_title: &'static str,
    pub year: &'static str,
    pub status: &'static str,
    pub author: &'static str,

    pub chapter_list: &'static str,
    pub page_count: &'static str,
    pub page_image: &'static str,

    pub chapter_text: &'static str,
    pub chapter_link: &'static str,
    pub chapter_date: &'static str,
}

/// [`SelectorRules`] parsed once when the adapter is built
#[derive(Debug)]
pub struct SiteSelectors {
    pub title: Selector,
    pub alternate_title: Selector,
    pub year: Selector,
    pub status: Selector,
    pub author: Selector,

    pub chapter_list: Selector,
    pub page_count: Selector,
    pub page_image: Selector,

    pub chapter_text: Selector,
    pub chapter_link: Selector,
    pub chapter_date: Selector,
}

impl SiteSelectors {
    pub fn compile(rules: &SelectorRules) -> Result<Self> {
        Ok(Self {
            title: parse_selector(rules.title)?,
            alternate_title: parse_selector(rules.alternate_title)?,
            year: parse_selector(rules.year)?,
            status: parse_selector(rules.status)?,
            author: parse_selector(rules.author)?,
            chapter_list: parse_selector(rules.chapter_list)?,
            page_count: parse_selector(rules.page_count)?,
            page_image: parse_selector(rules.page_image)?,
            chapter_text: parse_selector(rules.chapter_text)?,
            chapter_link: parse_selector(rules.chapter_link)?,
            chapter_date: parse_selector(rules.chapter_date)?,
        })
    }
}

pub fn parse_selector(selector: &str) -> Result<Selector> {
    Selector::parse(selector).map_err(|e| ScrapeError::Selector {
        selector: selector.to_string(),
        reason: format!("{:?}", e),
    })
}
