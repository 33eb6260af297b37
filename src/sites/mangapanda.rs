use super::{SelectorRules, SiteSelectors};
use crate::error::Result;
use crate::traits::SiteAdapter;
use url::Url;

pub const DOMAIN: &str = "www.mangapanda.com";
pub const BASE_URL: &str = "https://www.mangapanda.com";

pub const RULES: SelectorRules = SelectorRules {
    title: ".aname",
    alternate_title: "#mangaproperties tbody tr:nth-child(2) td:nth-child(2)",
    year: "#mangaproperties tbody tr:nth-child(3) td:nth-child(2)",
    status: "#mangaproperties tbody tr:nth-child(4) td:nth-child(2)",
    author: "#mangaproperties tbody tr:nth-child(5) td:nth-child(2)",

    chapter_list: "#listing > tbody > tr",
    page_count: "#pageMenu option:last-child",
    page_image: "#img",

    chapter_text: "td:nth-child(1)",
    chapter_link: "td:nth-child(1) a",
    chapter_date: "td:nth-child(2)",
};

const SKIPPABLE: &[&str] = &["table_head"];

/// https://www.mangapanda.com
#[derive(Debug)]
pub struct MangaPanda {
    base_url: Url,
    selectors: SiteSelectors,
}

impl MangaPanda {
    pub fn new() -> Result<Self> {
        Ok(Self {
            base_url: Url::parse(BASE_URL)?,
            selectors: SiteSelectors::compile(&RULES)?,
        })
    }
}

impl SiteAdapter for MangaPanda {
    fn site_name(&self) -> &str {
        "Manga Panda"
    }

    fn domain(&self) -> &str {
        DOMAIN
    }

    fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn selectors(&self) -> &SiteSelectors {
        &self.selectors
    }

    fn skippable_classes(&self) -> &[&str] {
        SKIPPABLE
    }

    fn page_url_template(&self) -> &str {
        "{page}"
    }
}
