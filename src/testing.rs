//! Shared fixtures for unit tests.

use crate::error::{Result, ScrapeError};
use crate::traits::PageFetcher;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Mutex;

/// In-memory fetcher. Unknown URLs fail like an exhausted retry loop.
#[derive(Default)]
pub struct FakeFetcher {
    pages: HashMap<String, String>,
    images: HashMap<String, Vec<u8>>,
    page_requests: Mutex<Vec<String>>,
    image_requests: Mutex<Vec<String>>,
}

impl FakeFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(mut self, url: &str, markup: &str) -> Self {
        self.pages.insert(url.to_string(), markup.to_string());
        self
    }

    pub fn without_page(mut self, url: &str) -> Self {
        self.pages.remove(url);
        self
    }

    pub fn with_image(mut self, url: &str, bytes: &[u8]) -> Self {
        self.images.insert(url.to_string(), bytes.to_vec());
        self
    }

    pub fn without_image(mut self, url: &str) -> Self {
        self.images.remove(url);
        self
    }

    pub fn page_requests(&self) -> Vec<String> {
        self.page_requests.lock().unwrap().clone()
    }

    pub fn image_requests(&self) -> Vec<String> {
        self.image_requests.lock().unwrap().clone()
    }

    fn failed(url: &str) -> ScrapeError {
        ScrapeError::FetchFailed {
            url: url.to_string(),
            attempts: 1,
        }
    }
}

#[async_trait::async_trait]
impl PageFetcher for FakeFetcher {
    async fn fetch_text(&self, url: &str) -> Result<String> {
        self.page_requests.lock().unwrap().push(url.to_string());
        self.pages.get(url).cloned().ok_or_else(|| Self::failed(url))
    }

    async fn fetch_to_file(&self, url: &str, path: &Path) -> Result<u64> {
        self.image_requests.lock().unwrap().push(url.to_string());
        let bytes = self.images.get(url).ok_or_else(|| Self::failed(url))?;
        tokio::fs::write(path, bytes).await?;
        Ok(bytes.len() as u64)
    }
}

/// Manga Panda style catalog with a header row and `chapters` chapter rows.
pub fn catalog_html(chapters: u32) -> String {
    let rows: String = (1..=chapters)
        .map(|i| {
            format!(
                r#"<tr><td><div class="chico_manga"></div><a href="/naruto/{i}">Naruto {i}</a> : Chapter title {i}</td><td>07/{i:02}/2009</td></tr>"#,
                i = i
            )
        })
        .collect();

    format!(
        r#"<html><body>
<h2 class="aname">Naruto</h2>
<table id="mangaproperties"><tbody>
<tr><td>Name:</td><td>Naruto</td></tr>
<tr><td>Alternate Name:</td><td>ナルト</td></tr>
<tr><td>Year of Release:</td><td>1999</td></tr>
<tr><td>Status:</td><td>Completed</td></tr>
<tr><td>Author:</td><td>Kishimoto Masashi</td></tr>
</tbody></table>
<table id="listing"><tbody>
<tr class="table_head"><th>Chapter Name</th><th>Date Added</th></tr>
{rows}
</tbody></table>
</body></html>"#,
        rows = rows
    )
}

/// Chapter page announcing `total` pages and showing `image_src`.
pub fn chapter_page_html(total: u32, image_src: &str) -> String {
    let options: String = (1..=total)
        .map(|p| format!("<option value=\"{p}\">{p}</option>", p = p))
        .collect();

    format!(
        r#"<html><body>
<div id="selectpage"><select id="pageMenu" name="pageMenu">{options}</select></div>
<div id="imgholder"><a href="next"><img id="img" src="{image_src}" alt="page"></a></div>
</body></html>"#,
        options = options,
        image_src = image_src
    )
}
