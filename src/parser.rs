use crate::extractor::{first_text, ChapterFragment};
use crate::models::ChapterRecord;
use crate::traits::SiteAdapter;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Row class is one of the adapter's skip markers
    Marker,
    InvalidNumber,
    MissingLink,
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SkipReason::Marker => write!(f, "skip marker"),
            SkipReason::InvalidNumber => write!(f, "no chapter number"),
            SkipReason::MissingLink => write!(f, "no chapter link"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChapterParse {
    Record(ChapterRecord),
    Skip(SkipReason),
}

pub fn parse_chapter(fragment: &ChapterFragment<'_>, adapter: &dyn SiteAdapter) -> ChapterParse {
    if adapter.is_skippable(fragment.class()) {
        return ChapterParse::Skip(SkipReason::Marker);
    }

    let selectors = adapter.selectors();
    let element = fragment.element();
    let text = first_text(element, &selectors.chapter_text);

    let number = match adapter.extract_chapter_number(&text) {
        Some(number) => number,
        None => return ChapterParse::Skip(SkipReason::InvalidNumber),
    };
    let name = adapter.extract_chapter_name(&text);

    let url = element
        .select(&selectors.chapter_link)
        .next()
        .and_then(|a| a.value().attr("href"))
        .and_then(|href| adapter.base_url().join(href.trim()).ok());
    let url = match url {
        Some(url) => url.to_string(),
        None => return ChapterParse::Skip(SkipReason::MissingLink),
    };

    let date = first_text(element, &selectors.chapter_date);

    ChapterParse::Record(ChapterRecord {
        name,
        number,
        url,
        date,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractor::CatalogDocument;
    use crate::sites::mangapanda::MangaPanda;

    fn listing(rows: &str) -> String {
        format!(
            "<html><body><table id=\"listing\"><tbody>{}</tbody></table></body></html>",
            rows
        )
    }

    fn parse_all(rows: &str) -> Vec<ChapterParse> {
        let site = MangaPanda::new().unwrap();
        let doc = CatalogDocument::parse(&listing(rows));
        doc.chapter_fragments(&site)
            .iter()
            .map(|fragment| parse_chapter(fragment, &site))
            .collect()
    }

    #[test]
    fn parses_a_chapter_row() {
        let parsed = parse_all(
            r#"<tr><td><div class="chico_manga"></div><a href="/naruto/12">Ch. 12</a>: The Beginning</td><td>07/04/2009</td></tr>"#,
        );
        assert_eq!(
            parsed,
            vec![ChapterParse::Record(ChapterRecord {
                name: "The Beginning".to_string(),
                number: 12,
                url: "https://www.mangapanda.com/naruto/12".to_string(),
                date: "07/04/2009".to_string(),
            })]
        );
    }

    #[test]
    fn skip_marker_wins_over_content() {
        let parsed = parse_all(
            r#"<tr class="table_head"><td><a href="/naruto/1">Naruto 1</a> : Valid looking</td><td>01/01/2001</td></tr>
               <tr class="table_head"><th>Chapter Name</th><th>Date Added</th></tr>"#,
        );
        assert_eq!(
            parsed,
            vec![
                ChapterParse::Skip(SkipReason::Marker),
                ChapterParse::Skip(SkipReason::Marker)
            ]
        );
    }

    #[test]
    fn malformed_number_is_skipped() {
        let parsed = parse_all(
            r#"<tr><td><a href="/naruto/x">Naruto special</a></td><td></td></tr>
               <tr><td><a href="/naruto/y">Naruto extra</a> : Omake</td><td></td></tr>"#,
        );
        assert_eq!(
            parsed,
            vec![
                ChapterParse::Skip(SkipReason::InvalidNumber),
                ChapterParse::Skip(SkipReason::InvalidNumber)
            ]
        );
    }

    #[test]
    fn missing_link_is_skipped() {
        let parsed = parse_all(r#"<tr><td>Naruto 3 : No link</td><td>07/04/2009</td></tr>"#);
        assert_eq!(parsed, vec![ChapterParse::Skip(SkipReason::MissingLink)]);
    }

    #[test]
    fn missing_date_is_empty() {
        let parsed = parse_all(r#"<tr><td><a href="/naruto/4">Naruto 4</a> : Date less</td></tr>"#);
        match &parsed[0] {
            ChapterParse::Record(record) => {
                assert_eq!(record.number, 4);
                assert_eq!(record.date, "");
            }
            other => panic!("expected record, got {:?}", other),
        }
    }
}
