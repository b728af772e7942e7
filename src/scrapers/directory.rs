//! District index page: the list of municipalities to scrape.

use crate::error::{Result, ScrapeError};
use crate::extract::FieldSelector;
use crate::fetcher::PageFetcher;
use crate::models::Entity;
use crate::scrapers::static_selector;
use itertools::Itertools;
use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use tracing::{debug, info, instrument, warn};
use url::Url;

static ENTITY_ID: Lazy<FieldSelector> = Lazy::new(|| static_selector("td", "cislo", None));
static ENTITY_NAME: Lazy<FieldSelector> =
    Lazy::new(|| static_selector("td", "overflow_name", None));
/// Column header above the municipality codes (`th#t1sb1`, `th#t2sb1`, ...).
static INDEX_HEADER: Lazy<Selector> = Lazy::new(|| {
    Selector::parse(r#"th[id^="t"][id$="sb1"]"#).expect("static selector must compile")
});

/// Fetch the index page and list its municipalities in document order.
///
/// # Arguments
///
/// * `fetcher` - Where the page comes from
/// * `index_url` - The district index page (`ps32?...`)
///
/// # Returns
///
/// One [`Entity`] per municipality row, in the order the page lists them.
///
/// # Errors
///
/// - [`ScrapeError::DirectoryUnavailable`] if the page cannot be fetched
/// - [`ScrapeError::DirectorySchemaMismatch`] if the page has no municipality
///   table, or codes and names do not line up
///
/// An index table with no municipality rows is not an error; it yields an
/// empty list and a warning.
#[instrument(level = "info", skip_all, fields(%index_url))]
pub async fn resolve_directory<F: PageFetcher>(fetcher: &F, index_url: &Url) -> Result<Vec<Entity>> {
    let html = fetcher
        .fetch(index_url)
        .await
        .map_err(|e| ScrapeError::DirectoryUnavailable {
            url: index_url.to_string(),
            reason: match e {
                ScrapeError::PageUnavailable { reason, .. } => reason,
                other => other.to_string(),
            },
        })?;

    let entities = parse_directory(&html, index_url.as_str())?;
    if entities.is_empty() {
        warn!("Index page lists no municipalities");
    } else {
        info!(count = entities.len(), "Indexed municipalities");
    }
    debug!(ids = %entities.iter().map(|e| &e.id).join(","), "Municipality codes");
    Ok(entities)
}

/// Parse index-page markup into entities.
///
/// The site answers an unknown district with a 200 error page, so the
/// municipality table header must be present even when no rows follow it.
pub fn parse_directory(html: &str, url: &str) -> Result<Vec<Entity>> {
    let document = Html::parse_document(html);
    let mismatch = |reason: String| ScrapeError::DirectorySchemaMismatch {
        url: url.to_string(),
        reason,
    };

    if document.select(&INDEX_HEADER).next().is_none() {
        return Err(mismatch(
            "no municipality table header (th#t1sb1) on the page".to_string(),
        ));
    }

    let ids: Vec<String> = ENTITY_ID.texts(&document).collect();
    let names: Vec<String> = ENTITY_NAME.texts(&document).collect();

    if ids.len() != names.len() {
        return Err(mismatch(format!(
            "found {} municipality codes but {} names",
            ids.len(),
            names.len()
        )));
    }
    if let Some(pos) = ids.iter().position(|id| id.is_empty()) {
        return Err(mismatch(format!("municipality code #{} is empty", pos + 1)));
    }
    let duplicates: Vec<&String> = ids.iter().duplicates().collect();
    if !duplicates.is_empty() {
        return Err(mismatch(format!(
            "duplicate municipality codes: {}",
            duplicates.iter().join(", ")
        )));
    }

    Ok(ids
        .into_iter()
        .zip(names)
        .map(|(id, name)| Entity { id, name })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    const INDEX: &str = include_str!("../../tests/fixtures/index.html");
    const INDEX_EMPTY: &str = include_str!("../../tests/fixtures/index_empty.html");
    const INDEX_URL: &str = "http://localhost/pls/ps2017nss/ps32?xjazyk=CZ&xkraj=12&xnumnuts=7103";

    struct StaticPages(HashMap<String, String>);

    impl PageFetcher for StaticPages {
        async fn fetch(&self, url: &Url) -> Result<String> {
            self.0
                .get(url.as_str())
                .cloned()
                .ok_or_else(|| ScrapeError::PageUnavailable {
                    url: url.to_string(),
                    reason: "HTTP status 404 Not Found".into(),
                })
        }
    }

    #[test]
    fn test_parse_fixture_in_document_order() {
        let entities = parse_directory(INDEX, INDEX_URL).unwrap();
        assert_eq!(
            entities,
            vec![
                Entity::new("501", "Abc"),
                Entity::new("502", "Def"),
                Entity::new("503", "Ghi"),
            ]
        );
    }

    /// An index table with the usual header row around `rows`.
    fn index_table(rows: &str) -> String {
        format!(
            r#"<table>
            <tr><th rowspan="2" id="t1sa1">Obec</th></tr>
            <tr><th id="t1sb1">číslo</th><th id="t1sb2">název</th></tr>
            {rows}
        </table>"#
        )
    }

    #[test]
    fn test_empty_index_table_is_not_an_error() {
        let entities = parse_directory(INDEX_EMPTY, INDEX_URL).unwrap();
        assert!(entities.is_empty());
    }

    #[test]
    fn test_error_page_is_schema_mismatch() {
        let html = "<html><body><h1>Chyba</h1><p>Stránka nenalezena</p></body></html>";
        let err = parse_directory(html, INDEX_URL).unwrap_err();
        match err {
            ScrapeError::DirectorySchemaMismatch { url, reason } => {
                assert_eq!(url, INDEX_URL);
                assert!(reason.contains("t1sb1"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_rows_without_header_are_rejected() {
        let html = r#"<table>
            <tr><td class="cislo">501</td><td class="overflow_name">Abc</td></tr>
        </table>"#;
        let err = parse_directory(html, INDEX_URL).unwrap_err();
        assert!(matches!(err, ScrapeError::DirectorySchemaMismatch { .. }));
    }

    #[test]
    fn test_count_mismatch() {
        let html = index_table(
            r#"<tr><td class="cislo">501</td><td class="overflow_name">Abc</td></tr>
            <tr><td class="cislo">502</td></tr>"#,
        );
        let err = parse_directory(&html, INDEX_URL).unwrap_err();
        assert!(err.to_string().contains("found 2 municipality codes but 1 names"));
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let html = index_table(
            r#"<tr><td class="cislo">501</td><td class="overflow_name">Abc</td></tr>
            <tr><td class="cislo">501</td><td class="overflow_name">Abc II</td></tr>"#,
        );
        let err = parse_directory(&html, INDEX_URL).unwrap_err();
        assert!(err.to_string().contains("duplicate municipality codes: 501"));
    }

    #[test]
    fn test_empty_id_rejected() {
        let html = index_table(r#"<tr><td class="cislo"> </td><td class="overflow_name">Abc</td></tr>"#);
        let err = parse_directory(&html, INDEX_URL).unwrap_err();
        assert!(err.to_string().contains("municipality code #1 is empty"));
    }

    #[tokio::test]
    async fn test_resolve_unavailable() {
        let fetcher = StaticPages(HashMap::new());
        let url = Url::parse(INDEX_URL).unwrap();
        let err = resolve_directory(&fetcher, &url).await.unwrap_err();
        match err {
            ScrapeError::DirectoryUnavailable { reason, .. } => assert!(reason.contains("404")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_resolve_fetches_and_parses() {
        let url = Url::parse(INDEX_URL).unwrap();
        let fetcher = StaticPages(HashMap::from([(url.to_string(), INDEX.to_string())]));
        let entities = resolve_directory(&fetcher, &url).await.unwrap();
        assert_eq!(entities.len(), 3);
        assert_eq!(entities[2].name, "Ghi");
    }
}
