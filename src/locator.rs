//! Typed parsing of the index-page locator.
//!
//! A district index page on volby.cz looks like
//! `https://www.volby.cz/pls/ps2017nss/ps32?xjazyk=CZ&xkraj=12&xnumnuts=7103`.
//! The region (`xkraj`) and sub-division (`xnumnuts`) codes it carries are
//! needed again to build every municipality's detail-page URL, so they are
//! lifted into a [`Locator`] once, up front, before any network activity.

use crate::error::{Result, ScrapeError};
use url::Url;

/// Query parameter carrying the region code.
pub const REGION_PARAM: &str = "xkraj";
/// Query parameter carrying the sub-division code.
pub const SUBDIVISION_PARAM: &str = "xnumnuts";
/// Query parameter carrying the page language.
pub const LANGUAGE_PARAM: &str = "xjazyk";
/// Page name of a municipality's detail page, relative to the index page.
pub const DETAIL_PAGE: &str = "ps311";

const DEFAULT_LANGUAGE: &str = "CZ";

/// A validated index-page URL and the codes embedded in it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Locator {
    index_url: Url,
    region_code: String,
    subdivision_code: String,
    language: String,
}

impl Locator {
    /// Parse and validate an index-page locator.
    ///
    /// # Errors
    ///
    /// Returns [`ScrapeError::Configuration`] if the string is not an
    /// `http`/`https` URL, or if `xkraj` / `xnumnuts` are missing, empty or
    /// not numeric.
    pub fn parse(raw: &str) -> Result<Self> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(ScrapeError::config("index URL cannot be empty"));
        }

        let index_url = Url::parse(raw)
            .map_err(|e| ScrapeError::config(format!("invalid index URL `{}`: {}", raw, e)))?;
        match index_url.scheme() {
            "http" | "https" => {}
            scheme => {
                return Err(ScrapeError::config(format!(
                    "unsupported URL scheme `{}` in `{}`",
                    scheme, raw
                )));
            }
        }

        let region_code = numeric_param(&index_url, REGION_PARAM)?;
        let subdivision_code = numeric_param(&index_url, SUBDIVISION_PARAM)?;
        let language = query_param(&index_url, LANGUAGE_PARAM)
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_LANGUAGE.to_string());

        Ok(Self {
            index_url,
            region_code,
            subdivision_code,
            language,
        })
    }

    pub fn index_url(&self) -> &Url {
        &self.index_url
    }

    pub fn region_code(&self) -> &str {
        &self.region_code
    }

    pub fn subdivision_code(&self) -> &str {
        &self.subdivision_code
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    /// URL of one municipality's detail page.
    ///
    /// The page is resolved next to the index page, so the host and the
    /// election path (`/pls/ps2017nss/`) follow whatever the index URL used.
    pub fn detail_url(&self, entity_id: &str) -> Result<Url> {
        let mut url = self.index_url.join(DETAIL_PAGE).map_err(|e| {
            ScrapeError::config(format!(
                "cannot resolve detail page next to {}: {}",
                self.index_url, e
            ))
        })?;
        url.query_pairs_mut()
            .clear()
            .append_pair(LANGUAGE_PARAM, &self.language)
            .append_pair(REGION_PARAM, &self.region_code)
            .append_pair("xobec", entity_id)
            .append_pair("xvyber", &self.subdivision_code);
        Ok(url)
    }
}

fn query_param(url: &Url, name: &str) -> Option<String> {
    url.query_pairs()
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.trim().to_string())
}

fn numeric_param(url: &Url, name: &str) -> Result<String> {
    let value = query_param(url, name).ok_or_else(|| {
        ScrapeError::config(format!(
            "index URL is missing the `{}` query parameter",
            name
        ))
    })?;
    if value.is_empty() || !value.chars().all(|c| c.is_ascii_digit()) {
        return Err(ScrapeError::config(format!(
            "query parameter `{}` must be numeric, got `{}`",
            name, value
        )));
    }
    Ok(value)
}
