//! Error taxonomy for the scraping pipeline.
//!
//! Failures fall into four families, and callers treat them differently:
//!
//! - **Configuration**: the run cannot start (bad locator, bad option,
//!   unwritable output). Raised before any network activity.
//! - **Retrieval**: a page could not be fetched ([`ScrapeError::PageUnavailable`],
//!   [`ScrapeError::DirectoryUnavailable`]).
//! - **Markup**: a page was fetched but did not look as expected
//!   ([`ScrapeError::RecordFieldMissing`], [`ScrapeError::DirectorySchemaMismatch`]).
//!   Usually means the upstream site changed its templates.
//! - **Consistency**: the assembled data violates the row/column alignment
//!   invariant. This is a logic defect and is never recovered from.

use thiserror::Error;

/// Every error the crate can produce.
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("configuration error: {message}")]
    Configuration { message: String },

    #[error("index page {url} is unavailable: {reason}")]
    DirectoryUnavailable { url: String, reason: String },

    #[error("index page {url} does not match the expected layout: {reason}")]
    DirectorySchemaMismatch { url: String, reason: String },

    #[error("page {url} is unavailable: {reason}")]
    PageUnavailable { url: String, reason: String },

    #[error("entity {entity_id}: field `{field}` is missing from the detail page")]
    RecordFieldMissing { entity_id: String, field: String },

    #[error("consistency failure: {0}")]
    ConsistencyFailure(String),

    #[error("failed to write {path}: {reason}")]
    Write { path: String, reason: String },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ScrapeError {
    /// Shorthand for a [`ScrapeError::Configuration`].
    pub fn config(message: impl Into<String>) -> Self {
        ScrapeError::Configuration {
            message: message.into(),
        }
    }

    /// Whether the failure concerns a single entity and may be isolated
    /// instead of aborting the whole run.
    pub fn is_entity_scoped(&self) -> bool {
        matches!(
            self,
            ScrapeError::PageUnavailable { .. } | ScrapeError::RecordFieldMissing { .. }
        )
    }

    /// Process exit code for this failure.
    ///
    /// | Family | Code |
    /// |--------|------|
    /// | configuration | 2 |
    /// | consistency | 70 |
    /// | everything else | 1 |
    pub fn exit_code(&self) -> u8 {
        match self {
            ScrapeError::Configuration { .. } => 2,
            ScrapeError::ConsistencyFailure(_) => 70,
            _ => 1,
        }
    }
}

pub type Result<T> = std::result::Result<T, ScrapeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_scoped_errors() {
        let page = ScrapeError::PageUnavailable {
            url: "http://x".into(),
            reason: "timeout".into(),
        };
        let field = ScrapeError::RecordFieldMissing {
            entity_id: "501".into(),
            field: "voters".into(),
        };
        assert!(page.is_entity_scoped());
        assert!(field.is_entity_scoped());
        assert!(!ScrapeError::ConsistencyFailure("x".into()).is_entity_scoped());
        assert!(!ScrapeError::config("bad").is_entity_scoped());
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(ScrapeError::config("bad url").exit_code(), 2);
        assert_eq!(ScrapeError::ConsistencyFailure("len".into()).exit_code(), 70);
        let dir = ScrapeError::DirectoryUnavailable {
            url: "http://x".into(),
            reason: "404".into(),
        };
        assert_eq!(dir.exit_code(), 1);
    }

    #[test]
    fn test_display_mentions_field() {
        let e = ScrapeError::RecordFieldMissing {
            entity_id: "502".into(),
            field: "valid votes".into(),
        };
        assert_eq!(
            e.to_string(),
            "entity 502: field `valid votes` is missing from the detail page"
        );
    }
}
