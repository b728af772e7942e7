//! JSON output.
//!
//! The document mirrors [`ResultTable`]:
//!
//! ```text
//! {
//!   "headers": ["Obec", "ID obce", ..., "A", "B"],
//!   "rows": [
//!     { "name": "Abc", "id": "501", "voters": "1205", ..., "votes": ["120", "80"] }
//!   ]
//! }
//! ```

use super::TableSink;
use crate::error::{Result, ScrapeError};
use crate::models::ResultTable;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{info, instrument};

/// Writes a [`ResultTable`] as pretty-printed JSON.
#[derive(Debug, Clone)]
pub struct JsonSink {
    path: PathBuf,
}

impl JsonSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl TableSink for JsonSink {
    #[instrument(level = "info", skip_all, fields(path = %self.path.display()))]
    fn write_table(&self, table: &ResultTable) -> Result<()> {
        let json = serde_json::to_string_pretty(table)?;
        let write = |path: &Path| -> std::io::Result<()> {
            let mut file = std::fs::File::create(path)?;
            file.write_all(json.as_bytes())?;
            file.write_all(b"\n")
        };
        write(&self.path).map_err(|e| ScrapeError::Write {
            path: self.path.display().to_string(),
            reason: e.to_string(),
        })?;
        info!(rows = table.rows.len(), bytes = json.len(), "Wrote JSON");
        Ok(())
    }

    fn destination(&self) -> &Path {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ResultRow;

    #[test]
    fn test_json_round_trips_table() {
        let table = ResultTable {
            headers: vec!["Obec".into(), "A".into()],
            rows: vec![ResultRow {
                name: "Abc".into(),
                id: "501".into(),
                voters: "1205".into(),
                envelopes: "745".into(),
                valid_votes: "739".into(),
                votes: vec!["120".into()],
            }],
        };
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vysledky.json");
        JsonSink::new(&path).write_table(&table).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let parsed: ResultTable = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed, table);
    }
}
