//! CSV output.

use super::TableSink;
use crate::error::{Result, ScrapeError};
use crate::models::ResultTable;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{info, instrument};

/// Writes a [`ResultTable`] as UTF-8 CSV.
#[derive(Debug, Clone)]
pub struct CsvSink {
    path: PathBuf,
}

impl CsvSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

/// Serialize `table` to any writer.
///
/// Every row is padded to the header width, so a consumer always sees a
/// rectangular table. Records end in `\n`.
pub fn write_csv<W: Write>(table: &ResultTable, writer: W) -> Result<()> {
    let mut csv = csv::WriterBuilder::new().flexible(false).from_writer(writer);
    csv.write_record(&table.headers)?;
    for row in &table.rows {
        let mut cells = row.cells();
        cells.resize(table.headers.len(), "");
        csv.write_record(&cells)?;
    }
    csv.flush()?;
    Ok(())
}

impl TableSink for CsvSink {
    #[instrument(level = "info", skip_all, fields(path = %self.path.display()))]
    fn write_table(&self, table: &ResultTable) -> Result<()> {
        let file = std::fs::File::create(&self.path).map_err(|e| ScrapeError::Write {
            path: self.path.display().to_string(),
            reason: e.to_string(),
        })?;
        write_csv(table, std::io::BufWriter::new(file))?;
        info!(
            rows = table.rows.len(),
            columns = table.headers.len(),
            "Wrote CSV"
        );
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

    fn table() -> ResultTable {
        ResultTable {
            headers: ["Obec", "ID obce", "Voliči", "Vydané obálky", "Platné hlasy", "A", "B, a spol."]
                .map(String::from)
                .to_vec(),
            rows: vec![
                ResultRow {
                    name: "Abc".into(),
                    id: "501".into(),
                    voters: "1205".into(),
                    envelopes: "745".into(),
                    valid_votes: "739".into(),
                    votes: vec!["120".into(), "80".into()],
                },
                ResultRow {
                    name: "Def".into(),
                    id: "502".into(),
                    voters: "412".into(),
                    envelopes: "260".into(),
                    valid_votes: "135".into(),
                    votes: vec!["".into(), "95".into()],
                },
            ],
        }
    }

    #[test]
    fn test_write_csv() {
        let mut buf = Vec::new();
        write_csv(&table(), &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines,
            vec![
                "Obec,ID obce,Voliči,Vydané obálky,Platné hlasy,A,\"B, a spol.\"",
                "Abc,501,1205,745,739,120,80",
                "Def,502,412,260,135,,95",
            ]
        );
    }

    #[test]
    fn test_records_end_in_line_feed() {
        let mut buf = Vec::new();
        write_csv(&table(), &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(!text.contains('\r'));
        assert!(text.ends_with("Def,502,412,260,135,,95\n"));
        assert_eq!(text.matches('\n').count(), 3);
    }

    #[test]
    fn test_short_rows_are_padded() {
        let mut t = table();
        t.rows[1].votes.truncate(0);
        let mut buf = Vec::new();
        write_csv(&t, &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(text.lines().nth(2), Some("Def,502,412,260,135,,"));
    }

    #[test]
    fn test_sink_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vysledky.csv");
        let sink = CsvSink::new(&path);
        sink.write_table(&table()).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("Obec,ID obce"));
        assert_eq!(sink.destination(), path.as_path());
    }

    #[test]
    fn test_sink_reports_unwritable_path() {
        let dir = tempfile::tempdir().unwrap();
        let sink = CsvSink::new(dir.path().join("missing").join("out.csv"));
        let err = sink.write_table(&table()).unwrap_err();
        assert!(matches!(err, ScrapeError::Write { .. }));
    }
}
