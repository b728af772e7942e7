//! Output sinks for the assembled [`ResultTable`].
//!
//! # Submodules
//!
//! - [`csv`]: header row plus one comma-delimited row per municipality
//! - [`json`]: the same table as a JSON document
//!
//! # Output Structure
//!
//! ```text
//! Obec,ID obce,Voliči,Vydané obálky,Platné hlasy,<party 1>,<party 2>,...
//! Abc,501,1205,745,739,120,80
//! ```

pub mod csv;
pub mod json;

use crate::error::Result;
use crate::models::ResultTable;
use std::path::{Path, PathBuf};

/// Something that can persist a [`ResultTable`].
pub trait TableSink {
    /// Serialize `table`. Overwrites any previous output.
    fn write_table(&self, table: &ResultTable) -> Result<()>;

    /// Where the table goes, for logging.
    fn destination(&self) -> &Path;
}

/// Serialization format of the output file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Csv,
    Json,
}

/// Build the sink for `format` writing to `path`.
pub fn sink_for(format: OutputFormat, path: PathBuf) -> Box<dyn TableSink> {
    match format {
        OutputFormat::Csv => Box::new(csv::CsvSink::new(path)),
        OutputFormat::Json => Box::new(json::JsonSink::new(path)),
    }
}
