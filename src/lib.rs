//! # election_scraper
//!
//! Collects per-municipality election results from the Czech election portal
//! (volby.cz) and assembles them into a single table whose party columns are
//! discovered while scraping.
//!
//! ## Architecture
//!
//! 1. **Indexing**: read the district index page and list its municipalities
//!    ([`scrapers::directory`])
//! 2. **Fetching**: download each municipality's detail page, concurrently but
//!    consumed in order ([`scrapers::detail`], [`pipeline`])
//! 3. **Aggregation**: fold every page's `(party, votes)` pairs into
//!    index-aligned party columns ([`aggregate`])
//! 4. **Assembly & output**: merge into one table and write CSV or JSON
//!    ([`assemble`], [`outputs`])

pub mod aggregate;
pub mod assemble;
pub mod cli;
pub mod error;
pub mod extract;
pub mod fetcher;
pub mod locator;
pub mod models;
pub mod outputs;
pub mod pipeline;
pub mod scrapers;
pub mod utils;

pub use error::{Result, ScrapeError};
pub use locator::Locator;
pub use models::{Entity, ResultRow, ResultTable};
pub use pipeline::{PipelineOptions, RunOutcome, RunSummary, ScrapeContext, run_pipeline};
