//! End-to-end scraping run: index page → detail pages → result table.
//!
//! Detail pages are fetched concurrently (bounded by
//! [`PipelineOptions::concurrency`]) but consumed strictly in municipality
//! order, so the party columns can be folded without a lock and every vote
//! lands in the slot of the municipality it belongs to.

use crate::aggregate::PartyVoteTable;
use crate::assemble::assemble;
use crate::error::{Result, ScrapeError};
use crate::fetcher::PageFetcher;
use crate::locator::Locator;
use crate::models::{EntityPage, ResultTable, TurnoutRecord};
use crate::scrapers::{detail::fetch_entity_page, directory::resolve_directory};
use futures::stream::{self, StreamExt};
use std::collections::HashMap;
use std::pin::pin;
use tracing::{debug, error, info, instrument, warn};

/// Knobs that shape a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineOptions {
    /// Detail pages in flight at once (at least 1).
    pub concurrency: usize,
    /// Record a failed municipality as an empty row and carry on, instead of
    /// aborting the run.
    pub keep_going: bool,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            concurrency: 8,
            keep_going: false,
        }
    }
}

/// Everything a run needs, threaded through each stage.
#[derive(Debug)]
pub struct ScrapeContext<F> {
    pub locator: Locator,
    pub fetcher: F,
    pub options: PipelineOptions,
}

impl<F: PageFetcher> ScrapeContext<F> {
    pub fn new(locator: Locator, fetcher: F, options: PipelineOptions) -> Self {
        Self {
            locator,
            fetcher,
            options,
        }
    }
}

/// What happened during a run, besides the table itself.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub entities: usize,
    pub parties: usize,
    /// Codes of municipalities whose page could not be scraped.
    pub failed: Vec<String>,
}

/// Result of [`run_pipeline`].
#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub table: ResultTable,
    pub summary: RunSummary,
}

/// Scrape every municipality listed on the index page and assemble the table.
///
/// # Arguments
///
/// * `ctx` - Locator, page fetcher and run options
///
/// # Returns
///
/// The assembled table, one row per municipality in index order, plus a
/// [`RunSummary`] naming any municipalities written as empty rows.
///
/// # Errors
///
/// - index page failures ([`ScrapeError::DirectoryUnavailable`],
///   [`ScrapeError::DirectorySchemaMismatch`]) always abort
/// - per-municipality failures abort unless
///   [`PipelineOptions::keep_going`] is set
/// - [`ScrapeError::ConsistencyFailure`] always aborts
#[instrument(
    level = "info",
    skip_all,
    fields(region = ctx.locator.region_code(), subdivision = ctx.locator.subdivision_code())
)]
pub async fn run_pipeline<F: PageFetcher>(ctx: &ScrapeContext<F>) -> Result<RunOutcome> {
    let entities = resolve_directory(&ctx.fetcher, ctx.locator.index_url()).await?;
    let concurrency = ctx.options.concurrency.max(1);
    info!(
        count = entities.len(),
        concurrency,
        keep_going = ctx.options.keep_going,
        "Fetching municipality detail pages"
    );

    let mut pages = pin!(
        stream::iter(entities.iter().enumerate())
            .map(|(index, entity)| async move {
                (index, fetch_entity_page(&ctx.fetcher, &ctx.locator, entity).await)
            })
            .buffered(concurrency)
    );

    let mut turnout: HashMap<String, TurnoutRecord> = HashMap::with_capacity(entities.len());
    let mut parties = PartyVoteTable::new();
    let mut failed = Vec::new();

    while let Some((index, result)) = pages.next().await {
        let entity = &entities[index];
        let page = match result {
            Ok(page) => page,
            Err(e) if ctx.options.keep_going && e.is_entity_scoped() => {
                warn!(
                    entity_id = %entity.id,
                    name = %entity.name,
                    error = %e,
                    "Municipality failed; writing an empty row"
                );
                failed.push(entity.id.clone());
                EntityPage {
                    turnout: TurnoutRecord::blank(&entity.id),
                    parties: Vec::new(),
                }
            }
            Err(e) => {
                error!(entity_id = %entity.id, name = %entity.name, error = %e, "Municipality failed");
                return Err(e);
            }
        };

        if index != parties.processed() {
            return Err(ScrapeError::ConsistencyFailure(format!(
                "municipality #{} arrived while #{} was expected",
                index,
                parties.processed()
            )));
        }
        parties.record_entity(&page.parties);
        turnout.insert(entity.id.clone(), page.turnout);
        debug!(
            index,
            entity_id = %entity.id,
            parties_known = parties.parties().len(),
            "Folded municipality"
        );
    }

    let table = assemble(&entities, &turnout, &parties)?;
    let summary = RunSummary {
        entities: entities.len(),
        parties: table.party_count(),
        failed,
    };
    info!(
        entities = summary.entities,
        parties = summary.parties,
        failed = summary.failed.len(),
        "Scrape complete"
    );
    Ok(RunOutcome { table, summary })
}
