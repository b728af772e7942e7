//! # election_scraper
//!
//! Scrape every municipality of one district from volby.cz into a CSV file.
//!
//! ## Usage
//!
//! ```sh
//! election_scraper 'https://www.volby.cz/pls/ps2017nss/ps32?xjazyk=CZ&xkraj=12&xnumnuts=7103' vysledky.csv
//! ```
//!
//! Log verbosity follows `RUST_LOG` (default `info`).

use clap::Parser;
use election_scraper::cli::Cli;
use election_scraper::fetcher::{HttpFetcher, RetryFetcher};
use election_scraper::outputs::sink_for;
use election_scraper::utils::ensure_writable_parent;
use election_scraper::{Locator, Result, RunSummary, ScrapeContext, ScrapeError, run_pipeline};
use std::process::ExitCode;
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

#[tokio::main]
async fn main() -> ExitCode {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .with_writer(std::io::stderr)
        .init();

    let args = Cli::parse();
    debug!(?args, "Parsed CLI arguments");

    let start_time = Instant::now();
    match run(&args).await {
        Ok(summary) => {
            let elapsed = start_time.elapsed();
            if !summary.failed.is_empty() {
                warn!(
                    failed = summary.failed.len(),
                    ids = %summary.failed.join(","),
                    "Some municipalities were written as empty rows"
                );
            }
            info!(
                ?elapsed,
                entities = summary.entities,
                parties = summary.parties,
                path = %args.output.display(),
                "Execution complete"
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(error = %e, exit_code = e.exit_code(), "Execution failed");
            eprintln!("error: {}", e);
            ExitCode::from(e.exit_code())
        }
    }
}

async fn run(args: &Cli) -> Result<RunSummary> {
    // Everything that can be checked without the network is checked first.
    let locator = Locator::parse(&args.index_url)?;
    let options = args.options()?;
    let timeout = args.timeout()?;
    ensure_writable_parent(&args.output)?;
    info!(
        index_url = %locator.index_url(),
        region = locator.region_code(),
        subdivision = locator.subdivision_code(),
        "Configuration accepted"
    );

    let fetcher = RetryFetcher::new(
        HttpFetcher::new(timeout)?,
        args.retries,
        Duration::from_millis(500),
    );
    let ctx = ScrapeContext::new(locator, fetcher, options);
    let outcome = run_pipeline(&ctx).await?;

    let sink = sink_for(args.format, args.output.clone());
    sink.write_table(&outcome.table).map_err(|e| match e {
        ScrapeError::Write { .. } => e,
        other => ScrapeError::Write {
            path: sink.destination().display().to_string(),
            reason: other.to_string(),
        },
    })?;
    Ok(outcome.summary)
}
