//! Command-line interface definitions.
//!
//! Two positional arguments drive a run: the district index page and the
//! output file. Everything else tunes how pages are fetched.

use crate::error::{Result, ScrapeError};
use crate::outputs::OutputFormat;
use crate::pipeline::PipelineOptions;
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

/// Command-line arguments.
///
/// # Examples
///
/// ```sh
/// # Prostějov district, 2017 Chamber of Deputies election
/// election_scraper 'https://www.volby.cz/pls/ps2017nss/ps32?xjazyk=CZ&xkraj=12&xnumnuts=7103' vysledky_prostejov.csv
///
/// # Survive individual page failures, retry twice
/// election_scraper --keep-going --retries 2 '<URL>' out.csv
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// District index page, e.g. https://www.volby.cz/pls/ps2017nss/ps32?xjazyk=CZ&xkraj=12&xnumnuts=7103
    pub index_url: String,

    /// Output file
    pub output: PathBuf,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Csv)]
    pub format: OutputFormat,

    /// Detail pages fetched concurrently
    #[arg(short, long, default_value_t = 8)]
    pub concurrency: usize,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = 30)]
    pub timeout_secs: u64,

    /// Retries per page after the first failed attempt
    #[arg(long, default_value_t = 0)]
    pub retries: usize,

    /// Write an empty row for a municipality whose page fails instead of aborting
    #[arg(long)]
    pub keep_going: bool,
}

impl Cli {
    /// Validated pipeline options.
    pub fn options(&self) -> Result<PipelineOptions> {
        if self.concurrency == 0 {
            return Err(ScrapeError::config("--concurrency must be at least 1"));
        }
        Ok(PipelineOptions {
            concurrency: self.concurrency,
            keep_going: self.keep_going,
        })
    }

    /// Validated request timeout.
    pub fn timeout(&self) -> Result<Duration> {
        if self.timeout_secs == 0 {
            return Err(ScrapeError::config("--timeout-secs must be at least 1"));
        }
        Ok(Duration::from_secs(self.timeout_secs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const URL: &str = "https://www.volby.cz/pls/ps2017nss/ps32?xjazyk=CZ&xkraj=12&xnumnuts=7103";

    #[test]
    fn test_cli_positionals_and_defaults() {
        let cli = Cli::parse_from(["election_scraper", URL, "out.csv"]);
        assert_eq!(cli.index_url, URL);
        assert_eq!(cli.output, PathBuf::from("out.csv"));
        assert_eq!(cli.format, OutputFormat::Csv);
        assert_eq!(cli.retries, 0);
        assert!(!cli.keep_going);
        assert_eq!(
            cli.options().unwrap(),
            PipelineOptions {
                concurrency: 8,
                keep_going: false
            }
        );
        assert_eq!(cli.timeout().unwrap(), Duration::from_secs(30));
    }

    #[test]
    fn test_cli_flags() {
        let cli = Cli::parse_from([
            "election_scraper",
            "-c",
            "2",
            "--format",
            "json",
            "--retries",
            "3",
            "--timeout-secs",
            "5",
            "--keep-going",
            URL,
            "out.json",
        ]);
        assert_eq!(cli.format, OutputFormat::Json);
        assert_eq!(cli.retries, 3);
        assert!(cli.options().unwrap().keep_going);
        assert_eq!(cli.options().unwrap().concurrency, 2);
        assert_eq!(cli.timeout().unwrap(), Duration::from_secs(5));
    }

    #[test]
    fn test_cli_requires_both_positionals() {
        assert!(Cli::try_parse_from(["election_scraper", URL]).is_err());
        assert!(Cli::try_parse_from(["election_scraper"]).is_err());
    }

    #[test]
    fn test_zero_concurrency_is_configuration_error() {
        let cli = Cli::parse_from(["election_scraper", "-c", "0", URL, "out.csv"]);
        assert!(matches!(
            cli.options(),
            Err(ScrapeError::Configuration { .. })
        ));
    }
}
