//! Small helpers for logging and file system checks.

use crate::error::{Result, ScrapeError};
use std::fs;
use std::path::Path;
use tracing::{info, instrument, warn};

/// Truncate a string for logging purposes.
///
/// Long strings are cut to at most `max` bytes (on a character boundary)
/// with an ellipsis and the number of dropped bytes appended.
///
/// # Examples
///
/// ```
/// use election_scraper::utils::truncate_for_log;
/// assert_eq!(truncate_for_log("short", 100), "short");
/// assert_eq!(truncate_for_log(&"a".repeat(500), 10), "aaaaaaaaaa…(+490 bytes)");
/// ```
pub fn truncate_for_log(s: &str, max: usize) -> String {
    if s.len() <= max {
        return s.to_string();
    }
    let mut cut = max;
    while !s.is_char_boundary(cut) {
        cut -= 1;
    }
    format!("{}…(+{} bytes)", &s[..cut], s.len() - cut)
}

/// Ensure the directory that will hold `output` exists and is writable.
///
/// Creates the directory if needed, then creates and removes a probe file.
/// Runs before any page is fetched so a bad output path fails fast.
///
/// # Errors
///
/// [`ScrapeError::Configuration`] if the directory cannot be created or
/// written to, or if `output` names an existing directory.
#[instrument(level = "info", skip_all, fields(path = %output.display()))]
pub fn ensure_writable_parent(output: &Path) -> Result<()> {
    if output.is_dir() {
        return Err(ScrapeError::config(format!(
            "output path {} is a directory",
            output.display()
        )));
    }

    let dir = match output.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir).map_err(|e| {
        ScrapeError::config(format!("cannot create output directory {}: {}", dir.display(), e))
    })?;

    let probe = dir.join(".election_scraper_probe");
    let file = fs::File::create(&probe).map_err(|e| {
        ScrapeError::config(format!("output directory {} is not writable: {}", dir.display(), e))
    })?;
    drop(file);
    if let Err(e) = fs::remove_file(&probe) {
        warn!(probe = %probe.display(), error = %e, "Could not remove probe file");
    }
    info!("Output directory is writable");
    Ok(())
}
