//! Page retrieval with optional exponential backoff.
//!
//! # Architecture
//!
//! - [`PageFetcher`]: core trait, "give me the markup behind this URL"
//! - [`HttpFetcher`]: `reqwest`-backed implementation with a per-request timeout
//! - [`RetryFetcher`]: decorator that retries any [`PageFetcher`]
//!
//! Every failure surfaces as [`ScrapeError::PageUnavailable`], including
//! timeouts and non-success HTTP statuses.
//!
//! # Retry Strategy
//!
//! - Configurable number of retries (0 disables the decorator's effect)
//! - Exponential backoff starting at `base_delay`
//! - Maximum delay capped at 10 seconds
//! - Random jitter (0-250ms) added to spread out concurrent retries

use crate::error::{Result, ScrapeError};
use rand::{Rng, rng};
use std::fmt;
use std::time::{Duration, Instant};
use tokio::time::sleep;
use tracing::{debug, error, instrument, warn};
use url::Url;

/// Retrieve raw page markup.
pub trait PageFetcher {
    /// Fetch `url` and return its body as text.
    ///
    /// # Errors
    ///
    /// [`ScrapeError::PageUnavailable`] when the page cannot be retrieved.
    async fn fetch(&self, url: &Url) -> Result<String>;
}

impl<T: PageFetcher> PageFetcher for &T {
    async fn fetch(&self, url: &Url) -> Result<String> {
        (**self).fetch(url).await
    }
}

/// HTTP implementation of [`PageFetcher`].
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    /// Build a client whose every request times out after `timeout`.
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ScrapeError::config(format!("cannot build HTTP client: {}", e)))?;
        Ok(Self { client })
    }
}

impl PageFetcher for HttpFetcher {
    #[instrument(level = "debug", skip_all, fields(%url))]
    async fn fetch(&self, url: &Url) -> Result<String> {
        let t0 = Instant::now();
        let unavailable = |reason: String| ScrapeError::PageUnavailable {
            url: url.to_string(),
            reason,
        };

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| unavailable(describe(&e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(unavailable(format!("HTTP status {}", status)));
        }

        let body = response.text().await.map_err(|e| unavailable(describe(&e)))?;
        debug!(
            bytes = body.len(),
            elapsed_ms = t0.elapsed().as_millis() as u64,
            "Fetched page"
        );
        Ok(body)
    }
}

fn describe(e: &reqwest::Error) -> String {
    if e.is_timeout() {
        format!("request timed out ({})", e)
    } else {
        e.to_string()
    }
}

/// Wrapper that adds exponential backoff retry logic to any [`PageFetcher`].
///
/// The delay between retries follows:
/// ```text
/// delay = min(base_delay * 2^(attempt-1), max_delay) + random_jitter(0..250ms)
/// ```
pub struct RetryFetcher<T> {
    inner: T,
    max_retries: usize,
    base_delay: Duration,
    max_delay: Duration,
}

impl<T> RetryFetcher<T>
where
    T: PageFetcher,
{
    /// Wrap `inner`, retrying up to `max_retries` times after the first attempt.
    pub fn new(inner: T, max_retries: usize, base_delay: Duration) -> Self {
        Self {
            inner,
            max_retries,
            base_delay,
            max_delay: Duration::from_secs(10),
        }
    }

    fn backoff(&self, attempt: usize) -> Duration {
        let shift = (attempt.saturating_sub(1)).min(16) as u32;
        let delay = self.base_delay.saturating_mul(1 << shift).min(self.max_delay);
        let jitter_ms: u64 = rng().random_range(0..=250);
        delay + Duration::from_millis(jitter_ms)
    }
}

impl<T> fmt::Debug for RetryFetcher<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RetryFetcher")
            .field("max_retries", &self.max_retries)
            .field("base_delay", &self.base_delay)
            .field("max_delay", &self.max_delay)
            .finish()
    }
}

impl<T> PageFetcher for RetryFetcher<T>
where
    T: PageFetcher,
{
    async fn fetch(&self, url: &Url) -> Result<String> {
        let total_t0 = Instant::now();
        let mut attempt = 0usize;

        loop {
            match self.inner.fetch(url).await {
                Ok(body) => return Ok(body),
                Err(e) => {
                    attempt += 1;
                    if attempt > self.max_retries {
                        if self.max_retries > 0 {
                            error!(
                                %url,
                                attempt,
                                max = self.max_retries,
                                elapsed_ms_total = total_t0.elapsed().as_millis() as u64,
                                error = %e,
                                "fetch exhausted retries"
                            );
                        }
                        return Err(e);
                    }

                    let delay = self.backoff(attempt);
                    warn!(
                        %url,
                        attempt,
                        max = self.max_retries,
                        ?delay,
                        error = %e,
                        "fetch attempt failed; backing off"
                    );
                    sleep(delay).await;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    /// Fails `failures` times, then succeeds.
    struct Flaky {
        failures: usize,
        calls: Cell<usize>,
    }

    impl PageFetcher for Flaky {
        async fn fetch(&self, url: &Url) -> Result<String> {
            let n = self.calls.get();
            self.calls.set(n + 1);
            if n < self.failures {
                Err(ScrapeError::PageUnavailable {
                    url: url.to_string(),
                    reason: "connection reset".into(),
                })
            } else {
                Ok("<html></html>".into())
            }
        }
    }

    fn url() -> Url {
        Url::parse("http://localhost/ps311?xobec=501").unwrap()
    }

    #[tokio::test]
    async fn test_retry_recovers() {
        let inner = Flaky {
            failures: 2,
            calls: Cell::new(0),
        };
        let fetcher = RetryFetcher::new(&inner, 3, Duration::from_millis(1));
        let body = fetcher.fetch(&url()).await.unwrap();
        assert_eq!(body, "<html></html>");
        assert_eq!(inner.calls.get(), 3);
    }

    #[tokio::test]
    async fn test_retry_gives_up() {
        let inner = Flaky {
            failures: 10,
            calls: Cell::new(0),
        };
        let fetcher = RetryFetcher::new(&inner, 2, Duration::from_millis(1));
        let err = fetcher.fetch(&url()).await.unwrap_err();
        assert!(matches!(err, ScrapeError::PageUnavailable { .. }));
        assert_eq!(inner.calls.get(), 3);
    }

    #[tokio::test]
    async fn test_zero_retries_is_single_attempt() {
        let inner = Flaky {
            failures: 1,
            calls: Cell::new(0),
        };
        let fetcher = RetryFetcher::new(&inner, 0, Duration::from_millis(1));
        assert!(fetcher.fetch(&url()).await.is_err());
        assert_eq!(inner.calls.get(), 1);
    }

    #[test]
    fn test_backoff_is_capped() {
        let inner = Flaky {
            failures: 0,
            calls: Cell::new(0),
        };
        let fetcher = RetryFetcher::new(&inner, 40, Duration::from_secs(1));
        let late = fetcher.backoff(30);
        assert!(late <= Duration::from_millis(10_250));
        let first = fetcher.backoff(1);
        assert!(first >= Duration::from_secs(1) && first <= Duration::from_millis(1_250));
    }
}
