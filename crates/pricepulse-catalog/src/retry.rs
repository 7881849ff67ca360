//! Bounded retry with exponential back-off and jitter for catalog requests.
//!
//! Only transient failures are retried: connect errors, timeouts and 5xx
//! responses. A 404, any other 4xx, or a payload that does not decode is
//! returned on the first attempt.

use std::future::Future;
use std::time::Duration;

use crate::error::CatalogError;

/// Upper bound for a single back-off sleep.
const MAX_DELAY_MS: u64 = 10_000;

/// Returns `true` for errors that are worth retrying after a back-off delay.
pub(crate) fn is_retriable(err: &CatalogError) -> bool {
    match err {
        CatalogError::Http(e) => e.is_timeout() || e.is_connect(),
        CatalogError::UnexpectedStatus { status, .. } => *status >= 500,
        CatalogError::NotFound { .. }
        | CatalogError::Deserialize { .. }
        | CatalogError::InvalidBaseUrl { .. } => false,
    }
}

/// How a [`crate::CatalogClient`] retries a transient failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct RetryPolicy {
    /// Retries after the first attempt; `2` means at most three requests.
    pub max_retries: u32,
    pub backoff_base_ms: u64,
}

impl RetryPolicy {
    /// Nominal sleep before retry number `retry` (1-based): the base doubled
    /// per earlier retry, capped at [`MAX_DELAY_MS`].
    fn nominal_delay_ms(self, retry: u32) -> u64 {
        let doublings = retry.saturating_sub(1).min(10);
        self.backoff_base_ms
            .saturating_mul(1u64 << doublings)
            .min(MAX_DELAY_MS)
    }

    /// Nominal delay scaled by a factor in `[0.75, 1.25)`.
    fn jittered_delay(self, retry: u32) -> Duration {
        #[allow(
            clippy::cast_possible_truncation,
            clippy::cast_sign_loss,
            clippy::cast_precision_loss
        )]
        let ms = (self.nominal_delay_ms(retry) as f64 * rand::random_range(0.75..1.25)) as u64;
        Duration::from_millis(ms)
    }

    /// Issues one catalog request via `request`, repeating it while it
    /// fails transiently and retries remain. `endpoint` and `url` only label
    /// the log lines.
    pub(crate) async fn run<T, F, Fut>(
        self,
        endpoint: &str,
        url: &str,
        mut request: F,
    ) -> Result<T, CatalogError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, CatalogError>>,
    {
        let mut retry = 0u32;
        loop {
            let err = match request().await {
                Ok(value) => return Ok(value),
                Err(err) => err,
            };
            if retry == self.max_retries || !is_retriable(&err) {
                return Err(err);
            }
            retry += 1;
            let delay = self.jittered_delay(retry);
            tracing::warn!(
                endpoint,
                url,
                retry,
                delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                error = %err,
                "catalog request failed transiently; retrying"
            );
            tokio::time::sleep(delay).await;
        }
    }
}
