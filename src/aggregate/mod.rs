//! League aggregation engine.
//!
//! Reshapes upstream data into dashboard views:
//! - Classic-league standings with a per-gameweek score column
//! - Head-to-head division top scorers and full H2H tables
//! - Tie analysis between two entries for one gameweek
//! - Current gameweek detection, price-change heuristics, manager and
//!   player summaries
//!
//! Everything here is computed fresh per call. Per-entry lookups fan out
//! with bounded concurrency; results always come back in standings order.
//! No work is spawned onto the runtime, so dropping a call's future
//! abandons its outstanding requests.

mod gameweek;
mod h2h;
mod history;
mod pagination;
mod player;
mod price;
mod standings;
mod tie;

pub use gameweek::*;
pub use h2h::*;
pub use history::*;
pub use pagination::*;
pub use player::*;
pub use price::*;
pub use standings::*;
pub use tie::*;

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use futures::stream::{self, StreamExt};
use tracing::debug;

use crate::config::{Division, RetryPolicy, UpstreamConfig};
use crate::fetch::FetchError;
use crate::fpl::FplApi;

/// Upper bound on any single wait between retries.
pub const MAX_RETRY_DELAY: Duration = Duration::from_secs(10);

/// Backoff before retry number `attempt`, stretched to honour a 429's
/// `Retry-After` and capped at [`MAX_RETRY_DELAY`].
fn retry_delay(policy: &RetryPolicy, attempt: u32, err: &FetchError) -> Duration {
    let backoff = policy.delay_for(attempt);
    err.retry_after()
        .map_or(backoff, |wait| backoff.max(wait))
        .min(MAX_RETRY_DELAY)
}

/// Entry point for all aggregations over one upstream.
#[derive(Clone)]
pub struct Aggregator {
    api: Arc<dyn FplApi>,
    divisions: Arc<[Division]>,
    max_concurrent: usize,
    retry: RetryPolicy,
}

impl Aggregator {
    pub fn new(api: Arc<dyn FplApi>, divisions: Arc<[Division]>) -> Self {
        let upstream = UpstreamConfig::default();
        Self {
            api,
            divisions,
            max_concurrent: upstream.max_concurrent_requests,
            retry: upstream.retry,
        }
    }

    /// Apply fan-out width and retry policy from configuration.
    pub fn with_upstream_config(self, upstream: &UpstreamConfig) -> Self {
        self.with_concurrency(upstream.max_concurrent_requests)
            .with_retry(upstream.retry.clone())
    }

    pub fn with_concurrency(mut self, max_concurrent: usize) -> Self {
        self.max_concurrent = max_concurrent.max(1);
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn api(&self) -> &Arc<dyn FplApi> {
        &self.api
    }

    /// Run `op` until it succeeds, fails permanently, or retries run out.
    /// Only transient failures (transport, 429, 5xx) are retried.
    async fn retrying<T, F, Fut>(&self, what: &str, mut op: F) -> Result<T, FetchError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, FetchError>>,
    {
        let mut attempt = 0;
        loop {
            match op().await {
                Ok(value) => return Ok(value),
                Err(e) if e.is_transient() && attempt < self.retry.max_retries => {
                    attempt += 1;
                    let delay = retry_delay(&self.retry, attempt, &e);
                    debug!(
                        "{}: attempt {} failed ({}), retrying in {:?}",
                        what, attempt, e, delay
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// Map `items` through `f` with at most `max_concurrent` in flight,
    /// returning results in input order.
    async fn fan_out<I, T, F, Fut>(&self, items: I, f: F) -> Vec<T>
    where
        I: IntoIterator,
        F: FnMut(I::Item) -> Fut,
        Fut: Future<Output = T>,
    {
        stream::iter(items)
            .map(f)
            .buffered(self.max_concurrent)
            .collect()
            .await
    }
}
