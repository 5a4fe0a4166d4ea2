//! Client-side server-state cache
//!
//! Keyed, deduplicating, revalidating cache for API responses with
//! stale-time based refetching, garbage collection of unobserved entries,
//! visibility-aware polling and mutation-driven invalidation.
//!
//! [`QueryClient`] owns the cache and is shared by cheap clones.
//! [`QueryObserver`] is a live, typed view of one key. [`Mutation`] runs a
//! write and keeps the cache consistent afterwards.

pub mod client;
pub mod entry;
pub mod key;
pub mod mutation;
pub mod observer;
pub mod visibility;

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use futures::FutureExt;
use futures::future::BoxFuture;
use serde::Serialize;
use serde_json::Value;

use crate::error::{Error, Result};

pub use client::{FetchMode, QueryClient};
pub use entry::{FetchStatus, QueryState, QueryStatus};
pub use key::{KeyPart, QueryKey};
pub use mutation::{Mutation, MutationKind};
pub use observer::{QueryObserver, QueryResult};
pub use visibility::{Visibility, VisibilityTracker, refetch_interval};

/// Error stored in the cache; shared between every observer of a key.
pub type QueryError = Arc<Error>;

/// Type-erased fetch function producing the JSON form of a response
pub type QueryFn = Arc<dyn Fn() -> BoxFuture<'static, Result<Value>> + Send + Sync>;

/// Upper bound for the exponential retry delay
pub const MAX_RETRY_DELAY: Duration = Duration::from_secs(30);

/// Wrap a typed async fetch into a [`QueryFn`].
pub fn query_fn<T, F, Fut>(fetch: F) -> QueryFn
where
    T: Serialize,
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<T>> + Send + 'static,
{
    Arc::new(move || {
        let fut = fetch();
        async move {
            let data = fut.await?;
            Ok(serde_json::to_value(data)?)
        }
        .boxed()
    })
}

/// When a newly mounted observer refetches data already in the cache
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RefetchOnMount {
    /// Always fetch, even if cached data is fresh
    Always,
    /// Fetch only if cached data is stale
    #[default]
    IfStale,
    /// Use cached data as-is; fetch only if there is none
    Never,
}

/// Per-query caching and refetch policy
#[derive(Debug, Clone, PartialEq)]
pub struct QueryOptions {
    /// How long fetched data counts as fresh
    pub stale_time: Duration,
    /// How long an unobserved entry is kept before eviction
    pub gc_time: Duration,
    pub refetch_on_mount: RefetchOnMount,
    /// Refetch stale data when the view becomes visible again
    pub refetch_on_window_focus: bool,
    /// Poll at this interval while visible and stale
    pub refetch_interval: Option<Duration>,
    /// Disabled queries never fetch on their own
    pub enabled: bool,
    /// Retries after the first failed attempt
    pub retry: u32,
    /// Base delay, doubled on each retry
    pub retry_delay: Duration,
    /// Resolve a 404 as an empty result instead of an error
    pub empty_on_not_found: bool,
}

impl Default for QueryOptions {
    fn default() -> Self {
        Self {
            stale_time: Duration::ZERO,
            gc_time: Duration::from_secs(5 * 60),
            refetch_on_mount: RefetchOnMount::IfStale,
            refetch_on_window_focus: true,
            refetch_interval: None,
            enabled: true,
            retry: 3,
            retry_delay: Duration::from_secs(1),
            empty_on_not_found: false,
        }
    }
}

impl QueryOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stale_time(mut self, stale_time: Duration) -> Self {
        self.stale_time = stale_time;
        self
    }

    pub fn gc_time(mut self, gc_time: Duration) -> Self {
        self.gc_time = gc_time;
        self
    }

    pub fn refetch_on_mount(mut self, mode: RefetchOnMount) -> Self {
        self.refetch_on_mount = mode;
        self
    }

    pub fn refetch_on_window_focus(mut self, enabled: bool) -> Self {
        self.refetch_on_window_focus = enabled;
        self
    }

    pub fn refetch_interval(mut self, interval: Duration) -> Self {
        self.refetch_interval = Some(interval);
        self
    }

    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn retry(mut self, retry: u32) -> Self {
        self.retry = retry;
        self
    }

    pub fn retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }

    pub fn empty_on_not_found(mut self) -> Self {
        self.empty_on_not_found = true;
        self
    }

    /// Delay before retry number `attempt` (zero-based).
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt);
        self.retry_delay
            .checked_mul(factor)
            .map_or(MAX_RETRY_DELAY, |d| d.min(MAX_RETRY_DELAY))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retry_delay_doubles_and_caps() {
        let options = QueryOptions::new().retry_delay(Duration::from_secs(1));

        assert_eq!(options.delay_for_attempt(0), Duration::from_secs(1));
        assert_eq!(options.delay_for_attempt(1), Duration::from_secs(2));
        assert_eq!(options.delay_for_attempt(3), Duration::from_secs(8));
        assert_eq!(options.delay_for_attempt(5), MAX_RETRY_DELAY);
        assert_eq!(options.delay_for_attempt(40), MAX_RETRY_DELAY);
    }

    #[tokio::test]
    async fn test_query_fn_serializes_response() {
        let fetch = query_fn(|| async { Ok(vec!["a".to_string(), "b".to_string()]) });
        let value = fetch().await.unwrap();
        assert_eq!(value, serde_json::json!(["a", "b"]));
    }
}
