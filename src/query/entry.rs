//! Cache entry state

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use futures::future::{BoxFuture, Shared};
use serde_json::Value;
use tokio::task::AbortHandle;
use tokio::time::Instant;

use super::{QueryError, QueryFn, QueryOptions};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QueryStatus {
    /// No data has been fetched yet
    #[default]
    Pending,
    Success,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FetchStatus {
    #[default]
    Idle,
    Fetching,
}

/// Snapshot of one cache entry, handed to listeners
#[derive(Debug, Clone, Default)]
pub struct QueryState {
    pub data: Option<Value>,
    pub error: Option<QueryError>,
    pub status: QueryStatus,
    pub fetch_status: FetchStatus,
    /// When `data` was last written
    pub updated_at: Option<Instant>,
    /// Set by invalidation, cleared by the next successful write
    pub is_invalidated: bool,
}

impl QueryState {
    pub fn is_fetching(&self) -> bool {
        self.fetch_status == FetchStatus::Fetching
    }

    /// Stale once older than `stale_time`, when invalidated, or when no data
    /// has been written yet.
    pub fn is_stale(&self, stale_time: Duration, now: Instant) -> bool {
        if self.is_invalidated {
            return true;
        }
        match self.updated_at {
            Some(at) => now.saturating_duration_since(at) >= stale_time,
            None => true,
        }
    }
}

pub type FetchResult = std::result::Result<Value, QueryError>;

pub type SharedFetch = Shared<BoxFuture<'static, FetchResult>>;

pub(crate) struct InFlight {
    pub generation: u64,
    pub future: SharedFetch,
    pub abort: AbortHandle,
}

pub(crate) type Listener = Arc<dyn Fn(&QueryState) + Send + Sync>;

pub(crate) struct ListenerSlot {
    pub listener: Listener,
    /// Shared with the owning observer; disabled observers do not trigger
    /// refetches
    pub enabled: Arc<AtomicBool>,
}

pub(crate) struct CacheEntry {
    pub state: QueryState,
    pub options: QueryOptions,
    /// Last registered fetch function, used by invalidation and polling
    pub query_fn: Option<QueryFn>,
    pub listeners: Vec<(u64, ListenerSlot)>,
    pub in_flight: Option<InFlight>,
    /// Bumped for every fetch; only the latest generation may write
    pub generation: u64,
    /// Earliest time the entry may be evicted, set once unobserved
    pub gc_at: Option<Instant>,
}

impl CacheEntry {
    pub fn new(options: QueryOptions) -> Self {
        Self {
            state: QueryState::default(),
            options,
            query_fn: None,
            listeners: Vec::new(),
            in_flight: None,
            generation: 0,
            gc_at: None,
        }
    }

    pub fn is_stale(&self, now: Instant) -> bool {
        self.state.is_stale(self.options.stale_time, now)
    }

    /// True if at least one enabled observer is subscribed.
    pub fn has_active_observers(&self) -> bool {
        self.listeners
            .iter()
            .any(|(_, slot)| slot.enabled.load(Ordering::SeqCst))
    }

    /// True if observers are subscribed but every one of them is disabled.
    pub fn is_disabled(&self) -> bool {
        !self.listeners.is_empty() && !self.has_active_observers()
    }

    pub fn listeners(&self) -> Vec<Listener> {
        self.listeners
            .iter()
            .map(|(_, slot)| slot.listener.clone())
            .collect()
    }

    pub fn is_collectable(&self, now: Instant) -> bool {
        self.listeners.is_empty()
            && self.in_flight.is_none()
            && self.gc_at.is_some_and(|at| at <= now)
    }

    /// Start the eviction clock; an overflowing `gc_time` never evicts.
    pub fn schedule_gc(&mut self, now: Instant) {
        self.gc_at = now.checked_add(self.options.gc_time);
    }
}
