//! Typed live view of one query key

use std::marker::PhantomData;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use log::debug;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

use super::client::Subscription;
use super::entry::Listener;
use super::{
    FetchMode, QueryClient, QueryError, QueryFn, QueryKey, QueryOptions, QueryState, QueryStatus,
    RefetchOnMount, refetch_interval,
};
use crate::error::Error;

/// Decoded view of a cache entry
#[derive(Debug, Clone)]
pub struct QueryResult<T> {
    /// Last successful data; `None` before the first success and for
    /// queries that resolved empty
    pub data: Option<T>,
    pub error: Option<QueryError>,
    pub status: QueryStatus,
    /// A request is in flight
    pub is_fetching: bool,
    /// In flight with nothing to show yet
    pub is_loading: bool,
    pub is_stale: bool,
    pub is_enabled: bool,
    pub updated_at: Option<Instant>,
}

impl<T: DeserializeOwned> QueryResult<T> {
    fn from_state(state: Option<QueryState>, options: &QueryOptions, is_enabled: bool) -> Self {
        let state = state.unwrap_or_default();
        let is_stale = state.is_stale(options.stale_time, Instant::now());
        let is_fetching = state.is_fetching();

        let mut decode_error = None;
        let data = match state.data {
            None | Some(Value::Null) => None,
            Some(value) => match serde_json::from_value(value) {
                Ok(data) => Some(data),
                Err(e) => {
                    decode_error = Some(Arc::new(Error::from(e)));
                    None
                }
            },
        };

        Self {
            data,
            error: state.error.or(decode_error),
            status: state.status,
            is_fetching,
            is_loading: state.status == QueryStatus::Pending && is_fetching,
            is_stale,
            is_enabled,
            updated_at: state.updated_at,
        }
    }
}

impl<T> QueryResult<T> {
    pub fn is_success(&self) -> bool {
        self.status == QueryStatus::Success
    }

    pub fn is_error(&self) -> bool {
        self.status == QueryStatus::Error
    }
}

/// Subscribes to one key, fetches according to its options and exposes the
/// typed result.
///
/// Dropping the observer unsubscribes it and stops its poller; an in-flight
/// request still completes and populates the cache.
pub struct QueryObserver<T> {
    client: QueryClient,
    key: QueryKey,
    query_fn: QueryFn,
    options: QueryOptions,
    enabled: Arc<AtomicBool>,
    version: watch::Receiver<u64>,
    poller: Option<JoinHandle<()>>,
    _subscription: Subscription,
    _marker: PhantomData<fn() -> T>,
}

impl<T: DeserializeOwned> QueryObserver<T> {
    /// Mount an observer. Must be called within a tokio runtime.
    pub fn new(client: &QueryClient, key: QueryKey, query_fn: QueryFn, options: QueryOptions) -> Self {
        let enabled = Arc::new(AtomicBool::new(options.enabled));
        let (tx, version) = watch::channel(0u64);
        let listener: Listener = Arc::new(move |_: &QueryState| {
            tx.send_modify(|v| *v = v.wrapping_add(1));
        });

        let subscription =
            client.subscribe(&key, query_fn.clone(), &options, enabled.clone(), listener);

        let poller = options.refetch_interval.map(|base| {
            tokio::spawn(poll(client.clone(), key.clone(), enabled.clone(), base))
        });

        let observer = Self {
            client: client.clone(),
            key,
            query_fn,
            options,
            enabled,
            version,
            poller,
            _subscription: subscription,
            _marker: PhantomData,
        };

        if observer.is_enabled() {
            observer.fetch_on_mount();
        }
        observer
    }

    pub fn key(&self) -> &QueryKey {
        &self.key
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::SeqCst)
    }

    /// Current state of the key
    pub fn result(&self) -> QueryResult<T> {
        QueryResult::from_state(
            self.client.query_state(&self.key),
            &self.options,
            self.is_enabled(),
        )
    }

    /// Fetch now, superseding any request in flight, and return the settled
    /// result.
    pub async fn refetch(&self) -> QueryResult<T> {
        let _ = self
            .client
            .fetch(&self.key, self.query_fn.clone(), &self.options, FetchMode::Supersede)
            .await;
        self.result()
    }

    /// Enable or disable the query. Enabling fetches when there is no fresh
    /// data.
    pub fn set_enabled(&self, enabled: bool) {
        let was_enabled = self.enabled.swap(enabled, Ordering::SeqCst);
        if enabled && !was_enabled {
            debug!("Enabling {}", self.key);
            self.fetch_if(RefetchOnMount::IfStale);
        }
    }

    /// Wait for the next state change. Returns false once the entry is gone.
    pub async fn changed(&mut self) -> bool {
        self.version.changed().await.is_ok()
    }

    /// Wait until no request is in flight and return the result.
    pub async fn settled(&mut self) -> QueryResult<T> {
        loop {
            let result = self.result();
            if !result.is_fetching || !self.changed().await {
                return result;
            }
        }
    }

    fn fetch_on_mount(&self) {
        self.fetch_if(self.options.refetch_on_mount);
    }

    fn fetch_if(&self, policy: RefetchOnMount) {
        let state = self.client.query_state(&self.key);
        let has_data = state.as_ref().is_some_and(|s| s.data.is_some());
        let is_stale = state
            .as_ref()
            .is_none_or(|s| s.is_stale(self.options.stale_time, Instant::now()));

        let should_fetch = match policy {
            RefetchOnMount::Always => true,
            RefetchOnMount::IfStale => !has_data || is_stale,
            RefetchOnMount::Never => !has_data,
        };

        if should_fetch {
            let _ = self.client.fetch(
                &self.key,
                self.query_fn.clone(),
                &self.options,
                FetchMode::Dedupe,
            );
        } else {
            debug!("Using cached data for {}", self.key);
        }
    }
}

impl<T> Drop for QueryObserver<T> {
    fn drop(&mut self) {
        if let Some(poller) = self.poller.take() {
            poller.abort();
        }
    }
}

/// Interval refetch loop for one observer.
///
/// Each tick re-evaluates [`refetch_interval`]; a visibility change restarts
/// the tick period.
async fn poll(client: QueryClient, key: QueryKey, enabled: Arc<AtomicBool>, base: Duration) {
    let mut visibility = client.watch_visibility();
    let mut ticker = tokio::time::interval_at(Instant::now() + base, base);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                if !enabled.load(Ordering::SeqCst) {
                    continue;
                }
                let current = *visibility.borrow();
                match refetch_interval(base, current, client.is_stale(&key)) {
                    Some(_) => {
                        debug!("Polling {}", key);
                        let _ = client.refetch_key(&key, FetchMode::Dedupe);
                    }
                    None => debug!("Skipping poll of {} ({}, fresh or hidden)", key, current),
                }
            }
            changed = visibility.changed() => {
                if changed.is_err() {
                    break;
                }
                ticker.reset();
            }
        }
    }
}
