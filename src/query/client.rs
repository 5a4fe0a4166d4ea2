//! Query cache service
//!
//! `QueryClient` is a cheap, cloneable handle to one cache. Commands and
//! portal bundles receive it by injection; there is no global instance.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;

use futures::FutureExt;
use futures::future::join_all;
use log::{debug, warn};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::time::Instant;

use super::entry::{CacheEntry, FetchResult, InFlight, Listener, ListenerSlot, SharedFetch};
use super::{
    FetchStatus, QueryFn, QueryKey, QueryOptions, QueryState, QueryStatus, Visibility,
    VisibilityTracker,
};
use crate::error::{Error, Result};

/// How a fetch interacts with one already in flight for the same key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchMode {
    /// Join the in-flight request
    Dedupe,
    /// Start a new request; the older response will be discarded
    Supersede,
}

/// Cached values captured before an optimistic update
#[derive(Debug, Default)]
pub struct Snapshot {
    entries: Vec<(QueryKey, QueryState)>,
}

impl Snapshot {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Shared server-state cache
#[derive(Clone, Default)]
pub struct QueryClient {
    inner: Arc<Inner>,
}

#[derive(Default)]
struct Inner {
    entries: Mutex<HashMap<QueryKey, CacheEntry>>,
    visibility: VisibilityTracker,
    next_listener_id: AtomicU64,
}

/// Live registration of a listener on one cache entry.
///
/// Dropping it deregisters the listener; the last one to go starts the
/// entry's garbage-collection clock.
pub struct Subscription {
    inner: Weak<Inner>,
    key: QueryKey,
    id: u64,
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(inner) = self.inner.upgrade() {
            inner.unsubscribe(&self.key, self.id);
        }
    }
}

fn notify(listeners: &[Listener], state: &QueryState) {
    for listener in listeners {
        listener(state);
    }
}

impl Inner {
    fn lock(&self) -> MutexGuard<'_, HashMap<QueryKey, CacheEntry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn is_disabled(&self, key: &QueryKey) -> bool {
        self.lock().get(key).is_some_and(CacheEntry::is_disabled)
    }

    fn unsubscribe(self: &Arc<Self>, key: &QueryKey, id: u64) {
        let gc_delay = {
            let mut entries = self.lock();
            let Some(entry) = entries.get_mut(key) else {
                return;
            };
            entry.listeners.retain(|(listener_id, _)| *listener_id != id);
            if !entry.listeners.is_empty() {
                return;
            }
            debug!("No observers left for {}; scheduling GC", key);
            entry.schedule_gc(Instant::now());
            entry.gc_at.map(|_| entry.options.gc_time)
        };

        if let Some(delay) = gc_delay {
            spawn_gc(Arc::downgrade(self), delay);
        }
    }

    /// Apply a finished fetch, unless a newer one has been started since.
    fn complete_fetch(self: &Arc<Self>, key: &QueryKey, generation: u64, result: &FetchResult) {
        let (listeners, state, gc_delay) = {
            let mut entries = self.lock();
            let Some(entry) = entries.get_mut(key) else {
                debug!("{} was removed while fetching; discarding response", key);
                return;
            };
            if entry.generation != generation {
                debug!(
                    "Discarding superseded response for {} (generation {}, latest {})",
                    key, generation, entry.generation
                );
                return;
            }

            entry.in_flight = None;
            entry.state.fetch_status = FetchStatus::Idle;
            match result {
                Ok(data) => {
                    entry.state.data = Some(data.clone());
                    entry.state.error = None;
                    entry.state.status = QueryStatus::Success;
                    entry.state.updated_at = Some(Instant::now());
                    entry.state.is_invalidated = false;
                }
                Err(err) => {
                    entry.state.error = Some(err.clone());
                    entry.state.status = QueryStatus::Error;
                }
            }

            let mut gc_delay = None;
            if entry.listeners.is_empty() {
                entry.schedule_gc(Instant::now());
                gc_delay = entry.gc_at.map(|_| entry.options.gc_time);
            }
            (entry.listeners(), entry.state.clone(), gc_delay)
        };

        notify(&listeners, &state);
        if let Some(delay) = gc_delay {
            spawn_gc(Arc::downgrade(self), delay);
        }
    }

    fn collect_garbage(&self) -> usize {
        let now = Instant::now();
        let mut entries = self.lock();
        let before = entries.len();
        entries.retain(|key, entry| {
            let collect = entry.is_collectable(now);
            if collect {
                debug!("GC: evicting {}", key);
            }
            !collect
        });
        before - entries.len()
    }
}

/// Run a GC pass after `delay`, if a runtime is available to do so.
fn spawn_gc(inner: Weak<Inner>, delay: Duration) {
    let Ok(handle) = Handle::try_current() else {
        return;
    };
    handle.spawn(async move {
        tokio::time::sleep(delay).await;
        if let Some(inner) = inner.upgrade() {
            inner.collect_garbage();
        }
    });
}

/// Run a query function with the configured retry policy, then record the
/// outcome in the cache.
async fn run_fetch(
    inner: Weak<Inner>,
    key: QueryKey,
    generation: u64,
    query_fn: QueryFn,
    options: QueryOptions,
) -> FetchResult {
    let mut attempt = 0;
    let result = loop {
        match query_fn().await {
            Ok(data) => break Ok(data),
            Err(err) if options.empty_on_not_found && err.is_not_found() => {
                debug!("{} not found; resolving as empty", key);
                break Ok(Value::Null);
            }
            Err(err) if attempt < options.retry && err.is_retryable() => {
                let delay = options.delay_for_attempt(attempt);
                warn!(
                    "Fetch {} failed (attempt {}): {}; retrying in {:?}",
                    key,
                    attempt + 1,
                    err,
                    delay
                );
                tokio::time::sleep(delay).await;
                if inner.upgrade().is_some_and(|inner| inner.is_disabled(&key)) {
                    debug!("{} was disabled during backoff; giving up", key);
                    break Err(Arc::new(err));
                }
                attempt += 1;
            }
            Err(err) => {
                warn!("Fetch {} failed: {}", key, err);
                break Err(Arc::new(err));
            }
        }
    };

    if let Some(inner) = inner.upgrade() {
        inner.complete_fetch(&key, generation, &result);
    }
    result
}

impl QueryClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of cached entries
    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // ========================================================================
    // Visibility
    // ========================================================================

    pub fn visibility(&self) -> Visibility {
        self.inner.visibility.current()
    }

    pub fn watch_visibility(&self) -> watch::Receiver<Visibility> {
        self.inner.visibility.subscribe()
    }

    /// Record a visibility change.
    ///
    /// Becoming visible runs the window-focus trigger. Returns the number of
    /// refetches started.
    pub fn handle_visibility_change(&self, visibility: Visibility) -> usize {
        if !self.inner.visibility.set(visibility) {
            return 0;
        }
        debug!("Visibility changed to {}", visibility);
        match visibility {
            Visibility::Visible => self.on_window_focus(),
            Visibility::Hidden => 0,
        }
    }

    /// Refetch every stale query that has an enabled observer and opted in
    /// to focus refetching.
    pub fn on_window_focus(&self) -> usize {
        let now = Instant::now();
        let targets: Vec<_> = {
            let entries = self.inner.lock();
            entries
                .iter()
                .filter(|(_, entry)| {
                    entry.options.refetch_on_window_focus
                        && entry.has_active_observers()
                        && entry.is_stale(now)
                })
                .filter_map(|(key, entry)| {
                    let query_fn = entry.query_fn.clone()?;
                    Some((key.clone(), query_fn, entry.options.clone()))
                })
                .collect()
        };

        let count = targets.len();
        if count > 0 {
            debug!("Focus: refetching {} stale queries", count);
        }
        for (key, query_fn, options) in targets {
            let _ = self.fetch(&key, query_fn, &options, FetchMode::Dedupe);
        }
        count
    }

    // ========================================================================
    // Reads
    // ========================================================================

    pub fn query_state(&self, key: &QueryKey) -> Option<QueryState> {
        self.inner.lock().get(key).map(|entry| entry.state.clone())
    }

    /// Staleness under the entry's own `stale_time`; missing entries are stale.
    pub fn is_stale(&self, key: &QueryKey) -> bool {
        self.inner
            .lock()
            .get(key)
            .is_none_or(|entry| entry.is_stale(Instant::now()))
    }

    /// Cached data decoded as `T`, if present and decodable.
    pub fn get_query_data<T: DeserializeOwned>(&self, key: &QueryKey) -> Option<T> {
        let data = self.inner.lock().get(key)?.state.data.clone()?;
        serde_json::from_value(data).ok()
    }

    // ========================================================================
    // Fetching
    // ========================================================================

    /// Register an observer's listener on `key`, creating the entry if needed.
    pub(crate) fn subscribe(
        &self,
        key: &QueryKey,
        query_fn: QueryFn,
        options: &QueryOptions,
        enabled: Arc<AtomicBool>,
        listener: Listener,
    ) -> Subscription {
        let id = self.inner.next_listener_id.fetch_add(1, Ordering::SeqCst);
        let mut entries = self.inner.lock();
        let entry = entries
            .entry(key.clone())
            .or_insert_with(|| CacheEntry::new(options.clone()));
        entry.options = options.clone();
        entry.query_fn = Some(query_fn);
        entry.gc_at = None;
        entry.listeners.push((id, ListenerSlot { listener, enabled }));

        Subscription {
            inner: Arc::downgrade(&self.inner),
            key: key.clone(),
            id,
        }
    }

    /// Start (or join) a fetch for `key`.
    ///
    /// The request runs as its own task: dropping the returned future does
    /// not cancel it, and its result always reaches the cache unless a newer
    /// fetch superseded it.
    pub fn fetch(
        &self,
        key: &QueryKey,
        query_fn: QueryFn,
        options: &QueryOptions,
        mode: FetchMode,
    ) -> SharedFetch {
        let (future, listeners, state) = {
            let mut entries = self.inner.lock();
            let entry = entries
                .entry(key.clone())
                .or_insert_with(|| CacheEntry::new(options.clone()));
            entry.options = options.clone();
            entry.query_fn = Some(query_fn.clone());

            if let Some(in_flight) = &entry.in_flight {
                if mode == FetchMode::Dedupe {
                    debug!("Joining in-flight fetch for {}", key);
                    return in_flight.future.clone();
                }
                debug!(
                    "Superseding fetch generation {} for {}",
                    in_flight.generation, key
                );
            }

            entry.generation += 1;
            let generation = entry.generation;
            let task = tokio::spawn(run_fetch(
                Arc::downgrade(&self.inner),
                key.clone(),
                generation,
                query_fn,
                options.clone(),
            ));
            let abort = task.abort_handle();
            let future = async move {
                task.await.unwrap_or_else(|e| {
                    let reason = if e.is_cancelled() {
                        "query cancelled"
                    } else {
                        "query task panicked"
                    };
                    Err(Arc::new(Error::Other(reason.to_string())))
                })
            }
            .boxed()
            .shared();

            entry.in_flight = Some(InFlight {
                generation,
                future: future.clone(),
                abort,
            });
            entry.state.fetch_status = FetchStatus::Fetching;
            (future, entry.listeners(), entry.state.clone())
        };

        notify(&listeners, &state);
        future
    }

    /// Return cached data if fresh under `options.stale_time`, otherwise
    /// fetch it (joining any in-flight request).
    pub async fn fetch_query<T: DeserializeOwned>(
        &self,
        key: &QueryKey,
        query_fn: QueryFn,
        options: &QueryOptions,
    ) -> Result<T> {
        let cached = {
            let entries = self.inner.lock();
            entries
                .get(key)
                .filter(|entry| !entry.state.is_stale(options.stale_time, Instant::now()))
                .and_then(|entry| entry.state.data.clone())
        };

        let data = match cached {
            Some(data) => {
                debug!("Cache hit: {}", key);
                data
            }
            None => {
                debug!("Cache miss: {}", key);
                self.fetch(key, query_fn, options, FetchMode::Dedupe)
                    .await
                    .map_err(Error::Query)?
            }
        };

        Ok(serde_json::from_value(data)?)
    }

    /// Refetch `key` with its registered query function.
    pub(crate) fn refetch_key(&self, key: &QueryKey, mode: FetchMode) -> Option<SharedFetch> {
        let (query_fn, options) = {
            let entries = self.inner.lock();
            let entry = entries.get(key)?;
            (entry.query_fn.clone()?, entry.options.clone())
        };
        Some(self.fetch(key, query_fn, &options, mode))
    }

    // ========================================================================
    // Writes
    // ========================================================================

    /// Write data for `key` as if it had just been fetched.
    pub fn set_query_data<T: Serialize>(&self, key: &QueryKey, data: &T) -> Result<()> {
        let value = serde_json::to_value(data)?;
        let (listeners, state, gc_delay) = {
            let mut entries = self.inner.lock();
            let entry = entries
                .entry(key.clone())
                .or_insert_with(|| CacheEntry::new(QueryOptions::default()));
            write_data(&mut entry.state, value);
            let mut gc_delay = None;
            if entry.listeners.is_empty() && entry.gc_at.is_none() {
                entry.schedule_gc(Instant::now());
                gc_delay = entry.gc_at.map(|_| entry.options.gc_time);
            }
            (entry.listeners(), entry.state.clone(), gc_delay)
        };
        notify(&listeners, &state);
        if let Some(delay) = gc_delay {
            spawn_gc(Arc::downgrade(&self.inner), delay);
        }
        Ok(())
    }

    /// Transform the cached data of every entry under `prefix` that decodes
    /// as `T`. Entries without data, or holding a different shape, are left
    /// alone. Returns the number of entries updated.
    pub fn update_queries_data<T, F>(&self, prefix: &QueryKey, update: F) -> usize
    where
        T: Serialize + DeserializeOwned,
        F: Fn(T) -> T,
    {
        let mut notifications = Vec::new();
        {
            let mut entries = self.inner.lock();
            for (key, entry) in entries.iter_mut().filter(|(k, _)| k.starts_with(prefix)) {
                let Some(data) = entry.state.data.clone() else {
                    continue;
                };
                let Ok(typed) = serde_json::from_value::<T>(data) else {
                    debug!("Skipping {}: cached data has a different shape", key);
                    continue;
                };
                match serde_json::to_value(update(typed)) {
                    Ok(value) => {
                        write_data(&mut entry.state, value);
                        notifications.push((entry.listeners(), entry.state.clone()));
                    }
                    Err(e) => warn!("Failed to encode updated data for {}: {}", key, e),
                }
            }
        }

        let count = notifications.len();
        for (listeners, state) in notifications {
            notify(&listeners, &state);
        }
        count
    }

    /// Abort in-flight fetches under `prefix`; their responses will not be
    /// applied. Returns the number cancelled.
    pub fn cancel_queries(&self, prefix: &QueryKey) -> usize {
        let mut notifications = Vec::new();
        {
            let mut entries = self.inner.lock();
            for (key, entry) in entries.iter_mut().filter(|(k, _)| k.starts_with(prefix)) {
                let Some(in_flight) = entry.in_flight.take() else {
                    continue;
                };
                debug!("Cancelling fetch generation {} for {}", in_flight.generation, key);
                in_flight.abort.abort();
                entry.generation += 1;
                entry.state.fetch_status = FetchStatus::Idle;
                notifications.push((entry.listeners(), entry.state.clone()));
            }
        }

        let count = notifications.len();
        for (listeners, state) in notifications {
            notify(&listeners, &state);
        }
        count
    }

    /// Mark every entry under `prefix` stale and refetch those with enabled
    /// observers, waiting for the refetches to settle.
    ///
    /// Returns the number of refetches performed.
    pub async fn invalidate_queries(&self, prefix: &QueryKey) -> usize {
        let mut notifications = Vec::new();
        let mut refetches = Vec::new();
        {
            let mut entries = self.inner.lock();
            for (key, entry) in entries.iter_mut().filter(|(k, _)| k.starts_with(prefix)) {
                entry.state.is_invalidated = true;
                notifications.push((entry.listeners(), entry.state.clone()));
                if entry.has_active_observers()
                    && let Some(query_fn) = entry.query_fn.clone()
                {
                    refetches.push((key.clone(), query_fn, entry.options.clone()));
                }
            }
        }
        debug!(
            "Invalidated {} entries under {}; refetching {}",
            notifications.len(),
            prefix,
            refetches.len()
        );

        for (listeners, state) in notifications {
            notify(&listeners, &state);
        }

        let futures: Vec<_> = refetches
            .into_iter()
            .map(|(key, query_fn, options)| {
                self.fetch(&key, query_fn, &options, FetchMode::Supersede)
            })
            .collect();
        let count = futures.len();
        join_all(futures).await;
        count
    }

    /// Drop entries under `prefix` from the cache outright.
    pub fn remove_queries(&self, prefix: &QueryKey) -> usize {
        let mut entries = self.inner.lock();
        let before = entries.len();
        entries.retain(|key, _| !key.starts_with(prefix));
        before - entries.len()
    }

    /// Evict every unobserved entry whose GC time has elapsed.
    pub fn collect_garbage(&self) -> usize {
        self.inner.collect_garbage()
    }

    // ========================================================================
    // Optimistic updates
    // ========================================================================

    /// Capture the state of every entry under any of `prefixes`.
    pub fn snapshot(&self, prefixes: &[QueryKey]) -> Snapshot {
        let entries = self.inner.lock();
        let entries = entries
            .iter()
            .filter(|(key, _)| prefixes.iter().any(|p| key.starts_with(p)))
            .map(|(key, entry)| (key.clone(), entry.state.clone()))
            .collect();
        Snapshot { entries }
    }

    /// Put snapshotted data back verbatim.
    pub fn restore(&self, snapshot: Snapshot) {
        let mut notifications = Vec::new();
        {
            let mut entries = self.inner.lock();
            for (key, saved) in snapshot.entries {
                let Some(entry) = entries.get_mut(&key) else {
                    continue;
                };
                debug!("Restoring {}", key);
                entry.state.data = saved.data;
                entry.state.error = saved.error;
                entry.state.status = saved.status;
                entry.state.updated_at = saved.updated_at;
                entry.state.is_invalidated = saved.is_invalidated;
                notifications.push((entry.listeners(), entry.state.clone()));
            }
        }

        for (listeners, state) in notifications {
            notify(&listeners, &state);
        }
    }
}

fn write_data(state: &mut QueryState, value: Value) {
    state.data = Some(value);
    state.error = None;
    state.status = QueryStatus::Success;
    state.updated_at = Some(Instant::now());
    state.is_invalidated = false;
}
