//! Visibility-aware polling
//!
//! Interval refetches only make sense while someone is looking at the data.
//! The tracker holds the current visibility and lets pollers wait for
//! changes; the cache client is the only writer.

use std::fmt;
use std::time::Duration;

use tokio::sync::watch;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Visibility {
    #[default]
    Visible,
    Hidden,
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Visibility::Visible => f.write_str("visible"),
            Visibility::Hidden => f.write_str("hidden"),
        }
    }
}

/// Interval to poll at right now, or `None` to skip polling.
///
/// Polls only while visible and only when the cached data is stale.
pub fn refetch_interval(base: Duration, visibility: Visibility, is_stale: bool) -> Option<Duration> {
    (visibility == Visibility::Visible && is_stale).then_some(base)
}

/// Current visibility, observable by pollers
#[derive(Debug)]
pub struct VisibilityTracker {
    tx: watch::Sender<Visibility>,
}

impl Default for VisibilityTracker {
    fn default() -> Self {
        Self::new(Visibility::Visible)
    }
}

impl VisibilityTracker {
    pub fn new(initial: Visibility) -> Self {
        let (tx, _rx) = watch::channel(initial);
        Self { tx }
    }

    pub fn current(&self) -> Visibility {
        *self.tx.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<Visibility> {
        self.tx.subscribe()
    }

    /// Record a visibility change. Returns false if nothing changed.
    pub(super) fn set(&self, visibility: Visibility) -> bool {
        self.tx.send_if_modified(|current| {
            if *current == visibility {
                return false;
            }
            *current = visibility;
            true
        })
    }
}
