//! Portal query and mutation bundles
//!
//! One bundle per role. Each pairs a backend operation with its cache key
//! and refetch policy, so commands only ever deal in observers and
//! mutations.

pub mod admin;
pub mod admin_mutations;
pub mod agent;
pub mod agent_mutations;
pub mod keys;
pub mod user;

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;

use crate::client::PropTalkApi;
use crate::error::Result;
use crate::query::{QueryFn, QueryOptions, query_fn};

pub use admin::AdminQueries;
pub use admin_mutations::AdminMutations;
pub use agent::AgentQueries;
pub use agent_mutations::AgentMutations;
pub use user::UserQueries;

/// Shared API handle held by every bundle
pub type Api = Arc<dyn PropTalkApi>;

/// Freshness windows per resource
pub struct StaleTime;

impl StaleTime {
    // Counters and live activity
    pub const STATS: Duration = Duration::from_secs(30);
    pub const CALL_LOGS: Duration = Duration::from_secs(10);
    pub const BOOKINGS: Duration = Duration::from_secs(30);
    pub const APPROVALS: Duration = Duration::from_secs(30);

    // Lists edited through this client
    pub const AGENTS: Duration = Duration::from_secs(60);
    pub const USERS: Duration = Duration::from_secs(60);
    pub const PROPERTIES: Duration = Duration::from_secs(60);

    // Rarely changing
    pub const PROFILE: Duration = Duration::from_secs(5 * 60);
    pub const TELEPHONY: Duration = Duration::from_secs(10 * 60);
}

/// Polling cadence for live views
pub struct PollInterval;

impl PollInterval {
    pub const STATS: Duration = Duration::from_secs(60);
    pub const APPROVALS: Duration = Duration::from_secs(60);
    pub const CALL_LOGS: Duration = Duration::from_secs(15);
    pub const BOOKINGS: Duration = Duration::from_secs(30);
}

/// Retries for portal queries. Client errors fail fast regardless.
pub const QUERY_RETRIES: u32 = 1;

/// Base options shared by every portal query
pub(crate) fn query_options() -> QueryOptions {
    QueryOptions::new().retry(QUERY_RETRIES)
}

/// Build a query function that calls the API.
pub(crate) fn fetcher<T, F, Fut>(api: &Api, fetch: F) -> QueryFn
where
    T: Serialize,
    F: Fn(Api) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<T>> + Send + 'static,
{
    let api = api.clone();
    query_fn(move || fetch(api.clone()))
}

/// Bind a mutation function to the API.
pub(crate) fn with_api<V, F, Fut>(api: &Api, mutate: F) -> impl Fn(V) -> Fut + Send + Sync + 'static
where
    F: Fn(Api, V) -> Fut + Send + Sync + 'static,
{
    let api = api.clone();
    move |vars| mutate(api.clone(), vars)
}
