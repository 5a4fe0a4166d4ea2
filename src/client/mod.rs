//! PropTalk API client

pub mod api;
#[cfg(test)]
pub mod fixtures;
#[cfg(test)]
pub mod mock;
pub mod models;
pub mod proptalk;
pub mod token;

pub use api::{AdminApi, AgentApi, UserApi};
#[cfg(test)]
pub use mock::MockPropTalkClient;
pub use proptalk::{DEFAULT_API_URL, PropTalkClient};
#[cfg(test)]
pub use token::StaticTokens;
pub use token::{Role, TokenStore};

/// Complete PropTalk API surface across all three portals.
///
/// Implemented automatically for any type providing the portal traits, so
/// callers can hold an `Arc<dyn PropTalkApi>` and swap the HTTP client for a
/// mock in tests.
pub trait PropTalkApi: AdminApi + AgentApi + UserApi {}

impl<T: AdminApi + AgentApi + UserApi> PropTalkApi for T {}
