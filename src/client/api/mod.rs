//! API trait definitions split by portal
//!
//! This module organizes the PropTalk API surface into focused sub-traits:
//! - [`AdminApi`] - Platform administration
//! - [`AgentApi`] - Real-estate agent workspace
//! - [`UserApi`] - End-user property browsing and bookings
//!
//! The [`PropTalkApi`](super::PropTalkApi) super-trait combines all three.

mod admin;
mod agent;
mod user;

pub use admin::AdminApi;
pub use agent::AgentApi;
pub use user::UserApi;
