//! Display model implementations for table and JSON output
//!
//! Display models transform API response types into CLI-friendly formats
//! with appropriate column names and serialization.

mod admin;
mod agent;
pub mod common;

pub use admin::{AgentDisplay, ApprovalDisplay, UserDisplay, agent_details, stats_rows};
pub use agent::{
    BookingDisplay, CallLogDisplay, PropertyDisplay, approval_details, phone_details,
    profile_details, voice_agent_details,
};
pub use common::DetailRow;
