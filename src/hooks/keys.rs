//! Cache keys for every backend resource
//!
//! Keys are hierarchical: `["admin", ...]`, `["agent", ...]` and
//! `["user", ...]`, so a whole portal or resource can be invalidated by
//! prefix.

use crate::client::models::AgentFilters;
use crate::query::QueryKey;
use crate::query_key;

pub fn admin() -> QueryKey {
    query_key!["admin"]
}

pub fn admin_stats() -> QueryKey {
    query_key!["admin", "stats"]
}

/// Prefix of every filtered agent list
pub fn admin_agents() -> QueryKey {
    query_key!["admin", "agents"]
}

/// `["admin", "agents", search, verified, active]`; unset filters are null.
pub fn admin_agent_list(filters: &AgentFilters) -> QueryKey {
    admin_agents()
        .push(filters.search.as_deref())
        .push(filters.verified)
        .push(filters.active)
}

/// Prefix of every agent detail
pub fn admin_agent_details() -> QueryKey {
    query_key!["admin", "agent"]
}

pub fn admin_agent(agent_id: &str) -> QueryKey {
    admin_agent_details().push(agent_id)
}

pub fn admin_users() -> QueryKey {
    query_key!["admin", "users"]
}

pub fn admin_user_list(search: Option<&str>) -> QueryKey {
    admin_users().push(search)
}

pub fn admin_approvals() -> QueryKey {
    query_key!["admin", "approvals"]
}

pub fn agent() -> QueryKey {
    query_key!["agent"]
}

pub fn agent_profile() -> QueryKey {
    query_key!["agent", "profile"]
}

pub fn agent_approval_status() -> QueryKey {
    query_key!["agent", "approval-status"]
}

pub fn agent_phone_number() -> QueryKey {
    query_key!["agent", "phone-number"]
}

pub fn agent_voice_agent() -> QueryKey {
    query_key!["agent", "voice-agent"]
}

pub fn agent_properties() -> QueryKey {
    query_key!["agent", "properties"]
}

pub fn agent_call_logs() -> QueryKey {
    query_key!["agent", "call-logs"]
}

pub fn agent_bookings() -> QueryKey {
    query_key!["agent", "bookings"]
}

pub fn user() -> QueryKey {
    query_key!["user"]
}

/// Prefix of every property search
pub fn user_properties() -> QueryKey {
    query_key!["user", "properties"]
}

pub fn user_property_search(search: Option<&str>) -> QueryKey {
    user_properties().push(search)
}

pub fn user_bookings() -> QueryKey {
    query_key!["user", "bookings"]
}
