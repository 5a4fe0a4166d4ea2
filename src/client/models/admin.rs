//! Admin portal models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Validate, require_text};
use crate::error::ValidationError;

/// Platform-wide counters for the admin dashboard
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DashboardStats {
    #[serde(default)]
    pub total_agents: u64,
    #[serde(default)]
    pub verified_agents: u64,
    #[serde(default)]
    pub active_agents: u64,
    #[serde(default)]
    pub total_users: u64,
    #[serde(default)]
    pub total_properties: u64,
    #[serde(default)]
    pub total_calls: u64,
    #[serde(default)]
    pub pending_approvals: u64,
}

/// Real-estate agent as seen by an admin
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Agent {
    /// Agent ID
    pub id: String,

    /// Display name
    pub full_name: String,

    /// Login email
    pub email: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agency_name: Option<String>,

    /// Whether an admin has verified the agent's credentials
    #[serde(default)]
    pub is_verified: bool,

    /// Whether the account may sign in
    #[serde(default)]
    pub is_active: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

/// Filters for the admin agent list.
///
/// Every field also takes part in the list's cache key, so two lists with
/// different filters are cached independently.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct AgentFilters {
    /// Substring match on name or email
    pub search: Option<String>,
    /// Only verified (`true`) or unverified (`false`) agents
    pub verified: Option<bool>,
    /// Only active (`true`) or deactivated (`false`) agents
    pub active: Option<bool>,
}

impl AgentFilters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the search term; blank input clears it.
    pub fn search(mut self, term: impl Into<String>) -> Self {
        let term = term.into();
        let trimmed = term.trim();
        self.search = (!trimmed.is_empty()).then(|| trimmed.to_string());
        self
    }

    pub fn verified(mut self, verified: Option<bool>) -> Self {
        self.verified = verified;
        self
    }

    pub fn active(mut self, active: Option<bool>) -> Self {
        self.active = active;
        self
    }

    /// True when any filter narrows the result set.
    pub fn is_filtering(&self) -> bool {
        self.search.is_some() || self.verified.is_some() || self.active.is_some()
    }

    /// Query string pairs for the list endpoint
    pub fn to_query(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![];
        if let Some(ref search) = self.search {
            params.push(("search", search.clone()));
        }
        if let Some(verified) = self.verified {
            params.push(("is_verified", verified.to_string()));
        }
        if let Some(active) = self.active {
            params.push(("is_active", active.to_string()));
        }
        params
    }
}

/// End user account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub full_name: String,
    pub email: String,

    #[serde(default)]
    pub is_active: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

/// Review state of an agent's approval request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApprovalState {
    Pending,
    Approved,
    Rejected,
}

impl std::fmt::Display for ApprovalState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ApprovalState::Pending => "pending",
            ApprovalState::Approved => "approved",
            ApprovalState::Rejected => "rejected",
        };
        f.write_str(s)
    }
}

/// Agent approval request awaiting admin review
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApprovalRequest {
    pub id: String,
    pub agent_id: String,
    pub agent_name: String,
    pub agent_email: String,
    pub status: ApprovalState,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license_number: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub submitted_at: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rejection_reason: Option<String>,
}

/// Body for rejecting an approval request
#[derive(Debug, Clone, Serialize)]
pub struct RejectAgentRequest {
    pub reason: String,
}

impl Validate for RejectAgentRequest {
    fn validate(&self) -> Result<(), ValidationError> {
        require_text("reason", &self.reason)
    }
}
