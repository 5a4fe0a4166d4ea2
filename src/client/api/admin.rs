//! Admin portal API trait

use async_trait::async_trait;

use crate::client::models::{Agent, AgentFilters, ApprovalRequest, DashboardStats, User};
use crate::error::Result;

/// Administration operations, signed with the admin token.
#[async_trait]
pub trait AdminApi: Send + Sync {
    // ========================================================================
    // Dashboard
    // ========================================================================

    /// Platform-wide counters
    async fn dashboard_stats(&self) -> Result<DashboardStats>;

    // ========================================================================
    // Agents
    // ========================================================================

    /// List agents matching the filters
    async fn list_agents(&self, filters: &AgentFilters) -> Result<Vec<Agent>>;

    /// Get a single agent
    async fn get_agent(&self, agent_id: &str) -> Result<Agent>;

    /// Mark an agent as verified, or revoke verification
    async fn set_agent_verified(&self, agent_id: &str, verified: bool) -> Result<Agent>;

    /// Activate or deactivate an agent account
    async fn set_agent_active(&self, agent_id: &str, active: bool) -> Result<Agent>;

    /// Permanently delete an agent
    async fn delete_agent(&self, agent_id: &str) -> Result<()>;

    // ========================================================================
    // Users
    // ========================================================================

    /// List end users, optionally narrowed by a search term
    async fn list_users(&self, search: Option<&str>) -> Result<Vec<User>>;

    async fn delete_user(&self, user_id: &str) -> Result<()>;

    // ========================================================================
    // Approvals
    // ========================================================================

    /// Approval requests waiting for review
    async fn list_approval_requests(&self) -> Result<Vec<ApprovalRequest>>;

    async fn approve_agent(&self, request_id: &str) -> Result<ApprovalRequest>;

    async fn reject_agent(&self, request_id: &str, reason: &str) -> Result<ApprovalRequest>;
}
