//! Admin portal display models

use serde::Serialize;
use tabled::Tabled;

use super::common::{DetailRow, check_mark, format_timestamp, or_empty, truncate_string};
use crate::client::models::{Agent, ApprovalRequest, DashboardStats, User};

/// Agent display model for table/JSON output.
#[derive(Debug, Clone, Tabled, Serialize)]
pub struct AgentDisplay {
    #[tabled(rename = "AGENT ID")]
    pub id: String,

    #[tabled(rename = "NAME")]
    pub name: String,

    #[tabled(rename = "EMAIL")]
    pub email: String,

    #[tabled(rename = "AGENCY")]
    pub agency: String,

    #[tabled(rename = "VERIFIED")]
    pub verified: String,

    #[tabled(rename = "ACTIVE")]
    pub active: String,
}

impl From<&Agent> for AgentDisplay {
    fn from(agent: &Agent) -> Self {
        Self {
            id: agent.id.clone(),
            name: truncate_string(&agent.full_name, 30),
            email: agent.email.clone(),
            agency: or_empty(agent.agency_name.clone()),
            verified: check_mark(agent.is_verified),
            active: check_mark(agent.is_active),
        }
    }
}

impl From<Agent> for AgentDisplay {
    fn from(agent: Agent) -> Self {
        AgentDisplay::from(&agent)
    }
}

/// Field-by-field view of a single agent
pub fn agent_details(agent: &Agent) -> Vec<DetailRow> {
    vec![
        DetailRow::new("ID", &agent.id),
        DetailRow::new("Name", &agent.full_name),
        DetailRow::new("Email", &agent.email),
        DetailRow::new("Phone", or_empty(agent.phone.clone())),
        DetailRow::new("Agency", or_empty(agent.agency_name.clone())),
        DetailRow::new("Verified", if agent.is_verified { "yes" } else { "no" }),
        DetailRow::new("Active", if agent.is_active { "yes" } else { "no" }),
        DetailRow::new("Joined", format_timestamp(agent.created_at)),
    ]
}

/// End user display model for table/JSON output.
#[derive(Debug, Clone, Tabled, Serialize)]
pub struct UserDisplay {
    #[tabled(rename = "USER ID")]
    pub id: String,

    #[tabled(rename = "NAME")]
    pub name: String,

    #[tabled(rename = "EMAIL")]
    pub email: String,

    #[tabled(rename = "ACTIVE")]
    pub active: String,

    #[tabled(rename = "JOINED")]
    pub joined: String,
}

impl From<&User> for UserDisplay {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            name: truncate_string(&user.full_name, 30),
            email: user.email.clone(),
            active: check_mark(user.is_active),
            joined: format_timestamp(user.created_at),
        }
    }
}

/// Approval request display model for table/JSON output.
#[derive(Debug, Clone, Tabled, Serialize)]
pub struct ApprovalDisplay {
    #[tabled(rename = "REQUEST ID")]
    pub id: String,

    #[tabled(rename = "AGENT")]
    pub agent: String,

    #[tabled(rename = "EMAIL")]
    pub email: String,

    #[tabled(rename = "LICENSE")]
    pub license: String,

    #[tabled(rename = "STATUS")]
    pub status: String,

    #[tabled(rename = "SUBMITTED")]
    pub submitted: String,
}

impl From<&ApprovalRequest> for ApprovalDisplay {
    fn from(request: &ApprovalRequest) -> Self {
        Self {
            id: request.id.clone(),
            agent: truncate_string(&request.agent_name, 30),
            email: request.agent_email.clone(),
            license: or_empty(request.license_number.clone()),
            status: request.status.to_string(),
            submitted: format_timestamp(request.submitted_at),
        }
    }
}

/// Dashboard counters as field/value rows
pub fn stats_rows(stats: &DashboardStats) -> Vec<DetailRow> {
    [
        ("Agents", stats.total_agents),
        ("Verified agents", stats.verified_agents),
        ("Active agents", stats.active_agents),
        ("Users", stats.total_users),
        ("Properties", stats.total_properties),
        ("Calls", stats.total_calls),
        ("Pending approvals", stats.pending_approvals),
    ]
    .into_iter()
    .map(|(metric, value)| DetailRow::new(metric, value.to_string()))
    .collect()
}
