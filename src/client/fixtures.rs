//! Test fixtures and builders for API model types
//!
//! Import via `use crate::client::fixtures::*` in test modules.

#![allow(dead_code)]

use chrono::{DateTime, Duration, Utc};

use super::models::{
    Agent, ApprovalRequest, ApprovalState, ApprovalStatus, Booking, BookingStatus, CallLog,
    Property, PropertyStatus, User, VoiceAgent,
};

// ============================================================================
// AgentBuilder
// ============================================================================

/// Builder for test `Agent` records.
///
/// # Example
/// ```ignore
/// let agent = AgentBuilder::new("a1").name("Jo Smith").unverified().build();
/// ```
#[derive(Debug, Clone)]
pub struct AgentBuilder {
    agent: Agent,
}

impl AgentBuilder {
    pub fn new(id: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            agent: Agent {
                full_name: format!("Agent {}", id),
                email: format!("{}@agency.test", id),
                phone: None,
                agency_name: Some("Harbour Realty".to_string()),
                is_verified: true,
                is_active: true,
                created_at: None,
                id,
            },
        }
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.agent.full_name = name.into();
        self
    }

    pub fn unverified(mut self) -> Self {
        self.agent.is_verified = false;
        self
    }

    pub fn inactive(mut self) -> Self {
        self.agent.is_active = false;
        self
    }

    pub fn build(self) -> Agent {
        self.agent
    }
}

// ============================================================================
// PropertyBuilder
// ============================================================================

#[derive(Debug, Clone)]
pub struct PropertyBuilder {
    property: Property,
}

impl PropertyBuilder {
    pub fn new(id: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            property: Property {
                title: format!("Listing {}", id),
                address: "1 Quay Road".to_string(),
                city: "Lisbon".to_string(),
                price: 350_000.0,
                bedrooms: 2,
                bathrooms: 1,
                property_type: "apartment".to_string(),
                status: PropertyStatus::Available,
                description: None,
                id,
            },
        }
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.property.title = title.into();
        self
    }

    pub fn price(mut self, price: f64) -> Self {
        self.property.price = price;
        self
    }

    pub fn status(mut self, status: PropertyStatus) -> Self {
        self.property.status = status;
        self
    }

    pub fn build(self) -> Property {
        self.property
    }
}

// ============================================================================
// Simple constructors
// ============================================================================

pub fn user(id: &str, name: &str) -> User {
    User {
        id: id.to_string(),
        full_name: name.to_string(),
        email: format!("{}@mail.test", id),
        is_active: true,
        created_at: None,
    }
}

pub fn approval_request(id: &str, agent_id: &str) -> ApprovalRequest {
    ApprovalRequest {
        id: id.to_string(),
        agent_id: agent_id.to_string(),
        agent_name: format!("Agent {}", agent_id),
        agent_email: format!("{}@agency.test", agent_id),
        status: ApprovalState::Pending,
        license_number: Some("LIC-001".to_string()),
        submitted_at: None,
        rejection_reason: None,
    }
}

pub fn approval_status(state: ApprovalState) -> ApprovalStatus {
    ApprovalStatus {
        status: state,
        submitted_at: None,
        reviewed_at: None,
        rejection_reason: None,
    }
}

pub fn voice_agent(id: &str) -> VoiceAgent {
    VoiceAgent {
        id: id.to_string(),
        name: "Front desk".to_string(),
        voice: "alloy".to_string(),
        greeting: None,
        is_active: true,
    }
}

pub fn call_log(id: &str, caller: &str) -> CallLog {
    CallLog {
        id: id.to_string(),
        caller_number: caller.to_string(),
        duration_seconds: 95,
        status: "completed".to_string(),
        summary: None,
        started_at: None,
    }
}

pub fn booking(id: &str, property_id: &str) -> Booking {
    Booking {
        id: id.to_string(),
        property_id: property_id.to_string(),
        property_title: None,
        user_name: Some("Sam".to_string()),
        scheduled_at: in_days(3),
        status: BookingStatus::Pending,
        notes: None,
    }
}

pub fn in_days(days: i64) -> DateTime<Utc> {
    Utc::now() + Duration::days(days)
}
