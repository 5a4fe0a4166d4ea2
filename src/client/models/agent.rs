//! Agent portal models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{ApprovalState, Validate, require_text, validate_phone};
use crate::error::ValidationError;

/// The signed-in agent's own profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentProfile {
    pub id: String,
    pub full_name: String,
    pub email: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agency_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license_number: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
}

/// Partial profile update; only set fields are sent.
#[derive(Debug, Clone, Default, Serialize)]
pub struct UpdateProfileRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub agency_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
}

impl Validate for UpdateProfileRequest {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.full_name.is_none()
            && self.phone.is_none()
            && self.agency_name.is_none()
            && self.bio.is_none()
        {
            return Err(ValidationError::new("profile", "nothing to update"));
        }
        if let Some(ref name) = self.full_name {
            require_text("full_name", name)?;
        }
        if let Some(ref phone) = self.phone {
            validate_phone("phone", phone)?;
        }
        Ok(())
    }
}

/// Result of the agent's approval request.
///
/// The backend answers 404 until the agent has submitted a request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApprovalStatus {
    pub status: ApprovalState,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub submitted_at: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reviewed_at: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rejection_reason: Option<String>,
}

impl ApprovalStatus {
    pub fn is_approved(&self) -> bool {
        self.status == ApprovalState::Approved
    }
}

/// Credentials submitted for admin approval
#[derive(Debug, Clone, Serialize)]
pub struct SubmitApprovalRequest {
    pub license_number: String,
    pub agency_name: String,

    /// IDs of documents already uploaded through the document service
    #[serde(default)]
    pub document_ids: Vec<String>,
}

impl Validate for SubmitApprovalRequest {
    fn validate(&self) -> Result<(), ValidationError> {
        require_text("license_number", &self.license_number)?;
        require_text("agency_name", &self.agency_name)
    }
}

/// Telephony number assigned to an approved agent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhoneNumber {
    pub number: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_at: Option<DateTime<Utc>>,
}

/// AI voice agent answering calls on the agent's behalf
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoiceAgent {
    pub id: String,
    pub name: String,
    pub voice: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub greeting: Option<String>,

    #[serde(default)]
    pub is_active: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateVoiceAgentRequest {
    pub name: String,
    pub voice: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub greeting: Option<String>,
}

impl Validate for CreateVoiceAgentRequest {
    fn validate(&self) -> Result<(), ValidationError> {
        require_text("name", &self.name)?;
        require_text("voice", &self.voice)
    }
}

/// Inbound call handled by the voice agent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallLog {
    pub id: String,
    pub caller_number: String,

    #[serde(default)]
    pub duration_seconds: u32,

    /// Call outcome as reported by telephony (completed, missed, ...)
    pub status: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub started_at: Option<DateTime<Utc>>,
}
