//! PropTalk API data models
//!
//! Typed request and response schemas for every backend endpoint, organized
//! by portal. Responses are decoded at the client boundary so a shape
//! mismatch fails fast instead of leaking untyped JSON into the cache.

mod admin;
mod agent;
mod booking;
mod property;

pub use admin::{
    Agent, AgentFilters, ApprovalRequest, ApprovalState, DashboardStats, RejectAgentRequest, User,
};
pub use agent::{
    AgentProfile, ApprovalStatus, CallLog, CreateVoiceAgentRequest, PhoneNumber,
    SubmitApprovalRequest, UpdateProfileRequest, VoiceAgent,
};
pub use booking::{Booking, BookingStatus, CreateBookingRequest, UpdateBookingStatusRequest};
pub use property::{CreatePropertyRequest, Property, PropertyStatus, UpdatePropertyRequest};

use crate::error::ValidationError;

/// Client-side form schema check, run before a request reaches the network.
pub trait Validate {
    fn validate(&self) -> Result<(), ValidationError>;
}

/// Reject empty or whitespace-only required text.
pub(crate) fn require_text(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new(field, "is required"));
    }
    Ok(())
}

/// Accept `+`, digits, spaces, dashes and parentheses with 7 to 15 digits.
pub(crate) fn validate_phone(field: &'static str, value: &str) -> Result<(), ValidationError> {
    let allowed = value
        .chars()
        .enumerate()
        .all(|(i, c)| c.is_ascii_digit() || matches!(c, ' ' | '-' | '(' | ')') || (c == '+' && i == 0));
    let digits = value.chars().filter(|c| c.is_ascii_digit()).count();

    if !allowed || !(7..=15).contains(&digits) {
        return Err(ValidationError::new(
            field,
            "must be a phone number with 7 to 15 digits",
        ));
    }
    Ok(())
}
