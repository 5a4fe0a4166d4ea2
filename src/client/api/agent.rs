//! Agent portal API trait

use async_trait::async_trait;

use crate::client::models::{
    AgentProfile, ApprovalStatus, Booking, CallLog, CreatePropertyRequest,
    CreateVoiceAgentRequest, PhoneNumber, Property, SubmitApprovalRequest,
    UpdateBookingStatusRequest, UpdateProfileRequest, UpdatePropertyRequest, VoiceAgent,
};
use crate::error::Result;

/// Agent workspace operations, signed with the agent token.
#[async_trait]
pub trait AgentApi: Send + Sync {
    // ========================================================================
    // Profile & Onboarding
    // ========================================================================

    async fn get_profile(&self) -> Result<AgentProfile>;

    async fn update_profile(&self, request: &UpdateProfileRequest) -> Result<AgentProfile>;

    /// Current approval status.
    ///
    /// Fails with `ApiError::NotFound` until a request has been submitted.
    async fn approval_status(&self) -> Result<ApprovalStatus>;

    async fn submit_approval_request(
        &self,
        request: &SubmitApprovalRequest,
    ) -> Result<ApprovalStatus>;

    // ========================================================================
    // Telephony
    // ========================================================================

    /// Number assigned to the agent; only exists once approved.
    async fn phone_number(&self) -> Result<PhoneNumber>;

    /// Configured voice agent; `ApiError::NotFound` when none was created.
    async fn voice_agent(&self) -> Result<VoiceAgent>;

    async fn create_voice_agent(&self, request: &CreateVoiceAgentRequest) -> Result<VoiceAgent>;

    /// Calls handled by the voice agent, newest first
    async fn list_call_logs(&self) -> Result<Vec<CallLog>>;

    // ========================================================================
    // Listings
    // ========================================================================

    async fn list_properties(&self) -> Result<Vec<Property>>;

    async fn create_property(&self, request: &CreatePropertyRequest) -> Result<Property>;

    async fn update_property(
        &self,
        property_id: &str,
        request: &UpdatePropertyRequest,
    ) -> Result<Property>;

    async fn delete_property(&self, property_id: &str) -> Result<()>;

    // ========================================================================
    // Bookings
    // ========================================================================

    /// Viewings booked on the agent's listings
    async fn list_bookings(&self) -> Result<Vec<Booking>>;

    async fn update_booking_status(
        &self,
        booking_id: &str,
        request: &UpdateBookingStatusRequest,
    ) -> Result<Booking>;
}
