//! Mock PropTalk API client for testing
//!
//! Implements every portal trait over in-memory state so the query layer
//! and command handlers can be exercised without a backend.

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;

use super::api::{AdminApi, AgentApi, UserApi};
use super::models::{
    Agent, AgentFilters, AgentProfile, ApprovalRequest, ApprovalState, ApprovalStatus, Booking,
    BookingStatus, CallLog, CreateBookingRequest, CreatePropertyRequest, CreateVoiceAgentRequest,
    DashboardStats, PhoneNumber, Property, SubmitApprovalRequest, UpdateBookingStatusRequest,
    UpdateProfileRequest, UpdatePropertyRequest, User, VoiceAgent,
};
use crate::error::{ApiError, Result};

/// Mock API client for testing.
///
/// Configure state via the async `with_*` builders, then share it behind an
/// `Arc`. Mutations change the in-memory state, so a refetch after a
/// mutation observes the server-side effect.
///
/// # Example
/// ```ignore
/// let mock = MockPropTalkClient::new()
///     .with_agents(vec![AgentBuilder::new("a1").build()])
///     .await;
///
/// let agents = mock.list_agents(&AgentFilters::new()).await?;
/// assert_eq!(agents.len(), 1);
/// ```
#[derive(Default)]
pub struct MockPropTalkClient {
    stats: Arc<Mutex<DashboardStats>>,
    agents: Arc<Mutex<Vec<Agent>>>,
    users: Arc<Mutex<Vec<User>>>,
    approvals: Arc<Mutex<Vec<ApprovalRequest>>>,
    profile: Arc<Mutex<Option<AgentProfile>>>,
    /// `None` answers 404, as the backend does before a request is submitted
    approval_status: Arc<Mutex<Option<ApprovalStatus>>>,
    phone_number: Arc<Mutex<Option<PhoneNumber>>>,
    voice_agent: Arc<Mutex<Option<VoiceAgent>>>,
    call_logs: Arc<Mutex<Vec<CallLog>>>,
    properties: Arc<Mutex<Vec<Property>>>,
    listings: Arc<Mutex<Vec<Property>>>,
    bookings: Arc<Mutex<Vec<Booking>>>,
    my_bookings: Arc<Mutex<Vec<Booking>>>,
    /// Errors returned by upcoming calls, one per call
    errors: Arc<Mutex<VecDeque<ApiError>>>,
    /// Simulated round-trip time
    latency: Arc<Mutex<Option<Duration>>>,
    call_count: Arc<Mutex<CallCounts>>,
}

/// Tracks API call counts for test verification
#[derive(Default, Debug, Clone)]
pub struct CallCounts {
    pub dashboard_stats: usize,
    pub list_agents: usize,
    pub get_agent: usize,
    pub set_agent_verified: usize,
    pub set_agent_active: usize,
    pub delete_agent: usize,
    pub list_users: usize,
    pub delete_user: usize,
    pub list_approval_requests: usize,
    pub approve_agent: usize,
    pub reject_agent: usize,
    pub get_profile: usize,
    pub update_profile: usize,
    pub approval_status: usize,
    pub submit_approval_request: usize,
    pub phone_number: usize,
    pub voice_agent: usize,
    pub create_voice_agent: usize,
    pub list_call_logs: usize,
    pub list_properties: usize,
    pub create_property: usize,
    pub update_property: usize,
    pub delete_property: usize,
    pub list_bookings: usize,
    pub update_booking_status: usize,
    pub browse_properties: usize,
    pub my_bookings: usize,
    pub create_booking: usize,
}

impl CallCounts {
    /// Total number of API calls made.
    pub fn total(&self) -> usize {
        self.dashboard_stats
            + self.list_agents
            + self.get_agent
            + self.set_agent_verified
            + self.set_agent_active
            + self.delete_agent
            + self.list_users
            + self.delete_user
            + self.list_approval_requests
            + self.approve_agent
            + self.reject_agent
            + self.get_profile
            + self.update_profile
            + self.approval_status
            + self.submit_approval_request
            + self.phone_number
            + self.voice_agent
            + self.create_voice_agent
            + self.list_call_logs
            + self.list_properties
            + self.create_property
            + self.update_property
            + self.delete_property
            + self.list_bookings
            + self.update_booking_status
            + self.browse_properties
            + self.my_bookings
            + self.create_booking
    }
}

impl MockPropTalkClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn with_stats(self, stats: DashboardStats) -> Self {
        *self.stats.lock().await = stats;
        self
    }

    pub async fn with_agents(self, agents: Vec<Agent>) -> Self {
        *self.agents.lock().await = agents;
        self
    }

    pub async fn with_users(self, users: Vec<User>) -> Self {
        *self.users.lock().await = users;
        self
    }

    pub async fn with_approvals(self, approvals: Vec<ApprovalRequest>) -> Self {
        *self.approvals.lock().await = approvals;
        self
    }

    pub async fn with_profile(self, profile: AgentProfile) -> Self {
        *self.profile.lock().await = Some(profile);
        self
    }

    pub async fn with_approval_status(self, status: ApprovalStatus) -> Self {
        *self.approval_status.lock().await = Some(status);
        self
    }

    pub async fn with_phone_number(self, number: PhoneNumber) -> Self {
        *self.phone_number.lock().await = Some(number);
        self
    }

    pub async fn with_voice_agent(self, agent: VoiceAgent) -> Self {
        *self.voice_agent.lock().await = Some(agent);
        self
    }

    pub async fn with_call_logs(self, logs: Vec<CallLog>) -> Self {
        *self.call_logs.lock().await = logs;
        self
    }

    /// Listings owned by the signed-in agent
    pub async fn with_properties(self, properties: Vec<Property>) -> Self {
        *self.properties.lock().await = properties;
        self
    }

    /// Public listings returned by `browse_properties`
    pub async fn with_listings(self, listings: Vec<Property>) -> Self {
        *self.listings.lock().await = listings;
        self
    }

    pub async fn with_bookings(self, bookings: Vec<Booking>) -> Self {
        *self.bookings.lock().await = bookings;
        self
    }

    pub async fn with_my_bookings(self, bookings: Vec<Booking>) -> Self {
        *self.my_bookings.lock().await = bookings;
        self
    }

    /// Delay every call by `latency` (after it has been counted).
    pub async fn with_latency(self, latency: Duration) -> Self {
        *self.latency.lock().await = Some(latency);
        self
    }

    /// Configure an error for the next API call.
    pub async fn with_error(self, error: ApiError) -> Self {
        self.fail_next(error).await;
        self
    }

    /// Queue an error; each queued error is consumed by exactly one call.
    pub async fn fail_next(&self, error: ApiError) {
        self.errors.lock().await.push_back(error);
    }

    /// Replace the call log server-side, as new calls come in.
    pub async fn set_call_logs(&self, logs: Vec<CallLog>) {
        *self.call_logs.lock().await = logs;
    }

    pub async fn set_stats(&self, stats: DashboardStats) {
        *self.stats.lock().await = stats;
    }

    pub async fn call_counts(&self) -> CallCounts {
        self.call_count.lock().await.clone()
    }

    /// Count the call, consume a queued error and apply latency.
    ///
    /// The count is taken before any delay so tests can observe in-flight
    /// requests.
    async fn begin(&self, count: impl FnOnce(&mut CallCounts)) -> Result<()> {
        count(&mut *self.call_count.lock().await);
        let error = self.errors.lock().await.pop_front();

        let latency = *self.latency.lock().await;
        if let Some(latency) = latency {
            tokio::time::sleep(latency).await;
        }

        match error {
            Some(e) => Err(e.into()),
            None => Ok(()),
        }
    }
}

fn not_found(kind: &str, id: &str) -> crate::error::Error {
    ApiError::NotFound(format!("{} not found: {}", kind, id)).into()
}

fn matches_search(term: &str, fields: &[&str]) -> bool {
    let term = term.to_lowercase();
    fields.iter().any(|f| f.to_lowercase().contains(&term))
}

// ============================================================================
// AdminApi Implementation
// ============================================================================

#[async_trait]
impl AdminApi for MockPropTalkClient {
    async fn dashboard_stats(&self) -> Result<DashboardStats> {
        self.begin(|c| c.dashboard_stats += 1).await?;
        Ok(self.stats.lock().await.clone())
    }

    async fn list_agents(&self, filters: &AgentFilters) -> Result<Vec<Agent>> {
        self.begin(|c| c.list_agents += 1).await?;

        let agents = self.agents.lock().await;
        Ok(agents
            .iter()
            .filter(|a| {
                filters
                    .search
                    .as_deref()
                    .is_none_or(|term| matches_search(term, &[&a.full_name, &a.email]))
            })
            .filter(|a| filters.verified.is_none_or(|v| a.is_verified == v))
            .filter(|a| filters.active.is_none_or(|v| a.is_active == v))
            .cloned()
            .collect())
    }

    async fn get_agent(&self, agent_id: &str) -> Result<Agent> {
        self.begin(|c| c.get_agent += 1).await?;

        let agents = self.agents.lock().await;
        agents
            .iter()
            .find(|a| a.id == agent_id)
            .cloned()
            .ok_or_else(|| not_found("Agent", agent_id))
    }

    async fn set_agent_verified(&self, agent_id: &str, verified: bool) -> Result<Agent> {
        self.begin(|c| c.set_agent_verified += 1).await?;

        let mut agents = self.agents.lock().await;
        let agent = agents
            .iter_mut()
            .find(|a| a.id == agent_id)
            .ok_or_else(|| not_found("Agent", agent_id))?;
        agent.is_verified = verified;
        Ok(agent.clone())
    }

    async fn set_agent_active(&self, agent_id: &str, active: bool) -> Result<Agent> {
        self.begin(|c| c.set_agent_active += 1).await?;

        let mut agents = self.agents.lock().await;
        let agent = agents
            .iter_mut()
            .find(|a| a.id == agent_id)
            .ok_or_else(|| not_found("Agent", agent_id))?;
        agent.is_active = active;
        Ok(agent.clone())
    }

    async fn delete_agent(&self, agent_id: &str) -> Result<()> {
        self.begin(|c| c.delete_agent += 1).await?;

        let mut agents = self.agents.lock().await;
        let initial_len = agents.len();
        agents.retain(|a| a.id != agent_id);
        if agents.len() == initial_len {
            return Err(not_found("Agent", agent_id));
        }
        Ok(())
    }

    async fn list_users(&self, search: Option<&str>) -> Result<Vec<User>> {
        self.begin(|c| c.list_users += 1).await?;

        let users = self.users.lock().await;
        Ok(users
            .iter()
            .filter(|u| search.is_none_or(|term| matches_search(term, &[&u.full_name, &u.email])))
            .cloned()
            .collect())
    }

    async fn delete_user(&self, user_id: &str) -> Result<()> {
        self.begin(|c| c.delete_user += 1).await?;

        let mut users = self.users.lock().await;
        let initial_len = users.len();
        users.retain(|u| u.id != user_id);
        if users.len() == initial_len {
            return Err(not_found("User", user_id));
        }
        Ok(())
    }

    async fn list_approval_requests(&self) -> Result<Vec<ApprovalRequest>> {
        self.begin(|c| c.list_approval_requests += 1).await?;
        Ok(self.approvals.lock().await.clone())
    }

    async fn approve_agent(&self, request_id: &str) -> Result<ApprovalRequest> {
        self.begin(|c| c.approve_agent += 1).await?;
        self.review(request_id, ApprovalState::Approved, None).await
    }

    async fn reject_agent(&self, request_id: &str, reason: &str) -> Result<ApprovalRequest> {
        self.begin(|c| c.reject_agent += 1).await?;
        self.review(request_id, ApprovalState::Rejected, Some(reason.to_string()))
            .await
    }
}

impl MockPropTalkClient {
    /// Resolve an approval request and mirror the outcome onto the agent.
    async fn review(
        &self,
        request_id: &str,
        state: ApprovalState,
        reason: Option<String>,
    ) -> Result<ApprovalRequest> {
        let mut approvals = self.approvals.lock().await;
        let request = approvals
            .iter_mut()
            .find(|r| r.id == request_id)
            .ok_or_else(|| not_found("Approval request", request_id))?;
        request.status = state;
        request.rejection_reason = reason;
        let request = request.clone();
        drop(approvals);

        if state == ApprovalState::Approved {
            let mut agents = self.agents.lock().await;
            if let Some(agent) = agents.iter_mut().find(|a| a.id == request.agent_id) {
                agent.is_verified = true;
            }
        }

        Ok(request)
    }
}

// ============================================================================
// AgentApi Implementation
// ============================================================================

#[async_trait]
impl AgentApi for MockPropTalkClient {
    async fn get_profile(&self) -> Result<AgentProfile> {
        self.begin(|c| c.get_profile += 1).await?;

        self.profile
            .lock()
            .await
            .clone()
            .ok_or_else(|| not_found("Profile", "me"))
    }

    async fn update_profile(&self, request: &UpdateProfileRequest) -> Result<AgentProfile> {
        self.begin(|c| c.update_profile += 1).await?;

        let mut profile = self.profile.lock().await;
        let profile = profile
            .as_mut()
            .ok_or_else(|| not_found("Profile", "me"))?;
        if let Some(ref name) = request.full_name {
            profile.full_name = name.clone();
        }
        if let Some(ref phone) = request.phone {
            profile.phone = Some(phone.clone());
        }
        if let Some(ref agency) = request.agency_name {
            profile.agency_name = Some(agency.clone());
        }
        if let Some(ref bio) = request.bio {
            profile.bio = Some(bio.clone());
        }
        Ok(profile.clone())
    }

    async fn approval_status(&self) -> Result<ApprovalStatus> {
        self.begin(|c| c.approval_status += 1).await?;

        self.approval_status
            .lock()
            .await
            .clone()
            .ok_or_else(|| ApiError::NotFound("No approval request submitted".to_string()).into())
    }

    async fn submit_approval_request(
        &self,
        _request: &SubmitApprovalRequest,
    ) -> Result<ApprovalStatus> {
        self.begin(|c| c.submit_approval_request += 1).await?;

        let status = ApprovalStatus {
            status: ApprovalState::Pending,
            submitted_at: Some(chrono::Utc::now()),
            reviewed_at: None,
            rejection_reason: None,
        };
        *self.approval_status.lock().await = Some(status.clone());
        Ok(status)
    }

    async fn phone_number(&self) -> Result<PhoneNumber> {
        self.begin(|c| c.phone_number += 1).await?;

        self.phone_number
            .lock()
            .await
            .clone()
            .ok_or_else(|| not_found("Phone number", "me"))
    }

    async fn voice_agent(&self) -> Result<VoiceAgent> {
        self.begin(|c| c.voice_agent += 1).await?;

        self.voice_agent
            .lock()
            .await
            .clone()
            .ok_or_else(|| ApiError::NotFound("Voice agent not configured".to_string()).into())
    }

    async fn create_voice_agent(&self, request: &CreateVoiceAgentRequest) -> Result<VoiceAgent> {
        self.begin(|c| c.create_voice_agent += 1).await?;

        let agent = VoiceAgent {
            id: "mock-voice-1".to_string(),
            name: request.name.clone(),
            voice: request.voice.clone(),
            greeting: request.greeting.clone(),
            is_active: true,
        };
        *self.voice_agent.lock().await = Some(agent.clone());
        Ok(agent)
    }

    async fn list_call_logs(&self) -> Result<Vec<CallLog>> {
        self.begin(|c| c.list_call_logs += 1).await?;
        Ok(self.call_logs.lock().await.clone())
    }

    async fn list_properties(&self) -> Result<Vec<Property>> {
        self.begin(|c| c.list_properties += 1).await?;
        Ok(self.properties.lock().await.clone())
    }

    async fn create_property(&self, request: &CreatePropertyRequest) -> Result<Property> {
        self.begin(|c| c.create_property += 1).await?;

        let mut properties = self.properties.lock().await;
        let property = Property {
            id: format!("mock-property-{}", properties.len() + 1),
            title: request.title.clone(),
            address: request.address.clone(),
            city: request.city.clone(),
            price: request.price,
            bedrooms: request.bedrooms,
            bathrooms: request.bathrooms,
            property_type: request.property_type.clone(),
            status: Default::default(),
            description: request.description.clone(),
        };
        properties.push(property.clone());
        Ok(property)
    }

    async fn update_property(
        &self,
        property_id: &str,
        request: &UpdatePropertyRequest,
    ) -> Result<Property> {
        self.begin(|c| c.update_property += 1).await?;

        let mut properties = self.properties.lock().await;
        let property = properties
            .iter_mut()
            .find(|p| p.id == property_id)
            .ok_or_else(|| not_found("Property", property_id))?;
        if let Some(ref title) = request.title {
            property.title = title.clone();
        }
        if let Some(price) = request.price {
            property.price = price;
        }
        if let Some(status) = request.status {
            property.status = status;
        }
        if let Some(ref description) = request.description {
            property.description = Some(description.clone());
        }
        Ok(property.clone())
    }

    async fn delete_property(&self, property_id: &str) -> Result<()> {
        self.begin(|c| c.delete_property += 1).await?;

        let mut properties = self.properties.lock().await;
        let initial_len = properties.len();
        properties.retain(|p| p.id != property_id);
        if properties.len() == initial_len {
            return Err(not_found("Property", property_id));
        }
        Ok(())
    }

    async fn list_bookings(&self) -> Result<Vec<Booking>> {
        self.begin(|c| c.list_bookings += 1).await?;
        Ok(self.bookings.lock().await.clone())
    }

    async fn update_booking_status(
        &self,
        booking_id: &str,
        request: &UpdateBookingStatusRequest,
    ) -> Result<Booking> {
        self.begin(|c| c.update_booking_status += 1).await?;

        let mut bookings = self.bookings.lock().await;
        let booking = bookings
            .iter_mut()
            .find(|b| b.id == booking_id)
            .ok_or_else(|| not_found("Booking", booking_id))?;
        booking.status = request.status;
        Ok(booking.clone())
    }
}

// ============================================================================
// UserApi Implementation
// ============================================================================

#[async_trait]
impl UserApi for MockPropTalkClient {
    async fn browse_properties(&self, search: Option<&str>) -> Result<Vec<Property>> {
        self.begin(|c| c.browse_properties += 1).await?;

        let listings = self.listings.lock().await;
        Ok(listings
            .iter()
            .filter(|p| search.is_none_or(|term| matches_search(term, &[&p.title, &p.city])))
            .cloned()
            .collect())
    }

    async fn my_bookings(&self) -> Result<Vec<Booking>> {
        self.begin(|c| c.my_bookings += 1).await?;
        Ok(self.my_bookings.lock().await.clone())
    }

    async fn create_booking(&self, request: &CreateBookingRequest) -> Result<Booking> {
        self.begin(|c| c.create_booking += 1).await?;

        let title = self
            .listings
            .lock()
            .await
            .iter()
            .find(|p| p.id == request.property_id)
            .map(|p| p.title.clone());

        let mut bookings = self.my_bookings.lock().await;
        let booking = Booking {
            id: format!("mock-booking-{}", bookings.len() + 1),
            property_id: request.property_id.clone(),
            property_title: title,
            user_name: None,
            scheduled_at: request.scheduled_at,
            status: BookingStatus::Pending,
            notes: request.notes.clone(),
        };
        bookings.push(booking.clone());
        Ok(booking)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::fixtures::{AgentBuilder, approval_request};

    #[tokio::test]
    async fn test_mock_client_default_empty() {
        let mock = MockPropTalkClient::new();

        assert!(mock.list_agents(&AgentFilters::new()).await.unwrap().is_empty());
        assert!(mock.approval_status().await.unwrap_err().is_not_found());
        assert!(mock.voice_agent().await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_mock_client_filters_agents() {
        let mock = MockPropTalkClient::new()
            .with_agents(vec![
                AgentBuilder::new("a1").name("Jo Smith").build(),
                AgentBuilder::new("a2").name("Ana Silva").unverified().build(),
                AgentBuilder::new("a3").name("Sam Smithers").inactive().build(),
            ])
            .await;

        let smiths = mock
            .list_agents(&AgentFilters::new().search("smith"))
            .await
            .unwrap();
        assert_eq!(smiths.len(), 2);

        let unverified = mock
            .list_agents(&AgentFilters::new().verified(Some(false)))
            .await
            .unwrap();
        assert_eq!(unverified.len(), 1);
        assert_eq!(unverified[0].id, "a2");

        let active_smiths = mock
            .list_agents(&AgentFilters::new().search("smith").active(Some(true)))
            .await
            .unwrap();
        assert_eq!(active_smiths.len(), 1);
    }

    #[tokio::test]
    async fn test_mock_client_error_consumed_once() {
        let mock = MockPropTalkClient::new()
            .with_error(ApiError::Forbidden("Admins only".to_string()))
            .await;

        assert!(mock.dashboard_stats().await.is_err());
        assert!(mock.dashboard_stats().await.is_ok());

        let counts = mock.call_counts().await;
        assert_eq!(counts.dashboard_stats, 2);
        assert_eq!(counts.total(), 2);
    }

    #[tokio::test]
    async fn test_mock_approve_verifies_agent() {
        let mock = MockPropTalkClient::new()
            .with_agents(vec![AgentBuilder::new("a1").unverified().build()])
            .await
            .with_approvals(vec![approval_request("r1", "a1")])
            .await;

        let request = mock.approve_agent("r1").await.unwrap();

        assert_eq!(request.status, ApprovalState::Approved);
        assert!(mock.get_agent("a1").await.unwrap().is_verified);
    }

    #[tokio::test]
    async fn test_mock_delete_missing_is_not_found() {
        let mock = MockPropTalkClient::new();
        assert!(mock.delete_property("nope").await.unwrap_err().is_not_found());
    }
}
