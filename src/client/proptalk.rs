//! PropTalk API client implementation

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use log::debug;
use reqwest::{Client as HttpClient, Method, RequestBuilder, Response, StatusCode, Url};
use serde::Serialize;
use serde::de::DeserializeOwned;

use super::models::{
    Agent, AgentFilters, AgentProfile, ApprovalRequest, ApprovalStatus, Booking, CallLog,
    CreateBookingRequest, CreatePropertyRequest, CreateVoiceAgentRequest, DashboardStats,
    PhoneNumber, Property, RejectAgentRequest, SubmitApprovalRequest, UpdateBookingStatusRequest,
    UpdateProfileRequest, UpdatePropertyRequest, User, VoiceAgent,
};
use super::{AdminApi, AgentApi, Role, TokenStore, UserApi};
use crate::error::{ApiError, ConfigError, Result, ValidationError};

/// Default backend for local development
pub const DEFAULT_API_URL: &str = "http://localhost:8000";

/// Transport-level timeout; the cache layer itself never times out a fetch.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// HTTP client for the PropTalk backend
pub struct PropTalkClient {
    http: HttpClient,
    base_url: Url,
    tokens: Arc<dyn TokenStore>,
}

/// Error body returned by the backend on failure
#[derive(serde::Deserialize)]
struct ErrorBody {
    detail: serde_json::Value,
}

impl PropTalkClient {
    /// Create a client for the given base URL
    pub fn new(base_url: impl Into<String>, tokens: Arc<dyn TokenStore>) -> Result<Self> {
        let http = HttpClient::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| ApiError::Network(e.to_string()))?;

        let raw = base_url.into();
        let base_url = Url::parse(raw.trim_end_matches('/'))
            .map_err(|e| ConfigError::Invalid(format!("API URL '{}': {}", raw, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(ConfigError::Invalid(format!("API URL '{}' cannot carry a path", raw)).into());
        }

        Ok(Self {
            http,
            base_url,
            tokens,
        })
    }

    /// Endpoint URL under the base, one percent-encoded segment per entry.
    ///
    /// Empty, `.` and `..` segments are rejected so an identifier can never
    /// address a different resource.
    fn url(&self, segments: &[&str]) -> Result<Url> {
        if let Some(bad) = segments
            .iter()
            .find(|s| s.trim().is_empty() || **s == "." || **s == "..")
        {
            return Err(ValidationError::new("id", format!("'{}' is not a valid identifier", bad)).into());
        }

        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ConfigError::Invalid(format!("API URL '{}' cannot carry a path", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Build a request signed with the role's bearer token
    fn builder(&self, role: Role, method: Method, url: Url) -> Result<RequestBuilder> {
        let token = self
            .tokens
            .token(role)
            .ok_or(ConfigError::MissingToken(role))?;

        Ok(self.http.request(method, url).bearer_auth(token))
    }

    async fn get<T: DeserializeOwned>(
        &self,
        role: Role,
        path: &[&str],
        query: &[(&str, String)],
    ) -> Result<T> {
        let url = self.url(path)?;
        let request = self.builder(role, Method::GET, url)?.query(query);
        let response = self.execute(request).await?;
        decode(response).await
    }

    async fn send<T, B>(&self, role: Role, method: Method, path: &[&str], body: &B) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let url = self.url(path)?;
        let request = self.builder(role, method, url)?.json(body);
        let response = self.execute(request).await?;
        decode(response).await
    }

    async fn post_empty<T: DeserializeOwned>(&self, role: Role, path: &[&str]) -> Result<T> {
        let url = self.url(path)?;
        let request = self.builder(role, Method::POST, url)?;
        let response = self.execute(request).await?;
        decode(response).await
    }

    async fn delete(&self, role: Role, path: &[&str]) -> Result<()> {
        let url = self.url(path)?;
        let request = self.builder(role, Method::DELETE, url)?;
        self.execute(request).await?;
        Ok(())
    }

    /// Send the request and map non-success statuses to `ApiError`
    async fn execute(&self, request: RequestBuilder) -> Result<Response> {
        let response = request.send().await.map_err(ApiError::from)?;
        let status = response.status();
        debug!("{} -> {}", response.url().path(), status);

        if status.is_success() {
            return Ok(response);
        }

        match status {
            StatusCode::UNAUTHORIZED => {
                let message = error_detail(response, "Not authenticated").await;
                Err(ApiError::Unauthorized(message).into())
            }
            StatusCode::FORBIDDEN => {
                let message = error_detail(response, "Not allowed for this role").await;
                Err(ApiError::Forbidden(message).into())
            }
            StatusCode::NOT_FOUND => {
                let message = error_detail(response, "Resource not found").await;
                Err(ApiError::NotFound(message).into())
            }
            StatusCode::TOO_MANY_REQUESTS => {
                let retry_after = response
                    .headers()
                    .get("retry-after")
                    .and_then(|v| v.to_str().ok())
                    .and_then(|v| v.parse::<u64>().ok())
                    .unwrap_or(60);
                Err(ApiError::RateLimit(Duration::from_secs(retry_after)).into())
            }
            StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
                let message = error_detail(response, "Bad request").await;
                Err(ApiError::BadRequest {
                    status: status.as_u16(),
                    message,
                }
                .into())
            }
            status if status.is_server_error() => {
                let message = error_detail(response, "Internal server error").await;
                Err(ApiError::ServerError {
                    status: status.as_u16(),
                    message,
                }
                .into())
            }
            status => {
                let message = error_detail(response, "Unexpected status").await;
                Err(ApiError::Status {
                    status: status.as_u16(),
                    message,
                }
                .into())
            }
        }
    }
}

/// Decode a success body into the endpoint's schema
async fn decode<T: DeserializeOwned>(response: Response) -> Result<T> {
    let body = response.text().await.map_err(ApiError::from)?;
    serde_json::from_str(&body).map_err(|e| {
        ApiError::InvalidResponse(format!("Failed to parse response: {}", e)).into()
    })
}

/// Extract the server message from a `{ "detail": ... }` error body.
///
/// Validation failures carry a structured `detail`; those are rendered as
/// JSON. Bodies that are not JSON are used verbatim.
async fn error_detail(response: Response, fallback: &str) -> String {
    let body = match response.text().await {
        Ok(body) if !body.trim().is_empty() => body,
        _ => return fallback.to_string(),
    };

    match serde_json::from_str::<ErrorBody>(&body) {
        Ok(ErrorBody {
            detail: serde_json::Value::String(detail),
        }) => detail,
        Ok(ErrorBody { detail }) => detail.to_string(),
        Err(_) => body,
    }
}

fn search_query(search: Option<&str>) -> Vec<(&'static str, String)> {
    search
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| vec![("search", s.to_string())])
        .unwrap_or_default()
}

#[async_trait]
impl AdminApi for PropTalkClient {
    async fn dashboard_stats(&self) -> Result<DashboardStats> {
        self.get(Role::Admin, &["admin", "dashboard", "stats"], &[]).await
    }

    async fn list_agents(&self, filters: &AgentFilters) -> Result<Vec<Agent>> {
        self.get(Role::Admin, &["admin", "agents"], &filters.to_query())
            .await
    }

    async fn get_agent(&self, agent_id: &str) -> Result<Agent> {
        self.get(Role::Admin, &["admin", "agents", agent_id], &[]).await
    }

    async fn set_agent_verified(&self, agent_id: &str, verified: bool) -> Result<Agent> {
        let body = serde_json::json!({ "is_verified": verified });
        self.send(Role::Admin, Method::PATCH, &["admin", "agents", agent_id, "verify"], &body)
            .await
    }

    async fn set_agent_active(&self, agent_id: &str, active: bool) -> Result<Agent> {
        let body = serde_json::json!({ "is_active": active });
        self.send(Role::Admin, Method::PATCH, &["admin", "agents", agent_id, "status"], &body)
            .await
    }

    async fn delete_agent(&self, agent_id: &str) -> Result<()> {
        self.delete(Role::Admin, &["admin", "agents", agent_id]).await
    }

    async fn list_users(&self, search: Option<&str>) -> Result<Vec<User>> {
        self.get(Role::Admin, &["admin", "users"], &search_query(search))
            .await
    }

    async fn delete_user(&self, user_id: &str) -> Result<()> {
        self.delete(Role::Admin, &["admin", "users", user_id]).await
    }

    async fn list_approval_requests(&self) -> Result<Vec<ApprovalRequest>> {
        self.get(Role::Admin, &["admin", "approvals"], &[]).await
    }

    async fn approve_agent(&self, request_id: &str) -> Result<ApprovalRequest> {
        self.post_empty(Role::Admin, &["admin", "approvals", request_id, "approve"])
            .await
    }

    async fn reject_agent(&self, request_id: &str, reason: &str) -> Result<ApprovalRequest> {
        let body = RejectAgentRequest {
            reason: reason.to_string(),
        };
        self.send(Role::Admin, Method::POST, &["admin", "approvals", request_id, "reject"], &body)
            .await
    }
}

#[async_trait]
impl AgentApi for PropTalkClient {
    async fn get_profile(&self) -> Result<AgentProfile> {
        self.get(Role::Agent, &["agent", "profile"], &[]).await
    }

    async fn update_profile(&self, request: &UpdateProfileRequest) -> Result<AgentProfile> {
        self.send(Role::Agent, Method::PATCH, &["agent", "profile"], request)
            .await
    }

    async fn approval_status(&self) -> Result<ApprovalStatus> {
        self.get(Role::Agent, &["agent", "approval-status"], &[]).await
    }

    async fn submit_approval_request(
        &self,
        request: &SubmitApprovalRequest,
    ) -> Result<ApprovalStatus> {
        self.send(Role::Agent, Method::POST, &["agent", "approval-request"], request)
            .await
    }

    async fn phone_number(&self) -> Result<PhoneNumber> {
        self.get(Role::Agent, &["agent", "phone-number"], &[]).await
    }

    async fn voice_agent(&self) -> Result<VoiceAgent> {
        self.get(Role::Agent, &["agent", "voice-agent"], &[]).await
    }

    async fn create_voice_agent(&self, request: &CreateVoiceAgentRequest) -> Result<VoiceAgent> {
        self.send(Role::Agent, Method::POST, &["agent", "voice-agent"], request)
            .await
    }

    async fn list_call_logs(&self) -> Result<Vec<CallLog>> {
        self.get(Role::Agent, &["agent", "call-logs"], &[]).await
    }

    async fn list_properties(&self) -> Result<Vec<Property>> {
        self.get(Role::Agent, &["agent", "properties"], &[]).await
    }

    async fn create_property(&self, request: &CreatePropertyRequest) -> Result<Property> {
        self.send(Role::Agent, Method::POST, &["agent", "properties"], request)
            .await
    }

    async fn update_property(
        &self,
        property_id: &str,
        request: &UpdatePropertyRequest,
    ) -> Result<Property> {
        self.send(Role::Agent, Method::PATCH, &["agent", "properties", property_id], request)
            .await
    }

    async fn delete_property(&self, property_id: &str) -> Result<()> {
        self.delete(Role::Agent, &["agent", "properties", property_id])
            .await
    }

    async fn list_bookings(&self) -> Result<Vec<Booking>> {
        self.get(Role::Agent, &["agent", "bookings"], &[]).await
    }

    async fn update_booking_status(
        &self,
        booking_id: &str,
        request: &UpdateBookingStatusRequest,
    ) -> Result<Booking> {
        self.send(Role::Agent, Method::PATCH, &["agent", "bookings", booking_id], request)
            .await
    }
}

#[async_trait]
impl UserApi for PropTalkClient {
    async fn browse_properties(&self, search: Option<&str>) -> Result<Vec<Property>> {
        self.get(Role::User, &["properties"], &search_query(search))
            .await
    }

    async fn my_bookings(&self) -> Result<Vec<Booking>> {
        self.get(Role::User, &["user", "bookings"], &[]).await
    }

    async fn create_booking(&self, request: &CreateBookingRequest) -> Result<Booking> {
        self.send(Role::User, Method::POST, &["user", "bookings"], request)
            .await
    }
}
