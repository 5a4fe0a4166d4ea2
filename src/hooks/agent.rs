//! Agent workspace queries

use crate::client::models::{
    AgentProfile, ApprovalStatus, Booking, CallLog, PhoneNumber, Property, VoiceAgent,
};
use crate::query::{QueryClient, QueryObserver};

use super::{Api, PollInterval, StaleTime, fetcher, keys, query_options};

/// Read side of the agent workspace
#[derive(Clone)]
pub struct AgentQueries {
    client: QueryClient,
    api: Api,
}

impl AgentQueries {
    pub fn new(client: &QueryClient, api: Api) -> Self {
        Self {
            client: client.clone(),
            api,
        }
    }

    pub fn profile(&self) -> QueryObserver<AgentProfile> {
        QueryObserver::new(
            &self.client,
            keys::agent_profile(),
            fetcher(&self.api, |api| async move { api.get_profile().await }),
            query_options().stale_time(StaleTime::PROFILE),
        )
    }

    /// Approval status; no data (and no error) until a request is submitted.
    pub fn approval_status(&self) -> QueryObserver<ApprovalStatus> {
        QueryObserver::new(
            &self.client,
            keys::agent_approval_status(),
            fetcher(&self.api, |api| async move { api.approval_status().await }),
            query_options()
                .stale_time(StaleTime::APPROVALS)
                .empty_on_not_found(),
        )
    }

    /// Assigned phone number. Only exists for approved agents, so callers
    /// pass the approval outcome and enable the query once it is known.
    pub fn phone_number(&self, approved: bool) -> QueryObserver<PhoneNumber> {
        QueryObserver::new(
            &self.client,
            keys::agent_phone_number(),
            fetcher(&self.api, |api| async move { api.phone_number().await }),
            query_options()
                .stale_time(StaleTime::TELEPHONY)
                .enabled(approved),
        )
    }

    /// Voice agent; no data (and no error) until one is created.
    pub fn voice_agent(&self) -> QueryObserver<VoiceAgent> {
        QueryObserver::new(
            &self.client,
            keys::agent_voice_agent(),
            fetcher(&self.api, |api| async move { api.voice_agent().await }),
            query_options()
                .stale_time(StaleTime::TELEPHONY)
                .empty_on_not_found(),
        )
    }

    pub fn properties(&self) -> QueryObserver<Vec<Property>> {
        QueryObserver::new(
            &self.client,
            keys::agent_properties(),
            fetcher(&self.api, |api| async move { api.list_properties().await }),
            query_options().stale_time(StaleTime::PROPERTIES),
        )
    }

    /// Call history, polled while visible
    pub fn call_logs(&self) -> QueryObserver<Vec<CallLog>> {
        QueryObserver::new(
            &self.client,
            keys::agent_call_logs(),
            fetcher(&self.api, |api| async move { api.list_call_logs().await }),
            query_options()
                .stale_time(StaleTime::CALL_LOGS)
                .refetch_interval(PollInterval::CALL_LOGS),
        )
    }

    /// Viewings on the agent's listings, polled while visible
    pub fn bookings(&self) -> QueryObserver<Vec<Booking>> {
        QueryObserver::new(
            &self.client,
            keys::agent_bookings(),
            fetcher(&self.api, |api| async move { api.list_bookings().await }),
            query_options()
                .stale_time(StaleTime::BOOKINGS)
                .refetch_interval(PollInterval::BOOKINGS),
        )
    }
}
