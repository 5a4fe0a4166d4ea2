//! Agent portal mutations

use crate::client::models::{
    AgentProfile, ApprovalStatus, Booking, BookingStatus, CreatePropertyRequest,
    CreateVoiceAgentRequest, Property, SubmitApprovalRequest, UpdateBookingStatusRequest,
    UpdateProfileRequest, UpdatePropertyRequest, Validate, VoiceAgent,
};
use crate::query::{Mutation, MutationKind, QueryClient};

use super::{Api, keys, with_api};

/// Write side of the agent workspace
#[derive(Clone)]
pub struct AgentMutations {
    client: QueryClient,
    api: Api,
}

impl AgentMutations {
    pub fn new(client: &QueryClient, api: Api) -> Self {
        Self {
            client: client.clone(),
            api,
        }
    }

    pub fn update_profile(&self) -> Mutation<UpdateProfileRequest, AgentProfile> {
        Mutation::new(
            &self.client,
            "update profile",
            MutationKind::Update,
            with_api(&self.api, |api, request: UpdateProfileRequest| async move {
                api.update_profile(&request).await
            }),
        )
        .validate(UpdateProfileRequest::validate)
        .invalidates(keys::agent_profile())
    }

    /// Submit credentials for review; the new status replaces the cached one.
    pub fn submit_approval(&self) -> Mutation<SubmitApprovalRequest, ApprovalStatus> {
        Mutation::new(
            &self.client,
            "submit approval request",
            MutationKind::Create,
            with_api(&self.api, |api, request: SubmitApprovalRequest| async move {
                api.submit_approval_request(&request).await
            }),
        )
        .validate(SubmitApprovalRequest::validate)
        .invalidates(keys::agent_approval_status())
    }

    pub fn create_voice_agent(&self) -> Mutation<CreateVoiceAgentRequest, VoiceAgent> {
        Mutation::new(
            &self.client,
            "create voice agent",
            MutationKind::Create,
            with_api(&self.api, |api, request: CreateVoiceAgentRequest| async move {
                api.create_voice_agent(&request).await
            }),
        )
        .validate(CreateVoiceAgentRequest::validate)
        .invalidates(keys::agent_voice_agent())
    }

    pub fn create_property(&self) -> Mutation<CreatePropertyRequest, Property> {
        Mutation::new(
            &self.client,
            "create property",
            MutationKind::Create,
            with_api(&self.api, |api, request: CreatePropertyRequest| async move {
                api.create_property(&request).await
            }),
        )
        .validate(CreatePropertyRequest::validate)
        .invalidates(keys::agent_properties())
    }

    /// Edit a listing: `(property_id, changes)`
    pub fn update_property(&self) -> Mutation<(String, UpdatePropertyRequest), Property> {
        Mutation::new(
            &self.client,
            "update property",
            MutationKind::Update,
            with_api(
                &self.api,
                |api, (id, request): (String, UpdatePropertyRequest)| async move {
                    api.update_property(&id, &request).await
                },
            ),
        )
        .validate(|(_, request): &(String, UpdatePropertyRequest)| request.validate())
        .invalidates(keys::agent_properties())
    }

    /// Delete a listing, removing it from the cached list right away
    pub fn delete_property(&self) -> Mutation<String, ()> {
        Mutation::new(
            &self.client,
            "delete property",
            MutationKind::Delete,
            with_api(&self.api, |api, id: String| async move {
                api.delete_property(&id).await
            }),
        )
        .optimistic(
            vec![keys::agent_properties()],
            |client: &QueryClient, id: &String| {
                client.update_queries_data(&keys::agent_properties(), |list: Vec<Property>| {
                    list.into_iter().filter(|p| &p.id != id).collect()
                });
            },
        )
        .invalidates_on_settle(keys::agent_properties())
    }

    /// Confirm, cancel or complete a viewing: `(booking_id, status)`
    pub fn update_booking_status(&self) -> Mutation<(String, BookingStatus), Booking> {
        Mutation::new(
            &self.client,
            "update booking status",
            MutationKind::Update,
            with_api(&self.api, |api, (id, status): (String, BookingStatus)| async move {
                api.update_booking_status(&id, &UpdateBookingStatusRequest { status })
                    .await
            }),
        )
        .optimistic(
            vec![keys::agent_bookings()],
            |client: &QueryClient, (id, status): &(String, BookingStatus)| {
                client.update_queries_data(&keys::agent_bookings(), |list: Vec<Booking>| {
                    list.into_iter()
                        .map(|mut b| {
                            if &b.id == id {
                                b.status = *status;
                            }
                            b
                        })
                        .collect()
                });
            },
        )
        .invalidates_on_settle(keys::agent_bookings())
    }
}
