//! Admin portal mutations

use crate::client::models::{Agent, ApprovalRequest, RejectAgentRequest, User, Validate};
use crate::query::{Mutation, MutationKind, QueryClient};

use super::{Api, keys, with_api};

/// Write side of the admin portal
#[derive(Clone)]
pub struct AdminMutations {
    client: QueryClient,
    api: Api,
}

impl AdminMutations {
    pub fn new(client: &QueryClient, api: Api) -> Self {
        Self {
            client: client.clone(),
            api,
        }
    }

    /// Grant or revoke verification: `(agent_id, verified)`
    pub fn set_agent_verified(&self) -> Mutation<(String, bool), Agent> {
        Mutation::new(
            &self.client,
            "set agent verification",
            MutationKind::Update,
            with_api(&self.api, |api, (id, verified): (String, bool)| async move {
                api.set_agent_verified(&id, verified).await
            }),
        )
        .invalidates(keys::admin_agents())
        .invalidates(keys::admin_agent_details())
        .invalidates(keys::admin_stats())
    }

    /// Activate or deactivate an account: `(agent_id, active)`
    pub fn set_agent_active(&self) -> Mutation<(String, bool), Agent> {
        Mutation::new(
            &self.client,
            "set agent status",
            MutationKind::Update,
            with_api(&self.api, |api, (id, active): (String, bool)| async move {
                api.set_agent_active(&id, active).await
            }),
        )
        .invalidates(keys::admin_agents())
        .invalidates(keys::admin_agent_details())
        .invalidates(keys::admin_stats())
    }

    /// Delete an agent, removing it from every cached list right away
    pub fn delete_agent(&self) -> Mutation<String, ()> {
        Mutation::new(
            &self.client,
            "delete agent",
            MutationKind::Delete,
            with_api(&self.api, |api, id: String| async move {
                api.delete_agent(&id).await
            }),
        )
        .optimistic(
            vec![keys::admin_agents()],
            |client: &QueryClient, id: &String| {
                client.update_queries_data(&keys::admin_agents(), |agents: Vec<Agent>| {
                    agents.into_iter().filter(|a| &a.id != id).collect()
                });
            },
        )
        .invalidates_on_settle(keys::admin_agents())
        .invalidates_on_settle(keys::admin_stats())
    }

    /// Delete an end user, removing it from every cached list right away
    pub fn delete_user(&self) -> Mutation<String, ()> {
        Mutation::new(
            &self.client,
            "delete user",
            MutationKind::Delete,
            with_api(&self.api, |api, id: String| async move {
                api.delete_user(&id).await
            }),
        )
        .optimistic(
            vec![keys::admin_users()],
            |client: &QueryClient, id: &String| {
                client.update_queries_data(&keys::admin_users(), |users: Vec<User>| {
                    users.into_iter().filter(|u| &u.id != id).collect()
                });
            },
        )
        .invalidates_on_settle(keys::admin_users())
        .invalidates_on_settle(keys::admin_stats())
    }

    pub fn approve_agent(&self) -> Mutation<String, ApprovalRequest> {
        Mutation::new(
            &self.client,
            "approve agent",
            MutationKind::Update,
            with_api(&self.api, |api, request_id: String| async move {
                api.approve_agent(&request_id).await
            }),
        )
        .invalidates(keys::admin_approvals())
        .invalidates(keys::admin_agents())
        .invalidates(keys::admin_stats())
    }

    /// Reject a request: `(request_id, reason)`; the reason is required.
    pub fn reject_agent(&self) -> Mutation<(String, String), ApprovalRequest> {
        Mutation::new(
            &self.client,
            "reject agent",
            MutationKind::Update,
            with_api(&self.api, |api, (request_id, reason): (String, String)| async move {
                api.reject_agent(&request_id, reason.trim()).await
            }),
        )
        .validate(|(_, reason): &(String, String)| {
            RejectAgentRequest {
                reason: reason.clone(),
            }
            .validate()
        })
        .invalidates(keys::admin_approvals())
        .invalidates(keys::admin_stats())
    }
}
