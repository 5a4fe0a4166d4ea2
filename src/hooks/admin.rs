//! Admin portal queries

use crate::client::models::{Agent, AgentFilters, ApprovalRequest, DashboardStats, User};
use crate::query::{QueryClient, QueryObserver, RefetchOnMount};

use super::{Api, PollInterval, StaleTime, fetcher, keys, query_options};

/// Read side of the admin portal
#[derive(Clone)]
pub struct AdminQueries {
    client: QueryClient,
    api: Api,
}

impl AdminQueries {
    pub fn new(client: &QueryClient, api: Api) -> Self {
        Self {
            client: client.clone(),
            api,
        }
    }

    /// Platform counters, polled while visible
    pub fn dashboard_stats(&self) -> QueryObserver<DashboardStats> {
        QueryObserver::new(
            &self.client,
            keys::admin_stats(),
            fetcher(&self.api, |api| async move { api.dashboard_stats().await }),
            query_options()
                .stale_time(StaleTime::STATS)
                .refetch_interval(PollInterval::STATS),
        )
    }

    /// Agent list for one filter combination; every combination is cached
    /// separately.
    pub fn agents(&self, filters: &AgentFilters) -> QueryObserver<Vec<Agent>> {
        let query_filters = filters.clone();
        QueryObserver::new(
            &self.client,
            keys::admin_agent_list(filters),
            fetcher(&self.api, move |api| {
                let filters = query_filters.clone();
                async move { api.list_agents(&filters).await }
            }),
            query_options().stale_time(StaleTime::AGENTS),
        )
    }

    /// Single agent, always refetched on open so moderation acts on
    /// current data
    pub fn agent(&self, agent_id: &str) -> QueryObserver<Agent> {
        let id = agent_id.to_string();
        QueryObserver::new(
            &self.client,
            keys::admin_agent(agent_id),
            fetcher(&self.api, move |api| {
                let id = id.clone();
                async move { api.get_agent(&id).await }
            }),
            query_options()
                .stale_time(StaleTime::AGENTS)
                .refetch_on_mount(RefetchOnMount::Always),
        )
    }

    /// User list; blank and padded search terms share the trimmed entry.
    pub fn users(&self, search: Option<&str>) -> QueryObserver<Vec<User>> {
        let term = search
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string);
        QueryObserver::new(
            &self.client,
            keys::admin_user_list(term.as_deref()),
            fetcher(&self.api, move |api| {
                let term = term.clone();
                async move { api.list_users(term.as_deref()).await }
            }),
            query_options().stale_time(StaleTime::USERS),
        )
    }

    /// Pending approval queue, polled while visible
    pub fn approval_requests(&self) -> QueryObserver<Vec<ApprovalRequest>> {
        QueryObserver::new(
            &self.client,
            keys::admin_approvals(),
            fetcher(&self.api, |api| async move { api.list_approval_requests().await }),
            query_options()
                .stale_time(StaleTime::APPROVALS)
                .refetch_interval(PollInterval::APPROVALS),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::MockPropTalkClient;
    use crate::client::fixtures::{AgentBuilder, user};
    use crate::error::ApiError;
    use std::sync::Arc;

    async fn queries(mock: MockPropTalkClient) -> (Arc<MockPropTalkClient>, AdminQueries) {
        let mock = Arc::new(mock);
        let api: Api = mock.clone();
        (mock, AdminQueries::new(&QueryClient::new(), api))
    }

    #[tokio::test(start_paused = true)]
    async fn test_filtered_lists_are_cached_independently() {
        let (mock, admin) = queries(
            MockPropTalkClient::new()
                .with_agents(vec![
                    AgentBuilder::new("a1").name("Jo Smith").build(),
                    AgentBuilder::new("a2").name("Ana Silva").build(),
                ])
                .await,
        )
        .await;

        let mut all = admin.agents(&AgentFilters::new());
        let mut smiths = admin.agents(&AgentFilters::new().search("smith"));

        assert_eq!(all.settled().await.data.unwrap().len(), 2);
        assert_eq!(smiths.settled().await.data.unwrap().len(), 1);
        assert_eq!(mock.call_counts().await.list_agents, 2);

        // Same filters again: served from cache while fresh.
        let mut again = admin.agents(&AgentFilters::new().search("smith"));
        assert_eq!(again.settled().await.data.unwrap().len(), 1);
        assert_eq!(mock.call_counts().await.list_agents, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_filtered_empty_result_is_success() {
        let (_mock, admin) = queries(MockPropTalkClient::new()).await;
        let filters = AgentFilters::new().search("smith").verified(Some(true));

        let mut observer = admin.agents(&filters);
        let result = observer.settled().await;

        assert!(result.is_success());
        assert_eq!(result.data, Some(vec![]));
        assert_eq!(
            observer.key().to_string(),
            r#"["admin","agents","smith",true,null]"#
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_agent_detail_always_refetches_on_open() {
        let (mock, admin) = queries(
            MockPropTalkClient::new()
                .with_agents(vec![AgentBuilder::new("a1").build()])
                .await,
        )
        .await;

        admin.agent("a1").settled().await;
        admin.agent("a1").settled().await;

        assert_eq!(mock.call_counts().await.get_agent, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_missing_agent_fails_without_retry() {
        let (mock, admin) = queries(MockPropTalkClient::new()).await;

        let result = admin.agent("a9").settled().await;

        assert!(result.error.unwrap().is_not_found());
        assert_eq!(mock.call_counts().await.get_agent, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_network_failure_is_retried_once() {
        let (mock, admin) = queries(MockPropTalkClient::new()).await;

        mock.fail_next(ApiError::Network("connection reset".to_string()))
            .await;
        assert!(admin.dashboard_stats().settled().await.is_success());
        assert_eq!(mock.call_counts().await.dashboard_stats, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_user_search_is_trimmed() {
        let (mock, admin) = queries(
            MockPropTalkClient::new()
                .with_users(vec![user("u1", "Ana Silva"), user("u2", "Jo Smith")])
                .await,
        )
        .await;

        let mut padded = admin.users(Some("  ana "));
        let mut trimmed = admin.users(Some("ana"));
        assert_eq!(padded.key(), trimmed.key());
        assert_eq!(padded.settled().await.data.unwrap().len(), 1);
        assert_eq!(trimmed.settled().await.data.unwrap().len(), 1);
        assert_eq!(mock.call_counts().await.list_users, 1);

        let mut blank = admin.users(Some("   "));
        let mut all = admin.users(None);
        assert_eq!(blank.key(), all.key());
        assert_eq!(blank.settled().await.data.unwrap().len(), 2);
        assert_eq!(all.settled().await.data.unwrap().len(), 2);
        assert_eq!(mock.call_counts().await.list_users, 2);
    }
}
