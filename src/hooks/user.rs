//! End-user portal queries and mutations

use crate::client::models::{Booking, CreateBookingRequest, Property, Validate};
use crate::query::{Mutation, MutationKind, QueryClient, QueryObserver};

use super::{Api, PollInterval, StaleTime, fetcher, keys, query_options, with_api};

/// The end-user portal: browsing listings and booking viewings
#[derive(Clone)]
pub struct UserQueries {
    client: QueryClient,
    api: Api,
}

impl UserQueries {
    pub fn new(client: &QueryClient, api: Api) -> Self {
        Self {
            client: client.clone(),
            api,
        }
    }

    /// Listed properties; each search term is cached separately.
    pub fn properties(&self, search: Option<&str>) -> QueryObserver<Vec<Property>> {
        let search = search.map(str::trim).filter(|s| !s.is_empty()).map(String::from);
        let key = keys::user_property_search(search.as_deref());
        QueryObserver::new(
            &self.client,
            key,
            fetcher(&self.api, move |api| {
                let search = search.clone();
                async move { api.browse_properties(search.as_deref()).await }
            }),
            query_options().stale_time(StaleTime::PROPERTIES),
        )
    }

    /// The user's viewings, polled while visible
    pub fn bookings(&self) -> QueryObserver<Vec<Booking>> {
        QueryObserver::new(
            &self.client,
            keys::user_bookings(),
            fetcher(&self.api, |api| async move { api.my_bookings().await }),
            query_options()
                .stale_time(StaleTime::BOOKINGS)
                .refetch_interval(PollInterval::BOOKINGS),
        )
    }

    pub fn create_booking(&self) -> Mutation<CreateBookingRequest, Booking> {
        Mutation::new(
            &self.client,
            "book viewing",
            MutationKind::Create,
            with_api(&self.api, |api, request: CreateBookingRequest| async move {
                api.create_booking(&request).await
            }),
        )
        .validate(CreateBookingRequest::validate)
        .invalidates(keys::user_bookings())
    }
}
