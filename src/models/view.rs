//! Render decisions for query results
//!
//! Every list and record view resolves to one of four states. Empty
//! results get a placeholder with a call to action, and the wording tells
//! "nothing matches your filters" apart from "nothing exists yet".

use crate::client::models::AgentFilters;
use crate::query::{QueryError, QueryResult, QueryStatus};

/// Message shown instead of an empty table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placeholder {
    pub title: &'static str,
    pub message: String,
}

impl Placeholder {
    pub fn new(title: &'static str, message: impl Into<String>) -> Self {
        Self {
            title,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone)]
pub enum ViewState<T> {
    Loading,
    Error(QueryError),
    Empty(Placeholder),
    Ready(T),
}

impl<T> ViewState<T> {
    /// Resolve a single-record query. A successful query without data is
    /// empty.
    pub fn record(result: QueryResult<T>, placeholder: impl FnOnce() -> Placeholder) -> Self {
        match (result.data, result.error) {
            (Some(data), _) => ViewState::Ready(data),
            (None, Some(error)) => ViewState::Error(error),
            (None, None) if result.status == QueryStatus::Success => {
                ViewState::Empty(placeholder())
            }
            (None, None) => ViewState::Loading,
        }
    }
}

impl<T> ViewState<Vec<T>> {
    /// Resolve a list query. An empty list is treated like missing data.
    pub fn list(result: QueryResult<Vec<T>>, placeholder: impl FnOnce() -> Placeholder) -> Self {
        let result = QueryResult {
            data: result.data.filter(|items| !items.is_empty()),
            ..result
        };
        ViewState::record(result, placeholder)
    }
}

pub fn agents_placeholder(filters: &AgentFilters) -> Placeholder {
    if filters.is_filtering() {
        Placeholder::new(
            "No Agents Found",
            "No agents match your filters. Try adjusting the search or filters.",
        )
    } else {
        Placeholder::new(
            "No Agents Yet",
            "No agents have registered on the platform yet.",
        )
    }
}

pub fn users_placeholder(search: Option<&str>) -> Placeholder {
    match search {
        Some(term) => Placeholder::new(
            "No Users Found",
            format!("No users match '{}'. Try a different search.", term),
        ),
        None => Placeholder::new("No Users Yet", "No users have signed up yet."),
    }
}

pub fn approvals_placeholder() -> Placeholder {
    Placeholder::new("All Caught Up", "There are no approval requests waiting for review.")
}

pub fn approval_status_placeholder() -> Placeholder {
    Placeholder::new(
        "Not Submitted",
        "You have not requested approval yet. Run `proptalk agent submit-approval` to get verified.",
    )
}

pub fn phone_placeholder(approved: bool) -> Placeholder {
    if approved {
        Placeholder::new("No Number Yet", "A phone number is being assigned to your account.")
    } else {
        Placeholder::new(
            "Approval Required",
            "A phone number is assigned once an admin approves your account.",
        )
    }
}

pub fn voice_agent_placeholder() -> Placeholder {
    Placeholder::new(
        "No Voice Agent",
        "Create one with `proptalk agent create-voice` to start answering calls.",
    )
}

pub fn my_properties_placeholder() -> Placeholder {
    Placeholder::new(
        "No Listings Yet",
        "Add your first listing with `proptalk agent add-property`.",
    )
}

pub fn call_logs_placeholder() -> Placeholder {
    Placeholder::new("No Calls Yet", "Calls answered by your voice agent will appear here.")
}

pub fn agent_bookings_placeholder() -> Placeholder {
    Placeholder::new("No Bookings", "Nobody has booked a viewing of your listings yet.")
}

pub fn browse_placeholder(search: Option<&str>) -> Placeholder {
    match search {
        Some(term) => Placeholder::new(
            "No Properties Found",
            format!("No properties match '{}'. Try a different search.", term),
        ),
        None => Placeholder::new("No Properties Listed", "Check back soon for new listings."),
    }
}

pub fn my_bookings_placeholder() -> Placeholder {
    Placeholder::new(
        "No Bookings",
        "Book a viewing with `proptalk user book <property-id> --at <time>`.",
    )
}
