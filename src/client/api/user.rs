//! End-user portal API trait

use async_trait::async_trait;

use crate::client::models::{Booking, CreateBookingRequest, Property};
use crate::error::Result;

/// End-user operations, signed with the user token.
#[async_trait]
pub trait UserApi: Send + Sync {
    /// Browse listed properties
    async fn browse_properties(&self, search: Option<&str>) -> Result<Vec<Property>>;

    /// The user's own viewing bookings
    async fn my_bookings(&self) -> Result<Vec<Booking>>;

    async fn create_booking(&self, request: &CreateBookingRequest) -> Result<Booking>;
}
