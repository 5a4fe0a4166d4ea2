//! Viewing booking models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Validate, require_text};
use crate::error::ValidationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Cancelled,
    Completed,
}

impl std::fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Cancelled => "cancelled",
            BookingStatus::Completed => "completed",
        };
        f.write_str(s)
    }
}

impl std::str::FromStr for BookingStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pending" => Ok(BookingStatus::Pending),
            "confirmed" => Ok(BookingStatus::Confirmed),
            "cancelled" | "canceled" => Ok(BookingStatus::Cancelled),
            "completed" => Ok(BookingStatus::Completed),
            other => Err(format!(
                "unknown booking status '{other}' (expected pending, confirmed, cancelled or completed)"
            )),
        }
    }
}

/// Property viewing booked by an end user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Booking {
    pub id: String,
    pub property_id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub property_title: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_name: Option<String>,

    pub scheduled_at: DateTime<Utc>,
    pub status: BookingStatus,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct UpdateBookingStatusRequest {
    pub status: BookingStatus,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateBookingRequest {
    pub property_id: String,
    pub scheduled_at: DateTime<Utc>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl CreateBookingRequest {
    /// Validate against an explicit clock.
    pub fn validate_at(&self, now: DateTime<Utc>) -> Result<(), ValidationError> {
        require_text("property_id", &self.property_id)?;
        if self.scheduled_at <= now {
            return Err(ValidationError::new(
                "scheduled_at",
                "must be in the future",
            ));
        }
        Ok(())
    }
}

impl Validate for CreateBookingRequest {
    fn validate(&self) -> Result<(), ValidationError> {
        self.validate_at(Utc::now())
    }
}
