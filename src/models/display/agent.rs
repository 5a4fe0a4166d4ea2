//! Agent and end-user portal display models

use serde::Serialize;
use tabled::Tabled;

use super::common::{
    DetailRow, format_duration, format_price, format_timestamp, or_empty, truncate_string,
};
use crate::client::models::{
    AgentProfile, ApprovalStatus, Booking, CallLog, PhoneNumber, Property, VoiceAgent,
};

/// Property listing display model for table/JSON output.
#[derive(Debug, Clone, Tabled, Serialize)]
pub struct PropertyDisplay {
    #[tabled(rename = "PROPERTY ID")]
    pub id: String,

    #[tabled(rename = "TITLE")]
    pub title: String,

    #[tabled(rename = "CITY")]
    pub city: String,

    #[tabled(rename = "TYPE")]
    pub property_type: String,

    #[tabled(rename = "BEDS")]
    pub bedrooms: u32,

    #[tabled(rename = "PRICE")]
    pub price: String,

    #[tabled(rename = "STATUS")]
    pub status: String,
}

impl From<&Property> for PropertyDisplay {
    fn from(property: &Property) -> Self {
        Self {
            id: property.id.clone(),
            title: truncate_string(&property.title, 40),
            city: property.city.clone(),
            property_type: property.property_type.clone(),
            bedrooms: property.bedrooms,
            price: format_price(property.price),
            status: property.status.to_string(),
        }
    }
}

/// Call log display model for table/JSON output.
#[derive(Debug, Clone, Tabled, Serialize)]
pub struct CallLogDisplay {
    #[tabled(rename = "STARTED")]
    pub started: String,

    #[tabled(rename = "CALLER")]
    pub caller: String,

    #[tabled(rename = "DURATION")]
    pub duration: String,

    #[tabled(rename = "STATUS")]
    pub status: String,

    #[tabled(rename = "SUMMARY")]
    pub summary: String,
}

impl From<&CallLog> for CallLogDisplay {
    fn from(log: &CallLog) -> Self {
        Self {
            started: format_timestamp(log.started_at),
            caller: log.caller_number.clone(),
            duration: format_duration(log.duration_seconds),
            status: log.status.clone(),
            summary: or_empty(log.summary.as_deref().map(|s| truncate_string(s, 50))),
        }
    }
}

/// Viewing booking display model for table/JSON output.
#[derive(Debug, Clone, Tabled, Serialize)]
pub struct BookingDisplay {
    #[tabled(rename = "BOOKING ID")]
    pub id: String,

    #[tabled(rename = "PROPERTY")]
    pub property: String,

    #[tabled(rename = "VISITOR")]
    pub visitor: String,

    #[tabled(rename = "SCHEDULED")]
    pub scheduled: String,

    #[tabled(rename = "STATUS")]
    pub status: String,
}

impl From<&Booking> for BookingDisplay {
    fn from(booking: &Booking) -> Self {
        Self {
            id: booking.id.clone(),
            property: booking
                .property_title
                .as_deref()
                .map(|t| truncate_string(t, 40))
                .unwrap_or_else(|| booking.property_id.clone()),
            visitor: or_empty(booking.user_name.clone()),
            scheduled: format_timestamp(Some(booking.scheduled_at)),
            status: booking.status.to_string(),
        }
    }
}

pub fn profile_details(profile: &AgentProfile) -> Vec<DetailRow> {
    vec![
        DetailRow::new("ID", &profile.id),
        DetailRow::new("Name", &profile.full_name),
        DetailRow::new("Email", &profile.email),
        DetailRow::new("Phone", or_empty(profile.phone.clone())),
        DetailRow::new("Agency", or_empty(profile.agency_name.clone())),
        DetailRow::new("License", or_empty(profile.license_number.clone())),
        DetailRow::new("Bio", or_empty(profile.bio.clone())),
    ]
}

pub fn approval_details(status: &ApprovalStatus) -> Vec<DetailRow> {
    let mut rows = vec![
        DetailRow::new("Status", status.status.to_string()),
        DetailRow::new("Submitted", format_timestamp(status.submitted_at)),
        DetailRow::new("Reviewed", format_timestamp(status.reviewed_at)),
    ];
    if let Some(ref reason) = status.rejection_reason {
        rows.push(DetailRow::new("Reason", reason));
    }
    rows
}

pub fn phone_details(phone: &PhoneNumber) -> Vec<DetailRow> {
    vec![
        DetailRow::new("Number", &phone.number),
        DetailRow::new("Provider", or_empty(phone.provider.clone())),
        DetailRow::new("Assigned", format_timestamp(phone.assigned_at)),
    ]
}

pub fn voice_agent_details(agent: &VoiceAgent) -> Vec<DetailRow> {
    vec![
        DetailRow::new("ID", &agent.id),
        DetailRow::new("Name", &agent.name),
        DetailRow::new("Voice", &agent.voice),
        DetailRow::new("Greeting", or_empty(agent.greeting.clone())),
        DetailRow::new("Active", if agent.is_active { "yes" } else { "no" }),
    ]
}
