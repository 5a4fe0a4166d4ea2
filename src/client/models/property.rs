//! Property listing models

use serde::{Deserialize, Serialize};

use super::{Validate, require_text};
use crate::error::ValidationError;

/// Listing availability
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PropertyStatus {
    #[default]
    Available,
    Pending,
    Sold,
    Rented,
}

impl std::fmt::Display for PropertyStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            PropertyStatus::Available => "available",
            PropertyStatus::Pending => "pending",
            PropertyStatus::Sold => "sold",
            PropertyStatus::Rented => "rented",
        };
        f.write_str(s)
    }
}

impl std::str::FromStr for PropertyStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "available" => Ok(PropertyStatus::Available),
            "pending" => Ok(PropertyStatus::Pending),
            "sold" => Ok(PropertyStatus::Sold),
            "rented" => Ok(PropertyStatus::Rented),
            other => Err(format!(
                "unknown property status '{other}' (expected available, pending, sold or rented)"
            )),
        }
    }
}

/// Property listed by an agent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Property {
    pub id: String,
    pub title: String,
    pub address: String,
    pub city: String,

    /// Asking price in the listing currency
    pub price: f64,

    #[serde(default)]
    pub bedrooms: u32,

    #[serde(default)]
    pub bathrooms: u32,

    /// House, apartment, land, ...
    #[serde(default)]
    pub property_type: String,

    #[serde(default)]
    pub status: PropertyStatus,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreatePropertyRequest {
    pub title: String,
    pub address: String,
    pub city: String,
    pub price: f64,
    pub bedrooms: u32,
    pub bathrooms: u32,
    pub property_type: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Validate for CreatePropertyRequest {
    fn validate(&self) -> Result<(), ValidationError> {
        require_text("title", &self.title)?;
        require_text("address", &self.address)?;
        require_text("city", &self.city)?;
        require_text("property_type", &self.property_type)?;
        validate_price(self.price)
    }
}

/// Partial listing update; only set fields are sent.
#[derive(Debug, Clone, Default, Serialize)]
pub struct UpdatePropertyRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<PropertyStatus>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Validate for UpdatePropertyRequest {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.title.is_none()
            && self.price.is_none()
            && self.status.is_none()
            && self.description.is_none()
        {
            return Err(ValidationError::new("property", "nothing to update"));
        }
        if let Some(ref title) = self.title {
            require_text("title", title)?;
        }
        if let Some(price) = self.price {
            validate_price(price)?;
        }
        Ok(())
    }
}

fn validate_price(price: f64) -> Result<(), ValidationError> {
    if !price.is_finite() || price <= 0.0 {
        return Err(ValidationError::new("price", "must be greater than zero"));
    }
    Ok(())
}
