//! Error types for PropTalk

use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

use crate::client::Role;

/// Result type alias for PropTalk operations
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error type for the application
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Interactive prompt error: {0}")]
    Dialoguer(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Failure recorded by the query cache and shared by its observers
    #[error(transparent)]
    Query(Arc<Error>),

    #[error("Operation failed: {0}")]
    Other(String),
}

impl From<dialoguer::Error> for Error {
    fn from(err: dialoguer::Error) -> Self {
        Error::Dialoguer(err.to_string())
    }
}

impl Error {
    /// True when the backend answered 404 for the requested resource.
    pub fn is_not_found(&self) -> bool {
        match self {
            Error::Api(ApiError::NotFound(_)) => true,
            Error::Query(inner) => inner.is_not_found(),
            _ => false,
        }
    }

    /// Whether trying the same request again could succeed. Local
    /// configuration and validation failures never will, and neither will
    /// a 4xx answer other than 429.
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::Config(_) | Error::Validation(_) => false,
            Error::Query(inner) => inner.is_retryable(),
            _ => match self.status() {
                Some(429) => true,
                Some(status) => !(400..500).contains(&status),
                None => true,
            },
        }
    }

    /// HTTP status carried by the error, if it came from the backend.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Api(api) => api.status(),
            Error::Query(inner) => inner.status(),
            _ => None,
        }
    }
}

/// API-related errors
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Authentication failed: {0}. Run `proptalk init` to refresh your token.")]
    Unauthorized(String),

    #[error("Access denied: {0}")]
    Forbidden(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Rate limit exceeded. Retry after {0:?}")]
    RateLimit(Duration),

    #[error("Bad request: {message}")]
    BadRequest { status: u16, message: String },

    #[error("Server error ({status}): {message}")]
    ServerError { status: u16, message: String },

    #[error("Unexpected response ({status}): {message}")]
    Status { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Invalid API response: {0}")]
    InvalidResponse(String),
}

impl ApiError {
    /// Numeric HTTP status for errors produced by a backend response.
    ///
    /// Transport and decoding failures carry no status.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Unauthorized(_) => Some(401),
            ApiError::Forbidden(_) => Some(403),
            ApiError::NotFound(_) => Some(404),
            ApiError::RateLimit(_) => Some(429),
            ApiError::BadRequest { status, .. }
            | ApiError::ServerError { status, .. }
            | ApiError::Status { status, .. } => Some(*status),
            ApiError::Network(_) | ApiError::InvalidResponse(_) => None,
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ApiError::Network("Request timed out".to_string())
        } else if err.is_connect() {
            ApiError::Network("Failed to connect to API".to_string())
        } else if err.is_decode() {
            ApiError::InvalidResponse(err.to_string())
        } else {
            ApiError::Network(err.to_string())
        }
    }
}

/// Configuration-related errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration file not found. Run `proptalk init` to set up.")]
    NotFound,

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Failed to save configuration: {0}")]
    SaveError(String),

    #[error("No {0} token configured. Run `proptalk init --role {0}` to add one.")]
    MissingToken(Role),
}

impl From<serde_yaml::Error> for ConfigError {
    fn from(err: serde_yaml::Error) -> Self {
        ConfigError::ParseError(err.to_string())
    }
}

/// Client-side form validation failure; raised before any request is sent.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Invalid {field}: {message}")]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}
