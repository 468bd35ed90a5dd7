//! Error types for the project-management assistant.

use thiserror::Error;

/// Main error type for assistant operations.
#[derive(Error, Debug)]
pub enum AssistantError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Service error: {0}")]
    Service(#[from] ServiceError),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("No team member named '{0}' has an email address on file")]
    UnknownTeamMember(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl AssistantError {
    /// True when a backing service is missing credentials or identifiers.
    ///
    /// The HTTP layer answers these with 503 instead of 500.
    pub fn is_unavailable(&self) -> bool {
        matches!(self, Self::Service(ServiceError::NotConfigured { .. }))
    }

    /// True when the caller sent something the assistant cannot act on.
    pub fn is_bad_request(&self) -> bool {
        matches!(self, Self::InvalidInput(_) | Self::UnknownTeamMember(_))
    }
}

/// Configuration-related errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Missing required field: {0}")]
    MissingField(String),
}

/// Errors raised by the external board, calendar and mail services.
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("{service} is not configured: {detail}")]
    NotConfigured {
        service: &'static str,
        detail: String,
    },

    #[error("{service} request failed: {detail}")]
    Request {
        service: &'static str,
        detail: String,
    },

    #[error("{service} API error ({status}): {detail}")]
    Api {
        service: &'static str,
        status: u16,
        detail: String,
    },

    #[error("{service} returned an unreadable response: {detail}")]
    Decode {
        service: &'static str,
        detail: String,
    },
}

impl ServiceError {
    pub fn not_configured(service: &'static str, detail: impl Into<String>) -> Self {
        Self::NotConfigured {
            service,
            detail: detail.into(),
        }
    }

    /// Classify a transport-level failure from the HTTP client.
    pub fn from_reqwest(service: &'static str, err: reqwest::Error) -> Self {
        let detail = if err.is_timeout() {
            "Request timed out".to_string()
        } else if err.is_connect() {
            format!("Connection failed: {}", err)
        } else if err.is_decode() {
            return Self::Decode {
                service,
                detail: err.to_string(),
            };
        } else {
            err.to_string()
        };
        Self::Request { service, detail }
    }
}

/// Result type alias for assistant operations.
pub type Result<T> = std::result::Result<T, AssistantError>;
