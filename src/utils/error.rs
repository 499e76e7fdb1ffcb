use thiserror::Error;

#[derive(Error, Debug)]
pub enum NavError {
    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Location permission denied")]
    PermissionDenied,

    #[error("Location unavailable: {reason}")]
    LocationUnavailable { reason: String },

    #[error("Facility directory fetch failed: {reason}")]
    FetchFailed { reason: String },

    #[error("Route unavailable: {reason}")]
    RouteUnavailable { reason: String },

    #[error("Directions API error (code {code}): {message}")]
    RoutingApiError { code: u32, message: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid configuration value for '{field}': '{value}' - {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

pub type Result<T> = std::result::Result<T, NavError>;
