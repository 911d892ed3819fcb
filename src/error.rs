use serde_json::Value as JsonValue;
use thiserror::Error;
use tracing::{error, warn};

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("invalid period: {message}")]
    InvalidPeriod { message: String },

    #[error("invalid weighting policy: {message}")]
    InvalidWeightPolicy { message: String },

    #[error("validation failed: {message}")]
    Validation {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
        details: Option<JsonValue>,
    },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("yaml error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

impl AppError {
    pub fn invalid_period(message: impl Into<String>) -> Self {
        let message = message.into();
        warn!(target: "app::calendar", %message, "invalid period");
        AppError::InvalidPeriod { message }
    }

    pub fn invalid_weight_policy(message: impl Into<String>) -> Self {
        let message = message.into();
        warn!(target: "app::scoring", %message, "invalid weighting policy");
        AppError::InvalidWeightPolicy { message }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        let message = message.into();
        warn!(target: "app::validation", %message, "validation error");
        AppError::Validation {
            message,
            source: None,
            details: None,
        }
    }

    pub fn validation_with_details(message: impl Into<String>, details: JsonValue) -> Self {
        let message = message.into();
        warn!(target: "app::validation", %message, details = %details, "validation error with details");
        AppError::Validation {
            message,
            source: None,
            details: Some(details),
        }
    }

    pub fn other(message: impl Into<String>) -> Self {
        let message = message.into();
        error!(target: "app::other", %message, "other error");
        AppError::Other(message)
    }

    /// Short machine-readable code, shared with the command layer.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::InvalidPeriod { .. } => "INVALID_PERIOD",
            AppError::InvalidWeightPolicy { .. } => "INVALID_WEIGHT_POLICY",
            AppError::Validation { .. } => "VALIDATION_ERROR",
            AppError::Serialization(_)
            | AppError::Yaml(_)
            | AppError::Io(_)
            | AppError::Other(_) => "UNKNOWN",
        }
    }
}
