//! Unified error types for the HRM backend services
//!
//! Every HTTP response, success or failure, uses the same JSON envelope:
//!
//! ```json
//! { "success": false, "status": 401, "message": "Unauthorized" }
//! ```
//!
//! # Design Principles
//!
//! 1. **Type Safety**: handlers return `ServiceResult<T>`
//! 2. **No leaks**: internal and database errors render a fixed message
//! 3. **Observability**: each variant logs at a level matching its severity

use thiserror::Error;

pub mod response;

#[cfg(feature = "actix")]
pub mod actix;

#[cfg(feature = "sqlx")]
pub mod database;

pub use response::{status, ApiResponse};

/// Core service error type used across the HRM services
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Invalid input provided
    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    /// Authentication required or failed
    #[error("Unauthorized")]
    Unauthenticated,

    /// Authentication failed with a caller-facing reason (e.g. bad login)
    #[error("Unauthorized: {message}")]
    Unauthorized { message: String },

    /// Resource not found
    #[error("Resource not found: {resource}")]
    NotFound { resource: &'static str },

    /// Conflict (e.g., duplicate resource)
    #[error("Conflict: {message}")]
    Conflict { message: String },

    /// Internal server error (catch-all)
    #[error("Internal server error")]
    Internal {
        #[source]
        source: anyhow::Error,
    },
}

impl ServiceError {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized {
            message: message.into(),
        }
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict {
            message: message.into(),
        }
    }

    /// Create internal error from any error type
    pub fn internal<E: Into<anyhow::Error>>(error: E) -> Self {
        Self::Internal {
            source: error.into(),
        }
    }

    /// HTTP status code for this error
    pub fn http_status(&self) -> u16 {
        match self {
            Self::InvalidInput { .. } => status::BAD_REQUEST,
            Self::Unauthenticated | Self::Unauthorized { .. } => status::UNAUTHORIZED,
            Self::NotFound { .. } => status::NOT_FOUND,
            Self::Conflict { .. } => status::CONFLICT,
            Self::Internal { .. } => status::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message safe to show to clients
    pub fn public_message(&self) -> String {
        match self {
            Self::InvalidInput { message }
            | Self::Unauthorized { message }
            | Self::Conflict { message } => message.clone(),
            Self::Unauthenticated => "Unauthorized".to_string(),
            Self::NotFound { resource } => format!("{resource} not found"),
            Self::Internal { .. } => "Internal server error".to_string(),
        }
    }

    /// Log error with appropriate level and context
    pub fn log(&self) {
        match self {
            Self::InvalidInput { .. } | Self::NotFound { .. } | Self::Conflict { .. } => {
                tracing::debug!(error = %self, "Client error");
            }
            Self::Unauthenticated | Self::Unauthorized { .. } => {
                tracing::debug!(error = %self, "Authentication failure");
            }
            Self::Internal { source } => {
                tracing::error!(error = ?source, "Server error");
            }
        }
    }

    /// Envelope rendered for this error
    pub fn to_response(&self) -> ApiResponse<()> {
        ApiResponse::error(self.http_status(), self.public_message())
    }
}

/// Result type alias for service operations
pub type ServiceResult<T> = Result<T, ServiceError>;
