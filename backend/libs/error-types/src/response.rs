//! HTTP response envelope
//!
//! Success and error bodies share one shape so clients can branch on
//! `success` before looking at `data`.

use serde::{Deserialize, Serialize};

/// Standard response envelope
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,

    /// HTTP status code, mirrored in the body
    pub status: u16,

    /// Human-readable message
    pub message: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn ok(status: u16, message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            status,
            message: message.into(),
            data: Some(data),
        }
    }
}

impl ApiResponse<()> {
    /// Success without a payload
    pub fn message(status: u16, message: impl Into<String>) -> Self {
        Self {
            success: true,
            status,
            message: message.into(),
            data: None,
        }
    }

    pub fn error(status: u16, message: impl Into<String>) -> Self {
        Self {
            success: false,
            status,
            message: message.into(),
            data: None,
        }
    }
}

/// HTTP status code helpers
pub mod status {
    pub const OK: u16 = 200;
    pub const CREATED: u16 = 201;

    pub const BAD_REQUEST: u16 = 400;
    pub const UNAUTHORIZED: u16 = 401;
    pub const NOT_FOUND: u16 = 404;
    pub const CONFLICT: u16 = 409;

    pub const INTERNAL_SERVER_ERROR: u16 = 500;
}
