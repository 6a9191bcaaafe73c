//! # Actix Middleware Library
//!
//! Shared middleware components for the HRM Actix services
//!
//! ## Modules
//! - `jwt_auth`: bearer-token authentication gate
//! - `request_logging`: request id propagation and access logs

pub mod jwt_auth;
pub mod request_logging;

pub use jwt_auth::{optional, require, AuthClaims, AuthFailure, AuthMode, JwtAuthMiddleware};
pub use request_logging::{request_id, RequestId, RequestLogging, REQUEST_ID_HEADER};
