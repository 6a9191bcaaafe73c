//! actix-web integration
//!
//! Lets handlers return `ServiceResult<HttpResponse>` and have failures
//! rendered as the standard envelope.

use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde::Serialize;

use crate::{ApiResponse, ServiceError};

impl ResponseError for ServiceError {
    fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    fn error_response(&self) -> HttpResponse {
        self.log();
        HttpResponse::build(ResponseError::status_code(self)).json(self.to_response())
    }
}

impl<T: Serialize> ApiResponse<T> {
    /// Build an HTTP response whose status matches the envelope
    pub fn into_http(self) -> HttpResponse {
        let status = StatusCode::from_u16(self.status).unwrap_or(StatusCode::OK);
        HttpResponse::build(status).json(self)
    }
}
