//! Bearer-token authentication gate
//!
//! Three ways to protect a handler, all backed by the same check:
//! - wrap a scope/resource in [`JwtAuthMiddleware::required`] or
//!   [`JwtAuthMiddleware::optional`]
//! - take [`AuthClaims`] (or `Option<AuthClaims>`) as a handler argument
//! - call [`require`] / [`optional`] on the request headers directly
//!
//! Every failure (no header, bad scheme, bad signature, expired) produces the
//! same 401 body. The reason is only logged.

use actix_web::{
    body::EitherBody,
    dev::{forward_ready, Payload, Service, ServiceRequest, ServiceResponse, Transform},
    http::header::{HeaderMap, AUTHORIZATION},
    web, Error, FromRequest, HttpMessage, HttpRequest, HttpResponse, ResponseError,
};
use crypto_core::jwt::{Claims, TokenCodec, TokenError};
use error_types::ServiceError;
use futures::future::LocalBoxFuture;
use std::future::{ready, Ready};
use std::ops::Deref;
use std::sync::Arc;

const BEARER_SCHEME: &str = "Bearer";

/// Why a request has no usable identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum AuthFailure {
    #[error("missing Authorization header")]
    MissingHeader,

    #[error("Authorization header is not `Bearer <token>`")]
    MalformedHeader,

    #[error("token is invalid")]
    InvalidToken,

    #[error("token has expired")]
    ExpiredToken,
}

impl From<TokenError> for AuthFailure {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Expired => AuthFailure::ExpiredToken,
            _ => AuthFailure::InvalidToken,
        }
    }
}

impl ResponseError for AuthFailure {
    fn status_code(&self) -> actix_web::http::StatusCode {
        actix_web::http::StatusCode::UNAUTHORIZED
    }

    fn error_response(&self) -> HttpResponse {
        ServiceError::Unauthenticated.error_response()
    }
}

/// Pull the token out of `Authorization: Bearer <token>`.
///
/// The scheme is matched case-insensitively; the token must be a single
/// non-empty word.
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, AuthFailure> {
    let value = headers
        .get(AUTHORIZATION)
        .ok_or(AuthFailure::MissingHeader)?
        .to_str()
        .map_err(|_| AuthFailure::MalformedHeader)?;

    let (scheme, token) = value
        .trim()
        .split_once(char::is_whitespace)
        .ok_or(AuthFailure::MalformedHeader)?;

    if !scheme.eq_ignore_ascii_case(BEARER_SCHEME) {
        return Err(AuthFailure::MalformedHeader);
    }

    let token = token.trim();
    if token.is_empty() || token.contains(char::is_whitespace) {
        return Err(AuthFailure::MalformedHeader);
    }

    Ok(token)
}

/// Authenticate or fail.
pub fn require(headers: &HeaderMap, codec: &TokenCodec) -> Result<Claims, AuthFailure> {
    let token = bearer_token(headers)?;
    codec.decode(token).map_err(AuthFailure::from)
}

/// Authenticate if possible; any failure is anonymous.
pub fn optional(headers: &HeaderMap, codec: &TokenCodec) -> Option<Claims> {
    require(headers, codec).ok()
}

/// Claims of the authenticated caller.
///
/// Placed in request extensions by [`JwtAuthMiddleware`]. As an extractor it
/// falls back to verifying the header itself against the `TokenCodec`
/// registered as app data.
#[derive(Debug, Clone)]
pub struct AuthClaims(pub Claims);

impl Deref for AuthClaims {
    type Target = Claims;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl FromRequest for AuthClaims {
    type Error = AuthFailure;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        if let Some(claims) = req.extensions().get::<AuthClaims>() {
            return ready(Ok(claims.clone()));
        }

        let result = match req.app_data::<web::Data<TokenCodec>>() {
            Some(codec) => require(req.headers(), codec.get_ref()).map(AuthClaims),
            None => {
                tracing::error!("No TokenCodec registered as app data; rejecting request");
                Err(AuthFailure::InvalidToken)
            }
        };

        if let Err(failure) = &result {
            tracing::debug!(reason = %failure, path = %req.path(), "Bearer authentication failed");
        }

        ready(result)
    }
}

/// Whether a failed check stops the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMode {
    /// Respond 401 and never call the wrapped service
    Required,
    /// Continue anonymously
    Optional,
}

/// JWT Authentication Middleware
#[derive(Clone)]
pub struct JwtAuthMiddleware {
    codec: Arc<TokenCodec>,
    mode: AuthMode,
}

impl JwtAuthMiddleware {
    pub fn required(codec: Arc<TokenCodec>) -> Self {
        Self {
            codec,
            mode: AuthMode::Required,
        }
    }

    pub fn optional(codec: Arc<TokenCodec>) -> Self {
        Self {
            codec,
            mode: AuthMode::Optional,
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for JwtAuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = JwtAuthMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(JwtAuthMiddlewareService {
            service,
            codec: Arc::clone(&self.codec),
            mode: self.mode,
        }))
    }
}

pub struct JwtAuthMiddlewareService<S> {
    service: S,
    codec: Arc<TokenCodec>,
    mode: AuthMode,
}

impl<S, B> Service<ServiceRequest> for JwtAuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let outcome = require(req.headers(), &self.codec);

        match outcome {
            Ok(claims) => {
                req.extensions_mut().insert(AuthClaims(claims));
            }
            Err(failure) => {
                tracing::debug!(reason = %failure, path = %req.path(), "Bearer authentication failed");

                if self.mode == AuthMode::Required {
                    let response = req
                        .into_response(failure.error_response())
                        .map_into_right_body();
                    return Box::pin(ready(Ok(response)));
                }
            }
        }

        let fut = self.service.call(req);
        Box::pin(async move { fut.await.map(ServiceResponse::map_into_left_body) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::header::HeaderValue;

    fn headers(value: &str) -> HeaderMap {
        let mut map = HeaderMap::new();
        map.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        map
    }

    #[test]
    fn test_bearer_token_extraction() {
        assert_eq!(bearer_token(&headers("Bearer abc.def.ghi")), Ok("abc.def.ghi"));
        assert_eq!(bearer_token(&headers("bearer abc.def.ghi")), Ok("abc.def.ghi"));
        assert_eq!(bearer_token(&headers("BEARER   abc.def.ghi  ")), Ok("abc.def.ghi"));
        assert_eq!(bearer_token(&headers("Bearer\tabc.def.ghi")), Ok("abc.def.ghi"));
    }

    #[test]
    fn test_missing_header() {
        assert_eq!(bearer_token(&HeaderMap::new()), Err(AuthFailure::MissingHeader));
    }

    #[test]
    fn test_malformed_headers() {
        for value in [
            "Token abc.def.ghi",
            "Basic dXNlcjpwYXNz",
            "Bearer",
            "Bearer ",
            "Bearerabc.def.ghi",
            "abc.def.ghi",
            "Bearer abc def",
        ] {
            assert_eq!(
                bearer_token(&headers(value)),
                Err(AuthFailure::MalformedHeader),
                "accepted {value:?}"
            );
        }
    }

    #[test]
    fn test_token_errors_collapse() {
        assert_eq!(AuthFailure::from(TokenError::Expired), AuthFailure::ExpiredToken);
        assert_eq!(AuthFailure::from(TokenError::Malformed), AuthFailure::InvalidToken);
        assert_eq!(
            AuthFailure::from(TokenError::InvalidSignature),
            AuthFailure::InvalidToken
        );
    }
}
