//! Stateless bearer-token codec for the HRM services
//!
//! Tokens are HS256 JWTs: `<header>.<payload>.<signature>`, each segment
//! URL-safe base64 without padding. The payload is an open JSON object that
//! always carries `iat` and `exp`; everything else is caller data.
//!
//! ## Security Design
//!
//! - **HS256 ONLY**: tokens whose header names any other algorithm are rejected
//! - **Constant-time signature check**: done by `jsonwebtoken`
//! - **No revocation**: expiry is the only way a token stops being valid
//! - **Thread-safe**: keys and TTL are fixed at construction, share via `Arc`
//!
//! ## Usage
//!
//! ```rust
//! use crypto_core::jwt::{Claims, TokenCodec};
//!
//! let codec = TokenCodec::new(b"a-long-random-secret-loaded-from-config", 3600);
//! let token = codec.encode(Claims::for_user(42, "alice")).unwrap();
//! let claims = codec.decode(&token).unwrap();
//! assert_eq!(claims.user_id(), Some(42));
//! ```

use jsonwebtoken::{errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::sync::Arc;

use crate::clock::{Clock, SystemClock};

// ============================================================================
// Constants
// ============================================================================

pub const DEFAULT_TTL_SECS: i64 = 3600;

/// JWT algorithm - HS256 for interoperability with existing clients
const JWT_ALGORITHM: Algorithm = Algorithm::HS256;

pub const USER_ID: &str = "user_id";
pub const USERNAME: &str = "username";
pub const ISSUED_AT: &str = "iat";
pub const EXPIRES_AT: &str = "exp";

// ============================================================================
// Claims
// ============================================================================

/// Token payload: an open mapping from claim names to JSON values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Claims(Map<String, Value>);

impl Claims {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claims identifying an authenticated user.
    pub fn for_user(user_id: i64, username: &str) -> Self {
        Self::new().with(USER_ID, user_id).with(USERNAME, username)
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(key.into(), value.into())
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn user_id(&self) -> Option<i64> {
        self.get(USER_ID).and_then(Value::as_i64)
    }

    pub fn username(&self) -> Option<&str> {
        self.get(USERNAME).and_then(Value::as_str)
    }

    pub fn issued_at(&self) -> Option<i64> {
        self.get(ISSUED_AT).and_then(Value::as_i64)
    }

    pub fn expires_at(&self) -> Option<i64> {
        self.get(EXPIRES_AT).and_then(Value::as_i64)
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }
}

impl From<Map<String, Value>> for Claims {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

// ============================================================================
// Errors
// ============================================================================

/// Why a token was rejected.
///
/// The distinction is for server-side logs only. HTTP callers must collapse
/// every variant into the same response.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    #[error("token is malformed")]
    Malformed,

    #[error("token signature is invalid")]
    InvalidSignature,

    #[error("token has expired")]
    Expired,

    #[error("failed to sign token: {0}")]
    Signing(String),
}

impl From<jsonwebtoken::errors::Error> for TokenError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        match err.kind() {
            ErrorKind::InvalidSignature => TokenError::InvalidSignature,
            _ => TokenError::Malformed,
        }
    }
}

// ============================================================================
// Codec
// ============================================================================

/// Issues and verifies HS256 tokens with one shared secret and a fixed TTL.
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl_secs: i64,
    clock: Arc<dyn Clock>,
}

impl TokenCodec {
    /// Codec reading the wall clock.
    pub fn new(secret: &[u8], ttl_secs: i64) -> Self {
        Self::with_clock(secret, ttl_secs, Arc::new(SystemClock))
    }

    pub fn with_clock(secret: &[u8], ttl_secs: i64, clock: Arc<dyn Clock>) -> Self {
        // Expiry is checked against our own clock in `decode`, and `exp` is
        // optional on the way in.
        let mut validation = Validation::new(JWT_ALGORITHM);
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.required_spec_claims.clear();

        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
            ttl_secs,
            clock,
        }
    }

    pub fn ttl_secs(&self) -> i64 {
        self.ttl_secs
    }

    /// Sign `claims`, stamping `iat = now` and `exp = now + ttl`.
    ///
    /// Caller-supplied `iat`/`exp` are overwritten. Fails with `Signing` if
    /// `now + ttl` does not fit in an `i64`.
    pub fn encode(&self, mut claims: Claims) -> Result<String, TokenError> {
        let issued_at = self.clock.now();
        let expires_at = issued_at
            .checked_add(self.ttl_secs)
            .ok_or_else(|| TokenError::Signing("expiry overflows i64".to_string()))?;
        claims.insert(ISSUED_AT, issued_at);
        claims.insert(EXPIRES_AT, expires_at);

        jsonwebtoken::encode(&Header::new(JWT_ALGORITHM), &claims, &self.encoding_key)
            .map_err(|e| TokenError::Signing(e.to_string()))
    }

    /// Verify `token` and return its claims.
    ///
    /// Rejects anything that is not exactly three segments, carries a
    /// signature that does not match, has a payload that is not a JSON
    /// object, or whose `exp` is strictly before now.
    pub fn decode(&self, token: &str) -> Result<Claims, TokenError> {
        if token.split('.').count() != 3 {
            return Err(TokenError::Malformed);
        }

        let claims =
            jsonwebtoken::decode::<Claims>(token, &self.decoding_key, &self.validation)?.claims;

        if let Some(exp) = claims.get(EXPIRES_AT) {
            let exp = exp.as_i64().ok_or(TokenError::Malformed)?;
            if exp < self.clock.now() {
                return Err(TokenError::Expired);
            }
        }

        Ok(claims)
    }
}

impl fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenCodec")
            .field("algorithm", &JWT_ALGORITHM)
            .field("ttl_secs", &self.ttl_secs)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Tests
// ============================================================================
