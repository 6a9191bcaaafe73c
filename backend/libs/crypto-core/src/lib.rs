//! Token signing primitives shared by the HRM services.
//!
//! - `jwt`: HS256 bearer-token codec
//! - `clock`: injectable time source used for `iat`/`exp`
//! - `secret`: signing secret strength checks

pub mod clock;
pub mod jwt;
pub mod secret;

pub use clock::{Clock, ManualClock, SystemClock};
pub use jwt::{Claims, TokenCodec, TokenError, DEFAULT_TTL_SECS};
pub use secret::{validate_secret_strength, SecretStrength};
