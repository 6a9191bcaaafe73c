//! Auth service errors
//!
//! Domain failures are raised as `AuthError` and converted into the shared
//! `ServiceError` at the handler boundary, which renders the response envelope.

use error_types::ServiceError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("{0}")]
    Validation(String),

    /// Unknown username or wrong password; the two are not distinguished
    #[error("Invalid username or password")]
    InvalidCredentials,

    #[error("Current password is incorrect")]
    WrongCurrentPassword,

    #[error("Username already taken")]
    UsernameTaken,

    #[error("Email already registered")]
    EmailTaken,

    #[error("User not found")]
    UserNotFound,

    /// Token verified but carries no usable `user_id`
    #[error("Token has no user identity")]
    MissingIdentity,

    #[error("Password hashing failed: {0}")]
    PasswordHash(String),

    #[error("Failed to issue token: {0}")]
    TokenIssue(#[from] crypto_core::TokenError),
}

pub type AuthResult<T> = std::result::Result<T, AuthError>;

impl From<AuthError> for ServiceError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::Validation(message) => ServiceError::invalid_input(message),
            AuthError::InvalidCredentials => ServiceError::unauthorized(err.to_string()),
            AuthError::WrongCurrentPassword => ServiceError::invalid_input(err.to_string()),
            AuthError::UsernameTaken | AuthError::EmailTaken => {
                ServiceError::conflict(err.to_string())
            }
            AuthError::UserNotFound => ServiceError::NotFound { resource: "User" },
            AuthError::MissingIdentity => ServiceError::Unauthenticated,
            AuthError::PasswordHash(_) | AuthError::TokenIssue(_) => ServiceError::internal(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (AuthError::Validation("Invalid email address".into()), 400),
            (AuthError::InvalidCredentials, 401),
            (AuthError::WrongCurrentPassword, 400),
            (AuthError::UsernameTaken, 409),
            (AuthError::EmailTaken, 409),
            (AuthError::UserNotFound, 404),
            (AuthError::MissingIdentity, 401),
            (AuthError::PasswordHash("salt".into()), 500),
        ];

        for (err, status) in cases {
            let label = err.to_string();
            assert_eq!(ServiceError::from(err).http_status(), status, "{label}");
        }
    }

    #[test]
    fn test_login_failure_message() {
        let err = ServiceError::from(AuthError::InvalidCredentials);
        assert_eq!(err.public_message(), "Invalid username or password");
    }

    #[test]
    fn test_hash_failure_is_not_exposed() {
        let err = ServiceError::from(AuthError::PasswordHash("argon2 params".into()));
        assert_eq!(err.public_message(), "Internal server error");
    }
}
