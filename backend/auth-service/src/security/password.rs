/// Password hashing and verification using Argon2id
use argon2::{
    password_hash::{PasswordHasher, SaltString},
    Argon2, PasswordHash, PasswordVerifier,
};

use once_cell::sync::Lazy;

use crate::error::{AuthError, AuthResult};

pub const MIN_PASSWORD_LEN: usize = 8;

/// Hash checked when the username is unknown, so both login failures cost
/// one Argon2 verification.
static DUMMY_HASH: Lazy<Option<String>> = Lazy::new(|| {
    let salt = SaltString::generate(rand::thread_rng());
    Argon2::default()
        .hash_password(b"no-such-user-placeholder", &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| tracing::error!(error = %e, "Failed to build dummy password hash"))
        .ok()
});

/// Hash a password using Argon2id
/// Returns the PHC string stored in `users.password_hash`
pub fn hash_password(password: &str) -> AuthResult<String> {
    // Validate password strength first
    validate_password_strength(password)?;

    let salt = SaltString::generate(rand::thread_rng());
    let argon2 = Argon2::default();

    let password_hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AuthError::PasswordHash(e.to_string()))?
        .to_string();

    Ok(password_hash)
}

/// Verify a password against a stored hash
pub fn verify_password(password: &str, hash: &str) -> AuthResult<()> {
    let parsed_hash =
        PasswordHash::new(hash).map_err(|e| AuthError::PasswordHash(e.to_string()))?;

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AuthError::InvalidCredentials)
}

/// Reject a login naming an unknown user after paying for one verification.
pub fn reject_unknown_user(password: &str) -> AuthError {
    if let Some(hash) = DUMMY_HASH.as_deref() {
        // Outcome ignored; only the cost matters.
        let _ = verify_password(password, hash);
    }
    AuthError::InvalidCredentials
}

/// Validate password strength
/// Requirements:
/// - Minimum 8 characters
/// - At least one letter
/// - At least one digit
pub fn validate_password_strength(password: &str) -> AuthResult<()> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AuthError::Validation(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }

    let has_letter = password.chars().any(|c| c.is_alphabetic());
    let has_digit = password.chars().any(|c| c.is_ascii_digit());

    if has_letter && has_digit {
        Ok(())
    } else {
        Err(AuthError::Validation(
            "Password must contain a letter and a digit".to_string(),
        ))
    }
}
