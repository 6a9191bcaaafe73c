/// User model and request payloads
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::borrow::Cow;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::error::AuthError;
use crate::security::password;

/// Row of the `users` table.
///
/// Not `Serialize`; responses go through [`PublicUser`].
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub full_name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn to_public(&self) -> PublicUser {
        PublicUser {
            id: self.id,
            username: self.username.clone(),
            email: self.email.clone(),
            full_name: self.full_name.clone(),
            created_at: self.created_at,
        }
    }
}

/// User as shown to clients
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublicUser {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub full_name: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Insert payload; the password is already hashed.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub full_name: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(
        length(min = 3, max = 50, message = "Username must be 3-50 characters"),
        custom(function = "validate_username")
    )]
    pub username: String,

    #[validate(email(message = "Invalid email address"))]
    pub email: String,

    #[validate(custom(function = "validate_new_password"))]
    pub password: String,

    #[validate(length(max = 100, message = "Full name must be at most 100 characters"))]
    pub full_name: Option<String>,
}

impl RegisterRequest {
    const FIELDS: &'static [&'static str] = &["username", "email", "password", "full_name"];

    pub fn check(&self) -> Result<(), AuthError> {
        self.validate()
            .map_err(|errors| first_error(&errors, Self::FIELDS))
    }
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct ChangePasswordRequest {
    pub current_password: String,

    #[validate(custom(function = "validate_new_password"))]
    pub new_password: String,
}

impl ChangePasswordRequest {
    const FIELDS: &'static [&'static str] = &["new_password"];

    pub fn check(&self) -> Result<(), AuthError> {
        self.validate()
            .map_err(|errors| first_error(&errors, Self::FIELDS))
    }
}

/// `data` of a successful register or login
#[derive(Debug, Serialize, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: PublicUser,
}

fn error_with_message(code: &'static str, message: &'static str) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(Cow::Borrowed(message));
    error
}

fn validate_username(username: &str) -> Result<(), ValidationError> {
    let allowed = |c: char| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-');
    if username.chars().all(allowed) {
        Ok(())
    } else {
        Err(error_with_message(
            "username_charset",
            "Username may only contain letters, digits, '_', '.' and '-'",
        ))
    }
}

fn validate_new_password(candidate: &str) -> Result<(), ValidationError> {
    password::validate_password_strength(candidate).map_err(|_| {
        error_with_message(
            "weak_password",
            "Password must be at least 8 characters and contain a letter and a digit",
        )
    })
}

/// Message of the first failing field, in declaration order.
fn first_error(errors: &ValidationErrors, order: &[&'static str]) -> AuthError {
    let field_errors = errors.field_errors();

    let message = order
        .iter()
        .find_map(|field| {
            let error = field_errors.get(field)?.first()?;
            Some(
                error
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("Invalid {field}")),
            )
        })
        .unwrap_or_else(|| "Invalid request".to_string());

    AuthError::Validation(message)
}
