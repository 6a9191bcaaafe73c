/// Authentication handlers
use actix_middleware::AuthClaims;
use actix_web::{web, HttpResponse};
use crypto_core::Claims;
use error_types::{status, ApiResponse, ServiceResult};

use crate::{
    error::AuthError,
    models::{AuthResponse, ChangePasswordRequest, LoginRequest, NewUser, RegisterRequest, User},
    security::password,
    AppState,
};

fn issue_token(state: &AppState, user: &User) -> Result<String, AuthError> {
    let token = state
        .codec
        .encode(Claims::for_user(user.id, &user.username))?;
    Ok(token)
}

fn caller_id(claims: &AuthClaims) -> Result<i64, AuthError> {
    claims.user_id().ok_or(AuthError::MissingIdentity)
}

/// POST /api/auth/register
pub async fn register(
    state: web::Data<AppState>,
    payload: web::Json<RegisterRequest>,
) -> ServiceResult<HttpResponse> {
    let payload = payload.into_inner();
    payload.check()?;

    if state.users.find_by_username(&payload.username).await?.is_some() {
        return Err(AuthError::UsernameTaken.into());
    }
    if state.users.find_by_email(&payload.email).await?.is_some() {
        return Err(AuthError::EmailTaken.into());
    }

    let password_hash = password::hash_password(&payload.password)?;
    let user = state
        .users
        .create(NewUser {
            username: payload.username,
            email: payload.email,
            password_hash,
            full_name: payload.full_name,
        })
        .await?;

    let token = issue_token(&state, &user)?;
    tracing::info!(user_id = user.id, username = %user.username, "User registered");

    Ok(ApiResponse::ok(
        status::CREATED,
        "User registered",
        AuthResponse {
            token,
            user: user.to_public(),
        },
    )
    .into_http())
}

/// POST /api/auth/login
pub async fn login(
    state: web::Data<AppState>,
    payload: web::Json<LoginRequest>,
) -> ServiceResult<HttpResponse> {
    let Some(user) = state.users.find_by_username(&payload.username).await? else {
        tracing::info!(username = %payload.username, "Login failed: unknown user");
        return Err(password::reject_unknown_user(&payload.password).into());
    };

    if let Err(err) = password::verify_password(&payload.password, &user.password_hash) {
        tracing::info!(user_id = user.id, "Login failed: wrong password");
        return Err(err.into());
    }

    let token = issue_token(&state, &user)?;
    tracing::info!(user_id = user.id, "User logged in");

    Ok(ApiResponse::ok(
        status::OK,
        "Login successful",
        AuthResponse {
            token,
            user: user.to_public(),
        },
    )
    .into_http())
}

/// POST /api/auth/logout
///
/// Tokens are stateless, so there is nothing to revoke; the client drops it.
pub async fn logout(claims: Option<AuthClaims>) -> HttpResponse {
    match claims.as_ref().and_then(|c| c.user_id()) {
        Some(user_id) => tracing::info!(user_id, "User logged out"),
        None => tracing::debug!("Anonymous logout"),
    }

    ApiResponse::message(status::OK, "Logged out").into_http()
}

/// GET /api/auth/me
pub async fn me(state: web::Data<AppState>, claims: AuthClaims) -> ServiceResult<HttpResponse> {
    let user_id = caller_id(&claims)?;

    let user = state
        .users
        .find_by_id(user_id)
        .await?
        .ok_or(AuthError::UserNotFound)?;

    Ok(ApiResponse::ok(status::OK, "OK", user.to_public()).into_http())
}

/// PUT /api/auth/password
pub async fn change_password(
    state: web::Data<AppState>,
    claims: AuthClaims,
    payload: web::Json<ChangePasswordRequest>,
) -> ServiceResult<HttpResponse> {
    let user_id = caller_id(&claims)?;
    payload.check()?;

    let user = state
        .users
        .find_by_id(user_id)
        .await?
        .ok_or(AuthError::UserNotFound)?;

    password::verify_password(&payload.current_password, &user.password_hash).map_err(
        |err| match err {
            AuthError::InvalidCredentials => AuthError::WrongCurrentPassword,
            other => other,
        },
    )?;

    let password_hash = password::hash_password(&payload.new_password)?;
    if !state.users.update_password(user.id, &password_hash).await? {
        return Err(AuthError::UserNotFound.into());
    }

    tracing::info!(user_id = user.id, "Password changed");
    Ok(ApiResponse::message(status::OK, "Password updated").into_http())
}
