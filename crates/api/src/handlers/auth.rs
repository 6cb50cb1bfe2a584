//! Handlers for the `/auth` resource (registration, login, refresh, logout,
//! current account).

use std::sync::LazyLock;

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use gymplan_core::error::CoreError;
use gymplan_db::models::session::NewSession;
use gymplan_db::models::user::{CreateUser, User, UserResponse};
use gymplan_db::repositories::{SessionRepo, UserRepo};
use regex::Regex;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::auth::jwt::{hash_refresh_token, RefreshToken};
use crate::auth::password::{hash_password, verify_password};
use crate::codec::{field_errors, not_blank, require, WriteMode};
use crate::error::{AppError, AppResult};
use crate::extract::JsonBody;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// Letters, digits and `@ . + - _`.
static USERNAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\w.@+-]+$").expect("username pattern is valid"));

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /auth/register`.
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(
        custom(function = "not_blank"),
        length(max = 150, message = "Ensure this field has no more than 150 characters."),
        regex(
            path = *USERNAME_RE,
            message = "Enter a valid username. This value may contain only letters, numbers, and @/./+/-/_ characters."
        )
    )]
    pub username: Option<String>,
    #[validate(email(message = "Enter a valid email address."))]
    pub email: Option<String>,
    pub password: Option<String>,
    pub password2: Option<String>,
    #[validate(length(max = 150, message = "Ensure this field has no more than 150 characters."))]
    pub first_name: Option<String>,
    #[validate(length(max = 150, message = "Ensure this field has no more than 150 characters."))]
    pub last_name: Option<String>,
}

/// Request body for `POST /auth/login`.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Request body for `POST /auth/refresh`.
#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

/// Successful authentication response returned by login and refresh.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub refresh_token: String,
    /// Access token lifetime in seconds.
    pub expires_in: i64,
    pub user: UserResponse,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/auth/register
///
/// Create an account. Every problem with the submission is reported at once
/// as a field error; nothing is written unless all checks pass.
pub async fn register(
    State(state): State<AppState>,
    JsonBody(input): JsonBody<RegisterRequest>,
) -> AppResult<(StatusCode, Json<UserResponse>)> {
    let mut errors = field_errors(&input);
    for (field, value) in [
        ("username", &input.username),
        ("email", &input.email),
        ("password", &input.password),
        ("password2", &input.password2),
    ] {
        require(&mut errors, WriteMode::Create, field, value);
    }

    let username = input.username.unwrap_or_default();
    let email = input.email.unwrap_or_default();

    if let (Some(password), Some(password2)) = (&input.password, &input.password2) {
        if password != password2 {
            errors.add("password", "Password fields didn't match.");
        }
    }
    if let Some(ref password) = input.password {
        let attributes = [("username", username.as_str()), ("email address", email.as_str())];
        for problem in state.config.password.check(password, &attributes) {
            errors.add("password", problem);
        }
    }

    let check_username = !errors.contains("username");
    let check_email = !errors.contains("email");
    if check_username || check_email {
        let taken = UserRepo::availability(&state.pool, &username, &email).await?;
        if check_username && taken.username_taken {
            errors.add("username", "A user with that username already exists.");
        }
        if check_email && taken.email_taken {
            errors.add("email", "A user with that email already exists.");
        }
    }
    errors.into_result()?;

    let password_hash = hash_password(&input.password.unwrap_or_default())
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let user = UserRepo::create(
        &state.pool,
        &CreateUser {
            username,
            email,
            first_name: input.first_name.unwrap_or_default(),
            last_name: input.last_name.unwrap_or_default(),
            password_hash,
        },
    )
    .await?;

    tracing::info!(user_id = user.id, username = %user.username, "User registered");
    Ok((StatusCode::CREATED, Json(UserResponse::from(&user))))
}

/// POST /api/v1/auth/login
///
/// Authenticate with username + password. Returns access and refresh tokens.
pub async fn login(
    State(state): State<AppState>,
    JsonBody(input): JsonBody<LoginRequest>,
) -> AppResult<Json<AuthResponse>> {
    let user = UserRepo::find_by_username(&state.pool, &input.username)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Unauthenticated(
                "Invalid username or password".into(),
            ))
        })?;

    if !user.is_active {
        return Err(AppError::Core(CoreError::Forbidden(
            "Account is deactivated".into(),
        )));
    }

    let password_valid = verify_password(&input.password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;

    if !password_valid {
        tracing::debug!(user_id = user.id, "Login rejected: wrong password");
        return Err(AppError::Core(CoreError::Unauthenticated(
            "Invalid username or password".into(),
        )));
    }

    let response = create_auth_response(&state, &user).await?;
    tracing::info!(user_id = user.id, "User logged in");
    Ok(Json(response))
}

/// POST /api/v1/auth/refresh
///
/// Exchange a valid refresh token for new access + refresh tokens. The old
/// refresh token stops working.
pub async fn refresh(
    State(state): State<AppState>,
    JsonBody(input): JsonBody<RefreshRequest>,
) -> AppResult<Json<AuthResponse>> {
    let invalid = || {
        AppError::Core(CoreError::Unauthenticated(
            "Invalid or expired refresh token".into(),
        ))
    };

    let replacement = RefreshToken::generate();
    let session = SessionRepo::rotate(
        &state.pool,
        &hash_refresh_token(&input.refresh_token),
        &replacement.hash,
        state.config.jwt.refresh_expires_at(Utc::now()),
    )
    .await?
    .ok_or_else(invalid)?;

    let user = UserRepo::find_by_id(&state.pool, session.user_id)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Unauthenticated("User no longer exists".into()))
        })?;

    if !user.is_active {
        SessionRepo::revoke_all_for_user(&state.pool, user.id).await?;
        return Err(AppError::Core(CoreError::Forbidden(
            "Account is deactivated".into(),
        )));
    }

    let access_token = issue_access_token(&state, &user)?;
    tracing::debug!(user_id = user.id, session_id = session.id, "Refresh token rotated");
    Ok(Json(AuthResponse {
        access_token,
        refresh_token: replacement.plaintext,
        expires_in: state.config.jwt.access_ttl_secs(),
        user: UserResponse::from(&user),
    }))
}

/// POST /api/v1/auth/logout
///
/// Revoke all sessions for the authenticated user. Returns 204 No Content.
pub async fn logout(State(state): State<AppState>, auth_user: AuthUser) -> AppResult<StatusCode> {
    let revoked = SessionRepo::revoke_all_for_user(&state.pool, auth_user.user_id).await?;
    tracing::info!(user_id = auth_user.user_id, revoked, "User logged out");
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/auth/me
pub async fn me(State(state): State<AppState>, auth_user: AuthUser) -> AppResult<Json<UserResponse>> {
    let user = UserRepo::find_by_id(&state.pool, auth_user.user_id)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Unauthenticated("User no longer exists".into()))
        })?;
    Ok(Json(UserResponse::from(&user)))
}

/// DELETE /api/v1/auth/me
///
/// Delete the caller's account together with their plans and sessions.
pub async fn delete_me(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> AppResult<StatusCode> {
    if !UserRepo::delete(&state.pool, auth_user.user_id).await? {
        return Err(AppError::Core(CoreError::Unauthenticated(
            "User no longer exists".into(),
        )));
    }
    tracing::info!(user_id = auth_user.user_id, "User account deleted");
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn issue_access_token(state: &AppState, user: &User) -> AppResult<String> {
    state
        .config
        .jwt
        .issue_access_token(user.id, &user.username)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))
}

/// Open a session for `user` and build the token response. Dead sessions of
/// the same user are pruned first.
async fn create_auth_response(state: &AppState, user: &User) -> AppResult<AuthResponse> {
    let access_token = issue_access_token(state, user)?;
    let refresh = RefreshToken::generate();

    SessionRepo::prune_for_user(&state.pool, user.id).await?;
    SessionRepo::open(
        &state.pool,
        &NewSession {
            user_id: user.id,
            refresh_token_hash: refresh.hash,
            expires_at: state.config.jwt.refresh_expires_at(Utc::now()),
        },
    )
    .await?;

    Ok(AuthResponse {
        access_token,
        refresh_token: refresh.plaintext,
        expires_in: state.config.jwt.access_ttl_secs(),
        user: UserResponse::from(user),
    })
}
