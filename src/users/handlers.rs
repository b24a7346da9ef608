use axum::{
    extract::{FromRef, State},
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use lazy_static::lazy_static;
use regex::Regex;
use tracing::{info, instrument, warn};

use super::dto::{
    ChangePasswordRequest, ChangeUsernameRequest, LoginRequest, LoginResponse, MessageResponse,
    PublicUser, RegisterRequest, RegisterResponse,
};
use super::service::{self, NewAccount};
use crate::auth::{extractors::AuthUser, jwt::JwtKeys};
use crate::error::ApiError;
use crate::state::AppState;

pub fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
}

pub fn profile_routes() -> Router<AppState> {
    Router::new()
        .route("/profile", get(get_profile))
        .route("/profile/username", put(change_username))
        .route("/profile/password", put(change_password))
}

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

#[instrument(skip(state, payload))]
async fn register(
    State(state): State<AppState>,
    Json(mut payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<RegisterResponse>), ApiError> {
    payload.email = payload.email.trim().to_lowercase();
    payload.username = payload.username.trim().to_string();

    if payload.username.is_empty() {
        return Err(ApiError::Validation("username is required".into()));
    }
    if payload.email.is_empty() {
        return Err(ApiError::Validation("email is required".into()));
    }
    if payload.password.is_empty() {
        return Err(ApiError::Validation("password is required".into()));
    }
    if !is_valid_email(&payload.email) {
        warn!(email = %payload.email, "invalid email");
        return Err(ApiError::Validation("invalid email".into()));
    }

    let user = service::register(
        state.users.as_ref(),
        NewAccount {
            username: payload.username,
            email: payload.email,
            password: payload.password,
        },
    )
    .await?;

    info!(user_id = %user.id, email = %user.email, "user registered");
    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            message: "user registered successfully".into(),
            user: user.into(),
        }),
    ))
}

#[instrument(skip(state, payload))]
async fn login(
    State(state): State<AppState>,
    Json(mut payload): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    payload.email = payload.email.trim().to_lowercase();

    if payload.email.is_empty() {
        return Err(ApiError::Validation("email is required".into()));
    }
    if payload.password.is_empty() {
        return Err(ApiError::Validation("password is required".into()));
    }

    let user = service::login(state.users.as_ref(), &payload.email, &payload.password).await?;

    let keys = JwtKeys::from_ref(&state);
    let token = keys.sign(user.id, &user.email)?;

    info!(user_id = %user.id, "user logged in");
    Ok(Json(LoginResponse {
        message: "login successful".into(),
        token,
        user: user.into(),
    }))
}

#[instrument(skip(state))]
async fn get_profile(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<PublicUser>, ApiError> {
    let user = service::get_profile(state.users.as_ref(), user_id).await?;
    Ok(Json(user.into()))
}

#[instrument(skip(state, payload))]
async fn change_username(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<ChangeUsernameRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    let new_username = payload.new_username.trim();
    if new_username.is_empty() {
        return Err(ApiError::Validation("new username is required".into()));
    }

    service::change_username(state.users.as_ref(), user_id, new_username).await?;
    info!(user_id = %user_id, "username changed");
    Ok(Json(MessageResponse {
        message: "username updated successfully".into(),
    }))
}

#[instrument(skip(state, payload))]
async fn change_password(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<ChangePasswordRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    if payload.old_password.is_empty() || payload.new_password.is_empty() {
        return Err(ApiError::Validation("password fields are required".into()));
    }
    if payload.new_password != payload.confirm_password {
        return Err(ApiError::Validation(
            "new password and confirmation do not match".into(),
        ));
    }

    service::change_password(
        state.users.as_ref(),
        user_id,
        &payload.old_password,
        &payload.new_password,
    )
    .await?;
    info!(user_id = %user_id, "password changed");
    Ok(Json(MessageResponse {
        message: "password updated successfully".into(),
    }))
}
