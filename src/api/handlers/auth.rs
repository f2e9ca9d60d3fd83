//! Authentication handlers.

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::api::error::{ApiError, ApiResult};
use crate::api::state::AppState;
use crate::user::{RegisterRequest, UserInfo};

/// Login request.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Login response.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: UserInfo,
}

/// Register a new user.
#[instrument(skip(state, request), fields(username = %request.username))]
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> ApiResult<impl IntoResponse> {
    let user = state.users.register(request).await?;

    info!(user_id = %user.id, username = %user.username, "User registered successfully");

    Ok((StatusCode::CREATED, Json(UserInfo::from(user))))
}

/// Log in and obtain a bearer token.
///
/// An unknown username and a wrong password produce the same response; the
/// API does not reveal which part of the credentials was wrong.
#[instrument(skip(state, request), fields(username = %request.username))]
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    let user = state
        .users
        .verify_credentials(&request.username, &request.password)
        .await?
        .ok_or_else(|| ApiError::bad_request("The username or password is incorrect."))?;

    let token = state
        .auth
        .generate_token(&user.username, &user.display_name, user.role)?;

    info!(user_id = %user.id, "User logged in successfully");

    Ok(Json(LoginResponse {
        token,
        user: user.into(),
    }))
}
