use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{auth_error, bad_request, unauthorized, ApiJson, RouteError};
use crate::{auth::UserSummary, state::AppState};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SignupRequest {
    #[serde(default)]
    name: String,
    #[serde(default)]
    email: String,
    #[serde(default)]
    password: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LoginRequest {
    #[serde(default)]
    email: String,
    #[serde(default)]
    password: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AuthResponse {
    message: String,
    token: String,
    expires_at: String,
    user: UserSummary,
}

fn format_expiry(exp: usize) -> String {
    DateTime::<Utc>::from_timestamp(exp as i64, 0)
        .map(|value| value.to_rfc3339())
        .unwrap_or_else(|| Utc::now().to_rfc3339())
}

fn all_present(fields: &[&str]) -> bool {
    fields.iter().all(|field| !field.trim().is_empty())
}

/// POST /api/v1/auth/signup
async fn signup(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<SignupRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), RouteError> {
    if !all_present(&[req.name.as_str(), req.email.as_str(), req.password.as_str()]) {
        return Err(bad_request("All fields are required"));
    }

    let user = state
        .users()
        .create_user(&req.name, &req.email, &req.password)
        .await
        .map_err(auth_error)?;
    let (token, exp) = state.jwt().issue_user_jwt(user.id).map_err(auth_error)?;
    tracing::info!(user_id = %user.id, "user signed up");

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            message: "User created successfully".to_string(),
            token,
            expires_at: format_expiry(exp),
            user: UserSummary::from(&user),
        }),
    ))
}

/// POST /api/v1/auth/login
async fn login(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<LoginRequest>,
) -> Result<Json<AuthResponse>, RouteError> {
    if !all_present(&[req.email.as_str(), req.password.as_str()]) {
        return Err(bad_request("All fields are required"));
    }

    let user = state
        .users()
        .authenticate(&req.email, &req.password)
        .await
        .map_err(auth_error)?;
    let (token, exp) = state.jwt().issue_user_jwt(user.id).map_err(auth_error)?;

    Ok(Json(AuthResponse {
        message: "Login successful".to_string(),
        token,
        expires_at: format_expiry(exp),
        user: UserSummary::from(&user),
    }))
}

/// GET /api/v1/auth/me
async fn me(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<UserSummary>, RouteError> {
    let user_id = state.jwt().resolve_user(&headers).map_err(auth_error)?;
    let user = state
        .users()
        .get_user(user_id)
        .await
        .ok_or_else(|| unauthorized("User not found"))?;
    Ok(Json(UserSummary::from(&user)))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/v1/auth/signup", post(signup))
        .route("/api/v1/auth/login", post(login))
        .route("/api/v1/auth/me", get(me))
}
