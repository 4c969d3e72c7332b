//! Route handlers

pub mod auth;
pub mod health;
pub mod task;

use axum::{
    extract::{rejection::JsonRejection, FromRequest, Request},
    http::StatusCode,
    Json, Router,
};
use serde::Serialize;

use crate::auth::AuthError;
use crate::state::AppState;

/// Error body; `message` mirrors `error` for clients that read either
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

pub type RouteError = (StatusCode, Json<ErrorResponse>);

pub fn route_error(status: StatusCode, error: impl Into<String>) -> RouteError {
    let error = error.into();
    (
        status,
        Json(ErrorResponse {
            message: error.clone(),
            error,
        }),
    )
}

pub fn bad_request(error: impl Into<String>) -> RouteError {
    route_error(StatusCode::BAD_REQUEST, error)
}

pub fn unauthorized(error: impl Into<String>) -> RouteError {
    route_error(StatusCode::UNAUTHORIZED, error)
}

pub fn not_found(error: impl Into<String>) -> RouteError {
    route_error(StatusCode::NOT_FOUND, error)
}

/// Log the cause and answer with a generic 500
pub fn internal_error(error: impl std::fmt::Display) -> RouteError {
    tracing::error!(error = %error, "request failed");
    route_error(StatusCode::INTERNAL_SERVER_ERROR, "Server error")
}

pub fn auth_error(err: AuthError) -> RouteError {
    match err {
        AuthError::InvalidInput(msg) => bad_request(msg),
        AuthError::EmailTaken(_) => route_error(StatusCode::CONFLICT, "Email already exists"),
        AuthError::InvalidCredentials => unauthorized("Invalid credentials"),
        AuthError::Unauthorized(msg) => {
            tracing::debug!(reason = %msg, "rejected bearer token");
            unauthorized("Invalid or expired token")
        }
        err @ (AuthError::Token(_) | AuthError::Storage(_)) => internal_error(err),
    }
}

/// JSON body extractor whose rejections use the `{error}` shape with 400
pub struct ApiJson<T>(pub T);

impl<S, T> FromRequest<S> for ApiJson<T>
where
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = RouteError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => {
                tracing::debug!(reason = %rejection.body_text(), "rejected request body");
                Err(bad_request(rejection.body_text()))
            }
        }
    }
}

/// All API routes, without state or middleware
pub fn router() -> Router<AppState> {
    Router::new()
        .merge(health::router())
        .merge(auth::router())
        .merge(task::router())
}
