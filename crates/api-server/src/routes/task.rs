//! Task API endpoints
//!
//! Owner-scoped task CRUD plus the cached paginated listing.

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use taskboard_core::listing::{ListingQuery, ListingResult};
use taskboard_core::service::NewTask;
use taskboard_core::task::{Task, TaskPatch};
use taskboard_core::Error;

use super::{auth_error, bad_request, internal_error, not_found, ApiJson, RouteError};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ListTasksQuery {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub page: Option<String>,
    #[serde(default)]
    pub limit: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

fn task_error(err: Error) -> RouteError {
    match err {
        Error::TaskNotFound(_) => not_found("Task not found"),
        Error::InvalidInput(msg) => bad_request(msg),
        err => internal_error(err),
    }
}

fn parse_number(raw: Option<&str>, field: &str) -> Result<Option<u64>, RouteError> {
    raw.map(str::trim)
        .filter(|value| !value.is_empty())
        .map(|value| {
            value
                .parse::<u64>()
                .map_err(|_| bad_request(format!("Invalid {}", field)))
        })
        .transpose()
}

/// Ids that are not UUIDs cannot name a task, so they are reported the
/// same way as a missing one.
fn parse_task_id(raw: &str) -> Result<Uuid, RouteError> {
    Uuid::parse_str(raw).map_err(|_| not_found("Task not found"))
}

fn require_user(state: &AppState, headers: &HeaderMap) -> Result<Uuid, RouteError> {
    state.jwt().resolve_user(headers).map_err(auth_error)
}

/// GET /api/v1/tasks - Paginated listing, newest first
async fn list_tasks(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<ListTasksQuery>,
) -> Result<Json<ListingResult>, RouteError> {
    let owner = require_user(&state, &headers)?;
    let listing_query = ListingQuery::parse(
        owner,
        query.status.as_deref(),
        parse_number(query.page.as_deref(), "page")?,
        parse_number(query.limit.as_deref(), "limit")?,
    )
    .map_err(task_error)?;

    let listing = state
        .tasks()
        .get_listing(&listing_query)
        .await
        .map_err(task_error)?;
    Ok(Json(listing))
}

/// POST /api/v1/tasks - Create a task
async fn create_task(
    State(state): State<AppState>,
    headers: HeaderMap,
    ApiJson(req): ApiJson<NewTask>,
) -> Result<(StatusCode, Json<Task>), RouteError> {
    let owner = require_user(&state, &headers)?;
    let created = state
        .tasks()
        .create_task(owner, req)
        .await
        .map_err(task_error)?;
    tracing::debug!(owner = %owner, task_id = %created.id, "task created");
    Ok((StatusCode::CREATED, Json(created)))
}

/// GET /api/v1/tasks/{id} - Get a single task
async fn get_task(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<Task>, RouteError> {
    let owner = require_user(&state, &headers)?;
    let id = parse_task_id(&id)?;
    let task = state
        .tasks()
        .get_task(owner, id)
        .await
        .map_err(task_error)?;
    Ok(Json(task))
}

/// PUT /api/v1/tasks/{id} - Update a task
async fn update_task(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
    ApiJson(patch): ApiJson<TaskPatch>,
) -> Result<Json<Task>, RouteError> {
    let owner = require_user(&state, &headers)?;
    let id = parse_task_id(&id)?;
    let updated = state
        .tasks()
        .update_task(owner, id, patch)
        .await
        .map_err(task_error)?;
    Ok(Json(updated))
}

/// DELETE /api/v1/tasks/{id} - Delete a task
async fn delete_task(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, RouteError> {
    let owner = require_user(&state, &headers)?;
    let id = parse_task_id(&id)?;
    state
        .tasks()
        .delete_task(owner, id)
        .await
        .map_err(task_error)?;
    Ok(Json(MessageResponse {
        message: "Task deleted successfully".to_string(),
    }))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/v1/tasks", post(create_task).get(list_tasks))
        .route(
            "/api/v1/tasks/{id}",
            get(get_task).put(update_task).delete(delete_task),
        )
}
