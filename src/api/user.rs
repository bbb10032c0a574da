//! User API handlers using repository pattern

use axum::{Json, extract::State, http::StatusCode};
use serde_json::{Value, json};

use super::extract::{ApiJson, ApiPath};
use crate::domain::{CopyFilter, CreateUserInput, DomainError};
use crate::infrastructure::AppState;
use crate::services::lending_service;

// List all users
#[utoipa::path(
    get,
    path = "/api/users",
    responses((status = 200, description = "All registered users"))
)]
pub async fn list_users(State(state): State<AppState>) -> Result<Json<Value>, DomainError> {
    let users = state.user_repo.find_all().await?;
    let total = users.len();
    Ok(Json(json!({ "users": users, "total": total })))
}

// Register a user
#[utoipa::path(
    post,
    path = "/api/users",
    request_body = CreateUserInput,
    responses(
        (status = 201, description = "User registered"),
        (status = 400, description = "Missing name or email"),
        (status = 409, description = "Email already registered")
    )
)]
pub async fn create_user(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<CreateUserInput>,
) -> Result<(StatusCode, Json<Value>), DomainError> {
    let user = state.user_repo.create(payload).await?;
    Ok((StatusCode::CREATED, Json(json!({ "user": user }))))
}

// Get a single user by ID
#[utoipa::path(
    get,
    path = "/api/users/{id}",
    params(("id" = i32, Path, description = "User id")),
    responses(
        (status = 200, description = "User found"),
        (status = 404, description = "User not found")
    )
)]
pub async fn get_user(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
) -> Result<Json<Value>, DomainError> {
    let user = state
        .user_repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| DomainError::not_found("user", id))?;
    Ok(Json(json!({ "user": user })))
}

/// Copies registered by a user
#[utoipa::path(
    get,
    path = "/api/users/{id}/copies",
    params(("id" = i32, Path, description = "User id")),
    responses(
        (status = 200, description = "Copies owned by the user"),
        (status = 404, description = "User not found")
    )
)]
pub async fn get_user_copies(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
) -> Result<Json<Value>, DomainError> {
    if state.user_repo.find_by_id(id).await?.is_none() {
        return Err(DomainError::not_found("user", id));
    }

    let copies = state
        .copy_repo
        .find_all(CopyFilter {
            owner_id: Some(id),
            ..Default::default()
        })
        .await?;
    let total = copies.len();
    Ok(Json(json!({ "copies": copies, "total": total })))
}

/// Requests the user sent to other owners
#[utoipa::path(
    get,
    path = "/api/users/{id}/requests/outgoing",
    params(("id" = i32, Path, description = "User id")),
    responses(
        (status = 200, description = "Requests made by the user"),
        (status = 404, description = "User not found")
    )
)]
pub async fn get_outgoing_requests(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
) -> Result<Json<Value>, DomainError> {
    let requests = lending_service::outgoing_requests(state.db(), id).await?;
    Ok(Json(json!({ "requests": requests })))
}

/// Requests other users sent for the user's copies
#[utoipa::path(
    get,
    path = "/api/users/{id}/requests/incoming",
    params(("id" = i32, Path, description = "User id")),
    responses(
        (status = 200, description = "Requests on the user's copies"),
        (status = 404, description = "User not found")
    )
)]
pub async fn get_incoming_requests(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
) -> Result<Json<Value>, DomainError> {
    let requests = lending_service::incoming_requests(state.db(), id).await?;
    Ok(Json(json!({ "requests": requests })))
}
