//! Copy API handlers using repository pattern

use axum::{Json, extract::State, http::StatusCode};
use serde::Deserialize;
use serde_json::{Value, json};
use utoipa::{IntoParams, ToSchema};

use super::extract::{ApiJson, ApiPath, ApiQuery};
use crate::domain::{CopyFilter, CreateCopyInput, DomainError};
use crate::infrastructure::AppState;
use crate::models::{BookCondition, CopyStatus};

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListCopiesQuery {
    pub status: Option<String>,
    pub location: Option<String>,
}

// List copies, optionally by status and municipality
#[utoipa::path(
    get,
    path = "/api/copies",
    params(ListCopiesQuery),
    responses(
        (status = 200, description = "Copies, newest first"),
        (status = 400, description = "Unknown status value")
    )
)]
pub async fn list_copies(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<ListCopiesQuery>,
) -> Result<Json<Value>, DomainError> {
    let status = query
        .status
        .as_deref()
        .map(str::parse::<CopyStatus>)
        .transpose()?;

    let copies = state
        .copy_repo
        .find_all(CopyFilter {
            status,
            location: query.location,
            owner_id: None,
        })
        .await?;
    let total = copies.len();
    Ok(Json(json!({ "copies": copies, "total": total })))
}

/// Request DTO for registering a copy
///
/// Status is not accepted here: every copy starts AVAILABLE. Enum values
/// arrive as strings so that unknown ones map to a 400.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateCopyRequest {
    pub book_id: i32,
    pub owner_id: i32,
    pub condition: Option<String>,
    pub location: Option<String>,
}

// Register a new copy
#[utoipa::path(
    post,
    path = "/api/copies",
    request_body = CreateCopyRequest,
    responses(
        (status = 201, description = "Copy registered as AVAILABLE"),
        (status = 400, description = "Unknown condition, missing location or malformed body"),
        (status = 404, description = "Book or owner not found")
    )
)]
pub async fn create_copy(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<CreateCopyRequest>,
) -> Result<(StatusCode, Json<Value>), DomainError> {
    let condition = match payload.condition.as_deref() {
        Some(raw) => raw.parse::<BookCondition>()?,
        None => BookCondition::Ok,
    };

    // Fall back to the owner's city when no location is given
    let location = match payload.location {
        Some(location) => location,
        None => state
            .user_repo
            .find_by_id(payload.owner_id)
            .await?
            .and_then(|u| u.city)
            .unwrap_or_default(),
    };

    let copy = state
        .copy_repo
        .create(CreateCopyInput {
            book_id: payload.book_id,
            owner_id: payload.owner_id,
            condition,
            location,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "copy": copy,
            "message": "Copy created successfully"
        })),
    ))
}

// Get a single copy by ID
#[utoipa::path(
    get,
    path = "/api/copies/{id}",
    params(("id" = i32, Path, description = "Copy id")),
    responses(
        (status = 200, description = "Copy found"),
        (status = 404, description = "Copy not found")
    )
)]
pub async fn get_copy(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
) -> Result<Json<Value>, DomainError> {
    let copy = state
        .copy_repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| DomainError::not_found("copy", id))?;
    Ok(Json(json!({ "copy": copy })))
}
