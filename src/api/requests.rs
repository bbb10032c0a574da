//! Borrow request handlers
//!
//! Thin wrappers over `services::lending_service`: they parse the boundary
//! values (status strings, acting user) and map the result to JSON.

use axum::{
    Json,
    extract::State,
    http::StatusCode,
};
use serde::Deserialize;
use serde_json::{Value, json};
use utoipa::{IntoParams, ToSchema};

use super::extract::{ApiJson, ApiPath, ApiQuery};
use crate::domain::DomainError;
use crate::infrastructure::AppState;
use crate::models::RequestStatus;
use crate::services::lending_service::{self, NewRequest, RequestFilter};

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateRequestPayload {
    pub copy_id: i32,
    pub requester_id: i32,
    pub message: Option<String>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListRequestsQuery {
    pub copy_id: Option<i32>,
    pub requester_id: Option<i32>,
    pub status: Option<String>,
}

/// User performing a lifecycle action
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ActorQuery {
    pub actor_id: Option<i32>,
}

impl ActorQuery {
    fn resolve(self, state: &AppState) -> Result<Option<i32>, DomainError> {
        if state.require_actor && self.actor_id.is_none() {
            return Err(DomainError::InvalidArgument(
                "actor_id is required".to_string(),
            ));
        }
        Ok(self.actor_id)
    }
}

#[utoipa::path(
    post,
    path = "/api/requests",
    request_body = CreateRequestPayload,
    responses(
        (status = 201, description = "Request created in PENDING status"),
        (status = 400, description = "Malformed body"),
        (status = 403, description = "Requester owns the copy"),
        (status = 404, description = "Copy not found"),
        (status = 409, description = "Copy is not available")
    )
)]
pub async fn create_request(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<CreateRequestPayload>,
) -> Result<(StatusCode, Json<Value>), DomainError> {
    let request = lending_service::create_request(
        state.db(),
        NewRequest {
            copy_id: payload.copy_id,
            requester_id: payload.requester_id,
            message: payload.message,
        },
    )
    .await?;

    Ok((StatusCode::CREATED, Json(json!({ "request": request }))))
}

#[utoipa::path(
    get,
    path = "/api/requests",
    params(ListRequestsQuery),
    responses(
        (status = 200, description = "Requests, newest first"),
        (status = 400, description = "Unknown status value")
    )
)]
pub async fn list_requests(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<ListRequestsQuery>,
) -> Result<Json<Value>, DomainError> {
    let status = query
        .status
        .as_deref()
        .map(str::parse::<RequestStatus>)
        .transpose()?;

    let requests = lending_service::list_requests(
        state.db(),
        RequestFilter {
            copy_id: query.copy_id,
            requester_id: query.requester_id,
            status,
        },
    )
    .await?;

    let total = requests.len();
    Ok(Json(json!({ "requests": requests, "total": total })))
}

#[utoipa::path(
    get,
    path = "/api/requests/{id}",
    params(("id" = i32, Path, description = "Request id")),
    responses(
        (status = 200, description = "Request found"),
        (status = 404, description = "Request not found")
    )
)]
pub async fn get_request(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
) -> Result<Json<Value>, DomainError> {
    let request = lending_service::get_request(state.db(), id).await?;
    Ok(Json(json!({ "request": request })))
}

#[utoipa::path(
    put,
    path = "/api/requests/{id}/accept",
    params(("id" = i32, Path, description = "Request id"), ActorQuery),
    responses(
        (status = 200, description = "Request ACCEPTED, copy RESERVED"),
        (status = 403, description = "Actor is not the copy owner"),
        (status = 404, description = "Request not found"),
        (status = 409, description = "Request not pending or copy not available")
    )
)]
pub async fn accept_request(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
    ApiQuery(actor): ApiQuery<ActorQuery>,
) -> Result<Json<Value>, DomainError> {
    let actor_id = actor.resolve(&state)?;
    let request = lending_service::accept_request(state.db(), id, actor_id).await?;

    Ok(Json(json!({
        "request": request,
        "message": "Request accepted"
    })))
}

#[utoipa::path(
    put,
    path = "/api/requests/{id}/confirm",
    params(("id" = i32, Path, description = "Request id"), ActorQuery),
    responses(
        (status = 200, description = "Request COMPLETED, copy BORROWED"),
        (status = 403, description = "Actor is not the requester"),
        (status = 404, description = "Request not found"),
        (status = 409, description = "Request not accepted")
    )
)]
pub async fn confirm_delivery(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
    ApiQuery(actor): ApiQuery<ActorQuery>,
) -> Result<Json<Value>, DomainError> {
    let actor_id = actor.resolve(&state)?;
    let request = lending_service::confirm_delivery(state.db(), id, actor_id).await?;

    Ok(Json(json!({
        "request": request,
        "message": "Delivery confirmed"
    })))
}

#[utoipa::path(
    delete,
    path = "/api/requests/{id}",
    params(("id" = i32, Path, description = "Request id"), ActorQuery),
    responses(
        (status = 200, description = "Request deleted"),
        (status = 403, description = "Actor is not the requester"),
        (status = 404, description = "Request not found")
    )
)]
pub async fn cancel_request(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
    ApiQuery(actor): ApiQuery<ActorQuery>,
) -> Result<Json<Value>, DomainError> {
    let actor_id = actor.resolve(&state)?;

    if lending_service::cancel_request(state.db(), id, actor_id).await? {
        Ok(Json(json!({ "deleted": true, "message": "Request cancelled" })))
    } else {
        Err(DomainError::not_found("request", id))
    }
}
