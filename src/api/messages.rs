use axum::{
    Json,
    extract::State,
    http::StatusCode,
};
use serde::Deserialize;
use serde_json::{Value, json};
use utoipa::ToSchema;

use super::extract::{ApiJson, ApiPath};
use crate::domain::DomainError;
use crate::infrastructure::AppState;
use crate::services::message_service;

#[derive(Debug, Deserialize, ToSchema)]
pub struct PostMessagePayload {
    pub sender_id: i32,
    pub content: String,
}

#[utoipa::path(
    post,
    path = "/api/requests/{id}/messages",
    params(("id" = i32, Path, description = "Request id")),
    request_body = PostMessagePayload,
    responses(
        (status = 201, description = "Message appended"),
        (status = 400, description = "Empty content or malformed body"),
        (status = 404, description = "Request or sender not found")
    )
)]
pub async fn post_message(
    State(state): State<AppState>,
    ApiPath(request_id): ApiPath<i32>,
    ApiJson(payload): ApiJson<PostMessagePayload>,
) -> Result<(StatusCode, Json<Value>), DomainError> {
    let message =
        message_service::post_message(state.db(), request_id, payload.sender_id, &payload.content)
            .await?;

    Ok((StatusCode::CREATED, Json(json!({ "message": message }))))
}

#[utoipa::path(
    get,
    path = "/api/requests/{id}/messages",
    params(("id" = i32, Path, description = "Request id")),
    responses(
        (status = 200, description = "Thread, oldest first"),
        (status = 404, description = "Request not found")
    )
)]
pub async fn list_messages(
    State(state): State<AppState>,
    ApiPath(request_id): ApiPath<i32>,
) -> Result<Json<Value>, DomainError> {
    let messages = message_service::list_messages(state.db(), request_id).await?;
    Ok(Json(json!({ "messages": messages })))
}
