use axum::{Json, extract::State, http::StatusCode};
use serde_json::{Value, json};

use super::extract::{ApiJson, ApiPath};
use crate::domain::{CreateBookInput, DomainError};
use crate::infrastructure::AppState;

#[utoipa::path(
    get,
    path = "/api/books",
    responses((status = 200, description = "Catalog, by title"))
)]
pub async fn list_books(State(state): State<AppState>) -> Result<Json<Value>, DomainError> {
    let books = state.book_repo.find_all().await?;
    let total = books.len();
    Ok(Json(json!({ "books": books, "total": total })))
}

#[utoipa::path(
    post,
    path = "/api/books",
    request_body = CreateBookInput,
    responses(
        (status = 201, description = "Book added to the catalog"),
        (status = 400, description = "Missing title or isbn"),
        (status = 409, description = "ISBN already registered")
    )
)]
pub async fn create_book(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<CreateBookInput>,
) -> Result<(StatusCode, Json<Value>), DomainError> {
    let book = state.book_repo.create(payload).await?;
    Ok((StatusCode::CREATED, Json(json!({ "book": book }))))
}

#[utoipa::path(
    get,
    path = "/api/books/{id}",
    params(("id" = i32, Path, description = "Book id")),
    responses(
        (status = 200, description = "Book found"),
        (status = 404, description = "Book not found")
    )
)]
pub async fn get_book(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
) -> Result<Json<Value>, DomainError> {
    let book = state
        .book_repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| DomainError::not_found("book", id))?;
    Ok(Json(json!({ "book": book })))
}
