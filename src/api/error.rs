//! Mapping of domain errors to HTTP responses

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::domain::DomainError;

impl DomainError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            DomainError::NotFound(_) => StatusCode::NOT_FOUND,
            DomainError::InvalidState(_) => StatusCode::CONFLICT,
            DomainError::InvalidOperation(_) => StatusCode::FORBIDDEN,
            DomainError::InvalidArgument(_) => StatusCode::BAD_REQUEST,
            DomainError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for DomainError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!("Request failed: {}", self);
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_each_error_kind_has_distinct_status() {
        let codes = [
            DomainError::NotFound("x".into()).status_code(),
            DomainError::InvalidState("x".into()).status_code(),
            DomainError::InvalidOperation("x".into()).status_code(),
            DomainError::InvalidArgument("x".into()).status_code(),
            DomainError::Database("x".into()).status_code(),
        ];
        for (i, a) in codes.iter().enumerate() {
            for b in &codes[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }
}
