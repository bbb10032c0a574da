//! Domain error types
//!
//! These errors are framework-agnostic and represent business-level failures.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Referenced copy, request, user or book does not exist
    NotFound(String),
    /// Current status (or a uniqueness rule) forbids the operation
    InvalidState(String),
    /// Operation not permitted for this caller (self-request, wrong actor)
    InvalidOperation(String),
    /// Malformed value at the boundary (unknown status, blank content)
    InvalidArgument(String),
    /// Database/persistence error
    Database(String),
}

impl DomainError {
    pub fn not_found(entity: &str, id: i32) -> Self {
        DomainError::NotFound(format!("{} {} not found", entity, id))
    }
}

impl fmt::Display for DomainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DomainError::NotFound(msg) => write!(f, "{}", msg),
            DomainError::InvalidState(msg) => write!(f, "{}", msg),
            DomainError::InvalidOperation(msg) => write!(f, "{}", msg),
            DomainError::InvalidArgument(msg) => write!(f, "Invalid argument: {}", msg),
            DomainError::Database(msg) => write!(f, "Database error: {}", msg),
        }
    }
}

impl std::error::Error for DomainError {}

// Conversion from SeaORM errors (used in infrastructure and service layers)
impl From<sea_orm::DbErr> for DomainError {
    fn from(e: sea_orm::DbErr) -> Self {
        DomainError::Database(e.to_string())
    }
}

