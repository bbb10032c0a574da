//! Repository implementations using SeaORM

pub mod book_repository;
pub mod copy_repository;
pub mod user_repository;

pub use book_repository::SeaOrmBookRepository;
pub use copy_repository::SeaOrmCopyRepository;
pub use user_repository::SeaOrmUserRepository;

use sea_orm::{DbErr, SqlErr};

use crate::domain::DomainError;

/// Map a unique-constraint violation to `InvalidState`, anything else to `Database`
pub(crate) fn map_unique_violation(e: DbErr, message: &str) -> DomainError {
    match e.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => DomainError::InvalidState(message.to_string()),
        _ => e.into(),
    }
}
