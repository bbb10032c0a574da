//! Repository trait definitions
//!
//! These traits define the contract for catalog data access (users, books,
//! copies). Implementations live in the infrastructure layer. The lending
//! lifecycle itself lives in `services`, since it needs a transaction that
//! spans several tables.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::DomainError;
use crate::models::{BookCondition, CopyStatus};

/// User data for API responses
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct User {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub city: Option<String>,
    pub created_at: String,
}

/// Input for registering a user
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateUserInput {
    pub name: String,
    pub email: String,
    pub city: Option<String>,
}

/// Repository trait for User entity
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find all users
    async fn find_all(&self) -> Result<Vec<User>, DomainError>;

    /// Find a user by ID
    async fn find_by_id(&self, id: i32) -> Result<Option<User>, DomainError>;

    /// Create a new user. Fails with `InvalidState` on a duplicate email.
    async fn create(&self, input: CreateUserInput) -> Result<User, DomainError>;
}

/// Book data for API responses
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Book {
    pub id: i32,
    pub title: String,
    pub author: String,
    pub isbn: String,
    pub cover_url: Option<String>,
    pub created_at: String,
}

/// Input for creating a book
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateBookInput {
    pub title: String,
    pub author: String,
    pub isbn: String,
    pub cover_url: Option<String>,
}

/// Repository trait for Book entity
#[async_trait]
pub trait BookRepository: Send + Sync {
    /// Find all books, ordered by title
    async fn find_all(&self) -> Result<Vec<Book>, DomainError>;

    /// Find a single book by ID
    async fn find_by_id(&self, id: i32) -> Result<Option<Book>, DomainError>;

    /// Create a new book. Fails with `InvalidState` on a duplicate ISBN.
    async fn create(&self, input: CreateBookInput) -> Result<Book, DomainError>;
}

/// Copy data for API responses
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Copy {
    pub id: i32,
    pub book_id: i32,
    pub owner_id: i32,
    pub condition: BookCondition,
    pub status: CopyStatus,
    pub location: String,
    pub created_at: String,
    pub book_title: Option<String>,
    pub book_author: Option<String>,
}

/// Filter criteria for copy queries
#[derive(Debug, Default, Clone)]
pub struct CopyFilter {
    pub status: Option<CopyStatus>,
    pub location: Option<String>,
    pub owner_id: Option<i32>,
}

/// Input for registering a copy. New copies always start `AVAILABLE`.
#[derive(Debug, Clone)]
pub struct CreateCopyInput {
    pub book_id: i32,
    pub owner_id: i32,
    pub condition: BookCondition,
    pub location: String,
}

/// Repository trait for Copy entity
#[async_trait]
pub trait CopyRepository: Send + Sync {
    /// Find copies matching the filter, with book details
    async fn find_all(&self, filter: CopyFilter) -> Result<Vec<Copy>, DomainError>;

    /// Find a copy by ID
    async fn find_by_id(&self, id: i32) -> Result<Option<Copy>, DomainError>;

    /// Register a new copy. Book and owner must exist.
    async fn create(&self, input: CreateCopyInput) -> Result<Copy, DomainError>;
}
