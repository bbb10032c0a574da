//! SeaORM implementation of BookRepository

use async_trait::async_trait;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, QueryOrder, Set};

use super::map_unique_violation;
use crate::domain::{Book, BookRepository, CreateBookInput, DomainError};
use crate::models::book::{ActiveModel, Column, Entity as BookEntity, Model};

/// SeaORM-based implementation of BookRepository
pub struct SeaOrmBookRepository {
    db: DatabaseConnection,
}

impl SeaOrmBookRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

impl From<Model> for Book {
    fn from(b: Model) -> Self {
        Book {
            id: b.id,
            title: b.title,
            author: b.author,
            isbn: b.isbn,
            cover_url: b.cover_url,
            created_at: b.created_at,
        }
    }
}

#[async_trait]
impl BookRepository for SeaOrmBookRepository {
    async fn find_all(&self) -> Result<Vec<Book>, DomainError> {
        let books = BookEntity::find()
            .order_by_asc(Column::Title)
            .all(&self.db)
            .await?;

        Ok(books.into_iter().map(Book::from).collect())
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Book>, DomainError> {
        let book = BookEntity::find_by_id(id).one(&self.db).await?;
        Ok(book.map(Book::from))
    }

    async fn create(&self, input: CreateBookInput) -> Result<Book, DomainError> {
        if input.title.trim().is_empty() || input.isbn.trim().is_empty() {
            return Err(DomainError::InvalidArgument(
                "title and isbn are required".to_string(),
            ));
        }

        let book = ActiveModel {
            title: Set(input.title.trim().to_string()),
            author: Set(input.author.trim().to_string()),
            isbn: Set(input.isbn.trim().to_string()),
            cover_url: Set(input.cover_url),
            created_at: Set(crate::utils::now_rfc3339()),
            ..Default::default()
        };

        let result = book
            .insert(&self.db)
            .await
            .map_err(|e| map_unique_violation(e, "a book with this isbn already exists"))?;

        Ok(result.into())
    }
}
