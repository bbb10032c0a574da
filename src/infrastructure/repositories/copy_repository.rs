//! SeaORM implementation of CopyRepository

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, Set,
};

use crate::domain::{Copy, CopyFilter, CopyRepository, CreateCopyInput, DomainError};
use crate::models::book::{self, Entity as BookEntity};
use crate::models::copy::{ActiveModel, Column, Entity as CopyEntity, Model};
use crate::models::user::Entity as UserEntity;
use crate::models::CopyStatus;

/// SeaORM-based implementation of CopyRepository
pub struct SeaOrmCopyRepository {
    db: DatabaseConnection,
}

impl SeaOrmCopyRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn to_copy(copy: Model, book: Option<book::Model>) -> Copy {
    Copy {
        id: copy.id,
        book_id: copy.book_id,
        owner_id: copy.owner_id,
        condition: copy.condition,
        status: copy.status,
        location: copy.location,
        created_at: copy.created_at,
        book_title: book.as_ref().map(|b| b.title.clone()),
        book_author: book.map(|b| b.author),
    }
}

#[async_trait]
impl CopyRepository for SeaOrmCopyRepository {
    async fn find_all(&self, filter: CopyFilter) -> Result<Vec<Copy>, DomainError> {
        let mut condition = Condition::all();

        if let Some(status) = filter.status {
            condition = condition.add(Column::Status.eq(status));
        }

        if let Some(location) = filter.location {
            condition = condition.add(Column::Location.eq(location));
        }

        if let Some(owner_id) = filter.owner_id {
            condition = condition.add(Column::OwnerId.eq(owner_id));
        }

        let copies_with_books = CopyEntity::find()
            .filter(condition)
            .order_by_desc(Column::CreatedAt)
            .order_by_desc(Column::Id)
            .find_also_related(BookEntity)
            .all(&self.db)
            .await?;

        Ok(copies_with_books
            .into_iter()
            .map(|(copy, book)| to_copy(copy, book))
            .collect())
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Copy>, DomainError> {
        let result = CopyEntity::find_by_id(id)
            .find_also_related(BookEntity)
            .one(&self.db)
            .await?;

        Ok(result.map(|(copy, book)| to_copy(copy, book)))
    }

    async fn create(&self, input: CreateCopyInput) -> Result<Copy, DomainError> {
        let book = BookEntity::find_by_id(input.book_id)
            .one(&self.db)
            .await?
            .ok_or_else(|| DomainError::not_found("book", input.book_id))?;

        if UserEntity::find_by_id(input.owner_id)
            .one(&self.db)
            .await?
            .is_none()
        {
            return Err(DomainError::not_found("user", input.owner_id));
        }

        let location = input.location.trim().to_string();
        if location.is_empty() {
            return Err(DomainError::InvalidArgument(
                "location is required".to_string(),
            ));
        }

        let new_copy = ActiveModel {
            book_id: Set(input.book_id),
            owner_id: Set(input.owner_id),
            condition: Set(input.condition),
            status: Set(CopyStatus::Available),
            location: Set(location),
            created_at: Set(crate::utils::now_rfc3339()),
            ..Default::default()
        };

        let result = new_copy.insert(&self.db).await?;

        tracing::info!(
            "Copy {} of '{}' registered by user {}",
            result.id,
            book.title,
            result.owner_id
        );

        Ok(to_copy(result, Some(book)))
    }
}
