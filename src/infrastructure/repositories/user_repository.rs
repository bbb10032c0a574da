//! SeaORM implementation of UserRepository

use async_trait::async_trait;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, QueryOrder, Set};

use super::map_unique_violation;
use crate::domain::{CreateUserInput, DomainError, User, UserRepository};
use crate::models::user::{ActiveModel, Column, Entity as UserEntity, Model};

/// SeaORM-based implementation of UserRepository
pub struct SeaOrmUserRepository {
    db: DatabaseConnection,
}

impl SeaOrmUserRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

impl From<Model> for User {
    fn from(u: Model) -> Self {
        User {
            id: u.id,
            name: u.name,
            email: u.email,
            city: u.city,
            created_at: u.created_at,
        }
    }
}

#[async_trait]
impl UserRepository for SeaOrmUserRepository {
    async fn find_all(&self) -> Result<Vec<User>, DomainError> {
        let users = UserEntity::find()
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await?;

        Ok(users.into_iter().map(User::from).collect())
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<User>, DomainError> {
        let user = UserEntity::find_by_id(id).one(&self.db).await?;
        Ok(user.map(User::from))
    }

    async fn create(&self, input: CreateUserInput) -> Result<User, DomainError> {
        if input.name.trim().is_empty() || input.email.trim().is_empty() {
            return Err(DomainError::InvalidArgument(
                "name and email are required".to_string(),
            ));
        }

        let user = ActiveModel {
            name: Set(input.name.trim().to_string()),
            email: Set(input.email.trim().to_lowercase()),
            city: Set(input.city),
            created_at: Set(crate::utils::now_rfc3339()),
            ..Default::default()
        };

        let result = user
            .insert(&self.db)
            .await
            .map_err(|e| map_unique_violation(e, "email already registered"))?;

        Ok(result.into())
    }
}
