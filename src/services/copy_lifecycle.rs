//! Copy lifecycle - owns `Copy.status`
//!
//! Only the lending coordinator calls the mutator, always inside its own
//! transaction. Both functions are generic over the connection so they work
//! on a `DatabaseConnection` as well as a `DatabaseTransaction`.

use sea_orm::sea_query::Expr;
use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter};

use crate::domain::DomainError;
use crate::models::copy::{self, Entity as Copy};
use crate::models::CopyStatus;

/// Current status of a copy
pub async fn copy_status<C: ConnectionTrait>(
    conn: &C,
    copy_id: i32,
) -> Result<CopyStatus, DomainError> {
    let copy = Copy::find_by_id(copy_id)
        .one(conn)
        .await?
        .ok_or_else(|| DomainError::not_found("copy", copy_id))?;

    Ok(copy.status)
}

/// Move a copy from `from` to `to`.
///
/// The write is a compare-and-set: it only applies while the row still holds
/// `from`, so two callers racing on the same copy cannot both succeed.
pub async fn transition_copy<C: ConnectionTrait>(
    conn: &C,
    copy_id: i32,
    from: CopyStatus,
    to: CopyStatus,
) -> Result<(), DomainError> {
    let result = Copy::update_many()
        .col_expr(copy::Column::Status, Expr::value(to))
        .filter(copy::Column::Id.eq(copy_id))
        .filter(copy::Column::Status.eq(from))
        .exec(conn)
        .await?;

    if result.rows_affected == 0 {
        let current = copy_status(conn, copy_id).await?;
        return Err(DomainError::InvalidState(format!(
            "copy not {}, current status: {}",
            from.as_str().to_lowercase(),
            current
        )));
    }

    tracing::debug!("Copy {} {} -> {}", copy_id, from, to);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::init_db;
    use crate::models::{book, user, BookCondition};
    use sea_orm::{ActiveModelTrait, DatabaseConnection, Set};

    async fn seed_copy(db: &DatabaseConnection) -> i32 {
        let now = crate::utils::now_rfc3339();
        let owner = user::ActiveModel {
            name: Set("Owner".to_string()),
            email: Set("owner@test.com".to_string()),
            created_at: Set(now.clone()),
            ..Default::default()
        }
        .insert(db)
        .await
        .unwrap();
        let book = book::ActiveModel {
            title: Set("Sphere".to_string()),
            author: Set("Michael Crichton".to_string()),
            isbn: Set("9780060541453".to_string()),
            created_at: Set(now.clone()),
            ..Default::default()
        }
        .insert(db)
        .await
        .unwrap();
        copy::ActiveModel {
            book_id: Set(book.id),
            owner_id: Set(owner.id),
            condition: Set(BookCondition::Used),
            status: Set(CopyStatus::Available),
            location: Set("Almada".to_string()),
            created_at: Set(now),
            ..Default::default()
        }
        .insert(db)
        .await
        .unwrap()
        .id
    }

    #[tokio::test]
    async fn test_transition_applies_from_expected_status() {
        let db = init_db("sqlite::memory:").await.unwrap();
        let copy_id = seed_copy(&db).await;

        transition_copy(&db, copy_id, CopyStatus::Available, CopyStatus::Reserved)
            .await
            .expect("transition should apply");

        assert_eq!(copy_status(&db, copy_id).await.unwrap(), CopyStatus::Reserved);
    }

    #[tokio::test]
    async fn test_transition_rejects_stale_status() {
        let db = init_db("sqlite::memory:").await.unwrap();
        let copy_id = seed_copy(&db).await;

        let err = transition_copy(&db, copy_id, CopyStatus::Reserved, CopyStatus::Borrowed)
            .await
            .unwrap_err();

        assert_eq!(
            err,
            DomainError::InvalidState("copy not reserved, current status: AVAILABLE".to_string())
        );
        assert_eq!(copy_status(&db, copy_id).await.unwrap(), CopyStatus::Available);
    }

    #[tokio::test]
    async fn test_missing_copy_is_not_found() {
        let db = init_db("sqlite::memory:").await.unwrap();

        let err = transition_copy(&db, 42, CopyStatus::Available, CopyStatus::Reserved)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::NotFound(_)));
    }
}
