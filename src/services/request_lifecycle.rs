//! Request lifecycle - owns `Request.status` and `Request.updated_at`

use sea_orm::sea_query::Expr;
use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter};

use crate::domain::DomainError;
use crate::models::request::{self, Entity as Request};
use crate::models::RequestStatus;

/// Load a request, `NotFound` if absent. Never touches `updated_at`.
pub async fn find_request<C: ConnectionTrait>(
    conn: &C,
    request_id: i32,
) -> Result<request::Model, DomainError> {
    Request::find_by_id(request_id)
        .one(conn)
        .await?
        .ok_or_else(|| DomainError::not_found("request", request_id))
}

/// Current status of a request
pub async fn request_status<C: ConnectionTrait>(
    conn: &C,
    request_id: i32,
) -> Result<RequestStatus, DomainError> {
    Ok(find_request(conn, request_id).await?.status)
}

/// Move a request from `from` to `to` and refresh `updated_at`.
///
/// Guarded on the current status like `transition_copy`.
pub async fn transition_request<C: ConnectionTrait>(
    conn: &C,
    request_id: i32,
    from: RequestStatus,
    to: RequestStatus,
) -> Result<(), DomainError> {
    let result = Request::update_many()
        .col_expr(request::Column::Status, Expr::value(to))
        .col_expr(
            request::Column::UpdatedAt,
            Expr::value(crate::utils::now_rfc3339()),
        )
        .filter(request::Column::Id.eq(request_id))
        .filter(request::Column::Status.eq(from))
        .exec(conn)
        .await?;

    if result.rows_affected == 0 {
        let current = request_status(conn, request_id).await?;
        return Err(DomainError::InvalidState(format!(
            "request not {}, current status: {}",
            from.as_str().to_lowercase(),
            current
        )));
    }

    tracing::debug!("Request {} {} -> {}", request_id, from, to);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::init_db;
    use crate::models::{book, copy, user, BookCondition, CopyStatus};
    use sea_orm::{ActiveModelTrait, DatabaseConnection, Set};

    const STALE: &str = "2000-01-01T00:00:00.000000Z";

    // One PENDING request whose updated_at is pinned in the past
    async fn setup() -> (DatabaseConnection, i32) {
        let db = init_db("sqlite::memory:").await.expect("Failed to init db");
        let now = crate::utils::now_rfc3339();

        let mut users = Vec::new();
        for name in ["owner", "reader"] {
            let u = user::ActiveModel {
                name: Set(name.to_string()),
                email: Set(format!("{}@test.com", name)),
                created_at: Set(now.clone()),
                ..Default::default()
            }
            .insert(&db)
            .await
            .unwrap();
            users.push(u.id);
        }

        let book = book::ActiveModel {
            title: Set("Sphere".to_string()),
            author: Set("Michael Crichton".to_string()),
            isbn: Set("9780345353146".to_string()),
            created_at: Set(now.clone()),
            ..Default::default()
        }
        .insert(&db)
        .await
        .unwrap();

        let copy = copy::ActiveModel {
            book_id: Set(book.id),
            owner_id: Set(users[0]),
            condition: Set(BookCondition::Used),
            status: Set(CopyStatus::Available),
            location: Set("Almada".to_string()),
            created_at: Set(now),
            ..Default::default()
        }
        .insert(&db)
        .await
        .unwrap();

        let req = request::ActiveModel {
            copy_id: Set(copy.id),
            requester_id: Set(users[1]),
            status: Set(RequestStatus::Pending),
            message: Set(None),
            created_at: Set(STALE.to_string()),
            updated_at: Set(STALE.to_string()),
            ..Default::default()
        }
        .insert(&db)
        .await
        .unwrap();

        (db, req.id)
    }

    #[tokio::test]
    async fn test_transition_refreshes_updated_at() {
        let (db, id) = setup().await;

        transition_request(&db, id, RequestStatus::Pending, RequestStatus::Accepted)
            .await
            .unwrap();

        let req = find_request(&db, id).await.unwrap();
        assert_eq!(req.status, RequestStatus::Accepted);
        assert!(req.updated_at.as_str() > STALE);
        assert_eq!(req.created_at, STALE);
    }

    #[tokio::test]
    async fn test_reads_leave_updated_at_alone() {
        let (db, id) = setup().await;

        assert_eq!(
            request_status(&db, id).await.unwrap(),
            RequestStatus::Pending
        );
        let req = find_request(&db, id).await.unwrap();
        assert_eq!(req.updated_at, STALE);
    }

    #[tokio::test]
    async fn test_stale_from_status_is_rejected() {
        let (db, id) = setup().await;

        let err = transition_request(&db, id, RequestStatus::Accepted, RequestStatus::Completed)
            .await
            .unwrap_err();
        assert_eq!(
            err,
            DomainError::InvalidState("request not accepted, current status: PENDING".to_string())
        );

        let req = find_request(&db, id).await.unwrap();
        assert_eq!(req.status, RequestStatus::Pending);
        assert_eq!(req.updated_at, STALE);
    }

    #[tokio::test]
    async fn test_missing_request_is_not_found() {
        let (db, _) = setup().await;

        let err = transition_request(&db, 999, RequestStatus::Pending, RequestStatus::Accepted)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::NotFound(_)));
    }
}
