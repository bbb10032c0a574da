//! Message Service - append-only conversation thread per request

use sea_orm::*;

use super::request_lifecycle::find_request;
use crate::domain::DomainError;
use crate::models::message::{self, Entity as Message};
use crate::models::user::Entity as User;

/// Append a message to a request's thread.
///
/// The sender only has to exist; participation in the request is not checked.
pub async fn post_message(
    db: &DatabaseConnection,
    request_id: i32,
    sender_id: i32,
    content: &str,
) -> Result<message::Model, DomainError> {
    let content = content.trim();
    if content.is_empty() {
        return Err(DomainError::InvalidArgument(
            "message content cannot be empty".to_string(),
        ));
    }

    find_request(db, request_id).await?;

    if User::find_by_id(sender_id).one(db).await?.is_none() {
        return Err(DomainError::not_found("user", sender_id));
    }

    let saved = message::ActiveModel {
        request_id: Set(request_id),
        sender_id: Set(sender_id),
        content: Set(content.to_string()),
        created_at: Set(crate::utils::now_rfc3339()),
        ..Default::default()
    }
    .insert(db)
    .await?;

    tracing::debug!("Message {} posted on request {}", saved.id, request_id);

    Ok(saved)
}

/// Snapshot of a request's thread, oldest first
pub async fn list_messages(
    db: &DatabaseConnection,
    request_id: i32,
) -> Result<Vec<message::Model>, DomainError> {
    find_request(db, request_id).await?;

    let messages = Message::find()
        .filter(message::Column::RequestId.eq(request_id))
        .order_by_asc(message::Column::CreatedAt)
        .order_by_asc(message::Column::Id)
        .all(db)
        .await?;

    Ok(messages)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::init_db;
    use crate::models::{book, copy, user, BookCondition, CopyStatus};
    use crate::services::lending_service::{create_request, NewRequest};

    async fn setup() -> (DatabaseConnection, i32, i32, i32) {
        let db = init_db("sqlite::memory:").await.expect("Failed to init db");
        let now = crate::utils::now_rfc3339();

        let mut ids = Vec::new();
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
            ids.push(u.id);
        }

        let book = book::ActiveModel {
            title: Set("Dune".to_string()),
            author: Set("Frank Herbert".to_string()),
            isbn: Set("9780441013593".to_string()),
            created_at: Set(now.clone()),
            ..Default::default()
        }
        .insert(&db)
        .await
        .unwrap();

        let copy = copy::ActiveModel {
            book_id: Set(book.id),
            owner_id: Set(ids[0]),
            condition: Set(BookCondition::Worn),
            status: Set(CopyStatus::Available),
            location: Set("Lisboa".to_string()),
            created_at: Set(now),
            ..Default::default()
        }
        .insert(&db)
        .await
        .unwrap();

        let req = create_request(
            &db,
            NewRequest {
                copy_id: copy.id,
                requester_id: ids[1],
                message: None,
            },
        )
        .await
        .unwrap();

        (db, req.id, ids[0], ids[1])
    }

    #[tokio::test]
    async fn test_thread_is_ordered_and_stable() {
        let (db, request_id, owner, reader) = setup().await;

        post_message(&db, request_id, reader, "Hi, is it still available?")
            .await
            .unwrap();
        post_message(&db, request_id, owner, "Yes, pick it up Friday")
            .await
            .unwrap();
        post_message(&db, request_id, reader, "  Great  ").await.unwrap();

        let first = list_messages(&db, request_id).await.unwrap();
        let second = list_messages(&db, request_id).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(first.len(), 3);
        assert_eq!(first[2].content, "Great");
        assert!(first.windows(2).all(|w| w[0].created_at <= w[1].created_at));
    }

    #[tokio::test]
    async fn test_blank_message_is_rejected() {
        let (db, request_id, _, reader) = setup().await;

        let err = post_message(&db, request_id, reader, "   ").await.unwrap_err();
        assert!(matches!(err, DomainError::InvalidArgument(_)));
        assert!(list_messages(&db, request_id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_request_or_sender() {
        let (db, request_id, _, reader) = setup().await;

        let err = post_message(&db, 999, reader, "hello").await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound(_)));

        let err = post_message(&db, request_id, 999, "hello").await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound(_)));

        let err = list_messages(&db, 999).await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound(_)));
    }
}
