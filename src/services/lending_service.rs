//! Lending Service - borrow request coordination without HTTP layer
//!
//! Every lifecycle call runs in one transaction: preconditions are checked
//! first, then the request and copy transitions are written together. Any
//! early return drops the transaction, which rolls it back.

use sea_orm::*;
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use utoipa::ToSchema;

use super::copy_lifecycle::transition_copy;
use super::request_lifecycle::{find_request, transition_request};
use crate::domain::DomainError;
use crate::models::book::Entity as Book;
use crate::models::copy::{self, Entity as Copy};
use crate::models::message::{self, Entity as Message};
use crate::models::request::{self, Entity as Request};
use crate::models::user::Entity as User;
use crate::models::{CopyStatus, RequestStatus};

/// Input for a new borrow request
#[derive(Debug, Clone)]
pub struct NewRequest {
    pub copy_id: i32,
    pub requester_id: i32,
    pub message: Option<String>,
}

/// Filter parameters for listing requests
#[derive(Debug, Default, Clone)]
pub struct RequestFilter {
    pub copy_id: Option<i32>,
    pub requester_id: Option<i32>,
    pub status: Option<RequestStatus>,
}

/// Request enriched with book and participant names
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RequestWithDetails {
    pub id: i32,
    pub copy_id: i32,
    pub requester_id: i32,
    pub status: RequestStatus,
    pub message: Option<String>,
    pub created_at: String,
    pub updated_at: String,
    pub book_title: String,
    pub owner_id: Option<i32>,
    pub owner_name: String,
    pub requester_name: String,
}

/// Create a PENDING request against an AVAILABLE copy.
///
/// The copy keeps its AVAILABLE status, so other users may still request it
/// until the owner accepts one.
pub async fn create_request(
    db: &DatabaseConnection,
    input: NewRequest,
) -> Result<request::Model, DomainError> {
    let txn = db.begin().await?;

    // 1. Copy must exist
    let copy = Copy::find_by_id(input.copy_id)
        .one(&txn)
        .await?
        .ok_or_else(|| DomainError::not_found("copy", input.copy_id))?;

    // 2. Copy must be available
    if copy.status != CopyStatus::Available {
        tracing::warn!(
            "Request for copy {} rejected: status {}",
            copy.id,
            copy.status
        );
        return Err(DomainError::InvalidState(format!(
            "copy not available, current status: {}",
            copy.status
        )));
    }

    // 3. Nobody borrows their own book
    if copy.owner_id == input.requester_id {
        tracing::warn!(
            "User {} tried to request own copy {}",
            input.requester_id,
            copy.id
        );
        return Err(DomainError::InvalidOperation(
            "cannot request own book".to_string(),
        ));
    }

    if User::find_by_id(input.requester_id)
        .one(&txn)
        .await?
        .is_none()
    {
        return Err(DomainError::not_found("user", input.requester_id));
    }

    let now = crate::utils::now_rfc3339();
    let message = input
        .message
        .map(|m| m.trim().to_string())
        .filter(|m| !m.is_empty());

    let saved = request::ActiveModel {
        copy_id: Set(copy.id),
        requester_id: Set(input.requester_id),
        status: Set(RequestStatus::Pending),
        message: Set(message),
        created_at: Set(now.clone()),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    txn.commit().await?;

    tracing::info!(
        "Request {} created: user {} -> copy {}",
        saved.id,
        saved.requester_id,
        saved.copy_id
    );

    Ok(saved)
}

/// Owner accepts a request: request ACCEPTED, copy RESERVED.
///
/// Sibling PENDING requests on the same copy are left as they are; they can
/// no longer be accepted because the copy is not AVAILABLE anymore.
pub async fn accept_request(
    db: &DatabaseConnection,
    request_id: i32,
    actor_id: Option<i32>,
) -> Result<request::Model, DomainError> {
    let txn = db.begin().await?;

    let req = find_request(&txn, request_id).await?;
    let copy = find_copy(&txn, req.copy_id).await?;

    if let Some(actor) = actor_id {
        if actor != copy.owner_id {
            tracing::warn!(
                "User {} tried to accept request {} on copy {} owned by {}",
                actor,
                req.id,
                copy.id,
                copy.owner_id
            );
            return Err(DomainError::InvalidOperation(
                "only the copy owner can accept a request".to_string(),
            ));
        }
    }

    transition_request(
        &txn,
        req.id,
        RequestStatus::Pending,
        RequestStatus::Accepted,
    )
    .await?;
    transition_copy(&txn, copy.id, CopyStatus::Available, CopyStatus::Reserved).await?;

    let updated = find_request(&txn, req.id).await?;
    txn.commit().await?;

    tracing::info!("Request {} accepted, copy {} reserved", updated.id, copy.id);

    Ok(updated)
}

/// Requester confirms the hand-over: request COMPLETED, copy BORROWED.
///
/// The copy's `owner_id` is left untouched.
pub async fn confirm_delivery(
    db: &DatabaseConnection,
    request_id: i32,
    actor_id: Option<i32>,
) -> Result<request::Model, DomainError> {
    let txn = db.begin().await?;

    let req = find_request(&txn, request_id).await?;
    let copy = find_copy(&txn, req.copy_id).await?;

    if let Some(actor) = actor_id {
        if actor != req.requester_id {
            tracing::warn!(
                "User {} tried to confirm request {} made by {}",
                actor,
                req.id,
                req.requester_id
            );
            return Err(DomainError::InvalidOperation(
                "only the requester can confirm delivery".to_string(),
            ));
        }
    }

    transition_request(
        &txn,
        req.id,
        RequestStatus::Accepted,
        RequestStatus::Completed,
    )
    .await?;
    transition_copy(&txn, copy.id, CopyStatus::Reserved, CopyStatus::Borrowed).await?;

    let updated = find_request(&txn, req.id).await?;
    txn.commit().await?;

    tracing::info!(
        "Request {} completed, copy {} borrowed",
        updated.id,
        copy.id
    );

    Ok(updated)
}

/// Delete a request and its message thread.
///
/// Returns `false` if the request does not exist. The copy status is left
/// as it is, whatever status the request had.
pub async fn cancel_request(
    db: &DatabaseConnection,
    request_id: i32,
    actor_id: Option<i32>,
) -> Result<bool, DomainError> {
    let txn = db.begin().await?;

    let Some(req) = Request::find_by_id(request_id).one(&txn).await? else {
        return Ok(false);
    };

    if let Some(actor) = actor_id {
        if actor != req.requester_id {
            tracing::warn!(
                "User {} tried to cancel request {} made by {}",
                actor,
                req.id,
                req.requester_id
            );
            return Err(DomainError::InvalidOperation(
                "only the requester can cancel a request".to_string(),
            ));
        }
    }

    if req.status != RequestStatus::Pending {
        tracing::warn!(
            "Cancelling request {} in status {}; copy {} status unchanged",
            req.id,
            req.status,
            req.copy_id
        );
    }

    Message::delete_many()
        .filter(message::Column::RequestId.eq(req.id))
        .exec(&txn)
        .await?;
    let result = Request::delete_by_id(req.id).exec(&txn).await?;

    txn.commit().await?;

    tracing::info!("Request {} cancelled", req.id);

    Ok(result.rows_affected > 0)
}

/// Get a single request
pub async fn get_request(
    db: &DatabaseConnection,
    request_id: i32,
) -> Result<request::Model, DomainError> {
    find_request(db, request_id).await
}

/// List requests, newest first
pub async fn list_requests(
    db: &DatabaseConnection,
    filter: RequestFilter,
) -> Result<Vec<request::Model>, DomainError> {
    let mut condition = Condition::all();

    if let Some(copy_id) = filter.copy_id {
        condition = condition.add(request::Column::CopyId.eq(copy_id));
    }

    if let Some(requester_id) = filter.requester_id {
        condition = condition.add(request::Column::RequesterId.eq(requester_id));
    }

    if let Some(status) = filter.status {
        condition = condition.add(request::Column::Status.eq(status));
    }

    let requests = Request::find()
        .filter(condition)
        .order_by_desc(request::Column::CreatedAt)
        .order_by_desc(request::Column::Id)
        .all(db)
        .await?;

    Ok(requests)
}

/// Requests made by a user, with book and owner details
pub async fn outgoing_requests(
    db: &DatabaseConnection,
    user_id: i32,
) -> Result<Vec<RequestWithDetails>, DomainError> {
    ensure_user(db, user_id).await?;

    let requests = list_requests(
        db,
        RequestFilter {
            requester_id: Some(user_id),
            ..Default::default()
        },
    )
    .await?;

    with_details(db, requests).await
}

/// Requests made against copies the user owns, with book and requester details
pub async fn incoming_requests(
    db: &DatabaseConnection,
    user_id: i32,
) -> Result<Vec<RequestWithDetails>, DomainError> {
    ensure_user(db, user_id).await?;

    let owned_copy_ids: Vec<i32> = Copy::find()
        .filter(copy::Column::OwnerId.eq(user_id))
        .all(db)
        .await?
        .into_iter()
        .map(|c| c.id)
        .collect();

    if owned_copy_ids.is_empty() {
        return Ok(Vec::new());
    }

    let requests = Request::find()
        .filter(request::Column::CopyId.is_in(owned_copy_ids))
        .order_by_desc(request::Column::CreatedAt)
        .order_by_desc(request::Column::Id)
        .all(db)
        .await?;

    with_details(db, requests).await
}

async fn find_copy<C: ConnectionTrait>(conn: &C, copy_id: i32) -> Result<copy::Model, DomainError> {
    Copy::find_by_id(copy_id)
        .one(conn)
        .await?
        .ok_or_else(|| DomainError::not_found("copy", copy_id))
}

async fn ensure_user(db: &DatabaseConnection, user_id: i32) -> Result<(), DomainError> {
    User::find_by_id(user_id)
        .one(db)
        .await?
        .map(|_| ())
        .ok_or_else(|| DomainError::not_found("user", user_id))
}

async fn with_details(
    db: &DatabaseConnection,
    requests: Vec<request::Model>,
) -> Result<Vec<RequestWithDetails>, DomainError> {
    if requests.is_empty() {
        return Ok(Vec::new());
    }

    // Fetch copies with books
    let copy_ids: HashSet<i32> = requests.iter().map(|r| r.copy_id).collect();
    let copies_with_books = Copy::find()
        .filter(copy::Column::Id.is_in(copy_ids))
        .find_also_related(Book)
        .all(db)
        .await?;

    let mut copy_map: HashMap<i32, (i32, String)> = HashMap::new();
    for (copy, book) in copies_with_books {
        let title = book
            .map(|b| b.title)
            .unwrap_or_else(|| "Unknown".to_string());
        copy_map.insert(copy.id, (copy.owner_id, title));
    }

    // Fetch every participant in one query
    let mut user_ids: HashSet<i32> = requests.iter().map(|r| r.requester_id).collect();
    user_ids.extend(copy_map.values().map(|(owner_id, _)| *owner_id));
    let names: HashMap<i32, String> = User::find()
        .filter(crate::models::user::Column::Id.is_in(user_ids))
        .all(db)
        .await?
        .into_iter()
        .map(|u| (u.id, u.name))
        .collect();

    let name_of = |id: i32| {
        names
            .get(&id)
            .cloned()
            .unwrap_or_else(|| "Unknown".to_string())
    };

    Ok(requests
        .into_iter()
        .map(|r| {
            let (owner_id, book_title) = match copy_map.get(&r.copy_id) {
                Some((owner_id, title)) => (Some(*owner_id), title.clone()),
                None => (None, "Unknown".to_string()),
            };

            RequestWithDetails {
                id: r.id,
                copy_id: r.copy_id,
                requester_id: r.requester_id,
                status: r.status,
                message: r.message,
                created_at: r.created_at,
                updated_at: r.updated_at,
                book_title,
                owner_id,
                owner_name: owner_id.map(name_of).unwrap_or_else(|| "Unknown".to_string()),
                requester_name: name_of(r.requester_id),
            }
        })
        .collect())
}
