pub mod books;
pub mod copy;
pub mod error;
pub mod extract;
pub mod health;
pub mod messages;
pub mod requests;
pub mod user;

use axum::{
    Router,
    routing::{get, put},
};

use crate::infrastructure::AppState;

pub fn api_router_with_state(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health::health_check))
        // Users
        .route("/users", get(user::list_users).post(user::create_user))
        .route("/users/:id", get(user::get_user))
        .route("/users/:id/copies", get(user::get_user_copies))
        .route(
            "/users/:id/requests/outgoing",
            get(user::get_outgoing_requests),
        )
        .route(
            "/users/:id/requests/incoming",
            get(user::get_incoming_requests),
        )
        // Books
        .route("/books", get(books::list_books).post(books::create_book))
        .route("/books/:id", get(books::get_book))
        // Copies
        .route("/copies", get(copy::list_copies).post(copy::create_copy))
        .route("/copies/:id", get(copy::get_copy))
        // Lending lifecycle
        .route(
            "/requests",
            get(requests::list_requests).post(requests::create_request),
        )
        .route(
            "/requests/:id",
            get(requests::get_request).delete(requests::cancel_request),
        )
        .route("/requests/:id/accept", put(requests::accept_request))
        .route("/requests/:id/confirm", put(requests::confirm_delivery))
        // Messages
        .route(
            "/requests/:id/messages",
            get(messages::list_messages).post(messages::post_message),
        )
        .with_state(state)
}
