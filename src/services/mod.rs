//! Services Layer
//!
//! This module contains the lending lifecycle, extracted from HTTP handlers.
//! Services take the database connection explicitly.

pub mod copy_lifecycle;
pub mod lending_service;
pub mod message_service;
pub mod request_lifecycle;

// Re-export for convenience
pub use lending_service::{
    accept_request, cancel_request, confirm_delivery, create_request, NewRequest, RequestFilter,
    RequestWithDetails,
};
pub use message_service::{list_messages, post_message};
