pub mod book;
pub mod copy;
pub mod message;
pub mod request;
pub mod user;

pub use copy::{BookCondition, CopyStatus};
pub use request::RequestStatus;
