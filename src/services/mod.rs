//! Business workflows. Every function takes the repository explicitly and
//! checks the acting user's permissions before touching the store.

pub mod attachments;
pub mod customers;
pub mod errors;
pub mod inventory;
pub mod orders;
pub mod pipeline;
pub mod quotes;
pub mod tasks;
pub mod users;

pub use errors::{ServiceError, ServiceResult};
