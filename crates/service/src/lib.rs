//! Service layer for the job board: business rules on top of the entity store.
//! - Keeps HTTP concerns out; handlers in `server` call these services.
//! - Every operation evaluates the authorization policy before touching the store.
//! - Errors are reported through `errors::ServiceError`.

pub mod auth;
pub mod companies;
pub mod coordinator;
pub mod domain;
pub mod errors;
pub mod jobs;
pub mod similarity;
pub mod store;
pub mod users;
#[cfg(test)]
pub mod test_support;

pub use auth::{credentials, policy};
