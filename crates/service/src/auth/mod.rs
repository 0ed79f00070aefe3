//! Auth module: credentials (hashing, tokens), the authorization policy and
//! the registration/login service.

pub mod credentials;
pub mod errors;
pub mod policy;
pub mod service;

pub use credentials::CredentialService;
pub use policy::{authorize, Action, Decision, DenyReason};
pub use service::AuthService;
