use thiserror::Error;

use crate::auth::errors::TokenError;
use crate::auth::policy::DenyReason;
use crate::domain::{Entity, FieldErrors};
use crate::store::{StoreError, UniqueField};

/// Business errors surfaced by every service operation.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("authentication required")]
    Unauthenticated,
    #[error("forbidden: {0}")]
    Forbidden(DenyReason),
    #[error("{0} not found")]
    NotFound(Entity),
    #[error("company name already exists")]
    DuplicateName,
    #[error("user already owns a company")]
    DuplicateOwnership,
    #[error("user already exists")]
    DuplicateEmail,
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("already applied to this job")]
    AlreadyApplied,
    #[error("not applied to this job")]
    NotApplied,
    #[error("validation failed: {0:?}")]
    ValidationFailed(FieldErrors),
    #[error("invalid token: {0}")]
    InvalidToken(#[from] TokenError),
    #[error("credential error: {0}")]
    Credential(String),
    #[error("storage error: {0}")]
    Storage(String),
}

impl ServiceError {
    pub fn not_found(entity: Entity) -> Self { Self::NotFound(entity) }

    /// Stable numeric code for external mapping/logging
    pub fn code(&self) -> u16 {
        match self {
            ServiceError::Unauthenticated => 1001,
            ServiceError::Forbidden(DenyReason::Unauthenticated) => 1001,
            ServiceError::Forbidden(DenyReason::RoleMismatch) => 1002,
            ServiceError::Forbidden(DenyReason::OwnershipMismatch) => 1003,
            ServiceError::NotFound(_) => 1004,
            ServiceError::ValidationFailed(_) => 1005,
            ServiceError::DuplicateName => 1101,
            ServiceError::DuplicateOwnership => 1102,
            ServiceError::DuplicateEmail => 1103,
            ServiceError::InvalidCredentials => 1104,
            ServiceError::AlreadyApplied => 1201,
            ServiceError::NotApplied => 1202,
            ServiceError::InvalidToken(_) => 1301,
            ServiceError::Credential(_) => 1401,
            ServiceError::Storage(_) => 1500,
        }
    }
}

impl From<StoreError> for ServiceError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::Conflict(UniqueField::UserEmail) => ServiceError::DuplicateEmail,
            StoreError::Conflict(UniqueField::CompanyName) => ServiceError::DuplicateName,
            StoreError::Conflict(UniqueField::CompanyOwner) => ServiceError::DuplicateOwnership,
            StoreError::Backend(msg) => ServiceError::Storage(msg),
        }
    }
}
