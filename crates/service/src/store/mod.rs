//! Entity store abstraction for users, companies and jobs.
//!
//! `memory` backs tests and local runs; `seaorm` is the PostgreSQL store.

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::domain::{Company, CompanyPatch, Job, JobPatch, Role, User, UserPatch};

pub mod memory;
pub mod seaorm;

pub use memory::MemoryEntityStore;
pub use self::seaorm::SeaOrmEntityStore;

/// Columns carrying a uniqueness constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UniqueField {
    UserEmail,
    CompanyName,
    CompanyOwner,
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("unique constraint violated: {0:?}")]
    Conflict(UniqueField),
    #[error("store backend error: {0}")]
    Backend(String),
}

impl UniqueField {
    /// Guess the violated column from a database constraint message.
    pub fn from_constraint(detail: &str) -> Self {
        if detail.contains("created_by") {
            UniqueField::CompanyOwner
        } else if detail.contains("email") {
            UniqueField::UserEmail
        } else {
            UniqueField::CompanyName
        }
    }
}

impl From<models::errors::ModelError> for StoreError {
    fn from(e: models::errors::ModelError) -> Self {
        match e {
            models::errors::ModelError::Conflict(detail) => StoreError::Conflict(UniqueField::from_constraint(&detail)),
            other => StoreError::Backend(other.to_string()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
}

#[derive(Debug, Clone)]
pub struct NewCompany {
    pub name: String,
    pub description: String,
    pub industry: String,
    pub website: String,
    pub logo: Option<String>,
    pub created_by: Uuid,
}

#[derive(Debug, Clone)]
pub struct NewJob {
    pub title: String,
    pub company: Uuid,
    pub description: String,
    pub requirements: String,
    pub salary: Option<String>,
    pub location: Option<String>,
}

/// Field updates applied to a stored user. `applied_jobs` replaces the whole list.
#[derive(Debug, Clone, Default)]
pub struct UserChanges {
    pub name: Option<String>,
    pub email: Option<String>,
    pub resume: Option<Option<String>>,
    pub applied_jobs: Option<Vec<Uuid>>,
}

impl UserChanges {
    pub fn applied_jobs(ids: Vec<Uuid>) -> Self {
        Self { applied_jobs: Some(ids), ..Default::default() }
    }
}

impl From<UserPatch> for UserChanges {
    fn from(p: UserPatch) -> Self {
        Self { name: p.name, email: p.email, resume: p.resume, applied_jobs: None }
    }
}

/// Persistence for the three collections.
///
/// Updates and deletes return `None`/`false` when the record is missing
/// instead of failing.
#[async_trait]
pub trait EntityStore: Send + Sync {
    async fn insert_user(&self, user: NewUser) -> Result<User, StoreError>;
    async fn get_user(&self, id: Uuid) -> Result<Option<User>, StoreError>;
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;
    async fn update_user(&self, id: Uuid, changes: UserChanges) -> Result<Option<User>, StoreError>;
    async fn delete_user(&self, id: Uuid) -> Result<bool, StoreError>;

    /// Insert the company and point its owner's `company_id` at it in one
    /// atomic write. `None` when the owner does not exist; nothing is written then.
    async fn insert_company_for_owner(&self, company: NewCompany) -> Result<Option<(Company, User)>, StoreError>;
    async fn get_company(&self, id: Uuid) -> Result<Option<Company>, StoreError>;
    async fn find_company_by_owner(&self, owner: Uuid) -> Result<Option<Company>, StoreError>;
    async fn find_company_by_name(&self, name: &str) -> Result<Option<Company>, StoreError>;
    /// Companies ordered by name.
    async fn list_companies(&self) -> Result<Vec<Company>, StoreError>;
    async fn update_company(&self, id: Uuid, patch: CompanyPatch) -> Result<Option<Company>, StoreError>;
    /// Deletes the company together with its jobs.
    async fn delete_company(&self, id: Uuid) -> Result<bool, StoreError>;

    async fn insert_job(&self, job: NewJob) -> Result<Job, StoreError>;
    async fn get_job(&self, id: Uuid) -> Result<Option<Job>, StoreError>;
    /// Jobs in posting order.
    async fn list_jobs(&self) -> Result<Vec<Job>, StoreError>;
    async fn list_jobs_by_company(&self, company: Uuid) -> Result<Vec<Job>, StoreError>;
    async fn update_job(&self, id: Uuid, patch: JobPatch) -> Result<Option<Job>, StoreError>;
    async fn delete_job(&self, id: Uuid) -> Result<bool, StoreError>;
}
