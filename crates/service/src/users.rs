use std::sync::Arc;

use tracing::{info, instrument};
use uuid::Uuid;

use crate::auth::policy::{self, Action};
use crate::domain::{Claims, Entity, JobWithCompany, User, UserPatch};
use crate::errors::ServiceError;
use crate::store::EntityStore;

/// Profile operations on user accounts.
pub struct UserService {
    store: Arc<dyn EntityStore>,
}

impl UserService {
    pub fn new(store: Arc<dyn EntityStore>) -> Self {
        Self { store }
    }

    pub async fn get_user(&self, claims: Option<&Claims>, user_id: Uuid) -> Result<User, ServiceError> {
        policy::require(claims, Action::ViewUser { user: user_id })?;
        self.store.get_user(user_id).await?.ok_or(ServiceError::NotFound(Entity::User))
    }

    pub async fn current_profile(&self, claims: Option<&Claims>) -> Result<User, ServiceError> {
        let me = self_id(claims)?;
        self.store.get_user(me).await?.ok_or(ServiceError::NotFound(Entity::User))
    }

    #[instrument(skip(self, claims, patch))]
    pub async fn update_profile(&self, claims: Option<&Claims>, patch: UserPatch) -> Result<User, ServiceError> {
        let me = self_id(claims)?;
        patch.validate()?;
        let updated = self
            .store
            .update_user(me, patch.into())
            .await?
            .ok_or(ServiceError::NotFound(Entity::User))?;
        info!(user_id = %updated.id, "user_updated");
        Ok(updated)
    }

    /// Applied jobs in application order with their companies; ids whose job
    /// has since been removed are skipped.
    pub async fn applied_jobs(&self, claims: Option<&Claims>) -> Result<Vec<JobWithCompany>, ServiceError> {
        let me = self_id(claims)?;
        let user = self.store.get_user(me).await?.ok_or(ServiceError::NotFound(Entity::User))?;
        let mut out = Vec::with_capacity(user.applied_jobs.len());
        for job_id in user.applied_jobs {
            let Some(job) = self.store.get_job(job_id).await? else { continue };
            let company = self.store.get_company(job.company).await?;
            out.push(JobWithCompany::new(job, company));
        }
        Ok(out)
    }

    #[instrument(skip(self, claims))]
    pub async fn delete_self(&self, claims: Option<&Claims>) -> Result<(), ServiceError> {
        let me = self_id(claims)?;
        if !self.store.delete_user(me).await? {
            return Err(ServiceError::NotFound(Entity::User));
        }
        info!(user_id = %me, "user_deleted");
        Ok(())
    }
}

fn self_id(claims: Option<&Claims>) -> Result<Uuid, ServiceError> {
    policy::require(claims, Action::ManageSelf)?;
    claims.map(|c| c.id).ok_or(ServiceError::Unauthenticated)
}
