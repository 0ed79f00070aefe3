//! Operations that touch more than one record: company creation (which
//! links the owner and reissues their token) and job applications.

use std::sync::Arc;

use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::auth::policy::{self, Action};
use crate::auth::CredentialService;
use crate::domain::{Claims, Company, Entity, NewCompanyInput, User};
use crate::errors::ServiceError;
use crate::store::{EntityStore, NewCompany, StoreError, UniqueField, UserChanges};

/// Result of a successful company creation.
#[derive(Debug, Clone)]
pub struct CreatedCompany {
    pub company: Company,
    /// Fresh token whose claims carry the new `companyId`.
    pub token: String,
}

pub struct Coordinator {
    store: Arc<dyn EntityStore>,
    credentials: Arc<CredentialService>,
}

impl Coordinator {
    pub fn new(store: Arc<dyn EntityStore>, credentials: Arc<CredentialService>) -> Self {
        Self { store, credentials }
    }

    /// Create the caller's company, link it to their account and issue a
    /// token reflecting the link.
    ///
    /// The token the caller presented stays valid until it expires but no
    /// longer carries the company.
    #[instrument(skip(self, claims, input), fields(user_id = %claims.map(|c| c.id).unwrap_or_default(), name = %input.name))]
    pub async fn create_company(&self, claims: Option<&Claims>, input: NewCompanyInput) -> Result<CreatedCompany, ServiceError> {
        policy::require(claims, Action::CreateCompany)?;
        let claims = claims.ok_or(ServiceError::Unauthenticated)?;

        // 归属检查先于字段校验：已有公司时无论字段如何都是 DuplicateOwnership
        let owner = self.load_user(claims.id).await?;
        if owner.company_id.is_some() || self.store.find_company_by_owner(owner.id).await?.is_some() {
            warn!(user_id = %owner.id, "company_already_owned");
            return Err(ServiceError::DuplicateOwnership);
        }
        input.validate()?;
        if self.store.find_company_by_name(&input.name).await?.is_some() {
            return Err(ServiceError::DuplicateName);
        }

        let record = NewCompany {
            name: input.name,
            description: input.description,
            industry: input.industry,
            website: input.website,
            logo: input.logo,
            created_by: owner.id,
        };
        let (company, owner) = match self.store.insert_company_for_owner(record).await {
            Ok(Some(created)) => created,
            Ok(None) => return Err(ServiceError::not_found(Entity::User)),
            // lost a race on the name check above
            Err(StoreError::Conflict(UniqueField::CompanyName)) => return Err(ServiceError::DuplicateName),
            Err(e) => return Err(e.into()),
        };

        let token = self.credentials.issue_token(&Claims::for_user(&owner))?;
        info!(company_id = %company.id, user_id = %owner.id, "company_created");
        Ok(CreatedCompany { company, token })
    }

    #[instrument(skip(self, claims), fields(user_id = %claims.map(|c| c.id).unwrap_or_default()))]
    pub async fn apply_to_job(&self, claims: Option<&Claims>, job_id: Uuid) -> Result<User, ServiceError> {
        policy::require(claims, Action::ManageSelf)?;
        let claims = claims.ok_or(ServiceError::Unauthenticated)?;

        if self.store.get_job(job_id).await?.is_none() {
            return Err(ServiceError::not_found(Entity::Job));
        }
        let user = self.load_user(claims.id).await?;
        if user.applied_jobs.contains(&job_id) {
            return Err(ServiceError::AlreadyApplied);
        }
        let mut applied = user.applied_jobs;
        applied.push(job_id);
        let updated = self
            .store
            .update_user(user.id, UserChanges::applied_jobs(applied))
            .await?
            .ok_or(ServiceError::NotFound(Entity::User))?;
        info!(user_id = %updated.id, job_id = %job_id, "job_applied");
        Ok(updated)
    }

    #[instrument(skip(self, claims), fields(user_id = %claims.map(|c| c.id).unwrap_or_default()))]
    pub async fn withdraw_application(&self, claims: Option<&Claims>, job_id: Uuid) -> Result<User, ServiceError> {
        policy::require(claims, Action::ManageSelf)?;
        let claims = claims.ok_or(ServiceError::Unauthenticated)?;

        let user = self.load_user(claims.id).await?;
        let Some(pos) = user.applied_jobs.iter().position(|id| *id == job_id) else {
            return Err(ServiceError::NotApplied);
        };
        let mut applied = user.applied_jobs;
        applied.remove(pos);
        let updated = self
            .store
            .update_user(user.id, UserChanges::applied_jobs(applied))
            .await?
            .ok_or(ServiceError::NotFound(Entity::User))?;
        info!(user_id = %updated.id, job_id = %job_id, "application_withdrawn");
        Ok(updated)
    }

    async fn load_user(&self, id: Uuid) -> Result<User, ServiceError> {
        self.store.get_user(id).await?.ok_or(ServiceError::NotFound(Entity::User))
    }
}
