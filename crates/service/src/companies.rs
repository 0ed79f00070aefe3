use std::sync::Arc;

use tracing::{info, instrument};
use uuid::Uuid;

use crate::auth::policy::{self, Action};
use crate::domain::{Claims, Company, CompanyPatch, Entity, Job};
use crate::errors::ServiceError;
use crate::store::EntityStore;

/// Public company reads plus the owner's own company profile.
/// Creation lives in the coordinator since it also links the owner.
pub struct CompanyService {
    store: Arc<dyn EntityStore>,
}

impl CompanyService {
    pub fn new(store: Arc<dyn EntityStore>) -> Self {
        Self { store }
    }

    pub async fn list(&self) -> Result<Vec<Company>, ServiceError> {
        Ok(self.store.list_companies().await?)
    }

    pub async fn get(&self, id: Uuid) -> Result<Company, ServiceError> {
        self.store.get_company(id).await?.ok_or(ServiceError::NotFound(Entity::Company))
    }

    pub async fn jobs_of(&self, id: Uuid) -> Result<Vec<Job>, ServiceError> {
        let company = self.get(id).await?;
        Ok(self.store.list_jobs_by_company(company.id).await?)
    }

    pub async fn current(&self, claims: Option<&Claims>) -> Result<Company, ServiceError> {
        self.owned(claims).await
    }

    #[instrument(skip(self, claims, patch))]
    pub async fn update_current(&self, claims: Option<&Claims>, patch: CompanyPatch) -> Result<Company, ServiceError> {
        let company = self.owned(claims).await?;
        patch.validate()?;
        let updated = self
            .store
            .update_company(company.id, patch)
            .await?
            .ok_or(ServiceError::NotFound(Entity::Company))?;
        info!(company_id = %updated.id, "company_updated");
        Ok(updated)
    }

    #[instrument(skip(self, claims))]
    pub async fn delete_current(&self, claims: Option<&Claims>) -> Result<(), ServiceError> {
        let company = self.owned(claims).await?;
        if !self.store.delete_company(company.id).await? {
            return Err(ServiceError::NotFound(Entity::Company));
        }
        info!(company_id = %company.id, "company_deleted");
        Ok(())
    }

    /// The company named by the caller's claims, if the caller owns it.
    async fn owned(&self, claims: Option<&Claims>) -> Result<Company, ServiceError> {
        let claims = claims.ok_or(ServiceError::Unauthenticated)?;
        let company_id = claims.company_id.ok_or(ServiceError::NotFound(Entity::Company))?;
        let company = self.get(company_id).await?;
        policy::require(Some(claims), Action::ManageCompany { owner: company.created_by })?;
        Ok(company)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::DenyReason;
    use crate::coordinator::Coordinator;
    use crate::domain::Role;
    use crate::store::NewJob;
    use crate::test_support::{company_input, credentials, memory_store, seed_user};

    async fn setup() -> (Arc<dyn EntityStore>, CompanyService, Claims, Company) {
        let store = memory_store();
        let creds = credentials();
        let coord = Coordinator::new(store.clone(), creds.clone());
        let (_, stale) = seed_user(&store, "rep@acme.io", Role::Company).await;
        let created = coord.create_company(Some(&stale), company_input("Acme")).await.unwrap();
        let claims = creds.decode_token(&created.token).unwrap();
        (store.clone(), CompanyService::new(store), claims, created.company)
    }

    #[tokio::test]
    async fn owner_reads_and_updates_own_company() {
        let (_, svc, claims, company) = setup().await;
        assert_eq!(svc.current(Some(&claims)).await.unwrap().id, company.id);
        let patch: CompanyPatch = serde_json::from_str(r#"{"industry":"Robotics","logo":"logo.png"}"#).unwrap();
        let updated = svc.update_current(Some(&claims), patch).await.unwrap();
        assert_eq!(updated.industry, "Robotics");
        assert_eq!(updated.logo.as_deref(), Some("logo.png"));
        assert_eq!(updated.created_by, company.created_by);
    }

    #[tokio::test]
    async fn claims_without_company_are_not_found() {
        let (store, svc, _, _) = setup().await;
        let (_, other) = seed_user(&store, "x@y.io", Role::Company).await;
        assert!(matches!(svc.current(Some(&other)).await, Err(ServiceError::NotFound(Entity::Company))));
        assert!(matches!(svc.current(None).await, Err(ServiceError::Unauthenticated)));
    }

    #[tokio::test]
    async fn forged_company_claim_is_ownership_mismatch() {
        let (_, svc, claims, company) = setup().await;
        let intruder = Claims { id: Uuid::new_v4(), role: Role::Company, company_id: Some(company.id) };
        let err = svc.delete_current(Some(&intruder)).await.unwrap_err();
        assert!(matches!(err, ServiceError::Forbidden(DenyReason::OwnershipMismatch)));
        assert!(svc.current(Some(&claims)).await.is_ok());
    }

    #[tokio::test]
    async fn delete_removes_company_and_jobs() {
        let (store, svc, claims, company) = setup().await;
        store
            .insert_job(NewJob {
                title: "t".into(),
                company: company.id,
                description: "d".into(),
                requirements: "r".into(),
                salary: None,
                location: None,
            })
            .await
            .unwrap();
        assert_eq!(svc.jobs_of(company.id).await.unwrap().len(), 1);

        svc.delete_current(Some(&claims)).await.unwrap();
        assert!(matches!(svc.get(company.id).await, Err(ServiceError::NotFound(Entity::Company))));
        assert!(matches!(svc.jobs_of(company.id).await, Err(ServiceError::NotFound(Entity::Company))));
        assert!(store.list_jobs().await.unwrap().is_empty());
    }
}
