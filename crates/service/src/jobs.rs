use std::collections::HashMap;
use std::sync::Arc;

use tracing::{info, instrument};
use uuid::Uuid;

use crate::auth::policy::{self, Action};
use crate::domain::{Claims, Company, Entity, Job, JobPatch, JobQuery, JobWithCompany, NewJobInput, ScoredJob};
use crate::errors::ServiceError;
use crate::similarity;
use crate::store::{EntityStore, NewJob};

pub struct JobService {
    store: Arc<dyn EntityStore>,
}

impl JobService {
    pub fn new(store: Arc<dyn EntityStore>) -> Self {
        Self { store }
    }

    /// All jobs in posting order, each with its company joined in.
    pub async fn list(&self) -> Result<Vec<JobWithCompany>, ServiceError> {
        let jobs = self.store.list_jobs().await?;
        self.populate(jobs).await
    }

    pub async fn get(&self, id: Uuid) -> Result<JobWithCompany, ServiceError> {
        let job = self.find(id).await?;
        let company = self.store.get_company(job.company).await?;
        Ok(JobWithCompany::new(job, company))
    }

    pub async fn search(&self, query: &JobQuery) -> Result<Vec<JobWithCompany>, ServiceError> {
        let companies = self.companies_by_id().await?;
        let hits = self
            .store
            .list_jobs()
            .await?
            .into_iter()
            .filter_map(|job| {
                let company = companies.get(&job.company);
                query.matches(&job, company).then(|| JobWithCompany::new(job, company.cloned()))
            })
            .collect();
        Ok(hits)
    }

    /// Post a job under the caller's company.
    #[instrument(skip(self, claims, input), fields(title = %input.title))]
    pub async fn create(&self, claims: Option<&Claims>, input: NewJobInput) -> Result<Job, ServiceError> {
        let company_id = claims.and_then(|c| c.company_id);
        policy::require(claims, Action::CreateJob { company: company_id })?;
        let company_id = company_id.ok_or(ServiceError::Forbidden(policy::DenyReason::RoleMismatch))?;
        input.validate()?;
        if self.store.get_company(company_id).await?.is_none() {
            return Err(ServiceError::NotFound(Entity::Company));
        }
        let job = self
            .store
            .insert_job(NewJob {
                title: input.title,
                company: company_id,
                description: input.description,
                requirements: input.requirements,
                salary: input.salary,
                location: input.location,
            })
            .await?;
        info!(job_id = %job.id, company_id = %job.company, "job_created");
        Ok(job)
    }

    #[instrument(skip(self, claims, patch))]
    pub async fn update(&self, claims: Option<&Claims>, id: Uuid, patch: JobPatch) -> Result<Job, ServiceError> {
        let job = self.find(id).await?;
        policy::require(claims, Action::UpdateJob { company: job.company })?;
        patch.validate()?;
        let updated = self.store.update_job(id, patch).await?.ok_or(ServiceError::NotFound(Entity::Job))?;
        info!(job_id = %updated.id, "job_updated");
        Ok(updated)
    }

    #[instrument(skip(self, claims))]
    pub async fn delete(&self, claims: Option<&Claims>, id: Uuid) -> Result<(), ServiceError> {
        let job = self.find(id).await?;
        policy::require(claims, Action::DeleteJob { company: job.company })?;
        if !self.store.delete_job(id).await? {
            return Err(ServiceError::NotFound(Entity::Job));
        }
        info!(job_id = %id, "job_deleted");
        Ok(())
    }

    /// Up to five postings most similar to `id`, best first.
    pub async fn similar(&self, id: Uuid) -> Result<Vec<ScoredJob>, ServiceError> {
        let reference = self.find(id).await?;
        let candidates = self.store.list_jobs().await?;
        Ok(similarity::rank(&reference, &candidates))
    }

    async fn find(&self, id: Uuid) -> Result<Job, ServiceError> {
        self.store.get_job(id).await?.ok_or(ServiceError::NotFound(Entity::Job))
    }

    async fn companies_by_id(&self) -> Result<HashMap<Uuid, Company>, ServiceError> {
        Ok(self.store.list_companies().await?.into_iter().map(|c| (c.id, c)).collect())
    }

    async fn populate(&self, jobs: Vec<Job>) -> Result<Vec<JobWithCompany>, ServiceError> {
        let companies = self.companies_by_id().await?;
        Ok(jobs
            .into_iter()
            .map(|job| {
                let company = companies.get(&job.company).cloned();
                JobWithCompany::new(job, company)
            })
            .collect())
    }
}
