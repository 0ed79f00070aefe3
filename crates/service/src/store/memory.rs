use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{EntityStore, NewCompany, NewJob, NewUser, StoreError, UniqueField, UserChanges};
use crate::domain::{Company, CompanyPatch, Job, JobPatch, User};

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    companies: Vec<Company>,
    jobs: Vec<Job>,
}

/// In-memory store. A single lock guards all three tables, so every
/// method (including the company + owner write) is atomic.
#[derive(Default)]
pub struct MemoryEntityStore {
    tables: RwLock<Tables>,
}

impl MemoryEntityStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl EntityStore for MemoryEntityStore {
    async fn insert_user(&self, user: NewUser) -> Result<User, StoreError> {
        let mut t = self.tables.write().await;
        if t.users.iter().any(|u| u.email == user.email) {
            return Err(StoreError::Conflict(UniqueField::UserEmail));
        }
        let created = User {
            id: Uuid::new_v4(),
            name: user.name,
            email: user.email,
            password_hash: user.password_hash,
            role: user.role,
            resume: None,
            applied_jobs: Vec::new(),
            company_id: None,
            created_at: Utc::now(),
        };
        t.users.push(created.clone());
        Ok(created)
    }

    async fn get_user(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        let t = self.tables.read().await;
        Ok(t.users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let t = self.tables.read().await;
        Ok(t.users.iter().find(|u| u.email == email).cloned())
    }

    async fn update_user(&self, id: Uuid, changes: UserChanges) -> Result<Option<User>, StoreError> {
        let mut t = self.tables.write().await;
        if let Some(email) = &changes.email {
            if t.users.iter().any(|u| u.id != id && &u.email == email) {
                return Err(StoreError::Conflict(UniqueField::UserEmail));
            }
        }
        let Some(user) = t.users.iter_mut().find(|u| u.id == id) else {
            return Ok(None);
        };
        if let Some(name) = changes.name {
            user.name = name;
        }
        if let Some(email) = changes.email {
            user.email = email;
        }
        if let Some(resume) = changes.resume {
            user.resume = resume;
        }
        if let Some(ids) = changes.applied_jobs {
            user.applied_jobs = ids;
        }
        Ok(Some(user.clone()))
    }

    async fn delete_user(&self, id: Uuid) -> Result<bool, StoreError> {
        let mut t = self.tables.write().await;
        let before = t.users.len();
        t.users.retain(|u| u.id != id);
        Ok(t.users.len() != before)
    }

    async fn insert_company_for_owner(&self, company: NewCompany) -> Result<Option<(Company, User)>, StoreError> {
        let mut t = self.tables.write().await;
        if t.companies.iter().any(|c| c.created_by == company.created_by) {
            return Err(StoreError::Conflict(UniqueField::CompanyOwner));
        }
        if t.companies.iter().any(|c| c.name == company.name) {
            return Err(StoreError::Conflict(UniqueField::CompanyName));
        }
        let Some(owner_idx) = t.users.iter().position(|u| u.id == company.created_by) else {
            return Ok(None);
        };
        let created = Company {
            id: Uuid::new_v4(),
            name: company.name,
            description: company.description,
            industry: company.industry,
            website: company.website,
            logo: company.logo,
            created_by: company.created_by,
        };
        t.companies.push(created.clone());
        let owner = &mut t.users[owner_idx];
        owner.company_id = Some(created.id);
        let owner = owner.clone();
        Ok(Some((created, owner)))
    }

    async fn get_company(&self, id: Uuid) -> Result<Option<Company>, StoreError> {
        let t = self.tables.read().await;
        Ok(t.companies.iter().find(|c| c.id == id).cloned())
    }

    async fn find_company_by_owner(&self, owner: Uuid) -> Result<Option<Company>, StoreError> {
        let t = self.tables.read().await;
        Ok(t.companies.iter().find(|c| c.created_by == owner).cloned())
    }

    async fn find_company_by_name(&self, name: &str) -> Result<Option<Company>, StoreError> {
        let t = self.tables.read().await;
        Ok(t.companies.iter().find(|c| c.name == name).cloned())
    }

    async fn list_companies(&self) -> Result<Vec<Company>, StoreError> {
        let t = self.tables.read().await;
        let mut all = t.companies.clone();
        all.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(all)
    }

    async fn update_company(&self, id: Uuid, patch: CompanyPatch) -> Result<Option<Company>, StoreError> {
        let mut t = self.tables.write().await;
        if let Some(name) = &patch.name {
            if t.companies.iter().any(|c| c.id != id && &c.name == name) {
                return Err(StoreError::Conflict(UniqueField::CompanyName));
            }
        }
        let Some(company) = t.companies.iter_mut().find(|c| c.id == id) else {
            return Ok(None);
        };
        if let Some(v) = patch.name {
            company.name = v;
        }
        if let Some(v) = patch.description {
            company.description = v;
        }
        if let Some(v) = patch.industry {
            company.industry = v;
        }
        if let Some(v) = patch.website {
            company.website = v;
        }
        if let Some(v) = patch.logo {
            company.logo = v;
        }
        Ok(Some(company.clone()))
    }

    async fn delete_company(&self, id: Uuid) -> Result<bool, StoreError> {
        let mut t = self.tables.write().await;
        let before = t.companies.len();
        t.companies.retain(|c| c.id != id);
        if t.companies.len() == before {
            return Ok(false);
        }
        t.jobs.retain(|j| j.company != id);
        Ok(true)
    }

    async fn insert_job(&self, job: NewJob) -> Result<Job, StoreError> {
        let mut t = self.tables.write().await;
        if !t.companies.iter().any(|c| c.id == job.company) {
            return Err(StoreError::Backend(format!("company {} does not exist", job.company)));
        }
        let created = Job {
            id: Uuid::new_v4(),
            title: job.title,
            company: job.company,
            description: job.description,
            requirements: job.requirements,
            salary: job.salary,
            location: job.location,
            date_posted: Utc::now(),
        };
        t.jobs.push(created.clone());
        Ok(created)
    }

    async fn get_job(&self, id: Uuid) -> Result<Option<Job>, StoreError> {
        let t = self.tables.read().await;
        Ok(t.jobs.iter().find(|j| j.id == id).cloned())
    }

    async fn list_jobs(&self) -> Result<Vec<Job>, StoreError> {
        let t = self.tables.read().await;
        Ok(t.jobs.clone())
    }

    async fn list_jobs_by_company(&self, company: Uuid) -> Result<Vec<Job>, StoreError> {
        let t = self.tables.read().await;
        Ok(t.jobs.iter().filter(|j| j.company == company).cloned().collect())
    }

    async fn update_job(&self, id: Uuid, patch: JobPatch) -> Result<Option<Job>, StoreError> {
        let mut t = self.tables.write().await;
        let Some(job) = t.jobs.iter_mut().find(|j| j.id == id) else {
            return Ok(None);
        };
        if let Some(v) = patch.title {
            job.title = v;
        }
        if let Some(v) = patch.description {
            job.description = v;
        }
        if let Some(v) = patch.requirements {
            job.requirements = v;
        }
        if let Some(v) = patch.salary {
            job.salary = v;
        }
        if let Some(v) = patch.location {
            job.location = v;
        }
        Ok(Some(job.clone()))
    }

    async fn delete_job(&self, id: Uuid) -> Result<bool, StoreError> {
        let mut t = self.tables.write().await;
        let before = t.jobs.len();
        t.jobs.retain(|j| j.id != id);
        Ok(t.jobs.len() != before)
    }
}
