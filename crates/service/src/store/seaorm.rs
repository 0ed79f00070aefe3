use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{ActiveModelTrait, DatabaseConnection, DbErr, EntityTrait, Set, TransactionTrait};
use uuid::Uuid;

use models::{company, job, user};

use super::{EntityStore, NewCompany, NewJob, NewUser, StoreError, UserChanges};
use crate::domain::{Company, CompanyPatch, Job, JobPatch, Role, User};

impl From<DbErr> for StoreError {
    fn from(e: DbErr) -> Self {
        models::errors::ModelError::from(e).into()
    }
}

fn user_from_model(m: user::Model) -> Result<User, StoreError> {
    let role: Role = m.role.parse().map_err(|e: crate::errors::ServiceError| StoreError::Backend(e.to_string()))?;
    Ok(User {
        id: m.id,
        applied_jobs: m.applied_job_ids(),
        name: m.name,
        email: m.email,
        password_hash: m.password_hash,
        role,
        resume: m.resume,
        company_id: m.company_id,
        created_at: m.created_at.with_timezone(&Utc),
    })
}

fn company_from_model(m: company::Model) -> Company {
    Company {
        id: m.id,
        name: m.name,
        description: m.description,
        industry: m.industry,
        website: m.website,
        logo: m.logo,
        created_by: m.created_by,
    }
}

fn job_from_model(m: job::Model) -> Job {
    Job {
        id: m.id,
        title: m.title,
        company: m.company,
        description: m.description,
        requirements: m.requirements,
        salary: m.salary,
        location: m.location,
        date_posted: m.date_posted.with_timezone(&Utc),
    }
}

/// PostgreSQL-backed store over the `models` entities.
pub struct SeaOrmEntityStore {
    pub db: DatabaseConnection,
}

impl SeaOrmEntityStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl EntityStore for SeaOrmEntityStore {
    async fn insert_user(&self, input: NewUser) -> Result<User, StoreError> {
        let created = user::create(&self.db, &input.name, &input.email, &input.password_hash, input.role.as_str()).await?;
        user_from_model(created)
    }

    async fn get_user(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        user::Entity::find_by_id(id).one(&self.db).await?.map(user_from_model).transpose()
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        user::find_by_email(&self.db, email).await?.map(user_from_model).transpose()
    }

    async fn update_user(&self, id: Uuid, changes: UserChanges) -> Result<Option<User>, StoreError> {
        let Some(found) = user::Entity::find_by_id(id).one(&self.db).await? else {
            return Ok(None);
        };
        let mut am: user::ActiveModel = found.clone().into();
        if let Some(name) = changes.name {
            am.name = Set(name);
        }
        if let Some(email) = changes.email {
            am.email = Set(email);
        }
        if let Some(resume) = changes.resume {
            am.resume = Set(resume);
        }
        if let Some(ids) = changes.applied_jobs {
            am.applied_jobs = Set(user::encode_job_ids(&ids));
        }
        if !am.is_changed() {
            return user_from_model(found).map(Some);
        }
        let updated = am.update(&self.db).await?;
        user_from_model(updated).map(Some)
    }

    async fn delete_user(&self, id: Uuid) -> Result<bool, StoreError> {
        Ok(user::hard_delete(&self.db, id).await?)
    }

    async fn insert_company_for_owner(&self, input: NewCompany) -> Result<Option<(Company, User)>, StoreError> {
        let txn = self.db.begin().await?;
        let created = company::create(
            &txn,
            company::NewCompany {
                name: &input.name,
                description: &input.description,
                industry: &input.industry,
                website: &input.website,
                logo: input.logo.as_deref(),
                created_by: input.created_by,
            },
        )
        .await?;
        // 所有者不存在：回滚，公司记录不落库
        let Some(owner) = user::link_company(&txn, input.created_by, created.id).await? else {
            txn.rollback().await?;
            return Ok(None);
        };
        txn.commit().await?;
        Ok(Some((company_from_model(created), user_from_model(owner)?)))
    }

    async fn get_company(&self, id: Uuid) -> Result<Option<Company>, StoreError> {
        Ok(company::Entity::find_by_id(id).one(&self.db).await?.map(company_from_model))
    }

    async fn find_company_by_owner(&self, owner: Uuid) -> Result<Option<Company>, StoreError> {
        Ok(company::find_by_owner(&self.db, owner).await?.map(company_from_model))
    }

    async fn find_company_by_name(&self, name: &str) -> Result<Option<Company>, StoreError> {
        Ok(company::find_by_name(&self.db, name).await?.map(company_from_model))
    }

    async fn list_companies(&self) -> Result<Vec<Company>, StoreError> {
        Ok(company::list(&self.db).await?.into_iter().map(company_from_model).collect())
    }

    async fn update_company(&self, id: Uuid, patch: CompanyPatch) -> Result<Option<Company>, StoreError> {
        let Some(found) = company::Entity::find_by_id(id).one(&self.db).await? else {
            return Ok(None);
        };
        let mut am: company::ActiveModel = found.clone().into();
        if let Some(v) = patch.name {
            am.name = Set(v);
        }
        if let Some(v) = patch.description {
            am.description = Set(v);
        }
        if let Some(v) = patch.industry {
            am.industry = Set(v);
        }
        if let Some(v) = patch.website {
            am.website = Set(v);
        }
        if let Some(v) = patch.logo {
            am.logo = Set(v);
        }
        if !am.is_changed() {
            return Ok(Some(company_from_model(found)));
        }
        Ok(Some(company_from_model(am.update(&self.db).await?)))
    }

    async fn delete_company(&self, id: Uuid) -> Result<bool, StoreError> {
        // jobs go with it via ON DELETE CASCADE
        let res = company::Entity::delete_by_id(id).exec(&self.db).await?;
        Ok(res.rows_affected > 0)
    }

    async fn insert_job(&self, input: NewJob) -> Result<Job, StoreError> {
        let created = job::create(
            &self.db,
            job::NewJob {
                title: &input.title,
                company: input.company,
                description: &input.description,
                requirements: &input.requirements,
                salary: input.salary.as_deref(),
                location: input.location.as_deref(),
            },
        )
        .await?;
        Ok(job_from_model(created))
    }

    async fn get_job(&self, id: Uuid) -> Result<Option<Job>, StoreError> {
        Ok(job::Entity::find_by_id(id).one(&self.db).await?.map(job_from_model))
    }

    async fn list_jobs(&self) -> Result<Vec<Job>, StoreError> {
        Ok(job::list(&self.db).await?.into_iter().map(job_from_model).collect())
    }

    async fn list_jobs_by_company(&self, company: Uuid) -> Result<Vec<Job>, StoreError> {
        Ok(job::list_by_company(&self.db, company).await?.into_iter().map(job_from_model).collect())
    }

    async fn update_job(&self, id: Uuid, patch: JobPatch) -> Result<Option<Job>, StoreError> {
        let Some(found) = job::Entity::find_by_id(id).one(&self.db).await? else {
            return Ok(None);
        };
        let mut am: job::ActiveModel = found.clone().into();
        if let Some(v) = patch.title {
            am.title = Set(v);
        }
        if let Some(v) = patch.description {
            am.description = Set(v);
        }
        if let Some(v) = patch.requirements {
            am.requirements = Set(v);
        }
        if let Some(v) = patch.salary {
            am.salary = Set(v);
        }
        if let Some(v) = patch.location {
            am.location = Set(v);
        }
        if !am.is_changed() {
            return Ok(Some(job_from_model(found)));
        }
        Ok(Some(job_from_model(am.update(&self.db).await?)))
    }

    async fn delete_job(&self, id: Uuid) -> Result<bool, StoreError> {
        let res = job::Entity::delete_by_id(id).exec(&self.db).await?;
        Ok(res.rows_affected > 0)
    }
}
