//! Business view of users, companies and jobs, plus the inputs and partial
//! updates accepted for them.
//!
//! JSON field names are camelCase to match the public API.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use crate::errors::ServiceError;

/// Account kind. Only `Company` accounts can own a company and post jobs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    Jobseeker,
    Company,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Jobseeker => "jobseeker",
            Role::Company => "company",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = ServiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "jobseeker" => Ok(Role::Jobseeker),
            "company" => Ok(Role::Company),
            other => Err(ServiceError::Storage(format!("unknown role `{other}`"))),
        }
    }
}

/// Entity kinds, used to name what was not found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entity {
    User,
    Company,
    Job,
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Entity::User => "User",
            Entity::Company => "Company",
            Entity::Job => "Job",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: Role,
    pub resume: Option<String>,
    pub applied_jobs: Vec<Uuid>,
    pub company_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub industry: String,
    pub website: String,
    pub logo: Option<String>,
    pub created_by: Uuid,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub id: Uuid,
    pub title: String,
    pub company: Uuid,
    pub description: String,
    pub requirements: String,
    pub salary: Option<String>,
    pub location: Option<String>,
    pub date_posted: DateTime<Utc>,
}

/// Identity carried inside a verified token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Claims {
    pub id: Uuid,
    pub role: Role,
    pub company_id: Option<Uuid>,
}

impl Claims {
    pub fn for_user(user: &User) -> Self {
        Self { id: user.id, role: user.role, company_id: user.company_id }
    }
}

/// Either the populated company or, if it vanished, the bare id.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CompanyRef {
    Populated(Company),
    Id(Uuid),
}

/// A job with its owning company joined in.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobWithCompany {
    pub id: Uuid,
    pub title: String,
    pub company: CompanyRef,
    pub description: String,
    pub requirements: String,
    pub salary: Option<String>,
    pub location: Option<String>,
    pub date_posted: DateTime<Utc>,
}

impl JobWithCompany {
    pub fn new(job: Job, company: Option<Company>) -> Self {
        let company = match company {
            Some(c) if c.id == job.company => CompanyRef::Populated(c),
            _ => CompanyRef::Id(job.company),
        };
        Self {
            id: job.id,
            title: job.title,
            company,
            description: job.description,
            requirements: job.requirements,
            salary: job.salary,
            location: job.location,
            date_posted: job.date_posted,
        }
    }
}

/// Result row of the similar-jobs ranking.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoredJob {
    #[serde(flatten)]
    pub job: Job,
    pub similarity_score: f64,
}

/// Field name to message, reported as `ValidationFailed`.
pub type FieldErrors = BTreeMap<String, String>;

fn require(errors: &mut FieldErrors, field: &str, value: &str) {
    if value.trim().is_empty() {
        errors.insert(field.to_string(), format!("{field} is required"));
    }
}

fn require_if_present(errors: &mut FieldErrors, field: &str, value: Option<&String>) {
    if let Some(v) = value {
        if v.trim().is_empty() {
            errors.insert(field.to_string(), format!("{field} must not be empty"));
        }
    }
}

fn finish(errors: FieldErrors) -> Result<(), ServiceError> {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(ServiceError::ValidationFailed(errors))
    }
}

/// Keeps `Some(None)` for an explicit JSON `null` so it can mean "clear".
fn double_option<'de, T, D>(de: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Deserialize::deserialize(de).map(Some)
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RegisterInput {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub role: Option<Role>,
}

impl RegisterInput {
    pub fn validate(&self) -> Result<(), ServiceError> {
        let mut errors = FieldErrors::new();
        require(&mut errors, "name", &self.name);
        require(&mut errors, "email", &self.email);
        require(&mut errors, "password", &self.password);
        if !errors.contains_key("email") && models::user::validate_email(&self.email).is_err() {
            errors.insert("email".into(), "email is invalid".into());
        }
        finish(errors)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginInput {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewCompanyInput {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub industry: String,
    #[serde(default)]
    pub website: String,
    #[serde(default)]
    pub logo: Option<String>,
}

impl NewCompanyInput {
    pub fn validate(&self) -> Result<(), ServiceError> {
        let mut errors = FieldErrors::new();
        require(&mut errors, "name", &self.name);
        require(&mut errors, "description", &self.description);
        require(&mut errors, "industry", &self.industry);
        require(&mut errors, "website", &self.website);
        finish(errors)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewJobInput {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub requirements: String,
    #[serde(default)]
    pub salary: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
}

impl NewJobInput {
    pub fn validate(&self) -> Result<(), ServiceError> {
        let mut errors = FieldErrors::new();
        require(&mut errors, "title", &self.title);
        require(&mut errors, "description", &self.description);
        require(&mut errors, "requirements", &self.requirements);
        finish(errors)
    }
}

/// Self-service profile update. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserPatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub resume: Option<Option<String>>,
}

impl UserPatch {
    pub fn validate(&self) -> Result<(), ServiceError> {
        let mut errors = FieldErrors::new();
        require_if_present(&mut errors, "name", self.name.as_ref());
        require_if_present(&mut errors, "email", self.email.as_ref());
        if let Some(email) = &self.email {
            if !errors.contains_key("email") && models::user::validate_email(email).is_err() {
                errors.insert("email".into(), "email is invalid".into());
            }
        }
        finish(errors)
    }
}

/// Owner's company profile update. `logo: null` clears the logo.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CompanyPatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub industry: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub logo: Option<Option<String>>,
}

impl CompanyPatch {
    pub fn validate(&self) -> Result<(), ServiceError> {
        let mut errors = FieldErrors::new();
        require_if_present(&mut errors, "name", self.name.as_ref());
        require_if_present(&mut errors, "description", self.description.as_ref());
        require_if_present(&mut errors, "industry", self.industry.as_ref());
        require_if_present(&mut errors, "website", self.website.as_ref());
        finish(errors)
    }
}

/// Job update. The owning company and posting date are not patchable.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct JobPatch {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub requirements: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub salary: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub location: Option<Option<String>>,
}

impl JobPatch {
    pub fn validate(&self) -> Result<(), ServiceError> {
        let mut errors = FieldErrors::new();
        require_if_present(&mut errors, "title", self.title.as_ref());
        require_if_present(&mut errors, "description", self.description.as_ref());
        require_if_present(&mut errors, "requirements", self.requirements.as_ref());
        finish(errors)
    }
}

/// Public job search filters; absent filters match everything.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct JobQuery {
    #[serde(default)]
    pub keyword: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub industry: Option<String>,
}

impl JobQuery {
    /// Case-insensitive substring match on title and location, exact industry.
    pub fn matches(&self, job: &Job, company: Option<&Company>) -> bool {
        fn contains(haystack: &str, needle: &str) -> bool {
            haystack.to_lowercase().contains(&needle.to_lowercase())
        }
        let keyword_ok = match self.keyword.as_deref().filter(|k| !k.is_empty()) {
            Some(k) => contains(&job.title, k),
            None => true,
        };
        let location_ok = match self.location.as_deref().filter(|l| !l.is_empty()) {
            Some(l) => job.location.as_deref().is_some_and(|loc| contains(loc, l)),
            None => true,
        };
        let industry_ok = match self.industry.as_deref().filter(|i| !i.is_empty()) {
            Some(i) => company.is_some_and(|c| c.industry.eq_ignore_ascii_case(i)),
            None => true,
        };
        keyword_ok && location_ok && industry_ok
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn job(title: &str, location: Option<&str>) -> Job {
        Job {
            id: Uuid::new_v4(),
            title: title.into(),
            company: Uuid::new_v4(),
            description: "d".into(),
            requirements: "r".into(),
            salary: None,
            location: location.map(Into::into),
            date_posted: Utc::now(),
        }
    }

    #[test]
    fn patch_distinguishes_absent_from_null() {
        let absent: JobPatch = serde_json::from_str(r#"{"title":"New"}"#).unwrap();
        assert_eq!(absent.salary, None);
        let cleared: JobPatch = serde_json::from_str(r#"{"salary":null}"#).unwrap();
        assert_eq!(cleared.salary, Some(None));
        let set: JobPatch = serde_json::from_str(r#"{"salary":"100k"}"#).unwrap();
        assert_eq!(set.salary, Some(Some("100k".into())));
    }

    #[test]
    fn patch_ignores_ownership_fields() {
        let patch: JobPatch = serde_json::from_str(r#"{"company":"x","datePosted":"y","title":"T"}"#).unwrap();
        assert_eq!(patch.title.as_deref(), Some("T"));
    }

    #[test]
    fn blank_required_field_in_patch_fails() {
        let patch = CompanyPatch { name: Some("  ".into()), ..Default::default() };
        match patch.validate() {
            Err(ServiceError::ValidationFailed(errors)) => assert!(errors.contains_key("name")),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn new_job_reports_every_missing_field() {
        let input = NewJobInput { title: "T".into(), ..Default::default() };
        match input.validate() {
            Err(ServiceError::ValidationFailed(errors)) => {
                assert_eq!(errors.keys().cloned().collect::<Vec<_>>(), vec!["description", "requirements"]);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn register_role_defaults_to_none_and_parses_lowercase() {
        let input: RegisterInput = serde_json::from_str(r#"{"name":"A","email":"a@b.c","password":"pw"}"#).unwrap();
        assert_eq!(input.role, None);
        let input: RegisterInput = serde_json::from_str(r#"{"name":"A","email":"a@b.c","password":"pw","role":"company"}"#).unwrap();
        assert_eq!(input.role, Some(Role::Company));
    }

    #[test]
    fn user_serialization_hides_password() {
        let user = User {
            id: Uuid::new_v4(),
            name: "A".into(),
            email: "a@b.c".into(),
            password_hash: "secret-hash".into(),
            role: Role::Jobseeker,
            resume: None,
            applied_jobs: vec![],
            company_id: None,
            created_at: Utc::now(),
        };
        let json = serde_json::to_value(&user).unwrap();
        assert!(json.get("passwordHash").is_none());
        assert!(json.get("companyId").is_some());
    }

    #[test]
    fn query_matches_case_insensitively() {
        let j = job("Senior Rust Engineer", Some("Berlin, DE"));
        let q = JobQuery { keyword: Some("rust".into()), location: Some("berlin".into()), industry: None };
        assert!(q.matches(&j, None));
        let q = JobQuery { keyword: Some("go".into()), ..Default::default() };
        assert!(!q.matches(&j, None));
        let q = JobQuery { location: Some("Paris".into()), ..Default::default() };
        assert!(!q.matches(&j, None));
    }

    #[test]
    fn industry_filter_uses_owning_company() {
        let j = job("Engineer", None);
        let c = Company {
            id: j.company,
            name: "Acme".into(),
            description: "d".into(),
            industry: "Aerospace".into(),
            website: "https://acme.test".into(),
            logo: None,
            created_by: Uuid::new_v4(),
        };
        let q = JobQuery { industry: Some("aerospace".into()), ..Default::default() };
        assert!(q.matches(&j, Some(&c)));
        assert!(!q.matches(&j, None));
    }

    #[test]
    fn populated_job_falls_back_to_id() {
        let j = job("Engineer", None);
        let company_id = j.company;
        let view = JobWithCompany::new(j, None);
        assert_eq!(view.company, CompanyRef::Id(company_id));
    }
}
