use axum::{
    extract::{Query, State},
    http::StatusCode,
    Extension, Json,
};
use uuid::Uuid;

use common::types::Message;
use service::domain::{Claims, Job, JobPatch, JobQuery, JobWithCompany, NewJobInput, ScoredJob};

use crate::errors::ApiError;
use crate::extract::{ApiJson, ApiPath};
use crate::routes::auth::ServerState;

#[utoipa::path(
    get, path = "/api/jobs", tag = "jobs",
    responses((status = 200, description = "All jobs with companies"))
)]
pub async fn list(State(state): State<ServerState>) -> Result<Json<Vec<JobWithCompany>>, ApiError> {
    Ok(Json(state.jobs.list().await?))
}

#[utoipa::path(
    get, path = "/api/jobs/search", tag = "jobs",
    params(crate::openapi::JobSearchParams),
    responses((status = 200, description = "Matching jobs"))
)]
pub async fn search(State(state): State<ServerState>, Query(query): Query<JobQuery>) -> Result<Json<Vec<JobWithCompany>>, ApiError> {
    Ok(Json(state.jobs.search(&query).await?))
}

#[utoipa::path(
    get, path = "/api/jobs/{job_id}", tag = "jobs",
    params(("job_id" = Uuid, Path, description = "Job ID")),
    responses((status = 200, description = "Job"), (status = 404, description = "Job not found"))
)]
pub async fn get(State(state): State<ServerState>, ApiPath(job_id): ApiPath<Uuid>) -> Result<Json<JobWithCompany>, ApiError> {
    Ok(Json(state.jobs.get(job_id).await?))
}

#[utoipa::path(
    get, path = "/api/jobs/{job_id}/similar", tag = "jobs",
    params(("job_id" = Uuid, Path, description = "Reference job ID")),
    responses((status = 200, description = "Up to five similar jobs"), (status = 404, description = "Job not found"))
)]
pub async fn similar(State(state): State<ServerState>, ApiPath(job_id): ApiPath<Uuid>) -> Result<Json<Vec<ScoredJob>>, ApiError> {
    Ok(Json(state.jobs.similar(job_id).await?))
}

#[utoipa::path(
    post, path = "/api/jobs", tag = "jobs",
    request_body = crate::openapi::NewJobRequest,
    responses(
        (status = 201, description = "Job created"),
        (status = 400, description = "Validation Error"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Only companies can create jobs"),
        (status = 404, description = "Company not found")
    )
)]
pub async fn create(
    State(state): State<ServerState>,
    Extension(claims): Extension<Claims>,
    ApiJson(input): ApiJson<NewJobInput>,
) -> Result<(StatusCode, Json<Job>), ApiError> {
    let job = state.jobs.create(Some(&claims), input).await?;
    Ok((StatusCode::CREATED, Json(job)))
}

#[utoipa::path(
    put, path = "/api/jobs/{job_id}", tag = "jobs",
    params(("job_id" = Uuid, Path, description = "Job ID")),
    request_body = crate::openapi::JobPatchDoc,
    responses((status = 200, description = "Updated job"), (status = 401, description = "Not authorized to update this job"), (status = 404, description = "Job not found"))
)]
pub async fn update(
    State(state): State<ServerState>,
    Extension(claims): Extension<Claims>,
    ApiPath(job_id): ApiPath<Uuid>,
    ApiJson(patch): ApiJson<JobPatch>,
) -> Result<Json<Job>, ApiError> {
    Ok(Json(state.jobs.update(Some(&claims), job_id, patch).await?))
}

#[utoipa::path(
    delete, path = "/api/jobs/{job_id}", tag = "jobs",
    params(("job_id" = Uuid, Path, description = "Job ID")),
    responses((status = 200, description = "Job removed"), (status = 401, description = "Not authorized to delete this job"), (status = 404, description = "Job not found"))
)]
pub async fn delete(
    State(state): State<ServerState>,
    Extension(claims): Extension<Claims>,
    ApiPath(job_id): ApiPath<Uuid>,
) -> Result<Json<Message>, ApiError> {
    state.jobs.delete(Some(&claims), job_id).await?;
    Ok(Json(Message::new("Job removed")))
}
