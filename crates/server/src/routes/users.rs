use axum::{
    extract::State,
    Extension, Json,
};
use uuid::Uuid;

use common::types::Message;
use service::domain::{Claims, JobWithCompany, User, UserPatch};

use crate::errors::ApiError;
use crate::extract::{ApiJson, ApiPath};
use crate::routes::auth::ServerState;

#[utoipa::path(
    get, path = "/api/users/me", tag = "users",
    responses((status = 200, description = "Current user"), (status = 401, description = "Unauthorized"), (status = 404, description = "User not found"))
)]
pub async fn me(State(state): State<ServerState>, Extension(claims): Extension<Claims>) -> Result<Json<User>, ApiError> {
    Ok(Json(state.users.current_profile(Some(&claims)).await?))
}

#[utoipa::path(
    put, path = "/api/users/me", tag = "users",
    request_body = crate::openapi::UserPatchDoc,
    responses((status = 200, description = "Updated user"), (status = 400, description = "Validation Error"), (status = 404, description = "User not found"))
)]
pub async fn update_me(
    State(state): State<ServerState>,
    Extension(claims): Extension<Claims>,
    ApiJson(patch): ApiJson<UserPatch>,
) -> Result<Json<User>, ApiError> {
    Ok(Json(state.users.update_profile(Some(&claims), patch).await?))
}

#[utoipa::path(
    delete, path = "/api/users/me", tag = "users",
    responses((status = 200, description = "User deleted"), (status = 404, description = "User not found"))
)]
pub async fn delete_me(State(state): State<ServerState>, Extension(claims): Extension<Claims>) -> Result<Json<Message>, ApiError> {
    state.users.delete_self(Some(&claims)).await?;
    Ok(Json(Message::new("User deleted")))
}

#[utoipa::path(
    get, path = "/api/users/me/applied-jobs", tag = "users",
    responses((status = 200, description = "Applied jobs with companies"), (status = 404, description = "User not found"))
)]
pub async fn applied_jobs(
    State(state): State<ServerState>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<Vec<JobWithCompany>>, ApiError> {
    Ok(Json(state.users.applied_jobs(Some(&claims)).await?))
}

#[utoipa::path(
    get, path = "/api/users/{user_id}", tag = "users",
    params(("user_id" = Uuid, Path, description = "User ID")),
    responses((status = 200, description = "User"), (status = 403, description = "Access denied"), (status = 404, description = "User not found"))
)]
pub async fn get_user(
    State(state): State<ServerState>,
    Extension(claims): Extension<Claims>,
    ApiPath(user_id): ApiPath<Uuid>,
) -> Result<Json<User>, ApiError> {
    Ok(Json(state.users.get_user(Some(&claims), user_id).await?))
}

#[utoipa::path(
    put, path = "/api/users/jobs/{id}/apply", tag = "users",
    params(("id" = Uuid, Path, description = "Job ID")),
    responses((status = 200, description = "Applied"), (status = 400, description = "Already applied"), (status = 404, description = "Job or user not found"))
)]
pub async fn apply(
    State(state): State<ServerState>,
    Extension(claims): Extension<Claims>,
    ApiPath(job_id): ApiPath<Uuid>,
) -> Result<Json<Message>, ApiError> {
    state.coordinator.apply_to_job(Some(&claims), job_id).await?;
    Ok(Json(Message::new("Successfully applied to the job")))
}

#[utoipa::path(
    delete, path = "/api/users/jobs/{id}/withdraw", tag = "users",
    params(("id" = Uuid, Path, description = "Job ID")),
    responses((status = 200, description = "Withdrawn"), (status = 400, description = "Not applied"), (status = 404, description = "User not found"))
)]
pub async fn withdraw(
    State(state): State<ServerState>,
    Extension(claims): Extension<Claims>,
    ApiPath(job_id): ApiPath<Uuid>,
) -> Result<Json<Message>, ApiError> {
    state.coordinator.withdraw_application(Some(&claims), job_id).await?;
    Ok(Json(Message::new("Application withdrawn successfully")))
}
