use axum::{
    extract::State,
    http::StatusCode,
    Extension, Json,
};
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use common::types::Message;
use service::domain::{Claims, Company, CompanyPatch, Job, NewCompanyInput};

use crate::errors::ApiError;
use crate::extract::{ApiJson, ApiPath};
use crate::routes::auth::ServerState;

#[derive(Serialize)]
pub struct CreateCompanyOutput {
    pub company: Company,
    pub token: String,
}

#[utoipa::path(
    get, path = "/api/companies", tag = "companies",
    responses((status = 200, description = "All companies"))
)]
pub async fn list(State(state): State<ServerState>) -> Result<Json<Vec<Company>>, ApiError> {
    Ok(Json(state.companies.list().await?))
}

#[utoipa::path(
    post, path = "/api/companies", tag = "companies",
    request_body = crate::openapi::NewCompanyRequest,
    responses(
        (status = 201, description = "Company created with a refreshed token"),
        (status = 400, description = "Duplicate ownership / name, or Validation Error"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Only company accounts")
    )
)]
pub async fn create(
    State(state): State<ServerState>,
    Extension(claims): Extension<Claims>,
    ApiJson(input): ApiJson<NewCompanyInput>,
) -> Result<(StatusCode, Json<CreateCompanyOutput>), ApiError> {
    let created = state.coordinator.create_company(Some(&claims), input).await?;
    info!(company_id = %created.company.id, "company_create_request_ok");
    Ok((StatusCode::CREATED, Json(CreateCompanyOutput { company: created.company, token: created.token })))
}

#[utoipa::path(
    get, path = "/api/companies/me", tag = "companies",
    responses((status = 200, description = "Own company"), (status = 401, description = "Not owner"), (status = 404, description = "Company not found"))
)]
pub async fn me(State(state): State<ServerState>, Extension(claims): Extension<Claims>) -> Result<Json<Company>, ApiError> {
    Ok(Json(state.companies.current(Some(&claims)).await?))
}

#[utoipa::path(
    put, path = "/api/companies/me", tag = "companies",
    request_body = crate::openapi::CompanyPatchDoc,
    responses((status = 200, description = "Updated company"), (status = 400, description = "Validation Error"), (status = 401, description = "Not owner"), (status = 404, description = "Company not found"))
)]
pub async fn update_me(
    State(state): State<ServerState>,
    Extension(claims): Extension<Claims>,
    ApiJson(patch): ApiJson<CompanyPatch>,
) -> Result<Json<Company>, ApiError> {
    Ok(Json(state.companies.update_current(Some(&claims), patch).await?))
}

#[utoipa::path(
    delete, path = "/api/companies/me", tag = "companies",
    responses((status = 200, description = "Company deleted"), (status = 401, description = "Not owner"), (status = 404, description = "Company not found"))
)]
pub async fn delete_me(State(state): State<ServerState>, Extension(claims): Extension<Claims>) -> Result<Json<Message>, ApiError> {
    state.companies.delete_current(Some(&claims)).await?;
    Ok(Json(Message::new("Company deleted")))
}

#[utoipa::path(
    get, path = "/api/companies/{company_id}", tag = "companies",
    params(("company_id" = Uuid, Path, description = "Company ID")),
    responses((status = 200, description = "Company"), (status = 404, description = "Company not found"))
)]
pub async fn get(State(state): State<ServerState>, ApiPath(company_id): ApiPath<Uuid>) -> Result<Json<Company>, ApiError> {
    Ok(Json(state.companies.get(company_id).await?))
}

#[utoipa::path(
    get, path = "/api/companies/{company_id}/jobs", tag = "companies",
    params(("company_id" = Uuid, Path, description = "Company ID")),
    responses((status = 200, description = "Company's jobs"), (status = 404, description = "Company not found"))
)]
pub async fn jobs(State(state): State<ServerState>, ApiPath(company_id): ApiPath<Uuid>) -> Result<Json<Vec<Job>>, ApiError> {
    Ok(Json(state.companies.jobs_of(company_id).await?))
}
