use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::{json, Value};
use thiserror::Error;
use tracing::{error, warn};

use service::auth::errors::TokenError;
use service::auth::DenyReason;
use service::errors::ServiceError;

pub const NO_TOKEN: &str = "No token, authorization denied";
pub const BAD_TOKEN_FORMAT: &str = "Invalid token format";
pub const TOKEN_NOT_VALID: &str = "Token is not valid";

/// HTTP face of a `ServiceError`.
#[derive(Debug)]
pub struct ApiError(pub ServiceError);

impl From<ServiceError> for ApiError {
    fn from(e: ServiceError) -> Self {
        Self(e)
    }
}

fn msg(text: impl Into<String>) -> Value {
    json!({ "msg": text.into() })
}

impl ApiError {
    pub fn status_and_body(&self) -> (StatusCode, Value) {
        match &self.0 {
            ServiceError::Unauthenticated => (StatusCode::UNAUTHORIZED, msg("Not authorized - no token")),
            ServiceError::Forbidden(DenyReason::Unauthenticated) => (StatusCode::UNAUTHORIZED, msg("Not authorized - no token")),
            ServiceError::Forbidden(DenyReason::OwnershipMismatch) => (StatusCode::UNAUTHORIZED, msg("Not authorized")),
            ServiceError::Forbidden(DenyReason::RoleMismatch) => (StatusCode::FORBIDDEN, msg("Access denied")),
            ServiceError::NotFound(entity) => (StatusCode::NOT_FOUND, msg(format!("{entity} not found"))),
            ServiceError::DuplicateName => (StatusCode::BAD_REQUEST, msg("Company name already exists")),
            ServiceError::DuplicateOwnership => (StatusCode::BAD_REQUEST, msg("You already have a company profile")),
            ServiceError::AlreadyApplied => (StatusCode::BAD_REQUEST, msg("You have already applied to this job")),
            ServiceError::NotApplied => (StatusCode::BAD_REQUEST, msg("You have not applied to this job")),
            ServiceError::DuplicateEmail => (StatusCode::BAD_REQUEST, json!({ "errors": [{ "msg": "User already exists" }] })),
            ServiceError::InvalidCredentials => (StatusCode::BAD_REQUEST, json!({ "errors": [{ "msg": "Invalid Credentials" }] })),
            ServiceError::ValidationFailed(fields) => (StatusCode::BAD_REQUEST, json!({ "errors": fields })),
            ServiceError::InvalidToken(TokenError::MissingBearer) => (StatusCode::UNAUTHORIZED, msg(BAD_TOKEN_FORMAT)),
            ServiceError::InvalidToken(_) => (StatusCode::UNAUTHORIZED, msg(TOKEN_NOT_VALID)),
            ServiceError::Credential(_) | ServiceError::Storage(_) => (StatusCode::INTERNAL_SERVER_ERROR, msg("Server Error")),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = self.status_and_body();
        if status.is_server_error() {
            // 细节只写日志，不回传客户端
            error!(code = self.0.code(), error = %self.0, "request failed");
        } else if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            warn!(code = self.0.code(), error = %self.0, "request denied");
        }
        (status, Json(body)).into_response()
    }
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("database unavailable: {0}")]
    Database(String),
    #[error(transparent)]
    Any(#[from] anyhow::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use service::domain::{Entity, FieldErrors};

    #[test]
    fn ownership_denial_is_401_role_denial_is_403() {
        let (s, _) = ApiError(ServiceError::Forbidden(DenyReason::OwnershipMismatch)).status_and_body();
        assert_eq!(s, StatusCode::UNAUTHORIZED);
        let (s, _) = ApiError(ServiceError::Forbidden(DenyReason::RoleMismatch)).status_and_body();
        assert_eq!(s, StatusCode::FORBIDDEN);
    }

    #[test]
    fn not_found_names_entity() {
        let (s, body) = ApiError(ServiceError::NotFound(Entity::Job)).status_and_body();
        assert_eq!(s, StatusCode::NOT_FOUND);
        assert_eq!(body["msg"], "Job not found");
    }

    #[test]
    fn validation_lists_fields() {
        let mut fields = FieldErrors::new();
        fields.insert("title".into(), "title is required".into());
        let (s, body) = ApiError(ServiceError::ValidationFailed(fields)).status_and_body();
        assert_eq!(s, StatusCode::BAD_REQUEST);
        assert_eq!(body["errors"]["title"], "title is required");
    }

    #[test]
    fn storage_detail_is_not_leaked() {
        let (s, body) = ApiError(ServiceError::Storage("connection refused on 10.0.0.5".into())).status_and_body();
        assert_eq!(s, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({ "msg": "Server Error" }));
    }

    #[test]
    fn duplicate_email_uses_errors_array() {
        let (_, body) = ApiError(ServiceError::DuplicateEmail).status_and_body();
        assert_eq!(body["errors"][0]["msg"], "User already exists");
    }
}
