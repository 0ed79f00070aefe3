use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::warn;

use common::types::Message;
use service::auth::errors::TokenError;
use service::auth::{AuthService, CredentialService};
use service::companies::CompanyService;
use service::coordinator::Coordinator;
use service::domain::{LoginInput, RegisterInput};
use service::jobs::JobService;
use service::store::EntityStore;
use service::users::UserService;

use crate::errors::{ApiError, BAD_TOKEN_FORMAT, NO_TOKEN, TOKEN_NOT_VALID};
use crate::extract::ApiJson;

/// Header carrying `Bearer <token>`.
pub const AUTH_HEADER: &str = "x-auth-token";

/// Shared handler state: every service over one entity store.
#[derive(Clone)]
pub struct ServerState {
    pub credentials: Arc<CredentialService>,
    pub auth: Arc<AuthService>,
    pub users: Arc<UserService>,
    pub companies: Arc<CompanyService>,
    pub jobs: Arc<JobService>,
    pub coordinator: Arc<Coordinator>,
}

impl ServerState {
    pub fn new(store: Arc<dyn EntityStore>, credentials: Arc<CredentialService>) -> Self {
        Self {
            auth: Arc::new(AuthService::new(store.clone(), credentials.clone())),
            users: Arc::new(UserService::new(store.clone())),
            companies: Arc::new(CompanyService::new(store.clone())),
            jobs: Arc::new(JobService::new(store.clone())),
            coordinator: Arc::new(Coordinator::new(store, credentials.clone())),
            credentials,
        }
    }
}

fn deny(msg: &str) -> Response {
    (StatusCode::UNAUTHORIZED, Json(Message::new(msg))).into_response()
}

/// 路由级中间件：校验 `x-auth-token: Bearer <token>`，通过后把 Claims 放入请求扩展
/// 缺失、格式错误、签名无效或过期均返回 401，并记录日志
pub async fn require_auth(State(state): State<ServerState>, mut req: Request, next: Next) -> Response {
    let path = req.uri().path().to_string();
    let Some(value) = req.headers().get(AUTH_HEADER) else {
        warn!(path = %path, "missing auth token");
        return deny(NO_TOKEN);
    };
    let Ok(value) = value.to_str() else {
        warn!(path = %path, "auth token is not valid ascii");
        return deny(BAD_TOKEN_FORMAT);
    };
    match state.credentials.verify_token(value) {
        Ok(claims) => {
            req.extensions_mut().insert(claims);
            next.run(req).await
        }
        Err(TokenError::MissingBearer) => {
            warn!(path = %path, "invalid auth token format (expect Bearer)");
            deny(BAD_TOKEN_FORMAT)
        }
        Err(e) => {
            warn!(path = %path, error = %e, "auth token rejected");
            deny(TOKEN_NOT_VALID)
        }
    }
}

#[derive(Serialize)]
pub struct TokenOutput {
    pub token: String,
}

#[utoipa::path(
    post, path = "/api/users", tag = "auth",
    request_body = crate::openapi::RegisterRequest,
    responses(
        (status = 200, description = "Registered"),
        (status = 400, description = "User already exists / Validation Error")
    )
)]
pub async fn register(State(state): State<ServerState>, ApiJson(input): ApiJson<RegisterInput>) -> Result<Json<Message>, ApiError> {
    state.auth.register(input).await?;
    Ok(Json(Message::new("User registered successfully")))
}

#[utoipa::path(
    post, path = "/api/users/login", tag = "auth",
    request_body = crate::openapi::LoginRequest,
    responses(
        (status = 200, description = "Token issued", body = crate::openapi::TokenResponse),
        (status = 400, description = "Invalid Credentials")
    )
)]
pub async fn login(State(state): State<ServerState>, ApiJson(input): ApiJson<LoginInput>) -> Result<Json<TokenOutput>, ApiError> {
    let token = state.auth.login(input).await?;
    Ok(Json(TokenOutput { token }))
}
