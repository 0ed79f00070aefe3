pub mod auth;
pub mod companies;
pub mod jobs;
pub mod users;

use axum::{
    middleware,
    routing::{get, post, put},
    Json, Router,
};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use common::types::Health;

use crate::openapi::ApiDoc;
use auth::ServerState;

#[utoipa::path(get, path = "/health", tag = "health", responses((status = 200, description = "OK", body = crate::openapi::HealthResponse)))]
pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

/// Build the full application router: public reads, token-protected
/// mutations, and the API docs.
pub fn build_router(state: ServerState, cors: CorsLayer) -> Router {
    // Public routes (health + browse)
    let public = Router::new()
        .route("/health", get(health))
        .route("/api/users", post(auth::register))
        .route("/api/users/login", post(auth::login))
        .route("/api/companies", get(companies::list))
        .route("/api/companies/:company_id", get(companies::get))
        .route("/api/companies/:company_id/jobs", get(companies::jobs))
        .route("/api/jobs", get(jobs::list))
        .route("/api/jobs/search", get(jobs::search))
        .route("/api/jobs/:job_id", get(jobs::get))
        .route("/api/jobs/:job_id/similar", get(jobs::similar));

    // Protected routes: require `x-auth-token`
    let protected = Router::new()
        .route("/api/users/me", get(users::me).put(users::update_me).delete(users::delete_me))
        .route("/api/users/me/applied-jobs", get(users::applied_jobs))
        .route("/api/users/:user_id", get(users::get_user))
        .route("/api/users/jobs/:id/apply", put(users::apply))
        .route("/api/users/jobs/:id/withdraw", axum::routing::delete(users::withdraw))
        .route("/api/companies", post(companies::create))
        .route(
            "/api/companies/me",
            get(companies::me).put(companies::update_me).delete(companies::delete_me),
        )
        .route("/api/jobs", post(jobs::create))
        .route("/api/jobs/:job_id", put(jobs::update).delete(jobs::delete))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth::require_auth));

    // Compose
    public
        .merge(protected)
        .with_state(state)
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                // 每次请求创建 span，包含方法和路径等，日志级别为 INFO
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                // 请求到达时打点
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                // 响应返回时打点，包含状态码与耗时
                .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                // 失败（5xx 等）时以 ERROR 记录
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
