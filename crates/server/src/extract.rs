//! Body and path extractors whose rejections use the `{ "msg": ... }` JSON
//! shape of every other error response.

use axum::{
    async_trait,
    extract::{FromRequest, FromRequestParts, Path, Request},
    http::{request::Parts, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::de::DeserializeOwned;
use tracing::warn;

use common::types::Message;

pub const INVALID_ID: &str = "Invalid ID";
pub const INVALID_BODY: &str = "Invalid request body";

fn bad_request(msg: &str, detail: String) -> Response {
    warn!(detail = %detail, "request rejected by extractor");
    (StatusCode::BAD_REQUEST, Json(Message::new(msg))).into_response()
}

/// `Json<T>` with a JSON 400 on malformed bodies or a missing content type.
pub struct ApiJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => Err(bad_request(INVALID_BODY, rejection.body_text())),
        }
    }
}

/// `Path<T>` with a JSON 400 when an identifier does not parse.
pub struct ApiPath<T>(pub T);

#[async_trait]
impl<S, T> FromRequestParts<S> for ApiPath<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Path::<T>::from_request_parts(parts, state).await {
            Ok(Path(value)) => Ok(Self(value)),
            Err(rejection) => Err(bad_request(INVALID_ID, rejection.body_text())),
        }
    }
}
