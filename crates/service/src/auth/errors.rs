use thiserror::Error;

/// Why a presented identity token was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    #[error("token must use the `Bearer <token>` format")]
    MissingBearer,
    #[error("token is malformed or has a bad signature: {0}")]
    Invalid(String),
    #[error("token has expired")]
    Expired,
}
