use argon2::{Argon2, password_hash::{PasswordHasher, PasswordVerifier, SaltString}, PasswordHash};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header as JwtHeader, Validation};
use rand::rngs::OsRng;
use serde::{Deserialize, Serialize};

use super::errors::TokenError;
use crate::domain::Claims;
use crate::errors::ServiceError;

const BEARER_PREFIX: &str = "Bearer ";
const MAX_TTL_SECS: u64 = 365 * 24 * 3600;

/// Signed payload. Identity sits under `user` next to the registered claims.
#[derive(Debug, Serialize, Deserialize)]
struct TokenPayload {
    user: Claims,
    iat: i64,
    exp: i64,
}

/// Password hashing and identity-token issuance/verification.
///
/// Holds the process-wide signing secret, injected once at startup.
pub struct CredentialService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl CredentialService {
    pub fn new(secret: &str, ttl_secs: u64) -> Self {
        let ttl_secs = ttl_secs.min(MAX_TTL_SECS) as i64;
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl: Duration::seconds(ttl_secs),
        }
    }

    pub fn from_config(cfg: &configs::AuthConfig) -> Self {
        Self::new(&cfg.jwt_secret, cfg.token_ttl_secs)
    }

    pub fn hash_password(&self, password: &str) -> Result<String, ServiceError> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| ServiceError::Credential(e.to_string()))?
            .to_string();
        Ok(hash)
    }

    /// A malformed stored hash never verifies.
    pub fn verify_password(&self, password: &str, hash: &str) -> bool {
        match PasswordHash::new(hash) {
            Ok(parsed) => Argon2::default().verify_password(password.as_bytes(), &parsed).is_ok(),
            Err(_) => false,
        }
    }

    pub fn issue_token(&self, claims: &Claims) -> Result<String, ServiceError> {
        self.sign(claims, Utc::now())
    }

    fn sign(&self, claims: &Claims, issued_at: DateTime<Utc>) -> Result<String, ServiceError> {
        let payload = TokenPayload {
            user: claims.clone(),
            iat: issued_at.timestamp(),
            exp: (issued_at + self.ttl).timestamp(),
        };
        encode(&JwtHeader::default(), &payload, &self.encoding).map_err(|e| ServiceError::Credential(e.to_string()))
    }

    /// Verify an `x-auth-token` header value of the form `Bearer <token>`.
    pub fn verify_token(&self, header_value: &str) -> Result<Claims, TokenError> {
        let token = header_value.strip_prefix(BEARER_PREFIX).ok_or(TokenError::MissingBearer)?;
        self.decode_token(token.trim())
    }

    /// Verify a bare token string.
    pub fn decode_token(&self, token: &str) -> Result<Claims, TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = 0;
        match decode::<TokenPayload>(token, &self.decoding, &validation) {
            Ok(data) => Ok(data.claims.user),
            Err(e) => match e.kind() {
                ErrorKind::ExpiredSignature => Err(TokenError::Expired),
                _ => Err(TokenError::Invalid(e.to_string())),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Role;
    use uuid::Uuid;

    fn svc() -> CredentialService {
        CredentialService::new("test-secret", 3600)
    }

    fn claims() -> Claims {
        Claims { id: Uuid::new_v4(), role: Role::Company, company_id: Some(Uuid::new_v4()) }
    }

    #[test]
    fn password_hash_verifies_only_the_original() {
        let s = svc();
        let hash = s.hash_password("Passw0rd").unwrap();
        assert_ne!(hash, "Passw0rd");
        assert!(s.verify_password("Passw0rd", &hash));
        assert!(!s.verify_password("wrong", &hash));
        assert!(!s.verify_password("Passw0rd", "not-a-phc-string"));
    }

    #[test]
    fn token_roundtrips_claims() {
        let s = svc();
        let c = claims();
        let token = s.issue_token(&c).unwrap();
        assert_eq!(s.verify_token(&format!("Bearer {token}")).unwrap(), c);
    }

    #[test]
    fn missing_bearer_prefix_is_rejected() {
        let s = svc();
        let token = s.issue_token(&claims()).unwrap();
        assert_eq!(s.verify_token(&token), Err(TokenError::MissingBearer));
    }

    #[test]
    fn foreign_signature_is_invalid() {
        let other = CredentialService::new("other-secret", 3600);
        let token = other.issue_token(&claims()).unwrap();
        assert!(matches!(svc().verify_token(&format!("Bearer {token}")), Err(TokenError::Invalid(_))));
        assert!(matches!(svc().verify_token("Bearer not.a.jwt"), Err(TokenError::Invalid(_))));
    }

    #[test]
    fn expired_token_is_reported_as_expired() {
        let s = svc();
        let token = s.sign(&claims(), Utc::now() - Duration::hours(2)).unwrap();
        assert_eq!(s.decode_token(&token), Err(TokenError::Expired));
    }

    #[test]
    fn payload_nests_identity_under_user() {
        let s = svc();
        let c = Claims { id: Uuid::new_v4(), role: Role::Jobseeker, company_id: None };
        let token = s.issue_token(&c).unwrap();
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        let raw = decode::<serde_json::Value>(&token, &DecodingKey::from_secret(b"test-secret"), &validation).unwrap();
        assert_eq!(raw.claims["user"]["role"], "jobseeker");
        assert!(raw.claims["user"]["companyId"].is_null());
        let ttl = raw.claims["exp"].as_i64().unwrap() - raw.claims["iat"].as_i64().unwrap();
        assert_eq!(ttl, 3600);
    }
}
