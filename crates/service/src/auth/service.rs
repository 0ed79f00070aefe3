use std::sync::Arc;

use tracing::{debug, info, instrument, warn};

use super::credentials::CredentialService;
use crate::domain::{Claims, LoginInput, RegisterInput, User};
use crate::errors::ServiceError;
use crate::store::{EntityStore, NewUser};

/// Registration and login, independent of the web framework.
pub struct AuthService {
    store: Arc<dyn EntityStore>,
    credentials: Arc<CredentialService>,
}

impl AuthService {
    pub fn new(store: Arc<dyn EntityStore>, credentials: Arc<CredentialService>) -> Self {
        Self { store, credentials }
    }

    /// Register a new account with a hashed password. Role defaults to `jobseeker`.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    /// use service::auth::{AuthService, CredentialService};
    /// use service::domain::{RegisterInput, Role};
    /// use service::store::MemoryEntityStore;
    /// let svc = AuthService::new(Arc::new(MemoryEntityStore::new()), Arc::new(CredentialService::new("secret", 3600)));
    /// let input = RegisterInput { name: "Test".into(), email: "user@example.com".into(), password: "Secret123".into(), role: None };
    /// let user = tokio_test::block_on(svc.register(input)).unwrap();
    /// assert_eq!(user.role, Role::Jobseeker);
    /// assert!(user.company_id.is_none());
    /// ```
    #[instrument(skip(self, input), fields(email = %input.email))]
    pub async fn register(&self, input: RegisterInput) -> Result<User, ServiceError> {
        input.validate()?;
        if let Some(existing) = self.store.find_user_by_email(&input.email).await? {
            debug!(user_id = %existing.id, "user exists");
            return Err(ServiceError::DuplicateEmail);
        }

        let password_hash = self.credentials.hash_password(&input.password)?;
        let user = self
            .store
            .insert_user(NewUser {
                name: input.name,
                email: input.email,
                password_hash,
                role: input.role.unwrap_or_default(),
            })
            .await?;
        info!(user_id = %user.id, role = %user.role, "user_registered");
        Ok(user)
    }

    /// Check credentials and issue a token. Unknown email and wrong password
    /// fail the same way.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    /// use service::auth::{AuthService, CredentialService};
    /// use service::domain::{LoginInput, RegisterInput};
    /// use service::store::MemoryEntityStore;
    /// let creds = Arc::new(CredentialService::new("secret", 3600));
    /// let svc = AuthService::new(Arc::new(MemoryEntityStore::new()), creds.clone());
    /// let _ = tokio_test::block_on(svc.register(RegisterInput { name: "N".into(), email: "u@e.com".into(), password: "Passw0rd".into(), role: None }));
    /// let token = tokio_test::block_on(svc.login(LoginInput { email: "u@e.com".into(), password: "Passw0rd".into() })).unwrap();
    /// assert!(creds.decode_token(&token).is_ok());
    /// ```
    #[instrument(skip(self, input), fields(email = %input.email))]
    pub async fn login(&self, input: LoginInput) -> Result<String, ServiceError> {
        let Some(user) = self.store.find_user_by_email(&input.email).await? else {
            warn!("login_unknown_email");
            return Err(ServiceError::InvalidCredentials);
        };
        if !self.credentials.verify_password(&input.password, &user.password_hash) {
            warn!(user_id = %user.id, "login_bad_password");
            return Err(ServiceError::InvalidCredentials);
        }
        let token = self.credentials.issue_token(&Claims::for_user(&user))?;
        info!(user_id = %user.id, "user_logged_in");
        Ok(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Role;
    use crate::test_support::{credentials, memory_store, register_input};

    #[tokio::test]
    async fn register_then_login() {
        let creds = credentials();
        let svc = AuthService::new(memory_store(), creds.clone());
        let user = svc.register(register_input("a@example.com", Role::Company)).await.unwrap();
        assert_eq!(user.role, Role::Company);
        assert_ne!(user.password_hash, "Passw0rd");

        let token = svc
            .login(LoginInput { email: "a@example.com".into(), password: "Passw0rd".into() })
            .await
            .unwrap();
        let claims = creds.decode_token(&token).unwrap();
        assert_eq!(claims.id, user.id);
        assert_eq!(claims.company_id, None);
    }

    #[tokio::test]
    async fn duplicate_email_rejected() {
        let svc = AuthService::new(memory_store(), credentials());
        svc.register(register_input("dup@example.com", Role::Jobseeker)).await.unwrap();
        let err = svc.register(register_input("dup@example.com", Role::Jobseeker)).await.unwrap_err();
        assert!(matches!(err, ServiceError::DuplicateEmail));
    }

    #[tokio::test]
    async fn missing_fields_fail_validation() {
        let svc = AuthService::new(memory_store(), credentials());
        let err = svc.register(RegisterInput { email: "x@y.z".into(), ..Default::default() }).await.unwrap_err();
        match err {
            ServiceError::ValidationFailed(fields) => {
                assert!(fields.contains_key("name"));
                assert!(fields.contains_key("password"));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[tokio::test]
    async fn bad_login_is_indistinguishable() {
        let svc = AuthService::new(memory_store(), credentials());
        svc.register(register_input("b@example.com", Role::Jobseeker)).await.unwrap();
        let wrong_pw = svc.login(LoginInput { email: "b@example.com".into(), password: "nope".into() }).await.unwrap_err();
        let unknown = svc.login(LoginInput { email: "ghost@example.com".into(), password: "Passw0rd".into() }).await.unwrap_err();
        assert!(matches!(wrong_pw, ServiceError::InvalidCredentials));
        assert!(matches!(unknown, ServiceError::InvalidCredentials));
    }
}
