#![cfg(test)]
use std::sync::Arc;

use migration::MigratorTrait;
use sea_orm::DatabaseConnection;
use tokio::sync::OnceCell;

use configs::DatabaseConfig;
use models::db::connect_with_config;

use crate::auth::CredentialService;
use crate::domain::{Claims, NewCompanyInput, RegisterInput, Role, User};
use crate::store::{EntityStore, MemoryEntityStore};

// Ensure migrations run only once across the entire test process
static MIGRATED: OnceCell<()> = OnceCell::const_new();

fn db_config() -> Option<DatabaseConfig> {
    if std::env::var("SKIP_DB_TESTS").is_ok() {
        return None;
    }
    let url = std::env::var("DATABASE_URL").ok()?;
    Some(DatabaseConfig {
        url,
        max_connections: 10,
        min_connections: 1,
        connect_timeout_secs: 10,
        idle_timeout_secs: 60,
        max_lifetime_secs: 600,
        acquire_timeout_secs: 10,
        sqlx_logging: false,
    })
}

/// A migrated connection, or `None` when the run has no database.
pub async fn get_db() -> Result<Option<DatabaseConnection>, anyhow::Error> {
    let Some(cfg) = db_config() else { return Ok(None) };
    MIGRATED
        .get_or_try_init(|| async {
            let db = connect_with_config(&cfg).await?;
            migration::Migrator::up(&db, None).await?;
            Ok::<_, anyhow::Error>(())
        })
        .await?;
    // fresh connection for the current test's runtime
    Ok(Some(connect_with_config(&cfg).await?))
}

pub fn credentials() -> Arc<CredentialService> {
    Arc::new(CredentialService::new("test-secret", 3600))
}

pub fn memory_store() -> Arc<dyn EntityStore> {
    Arc::new(MemoryEntityStore::new())
}

pub fn register_input(email: &str, role: Role) -> RegisterInput {
    RegisterInput { name: "Test User".into(), email: email.into(), password: "Passw0rd".into(), role: Some(role) }
}

pub fn company_input(name: &str) -> NewCompanyInput {
    NewCompanyInput {
        name: name.into(),
        description: "We build things".into(),
        industry: "Software".into(),
        website: "https://example.com".into(),
        logo: None,
    }
}

/// Insert a user directly and return its claims.
pub async fn seed_user(store: &Arc<dyn EntityStore>, email: &str, role: Role) -> (User, Claims) {
    let user = store
        .insert_user(crate::store::NewUser {
            name: "Seed".into(),
            email: email.into(),
            password_hash: "unused".into(),
            role,
        })
        .await
        .expect("seed user");
    let claims = Claims::for_user(&user);
    (user, claims)
}
