use std::{net::SocketAddr, sync::Arc};

use axum::Router;
use migration::MigratorTrait;
use tower_http::cors::CorsLayer;
use tracing::info;

use configs::AppConfig;
use service::auth::CredentialService;
use service::store::{EntityStore, SeaOrmEntityStore};

use crate::errors::StartupError;
use crate::routes::{self, auth::ServerState};

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

/// Config file first; fall back to environment variables when it is absent.
fn load_config() -> Result<AppConfig, StartupError> {
    match AppConfig::load_and_validate() {
        Ok(cfg) => Ok(cfg),
        Err(file_err) => {
            info!(error = %file_err, "config file unavailable, using environment");
            AppConfig::from_env().map_err(|e| StartupError::InvalidConfig(e.to_string()))
        }
    }
}

/// Assemble the router over any entity store.
pub fn build_app(store: Arc<dyn EntityStore>, credentials: Arc<CredentialService>) -> Router {
    let state = ServerState::new(store, credentials);
    routes::build_router(state, build_cors())
}

/// Public entry: load config, connect and migrate the database, then serve.
pub async fn run() -> Result<(), StartupError> {
    let cfg = load_config()?;

    let db = models::db::connect_with_config(&cfg.database)
        .await
        .map_err(|e| StartupError::Database(e.to_string()))?;
    migration::Migrator::up(&db, None)
        .await
        .map_err(|e| StartupError::Database(e.to_string()))?;
    info!("migrations applied");

    let store: Arc<dyn EntityStore> = Arc::new(SeaOrmEntityStore::new(db));
    let credentials = Arc::new(CredentialService::from_config(&cfg.auth));
    let app = build_app(store, credentials);

    let addr: SocketAddr = format!("{}:{}", cfg.server.host, cfg.server.port)
        .parse()
        .map_err(|e| StartupError::InvalidConfig(format!("bind address: {e}")))?;
    info!(%addr, "starting job board server");
    let listener = tokio::net::TcpListener::bind(addr).await.map_err(anyhow::Error::from)?;
    axum::serve(listener, app).await.map_err(anyhow::Error::from)?;
    Ok(())
}
