use std::net::SocketAddr;
use std::sync::Arc;

use migration::MigratorTrait;
use reqwest::StatusCode as HttpStatusCode;
use serde_json::json;
use tokio::net::TcpListener;
use uuid::Uuid;

use service::auth::CredentialService;
use service::store::{EntityStore, SeaOrmEntityStore};

struct TestApp {
    base_url: String,
}

/// Real TCP server over PostgreSQL. Returns `None` when no database is configured.
async fn start_server() -> anyhow::Result<Option<TestApp>> {
    if std::env::var("SKIP_DB_TESTS").is_ok() {
        return Ok(None);
    }
    // Use DATABASE_URL from environment; if not present, skip tests gracefully
    if std::env::var("DATABASE_URL").is_err() {
        eprintln!("DATABASE_URL missing; skip e2e tests. Provide .env.test or env var.");
        return Ok(None);
    }

    let db = models::db::connect().await?;
    if let Err(e) = migration::Migrator::up(&db, None).await {
        eprintln!("migrations notice: {}", e);
    }

    let store: Arc<dyn EntityStore> = Arc::new(SeaOrmEntityStore::new(db));
    let app = server::build_app(store, Arc::new(CredentialService::new("test-secret", 3600)));
    let listener = TcpListener::bind((std::net::Ipv4Addr::LOCALHOST, 0)).await?;
    let addr: SocketAddr = listener.local_addr()?;
    let base_url = format!("http://{}:{}", addr.ip(), addr.port());

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            eprintln!("server error: {}", e);
        }
    });

    Ok(Some(TestApp { base_url }))
}

async fn signup(c: &reqwest::Client, app: &TestApp, role: &str) -> anyhow::Result<String> {
    let email = format!("user_{}@example.com", Uuid::new_v4());
    let password = "S3curePass!";
    let res = c
        .post(format!("{}/api/users", app.base_url))
        .json(&json!({"name": "Tester", "email": email, "password": password, "role": role}))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let res = c
        .post(format!("{}/api/users/login", app.base_url))
        .json(&json!({"email": email, "password": password}))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let body = res.json::<serde_json::Value>().await?;
    Ok(body["token"].as_str().unwrap_or_default().to_string())
}

#[tokio::test]
async fn e2e_public_health() -> anyhow::Result<()> {
    let Some(app) = start_server().await? else { return Ok(()) };
    let res = reqwest::get(format!("{}/health", app.base_url)).await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["status"], "ok");
    Ok(())
}

#[tokio::test]
async fn e2e_protected_without_token_denied() -> anyhow::Result<()> {
    let Some(app) = start_server().await? else { return Ok(()) };
    let res = reqwest::Client::new().get(format!("{}/api/users/me", app.base_url)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn e2e_company_job_application_lifecycle() -> anyhow::Result<()> {
    let Some(app) = start_server().await? else { return Ok(()) };
    let c = reqwest::Client::new();

    let rep = signup(&c, &app, "company").await?;
    let name = format!("Acme {}", Uuid::new_v4());
    let res = c
        .post(format!("{}/api/companies", app.base_url))
        .header("x-auth-token", format!("Bearer {rep}"))
        .json(&json!({"name": name, "description": "rockets", "industry": "Aerospace", "website": "https://acme.test"}))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::CREATED);
    let created = res.json::<serde_json::Value>().await?;
    let rep = created["token"].as_str().unwrap_or_default().to_string();

    // 第二次创建：唯一归属
    let res = c
        .post(format!("{}/api/companies", app.base_url))
        .header("x-auth-token", format!("Bearer {rep}"))
        .json(&json!({"name": format!("{name} again"), "description": "d", "industry": "i", "website": "w"}))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::BAD_REQUEST);

    let res = c
        .post(format!("{}/api/jobs", app.base_url))
        .header("x-auth-token", format!("Bearer {rep}"))
        .json(&json!({"title": "Rust Engineer", "description": "services", "requirements": "rust"}))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::CREATED);
    let job = res.json::<serde_json::Value>().await?;
    let job_id = job["id"].as_str().unwrap_or_default().to_string();

    let seeker = signup(&c, &app, "jobseeker").await?;
    let apply = format!("{}/api/users/jobs/{job_id}/apply", app.base_url);
    let res = c.put(&apply).header("x-auth-token", format!("Bearer {seeker}")).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let res = c.put(&apply).header("x-auth-token", format!("Bearer {seeker}")).send().await?;
    assert_eq!(res.status(), HttpStatusCode::BAD_REQUEST);

    let res = c
        .get(format!("{}/api/users/me/applied-jobs", app.base_url))
        .header("x-auth-token", format!("Bearer {seeker}"))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let applied = res.json::<serde_json::Value>().await?;
    assert_eq!(applied[0]["id"], job_id.as_str());
    assert_eq!(applied[0]["company"]["name"], name.as_str());

    // 删除公司后岗位一并删除
    let res = c
        .delete(format!("{}/api/companies/me", app.base_url))
        .header("x-auth-token", format!("Bearer {rep}"))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let res = c.get(format!("{}/api/jobs/{job_id}", app.base_url)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::NOT_FOUND);
    Ok(())
}
