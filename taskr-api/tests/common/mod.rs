/// Common test utilities for integration tests
///
/// Provides a `TestContext` that spins up a fresh database per test (so the
/// global task id sequence always starts at 1), runs migrations, and builds
/// the router. Tests drive the router directly via `tower::Service`; no
/// listening socket is involved.
///
/// Tests are skipped (not failed) when `DATABASE_URL` is absent or the
/// server is unreachable.

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use taskr_api::app::{build_router, AppState};
use taskr_api::config::{ApiConfig, Config, DatabaseConfig, SessionConfig};
use taskr_shared::auth::password::hash_password;
use taskr_shared::db::migrations::run_migrations;
use taskr_shared::models::user::{CreateUser, Role, User};
use sqlx::PgPool;
use tower::Service as _;
use uuid::Uuid;

/// Test context containing all necessary resources
pub struct TestContext {
    pub db: PgPool,
    pub app: axum::Router,
    admin_db: PgPool,
    db_name: String,
}

impl TestContext {
    /// Creates a test context with a fresh database, or None when no
    /// database is available
    pub async fn try_new() -> Option<Self> {
        let base_url = match std::env::var("DATABASE_URL") {
            Ok(url) => url,
            Err(_) => {
                eprintln!("skipping: DATABASE_URL not set");
                return None;
            }
        };

        let admin_db = match PgPool::connect(&base_url).await {
            Ok(pool) => pool,
            Err(e) => {
                eprintln!("skipping: cannot connect to database: {}", e);
                return None;
            }
        };

        // Fresh database per test; ids start at 1 and tests stay parallel-safe
        let db_name = format!("taskr_test_{}", Uuid::new_v4().simple());
        sqlx::query(&format!(r#"CREATE DATABASE "{}""#, db_name))
            .execute(&admin_db)
            .await
            .expect("create test database");

        let test_url = with_database(&base_url, &db_name);
        let db = PgPool::connect(&test_url).await.expect("connect test database");

        run_migrations(&db).await.expect("run migrations");

        let config = Config {
            api: ApiConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
                cors_origins: vec!["*".to_string()],
            },
            database: DatabaseConfig {
                url: test_url,
                max_connections: 5,
            },
            session: SessionConfig { ttl_hours: 24 },
        };

        let state = AppState::new(db.clone(), config);
        let app = build_router(state);

        Some(TestContext {
            db,
            app,
            admin_db,
            db_name,
        })
    }

    /// Drops the per-test database
    pub async fn cleanup(self) {
        self.db.close().await;
        let _ = sqlx::query(&format!(r#"DROP DATABASE "{}" WITH (FORCE)"#, self.db_name))
            .execute(&self.admin_db)
            .await;
        self.admin_db.close().await;
    }

    /// Sends a request and returns (status, json body, set-cookie value)
    pub async fn send(
        &self,
        request: Request<Body>,
    ) -> (StatusCode, serde_json::Value, Option<String>) {
        let mut app = self.app.clone();
        let response = app.call(request).await.unwrap();

        let status = response.status();
        let set_cookie = response
            .headers()
            .get(header::SET_COOKIE)
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string());

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = if body.is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::from_slice(&body).unwrap()
        };

        (status, json, set_cookie)
    }

    /// GET with an optional session cookie
    pub async fn get(
        &self,
        uri: &str,
        cookie: Option<&str>,
    ) -> (StatusCode, serde_json::Value, Option<String>) {
        let mut builder = Request::builder().method("GET").uri(uri);
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        self.send(builder.body(Body::empty()).unwrap()).await
    }

    /// POST a urlencoded form with an optional session cookie
    pub async fn post_form(
        &self,
        uri: &str,
        form: &str,
        cookie: Option<&str>,
    ) -> (StatusCode, serde_json::Value, Option<String>) {
        let mut builder = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        self.send(builder.body(Body::from(form.to_string())).unwrap())
            .await
    }

    /// Registers a user via the HTTP surface
    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
        confirm: &str,
    ) -> (StatusCode, serde_json::Value) {
        let form = format!(
            "name={}&email={}&password={}&confirm={}",
            name, email, password, confirm
        );
        let (status, body, _) = self.post_form("/register", &form, None).await;
        (status, body)
    }

    /// Logs in and returns the session cookie on success
    pub async fn login(
        &self,
        name: &str,
        password: &str,
    ) -> (StatusCode, serde_json::Value, Option<String>) {
        let form = format!("name={}&password={}", name, password);
        let (status, body, set_cookie) = self.post_form("/", &form, None).await;

        // "taskr_session=abc; Path=/; ..." -> "taskr_session=abc"
        let cookie = set_cookie.map(|c| c.split(';').next().unwrap().to_string());
        (status, body, cookie)
    }

    /// Creates a user directly in the store, bypassing the HTTP surface
    pub async fn create_user(&self, name: &str, email: &str, password: &str, role: Role) -> User {
        User::create(
            &self.db,
            CreateUser {
                name: name.to_string(),
                email: email.to_string(),
                password_hash: hash_password(password).unwrap(),
                role,
            },
        )
        .await
        .unwrap()
    }

    /// Posts the canonical test task ("Drink coffee")
    pub async fn create_task(&self, cookie: &str) -> (StatusCode, serde_json::Value) {
        let form = "name=Drink+coffee&due_date=2022-04-10&priority=1&posted_date=2022-04-07&status=open";
        let (status, body, _) = self.post_form("/add", form, Some(cookie)).await;
        (status, body)
    }
}

/// Replaces the database name in a PostgreSQL URL
fn with_database(url: &str, db: &str) -> String {
    let (base, params) = match url.split_once('?') {
        Some((base, params)) => (base, Some(params)),
        None => (url, None),
    };

    let idx = base.rfind('/').expect("database url has no path");
    let mut out = format!("{}/{}", &base[..idx], db);
    if let Some(params) = params {
        out.push('?');
        out.push_str(params);
    }
    out
}
