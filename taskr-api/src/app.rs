/// Application state, router builder, and session middleware
///
/// # Router
///
/// ```text
/// /
/// ├── GET  /               # Login prompt (public)
/// ├── POST /               # Login (public)
/// ├── GET  /register       # Registration prompt (public)
/// ├── POST /register       # Register (public)
/// ├── GET  /health         # Health check (public)
/// ├── GET  /logout         # Tear down session (guarded)
/// ├── GET  /tasks          # Task listing (guarded)
/// ├── POST /add            # Create task (guarded)
/// ├── GET  /complete/:id   # Mark task complete (guarded)
/// ├── GET  /delete/:id     # Delete task (guarded)
/// └── *                    # "Sorry. There's nothing here."
/// ```
///
/// Guarded routes sit behind [`session_auth_layer`], which turns the session
/// cookie into a request-scoped [`Identity`] or answers with the login
/// notice. Handlers never look at cookies themselves.

use crate::{config::Config, error::ApiError, routes};
use axum::{
    extract::{Request, State},
    http::{header, HeaderValue, Method},
    middleware::Next,
    response::Response,
    routing::{get, post},
    Router,
};
use sqlx::PgPool;
use std::sync::Arc;
use taskr_shared::auth::session::{authenticate, Identity};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state
///
/// Cloned per request via Axum's `State` extractor; Arc keeps it cheap.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: PgPool,

    /// Application configuration
    pub config: Arc<Config>,
}

impl AppState {
    /// Creates new application state
    pub fn new(db: PgPool, config: Config) -> Self {
        Self {
            db,
            config: Arc::new(config),
        }
    }

    /// Session lifetime in seconds, for cookie Max-Age and row expiry
    pub fn session_ttl_seconds(&self) -> i64 {
        self.config.session.ttl_hours * 3600
    }
}

/// Builds the complete Axum router with all routes and middleware
pub fn build_router(state: AppState) -> Router {
    // Public routes: login, registration, health
    let public_routes = Router::new()
        .route("/", get(routes::auth::login_prompt).post(routes::auth::login))
        .route(
            "/register",
            get(routes::auth::register_prompt).post(routes::auth::register),
        )
        .route("/health", get(routes::health::health_check));

    // Guarded routes: everything that needs an established identity
    let guarded_routes = Router::new()
        .route("/logout", get(routes::auth::logout))
        .route("/tasks", get(routes::tasks::list_tasks))
        .route("/add", post(routes::tasks::add_task))
        .route("/complete/:id", get(routes::tasks::complete_task))
        .route("/delete/:id", get(routes::tasks::delete_task))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            session_auth_layer,
        ));

    // Configure CORS based on environment
    let cors = if state.config.api.cors_origins.contains(&"*".to_string()) {
        CorsLayer::permissive()
    } else {
        let origins: Vec<HeaderValue> = state
            .config
            .api
            .cors_origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([Method::GET, Method::POST])
            .allow_headers([header::CONTENT_TYPE])
            .allow_credentials(true)
    };

    Router::new()
        .merge(public_routes)
        .merge(guarded_routes)
        .fallback(routes::not_found)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors)
        .with_state(state)
}

/// Session authentication middleware layer
///
/// Resolves the session cookie to an [`Identity`] and injects it into
/// request extensions. Missing or expired sessions become the 401 login
/// notice without touching the handler.
pub async fn session_auth_layer(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let cookie_header = req
        .headers()
        .get(header::COOKIE)
        .and_then(|v| v.to_str().ok());

    let identity: Identity = authenticate(&state.db, cookie_header).await?;

    req.extensions_mut().insert(identity);

    Ok(next.run(req).await)
}
