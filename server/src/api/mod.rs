//! API Router and Application State
//!
//! Central routing configuration and shared state.

pub mod me;

use axum::{
    extract::State,
    middleware::from_fn_with_state,
    routing::{delete, get},
    Json, Router,
};
use serde::Serialize;
use sqlx::PgPool;
use std::sync::Arc;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{
    admin::{self, PgProvisioning},
    auth,
    config::Config,
    permissions::{PermissionResolver, PgSessionPermissions, PgStore, SessionPermissions},
};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: PgPool,
    /// Server configuration
    pub config: Arc<Config>,
    /// Resolved permissions per login session
    pub permissions: Arc<PgSessionPermissions>,
    /// Account, profile and role writes for invitations and seeding
    pub provisioning: PgProvisioning,
}

impl AppState {
    /// Create new application state.
    #[must_use]
    pub fn new(db: PgPool, config: Config) -> Self {
        let store = PgStore::new(db.clone());
        let resolver = PermissionResolver::new(store.clone(), store);

        Self {
            provisioning: PgProvisioning::new(db.clone()),
            permissions: Arc::new(SessionPermissions::new(resolver)),
            db,
            config: Arc::new(config),
        }
    }
}

/// Create the main application router.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let me_routes = Router::new()
        .route("/permissions", get(me::get_permissions))
        .route("/navigation", get(me::get_navigation))
        .route("/session", delete(me::end_session));

    // Protected routes that require authentication
    let protected_routes = Router::new()
        .nest("/api/me", me_routes)
        .nest("/api/admin", admin::router(state.clone()))
        .layer(from_fn_with_state(state.clone(), auth::require_auth));

    Router::new()
        // Health check
        .route("/health", get(health_check))
        .merge(protected_routes)
        // Middleware
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(cors)
        // State
        .with_state(state)
}

/// Health check response.
#[derive(Serialize)]
struct HealthResponse {
    /// Service status
    status: &'static str,
    /// Sessions with cached permissions
    cached_sessions: usize,
}

/// Health check endpoint.
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        cached_sessions: state.permissions.len(),
    })
}
