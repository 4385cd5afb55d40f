//! User and Role Administration
//!
//! - Permission matrix: read and edit the capabilities of table-driven roles
//! - Role assignment
//! - User invitation and demo-user seeding
//!
//! Every route is gated on the `users` feature of the caller's own
//! resolved permissions.

pub mod handlers;
pub mod matrix;
pub mod provisioning;
pub mod types;

use axum::{
    middleware::from_fn_with_state,
    routing::{get, post, put},
    Router,
};
use grc_common::{Capability, FeatureKey};

use crate::api::AppState;
use crate::permissions::require_capability;

pub use provisioning::{PgProvisioning, ProvisioningError, ProvisioningStage, Provisioner};
pub use types::AdminError;

/// Create the admin router.
///
/// Must be nested behind `require_auth`. The seed route is only mounted
/// when seeding is enabled in configuration.
pub fn router(state: AppState) -> Router<AppState> {
    let read_routes = Router::new()
        .route("/roles", get(handlers::list_roles))
        .route("/roles/{role}/permissions", get(handlers::get_role_permissions))
        .layer(from_fn_with_state(
            state.clone(),
            require_capability(FeatureKey::Users, Capability::View),
        ));

    let update_routes = Router::new()
        .route(
            "/roles/{role}/permissions/{feature}",
            put(handlers::set_role_permission),
        )
        .route("/users/{user_id}/role", put(handlers::assign_role))
        .layer(from_fn_with_state(
            state.clone(),
            require_capability(FeatureKey::Users, Capability::Update),
        ));

    let mut create_routes = Router::new().route("/users/invite", post(handlers::invite_user));
    if state.config.seed_enabled {
        create_routes = create_routes.route("/users/seed", post(handlers::seed_users));
    }
    let create_routes = create_routes.layer(from_fn_with_state(
        state,
        require_capability(FeatureKey::Users, Capability::Create),
    ));

    read_routes.merge(update_routes).merge(create_routes)
}
