//! Current-user permission endpoints.

use axum::{extract::State, http::StatusCode, Json};
use grc_common::{Dashboard, EffectivePermissionSet, NavItem, Role};
use serde::Serialize;
use tracing::info;

use super::AppState;
use crate::auth::AuthUser;
use crate::permissions::Gate;

/// Resolution status reported to the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PermissionStatus {
    Ready,
    /// Resolution failed; `permissions` grants nothing.
    Failed,
}

#[derive(Debug, Serialize)]
pub struct MyPermissionsResponse {
    pub status: PermissionStatus,
    pub role: Option<Role>,
    /// Landing dashboard for the role.
    pub dashboard: Dashboard,
    pub permissions: EffectivePermissionSet,
}

/// GET /api/me/permissions
#[tracing::instrument(skip(state, auth), fields(user_id = %auth.id))]
pub async fn get_permissions(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Json<MyPermissionsResponse> {
    let resolved = state
        .permissions
        .resolve(auth.session_id, auth.id, auth.expires_at)
        .await;
    let response = match resolved {
        Some(gate) => MyPermissionsResponse {
            status: PermissionStatus::Ready,
            role: gate.role(),
            dashboard: gate.dashboard(),
            permissions: gate.permissions().as_ref().clone(),
        },
        None => MyPermissionsResponse {
            status: PermissionStatus::Failed,
            role: None,
            dashboard: Dashboard::Default,
            permissions: EffectivePermissionSet::empty(),
        },
    };
    Json(response)
}

/// GET /api/me/navigation
pub async fn get_navigation(Gate(gate): Gate) -> Json<Vec<&'static NavItem>> {
    Json(gate.navigation())
}

/// DELETE /api/me/session
///
/// Drops the session's cached permissions. Token revocation is handled by
/// the auth service.
pub async fn end_session(State(state): State<AppState>, auth: AuthUser) -> StatusCode {
    state.permissions.end_session(auth.session_id, auth.expires_at);
    info!(user_id = %auth.id, session_id = %auth.session_id, "Session permissions cleared");
    StatusCode::NO_CONTENT
}
