//! Admin API handlers.

use axum::{
    extract::{Path, State},
    Json,
};
use grc_common::{FeatureKey, FeaturePermission, Role, ScopedRole};
use tracing::{error, info};
use uuid::Uuid;
use validator::Validate;

use super::matrix::{apply_edit, role_matrix, MatrixEntry};
use super::provisioning::{self, InviteUserRequest, MOCK_USERS};
use super::types::{
    AdminError, EditableRole, InviteResponse, RoleAssignmentResponse, RoleMatrixResponse,
    SeedResponse,
};
use crate::api::AppState;
use crate::auth::AuthUser;
use crate::permissions::{
    queries::{get_role_permission_for_update, replace_user_role, upsert_role_permission},
    AssignRoleRequest, PermissionStore, PgStore, SetPermissionRequest,
};

fn parse_scoped_role(role: &str) -> Result<ScopedRole, AdminError> {
    match role.parse::<Role>() {
        Ok(Role::Scoped(scoped)) => Ok(scoped),
        Ok(full) => Err(AdminError::FullAccessRole(full)),
        Err(e) => Err(AdminError::Validation(e.to_string())),
    }
}

// ============================================================================
// Permission Matrix
// ============================================================================

/// GET /api/admin/roles
pub async fn list_roles() -> Json<Vec<EditableRole>> {
    Json(
        ScopedRole::editable()
            .iter()
            .map(|&role| EditableRole {
                role,
                label: Role::Scoped(role).label(),
            })
            .collect(),
    )
}

/// GET /api/admin/roles/{role}/permissions
#[tracing::instrument(skip(state))]
pub async fn get_role_permissions(
    State(state): State<AppState>,
    Path(role): Path<String>,
) -> Result<Json<RoleMatrixResponse>, AdminError> {
    let role = parse_scoped_role(&role)?;
    let rows = PgStore::new(state.db.clone()).get_permissions(role).await?;

    Ok(Json(RoleMatrixResponse {
        role,
        label: Role::Scoped(role).label(),
        permissions: role_matrix(role, &rows),
    }))
}

/// PUT /api/admin/roles/{role}/permissions/{feature}
///
/// Changes one capability of one feature and drops every cached permission
/// set resolved for the role.
#[tracing::instrument(skip(state, body), fields(admin_id = %auth.id))]
pub async fn set_role_permission(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((role, feature)): Path<(String, String)>,
    Json(body): Json<SetPermissionRequest>,
) -> Result<Json<MatrixEntry>, AdminError> {
    let role = parse_scoped_role(&role)?;
    let feature: FeatureKey = feature
        .parse()
        .map_err(|e: grc_common::Error| AdminError::Validation(e.to_string()))?;

    let mut tx = state.db.begin().await?;
    let current = get_role_permission_for_update(&mut *tx, role, feature)
        .await?
        .map_or(FeaturePermission::NONE, |row| row.permission());
    let updated = apply_edit(current, body.capability, body.value)?;
    let row = upsert_role_permission(&mut *tx, role, feature, updated).await?;
    tx.commit().await?;

    state.permissions.invalidate_role(Role::Scoped(role));

    info!(
        %role,
        %feature,
        capability = %body.capability,
        value = body.value,
        "Role permission updated"
    );

    Ok(Json(MatrixEntry {
        feature,
        label: feature.label(),
        permission: row.permission(),
    }))
}

// ============================================================================
// Users
// ============================================================================

/// PUT /api/admin/users/{user_id}/role
#[tracing::instrument(skip(state, body), fields(admin_id = %auth.id))]
pub async fn assign_role(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(user_id): Path<Uuid>,
    Json(body): Json<AssignRoleRequest>,
) -> Result<Json<RoleAssignmentResponse>, AdminError> {
    let row = replace_user_role(
        &state.db,
        user_id,
        body.role,
        body.organization_id,
        Some(auth.id),
    )
    .await?;

    state.permissions.invalidate_user(user_id);

    info!(%user_id, role = %body.role, "Role assigned");

    Ok(Json(RoleAssignmentResponse {
        user_id,
        role: body.role,
        organization_id: row.organization_id,
        assigned_at: row.assigned_at,
    }))
}

/// POST /api/admin/users/invite
#[tracing::instrument(skip(state, body), fields(admin_id = %auth.id))]
pub async fn invite_user(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(body): Json<InviteUserRequest>,
) -> Result<Json<InviteResponse>, AdminError> {
    body.validate()
        .map_err(|e| AdminError::Validation(e.to_string()))?;

    match provisioning::invite_user(&state.provisioning, &body).await {
        Ok(user_id) => Ok(Json(InviteResponse {
            success: true,
            user_id,
        })),
        Err(e) => {
            error!(
                email = %body.email,
                stage = %e.stage,
                completed_stages = ?e.completed_stages,
                user_id = ?e.user_id,
                error = %e.message,
                "Invitation partially provisioned"
            );
            Err(e.into())
        }
    }
}

/// POST /api/admin/users/seed
#[tracing::instrument(skip(state), fields(admin_id = %auth.id))]
pub async fn seed_users(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<SeedResponse>, AdminError> {
    let results = provisioning::seed_users(
        &state.provisioning,
        &state.config.default_organization_name,
        &MOCK_USERS,
    )
    .await?;

    Ok(Json(SeedResponse {
        success: true,
        message: "Mock users seeded successfully",
        results,
    }))
}
