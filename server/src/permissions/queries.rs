//! Database queries for role assignments and the role permission table.

use grc_common::{FeatureKey, FeaturePermission, Role, ScopedRole};
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use super::models::{RolePermissionRow, UserRoleRow};

// ============================================================================
// Role Assignment Queries
// ============================================================================

/// Get the user's current role assignment.
///
/// The schema allows one row per organization; the most recent assignment wins.
pub async fn get_user_role(pool: &PgPool, user_id: Uuid) -> sqlx::Result<Option<UserRoleRow>> {
    sqlx::query_as::<_, UserRoleRow>(
        r"
        SELECT id, user_id, role, organization_id, assigned_by, assigned_at
        FROM user_roles
        WHERE user_id = $1
        ORDER BY assigned_at DESC
        LIMIT 1
        ",
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await
}

/// Insert a role assignment.
pub async fn insert_user_role(
    pool: &PgPool,
    user_id: Uuid,
    role: Role,
    organization_id: Uuid,
    assigned_by: Option<Uuid>,
) -> sqlx::Result<UserRoleRow> {
    sqlx::query_as::<_, UserRoleRow>(
        r"
        INSERT INTO user_roles (user_id, role, organization_id, assigned_by)
        VALUES ($1, $2, $3, $4)
        RETURNING id, user_id, role, organization_id, assigned_by, assigned_at
        ",
    )
    .bind(user_id)
    .bind(role.as_str())
    .bind(organization_id)
    .bind(assigned_by)
    .fetch_one(pool)
    .await
}

/// Replace every assignment the user holds with a single new one.
pub async fn replace_user_role(
    pool: &PgPool,
    user_id: Uuid,
    role: Role,
    organization_id: Uuid,
    assigned_by: Option<Uuid>,
) -> sqlx::Result<UserRoleRow> {
    let mut tx = pool.begin().await?;

    sqlx::query("DELETE FROM user_roles WHERE user_id = $1")
        .bind(user_id)
        .execute(&mut *tx)
        .await?;

    let row = sqlx::query_as::<_, UserRoleRow>(
        r"
        INSERT INTO user_roles (user_id, role, organization_id, assigned_by)
        VALUES ($1, $2, $3, $4)
        RETURNING id, user_id, role, organization_id, assigned_by, assigned_at
        ",
    )
    .bind(user_id)
    .bind(role.as_str())
    .bind(organization_id)
    .bind(assigned_by)
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(row)
}

// ============================================================================
// Role Permission Queries
// ============================================================================

/// List all permission rows for a role.
pub async fn list_role_permissions(
    pool: &PgPool,
    role: ScopedRole,
) -> sqlx::Result<Vec<RolePermissionRow>> {
    sqlx::query_as::<_, RolePermissionRow>(
        r"
        SELECT id, role, feature_key, can_view, can_create, can_update, can_delete
        FROM role_permissions
        WHERE role = $1
        ",
    )
    .bind(role.as_str())
    .fetch_all(pool)
    .await
}

/// Lock and read one matrix cell inside a transaction.
pub async fn get_role_permission_for_update(
    conn: &mut PgConnection,
    role: ScopedRole,
    feature: FeatureKey,
) -> sqlx::Result<Option<RolePermissionRow>> {
    sqlx::query_as::<_, RolePermissionRow>(
        r"
        SELECT id, role, feature_key, can_view, can_create, can_update, can_delete
        FROM role_permissions
        WHERE role = $1 AND feature_key = $2
        FOR UPDATE
        ",
    )
    .bind(role.as_str())
    .bind(feature.as_str())
    .fetch_optional(conn)
    .await
}

/// Write all four flags for a matrix cell, creating the row if needed.
pub async fn upsert_role_permission(
    conn: &mut PgConnection,
    role: ScopedRole,
    feature: FeatureKey,
    permission: FeaturePermission,
) -> sqlx::Result<RolePermissionRow> {
    sqlx::query_as::<_, RolePermissionRow>(
        r"
        INSERT INTO role_permissions (role, feature_key, can_view, can_create, can_update, can_delete)
        VALUES ($1, $2, $3, $4, $5, $6)
        ON CONFLICT (role, feature_key) DO UPDATE
        SET can_view = EXCLUDED.can_view,
            can_create = EXCLUDED.can_create,
            can_update = EXCLUDED.can_update,
            can_delete = EXCLUDED.can_delete
        RETURNING id, role, feature_key, can_view, can_create, can_update, can_delete
        ",
    )
    .bind(role.as_str())
    .bind(feature.as_str())
    .bind(permission.can_view)
    .bind(permission.can_create)
    .bind(permission.can_update)
    .bind(permission.can_delete)
    .fetch_one(conn)
    .await
}
