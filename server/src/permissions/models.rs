//! Database models for the role and permission tables.

use chrono::{DateTime, Utc};
use grc_common::{FeaturePermission, Role, RolePermission};
use serde::Deserialize;
use sqlx::FromRow;
use uuid::Uuid;

/// Role assignment row. `role` is stored as its text identifier.
#[derive(Debug, Clone, FromRow)]
pub struct UserRoleRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub role: String,
    pub organization_id: Uuid,
    pub assigned_by: Option<Uuid>,
    pub assigned_at: DateTime<Utc>,
}

impl UserRoleRow {
    pub fn role(&self) -> grc_common::Result<Role> {
        self.role.parse()
    }
}

/// Role permission row as stored.
#[derive(Debug, Clone, FromRow)]
pub struct RolePermissionRow {
    pub id: Uuid,
    pub role: String,
    pub feature_key: String,
    pub can_view: bool,
    pub can_create: bool,
    pub can_update: bool,
    pub can_delete: bool,
}

impl RolePermissionRow {
    #[must_use]
    pub const fn permission(&self) -> FeaturePermission {
        FeaturePermission {
            can_view: self.can_view,
            can_create: self.can_create,
            can_update: self.can_update,
            can_delete: self.can_delete,
        }
    }
}

impl TryFrom<RolePermissionRow> for RolePermission {
    type Error = grc_common::Error;

    fn try_from(row: RolePermissionRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id,
            role: row.role.parse()?,
            feature: row.feature_key.parse()?,
            permission: row.permission(),
        })
    }
}

/// Request body for editing one cell of the permission matrix.
#[derive(Debug, Deserialize)]
pub struct SetPermissionRequest {
    pub capability: grc_common::Capability,
    pub value: bool,
}

/// Request body for replacing a user's role assignment.
#[derive(Debug, Deserialize)]
pub struct AssignRoleRequest {
    pub role: Role,
    pub organization_id: Uuid,
}
