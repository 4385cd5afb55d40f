//! Role and permission lookups consumed by the resolver.
//!
//! The resolver only needs two reads. Both are expressed as traits so the
//! resolution rules can be exercised without a database.

use std::future::Future;

use grc_common::{Role, RolePermission, ScopedRole};
use sqlx::PgPool;
use thiserror::Error;
use uuid::Uuid;

use super::queries::{get_user_role, list_role_permissions};

/// Transport or storage failure during a lookup.
///
/// "No rows" is never an error: an unassigned user is `Ok(None)` and a
/// role without rows is `Ok(vec![])`.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Stored role identifier is not a known role.
    #[error("Stored role is not recognised: {0}")]
    UnknownRole(String),

    /// Store could not be reached.
    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

/// Looks up the role assigned to a user.
pub trait RoleStore: Send + Sync {
    /// Returns `Ok(None)` when the user has no role assignment.
    fn get_role(
        &self,
        user_id: Uuid,
    ) -> impl Future<Output = Result<Option<Role>, StoreError>> + Send;
}

/// Reads the permission rows of a table-driven role.
///
/// Only [`ScopedRole`] is accepted: full-access roles have no rows to read.
pub trait PermissionStore: Send + Sync {
    fn get_permissions(
        &self,
        role: ScopedRole,
    ) -> impl Future<Output = Result<Vec<RolePermission>, StoreError>> + Send;
}

/// `PostgreSQL` implementation of both stores.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    #[must_use]
    pub const fn pool(&self) -> &PgPool {
        &self.pool
    }
}

impl RoleStore for PgStore {
    #[tracing::instrument(skip(self))]
    async fn get_role(&self, user_id: Uuid) -> Result<Option<Role>, StoreError> {
        let Some(row) = get_user_role(&self.pool, user_id).await? else {
            return Ok(None);
        };

        row.role()
            .map(Some)
            .map_err(|_| StoreError::UnknownRole(row.role.clone()))
    }
}

impl PermissionStore for PgStore {
    #[tracing::instrument(skip(self))]
    async fn get_permissions(&self, role: ScopedRole) -> Result<Vec<RolePermission>, StoreError> {
        let rows = list_role_permissions(&self.pool, role).await?;

        let mut permissions = Vec::with_capacity(rows.len());
        for row in rows {
            let feature_key = row.feature_key.clone();
            match RolePermission::try_from(row) {
                Ok(permission) => permissions.push(permission),
                Err(e) => {
                    tracing::warn!(%role, feature_key, error = %e, "Skipping unrecognised permission row");
                }
            }
        }

        Ok(permissions)
    }
}
