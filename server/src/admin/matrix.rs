//! Role permission matrix editing.

use grc_common::{Capability, FeatureKey, FeaturePermission, RolePermission, ScopedRole};
use serde::Serialize;
use thiserror::Error;

/// Rejected matrix edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MatrixEditError {
    /// Create, update and delete can only be granted on a viewable feature.
    #[error("Cannot grant {0} without view")]
    RequiresView(Capability),
}

/// Apply a single-cell edit to a stored permission.
///
/// Turning view off also clears create, update and delete.
pub fn apply_edit(
    current: FeaturePermission,
    capability: Capability,
    value: bool,
) -> Result<FeaturePermission, MatrixEditError> {
    match (capability, value) {
        (Capability::View, false) => Ok(FeaturePermission::NONE),
        (Capability::View, true) => Ok(current.with(Capability::View, true)),
        (cap, true) if !current.can_view => Err(MatrixEditError::RequiresView(cap)),
        (cap, value) => Ok(current.with(cap, value)),
    }
}

/// One row of the matrix as the editor renders it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MatrixEntry {
    pub feature: FeatureKey,
    pub label: &'static str,
    #[serde(flatten)]
    pub permission: FeaturePermission,
}

/// Full matrix for a role: every feature in display order, missing rows all false.
pub fn role_matrix(role: ScopedRole, rows: &[RolePermission]) -> Vec<MatrixEntry> {
    FeatureKey::all()
        .iter()
        .map(|&feature| MatrixEntry {
            feature,
            label: feature.label(),
            permission: rows
                .iter()
                .rev()
                .find(|row| row.role == role && row.feature == feature)
                .map_or(FeaturePermission::NONE, |row| row.permission),
        })
        .collect()
}
