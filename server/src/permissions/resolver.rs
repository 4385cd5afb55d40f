//! Permission resolution logic.
//!
//! Turns a user into an [`EffectivePermissionSet`].

use grc_common::{EffectivePermissionSet, PermissionGate, Role};
use std::sync::Arc;
use thiserror::Error;
use tracing::warn;
use uuid::Uuid;

use super::store::{PermissionStore, RoleStore, StoreError};

/// Resolution failure. Callers fail closed.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// A lookup failed at the transport or storage level.
    #[error("Permission resolution failed: {0}")]
    ResolutionFailed(#[from] StoreError),
}

/// Result of a successful resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    /// `None` when the user has no role assignment.
    pub role: Option<Role>,
    pub permissions: EffectivePermissionSet,
}

/// Terminal state of a fail-closed resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Resolved(Resolution),
    /// Lookup failed; nothing is granted.
    Failed,
}

impl Outcome {
    /// Gate for this outcome. A failed outcome yields the denied gate.
    #[must_use]
    pub fn into_gate(self) -> PermissionGate {
        match self {
            Self::Resolved(resolution) => {
                PermissionGate::new(resolution.role, Arc::new(resolution.permissions))
            }
            Self::Failed => PermissionGate::denied(),
        }
    }
}

/// Resolves effective permissions from a role store and a permission store.
#[derive(Debug, Clone)]
pub struct PermissionResolver<R, P> {
    roles: R,
    permissions: P,
}

impl<R: RoleStore, P: PermissionStore> PermissionResolver<R, P> {
    pub const fn new(roles: R, permissions: P) -> Self {
        Self { roles, permissions }
    }

    /// Resolve the user's effective permissions.
    ///
    /// Resolution order:
    /// 1. Role lookup; no assignment resolves to the empty set
    /// 2. Full-access roles get every capability without a table read
    /// 3. Otherwise the role's rows are indexed by feature key
    #[tracing::instrument(skip(self))]
    pub async fn resolve(&self, user_id: Uuid) -> Result<Resolution, ResolveError> {
        let Some(role) = self.roles.get_role(user_id).await? else {
            return Ok(Resolution {
                role: None,
                permissions: EffectivePermissionSet::empty(),
            });
        };

        let permissions = match role {
            Role::Full(_) => EffectivePermissionSet::full_access(),
            Role::Scoped(scoped) => {
                let rows = self.permissions.get_permissions(scoped).await?;
                EffectivePermissionSet::from_rows(&rows)
            }
        };

        Ok(Resolution {
            role: Some(role),
            permissions,
        })
    }

    /// Resolve, folding any failure into [`Outcome::Failed`].
    pub async fn resolve_or_deny(&self, user_id: Uuid) -> Outcome {
        match self.resolve(user_id).await {
            Ok(resolution) => Outcome::Resolved(resolution),
            Err(e) => {
                warn!(%user_id, error = %e, "Permission resolution failed; denying all features");
                Outcome::Failed
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use grc_common::{Capability, FeatureKey, FeaturePermission, RolePermission, ScopedRole};

    use super::*;

    struct FixedRole(Result<Option<Role>, ()>);

    impl RoleStore for FixedRole {
        async fn get_role(&self, _user_id: Uuid) -> Result<Option<Role>, StoreError> {
            self.0
                .map_err(|()| StoreError::Unavailable("role store down".to_string()))
        }
    }

    #[derive(Default)]
    struct Rows {
        rows: Vec<RolePermission>,
        fail: bool,
        reads: AtomicUsize,
    }

    impl PermissionStore for Rows {
        async fn get_permissions(&self, role: ScopedRole) -> Result<Vec<RolePermission>, StoreError> {
            self.reads.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(StoreError::Unavailable("permission store down".to_string()));
            }
            Ok(self.rows.iter().filter(|r| r.role == role).cloned().collect())
        }
    }

    fn row(role: ScopedRole, feature: FeatureKey, permission: FeaturePermission) -> RolePermission {
        RolePermission {
            id: Uuid::new_v4(),
            role,
            feature,
            permission,
        }
    }

    #[tokio::test]
    async fn test_unassigned_user_resolves_empty() {
        let resolver = PermissionResolver::new(FixedRole(Ok(None)), Rows::default());
        let resolution = resolver.resolve(Uuid::new_v4()).await.unwrap();

        assert_eq!(resolution.role, None);
        assert!(resolution.permissions.is_empty());
        assert_eq!(resolver.permissions.reads.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_full_access_skips_table() {
        let rows = Rows {
            rows: vec![],
            fail: true,
            reads: AtomicUsize::new(0),
        };
        let resolver = PermissionResolver::new(FixedRole(Ok(Some(Role::SUPER_ADMIN))), rows);

        let resolution = resolver.resolve(Uuid::new_v4()).await.unwrap();
        assert_eq!(resolution.permissions, EffectivePermissionSet::full_access());
        assert_eq!(resolver.permissions.reads.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_scoped_role_reads_its_rows() {
        let rows = Rows {
            rows: vec![
                row(
                    ScopedRole::EhsOfficer,
                    FeatureKey::Incidents,
                    FeaturePermission::ALL,
                ),
                row(
                    ScopedRole::SiteManager,
                    FeatureKey::Risks,
                    FeaturePermission::NONE.with(Capability::View, true),
                ),
            ],
            ..Rows::default()
        };
        let resolver = PermissionResolver::new(
            FixedRole(Ok(Some(Role::Scoped(ScopedRole::SiteManager)))),
            rows,
        );

        let set = resolver.resolve(Uuid::new_v4()).await.unwrap().permissions;
        assert!(set.can_view(FeatureKey::Risks));
        assert!(!set.can_view(FeatureKey::Incidents));
    }

    #[tokio::test]
    async fn test_role_lookup_failure() {
        let resolver = PermissionResolver::new(FixedRole(Err(())), Rows::default());
        let result = resolver.resolve(Uuid::new_v4()).await;
        assert!(matches!(result, Err(ResolveError::ResolutionFailed(_))));
        assert_eq!(resolver.permissions.reads.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_table_failure_denies() {
        let rows = Rows {
            fail: true,
            ..Rows::default()
        };
        let resolver =
            PermissionResolver::new(FixedRole(Ok(Some(Role::Scoped(ScopedRole::RdManager)))), rows);

        let outcome = resolver.resolve_or_deny(Uuid::new_v4()).await;
        assert_eq!(outcome, Outcome::Failed);

        let gate = outcome.into_gate();
        for feature in FeatureKey::all() {
            assert!(!gate.can(*feature, Capability::View));
        }
    }
}
