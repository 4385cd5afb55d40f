//! Permission gate.
//!
//! Every surface that offers a create/update/delete affordance or lists a
//! feature in navigation asks the gate first. The gate is a read-only view
//! over an already resolved [`EffectivePermissionSet`].

use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;

use crate::types::{
    filter_navigation, find_by_href, Capability, Dashboard, EffectivePermissionSet, FeatureKey,
    NavItem, Role,
};

/// Gate check failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GateError {
    /// The resolved permissions do not grant the capability.
    #[error("Missing {capability} permission on {feature}")]
    Forbidden {
        feature: FeatureKey,
        capability: Capability,
    },
}

/// Write affordances to render for a feature.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ActionSet {
    pub create: bool,
    pub update: bool,
    pub delete: bool,
}

/// Capability checks for one resolved user.
#[derive(Debug, Clone)]
pub struct PermissionGate {
    role: Option<Role>,
    permissions: Arc<EffectivePermissionSet>,
}

impl PermissionGate {
    #[must_use]
    pub const fn new(role: Option<Role>, permissions: Arc<EffectivePermissionSet>) -> Self {
        Self { role, permissions }
    }

    /// Gate that grants nothing. Used whenever resolution did not succeed.
    #[must_use]
    pub fn denied() -> Self {
        Self::new(None, Arc::new(EffectivePermissionSet::empty()))
    }

    #[must_use]
    pub const fn role(&self) -> Option<Role> {
        self.role
    }

    #[must_use]
    pub const fn permissions(&self) -> &Arc<EffectivePermissionSet> {
        &self.permissions
    }

    #[must_use]
    pub fn can(&self, feature: FeatureKey, capability: Capability) -> bool {
        self.permissions.allows(feature, capability)
    }

    pub fn require(&self, feature: FeatureKey, capability: Capability) -> Result<(), GateError> {
        if self.can(feature, capability) {
            Ok(())
        } else {
            Err(GateError::Forbidden {
                feature,
                capability,
            })
        }
    }

    #[must_use]
    pub fn actions(&self, feature: FeatureKey) -> ActionSet {
        ActionSet {
            create: self.can(feature, Capability::Create),
            update: self.can(feature, Capability::Update),
            delete: self.can(feature, Capability::Delete),
        }
    }

    /// Navigation entries this user may see.
    #[must_use]
    pub fn navigation(&self) -> Vec<&'static NavItem> {
        filter_navigation(self.role, &self.permissions)
    }

    #[must_use]
    pub const fn dashboard(&self) -> Dashboard {
        Dashboard::for_role(self.role)
    }

    /// A route is reachable iff its navigation entry is shown.
    #[must_use]
    pub fn can_access_route(&self, href: &str) -> bool {
        find_by_href(href).is_some_and(|item| self.navigation().contains(&item))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{FeaturePermission, ScopedRole};

    fn site_manager_gate() -> PermissionGate {
        let set: EffectivePermissionSet = [(
            FeatureKey::Incidents,
            FeaturePermission {
                can_view: true,
                can_create: true,
                can_update: false,
                can_delete: false,
            },
        )]
        .into_iter()
        .collect();
        PermissionGate::new(Some(Role::Scoped(ScopedRole::SiteManager)), Arc::new(set))
    }

    #[test]
    fn test_require_reports_missing_capability() {
        let gate = site_manager_gate();
        assert!(gate.require(FeatureKey::Incidents, Capability::Create).is_ok());
        assert_eq!(
            gate.require(FeatureKey::Incidents, Capability::Update),
            Err(GateError::Forbidden {
                feature: FeatureKey::Incidents,
                capability: Capability::Update,
            })
        );
    }

    #[test]
    fn test_actions() {
        let gate = site_manager_gate();
        assert_eq!(
            gate.actions(FeatureKey::Incidents),
            ActionSet {
                create: true,
                update: false,
                delete: false
            }
        );
        assert_eq!(gate.actions(FeatureKey::Users), ActionSet::default());
    }

    #[test]
    fn test_denied_gate() {
        let gate = PermissionGate::denied();
        assert!(gate.role().is_none());
        for feature in FeatureKey::all() {
            assert!(!gate.can(*feature, Capability::View));
        }
        assert_eq!(gate.navigation().len(), 1);
        assert_eq!(gate.dashboard(), Dashboard::Default);
    }

    #[test]
    fn test_route_access_follows_navigation() {
        let gate = site_manager_gate();
        assert!(gate.can_access_route("/"));
        assert!(gate.can_access_route("/incidents"));
        assert!(!gate.can_access_route("/users"));
        assert!(!gate.can_access_route("/unknown"));

        let auditor = PermissionGate::new(
            Some(Role::AUDIT_MANAGER),
            Arc::new(EffectivePermissionSet::full_access()),
        );
        assert!(auditor.can_access_route("/audit"));
        assert!(!auditor.can_access_route("/chemicals"));
    }

    #[test]
    fn test_error_display() {
        let err = GateError::Forbidden {
            feature: FeatureKey::Users,
            capability: Capability::Delete,
        };
        assert_eq!(err.to_string(), "Missing delete permission on users");
    }
}
