//! Application shell navigation.
//!
//! Two independent filters apply:
//! - `audit_manager` sees a fixed allow-list, whatever its table rows say
//! - every other role sees the entries whose feature it can view
//!
//! The landing dashboard is picked from the role alone.

use serde::Serialize;

use super::feature::FeatureKey;
use super::permission::EffectivePermissionSet;
use super::role::{FullAccessRole, Role, ScopedRole};

/// A sidebar navigation entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NavItem {
    pub name: &'static str,
    pub href: &'static str,
    /// Feature gating this entry; `None` is always shown.
    pub feature: Option<FeatureKey>,
}

impl NavItem {
    const fn new(name: &'static str, href: &'static str, feature: Option<FeatureKey>) -> Self {
        Self {
            name,
            href,
            feature,
        }
    }
}

/// Navigation entries in display order.
pub const NAV_ITEMS: &[NavItem] = &[
    NavItem::new("Dashboard", "/", None),
    NavItem::new("Risk Management", "/risk", Some(FeatureKey::Risks)),
    NavItem::new("Compliance", "/compliance", Some(FeatureKey::Compliance)),
    NavItem::new("Audit", "/audit", Some(FeatureKey::Audits)),
    NavItem::new("Litigation", "/litigation", Some(FeatureKey::Litigation)),
    NavItem::new("Policy", "/policy", Some(FeatureKey::Policies)),
    NavItem::new("Incidents", "/incidents", Some(FeatureKey::Incidents)),
    NavItem::new("Analytics", "/analytics", Some(FeatureKey::Analytics)),
    NavItem::new("Chemicals", "/chemicals", Some(FeatureKey::Chemicals)),
    NavItem::new("Environmental", "/environmental", Some(FeatureKey::Environmental)),
    NavItem::new("Products", "/products", Some(FeatureKey::Products)),
    NavItem::new("Organizations", "/organizations", Some(FeatureKey::Organizations)),
    NavItem::new("Users", "/users", Some(FeatureKey::Users)),
];

/// Entry names shown to `audit_manager`.
// Open with product whether this belongs in role_permissions rows instead.
pub const AUDIT_MANAGER_NAV: &[&str] = &["Dashboard", "Risk Management", "Compliance", "Audit"];

/// Filter [`NAV_ITEMS`] for a role and its resolved permissions.
pub fn filter_navigation(
    role: Option<Role>,
    permissions: &EffectivePermissionSet,
) -> Vec<&'static NavItem> {
    if role == Some(Role::AUDIT_MANAGER) {
        return NAV_ITEMS
            .iter()
            .filter(|item| AUDIT_MANAGER_NAV.contains(&item.name))
            .collect();
    }

    NAV_ITEMS
        .iter()
        .filter(|item| item.feature.is_none_or(|feature| permissions.can_view(feature)))
        .collect()
}

/// Landing dashboard variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Dashboard {
    Admin,
    Director,
    Compliance,
    Chemical,
    SiteManager,
    Auditor,
    /// Roles without a dedicated dashboard, and unassigned users.
    Default,
}

impl Dashboard {
    #[must_use]
    pub const fn for_role(role: Option<Role>) -> Self {
        match role {
            Some(Role::Full(FullAccessRole::SuperAdmin)) => Self::Admin,
            Some(Role::Full(FullAccessRole::GlobalGrcDirector)) => Self::Director,
            Some(Role::Scoped(ScopedRole::EnvironmentalComplianceOfficer)) => Self::Compliance,
            Some(Role::Scoped(ScopedRole::ChemicalSafetySpecialist)) => Self::Chemical,
            Some(Role::Scoped(ScopedRole::SiteManager)) => Self::SiteManager,
            Some(Role::Scoped(ScopedRole::AuditManager)) => Self::Auditor,
            _ => Self::Default,
        }
    }
}

/// Look up the entry for a route path.
pub fn find_by_href(href: &str) -> Option<&'static NavItem> {
    NAV_ITEMS.iter().find(|item| item.href == href)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::feature::Capability;
    use crate::types::permission::FeaturePermission;

    #[test]
    fn test_dashboard_follows_role() {
        assert_eq!(Dashboard::for_role(Some(Role::SUPER_ADMIN)), Dashboard::Admin);
        assert_eq!(Dashboard::for_role(Some(Role::GLOBAL_GRC_DIRECTOR)), Dashboard::Director);
        assert_eq!(Dashboard::for_role(Some(Role::AUDIT_MANAGER)), Dashboard::Auditor);
        assert_eq!(
            Dashboard::for_role(Some(Role::Scoped(ScopedRole::SiteManager))),
            Dashboard::SiteManager
        );
        assert_eq!(
            Dashboard::for_role(Some(Role::Scoped(ScopedRole::ExternalAuditor))),
            Dashboard::Default
        );
        assert_eq!(Dashboard::for_role(None), Dashboard::Default);
    }
    use crate::types::role::ScopedRole;

    fn names(items: &[&NavItem]) -> Vec<&'static str> {
        items.iter().map(|item| item.name).collect()
    }

    #[test]
    fn test_every_feature_entry_is_unique() {
        let mut hrefs: Vec<_> = NAV_ITEMS.iter().map(|i| i.href).collect();
        hrefs.sort_unstable();
        hrefs.dedup();
        assert_eq!(hrefs.len(), NAV_ITEMS.len());
    }

    #[test]
    fn test_full_access_sees_everything() {
        let nav = filter_navigation(Some(Role::SUPER_ADMIN), &EffectivePermissionSet::full_access());
        assert_eq!(nav.len(), NAV_ITEMS.len());
    }

    #[test]
    fn test_audit_manager_allow_list_ignores_table() {
        let nav = filter_navigation(
            Some(Role::AUDIT_MANAGER),
            &EffectivePermissionSet::full_access(),
        );
        assert_eq!(
            names(&nav),
            vec!["Dashboard", "Risk Management", "Compliance", "Audit"]
        );
    }

    #[test]
    fn test_audit_manager_allow_list_with_empty_table() {
        let nav = filter_navigation(Some(Role::AUDIT_MANAGER), &EffectivePermissionSet::empty());
        assert_eq!(nav.len(), 4);
    }

    #[test]
    fn test_table_driven_filtering() {
        let set: EffectivePermissionSet = [
            (
                FeatureKey::Incidents,
                FeaturePermission::NONE.with(Capability::View, true),
            ),
            (
                FeatureKey::Chemicals,
                FeaturePermission::NONE.with(Capability::Create, true),
            ),
        ]
        .into_iter()
        .collect();

        let nav = filter_navigation(Some(Role::Scoped(ScopedRole::SiteManager)), &set);
        assert_eq!(names(&nav), vec!["Dashboard", "Incidents"]);
    }

    #[test]
    fn test_unassigned_sees_only_dashboard() {
        let nav = filter_navigation(None, &EffectivePermissionSet::empty());
        assert_eq!(names(&nav), vec!["Dashboard"]);
    }

    #[test]
    fn test_find_by_href() {
        assert_eq!(find_by_href("/audit").map(|i| i.name), Some("Audit"));
        assert!(find_by_href("/settings").is_none());
    }
}
