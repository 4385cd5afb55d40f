//! Shared domain types.

pub mod feature;
pub mod navigation;
pub mod permission;
pub mod role;

pub use feature::{Capability, FeatureKey};
pub use navigation::{
    filter_navigation, find_by_href, Dashboard, NavItem, AUDIT_MANAGER_NAV, NAV_ITEMS,
};
pub use permission::{EffectivePermissionSet, FeaturePermission, RolePermission};
pub use role::{FullAccessRole, Role, ScopedRole};
