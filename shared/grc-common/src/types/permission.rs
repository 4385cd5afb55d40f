//! Feature permissions and the resolved per-user permission set.

use std::collections::BTreeMap;

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use uuid::Uuid;

use super::feature::{Capability, FeatureKey};
use super::role::ScopedRole;

/// The four capability flags a role holds on one feature.
///
/// Storage may hold create/update/delete without view. Such a record is
/// never honoured as-is: [`FeaturePermission::allows`] requires `can_view`
/// for every other capability.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FeaturePermission {
    pub can_view: bool,
    pub can_create: bool,
    pub can_update: bool,
    pub can_delete: bool,
}

impl FeaturePermission {
    pub const NONE: Self = Self {
        can_view: false,
        can_create: false,
        can_update: false,
        can_delete: false,
    };

    pub const ALL: Self = Self {
        can_view: true,
        can_create: true,
        can_update: true,
        can_delete: true,
    };

    /// Raw stored flag for a capability.
    #[must_use]
    pub const fn get(&self, capability: Capability) -> bool {
        match capability {
            Capability::View => self.can_view,
            Capability::Create => self.can_create,
            Capability::Update => self.can_update,
            Capability::Delete => self.can_delete,
        }
    }

    /// Copy with a single flag changed.
    #[must_use]
    pub const fn with(mut self, capability: Capability, value: bool) -> Self {
        match capability {
            Capability::View => self.can_view = value,
            Capability::Create => self.can_create = value,
            Capability::Update => self.can_update = value,
            Capability::Delete => self.can_delete = value,
        }
        self
    }

    /// Whether the capability may be exercised.
    #[must_use]
    pub const fn allows(&self, capability: Capability) -> bool {
        match capability {
            Capability::View => self.can_view,
            _ => self.can_view && self.get(capability),
        }
    }

    /// Flags as they may be exercised (create/update/delete cleared without view).
    #[must_use]
    pub const fn sanitized(self) -> Self {
        if self.can_view {
            self
        } else {
            Self::NONE
        }
    }

    /// True when a write capability is set while view is not.
    #[must_use]
    pub const fn violates_view_invariant(&self) -> bool {
        !self.can_view && (self.can_create || self.can_update || self.can_delete)
    }
}

/// One row of the role permission table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RolePermission {
    pub id: Uuid,
    pub role: ScopedRole,
    pub feature: FeatureKey,
    #[serde(flatten)]
    pub permission: FeaturePermission,
}

/// Resolved feature → capability mapping for one user's role.
///
/// Features without an entry hold no capabilities.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct EffectivePermissionSet {
    entries: BTreeMap<FeatureKey, FeaturePermission>,
}

impl EffectivePermissionSet {
    /// A set granting nothing.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// A set granting every capability on every feature.
    #[must_use]
    pub fn full_access() -> Self {
        FeatureKey::all()
            .iter()
            .map(|feature| (*feature, FeaturePermission::ALL))
            .collect()
    }

    /// Index stored rows by feature key. A later row for the same key wins.
    pub fn from_rows<'a>(rows: impl IntoIterator<Item = &'a RolePermission>) -> Self {
        rows.into_iter()
            .map(|row| (row.feature, row.permission))
            .collect()
    }

    /// Stored flags for a feature, all-false when absent.
    #[must_use]
    pub fn get(&self, feature: FeatureKey) -> FeaturePermission {
        self.entries.get(&feature).copied().unwrap_or_default()
    }

    #[must_use]
    pub fn allows(&self, feature: FeatureKey, capability: Capability) -> bool {
        self.get(feature).allows(capability)
    }

    /// Like [`Self::allows`] for an untyped key; unknown keys grant nothing.
    #[must_use]
    pub fn allows_key(&self, feature: &str, capability: Capability) -> bool {
        feature
            .parse::<FeatureKey>()
            .is_ok_and(|feature| self.allows(feature, capability))
    }

    #[must_use]
    pub fn can_view(&self, feature: FeatureKey) -> bool {
        self.allows(feature, Capability::View)
    }

    #[must_use]
    pub fn can_create(&self, feature: FeatureKey) -> bool {
        self.allows(feature, Capability::Create)
    }

    #[must_use]
    pub fn can_update(&self, feature: FeatureKey) -> bool {
        self.allows(feature, Capability::Update)
    }

    #[must_use]
    pub fn can_delete(&self, feature: FeatureKey) -> bool {
        self.allows(feature, Capability::Delete)
    }

    /// True when no feature grants any exercisable capability.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.values().all(|perm| !perm.can_view)
    }

    /// Features that hold at least view, in matrix order.
    pub fn visible_features(&self) -> impl Iterator<Item = FeatureKey> + '_ {
        FeatureKey::all()
            .iter()
            .copied()
            .filter(|feature| self.can_view(*feature))
    }
}

impl FromIterator<(FeatureKey, FeaturePermission)> for EffectivePermissionSet {
    fn from_iter<T: IntoIterator<Item = (FeatureKey, FeaturePermission)>>(iter: T) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl Serialize for EffectivePermissionSet {
    /// Every feature key is emitted, with flags as they may be exercised.
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let features = FeatureKey::all();
        let mut map = serializer.serialize_map(Some(features.len()))?;
        for feature in features {
            map.serialize_entry(feature, &self.get(*feature).sanitized())?;
        }
        map.end()
    }
}
