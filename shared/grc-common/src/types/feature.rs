//! Feature keys and capabilities.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// A permission-gated area of the application.
///
/// The set is closed; the role permission table is keyed by these values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeatureKey {
    Audits,
    AuditLogs,
    AuditFindings,
    Risks,
    Compliance,
    Incidents,
    Policies,
    Litigation,
    Chemicals,
    Products,
    Environmental,
    Organizations,
    Users,
    Analytics,
}

impl FeatureKey {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Audits => "audits",
            Self::AuditLogs => "audit_logs",
            Self::AuditFindings => "audit_findings",
            Self::Risks => "risks",
            Self::Compliance => "compliance",
            Self::Incidents => "incidents",
            Self::Policies => "policies",
            Self::Litigation => "litigation",
            Self::Chemicals => "chemicals",
            Self::Products => "products",
            Self::Environmental => "environmental",
            Self::Organizations => "organizations",
            Self::Users => "users",
            Self::Analytics => "analytics",
        }
    }

    /// Display label used by the permission matrix.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Audits => "Audits",
            Self::AuditLogs => "Audit Logs",
            Self::AuditFindings => "Audit Findings",
            Self::Risks => "Risks",
            Self::Compliance => "Compliance",
            Self::Incidents => "Incidents",
            Self::Policies => "Policies",
            Self::Litigation => "Litigation",
            Self::Chemicals => "Chemicals",
            Self::Products => "Products",
            Self::Environmental => "Environmental",
            Self::Organizations => "Organizations",
            Self::Users => "Users",
            Self::Analytics => "Analytics",
        }
    }

    /// All feature keys in matrix order.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Audits,
            Self::AuditLogs,
            Self::AuditFindings,
            Self::Risks,
            Self::Compliance,
            Self::Incidents,
            Self::Policies,
            Self::Litigation,
            Self::Chemicals,
            Self::Products,
            Self::Environmental,
            Self::Organizations,
            Self::Users,
            Self::Analytics,
        ]
    }
}

impl FromStr for FeatureKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|f| f.as_str() == s)
            .ok_or_else(|| Error::UnknownFeature(s.to_string()))
    }
}

impl fmt::Display for FeatureKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One of the four independent capabilities a role may hold on a feature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    View,
    Create,
    Update,
    Delete,
}

impl Capability {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::View => "view",
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
        }
    }

    /// Column name in the role permission table.
    #[must_use]
    pub const fn column(self) -> &'static str {
        match self {
            Self::View => "can_view",
            Self::Create => "can_create",
            Self::Update => "can_update",
            Self::Delete => "can_delete",
        }
    }

    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::View, Self::Create, Self::Update, Self::Delete]
    }
}

impl FromStr for Capability {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|c| c.as_str() == s || c.column() == s)
            .ok_or_else(|| Error::UnknownCapability(s.to_string()))
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
