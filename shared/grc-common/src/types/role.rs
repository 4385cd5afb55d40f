//! Role Types
//!
//! A user holds exactly one role. Two roles bypass the permission table
//! entirely; every other role is resolved through stored feature rows.
//! The split is expressed in the type: [`Role::Full`] carries a
//! [`FullAccessRole`], [`Role::Scoped`] carries a [`ScopedRole`], and the
//! permission table is only ever keyed by a `ScopedRole`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Roles that hold every capability on every feature without consulting
/// stored permission data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FullAccessRole {
    SuperAdmin,
    GlobalGrcDirector,
}

impl FullAccessRole {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SuperAdmin => "super_admin",
            Self::GlobalGrcDirector => "global_grc_director",
        }
    }

    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::SuperAdmin, Self::GlobalGrcDirector]
    }
}

impl fmt::Display for FullAccessRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Roles whose capabilities come from the role permission table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ScopedRole {
    RegionalGrcManager,
    EnvironmentalComplianceOfficer,
    ProductStewardshipManager,
    ChemicalSafetySpecialist,
    RegulatoryAffairsManager,
    SiteManager,
    PlantSafetyCoordinator,
    QualityAssuranceLead,
    EhsOfficer,
    ProductionSupervisor,
    OperatorTechnician,
    RdManager,
    FormulationChemist,
    AnalyticalChemist,
    ProductDeveloper,
    ExternalAuditor,
    EnvironmentalAuditor,
    SafetyAuditor,
    RegulatoryComplianceAuditor,
    AuditManager,
}

impl ScopedRole {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::RegionalGrcManager => "regional_grc_manager",
            Self::EnvironmentalComplianceOfficer => "environmental_compliance_officer",
            Self::ProductStewardshipManager => "product_stewardship_manager",
            Self::ChemicalSafetySpecialist => "chemical_safety_specialist",
            Self::RegulatoryAffairsManager => "regulatory_affairs_manager",
            Self::SiteManager => "site_manager",
            Self::PlantSafetyCoordinator => "plant_safety_coordinator",
            Self::QualityAssuranceLead => "quality_assurance_lead",
            Self::EhsOfficer => "ehs_officer",
            Self::ProductionSupervisor => "production_supervisor",
            Self::OperatorTechnician => "operator_technician",
            Self::RdManager => "rd_manager",
            Self::FormulationChemist => "formulation_chemist",
            Self::AnalyticalChemist => "analytical_chemist",
            Self::ProductDeveloper => "product_developer",
            Self::ExternalAuditor => "external_auditor",
            Self::EnvironmentalAuditor => "environmental_auditor",
            Self::SafetyAuditor => "safety_auditor",
            Self::RegulatoryComplianceAuditor => "regulatory_compliance_auditor",
            Self::AuditManager => "audit_manager",
        }
    }

    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::RegionalGrcManager,
            Self::EnvironmentalComplianceOfficer,
            Self::ProductStewardshipManager,
            Self::ChemicalSafetySpecialist,
            Self::RegulatoryAffairsManager,
            Self::SiteManager,
            Self::PlantSafetyCoordinator,
            Self::QualityAssuranceLead,
            Self::EhsOfficer,
            Self::ProductionSupervisor,
            Self::OperatorTechnician,
            Self::RdManager,
            Self::FormulationChemist,
            Self::AnalyticalChemist,
            Self::ProductDeveloper,
            Self::ExternalAuditor,
            Self::EnvironmentalAuditor,
            Self::SafetyAuditor,
            Self::RegulatoryComplianceAuditor,
            Self::AuditManager,
        ]
    }

    /// Roles whose permission matrix is exposed in the admin editor.
    #[must_use]
    pub const fn editable() -> &'static [Self] {
        &[
            Self::RegionalGrcManager,
            Self::EnvironmentalComplianceOfficer,
            Self::ChemicalSafetySpecialist,
            Self::SiteManager,
            Self::EhsOfficer,
            Self::ProductStewardshipManager,
        ]
    }

    #[must_use]
    pub fn is_editable(self) -> bool {
        Self::editable().contains(&self)
    }
}

impl FromStr for ScopedRole {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|role| role.as_str() == s)
            .ok_or_else(|| Error::UnknownRole(s.to_string()))
    }
}

impl TryFrom<String> for ScopedRole {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ScopedRole> for String {
    fn from(role: ScopedRole) -> Self {
        role.as_str().to_string()
    }
}

impl fmt::Display for ScopedRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A user's assigned role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Role {
    /// Implicit all-capabilities role; never looked up in the permission table.
    Full(FullAccessRole),
    /// Table-driven role.
    Scoped(ScopedRole),
}

impl Role {
    pub const SUPER_ADMIN: Self = Self::Full(FullAccessRole::SuperAdmin);
    pub const GLOBAL_GRC_DIRECTOR: Self = Self::Full(FullAccessRole::GlobalGrcDirector);
    pub const AUDIT_MANAGER: Self = Self::Scoped(ScopedRole::AuditManager);

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Full(role) => role.as_str(),
            Self::Scoped(role) => role.as_str(),
        }
    }

    #[must_use]
    pub const fn is_full_access(self) -> bool {
        matches!(self, Self::Full(_))
    }

    /// Every role, full-access roles first.
    pub fn all() -> impl Iterator<Item = Self> {
        FullAccessRole::all()
            .iter()
            .copied()
            .map(Self::Full)
            .chain(ScopedRole::all().iter().copied().map(Self::Scoped))
    }

    /// Upper-cased, space-separated title (e.g. `SITE MANAGER`).
    #[must_use]
    pub fn label(self) -> String {
        self.as_str().replace('_', " ").to_uppercase()
    }
}

impl FromStr for Role {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(full) = FullAccessRole::all().iter().find(|r| r.as_str() == s) {
            return Ok(Self::Full(*full));
        }
        s.parse().map(Self::Scoped)
    }
}

impl TryFrom<String> for Role {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Role> for String {
    fn from(role: Role) -> Self {
        role.as_str().to_string()
    }
}

impl From<ScopedRole> for Role {
    fn from(role: ScopedRole) -> Self {
        Self::Scoped(role)
    }
}

impl From<FullAccessRole> for Role {
    fn from(role: FullAccessRole) -> Self {
        Self::Full(role)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_identifiers_round_trip() {
        for role in Role::all() {
            let parsed: Role = role.as_str().parse().unwrap();
            assert_eq!(parsed, role);
        }
    }

    #[test]
    fn test_full_access_roles() {
        assert!("super_admin".parse::<Role>().unwrap().is_full_access());
        assert!("global_grc_director".parse::<Role>().unwrap().is_full_access());
        assert!(!"site_manager".parse::<Role>().unwrap().is_full_access());
        assert!(!Role::AUDIT_MANAGER.is_full_access());
    }

    #[test]
    fn test_full_access_roles_are_not_scoped() {
        assert!("super_admin".parse::<ScopedRole>().is_err());
        assert!("global_grc_director".parse::<ScopedRole>().is_err());
    }

    #[test]
    fn test_unknown_role_rejected() {
        let err = "janitor".parse::<Role>().unwrap_err();
        assert_eq!(err, Error::UnknownRole("janitor".to_string()));
    }

    #[test]
    fn test_role_count() {
        assert_eq!(Role::all().count(), 22);
    }

    #[test]
    fn test_role_label() {
        assert_eq!(
            Role::Scoped(ScopedRole::EnvironmentalComplianceOfficer).label(),
            "ENVIRONMENTAL COMPLIANCE OFFICER"
        );
    }

    #[test]
    fn test_editable_roles_exclude_audit_manager() {
        assert_eq!(ScopedRole::editable().len(), 6);
        assert!(!ScopedRole::AuditManager.is_editable());
        assert!(ScopedRole::SiteManager.is_editable());
    }

    #[test]
    fn test_role_serde_uses_identifier() {
        let json = serde_json::to_string(&Role::GLOBAL_GRC_DIRECTOR).unwrap();
        assert_eq!(json, "\"global_grc_director\"");

        let role: Role = serde_json::from_str("\"ehs_officer\"").unwrap();
        assert_eq!(role, Role::Scoped(ScopedRole::EhsOfficer));

        assert!(serde_json::from_str::<Role>("\"owner\"").is_err());
    }
}
