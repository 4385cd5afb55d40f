//! User provisioning: invitations and demo-user seeding.
//!
//! Each user is created in three sequential writes (account, profile,
//! role). There is no transaction spanning them: a failure part-way leaves
//! the earlier writes in place and is reported with the stages that
//! completed, so an operator can finish or clean up by hand.

use std::fmt;
use std::future::Future;

use argon2::{
    password_hash::{PasswordHasher, SaltString},
    Argon2,
};
use grc_common::{Role, ScopedRole};
use rand::rngs::OsRng;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use thiserror::Error;
use tracing::{error, info, warn};
use uuid::Uuid;
use validator::Validate;

use crate::db::{self, NewOrganization, NewProfile};
use crate::permissions::{queries::insert_user_role, StoreError};

/// One write of a provisioning run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProvisioningStage {
    Account,
    Profile,
    Role,
}

impl fmt::Display for ProvisioningStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Account => "account",
            Self::Profile => "profile",
            Self::Role => "role",
        })
    }
}

/// A provisioning run stopped part-way.
#[derive(Debug, Error)]
#[error("Provisioning failed at {stage} stage: {message}")]
pub struct ProvisioningError {
    pub stage: ProvisioningStage,
    pub completed_stages: Vec<ProvisioningStage>,
    /// Set once the account exists.
    pub user_id: Option<Uuid>,
    pub message: String,
}

impl ProvisioningError {
    fn at(
        stage: ProvisioningStage,
        completed_stages: &[ProvisioningStage],
        user_id: Option<Uuid>,
        error: &StoreError,
    ) -> Self {
        Self {
            stage,
            completed_stages: completed_stages.to_vec(),
            user_id,
            message: error.to_string(),
        }
    }
}

/// Writes needed to provision a user.
pub trait Provisioner: Send + Sync {
    /// Create a confirmed login account and return its id.
    fn create_account(
        &self,
        email: &str,
        password_hash: Option<&str>,
    ) -> impl Future<Output = Result<Uuid, StoreError>> + Send;

    /// Write the profile row for an account.
    fn write_profile(
        &self,
        user_id: Uuid,
        profile: &NewProfile<'_>,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;

    fn assign_role(
        &self,
        user_id: Uuid,
        role: Role,
        organization_id: Uuid,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;

    /// Look up an organization by name, creating it if missing.
    fn ensure_organization(
        &self,
        organization: &NewOrganization<'_>,
    ) -> impl Future<Output = Result<Uuid, StoreError>> + Send;
}

/// `PostgreSQL` provisioner.
#[derive(Debug, Clone)]
pub struct PgProvisioning {
    pool: PgPool,
}

impl PgProvisioning {
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl Provisioner for PgProvisioning {
    async fn create_account(
        &self,
        email: &str,
        password_hash: Option<&str>,
    ) -> Result<Uuid, StoreError> {
        Ok(db::create_account(&self.pool, email, password_hash).await?.id)
    }

    async fn write_profile(
        &self,
        user_id: Uuid,
        profile: &NewProfile<'_>,
    ) -> Result<(), StoreError> {
        db::upsert_profile(&self.pool, user_id, profile).await?;
        Ok(())
    }

    async fn assign_role(
        &self,
        user_id: Uuid,
        role: Role,
        organization_id: Uuid,
    ) -> Result<(), StoreError> {
        insert_user_role(&self.pool, user_id, role, organization_id, None).await?;
        Ok(())
    }

    async fn ensure_organization(
        &self,
        organization: &NewOrganization<'_>,
    ) -> Result<Uuid, StoreError> {
        if let Some(existing) = db::find_organization_by_name(&self.pool, organization.name).await?
        {
            return Ok(existing.id);
        }
        Ok(db::create_organization(&self.pool, organization).await?.id)
    }
}

// ============================================================================
// Invitations
// ============================================================================

/// Invite request from the user management screen.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct InviteUserRequest {
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    #[validate(length(min = 2, message = "First name must be at least 2 characters"))]
    pub first_name: String,
    #[validate(length(min = 2, message = "Last name must be at least 2 characters"))]
    pub last_name: String,
    pub role: Role,
    pub organization_id: Uuid,
    pub department: Option<String>,
    pub job_title: Option<String>,
}

/// Create account, profile and role for an invited user.
///
/// The account has no password; the hosted auth service sends the invite.
#[tracing::instrument(skip(provisioner, invite), fields(email = %invite.email, role = %invite.role))]
pub async fn invite_user<P: Provisioner>(
    provisioner: &P,
    invite: &InviteUserRequest,
) -> Result<Uuid, ProvisioningError> {
    let mut completed = Vec::with_capacity(3);

    let user_id = provisioner
        .create_account(&invite.email, None)
        .await
        .map_err(|e| ProvisioningError::at(ProvisioningStage::Account, &completed, None, &e))?;
    completed.push(ProvisioningStage::Account);

    let profile = NewProfile {
        email: &invite.email,
        first_name: &invite.first_name,
        last_name: &invite.last_name,
        organization_id: Some(invite.organization_id),
        department: invite.department.as_deref(),
        job_title: invite.job_title.as_deref(),
    };
    provisioner
        .write_profile(user_id, &profile)
        .await
        .map_err(|e| {
            ProvisioningError::at(ProvisioningStage::Profile, &completed, Some(user_id), &e)
        })?;
    completed.push(ProvisioningStage::Profile);

    provisioner
        .assign_role(user_id, invite.role, invite.organization_id)
        .await
        .map_err(|e| ProvisioningError::at(ProvisioningStage::Role, &completed, Some(user_id), &e))?;

    info!(%user_id, "User invited");
    Ok(user_id)
}

// ============================================================================
// Demo Seeding
// ============================================================================

/// Built-in demo login.
#[derive(Debug, Clone, Copy)]
pub struct MockUser {
    pub email: &'static str,
    pub password: &'static str,
    pub first_name: &'static str,
    pub last_name: &'static str,
    pub role: Role,
    pub job_title: &'static str,
    pub department: &'static str,
}

pub const MOCK_USERS: [MockUser; 6] = [
    MockUser {
        email: "admin@akzonobel.com",
        password: "Admin@123456",
        first_name: "John",
        last_name: "Administrator",
        role: Role::SUPER_ADMIN,
        job_title: "System Administrator",
        department: "IT",
    },
    MockUser {
        email: "director@akzonobel.com",
        password: "Director@123456",
        first_name: "Sarah",
        last_name: "Johnson",
        role: Role::GLOBAL_GRC_DIRECTOR,
        job_title: "Global GRC Director",
        department: "GRC",
    },
    MockUser {
        email: "compliance@akzonobel.com",
        password: "Compliance@123456",
        first_name: "Michael",
        last_name: "Chen",
        role: Role::Scoped(ScopedRole::EnvironmentalComplianceOfficer),
        job_title: "Environmental Compliance Officer",
        department: "Environmental",
    },
    MockUser {
        email: "chemical@akzonobel.com",
        password: "Chemical@123456",
        first_name: "Emma",
        last_name: "Williams",
        role: Role::Scoped(ScopedRole::ChemicalSafetySpecialist),
        job_title: "Chemical Safety Specialist",
        department: "Safety",
    },
    MockUser {
        email: "sitemanager@akzonobel.com",
        password: "SiteManager@123456",
        first_name: "David",
        last_name: "Brown",
        role: Role::Scoped(ScopedRole::SiteManager),
        job_title: "Site Manager",
        department: "Operations",
    },
    MockUser {
        email: "auditor@akzonobel.com",
        password: "Auditor@123456",
        first_name: "Lisa",
        last_name: "Anderson",
        role: Role::AUDIT_MANAGER,
        job_title: "Senior Auditor",
        department: "Audit",
    },
];

/// Per-user outcome of a seeding run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SeedStatus {
    Success,
    Error,
    ProfileError,
    RoleError,
}

#[derive(Debug, Clone, Serialize)]
pub struct SeedCredentials {
    pub email: &'static str,
    pub password: &'static str,
    pub role: Role,
}

#[derive(Debug, Clone, Serialize)]
pub struct SeedResult {
    pub email: &'static str,
    pub status: SeedStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credentials: Option<SeedCredentials>,
}

impl SeedResult {
    fn failed(user: &MockUser, status: SeedStatus, error: impl ToString) -> Self {
        Self {
            email: user.email,
            status,
            error: Some(error.to_string()),
            credentials: None,
        }
    }
}

fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    Ok(Argon2::default()
        .hash_password(password.as_bytes(), &salt)?
        .to_string())
}

/// Seed `users` into `organization_name`, creating the organization if needed.
///
/// A failure for one user is recorded in its result and never aborts the
/// batch. Only the organization lookup is fatal.
#[tracing::instrument(skip(provisioner, users))]
pub async fn seed_users<P: Provisioner>(
    provisioner: &P,
    organization_name: &str,
    users: &[MockUser],
) -> Result<Vec<SeedResult>, StoreError> {
    let organization_id = provisioner
        .ensure_organization(&NewOrganization {
            name: organization_name,
            organization_type: Some("parent"),
            region: Some("Global HQ"),
            country: Some("Netherlands"),
            description: Some("Global headquarters organization"),
        })
        .await?;

    let mut results = Vec::with_capacity(users.len());
    for user in users {
        results.push(seed_one(provisioner, organization_id, user).await);
    }

    let seeded = results
        .iter()
        .filter(|r| r.status == SeedStatus::Success)
        .count();
    info!(seeded, total = results.len(), "Mock users seeded");
    Ok(results)
}

async fn seed_one<P: Provisioner>(
    provisioner: &P,
    organization_id: Uuid,
    user: &MockUser,
) -> SeedResult {
    let password_hash = match hash_password(user.password) {
        Ok(hash) => hash,
        Err(e) => {
            error!(email = user.email, error = %e, "Failed to hash seed password");
            return SeedResult::failed(user, SeedStatus::Error, "Password processing failed");
        }
    };

    let user_id = match provisioner
        .create_account(user.email, Some(&password_hash))
        .await
    {
        Ok(id) => id,
        Err(e) => {
            warn!(email = user.email, error = %e, "Seed account not created");
            return SeedResult::failed(user, SeedStatus::Error, e);
        }
    };

    let profile = NewProfile {
        email: user.email,
        first_name: user.first_name,
        last_name: user.last_name,
        organization_id: Some(organization_id),
        department: Some(user.department),
        job_title: Some(user.job_title),
    };
    if let Err(e) = provisioner.write_profile(user_id, &profile).await {
        warn!(email = user.email, %user_id, error = %e, "Seed profile not written");
        return SeedResult::failed(user, SeedStatus::ProfileError, e);
    }

    if let Err(e) = provisioner
        .assign_role(user_id, user.role, organization_id)
        .await
    {
        warn!(email = user.email, %user_id, error = %e, "Seed role not assigned");
        return SeedResult::failed(user, SeedStatus::RoleError, e);
    }

    SeedResult {
        email: user.email,
        status: SeedStatus::Success,
        error: None,
        credentials: Some(SeedCredentials {
            email: user.email,
            password: user.password,
            role: user.role,
        }),
    }
}
