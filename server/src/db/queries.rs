//! Database Queries

use sqlx::PgPool;
use uuid::Uuid;

use super::models::{Account, NewOrganization, NewProfile, Organization, Profile};

// ============================================================================
// Organization Queries
// ============================================================================

/// Find an organization by its unique name.
pub async fn find_organization_by_name(
    pool: &PgPool,
    name: &str,
) -> sqlx::Result<Option<Organization>> {
    sqlx::query_as::<_, Organization>(
        r"
        SELECT id, name, organization_type, region, country, description, created_at
        FROM organizations
        WHERE name = $1
        ",
    )
    .bind(name)
    .fetch_optional(pool)
    .await
}

/// Create an organization.
pub async fn create_organization(
    pool: &PgPool,
    org: &NewOrganization<'_>,
) -> sqlx::Result<Organization> {
    sqlx::query_as::<_, Organization>(
        r"
        INSERT INTO organizations (name, organization_type, region, country, description)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id, name, organization_type, region, country, description, created_at
        ",
    )
    .bind(org.name)
    .bind(org.organization_type)
    .bind(org.region)
    .bind(org.country)
    .bind(org.description)
    .fetch_one(pool)
    .await
}

// ============================================================================
// Account Queries
// ============================================================================

/// Create a login account with a confirmed email.
///
/// `password_hash` is `None` for invited users who set a password later.
pub async fn create_account(
    pool: &PgPool,
    email: &str,
    password_hash: Option<&str>,
) -> sqlx::Result<Account> {
    sqlx::query_as::<_, Account>(
        r"
        INSERT INTO users (email, password_hash, email_confirmed)
        VALUES ($1, $2, TRUE)
        RETURNING id, email, password_hash, email_confirmed, created_at
        ",
    )
    .bind(email)
    .bind(password_hash)
    .fetch_one(pool)
    .await
}

// ============================================================================
// Profile Queries
// ============================================================================

/// Insert a profile or overwrite the existing one for the account.
pub async fn upsert_profile(
    pool: &PgPool,
    user_id: Uuid,
    profile: &NewProfile<'_>,
) -> sqlx::Result<Profile> {
    sqlx::query_as::<_, Profile>(
        r"
        INSERT INTO profiles (id, email, first_name, last_name, organization_id, department, job_title)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        ON CONFLICT (id) DO UPDATE
        SET email = EXCLUDED.email,
            first_name = EXCLUDED.first_name,
            last_name = EXCLUDED.last_name,
            organization_id = EXCLUDED.organization_id,
            department = EXCLUDED.department,
            job_title = EXCLUDED.job_title,
            updated_at = NOW()
        RETURNING id, email, first_name, last_name, organization_id, department, job_title, created_at, updated_at
        ",
    )
    .bind(user_id)
    .bind(profile.email)
    .bind(profile.first_name)
    .bind(profile.last_name)
    .bind(profile.organization_id)
    .bind(profile.department)
    .bind(profile.job_title)
    .fetch_one(pool)
    .await
}

/// Get a user's profile.
pub async fn find_profile(pool: &PgPool, user_id: Uuid) -> sqlx::Result<Option<Profile>> {
    sqlx::query_as::<_, Profile>(
        r"
        SELECT id, email, first_name, last_name, organization_id, department, job_title, created_at, updated_at
        FROM profiles
        WHERE id = $1
        ",
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await
}
