//! Database Models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Organization model.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Organization {
    pub id: Uuid,
    pub name: String,
    pub organization_type: Option<String>,
    pub region: Option<String>,
    pub country: Option<String>,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Login account. Credentials only; personal data lives in [`Profile`].
#[derive(Debug, Clone, FromRow)]
pub struct Account {
    pub id: Uuid,
    pub email: String,
    pub password_hash: Option<String>,
    pub email_confirmed: bool,
    pub created_at: DateTime<Utc>,
}

/// User profile model.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Profile {
    pub id: Uuid,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub organization_id: Option<Uuid>,
    pub department: Option<String>,
    pub job_title: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields written when creating or refreshing a profile.
#[derive(Debug, Clone, Default)]
pub struct NewProfile<'a> {
    pub email: &'a str,
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub organization_id: Option<Uuid>,
    pub department: Option<&'a str>,
    pub job_title: Option<&'a str>,
}

/// Fields for a new organization.
#[derive(Debug, Clone, Default)]
pub struct NewOrganization<'a> {
    pub name: &'a str,
    pub organization_type: Option<&'a str>,
    pub region: Option<&'a str>,
    pub country: Option<&'a str>,
    pub description: Option<&'a str>,
}
