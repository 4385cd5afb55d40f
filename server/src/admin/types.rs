//! Admin module types.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use grc_common::{Role, ScopedRole};
use serde::Serialize;
use thiserror::Error;
use tracing::error;
use uuid::Uuid;

use super::matrix::{MatrixEditError, MatrixEntry};
use super::provisioning::{ProvisioningError, SeedResult};
use crate::permissions::StoreError;

/// Admin API error type.
#[derive(Debug, Error)]
pub enum AdminError {
    /// Validation error.
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Full-access roles have no editable permission rows.
    #[error("{0} has full access and no editable permissions")]
    FullAccessRole(Role),

    /// Rejected matrix edit.
    #[error(transparent)]
    MatrixEdit(#[from] MatrixEditError),

    /// A provisioning run stopped part-way.
    #[error(transparent)]
    Provisioning(#[from] ProvisioningError),

    /// Store error.
    #[error("Store error")]
    Store(#[from] StoreError),

    /// Database error.
    #[error("Database error")]
    Database(#[from] sqlx::Error),
}

impl IntoResponse for AdminError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            Self::Validation(msg) => (StatusCode::BAD_REQUEST, serde_json::json!({"error": "validation", "message": msg})),
            Self::FullAccessRole(role) => (StatusCode::BAD_REQUEST, serde_json::json!({"error": "full_access_role", "message": format!("{role} has full access and no editable permissions")})),
            Self::MatrixEdit(e) => (StatusCode::BAD_REQUEST, serde_json::json!({"error": "invalid_edit", "message": e.to_string()})),
            Self::Provisioning(e) => (
                StatusCode::BAD_REQUEST,
                serde_json::json!({
                    "error": e.message,
                    "stage": e.stage,
                    "completed_stages": e.completed_stages,
                    "user_id": e.user_id,
                }),
            ),
            Self::Store(e) => {
                error!(error = %e, "Admin request failed in store");
                (StatusCode::INTERNAL_SERVER_ERROR, serde_json::json!({"error": "store", "message": "Store error"}))
            }
            Self::Database(e) => {
                error!(error = %e, "Admin request failed in database");
                (StatusCode::INTERNAL_SERVER_ERROR, serde_json::json!({"error": "database", "message": "Database error"}))
            }
        };
        (status, Json(body)).into_response()
    }
}

// Response types
#[derive(Debug, Serialize)]
pub struct EditableRole {
    pub role: ScopedRole,
    pub label: String,
}

#[derive(Debug, Serialize)]
pub struct RoleMatrixResponse {
    pub role: ScopedRole,
    pub label: String,
    pub permissions: Vec<MatrixEntry>,
}

#[derive(Debug, Serialize)]
pub struct RoleAssignmentResponse {
    pub user_id: Uuid,
    pub role: Role,
    pub organization_id: Uuid,
    pub assigned_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct InviteResponse {
    pub success: bool,
    pub user_id: Uuid,
}

#[derive(Debug, Serialize)]
pub struct SeedResponse {
    pub success: bool,
    pub message: &'static str,
    pub results: Vec<SeedResult>,
}
