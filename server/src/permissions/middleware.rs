//! Permission-gate middleware and extractor.

use std::future::Future;
use std::pin::Pin;

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{request::Parts, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use grc_common::{Capability, FeatureKey, GateError, PermissionGate};
use thiserror::Error;
use tracing::debug;

use crate::api::AppState;
use crate::auth::AuthUser;

/// Permission check failure.
#[derive(Debug, Error)]
pub enum PermissionError {
    /// No authenticated user on the request.
    #[error("Authentication required")]
    Unauthenticated,

    /// The caller's resolved permissions do not grant the capability.
    #[error(transparent)]
    Forbidden(#[from] GateError),
}

impl IntoResponse for PermissionError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            Self::Unauthenticated => (
                StatusCode::UNAUTHORIZED,
                serde_json::json!({"error": "unauthenticated", "message": self.to_string()}),
            ),
            Self::Forbidden(GateError::Forbidden {
                feature,
                capability,
            }) => (
                StatusCode::FORBIDDEN,
                serde_json::json!({
                    "error": "forbidden",
                    "message": self.to_string(),
                    "feature": feature,
                    "capability": capability,
                }),
            ),
        };
        (status, Json(body)).into_response()
    }
}

/// Resolved gate of the current caller.
///
/// Reuses the gate a [`require_capability`] layer already inserted,
/// otherwise resolves it through the session cache.
///
/// ```ignore
/// async fn handler(Gate(gate): Gate) -> Json<ActionSet> {
///     Json(gate.actions(FeatureKey::Incidents))
/// }
/// ```
#[derive(Debug, Clone)]
pub struct Gate(pub PermissionGate);

impl FromRequestParts<AppState> for Gate {
    type Rejection = PermissionError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if let Some(gate) = parts.extensions.get::<PermissionGate>() {
            return Ok(Self(gate.clone()));
        }

        let auth = parts
            .extensions
            .get::<AuthUser>()
            .cloned()
            .ok_or(PermissionError::Unauthenticated)?;

        let gate = state
            .permissions
            .gate(auth.session_id, auth.id, auth.expires_at)
            .await;
        parts.extensions.insert(gate.clone());
        Ok(Self(gate))
    }
}

/// Middleware factory that requires `capability` on `feature`.
///
/// Must run inside `require_auth`. On success the caller's
/// [`PermissionGate`] is inserted into request extensions.
///
/// ```ignore
/// Router::new()
///     .route("/users/invite", post(invite_user))
///     .layer(from_fn_with_state(
///         state.clone(),
///         require_capability(FeatureKey::Users, Capability::Create),
///     ))
/// ```
pub fn require_capability(
    feature: FeatureKey,
    capability: Capability,
) -> impl Fn(State<AppState>, Request, Next) -> Pin<Box<dyn Future<Output = Response> + Send>>
       + Clone
       + Send
       + 'static {
    move |State(state): State<AppState>, mut request: Request, next: Next| {
        Box::pin(async move {
            let Some(auth) = request.extensions().get::<AuthUser>().cloned() else {
                return PermissionError::Unauthenticated.into_response();
            };

            let gate = state
            .permissions
            .gate(auth.session_id, auth.id, auth.expires_at)
            .await;
            if let Err(e) = gate.require(feature, capability) {
                debug!(user_id = %auth.id, %feature, %capability, "Capability check failed");
                return PermissionError::from(e).into_response();
            }

            request.extensions_mut().insert(gate);
            next.run(request).await
        })
    }
}
