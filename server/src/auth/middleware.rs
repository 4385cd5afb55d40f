//! Authentication Middleware

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts},
    middleware::Next,
    response::Response,
};
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::api::AppState;

use super::error::AuthError;
use super::jwt::{validate_access_token, Claims};

/// Authenticated user injected into request extensions.
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// User ID.
    pub id: Uuid,
    /// Login session; cached permissions are keyed by it.
    pub session_id: Uuid,
    /// Email (if the token carries one).
    pub email: Option<String>,
    /// Token expiry; the session's cached permissions are evicted after it.
    pub expires_at: DateTime<Utc>,
}

impl TryFrom<Claims> for AuthUser {
    type Error = AuthError;

    fn try_from(claims: Claims) -> Result<Self, Self::Error> {
        Ok(Self {
            id: claims.user_id()?,
            session_id: claims.session_id()?,
            expires_at: DateTime::from_timestamp(claims.exp, 0).ok_or(AuthError::InvalidToken)?,
            email: claims.email,
        })
    }
}

/// Middleware to require authentication.
///
/// Extracts the Bearer token from the Authorization header, validates it
/// and injects `AuthUser` into request extensions.
///
/// ```ignore
/// Router::new()
///     .route("/protected", get(handler))
///     .layer(axum::middleware::from_fn_with_state(state, require_auth))
/// ```
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let auth_header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or(AuthError::MissingAuthHeader)?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or(AuthError::InvalidAuthHeader)?;

    let claims = validate_access_token(token, &state.config.auth_jwt_secret)?;
    let auth_user = AuthUser::try_from(claims)?;

    request.extensions_mut().insert(auth_user);

    Ok(next.run(request).await)
}

/// Extractor for the authenticated user in handlers behind `require_auth`.
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Self>()
            .cloned()
            .ok_or(AuthError::MissingAuthHeader)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claims(exp: i64) -> Claims {
        Claims {
            sub: Uuid::new_v4().to_string(),
            exp,
            session_id: Uuid::new_v4().to_string(),
            email: None,
        }
    }

    #[test]
    fn test_auth_user_carries_token_expiry() {
        let user = AuthUser::try_from(claims(1_900_000_000)).unwrap();
        assert_eq!(user.expires_at.timestamp(), 1_900_000_000);
    }

    #[test]
    fn test_out_of_range_expiry_rejected() {
        assert!(matches!(
            AuthUser::try_from(claims(i64::MAX)),
            Err(AuthError::InvalidToken)
        ));
    }
}
