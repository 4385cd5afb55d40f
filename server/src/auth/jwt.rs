//! JWT Access Token Validation
//!
//! Access tokens are issued by the hosted auth service and signed with a
//! shared HS256 secret. This service only validates them; `issue_access_token`
//! exists for local tooling and tests.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::error::{AuthError, AuthResult};

/// Access token claims.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID as UUID string).
    pub sub: String,
    /// Expiration time (Unix timestamp).
    pub exp: i64,
    /// Login session the token belongs to.
    pub session_id: String,
    /// Email of the signed-in user.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl Claims {
    pub fn user_id(&self) -> AuthResult<Uuid> {
        self.sub.parse().map_err(|_| AuthError::InvalidToken)
    }

    pub fn session_id(&self) -> AuthResult<Uuid> {
        self.session_id.parse().map_err(|_| AuthError::InvalidToken)
    }
}

/// Sign an access token.
pub fn issue_access_token(
    user_id: Uuid,
    session_id: Uuid,
    email: Option<&str>,
    secret: &str,
    expiry_seconds: i64,
) -> AuthResult<String> {
    let claims = Claims {
        sub: user_id.to_string(),
        exp: (Utc::now() + Duration::seconds(expiry_seconds)).timestamp(),
        session_id: session_id.to_string(),
        email: email.map(str::to_string),
    };

    Ok(encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )?)
}

/// Validate and decode an access token.
///
/// Returns an error if the signature does not match or the token has expired.
pub fn validate_access_token(token: &str, secret: &str) -> AuthResult<Claims> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = true;
    validation.validate_aud = false;
    validation.leeway = 0;

    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::TokenExpired,
        _ => AuthError::InvalidToken,
    })?;

    Ok(token_data.claims)
}
