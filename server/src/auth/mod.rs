//! Authentication
//!
//! Sign-in and session management live in the hosted auth service. This
//! module only validates the bearer tokens it issues.

mod error;
pub mod jwt;
mod middleware;

pub use error::{AuthError, AuthResult, ErrorResponse};
pub use middleware::{require_auth, AuthUser};
