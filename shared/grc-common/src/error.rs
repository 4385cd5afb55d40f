//! Common Error Types

use thiserror::Error;

/// Errors raised while parsing identifiers that cross the wire or the
/// database boundary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Role identifier is not part of the closed role set.
    #[error("Unknown role: {0}")]
    UnknownRole(String),

    /// Feature key is not part of the closed feature set.
    #[error("Unknown feature: {0}")]
    UnknownFeature(String),

    /// Capability name is not one of view/create/update/delete.
    #[error("Unknown capability: {0}")]
    UnknownCapability(String),
}

/// Result alias for common parsing operations.
pub type Result<T> = std::result::Result<T, Error>;
