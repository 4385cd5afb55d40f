//! Role-based access control.
//!
//! - `store`: role and permission lookups (`PostgreSQL` or in-memory)
//! - `resolver`: user → effective permission set, fail-closed
//! - `session`: per-session cache of resolved sets
//! - `middleware`: capability checks on routes

pub mod middleware;
pub mod models;
pub mod queries;
pub mod resolver;
pub mod session;
pub mod store;

pub use middleware::{require_capability, Gate, PermissionError};
pub use models::*;
pub use resolver::{Outcome, PermissionResolver, Resolution, ResolveError};
pub use session::{ResolutionState, SessionPermissions};
pub use store::{PermissionStore, PgStore, RoleStore, StoreError};

/// Session cache backed by the database.
pub type PgSessionPermissions = SessionPermissions<PgStore, PgStore>;
