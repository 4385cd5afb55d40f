//! GRC Platform Common Library
//!
//! Role, feature and permission types shared by the server and any
//! client that renders permission-gated surfaces.

pub mod error;
pub mod gate;
pub mod types;

pub use error::{Error, Result};
pub use gate::{ActionSet, GateError, PermissionGate};
pub use types::*;
