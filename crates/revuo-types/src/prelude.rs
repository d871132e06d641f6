//! Crate-wide prelude.

pub use crate::error::{Error, RvResult};
pub use crate::types::{Patch, Role, Timestamp};

pub use tracing::{debug, error, info, warn};

// vim: ts=4
