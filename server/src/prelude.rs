pub use crate::core::app::App;
pub use revuo::error::{Error, RvResult};
pub use revuo::extract::{Auth, AuthCtx, OptionalAuth};
pub use revuo::types::{Patch, Role, Timestamp};

pub use tracing::{debug, error, info, warn};

// vim: ts=4
