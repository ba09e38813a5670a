//! Domain types for workout sessions.

mod plan;
mod record;
mod session;

pub use plan::*;
pub use record::*;
pub use session::*;
