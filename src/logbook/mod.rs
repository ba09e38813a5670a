//! Persistent workout logbook backed by `SQLite`.

mod error;
mod schema;
mod store;

pub use error::*;
pub use schema::*;
pub use store::*;
