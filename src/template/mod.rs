//! Workout template loading and validation.

mod loader;

pub use loader::*;
