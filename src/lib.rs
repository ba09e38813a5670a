//! Workout Engine - guided workout session engine with real-time set tracking.

pub mod display;
pub mod engine;
pub mod error;
pub mod logbook;
pub mod model;
pub mod notify;
pub mod template;
