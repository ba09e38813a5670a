//! Session engine: state machine, sequencing, timing, and logging.

mod controller;
mod driver;
mod feedback;
mod logger;
mod progress;
mod sequencer;
mod timer;

pub use controller::*;
pub use driver::*;
pub use feedback::*;
pub use logger::*;
pub use progress::*;
pub use sequencer::*;
pub use timer::*;
