//! drishti-pilot: Task orchestration for the drishti pipeline
//!
//! Spawns one task per perception source over the shared frame bus, runs
//! the flag combinator and announcement paths, and owns coordinated
//! shutdown: a one-shot run latch is the sole cancellation signal, every
//! loop checks it each iteration, and resources are released exactly once
//! after all tasks have observably stopped.

pub mod config;
pub mod error;
pub mod flags;
pub mod latch;
pub mod orchestrator;
mod tasks;

pub use config::PilotConfig;
pub use error::PilotError;
pub use flags::{FlagCombinator, FlagEvent};
pub use latch::RunLatch;
pub use orchestrator::{Peripherals, Pilot, PilotState};
