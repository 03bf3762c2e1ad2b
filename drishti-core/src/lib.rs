//! drishti-core: Shared data model for the drishti perception pipeline
//!
//! Holds the frame and depth-map types exchanged between the frame source,
//! the perception tasks, and the speech path, plus the workspace-wide error
//! taxonomy. This crate is deliberately free of async code.

pub mod error;
pub mod types;

pub use error::{Error, Result};
pub use types::{Advisory, DepthMap, Detection, Frame, HandObservation};
