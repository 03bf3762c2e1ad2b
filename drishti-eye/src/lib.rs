//! drishti-eye: Vision interface for the drishti pipeline
//!
//! Owns the single-slot frame bus that fans the latest camera frame out to
//! the perception tasks, the provider interfaces behind which all model
//! inference lives, and the depth sectioning logic that turns a depth map
//! into a left/right avoidance advisory.
//!
//! Model implementations (hand landmarks, depth regression, object
//! classification) are external and replaceable; this crate owns only the
//! seams and the decision logic.

pub mod config;
pub mod display;
pub mod error;
pub mod frame_bus;
pub mod providers;
pub mod sections;

pub use config::{DepthConfig, VisionConfig};
pub use display::{DisplaySink, NullDisplay, Overlay};
pub use error::VisionError;
pub use frame_bus::FrameBus;
pub use providers::{DepthModelProvider, FrameSource, HandSignalProvider, ObjectDetectorProvider};
pub use sections::DepthSectioner;
