//! External perception provider interfaces
//!
//! All model inference lives behind these traits. The pipeline treats each
//! provider as an opaque, replaceable capability and owns only the derived
//! decisions (catch thresholding, depth sectioning, flag combination).

use crate::error::VisionError;
use async_trait::async_trait;
use drishti_core::{DepthMap, Detection, Frame, HandObservation};

/// Pull-based source of camera frames.
///
/// Expected to be polled in a loop at camera rate; returns `Ok(None)` when
/// no frame is ready yet. Best effort: a missing frame is not an error.
#[async_trait]
pub trait FrameSource: Send + Sync {
    async fn next_frame(&self) -> Result<Option<Frame>, VisionError>;

    /// Release the capture device. Called exactly once on shutdown;
    /// implementations must tolerate repeated calls.
    fn release(&self) {}
}

/// Hand landmark extraction.
///
/// Reports raw measurements; the pipeline derives the catch boolean from
/// the pinch distance against its configured threshold.
#[async_trait]
pub trait HandSignalProvider: Send + Sync {
    async fn detect(&self, frame: &Frame) -> Result<HandObservation, VisionError>;
}

/// Monocular depth regression producing a normalized depth grid.
#[async_trait]
pub trait DepthModelProvider: Send + Sync {
    async fn infer(&self, frame: &Frame) -> Result<DepthMap, VisionError>;
}

/// Object classification over a frame.
#[async_trait]
pub trait ObjectDetectorProvider: Send + Sync {
    async fn detect(&self, frame: &Frame) -> Result<Detection, VisionError>;
}
