//! Configuration for drishti-eye

use serde::{Deserialize, Serialize};

/// Depth sectioning configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DepthConfig {
    /// Section grid rows.
    pub rows: usize,
    /// Section grid columns.
    pub cols: usize,
    /// A section whose mean depth reaches this value counts as an obstacle.
    pub threshold: f32,
}

impl Default for DepthConfig {
    fn default() -> Self {
        Self {
            rows: 5,
            cols: 5,
            threshold: 0.8,
        }
    }
}

/// Vision system configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VisionConfig {
    /// USB camera device index (0, 1, 2, etc.)
    pub camera_id: u32,
    /// Target frame rate (frames per second)
    pub frame_rate: u32,
    /// Camera resolution (width, height)
    pub resolution: (u32, u32),
    /// Thumb-to-index distance below which a hand counts as catching,
    /// in normalized image coordinates.
    pub catch_threshold: f32,
    /// Hands with a wrist-to-middle-finger span below this are ignored.
    pub min_hand_span: f32,
    /// Depth sectioning parameters.
    pub depth: DepthConfig,
}

impl Default for VisionConfig {
    fn default() -> Self {
        Self {
            camera_id: 0,
            frame_rate: 30,
            resolution: (1280, 720),
            catch_threshold: 0.05,
            min_hand_span: 0.3,
            depth: DepthConfig::default(),
        }
    }
}

impl VisionConfig {
    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.frame_rate == 0 || self.frame_rate > 120 {
            return Err("Frame rate must be between 1 and 120".to_string());
        }

        if self.resolution.0 == 0 || self.resolution.1 == 0 {
            return Err("Resolution must be non-zero".to_string());
        }

        if self.resolution.0 > 7680 || self.resolution.1 > 4320 {
            return Err("Resolution too large (max 8K)".to_string());
        }

        if self.camera_id > 100 {
            return Err("Camera ID too large (max 100)".to_string());
        }

        if !(0.0..1.0).contains(&self.catch_threshold) || self.catch_threshold <= 0.0 {
            return Err("Catch threshold must be in (0, 1)".to_string());
        }

        if !(0.0..1.0).contains(&self.min_hand_span) {
            return Err("Minimum hand span must be in [0, 1)".to_string());
        }

        self.depth.validate()
    }
}

impl DepthConfig {
    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.rows == 0 || self.cols == 0 {
            return Err("Section grid dimensions must be non-zero".to_string());
        }

        if self.rows > 64 || self.cols > 64 {
            return Err("Section grid too fine (max 64x64)".to_string());
        }

        if !(self.threshold > 0.0 && self.threshold <= 1.0) {
            return Err("Depth threshold must be in (0, 1]".to_string());
        }

        Ok(())
    }
}
