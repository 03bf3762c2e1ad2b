//! Core data types exchanged between the pipeline tasks

use crate::error::{Error, Result};
use bytes::Bytes;
use chrono::{DateTime, Utc};
use std::fmt;

/// A single camera frame.
///
/// Frames are immutable once published: the frame bus replaces the whole
/// slot on every publish, so readers holding a snapshot never observe a
/// partially written buffer. `seq` is assigned by the bus on publish and is
/// strictly increasing within a run.
#[derive(Debug, Clone)]
pub struct Frame {
    pub width: u32,
    pub height: u32,
    /// Bytes per pixel (1 = grayscale, 3 = BGR).
    pub channels: u8,
    pub data: Bytes,
    pub captured_at: DateTime<Utc>,
    pub seq: u64,
}

impl Frame {
    /// Create a frame, validating that the buffer matches the dimensions.
    pub fn new(width: u32, height: u32, channels: u8, data: Bytes) -> Result<Self> {
        if width == 0 || height == 0 || channels == 0 {
            return Err(Error::InvalidFrame("zero frame dimension".to_string()));
        }

        let expected = width as usize * height as usize * channels as usize;
        if data.len() != expected {
            return Err(Error::InvalidFrame(format!(
                "buffer length {} does not match {}x{}x{}",
                data.len(),
                width,
                height,
                channels
            )));
        }

        Ok(Self {
            width,
            height,
            channels,
            data,
            captured_at: Utc::now(),
            seq: 0,
        })
    }
}

/// A normalized scalar depth grid derived from one frame.
///
/// Values are in [0, 1]; higher means closer. Lives for one processing
/// cycle and is discarded after sectioning and overlay rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct DepthMap {
    width: usize,
    height: usize,
    data: Vec<f32>,
}

impl DepthMap {
    /// Create a depth map from already-normalized values.
    pub fn new(width: usize, height: usize, data: Vec<f32>) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidDepthMap("zero depth map dimension".to_string()));
        }
        if data.len() != width * height {
            return Err(Error::InvalidDepthMap(format!(
                "value count {} does not match {}x{}",
                data.len(),
                width,
                height
            )));
        }
        Ok(Self { width, height, data })
    }

    /// Min-max normalize raw model output into [0, 1].
    ///
    /// A flat map (max == min) normalizes to all zeros rather than NaN.
    pub fn from_raw(width: usize, height: usize, raw: Vec<f32>) -> Result<Self> {
        if raw.iter().any(|v| !v.is_finite()) {
            return Err(Error::InvalidDepthMap("non-finite depth value".to_string()));
        }

        let min = raw.iter().cloned().fold(f32::INFINITY, f32::min);
        let max = raw.iter().cloned().fold(f32::NEG_INFINITY, f32::max);
        let range = max - min;

        let data = if range > 0.0 {
            raw.iter().map(|v| (v - min) / range).collect()
        } else {
            vec![0.0; raw.len()]
        };

        Self::new(width, height, data)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn at(&self, x: usize, y: usize) -> f32 {
        self.data[y * self.width + x]
    }

    pub fn values(&self) -> &[f32] {
        &self.data
    }
}

/// Directional navigation advisory derived from a depth map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Advisory {
    AvoidLeft,
    AvoidRight,
}

impl fmt::Display for Advisory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Advisory::AvoidLeft => write!(f, "Avoid to Left"),
            Advisory::AvoidRight => write!(f, "Avoid to Right"),
        }
    }
}

/// What the hand-signal provider saw in one frame.
///
/// The provider reports raw measurements; deriving the catch boolean from
/// the pinch distance is owned by the pipeline, not the provider.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HandObservation {
    pub present: bool,
    /// Normalized thumb-tip to index-tip distance.
    pub pinch_distance: f32,
    /// Normalized wrist to middle-finger-tip distance. Hands below the
    /// configured minimum span are ignored as background hands.
    pub hand_span: f32,
}

impl HandObservation {
    /// No hand in view.
    pub fn absent() -> Self {
        Self {
            present: false,
            pinch_distance: f32::MAX,
            hand_span: 0.0,
        }
    }

    pub fn is_catch(&self, threshold: f32) -> bool {
        self.present && self.pinch_distance < threshold
    }
}

/// What the object detector saw in one frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Detection {
    pub present: bool,
    /// Detector class label, when the backing model reports one.
    pub label: Option<String>,
}

impl Detection {
    pub fn none() -> Self {
        Self {
            present: false,
            label: None,
        }
    }
}
