//! Depth map sectioning and directional decision

use crate::config::DepthConfig;
use crate::error::VisionError;
use drishti_core::{Advisory, DepthMap};
use rand::Rng;
use tracing::debug;

/// Partitions a depth map into a fixed R×C grid and reduces it to a
/// directional advisory.
///
/// A section whose mean depth reaches the threshold counts as an obstacle;
/// obstacles in the left half of the grid push the advisory right and vice
/// versa. Deliberately coarse: constant-time per frame, no per-pixel state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DepthSectioner {
    rows: usize,
    cols: usize,
    threshold: f32,
}

impl DepthSectioner {
    pub fn new(rows: usize, cols: usize, threshold: f32) -> Result<Self, VisionError> {
        let config = DepthConfig {
            rows,
            cols,
            threshold,
        };
        Self::from_config(&config)
    }

    pub fn from_config(config: &DepthConfig) -> Result<Self, VisionError> {
        config.validate().map_err(VisionError::Config)?;
        Ok(Self {
            rows: config.rows,
            cols: config.cols,
            threshold: config.threshold,
        })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    /// Mean depth per section, row-major.
    ///
    /// Sections are bounded by integer division, so trailing pixels beyond
    /// `rows * section_height` are not attributed to any section. Returns an
    /// empty vector when the map is smaller than the grid.
    pub fn cell_means(&self, map: &DepthMap) -> Vec<f32> {
        let section_height = map.height() / self.rows;
        let section_width = map.width() / self.cols;
        if section_height == 0 || section_width == 0 {
            return Vec::new();
        }

        let mut means = Vec::with_capacity(self.rows * self.cols);
        for row in 0..self.rows {
            for col in 0..self.cols {
                let y1 = row * section_height;
                let x1 = col * section_width;

                let mut sum = 0.0f64;
                for y in y1..y1 + section_height {
                    for x in x1..x1 + section_width {
                        sum += map.at(x, y) as f64;
                    }
                }
                means.push((sum / (section_height * section_width) as f64) as f32);
            }
        }
        means
    }

    /// Reduce a depth map to a directional advisory.
    ///
    /// Returns `None` when no section reaches the threshold (nothing
    /// threateningly close). Ties between the left and right counts are
    /// broken uniformly at random through the injected `rng`, so tests can
    /// reproduce the choice with a seeded generator.
    pub fn evaluate<R: Rng>(&self, map: &DepthMap, rng: &mut R) -> Option<Advisory> {
        let means = self.cell_means(map);
        if means.is_empty() {
            debug!(
                map_width = map.width(),
                map_height = map.height(),
                "depth map smaller than section grid, no advisory"
            );
            return None;
        }

        let mut left_count = 0u32;
        let mut right_count = 0u32;

        for (idx, mean) in means.iter().enumerate() {
            if *mean >= self.threshold {
                let col = idx % self.cols;
                if col < self.cols / 2 {
                    left_count += 1;
                } else {
                    right_count += 1;
                }
            }
        }

        if left_count == 0 && right_count == 0 {
            return None;
        }

        let advisory = if left_count > right_count {
            Advisory::AvoidRight
        } else if right_count > left_count {
            Advisory::AvoidLeft
        } else if rng.gen_bool(0.5) {
            Advisory::AvoidRight
        } else {
            Advisory::AvoidLeft
        };

        debug!(left_count, right_count, %advisory, "depth sections evaluated");
        Some(advisory)
    }
}
