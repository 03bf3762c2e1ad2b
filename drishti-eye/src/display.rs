//! Write-only overlay sink for debug rendering

use crate::error::VisionError;
use drishti_core::{Advisory, Frame};

/// What the pipeline wants drawn on top of a frame: per-section depth
/// means, the current advisory banner, and the catch indicator.
#[derive(Debug, Clone, PartialEq)]
pub struct Overlay {
    /// Row-major section means, `grid.0 * grid.1` entries (may be empty
    /// when the depth map was smaller than the grid).
    pub cell_means: Vec<f32>,
    /// Section grid shape (rows, cols) the means were computed over.
    pub grid: (usize, usize),
    pub advisory: Option<Advisory>,
    pub catch_active: bool,
}

impl Overlay {
    pub fn empty(grid: (usize, usize)) -> Self {
        Self {
            cell_means: Vec::new(),
            grid,
            advisory: None,
            catch_active: false,
        }
    }
}

/// External rendering surface. The pipeline only ever writes to it.
pub trait DisplaySink: Send + Sync {
    fn render(&self, frame: &Frame, overlay: &Overlay) -> Result<(), VisionError>;

    /// Release the display handle. Idempotent.
    fn release(&self) {}
}

/// Discards everything. Used headless and in tests.
pub struct NullDisplay;

impl DisplaySink for NullDisplay {
    fn render(&self, _frame: &Frame, _overlay: &Overlay) -> Result<(), VisionError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;

    #[test]
    fn test_null_display_accepts_overlay() {
        let frame = Frame::new(2, 2, 1, Bytes::from(vec![0u8; 4])).unwrap();
        let overlay = Overlay {
            cell_means: vec![0.5; 25],
            grid: (5, 5),
            advisory: Some(Advisory::AvoidLeft),
            catch_active: true,
        };
        assert!(NullDisplay.render(&frame, &overlay).is_ok());
    }

    #[test]
    fn test_empty_overlay() {
        let overlay = Overlay::empty((5, 5));
        assert!(overlay.cell_means.is_empty());
        assert_eq!(overlay.grid, (5, 5));
        assert!(overlay.advisory.is_none());
        assert!(!overlay.catch_active);
    }
}
