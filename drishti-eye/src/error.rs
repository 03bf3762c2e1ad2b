//! Error types for drishti-eye

use drishti_core::Error as CoreError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum VisionError {
    #[error("Frame source error: {0}")]
    Source(String),

    #[error("Provider error: {0}")]
    Provider(String),

    #[error("Processing error: {0}")]
    Processing(String),

    #[error("Display error: {0}")]
    Display(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Core error: {0}")]
    Core(#[from] CoreError),
}

impl From<VisionError> for CoreError {
    fn from(err: VisionError) -> Self {
        CoreError::Vision(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vision_error_display() {
        let err = VisionError::Source("camera unplugged".to_string());
        assert!(err.to_string().contains("Frame source error"));
        assert!(err.to_string().contains("camera unplugged"));
    }

    #[test]
    fn test_vision_error_to_core_error() {
        let err = VisionError::Provider("model crashed".to_string());
        let core: CoreError = err.into();
        match core {
            CoreError::Vision(msg) => assert!(msg.contains("model crashed")),
            _ => panic!("Expected Vision error"),
        }
    }
}
