//! Error types for drishti-pilot

use drishti_core::Error as CoreError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PilotError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("State error: {0}")]
    State(String),

    #[error("Tasks did not stop within the grace period: {0}")]
    Straggler(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<PilotError> for CoreError {
    fn from(err: PilotError) -> Self {
        CoreError::Pipeline(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pilot_error_display() {
        let err = PilotError::Straggler("depth".to_string());
        assert!(err.to_string().contains("grace period"));
        assert!(err.to_string().contains("depth"));
    }

    #[test]
    fn test_pilot_error_to_core_error() {
        let err = PilotError::State("already started".to_string());
        let core: CoreError = err.into();
        match core {
            CoreError::Pipeline(msg) => assert!(msg.contains("already started")),
            _ => panic!("Expected Pipeline error"),
        }
    }
}
