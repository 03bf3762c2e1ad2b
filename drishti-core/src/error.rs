use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Vision error: {0}")]
    Vision(String),

    #[error("Speech error: {0}")]
    Speech(String),

    #[error("Pipeline error: {0}")]
    Pipeline(String),

    #[error("Invalid frame: {0}")]
    InvalidFrame(String),

    #[error("Invalid depth map: {0}")]
    InvalidDepthMap(String),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::Vision("camera gone".to_string());
        assert!(err.to_string().contains("Vision error"));
        assert!(err.to_string().contains("camera gone"));
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: Error = io_err.into();
        match err {
            Error::Io(_) => {}
            _ => panic!("Expected Io error"),
        }
    }
}
