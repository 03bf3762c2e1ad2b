//! Speech device implementations

use crate::config::{EngineKind, SpeechConfig};
use crate::error::SpeechError;
use std::sync::Arc;

pub mod espeak;

pub use espeak::EspeakDevice;

/// A blocking audio output device.
///
/// `synthesize` blocks the calling thread until the audio has finished
/// playing, so it must only ever run on the blocking thread pool. The
/// throttler owns that dispatch; callers never invoke this on the
/// scheduler.
pub trait SpeechDevice: Send + Sync {
    fn synthesize(&self, text: &str) -> Result<(), SpeechError>;

    fn is_available(&self) -> bool;

    fn name(&self) -> &str;

    /// Release the audio handle. Idempotent.
    fn release(&self) {}
}

/// Discards all announcements. Used headless and in tests.
pub struct NullDevice;

impl SpeechDevice for NullDevice {
    fn synthesize(&self, _text: &str) -> Result<(), SpeechError> {
        Ok(())
    }

    fn is_available(&self) -> bool {
        true
    }

    fn name(&self) -> &str {
        "null"
    }
}

/// Build the configured speech device.
pub fn device_from_config(config: &SpeechConfig) -> Result<Arc<dyn SpeechDevice>, SpeechError> {
    match config.engine {
        EngineKind::Espeak => Ok(Arc::new(EspeakDevice::from_config(config)?)),
        EngineKind::Null => Ok(Arc::new(NullDevice)),
    }
}

/// Strip control characters and cap length before handing text to an engine.
pub(crate) fn sanitize_text(text: &str) -> String {
    const MAX_TEXT_LENGTH: usize = 1_000;
    text.chars()
        .filter(|c| !c.is_control() || *c == '\n')
        .take(MAX_TEXT_LENGTH)
        .collect()
}
