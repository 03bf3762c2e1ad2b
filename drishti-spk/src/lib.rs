//! drishti-spk: Throttled speech output for the drishti pipeline
//!
//! Provides the blocking speech-device seam, a native espeak-ng engine, and
//! the cooldown throttler that keeps overlapping or duplicate announcements
//! off the audio channel. Synthesis always runs on the blocking thread
//! pool, never on the scheduler.

pub mod config;
pub mod engines;
pub mod error;
pub mod throttler;

pub use config::{EngineKind, SpeechConfig};
pub use engines::{device_from_config, EspeakDevice, NullDevice, SpeechDevice};
pub use error::SpeechError;
pub use throttler::{SpeechRequest, SpeechThrottler};
