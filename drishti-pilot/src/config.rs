//! Configuration for the pilot orchestrator

use crate::error::PilotError;
use drishti_eye::VisionConfig;
use drishti_spk::SpeechConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Top-level pipeline configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PilotConfig {
    pub vision: VisionConfig,
    pub speech: SpeechConfig,

    /// Flag combinator evaluation interval in milliseconds.
    pub flag_poll_ms: u64,

    /// Quit watcher poll interval in milliseconds.
    pub watcher_poll_ms: u64,

    /// Idle sleep for perception loops waiting on a new frame.
    pub idle_poll_ms: u64,

    /// How long shutdown waits for each task before reporting it.
    pub shutdown_grace_ms: u64,

    /// Announcement for the gesture-plus-detection event.
    pub grasp_alert_text: String,

    /// Seed for the depth tie-break; random when unset.
    pub decision_seed: Option<u64>,
}

impl Default for PilotConfig {
    fn default() -> Self {
        Self {
            vision: VisionConfig::default(),
            speech: SpeechConfig::default(),
            flag_poll_ms: 100,
            watcher_poll_ms: 100,
            idle_poll_ms: 5,
            shutdown_grace_ms: 2_000,
            grasp_alert_text: "Object grasped".to_string(),
            decision_seed: None,
        }
    }
}

impl PilotConfig {
    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        self.vision.validate()?;
        self.speech.validate()?;

        if self.flag_poll_ms == 0 || self.flag_poll_ms > 10_000 {
            return Err("Flag poll interval must be between 1 and 10000 ms".to_string());
        }

        if self.watcher_poll_ms == 0 || self.watcher_poll_ms > 10_000 {
            return Err("Watcher poll interval must be between 1 and 10000 ms".to_string());
        }

        if self.idle_poll_ms == 0 || self.idle_poll_ms > 1_000 {
            return Err("Idle poll interval must be between 1 and 1000 ms".to_string());
        }

        if self.shutdown_grace_ms == 0 || self.shutdown_grace_ms > 60_000 {
            return Err("Shutdown grace must be between 1 and 60000 ms".to_string());
        }

        if self.grasp_alert_text.is_empty() {
            return Err("Grasp alert text must not be empty".to_string());
        }

        Ok(())
    }

    /// Parse a TOML document.
    pub fn from_toml_str(raw: &str) -> Result<Self, PilotError> {
        let config: Self =
            toml::from_str(raw).map_err(|e| PilotError::Config(format!("Invalid TOML: {e}")))?;
        config.validate().map_err(PilotError::Config)?;
        Ok(config)
    }

    /// Load and validate a TOML config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, PilotError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_toml_str(&raw)
    }
}
