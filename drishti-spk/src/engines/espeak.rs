//! espeak-ng speech device
//!
//! Drives the system espeak-ng binary via command line. The process call
//! blocks until playback finishes, which is exactly the contract the
//! throttler expects from a `SpeechDevice`.

use crate::config::SpeechConfig;
use crate::engines::{sanitize_text, SpeechDevice};
use crate::error::SpeechError;
use std::process::{Command, Stdio};
use tracing::{debug, warn};

pub struct EspeakDevice {
    binary: String,
    rate: u32,
    /// espeak amplitude, 0-200.
    amplitude: u32,
    voice: Option<String>,
}

impl EspeakDevice {
    pub fn new() -> Self {
        Self::with_binary("espeak-ng")
    }

    pub fn with_binary(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
            rate: 150,
            amplitude: 180,
            voice: None,
        }
    }

    pub fn from_config(config: &SpeechConfig) -> Result<Self, SpeechError> {
        config.validate().map_err(SpeechError::Config)?;

        Ok(Self {
            binary: "espeak-ng".to_string(),
            rate: config.rate,
            amplitude: (config.volume * 200.0).round().clamp(0.0, 200.0) as u32,
            voice: config.voice.clone(),
        })
    }
}

impl Default for EspeakDevice {
    fn default() -> Self {
        Self::new()
    }
}

impl SpeechDevice for EspeakDevice {
    fn synthesize(&self, text: &str) -> Result<(), SpeechError> {
        let sanitized = sanitize_text(text);
        if sanitized.is_empty() {
            return Err(SpeechError::Synthesizer("Text cannot be empty".to_string()));
        }

        let mut command = Command::new(&self.binary);
        command
            .arg("-s")
            .arg(self.rate.to_string())
            .arg("-a")
            .arg(self.amplitude.to_string());

        if let Some(ref voice) = self.voice {
            command.arg("-v").arg(voice);
        }

        command.arg(&sanitized);

        debug!(engine = %self.binary, text = %sanitized, "synthesizing");

        let status = command
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map_err(|e| SpeechError::Engine(format!("Failed to run {}: {}", self.binary, e)))?;

        if !status.success() {
            return Err(SpeechError::Engine(format!(
                "{} exited with {}",
                self.binary, status
            )));
        }

        Ok(())
    }

    fn is_available(&self) -> bool {
        match Command::new(&self.binary)
            .arg("--version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
        {
            Ok(status) => status.success(),
            Err(_) => {
                warn!(binary = %self.binary, "speech binary not found");
                false
            }
        }
    }

    fn name(&self) -> &str {
        "espeak"
    }
}
