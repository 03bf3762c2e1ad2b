//! Configuration for speech output

use serde::{Deserialize, Serialize};

/// Which speech device to drive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EngineKind {
    /// espeak-ng via command line.
    Espeak,
    /// Discard all announcements (headless runs, tests).
    Null,
}

/// Speech output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeechConfig {
    /// Enable speech output.
    pub enabled: bool,

    /// Preferred engine.
    pub engine: EngineKind,

    /// Voice identifier passed to the engine (e.g. "en-us").
    pub voice: Option<String>,

    /// Speech rate (words per minute, 1-500).
    pub rate: u32,

    /// Volume (0.0-1.0).
    pub volume: f32,

    /// Minimum seconds between gesture-path announcements.
    pub gesture_cooldown_secs: u64,

    /// Minimum seconds between depth-path announcements.
    pub depth_cooldown_secs: u64,
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            engine: EngineKind::Espeak,
            voice: None,
            rate: 150,
            volume: 0.9,
            gesture_cooldown_secs: 7,
            depth_cooldown_secs: 3,
        }
    }
}

impl SpeechConfig {
    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.rate == 0 || self.rate > 500 {
            return Err("Speech rate must be between 1 and 500".to_string());
        }

        if !(0.0..=1.0).contains(&self.volume) {
            return Err("Volume must be in [0, 1]".to_string());
        }

        if self.gesture_cooldown_secs == 0 || self.depth_cooldown_secs == 0 {
            return Err("Announcement cooldowns must be non-zero".to_string());
        }

        if let Some(ref voice) = self.voice {
            if voice.is_empty() || voice.len() > 64 {
                return Err("Voice identifier must be 1-64 characters".to_string());
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = SpeechConfig::default();
        assert!(config.enabled);
        assert_eq!(config.engine, EngineKind::Espeak);
        assert_eq!(config.rate, 150);
        assert_eq!(config.volume, 0.9);
        assert_eq!(config.gesture_cooldown_secs, 7);
        assert_eq!(config.depth_cooldown_secs, 3);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation_rate() {
        let mut config = SpeechConfig::default();
        config.rate = 0;
        assert!(config.validate().is_err());

        config.rate = 501;
        assert!(config.validate().is_err());

        config.rate = 500;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation_volume() {
        let mut config = SpeechConfig::default();
        config.volume = -0.1;
        assert!(config.validate().is_err());

        config.volume = 1.1;
        assert!(config.validate().is_err());

        config.volume = 1.0;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation_cooldowns() {
        let mut config = SpeechConfig::default();
        config.gesture_cooldown_secs = 0;
        assert!(config.validate().is_err());

        config = SpeechConfig::default();
        config.depth_cooldown_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_voice() {
        let mut config = SpeechConfig::default();
        config.voice = Some(String::new());
        assert!(config.validate().is_err());

        config.voice = Some("a".repeat(65));
        assert!(config.validate().is_err());

        config.voice = Some("en-us".to_string());
        assert!(config.validate().is_ok());
    }
}
