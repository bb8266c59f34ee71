//! Persistent keyer settings

use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use cw_keyer::config::{DEFAULT_CAT_TIMEOUT_MS, DEFAULT_LONG_PRESS_MS, DEFAULT_TUNE_POWER};
use cw_keyer::engine::truncate_message;
use cw_keyer::timing::{validate_wpm, DEFAULT_WPM};
use cw_keyer::KeyerConfig;
use cw_radio::{RadioError, RadioModel};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Number of stored message slots
pub const MESSAGE_SLOTS: usize = 10;

/// Settings file name inside the config directory
const SETTINGS_FILE: &str = "settings.json";

/// Application settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Sending speed in words per minute
    pub wpm: u8,
    /// Radio model name, checked when the radio is connected
    pub radio: String,
    /// Serial port path
    pub port: String,
    /// Baud rate
    pub baud_rate: u32,
    /// RF power while tuning (percent)
    pub tune_power: u8,
    /// Long-press threshold in milliseconds
    pub long_press_ms: u64,
    /// CAT response timeout in milliseconds
    pub cat_timeout_ms: u64,
    /// Stored messages
    pub messages: Vec<String>,
    /// Slot a short press sends
    pub current_message: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            wpm: DEFAULT_WPM,
            radio: RadioModel::Mock.name().to_string(),
            port: "/dev/ttyUSB0".to_string(),
            baud_rate: 38400,
            tune_power: DEFAULT_TUNE_POWER,
            long_press_ms: DEFAULT_LONG_PRESS_MS,
            cat_timeout_ms: DEFAULT_CAT_TIMEOUT_MS,
            messages: vec![String::new(); MESSAGE_SLOTS],
            current_message: 0,
        }
    }
}

impl Settings {
    /// Get the XDG config directory for the keyer
    /// Uses $XDG_CONFIG_HOME/cw-keyer, falls back to ~/.config/cw-keyer
    fn config_dir() -> Option<PathBuf> {
        if let Ok(xdg_config) = std::env::var("XDG_CONFIG_HOME") {
            let path = PathBuf::from(xdg_config);
            if path.is_absolute() {
                return Some(path.join("cw-keyer"));
            }
        }

        dirs::home_dir().map(|h| h.join(".config").join("cw-keyer"))
    }

    /// Default settings file path
    pub fn default_path() -> Option<PathBuf> {
        Self::config_dir().map(|p| p.join(SETTINGS_FILE))
    }

    /// Load settings, falling back to defaults if the file is missing or
    /// unreadable
    pub fn load_from(path: &Path) -> Self {
        let settings = match std::fs::read_to_string(path) {
            Ok(json) => serde_json::from_str::<Settings>(&json).unwrap_or_else(|e| {
                warn!("Ignoring corrupt settings file {}: {}", path.display(), e);
                Settings::default()
            }),
            Err(e) => {
                debug!("No settings at {}: {}", path.display(), e);
                Settings::default()
            }
        };
        settings.normalized()
    }

    /// Save settings to disk
    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create settings directory {}", parent.display())
            })?;
        }

        let json = serde_json::to_string_pretty(self).context("Failed to serialize settings")?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write settings to {}", path.display()))?;

        debug!("Settings saved to {}", path.display());
        Ok(())
    }

    /// Bring loaded values back into range
    fn normalized(mut self) -> Self {
        let wpm = validate_wpm(self.wpm);
        if wpm != self.wpm {
            warn!("Invalid WPM {} in settings, using {}", self.wpm, wpm);
            self.wpm = wpm;
        }
        self.messages.resize(MESSAGE_SLOTS, String::new());
        for message in &mut self.messages {
            let truncated = truncate_message(message).len();
            message.truncate(truncated);
        }
        if self.current_message >= MESSAGE_SLOTS {
            self.current_message = 0;
        }
        self
    }

    /// Change the speed, returning the value stored
    pub fn set_wpm(&mut self, wpm: u8) -> u8 {
        self.wpm = validate_wpm(wpm);
        self.wpm
    }

    /// Store `text` in a message slot
    pub fn set_message(&mut self, slot: usize, text: &str) -> anyhow::Result<()> {
        if slot >= MESSAGE_SLOTS {
            bail!("Message slot {} out of range (0-{})", slot, MESSAGE_SLOTS - 1);
        }
        self.messages[slot] = truncate_message(text).to_string();
        Ok(())
    }

    /// Pick the slot a short press sends
    pub fn select_message(&mut self, slot: usize) -> anyhow::Result<()> {
        if slot >= MESSAGE_SLOTS {
            bail!("Message slot {} out of range (0-{})", slot, MESSAGE_SLOTS - 1);
        }
        self.current_message = slot;
        Ok(())
    }

    /// Text of the selected slot
    pub fn current_message_text(&self) -> &str {
        self.messages
            .get(self.current_message)
            .map(String::as_str)
            .unwrap_or_default()
    }

    /// The configured radio model
    pub fn radio_model(&self) -> Result<RadioModel, RadioError> {
        self.radio.parse()
    }

    /// Keyer runtime configuration from these settings
    pub fn keyer_config(&self) -> KeyerConfig {
        KeyerConfig {
            wpm: self.wpm,
            tune_power: self.tune_power,
            long_press_ms: self.long_press_ms,
            cat_timeout_ms: self.cat_timeout_ms,
        }
        .validated()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_path(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("cw-keyer-test-{}-{}", std::process::id(), name))
            .join(SETTINGS_FILE)
    }

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.wpm, 20);
        assert_eq!(settings.radio, "MOCK");
        assert_eq!(settings.port, "/dev/ttyUSB0");
        assert_eq!(settings.baud_rate, 38400);
        assert_eq!(settings.messages.len(), MESSAGE_SLOTS);
        assert_eq!(settings.current_message_text(), "");
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let settings = Settings::load_from(&scratch_path("missing"));
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_corrupt_file_gives_defaults() {
        let path = scratch_path("corrupt");
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "{ not json").unwrap();

        assert_eq!(Settings::load_from(&path), Settings::default());
        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn test_save_and_load() {
        let path = scratch_path("roundtrip");
        let mut settings = Settings::default();
        settings.radio = RadioModel::Ft991a.name().to_string();
        settings.set_wpm(28);
        settings.set_message(3, "CQ TEST").unwrap();
        settings.select_message(3).unwrap();
        settings.save_to(&path).unwrap();

        let loaded = Settings::load_from(&path);
        assert_eq!(loaded, settings);
        assert_eq!(loaded.current_message_text(), "CQ TEST");
        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn test_model_name_from_json() {
        let settings: Settings = serde_json::from_str(r#"{"radio": "FT-857D"}"#).unwrap();
        assert_eq!(settings.radio_model().unwrap(), RadioModel::Ft857d);
        assert_eq!(settings.baud_rate, 38400);
    }

    #[test]
    fn test_unknown_model_is_kept_for_startup_to_reject() {
        let settings: Settings = serde_json::from_str(r#"{"radio": "IC-7300"}"#).unwrap();
        assert_eq!(settings.radio, "IC-7300");
        assert!(settings.radio_model().is_err());
    }

    #[test]
    fn test_invalid_values_normalized() {
        let settings: Settings =
            serde_json::from_str(r#"{"wpm": 90, "messages": ["A"], "current_message": 42}"#)
                .unwrap();
        let settings = settings.normalized();
        assert_eq!(settings.wpm, 20);
        assert_eq!(settings.messages.len(), MESSAGE_SLOTS);
        assert_eq!(settings.messages[0], "A");
        assert_eq!(settings.current_message, 0);
    }

    #[test]
    fn test_set_wpm_validates() {
        let mut settings = Settings::default();
        assert_eq!(settings.set_wpm(3), 20);
        assert_eq!(settings.set_wpm(50), 50);
    }

    #[test]
    fn test_message_slots() {
        let mut settings = Settings::default();
        assert!(settings.set_message(10, "X").is_err());
        assert!(settings.select_message(10).is_err());

        settings.set_message(9, &"K".repeat(80)).unwrap();
        assert_eq!(settings.messages[9].len(), 64);
    }

    #[test]
    fn test_keyer_config() {
        let mut settings = Settings::default();
        settings.tune_power = 10;
        settings.long_press_ms = 800;
        let config = settings.keyer_config();
        assert_eq!(config.wpm, 20);
        assert_eq!(config.tune_power, 10);
        assert_eq!(config.long_press_ms, 800);
    }
}
