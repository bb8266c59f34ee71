//! Keyer configuration snapshot
//!
//! The running keyer reads its settings from an immutable [`KeyerConfig`]
//! published on a `tokio::sync::watch` channel. Changing a setting publishes
//! a whole new snapshot; the transmission worker picks up the speed at the
//! start of its next message.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tracing::info;

use crate::timing::{validate_wpm, DEFAULT_WPM};

/// RF power used while tuning (percent)
pub const DEFAULT_TUNE_POWER: u8 = 5;

/// How long the trigger must be held to start tuning
pub const DEFAULT_LONG_PRESS_MS: u64 = 1000;

/// Bound on each CAT exchange
pub const DEFAULT_CAT_TIMEOUT_MS: u64 = 1000;

/// Runtime settings of the keyer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyerConfig {
    /// Sending speed in words per minute
    pub wpm: u8,
    /// RF power while tuning (percent)
    pub tune_power: u8,
    /// Long-press threshold in milliseconds
    pub long_press_ms: u64,
    /// CAT timeout in milliseconds
    pub cat_timeout_ms: u64,
}

impl Default for KeyerConfig {
    fn default() -> Self {
        Self {
            wpm: DEFAULT_WPM,
            tune_power: DEFAULT_TUNE_POWER,
            long_press_ms: DEFAULT_LONG_PRESS_MS,
            cat_timeout_ms: DEFAULT_CAT_TIMEOUT_MS,
        }
    }
}

impl KeyerConfig {
    /// Replace out-of-range values with their defaults
    pub fn validated(self) -> Self {
        Self {
            wpm: validate_wpm(self.wpm),
            tune_power: if self.tune_power <= 100 {
                self.tune_power
            } else {
                DEFAULT_TUNE_POWER
            },
            long_press_ms: if self.long_press_ms > 0 {
                self.long_press_ms
            } else {
                DEFAULT_LONG_PRESS_MS
            },
            cat_timeout_ms: if self.cat_timeout_ms > 0 {
                self.cat_timeout_ms
            } else {
                DEFAULT_CAT_TIMEOUT_MS
            },
        }
    }

    /// Long-press threshold
    pub fn long_press(&self) -> Duration {
        Duration::from_millis(self.long_press_ms)
    }

    /// CAT timeout
    pub fn cat_timeout(&self) -> Duration {
        Duration::from_millis(self.cat_timeout_ms)
    }
}

/// Create the config channel, validating the initial snapshot
pub fn channel(config: KeyerConfig) -> (watch::Sender<KeyerConfig>, watch::Receiver<KeyerConfig>) {
    watch::channel(config.validated())
}

/// Publish a new speed, returning the value actually applied
pub fn publish_wpm(tx: &watch::Sender<KeyerConfig>, wpm: u8) -> u8 {
    let wpm = validate_wpm(wpm);
    tx.send_modify(|config| config.wpm = wpm);
    info!("Speed set to {} WPM", wpm);
    wpm
}
