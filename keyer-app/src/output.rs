//! Key and LED output for hosts without keying hardware

use std::sync::atomic::{AtomicBool, Ordering};

use cw_keyer::KeyOutput;
use tracing::{debug, trace};

/// Reports key and LED changes through the log
#[derive(Debug, Default)]
pub struct LogOutput {
    keyed: AtomicBool,
}

impl LogOutput {
    /// Create an output with the key up
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyOutput for LogOutput {
    fn set_key(&self, down: bool) {
        if self.keyed.swap(down, Ordering::Relaxed) != down {
            debug!("KEY {}", if down { "DOWN" } else { "UP" });
        }
    }

    fn set_led(&self, on: bool) {
        trace!("LED {}", if on { "ON" } else { "OFF" });
    }
}
