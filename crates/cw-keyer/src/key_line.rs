//! Key line ownership
//!
//! The transmitter's key line has exactly one owner at a time: nobody, the
//! transmission worker, or the tuner. Ownership is taken by compare-and-swap
//! on a shared token and represented by a [`KeyGuard`]. The guard is the only
//! way to drive the key, and dropping it forces the key up and hands the line
//! back.

use std::fmt;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, warn};

use crate::error::KeyLineBusy;

/// Who currently holds the key line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum LineOwner {
    /// Nobody
    Idle = 0,
    /// The transmission worker, sending a message
    Transmitting = 1,
    /// The tuner, holding a carrier
    Tuning = 2,
}

impl LineOwner {
    fn from_u8(value: u8) -> Self {
        match value {
            1 => LineOwner::Transmitting,
            2 => LineOwner::Tuning,
            _ => LineOwner::Idle,
        }
    }
}

impl fmt::Display for LineOwner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            LineOwner::Idle => "idle",
            LineOwner::Transmitting => "transmitting",
            LineOwner::Tuning => "tuning",
        })
    }
}

/// Physical outputs driven by the keyer
///
/// Implementations must be cheap and non-blocking; they are called from
/// inside timed keying loops.
pub trait KeyOutput: Send + Sync + 'static {
    /// Close (`true`) or open the transmitter key
    fn set_key(&self, down: bool);

    /// Turn the indicator LED on or off
    fn set_led(&self, on: bool);
}

struct Shared {
    owner: AtomicU8,
    output: Box<dyn KeyOutput>,
}

/// Shared handle to the key line
#[derive(Clone)]
pub struct KeyLine {
    shared: Arc<Shared>,
}

impl fmt::Debug for KeyLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyLine")
            .field("owner", &self.owner())
            .finish()
    }
}

impl KeyLine {
    /// Create a free key line driving `output`
    pub fn new(output: impl KeyOutput) -> Self {
        output.set_key(false);
        output.set_led(false);
        Self {
            shared: Arc::new(Shared {
                owner: AtomicU8::new(LineOwner::Idle as u8),
                output: Box::new(output),
            }),
        }
    }

    /// Current owner
    pub fn owner(&self) -> LineOwner {
        LineOwner::from_u8(self.shared.owner.load(Ordering::Acquire))
    }

    /// Take the line for sending a message
    pub fn acquire_transmit(&self) -> Result<KeyGuard, KeyLineBusy> {
        self.acquire(LineOwner::Transmitting)
    }

    /// Take the line for a tune session
    pub fn acquire_tune(&self) -> Result<KeyGuard, KeyLineBusy> {
        self.acquire(LineOwner::Tuning)
    }

    fn acquire(&self, owner: LineOwner) -> Result<KeyGuard, KeyLineBusy> {
        self.shared
            .owner
            .compare_exchange(
                LineOwner::Idle as u8,
                owner as u8,
                Ordering::AcqRel,
                Ordering::Acquire,
            )
            .map_err(|current| KeyLineBusy(LineOwner::from_u8(current)))?;

        debug!("Key line acquired for {}", owner);
        Ok(KeyGuard {
            shared: Arc::clone(&self.shared),
            owner,
            keyed: false,
            lit: false,
        })
    }
}

/// Exclusive right to drive the key line
///
/// Dropping the guard opens the key, turns the LED off and frees the line.
pub struct KeyGuard {
    shared: Arc<Shared>,
    owner: LineOwner,
    keyed: bool,
    lit: bool,
}

impl fmt::Debug for KeyGuard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyGuard")
            .field("owner", &self.owner)
            .field("keyed", &self.keyed)
            .field("lit", &self.lit)
            .finish()
    }
}

impl KeyGuard {
    /// Who holds this guard
    pub fn owner(&self) -> LineOwner {
        self.owner
    }

    /// True while the key is closed
    pub fn is_keyed(&self) -> bool {
        self.keyed
    }

    /// Close the key
    pub fn key_down(&mut self) {
        if !self.keyed {
            self.shared.output.set_key(true);
            self.keyed = true;
        }
    }

    /// Open the key
    pub fn key_up(&mut self) {
        if self.keyed {
            self.shared.output.set_key(false);
            self.keyed = false;
        }
    }

    /// Drive the indicator LED
    pub fn set_led(&mut self, on: bool) {
        if self.lit != on {
            self.shared.output.set_led(on);
            self.lit = on;
        }
    }
}

impl Drop for KeyGuard {
    fn drop(&mut self) {
        if self.keyed {
            warn!("Key line released while keyed, forcing key up");
        }
        self.key_up();
        self.set_led(false);
        self.shared.owner.store(LineOwner::Idle as u8, Ordering::Release);
        debug!("Key line released by {}", self.owner);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default, Clone)]
    struct Probe {
        events: Arc<Mutex<Vec<(&'static str, bool)>>>,
    }

    impl KeyOutput for Probe {
        fn set_key(&self, down: bool) {
            self.events.lock().unwrap().push(("key", down));
        }

        fn set_led(&self, on: bool) {
            self.events.lock().unwrap().push(("led", on));
        }
    }

    fn line() -> (KeyLine, Probe) {
        let probe = Probe::default();
        let line = KeyLine::new(probe.clone());
        probe.events.lock().unwrap().clear();
        (line, probe)
    }

    #[test]
    fn test_single_owner() {
        let (line, _) = line();
        let guard = line.acquire_transmit().unwrap();
        assert_eq!(line.owner(), LineOwner::Transmitting);

        assert_eq!(
            line.acquire_tune().unwrap_err(),
            KeyLineBusy(LineOwner::Transmitting)
        );
        assert!(line.acquire_transmit().is_err());

        drop(guard);
        assert_eq!(line.owner(), LineOwner::Idle);
        assert!(line.acquire_tune().is_ok());
    }

    #[test]
    fn test_drop_forces_key_up() {
        let (line, probe) = line();
        let mut guard = line.acquire_tune().unwrap();
        guard.key_down();
        guard.set_led(true);
        drop(guard);

        let events = probe.events.lock().unwrap().clone();
        assert_eq!(
            events,
            vec![("key", true), ("led", true), ("key", false), ("led", false)]
        );
    }

    #[test]
    fn test_redundant_calls_are_suppressed() {
        let (line, probe) = line();
        let mut guard = line.acquire_transmit().unwrap();
        guard.key_up();
        guard.key_down();
        guard.key_down();
        assert!(guard.is_keyed());
        guard.key_up();
        drop(guard);

        let events = probe.events.lock().unwrap().clone();
        assert_eq!(events, vec![("key", true), ("key", false)]);
    }

    #[test]
    fn test_clones_share_the_token() {
        let (line, _) = line();
        let other = line.clone();
        let _guard = line.acquire_tune().unwrap();
        assert_eq!(other.owner(), LineOwner::Tuning);
        assert!(other.acquire_transmit().is_err());
    }
}
