//! Tune sequencer
//!
//! Holds a low-power CW carrier a little off the operating frequency so an
//! antenna tuner can find a match, then puts the radio back the way it was.
//!
//! ```text
//! Idle --tune_start--> Tuning --tune_stop--> Idle
//! ```
//!
//! The key line is taken before any radio call, so a tune never starts while
//! a message is being sent. Setup failures abort before the key goes down;
//! teardown is best effort and runs every restore step.

use std::sync::Arc;

use cw_protocol::{ValidationError, MODE_UNKNOWN};
use cw_radio::{RadioDriver, RadioError};
use serde::Serialize;
use tokio::sync::{watch, Mutex};
use tracing::{debug, error, info, warn};

use crate::bands::is_inband;
use crate::config::KeyerConfig;
use crate::error::TuneError;
use crate::key_line::{KeyGuard, KeyLine};

/// Mode the carrier is sent in
pub const TUNE_MODE: &str = "CW";

/// Radio state captured before tuning
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RadioSnapshot {
    /// VFO frequency in Hz
    pub frequency_hz: u32,
    /// Mode code, in the radio's own numbering
    pub mode: u8,
    /// RF power (percent)
    pub power: u8,
}

/// Offset from the operating frequency for a given mode name
///
/// Upper sideband tunes above, lower sideband below, anything else 5 kHz up.
pub fn tune_offset(mode_name: &str) -> i64 {
    match mode_name {
        "USB" => 3000,
        "LSB" => -3000,
        _ => 5000,
    }
}

/// Pick the tuning frequency: `hz + offset` if that is in band, otherwise
/// `hz - offset`, otherwise nothing
pub fn tune_frequency(hz: u32, offset: i64) -> Option<u32> {
    [i64::from(hz) + offset, i64::from(hz) - offset]
        .into_iter()
        .filter_map(|candidate| u32::try_from(candidate).ok())
        .find(|&candidate| is_inband(candidate))
}

#[derive(Debug)]
struct TuneSession {
    snapshot: RadioSnapshot,
    guard: KeyGuard,
}

/// Runs tune sessions against a shared radio
#[derive(Debug)]
pub struct TuneSequencer<R> {
    radio: Arc<Mutex<R>>,
    key_line: KeyLine,
    config: watch::Receiver<KeyerConfig>,
    session: Mutex<Option<TuneSession>>,
}

impl<R: RadioDriver> TuneSequencer<R> {
    /// Create an idle sequencer
    pub fn new(
        radio: Arc<Mutex<R>>,
        key_line: KeyLine,
        config: watch::Receiver<KeyerConfig>,
    ) -> Self {
        Self {
            radio,
            key_line,
            config,
            session: Mutex::new(None),
        }
    }

    /// True while a carrier is being held
    pub async fn is_tuning(&self) -> bool {
        self.session.lock().await.is_some()
    }

    /// Snapshot captured by the running session
    pub async fn snapshot(&self) -> Option<RadioSnapshot> {
        self.session.lock().await.as_ref().map(|s| s.snapshot)
    }

    /// Take the key line, retune for a carrier and key down
    ///
    /// Returns the frequency the carrier is on.
    pub async fn tune_start(&self) -> Result<u32, TuneError> {
        let mut guard = self.key_line.acquire_tune()?;
        let mut session = self.session.lock().await;
        let mut radio = self.radio.lock().await;

        let snapshot = read_snapshot(&mut *radio)
            .await
            .map_err(TuneError::Snapshot)?;
        info!(
            "Tune start from {} Hz, mode {}, power {}%",
            snapshot.frequency_hz,
            radio.mode_to_string(snapshot.mode),
            snapshot.power
        );

        let cw = radio.mode_from_string(TUNE_MODE);
        if cw == MODE_UNKNOWN {
            return Err(TuneError::UnsupportedMode(TUNE_MODE));
        }

        let tune_power = self.config.borrow().tune_power;
        let mut changes = Changes::default();

        let prepared = async {
            radio.set_mode(cw).await.map_err(TuneError::Setup)?;
            changes.mode = true;
            radio.set_power(tune_power).await.map_err(TuneError::Setup)?;
            changes.power = true;

            let offset = tune_offset(radio.mode_to_string(snapshot.mode));
            let hz = tune_frequency(snapshot.frequency_hz, offset)
                .ok_or(ValidationError::OutOfBand(snapshot.frequency_hz))?;
            radio.set_frequency(hz).await.map_err(TuneError::Setup)?;
            Ok::<u32, TuneError>(hz)
        }
        .await;

        let hz = match prepared {
            Ok(hz) => hz,
            Err(e) => {
                warn!("Tune aborted: {}", e);
                undo_setup(&mut *radio, &snapshot, changes).await;
                return Err(e);
            }
        };

        guard.key_down();
        guard.set_led(true);
        info!("Tuning carrier on {} Hz at {}%", hz, tune_power);

        *session = Some(TuneSession { snapshot, guard });
        Ok(hz)
    }

    /// Drop the carrier and restore power, mode and frequency
    ///
    /// Every restore step runs even if an earlier one fails. The key line is
    /// released once all steps have been tried.
    pub async fn tune_stop(&self) -> Result<RadioSnapshot, TuneError> {
        let mut session = self.session.lock().await;
        let Some(TuneSession {
            snapshot,
            mut guard,
        }) = session.take()
        else {
            debug!("Tune stop while idle, ignoring");
            return Err(TuneError::NotTuning);
        };

        guard.key_up();
        guard.set_led(false);

        let mut radio = self.radio.lock().await;
        let mut failed = 0;
        if let Err(e) = radio.set_power(snapshot.power).await {
            error!("Failed to restore power {}%: {}", snapshot.power, e);
            failed += 1;
        }
        if let Err(e) = radio.set_mode(snapshot.mode).await {
            error!("Failed to restore mode {:#04x}: {}", snapshot.mode, e);
            failed += 1;
        }
        if let Err(e) = radio.set_frequency(snapshot.frequency_hz).await {
            error!("Failed to restore frequency {} Hz: {}", snapshot.frequency_hz, e);
            failed += 1;
        }
        drop(guard);

        if failed > 0 {
            return Err(TuneError::Restore(failed));
        }
        info!("Tune stopped, radio restored to {} Hz", snapshot.frequency_hz);
        Ok(snapshot)
    }
}

/// Setup steps that already reached the radio
#[derive(Debug, Default, Clone, Copy)]
struct Changes {
    mode: bool,
    power: bool,
}

async fn read_snapshot<R: RadioDriver>(radio: &mut R) -> Result<RadioSnapshot, RadioError> {
    Ok(RadioSnapshot {
        frequency_hz: radio.get_frequency().await?,
        mode: radio.get_mode().await?,
        power: radio.get_power().await?,
    })
}

/// Put back power then mode, whichever were changed. The frequency is set
/// last during setup, so it never needs undoing here.
async fn undo_setup<R: RadioDriver>(radio: &mut R, snapshot: &RadioSnapshot, changes: Changes) {
    if changes.power {
        if let Err(e) = radio.set_power(snapshot.power).await {
            error!("Failed to restore power {}%: {}", snapshot.power, e);
        }
    }
    if changes.mode {
        if let Err(e) = radio.set_mode(snapshot.mode).await {
            error!("Failed to restore mode {:#04x}: {}", snapshot.mode, e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offsets() {
        assert_eq!(tune_offset("USB"), 3000);
        assert_eq!(tune_offset("LSB"), -3000);
        assert_eq!(tune_offset("CW"), 5000);
        assert_eq!(tune_offset("UNKNOWN"), 5000);
    }

    #[test]
    fn test_frequency_prefers_plus_offset() {
        assert_eq!(tune_frequency(7_100_000, 3000), Some(7_103_000));
    }

    #[test]
    fn test_frequency_falls_back_to_minus_offset() {
        // 7 298 000 + 3000 is above the 40 m band edge
        assert_eq!(tune_frequency(7_298_000, 3000), Some(7_295_000));
    }

    #[test]
    fn test_frequency_lsb_goes_down_first() {
        assert_eq!(tune_frequency(7_100_000, -3000), Some(7_097_000));
    }

    #[test]
    fn test_frequency_out_of_band() {
        assert_eq!(tune_frequency(10_000_000, 5000), None);
    }

    #[test]
    fn test_frequency_near_zero_does_not_wrap() {
        assert_eq!(tune_frequency(1000, 5000), None);
    }
}
