//! In-memory radio for running the keyer without hardware
//!
//! Holds frequency, mode, power and PTT in memory and never fails. The mode
//! is stored by name, as a real rig's front panel would show it, so a code
//! outside the table reads back as the unknown sentinel.

use cw_protocol::{ModeTable, UNKNOWN_MODE_NAME};
use tracing::{info, warn};

use crate::driver::{RadioDriver, RadioModel};
use crate::error::RadioError;

/// Mode codes understood by the mock radio
pub const MODES: ModeTable =
    ModeTable::new(&[("LSB", 0x00), ("USB", 0x01), ("CW", 0x02), ("FM", 0x03)]);

/// Power-on frequency (40 m phone)
pub const DEFAULT_FREQUENCY_HZ: u32 = 7_280_000;

/// Power-on mode
pub const DEFAULT_MODE: &str = "LSB";

/// Power-on RF power (percent)
pub const DEFAULT_POWER: u8 = 50;

/// Software-only radio
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockRadio {
    frequency_hz: u32,
    mode: &'static str,
    power: u8,
    ptt: bool,
}

impl Default for MockRadio {
    fn default() -> Self {
        Self {
            frequency_hz: DEFAULT_FREQUENCY_HZ,
            mode: DEFAULT_MODE,
            power: DEFAULT_POWER,
            ptt: false,
        }
    }
}

impl MockRadio {
    /// Create a mock radio in its power-on state
    pub fn new() -> Self {
        Self::default()
    }

    /// Current PTT state
    pub fn ptt(&self) -> bool {
        self.ptt
    }

    /// Current mode name
    pub fn mode_name(&self) -> &'static str {
        self.mode
    }

    /// Current frequency without going through the driver
    pub fn frequency_hz(&self) -> u32 {
        self.frequency_hz
    }

    /// Current RF power
    pub fn power(&self) -> u8 {
        self.power
    }
}

impl RadioDriver for MockRadio {
    async fn init(&mut self) -> Result<(), RadioError> {
        info!("Mock radio initialized");
        Ok(())
    }

    async fn get_frequency(&mut self) -> Result<u32, RadioError> {
        info!("Mock frequency: {} Hz", self.frequency_hz);
        Ok(self.frequency_hz)
    }

    async fn set_frequency(&mut self, hz: u32) -> Result<(), RadioError> {
        self.frequency_hz = hz;
        info!("Mock frequency set to: {} Hz", hz);
        Ok(())
    }

    async fn get_mode(&mut self) -> Result<u8, RadioError> {
        Ok(MODES.code(self.mode))
    }

    async fn set_mode(&mut self, mode: u8) -> Result<(), RadioError> {
        self.mode = MODES.name(mode);
        if self.mode == UNKNOWN_MODE_NAME {
            warn!("Mock mode set to unknown code 0x{:02X}", mode);
        } else {
            info!("Mock mode set to: {}", self.mode);
        }
        Ok(())
    }

    async fn get_power(&mut self) -> Result<u8, RadioError> {
        Ok(self.power)
    }

    async fn set_power(&mut self, power: u8) -> Result<(), RadioError> {
        self.power = power;
        info!("Mock power level set to: {}", power);
        Ok(())
    }

    async fn set_ptt(&mut self, on: bool) -> Result<(), RadioError> {
        self.ptt = on;
        info!("Mock PTT {}", if on { "enabled" } else { "disabled" });
        Ok(())
    }

    fn mode_from_string(&self, name: &str) -> u8 {
        MODES.code(name)
    }

    fn mode_to_string(&self, mode: u8) -> &'static str {
        MODES.name(mode)
    }

    fn model(&self) -> RadioModel {
        RadioModel::Mock
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cw_protocol::MODE_UNKNOWN;

    #[tokio::test]
    async fn test_power_on_state() {
        let mut radio = MockRadio::new();
        assert_eq!(radio.get_frequency().await.unwrap(), 7_280_000);
        assert_eq!(radio.get_mode().await.unwrap(), 0x00);
        assert_eq!(radio.get_power().await.unwrap(), 50);
        assert!(!radio.ptt());
    }

    #[tokio::test]
    async fn test_state_is_kept() {
        let mut radio = MockRadio::new();
        radio.set_frequency(14_060_000).await.unwrap();
        radio.set_mode(0x02).await.unwrap();
        radio.set_power(5).await.unwrap();
        radio.set_ptt(true).await.unwrap();

        assert_eq!(radio.get_frequency().await.unwrap(), 14_060_000);
        assert_eq!(radio.mode_name(), "CW");
        assert_eq!(radio.get_power().await.unwrap(), 5);
        assert!(radio.ptt());
    }

    #[tokio::test]
    async fn test_unknown_mode_reads_back_as_sentinel() {
        let mut radio = MockRadio::new();
        radio.set_mode(0x42).await.unwrap();
        assert_eq!(radio.mode_name(), UNKNOWN_MODE_NAME);
        assert_eq!(radio.get_mode().await.unwrap(), MODE_UNKNOWN);
    }

    #[test]
    fn test_mode_table() {
        let radio = MockRadio::new();
        assert_eq!(radio.mode_from_string("FM"), 0x03);
        assert_eq!(radio.mode_from_string("CWR"), MODE_UNKNOWN);
        assert_eq!(radio.mode_to_string(0x01), "USB");
    }
}
