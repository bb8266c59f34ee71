//! Yaesu binary CAT protocol (FT-817/857/897)
//!
//! Every command is a fixed 5-byte frame:
//!
//! ```text
//! [P1] [P2] [P3] [P4] [CMD]
//! ```
//!
//! - Bytes 0-3: parameters (meaning depends on the opcode)
//! - Byte 4: command opcode
//!
//! # Frequency Encoding
//! Frequencies travel as 8 packed BCD digits in bytes 0-3, most significant
//! digit in the high nibble of byte 0, with 10 Hz resolution.
//! Example: 14.250.00 MHz = `0x01 0x42 0x50 0x00`
//!
//! # Replies
//! Set commands are acknowledged with a single byte, `0x00` meaning success.
//! The read frequency/mode query returns a 5-byte frame: 4 BCD bytes
//! followed by the mode byte.

use crate::error::{ProtocolError, ValidationError};
use crate::mode::ModeTable;

/// Standard Yaesu command length
pub const COMMAND_LEN: usize = 5;

/// Length of the single-byte acknowledgement to set commands
pub const ACK_LEN: usize = 1;

/// Acknowledgement value meaning the command was accepted
pub const ACK_OK: u8 = 0x00;

/// Highest frequency the 8-digit, 10 Hz field can carry
pub const MAX_FREQUENCY_HZ: u32 = 999_999_990;

/// Yaesu command opcodes used by the keyer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum YaesuOpcode {
    /// Set frequency (P1-P4 = BCD freq)
    SetFrequency = 0x01,
    /// Read frequency and mode
    ReadFreqMode = 0x03,
    /// Set mode (P1 = mode)
    SetMode = 0x07,
    /// PTT on (TX)
    PttOn = 0x08,
    /// PTT off (RX)
    PttOff = 0x88,
}

impl TryFrom<u8> for YaesuOpcode {
    type Error = ProtocolError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0x01 => Ok(Self::SetFrequency),
            0x03 => Ok(Self::ReadFreqMode),
            0x07 => Ok(Self::SetMode),
            0x08 => Ok(Self::PttOn),
            0x88 => Ok(Self::PttOff),
            _ => Err(ProtocolError::MalformedResponse(format!(
                "Yaesu opcode 0x{:02X}",
                value
            ))),
        }
    }
}

/// Mode opcodes understood by the FT-857D family
pub const MODES: ModeTable = ModeTable::new(&[
    ("LSB", 0x00),
    ("USB", 0x01),
    ("CW", 0x02),
    ("CWR", 0x03),
    ("AM", 0x04),
    ("FM", 0x08),
    ("DIG", 0x0A),
    ("PKT", 0x0C),
    ("FMN", 0x88),
    ("DIGN", 0x8A),
    ("PKTN", 0x8C),
]);

/// Yaesu binary command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum YaesuCommand {
    /// Set frequency in Hz (sent with 10 Hz resolution)
    SetFrequency { hz: u32 },
    /// Read frequency and mode
    GetFrequencyMode,
    /// Set operating mode
    SetMode { mode: u8 },
    /// PTT on
    PttOn,
    /// PTT off
    PttOff,
}

impl YaesuCommand {
    /// The opcode byte that ends this command's frame
    pub fn opcode(&self) -> YaesuOpcode {
        match self {
            YaesuCommand::SetFrequency { .. } => YaesuOpcode::SetFrequency,
            YaesuCommand::GetFrequencyMode => YaesuOpcode::ReadFreqMode,
            YaesuCommand::SetMode { .. } => YaesuOpcode::SetMode,
            YaesuCommand::PttOn => YaesuOpcode::PttOn,
            YaesuCommand::PttOff => YaesuOpcode::PttOff,
        }
    }

    /// Number of reply bytes the radio sends for this command
    pub fn reply_len(&self) -> usize {
        match self {
            YaesuCommand::GetFrequencyMode => COMMAND_LEN,
            _ => ACK_LEN,
        }
    }

    /// Encode this command to its 5-byte frame
    pub fn encode(&self) -> Result<[u8; COMMAND_LEN], ValidationError> {
        let mut frame = [0u8; COMMAND_LEN];
        match self {
            YaesuCommand::SetFrequency { hz } => {
                frame[..4].copy_from_slice(&encode_bcd_frequency(*hz)?);
            }
            YaesuCommand::SetMode { mode } => frame[0] = *mode,
            YaesuCommand::GetFrequencyMode | YaesuCommand::PttOn | YaesuCommand::PttOff => {}
        }
        frame[4] = self.opcode() as u8;
        Ok(frame)
    }
}

/// Decoded reply to [`YaesuCommand::GetFrequencyMode`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrequencyModeReport {
    /// Frequency in Hz
    pub hz: u32,
    /// Mode opcode (see [`MODES`])
    pub mode: u8,
}

impl FrequencyModeReport {
    /// Decode a 5-byte frequency/mode reply
    pub fn decode(bytes: &[u8]) -> Result<Self, ProtocolError> {
        let frame: &[u8; COMMAND_LEN] = bytes.try_into().map_err(|_| ProtocolError::FrameLength {
            expected: COMMAND_LEN,
            actual: bytes.len(),
        })?;
        let hz = decode_bcd_frequency(&[frame[0], frame[1], frame[2], frame[3]])?;
        Ok(Self { hz, mode: frame[4] })
    }
}

/// Check a single-byte acknowledgement
pub fn check_ack(bytes: &[u8]) -> Result<(), ProtocolError> {
    match bytes {
        [ACK_OK] => Ok(()),
        [other] => Err(ProtocolError::Rejected(*other)),
        _ => Err(ProtocolError::FrameLength {
            expected: ACK_LEN,
            actual: bytes.len(),
        }),
    }
}

/// Convert a frequency in Hz to 4 big-endian BCD bytes (10 Hz resolution)
pub fn encode_bcd_frequency(hz: u32) -> Result<[u8; 4], ValidationError> {
    if hz > MAX_FREQUENCY_HZ {
        return Err(ValidationError::FrequencyRange(hz));
    }

    let mut remaining = hz / 10;
    let mut result = [0u8; 4];

    for byte in result.iter_mut().rev() {
        let low = (remaining % 10) as u8;
        remaining /= 10;
        let high = (remaining % 10) as u8;
        remaining /= 10;
        *byte = (high << 4) | low;
    }

    Ok(result)
}

/// Convert 4 big-endian BCD bytes (10 Hz resolution) to a frequency in Hz
pub fn decode_bcd_frequency(bytes: &[u8; 4]) -> Result<u32, ProtocolError> {
    let mut freq: u32 = 0;

    for &byte in bytes {
        let high = (byte >> 4) & 0x0F;
        let low = byte & 0x0F;
        if high > 9 || low > 9 {
            return Err(ProtocolError::InvalidBcd(byte));
        }
        freq = freq * 100 + u32::from(high) * 10 + u32::from(low);
    }

    Ok(freq * 10)
}
