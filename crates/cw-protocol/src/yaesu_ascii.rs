//! Yaesu ASCII CAT Protocol Implementation
//!
//! Modern Yaesu radios (FT-991, FT-991A, FTDX series) use an ASCII protocol
//! with semicolon-terminated commands. Each command is a 2-letter opcode
//! followed by fixed-width fields:
//!
//! - Frequency uses 9 digits (1 Hz resolution): `FA014250000;`
//! - Mode uses a single digit: `MD3;` (codes above 9 use a hex digit)
//! - RF power uses 3 digits: `PC005;`
//! - Transmit: `TX1;` (on) / `TX0;` (off)
//!
//! Queries are the bare opcode (`FA;`) and the reply repeats the opcode
//! with the value filled in. Set commands are not acknowledged.
//!
//! # References
//! - [FT-991A CAT Manual](https://yaesu.com/Files/4CB893D7-1018-01AF-FA97E9E9AD48B50C/FT-991A_CAT_OM_ENG_1711-D.pdf)

use crate::error::{ProtocolError, ValidationError};
use crate::mode::ModeTable;

/// Every command and reply ends with this byte
pub const TERMINATOR: u8 = b';';

/// Maximum reply length accepted before the link is considered garbled
pub const MAX_RESPONSE_LEN: usize = 64;

/// Yaesu ASCII frequency digit count (9 digits = 1 Hz resolution up to 999 MHz)
const FREQ_DIGITS: usize = 9;

const MODE_DIGITS: usize = 1;

const POWER_DIGITS: usize = 3;

/// Highest frequency the 9-digit field can carry
pub const MAX_FREQUENCY_HZ: u32 = 999_999_999;

/// Highest accepted RF power setting (percent)
pub const MAX_POWER: u8 = 100;

/// Mode codes understood by the FT-991A family
pub const MODES: ModeTable = ModeTable::new(&[
    ("LSB", 1),
    ("USB", 2),
    ("CW", 3),
    ("FM", 4),
    ("AM", 5),
    ("CWR", 7),
    ("DIG", 9),
    ("PKT", 10),
]);

/// Yaesu ASCII protocol command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum YaesuAsciiCommand {
    /// Query VFO A frequency: `FA;`
    GetFrequency,
    /// Set VFO A frequency: `FA014250000;`
    SetFrequency(u32),
    /// Query mode: `MD;`
    GetMode,
    /// Set mode: `MD3;`
    SetMode(u8),
    /// Query RF power: `PC;`
    GetPower,
    /// Set RF power: `PC005;`
    SetPower(u8),
    /// Transmit on/off: `TX1;` / `TX0;`
    Transmit(bool),
}

impl YaesuAsciiCommand {
    /// Returns true if the radio answers this command
    pub fn expects_reply(&self) -> bool {
        matches!(self, Self::GetFrequency | Self::GetMode | Self::GetPower)
    }

    /// Encode this command to its wire string
    pub fn encode(&self) -> Result<String, ValidationError> {
        let cmd = match self {
            Self::GetFrequency => "FA;".to_string(),
            Self::SetFrequency(hz) => {
                if *hz > MAX_FREQUENCY_HZ {
                    return Err(ValidationError::FrequencyRange(*hz));
                }
                format!("FA{:0width$};", hz, width = FREQ_DIGITS)
            }
            Self::GetMode => "MD;".to_string(),
            Self::SetMode(mode) => {
                let digit = char::from_digit(u32::from(*mode), 16)
                    .ok_or(ValidationError::Mode(*mode))?
                    .to_ascii_uppercase();
                format!("MD{};", digit)
            }
            Self::GetPower => "PC;".to_string(),
            Self::SetPower(power) => {
                if *power > MAX_POWER {
                    return Err(ValidationError::Power(*power));
                }
                format!("PC{:0width$};", power, width = POWER_DIGITS)
            }
            Self::Transmit(on) => format!("TX{};", u8::from(*on)),
        };
        Ok(cmd)
    }
}

/// Encode a set-frequency command
pub fn encode_set_frequency(hz: u32) -> Result<String, ValidationError> {
    YaesuAsciiCommand::SetFrequency(hz).encode()
}

/// Parse a `FA#########;` reply
pub fn parse_frequency_response(resp: impl AsRef<[u8]>) -> Result<u32, ProtocolError> {
    parse_field(resp.as_ref(), "FA", FREQ_DIGITS, 10)
}

/// Parse a `MD#;` reply
pub fn parse_mode_response(resp: impl AsRef<[u8]>) -> Result<u8, ProtocolError> {
    let mode = parse_field(resp.as_ref(), "MD", MODE_DIGITS, 16)?;
    // a single hex digit always fits
    Ok(mode as u8)
}

/// Parse a `PC###;` reply
pub fn parse_power_response(resp: impl AsRef<[u8]>) -> Result<u8, ProtocolError> {
    let resp = resp.as_ref();
    let power = parse_field(resp, "PC", POWER_DIGITS, 10)?;
    u8::try_from(power)
        .ok()
        .filter(|p| *p <= MAX_POWER)
        .ok_or_else(|| malformed(resp))
}

/// Match `<prefix><width digits>;` exactly and return the digits' value
fn parse_field(resp: &[u8], prefix: &str, width: usize, radix: u32) -> Result<u32, ProtocolError> {
    let body = resp
        .strip_prefix(prefix.as_bytes())
        .and_then(|rest| rest.strip_suffix(&[TERMINATOR]))
        .filter(|digits| digits.len() == width)
        .ok_or_else(|| malformed(resp))?;

    let mut value = 0u32;
    for &b in body {
        let digit = char::from(b).to_digit(radix).ok_or_else(|| malformed(resp))?;
        value = value * radix + digit;
    }
    Ok(value)
}

fn malformed(resp: &[u8]) -> ProtocolError {
    let text = String::from_utf8_lossy(resp).into_owned();
    tracing::debug!("Failed to parse Yaesu ASCII reply: {:?}", text);
    ProtocolError::MalformedResponse(text)
}
