//! CW Keyer CAT Protocol Library
//!
//! Wire codecs for the two Yaesu CAT dialects the keyer drives:
//!
//! - **Yaesu CAT**: 5-byte binary command format with BCD frequency encoding (FT-817/857/897)
//! - **Yaesu ASCII**: semicolon-terminated commands (FT-991/FT-991A/FTDX series)
//!
//! # Architecture
//!
//! Each protocol module provides:
//! - Command encoding to protocol-specific bytes, validating values first
//! - Strict reply decoding that rejects anything not matching the expected layout
//! - A [`ModeTable`] mapping mode names to that radio family's opcodes
//!
//! The codecs are pure: no I/O happens here. The `cw-radio` crate owns the
//! serial link and turns these frames into driver operations.
//!
//! # Example
//!
//! ```rust
//! use cw_protocol::yaesu::{FrequencyModeReport, YaesuCommand, MODES};
//!
//! let frame = YaesuCommand::SetFrequency { hz: 14_250_000 }.encode().unwrap();
//! assert_eq!(frame, [0x01, 0x42, 0x50, 0x00, 0x01]);
//!
//! let report = FrequencyModeReport::decode(&[0x00, 0x70, 0x74, 0x00, 0x02]).unwrap();
//! assert_eq!(report.hz, 7_074_000);
//! assert_eq!(MODES.name(report.mode), "CW");
//! ```

pub mod error;
pub mod mode;
pub mod yaesu;
pub mod yaesu_ascii;

pub use error::{ProtocolError, ValidationError};
pub use mode::{ModeTable, MODE_UNKNOWN, UNKNOWN_MODE_NAME};
