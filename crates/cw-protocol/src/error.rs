//! Error types for CAT protocol encoding and decoding

use thiserror::Error;

/// Errors caused by a malformed or unexpected reply from the radio
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    /// Radio answered a command with a non-zero acknowledgement byte
    #[error("command rejected by radio: 0x{0:02X}")]
    Rejected(u8),

    /// Invalid BCD nibble in a frequency field
    #[error("invalid BCD digit: 0x{0:02X}")]
    InvalidBcd(u8),

    /// Binary frame of the wrong size
    #[error("invalid frame length: expected {expected} bytes, got {actual}")]
    FrameLength { expected: usize, actual: usize },

    /// ASCII reply that does not match the expected fixed-width layout
    #[error("malformed response: {0}")]
    MalformedResponse(String),
}

/// Errors caused by a value the caller asked for that cannot be sent
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Frequency lies outside every amateur band
    #[error("frequency {0} Hz is outside all amateur bands")]
    OutOfBand(u32),

    /// Frequency does not fit the protocol's frequency field
    #[error("frequency {0} Hz cannot be encoded by this protocol")]
    FrequencyRange(u32),

    /// Power percentage outside the accepted range
    #[error("power {0}% is outside 0-100")]
    Power(u8),

    /// Mode code that cannot be represented on the wire
    #[error("mode code 0x{0:02X} cannot be encoded")]
    Mode(u8),
}
