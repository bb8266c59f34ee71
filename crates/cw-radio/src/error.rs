//! Error types for radio drivers

use std::io::{self, ErrorKind};
use std::time::Duration;

use cw_protocol::{ProtocolError, ValidationError};
use thiserror::Error;

/// Errors raised by the byte link to the radio
#[derive(Debug, Error)]
pub enum TransportError {
    /// I/O failure on the underlying stream
    #[error("I/O error: {0}")]
    Io(io::Error),

    /// No complete reply within the link timeout
    #[error("timed out after {0:?}")]
    Timeout(Duration),

    /// The peer closed the link
    #[error("link closed")]
    Closed,

    /// Reply grew past the accepted size without its terminator
    #[error("reply exceeded {0} bytes without terminator")]
    Overflow(usize),

    /// Serial port could not be opened
    #[error("serial port error: {0}")]
    Serial(#[from] tokio_serial::Error),
}

impl From<io::Error> for TransportError {
    fn from(err: io::Error) -> Self {
        match err.kind() {
            ErrorKind::UnexpectedEof | ErrorKind::BrokenPipe | ErrorKind::ConnectionAborted => {
                TransportError::Closed
            }
            _ => TransportError::Io(err),
        }
    }
}

/// Errors returned by every [`RadioDriver`](crate::RadioDriver) operation
#[derive(Debug, Error)]
pub enum RadioError {
    /// The link to the radio failed
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// The radio answered with something we could not accept
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// The requested value cannot be sent to this radio
    #[error("invalid value: {0}")]
    Validation(#[from] ValidationError),

    /// Radio model name not supported
    #[error("unsupported radio model: {0}")]
    UnknownModel(String),
}

impl RadioError {
    /// True when the failure came from the link timing out
    pub fn is_timeout(&self) -> bool {
        matches!(self, RadioError::Transport(TransportError::Timeout(_)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_eof_maps_to_closed() {
        let err: TransportError = io::Error::from(ErrorKind::UnexpectedEof).into();
        assert!(matches!(err, TransportError::Closed));

        let err: TransportError = io::Error::from(ErrorKind::PermissionDenied).into();
        assert!(matches!(err, TransportError::Io(_)));
    }

    #[test]
    fn test_is_timeout() {
        let err = RadioError::from(TransportError::Timeout(Duration::from_millis(5)));
        assert!(err.is_timeout());
        assert!(!RadioError::from(ProtocolError::Rejected(1)).is_timeout());
    }
}
