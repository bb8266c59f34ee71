//! Error types for the keyer

use cw_protocol::ValidationError;
use cw_radio::RadioError;
use thiserror::Error;

use crate::key_line::LineOwner;

/// Failures to set up or feed the transmission worker
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ResourceError {
    /// Called outside a tokio runtime, so no worker could be spawned
    #[error("no async runtime available to run the worker")]
    NoRuntime,

    /// The queue stayed full for the whole enqueue timeout
    #[error("transmission queue is full")]
    QueueFull,

    /// The worker has stopped
    #[error("transmission queue is closed")]
    QueueClosed,
}

/// The key line is already owned by someone else
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("key line busy ({0})")]
pub struct KeyLineBusy(pub LineOwner);

/// Failures of the tune sequence
#[derive(Debug, Error)]
pub enum TuneError {
    /// A message is being sent or a tune session is already running
    #[error(transparent)]
    Busy(#[from] KeyLineBusy),

    /// Reading frequency, mode or power failed; nothing was changed
    #[error("failed to read radio state: {0}")]
    Snapshot(#[source] RadioError),

    /// Changing mode, power or frequency failed
    #[error("failed to prepare radio for tuning: {0}")]
    Setup(#[source] RadioError),

    /// The radio has no CW mode
    #[error("radio has no {0} mode")]
    UnsupportedMode(&'static str),

    /// No tuning frequency lies inside an amateur band
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Stop requested with no tune session running
    #[error("not tuning")]
    NotTuning,

    /// Some restore steps failed after the carrier was dropped
    #[error("{0} restore step(s) failed")]
    Restore(usize),
}
