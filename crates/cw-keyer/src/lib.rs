//! CW Keyer Core
//!
//! Turns text into timed Morse keying and drives a transceiver for antenna
//! tuning.
//!
//! # Architecture
//!
//! - [`morse`], [`timing`], [`bands`]: the symbol table, PARIS timing and the
//!   amateur band plan
//! - [`key_line`]: single-owner access to the physical key and LED
//! - [`engine`]: a queue of messages keyed by one worker task
//! - [`tune`]: the retune, carrier, restore sequence
//! - [`trigger`]: short press sends, long press tunes
//! - [`keyer`]: everything above around one radio
//!
//! The worker and the tuner never key at the same time: both must hold the
//! key line, and whoever asks second is turned away instead of waiting.
//!
//! # Example
//!
//! ```rust,no_run
//! use cw_keyer::{Keyer, KeyerConfig, KeyOutput};
//! use cw_radio::MockRadio;
//!
//! struct Quiet;
//!
//! impl KeyOutput for Quiet {
//!     fn set_key(&self, _down: bool) {}
//!     fn set_led(&self, _on: bool) {}
//! }
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let keyer = Keyer::start(MockRadio::new(), Quiet, KeyerConfig::default(), "CQ CQ")?;
//! keyer.enqueue_transmission("CQ DE N0CALL", true).await?;
//! # Ok(())
//! # }
//! ```

pub mod bands;
pub mod config;
pub mod engine;
pub mod error;
pub mod key_line;
pub mod keyer;
pub mod morse;
pub mod timing;
pub mod trigger;
pub mod tune;

pub use config::KeyerConfig;
pub use engine::{TransmissionEngine, TransmissionJob, MESSAGE_MAX_LEN};
pub use error::{KeyLineBusy, ResourceError, TuneError};
pub use key_line::{KeyGuard, KeyLine, KeyOutput, LineOwner};
pub use keyer::{Keyer, KeyerStatus};
pub use trigger::{ButtonEdge, TriggerHandle};
pub use tune::{RadioSnapshot, TuneSequencer};
