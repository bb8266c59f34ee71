//! The keyer as one handle
//!
//! [`Keyer`] wires the key line, the transmission worker, the tune sequencer
//! and the button trigger around one radio, and exposes the entry points the
//! outside world uses.

use std::sync::Arc;

use cw_radio::{RadioDriver, RadioModel};
use serde::Serialize;
use tokio::sync::{watch, Mutex};
use tracing::info;

use crate::config::{self, KeyerConfig};
use crate::engine::{truncate_message, TransmissionEngine};
use crate::error::{ResourceError, TuneError};
use crate::key_line::{KeyLine, KeyOutput, LineOwner};
use crate::trigger::{ButtonEdge, TriggerHandle};
use crate::tune::{RadioSnapshot, TuneSequencer};

/// Point-in-time view of the keyer
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeyerStatus {
    /// A message is being sent
    pub busy: bool,
    /// A tune carrier is being held
    pub tuning: bool,
    /// Current sending speed
    pub wpm: u8,
    /// Radio model in use
    pub radio: RadioModel,
    /// Who holds the key line
    pub line: LineOwner,
    /// Messages waiting to be sent
    pub pending: usize,
}

/// A running keyer around a radio of type `R`
#[derive(Debug)]
pub struct Keyer<R> {
    radio: Arc<Mutex<R>>,
    model: RadioModel,
    key_line: KeyLine,
    engine: TransmissionEngine,
    tuner: Arc<TuneSequencer<R>>,
    trigger: TriggerHandle,
    config_tx: watch::Sender<KeyerConfig>,
    message_tx: watch::Sender<String>,
}

impl<R: RadioDriver + 'static> Keyer<R> {
    /// Start the worker and trigger tasks on the current runtime
    ///
    /// `message` is what a short press of the trigger sends.
    pub fn start(
        radio: R,
        output: impl KeyOutput,
        config: KeyerConfig,
        message: &str,
    ) -> Result<Self, ResourceError> {
        let model = radio.model();
        let radio = Arc::new(Mutex::new(radio));
        let key_line = KeyLine::new(output);
        let (config_tx, config_rx) = config::channel(config);
        let (message_tx, message_rx) = watch::channel(truncate_message(message).to_string());

        let engine = TransmissionEngine::start(config_rx.clone(), key_line.clone())?;
        let tuner = Arc::new(TuneSequencer::new(
            radio.clone(),
            key_line.clone(),
            config_rx.clone(),
        ));
        let trigger = TriggerHandle::spawn(tuner.clone(), engine.clone(), message_rx, config_rx)?;

        info!("Keyer started with {} radio", model);
        Ok(Self {
            radio,
            model,
            key_line,
            engine,
            tuner,
            trigger,
            config_tx,
            message_tx,
        })
    }

    /// Queue `text` for sending; with `key_enabled` false only the LED flashes
    pub async fn enqueue_transmission(
        &self,
        text: &str,
        key_enabled: bool,
    ) -> Result<(), ResourceError> {
        self.engine.enqueue_transmission(text, key_enabled).await
    }

    /// Queue the current stored message with keying enabled
    pub async fn send_current_message(&self) -> Result<(), ResourceError> {
        let text = self.message_tx.borrow().clone();
        self.engine.enqueue_transmission(&text, true).await
    }

    /// True while a message holds the key line
    pub fn is_busy(&self) -> bool {
        self.engine.is_busy()
    }

    /// True while a tune carrier is held
    pub fn is_tuning(&self) -> bool {
        self.key_line.owner() == LineOwner::Tuning
    }

    /// Start a tune carrier, returning its frequency
    pub async fn tune_trigger_start(&self) -> Result<u32, TuneError> {
        self.tuner.tune_start().await
    }

    /// Stop the tune carrier and restore the radio
    pub async fn tune_trigger_stop(&self) -> Result<RadioSnapshot, TuneError> {
        self.tuner.tune_stop().await
    }

    /// Post a trigger button edge; false if the edge was dropped
    pub fn button(&self, edge: ButtonEdge) -> bool {
        self.trigger.notify(edge)
    }

    /// Speed the next message will be sent at
    pub fn current_wpm(&self) -> u8 {
        self.config_tx.borrow().wpm
    }

    /// Change the speed, returning the value applied
    ///
    /// Out-of-range values fall back to the default speed. A message already
    /// being sent keeps its speed.
    pub fn set_wpm(&self, wpm: u8) -> u8 {
        config::publish_wpm(&self.config_tx, wpm)
    }

    /// Replace the whole configuration snapshot
    pub fn set_config(&self, config: KeyerConfig) {
        self.config_tx.send_replace(config.validated());
    }

    /// Current configuration snapshot
    pub fn config(&self) -> KeyerConfig {
        *self.config_tx.borrow()
    }

    /// Message a short press sends
    pub fn current_message(&self) -> String {
        self.message_tx.borrow().clone()
    }

    /// Change the message a short press sends
    pub fn set_current_message(&self, text: &str) {
        self.message_tx.send_replace(truncate_message(text).to_string());
    }

    /// Shared radio, for callers that query it directly
    pub fn radio(&self) -> &Arc<Mutex<R>> {
        &self.radio
    }

    /// Current state
    pub fn status(&self) -> KeyerStatus {
        let line = self.key_line.owner();
        KeyerStatus {
            busy: line == LineOwner::Transmitting,
            tuning: line == LineOwner::Tuning,
            wpm: self.current_wpm(),
            radio: self.model,
            line,
            pending: self.engine.pending(),
        }
    }
}
