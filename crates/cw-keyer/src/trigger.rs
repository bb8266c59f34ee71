//! Button trigger task
//!
//! The edge source (an interrupt handler, a GPIO poller, the console) only
//! posts [`ButtonEdge`]s with a non-blocking send. All timing happens here:
//!
//! - release before the long-press threshold sends the current message
//! - holding past the threshold starts a tune
//! - release after that stops it
//!
//! Repeated edges of the same kind are ignored.

use std::sync::Arc;

use cw_radio::RadioDriver;
use tokio::runtime::Handle;
use tokio::sync::{mpsc, watch};
use tokio::time::{sleep_until, Instant};
use tracing::{debug, info, warn};

use crate::config::KeyerConfig;
use crate::engine::TransmissionEngine;
use crate::error::ResourceError;
use crate::tune::TuneSequencer;

/// Edges that can be buffered before new ones are dropped
pub const EDGE_QUEUE_CAPACITY: usize = 8;

/// A change of the trigger button
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonEdge {
    /// Button went down
    Pressed,
    /// Button came up
    Released,
}

/// Posts edges to the trigger task
#[derive(Debug, Clone)]
pub struct TriggerHandle {
    edges: mpsc::Sender<ButtonEdge>,
}

impl TriggerHandle {
    /// Spawn the trigger task on the current runtime
    pub fn spawn<R>(
        tuner: Arc<TuneSequencer<R>>,
        engine: TransmissionEngine,
        message: watch::Receiver<String>,
        config: watch::Receiver<KeyerConfig>,
    ) -> Result<Self, ResourceError>
    where
        R: RadioDriver + 'static,
    {
        let runtime = Handle::try_current().map_err(|_| ResourceError::NoRuntime)?;
        let (edges, rx) = mpsc::channel(EDGE_QUEUE_CAPACITY);
        runtime.spawn(run_trigger_task(rx, tuner, engine, message, config));
        Ok(Self { edges })
    }

    /// Post an edge without waiting; false if it was dropped
    pub fn notify(&self, edge: ButtonEdge) -> bool {
        self.edges.try_send(edge).is_ok()
    }
}

async fn run_trigger_task<R: RadioDriver>(
    mut edges: mpsc::Receiver<ButtonEdge>,
    tuner: Arc<TuneSequencer<R>>,
    engine: TransmissionEngine,
    message: watch::Receiver<String>,
    config: watch::Receiver<KeyerConfig>,
) {
    info!("Button trigger ready");

    let mut pressed = false;
    let mut long_press: Option<Instant> = None;
    let mut tuning = false;

    loop {
        tokio::select! {
            edge = edges.recv() => match edge {
                Some(ButtonEdge::Pressed) => {
                    if pressed {
                        continue;
                    }
                    pressed = true;
                    long_press = Some(Instant::now() + config.borrow().long_press());
                    debug!("Button pressed");
                }
                Some(ButtonEdge::Released) => {
                    if !pressed {
                        continue;
                    }
                    pressed = false;

                    if tuning {
                        tuning = false;
                        info!("Button released after long press, stopping tune");
                        if let Err(e) = tuner.tune_stop().await {
                            warn!("Tune stop: {}", e);
                        }
                    } else if long_press.take().is_some() {
                        let text = message.borrow().clone();
                        info!("Short press, sending {:?}", text);
                        if let Err(e) = engine.enqueue_transmission(&text, true).await {
                            warn!("Failed to queue message: {}", e);
                        }
                    }
                }
                None => break,
            },

            _ = sleep_until(long_press.unwrap_or_else(Instant::now)), if long_press.is_some() => {
                long_press = None;
                info!("Long press detected, starting tune");
                match tuner.tune_start().await {
                    Ok(hz) => {
                        tuning = true;
                        debug!("Tune carrier on {} Hz", hz);
                    }
                    Err(e) => warn!("Tune start: {}", e),
                }
            }
        }
    }

    if tuning {
        if let Err(e) = tuner.tune_stop().await {
            warn!("Tune stop on shutdown: {}", e);
        }
    }
    info!("Button trigger stopped");
}
