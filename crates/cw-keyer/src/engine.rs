//! Morse transmission engine
//!
//! Messages are queued to a single worker task that keys them one at a time,
//! in order. The worker freezes the timing unit when it starts a message, so
//! a speed change takes effect from the next message on. A message in flight
//! runs to completion; there is no cancellation.
//!
//! While a message is being sent the worker owns the key line. If the tuner
//! holds the line when a message comes up, that message is dropped.

use std::time::Duration;

use tokio::runtime::Handle;
use tokio::sync::mpsc::{self, error::SendTimeoutError};
use tokio::sync::watch;
use tokio::time::sleep;
use tracing::{debug, info, warn};

use crate::config::KeyerConfig;
use crate::error::ResourceError;
use crate::key_line::{KeyGuard, KeyLine, LineOwner};
use crate::morse::{glyph_for, LETTER_SPACE, MARK_SPACE, WORD_SPACE};
use crate::timing::unit;

/// Messages that can wait behind the one being sent
pub const QUEUE_CAPACITY: usize = 10;

/// Longest message, in bytes
pub const MESSAGE_MAX_LEN: usize = 64;

/// How long an enqueue waits for room before giving up
pub const ENQUEUE_TIMEOUT: Duration = Duration::from_secs(1);

/// Truncate `text` to at most [`MESSAGE_MAX_LEN`] bytes on a char boundary
pub fn truncate_message(text: &str) -> &str {
    if text.len() <= MESSAGE_MAX_LEN {
        return text;
    }
    let mut end = MESSAGE_MAX_LEN;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    &text[..end]
}

/// One message to send
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransmissionJob {
    text: String,
    key_enabled: bool,
}

impl TransmissionJob {
    /// Create a job; text longer than [`MESSAGE_MAX_LEN`] bytes is cut short
    ///
    /// With `key_enabled` false only the LED flashes, the transmitter is
    /// never keyed.
    pub fn new(text: &str, key_enabled: bool) -> Self {
        Self {
            text: truncate_message(text).to_string(),
            key_enabled,
        }
    }

    /// The text to send
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Whether the transmitter is keyed
    pub fn key_enabled(&self) -> bool {
        self.key_enabled
    }
}

/// Handle to the transmission worker
#[derive(Debug, Clone)]
pub struct TransmissionEngine {
    jobs: mpsc::Sender<TransmissionJob>,
    key_line: KeyLine,
}

impl TransmissionEngine {
    /// Create the queue and spawn the worker on the current runtime
    pub fn start(
        config: watch::Receiver<KeyerConfig>,
        key_line: KeyLine,
    ) -> Result<Self, ResourceError> {
        let runtime = Handle::try_current().map_err(|_| ResourceError::NoRuntime)?;
        let (jobs, rx) = mpsc::channel(QUEUE_CAPACITY);

        runtime.spawn(run_transmission_worker(rx, config, key_line.clone()));
        info!("Morse code initialized");

        Ok(Self { jobs, key_line })
    }

    /// Queue a job, waiting up to [`ENQUEUE_TIMEOUT`] for room
    pub async fn enqueue(&self, job: TransmissionJob) -> Result<(), ResourceError> {
        debug!("Queueing message: {:?}", job.text());
        self.jobs
            .send_timeout(job, ENQUEUE_TIMEOUT)
            .await
            .map_err(|e| match e {
                SendTimeoutError::Timeout(job) => {
                    warn!("Queue full, dropping message: {:?}", job.text());
                    ResourceError::QueueFull
                }
                SendTimeoutError::Closed(_) => ResourceError::QueueClosed,
            })
    }

    /// Queue `text` for sending
    pub async fn enqueue_transmission(
        &self,
        text: &str,
        key_enabled: bool,
    ) -> Result<(), ResourceError> {
        self.enqueue(TransmissionJob::new(text, key_enabled)).await
    }

    /// True while a message holds the key line
    pub fn is_busy(&self) -> bool {
        self.key_line.owner() == LineOwner::Transmitting
    }

    /// Messages waiting behind the current one
    pub fn pending(&self) -> usize {
        QUEUE_CAPACITY - self.jobs.capacity()
    }
}

/// Worker loop: runs until every engine handle is dropped
async fn run_transmission_worker(
    mut jobs: mpsc::Receiver<TransmissionJob>,
    config: watch::Receiver<KeyerConfig>,
    key_line: KeyLine,
) {
    debug!("Waiting for message...");

    while let Some(job) = jobs.recv().await {
        let mut guard = match key_line.acquire_transmit() {
            Ok(guard) => guard,
            Err(busy) => {
                warn!("Dropping message {:?}: {}", job.text(), busy);
                continue;
            }
        };

        let wpm = config.borrow().wpm;
        info!("Processing message: {:?} at {} WPM", job.text(), wpm);
        send_job(&mut guard, &job, unit(wpm)).await;
        drop(guard);

        debug!("Waiting for message...");
    }

    info!("Transmission worker stopped");
}

/// Key one message with a fixed timing unit
///
/// Marks within a letter are one unit apart, letters three units apart, and
/// a space waits seven units. No gap follows the last mark of a letter that
/// is followed by a space or by the end of the message. Characters without
/// a glyph are skipped entirely.
pub async fn send_job(guard: &mut KeyGuard, job: &TransmissionJob, unit: Duration) {
    let mut chars = job.text().chars().peekable();

    while let Some(c) = chars.next() {
        if c == ' ' {
            sleep(unit * WORD_SPACE).await;
            continue;
        }

        let glyph = glyph_for(c);
        if glyph.is_empty() {
            debug!("No glyph for {:?}, skipping", c);
            continue;
        }

        for (i, mark) in glyph.iter().enumerate() {
            if job.key_enabled() {
                guard.key_down();
            }
            guard.set_led(true);
            sleep(unit * mark.units()).await;
            if job.key_enabled() {
                guard.key_up();
            }
            guard.set_led(false);

            if i + 1 < glyph.len() {
                sleep(unit * MARK_SPACE).await;
            }
        }

        if chars.peek().is_some_and(|&next| next != ' ') {
            sleep(unit * LETTER_SPACE).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_short_text_untouched() {
        assert_eq!(truncate_message("CQ CQ"), "CQ CQ");
    }

    #[test]
    fn test_truncate_long_text() {
        let text = "A".repeat(100);
        assert_eq!(truncate_message(&text).len(), MESSAGE_MAX_LEN);
    }

    #[test]
    fn test_truncate_respects_char_boundary() {
        // 63 ASCII bytes then a 2-byte char straddling the limit
        let text = format!("{}é", "A".repeat(63));
        assert_eq!(truncate_message(&text).len(), 63);
    }

    #[test]
    fn test_job_truncates() {
        let job = TransmissionJob::new(&"E".repeat(80), true);
        assert_eq!(job.text().len(), 64);
        assert!(job.key_enabled());
    }

    #[test]
    fn test_start_without_runtime_fails() {
        let (_tx, rx) = watch::channel(KeyerConfig::default());
        let line = KeyLine::new(NullOutput);
        assert_eq!(
            TransmissionEngine::start(rx, line).unwrap_err(),
            ResourceError::NoRuntime
        );
    }

    struct NullOutput;

    impl crate::key_line::KeyOutput for NullOutput {
        fn set_key(&self, _down: bool) {}
        fn set_led(&self, _on: bool) {}
    }
}
