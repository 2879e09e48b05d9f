//! Scripted input source: replays a fixed list of events.
//!
//! Used by the binary to drive the router from the `[[script]]` tables of the
//! config file.  With a non-zero step delay the events are fed from a
//! background thread, one per step, so the log reads like a live session.

use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        mpsc, Arc,
    },
    thread,
    time::Duration,
};

use pointer_core::InputEvent;
use tracing::debug;

use super::{CaptureError, InputSource};

/// Replays a recorded event list.
pub struct ScriptedInputSource {
    events: Vec<InputEvent>,
    step_delay: Duration,
    stopped: Arc<AtomicBool>,
}

impl ScriptedInputSource {
    /// Creates a source that hands out every event at once.
    pub fn new(events: Vec<InputEvent>) -> Self {
        Self::with_step_delay(events, Duration::ZERO)
    }

    /// Creates a source that waits `step_delay` before each event.
    pub fn with_step_delay(events: Vec<InputEvent>, step_delay: Duration) -> Self {
        Self {
            events,
            step_delay,
            stopped: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Number of events in the script.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Returns `true` once [`InputSource::stop`] has been called.
    ///
    /// Without a step delay every event is queued by `start`, so consumers
    /// check this between events to cut a replay short.
    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::Acquire)
    }
}

impl InputSource for ScriptedInputSource {
    fn start(&self) -> Result<mpsc::Receiver<InputEvent>, CaptureError> {
        if self.stopped.load(Ordering::Acquire) {
            return Err(CaptureError::AlreadyStopped);
        }
        let (tx, rx) = mpsc::channel();
        debug!(events = self.events.len(), delay = ?self.step_delay, "replaying script");

        if self.step_delay.is_zero() {
            for event in &self.events {
                // The receiver is still in our hands, so this cannot fail.
                let _ = tx.send(event.clone());
            }
            return Ok(rx);
        }

        let events = self.events.clone();
        let delay = self.step_delay;
        let stopped = Arc::clone(&self.stopped);
        thread::Builder::new()
            .name("script-replay".to_string())
            .spawn(move || {
                for event in events {
                    thread::sleep(delay);
                    if stopped.load(Ordering::Acquire) || tx.send(event).is_err() {
                        break;
                    }
                }
            })
            .map_err(|e| CaptureError::StartFailed(e.to_string()))?;
        Ok(rx)
    }

    fn stop(&self) {
        self.stopped.store(true, Ordering::Release);
    }
}
