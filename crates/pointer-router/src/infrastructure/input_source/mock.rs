//! Mock input source for unit testing.
//!
//! Allows tests to inject synthetic [`InputEvent`]s as if they came from a
//! display server.

use std::sync::{
    mpsc::{self, Sender},
    Arc, Mutex,
};

use pointer_core::InputEvent;

use super::{CaptureError, InputSource};

/// A mock implementation of [`InputSource`] that allows tests to inject events.
pub struct MockInputSource {
    sender: Arc<Mutex<Option<Sender<InputEvent>>>>,
    injected: Arc<Mutex<u32>>,
}

impl MockInputSource {
    /// Creates a new mock input source.
    pub fn new() -> Self {
        Self {
            sender: Arc::new(Mutex::new(None)),
            injected: Arc::new(Mutex::new(0)),
        }
    }

    /// Injects a synthetic event.
    ///
    /// Panics if `start()` has not been called or if `stop()` has been called.
    pub fn inject_event(&self, event: InputEvent) {
        let guard = self.sender.lock().expect("lock poisoned");
        if let Some(ref sender) = *guard {
            sender
                .send(event)
                .expect("receiver has been dropped; call start() first");
            *self.injected.lock().expect("lock poisoned") += 1;
        } else {
            panic!("MockInputSource::inject_event called before start()");
        }
    }

    /// Returns the number of events injected since creation.
    pub fn injected_count(&self) -> u32 {
        *self.injected.lock().expect("lock poisoned")
    }
}

impl Default for MockInputSource {
    fn default() -> Self {
        Self::new()
    }
}

impl InputSource for MockInputSource {
    fn start(&self) -> Result<mpsc::Receiver<InputEvent>, CaptureError> {
        let (tx, rx) = mpsc::channel();
        *self.sender.lock().expect("lock poisoned") = Some(tx);
        Ok(rx)
    }

    fn stop(&self) {
        // Drop the sender to close the channel
        *self.sender.lock().expect("lock poisoned") = None;
    }
}
