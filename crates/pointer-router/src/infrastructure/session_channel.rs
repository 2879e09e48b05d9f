//! Per-session event channels: the in-process transport for pointer events.
//!
//! Each connected client session owns the receiving end of an unbounded
//! `tokio` channel.  [`ChannelSink`] keeps the sending ends keyed by session id
//! and implements the application's [`EventSink`] on top of them.
//!
//! Sending on an unbounded channel never blocks and never waits for the
//! client, so a slow session cannot stall focus resolution for the others.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use pointer_core::{Delivery, SessionId};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, info};

use crate::application::dispatch::{DispatchError, EventSink};

/// [`EventSink`] that writes into one unbounded channel per session.
#[derive(Default)]
pub struct ChannelSink {
    sessions: Mutex<HashMap<SessionId, UnboundedSender<Delivery>>>,
}

impl ChannelSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens the event channel of a session and returns its receiving end.
    ///
    /// Connecting an already connected session replaces its channel; the old
    /// receiver sees the channel close.
    pub fn connect(&self, session: SessionId) -> UnboundedReceiver<Delivery> {
        let (tx, rx) = mpsc::unbounded_channel();
        if self.lock().insert(session, tx).is_some() {
            debug!(%session, "session reconnected; previous channel closed");
        } else {
            info!(%session, "session connected");
        }
        rx
    }

    /// Closes the event channel of a session.  Returns `false` if it was not
    /// connected.
    pub fn disconnect(&self, session: SessionId) -> bool {
        let removed = self.lock().remove(&session).is_some();
        if removed {
            info!(%session, "session disconnected");
        }
        removed
    }

    /// Closes every channel.
    pub fn disconnect_all(&self) {
        let mut sessions = self.lock();
        debug!(count = sessions.len(), "closing all session channels");
        sessions.clear();
    }

    /// Number of connected sessions.
    pub fn session_count(&self) -> usize {
        self.lock().len()
    }

    pub fn is_connected(&self, session: SessionId) -> bool {
        self.lock().contains_key(&session)
    }

    // A panic while holding the lock cannot leave the map half-updated, so a
    // poisoned lock is still safe to use.
    fn lock(&self) -> MutexGuard<'_, HashMap<SessionId, UnboundedSender<Delivery>>> {
        self.sessions.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl EventSink for ChannelSink {
    fn deliver(&self, session: SessionId, delivery: Delivery) -> Result<(), DispatchError> {
        let sessions = self.lock();
        let sender = sessions
            .get(&session)
            .ok_or(DispatchError::DeliveryFailed(session))?;
        sender
            .send(delivery)
            .map_err(|_| DispatchError::DeliveryFailed(session))
    }
}
