//! Event dispatcher: delivers routed pointer events to client sessions.
//!
//! The dispatcher is a pure forwarding layer.  It receives the ordered list of
//! `(session, event)` pairs produced by one focus-resolution pass, stamps each
//! event with a serial number, and hands it to an [`EventSink`].
//!
//! # Ordering and failures
//!
//! Events are delivered in the order they were produced, so each session sees
//! its own events in order.  Nothing is promised about interleaving between
//! sessions.
//!
//! A session that has gone away makes [`EventSink::deliver`] fail.  The
//! failure is reported once per batch as [`DispatchError::DeliveryFailed`] and
//! the rest of that batch's events for the same session are skipped, so a
//! session never receives a batch with a hole in the middle.  Pointer and
//! focus state are never rolled back because of a failed delivery.

use std::sync::Arc;

use pointer_core::{Delivery, Routed, SerialCounter, SessionId};
use thiserror::Error;
use tracing::{trace, warn};

/// Error type for event delivery.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DispatchError {
    #[error("delivery to session {0} failed: session is gone")]
    DeliveryFailed(SessionId),
}

/// Destination for outbound pointer events.
///
/// The infrastructure implementation writes to per-session channels; tests
/// record calls.  Delivery is fire-and-forget: implementations must not
/// block.
#[cfg_attr(test, mockall::automock)]
pub trait EventSink: Send + Sync {
    /// Delivers one event to a session's inbound event channel.
    fn deliver(&self, session: SessionId, delivery: Delivery) -> Result<(), DispatchError>;
}

/// Outcome of dispatching one batch.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DispatchReport {
    /// Events accepted by the sink.
    pub delivered: usize,
    /// Events not attempted because their session already failed in this batch.
    pub skipped: usize,
    /// One entry per session that could not be reached.
    pub failures: Vec<DispatchError>,
}

impl DispatchReport {
    /// Returns `true` if every event was delivered.
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Delivers batches of routed events through an [`EventSink`].
pub struct EventDispatcher {
    sink: Arc<dyn EventSink>,
    serials: SerialCounter,
}

impl EventDispatcher {
    pub fn new(sink: Arc<dyn EventSink>) -> Self {
        Self {
            sink,
            serials: SerialCounter::new(),
        }
    }

    /// Delivers `batch` in order.
    pub fn dispatch(&self, batch: Vec<Routed>) -> DispatchReport {
        let mut report = DispatchReport::default();
        let mut failed: Vec<SessionId> = Vec::new();

        for routed in batch {
            if failed.contains(&routed.session) {
                report.skipped += 1;
                continue;
            }

            let delivery = Delivery {
                serial: self.serials.next(),
                event: routed.event,
            };
            match self.sink.deliver(routed.session, delivery) {
                Ok(()) => {
                    trace!(
                        session = %routed.session,
                        surface = %delivery.event.surface(),
                        serial = delivery.serial,
                        event = ?delivery.event,
                        "delivered"
                    );
                    report.delivered += 1;
                }
                Err(err) => {
                    warn!(
                        session = %routed.session,
                        surface = %delivery.event.surface(),
                        %err,
                        "pointer event not delivered"
                    );
                    failed.push(routed.session);
                    report.failures.push(err);
                }
            }
        }
        report
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
