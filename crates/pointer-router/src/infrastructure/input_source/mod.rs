//! Input sources for the router.
//!
//! An input source produces the inbound triggers the router consumes: pointer
//! motion, button transitions, and surface/session lifecycle notices.  Events
//! are handed over through a channel so the producer never has to wait for
//! focus resolution to finish.
//!
//! # Testability
//!
//! The [`InputSource`] trait lets tests inject synthetic events through
//! [`mock::MockInputSource`] without a display server.  The binary replays a
//! fixed list of events from the config file with [`script::ScriptedInputSource`].

use std::sync::mpsc;

use pointer_core::InputEvent;

pub mod mock;
pub mod script;

/// Error type for input source operations.
#[derive(Debug, thiserror::Error)]
pub enum CaptureError {
    #[error("input source has already been stopped")]
    AlreadyStopped,
    #[error("input source failed to start: {0}")]
    StartFailed(String),
}

/// Trait abstracting inbound event production.
pub trait InputSource: Send {
    /// Starts the source and returns a receiver for its events.
    ///
    /// The channel closes when the source is stopped or runs out of events.
    fn start(&self) -> Result<mpsc::Receiver<InputEvent>, CaptureError>;
    /// Stops the source.  Events already queued stay readable.
    fn stop(&self);
}
