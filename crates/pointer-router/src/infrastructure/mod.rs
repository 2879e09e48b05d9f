//! Infrastructure layer for the pointer router.
//!
//! Contains the adapters around the use case: inbound event sources,
//! per-session event channels, and configuration storage.
//!
//! **Dependency rule**: this layer may depend on `application` and
//! `pointer_core`, but MUST NOT be imported by the `application` or domain
//! layers.

pub mod input_source;
pub mod session_channel;
pub mod storage;
