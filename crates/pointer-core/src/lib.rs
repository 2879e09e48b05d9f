//! # pointer-core
//!
//! Surface registry, pointer state and focus resolution for a compositor's
//! pointer router.
//!
//! This crate is pure logic: no OS APIs, no sockets, no async runtime.  It is
//! used by `pointer-router`, which feeds it input and delivers the events it
//! produces to client sessions.
//!
//! # Architecture overview (for beginners)
//!
//! A compositor draws client *surfaces* (windows) at positions on one shared
//! desktop.  There is one mouse pointer.  Whichever surface is on top under
//! the pointer has *pointer focus*: its client receives `enter` when the
//! pointer arrives, `motion` in the surface's own coordinates while it stays,
//! `button` when the user clicks, and `leave` when the pointer goes away.
//!
//! - **`domain`** – The registry of surfaces (with stacking order and hit
//!   testing), the pointer state, and the [`FocusResolver`] that keeps focus
//!   in sync with both.
//!
//! - **`protocol`** – The shapes of inbound triggers ([`InputEvent`]) and
//!   outbound events ([`PointerEvent`]), evdev button codes, and the serial
//!   counter stamped on every delivered event.

pub mod domain;
pub mod protocol;

// Re-export the most-used types at the crate root so callers can write
// `pointer_core::SurfaceRegistry` instead of `pointer_core::domain::surface::SurfaceRegistry`.
pub use domain::focus::FocusResolver;
pub use domain::pointer::PointerState;
pub use domain::surface::{
    Rect, RegistryError, SessionId, Stacking, Surface, SurfaceId, SurfaceRegistry,
};
pub use protocol::buttons::{ButtonState, MouseButton, BTN_LEFT, BTN_MIDDLE, BTN_RIGHT};
pub use protocol::messages::{Delivery, InputEvent, PointerEvent, Routed};
pub use protocol::sequence::SerialCounter;
