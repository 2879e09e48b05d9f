//! Inbound triggers and outbound pointer events.
//!
//! Only the *shape* of the events is defined here; how a transport encodes
//! them for a client is up to the transport.  Both enums derive serde with an
//! internal `type` tag so they can be written in TOML or JSON, e.g.:
//!
//! ```toml
//! type = "pointer_moved"
//! x = 150
//! y = 150
//! ```

use serde::{Deserialize, Serialize};

use crate::domain::surface::{SessionId, SurfaceId};
use crate::protocol::buttons::ButtonState;

// ── Outbound ──────────────────────────────────────────────────────────────────

/// An event delivered to the client session that owns `surface`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PointerEvent {
    /// The pointer entered the surface at the given local position.
    Enter {
        surface: SurfaceId,
        local_x: i32,
        local_y: i32,
    },
    /// The pointer left the surface.
    Leave { surface: SurfaceId },
    /// The pointer moved within the focused surface.
    Motion {
        surface: SurfaceId,
        local_x: i32,
        local_y: i32,
    },
    /// A button changed state while the surface had focus.
    Button {
        surface: SurfaceId,
        code: u32,
        state: ButtonState,
    },
}

impl PointerEvent {
    /// Returns the surface the event refers to.
    pub fn surface(&self) -> SurfaceId {
        match *self {
            PointerEvent::Enter { surface, .. }
            | PointerEvent::Leave { surface }
            | PointerEvent::Motion { surface, .. }
            | PointerEvent::Button { surface, .. } => surface,
        }
    }
}

/// A pointer event addressed to a session, as produced by the focus resolver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Routed {
    pub session: SessionId,
    pub event: PointerEvent,
}

impl Routed {
    pub fn new(session: SessionId, event: PointerEvent) -> Self {
        Self { session, event }
    }
}

/// What a session actually receives: the event plus its serial number.
///
/// Serials increase by one per delivered event (wrapping at `u32::MAX`) and
/// let clients match requests such as "set cursor" to the enter they follow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Delivery {
    pub serial: u32,
    pub event: PointerEvent,
}

// ── Inbound ───────────────────────────────────────────────────────────────────

/// A trigger accepted by the router.  Each one is processed to completion
/// before the next is looked at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InputEvent {
    /// The pointer moved to an absolute global position.
    PointerMoved { x: i32, y: i32 },
    /// A button was pressed or released.
    ButtonChanged { code: u32, state: ButtonState },
    /// A session created a surface.  Without `z_order` the surface goes on top.
    SurfaceAdded {
        id: SurfaceId,
        session: SessionId,
        x: i32,
        y: i32,
        width: i32,
        height: i32,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        z_order: Option<i32>,
    },
    /// A session destroyed a surface.
    SurfaceRemoved { id: SurfaceId },
    /// A surface was moved and/or resized.
    SurfaceGeometryChanged {
        id: SurfaceId,
        x: i32,
        y: i32,
        width: i32,
        height: i32,
    },
    /// A surface was raised to the top of the stack.
    SurfaceRaised { id: SurfaceId },
    /// A session disconnected; all of its surfaces go away.
    SessionClosed { session: SessionId },
}
