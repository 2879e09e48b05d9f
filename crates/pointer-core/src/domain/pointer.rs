//! State of the single logical pointer device.
//!
//! Holds the global position, the per-button press table and the id of the
//! focused surface.  Nothing here performs hit testing: the position and
//! buttons are plain state, and `focus` is written only by
//! [`FocusResolver`](crate::domain::focus::FocusResolver), which keeps it
//! consistent with the surface registry.

use std::collections::HashMap;

use crate::domain::surface::SurfaceId;
use crate::protocol::buttons::ButtonState;

/// Position, buttons and focus of the pointer.
#[derive(Debug, Clone, Default)]
pub struct PointerState {
    x: i32,
    y: i32,
    /// Id of the focused surface.  Only an id: the surface itself is looked
    /// up in the registry each time, so removal can never leave it dangling.
    focus: Option<SurfaceId>,
    /// Only pressed buttons are stored; a missing entry means released.
    buttons: HashMap<u32, ButtonState>,
}

impl PointerState {
    /// Creates a pointer at `(x, y)` with no focus and every button released.
    pub fn new(x: i32, y: i32) -> Self {
        Self {
            x,
            y,
            ..Self::default()
        }
    }

    /// Returns the current global position.
    pub fn position(&self) -> (i32, i32) {
        (self.x, self.y)
    }

    /// Moves the pointer and returns the previous position.
    pub fn set_position(&mut self, x: i32, y: i32) -> (i32, i32) {
        let prev = (self.x, self.y);
        self.x = x;
        self.y = y;
        prev
    }

    /// Returns the focused surface, if any.
    pub fn focus(&self) -> Option<SurfaceId> {
        self.focus
    }

    pub(crate) fn set_focus(&mut self, focus: Option<SurfaceId>) {
        self.focus = focus;
    }

    /// Returns the state of a button.  Unknown codes are released.
    pub fn button_state(&self, code: u32) -> ButtonState {
        self.buttons.get(&code).copied().unwrap_or_default()
    }

    /// Records a button transition and returns the previous state.
    pub fn set_button(&mut self, code: u32, state: ButtonState) -> ButtonState {
        let prev = match state {
            ButtonState::Pressed => self.buttons.insert(code, state),
            ButtonState::Released => self.buttons.remove(&code),
        };
        prev.unwrap_or_default()
    }

    /// Returns the codes of all pressed buttons in ascending order.
    pub fn pressed_buttons(&self) -> Vec<u32> {
        let mut codes: Vec<u32> = self.buttons.keys().copied().collect();
        codes.sort_unstable();
        codes
    }
}
