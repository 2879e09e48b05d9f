//! Pointer button codes and button state.
//!
//! Button codes use the Linux evdev numbering (`linux/input-event-codes.h`),
//! which is also what the Wayland `wl_pointer.button` event carries.  Any
//! `u32` is accepted as a code; the [`MouseButton`] enum only names the
//! common ones.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const BTN_LEFT: u32 = 0x110;
pub const BTN_RIGHT: u32 = 0x111;
pub const BTN_MIDDLE: u32 = 0x112;
pub const BTN_SIDE: u32 = 0x113;
pub const BTN_EXTRA: u32 = 0x114;

/// Press/release state of a single button.
///
/// The wire values match `wl_pointer.button_state`: released = 0, pressed = 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ButtonState {
    #[default]
    Released,
    Pressed,
}

impl ButtonState {
    /// Returns the protocol wire value.
    pub fn wire_value(self) -> u32 {
        match self {
            ButtonState::Released => 0,
            ButtonState::Pressed => 1,
        }
    }
}

/// A wire value that is neither released (0) nor pressed (1).
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
#[error("invalid button state wire value: {0}")]
pub struct InvalidButtonState(pub u32);

impl TryFrom<u32> for ButtonState {
    type Error = InvalidButtonState;

    fn try_from(value: u32) -> Result<Self, InvalidButtonState> {
        match value {
            0 => Ok(ButtonState::Released),
            1 => Ok(ButtonState::Pressed),
            other => Err(InvalidButtonState(other)),
        }
    }
}

impl fmt::Display for ButtonState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ButtonState::Released => f.write_str("released"),
            ButtonState::Pressed => f.write_str("pressed"),
        }
    }
}

/// The named buttons of a typical five-button mouse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
    /// Thumb button, usually "back".
    Side,
    /// Thumb button, usually "forward".
    Extra,
}

impl MouseButton {
    /// Returns the evdev code for this button.
    pub fn code(self) -> u32 {
        match self {
            MouseButton::Left => BTN_LEFT,
            MouseButton::Right => BTN_RIGHT,
            MouseButton::Middle => BTN_MIDDLE,
            MouseButton::Side => BTN_SIDE,
            MouseButton::Extra => BTN_EXTRA,
        }
    }

    /// Maps an evdev code back to a named button, if it is one.
    pub fn from_code(code: u32) -> Option<Self> {
        match code {
            BTN_LEFT => Some(MouseButton::Left),
            BTN_RIGHT => Some(MouseButton::Right),
            BTN_MIDDLE => Some(MouseButton::Middle),
            BTN_SIDE => Some(MouseButton::Side),
            BTN_EXTRA => Some(MouseButton::Extra),
            _ => None,
        }
    }
}
