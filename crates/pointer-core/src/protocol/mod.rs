//! Protocol module: event shapes, button codes and the serial counter.

pub mod buttons;
pub mod messages;
pub mod sequence;

pub use buttons::{ButtonState, InvalidButtonState, MouseButton};
pub use messages::*;
pub use sequence::SerialCounter;
