//! Input events fed to the game by the host event pump.

use crate::core::Point;

/// Keys the game reacts to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Key {
    Escape,
    Space,
    /// Any key without a binding.
    Other,
}

/// One input event.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputEvent {
    /// Pointer moved to a viewport position.
    PointerMoved(Point),
    /// Left button pressed at the last known pointer position.
    PointerClicked,
    Key(Key),
    /// Window closed.
    Quit,
}

impl From<Key> for InputEvent {
    fn from(key: Key) -> Self {
        InputEvent::Key(key)
    }
}
