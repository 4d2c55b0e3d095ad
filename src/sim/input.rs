//! Button input for a single frame
//!
//! Edges (`JustPressed`/`JustReleased`) last exactly one frame. The engine only
//! reads them; the input layer calls [`InputState::settle`] after each step to
//! downgrade them to the sustained state.

use serde::{Deserialize, Serialize};

/// Four-valued button state, numbered as stored in the settings vector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[repr(i32)]
pub enum ButtonState {
    JustReleased = 0,
    #[default]
    Released = 1,
    Pressed = 2,
    JustPressed = 3,
}

impl ButtonState {
    /// Out-of-range values clamp to `Released`
    pub fn from_raw(raw: i32) -> Self {
        match raw {
            0 => ButtonState::JustReleased,
            2 => ButtonState::Pressed,
            3 => ButtonState::JustPressed,
            _ => ButtonState::Released,
        }
    }

    pub fn as_raw(self) -> i32 {
        self as i32
    }

    /// Pressed or just pressed
    #[inline]
    pub fn is_down(self) -> bool {
        matches!(self, ButtonState::Pressed | ButtonState::JustPressed)
    }

    #[inline]
    pub fn just_pressed(self) -> bool {
        self == ButtonState::JustPressed
    }

    /// Downgrade an edge to its sustained state
    pub fn settled(self) -> Self {
        match self {
            ButtonState::JustPressed => ButtonState::Pressed,
            ButtonState::JustReleased => ButtonState::Released,
            other => other,
        }
    }

    /// Next state given whether the physical button is held now
    pub fn update(self, held: bool) -> Self {
        match (self.is_down(), held) {
            (false, true) => ButtonState::JustPressed,
            (true, false) => ButtonState::JustReleased,
            _ => self,
        }
    }
}

/// The three logical buttons
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct InputState {
    pub action: ButtonState,
    pub left: ButtonState,
    pub right: ButtonState,
}

impl InputState {
    /// All buttons released
    pub fn released() -> Self {
        Self::default()
    }

    /// Build from raw settings values, clamping unknown values
    pub fn from_raw(action: i32, left: i32, right: i32) -> Self {
        Self {
            action: ButtonState::from_raw(action),
            left: ButtonState::from_raw(left),
            right: ButtonState::from_raw(right),
        }
    }

    /// Downgrade every edge; call once after each `step`
    pub fn settle(&mut self) {
        self.action = self.action.settled();
        self.left = self.left.settled();
        self.right = self.right.settled();
    }
}
