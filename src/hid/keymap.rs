//! Terminal key → mouse report mapping.
//!
//! ```text
//! q: left click     e: right click
//! w: move up        s: move down
//! a: move left      d: move right
//! ```
//!
//! Matching is case-sensitive. Every other character is ignored.

use super::mouse::{MouseReport, BUTTON_LEFT, BUTTON_RIGHT};
use crate::config::MOVE_STEP;

/// Key bindings, printed by the console at startup.
pub const KEY_HELP: &str = "q: left click\r\n\
                            e: right click\r\n\
                            w: move up\r\n\
                            s: move down\r\n\
                            a: move left\r\n\
                            d: move right\r\n";

/// A recognized mouse control key.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MouseKey {
    LeftClick,
    RightClick,
    Up,
    Down,
    Left,
    Right,
}

impl MouseKey {
    pub fn from_char(character: char) -> Option<Self> {
        match character {
            'q' => Some(MouseKey::LeftClick),
            'e' => Some(MouseKey::RightClick),
            'w' => Some(MouseKey::Up),
            's' => Some(MouseKey::Down),
            'a' => Some(MouseKey::Left),
            'd' => Some(MouseKey::Right),
            _ => None,
        }
    }

    /// The report this key produces. Screen Y grows downwards.
    pub const fn report(self) -> MouseReport {
        match self {
            MouseKey::LeftClick => MouseReport::click(BUTTON_LEFT),
            MouseKey::RightClick => MouseReport::click(BUTTON_RIGHT),
            MouseKey::Up => MouseReport::movement(0, -MOVE_STEP),
            MouseKey::Down => MouseReport::movement(0, MOVE_STEP),
            MouseKey::Left => MouseReport::movement(-MOVE_STEP, 0),
            MouseKey::Right => MouseReport::movement(MOVE_STEP, 0),
        }
    }
}

/// Map one terminal character to the report it produces.
///
/// Returns `None` for characters with no binding.
pub fn lookup_move_key(character: char) -> Option<MouseReport> {
    MouseKey::from_char(character).map(MouseKey::report)
}

/// Map one raw terminal byte. Non-ASCII bytes are never recognized.
pub fn lookup_move_byte(byte: u8) -> Option<MouseReport> {
    if !byte.is_ascii() {
        return None;
    }
    lookup_move_key(byte as char)
}
