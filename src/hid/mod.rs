//! HID report types, key mapping and descriptor checks.

pub mod keymap;
pub mod mouse;
pub mod report_protocol;

#[cfg(test)]
mod tests;

pub use keymap::{lookup_move_byte, lookup_move_key, MouseKey};
pub use mouse::{InterruptFrame, MouseReport, MOUSE_REPORT_DESCRIPTOR};
pub use report_protocol::MouseLayout;
