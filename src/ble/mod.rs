//! Bluetooth Low Energy subsystem.
//!
//! This module drives the Nordic SoftDevice S140 in **Peripheral** role
//! and plays the host-stack side of the HID device seam:
//!
//! 1. **HID Server** - registers the HID-over-GATT service (report map,
//!    HID information, input report) and Device Information.
//! 2. **Peripheral** - advertises, accepts one central at a time, and feeds
//!    connection and readiness events into the [`MouseSession`].
//!
//! Keystrokes arrive from the console task and status lines go back to it,
//! through the channels defined in `main.rs`.
//!
//! [`MouseSession`]: hid_mouse_demo::MouseSession

pub mod hid_server;
pub mod peripheral;
