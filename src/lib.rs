//! Bluetooth HID mouse demo - host-testable core.
//!
//! Type `q`/`e` for left/right click and `w`/`a`/`s`/`d` to move the
//! pointer; each key becomes one boot-protocol mouse report sent over an
//! HID connection owned by the Bluetooth stack.
//!
//! This library holds the logic that does not depend on hardware: key
//! mapping, the report/frame types, the descriptor check, the service record,
//! and the single-report session. The embedded binary (`main.rs`, feature
//! `embedded`) wires it to the nRF52840 SoftDevice and a UART terminal.
//!
//! Usage: `cargo test --lib`

#![cfg_attr(not(test), no_std)]

pub mod config;
pub mod device;
pub mod error;
pub mod hid;

pub use device::{
    ConnectionHandle, HidDeviceHandler, HidEvent, HidStatus, HidTransport, MouseSession,
    SessionNotice, SessionState,
};
pub use error::{BleError, Error};
