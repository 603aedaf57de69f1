//! HID boot-protocol mouse report and its interrupt-channel frame.
//!
//! Report layout (descriptor-defined, 3 bytes):
//! ```text
//! Byte 0: Button bitfield
//!         Bit 0 = Left, Bit 1 = Right, Bits 2..7 = 0
//! Byte 1: X displacement (signed, -127..127)
//! Byte 2: Y displacement (signed, -127..127)
//! ```
//!
//! Interrupt frame (5 bytes):
//! ```text
//! Byte 0: 0xA1 (HIDP DATA | INPUT)
//! Byte 1: Buttons
//! Byte 2: X
//! Byte 3: Y
//! Byte 4: Wheel (always 0)
//! ```

use crate::config::INTERRUPT_REPORT_HEADER;

/// Left button bit.
pub const BUTTON_LEFT: u8 = 0x01;
/// Right button bit.
pub const BUTTON_RIGHT: u8 = 0x02;

/// Size of the report payload the descriptor declares (buttons, x, y).
pub const MOUSE_REPORT_SIZE: usize = 3;

/// Size of the interrupt message, header and wheel byte included.
pub const INTERRUPT_FRAME_SIZE: usize = 5;

/// Boot-protocol mouse report.
#[derive(Clone, Copy, Default, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MouseReport {
    /// Button bitfield (bit 0 = left, bit 1 = right).
    pub buttons: u8,
    /// Relative X movement (signed).
    pub x: i8,
    /// Relative Y movement (signed).
    pub y: i8,
    /// Scroll wheel delta. Always 0 for reports built from keys.
    pub wheel: i8,
}

impl MouseReport {
    /// Create an idle (no movement, no buttons) report.
    pub const fn empty() -> Self {
        Self {
            buttons: 0,
            x: 0,
            y: 0,
            wheel: 0,
        }
    }

    /// Report with only the given button bits set.
    pub const fn click(buttons: u8) -> Self {
        Self {
            buttons,
            x: 0,
            y: 0,
            wheel: 0,
        }
    }

    /// Report with relative movement and no buttons.
    pub const fn movement(x: i8, y: i8) -> Self {
        Self {
            buttons: 0,
            x,
            y,
            wheel: 0,
        }
    }

    /// Returns `true` when no buttons are pressed and there is no movement.
    pub fn is_idle(&self) -> bool {
        self.buttons == 0 && self.x == 0 && self.y == 0 && self.wheel == 0
    }

    /// Serialise the descriptor-sized payload (buttons, x, y).
    /// Returns the number of bytes written, or 0 if `buf` is too small.
    pub fn serialize(&self, buf: &mut [u8]) -> usize {
        if buf.len() < MOUSE_REPORT_SIZE {
            return 0;
        }
        buf[0] = self.buttons;
        buf[1] = self.x as u8;
        buf[2] = self.y as u8;
        MOUSE_REPORT_SIZE
    }
}

/// Fixed 5-byte message sent on the HID interrupt channel.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct InterruptFrame([u8; INTERRUPT_FRAME_SIZE]);

impl InterruptFrame {
    /// The frame sent when nothing is pending: `[0xA1, 0, 0, 0, 0]`.
    pub const IDLE: Self = Self([INTERRUPT_REPORT_HEADER, 0, 0, 0, 0]);

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Read back a frame handed to a transport.
    ///
    /// Returns `None` unless `message` is exactly one frame with the input
    /// report header.
    pub fn from_bytes(message: &[u8]) -> Option<Self> {
        let bytes: [u8; INTERRUPT_FRAME_SIZE] = message.try_into().ok()?;
        (bytes[0] == INTERRUPT_REPORT_HEADER).then_some(Self(bytes))
    }

    /// Report bytes after the transaction header, sized to the descriptor.
    pub fn report_payload(&self) -> &[u8] {
        &self.0[1..1 + MOUSE_REPORT_SIZE]
    }
}

impl From<MouseReport> for InterruptFrame {
    fn from(report: MouseReport) -> Self {
        // Wheel is not part of this device's descriptor and is always sent as 0.
        let mut bytes = [INTERRUPT_REPORT_HEADER, 0, 0, 0, 0];
        report.serialize(&mut bytes[1..1 + MOUSE_REPORT_SIZE]);
        Self(bytes)
    }
}

// HID report descriptor for a boot-protocol mouse

/// Length of [`MOUSE_REPORT_DESCRIPTOR`], for fixed-size GATT values.
pub const MOUSE_REPORT_DESCRIPTOR_LEN: usize = 50;

/// USB HID 1.11 Appendix B.1 boot mouse: 3 buttons, X and Y, no wheel.
pub const MOUSE_REPORT_DESCRIPTOR: &[u8; MOUSE_REPORT_DESCRIPTOR_LEN] = &[
    0x05, 0x01, // Usage Page (Generic Desktop)
    0x09, 0x02, // Usage (Mouse)
    0xA1, 0x01, // Collection (Application)
    0x09, 0x01, //   Usage (Pointer)
    0xA1, 0x00, //   Collection (Physical)
    //
    //   - Buttons (3 bits + 5 padding) -
    0x05, 0x09, //     Usage Page (Buttons)
    0x19, 0x01, //     Usage Minimum (Button 1)
    0x29, 0x03, //     Usage Maximum (Button 3)
    0x15, 0x00, //     Logical Minimum (0)
    0x25, 0x01, //     Logical Maximum (1)
    0x95, 0x03, //     Report Count (3)
    0x75, 0x01, //     Report Size (1)
    0x81, 0x02, //     Input (Data, Variable, Absolute)
    0x95, 0x01, //     Report Count (1)
    0x75, 0x05, //     Report Size (5)
    0x81, 0x01, //     Input (Constant) - padding
    //
    //   - X, Y displacement -
    0x05, 0x01, //     Usage Page (Generic Desktop)
    0x09, 0x30, //     Usage (X)
    0x09, 0x31, //     Usage (Y)
    0x15, 0x81, //     Logical Minimum (-127)
    0x25, 0x7F, //     Logical Maximum (127)
    0x75, 0x08, //     Report Size (8)
    0x95, 0x02, //     Report Count (2)
    0x81, 0x06, //     Input (Data, Variable, Relative)
    //
    0xC0, //   End Collection (Physical)
    0xC0, // End Collection (Application)
];
