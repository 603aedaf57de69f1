//! HID Report Descriptor walker for mouse descriptors.
//!
//! The device registers one fixed report descriptor at startup. Before it
//! does, the descriptor is walked once to confirm that it describes a mouse
//! and that its input report matches the frame this device sends.
//!
//! ## HID Report Descriptor Structure
//!
//! A Report Descriptor is a sequence of short items:
//! - Usage Page: Category of usages (generic desktop, buttons, ...)
//! - Usage / Usage Minimum / Usage Maximum: functions within a page
//! - Report ID: Identifies which report follows (if multiple)
//! - Report Size: Bits per field
//! - Report Count: Number of fields
//! - Input/Output/Feature: Direction of the report
//! - Collection / End Collection: grouping
//!
//! ## Limitations
//!
//! - Long items are skipped
//! - Push/Pop state is not supported
//! - Only the low 16 bits of extended usages are kept

use heapless::Vec;

/// Usage page codes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum UsagePage {
    /// Generic Desktop (mouse, keyboard, joystick).
    GenericDesktop,
    /// Button.
    Button,
    /// Unknown/unsupported.
    Unknown(u16),
}

impl From<u16> for UsagePage {
    fn from(code: u16) -> Self {
        match code {
            0x01 => UsagePage::GenericDesktop,
            0x09 => UsagePage::Button,
            other => UsagePage::Unknown(other),
        }
    }
}

/// Generic Desktop usage codes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DesktopUsage {
    Pointer,
    Mouse,
    X,
    Y,
    Wheel,
    Unknown(u16),
}

impl From<u16> for DesktopUsage {
    fn from(code: u16) -> Self {
        match code {
            0x01 => DesktopUsage::Pointer,
            0x02 => DesktopUsage::Mouse,
            0x30 => DesktopUsage::X,
            0x31 => DesktopUsage::Y,
            0x38 => DesktopUsage::Wheel,
            other => DesktopUsage::Unknown(other),
        }
    }
}

/// Input flag bit 0: Constant (padding) rather than Data.
const INPUT_CONSTANT: u32 = 0x01;

/// Usages buffered between two main items.
const MAX_LOCAL_USAGES: usize = 8;

/// Input report layout of a mouse descriptor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MouseLayout {
    /// Number of button fields.
    pub buttons: u8,
    pub has_x: bool,
    pub has_y: bool,
    pub has_wheel: bool,
    /// Report ID of the mouse input, when the descriptor uses IDs.
    pub report_id: Option<u8>,
    /// Total input bits inside the mouse collection, padding included.
    pub input_bits: u16,
}

impl MouseLayout {
    /// Input report size in whole bytes (report ID byte excluded).
    pub fn input_bytes(&self) -> usize {
        (self.input_bits as usize).div_ceil(8)
    }

    /// Parse a HID Report Descriptor.
    ///
    /// Returns `None` unless a Generic Desktop Mouse or Pointer collection
    /// contains at least one data input, or if the input size or button
    /// count does not fit the layout fields.
    pub fn parse(data: &[u8]) -> Option<Self> {
        let mut layout = MouseLayout {
            buttons: 0,
            has_x: false,
            has_y: false,
            has_wheel: false,
            report_id: None,
            input_bits: 0,
        };
        let mut has_data_input = false;

        // Global state.
        let mut usage_page = UsagePage::Unknown(0);
        let mut report_id: u8 = 0;
        let mut report_size: u16 = 0;
        let mut report_count: u16 = 0;

        // Local state, cleared after every main item.
        let mut usages: Vec<u16, MAX_LOCAL_USAGES> = Vec::new();

        // Collection nesting.
        let mut depth: u8 = 0;
        let mut mouse_depth: Option<u8> = None;

        let mut i = 0;
        while i < data.len() {
            let prefix = data[i];
            let tag = (prefix >> 4) & 0x0F;
            let item_type = (prefix >> 2) & 0x03;
            let size = match prefix & 0x03 {
                0 => 0,
                1 => 1,
                2 => 2,
                _ => 4,
            };

            // Long item: bDataSize follows the prefix.
            if prefix == 0xFE {
                let Some(&long_size) = data.get(i + 1) else {
                    break;
                };
                i += 3 + long_size as usize;
                continue;
            }

            if i + 1 + size > data.len() {
                break;
            }

            let value: u32 = match size {
                0 => 0,
                1 => data[i + 1] as u32,
                2 => u16::from_le_bytes([data[i + 1], data[i + 2]]) as u32,
                _ => u32::from_le_bytes([data[i + 1], data[i + 2], data[i + 3], data[i + 4]]),
            };

            match item_type {
                // Main items
                0 => {
                    match tag {
                        // Input
                        0x08 => {
                            if mouse_depth.is_some() {
                                let bits = u32::from(report_size)
                                    .checked_mul(u32::from(report_count))
                                    .and_then(|b| b.checked_add(u32::from(layout.input_bits)))?;
                                layout.input_bits = u16::try_from(bits).ok()?;
                                if value & INPUT_CONSTANT == 0 {
                                    has_data_input = true;
                                    if report_id != 0 && layout.report_id.is_none() {
                                        layout.report_id = Some(report_id);
                                    }
                                    match usage_page {
                                        UsagePage::Button => {
                                            let count = u8::try_from(report_count).ok()?;
                                            layout.buttons = layout.buttons.checked_add(count)?;
                                        }
                                        UsagePage::GenericDesktop => {
                                            for &u in usages.iter() {
                                                match DesktopUsage::from(u) {
                                                    DesktopUsage::X => layout.has_x = true,
                                                    DesktopUsage::Y => layout.has_y = true,
                                                    DesktopUsage::Wheel => layout.has_wheel = true,
                                                    _ => {}
                                                }
                                            }
                                        }
                                        UsagePage::Unknown(_) => {}
                                    }
                                }
                            }
                        }
                        // Collection
                        0x0A => {
                            depth = depth.saturating_add(1);
                            let opens_mouse = usage_page == UsagePage::GenericDesktop
                                && usages.iter().any(|&u| {
                                    matches!(
                                        DesktopUsage::from(u),
                                        DesktopUsage::Mouse | DesktopUsage::Pointer
                                    )
                                });
                            if opens_mouse && mouse_depth.is_none() {
                                mouse_depth = Some(depth);
                            }
                        }
                        // End Collection
                        0x0C => {
                            if mouse_depth == Some(depth) {
                                mouse_depth = None;
                            }
                            depth = depth.saturating_sub(1);
                        }
                        _ => {}
                    }
                    usages.clear();
                }
                // Global items
                1 => match tag {
                    // Usage Page
                    0x00 => usage_page = UsagePage::from(value as u16),
                    // Report Size
                    0x07 => report_size = value as u16,
                    // Report ID
                    0x08 => report_id = value as u8,
                    // Report Count
                    0x09 => report_count = value as u16,
                    _ => {}
                },
                // Local items
                2 => {
                    // Usage
                    if tag == 0x00 {
                        let _ = usages.push(value as u16);
                    }
                }
                _ => {}
            }

            i += 1 + size;
        }

        if has_data_input {
            Some(layout)
        } else {
            #[cfg(feature = "defmt")]
            defmt::debug!("HID descriptor: no mouse input found");
            None
        }
    }
}
