//! HID service registration metadata.
//!
//! Everything the stack needs once at startup to publish the device: its
//! name, class of device, HID record attributes and the report descriptor.
//! On LE-only targets the same record is turned into advertising data and
//! the HID Information characteristic.

use heapless::String;

use crate::config;
use crate::error::Error;
use crate::hid::mouse::{MOUSE_REPORT_DESCRIPTOR, MOUSE_REPORT_SIZE};
use crate::hid::report_protocol::MouseLayout;

/// Legacy advertising payload limit (bytes).
pub const BLE_ADV_MAX: usize = 31;

// AD types
const AD_FLAGS: u8 = 0x01;
const AD_UUID16_COMPLETE: u8 = 0x03;
const AD_NAME_SHORT: u8 = 0x08;
const AD_NAME_COMPLETE: u8 = 0x09;
const AD_APPEARANCE: u8 = 0x19;

/// Flags, service UUID and appearance structures, before the name.
const FIXED_AD_LEN: usize = 3 + 4 + 4;

/// LE General Discoverable | BR/EDR not supported.
const ADV_FLAGS: u8 = 0x06;

/// HID Service UUID (0x1812).
const HID_SERVICE_UUID: u16 = 0x1812;

/// HID Information flag: NormallyConnectable.
const HID_INFO_NORMALLY_CONNECTABLE: u8 = 0x02;

/// Peripheral minor class, upper two bits.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PeripheralKind {
    Other,
    Keyboard,
    Pointing,
    Combo,
}

/// 24-bit Bluetooth Class of Device.
///
/// ```text
/// bits 23..13  major service classes
/// bits 12..8   major device class
/// bits  7..2   minor device class
/// bits  1..0   format type (00)
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ClassOfDevice(pub u32);

impl ClassOfDevice {
    const MAJOR_PERIPHERAL: u8 = 0x05;
    const SERVICE_LIMITED_DISCOVERABLE: u16 = 0x0001;

    pub fn major_service_classes(&self) -> u16 {
        ((self.0 >> 13) & 0x07FF) as u16
    }

    pub fn major_device_class(&self) -> u8 {
        ((self.0 >> 8) & 0x1F) as u8
    }

    pub fn minor_device_class(&self) -> u8 {
        ((self.0 >> 2) & 0x3F) as u8
    }

    pub fn is_limited_discoverable(&self) -> bool {
        self.major_service_classes() & Self::SERVICE_LIMITED_DISCOVERABLE != 0
    }

    pub fn is_peripheral(&self) -> bool {
        self.major_device_class() == Self::MAJOR_PERIPHERAL
    }

    /// Keyboard/pointing sub-field, for peripheral classes only.
    pub fn peripheral_kind(&self) -> Option<PeripheralKind> {
        if !self.is_peripheral() {
            return None;
        }
        Some(match self.minor_device_class() >> 4 {
            0b01 => PeripheralKind::Keyboard,
            0b10 => PeripheralKind::Pointing,
            0b11 => PeripheralKind::Combo,
            _ => PeripheralKind::Other,
        })
    }
}

/// HID device service record, registered once at startup.
#[derive(Clone, Debug)]
pub struct HidServiceRecord {
    pub name: String<{ config::MAX_DEVICE_NAME_LEN }>,
    pub class_of_device: ClassOfDevice,
    pub service_record_handle: u32,
    pub subclass: u16,
    pub country_code: u8,
    pub virtual_cable: bool,
    pub reconnect_initiate: bool,
    pub boot_device: bool,
    pub descriptor: &'static [u8],
    /// Input layout the descriptor was checked against.
    pub layout: MouseLayout,
}

impl HidServiceRecord {
    /// Build a record with the default HID attributes from `config`.
    ///
    /// Fails if `name` does not fit, or if `descriptor` is not a mouse whose
    /// input report matches the interrupt frame payload.
    pub fn new(name: &str, descriptor: &'static [u8]) -> Result<Self, Error> {
        let mut stored = String::new();
        stored.push_str(name).map_err(|_| Error::NameTooLong)?;

        let layout = MouseLayout::parse(descriptor).ok_or(Error::InvalidDescriptor)?;
        if layout.input_bytes() != MOUSE_REPORT_SIZE {
            return Err(Error::InvalidDescriptor);
        }

        Ok(Self {
            name: stored,
            class_of_device: ClassOfDevice(config::CLASS_OF_DEVICE),
            service_record_handle: config::HID_SERVICE_RECORD_HANDLE,
            subclass: config::HID_SUBCLASS,
            country_code: config::HID_COUNTRY_CODE,
            virtual_cable: config::HID_VIRTUAL_CABLE,
            reconnect_initiate: config::HID_RECONNECT_INITIATE,
            boot_device: config::HID_BOOT_DEVICE,
            descriptor,
            layout,
        })
    }

    /// The record this demo registers.
    pub fn mouse_demo() -> Result<Self, Error> {
        Self::new(config::DEVICE_NAME, MOUSE_REPORT_DESCRIPTOR)
    }

    /// HID Information characteristic value: bcdHID, country code, flags.
    pub fn hid_information(&self) -> [u8; 4] {
        let [lo, hi] = config::HID_SPEC_VERSION.to_le_bytes();
        let flags = if self.reconnect_initiate {
            HID_INFO_NORMALLY_CONNECTABLE
        } else {
            0
        };
        [lo, hi, self.country_code, flags]
    }

    /// Device Information PnP ID value: source, VID, PID, version.
    pub fn pnp_id(&self) -> [u8; 7] {
        let [vid_lo, vid_hi] = config::PNP_VENDOR_ID.to_le_bytes();
        let [pid_lo, pid_hi] = config::PNP_PRODUCT_ID.to_le_bytes();
        let [ver_lo, ver_hi] = config::PNP_PRODUCT_VERSION.to_le_bytes();
        [
            config::PNP_VENDOR_ID_SOURCE,
            vid_lo,
            vid_hi,
            pid_lo,
            pid_hi,
            ver_lo,
            ver_hi,
        ]
    }

    /// Write LE advertising data into `buf`, returning its length.
    ///
    /// The name is shortened if the whole payload would not fit in one
    /// legacy advertisement.
    pub fn write_advertising_data(&self, buf: &mut [u8]) -> Result<usize, Error> {
        let name_room = BLE_ADV_MAX - FIXED_AD_LEN - 2;
        let name = self.name.as_str();
        let (name_bytes, name_type) = if name.len() <= name_room {
            (name.as_bytes(), AD_NAME_COMPLETE)
        } else {
            let mut cut = name_room;
            while !name.is_char_boundary(cut) {
                cut -= 1;
            }
            (&name.as_bytes()[..cut], AD_NAME_SHORT)
        };

        let total = FIXED_AD_LEN + 2 + name_bytes.len();
        if buf.len() < total {
            return Err(Error::BufferOverflow);
        }

        let mut at = write_ad(buf, 0, AD_FLAGS, &[ADV_FLAGS]);
        at = write_ad(buf, at, AD_UUID16_COMPLETE, &HID_SERVICE_UUID.to_le_bytes());
        at = write_ad(buf, at, AD_APPEARANCE, &config::BLE_APPEARANCE_MOUSE.to_le_bytes());
        at = write_ad(buf, at, name_type, name_bytes);
        Ok(at)
    }
}

/// Write one AD structure (length, type, data) at `at`; returns the end.
/// The caller has checked that `buf` is large enough.
fn write_ad(buf: &mut [u8], at: usize, ad_type: u8, data: &[u8]) -> usize {
    buf[at] = data.len() as u8 + 1;
    buf[at + 1] = ad_type;
    buf[at + 2..at + 2 + data.len()].copy_from_slice(data);
    at + 2 + data.len()
}
