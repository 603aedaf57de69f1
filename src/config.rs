//! Application-wide constants and compile-time configuration.
//!
//! Device identity, HID record parameters, and BLE/UART timing live here
//! so they can be tuned in one place.

// Device identity

/// Local name advertised and stored in the HID service record.
pub const DEVICE_NAME: &str = "HID Mouse Demo";

/// Class of Device: Limited Discoverable | Peripheral | keyboard sub-field.
/// Mouse devices may use the same value.
pub const CLASS_OF_DEVICE: u32 = 0x2540;

// HID service record

/// SDP service record handle for the HID service.
pub const HID_SERVICE_RECORD_HANDLE: u32 = 0x0001_0001;

/// HID device subclass (mirrors the class of device).
pub const HID_SUBCLASS: u16 = 0x2540;

/// HID country code (33 = US).
pub const HID_COUNTRY_CODE: u8 = 33;

pub const HID_VIRTUAL_CABLE: bool = false;
pub const HID_RECONNECT_INITIATE: bool = false;
pub const HID_BOOT_DEVICE: bool = false;

/// bcdHID: HID version 1.11.
pub const HID_SPEC_VERSION: u16 = 0x0111;

/// PnP ID: vendor id source (0x02 = USB-IF), then the "pid.codes"
/// open-source test VID/PID. Replace with your own allocation.
pub const PNP_VENDOR_ID_SOURCE: u8 = 0x02;
pub const PNP_VENDOR_ID: u16 = 0x1209;
pub const PNP_PRODUCT_ID: u16 = 0x0001;
pub const PNP_PRODUCT_VERSION: u16 = 0x0100;

/// Maximum device name length stored in the record (bytes).
pub const MAX_DEVICE_NAME_LEN: usize = 32;

// Reports

/// Pointer step per movement key, in HID relative units.
pub const MOVE_STEP: i8 = 10;

/// HIDP transaction header for an input report on the interrupt channel
/// (DATA | INPUT).
pub const INTERRUPT_REPORT_HEADER: u8 = 0xA1;

/// Interval between readiness checks while a report is waiting (ms).
/// Matches the fastest connection interval below.
pub const REPORT_INTERVAL_MS: u64 = 8;

// BLE

/// GAP appearance value for a mouse.
pub const BLE_APPEARANCE_MOUSE: u16 = 0x03C2;

/// Advertising interval (in 0.625 ms units). 160 = 100 ms.
pub const BLE_ADV_INTERVAL: u32 = 160;

/// BLE connection interval range (in 1.25 ms units).
/// 6 = 7.5 ms (lowest latency for HID).
pub const BLE_CONN_INTERVAL_MIN: u16 = 6;
pub const BLE_CONN_INTERVAL_MAX: u16 = 12;

/// BLE slave latency (number of connection events the peripheral can skip).
pub const BLE_SLAVE_LATENCY: u16 = 0;

/// BLE supervision timeout (in 10 ms units). 400 = 4 s.
pub const BLE_SUP_TIMEOUT: u16 = 400;

/// Maximum number of bonds remembered until reset.
pub const MAX_BONDS: usize = 4;

// Terminal (UART)
//
//   UART RX → P0.08
//   UART TX → P0.06
//
// nRF52840-DK defaults, routed to the J-Link virtual COM port.

/// UART baud rate of the terminal.
pub const UART_BAUD: u32 = 115_200;

/// Depth of the keystroke channel between console and BLE tasks.
pub const KEY_CHANNEL_DEPTH: usize = 16;

/// Depth of the status line channel back to the console.
pub const NOTICE_CHANNEL_DEPTH: usize = 4;
