//! Unified error type for hid-mouse-demo.
//!
//! We avoid `alloc` - all error variants carry only fixed-size data.
//! Implements `defmt::Format` for efficient on-target logging.

/// Top-level error type used across the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    // BLE
    /// The SoftDevice returned a BLE-level error.
    Ble(BleError),

    /// A report was sent while no HID connection is open.
    NotConnected,

    // HID record
    /// The report descriptor does not describe a mouse.
    InvalidDescriptor,

    /// The device name does not fit the record.
    NameTooLong,

    // Terminal
    /// UART read or write failed.
    Uart,

    // Generic
    /// Buffer too small for the requested operation.
    BufferOverflow,
}

/// Subset of BLE errors we propagate (keeps the enum `Copy`-friendly).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BleError {
    /// GAP / GATT raw error code from the SoftDevice.
    Raw(u32),
    /// Advertising could not start or timed out.
    AdvertiseFailed,
    /// HID report notification was refused.
    NotifyFailed,
    /// The GATT server could not be registered.
    ServerInit,
}

// Convenience conversions

impl From<BleError> for Error {
    fn from(e: BleError) -> Self {
        Error::Ble(e)
    }
}
