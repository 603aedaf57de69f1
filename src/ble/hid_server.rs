//! GATT server - HID-over-GATT service and Device Information.
//!
//! Registers, in order:
//! 1. Device Information Service (0x180A) with the PnP ID.
//! 2. HID Service (0x1812): HID Information, Report Map, HID Control
//!    Point, Protocol Mode, and one Input Report (Report Reference id 0).
//!
//! Built with the SoftDevice service builder rather than the derive macros
//! so the report map can come from the checked [`HidServiceRecord`].

use core::cell::Cell;

use defmt::{debug, info};
use hid_mouse_demo::device::HidServiceRecord;
use hid_mouse_demo::hid::mouse::MOUSE_REPORT_SIZE;
use nrf_softdevice::ble::gatt_server::builder::ServiceBuilder;
use nrf_softdevice::ble::gatt_server::characteristic::{Attribute, Metadata, Properties};
use nrf_softdevice::ble::gatt_server::{self, RegisterError, WriteOp};
use nrf_softdevice::ble::{Connection, SecurityMode, Uuid};
use nrf_softdevice::Softdevice;

const DEVICE_INFORMATION: Uuid = Uuid::new_16(0x180A);
const PNP_ID: Uuid = Uuid::new_16(0x2A50);

const HID_SERVICE: Uuid = Uuid::new_16(0x1812);
const HID_INFORMATION: Uuid = Uuid::new_16(0x2A4A);
const REPORT_MAP: Uuid = Uuid::new_16(0x2A4B);
const HID_CONTROL_POINT: Uuid = Uuid::new_16(0x2A4C);
const HID_REPORT: Uuid = Uuid::new_16(0x2A4D);
const PROTOCOL_MODE: Uuid = Uuid::new_16(0x2A4E);
const REPORT_REFERENCE: Uuid = Uuid::new_16(0x2908);

/// Report Reference: report id 0, type Input.
const INPUT_REPORT_REFERENCE: [u8; 2] = [0x00, 0x01];

/// Protocol Mode value for Report Protocol.
const PROTOCOL_MODE_REPORT: u8 = 0x01;

/// HID Control Point commands.
const CONTROL_SUSPEND: u8 = 0x00;
const CONTROL_EXIT_SUSPEND: u8 = 0x01;

pub struct DeviceInformationService {
    _pnp_id: u16,
}

impl DeviceInformationService {
    fn new(sd: &mut Softdevice, record: &HidServiceRecord) -> Result<Self, RegisterError> {
        let mut sb = ServiceBuilder::new(sd, DEVICE_INFORMATION)?;

        let pnp = sb.add_characteristic(
            PNP_ID,
            Attribute::new(record.pnp_id()).security(SecurityMode::Open),
            Metadata::new(Properties::new().read()),
        )?;
        let pnp_handles = pnp.build();

        let _service = sb.build();
        Ok(Self {
            _pnp_id: pnp_handles.value_handle,
        })
    }
}

pub struct HidService {
    control_point: u16,
    protocol_mode: u16,
    input_report: u16,
    input_report_cccd: u16,
    notifications: Cell<bool>,
    suspended: Cell<bool>,
}

impl HidService {
    fn new(sd: &mut Softdevice, record: &HidServiceRecord) -> Result<Self, RegisterError> {
        let mut sb = ServiceBuilder::new(sd, HID_SERVICE)?;

        let hid_info = sb.add_characteristic(
            HID_INFORMATION,
            Attribute::new(record.hid_information()).security(SecurityMode::JustWorks),
            Metadata::new(Properties::new().read()),
        )?;
        let _hid_info = hid_info.build();

        let report_map = sb.add_characteristic(
            REPORT_MAP,
            Attribute::new(record.descriptor).security(SecurityMode::JustWorks),
            Metadata::new(Properties::new().read()),
        )?;
        let _report_map = report_map.build();

        let control_point = sb.add_characteristic(
            HID_CONTROL_POINT,
            Attribute::new([0u8]).security(SecurityMode::JustWorks),
            Metadata::new(Properties::new().write_without_response()),
        )?;
        let control_point = control_point.build();

        let protocol_mode = sb.add_characteristic(
            PROTOCOL_MODE,
            Attribute::new([PROTOCOL_MODE_REPORT]).security(SecurityMode::JustWorks),
            Metadata::new(Properties::new().read().write_without_response()),
        )?;
        let protocol_mode = protocol_mode.build();

        let mut input = sb.add_characteristic(
            HID_REPORT,
            Attribute::new([0u8; MOUSE_REPORT_SIZE]).security(SecurityMode::JustWorks),
            Metadata::new(Properties::new().read().notify()),
        )?;
        input.add_descriptor(
            REPORT_REFERENCE,
            Attribute::new(INPUT_REPORT_REFERENCE).security(SecurityMode::JustWorks),
        )?;
        let input = input.build();

        let _service = sb.build();

        Ok(Self {
            control_point: control_point.value_handle,
            protocol_mode: protocol_mode.value_handle,
            input_report: input.value_handle,
            input_report_cccd: input.cccd_handle,
            notifications: Cell::new(false),
            suspended: Cell::new(false),
        })
    }

    /// Value handle of the Input Report characteristic.
    pub fn input_report_handle(&self) -> u16 {
        self.input_report
    }

    /// Whether the central has enabled Input Report notifications.
    pub fn notifications_enabled(&self) -> bool {
        self.notifications.get()
    }

    /// Whether the host has suspended the HID device via the Control Point.
    pub fn is_suspended(&self) -> bool {
        self.suspended.get()
    }

    /// Forget per-connection state once the link is gone.
    pub fn reset(&self) {
        self.notifications.set(false);
        self.suspended.set(false);
    }

    fn on_write(&self, handle: u16, data: &[u8]) {
        let Some(&first) = data.first() else {
            return;
        };

        if handle == self.input_report_cccd {
            let enabled = first & 0x01 != 0;
            info!("HID input notifications: {}", enabled);
            self.notifications.set(enabled);
        } else if handle == self.control_point {
            match first {
                CONTROL_SUSPEND => self.suspended.set(true),
                CONTROL_EXIT_SUSPEND => self.suspended.set(false),
                other => debug!("unknown HID control command {}", other),
            }
            debug!("HID host suspended: {}", self.suspended.get());
        } else if handle == self.protocol_mode {
            // Boot and report protocol share one layout here.
            debug!("HID protocol mode set to {}", first);
        }
    }
}

/// The GATT server registered with the SoftDevice.
pub struct Server {
    _dis: DeviceInformationService,
    pub hid: HidService,
}

impl Server {
    pub fn new(sd: &mut Softdevice, record: &HidServiceRecord) -> Result<Self, RegisterError> {
        let dis = DeviceInformationService::new(sd, record)?;
        let hid = HidService::new(sd, record)?;
        info!(
            "GATT server ready ({} byte report map, {} byte input report)",
            record.descriptor.len(),
            record.layout.input_bytes()
        );
        Ok(Self { _dis: dis, hid })
    }
}

impl gatt_server::Server for Server {
    type Event = ();

    fn on_write(
        &self,
        _conn: &Connection,
        handle: u16,
        _op: WriteOp,
        _offset: usize,
        data: &[u8],
    ) -> Option<Self::Event> {
        self.hid.on_write(handle, data);
        None
    }
}
