//! hid-mouse-demo - nRF52840 firmware entry point.
//!
//! Boots the SoftDevice, registers the HID-over-GATT server and spawns:
//! - `softdevice_task`: SoftDevice event pump
//! - `ble_task`: advertising, pairing and the mouse session
//! - `console_rx_task` / `console_tx_task`: the UART terminal
//!
//! Keys flow console → BLE on `KEY_CHANNEL`; status lines flow back on
//! `NOTICE_CHANNEL`.

#![no_std]
#![no_main]

mod ble;
mod console;

use core::mem;

use defmt::{info, unwrap};
use embassy_executor::Spawner;
use embassy_nrf::interrupt::{self, InterruptExt, Priority};
use embassy_nrf::peripherals::UARTE0;
use embassy_nrf::uarte::{self, UarteRx, UarteTx};
use embassy_nrf::{bind_interrupts, peripherals};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use hid_mouse_demo::config;
use hid_mouse_demo::device::HidServiceRecord;
use hid_mouse_demo::{BleError, Error, SessionNotice};
use nrf_softdevice::{raw, Softdevice};
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use crate::ble::hid_server::Server;

bind_interrupts!(struct Irqs {
    UARTE0_UART0 => uarte::InterruptHandler<peripherals::UARTE0>;
});

static KEY_CHANNEL: Channel<CriticalSectionRawMutex, char, { config::KEY_CHANNEL_DEPTH }> =
    Channel::new();
static NOTICE_CHANNEL: Channel<
    CriticalSectionRawMutex,
    SessionNotice,
    { config::NOTICE_CHANNEL_DEPTH },
> = Channel::new();

static RECORD: StaticCell<HidServiceRecord> = StaticCell::new();
static SERVER: StaticCell<Server> = StaticCell::new();

#[embassy_executor::task]
async fn softdevice_task(sd: &'static Softdevice) -> ! {
    sd.run().await
}

#[embassy_executor::task]
async fn ble_task(
    sd: &'static Softdevice,
    server: &'static Server,
    record: &'static HidServiceRecord,
) -> ! {
    ble::peripheral::peripheral_task(
        sd,
        server,
        record,
        &KEY_CHANNEL.receiver(),
        &NOTICE_CHANNEL.sender(),
    )
    .await
}

#[embassy_executor::task]
async fn console_rx_task(rx: UarteRx<'static, UARTE0>) -> ! {
    console::rx_task(rx, &KEY_CHANNEL.sender()).await
}

#[embassy_executor::task]
async fn console_tx_task(tx: UarteTx<'static, UARTE0>) -> ! {
    console::tx_task(tx, &NOTICE_CHANNEL.receiver()).await
}

fn softdevice_config(record: &'static HidServiceRecord) -> nrf_softdevice::Config {
    let name_len = record.name.len() as u16;
    nrf_softdevice::Config {
        clock: Some(raw::nrf_clock_lf_cfg_t {
            source: raw::NRF_CLOCK_LF_SRC_RC as u8,
            rc_ctiv: 16,
            rc_temp_ctiv: 2,
            accuracy: raw::NRF_CLOCK_LF_ACCURACY_500_PPM as u8,
        }),
        conn_gap: Some(raw::ble_gap_conn_cfg_t {
            conn_count: 1,
            event_length: 24,
        }),
        conn_gatt: Some(raw::ble_gatt_conn_cfg_t { att_mtu: 128 }),
        gatts_attr_tab_size: Some(raw::ble_gatts_cfg_attr_tab_size_t {
            attr_tab_size: raw::BLE_GATTS_ATTR_TAB_SIZE_DEFAULT,
        }),
        gap_role_count: Some(raw::ble_gap_cfg_role_count_t {
            adv_set_count: 1,
            periph_role_count: 1,
            central_role_count: 0,
            central_sec_count: 0,
            _bitfield_1: raw::ble_gap_cfg_role_count_t::new_bitfield_1(0),
        }),
        gap_device_name: Some(raw::ble_gap_cfg_device_name_t {
            p_value: record.name.as_ptr() as _,
            current_len: name_len,
            max_len: name_len,
            write_perm: unsafe { mem::zeroed() },
            _bitfield_1: raw::ble_gap_cfg_device_name_t::new_bitfield_1(
                raw::BLE_GATTS_VLOC_STACK as u8,
            ),
        }),
        ..Default::default()
    }
}

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("hid-mouse-demo starting");

    // Priorities 0, 1 and 4 are reserved by the SoftDevice.
    let mut nrf_config = embassy_nrf::config::Config::default();
    nrf_config.gpiote_interrupt_priority = Priority::P2;
    nrf_config.time_interrupt_priority = Priority::P2;
    let p = embassy_nrf::init(nrf_config);
    interrupt::UARTE0_UART0.set_priority(Priority::P3);

    let record = RECORD.init(unwrap!(HidServiceRecord::mouse_demo()));
    info!(
        "HID record {=u32:#x}, class of device {=u32:#x} ({})",
        record.service_record_handle,
        record.class_of_device.0,
        record.class_of_device.peripheral_kind()
    );

    let sd = Softdevice::enable(&softdevice_config(record));
    let server = SERVER.init(unwrap!(
        Server::new(sd, record).map_err(|_| Error::from(BleError::ServerInit))
    ));
    let sd: &'static Softdevice = sd;
    unwrap!(spawner.spawn(softdevice_task(sd)));

    let mut uart_config = uarte::Config::default();
    uart_config.parity = uarte::Parity::EXCLUDED;
    uart_config.baudrate = console::baudrate(config::UART_BAUD);
    let uart = uarte::Uarte::new(p.UARTE0, Irqs, p.P0_08, p.P0_06, uart_config);
    let (tx, rx) = uart.split();

    unwrap!(spawner.spawn(console_tx_task(tx)));
    unwrap!(spawner.spawn(console_rx_task(rx)));
    unwrap!(spawner.spawn(ble_task(sd, server, record)));
}
