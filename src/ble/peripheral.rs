//! BLE peripheral - advertising, pairing and the per-connection report loop.
//!
//! The SoftDevice plays the host stack for [`MouseSession`]:
//!
//! - a successful `advertise_pairable` becomes `ConnectionOpened`
//! - `gatt_server::run` returning becomes `ConnectionClosed`
//! - a readiness request is serviced on the next report tick, as
//!   `CanSendNow`, once the central has enabled notifications and has not
//!   suspended the device
//!
//! Interrupt frames are sent as Input Report notifications with the
//! transaction header removed.

use core::cell::RefCell;

use defmt::{info, warn};
use embassy_futures::select::{select, Either};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::{Receiver, Sender};
use embassy_time::{Duration, Instant, Timer};
use heapless::Deque;
use hid_mouse_demo::config;
use hid_mouse_demo::device::record::BLE_ADV_MAX;
use hid_mouse_demo::device::{
    ConnectionHandle, HidEvent, HidServiceRecord, HidStatus, HidTransport, MouseSession,
    ReportPacer, SessionNotice,
};
use hid_mouse_demo::hid::InterruptFrame;
use hid_mouse_demo::{BleError, Error};
use nrf_softdevice::ble::gatt_server::{self, NotifyValueError};
use nrf_softdevice::ble::peripheral;
use nrf_softdevice::ble::security::{IoCapabilities, SecurityHandler};
use nrf_softdevice::ble::{Connection, EncryptionInfo, IdentityKey, MasterId, SecurityMode};
use nrf_softdevice::raw;
use nrf_softdevice::Softdevice;
use static_cell::StaticCell;

use super::hid_server::Server;

pub type KeyReceiver =
    Receiver<'static, CriticalSectionRawMutex, char, { config::KEY_CHANNEL_DEPTH }>;
pub type NoticeSender =
    Sender<'static, CriticalSectionRawMutex, SessionNotice, { config::NOTICE_CHANNEL_DEPTH }>;

/// Delay before advertising again after a failure.
const ADVERTISE_RETRY: Duration = Duration::from_secs(1);

// ═══════════════════════════════════════════════════════════════════════════
// Pairing
// ═══════════════════════════════════════════════════════════════════════════

/// Long-term keys of one bonded central.
struct BondedCentral {
    master_id: MasterId,
    key: EncryptionInfo,
    peer_id: IdentityKey,
}

/// Just Works pairing for a single-link peripheral.
///
/// Up to `MAX_BONDS` centrals are kept in RAM, oldest bond at the front.
/// Bonding again moves a central to the back; a new central on a full
/// table evicts the oldest.
struct BondTable {
    bonds: RefCell<Deque<BondedCentral, { config::MAX_BONDS }>>,
}

impl BondTable {
    const fn new() -> Self {
        Self {
            bonds: RefCell::new(Deque::new()),
        }
    }

    fn store(&self, bond: BondedCentral) {
        let mut bonds = self.bonds.borrow_mut();

        let mut previous = core::mem::replace(&mut *bonds, Deque::new());
        while let Some(old) = previous.pop_front() {
            if old.master_id != bond.master_id {
                let _ = bonds.push_back(old);
            }
        }

        if bonds.is_full() {
            if let Some(evicted) = bonds.pop_front() {
                info!("bond table full, forgetting {}", evicted.peer_id.addr);
            }
        }
        info!("bonded with {}", bond.peer_id.addr);
        let _ = bonds.push_back(bond);
    }
}

impl SecurityHandler for BondTable {
    fn io_capabilities(&self) -> IoCapabilities {
        IoCapabilities::None
    }

    fn can_bond(&self, conn: &Connection) -> bool {
        info!("pairing request from {}, auto accepted", conn.peer_address());
        true
    }

    fn on_bonded(
        &self,
        _conn: &Connection,
        master_id: MasterId,
        key: EncryptionInfo,
        peer_id: IdentityKey,
    ) {
        self.store(BondedCentral {
            master_id,
            key,
            peer_id,
        });
    }

    fn get_key(&self, _conn: &Connection, master_id: MasterId) -> Option<EncryptionInfo> {
        let bonds = self.bonds.borrow();
        let bond = bonds.iter().find(|b| b.master_id == master_id)?;
        Some(bond.key)
    }

    fn get_peripheral_key(&self, conn: &Connection) -> Option<(MasterId, EncryptionInfo)> {
        let bonds = self.bonds.borrow();
        let bond = bonds.iter().find(|b| b.peer_id.is_match(conn.peer_address()))?;
        Some((bond.master_id, bond.key))
    }

    fn on_security_update(&self, conn: &Connection, mode: SecurityMode) {
        info!("link to {} now {}", conn.peer_address(), mode);
    }
}

fn bond_table() -> &'static BondTable {
    static BOND_TABLE: StaticCell<BondTable> = StaticCell::new();
    BOND_TABLE.init(BondTable::new())
}

// ═══════════════════════════════════════════════════════════════════════════
// Transports
// ═══════════════════════════════════════════════════════════════════════════

/// Stand-in while no central is connected. The session holds no handle
/// then, so it never sends through this.
struct Unlinked;

impl HidTransport for Unlinked {
    fn request_can_send_now(&mut self, _handle: ConnectionHandle) {}

    fn send_interrupt_message(
        &mut self,
        _handle: ConnectionHandle,
        _message: &[u8],
    ) -> Result<(), Error> {
        Err(Error::NotConnected)
    }
}

/// HID-over-GATT transport for one connection.
struct GattTransport<'a> {
    conn: &'a Connection,
    server: &'a Server,
    pacer: ReportPacer,
}

impl<'a> GattTransport<'a> {
    fn new(conn: &'a Connection, server: &'a Server) -> Self {
        Self {
            conn,
            server,
            pacer: ReportPacer::new(config::REPORT_INTERVAL_MS),
        }
    }

    fn deadline(&self) -> Option<Instant> {
        self.pacer.deadline().map(Instant::from_millis)
    }

    /// The host can take a report: input notifications enabled and the
    /// device not suspended.
    fn host_ready(&self) -> bool {
        let hid = &self.server.hid;
        hid.notifications_enabled() && !hid.is_suspended()
    }

    fn take_ready(&mut self) -> bool {
        let host_ready = self.host_ready();
        self.pacer.on_deadline(Instant::now().as_millis(), host_ready)
    }
}

impl HidTransport for GattTransport<'_> {
    fn request_can_send_now(&mut self, _handle: ConnectionHandle) {
        self.pacer.request(Instant::now().as_millis());
    }

    fn send_interrupt_message(
        &mut self,
        _handle: ConnectionHandle,
        message: &[u8],
    ) -> Result<(), Error> {
        let frame = InterruptFrame::from_bytes(message).ok_or(Error::BufferOverflow)?;
        let input_report = self.server.hid.input_report_handle();

        gatt_server::notify_value(self.conn, input_report, frame.report_payload()).map_err(
            |e| match e {
                NotifyValueError::Disconnected => Error::NotConnected,
                NotifyValueError::Raw(_) => Error::from(BleError::NotifyFailed),
            },
        )
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Task
// ═══════════════════════════════════════════════════════════════════════════

fn post(notices: &NoticeSender, notice: SessionNotice) {
    if notice == SessionNotice::None {
        return;
    }
    if notices.try_send(notice).is_err() {
        warn!("notice channel full, dropping {}", notice);
    }
}

/// Keys typed while advertising only update the pending report.
async fn idle_keys(session: &mut MouseSession, keys: &KeyReceiver) {
    loop {
        let key = keys.receive().await;
        session.on_key(key, &mut Unlinked);
    }
}

/// Feed keys and readiness into the session until the link drops.
async fn report_loop(
    session: &mut MouseSession,
    transport: &mut GattTransport<'_>,
    keys: &KeyReceiver,
) {
    loop {
        let deadline = transport.deadline();
        let tick = async move {
            match deadline {
                Some(at) => Timer::at(at).await,
                None => core::future::pending::<()>().await,
            }
        };

        match select(keys.receive(), tick).await {
            Either::First(key) => {
                session.on_key(key, transport);
            }
            Either::Second(()) => {
                if transport.take_ready() {
                    session.handle_event(HidEvent::CanSendNow, transport);
                }
            }
        }
    }
}

/// Advertise, serve one central, repeat.
pub async fn peripheral_task(
    sd: &'static Softdevice,
    server: &'static Server,
    record: &HidServiceRecord,
    keys: &KeyReceiver,
    notices: &NoticeSender,
) -> ! {
    let mut adv_data = [0u8; BLE_ADV_MAX];
    let adv_len = defmt::unwrap!(record.write_advertising_data(&mut adv_data));
    let security = bond_table();
    let mut session = MouseSession::new();

    loop {
        let adv = peripheral::ConnectableAdvertisement::ScannableUndirected {
            adv_data: &adv_data[..adv_len],
            scan_data: &[],
        };
        let adv_config = peripheral::Config {
            interval: config::BLE_ADV_INTERVAL,
            ..Default::default()
        };

        info!("advertising as {}", record.name.as_str());
        let advertise = peripheral::advertise_pairable(sd, adv, &adv_config, security);
        let conn = match select(advertise, idle_keys(&mut session, keys)).await {
            Either::First(Ok(conn)) => conn,
            Either::First(Err(_)) => {
                warn!("{}", Error::from(BleError::AdvertiseFailed));
                Timer::after(ADVERTISE_RETRY).await;
                continue;
            }
            Either::Second(()) => continue,
        };

        let Some(raw_handle) = conn.handle() else {
            warn!("link dropped before it was reported");
            continue;
        };
        let handle = ConnectionHandle(raw_handle);
        info!("central connected, handle {}", handle.0);

        let conn_params = raw::ble_gap_conn_params_t {
            min_conn_interval: config::BLE_CONN_INTERVAL_MIN,
            max_conn_interval: config::BLE_CONN_INTERVAL_MAX,
            slave_latency: config::BLE_SLAVE_LATENCY,
            conn_sup_timeout: config::BLE_SUP_TIMEOUT,
        };
        if conn.set_conn_params(conn_params).is_err() {
            warn!("connection parameter update refused");
        }

        let opened = HidEvent::ConnectionOpened {
            status: HidStatus::Success,
            handle,
        };
        post(notices, session.handle_event(opened, &mut Unlinked));

        let mut transport = GattTransport::new(&conn, server);
        let gatt = gatt_server::run(&conn, server, |_| {});
        match select(gatt, report_loop(&mut session, &mut transport, keys)).await {
            Either::First(_) => info!("central disconnected"),
            Either::Second(()) => {}
        }

        server.hid.reset();
        post(
            notices,
            session.handle_event(HidEvent::ConnectionClosed, &mut Unlinked),
        );
    }
}
