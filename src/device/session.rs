//! Mouse session - the single pending report and its delivery handshake.
//!
//! ```text
//!        connection opened (ok)
//! Idle ─────────────────────────► Connected ── key ──► Connected
//!  ▲                              (no pending)  ◄─────  (pending)
//!  │                                    send + re-arm
//!  └──────── connection closed ─────────┘
//! ```
//!
//! There is one pending slot and no queue. A key that arrives before the
//! previous report went out replaces it.

use super::{
    ConnectionHandle, HidDeviceHandler, HidEvent, HidStatus, HidTransport, SessionNotice,
    SessionState,
};
use crate::error::Error;
use crate::hid::keymap::lookup_move_key;
use crate::hid::mouse::{InterruptFrame, MouseReport, BUTTON_LEFT, BUTTON_RIGHT};

/// State of the emulated mouse for one HID device role.
#[derive(Debug, Default)]
pub struct MouseSession {
    handle: Option<ConnectionHandle>,
    pending: MouseReport,
}

impl MouseSession {
    pub const fn new() -> Self {
        Self {
            handle: None,
            pending: MouseReport::empty(),
        }
    }

    pub fn handle(&self) -> Option<ConnectionHandle> {
        self.handle
    }

    pub fn pending(&self) -> MouseReport {
        self.pending
    }

    pub fn state(&self) -> SessionState {
        match self.handle {
            None => SessionState::Idle,
            Some(_) => SessionState::Connected {
                pending: !self.pending.is_idle(),
            },
        }
    }

    /// Terminal input entry point.
    ///
    /// Returns `false` for characters with no binding; those leave the
    /// session untouched.
    pub fn on_key<T: HidTransport + ?Sized>(
        &mut self,
        character: char,
        transport: &mut T,
    ) -> bool {
        match lookup_move_key(character) {
            Some(report) => {
                self.queue_report(report, transport);
                true
            }
            None => false,
        }
    }

    /// Store `report` as the pending report and ask to be told when it can
    /// go out. Without a connection the report is only stored.
    ///
    /// Only the left and right button bits are kept, and the wheel is
    /// dropped, since the descriptor declares neither.
    pub fn queue_report<T: HidTransport + ?Sized>(
        &mut self,
        report: MouseReport,
        transport: &mut T,
    ) {
        self.pending = MouseReport {
            buttons: report.buttons & (BUTTON_LEFT | BUTTON_RIGHT),
            x: report.x,
            y: report.y,
            wheel: 0,
        };
        if let Some(handle) = self.handle {
            transport.request_can_send_now(handle);
        }
    }

    /// Route one stack event to its handler.
    pub fn handle_event<T: HidTransport + ?Sized>(
        &mut self,
        event: HidEvent,
        transport: &mut T,
    ) -> SessionNotice {
        match event {
            HidEvent::ConnectionOpened { status, handle } => {
                if self.on_connection_opened(status, handle) {
                    SessionNotice::Connected
                } else {
                    SessionNotice::None
                }
            }
            HidEvent::ConnectionClosed => {
                self.on_connection_closed();
                SessionNotice::Disconnected
            }
            HidEvent::CanSendNow => {
                self.on_can_send_now(transport);
                SessionNotice::None
            }
            HidEvent::UserConfirmationRequest { numeric_value } => {
                SessionNotice::AutoAcceptedConfirmation(numeric_value)
            }
        }
    }

    fn send<T: HidTransport + ?Sized>(
        &self,
        frame: &InterruptFrame,
        transport: &mut T,
    ) -> Result<(), Error> {
        let handle = self.handle.ok_or(Error::NotConnected)?;
        transport.send_interrupt_message(handle, frame.as_bytes())
    }
}

impl HidDeviceHandler for MouseSession {
    fn on_connection_opened(&mut self, status: HidStatus, handle: ConnectionHandle) -> bool {
        if status != HidStatus::Success {
            #[cfg(feature = "defmt")]
            defmt::debug!("HID connection failed: {}", status);
            return false;
        }
        self.handle = Some(handle);
        self.pending = MouseReport::empty();
        true
    }

    fn on_connection_closed(&mut self) {
        self.handle = None;
        self.pending = MouseReport::empty();
    }

    fn on_can_send_now<T: HidTransport + ?Sized>(&mut self, transport: &mut T) {
        if self.pending.is_idle() {
            if let Err(_e) = self.send(&InterruptFrame::IDLE, transport) {
                #[cfg(feature = "defmt")]
                defmt::warn!("idle report not sent: {}", _e);
            }
            return;
        }

        let frame = InterruptFrame::from(self.pending);
        match self.send(&frame, transport) {
            Ok(()) => {
                #[cfg(feature = "defmt")]
                defmt::debug!("mouse report sent: {}", self.pending);
            }
            Err(_e) => {
                #[cfg(feature = "defmt")]
                defmt::warn!("mouse report dropped: {}", _e);
            }
        }
        self.pending = MouseReport::empty();

        if let Some(handle) = self.handle {
            transport.request_can_send_now(handle);
        }
    }
}
