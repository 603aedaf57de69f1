//! HID device role - the seam between this program and the host stack.
//!
//! The Bluetooth stack owns the radio, pairing and the HID session
//! lifecycle. It talks to the application through two small interfaces:
//!
//! 1. [`HidTransport`] - what the application may ask of the stack:
//!    a one-shot "tell me when I can send" request, and sending one
//!    interrupt message.
//! 2. [`HidDeviceHandler`] - what the stack calls back: connection opened,
//!    connection closed, and channel ready.
//!
//! [`session::MouseSession`] implements the handler. Any stack that can
//! drive these calls (the SoftDevice peripheral in `main.rs`, or a test
//! double) can host it.

pub mod pacing;
pub mod record;
pub mod session;


use crate::error::Error;

pub use pacing::ReportPacer;
pub use record::{ClassOfDevice, HidServiceRecord, PeripheralKind};
pub use session::MouseSession;

/// Opaque identifier for the active HID session, issued by the stack.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ConnectionHandle(pub u16);

/// Outcome carried by a connection-opened event.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HidStatus {
    Success,
    /// Stack-specific non-zero status code.
    Failed(u8),
}

impl HidStatus {
    /// Stack status byte, where 0 means success.
    pub fn from_raw(status: u8) -> Self {
        match status {
            0 => HidStatus::Success,
            code => HidStatus::Failed(code),
        }
    }
}

/// Events delivered by the stack, in the order it serialises them.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HidEvent {
    ConnectionOpened {
        status: HidStatus,
        handle: ConnectionHandle,
    },
    ConnectionClosed,
    /// One outbound message may be sent now.
    CanSendNow,
    /// Secure Simple Pairing numeric comparison. The stack accepts it on
    /// its own; the application only reports it.
    UserConfirmationRequest { numeric_value: u32 },
}

/// Status line the caller should show the operator after an event.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SessionNotice {
    None,
    Connected,
    Disconnected,
    AutoAcceptedConfirmation(u32),
}

impl SessionNotice {
    /// Write the terminal status line for this notice, `\r\n` terminated.
    /// Writes nothing for [`SessionNotice::None`].
    pub fn write_line<W: core::fmt::Write>(&self, out: &mut W) -> core::fmt::Result {
        match self {
            SessionNotice::None => Ok(()),
            SessionNotice::Connected => out.write_str("HID Connected, please start typing...\r\n"),
            SessionNotice::Disconnected => out.write_str("HID Disconnected\r\n"),
            SessionNotice::AutoAcceptedConfirmation(value) => write!(
                out,
                "SSP User Confirmation Request with numeric value '{:06}'\r\n\
                 SSP User Confirmation Auto accept\r\n",
                value
            ),
        }
    }
}

/// Connection and pending-report state of a session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SessionState {
    Idle,
    Connected { pending: bool },
}

/// Requests the application issues to the stack.
pub trait HidTransport {
    /// Ask for a single [`HidDeviceHandler::on_can_send_now`] callback.
    fn request_can_send_now(&mut self, handle: ConnectionHandle);

    /// Send one message on the HID interrupt channel. Must not block.
    fn send_interrupt_message(
        &mut self,
        handle: ConnectionHandle,
        message: &[u8],
    ) -> Result<(), Error>;
}

/// Callbacks the stack invokes on the application.
pub trait HidDeviceHandler {
    /// Returns `true` if the connection was accepted.
    fn on_connection_opened(&mut self, status: HidStatus, handle: ConnectionHandle) -> bool;

    fn on_connection_closed(&mut self);

    /// Sends exactly one interrupt message.
    fn on_can_send_now<T: HidTransport + ?Sized>(&mut self, transport: &mut T);
}
