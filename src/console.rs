//! UART terminal - keystrokes in, status lines out.
//!
//! The receive half forwards bound keys to the peripheral task as `char`s
//! and drops every other byte. The transmit half prints the banner once and
//! then one line per [`SessionNotice`].

use core::fmt::Write;

use defmt::{info, warn};
use embassy_nrf::peripherals::UARTE0;
use embassy_nrf::uarte::{Baudrate, UarteRx, UarteTx};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::{Receiver, Sender};
use heapless::String;
use hid_mouse_demo::config;
use hid_mouse_demo::hid::keymap::{lookup_move_byte, KEY_HELP};
use hid_mouse_demo::{Error, SessionNotice};

pub type KeySender = Sender<'static, CriticalSectionRawMutex, char, { config::KEY_CHANNEL_DEPTH }>;
pub type NoticeReceiver =
    Receiver<'static, CriticalSectionRawMutex, SessionNotice, { config::NOTICE_CHANNEL_DEPTH }>;

const TITLE: &str = "\r\nHID Mouse Demo\r\n\r\n";

/// Longest line written in one DMA transfer.
const LINE_MAX: usize = 128;

/// Map a configured baud rate onto the UARTE setting.
pub fn baudrate(baud: u32) -> Baudrate {
    match baud {
        9_600 => Baudrate::BAUD9600,
        19_200 => Baudrate::BAUD19200,
        38_400 => Baudrate::BAUD38400,
        57_600 => Baudrate::BAUD57600,
        230_400 => Baudrate::BAUD230400,
        460_800 => Baudrate::BAUD460800,
        921_600 => Baudrate::BAUD921600,
        1_000_000 => Baudrate::BAUD1M,
        _ => Baudrate::BAUD115200,
    }
}

pub async fn rx_task(mut rx: UarteRx<'static, UARTE0>, keys: &KeySender) -> ! {
    let mut byte = [0u8; 1];
    loop {
        if rx.read(&mut byte).await.is_err() {
            warn!("{}", Error::Uart);
            continue;
        }
        if lookup_move_byte(byte[0]).is_none() {
            continue;
        }
        if keys.try_send(char::from(byte[0])).is_err() {
            warn!("key channel full, dropping {=u8:#x}", byte[0]);
        }
    }
}

pub async fn tx_task(mut tx: UarteTx<'static, UARTE0>, notices: &NoticeReceiver) -> ! {
    write_str(&mut tx, TITLE).await;
    for help in KEY_HELP.split_inclusive('\n') {
        write_str(&mut tx, help).await;
    }
    info!("terminal ready at {} baud", config::UART_BAUD);

    loop {
        let notice = notices.receive().await;
        let mut line: String<LINE_MAX> = String::new();
        if notice.write_line(&mut line).is_err() {
            warn!("{}", Error::BufferOverflow);
            continue;
        }
        info!("{}", notice);
        write_str(&mut tx, &line).await;
    }
}

/// EasyDMA cannot read flash, so `text` is copied to RAM first.
async fn write_str(tx: &mut UarteTx<'static, UARTE0>, text: &str) {
    let mut buf: String<LINE_MAX> = String::new();
    if buf.write_str(text).is_err() {
        warn!("{}", Error::BufferOverflow);
        return;
    }
    if tx.write(buf.as_bytes()).await.is_err() {
        warn!("{}", Error::Uart);
    }
}
