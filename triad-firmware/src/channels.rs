//! Inter-task communication channels
//!
//! The UART tasks never touch the echo buffers. They report through
//! `SERIAL_EVENTS`, which only the echo task reads, and take requests back
//! through `TX_REQUEST` and `RX_ARM`.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use embassy_sync::signal::Signal;
use heapless::Vec;

use triad_hal::uart::{SerialEvent, Timeout};

/// Echo buffer capacity, shared by the engine and the transport
pub const ECHO_BUF_SIZE: usize = 64;

/// Channel capacity for serial notifications
const SERIAL_EVENT_CHANNEL_SIZE: usize = 4;

/// Owned copy of a [`SerialEvent`], so it can cross a channel
#[derive(Debug, Clone, PartialEq, Eq, defmt::Format)]
pub enum SerialNotice {
    RxReady(Vec<u8, ECHO_BUF_SIZE>),
    RxBufRequest,
    RxDisabled,
    TxDone(usize),
    TxAborted(usize),
}

impl SerialNotice {
    /// Copy an event out of its borrowed buffer
    ///
    /// `None` if the received bytes do not fit.
    pub fn from_event(event: SerialEvent<'_>) -> Option<Self> {
        Some(match event {
            SerialEvent::RxReady(data) => SerialNotice::RxReady(Vec::from_slice(data).ok()?),
            SerialEvent::RxBufRequest => SerialNotice::RxBufRequest,
            SerialEvent::RxDisabled => SerialNotice::RxDisabled,
            SerialEvent::TxDone(n) => SerialNotice::TxDone(n),
            SerialEvent::TxAborted(n) => SerialNotice::TxAborted(n),
        })
    }

    /// Borrow as the event the engine consumes
    pub fn as_event(&self) -> SerialEvent<'_> {
        match self {
            SerialNotice::RxReady(data) => SerialEvent::RxReady(data),
            SerialNotice::RxBufRequest => SerialEvent::RxBufRequest,
            SerialNotice::RxDisabled => SerialEvent::RxDisabled,
            SerialNotice::TxDone(n) => SerialEvent::TxDone(*n),
            SerialNotice::TxAborted(n) => SerialEvent::TxAborted(*n),
        }
    }
}

/// Transmit request from the echo task
pub struct TxRequest {
    pub data: Vec<u8, ECHO_BUF_SIZE>,
    pub timeout: Timeout,
}

/// Receive region handed to the RX task
#[derive(Debug, Clone, Copy)]
pub struct RxArm {
    pub capacity: usize,
    pub idle_timeout_us: u32,
}

/// Serial notifications, consumed by the echo task only
pub static SERIAL_EVENTS: Channel<CriticalSectionRawMutex, SerialNotice, SERIAL_EVENT_CHANNEL_SIZE> =
    Channel::new();

/// Pending transmit (at most one in flight)
pub static TX_REQUEST: Channel<CriticalSectionRawMutex, TxRequest, 1> = Channel::new();

/// Arm (or re-arm) reception
pub static RX_ARM: Signal<CriticalSectionRawMutex, RxArm> = Signal::new();
