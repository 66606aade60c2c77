//! Serial transport backed by the UART tasks
//!
//! Requests are posted to the RX/TX tasks and answered later through
//! `SERIAL_EVENTS`, matching the event-driven [`SerialTransport`] contract.

use heapless::Vec;
use triad_hal::uart::{SerialTransport, Timeout};

use crate::channels::{RxArm, TxRequest, ECHO_BUF_SIZE, RX_ARM, TX_REQUEST};

/// Transport request refused
#[derive(Debug, Clone, Copy, PartialEq, Eq, defmt::Format)]
pub enum TransportError {
    /// A transmit is already queued
    TxQueueFull,
    /// Data or region larger than the UART buffers
    TooLong,
}

/// Handle the echo task drives the UART through
pub struct ChannelTransport;

impl SerialTransport for ChannelTransport {
    type Error = TransportError;

    fn enable_receive(&mut self, capacity: usize, idle_timeout_us: u32) -> Result<(), Self::Error> {
        if capacity > ECHO_BUF_SIZE {
            return Err(TransportError::TooLong);
        }
        RX_ARM.signal(RxArm {
            capacity,
            idle_timeout_us,
        });
        Ok(())
    }

    fn transmit(&mut self, data: &[u8], timeout: Timeout) -> Result<(), Self::Error> {
        let data = Vec::from_slice(data).map_err(|_| TransportError::TooLong)?;
        TX_REQUEST
            .try_send(TxRequest { data, timeout })
            .map_err(|_| TransportError::TxQueueFull)
    }
}
