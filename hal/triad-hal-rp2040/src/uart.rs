//! UART pin functions and error conversion
//!
//! RP2040 has two UART peripherals (UART0 and UART1), each reachable from
//! a fixed set of pins.

use embassy_rp::uart::Error as RpUartError;

/// UART peripheral identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum UartId {
    Uart0,
    Uart1,
}

/// Signal a pin carries for its UART
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum UartRole {
    Tx,
    Rx,
}

/// Determine which UART and signal a GPIO can carry
///
/// UART0: TX 0/12/16/28, RX 1/13/17/29
/// UART1: TX 4/8/20/24, RX 5/9/21/25
pub fn gpio_to_uart(gpio: u8) -> Option<(UartId, UartRole)> {
    let id = match gpio / 4 {
        0 | 3 | 4 | 7 => UartId::Uart0,
        1 | 2 | 5 | 6 => UartId::Uart1,
        _ => return None,
    };
    let role = match gpio % 4 {
        0 => UartRole::Tx,
        1 => UartRole::Rx,
        _ => return None, // CTS/RTS
    };
    Some((id, role))
}

/// Check a TX/RX pin pair belongs to the given UART
pub fn pins_match(id: UartId, tx: u8, rx: u8) -> bool {
    gpio_to_uart(tx) == Some((id, UartRole::Tx)) && gpio_to_uart(rx) == Some((id, UartRole::Rx))
}

/// Error from UART operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum UartFault {
    Overrun,
    Break,
    Parity,
    Framing,
    Other,
}

impl From<RpUartError> for UartFault {
    fn from(e: RpUartError) -> Self {
        #[allow(unreachable_patterns)]
        match e {
            RpUartError::Overrun => UartFault::Overrun,
            RpUartError::Break => UartFault::Break,
            RpUartError::Parity => UartFault::Parity,
            RpUartError::Framing => UartFault::Framing,
            _ => UartFault::Other,
        }
    }
}
