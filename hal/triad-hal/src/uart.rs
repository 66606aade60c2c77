//! UART serial transport abstractions
//!
//! The transport is event driven: the application arms reception and issues
//! transmits, and the transport reports back through [`SerialEvent`]
//! notifications. Reception is framed by an idle timeout rather than by
//! delimiters or length prefixes.

/// Transmit timeout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Timeout {
    /// Wait for the hardware to finish, however long that takes
    Forever,
    /// Give up after this many microseconds
    Micros(u32),
}

/// Notification delivered by a serial transport
///
/// `RxReady` borrows the received bytes; the receiver copies what it needs
/// before returning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SerialEvent<'a> {
    /// Bytes arrived and the line then stayed quiet for the idle timeout
    RxReady(&'a [u8]),
    /// The transport wants the next receive region
    RxBufRequest,
    /// Reception stopped (buffer exhausted or disabled)
    RxDisabled,
    /// A transmit of this many bytes has left the device
    TxDone(usize),
    /// A transmit was aborted after this many bytes
    TxAborted(usize),
}

/// Event-driven serial transport
pub trait SerialTransport {
    /// Error type for transport requests
    type Error;

    /// Arm reception into a region of `capacity` bytes
    ///
    /// `RxReady` fires once bytes have arrived followed by `idle_timeout_us`
    /// of silence.
    fn enable_receive(&mut self, capacity: usize, idle_timeout_us: u32)
        -> Result<(), Self::Error>;

    /// Start transmitting `data`
    ///
    /// Completion is reported later through `TxDone` or `TxAborted`.
    fn transmit(&mut self, data: &[u8], timeout: Timeout) -> Result<(), Self::Error>;
}

/// UART configuration
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct UartConfig {
    /// Baud rate in bits per second
    pub baudrate: u32,
    /// Quiet time that closes a receive frame, in microseconds
    pub idle_timeout_us: u32,
}

impl Default for UartConfig {
    fn default() -> Self {
        Self {
            baudrate: 115200,
            idle_timeout_us: 500,
        }
    }
}

impl UartConfig {
    /// Time needed to shift one 8N1 character at this baud rate, in microseconds
    pub fn char_time_us(&self) -> u32 {
        if self.baudrate == 0 {
            return 0;
        }
        // 10 bits per character: start + 8 data + stop
        (10_000_000 / self.baudrate).max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_char_time() {
        let cfg = UartConfig::default();
        assert_eq!(cfg.char_time_us(), 86);

        let slow = UartConfig {
            baudrate: 9600,
            ..Default::default()
        };
        assert_eq!(slow.char_time_us(), 1041);
    }
}
