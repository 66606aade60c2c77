//! I2C bus target emulator
//!
//! Answers an external initiator at a fixed 7-bit address with a single
//! byte register. Writes overwrite it; a read returns it; every following
//! byte of the same read returns it plus one, without touching the stored
//! value.

use portable_atomic::{AtomicBool, AtomicU8, Ordering};
use triad_hal::i2c::{Ack, TargetCallbacks};

/// Single-register I2C target
pub struct BusTarget {
    address: u8,
    last_byte: AtomicU8,
    in_transaction: AtomicBool,
}

impl BusTarget {
    pub const fn new(address: u8) -> Self {
        Self {
            address,
            last_byte: AtomicU8::new(0),
            in_transaction: AtomicBool::new(false),
        }
    }

    /// 7-bit address this target answers
    pub fn address(&self) -> u8 {
        self.address
    }

    /// Current register value
    pub fn last_byte(&self) -> u8 {
        self.last_byte.load(Ordering::Acquire)
    }

    /// Whether an initiator is between address phase and stop
    ///
    /// Only a read holds this across an await point: a write is delivered
    /// after the controller has already seen the stop condition.
    pub fn is_busy(&self) -> bool {
        self.in_transaction.load(Ordering::Acquire)
    }

    /// Deliver the data phase of a write, byte by byte
    ///
    /// Used for any bytes the initiator got onto the wire, including the
    /// prefix of a write that overflowed the controller's buffer. Stops at
    /// the first refused byte. Does not end the transaction.
    pub fn accept_write(&self, bytes: &[u8]) {
        if self.write_requested() == Ack::Nack {
            return;
        }
        for &b in bytes {
            if self.write_received(b) == Ack::Nack {
                break;
            }
        }
    }

    /// Fill `out` the way a multi-byte read observes the register
    ///
    /// First byte comes from [`TargetCallbacks::read_requested`], the rest
    /// from [`TargetCallbacks::read_processed`].
    pub fn fill_read(&self, out: &mut [u8]) {
        if let Some((first, rest)) = out.split_first_mut() {
            *first = self.read_requested();
            for byte in rest {
                *byte = self.read_processed();
            }
        }
    }
}

impl TargetCallbacks for BusTarget {
    fn write_requested(&self) -> Ack {
        self.in_transaction.store(true, Ordering::Release);
        Ack::Ack
    }

    fn write_received(&self, byte: u8) -> Ack {
        self.last_byte.store(byte, Ordering::Release);
        Ack::Ack
    }

    fn read_requested(&self) -> u8 {
        self.in_transaction.store(true, Ordering::Release);
        self.last_byte()
    }

    fn read_processed(&self) -> u8 {
        self.last_byte().wrapping_add(1)
    }

    fn stop(&self) {
        self.in_transaction.store(false, Ordering::Release);
    }
}
