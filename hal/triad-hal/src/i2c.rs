//! I2C bus abstractions
//!
//! The initiator (master) side is `embedded_hal_async::i2c::I2c`, re-exported
//! here. The target (slave) side is a set of notification hooks the bus
//! transport invokes as a transaction progresses.

pub use embedded_hal_async::i2c::I2c as I2cInitiator;

/// Lowest non-reserved 7-bit address
pub const FIRST_ADDRESS: u8 = 0x08;

/// Highest non-reserved 7-bit address
pub const LAST_ADDRESS: u8 = 0x77;

/// Check that a 7-bit address is outside the reserved ranges
pub fn is_valid_target_address(address: u8) -> bool {
    (FIRST_ADDRESS..=LAST_ADDRESS).contains(&address)
}

/// Response to a write-phase notification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Ack {
    /// Accept the byte / address
    Ack,
    /// Refuse it
    Nack,
}

/// Hooks invoked by an I2C target transport
///
/// All methods take `&self`: the transport calls them from its own context
/// while other code may hold a shared reference to the same target.
pub trait TargetCallbacks {
    /// Initiator addressed us for a write
    fn write_requested(&self) -> Ack;

    /// Initiator wrote one byte
    fn write_received(&self, byte: u8) -> Ack;

    /// Initiator addressed us for a read; return the first byte
    fn read_requested(&self) -> u8;

    /// Initiator acknowledged the previous byte; return the next one
    fn read_processed(&self) -> u8;

    /// Stop condition ended the transaction
    fn stop(&self);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_address_ranges() {
        assert!(!is_valid_target_address(0x00)); // general call
        assert!(!is_valid_target_address(0x07));
        assert!(is_valid_target_address(0x08));
        assert!(is_valid_target_address(0x60));
        assert!(is_valid_target_address(0x77));
        assert!(!is_valid_target_address(0x78)); // 10-bit prefix
        assert!(!is_valid_target_address(0x80));
    }
}
