//! I2C pin functions, controller configuration and error conversion
//!
//! RP2040 has two I2C controllers. Any GPIO can reach one of them: the pin
//! number modulo 4 selects controller and signal.

use embassy_rp::i2c::AbortReason;
use embassy_rp::{i2c, i2c_slave};

/// I2C controller identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum I2cId {
    I2c0,
    I2c1,
}

/// Signal a pin carries for its controller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum I2cRole {
    Sda,
    Scl,
}

/// Determine which controller and signal a GPIO can carry
pub fn gpio_to_i2c(gpio: u8) -> Option<(I2cId, I2cRole)> {
    if gpio >= 30 {
        return None;
    }
    Some(match gpio % 4 {
        0 => (I2cId::I2c0, I2cRole::Sda),
        1 => (I2cId::I2c0, I2cRole::Scl),
        2 => (I2cId::I2c1, I2cRole::Sda),
        _ => (I2cId::I2c1, I2cRole::Scl),
    })
}

/// Check an SDA/SCL pin pair belongs to the given controller
pub fn pins_match(id: I2cId, sda: u8, scl: u8) -> bool {
    gpio_to_i2c(sda) == Some((id, I2cRole::Sda)) && gpio_to_i2c(scl) == Some((id, I2cRole::Scl))
}

/// Initiator configuration at the given clock
pub fn initiator_config(frequency: u32) -> i2c::Config {
    let mut config = i2c::Config::default();
    config.frequency = frequency;
    config
}

/// Target configuration answering `address`, general call ignored
pub fn target_config(address: u8) -> i2c_slave::Config {
    let mut config = i2c_slave::Config::default();
    config.addr = address as u16;
    config.general_call = false;
    config
}

/// Error from I2C operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum I2cFault {
    /// NACK received
    Nack,
    /// Arbitration lost
    ArbitrationLost,
    /// Transfer stopped with bytes still queued
    Aborted,
    /// Buffer length not supported by the controller
    BufferLength,
    /// Initiator wrote more than the target could take
    PartialWrite(usize),
    Other,
}

impl From<AbortReason> for I2cFault {
    fn from(reason: AbortReason) -> Self {
        #[allow(unreachable_patterns)]
        match reason {
            AbortReason::NoAcknowledge => I2cFault::Nack,
            AbortReason::ArbitrationLoss => I2cFault::ArbitrationLost,
            AbortReason::TxNotEmpty(_) => I2cFault::Aborted,
            _ => I2cFault::Other,
        }
    }
}

impl From<i2c_slave::Error> for I2cFault {
    fn from(e: i2c_slave::Error) -> Self {
        #[allow(unreachable_patterns)]
        match e {
            i2c_slave::Error::Abort(reason) => reason.into(),
            i2c_slave::Error::InvalidResponseBufferLength => I2cFault::BufferLength,
            i2c_slave::Error::PartialWrite(n) => I2cFault::PartialWrite(n),
            _ => I2cFault::Other,
        }
    }
}
