//! RP2040-specific HAL for the Triad firmware
//!
//! This crate adapts embassy-rp peripherals to the shared `triad-hal`
//! traits, plus RP2040-specific bookkeeping:
//!
//! - LED/button wrappers and a shared button level mirror
//! - GPIO claim tracking so miswired boards fail startup
//! - UART and I2C pin function maps
//! - embassy-rp error conversion into compact, loggable faults

#![no_std]

pub mod gpio;
pub mod i2c;
pub mod uart;

// Re-export shared traits from triad-hal for convenience
pub use triad_hal::{Device, InputPin, OutputPin};
