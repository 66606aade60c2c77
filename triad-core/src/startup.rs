//! Startup checks
//!
//! Startup is fail-fast: the first missing device, bad setting or refused
//! registration aborts it. Nothing is retried.

use triad_hal::Device;

use crate::config::{AppConfig, ConfigError};

/// Fatal initialization error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InitError {
    /// A required peripheral reported not ready
    DeviceNotReady(&'static str),
    /// Configuration failed validation
    Config(ConfigError),
    /// The serial transport refused to arm reception
    ReceiveEnable,
}

impl From<ConfigError> for InitError {
    fn from(e: ConfigError) -> Self {
        InitError::Config(e)
    }
}

/// Check that every device in `devices` is ready
///
/// Returns the first device that is not.
pub fn ensure_ready(devices: &[&dyn Device]) -> Result<(), InitError> {
    match devices.iter().find(|d| !d.is_ready()) {
        Some(device) => Err(InitError::DeviceNotReady(device.label())),
        None => Ok(()),
    }
}

/// Validate configuration and required devices, in that order
pub fn check(config: &AppConfig, devices: &[&dyn Device]) -> Result<(), InitError> {
    config.validate()?;
    ensure_ready(devices)
}
