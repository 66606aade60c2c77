//! Configuration type definitions

use heapless::Vec;
use triad_hal::i2c::is_valid_target_address;

use crate::echo::{AbortPolicy, EchoConfig};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Maximum length of the I2C self-test burst
pub const MAX_PATTERN_LEN: usize = 16;

/// Which peripheral patterns this build wires up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Capabilities {
    /// Serial echo on the UART
    pub has_uart: bool,
    /// I2C target emulation
    pub has_i2c: bool,
    /// Periodic self-addressed I2C burst from the control loop (needs `has_i2c`)
    pub self_test: bool,
}

impl Default for Capabilities {
    fn default() -> Self {
        Self {
            has_uart: true,
            has_i2c: true,
            self_test: true,
        }
    }
}

/// Button input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ButtonConfig {
    /// Pressed pulls the line low
    pub active_low: bool,
}

impl Default for ButtonConfig {
    fn default() -> Self {
        Self { active_low: true }
    }
}

/// Serial echo settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct UartSettings {
    pub baudrate: u32,
    /// Quiet time that closes a receive frame (µs)
    pub idle_timeout_us: u32,
    pub abort_policy: AbortPolicy,
}

impl Default for UartSettings {
    fn default() -> Self {
        Self {
            baudrate: 115200,
            idle_timeout_us: 500,
            abort_policy: AbortPolicy::Stall,
        }
    }
}

/// I2C target and self-test settings
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct I2cSettings {
    /// 7-bit address the target answers
    pub target_address: u8,
    /// Initiator clock (Hz)
    pub frequency: u32,
    /// Bytes written to our own address each loop pass
    pub self_test_pattern: Vec<u8, MAX_PATTERN_LEN>,
}

impl Default for I2cSettings {
    fn default() -> Self {
        let mut self_test_pattern = Vec::new();
        for b in [0x01, 0x02, 0x03, 0x04] {
            let _ = self_test_pattern.push(b);
        }
        Self {
            target_address: 0x60,
            frequency: 100_000,
            self_test_pattern,
        }
    }
}

/// Control loop pacing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ControlSettings {
    /// Sleep between loop passes (ms)
    pub period_ms: u32,
}

impl Default for ControlSettings {
    fn default() -> Self {
        Self { period_ms: 500 }
    }
}

/// Complete application configuration
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AppConfig {
    pub capabilities: Capabilities,
    pub button: ButtonConfig,
    pub uart: UartSettings,
    pub i2c: I2cSettings,
    pub control: ControlSettings,
}

/// Semantic configuration error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Address is reserved or not 7-bit
    InvalidTargetAddress(u8),
    ZeroBaudrate,
    ZeroIdleTimeout,
    ZeroFrequency,
    ZeroPeriod,
    /// Self-test enabled with nothing to send
    EmptySelfTestPattern,
}

impl AppConfig {
    /// Check value ranges that the parser cannot
    ///
    /// Settings for a disabled capability are not checked.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.capabilities.has_uart {
            if self.uart.baudrate == 0 {
                return Err(ConfigError::ZeroBaudrate);
            }
            if self.uart.idle_timeout_us == 0 {
                return Err(ConfigError::ZeroIdleTimeout);
            }
        }

        if self.capabilities.has_i2c {
            if !is_valid_target_address(self.i2c.target_address) {
                return Err(ConfigError::InvalidTargetAddress(self.i2c.target_address));
            }
            if self.i2c.frequency == 0 {
                return Err(ConfigError::ZeroFrequency);
            }
            if self.capabilities.self_test && self.i2c.self_test_pattern.is_empty() {
                return Err(ConfigError::EmptySelfTestPattern);
            }
        }

        if self.control.period_ms == 0 {
            return Err(ConfigError::ZeroPeriod);
        }

        Ok(())
    }

    /// Whether the control loop should drive self-test traffic
    pub fn self_test_enabled(&self) -> bool {
        self.capabilities.has_i2c && self.capabilities.self_test
    }

    /// Echo engine settings derived from the UART section
    pub fn echo_config(&self) -> EchoConfig {
        EchoConfig {
            idle_timeout_us: self.uart.idle_timeout_us,
            abort_policy: self.uart.abort_policy,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        assert_eq!(AppConfig::default().validate(), Ok(()));
    }

    #[test]
    fn test_reserved_address_rejected() {
        let mut cfg = AppConfig::default();
        cfg.i2c.target_address = 0x03;
        assert_eq!(
            cfg.validate(),
            Err(ConfigError::InvalidTargetAddress(0x03))
        );

        // Not checked when I2C is off
        cfg.capabilities.has_i2c = false;
        assert_eq!(cfg.validate(), Ok(()));
    }

    #[test]
    fn test_zero_values_rejected() {
        let mut cfg = AppConfig::default();
        cfg.uart.idle_timeout_us = 0;
        assert_eq!(cfg.validate(), Err(ConfigError::ZeroIdleTimeout));

        let mut cfg = AppConfig::default();
        cfg.control.period_ms = 0;
        assert_eq!(cfg.validate(), Err(ConfigError::ZeroPeriod));

        let mut cfg = AppConfig::default();
        cfg.uart.baudrate = 0;
        assert_eq!(cfg.validate(), Err(ConfigError::ZeroBaudrate));
    }

    #[test]
    fn test_empty_pattern_only_matters_with_self_test() {
        let mut cfg = AppConfig::default();
        cfg.i2c.self_test_pattern.clear();
        assert_eq!(cfg.validate(), Err(ConfigError::EmptySelfTestPattern));

        cfg.capabilities.self_test = false;
        assert_eq!(cfg.validate(), Ok(()));
        assert!(!cfg.self_test_enabled());
    }

    #[test]
    fn test_echo_config_follows_uart_section() {
        let mut cfg = AppConfig::default();
        cfg.uart.idle_timeout_us = 750;
        cfg.uart.abort_policy = AbortPolicy::Rearm;
        let echo = cfg.echo_config();
        assert_eq!(echo.idle_timeout_us, 750);
        assert_eq!(echo.abort_policy, AbortPolicy::Rearm);
    }
}
