//! Configuration loading
//!
//! The configuration is compiled in from `app.toml`; build.rs has already
//! validated it, so a parse failure here means the two parsers disagree.

use defmt::*;
use triad_core::config::{parse_config, AppConfig};

/// Embedded configuration (compiled into firmware)
/// Edit app.toml and rebuild to customize
const EMBEDDED_CONFIG: &str = include_str!("../app.toml");

/// Parse the embedded configuration, falling back to defaults
pub fn load() -> AppConfig {
    match parse_config(EMBEDDED_CONFIG) {
        Ok(config) => {
            info!("Configuration loaded from app.toml");
            config
        }
        Err(e) => {
            error!("app.toml line {}: {:?}, using defaults", e.line, e.kind);
            AppConfig::default()
        }
    }
}
