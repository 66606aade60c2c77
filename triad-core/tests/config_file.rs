//! The shipped firmware configuration parses and validates

use triad_core::config::{parse_config, AppConfig};
use triad_core::echo::AbortPolicy;

const APP_TOML: &str = include_str!("../../triad-firmware/app.toml");

#[test]
fn shipped_config_is_valid() {
    let config = parse_config(APP_TOML).expect("app.toml parses");
    assert_eq!(config.validate(), Ok(()));
}

#[test]
fn shipped_config_matches_defaults() {
    let config = parse_config(APP_TOML).unwrap();
    assert_eq!(config, AppConfig::default());
    assert_eq!(config.uart.abort_policy, AbortPolicy::Stall);
}
