//! Minimal TOML parser for the application configuration
//!
//! Handles only the subset `app.toml` needs, not the full TOML grammar.
//!
//! Supported features:
//! - `key = value` pairs (integer, boolean, string, single-line integer array)
//! - `[section]` headers
//! - Integers in decimal, `0x`, `0o` and `0b` form, with `_` separators
//! - Comments (`# ...`), including after a value
//!
//! NOT supported:
//! - Multi-line strings or arrays
//! - Floats, datetimes, inline tables
//! - Dotted keys

use heapless::Vec;

use super::types::{AppConfig, MAX_PATTERN_LEN};
use crate::echo::AbortPolicy;

/// Parse error kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ParseErrorKind {
    /// Malformed `[section]` header
    InvalidSection,
    /// Section name not recognized
    UnknownSection,
    /// Key not recognized in its section
    UnknownKey,
    /// Key/value pair outside any section
    KeyOutsideSection,
    /// Line is neither a header nor `key = value`
    MissingEquals,
    /// Value has the wrong type or is out of range
    InvalidValue,
    /// Array longer than its fixed capacity
    TooManyItems,
}

/// Parse error with the 1-based line it occurred on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ParseError {
    pub line: usize,
    pub kind: ParseErrorKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Root,
    Capabilities,
    Button,
    Uart,
    I2c,
    Control,
}

/// Parse `app.toml` content, starting from defaults
///
/// Keys that are absent keep their default value.
pub fn parse_config(input: &str) -> Result<AppConfig, ParseError> {
    let mut config = AppConfig::default();
    let mut section = Section::Root;

    for (idx, raw) in input.lines().enumerate() {
        let line = strip_comment(raw).trim();
        let err = |kind| ParseError {
            line: idx + 1,
            kind,
        };

        if line.is_empty() {
            continue;
        }

        if line.starts_with('[') {
            if !line.ends_with(']') {
                return Err(err(ParseErrorKind::InvalidSection));
            }
            section = parse_section(line[1..line.len() - 1].trim()).map_err(err)?;
            continue;
        }

        let (key, value) = line
            .split_once('=')
            .ok_or(err(ParseErrorKind::MissingEquals))?;
        apply(&mut config, section, key.trim(), value.trim()).map_err(err)?;
    }

    Ok(config)
}

fn parse_section(name: &str) -> Result<Section, ParseErrorKind> {
    if name.is_empty() || name.contains(['[', ']']) {
        return Err(ParseErrorKind::InvalidSection);
    }
    match name {
        "capabilities" => Ok(Section::Capabilities),
        "button" => Ok(Section::Button),
        "uart" => Ok(Section::Uart),
        "i2c" => Ok(Section::I2c),
        "control" => Ok(Section::Control),
        _ => Err(ParseErrorKind::UnknownSection),
    }
}

fn apply(
    config: &mut AppConfig,
    section: Section,
    key: &str,
    value: &str,
) -> Result<(), ParseErrorKind> {
    match (section, key) {
        (Section::Root, _) => return Err(ParseErrorKind::KeyOutsideSection),

        (Section::Capabilities, "uart") => config.capabilities.has_uart = parse_bool(value)?,
        (Section::Capabilities, "i2c") => config.capabilities.has_i2c = parse_bool(value)?,
        (Section::Capabilities, "self_test") => config.capabilities.self_test = parse_bool(value)?,

        (Section::Button, "active_low") => config.button.active_low = parse_bool(value)?,

        (Section::Uart, "baudrate") => config.uart.baudrate = parse_int(value)?,
        (Section::Uart, "idle_timeout_us") => config.uart.idle_timeout_us = parse_int(value)?,
        (Section::Uart, "on_abort") => {
            config.uart.abort_policy = match parse_str(value)? {
                "stall" => AbortPolicy::Stall,
                "rearm" => AbortPolicy::Rearm,
                _ => return Err(ParseErrorKind::InvalidValue),
            }
        }

        (Section::I2c, "target_address") => config.i2c.target_address = parse_int(value)?,
        (Section::I2c, "frequency") => config.i2c.frequency = parse_int(value)?,
        (Section::I2c, "self_test_pattern") => {
            config.i2c.self_test_pattern = parse_byte_array(value)?
        }

        (Section::Control, "period_ms") => config.control.period_ms = parse_int(value)?,

        _ => return Err(ParseErrorKind::UnknownKey),
    }
    Ok(())
}

/// Drop a trailing `# comment`, leaving `#` inside strings alone
fn strip_comment(line: &str) -> &str {
    let mut in_string = false;
    for (i, c) in line.char_indices() {
        match c {
            '"' => in_string = !in_string,
            '#' if !in_string => return &line[..i],
            _ => {}
        }
    }
    line
}

fn parse_bool(value: &str) -> Result<bool, ParseErrorKind> {
    match value {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(ParseErrorKind::InvalidValue),
    }
}

fn parse_str(value: &str) -> Result<&str, ParseErrorKind> {
    value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .filter(|v| !v.contains('"'))
        .ok_or(ParseErrorKind::InvalidValue)
}

/// Parse an integer literal and narrow it to the target type
fn parse_int<T: TryFrom<u64>>(value: &str) -> Result<T, ParseErrorKind> {
    let value = value.strip_prefix('+').unwrap_or(value);
    if value.starts_with('-') {
        return Err(ParseErrorKind::InvalidValue);
    }

    let (digits, radix) = if let Some(rest) = value.strip_prefix("0x") {
        (rest, 16)
    } else if let Some(rest) = value.strip_prefix("0o") {
        (rest, 8)
    } else if let Some(rest) = value.strip_prefix("0b") {
        (rest, 2)
    } else {
        (value, 10)
    };

    if digits.is_empty() || digits.starts_with('_') || digits.ends_with('_') {
        return Err(ParseErrorKind::InvalidValue);
    }

    let mut acc: u64 = 0;
    for c in digits.chars() {
        if c == '_' {
            continue;
        }
        let d = c.to_digit(radix).ok_or(ParseErrorKind::InvalidValue)?;
        acc = acc
            .checked_mul(radix as u64)
            .and_then(|a| a.checked_add(d as u64))
            .ok_or(ParseErrorKind::InvalidValue)?;
    }

    T::try_from(acc).map_err(|_| ParseErrorKind::InvalidValue)
}

fn parse_byte_array(value: &str) -> Result<Vec<u8, MAX_PATTERN_LEN>, ParseErrorKind> {
    let inner = value
        .strip_prefix('[')
        .and_then(|v| v.strip_suffix(']'))
        .ok_or(ParseErrorKind::InvalidValue)?
        .trim();

    let mut out = Vec::new();
    if inner.is_empty() {
        return Ok(out);
    }

    // Allow a trailing comma
    let inner = inner.strip_suffix(',').unwrap_or(inner);
    for item in inner.split(',') {
        let byte = parse_int::<u8>(item.trim())?;
        out.push(byte).map_err(|_| ParseErrorKind::TooManyItems)?;
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input_gives_defaults() {
        assert_eq!(parse_config("").unwrap(), AppConfig::default());
        assert_eq!(
            parse_config("# only a comment\n\n").unwrap(),
            AppConfig::default()
        );
    }

    #[test]
    fn test_full_config() {
        let input = r#"
[capabilities]
uart = true
i2c = false       # uart-only variant
self_test = false

[button]
active_low = false

[uart]
baudrate = 9_600
idle_timeout_us = 0x3E8
on_abort = "rearm"

[i2c]
target_address = 0x42
frequency = 400_000
self_test_pattern = [0xAA, 0x55, 7,]

[control]
period_ms = 1000
"#;
        let cfg = parse_config(input).unwrap();
        assert!(cfg.capabilities.has_uart);
        assert!(!cfg.capabilities.has_i2c);
        assert!(!cfg.capabilities.self_test);
        assert!(!cfg.button.active_low);
        assert_eq!(cfg.uart.baudrate, 9600);
        assert_eq!(cfg.uart.idle_timeout_us, 1000);
        assert_eq!(cfg.uart.abort_policy, AbortPolicy::Rearm);
        assert_eq!(cfg.i2c.target_address, 0x42);
        assert_eq!(cfg.i2c.frequency, 400_000);
        assert_eq!(cfg.i2c.self_test_pattern.as_slice(), &[0xAA, 0x55, 7]);
        assert_eq!(cfg.control.period_ms, 1000);
    }

    #[test]
    fn test_errors_carry_line_numbers() {
        let err = parse_config("[uart]\nbaudrate = fast\n").unwrap_err();
        assert_eq!(
            err,
            ParseError {
                line: 2,
                kind: ParseErrorKind::InvalidValue
            }
        );

        let err = parse_config("\n\n[motors]\n").unwrap_err();
        assert_eq!(err.line, 3);
        assert_eq!(err.kind, ParseErrorKind::UnknownSection);
    }

    #[test]
    fn test_structural_errors() {
        let kind = |s| parse_config(s).unwrap_err().kind;
        assert_eq!(kind("baudrate = 1"), ParseErrorKind::KeyOutsideSection);
        assert_eq!(kind("[uart\n"), ParseErrorKind::InvalidSection);
        assert_eq!(kind("[]\n"), ParseErrorKind::InvalidSection);
        assert_eq!(kind("[uart]\nbaudrate\n"), ParseErrorKind::MissingEquals);
        assert_eq!(kind("[uart]\nparity = 1\n"), ParseErrorKind::UnknownKey);
    }

    #[test]
    fn test_value_errors() {
        let kind = |s| parse_config(s).unwrap_err().kind;
        assert_eq!(kind("[i2c]\ntarget_address = 256\n"), ParseErrorKind::InvalidValue);
        assert_eq!(kind("[i2c]\ntarget_address = -1\n"), ParseErrorKind::InvalidValue);
        assert_eq!(kind("[button]\nactive_low = yes\n"), ParseErrorKind::InvalidValue);
        assert_eq!(kind("[uart]\non_abort = stall\n"), ParseErrorKind::InvalidValue);
        assert_eq!(kind("[uart]\non_abort = \"retry\"\n"), ParseErrorKind::InvalidValue);
        assert_eq!(kind("[uart]\nbaudrate = 0x\n"), ParseErrorKind::InvalidValue);
        assert_eq!(
            kind("[i2c]\nself_test_pattern = [1, 2\n"),
            ParseErrorKind::InvalidValue
        );
        assert_eq!(
            kind("[i2c]\nself_test_pattern = [0,1,2,3,4,5,6,7,8,9,10,11,12,13,14,15,16]\n"),
            ParseErrorKind::TooManyItems
        );
    }

    #[test]
    fn test_comment_inside_string_kept() {
        assert_eq!(strip_comment(r#"on_abort = "st#ll" # note"#), r#"on_abort = "st#ll" "#);
    }

    #[test]
    fn test_parse_int_radixes() {
        assert_eq!(parse_int::<u32>("42"), Ok(42));
        assert_eq!(parse_int::<u32>("+42"), Ok(42));
        assert_eq!(parse_int::<u32>("0b1010"), Ok(10));
        assert_eq!(parse_int::<u32>("0o17"), Ok(15));
        assert_eq!(parse_int::<u32>("0xff"), Ok(255));
        assert_eq!(parse_int::<u32>("1_000_000"), Ok(1_000_000));
        assert_eq!(parse_int::<u8>("_1"), Err(ParseErrorKind::InvalidValue));
        assert_eq!(parse_int::<u32>("99999999999"), Err(ParseErrorKind::InvalidValue));
    }

    #[test]
    fn test_empty_array() {
        let cfg = parse_config("[i2c]\nself_test_pattern = []\n").unwrap();
        assert!(cfg.i2c.self_test_pattern.is_empty());
    }
}
