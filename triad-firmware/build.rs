//! Build script for triad-firmware
//!
//! - Sets up linker search paths for memory.x
//! - Validates app.toml at compile time

use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

fn main() {
    setup_linker();
    validate_config();
}

/// Set up linker search paths for memory.x
fn setup_linker() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());

    // Copy memory.x to the output directory
    let memory_x = include_bytes!("memory.x");
    let mut f = File::create(out_dir.join("memory.x")).unwrap();
    f.write_all(memory_x).unwrap();

    // Tell rustc where to find memory.x
    println!("cargo:rustc-link-search={}", out_dir.display());

    // Re-run if memory.x changes
    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}

/// Keys accepted in each section, with their expected type
const SCHEMA: &[(&str, &[(&str, Kind)])] = &[
    (
        "capabilities",
        &[("uart", Kind::Bool), ("i2c", Kind::Bool), ("self_test", Kind::Bool)],
    ),
    ("button", &[("active_low", Kind::Bool)]),
    (
        "uart",
        &[
            ("baudrate", Kind::Int),
            ("idle_timeout_us", Kind::Int),
            ("on_abort", Kind::Str),
        ],
    ),
    (
        "i2c",
        &[
            ("target_address", Kind::Int),
            ("frequency", Kind::Int),
            ("self_test_pattern", Kind::IntArray),
        ],
    ),
    ("control", &[("period_ms", Kind::Int)]),
];

#[derive(Clone, Copy, PartialEq, Eq)]
enum Kind {
    Bool,
    Int,
    Str,
    IntArray,
}

impl Kind {
    fn matches(self, value: &toml::Value) -> bool {
        match (self, value) {
            (Kind::Bool, toml::Value::Boolean(_)) => true,
            (Kind::Int, toml::Value::Integer(_)) => true,
            (Kind::Str, toml::Value::String(_)) => true,
            (Kind::IntArray, toml::Value::Array(items)) => {
                items.iter().all(|v| matches!(v, toml::Value::Integer(_)))
            }
            _ => false,
        }
    }

    fn name(self) -> &'static str {
        match self {
            Kind::Bool => "a boolean",
            Kind::Int => "an integer",
            Kind::Str => "a string",
            Kind::IntArray => "an array of integers",
        }
    }
}

/// Validate app.toml configuration at compile time
fn validate_config() {
    println!("cargo:rerun-if-changed=app.toml");

    let config_path = Path::new("app.toml");

    if !config_path.exists() {
        fail(
            "app.toml not found",
            &["The firmware embeds app.toml from the triad-firmware directory.".to_string()],
        );
    }

    let content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => fail("Failed to read app.toml", &[e.to_string()]),
    };

    let config: toml::Value = match toml::from_str(&content) {
        Ok(value) => value,
        Err(e) => fail(
            "Invalid TOML syntax in app.toml",
            &e.to_string().lines().map(str::to_string).collect::<Vec<_>>(),
        ),
    };

    let mut errors = Vec::new();
    check_schema(&config, &mut errors);
    check_ranges(&config, &mut errors);

    if !errors.is_empty() {
        fail("Invalid configuration in app.toml", &errors);
    }

    println!("cargo:warning=app.toml validated successfully");
}

/// Every section and key must be known and correctly typed
fn check_schema(config: &toml::Value, errors: &mut Vec<String>) {
    let Some(root) = config.as_table() else {
        errors.push("top level must be a table".to_string());
        return;
    };

    for (section, body) in root {
        let Some((_, keys)) = SCHEMA.iter().find(|(name, _)| name == section) else {
            errors.push(format!("unknown section [{}]", section));
            continue;
        };
        let Some(body) = body.as_table() else {
            errors.push(format!("[{}] must be a table", section));
            continue;
        };
        for (key, value) in body {
            match keys.iter().find(|(k, _)| k == key) {
                None => errors.push(format!("[{}] unknown key '{}'", section, key)),
                Some((_, kind)) if !kind.matches(value) => {
                    errors.push(format!("[{}] '{}' must be {}", section, key, kind.name()))
                }
                Some(_) => {}
            }
        }
    }
}

/// Value ranges the firmware relies on
fn check_ranges(config: &toml::Value, errors: &mut Vec<String>) {
    let int = |section: &str, key: &str| {
        config
            .get(section)
            .and_then(|s| s.get(key))
            .and_then(toml::Value::as_integer)
    };

    if let Some(addr) = int("i2c", "target_address") {
        if !(0x08..=0x77).contains(&addr) {
            errors.push(format!(
                "[i2c] target_address 0x{:02X} is reserved or not 7-bit (0x08-0x77)",
                addr
            ));
        }
    }

    for (section, key, max) in [
        ("uart", "baudrate", u32::MAX as i64),
        ("uart", "idle_timeout_us", u32::MAX as i64),
        ("i2c", "frequency", 1_000_000),
        ("control", "period_ms", u32::MAX as i64),
    ] {
        if let Some(v) = int(section, key) {
            if v <= 0 || v > max {
                errors.push(format!("[{}] {} must be 1-{}", section, key, max));
            }
        }
    }

    if let Some(policy) = config
        .get("uart")
        .and_then(|s| s.get("on_abort"))
        .and_then(toml::Value::as_str)
    {
        if !["stall", "rearm"].contains(&policy) {
            errors.push("[uart] on_abort must be 'stall' or 'rearm'".to_string());
        }
    }

    if let Some(pattern) = config
        .get("i2c")
        .and_then(|s| s.get("self_test_pattern"))
        .and_then(toml::Value::as_array)
    {
        if pattern.len() > 16 {
            errors.push("[i2c] self_test_pattern holds at most 16 bytes".to_string());
        }
        if pattern
            .iter()
            .filter_map(toml::Value::as_integer)
            .any(|b| !(0..=255).contains(&b))
        {
            errors.push("[i2c] self_test_pattern entries must be 0-255".to_string());
        }
    }
}

/// Abort the build with a boxed error report
fn fail(title: &str, lines: &[String]) -> ! {
    panic!(
        "\n\
        ╔══════════════════════════════════════════════════════════════════╗\n\
        ║  ERROR: {:<56} ║\n\
        ╠══════════════════════════════════════════════════════════════════╣\n\
        {}\n\
        ╚══════════════════════════════════════════════════════════════════╝\n",
        title,
        format_error_lines(lines)
    );
}

/// Format error message lines with box drawing
fn format_error_lines(lines: &[String]) -> String {
    lines
        .iter()
        .map(|line| {
            let truncated = if line.len() > 62 {
                format!("{}...", &line[..59])
            } else {
                line.to_string()
            };
            format!("║  • {:<62} ║", truncated)
        })
        .collect::<Vec<_>>()
        .join("\n")
}
