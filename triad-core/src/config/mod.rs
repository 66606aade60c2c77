//! Application configuration
//!
//! Types describing the firmware's tunables, and a small no_std parser for
//! the embedded `app.toml` they are loaded from.

pub mod parse;
pub mod types;

pub use parse::{parse_config, ParseError, ParseErrorKind};
pub use types::*;
