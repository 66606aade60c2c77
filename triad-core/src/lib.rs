//! Board-agnostic core logic for the Triad firmware
//!
//! This crate contains everything that does not depend on a specific chip:
//!
//! - Edge latch for interrupt-driven button presses
//! - Serial echo engine (idle-framed receive, echo back, half-duplex)
//! - Idle-timeout framing over any async reader
//! - I2C bus target emulator
//! - Control loop and startup checks
//! - Configuration types and the embedded config parser
//!
//! All hardware access goes through `triad-hal` traits, so every component
//! runs on the host against fakes.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod config;
pub mod control;
pub mod echo;
pub mod framing;
pub mod latch;
pub mod startup;
pub mod target;

pub use control::{ControlLoop, Iteration, SelfTest};
pub use echo::{EchoOutcome, SerialEchoEngine};
pub use latch::EdgeLatch;
pub use startup::InitError;
pub use target::BusTarget;
