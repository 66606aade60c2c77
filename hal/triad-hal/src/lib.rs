//! Triad Hardware Abstraction Layer
//!
//! This crate defines the hardware abstraction traits the board-agnostic
//! core talks to. Chip-specific HALs implement them; host tests implement
//! them with fakes.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  Application (triad-firmware)           │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  triad-core (latch, echo, target, loop) │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  triad-hal (this crate - traits)        │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//!             ┌───────────────┐
//!             │  triad-hal-   │
//!             │    rp2040     │
//!             └───────────────┘
//! ```
//!
//! # Traits
//!
//! - [`gpio::OutputPin`], [`gpio::InputPin`] - Digital I/O
//! - [`device::Device`] - Peripheral readiness
//! - [`uart::SerialTransport`] - Asynchronous, event-driven serial transport
//! - [`i2c::TargetCallbacks`] - I2C target (slave) notification hooks
//!
//! The I2C initiator side uses [`embedded_hal_async::i2c::I2c`] directly.

#![no_std]
#![deny(unsafe_code)]

pub mod device;
pub mod gpio;
pub mod i2c;
pub mod uart;

// Re-export key traits at crate root for convenience
pub use device::Device;
pub use gpio::{InputPin, OutputPin};
pub use i2c::{Ack, TargetCallbacks};
pub use uart::{SerialEvent, SerialTransport, Timeout};
