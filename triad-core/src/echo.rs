//! Serial echo engine
//!
//! Receives idle-framed bursts from a [`SerialTransport`] and sends each one
//! straight back. The engine owns two fixed buffers and a busy flag and is
//! driven entirely by transport notifications:
//!
//! ```text
//!            RxReady(data)                 TxDone(n)
//!   Idle ──────────────────▶ Transmitting ───────────▶ Idle (rx re-armed)
//!                               │   ▲
//!                RxReady(data)  │   │  dropped, nothing changes
//!                               └───┘
//! ```
//!
//! Reception is re-armed only after a transmit completes, so the engine is
//! half-duplex even when the transport is not.

use triad_hal::uart::{SerialEvent, SerialTransport, Timeout};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// What to do when the transport aborts a transmit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum AbortPolicy {
    /// Leave the busy flag set and reception disarmed until reset
    #[default]
    Stall,
    /// Treat the abort like a completion: clear, zero and re-arm
    Rearm,
}

/// Engine configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EchoConfig {
    /// Quiet time that closes a receive frame, in microseconds
    pub idle_timeout_us: u32,
    /// Abort handling
    pub abort_policy: AbortPolicy,
}

impl Default for EchoConfig {
    fn default() -> Self {
        Self {
            idle_timeout_us: 500,
            abort_policy: AbortPolicy::Stall,
        }
    }
}

/// Result of handling one transport notification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EchoOutcome {
    /// A transmit of `len` bytes was issued; `truncated` if the frame
    /// exceeded the buffer
    Echoing { len: usize, truncated: bool },
    /// Frame of this length arrived while a transmit was in flight and was lost
    Dropped(usize),
    /// Receive buffer kept in place for the transport
    BufferKept,
    /// Nothing to do (empty frame, informational notification)
    Ignored,
    /// Transmit finished; buffers cleared and reception re-armed
    Rearmed,
    /// Transmit aborted; `rearmed` tells whether the policy recovered
    Aborted { rearmed: bool },
}

/// Running counters, for diagnostics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EchoStats {
    pub echoed: u32,
    pub dropped: u32,
    pub truncated: u32,
    pub aborted: u32,
}

/// Receive-then-echo state machine with `N`-byte buffers
pub struct SerialEchoEngine<const N: usize> {
    config: EchoConfig,
    rx: [u8; N],
    rx_len: usize,
    tx: [u8; N],
    tx_len: usize,
    tx_busy: bool,
    stats: EchoStats,
}

impl<const N: usize> SerialEchoEngine<N> {
    /// Buffer capacity in bytes
    pub const CAPACITY: usize = N;

    pub const fn new(config: EchoConfig) -> Self {
        Self {
            config,
            rx: [0; N],
            rx_len: 0,
            tx: [0; N],
            tx_len: 0,
            tx_busy: false,
            stats: EchoStats {
                echoed: 0,
                dropped: 0,
                truncated: 0,
                aborted: 0,
            },
        }
    }

    /// Arm reception for the first time
    pub fn start<T: SerialTransport>(&mut self, transport: &mut T) -> Result<(), T::Error> {
        transport.enable_receive(N, self.config.idle_timeout_us)
    }

    /// Handle one transport notification
    ///
    /// The only error is a transport refusing a request the engine made
    /// (transmit or re-arm). A refused transmit leaves the engine idle.
    pub fn handle<T: SerialTransport>(
        &mut self,
        event: SerialEvent<'_>,
        transport: &mut T,
    ) -> Result<EchoOutcome, T::Error> {
        match event {
            SerialEvent::RxReady(data) => self.on_rx_ready(data, transport),
            SerialEvent::RxBufRequest => Ok(EchoOutcome::BufferKept),
            SerialEvent::RxDisabled => Ok(EchoOutcome::Ignored),
            SerialEvent::TxDone(_) => {
                self.finish_transmit(transport)?;
                Ok(EchoOutcome::Rearmed)
            }
            SerialEvent::TxAborted(_) => {
                self.stats.aborted = self.stats.aborted.wrapping_add(1);
                match self.config.abort_policy {
                    AbortPolicy::Stall => Ok(EchoOutcome::Aborted { rearmed: false }),
                    AbortPolicy::Rearm => {
                        self.finish_transmit(transport)?;
                        Ok(EchoOutcome::Aborted { rearmed: true })
                    }
                }
            }
        }
    }

    fn on_rx_ready<T: SerialTransport>(
        &mut self,
        data: &[u8],
        transport: &mut T,
    ) -> Result<EchoOutcome, T::Error> {
        if data.is_empty() {
            return Ok(EchoOutcome::Ignored);
        }
        if self.tx_busy {
            self.stats.dropped = self.stats.dropped.wrapping_add(1);
            return Ok(EchoOutcome::Dropped(data.len()));
        }

        let len = data.len().min(N);
        let truncated = len < data.len();
        self.rx[..len].copy_from_slice(&data[..len]);
        self.rx_len = len;

        self.tx[..len].copy_from_slice(&self.rx[..len]);
        self.tx_len = len;
        self.tx_busy = true;

        if let Err(e) = transport.transmit(&self.tx[..len], Timeout::Forever) {
            self.tx_busy = false;
            self.tx.fill(0);
            self.tx_len = 0;
            return Err(e);
        }

        self.stats.echoed = self.stats.echoed.wrapping_add(1);
        if truncated {
            self.stats.truncated = self.stats.truncated.wrapping_add(1);
        }
        Ok(EchoOutcome::Echoing { len, truncated })
    }

    fn finish_transmit<T: SerialTransport>(&mut self, transport: &mut T) -> Result<(), T::Error> {
        self.tx_busy = false;
        self.rx.fill(0);
        self.rx_len = 0;
        self.tx.fill(0);
        self.tx_len = 0;
        transport.enable_receive(N, self.config.idle_timeout_us)
    }

    /// Whether a transmit is in flight
    pub fn is_tx_busy(&self) -> bool {
        self.tx_busy
    }

    /// Bytes of the most recent accepted frame
    pub fn received(&self) -> &[u8] {
        &self.rx[..self.rx_len]
    }

    /// Bytes currently being transmitted
    pub fn transmitting(&self) -> &[u8] {
        &self.tx[..self.tx_len]
    }

    /// Whole receive buffer, including unused (zeroed) capacity
    pub fn receive_buffer(&self) -> &[u8; N] {
        &self.rx
    }

    /// Whole transmit buffer, including unused (zeroed) capacity
    pub fn transmit_buffer(&self) -> &[u8; N] {
        &self.tx
    }

    pub fn stats(&self) -> EchoStats {
        self.stats
    }
}
