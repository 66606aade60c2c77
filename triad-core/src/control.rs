//! Control loop
//!
//! One pass of the application loop. The caller owns the pacing: it calls
//! [`ControlLoop::iterate`], logs the returned [`Iteration`], sleeps for the
//! configured period and repeats. The loop never blocks on the notification
//! contexts; it only reads the latch and the target's busy flag.

use embedded_hal_async::i2c::{Error as _, ErrorKind};
use heapless::Vec;
use triad_hal::gpio::{InputPin, OutputPin};
use triad_hal::i2c::I2cInitiator;

use crate::config::{AppConfig, MAX_PATTERN_LEN};
use crate::latch::EdgeLatch;
use crate::target::BusTarget;

/// Bus failure seen by the self-test write
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BusFault {
    /// Nobody acknowledged the address or a data byte
    NoAcknowledge,
    /// Another initiator won the bus
    ArbitrationLoss,
    /// Bus error (misplaced start/stop)
    Bus,
    Overrun,
    Other,
}

impl From<ErrorKind> for BusFault {
    fn from(kind: ErrorKind) -> Self {
        match kind {
            ErrorKind::NoAcknowledge(_) => BusFault::NoAcknowledge,
            ErrorKind::ArbitrationLoss => BusFault::ArbitrationLoss,
            ErrorKind::Bus => BusFault::Bus,
            ErrorKind::Overrun => BusFault::Overrun,
            _ => BusFault::Other,
        }
    }
}

/// What the self-test step did this pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SelfTest {
    /// Not configured, or no initiator available
    Disabled,
    /// Burst of this many bytes written to our own address
    Sent(usize),
    /// Target was mid-transaction; initiator stood back
    Deferred,
    /// Write failed; not retried
    Failed(BusFault),
}

/// Report of one loop pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Iteration {
    pub self_test: SelfTest,
    /// Button edge latched since the previous pass
    pub pressed: bool,
    /// Raw button level sampled this pass
    pub button_high: bool,
}

/// Running counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LoopStats {
    pub iterations: u32,
    pub presses: u32,
    pub self_tests_sent: u32,
    pub self_tests_deferred: u32,
    pub self_tests_failed: u32,
}

/// Application control loop
pub struct ControlLoop<'a, O, I> {
    latch: &'a EdgeLatch,
    target: &'a BusTarget,
    indicator: O,
    button: I,
    pattern: Vec<u8, MAX_PATTERN_LEN>,
    self_test: bool,
    stats: LoopStats,
}

impl<'a, O: OutputPin, I: InputPin> ControlLoop<'a, O, I> {
    pub fn new(
        config: &AppConfig,
        latch: &'a EdgeLatch,
        target: &'a BusTarget,
        indicator: O,
        button: I,
    ) -> Self {
        Self {
            latch,
            target,
            indicator,
            button,
            pattern: config.i2c.self_test_pattern.clone(),
            self_test: config.self_test_enabled(),
            stats: LoopStats::default(),
        }
    }

    /// Power-on indication: light the indicator
    pub fn init(&mut self) {
        self.indicator.set_high();
    }

    /// Run one pass: self-test burst, drain the latch, sample the button
    pub async fn iterate<B: I2cInitiator>(&mut self, bus: Option<&mut B>) -> Iteration {
        self.stats.iterations = self.stats.iterations.wrapping_add(1);

        let self_test = match bus {
            Some(bus) if self.self_test => self.run_self_test(bus).await,
            _ => SelfTest::Disabled,
        };

        let pressed = self.latch.consume();
        if pressed {
            self.stats.presses = self.stats.presses.wrapping_add(1);
        }

        Iteration {
            self_test,
            pressed,
            button_high: self.button.is_high(),
        }
    }

    async fn run_self_test<B: I2cInitiator>(&mut self, bus: &mut B) -> SelfTest {
        if self.target.is_busy() {
            self.stats.self_tests_deferred = self.stats.self_tests_deferred.wrapping_add(1);
            return SelfTest::Deferred;
        }

        match bus.write(self.target.address(), &self.pattern).await {
            Ok(()) => {
                self.stats.self_tests_sent = self.stats.self_tests_sent.wrapping_add(1);
                SelfTest::Sent(self.pattern.len())
            }
            Err(e) => {
                self.stats.self_tests_failed = self.stats.self_tests_failed.wrapping_add(1);
                SelfTest::Failed(e.kind().into())
            }
        }
    }

    pub fn stats(&self) -> LoopStats {
        self.stats
    }

    pub fn indicator(&self) -> &O {
        &self.indicator
    }
}
