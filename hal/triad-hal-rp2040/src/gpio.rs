//! GPIO wrappers and claim tracking
//!
//! Tracks which GPIO pins are in use so two peripherals cannot be wired to
//! the same pin, and adapts embassy-rp pins to the `triad-hal` traits.

use embassy_rp::gpio::{Input, Output};
use heapless::FnvIndexSet;
use portable_atomic::{AtomicBool, Ordering};
use triad_hal::gpio::ActiveEdge;
use triad_hal::{Device, InputPin, OutputPin};

/// Maximum number of GPIO pins on RP2040
pub const GPIO_COUNT: usize = 30;

/// Push-pull indicator output
pub struct Led {
    pin: Output<'static>,
}

impl Led {
    pub fn new(pin: Output<'static>) -> Self {
        Self { pin }
    }
}

impl OutputPin for Led {
    fn set_high(&mut self) {
        self.pin.set_high();
    }

    fn set_low(&mut self) {
        self.pin.set_low();
    }

    fn is_set_high(&self) -> bool {
        self.pin.is_set_high()
    }
}

/// Button input with a configured active edge
pub struct Button {
    pin: Input<'static>,
    edge: ActiveEdge,
}

impl Button {
    pub fn new(pin: Input<'static>, active_low: bool) -> Self {
        Self {
            pin,
            edge: ActiveEdge::for_polarity(active_low),
        }
    }

    /// Wait for the next level change
    ///
    /// Returns the new level and whether the change was into the active
    /// state.
    pub async fn wait_for_change(&mut self) -> (bool, bool) {
        self.pin.wait_for_any_edge().await;
        let high = self.pin.is_high();
        let activated = match self.edge {
            ActiveEdge::Rising => high,
            ActiveEdge::Falling => !high,
        };
        (high, activated)
    }
}

impl InputPin for Button {
    fn is_high(&self) -> bool {
        self.pin.is_high()
    }
}

/// Last known level of a pin owned by another task
///
/// The task that owns the `Input` publishes each level change here; readers
/// elsewhere see it through [`InputPin`].
pub struct LevelMirror {
    high: AtomicBool,
}

impl LevelMirror {
    pub const fn new(initial_high: bool) -> Self {
        Self {
            high: AtomicBool::new(initial_high),
        }
    }

    pub fn publish(&self, high: bool) {
        self.high.store(high, Ordering::Release);
    }
}

impl InputPin for &LevelMirror {
    fn is_high(&self) -> bool {
        self.high.load(Ordering::Acquire)
    }
}

/// Error claiming a pin
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ClaimError {
    /// Pin number out of range (0-29 valid)
    InvalidPin(u8),
    /// Pin already claimed by another peripheral
    AlreadyClaimed(u8),
}

/// GPIO allocator to track pin usage
pub struct PinAllocator {
    allocated: FnvIndexSet<u8, 32>,
}

impl Default for PinAllocator {
    fn default() -> Self {
        Self::new()
    }
}

impl PinAllocator {
    pub fn new() -> Self {
        Self {
            allocated: FnvIndexSet::new(),
        }
    }

    /// Claim a GPIO pin
    pub fn claim(&mut self, pin: u8) -> Result<(), ClaimError> {
        if pin as usize >= GPIO_COUNT {
            return Err(ClaimError::InvalidPin(pin));
        }
        if self.allocated.contains(&pin) {
            return Err(ClaimError::AlreadyClaimed(pin));
        }
        self.allocated
            .insert(pin)
            .map_err(|_| ClaimError::InvalidPin(pin))?;
        Ok(())
    }

    /// Check if a pin is claimed
    pub fn is_claimed(&self, pin: u8) -> bool {
        self.allocated.contains(&pin)
    }

    /// Get the number of claimed pins
    pub fn claimed_count(&self) -> usize {
        self.allocated.len()
    }
}

/// Pins a peripheral is wired to, checked at startup
///
/// Ready iff every pin was claimed without conflict and the pins suit the
/// peripheral's function.
pub struct PinClaim {
    label: &'static str,
    error: Option<ClaimError>,
    function_ok: bool,
}

impl PinClaim {
    /// Claim `pins` for the peripheral called `label`
    pub fn new(label: &'static str, pins: &[u8], allocator: &mut PinAllocator) -> Self {
        let error = pins.iter().find_map(|&p| allocator.claim(p).err());
        Self {
            label,
            error,
            function_ok: true,
        }
    }

    /// Record whether the pins can carry the peripheral's function
    pub fn with_function_check(mut self, ok: bool) -> Self {
        self.function_ok = ok;
        self
    }

    /// Claim failure, if any
    pub fn error(&self) -> Option<ClaimError> {
        self.error
    }
}

impl Device for PinClaim {
    fn label(&self) -> &'static str {
        self.label
    }

    fn is_ready(&self) -> bool {
        self.error.is_none() && self.function_ok
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allocator() {
        let mut alloc = PinAllocator::new();

        assert!(alloc.claim(11).is_ok());
        assert!(alloc.is_claimed(11));

        // Can't claim same pin twice
        assert_eq!(alloc.claim(11), Err(ClaimError::AlreadyClaimed(11)));
        assert_eq!(alloc.claim(30), Err(ClaimError::InvalidPin(30)));
        assert_eq!(alloc.claimed_count(), 1);
    }

    #[test]
    fn test_pin_claims() {
        let mut alloc = PinAllocator::new();
        let uart = PinClaim::new("uart0", &[0, 1], &mut alloc);
        assert!(uart.is_ready());

        let clash = PinClaim::new("i2c0", &[4, 1], &mut alloc);
        assert!(!clash.is_ready());
        assert_eq!(clash.error(), Some(ClaimError::AlreadyClaimed(1)));

        let wrong = PinClaim::new("i2c1", &[6, 7], &mut alloc).with_function_check(false);
        assert!(!wrong.is_ready());
        assert_eq!(wrong.label(), "i2c1");
    }

    #[test]
    fn test_level_mirror() {
        let mirror = LevelMirror::new(true);
        assert!((&mirror).is_high());
        mirror.publish(false);
        assert!((&mirror).is_low());
    }
}
