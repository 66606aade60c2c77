//! Edge latch
//!
//! Turns an edge interrupt on one input into a sticky flag that the control
//! loop drains. Setting happens only in interrupt context, clearing only in
//! the loop; multiple edges between two drains collapse into one.

use portable_atomic::{AtomicBool, Ordering};
use triad_hal::gpio::pin_mask;

/// Sticky "edge seen" flag for one input pin
pub struct EdgeLatch {
    mask: u32,
    flag: AtomicBool,
}

impl EdgeLatch {
    /// Create a latch for the given GPIO number
    ///
    /// `const` so it can back a `static` shared with the interrupt side.
    pub const fn new(pin: u8) -> Self {
        Self {
            mask: pin_mask(pin),
            flag: AtomicBool::new(false),
        }
    }

    /// Mask of the pin this latch listens to
    pub fn pin_mask(&self) -> u32 {
        self.mask
    }

    /// Interrupt side: record an edge on the pins in `pin_mask`
    ///
    /// Returns `true` if the configured pin was part of the mask.
    pub fn on_edge(&self, pin_mask: u32) -> bool {
        if self.mask != 0 && pin_mask & self.mask != 0 {
            self.flag.store(true, Ordering::Release);
            true
        } else {
            false
        }
    }

    /// Loop side: read and clear the flag in one step
    pub fn consume(&self) -> bool {
        self.flag.swap(false, Ordering::AcqRel)
    }

    /// Peek without clearing
    pub fn is_pending(&self) -> bool {
        self.flag.load(Ordering::Acquire)
    }
}
