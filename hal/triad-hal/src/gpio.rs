//! GPIO pin abstractions
//!
//! Digital input/output traits plus the pin-mask convention used by
//! edge interrupt notifications.

/// Number of GPIO lines a pin mask can describe
pub const MAX_PINS: u8 = 32;

/// Bit mask for a single GPIO line, as carried by edge notifications
///
/// Returns 0 for pins that do not fit in a 32-bit mask.
pub const fn pin_mask(pin: u8) -> u32 {
    if pin < MAX_PINS {
        1 << pin
    } else {
        0
    }
}

/// Which signal transition counts as "active" for an edge interrupt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ActiveEdge {
    /// Low-to-high transition (active-high input)
    Rising,
    /// High-to-low transition (active-low input, pulled up)
    Falling,
}

impl ActiveEdge {
    /// Edge that marks the transition into the active state
    pub fn for_polarity(active_low: bool) -> Self {
        if active_low {
            ActiveEdge::Falling
        } else {
            ActiveEdge::Rising
        }
    }
}

/// Digital output pin
pub trait OutputPin {
    /// Set the pin high (logic 1)
    fn set_high(&mut self);

    /// Set the pin low (logic 0)
    fn set_low(&mut self);

    /// Check if the pin is currently driven high
    fn is_set_high(&self) -> bool;
}

/// Digital input pin
pub trait InputPin {
    /// Check if the pin reads high (logic 1)
    fn is_high(&self) -> bool;

    /// Check if the pin reads low (logic 0)
    fn is_low(&self) -> bool {
        !self.is_high()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pin_mask() {
        assert_eq!(pin_mask(0), 0b1);
        assert_eq!(pin_mask(11), 1 << 11);
        assert_eq!(pin_mask(31), 1 << 31);
        assert_eq!(pin_mask(32), 0);
    }

    #[test]
    fn test_active_edge_polarity() {
        assert_eq!(ActiveEdge::for_polarity(true), ActiveEdge::Falling);
        assert_eq!(ActiveEdge::for_polarity(false), ActiveEdge::Rising);
    }
}
