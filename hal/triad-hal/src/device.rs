//! Peripheral readiness
//!
//! Startup refuses to run the application unless every required
//! peripheral reports ready.

/// A peripheral that can report whether it is usable
pub trait Device {
    /// Short human-readable name used in startup diagnostics
    fn label(&self) -> &'static str;

    /// Check whether the peripheral is configured and usable
    fn is_ready(&self) -> bool;
}

impl<T: Device + ?Sized> Device for &T {
    fn label(&self) -> &'static str {
        (**self).label()
    }

    fn is_ready(&self) -> bool {
        (**self).is_ready()
    }
}
