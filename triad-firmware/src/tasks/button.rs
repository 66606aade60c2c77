//! Button edge task
//!
//! Stands in for the GPIO interrupt callback: waits for edges, publishes
//! the level, and latches activations.

use defmt::*;
use triad_core::EdgeLatch;
use triad_hal::gpio::pin_mask;
use triad_hal_rp2040::gpio::{Button, LevelMirror};

use crate::board::BUTTON_PIN;

#[embassy_executor::task]
pub async fn button_task(mut button: Button, level: &'static LevelMirror, latch: &'static EdgeLatch) {
    info!("Button task started");

    loop {
        let (high, activated) = button.wait_for_change().await;
        level.publish(high);

        if activated && latch.on_edge(pin_mask(BUTTON_PIN)) {
            debug!("Button pressed!");
        }
    }
}
