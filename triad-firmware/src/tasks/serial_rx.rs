//! UART receive task
//!
//! Runs idle-timeout framing over the buffered UART and forwards the
//! notifications to the echo task. A full region stops reception until the
//! echo task re-arms it.

use defmt::*;
use embassy_futures::select::{select, Either};
use embassy_rp::uart::{BufferedUartRx, Error as RpUartError};
use embassy_time::Timer;

use triad_core::framing::{receive_region, IdleTimer, RxSink};
use triad_hal::uart::SerialEvent;
use triad_hal_rp2040::uart::UartFault;

use crate::channels::{SerialNotice, ECHO_BUF_SIZE, RX_ARM, SERIAL_EVENTS};

struct LineIdle;

impl IdleTimer for LineIdle {
    async fn wait_us(&mut self, us: u32) {
        Timer::after_micros(us as u64).await;
    }
}

/// Forwards framing notifications to the echo task
struct EchoEvents;

impl RxSink<RpUartError> for EchoEvents {
    async fn deliver(&mut self, event: SerialEvent<'_>) {
        match SerialNotice::from_event(event) {
            Some(notice) => SERIAL_EVENTS.send(notice).await,
            None => warn!("RX frame larger than {} bytes not forwarded", ECHO_BUF_SIZE),
        }
    }

    fn read_failed(&mut self, error: RpUartError) {
        warn!("UART read error: {:?}", UartFault::from(error));
    }
}

#[embassy_executor::task]
pub async fn serial_rx_task(mut rx: BufferedUartRx) {
    info!("Serial RX task started");

    let mut region = [0u8; ECHO_BUF_SIZE];
    let mut idle = LineIdle;
    let mut events = EchoEvents;

    let mut arm = RX_ARM.wait().await;
    loop {
        let capacity = arm.capacity.min(ECHO_BUF_SIZE);
        let receive = receive_region(
            &mut rx,
            &mut region[..capacity],
            arm.idle_timeout_us,
            &mut idle,
            &mut events,
        );

        match select(RX_ARM.wait(), receive).await {
            // Re-armed mid-region: start a fresh one
            Either::First(next) => arm = next,
            Either::Second(end) => {
                debug!("RX region ended ({:?}), waiting for re-arm", end);
                arm = RX_ARM.wait().await;
            }
        }
    }
}
