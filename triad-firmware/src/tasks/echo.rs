//! Echo task
//!
//! Sole owner of the echo engine. Every UART notification passes through
//! here in order, so buffers and the busy flag need no locking.

use defmt::*;
use triad_core::echo::{EchoOutcome, SerialEchoEngine};

use crate::channels::{ECHO_BUF_SIZE, SERIAL_EVENTS};
use crate::transport::ChannelTransport;

#[embassy_executor::task]
pub async fn echo_task(mut engine: SerialEchoEngine<ECHO_BUF_SIZE>, mut transport: ChannelTransport) {
    info!("Echo task started");

    loop {
        let notice = SERIAL_EVENTS.receive().await;

        match engine.handle(notice.as_event(), &mut transport) {
            Ok(EchoOutcome::Echoing { len, truncated }) => {
                debug!("Echoing {} bytes", len);
                if truncated {
                    warn!("Frame truncated to {} bytes", len);
                }
            }
            Ok(EchoOutcome::Dropped(n)) => {
                debug!(
                    "Dropped {} bytes, transmit in flight ({} frames dropped so far)",
                    n,
                    engine.stats().dropped
                );
            }
            Ok(EchoOutcome::Aborted { rearmed }) => {
                let stats = engine.stats();
                if rearmed {
                    warn!("Transmit aborted, reception re-armed");
                } else {
                    warn!("Transmit aborted, echo stalled until reset");
                }
                warn!(
                    "Echo totals: {} echoed, {} dropped, {} truncated, {} aborted",
                    stats.echoed, stats.dropped, stats.truncated, stats.aborted
                );
            }
            Ok(EchoOutcome::Rearmed) => trace!("Transmit done, reception re-armed"),
            Ok(EchoOutcome::BufferKept) | Ok(EchoOutcome::Ignored) => {}
            Err(e) => {
                warn!("Serial transport refused request: {:?}", e);
            }
        }
    }
}
