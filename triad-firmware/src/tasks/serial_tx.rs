//! UART transmit task
//!
//! Writes one request at a time and reports the result back to the echo
//! task.

use defmt::*;
use embassy_rp::uart::BufferedUartTx;
use embassy_time::{with_timeout, Duration};
use embedded_io_async::Write;

use triad_hal::uart::Timeout;
use triad_hal_rp2040::uart::UartFault;

use crate::channels::{SerialNotice, SERIAL_EVENTS, TX_REQUEST};

#[embassy_executor::task]
pub async fn serial_tx_task(mut tx: BufferedUartTx) {
    info!("Serial TX task started");

    loop {
        let request = TX_REQUEST.receive().await;
        let len = request.data.len();
        trace!("TX: {} bytes", len);

        let write = async {
            tx.write_all(&request.data).await?;
            tx.flush().await
        };

        let notice = match request.timeout {
            Timeout::Forever => match write.await {
                Ok(()) => SerialNotice::TxDone(len),
                Err(e) => {
                    warn!("UART write error: {:?}", UartFault::from(e));
                    SerialNotice::TxAborted(0)
                }
            },
            Timeout::Micros(us) => {
                match with_timeout(Duration::from_micros(us as u64), write).await {
                    Ok(Ok(())) => SerialNotice::TxDone(len),
                    Ok(Err(e)) => {
                        warn!("UART write error: {:?}", UartFault::from(e));
                        SerialNotice::TxAborted(0)
                    }
                    Err(_) => {
                        warn!("UART write timed out after {}us", us);
                        SerialNotice::TxAborted(0)
                    }
                }
            }
        };

        SERIAL_EVENTS.send(notice).await;
    }
}
