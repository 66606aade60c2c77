//! I2C target task
//!
//! Drives the on-chip I2C target and forwards each transaction phase to the
//! [`BusTarget`] callbacks. Address matching is done by the controller.

use defmt::*;
use embassy_rp::i2c_slave::{self, Command, I2cSlave, ReadStatus};
use embassy_rp::peripherals::I2C1;

use triad_core::BusTarget;
use triad_hal::i2c::TargetCallbacks;
use triad_hal_rp2040::i2c::I2cFault;

/// Largest write burst held in one transaction
const WRITE_BUF_SIZE: usize = 32;

#[embassy_executor::task]
pub async fn i2c_target_task(mut device: I2cSlave<'static, I2C1>, target: &'static BusTarget) {
    info!("I2C target listening at 0x{:02X}", target.address());

    let mut buf = [0u8; WRITE_BUF_SIZE];
    loop {
        match device.listen(&mut buf).await {
            Ok(Command::Write(len)) => {
                target.accept_write(&buf[..len]);
                trace!("I2C write: {} bytes, last 0x{:02X}", len, target.last_byte());
                target.stop();
            }
            Ok(Command::WriteRead(len)) => {
                target.accept_write(&buf[..len]);
                if let Err(e) = respond(&mut device, target).await {
                    warn!("I2C target read error: {:?}", e);
                }
                target.stop();
            }
            Ok(Command::Read) => {
                if let Err(e) = respond(&mut device, target).await {
                    warn!("I2C target read error: {:?}", e);
                }
                target.stop();
            }
            Ok(Command::GeneralCall(_)) => {
                trace!("I2C general call ignored");
            }
            Err(i2c_slave::Error::PartialWrite(len)) => {
                // Bytes that fit still count as written
                target.accept_write(&buf[..len.min(WRITE_BUF_SIZE)]);
                warn!(
                    "I2C write longer than {} bytes, last kept 0x{:02X}",
                    WRITE_BUF_SIZE,
                    target.last_byte()
                );
                target.stop();
            }
            Err(e) => {
                warn!("I2C target error: {:?}", I2cFault::from(e));
                target.stop();
            }
        }
    }
}

/// Answer a read: first byte from `read_requested`, every further byte the
/// initiator clocks out from `read_processed`
async fn respond(device: &mut I2cSlave<'static, I2C1>, target: &BusTarget) -> Result<(), I2cFault> {
    let mut status = device.respond_to_read(&[target.read_requested()]).await?;
    while matches!(status, ReadStatus::NeedMoreBytes) {
        status = device.respond_to_read(&[target.read_processed()]).await?;
    }
    Ok(())
}
