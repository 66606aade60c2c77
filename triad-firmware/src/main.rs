//! Triad - peripheral pattern firmware
//!
//! Main firmware binary for RP2040 boards. Three independent patterns run
//! side by side:
//!
//! - a button edge latch drained by the control loop
//! - a half-duplex serial echo framed by line idle time
//! - an I2C target holding one byte, optionally exercised by the board's
//!   own I2C initiator

#![no_std]
#![no_main]

use core::convert::Infallible;

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::Peripherals;
use embassy_time::Timer;
use heapless::Vec;
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use triad_core::config::AppConfig;
use triad_core::control::SelfTest;
use triad_core::{startup, BusTarget, ControlLoop, EdgeLatch, InitError, SerialEchoEngine};
use triad_hal::uart::UartConfig;
use triad_hal::{Device, InputPin, OutputPin};
use triad_hal_rp2040::gpio::LevelMirror;

mod board;
mod channels;
mod config;
mod tasks;
mod transport;

use channels::ECHO_BUF_SIZE;
use transport::ChannelTransport;

/// Control loop passes between statistics reports
const STATS_EVERY: u32 = 20;

// Address comes from configuration, so the target is built at runtime
static BUS_TARGET: StaticCell<BusTarget> = StaticCell::new();

static BUTTON_LATCH: EdgeLatch = EdgeLatch::new(board::BUTTON_PIN);
static BUTTON_LEVEL: LevelMirror = LevelMirror::new(true);

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Triad firmware starting...");

    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    let config = config::load();

    match run(spawner, p, &config).await {
        Ok(never) => match never {},
        Err(e) => error!("Fatal init error: {:?}", e),
    }
}

/// Bring everything up, then run the control loop forever
///
/// Returns only if initialization fails.
async fn run(spawner: Spawner, p: Peripherals, config: &AppConfig) -> Result<Infallible, InitError> {
    let claims = board::claim_pins(config);
    let devices: Vec<&dyn Device, { board::MAX_CLAIMS }> =
        claims.iter().map(|c| c as &dyn Device).collect();
    startup::check(config, &devices)?;
    info!("{} peripherals ready", devices.len());

    let board = board::init(p, config);
    let target: &'static BusTarget = BUS_TARGET.init(BusTarget::new(config.i2c.target_address));

    // Button
    BUTTON_LEVEL.publish(board.button.is_high());
    spawner.spawn(tasks::button_task(board.button, &BUTTON_LEVEL, &BUTTON_LATCH).unwrap());

    // Serial echo
    if let Some((tx, rx)) = board.uart {
        let line = UartConfig {
            baudrate: config.uart.baudrate,
            idle_timeout_us: config.uart.idle_timeout_us,
        };
        if line.idle_timeout_us < line.char_time_us() {
            warn!(
                "Idle timeout {}us is shorter than one character ({}us), frames will split",
                line.idle_timeout_us,
                line.char_time_us()
            );
        }

        spawner.spawn(tasks::serial_rx_task(rx).unwrap());
        spawner.spawn(tasks::serial_tx_task(tx).unwrap());

        let mut engine = SerialEchoEngine::<ECHO_BUF_SIZE>::new(config.echo_config());
        let mut transport = ChannelTransport;
        engine
            .start(&mut transport)
            .map_err(|_| InitError::ReceiveEnable)?;
        spawner.spawn(tasks::echo_task(engine, transport).unwrap());

        info!(
            "Serial echo on UART0 at {} baud, idle {}us, on abort {:?}",
            config.uart.baudrate, config.uart.idle_timeout_us, config.uart.abort_policy
        );
    }

    // I2C target
    if let Some(device) = board.target {
        spawner.spawn(tasks::i2c_target_task(device, target).unwrap());
    }

    // I2C initiator, used only by the self-test burst
    let mut initiator = board.initiator;
    if initiator.is_some() {
        info!(
            "Self-test enabled: {} bytes to 0x{:02X} every pass",
            config.i2c.self_test_pattern.len(),
            config.i2c.target_address
        );
    }

    let mut control = ControlLoop::new(config, &BUTTON_LATCH, target, board.led, &BUTTON_LEVEL);
    control.init();
    info!("All tasks spawned, entering control loop");

    loop {
        let pass = control.iterate(initiator.as_mut()).await;

        match pass.self_test {
            SelfTest::Failed(fault) => warn!("Self-test write failed: {:?}", fault),
            SelfTest::Deferred => debug!("Self-test deferred, target busy"),
            SelfTest::Sent(n) => trace!("Self-test sent {} bytes", n),
            SelfTest::Disabled => {}
        }
        if pass.pressed {
            info!("Button press observed");
        }
        debug!(
            "Button {}, I2C last byte 0x{:02X}, indicator {}",
            if pass.button_high { "high" } else { "low" },
            target.last_byte(),
            control.indicator().is_set_high()
        );

        let stats = control.stats();
        if stats.iterations % STATS_EVERY == 0 {
            debug!(
                "Loop stats: {} passes, {} presses, self-test {} sent / {} deferred / {} failed",
                stats.iterations,
                stats.presses,
                stats.self_tests_sent,
                stats.self_tests_deferred,
                stats.self_tests_failed
            );
        }

        Timer::after_millis(config.control.period_ms as u64).await;
    }
}
