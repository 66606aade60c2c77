//! Raspberry Pi Pico wiring
//!
//! Pin numbers and the peripherals built on them live together here, so
//! the startup claims and the real wiring come from one place.
//!
//! The initiator (I2C0) and the target (I2C1) share one bus: GPIO4/5 and
//! GPIO6/7 are jumpered together and pulled up externally.

use embassy_rp::gpio::{Input, Level, Output, Pull};
use embassy_rp::i2c::{self as rp_i2c, Async, I2c};
use embassy_rp::i2c_slave::I2cSlave;
use embassy_rp::peripherals::{I2C0, I2C1, UART0};
use embassy_rp::uart::{
    BufferedInterruptHandler, BufferedUartRx, BufferedUartTx, Config as RpUartConfig, Uart,
};
use embassy_rp::{bind_interrupts, Peripherals};
use heapless::Vec;
use static_cell::StaticCell;

use triad_core::config::AppConfig;
use triad_hal_rp2040::gpio::{Button, Led, PinAllocator, PinClaim};
use triad_hal_rp2040::i2c::{self, initiator_config, target_config, I2cId};
use triad_hal_rp2040::uart::{self, UartId};

use crate::channels::ECHO_BUF_SIZE;

pub const LED_PIN: u8 = 25;
pub const BUTTON_PIN: u8 = 15;

pub const UART_TX_PIN: u8 = 0;
pub const UART_RX_PIN: u8 = 1;

pub const INITIATOR_SDA_PIN: u8 = 4;
pub const INITIATOR_SCL_PIN: u8 = 5;

pub const TARGET_SDA_PIN: u8 = 6;
pub const TARGET_SCL_PIN: u8 = 7;

/// Upper bound on peripherals checked at startup
pub const MAX_CLAIMS: usize = 5;

bind_interrupts!(struct Irqs {
    UART0_IRQ => BufferedInterruptHandler<UART0>;
    I2C0_IRQ => rp_i2c::InterruptHandler<I2C0>;
    I2C1_IRQ => rp_i2c::InterruptHandler<I2C1>;
});

// Static cells for UART buffers (must live forever)
static TX_BUF: StaticCell<[u8; ECHO_BUF_SIZE]> = StaticCell::new();
static RX_BUF: StaticCell<[u8; ECHO_BUF_SIZE]> = StaticCell::new();

/// Claim the pins of every peripheral the configuration enables
///
/// Each claim reports ready only if its pins are free and can carry the
/// peripheral's function.
pub fn claim_pins(config: &AppConfig) -> Vec<PinClaim, MAX_CLAIMS> {
    let mut alloc = PinAllocator::new();
    let mut claims = Vec::new();

    let _ = claims.push(PinClaim::new("led", &[LED_PIN], &mut alloc));
    let _ = claims.push(PinClaim::new("button", &[BUTTON_PIN], &mut alloc));

    if config.capabilities.has_uart {
        let _ = claims.push(
            PinClaim::new("uart0", &[UART_TX_PIN, UART_RX_PIN], &mut alloc)
                .with_function_check(uart::pins_match(UartId::Uart0, UART_TX_PIN, UART_RX_PIN)),
        );
    }

    if config.capabilities.has_i2c {
        let _ = claims.push(
            PinClaim::new("i2c1 target", &[TARGET_SDA_PIN, TARGET_SCL_PIN], &mut alloc)
                .with_function_check(i2c::pins_match(I2cId::I2c1, TARGET_SDA_PIN, TARGET_SCL_PIN)),
        );
    }

    if config.self_test_enabled() {
        let _ = claims.push(
            PinClaim::new("i2c0 initiator", &[INITIATOR_SDA_PIN, INITIATOR_SCL_PIN], &mut alloc)
                .with_function_check(i2c::pins_match(
                    I2cId::I2c0,
                    INITIATOR_SDA_PIN,
                    INITIATOR_SCL_PIN,
                )),
        );
    }

    claims
}

/// Peripherals the application runs on
///
/// Optional members are built only when their capability is enabled.
pub struct Board {
    pub led: Led,
    pub button: Button,
    pub uart: Option<(BufferedUartTx, BufferedUartRx)>,
    pub target: Option<I2cSlave<'static, I2C1>>,
    pub initiator: Option<I2c<'static, I2C0, Async>>,
}

/// Build the board's peripherals on the pins claimed above
///
/// Call once, after [`claim_pins`] passed the startup check.
pub fn init(p: Peripherals, config: &AppConfig) -> Board {
    // LED_PIN
    let led = Led::new(Output::new(p.PIN_25, Level::Low));

    // BUTTON_PIN
    let pull = if config.button.active_low { Pull::Up } else { Pull::Down };
    let button = Button::new(Input::new(p.PIN_15, pull), config.button.active_low);

    // UART_TX_PIN, UART_RX_PIN
    let uart = config.capabilities.has_uart.then(|| {
        let mut uart_config = RpUartConfig::default();
        uart_config.baudrate = config.uart.baudrate;

        let tx_buf = TX_BUF.init([0u8; ECHO_BUF_SIZE]);
        let rx_buf = RX_BUF.init([0u8; ECHO_BUF_SIZE]);

        let uart = Uart::new_blocking(p.UART0, p.PIN_0, p.PIN_1, uart_config);
        uart.into_buffered(Irqs, tx_buf, rx_buf).split()
    });

    // TARGET_SCL_PIN, TARGET_SDA_PIN
    let target = config.capabilities.has_i2c.then(|| {
        I2cSlave::new(
            p.I2C1,
            p.PIN_7,
            p.PIN_6,
            Irqs,
            target_config(config.i2c.target_address),
        )
    });

    // INITIATOR_SCL_PIN, INITIATOR_SDA_PIN
    let initiator = config.self_test_enabled().then(|| {
        I2c::new_async(
            p.I2C0,
            p.PIN_5,
            p.PIN_4,
            Irqs,
            initiator_config(config.i2c.frequency),
        )
    });

    Board {
        led,
        button,
        uart,
        target,
        initiator,
    }
}
