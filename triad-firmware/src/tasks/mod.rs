//! Embassy async tasks
//!
//! Each task runs independently and communicates via channels/signals.

pub mod button;
pub mod echo;
pub mod i2c_target;
pub mod serial_rx;
pub mod serial_tx;

pub use button::button_task;
pub use echo::echo_task;
pub use i2c_target::i2c_target_task;
pub use serial_rx::serial_rx_task;
pub use serial_tx::serial_tx_task;
