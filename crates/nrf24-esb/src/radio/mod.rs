//! A module to encapsulate all things related to radio operation.
pub mod prelude;

mod nrf24;
pub use nrf24::{bits, commands, mnemonics, registers, Nrf24, Nrf24Error};

mod config;
pub use config::{
    address_width_code, retry_delay_steps, ConfigError, RadioConfig, DEFAULT_ADDRESS,
    RETRY_DELAY_STEP_US,
};

mod clock;
#[cfg(feature = "std")]
pub use clock::StdClock;
pub use clock::{ticks_diff, MonotonicMs};
