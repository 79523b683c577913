//! An async, `no_std` driver for the nRF24L01 transceiver's Enhanced ShockBurst
//! link layer (auto-acknowledgement, auto-retry, ACK payloads and dynamic
//! payload lengths).
//!
//! A driver instance is bound to one [`Role`] for its whole lifetime:
//! the [`Role::Initiator`] (PTX) originates every exchange and the
//! [`Role::Responder`] (PRX) listens and answers with ACK payloads.
//!
//! ```ignore
//! use nrf24_esb::{radio::{prelude::*, Nrf24, RadioConfig}, Role, TransferStatus};
//!
//! let mut radio = Nrf24::open(ce_pin, spi, delay, clock, Role::Initiator, RadioConfig::default())?;
//! radio.configure()?;
//! let mut response = [0u8; 16];
//! match radio.exchange(b"ping", &mut response).await? {
//!     TransferStatus::MsgRecv => { /* use `response` */ }
//!     status => { /* retry later */ }
//! }
//! ```
//!
//! ## Lifecycle API
//!
//! - [`Nrf24::new()`](fn@crate::radio::Nrf24::new)
//! - [`Nrf24::open()`](fn@crate::radio::Nrf24::open)
//! - [`Nrf24::power_on()`](radio/struct.Nrf24.html#method.power_on)
//! - [`Nrf24::power_off()`](radio/struct.Nrf24.html#method.power_off)
//! - [`Nrf24::check_device_responsive()`](radio/struct.Nrf24.html#method.check_device_responsive)
//! - [`Nrf24::configure()`](radio/struct.Nrf24.html#method.configure)
//! - [`Nrf24::apply_config()`](fn@crate::radio::Nrf24::apply_config)
//!
//! ## Transfer API
//!
//! - [`Nrf24::exchange()`](radio/struct.Nrf24.html#method.exchange)
//! - [`Nrf24::send()`](radio/struct.Nrf24.html#method.send)
//! - [`Nrf24::check_msg_sent()`](radio/struct.Nrf24.html#method.check_msg_sent)
//! - [`Nrf24::clear_tx_buffer()`](radio/struct.Nrf24.html#method.clear_tx_buffer)
//! - [`Nrf24::any_received()`](radio/struct.Nrf24.html#method.any_received)
//! - [`Nrf24::read_into()`](radio/struct.Nrf24.html#method.read_into)
//!
//! ## Advanced API
//!
//! - [`Nrf24::toggle_bit()`](radio/struct.Nrf24.html#method.toggle_bit)
//! - [`Nrf24::read_status()`](radio/struct.Nrf24.html#method.read_status)
//! - [`Nrf24::fifo_status()`](radio/struct.Nrf24.html#method.fifo_status)
//! - [`Nrf24::lost_packet_count()`](radio/struct.Nrf24.html#method.lost_packet_count)
//! - [`Nrf24::retry_attempts()`](radio/struct.Nrf24.html#method.retry_attempts)
//! - [`Nrf24::reuse_tx_payload()`](radio/struct.Nrf24.html#method.reuse_tx_payload)
//! - [`Nrf24::enable_rx_irq()`](radio/struct.Nrf24.html#method.enable_rx_irq)
//!
#![no_std]

#[cfg(feature = "std")]
extern crate std;

#[macro_use]
mod fmt;

mod types;
pub use types::{DataRate, FifoStatus, PaLevel, Role, SendTimeout, StatusFlags, TransferStatus};
pub mod radio;
