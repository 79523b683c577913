//! This module defines the generic traits that may
//! need to imported to use radio implementations.
//!
//! Since rustc only compiles objects that are used,
//! it is convenient to import these traits with the `*` syntax.
//!
//! ```
//! use nrf24_esb::radio::prelude::*;
//! ```

use crate::types::{FifoStatus, Role, SendTimeout, StatusFlags, TransferStatus};

/// A trait to represent raw access to the transceiver's register file.
///
/// Every method is one complete bus transaction (or, for
/// [`EsbRegisters::toggle_bit()`], one read followed by at most one write).
/// Because every method takes `&mut self`, no other transaction can
/// interleave with them.
pub trait EsbRegisters {
    type RegisterErrorType;

    /// Read a single byte register.
    fn read_register(&mut self, reg: u8) -> Result<u8, Self::RegisterErrorType>;

    /// Write a single byte register.
    fn write_register(&mut self, reg: u8, value: u8) -> Result<(), Self::RegisterErrorType>;

    /// Write a multi-byte register (like a pipe address).
    ///
    /// At most 32 bytes of `buf` are written.
    fn write_register_buf(&mut self, reg: u8, buf: &[u8]) -> Result<(), Self::RegisterErrorType>;

    /// Set or clear a single `bit` (range [0, 7]) of the register `reg`.
    ///
    /// Returns the state of the bit before this call. The register is only
    /// written if the bit's state actually changes, so calling this twice
    /// with the same `set_high` value issues exactly one write.
    fn toggle_bit(&mut self, reg: u8, bit: u8, set_high: bool)
        -> Result<bool, Self::RegisterErrorType>;

    /// Fetch the STATUS register with a single NOP command.
    fn read_status(&mut self) -> Result<StatusFlags, Self::RegisterErrorType>;
}

/// A trait to represent the transceiver's status flags and FIFOs.
pub trait EsbStatus {
    type StatusErrorType;

    /// Is the "RX Data Ready" flag asserted?
    ///
    /// If it is and `clear` is `true`, then only this flag is cleared.
    fn rx_data_ready(&mut self, clear: bool) -> Result<bool, Self::StatusErrorType>;

    /// Is the "TX Data Sent" flag asserted?
    ///
    /// If it is and `clear` is `true`, then only this flag is cleared.
    fn tx_data_sent(&mut self, clear: bool) -> Result<bool, Self::StatusErrorType>;

    /// Is the "Maximum Retries exceeded" flag asserted?
    ///
    /// If it is and `clear` is `true`, then only this flag is cleared.
    /// Nothing more can be transmitted until this flag is cleared.
    fn max_retries_exceeded(&mut self, clear: bool) -> Result<bool, Self::StatusErrorType>;

    /// Clear all three IRQ flags in the STATUS register.
    fn clear_status_flags(&mut self) -> Result<(), Self::StatusErrorType>;

    /// Read the FIFO_STATUS register.
    fn fifo_status(&mut self) -> Result<FifoStatus, Self::StatusErrorType>;

    /// Is the TX FIFO full?
    fn tx_fifo_full(&mut self) -> Result<bool, Self::StatusErrorType> {
        Ok(self.fifo_status()?.tx_full())
    }

    /// Is the TX FIFO empty?
    fn tx_fifo_empty(&mut self) -> Result<bool, Self::StatusErrorType> {
        Ok(self.fifo_status()?.tx_empty())
    }

    /// Is the RX FIFO full?
    fn rx_fifo_full(&mut self) -> Result<bool, Self::StatusErrorType> {
        Ok(self.fifo_status()?.rx_full())
    }

    /// Is the RX FIFO empty?
    fn rx_fifo_empty(&mut self) -> Result<bool, Self::StatusErrorType> {
        Ok(self.fifo_status()?.rx_empty())
    }

    /// The pipe number of the payload at the head of the RX FIFO, if any.
    fn data_pipe(&mut self) -> Result<Option<u8>, Self::StatusErrorType>;

    /// Packets lost since the RF channel was last written (saturates at 15).
    fn lost_packet_count(&mut self) -> Result<u8, Self::StatusErrorType>;

    /// Retransmissions used by the last transmitted packet.
    fn retry_attempts(&mut self) -> Result<u8, Self::StatusErrorType>;

    /// Route (or stop routing) the "RX Data Ready" event to the IRQ pin.
    ///
    /// Returns whether the event was routed before this call.
    fn enable_rx_irq(&mut self, enable: bool) -> Result<bool, Self::StatusErrorType>;

    /// Route (or stop routing) the "TX Data Sent" event to the IRQ pin.
    ///
    /// Returns whether the event was routed before this call.
    fn enable_tx_irq(&mut self, enable: bool) -> Result<bool, Self::StatusErrorType>;

    /// Route (or stop routing) the "Maximum Retries exceeded" event to the IRQ pin.
    ///
    /// Returns whether the event was routed before this call.
    fn enable_max_retry_irq(&mut self, enable: bool) -> Result<bool, Self::StatusErrorType>;

    /// Discard everything in the TX FIFO.
    fn flush_tx(&mut self) -> Result<(), Self::StatusErrorType>;

    /// Discard everything in the RX FIFO.
    fn flush_rx(&mut self) -> Result<(), Self::StatusErrorType>;

    /// Keep re-transmitting the last payload in the TX FIFO on every CE pulse.
    ///
    /// This stays active until the TX FIFO is flushed or a new payload is written.
    fn reuse_tx_payload(&mut self) -> Result<(), Self::StatusErrorType>;
}

/// A trait to represent power management of the transceiver.
pub trait EsbPower {
    type PowerErrorType;

    /// Bring the chip out of power down and into standby.
    ///
    /// This waits 100 milliseconds for the chip to settle, then probes it with
    /// [`EsbPower::check_device_responsive()`]. If the probe fails, the driver
    /// stays powered down and `Ok(false)` is returned.
    ///
    /// Does nothing (and returns `Ok(true)`) if already powered on.
    fn power_on(&mut self) -> Result<bool, Self::PowerErrorType>;

    /// Put the chip in power down mode and discard all queued payloads and flags.
    ///
    /// Does nothing if already powered down.
    fn power_off(&mut self) -> Result<(), Self::PowerErrorType>;

    /// Toggle the PWR_UP bit off then on, and report if the register
    /// followed both changes.
    ///
    /// This leaves the chip powered up. A `false` result means the chip is
    /// absent or not answering, not that it is busy.
    fn check_device_responsive(&mut self) -> Result<bool, Self::PowerErrorType>;

    /// Is the driver powered on?
    fn is_powered(&self) -> bool;
}

/// A trait to represent switching the transceiver into its operating role.
///
/// Both roles are entered from standby, and both fail with an error (without
/// touching any register) if the driver is powered down.
pub trait EsbMode {
    type ModeErrorType;

    /// Configure the chip as the primary transmitter (PTX).
    fn configure_as_transmitter(&mut self) -> Result<(), Self::ModeErrorType>;

    /// Configure the chip as the primary receiver (PRX) and start listening.
    ///
    /// CE is left high, so the chip keeps listening until powered down.
    fn configure_as_receiver(&mut self) -> Result<(), Self::ModeErrorType>;

    /// Configure the chip for the role this driver was created with.
    fn configure(&mut self) -> Result<(), Self::ModeErrorType> {
        match self.role() {
            Role::Initiator => self.configure_as_transmitter(),
            Role::Responder => self.configure_as_receiver(),
        }
    }

    /// The role this driver was created with.
    fn role(&self) -> Role;
}

/// A trait to represent the packet exchange state machines.
///
/// The `async` methods poll the chip and yield to the executor on every
/// iteration, so they never block the calling task. If such a future is
/// dropped before it completes, call [`EsbTransfer::clear_tx_buffer()`]
/// before sending again.
///
/// Link outcomes (including failures to deliver) are reported as
/// [`TransferStatus`] values. Errors are reserved for hardware faults.
#[allow(async_fn_in_trait)]
pub trait EsbTransfer {
    type TransferErrorType;

    /// Transmit `out` and wait for the outcome (as PTX).
    ///
    /// If the ACK packet carries a payload, it is read into `incoming` and
    /// [`TransferStatus::MsgRecv`] is returned.
    /// Setting `want_ack` to `false` only has effect if the configuration
    /// enabled [`RadioConfig::with_ask_no_ack()`](fn@crate::radio::RadioConfig::with_ask_no_ack).
    async fn master_exchange(
        &mut self,
        out: &[u8],
        incoming: &mut [u8],
        want_ack: bool,
    ) -> Result<TransferStatus, Self::TransferErrorType>;

    /// Queue `out` as the next ACK payload, then wait for a payload to
    /// arrive and read it into `incoming` (as PRX).
    async fn slave_exchange(
        &mut self,
        out: &[u8],
        incoming: &mut [u8],
    ) -> Result<TransferStatus, Self::TransferErrorType>;

    /// Call [`EsbTransfer::master_exchange()`] or [`EsbTransfer::slave_exchange()`]
    /// depending on the role.
    async fn exchange(
        &mut self,
        out: &[u8],
        incoming: &mut [u8],
    ) -> Result<TransferStatus, Self::TransferErrorType>;

    /// Queue `buf` for transmission (as PTX) without waiting for delivery.
    ///
    /// If the TX FIFO is full, `timeout` decides how long to wait for room.
    /// While waiting, each "Maximum Retries exceeded" event forces another
    /// attempt and consumes one of the `retries` (`None` is unlimited).
    /// Returns [`TransferStatus::MsgPending`] once the payload is queued;
    /// check the outcome with [`EsbTransfer::check_msg_sent()`].
    async fn master_send(
        &mut self,
        buf: &[u8],
        want_ack: bool,
        retries: Option<u16>,
        timeout: SendTimeout,
    ) -> Result<TransferStatus, Self::TransferErrorType>;

    /// Queue `buf` as the next ACK payload (as PRX).
    ///
    /// If the TX FIFO is full, `timeout` decides how long to wait for room.
    async fn slave_send(
        &mut self,
        buf: &[u8],
        timeout: SendTimeout,
    ) -> Result<TransferStatus, Self::TransferErrorType>;

    /// Call [`EsbTransfer::master_send()`] (requesting an ACK) or
    /// [`EsbTransfer::slave_send()`] depending on the role.
    ///
    /// `retries` is ignored by the PRX role.
    async fn send(
        &mut self,
        buf: &[u8],
        retries: Option<u16>,
        timeout: SendTimeout,
    ) -> Result<TransferStatus, Self::TransferErrorType>;

    /// Non-blocking check of the last queued payload's fate.
    fn check_msg_sent(&mut self) -> Result<TransferStatus, Self::TransferErrorType>;

    /// Discard the TX FIFO and clear the TX related flags.
    ///
    /// If `retry_first` is `true`, CE is held high for about a millisecond to
    /// give a pending payload one more chance to go out.
    async fn clear_tx_buffer(&mut self, retry_first: bool) -> Result<(), Self::TransferErrorType>;

    /// Is there a received payload waiting to be read?
    ///
    /// This does not clear the "RX Data Ready" flag.
    fn any_received(&mut self) -> Result<bool, Self::TransferErrorType>;

    /// Read one received payload into `buf` and clear the "RX Data Ready" flag.
    fn read_into(&mut self, buf: &mut [u8]) -> Result<TransferStatus, Self::TransferErrorType>;

    /// Fetch the length of the payload at the head of the RX FIFO.
    ///
    /// Only meaningful when dynamic payloads are enabled.
    fn read_rx_payload_width(&mut self) -> Result<u8, Self::TransferErrorType>;

    /// The length of the last payload read from the RX FIFO.
    ///
    /// With static payloads this is the configured payload length.
    /// This is reset to `0` when powering on or off.
    fn last_payload_length(&self) -> u8;
}
