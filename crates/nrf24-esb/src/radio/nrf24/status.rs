use embedded_hal::{delay::DelayNs, digital::OutputPin, spi::SpiDevice};

use crate::{
    radio::{
        prelude::{EsbRegisters, EsbStatus},
        MonotonicMs, Nrf24, Nrf24Error,
    },
    types::{FifoStatus, StatusFlags},
};

use super::{bit_fields::ObserveTx, bits, commands, mnemonics, registers};

impl<SPI, DO, DELAY, CLK> Nrf24<SPI, DO, DELAY, CLK>
where
    SPI: SpiDevice,
    DO: OutputPin,
    DELAY: DelayNs,
    CLK: MonotonicMs,
{
    /// Check a STATUS flag and clear only that flag if asked to.
    ///
    /// Writing a 1 clears a flag, so the flags that are not in `mask` are untouched.
    fn get_clear_flag(
        &mut self,
        mask: u8,
        clear: bool,
    ) -> Result<bool, Nrf24Error<SPI::Error, DO::Error>> {
        let is_set = self.read_status()?.into_bits() & mask != 0;
        if is_set && clear {
            self.spi_write_byte(registers::STATUS, mask)?;
        }
        Ok(is_set)
    }

    /// Clear the given STATUS flags without reading them first.
    pub(crate) fn clear_flags(&mut self, mask: u8) -> Result<(), Nrf24Error<SPI::Error, DO::Error>> {
        self.spi_write_byte(registers::STATUS, mask & StatusFlags::IRQ_MASK)
    }

    /// A CONFIG mask bit of 1 disables the IRQ event.
    fn route_irq(&mut self, bit: u8, enable: bool) -> Result<bool, Nrf24Error<SPI::Error, DO::Error>> {
        Ok(!self.toggle_bit(registers::CONFIG, bit, !enable)?)
    }
}

impl<SPI, DO, DELAY, CLK> EsbStatus for Nrf24<SPI, DO, DELAY, CLK>
where
    SPI: SpiDevice,
    DO: OutputPin,
    DELAY: DelayNs,
    CLK: MonotonicMs,
{
    type StatusErrorType = Nrf24Error<SPI::Error, DO::Error>;

    fn rx_data_ready(&mut self, clear: bool) -> Result<bool, Self::StatusErrorType> {
        self.get_clear_flag(mnemonics::MASK_RX_DR, clear)
    }

    fn tx_data_sent(&mut self, clear: bool) -> Result<bool, Self::StatusErrorType> {
        self.get_clear_flag(mnemonics::MASK_TX_DS, clear)
    }

    fn max_retries_exceeded(&mut self, clear: bool) -> Result<bool, Self::StatusErrorType> {
        self.get_clear_flag(mnemonics::MASK_MAX_RT, clear)
    }

    fn clear_status_flags(&mut self) -> Result<(), Self::StatusErrorType> {
        self.clear_flags(StatusFlags::IRQ_MASK)
    }

    fn fifo_status(&mut self) -> Result<FifoStatus, Self::StatusErrorType> {
        Ok(FifoStatus::from_bits(
            self.read_register(registers::FIFO_STATUS)?,
        ))
    }

    fn data_pipe(&mut self) -> Result<Option<u8>, Self::StatusErrorType> {
        Ok(self.read_status()?.data_pipe())
    }

    fn lost_packet_count(&mut self) -> Result<u8, Self::StatusErrorType> {
        let observed = ObserveTx::from_bits(self.read_register(registers::OBSERVE_TX)?);
        Ok(observed.plos_cnt())
    }

    fn retry_attempts(&mut self) -> Result<u8, Self::StatusErrorType> {
        let observed = ObserveTx::from_bits(self.read_register(registers::OBSERVE_TX)?);
        Ok(observed.arc_cnt())
    }

    fn enable_rx_irq(&mut self, enable: bool) -> Result<bool, Self::StatusErrorType> {
        self.route_irq(bits::MASK_RX_DR, enable)
    }

    fn enable_tx_irq(&mut self, enable: bool) -> Result<bool, Self::StatusErrorType> {
        self.route_irq(bits::MASK_TX_DS, enable)
    }

    fn enable_max_retry_irq(&mut self, enable: bool) -> Result<bool, Self::StatusErrorType> {
        self.route_irq(bits::MASK_MAX_RT, enable)
    }

    fn flush_tx(&mut self) -> Result<(), Self::StatusErrorType> {
        self.spi_read(0, commands::FLUSH_TX)
    }

    fn flush_rx(&mut self) -> Result<(), Self::StatusErrorType> {
        self.spi_read(0, commands::FLUSH_RX)
    }

    fn reuse_tx_payload(&mut self) -> Result<(), Self::StatusErrorType> {
        self.spi_read(0, commands::REUSE_TX_PL)
    }
}
