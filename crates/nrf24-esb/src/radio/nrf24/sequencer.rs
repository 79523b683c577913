use embedded_hal::{delay::DelayNs, digital::OutputPin, spi::SpiDevice};

use crate::radio::{
    prelude::{EsbRegisters, EsbStatus},
    MonotonicMs, Nrf24, Nrf24Error,
};

use super::{
    bit_fields::{RfSetup, SetupRetry},
    bits, registers,
};

impl<SPI, DO, DELAY, CLK> Nrf24<SPI, DO, DELAY, CLK>
where
    SPI: SpiDevice,
    DO: OutputPin,
    DELAY: DelayNs,
    CLK: MonotonicMs,
{
    /// Program every Enhanced ShockBurst setting from [`Nrf24::config()`].
    ///
    /// The chip must be in standby or power down mode; the
    /// [`EsbMode`](trait@crate::radio::prelude::EsbMode) methods take care of that.
    /// The configuration is validated first, so nothing is written if it is invalid.
    ///
    /// This also discards all queued payloads and pending IRQ flags.
    pub fn apply_config(&mut self) -> Result<(), Nrf24Error<SPI::Error, DO::Error>> {
        self._config.validate()?;
        let config = self._config;
        // these cannot fail after validate()
        let retry_steps = config.retry_delay_steps()?;
        let address_width = config.address_width_code()?;

        self.clear_status_flags()?;
        self.flush_tx()?;
        self.flush_rx()?;

        let rf_setup = RfSetup::from_bits(self.read_register(registers::RF_SETUP)?)
            .with_pa_level(config.pa_level())
            .with_data_rate(config.data_rate());
        debug!(
            "RF_SETUP: {} at {}",
            rf_setup.data_rate(),
            rf_setup.pa_level()
        );
        self.spi_write_byte(registers::RF_SETUP, rf_setup.into_bits())?;

        // auto-ack requires CRC; always use the 2 byte encoding
        self.toggle_bit(registers::CONFIG, bits::EN_CRC, true)?;
        self.toggle_bit(registers::CONFIG, bits::CRCO, true)?;

        let setup_retry = SetupRetry::from_bits(self.read_register(registers::SETUP_RETR)?)
            .with_ard(retry_steps)
            .with_arc(config.retry_count());
        self.spi_write_byte(registers::SETUP_RETR, setup_retry.into_bits())?;

        self.spi_write_byte(registers::RF_CH, config.channel())?;
        self.spi_write_byte(registers::SETUP_AW, address_width)?;

        self.toggle_bit(registers::EN_RXADDR, 0, true)?;
        self.spi_write_buf(registers::RX_ADDR_P0, config.rx_address())?;
        self.toggle_bit(registers::EN_AA, 0, true)?;
        self.toggle_bit(registers::FEATURE, bits::EN_ACK_PAY, true)?;
        self.toggle_bit(registers::FEATURE, bits::EN_DYN_ACK, config.ask_no_ack())?;

        let dynamic = config.dynamic_payloads();
        self.toggle_bit(registers::DYNPD, 0, dynamic)?;
        self.toggle_bit(registers::FEATURE, bits::EN_DPL, dynamic)?;
        if !dynamic {
            self.spi_write_byte(registers::RX_PW_P0, config.payload_length())?;
        }
        Ok(())
    }
}
