use embedded_hal::{delay::DelayNs, digital::OutputPin, spi::SpiDevice};

use crate::{
    radio::{
        prelude::{EsbMode, EsbRegisters},
        MonotonicMs, Nrf24, Nrf24Error,
    },
    Role,
};

use super::{bits, registers};

impl<SPI, DO, DELAY, CLK> Nrf24<SPI, DO, DELAY, CLK>
where
    SPI: SpiDevice,
    DO: OutputPin,
    DELAY: DelayNs,
    CLK: MonotonicMs,
{
    /// Refuse to reconfigure a powered down chip, or with an invalid configuration.
    ///
    /// On success, the chip is left in power down mode (PWR_UP cleared),
    /// which is where its configuration registers may be written.
    fn enter_standby(&mut self) -> Result<(), Nrf24Error<SPI::Error, DO::Error>> {
        if !self._is_on {
            warn!("nRF24L01 is powered down; not configuring it");
            return Err(Nrf24Error::PoweredDown);
        }
        self._config.validate()?;
        self.toggle_bit(registers::CONFIG, bits::PWR_UP, false)?;
        Ok(())
    }
}

impl<SPI, DO, DELAY, CLK> EsbMode for Nrf24<SPI, DO, DELAY, CLK>
where
    SPI: SpiDevice,
    DO: OutputPin,
    DELAY: DelayNs,
    CLK: MonotonicMs,
{
    type ModeErrorType = Nrf24Error<SPI::Error, DO::Error>;

    /// The TX address is programmed with the RX pipe 0 address, so the
    /// auto-ack packets coming back from the PRX are accepted on pipe 0.
    fn configure_as_transmitter(&mut self) -> Result<(), Self::ModeErrorType> {
        self.enter_standby()?;
        // stop listening; payloads are sent on CE pulses
        self.ce_pin.set_low().map_err(Nrf24Error::Gpo)?;
        self.apply_config()?;
        self.toggle_bit(registers::CONFIG, bits::PRIM_RX, false)?;
        let config = self._config;
        self.spi_write_buf(registers::TX_ADDR, config.rx_address())?;
        self.toggle_bit(registers::CONFIG, bits::PWR_UP, true)?;
        info!("nRF24L01 configured as {}", Role::Initiator);
        Ok(())
    }

    fn configure_as_receiver(&mut self) -> Result<(), Self::ModeErrorType> {
        self.enter_standby()?;
        self.apply_config()?;
        self.toggle_bit(registers::CONFIG, bits::PRIM_RX, true)?;
        self.toggle_bit(registers::CONFIG, bits::PWR_UP, true)?;
        self.ce_pin.set_high().map_err(Nrf24Error::Gpo)?;
        info!("nRF24L01 configured as {}", Role::Responder);
        Ok(())
    }

    fn role(&self) -> Role {
        self._role
    }
}
