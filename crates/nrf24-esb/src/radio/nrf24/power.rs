use embedded_hal::{delay::DelayNs, digital::OutputPin, spi::SpiDevice};

use crate::radio::{
    prelude::{EsbPower, EsbRegisters, EsbStatus},
    MonotonicMs, Nrf24, Nrf24Error,
};

use super::{bits, registers};

impl<SPI, DO, DELAY, CLK> EsbPower for Nrf24<SPI, DO, DELAY, CLK>
where
    SPI: SpiDevice,
    DO: OutputPin,
    DELAY: DelayNs,
    CLK: MonotonicMs,
{
    type PowerErrorType = Nrf24Error<SPI::Error, DO::Error>;

    /// In power standby mode (when not receiving nor transmitting), a non-PA/LNA radio
    /// will consume about 26uA (.026mA).
    fn power_on(&mut self) -> Result<bool, Self::PowerErrorType> {
        if self._is_on {
            return Ok(true);
        }
        info!("nRF24L01 powering up");
        self.ce_pin.set_low().map_err(Nrf24Error::Gpo)?;
        self._delay_impl.delay_ms(100);
        if !self.check_device_responsive()? {
            warn!("nRF24L01 is not responsive; staying powered down");
            self._is_on = false;
            return Ok(false);
        }

        self.toggle_bit(registers::CONFIG, bits::PWR_UP, true)?;
        // complete the transition to standby
        self.pulse_ce()?;
        self._last_payload_length = 0;
        self._is_on = true;
        info!("nRF24L01 powered up");
        Ok(true)
    }

    /// In full power down mode (a sleep state), the radio will consume approximately
    /// 900nA (.0009mA).
    fn power_off(&mut self) -> Result<(), Self::PowerErrorType> {
        if !self._is_on {
            return Ok(());
        }
        info!("nRF24L01 powering down");
        self.toggle_bit(registers::CONFIG, bits::PWR_UP, false)?;
        self.pulse_ce()?;
        self.flush_tx()?;
        self.flush_rx()?;
        self.clear_status_flags()?;
        self._is_on = false;
        self._last_payload_length = 0;
        info!("nRF24L01 powered down");
        Ok(())
    }

    fn check_device_responsive(&mut self) -> Result<bool, Self::PowerErrorType> {
        let was_up = self.toggle_bit(registers::CONFIG, bits::PWR_UP, false)?;
        let was_up_after_clear = self.toggle_bit(registers::CONFIG, bits::PWR_UP, true)?;
        Ok(was_up != was_up_after_clear)
    }

    fn is_powered(&self) -> bool {
        self._is_on
    }
}
