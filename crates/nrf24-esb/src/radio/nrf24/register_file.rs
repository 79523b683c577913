use embedded_hal::{delay::DelayNs, digital::OutputPin, spi::SpiDevice};

use crate::{
    radio::{prelude::EsbRegisters, MonotonicMs, Nrf24, Nrf24Error},
    StatusFlags,
};

use super::commands;

impl<SPI, DO, DELAY, CLK> EsbRegisters for Nrf24<SPI, DO, DELAY, CLK>
where
    SPI: SpiDevice,
    DO: OutputPin,
    DELAY: DelayNs,
    CLK: MonotonicMs,
{
    type RegisterErrorType = Nrf24Error<SPI::Error, DO::Error>;

    fn read_register(&mut self, reg: u8) -> Result<u8, Self::RegisterErrorType> {
        self.spi_read(1, reg)?;
        Ok(self._buf[1])
    }

    fn write_register(&mut self, reg: u8, value: u8) -> Result<(), Self::RegisterErrorType> {
        self.spi_write_byte(reg, value)
    }

    fn write_register_buf(&mut self, reg: u8, buf: &[u8]) -> Result<(), Self::RegisterErrorType> {
        self.spi_write_buf(reg, buf)
    }

    fn toggle_bit(
        &mut self,
        reg: u8,
        bit: u8,
        set_high: bool,
    ) -> Result<bool, Self::RegisterErrorType> {
        let mask = 1u8 << (bit & 7);
        let current = self.read_register(reg)?;
        let was_high = current & mask != 0;
        if was_high != set_high {
            let new_val = if set_high {
                current | mask
            } else {
                current & !mask
            };
            self.spi_write_byte(reg, new_val)?;
        }
        Ok(was_high)
    }

    fn read_status(&mut self) -> Result<StatusFlags, Self::RegisterErrorType> {
        self.spi_read(0, commands::NOP)?;
        Ok(self._status)
    }
}
