use embedded_hal::{delay::DelayNs, digital::OutputPin, spi::SpiDevice};

pub(crate) mod bit_fields;
mod constants;
mod mode;
mod power;
mod register_file;
mod sequencer;
mod status;
mod transfer;
pub use constants::{bits, commands, mnemonics, registers};

use super::{prelude::EsbPower, ConfigError, MonotonicMs, RadioConfig};
use crate::{Role, StatusFlags};

/// An collection of error types to describe hardware malfunctions.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Nrf24Error<SPI, DO> {
    /// Represents a SPI transaction error.
    Spi(SPI),
    /// Represents a DigitalOutput error.
    Gpo(DO),
    /// A payload transaction only read back the idle bus level.
    ///
    /// The chip is disconnected or not answering; the driver is now powered
    /// down and [`EsbPower::power_on()`] must succeed before using it again.
    NotResponding,
    /// Represents a corruption of binary data (as it was transferred over the SPI bus' MISO)
    ///
    /// This is returned when the chip reports a payload longer than 32 bytes.
    /// The RX FIFO is flushed before this error is returned.
    BinaryCorruption,
    /// The [`RadioConfig`] given to [`Nrf24::new()`] is invalid.
    Config(ConfigError),
    /// The operation requires the driver to be powered on.
    PoweredDown,
}

impl<SPI, DO> From<ConfigError> for Nrf24Error<SPI, DO> {
    fn from(value: ConfigError) -> Self {
        Nrf24Error::Config(value)
    }
}

/// This struct implements the [`Esb*` traits](mod@crate::radio::prelude)
/// for the nRF24L01 transceiver.
///
/// One instance owns one physical chip: the SPI device (including its CSN pin),
/// the CE pin and the scratch buffer used for every transaction.
pub struct Nrf24<SPI, DO, DELAY, CLK> {
    _spi: SPI,
    /// The CE pin for the radio.
    ///
    /// This really only exposed for advanced manipulation of active TX mode.
    /// It is strongly recommended to use the [`EsbMode`](trait@crate::radio::prelude::EsbMode)
    /// and [`EsbTransfer`](trait@crate::radio::prelude::EsbTransfer) methods
    /// because those guarantee proper radio usage.
    pub ce_pin: DO,
    _delay_impl: DELAY,
    _clock: CLK,
    _buf: [u8; 33],
    _status: StatusFlags,
    _role: Role,
    _config: RadioConfig,
    _is_on: bool,
    _last_payload_length: u8,
}

impl<SPI, DO, DELAY, CLK> Nrf24<SPI, DO, DELAY, CLK>
where
    SPI: SpiDevice,
    DO: OutputPin,
    DELAY: DelayNs,
    CLK: MonotonicMs,
{
    /// Instantiate an [`Nrf24`] object for use on the specified
    /// `spi` bus with the given `ce_pin`.
    ///
    /// The radio's CSN pin (aka Chip Select pin) shall be defined
    /// when instantiating the [`SpiDevice`](trait@embedded_hal::spi::SpiDevice)
    /// object (passed to the `spi` parameter).
    ///
    /// Nothing is sent over the bus; the driver starts powered down.
    /// See [`Nrf24::open()`] to also power on.
    pub fn new(
        ce_pin: DO,
        spi: SPI,
        delay_impl: DELAY,
        clock: CLK,
        role: Role,
        config: RadioConfig,
    ) -> Nrf24<SPI, DO, DELAY, CLK> {
        Nrf24 {
            ce_pin,
            _spi: spi,
            _delay_impl: delay_impl,
            _clock: clock,
            _buf: [0u8; 33],
            _status: StatusFlags::from_bits(0),
            _role: role,
            _config: config,
            _is_on: false,
            _last_payload_length: 0,
        }
    }

    /// Instantiate an [`Nrf24`] object (like [`Nrf24::new()`]) and power it on.
    ///
    /// If the chip does not respond, the returned driver is still usable but
    /// powered down; check [`EsbPower::is_powered()`].
    pub fn open(
        ce_pin: DO,
        spi: SPI,
        delay_impl: DELAY,
        clock: CLK,
        role: Role,
        config: RadioConfig,
    ) -> Result<Nrf24<SPI, DO, DELAY, CLK>, Nrf24Error<SPI::Error, DO::Error>> {
        let mut radio = Self::new(ce_pin, spi, delay_impl, clock, role, config);
        radio.power_on()?;
        Ok(radio)
    }

    /// The configuration applied by the [`EsbMode`](trait@crate::radio::prelude::EsbMode) methods.
    pub fn config(&self) -> &RadioConfig {
        &self._config
    }

    /// Give back the objects this driver was created with.
    pub fn release(self) -> (DO, SPI, DELAY, CLK) {
        (self.ce_pin, self._spi, self._delay_impl, self._clock)
    }

    fn spi_transfer(&mut self, len: u8) -> Result<(), Nrf24Error<SPI::Error, DO::Error>> {
        self._spi
            .transfer_in_place(&mut self._buf[..len as usize])
            .map_err(Nrf24Error::Spi)?;
        self._status = StatusFlags::from_bits(self._buf[0]);
        Ok(())
    }

    /// This is also used to write SPI commands that consist of 1 byte:
    /// ```ignore
    /// self.spi_read(0, commands::NOP)?;
    /// // STATUS register is now stored in self._status
    /// ```
    fn spi_read(&mut self, len: u8, command: u8) -> Result<(), Nrf24Error<SPI::Error, DO::Error>> {
        self._buf[0] = command;
        self._buf[1..=len as usize].fill(0);
        self.spi_transfer(len + 1)
    }

    fn spi_write_byte(
        &mut self,
        command: u8,
        byte: u8,
    ) -> Result<(), Nrf24Error<SPI::Error, DO::Error>> {
        self._buf[0] = command | commands::W_REGISTER;
        self._buf[1] = byte;
        self.spi_transfer(2)
    }

    fn spi_write_buf(
        &mut self,
        command: u8,
        buf: &[u8],
    ) -> Result<(), Nrf24Error<SPI::Error, DO::Error>> {
        self._buf[0] = command | commands::W_REGISTER;
        let buf_len = buf.len().min(constants::MAX_PAYLOAD);
        self._buf[1..(buf_len + 1)].copy_from_slice(&buf[..buf_len]);
        self.spi_transfer(buf_len as u8 + 1)
    }

    /// Pulse CE high for 10 microseconds.
    fn pulse_ce(&mut self) -> Result<(), Nrf24Error<SPI::Error, DO::Error>> {
        self.ce_pin.set_high().map_err(Nrf24Error::Gpo)?;
        self._delay_impl.delay_us(10);
        self.ce_pin.set_low().map_err(Nrf24Error::Gpo)
    }

    /// Mark the driver powered down if the last transaction only read back
    /// the idle bus level.
    fn check_bus_idle(&mut self) -> Result<(), Nrf24Error<SPI::Error, DO::Error>> {
        if self._buf[0] == constants::BUS_IDLE {
            warn!("nRF24L01 is not responding; marking it powered down");
            self._is_on = false;
            self._last_payload_length = 0;
            return Err(Nrf24Error::NotResponding);
        }
        Ok(())
    }
}
