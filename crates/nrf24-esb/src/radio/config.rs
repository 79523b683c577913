use core::fmt::{Display, Formatter, Result as FmtResult};

use crate::{DataRate, PaLevel};

/// The address used for both the TX pipe and RX pipe 0 by default.
pub const DEFAULT_ADDRESS: [u8; 5] = [0xE1, 0xF0, 0xF0, 0xF0, 0xF0];

/// The length of one auto-retry delay step, in microseconds.
pub const RETRY_DELAY_STEP_US: u16 = 250;

/// A precondition of [`RadioConfig`] that was violated.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// The RF channel is not in range [0, 125].
    InvalidChannel(u8),
    /// An address is not 3, 4, or 5 bytes long.
    InvalidAddressLength(usize),
    /// The TX address and RX pipe 0 address differ in length.
    MismatchedAddressLength { tx: usize, rx: usize },
    /// The static payload length is not in range [1, 32].
    InvalidPayloadLength(u8),
    /// The auto-retry count is not in range [0, 15].
    InvalidRetryCount(u8),
    /// The auto-retry delay is not a multiple of 250 in range [250, 4000].
    InvalidRetryDelay(u16),
}

#[cfg(feature = "defmt")]
impl defmt::Format for ConfigError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            ConfigError::InvalidChannel(c) => defmt::write!(fmt, "invalid channel {=u8}", c),
            ConfigError::InvalidAddressLength(l) => {
                defmt::write!(fmt, "invalid address length {=usize}", l)
            }
            ConfigError::MismatchedAddressLength { tx, rx } => defmt::write!(
                fmt,
                "TX address length {=usize} != RX address length {=usize}",
                tx,
                rx
            ),
            ConfigError::InvalidPayloadLength(l) => {
                defmt::write!(fmt, "invalid payload length {=u8}", l)
            }
            ConfigError::InvalidRetryCount(c) => defmt::write!(fmt, "invalid retry count {=u8}", c),
            ConfigError::InvalidRetryDelay(d) => {
                defmt::write!(fmt, "invalid retry delay {=u16} us", d)
            }
        }
    }
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            ConfigError::InvalidChannel(c) => write!(f, "invalid channel {c} (expected 0-125)"),
            ConfigError::InvalidAddressLength(l) => {
                write!(f, "invalid address length {l} (expected 3-5)")
            }
            ConfigError::MismatchedAddressLength { tx, rx } => {
                write!(f, "TX address length {tx} does not match RX address length {rx}")
            }
            ConfigError::InvalidPayloadLength(l) => {
                write!(f, "invalid payload length {l} (expected 1-32)")
            }
            ConfigError::InvalidRetryCount(c) => write!(f, "invalid retry count {c} (expected 0-15)"),
            ConfigError::InvalidRetryDelay(d) => {
                write!(f, "invalid retry delay {d} us (expected 250-4000 in steps of 250)")
            }
        }
    }
}

/// Convert an auto-retry delay (in microseconds) to the step count stored in
/// the upper nibble of the SETUP_RETR register.
///
/// Only multiples of 250 in range [250, 4000] are accepted.
/// ```
/// use nrf24_esb::radio::retry_delay_steps;
/// assert_eq!(retry_delay_steps(1000), Ok(4));
/// ```
pub const fn retry_delay_steps(delay_us: u16) -> Result<u8, ConfigError> {
    if delay_us < RETRY_DELAY_STEP_US
        || delay_us > RETRY_DELAY_STEP_US * 16
        || delay_us % RETRY_DELAY_STEP_US != 0
    {
        return Err(ConfigError::InvalidRetryDelay(delay_us));
    }
    let steps = delay_us / RETRY_DELAY_STEP_US;
    // 4000 us is 16 steps, which the 4 bit field saturates at 15
    if steps > 15 {
        Ok(15)
    } else {
        Ok(steps as u8)
    }
}

/// Convert an address length (in bytes) to the SETUP_AW register value.
pub const fn address_width_code(length: usize) -> Result<u8, ConfigError> {
    match length {
        3..=5 => Ok(length as u8 - 2),
        _ => Err(ConfigError::InvalidAddressLength(length)),
    }
}

/// An object to configure the radio.
///
/// This struct follows a builder pattern. Since all fields are private, users should
/// start with the [`RadioConfig::default`] constructor, then mutate the object accordingly.
/// ```
/// use nrf24_esb::radio::RadioConfig;
/// let config = RadioConfig::default().with_channel(42);
/// assert!(config.validate().is_ok());
/// ```
///
/// Nothing is checked while building. [`RadioConfig::validate()`] runs before any
/// register is written, so an invalid configuration is never partially applied.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RadioConfig {
    channel: u8,
    tx_address: [u8; 5],
    tx_address_len: usize,
    rx_address: [u8; 5],
    rx_address_len: usize,
    dynamic_payloads: bool,
    payload_length: u8,
    retry_count: u8,
    retry_delay_us: u16,
    data_rate: DataRate,
    pa_level: PaLevel,
    ask_no_ack: bool,
}

impl Default for RadioConfig {
    /// Instantiate a [`RadioConfig`] object with library defaults.
    ///
    /// | feature | default value |
    /// |--------:|:--------------|
    /// | [`RadioConfig::channel()`] | `97` |
    /// | [`RadioConfig::tx_address()`] | `[0xE1, 0xF0, 0xF0, 0xF0, 0xF0]` |
    /// | [`RadioConfig::rx_address()`] | `[0xE1, 0xF0, 0xF0, 0xF0, 0xF0]` |
    /// | [`RadioConfig::dynamic_payloads()`] | `false` |
    /// | [`RadioConfig::payload_length()`] | `16` |
    /// | [`RadioConfig::retry_count()`] | `4` |
    /// | [`RadioConfig::retry_delay_us()`] | `1000` |
    /// | [`RadioConfig::data_rate()`] | [`DataRate::Mbps2`] |
    /// | [`RadioConfig::pa_level()`] | [`PaLevel::Max`] |
    /// | [`RadioConfig::ask_no_ack()`] | `false` |
    fn default() -> Self {
        Self {
            channel: 97,
            tx_address: DEFAULT_ADDRESS,
            tx_address_len: 5,
            rx_address: DEFAULT_ADDRESS,
            rx_address_len: 5,
            dynamic_payloads: false,
            payload_length: 16,
            retry_count: 4,
            retry_delay_us: 1000,
            data_rate: DataRate::Mbps2,
            pa_level: PaLevel::Max,
            ask_no_ack: false,
        }
    }
}

/// Copy at most 5 bytes of `address`, remembering the caller's real length
/// so that [`RadioConfig::validate()`] can reject it.
fn store_address(address: &[u8]) -> ([u8; 5], usize) {
    let mut buf = [0u8; 5];
    let len = address.len().min(5);
    buf[..len].copy_from_slice(&address[..len]);
    (buf, address.len())
}

impl RadioConfig {
    /// Returns the value set by [`RadioConfig::with_channel()`].
    pub const fn channel(&self) -> u8 {
        self.channel
    }

    /// The RF channel, an offset in MHz from 2400 MHz. Must be in range [0, 125].
    pub fn with_channel(self, channel: u8) -> Self {
        Self { channel, ..self }
    }

    /// Returns the address set by [`RadioConfig::with_tx_address()`].
    pub fn tx_address(&self) -> &[u8] {
        &self.tx_address[..self.tx_address_len.min(5)]
    }

    /// The address of the TX pipe (3 to 5 bytes, LSByte first).
    pub fn with_tx_address(self, address: &[u8]) -> Self {
        let (tx_address, tx_address_len) = store_address(address);
        Self {
            tx_address,
            tx_address_len,
            ..self
        }
    }

    /// Returns the address set by [`RadioConfig::with_rx_address()`].
    pub fn rx_address(&self) -> &[u8] {
        &self.rx_address[..self.rx_address_len.min(5)]
    }

    /// The address of RX pipe 0 (3 to 5 bytes, LSByte first).
    ///
    /// It must be as long as the TX address because the chip uses one
    /// address width for every pipe.
    pub fn with_rx_address(self, address: &[u8]) -> Self {
        let (rx_address, rx_address_len) = store_address(address);
        Self {
            rx_address,
            rx_address_len,
            ..self
        }
    }

    /// The address width shared by all pipes, derived from the TX address.
    pub const fn address_length(&self) -> usize {
        self.tx_address_len
    }

    /// Returns the value set by [`RadioConfig::with_dynamic_payloads()`].
    pub const fn dynamic_payloads(&self) -> bool {
        self.dynamic_payloads
    }

    /// Let each packet carry its own length instead of [`RadioConfig::payload_length()`].
    pub fn with_dynamic_payloads(self, enable: bool) -> Self {
        Self {
            dynamic_payloads: enable,
            ..self
        }
    }

    /// Returns the value set by [`RadioConfig::with_payload_length()`].
    pub const fn payload_length(&self) -> u8 {
        self.payload_length
    }

    /// The static payload length in range [1, 32].
    ///
    /// When dynamic payloads are disabled, every payload exchanged during the
    /// session has exactly this length.
    pub fn with_payload_length(self, length: u8) -> Self {
        Self {
            payload_length: length,
            ..self
        }
    }

    /// Returns the value set by [`RadioConfig::with_auto_retries()`].
    pub const fn retry_count(&self) -> u8 {
        self.retry_count
    }

    /// Returns the value set by [`RadioConfig::with_auto_retries()`].
    pub const fn retry_delay_us(&self) -> u16 {
        self.retry_delay_us
    }

    /// The auto-retry `count` (range [0, 15]) and the `delay_us` between
    /// attempts (250 to 4000 microseconds in steps of 250).
    pub fn with_auto_retries(self, count: u8, delay_us: u16) -> Self {
        Self {
            retry_count: count,
            retry_delay_us: delay_us,
            ..self
        }
    }

    /// Returns the value set by [`RadioConfig::with_data_rate()`].
    pub const fn data_rate(&self) -> DataRate {
        self.data_rate
    }

    /// The Data Rate (over the air).
    pub fn with_data_rate(self, data_rate: DataRate) -> Self {
        Self { data_rate, ..self }
    }

    /// Returns the value set by [`RadioConfig::with_pa_level()`].
    pub const fn pa_level(&self) -> PaLevel {
        self.pa_level
    }

    /// The Power Amplitude (PA) level.
    pub fn with_pa_level(self, pa_level: PaLevel) -> Self {
        Self { pa_level, ..self }
    }

    /// Returns the value set by [`RadioConfig::with_ask_no_ack()`].
    pub const fn ask_no_ack(&self) -> bool {
        self.ask_no_ack
    }

    /// Allow individual payloads to be sent without requesting an ACK.
    ///
    /// This sets FEATURE.EN_DYN_ACK, which the chip requires before it accepts
    /// the no-ack write command. While disabled, transmissions that pass
    /// `want_ack = false` still request an ACK.
    pub fn with_ask_no_ack(self, enable: bool) -> Self {
        Self {
            ask_no_ack: enable,
            ..self
        }
    }

    /// The SETUP_AW register value.
    pub const fn address_width_code(&self) -> Result<u8, ConfigError> {
        address_width_code(self.tx_address_len)
    }

    /// The SETUP_RETR delay step count.
    pub const fn retry_delay_steps(&self) -> Result<u8, ConfigError> {
        retry_delay_steps(self.retry_delay_us)
    }

    /// Check every precondition of this configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.channel > 125 {
            return Err(ConfigError::InvalidChannel(self.channel));
        }
        self.address_width_code()?;
        address_width_code(self.rx_address_len)?;
        if self.tx_address_len != self.rx_address_len {
            return Err(ConfigError::MismatchedAddressLength {
                tx: self.tx_address_len,
                rx: self.rx_address_len,
            });
        }
        if !self.dynamic_payloads && !(1..=32).contains(&self.payload_length) {
            return Err(ConfigError::InvalidPayloadLength(self.payload_length));
        }
        if self.retry_count > 15 {
            return Err(ConfigError::InvalidRetryCount(self.retry_count));
        }
        self.retry_delay_steps()?;
        Ok(())
    }
}
