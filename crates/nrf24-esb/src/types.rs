//! This module defines types used by various traits.
//! These types are meant to be agnostic of the trait implementation.

use core::{
    fmt::{Display, Formatter, Result},
    write,
};

use bitfield_struct::bitfield;

/// Power Amplifier level. The units dBm (decibel-milliwatts or dB<sub>mW</sub>)
/// represents a logarithmic signal loss.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PaLevel {
    /// -18 dBm
    Min,
    /// -12 dBm
    Low,
    /// -6 dBm
    High,
    /// 0 dBm
    Max,
}

#[cfg(feature = "defmt")]
impl defmt::Format for PaLevel {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            PaLevel::Min => defmt::write!(fmt, "Min"),
            PaLevel::Low => defmt::write!(fmt, "Low"),
            PaLevel::High => defmt::write!(fmt, "High"),
            PaLevel::Max => defmt::write!(fmt, "Max"),
        }
    }
}

impl PaLevel {
    /// The two adjacent RF_PWR bits in the RF_SETUP register.
    pub(crate) const MASK: u8 = 6;

    pub(crate) const fn into_bits(self) -> u8 {
        match self {
            PaLevel::Min => 0,
            PaLevel::Low => 2,
            PaLevel::High => 4,
            PaLevel::Max => 6,
        }
    }

    pub(crate) const fn from_bits(value: u8) -> Self {
        match value & Self::MASK {
            0 => PaLevel::Min,
            2 => PaLevel::Low,
            4 => PaLevel::High,
            _ => PaLevel::Max,
        }
    }
}

impl Display for PaLevel {
    fn fmt(&self, f: &mut Formatter) -> Result {
        match self {
            PaLevel::Min => write!(f, "Min"),
            PaLevel::Low => write!(f, "Low"),
            PaLevel::High => write!(f, "High"),
            PaLevel::Max => write!(f, "Max"),
        }
    }
}

/// How fast data moves through the air. Units are in bits per second (bps).
///
/// Enhanced ShockBurst auto-acknowledgement is not reliable at 250 Kbps on
/// every module variant; prefer one of the Mbps rates when ACK payloads are used.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DataRate {
    /// represents 1 Mbps
    Mbps1,
    /// represents 2 Mbps
    Mbps2,
    /// represents 250 Kbps
    Kbps250,
}

impl DataRate {
    /// RF_DR_LOW (bit 5) and RF_DR_HIGH (bit 3) in the RF_SETUP register.
    pub(crate) const MASK: u8 = 0x28;

    pub(crate) const fn into_bits(self) -> u8 {
        match self {
            DataRate::Mbps1 => 0,
            DataRate::Mbps2 => 0x8,
            DataRate::Kbps250 => 0x20,
        }
    }

    pub(crate) const fn from_bits(value: u8) -> Self {
        match value & Self::MASK {
            0x8 => DataRate::Mbps2,
            0x20 => DataRate::Kbps250,
            _ => DataRate::Mbps1,
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for DataRate {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            DataRate::Mbps1 => defmt::write!(fmt, "1 Mbps"),
            DataRate::Mbps2 => defmt::write!(fmt, "2 Mbps"),
            DataRate::Kbps250 => defmt::write!(fmt, "250 Kbps"),
        }
    }
}

impl Display for DataRate {
    fn fmt(&self, f: &mut Formatter) -> Result {
        match self {
            DataRate::Mbps1 => write!(f, "1 Mbps"),
            DataRate::Mbps2 => write!(f, "2 Mbps"),
            DataRate::Kbps250 => write!(f, "250 Kbps"),
        }
    }
}

/// The link role a driver instance is bound to for its whole lifetime.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Role {
    /// The primary transmitter (PTX) that originates every exchange.
    Initiator,
    /// The primary receiver (PRX) that listens and answers with ACK payloads.
    Responder,
}

#[cfg(feature = "defmt")]
impl defmt::Format for Role {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Role::Initiator => defmt::write!(fmt, "PTX"),
            Role::Responder => defmt::write!(fmt, "PRX"),
        }
    }
}

impl Display for Role {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        match self {
            Role::Initiator => write!(f, "PTX"),
            Role::Responder => write!(f, "PRX"),
        }
    }
}

/// The outcome of every transfer operation.
///
/// These are normal link-quality and backpressure results; hardware faults are
/// reported through [`Nrf24Error`](enum@crate::radio::Nrf24Error) instead.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TransferStatus {
    /// The payload could not be delivered (or the driver is powered down).
    SendFail,
    /// A payload was received into the caller's buffer.
    MsgRecv,
    /// The payload was acknowledged, but the ACK carried no payload.
    MsgSentNoResp,
    /// The payload is queued; poll for completion later.
    MsgPending,
    /// A previously queued payload was delivered.
    MsgSent,
    /// The TX FIFO stayed full for longer than the allowed timeout.
    TimedOut,
    /// The TX FIFO is full and the caller asked not to wait.
    FifoFull,
}

#[cfg(feature = "defmt")]
impl defmt::Format for TransferStatus {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            TransferStatus::SendFail => defmt::write!(fmt, "SEND_FAIL"),
            TransferStatus::MsgRecv => defmt::write!(fmt, "MSG_RECV"),
            TransferStatus::MsgSentNoResp => defmt::write!(fmt, "MSG_SENT_NO_RESP"),
            TransferStatus::MsgPending => defmt::write!(fmt, "MSG_PENDING"),
            TransferStatus::MsgSent => defmt::write!(fmt, "MSG_SENT"),
            TransferStatus::TimedOut => defmt::write!(fmt, "TIMED_OUT"),
            TransferStatus::FifoFull => defmt::write!(fmt, "FIFO_FULL"),
        }
    }
}

impl Display for TransferStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        match self {
            TransferStatus::SendFail => write!(f, "SEND_FAIL"),
            TransferStatus::MsgRecv => write!(f, "MSG_RECV"),
            TransferStatus::MsgSentNoResp => write!(f, "MSG_SENT_NO_RESP"),
            TransferStatus::MsgPending => write!(f, "MSG_PENDING"),
            TransferStatus::MsgSent => write!(f, "MSG_SENT"),
            TransferStatus::TimedOut => write!(f, "TIMED_OUT"),
            TransferStatus::FifoFull => write!(f, "FIFO_FULL"),
        }
    }
}

/// How long a send may wait for room in a full TX FIFO.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SendTimeout {
    /// Do not wait at all.
    Immediate,
    /// Wait (yielding) for as long as it takes.
    Never,
    /// Wait at most the given number of milliseconds.
    Millis(u32),
}

impl From<i32> for SendTimeout {
    /// `0` is non-blocking, a negative value blocks forever, and a positive
    /// value is a timeout in milliseconds.
    fn from(value: i32) -> Self {
        match value {
            0 => SendTimeout::Immediate,
            v if v < 0 => SendTimeout::Never,
            v => SendTimeout::Millis(v as u32),
        }
    }
}

/// A struct used to describe the STATUS register.
///
/// To instantiate an object with flags that have different values:
/// ```
/// use nrf24_esb::StatusFlags;
/// let flags = StatusFlags::default() // all flags are false
///     .with_rx_dr(true); // assert only `rx_dr` flags
/// ```
/// Use [`StatusFlags::default`] to instantiate all flags set to false.
/// Use [`StatusFlags::new`] to instantiate all flags set to true.
#[bitfield(u8, new = false, order = Msb)]
pub struct StatusFlags {
    #[bits(1)]
    _padding: u8,

    /// A flag to describe if RX Data Ready to read.
    #[bits(1, access = RO)]
    pub rx_dr: bool,

    /// A flag to describe if TX Data Sent.
    #[bits(1, access = RO)]
    pub tx_ds: bool,

    /// A flag to describe if the maximum number of retries was exceeded.
    #[bits(1, access = RO)]
    pub max_rt: bool,

    #[bits(3, access = RO)]
    pub(crate) rx_pipe: u8,

    /// A flag to describe if the TX FIFO is full.
    #[bits(1, access = RO)]
    pub tx_full: bool,
}

#[cfg(feature = "defmt")]
impl defmt::Format for StatusFlags {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(
            fmt,
            "StatusFlags rx_dr: {}, tx_ds: {}, max_rt: {}",
            self.rx_dr(),
            self.tx_ds(),
            self.max_rt()
        )
    }
}

impl StatusFlags {
    /// A mask to isolate only the IRQ flags. Useful for STATUS and CONFIG registers.
    pub(crate) const IRQ_MASK: u8 = 0x70;

    /// A convenience constructor similar to [`StatusFlags::default`] except
    /// all fields are set to `true`.
    pub fn new() -> Self {
        Self::from_bits(Self::IRQ_MASK)
    }

    /// The data pipe whose payload is at the head of the RX FIFO.
    ///
    /// The chip reports `6` (unused) or `7` (RX FIFO empty) when no pipe has data,
    /// both of which map to [`None`].
    pub fn data_pipe(&self) -> Option<u8> {
        match self.rx_pipe() {
            6 | 7 => None,
            pipe => Some(pipe),
        }
    }

    /// A flag to describe if RX Data Ready to read.
    pub fn with_rx_dr(self, flag: bool) -> Self {
        let new_val = self.into_bits() & !(1 << Self::RX_DR_OFFSET);
        Self::from_bits(new_val | ((flag as u8) << Self::RX_DR_OFFSET))
    }

    /// A flag to describe if TX Data Sent.
    pub fn with_tx_ds(self, flag: bool) -> Self {
        let new_val = self.into_bits() & !(1 << Self::TX_DS_OFFSET);
        Self::from_bits(new_val | ((flag as u8) << Self::TX_DS_OFFSET))
    }

    /// A flag to describe if the maximum number of retries was exceeded.
    pub fn with_max_rt(self, flag: bool) -> Self {
        let new_val = self.into_bits() & !(1 << Self::MAX_RT_OFFSET);
        Self::from_bits(new_val | ((flag as u8) << Self::MAX_RT_OFFSET))
    }
}

impl Display for StatusFlags {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        write!(
            f,
            "StatusFlags rx_dr: {}, tx_ds: {}, max_rt: {}",
            self.rx_dr(),
            self.tx_ds(),
            self.max_rt()
        )
    }
}

/// A struct used to describe the FIFO_STATUS register.
#[bitfield(u8, order = Msb)]
pub struct FifoStatus {
    #[bits(1)]
    _padding: u8,

    /// The chip is re-transmitting the last TX payload (`REUSE_TX_PL`).
    #[bits(1, access = RO)]
    pub tx_reuse: bool,

    /// The TX FIFO holds 3 payloads.
    #[bits(1, access = RO)]
    pub tx_full: bool,

    /// The TX FIFO holds no payloads.
    #[bits(1, access = RO)]
    pub tx_empty: bool,

    #[bits(2)]
    _reserved: u8,

    /// The RX FIFO holds 3 payloads.
    #[bits(1, access = RO)]
    pub rx_full: bool,

    /// The RX FIFO holds no payloads.
    #[bits(1, access = RO)]
    pub rx_empty: bool,
}

#[cfg(feature = "defmt")]
impl defmt::Format for FifoStatus {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(
            fmt,
            "FifoStatus tx_full: {}, tx_empty: {}, rx_full: {}, rx_empty: {}",
            self.tx_full(),
            self.tx_empty(),
            self.rx_full(),
            self.rx_empty()
        )
    }
}

impl Display for FifoStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        write!(
            f,
            "FifoStatus tx_full: {}, tx_empty: {}, rx_full: {}, rx_empty: {}",
            self.tx_full(),
            self.tx_empty(),
            self.rx_full(),
            self.rx_empty()
        )
    }
}
