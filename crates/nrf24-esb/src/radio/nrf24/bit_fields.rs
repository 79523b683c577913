use bitfield_struct::bitfield;

use crate::{DataRate, PaLevel};

#[bitfield(u8, order = Msb)]
pub(crate) struct SetupRetry {
    /// The auto-retry delay, in steps of 250 microseconds.
    #[bits(4)]
    pub ard: u8,

    /// The auto-retry count.
    #[bits(4)]
    pub arc: u8,
}

#[bitfield(u8, order = Msb)]
pub(crate) struct ObserveTx {
    /// Packets lost since the last write to RF_CH (saturates at 15).
    #[bits(4, access = RO)]
    pub plos_cnt: u8,

    /// Retransmissions of the current packet.
    #[bits(4, access = RO)]
    pub arc_cnt: u8,
}

#[bitfield(u8, order = Msb)]
pub(crate) struct RfSetup {
    #[bits(2)]
    _padding: u8,

    #[bits(3, access = None)]
    data_rate: u8,

    #[bits(2, access = None)]
    pa_level: u8,

    #[bits(1)]
    _lna_hcurr: u8,
}

impl RfSetup {
    pub const fn data_rate(&self) -> DataRate {
        DataRate::from_bits(self.into_bits())
    }

    pub fn with_data_rate(self, data_rate: DataRate) -> Self {
        let new_val = self.into_bits() & !DataRate::MASK;
        Self::from_bits(new_val | data_rate.into_bits())
    }

    pub const fn pa_level(&self) -> PaLevel {
        PaLevel::from_bits(self.into_bits())
    }

    pub fn with_pa_level(self, level: PaLevel) -> Self {
        let new_val = self.into_bits() & !PaLevel::MASK;
        Self::from_bits(new_val | level.into_bits())
    }
}
