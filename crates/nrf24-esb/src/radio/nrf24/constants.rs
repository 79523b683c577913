/// Register addresses for the nRF24L01.
pub mod registers {
    pub const CONFIG: u8 = 0x00;
    pub const EN_AA: u8 = 0x01;
    pub const EN_RXADDR: u8 = 0x02;
    pub const SETUP_AW: u8 = 0x03;
    pub const SETUP_RETR: u8 = 0x04;
    pub const RF_CH: u8 = 0x05;
    pub const RF_SETUP: u8 = 0x06;
    pub const STATUS: u8 = 0x07;
    pub const OBSERVE_TX: u8 = 0x08;
    /// Add the pipe number (0-5) for the other pipes.
    pub const RX_ADDR_P0: u8 = 0x0A;
    pub const TX_ADDR: u8 = 0x10;
    /// Add the pipe number (0-5) for the other pipes.
    pub const RX_PW_P0: u8 = 0x11;
    pub const FIFO_STATUS: u8 = 0x17;
    pub const DYNPD: u8 = 0x1C;
    pub const FEATURE: u8 = 0x1D;
}

/// SPI commands for the nRF24L01.
///
/// Each command is the first byte of a transaction.
pub mod commands {
    pub const W_REGISTER: u8 = 0x20;
    pub const R_RX_PL_WID: u8 = 0x60;
    pub const R_RX_PAYLOAD: u8 = 0x61;
    pub const W_TX_PAYLOAD: u8 = 0xA0;
    pub const W_TX_PAYLOAD_NO_ACK: u8 = 0xB0;
    /// OR with the pipe number (0-5).
    pub const W_ACK_PAYLOAD: u8 = 0xA8;
    pub const FLUSH_TX: u8 = 0xE1;
    pub const FLUSH_RX: u8 = 0xE2;
    pub const REUSE_TX_PL: u8 = 0xE3;
    pub const NOP: u8 = 0xFF;
}

/// Bit positions within registers, for use with
/// [`EsbRegisters::toggle_bit()`](fn@crate::radio::prelude::EsbRegisters::toggle_bit).
pub mod bits {
    // CONFIG
    pub const MASK_RX_DR: u8 = 6;
    pub const MASK_TX_DS: u8 = 5;
    pub const MASK_MAX_RT: u8 = 4;
    pub const EN_CRC: u8 = 3;
    pub const CRCO: u8 = 2;
    pub const PWR_UP: u8 = 1;
    pub const PRIM_RX: u8 = 0;

    // FEATURE
    pub const EN_DPL: u8 = 2;
    pub const EN_ACK_PAY: u8 = 1;
    pub const EN_DYN_ACK: u8 = 0;
}

/// Single bit masks of the STATUS register's IRQ flags.
pub mod mnemonics {
    pub const MASK_RX_DR: u8 = 1 << 6;
    pub const MASK_TX_DS: u8 = 1 << 5;
    pub const MASK_MAX_RT: u8 = 1 << 4;
}

/// The reply clocked out on MISO when no chip drives the bus.
pub(crate) const BUS_IDLE: u8 = 0xFF;

/// The largest payload the FIFOs can hold.
pub(crate) const MAX_PAYLOAD: usize = 32;
