use embassy_futures::yield_now;
use embedded_hal::{delay::DelayNs, digital::OutputPin, spi::SpiDevice};

use crate::{
    radio::{
        prelude::{EsbRegisters, EsbStatus, EsbTransfer},
        ticks_diff, MonotonicMs, Nrf24, Nrf24Error,
    },
    Role, SendTimeout, TransferStatus,
};

use super::{commands, constants::MAX_PAYLOAD, mnemonics};

impl<SPI, DO, DELAY, CLK> Nrf24<SPI, DO, DELAY, CLK>
where
    SPI: SpiDevice,
    DO: OutputPin,
    DELAY: DelayNs,
    CLK: MonotonicMs,
{
    /// Write `data` into the TX FIFO using the given `command`.
    ///
    /// Static payloads are zero-padded (or truncated) to the configured length.
    /// If `transmit` is `true`, CE is pulsed afterward.
    fn write_payload(
        &mut self,
        command: u8,
        data: &[u8],
        transmit: bool,
    ) -> Result<(), Nrf24Error<SPI::Error, DO::Error>> {
        let len = if self._config.dynamic_payloads() {
            data.len().clamp(1, MAX_PAYLOAD)
        } else {
            (self._config.payload_length() as usize).min(MAX_PAYLOAD)
        };
        let copied = data.len().min(len);
        self._buf[0] = command;
        self._buf[1..=copied].copy_from_slice(&data[..copied]);
        self._buf[copied + 1..=len].fill(0);
        self.spi_transfer(len as u8 + 1)?;
        self.check_bus_idle()?;
        if transmit {
            self.pulse_ce()?;
        }
        Ok(())
    }

    /// Read the payload at the head of the RX FIFO into `buf`.
    ///
    /// The whole payload is always clocked out of the chip; any bytes that
    /// don't fit in `buf` are discarded.
    fn read_payload(&mut self, buf: &mut [u8]) -> Result<(), Nrf24Error<SPI::Error, DO::Error>> {
        let len = if self._config.dynamic_payloads() {
            let width = self.read_rx_payload_width()?;
            if width as usize > MAX_PAYLOAD {
                warn!("RX payload width {} is corrupt", width);
                self.flush_rx()?;
                return Err(Nrf24Error::BinaryCorruption);
            }
            width
        } else {
            self._config.payload_length().min(MAX_PAYLOAD as u8)
        };
        self._last_payload_length = len;
        self.spi_read(len, commands::R_RX_PAYLOAD)?;
        self.check_bus_idle()?;
        let count = buf.len().min(len as usize);
        buf[..count].copy_from_slice(&self._buf[1..count + 1]);
        Ok(())
    }

    /// The no-ack command is only honoured once FEATURE.EN_DYN_ACK is set,
    /// so it is only used if [`RadioConfig::with_ask_no_ack()`] enabled that.
    ///
    /// [`RadioConfig::with_ask_no_ack()`]: fn@crate::radio::RadioConfig::with_ask_no_ack
    fn tx_command(&self, want_ack: bool) -> u8 {
        if want_ack || !self._config.ask_no_ack() {
            commands::W_TX_PAYLOAD
        } else {
            commands::W_TX_PAYLOAD_NO_ACK
        }
    }
}

impl<SPI, DO, DELAY, CLK> EsbTransfer for Nrf24<SPI, DO, DELAY, CLK>
where
    SPI: SpiDevice,
    DO: OutputPin,
    DELAY: DelayNs,
    CLK: MonotonicMs,
{
    type TransferErrorType = Nrf24Error<SPI::Error, DO::Error>;

    async fn master_exchange(
        &mut self,
        out: &[u8],
        incoming: &mut [u8],
        want_ack: bool,
    ) -> Result<TransferStatus, Self::TransferErrorType> {
        if !self._is_on {
            warn!("nRF24L01 is powered down");
            return Ok(TransferStatus::SendFail);
        }
        let command = self.tx_command(want_ack);
        self.write_payload(command, out, true)?;
        loop {
            let flags = self.read_status()?;
            if flags.max_rt() {
                break;
            }
            if flags.tx_ds() {
                if flags.rx_dr() {
                    self.read_payload(incoming)?;
                    self.clear_status_flags()?;
                    return Ok(TransferStatus::MsgRecv);
                }
                self.clear_status_flags()?;
                return Ok(TransferStatus::MsgSentNoResp);
            }
            yield_now().await;
        }
        debug!("max retries exceeded");
        self.clear_status_flags()?;
        self.flush_tx()?;
        Ok(TransferStatus::SendFail)
    }

    async fn slave_exchange(
        &mut self,
        out: &[u8],
        incoming: &mut [u8],
    ) -> Result<TransferStatus, Self::TransferErrorType> {
        if !self._is_on {
            warn!("nRF24L01 is powered down");
            return Ok(TransferStatus::SendFail);
        }
        self.write_payload(commands::W_ACK_PAYLOAD, out, false)?;
        while !self.read_status()?.rx_dr() {
            yield_now().await;
        }
        self.read_payload(incoming)?;
        self.clear_status_flags()?;
        Ok(TransferStatus::MsgRecv)
    }

    async fn exchange(
        &mut self,
        out: &[u8],
        incoming: &mut [u8],
    ) -> Result<TransferStatus, Self::TransferErrorType> {
        match self._role {
            Role::Initiator => self.master_exchange(out, incoming, true).await,
            Role::Responder => self.slave_exchange(out, incoming).await,
        }
    }

    async fn master_send(
        &mut self,
        buf: &[u8],
        want_ack: bool,
        retries: Option<u16>,
        timeout: SendTimeout,
    ) -> Result<TransferStatus, Self::TransferErrorType> {
        if !self._is_on {
            warn!("nRF24L01 is powered down");
            return Ok(TransferStatus::SendFail);
        }
        let flags = self.read_status()?;
        if flags.tx_full() {
            if timeout == SendTimeout::Immediate {
                if flags.max_rt() {
                    return Ok(TransferStatus::SendFail);
                }
                return Ok(TransferStatus::FifoFull);
            }
            let mut retries = retries;
            let start = self._clock.now_ms();
            loop {
                let flags = self.read_status()?;
                if !flags.tx_full() {
                    break;
                }
                if flags.max_rt() {
                    // force another attempt at the head of the TX FIFO
                    self.clear_flags(mnemonics::MASK_MAX_RT)?;
                    self.pulse_ce()?;
                    if self.read_status()?.tx_full() {
                        match retries {
                            Some(0) => {
                                debug!("max retries exceeded while TX FIFO is full");
                                return Ok(TransferStatus::SendFail);
                            }
                            Some(remaining) => retries = Some(remaining - 1),
                            None => (),
                        }
                    }
                }
                if let SendTimeout::Millis(limit) = timeout {
                    if ticks_diff(self._clock.now_ms(), start) > limit {
                        return Ok(TransferStatus::TimedOut);
                    }
                }
                yield_now().await;
            }
        }
        while !self.tx_fifo_empty()? {
            self.ce_pin.set_high().map_err(Nrf24Error::Gpo)?;
            yield_now().await;
            self.ce_pin.set_low().map_err(Nrf24Error::Gpo)?;
            if self.max_retries_exceeded(true)? {
                break;
            }
        }
        let command = self.tx_command(want_ack);
        self.write_payload(command, buf, true)?;
        Ok(TransferStatus::MsgPending)
    }

    async fn slave_send(
        &mut self,
        buf: &[u8],
        timeout: SendTimeout,
    ) -> Result<TransferStatus, Self::TransferErrorType> {
        if !self._is_on {
            warn!("nRF24L01 is powered down");
            return Ok(TransferStatus::SendFail);
        }
        if self.read_status()?.tx_full() {
            match timeout {
                SendTimeout::Immediate => {
                    yield_now().await;
                    return Ok(TransferStatus::FifoFull);
                }
                SendTimeout::Never => {
                    while self.read_status()?.tx_full() {
                        yield_now().await;
                    }
                }
                SendTimeout::Millis(limit) => {
                    let start = self._clock.now_ms();
                    while self.read_status()?.tx_full() {
                        yield_now().await;
                        if ticks_diff(self._clock.now_ms(), start) > limit {
                            return Ok(TransferStatus::TimedOut);
                        }
                    }
                }
            }
        }
        self.write_payload(commands::W_ACK_PAYLOAD, buf, false)?;
        Ok(TransferStatus::MsgPending)
    }

    async fn send(
        &mut self,
        buf: &[u8],
        retries: Option<u16>,
        timeout: SendTimeout,
    ) -> Result<TransferStatus, Self::TransferErrorType> {
        match self._role {
            Role::Initiator => self.master_send(buf, true, retries, timeout).await,
            Role::Responder => self.slave_send(buf, timeout).await,
        }
    }

    fn check_msg_sent(&mut self) -> Result<TransferStatus, Self::TransferErrorType> {
        match self._role {
            Role::Initiator => {
                if self.max_retries_exceeded(false)? {
                    Ok(TransferStatus::SendFail)
                } else if self.tx_data_sent(true)? {
                    Ok(TransferStatus::MsgSent)
                } else if !self.tx_fifo_empty()? {
                    Ok(TransferStatus::MsgPending)
                } else {
                    Ok(TransferStatus::SendFail)
                }
            }
            Role::Responder => {
                if self.tx_data_sent(true)? || self.tx_fifo_empty()? {
                    Ok(TransferStatus::MsgSent)
                } else {
                    Ok(TransferStatus::MsgPending)
                }
            }
        }
    }

    async fn clear_tx_buffer(&mut self, retry_first: bool) -> Result<(), Self::TransferErrorType> {
        if retry_first {
            self.max_retries_exceeded(true)?;
            self.ce_pin.set_high().map_err(Nrf24Error::Gpo)?;
            let start = self._clock.now_ms();
            loop {
                yield_now().await;
                if ticks_diff(self._clock.now_ms(), start) >= 1 {
                    break;
                }
            }
            self.ce_pin.set_low().map_err(Nrf24Error::Gpo)?;
        }
        self.flush_tx()?;
        self.max_retries_exceeded(true)?;
        self.tx_data_sent(true)?;
        Ok(())
    }

    fn any_received(&mut self) -> Result<bool, Self::TransferErrorType> {
        Ok(!self.rx_fifo_empty()? || self.rx_data_ready(false)?)
    }

    fn read_into(&mut self, buf: &mut [u8]) -> Result<TransferStatus, Self::TransferErrorType> {
        self.read_payload(buf)?;
        self.rx_data_ready(true)?;
        Ok(TransferStatus::MsgRecv)
    }

    fn read_rx_payload_width(&mut self) -> Result<u8, Self::TransferErrorType> {
        self.spi_read(1, commands::R_RX_PL_WID)?;
        self.check_bus_idle()?;
        Ok(self._buf[1])
    }

    fn last_payload_length(&self) -> u8 {
        self._last_payload_length
    }
}

/////////////////////////////////////////////////////////////////////////////////
/// unit tests
#[cfg(test)]
mod test {
    extern crate std;
    use super::EsbTransfer;
    use crate::{
        radio::{commands, registers, ticks_diff, Nrf24Error, RadioConfig},
        spi_test_expects,
        test::{mk_radio, TickClock},
        Role, SendTimeout, TransferStatus,
    };
    use embassy_futures::block_on;
    use embedded_hal_mock::eh1::{
        digital::{State as PinState, Transaction as PinTransaction},
        spi::Transaction as SpiTransaction,
    };
    use std::{vec, vec::Vec};

    /// The bytes sent to write a payload of `len` bytes with the given `command`.
    fn payload(command: u8, data: &[u8], len: usize) -> Vec<u8> {
        let mut buf = vec![0u8; len + 1];
        buf[0] = command;
        let copied = data.len().min(len);
        buf[1..=copied].copy_from_slice(&data[..copied]);
        buf
    }

    fn ce_pulse() -> [PinTransaction; 2] {
        [
            PinTransaction::set(PinState::High),
            PinTransaction::set(PinState::Low),
        ]
    }

    fn clear_all() -> (Vec<u8>, Vec<u8>) {
        (
            vec![registers::STATUS | commands::W_REGISTER, 0x70u8],
            vec![0xEu8, 0u8],
        )
    }

    #[test]
    fn powered_down_is_send_fail() {
        let mocks = mk_radio(Role::Initiator, &[], &[]);
        let (mut radio, mut spi, mut ce_pin) = (mocks.0, mocks.1, mocks.2);
        let mut incoming = [0u8; 16];
        assert_eq!(
            block_on(radio.exchange(b"ping", &mut incoming)).unwrap(),
            TransferStatus::SendFail
        );
        assert_eq!(
            block_on(radio.send(b"ping", None, SendTimeout::Never)).unwrap(),
            TransferStatus::SendFail
        );
        spi.done();
        ce_pin.done();
    }

    #[test]
    fn master_exchange_max_retries() {
        let (clear, clear_resp) = clear_all();
        let spi_expectations = spi_test_expects![
            (payload(commands::W_TX_PAYLOAD, b"ping", 16), vec![0xEu8; 17]),
            // nothing yet
            (vec![commands::NOP], vec![0xEu8]),
            (vec![commands::NOP], vec![0x1Eu8]),
            (clear, clear_resp),
            (vec![commands::FLUSH_TX], vec![0xEu8]),
        ];
        let mocks = mk_radio(Role::Initiator, &ce_pulse(), &spi_expectations);
        let (mut radio, mut spi, mut ce_pin) = (mocks.0, mocks.1, mocks.2);
        radio._is_on = true;
        let mut incoming = [0u8; 16];
        let result = block_on(radio.master_exchange(b"ping", &mut incoming, true));
        assert_eq!(result.unwrap(), TransferStatus::SendFail);
        spi.done();
        ce_pin.done();
    }

    #[test]
    fn master_exchange_no_response() {
        let (clear, clear_resp) = clear_all();
        let spi_expectations = spi_test_expects![
            (
                payload(commands::W_TX_PAYLOAD_NO_ACK, b"ping", 16),
                vec![0xEu8; 17],
            ),
            (vec![commands::NOP], vec![0x2Eu8]),
            (clear, clear_resp),
        ];
        let mocks = mk_radio(Role::Initiator, &ce_pulse(), &spi_expectations);
        let (mut radio, mut spi, mut ce_pin) = (mocks.0, mocks.1, mocks.2);
        radio._is_on = true;
        radio._config = RadioConfig::default().with_ask_no_ack(true);
        let mut incoming = [0u8; 16];
        let result = block_on(radio.master_exchange(b"ping", &mut incoming, false));
        assert_eq!(result.unwrap(), TransferStatus::MsgSentNoResp);
        assert_eq!(incoming, [0u8; 16]);
        spi.done();
        ce_pin.done();
    }

    #[test]
    fn no_ack_needs_dyn_ack_feature() {
        let (clear, clear_resp) = clear_all();
        let spi_expectations = spi_test_expects![
            // EN_DYN_ACK is off, so an ACK is requested anyway
            (payload(commands::W_TX_PAYLOAD, b"ping", 16), vec![0xEu8; 17]),
            (vec![commands::NOP], vec![0x2Eu8]),
            (clear, clear_resp),
            (vec![commands::NOP], vec![0x0Eu8]),
            (vec![registers::FIFO_STATUS, 0u8], vec![0xEu8, 0x11u8]),
            (payload(commands::W_TX_PAYLOAD, b"pong", 16), vec![0xEu8; 17]),
        ];
        let mut ce_expectations = ce_pulse().to_vec();
        ce_expectations.extend(ce_pulse());
        let mocks = mk_radio(Role::Initiator, &ce_expectations, &spi_expectations);
        let (mut radio, mut spi, mut ce_pin) = (mocks.0, mocks.1, mocks.2);
        radio._is_on = true;
        let mut incoming = [0u8; 16];
        let result = block_on(radio.master_exchange(b"ping", &mut incoming, false));
        assert_eq!(result.unwrap(), TransferStatus::MsgSentNoResp);
        let result = block_on(radio.master_send(b"pong", false, None, SendTimeout::Never));
        assert_eq!(result.unwrap(), TransferStatus::MsgPending);
        spi.done();
        ce_pin.done();
    }

    #[test]
    fn master_exchange_with_ack_payload() {
        let (clear, clear_resp) = clear_all();
        let spi_expectations = spi_test_expects![
            (payload(commands::W_TX_PAYLOAD, b"ping", 4), vec![0xEu8; 5]),
            // TX_DS and RX_DR on pipe 0
            (vec![commands::NOP], vec![0x60u8]),
            (vec![commands::R_RX_PL_WID, 0u8], vec![0x60u8, 4u8]),
            (
                vec![commands::R_RX_PAYLOAD, 0u8, 0u8, 0u8, 0u8],
                vec![0x60u8, b'p', b'o', b'n', b'g'],
            ),
            (clear, clear_resp),
        ];
        let mocks = mk_radio(Role::Initiator, &ce_pulse(), &spi_expectations);
        let (mut radio, mut spi, mut ce_pin) = (mocks.0, mocks.1, mocks.2);
        radio._is_on = true;
        radio._config = RadioConfig::default().with_dynamic_payloads(true);
        let mut incoming = [0u8; 8];
        let result = block_on(radio.exchange(b"ping", &mut incoming));
        assert_eq!(result.unwrap(), TransferStatus::MsgRecv);
        assert_eq!(&incoming[..4], b"pong");
        assert_eq!(incoming[4..], [0u8; 4]);
        assert_eq!(radio.last_payload_length(), 4);
        spi.done();
        ce_pin.done();
    }

    #[test]
    fn unresponsive_payload_write() {
        let spi_expectations = spi_test_expects![(
            payload(commands::W_TX_PAYLOAD, b"ping", 16),
            vec![0xFFu8; 17],
        ),];
        let mocks = mk_radio(Role::Initiator, &[], &spi_expectations);
        let (mut radio, mut spi, mut ce_pin) = (mocks.0, mocks.1, mocks.2);
        radio._is_on = true;
        let mut incoming = [0u8; 16];
        let result = block_on(radio.master_exchange(b"ping", &mut incoming, true));
        assert!(matches!(result, Err(Nrf24Error::NotResponding)));
        assert!(!radio._is_on);
        spi.done();
        ce_pin.done();
    }

    #[test]
    fn slave_exchange() {
        let (clear, clear_resp) = clear_all();
        let mut response = vec![0x40u8];
        response.extend_from_slice(&[0xAAu8; 16]);
        let spi_expectations = spi_test_expects![
            (payload(commands::W_ACK_PAYLOAD, b"pong", 16), vec![0xEu8; 17]),
            (vec![commands::NOP], vec![0xEu8]),
            (vec![commands::NOP], vec![0xEu8]),
            (vec![commands::NOP], vec![0x40u8]),
            (payload(commands::R_RX_PAYLOAD, &[], 16), response),
            (clear, clear_resp),
        ];
        let mocks = mk_radio(Role::Responder, &[], &spi_expectations);
        let (mut radio, mut spi, mut ce_pin) = (mocks.0, mocks.1, mocks.2);
        radio._is_on = true;
        let mut incoming = [0u8; 16];
        let result = block_on(radio.exchange(b"pong", &mut incoming));
        assert_eq!(result.unwrap(), TransferStatus::MsgRecv);
        assert_eq!(incoming, [0xAAu8; 16]);
        assert_eq!(radio.last_payload_length(), 16);
        spi.done();
        ce_pin.done();
    }

    #[test]
    fn master_send_non_blocking() {
        let spi_expectations = spi_test_expects![
            // TX FIFO full
            (vec![commands::NOP], vec![0x0Fu8]),
            // TX FIFO full and MAX_RT
            (vec![commands::NOP], vec![0x1Fu8]),
        ];
        let mocks = mk_radio(Role::Initiator, &[], &spi_expectations);
        let (mut radio, mut spi, mut ce_pin) = (mocks.0, mocks.1, mocks.2);
        radio._is_on = true;
        let timeout = SendTimeout::from(0);
        assert_eq!(
            block_on(radio.master_send(b"ping", true, None, timeout)).unwrap(),
            TransferStatus::FifoFull
        );
        assert_eq!(
            block_on(radio.master_send(b"ping", true, None, timeout)).unwrap(),
            TransferStatus::SendFail
        );
        spi.done();
        ce_pin.done();
    }

    #[test]
    fn master_send_times_out() {
        // initial check, then one poll per 10 ms until more than 50 ms elapsed
        let mut spi_expectations = Vec::new();
        for _ in 0..7 {
            spi_expectations.extend(spi_test_expects![(
                vec![commands::NOP],
                vec![0x0Fu8],
            ),]);
        }
        let mocks = mk_radio(Role::Initiator, &[], &spi_expectations);
        let (mut radio, mut spi, mut ce_pin) = (mocks.0, mocks.1, mocks.2);
        radio._is_on = true;
        // start close to the wraparound point
        let start = u32::MAX - 20;
        radio._clock = TickClock::starting_at(start, 10);
        let result = block_on(radio.master_send(b"ping", true, None, SendTimeout::Millis(50)));
        assert_eq!(result.unwrap(), TransferStatus::TimedOut);
        assert!(ticks_diff(radio._clock.now, start) >= 50);
        spi.done();
        ce_pin.done();
    }

    #[test]
    fn master_send_retries_exhausted() {
        let spi_expectations = spi_test_expects![
            (vec![commands::NOP], vec![0x1Fu8]),
            (vec![commands::NOP], vec![0x1Fu8]),
            // clear MAX_RT only
            (
                vec![registers::STATUS | commands::W_REGISTER, 0x10u8],
                vec![0x1Fu8, 0u8],
            ),
            (vec![commands::NOP], vec![0x0Fu8]),
        ];
        let mocks = mk_radio(Role::Initiator, &ce_pulse(), &spi_expectations);
        let (mut radio, mut spi, mut ce_pin) = (mocks.0, mocks.1, mocks.2);
        radio._is_on = true;
        let result = block_on(radio.send(b"ping", Some(0), SendTimeout::Never));
        assert_eq!(result.unwrap(), TransferStatus::SendFail);
        spi.done();
        ce_pin.done();
    }

    #[test]
    fn master_send_after_retry() {
        let mut ce_expectations = ce_pulse().to_vec();
        ce_expectations.extend(ce_pulse());
        let spi_expectations = spi_test_expects![
            (vec![commands::NOP], vec![0x1Fu8]),
            (vec![commands::NOP], vec![0x1Fu8]),
            (
                vec![registers::STATUS | commands::W_REGISTER, 0x10u8],
                vec![0x1Fu8, 0u8],
            ),
            // still full; one retry used
            (vec![commands::NOP], vec![0x0Fu8]),
            // room in the TX FIFO
            (vec![commands::NOP], vec![0x0Eu8]),
            (vec![registers::FIFO_STATUS, 0u8], vec![0xEu8, 0x11u8]),
            (payload(commands::W_TX_PAYLOAD, b"ping", 16), vec![0xEu8; 17]),
        ];
        let mocks = mk_radio(Role::Initiator, &ce_expectations, &spi_expectations);
        let (mut radio, mut spi, mut ce_pin) = (mocks.0, mocks.1, mocks.2);
        radio._is_on = true;
        let result = block_on(radio.master_send(b"ping", true, Some(1), SendTimeout::Never));
        assert_eq!(result.unwrap(), TransferStatus::MsgPending);
        spi.done();
        ce_pin.done();
    }

    #[test]
    fn master_send_drains_queue() {
        let mut ce_expectations = ce_pulse().to_vec();
        ce_expectations.extend(ce_pulse());
        let mut spi_expectations = spi_test_expects![
            (vec![commands::NOP], vec![0x0Eu8]),
            // TX FIFO not empty
            (vec![registers::FIFO_STATUS, 0u8], vec![0xEu8, 0x01u8]),
            (vec![commands::NOP], vec![0x2Eu8]),
            (vec![registers::FIFO_STATUS, 0u8], vec![0xEu8, 0x11u8]),
        ]
        .to_vec();
        let mut big = [0x55u8; 40];
        big[31] = 0x77;
        spi_expectations.extend(spi_test_expects![(
            payload(commands::W_TX_PAYLOAD_NO_ACK, &big, 32),
            vec![0xEu8; 33],
        ),]);
        let mocks = mk_radio(Role::Initiator, &ce_expectations, &spi_expectations);
        let (mut radio, mut spi, mut ce_pin) = (mocks.0, mocks.1, mocks.2);
        radio._is_on = true;
        radio._config = RadioConfig::default()
            .with_dynamic_payloads(true)
            .with_ask_no_ack(true);
        let result = block_on(radio.master_send(&big, false, None, SendTimeout::Never));
        assert_eq!(result.unwrap(), TransferStatus::MsgPending);
        spi.done();
        ce_pin.done();
    }

    #[test]
    fn slave_send() {
        let spi_expectations = spi_test_expects![
            // non-blocking with a full TX FIFO
            (vec![commands::NOP], vec![0x0Fu8]),
            // waits for room
            (vec![commands::NOP], vec![0x0Fu8]),
            (vec![commands::NOP], vec![0x0Fu8]),
            (vec![commands::NOP], vec![0x0Eu8]),
            (payload(commands::W_ACK_PAYLOAD, b"data", 16), vec![0xEu8; 17]),
        ];
        let mocks = mk_radio(Role::Responder, &[], &spi_expectations);
        let (mut radio, mut spi, mut ce_pin) = (mocks.0, mocks.1, mocks.2);
        radio._is_on = true;
        assert_eq!(
            block_on(radio.send(b"data", None, SendTimeout::Immediate)).unwrap(),
            TransferStatus::FifoFull
        );
        assert_eq!(
            block_on(radio.send(b"data", Some(0), SendTimeout::from(-1))).unwrap(),
            TransferStatus::MsgPending
        );
        spi.done();
        ce_pin.done();
    }

    #[test]
    fn slave_send_times_out() {
        let spi_expectations = spi_test_expects![
            (vec![commands::NOP], vec![0x0Fu8]),
            (vec![commands::NOP], vec![0x0Fu8]),
            (vec![commands::NOP], vec![0x0Fu8]),
        ];
        let mocks = mk_radio(Role::Responder, &[], &spi_expectations);
        let (mut radio, mut spi, mut ce_pin) = (mocks.0, mocks.1, mocks.2);
        radio._is_on = true;
        radio._clock = TickClock::starting_at(0, 3);
        let result = block_on(radio.slave_send(b"data", SendTimeout::Millis(5)));
        assert_eq!(result.unwrap(), TransferStatus::TimedOut);
        spi.done();
        ce_pin.done();
    }

    #[test]
    fn check_master_msg_sent() {
        let spi_expectations = spi_test_expects![
            // MAX_RT has priority
            (vec![commands::NOP], vec![0x3Eu8]),
            // TX_DS
            (vec![commands::NOP], vec![0x2Eu8]),
            (vec![commands::NOP], vec![0x2Eu8]),
            (
                vec![registers::STATUS | commands::W_REGISTER, 0x20u8],
                vec![0x2Eu8, 0u8],
            ),
            // still queued
            (vec![commands::NOP], vec![0x0Eu8]),
            (vec![commands::NOP], vec![0x0Eu8]),
            (vec![registers::FIFO_STATUS, 0u8], vec![0xEu8, 0x01u8]),
            // nothing queued and nothing sent
            (vec![commands::NOP], vec![0x0Eu8]),
            (vec![commands::NOP], vec![0x0Eu8]),
            (vec![registers::FIFO_STATUS, 0u8], vec![0xEu8, 0x11u8]),
        ];
        let mocks = mk_radio(Role::Initiator, &[], &spi_expectations);
        let (mut radio, mut spi, mut ce_pin) = (mocks.0, mocks.1, mocks.2);
        assert_eq!(radio.check_msg_sent().unwrap(), TransferStatus::SendFail);
        assert_eq!(radio.check_msg_sent().unwrap(), TransferStatus::MsgSent);
        assert_eq!(radio.check_msg_sent().unwrap(), TransferStatus::MsgPending);
        assert_eq!(radio.check_msg_sent().unwrap(), TransferStatus::SendFail);
        spi.done();
        ce_pin.done();
    }

    #[test]
    fn check_slave_msg_sent() {
        let spi_expectations = spi_test_expects![
            (vec![commands::NOP], vec![0x2Eu8]),
            (
                vec![registers::STATUS | commands::W_REGISTER, 0x20u8],
                vec![0x2Eu8, 0u8],
            ),
            (vec![commands::NOP], vec![0x0Eu8]),
            (vec![registers::FIFO_STATUS, 0u8], vec![0xEu8, 0x11u8]),
            (vec![commands::NOP], vec![0x0Eu8]),
            (vec![registers::FIFO_STATUS, 0u8], vec![0xEu8, 0x01u8]),
        ];
        let mocks = mk_radio(Role::Responder, &[], &spi_expectations);
        let (mut radio, mut spi, mut ce_pin) = (mocks.0, mocks.1, mocks.2);
        assert_eq!(radio.check_msg_sent().unwrap(), TransferStatus::MsgSent);
        assert_eq!(radio.check_msg_sent().unwrap(), TransferStatus::MsgSent);
        assert_eq!(radio.check_msg_sent().unwrap(), TransferStatus::MsgPending);
        spi.done();
        ce_pin.done();
    }

    #[test]
    fn clear_tx_buffer() {
        let spi_expectations = spi_test_expects![
            // retry first
            (vec![commands::NOP], vec![0x1Eu8]),
            (
                vec![registers::STATUS | commands::W_REGISTER, 0x10u8],
                vec![0x1Eu8, 0u8],
            ),
            (vec![commands::FLUSH_TX], vec![0xEu8]),
            (vec![commands::NOP], vec![0xEu8]),
            (vec![commands::NOP], vec![0x2Eu8]),
            (
                vec![registers::STATUS | commands::W_REGISTER, 0x20u8],
                vec![0x2Eu8, 0u8],
            ),
            // no retry
            (vec![commands::FLUSH_TX], vec![0xEu8]),
            (vec![commands::NOP], vec![0xEu8]),
            (vec![commands::NOP], vec![0xEu8]),
        ];
        let mocks = mk_radio(Role::Initiator, &ce_pulse(), &spi_expectations);
        let (mut radio, mut spi, mut ce_pin) = (mocks.0, mocks.1, mocks.2);
        block_on(radio.clear_tx_buffer(true)).unwrap();
        block_on(radio.clear_tx_buffer(false)).unwrap();
        spi.done();
        ce_pin.done();
    }

    #[test]
    fn receive_sequence() {
        let mut response = vec![0x40u8];
        response.extend_from_slice(b"0123456789abcdef");
        let spi_expectations = spi_test_expects![
            // RX FIFO empty, but RX_DR is asserted
            (vec![registers::FIFO_STATUS, 0u8], vec![0x40u8, 0x11u8]),
            (vec![commands::NOP], vec![0x40u8]),
            (payload(commands::R_RX_PAYLOAD, &[], 16), response),
            (vec![commands::NOP], vec![0x40u8]),
            (
                vec![registers::STATUS | commands::W_REGISTER, 0x40u8],
                vec![0x40u8, 0u8],
            ),
            // nothing new
            (vec![registers::FIFO_STATUS, 0u8], vec![0xEu8, 0x11u8]),
            (vec![commands::NOP], vec![0xEu8]),
        ];
        let mocks = mk_radio(Role::Responder, &[], &spi_expectations);
        let (mut radio, mut spi, mut ce_pin) = (mocks.0, mocks.1, mocks.2);
        assert!(radio.any_received().unwrap());
        let mut buf = [0u8; 10];
        assert_eq!(radio.read_into(&mut buf).unwrap(), TransferStatus::MsgRecv);
        assert_eq!(&buf, b"0123456789");
        assert!(!radio.any_received().unwrap());
        spi.done();
        ce_pin.done();
    }

    #[test]
    fn corrupt_payload_width() {
        let spi_expectations = spi_test_expects![
            (vec![commands::R_RX_PL_WID, 0u8], vec![0x40u8, 33u8]),
            (vec![commands::FLUSH_RX], vec![0x40u8]),
        ];
        let mocks = mk_radio(Role::Responder, &[], &spi_expectations);
        let (mut radio, mut spi, mut ce_pin) = (mocks.0, mocks.1, mocks.2);
        radio._config = RadioConfig::default().with_dynamic_payloads(true);
        let mut buf = [0u8; 32];
        assert!(matches!(
            radio.read_into(&mut buf),
            Err(Nrf24Error::BinaryCorruption)
        ));
        spi.done();
        ce_pin.done();
    }

    #[test]
    fn disconnected_during_dynamic_read() {
        let spi_expectations = spi_test_expects![(
            vec![commands::R_RX_PL_WID, 0u8],
            vec![0xFFu8, 0xFFu8],
        ),];
        let mocks = mk_radio(Role::Responder, &[], &spi_expectations);
        let (mut radio, mut spi, mut ce_pin) = (mocks.0, mocks.1, mocks.2);
        radio._is_on = true;
        radio._config = RadioConfig::default().with_dynamic_payloads(true);
        let mut buf = [0u8; 32];
        assert!(matches!(
            radio.read_into(&mut buf),
            Err(Nrf24Error::NotResponding)
        ));
        assert!(!radio._is_on);
        spi.done();
        ce_pin.done();
    }
}
