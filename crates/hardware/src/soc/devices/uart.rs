//! UART: the cause-coded interrupt source, plus a FIFO byte path.
//!
//! Eight independent interrupt conditions cover FIFO levels and RX error
//! states; each is separately enable/acknowledge/force-able. The byte path
//! models TX/RX FIFOs with a system-loopback mode for polled send/receive
//! round-trips. Error conditions (parity, framing, break) have no natural
//! trigger in the model and are reachable only via `irq_force`; FIFO-level
//! conditions also latch naturally as bytes move.

use crate::common::error::DeviceError;
use crate::soc::traits::IrqSource;

/// TX and RX FIFO depth in bytes.
pub const UART_FIFO_DEPTH: usize = 32;

/// Parity selection for the serial frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Parity {
    /// Even parity.
    Even,
    /// Odd parity.
    Odd,
}

/// Line configuration, validated by [`Uart::configure`].
#[derive(Debug, Clone, Copy)]
pub struct UartConfig {
    /// Requested baud rate in bits per second.
    pub baudrate: u32,
    /// Peripheral clock feeding the baud generator.
    pub clk_freq_hz: u64,
    /// Whether parity generation/checking is enabled.
    pub parity_enable: bool,
    /// Parity sense used when parity is enabled.
    pub parity: Parity,
}

/// One UART interrupt cause.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UartIrq {
    /// TX FIFO dipped below its watermark.
    TxWatermark,
    /// RX FIFO reached its watermark.
    RxWatermark,
    /// TX FIFO drained empty.
    TxEmpty,
    /// A byte arrived with the RX FIFO full.
    RxOverflow,
    /// RX framing error.
    RxFrameErr,
    /// RX break condition.
    RxBreakErr,
    /// RX FIFO timeout expired before it was emptied.
    RxTimeout,
    /// RX parity error.
    RxParityErr,
}

impl UartIrq {
    /// Every cause, in register-bit order.
    pub const ALL: [Self; 8] = [
        Self::TxWatermark,
        Self::RxWatermark,
        Self::TxEmpty,
        Self::RxOverflow,
        Self::RxFrameErr,
        Self::RxBreakErr,
        Self::RxTimeout,
        Self::RxParityErr,
    ];

    fn mask(self) -> u8 {
        match self {
            Self::TxWatermark => 1 << 0,
            Self::RxWatermark => 1 << 1,
            Self::TxEmpty => 1 << 2,
            Self::RxOverflow => 1 << 3,
            Self::RxFrameErr => 1 << 4,
            Self::RxBreakErr => 1 << 5,
            Self::RxTimeout => 1 << 6,
            Self::RxParityErr => 1 << 7,
        }
    }
}

/// Which FIFOs to clear in [`Uart::fifo_reset`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FifoReset {
    /// Clear the RX FIFO only.
    Rx,
    /// Clear the TX FIFO only.
    Tx,
    /// Clear both FIFOs.
    All,
}

/// UART device state.
#[derive(Debug)]
pub struct Uart {
    config: Option<UartConfig>,
    irq_pending: u8,
    irq_enable: u8,
    tx_fifo: std::collections::VecDeque<u8>,
    rx_fifo: std::collections::VecDeque<u8>,
    loopback: bool,
    tx_watermark_level: usize,
    rx_watermark_level: usize,
}

impl Default for Uart {
    fn default() -> Self {
        Self {
            config: None,
            irq_pending: 0,
            irq_enable: 0,
            tx_fifo: std::collections::VecDeque::new(),
            rx_fifo: std::collections::VecDeque::new(),
            loopback: false,
            tx_watermark_level: 4,
            rx_watermark_level: 1,
        }
    }
}

impl Uart {
    /// Creates an unconfigured UART.
    pub fn new() -> Self {
        Self::default()
    }

    /// Validates and applies a line configuration.
    ///
    /// Rejects a zero baud rate or peripheral clock, and a baud rate the
    /// clock cannot generate.
    pub fn configure(&mut self, config: UartConfig) -> Result<(), DeviceError> {
        if config.baudrate == 0 || config.clk_freq_hz == 0 {
            return Err(DeviceError::BadArg);
        }
        // The baud generator needs at least two clock cycles per bit.
        if u64::from(config.baudrate) * 2 > config.clk_freq_hz {
            return Err(DeviceError::BadArg);
        }
        self.config = Some(config);
        Ok(())
    }

    /// Whether [`Uart::configure`] has been applied.
    pub fn is_configured(&self) -> bool {
        self.config.is_some()
    }

    /// Enables or disables system loopback (TX shifts straight into RX).
    pub fn loopback_set(&mut self, enabled: bool) {
        self.loopback = enabled;
    }

    /// Clears the selected FIFOs.
    pub fn fifo_reset(&mut self, which: FifoReset) {
        if matches!(which, FifoReset::Rx | FifoReset::All) {
            self.rx_fifo.clear();
        }
        if matches!(which, FifoReset::Tx | FifoReset::All) {
            self.tx_fifo.clear();
        }
    }

    /// Current RX FIFO depth.
    pub fn rx_fifo_len(&self) -> usize {
        self.rx_fifo.len()
    }

    /// Current TX FIFO depth.
    pub fn tx_fifo_len(&self) -> usize {
        self.tx_fifo.len()
    }

    /// Sends one byte, blocking-polled: the byte enters the TX FIFO and is
    /// shifted out before returning. With loopback enabled the byte lands
    /// in the RX FIFO (or latches an overflow if RX is full).
    pub fn byte_send_polled(&mut self, byte: u8) -> Result<(), DeviceError> {
        if self.config.is_none() {
            return Err(DeviceError::InvalidState);
        }
        if self.tx_fifo.len() >= UART_FIFO_DEPTH {
            return Err(DeviceError::InvalidState);
        }
        self.tx_fifo.push_back(byte);
        self.shift_out();
        Ok(())
    }

    /// Receives one byte, blocking-polled. In the model data only ever
    /// arrives via loopback, so an empty RX FIFO is an invalid state
    /// rather than a wait.
    pub fn byte_receive_polled(&mut self) -> Result<u8, DeviceError> {
        if self.config.is_none() {
            return Err(DeviceError::InvalidState);
        }
        let byte = self.rx_fifo.pop_front().ok_or(DeviceError::InvalidState)?;
        self.update_irqs();
        Ok(byte)
    }

    /// Drains the TX FIFO through the (instantaneous) shift register.
    fn shift_out(&mut self) {
        while let Some(byte) = self.tx_fifo.pop_front() {
            if self.loopback {
                if self.rx_fifo.len() >= UART_FIFO_DEPTH {
                    self.irq_pending |= UartIrq::RxOverflow.mask();
                } else {
                    self.rx_fifo.push_back(byte);
                }
            }
        }
        self.update_irqs();
    }

    /// Latches the FIFO-level interrupt conditions that currently hold.
    fn update_irqs(&mut self) {
        if self.tx_fifo.is_empty() {
            self.irq_pending |= UartIrq::TxEmpty.mask();
        }
        if self.tx_fifo.len() < self.tx_watermark_level {
            self.irq_pending |= UartIrq::TxWatermark.mask();
        }
        if self.rx_fifo.len() >= self.rx_watermark_level {
            self.irq_pending |= UartIrq::RxWatermark.mask();
        }
    }
}

impl IrqSource for Uart {
    type Cause = UartIrq;

    fn set_irq_enabled(&mut self, cause: UartIrq, enabled: bool) -> Result<(), DeviceError> {
        if enabled {
            self.irq_enable |= cause.mask();
        } else {
            self.irq_enable &= !cause.mask();
        }
        Ok(())
    }

    fn irq_acknowledge(&mut self, cause: UartIrq) -> Result<(), DeviceError> {
        self.irq_pending &= !cause.mask();
        Ok(())
    }

    fn irq_force(&mut self, cause: UartIrq) -> Result<(), DeviceError> {
        self.irq_pending |= cause.mask();
        Ok(())
    }

    fn irq_is_pending(&self, cause: UartIrq) -> Result<bool, DeviceError> {
        Ok(self.irq_pending & cause.mask() != 0)
    }

    fn irq_enabled(&self, cause: UartIrq) -> Result<bool, DeviceError> {
        Ok(self.irq_enable & cause.mask() != 0)
    }
}
