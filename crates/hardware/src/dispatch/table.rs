//! Cause identities and the static dispatch table.
//!
//! The table is the chip's "hardware description": a fixed assignment of
//! controller cause ids to the peripheral that owns each cause, plus a
//! diagnostic label. It is built at compile time and read-only for the life
//! of the process. Lookups are total: an id outside the table produces a
//! named [`ProtocolViolation`], not a default branch.

use std::fmt;

use crate::common::error::ProtocolViolation;
use crate::soc::devices::gpio::{Edge, GpioIrq};
use crate::soc::devices::uart::UartIrq;

/// Controller-assigned interrupt cause id.
///
/// Id 0 is reserved as the "no interrupt" sentinel and never appears in the
/// table; the claim API surfaces the sentinel as `None` instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CauseId(pub u32);

impl fmt::Display for CauseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "irq{}", self.0)
    }
}

/// Peripheral identity, as routed by the dispatch table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Peripheral {
    /// Edge-pin interrupt source.
    Gpio,
    /// Cause-coded serial interrupt source.
    Uart0,
}

impl fmt::Display for Peripheral {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Gpio => write!(f, "gpio"),
            Self::Uart0 => write!(f, "uart0"),
        }
    }
}

/// GPIO pin 0 rising-edge cause.
pub const IRQ_ID_GPIO_PIN0_RISING: CauseId = CauseId(1);
/// GPIO pin 0 falling-edge cause.
pub const IRQ_ID_GPIO_PIN0_FALLING: CauseId = CauseId(2);
/// UART0 TX FIFO dipped below its watermark.
pub const IRQ_ID_UART0_TX_WATERMARK: CauseId = CauseId(3);
/// UART0 RX FIFO reached its watermark.
pub const IRQ_ID_UART0_RX_WATERMARK: CauseId = CauseId(4);
/// UART0 TX FIFO drained empty.
pub const IRQ_ID_UART0_TX_EMPTY: CauseId = CauseId(5);
/// UART0 RX FIFO overflowed.
pub const IRQ_ID_UART0_RX_OVERFLOW: CauseId = CauseId(6);
/// UART0 RX framing error.
pub const IRQ_ID_UART0_RX_FRAME_ERR: CauseId = CauseId(7);
/// UART0 RX break condition.
pub const IRQ_ID_UART0_RX_BREAK_ERR: CauseId = CauseId(8);
/// UART0 RX FIFO timeout expired before it was emptied.
pub const IRQ_ID_UART0_RX_TIMEOUT: CauseId = CauseId(9);
/// UART0 RX parity error.
pub const IRQ_ID_UART0_RX_PARITY_ERR: CauseId = CauseId(10);

/// Highest cause id wired into the controller.
pub const LAST_IRQ_ID: u32 = 10;

/// Number of cause slots, including the reserved id 0.
pub const NUM_CAUSES: usize = LAST_IRQ_ID as usize + 1;

/// One row of the dispatch table.
#[derive(Debug, Clone, Copy)]
pub struct TableEntry {
    /// The controller cause id.
    pub id: CauseId,
    /// The peripheral that owns the cause.
    pub peripheral: Peripheral,
    /// Diagnostic label used in failure messages.
    pub label: &'static str,
}

/// The static id → peripheral dispatch table.
pub const DISPATCH_TABLE: &[TableEntry] = &[
    TableEntry {
        id: IRQ_ID_GPIO_PIN0_RISING,
        peripheral: Peripheral::Gpio,
        label: "gpio pin0 rising edge",
    },
    TableEntry {
        id: IRQ_ID_GPIO_PIN0_FALLING,
        peripheral: Peripheral::Gpio,
        label: "gpio pin0 falling edge",
    },
    TableEntry {
        id: IRQ_ID_UART0_TX_WATERMARK,
        peripheral: Peripheral::Uart0,
        label: "uart0 tx_watermark",
    },
    TableEntry {
        id: IRQ_ID_UART0_RX_WATERMARK,
        peripheral: Peripheral::Uart0,
        label: "uart0 rx_watermark",
    },
    TableEntry {
        id: IRQ_ID_UART0_TX_EMPTY,
        peripheral: Peripheral::Uart0,
        label: "uart0 tx_empty",
    },
    TableEntry {
        id: IRQ_ID_UART0_RX_OVERFLOW,
        peripheral: Peripheral::Uart0,
        label: "uart0 rx_overflow",
    },
    TableEntry {
        id: IRQ_ID_UART0_RX_FRAME_ERR,
        peripheral: Peripheral::Uart0,
        label: "uart0 rx_frame_err",
    },
    TableEntry {
        id: IRQ_ID_UART0_RX_BREAK_ERR,
        peripheral: Peripheral::Uart0,
        label: "uart0 rx_break_err",
    },
    TableEntry {
        id: IRQ_ID_UART0_RX_TIMEOUT,
        peripheral: Peripheral::Uart0,
        label: "uart0 rx_timeout",
    },
    TableEntry {
        id: IRQ_ID_UART0_RX_PARITY_ERR,
        peripheral: Peripheral::Uart0,
        label: "uart0 rx_parity_err",
    },
];

/// Looks up the table row for `id`.
pub fn entry_for(id: CauseId) -> Result<&'static TableEntry, ProtocolViolation> {
    DISPATCH_TABLE
        .iter()
        .find(|e| e.id == id)
        .ok_or(ProtocolViolation::UnmappedCause(id))
}

/// Resolves the peripheral that owns `id`.
pub fn peripheral_for(id: CauseId) -> Result<Peripheral, ProtocolViolation> {
    entry_for(id).map(|e| e.peripheral)
}

/// Diagnostic label for `id`, or a placeholder for unmapped ids.
pub fn label_for(id: CauseId) -> &'static str {
    entry_for(id).map_or("<unmapped cause>", |e| e.label)
}

/// Maps a claimed id to the single GPIO cause it encodes.
pub fn gpio_irq_for(id: CauseId) -> Result<GpioIrq, ProtocolViolation> {
    match id {
        IRQ_ID_GPIO_PIN0_RISING => Ok(GpioIrq {
            pin: 0,
            edge: Edge::Rising,
        }),
        IRQ_ID_GPIO_PIN0_FALLING => Ok(GpioIrq {
            pin: 0,
            edge: Edge::Falling,
        }),
        other => Err(ProtocolViolation::UnmappedCause(other)),
    }
}

/// Controller cause id wired to a GPIO cause, if that cause is wired at all.
pub fn gpio_cause_id(irq: GpioIrq) -> Option<CauseId> {
    match (irq.pin, irq.edge) {
        (0, Edge::Rising) => Some(IRQ_ID_GPIO_PIN0_RISING),
        (0, Edge::Falling) => Some(IRQ_ID_GPIO_PIN0_FALLING),
        _ => None,
    }
}

/// Maps a claimed id to the single UART cause it encodes.
pub fn uart_irq_for(id: CauseId) -> Result<UartIrq, ProtocolViolation> {
    match id {
        IRQ_ID_UART0_TX_WATERMARK => Ok(UartIrq::TxWatermark),
        IRQ_ID_UART0_RX_WATERMARK => Ok(UartIrq::RxWatermark),
        IRQ_ID_UART0_TX_EMPTY => Ok(UartIrq::TxEmpty),
        IRQ_ID_UART0_RX_OVERFLOW => Ok(UartIrq::RxOverflow),
        IRQ_ID_UART0_RX_FRAME_ERR => Ok(UartIrq::RxFrameErr),
        IRQ_ID_UART0_RX_BREAK_ERR => Ok(UartIrq::RxBreakErr),
        IRQ_ID_UART0_RX_TIMEOUT => Ok(UartIrq::RxTimeout),
        IRQ_ID_UART0_RX_PARITY_ERR => Ok(UartIrq::RxParityErr),
        other => Err(ProtocolViolation::UnmappedCause(other)),
    }
}

/// Controller cause id wired to a UART cause.
pub fn uart_cause_id(irq: UartIrq) -> CauseId {
    match irq {
        UartIrq::TxWatermark => IRQ_ID_UART0_TX_WATERMARK,
        UartIrq::RxWatermark => IRQ_ID_UART0_RX_WATERMARK,
        UartIrq::TxEmpty => IRQ_ID_UART0_TX_EMPTY,
        UartIrq::RxOverflow => IRQ_ID_UART0_RX_OVERFLOW,
        UartIrq::RxFrameErr => IRQ_ID_UART0_RX_FRAME_ERR,
        UartIrq::RxBreakErr => IRQ_ID_UART0_RX_BREAK_ERR,
        UartIrq::RxTimeout => IRQ_ID_UART0_RX_TIMEOUT,
        UartIrq::RxParityErr => IRQ_ID_UART0_RX_PARITY_ERR,
    }
}
