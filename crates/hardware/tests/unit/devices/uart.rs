//! UART configuration, FIFO, and interrupt-condition tests.

use pretty_assertions::assert_eq;

use socsmoke_core::common::error::DeviceError;
use socsmoke_core::soc::devices::uart::{
    FifoReset, Parity, Uart, UartConfig, UartIrq, UART_FIFO_DEPTH,
};
use socsmoke_core::soc::devices::IrqSource;

fn default_line() -> UartConfig {
    UartConfig {
        baudrate: 115_200,
        clk_freq_hz: 24_000_000,
        parity_enable: false,
        parity: Parity::Even,
    }
}

fn loopback_uart() -> Uart {
    let mut uart = Uart::new();
    uart.configure(default_line()).unwrap();
    uart.loopback_set(true);
    uart.fifo_reset(FifoReset::All);
    uart
}

#[test]
fn configure_rejects_zero_rates() {
    let mut uart = Uart::new();
    assert_eq!(
        uart.configure(UartConfig {
            baudrate: 0,
            ..default_line()
        }),
        Err(DeviceError::BadArg)
    );
    assert_eq!(
        uart.configure(UartConfig {
            clk_freq_hz: 0,
            ..default_line()
        }),
        Err(DeviceError::BadArg)
    );
    assert!(!uart.is_configured());
}

#[test]
fn configure_rejects_ungeneratable_baud() {
    let mut uart = Uart::new();
    // Fewer than two clock cycles per bit.
    assert_eq!(
        uart.configure(UartConfig {
            baudrate: 115_200,
            clk_freq_hz: 115_200,
            ..default_line()
        }),
        Err(DeviceError::BadArg)
    );
}

#[test]
fn byte_paths_require_configuration() {
    let mut uart = Uart::new();
    assert_eq!(uart.byte_send_polled(0x55), Err(DeviceError::InvalidState));
    assert_eq!(uart.byte_receive_polled(), Err(DeviceError::InvalidState));
}

#[test]
fn loopback_round_trips_bytes_in_order() {
    let mut uart = loopback_uart();
    for &byte in b"Smoke test!" {
        uart.byte_send_polled(byte).unwrap();
    }
    let mut received = Vec::new();
    while uart.rx_fifo_len() > 0 {
        received.push(uart.byte_receive_polled().unwrap());
    }
    assert_eq!(received, b"Smoke test!".to_vec());
}

#[test]
fn receive_from_empty_fifo_is_invalid() {
    let mut uart = loopback_uart();
    assert_eq!(uart.byte_receive_polled(), Err(DeviceError::InvalidState));
}

#[test]
fn send_without_loopback_drops_into_the_wire() {
    let mut uart = Uart::new();
    uart.configure(default_line()).unwrap();
    uart.byte_send_polled(0xAA).unwrap();

    assert_eq!(uart.tx_fifo_len(), 0);
    assert_eq!(uart.rx_fifo_len(), 0);
}

#[test]
fn sending_latches_tx_level_conditions() {
    let mut uart = loopback_uart();
    uart.byte_send_polled(0x01).unwrap();

    assert!(uart.irq_is_pending(UartIrq::TxEmpty).unwrap());
    assert!(uart.irq_is_pending(UartIrq::TxWatermark).unwrap());
    assert!(uart.irq_is_pending(UartIrq::RxWatermark).unwrap());
}

#[test]
fn rx_overflow_latches_when_the_fifo_is_full() {
    let mut uart = loopback_uart();
    for i in 0..UART_FIFO_DEPTH {
        uart.byte_send_polled(i as u8).unwrap();
    }
    assert!(!uart.irq_is_pending(UartIrq::RxOverflow).unwrap());

    uart.byte_send_polled(0xFF).unwrap();
    assert!(uart.irq_is_pending(UartIrq::RxOverflow).unwrap());
    assert_eq!(uart.rx_fifo_len(), UART_FIFO_DEPTH);
}

#[test]
fn fifo_reset_clears_the_selected_fifo() {
    let mut uart = loopback_uart();
    uart.byte_send_polled(0x10).unwrap();
    uart.byte_send_polled(0x20).unwrap();
    assert_eq!(uart.rx_fifo_len(), 2);

    uart.fifo_reset(FifoReset::Rx);
    assert_eq!(uart.rx_fifo_len(), 0);
}

#[test]
fn acknowledge_and_force_track_per_cause_bits() {
    let mut uart = Uart::new();
    for irq in UartIrq::ALL {
        uart.irq_force(irq).unwrap();
        assert!(uart.irq_is_pending(irq).unwrap());
    }
    uart.irq_acknowledge(UartIrq::RxParityErr).unwrap();
    assert!(!uart.irq_is_pending(UartIrq::RxParityErr).unwrap());
    // The other seven stay latched.
    for irq in UartIrq::ALL {
        if irq != UartIrq::RxParityErr {
            assert!(uart.irq_is_pending(irq).unwrap());
        }
    }
}

#[test]
fn line_requires_enable() {
    let mut uart = Uart::new();
    uart.irq_force(UartIrq::RxBreakErr).unwrap();
    assert!(!uart.irq_line(UartIrq::RxBreakErr).unwrap());

    uart.set_irq_enabled(UartIrq::RxBreakErr, true).unwrap();
    assert!(uart.irq_line(UartIrq::RxBreakErr).unwrap());
}
