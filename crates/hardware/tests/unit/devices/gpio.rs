//! GPIO edge-latching tests.

use socsmoke_core::common::error::DeviceError;
use socsmoke_core::soc::devices::gpio::{Edge, Gpio, GpioIrq, GPIO_PINS};
use socsmoke_core::soc::devices::IrqSource;

const RISING: GpioIrq = GpioIrq {
    pin: 0,
    edge: Edge::Rising,
};
const FALLING: GpioIrq = GpioIrq {
    pin: 0,
    edge: Edge::Falling,
};

#[test]
fn rising_transition_latches_only_the_rising_cause() {
    let mut gpio = Gpio::new();
    gpio.set_input(0, true).unwrap();

    assert!(gpio.irq_is_pending(RISING).unwrap());
    assert!(!gpio.irq_is_pending(FALLING).unwrap());
}

#[test]
fn falling_transition_latches_only_the_falling_cause() {
    let mut gpio = Gpio::new();
    gpio.set_input(0, true).unwrap();
    gpio.irq_acknowledge(RISING).unwrap();

    gpio.set_input(0, false).unwrap();
    assert!(gpio.irq_is_pending(FALLING).unwrap());
    assert!(!gpio.irq_is_pending(RISING).unwrap());
}

#[test]
fn steady_level_does_not_latch() {
    let mut gpio = Gpio::new();
    gpio.set_input(0, false).unwrap();
    assert!(!gpio.irq_is_pending(FALLING).unwrap());

    gpio.set_input(0, true).unwrap();
    gpio.irq_acknowledge(RISING).unwrap();
    gpio.set_input(0, true).unwrap();
    assert!(!gpio.irq_is_pending(RISING).unwrap());
}

#[test]
fn acknowledge_clears_one_edge_without_disturbing_the_other() {
    let mut gpio = Gpio::new();
    gpio.irq_force(RISING).unwrap();
    gpio.irq_force(FALLING).unwrap();

    gpio.irq_acknowledge(RISING).unwrap();
    assert!(!gpio.irq_is_pending(RISING).unwrap());
    assert!(gpio.irq_is_pending(FALLING).unwrap());
}

#[test]
fn force_latches_without_an_input_transition() {
    let mut gpio = Gpio::new();
    gpio.irq_force(FALLING).unwrap();

    assert!(gpio.irq_is_pending(FALLING).unwrap());
    assert!(!gpio.read_input(0).unwrap());
}

#[test]
fn line_requires_enable() {
    let mut gpio = Gpio::new();
    gpio.irq_force(RISING).unwrap();
    assert!(!gpio.irq_line(RISING).unwrap());

    gpio.set_irq_enabled(RISING, true).unwrap();
    assert!(gpio.irq_line(RISING).unwrap());
}

#[test]
fn pins_latch_independently() {
    let mut gpio = Gpio::new();
    gpio.set_input(3, true).unwrap();

    let pin3 = GpioIrq {
        pin: 3,
        edge: Edge::Rising,
    };
    assert!(gpio.irq_is_pending(pin3).unwrap());
    assert!(!gpio.irq_is_pending(RISING).unwrap());
}

#[test]
fn out_of_range_pin_is_rejected() {
    let mut gpio = Gpio::new();
    let bad = GpioIrq {
        pin: GPIO_PINS,
        edge: Edge::Rising,
    };
    assert_eq!(gpio.set_input(GPIO_PINS, true), Err(DeviceError::BadArg));
    assert_eq!(gpio.irq_force(bad), Err(DeviceError::BadArg));
    assert_eq!(gpio.irq_is_pending(bad), Err(DeviceError::BadArg));
}
