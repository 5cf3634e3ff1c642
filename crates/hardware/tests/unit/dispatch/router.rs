//! Router state-machine tests: full claim → complete cycles against a
//! wired chip.

use socsmoke_core::common::error::ProtocolViolation;
use socsmoke_core::dispatch::table::{
    self, IRQ_ID_GPIO_PIN0_FALLING, IRQ_ID_GPIO_PIN0_RISING,
};
use socsmoke_core::soc::devices::gpio::{Edge, GpioIrq};
use socsmoke_core::soc::devices::plic::{TriggerKind, MAX_PRIORITY, TARGET_HART0};
use socsmoke_core::soc::devices::uart::UartIrq;
use socsmoke_core::soc::devices::IrqSource;

use crate::common::FabricContext;

const RISING: GpioIrq = GpioIrq {
    pin: 0,
    edge: Edge::Rising,
};

#[test]
fn forced_gpio_cause_completes_a_full_cycle() {
    let ctx = FabricContext::gpio();
    ctx.chip.lock().force_gpio(RISING).unwrap();

    ctx.router.service_external_irq().unwrap();

    assert!(ctx.flags.get(IRQ_ID_GPIO_PIN0_RISING));
    let chip = ctx.chip.lock();
    assert!(!chip.gpio.irq_is_pending(RISING).unwrap());
    assert_eq!(chip.plic.outstanding_claim(TARGET_HART0), None);
    assert!(!chip.plic.line_asserted(TARGET_HART0));
}

#[test]
fn forced_uart_cause_completes_a_full_cycle() {
    let ctx = FabricContext::uart();
    ctx.chip.lock().force_uart(UartIrq::RxFrameErr).unwrap();

    ctx.router.service_external_irq().unwrap();

    let id = table::uart_cause_id(UartIrq::RxFrameErr);
    assert!(ctx.flags.get(id));
    let chip = ctx.chip.lock();
    assert!(!chip.uart0.irq_is_pending(UartIrq::RxFrameErr).unwrap());
    assert_eq!(chip.plic.outstanding_claim(TARGET_HART0), None);
}

#[test]
fn idle_line_yields_a_spurious_claim() {
    let ctx = FabricContext::gpio();
    assert_eq!(
        ctx.router.service_external_irq(),
        Err(ProtocolViolation::SpuriousClaim)
    );
}

#[test]
fn cause_from_another_peripheral_is_a_wrong_peripheral_violation() {
    // A UART-routing fabric with a GPIO cause wired in ahead of it.
    let ctx = FabricContext::uart();
    {
        let mut chip = ctx.chip.lock();
        chip.gpio.set_irq_enabled(RISING, true).unwrap();
        chip.plic
            .set_trigger(IRQ_ID_GPIO_PIN0_RISING, TriggerKind::Level)
            .unwrap();
        chip.plic
            .set_priority(IRQ_ID_GPIO_PIN0_RISING, MAX_PRIORITY)
            .unwrap();
        chip.plic
            .set_enabled(IRQ_ID_GPIO_PIN0_RISING, TARGET_HART0, true)
            .unwrap();
    }
    ctx.chip.lock().force_gpio(RISING).unwrap();

    assert_eq!(
        ctx.router.service_external_irq(),
        Err(ProtocolViolation::WrongPeripheral {
            id: IRQ_ID_GPIO_PIN0_RISING,
            expected: table::Peripheral::Uart0,
            found: table::Peripheral::Gpio,
        })
    );
}

#[test]
fn repeat_observation_without_a_reforce_is_a_violation() {
    let ctx = FabricContext::gpio();
    ctx.flags.set(IRQ_ID_GPIO_PIN0_FALLING);
    ctx.chip
        .lock()
        .force_gpio(GpioIrq {
            pin: 0,
            edge: Edge::Falling,
        })
        .unwrap();

    let err = ctx.router.service_external_irq().unwrap_err();
    assert_eq!(
        err,
        ProtocolViolation::DoubleObservation {
            label: "gpio pin0 falling edge",
        }
    );
    // The cycle aborted mid-flight; the claim is still outstanding.
    assert_eq!(
        ctx.chip.lock().plic.outstanding_claim(TARGET_HART0),
        Some(IRQ_ID_GPIO_PIN0_FALLING)
    );
}

#[test]
fn each_forced_round_is_serviceable_after_a_flag_reset() {
    let ctx = FabricContext::gpio();
    for _ in 0..3 {
        ctx.flags.reset(IRQ_ID_GPIO_PIN0_RISING);
        ctx.chip.lock().force_gpio(RISING).unwrap();
        ctx.router.service_external_irq().unwrap();
        assert!(ctx.flags.get(IRQ_ID_GPIO_PIN0_RISING));
    }
}
