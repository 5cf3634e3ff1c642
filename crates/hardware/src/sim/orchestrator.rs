//! The test orchestrator: the smoketest suites and their runner.
//!
//! Each suite builds a fresh chip, configures the interrupt fabric end to
//! end, forces every cause under test exactly once, and asserts that the
//! interrupt context observed it within one bounded wait. Failures are
//! fatal per suite: the first broken check ends the suite with a
//! descriptive [`SmokeError`], never a retry.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crate::common::error::{ProtocolViolation, SmokeError};
use crate::config::Config;
use crate::dispatch::flags::ObservationFlags;
use crate::dispatch::router::Router;
use crate::dispatch::table::{self, CauseId, Peripheral};
use crate::sim::host::{Host, ServiceThread};
use crate::soc::devices::aon_timer::AonIrq;
use crate::soc::devices::clkmgr::{GateableClock, HintableClock};
use crate::soc::devices::gpio::{Edge, GpioIrq};
use crate::soc::devices::plic::{TriggerKind, MAX_PRIORITY, MIN_PRIORITY, TARGET_HART0};
use crate::soc::devices::rstmgr::RESET_INFO_POR;
use crate::soc::devices::rv_timer::approximate_tick_params;
use crate::soc::devices::uart::{FifoReset, Parity, UartConfig, UartIrq};
use crate::soc::devices::IrqSource;
use crate::soc::{Chip, SharedChip};

/// A smoketest suite entry point.
pub type SuiteFn = fn(&Config) -> Result<(), SmokeError>;

/// Every suite, in execution order.
pub const SUITES: &[(&str, SuiteFn)] = &[
    ("plic_gpio_smoketest", plic_gpio_smoketest as SuiteFn),
    ("plic_uart_smoketest", plic_uart_smoketest as SuiteFn),
    ("uart_loopback_smoketest", uart_loopback_smoketest as SuiteFn),
    ("clkmgr_smoketest", clkmgr_smoketest as SuiteFn),
    ("aon_timer_smoketest", aon_timer_smoketest as SuiteFn),
    ("rv_timer_smoketest", rv_timer_smoketest as SuiteFn),
    ("rstmgr_smoketest", rstmgr_smoketest as SuiteFn),
];

/// Outcome of one suite.
#[derive(Debug)]
pub struct SuiteResult {
    /// Suite name.
    pub name: &'static str,
    /// Pass, or the fatal error that ended the suite.
    pub outcome: Result<(), SmokeError>,
}

/// Outcome of a whole run.
#[derive(Debug, Default)]
pub struct TestReport {
    /// Per-suite outcomes, in execution order.
    pub results: Vec<SuiteResult>,
}

impl TestReport {
    /// Whether every executed suite passed.
    pub fn passed(&self) -> bool {
        self.results.iter().all(|r| r.outcome.is_ok())
    }
}

/// Runs every suite.
pub fn run_all(config: &Config) -> TestReport {
    run_filtered(config, None)
}

/// Runs the suites whose names contain `filter` (all of them for `None`).
pub fn run_filtered(config: &Config, filter: Option<&str>) -> TestReport {
    let mut report = TestReport::default();
    for &(name, suite) in SUITES {
        if filter.is_some_and(|f| !name.contains(f)) {
            continue;
        }
        tracing::info!(suite = name, "running");
        let outcome = suite(config);
        match &outcome {
            Ok(()) => tracing::info!(suite = name, "passed"),
            Err(err) => tracing::error!(suite = name, %err, "failed"),
        }
        report.results.push(SuiteResult { name, outcome });
    }
    report
}

/// One forced-cause round: reset the flag, force, wait once if needed,
/// then require the flag.
fn forced_round(
    flags: &ObservationFlags,
    service: &ServiceThread,
    wait: Duration,
    id: CauseId,
    force: impl FnOnce() -> Result<(), SmokeError>,
) -> Result<(), SmokeError> {
    flags.reset(id);
    force()?;
    if !flags.get(id) {
        thread::sleep(wait);
    }
    if let Some(violation) = service.fatal() {
        return Err(violation.into());
    }
    if !flags.get(id) {
        return Err(SmokeError::Unhandled {
            cause: table::label_for(id),
        });
    }
    Ok(())
}

/// Drains a finished service thread, surfacing any latched violation.
fn finish(service: ServiceThread) -> Result<(), SmokeError> {
    match service.stop() {
        Some(violation) => Err(violation.into()),
        None => Ok(()),
    }
}

/// GPIO interrupt smoketest: rising and falling edge causes of one pin,
/// forced in turn, each observed exactly once.
pub fn plic_gpio_smoketest(config: &Config) -> Result<(), SmokeError> {
    const RISING: GpioIrq = GpioIrq {
        pin: 0,
        edge: Edge::Rising,
    };
    const FALLING: GpioIrq = GpioIrq {
        pin: 0,
        edge: Edge::Falling,
    };

    let chip = SharedChip::new(Chip::new(config));
    let flags = Arc::new(ObservationFlags::new());
    let router = Router::new(
        chip.clone(),
        Arc::clone(&flags),
        TARGET_HART0,
        Peripheral::Gpio,
    );
    let mut host = Host::new(chip.clone(), TARGET_HART0, config.service_poll());
    host.register_external(Box::new(move || router.service_external_irq()));

    {
        let mut c = chip.lock();
        c.gpio
            .set_irq_enabled(FALLING, true)
            .map_err(SmokeError::config("gpio falling edge IRQ enable"))?;
        c.gpio
            .set_irq_enabled(RISING, true)
            .map_err(SmokeError::config("gpio rising edge IRQ enable"))?;

        for id in [
            table::IRQ_ID_GPIO_PIN0_FALLING,
            table::IRQ_ID_GPIO_PIN0_RISING,
        ] {
            c.plic
                .set_trigger(id, TriggerKind::Level)
                .map_err(SmokeError::config("plic trigger set"))?;
            c.plic
                .set_priority(id, MAX_PRIORITY)
                .map_err(SmokeError::config("plic priority set"))?;
        }
        c.plic
            .set_threshold(TARGET_HART0, MIN_PRIORITY)
            .map_err(SmokeError::config("plic threshold set"))?;
        for id in [
            table::IRQ_ID_GPIO_PIN0_FALLING,
            table::IRQ_ID_GPIO_PIN0_RISING,
        ] {
            c.plic
                .set_enabled(id, TARGET_HART0, true)
                .map_err(SmokeError::config("plic IRQ enable"))?;
        }
    }

    let service = host.spawn();

    // Falling edge first, then rising; the sibling flag must stay clear
    // through the first round.
    forced_round(
        &flags,
        &service,
        config.irq_wait(),
        table::IRQ_ID_GPIO_PIN0_FALLING,
        || {
            chip.lock()
                .force_gpio(FALLING)
                .map_err(SmokeError::config("gpio falling edge IRQ force"))
        },
    )?;
    if flags.get(table::IRQ_ID_GPIO_PIN0_RISING) {
        return Err(SmokeError::Unexpected {
            cause: table::label_for(table::IRQ_ID_GPIO_PIN0_RISING),
        });
    }

    forced_round(
        &flags,
        &service,
        config.irq_wait(),
        table::IRQ_ID_GPIO_PIN0_RISING,
        || {
            chip.lock()
                .force_gpio(RISING)
                .map_err(SmokeError::config("gpio rising edge IRQ force"))
        },
    )?;

    finish(service)
}

/// UART interrupt smoketest: all eight causes configured end to end and
/// forced exactly once each, in a fixed order; after every round the set
/// of observed causes must be exactly the causes forced so far.
pub fn plic_uart_smoketest(config: &Config) -> Result<(), SmokeError> {
    const FORCE_ORDER: [UartIrq; 8] = [
        UartIrq::RxParityErr,
        UartIrq::RxTimeout,
        UartIrq::RxBreakErr,
        UartIrq::RxFrameErr,
        UartIrq::RxOverflow,
        UartIrq::TxEmpty,
        UartIrq::RxWatermark,
        UartIrq::TxWatermark,
    ];

    let chip = SharedChip::new(Chip::new(config));
    let flags = Arc::new(ObservationFlags::new());
    let router = Router::new(
        chip.clone(),
        Arc::clone(&flags),
        TARGET_HART0,
        Peripheral::Uart0,
    );
    let mut host = Host::new(chip.clone(), TARGET_HART0, config.service_poll());
    host.register_external(Box::new(move || router.service_external_irq()));

    {
        let mut c = chip.lock();
        c.uart0
            .configure(UartConfig {
                baudrate: config.baud_rate,
                clk_freq_hz: config.peripheral_clk_hz,
                parity_enable: false,
                parity: Parity::Even,
            })
            .map_err(SmokeError::config("uart configure"))?;

        for irq in UartIrq::ALL {
            c.uart0
                .set_irq_enabled(irq, true)
                .map_err(SmokeError::config("uart IRQ enable"))?;
            let id = table::uart_cause_id(irq);
            c.plic
                .set_trigger(id, TriggerKind::Level)
                .map_err(SmokeError::config("plic trigger set"))?;
            c.plic
                .set_priority(id, MAX_PRIORITY)
                .map_err(SmokeError::config("plic priority set"))?;
        }
        c.plic
            .set_threshold(TARGET_HART0, MIN_PRIORITY)
            .map_err(SmokeError::config("plic threshold set"))?;
        for irq in UartIrq::ALL {
            c.plic
                .set_enabled(table::uart_cause_id(irq), TARGET_HART0, true)
                .map_err(SmokeError::config("plic IRQ enable"))?;
        }
    }

    let service = host.spawn();

    let mut observed: Vec<CauseId> = Vec::new();
    for irq in FORCE_ORDER {
        let id = table::uart_cause_id(irq);
        forced_round(&flags, &service, config.irq_wait(), id, || {
            chip.lock()
                .force_uart(irq)
                .map_err(SmokeError::config("uart IRQ force"))
        })?;
        observed.push(id);

        // No flag outside the forced set may change.
        let mut seen = flags.set_ids();
        seen.sort_unstable();
        let mut expected = observed.clone();
        expected.sort_unstable();
        if seen != expected {
            let stray = seen
                .into_iter()
                .find(|id| !expected.contains(id))
                .unwrap_or(id);
            return Err(SmokeError::Unexpected {
                cause: table::label_for(stray),
            });
        }
    }

    finish(service)
}

/// UART loopback smoketest: polled send/receive of a known string through
/// system loopback, compared byte for byte.
pub fn uart_loopback_smoketest(config: &Config) -> Result<(), SmokeError> {
    const SEND_DATA: &[u8] = b"Smoke test!";

    let mut chip = Chip::new(config);
    chip.uart0
        .configure(UartConfig {
            baudrate: config.baud_rate,
            clk_freq_hz: config.peripheral_clk_hz,
            parity_enable: false,
            parity: Parity::Even,
        })
        .map_err(SmokeError::config("uart configure"))?;
    chip.uart0.loopback_set(true);
    chip.uart0.fifo_reset(FifoReset::All);

    for &byte in SEND_DATA {
        chip.uart0
            .byte_send_polled(byte)
            .map_err(SmokeError::config("uart byte send"))?;
        let received = chip
            .uart0
            .byte_receive_polled()
            .map_err(SmokeError::config("uart byte receive"))?;
        if received != byte {
            return Err(SmokeError::Check(format!(
                "loopback mismatch: sent {byte:#04x}, received {received:#04x}"
            )));
        }
    }
    Ok(())
}

/// Clock manager smoketest: every gateable clock and every hintable clock
/// toggled twice ends in its original state, with reads agreeing with the
/// last write at each step.
pub fn clkmgr_smoketest(config: &Config) -> Result<(), SmokeError> {
    let mut chip = Chip::new(config);

    for clock in GateableClock::ALL {
        let mut enabled = chip
            .clkmgr
            .gateable_get_enabled(clock)
            .map_err(SmokeError::config("gateable clock read"))?;
        for _ in 0..2 {
            let expected = !enabled;
            chip.clkmgr
                .gateable_set_enabled(clock, expected)
                .map_err(SmokeError::config("gateable clock write"))?;
            enabled = chip
                .clkmgr
                .gateable_get_enabled(clock)
                .map_err(SmokeError::config("gateable clock read"))?;
            if enabled != expected {
                return Err(SmokeError::Check(format!(
                    "gateable clock {clock:?} did not follow set_enabled({expected})"
                )));
            }
        }
    }

    for clock in HintableClock::ALL {
        let mut hint = chip
            .clkmgr
            .hintable_get_hint(clock)
            .map_err(SmokeError::config("hintable clock hint read"))?;
        for _ in 0..2 {
            let expected = !hint;
            chip.clkmgr
                .hintable_set_hint(clock, expected)
                .map_err(SmokeError::config("hintable clock hint write"))?;
            hint = chip
                .clkmgr
                .hintable_get_hint(clock)
                .map_err(SmokeError::config("hintable clock hint read"))?;
            if hint != expected {
                return Err(SmokeError::Check(format!(
                    "hintable clock {clock:?} did not follow set_hint({expected})"
                )));
            }
            // An enabled hint must always report an enabled clock.
            if hint {
                let status = chip
                    .clkmgr
                    .hintable_get_enabled(clock)
                    .map_err(SmokeError::config("hintable clock status read"))?;
                if !status {
                    return Err(SmokeError::Check(format!(
                        "hintable clock {clock:?} hint is enabled but status is disabled"
                    )));
                }
            }
        }
    }

    Ok(())
}

/// Always-on timer smoketest: repeated wakeup and watchdog rounds, each
/// proving the one-shot counter fires once and only after being started.
pub fn aon_timer_smoketest(config: &Config) -> Result<(), SmokeError> {
    let mut chip = Chip::new(config);

    for _ in 0..config.aon_rounds {
        wakeup_round(&mut chip, config.aon_settle())?;
        watchdog_round(&mut chip, config.aon_settle())?;
    }
    Ok(())
}

fn wakeup_round(chip: &mut Chip, settle: Duration) -> Result<(), SmokeError> {
    let aon = &mut chip.aon_timer;
    aon.wakeup_stop();
    aon.irq_acknowledge(AonIrq::WakeupThreshold);
    if aon.irq_is_pending(AonIrq::WakeupThreshold) {
        return Err(SmokeError::Check(
            "wakeup threshold pending before the counter started".into(),
        ));
    }

    // One-cycle counter; the settle time compensates for the slow AON
    // clock.
    aon.wakeup_start(1, 0)
        .map_err(SmokeError::config("aon wakeup start"))?;
    thread::sleep(settle);

    if !aon.irq_is_pending(AonIrq::WakeupThreshold) {
        return Err(SmokeError::Check(
            "wakeup threshold did not fire within the settle time".into(),
        ));
    }
    aon.wakeup_stop();
    aon.irq_acknowledge(AonIrq::WakeupThreshold);
    Ok(())
}

fn watchdog_round(chip: &mut Chip, settle: Duration) -> Result<(), SmokeError> {
    let aon = &mut chip.aon_timer;
    aon.watchdog_stop();
    aon.irq_acknowledge(AonIrq::WatchdogBark);
    if aon.irq_is_pending(AonIrq::WatchdogBark) {
        return Err(SmokeError::Check(
            "watchdog bark pending before the counter started".into(),
        ));
    }

    aon.watchdog_start(1, u64::from(u32::MAX))
        .map_err(SmokeError::config("aon watchdog start"))?;
    thread::sleep(settle);

    if !aon.irq_is_pending(AonIrq::WatchdogBark) {
        return Err(SmokeError::Check(
            "watchdog bark did not fire within the settle time".into(),
        ));
    }
    aon.watchdog_stop();
    aon.irq_acknowledge(AonIrq::WatchdogBark);
    Ok(())
}

/// Platform timer smoketest: arm the comparator a short deadline ahead,
/// enable the counter, and require the timer-line handler to observe the
/// interrupt exactly once.
pub fn rv_timer_smoketest(config: &Config) -> Result<(), SmokeError> {
    const TIMER_LABEL: &str = "rv_timer comparator 0";

    let chip = SharedChip::new(Chip::new(config));
    let mut host = Host::new(chip.clone(), TARGET_HART0, config.service_poll());

    // Starts true to catch a handler invocation before the counter runs.
    let fired = Arc::new(AtomicBool::new(true));

    let handler_chip = chip.clone();
    let handler_fired = Arc::clone(&fired);
    host.register_timer(Box::new(move || {
        let mut c = handler_chip.lock();
        if handler_fired.load(Ordering::Acquire) {
            return Err(ProtocolViolation::DoubleObservation { label: TIMER_LABEL });
        }
        if !c.rv_timer.irq_get() {
            return Err(ProtocolViolation::SpuriousClaim);
        }
        c.rv_timer
            .counter_set_enabled(false)
            .map_err(|source| ProtocolViolation::Device {
                op: "rv_timer counter disable",
                source,
            })?;
        c.rv_timer.irq_clear();
        handler_fired.store(true, Ordering::Release);
        Ok(())
    }));

    let params = approximate_tick_params(config.peripheral_clk_hz, config.rv_timer_tick_hz)
        .map_err(SmokeError::config("rv_timer tick params"))?;
    let deadline_ticks = config.rv_timer_deadline_ticks;
    {
        let mut c = chip.lock();
        c.rv_timer
            .set_tick_params(params)
            .map_err(SmokeError::config("rv_timer tick params set"))?;
        c.rv_timer.irq_enable(true);
        let now = c
            .rv_timer
            .counter_read()
            .map_err(SmokeError::config("rv_timer counter read"))?;
        c.rv_timer
            .arm(now + deadline_ticks)
            .map_err(SmokeError::config("rv_timer arm"))?;
    }

    let service = host.spawn();

    fired.store(false, Ordering::Release);
    chip.lock()
        .rv_timer
        .counter_set_enabled(true)
        .map_err(SmokeError::config("rv_timer counter enable"))?;

    // Wait out the comparator deadline plus the bounded service window.
    let deadline = Duration::from_nanos(
        deadline_ticks.saturating_mul(1_000_000_000) / config.rv_timer_tick_hz.max(1),
    );
    thread::sleep(deadline + config.irq_wait());

    if let Some(violation) = service.fatal() {
        return Err(violation.into());
    }
    if !fired.load(Ordering::Acquire) {
        return Err(SmokeError::Unhandled { cause: TIMER_LABEL });
    }

    finish(service)
}

/// Reset manager smoketest: a normal power-up records exactly the POR
/// cause.
pub fn rstmgr_smoketest(config: &Config) -> Result<(), SmokeError> {
    let chip = Chip::new(config);
    let info = chip.rstmgr.reset_info();
    if info & !RESET_INFO_POR != 0 || info & RESET_INFO_POR == 0 {
        return Err(SmokeError::Check(format!(
            "reset info {info:#x} is not a bare power-on reset"
        )));
    }
    Ok(())
}
