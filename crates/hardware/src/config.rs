//! Harness configuration.
//!
//! All tunables of the smoketest harness in one serde-deserializable
//! structure: clock frequencies of the modeled chip, the bounded wait
//! applied after each forced cause, and the secondary-test parameters.
//! `Config::default()` is the baseline; the CLI can override it from a
//! JSON file.

use std::time::Duration;

use serde::Deserialize;

/// Default configuration constants.
mod defaults {
    /// Bounded wait after forcing a cause before the observation flag is
    /// asserted (one fixed sleep, no retry). Sized for OS scheduler
    /// latency of the service thread, not for hardware timing.
    pub const IRQ_WAIT_MICROS: u64 = 10_000;

    /// Idle sleep of the service thread between line polls.
    pub const SERVICE_POLL_MICROS: u64 = 20;

    /// Peripheral clock feeding the UART baud generator and the platform
    /// timer (24 MHz).
    pub const PERIPHERAL_CLK_HZ: u64 = 24_000_000;

    /// UART line rate used by the smoketests.
    pub const BAUD_RATE: u32 = 115_200;

    /// Always-on clock (200 kHz).
    pub const AON_CLK_HZ: u64 = 200_000;

    /// Settle time after starting a one-cycle always-on counter, chosen
    /// well past one AON clock period.
    pub const AON_SETTLE_MICROS: u64 = 1_000;

    /// Wakeup/watchdog repetitions in the always-on timer smoketest.
    pub const AON_ROUNDS: u32 = 40;

    /// Platform timer tick rate requested by the timer smoketest (1 MHz).
    pub const RV_TIMER_TICK_HZ: u64 = 1_000_000;

    /// Comparator deadline, in ticks past the current counter value.
    pub const RV_TIMER_DEADLINE_TICKS: u64 = 100;
}

/// Harness configuration. Every field has a default; JSON input may
/// override any subset.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Bounded post-force wait, in microseconds.
    pub irq_wait_micros: u64,
    /// Service-thread idle poll interval, in microseconds.
    pub service_poll_micros: u64,
    /// Peripheral clock in Hz.
    pub peripheral_clk_hz: u64,
    /// UART baud rate.
    pub baud_rate: u32,
    /// Always-on clock in Hz.
    pub aon_clk_hz: u64,
    /// Always-on counter settle time, in microseconds.
    pub aon_settle_micros: u64,
    /// Always-on smoketest repetitions.
    pub aon_rounds: u32,
    /// Platform timer tick rate in Hz.
    pub rv_timer_tick_hz: u64,
    /// Platform timer comparator deadline in ticks.
    pub rv_timer_deadline_ticks: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            irq_wait_micros: defaults::IRQ_WAIT_MICROS,
            service_poll_micros: defaults::SERVICE_POLL_MICROS,
            peripheral_clk_hz: defaults::PERIPHERAL_CLK_HZ,
            baud_rate: defaults::BAUD_RATE,
            aon_clk_hz: defaults::AON_CLK_HZ,
            aon_settle_micros: defaults::AON_SETTLE_MICROS,
            aon_rounds: defaults::AON_ROUNDS,
            rv_timer_tick_hz: defaults::RV_TIMER_TICK_HZ,
            rv_timer_deadline_ticks: defaults::RV_TIMER_DEADLINE_TICKS,
        }
    }
}

impl Config {
    /// The bounded post-force wait as a [`Duration`].
    pub fn irq_wait(&self) -> Duration {
        Duration::from_micros(self.irq_wait_micros)
    }

    /// The service-thread idle poll interval as a [`Duration`].
    pub fn service_poll(&self) -> Duration {
        Duration::from_micros(self.service_poll_micros)
    }

    /// The always-on settle time as a [`Duration`].
    pub fn aon_settle(&self) -> Duration {
        Duration::from_micros(self.aon_settle_micros)
    }
}
