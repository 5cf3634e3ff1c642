//! Always-on timer: one-shot wakeup and watchdog counters.
//!
//! Both counters run off the slow always-on clock and are modeled against
//! the host clock: starting a counter computes a deadline, and a pending
//! read latches once the deadline has passed while the counter is running.
//! Acknowledge clears the latch; a stopped counter never re-latches.

use std::time::{Duration, Instant};

use crate::common::error::DeviceError;

/// Nominal always-on clock frequency (200 kHz).
pub const AON_CLOCK_HZ: u64 = 200_000;

/// Always-on timer interrupt causes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AonIrq {
    /// The wakeup counter crossed its threshold.
    WakeupThreshold,
    /// The watchdog counter crossed its bark threshold.
    WatchdogBark,
}

impl AonIrq {
    fn index(self) -> usize {
        match self {
            Self::WakeupThreshold => 0,
            Self::WatchdogBark => 1,
        }
    }
}

/// Always-on timer state.
#[derive(Debug)]
pub struct AonTimer {
    clk_hz: u64,
    deadlines: [Option<Instant>; 2],
    latched: [bool; 2],
}

impl AonTimer {
    /// Creates a stopped timer driven by a clock of `clk_hz`.
    pub fn new(clk_hz: u64) -> Self {
        Self {
            clk_hz: if clk_hz == 0 { AON_CLOCK_HZ } else { clk_hz },
            deadlines: [None; 2],
            latched: [false; 2],
        }
    }

    fn ticks_to_duration(&self, ticks: u64, prescaler: u32) -> Duration {
        let cycles = ticks.saturating_mul(u64::from(prescaler) + 1);
        Duration::from_nanos(cycles.saturating_mul(1_000_000_000) / self.clk_hz)
    }

    /// Starts the wakeup counter toward `threshold` ticks (prescaled).
    pub fn wakeup_start(&mut self, threshold: u64, prescaler: u32) -> Result<(), DeviceError> {
        if threshold == 0 {
            return Err(DeviceError::BadArg);
        }
        let idx = AonIrq::WakeupThreshold.index();
        self.deadlines[idx] = Some(Instant::now() + self.ticks_to_duration(threshold, prescaler));
        Ok(())
    }

    /// Stops the wakeup counter.
    pub fn wakeup_stop(&mut self) {
        self.poll();
        self.deadlines[AonIrq::WakeupThreshold.index()] = None;
    }

    /// Starts the watchdog; the bark cause latches at `bark_threshold`.
    /// The bite threshold must not precede the bark.
    pub fn watchdog_start(
        &mut self,
        bark_threshold: u64,
        bite_threshold: u64,
    ) -> Result<(), DeviceError> {
        if bark_threshold == 0 || bark_threshold > bite_threshold {
            return Err(DeviceError::BadArg);
        }
        let idx = AonIrq::WatchdogBark.index();
        self.deadlines[idx] = Some(Instant::now() + self.ticks_to_duration(bark_threshold, 0));
        Ok(())
    }

    /// Stops the watchdog.
    pub fn watchdog_stop(&mut self) {
        self.poll();
        self.deadlines[AonIrq::WatchdogBark.index()] = None;
    }

    /// Latches any deadline that has elapsed while its counter runs.
    fn poll(&mut self) {
        let now = Instant::now();
        for idx in 0..self.deadlines.len() {
            if self.deadlines[idx].is_some_and(|d| now >= d) {
                self.latched[idx] = true;
            }
        }
    }

    /// Reads (and latches) the pending state of a cause.
    pub fn irq_is_pending(&mut self, cause: AonIrq) -> bool {
        self.poll();
        self.latched[cause.index()]
    }

    /// Clears the pending latch for a cause. A running counter past its
    /// deadline re-latches on the next read.
    pub fn irq_acknowledge(&mut self, cause: AonIrq) {
        self.poll();
        self.latched[cause.index()] = false;
    }
}
