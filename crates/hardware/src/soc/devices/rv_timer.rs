//! RISC-V platform timer: a prescaled up-counter with one comparator.
//!
//! The counter advances at a tick rate derived from the peripheral clock by
//! [`approximate_tick_params`], modeled against the host clock while
//! enabled. The comparator latches its interrupt when the counter reaches
//! the armed value; the latch feeds the CPU timer line when the interrupt
//! is enabled.

use std::time::Instant;

use crate::common::error::DeviceError;

/// Prescale and step values that approximate a requested tick frequency.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickParams {
    /// Clock divider: the counter ticks every `prescale + 1` clock cycles.
    pub prescale: u32,
    /// Increment applied per tick.
    pub tick_step: u8,
}

/// Derives tick parameters for `tick_hz` from a `clock_hz` input clock.
pub fn approximate_tick_params(clock_hz: u64, tick_hz: u64) -> Result<TickParams, DeviceError> {
    if clock_hz == 0 || tick_hz == 0 || tick_hz > clock_hz {
        return Err(DeviceError::BadArg);
    }
    let prescale = clock_hz / tick_hz - 1;
    if prescale > u64::from(u32::MAX) {
        return Err(DeviceError::BadArg);
    }
    Ok(TickParams {
        prescale: prescale as u32,
        tick_step: 1,
    })
}

/// Platform timer state for one hart, one comparator.
#[derive(Debug)]
pub struct RvTimer {
    clock_hz: u64,
    params: Option<TickParams>,
    running_since: Option<Instant>,
    accumulated_ticks: u64,
    cmp: u64,
    irq_enabled: bool,
    irq_latched: bool,
}

impl RvTimer {
    /// Creates a stopped timer fed by a `clock_hz` peripheral clock.
    pub fn new(clock_hz: u64) -> Self {
        Self {
            clock_hz,
            params: None,
            running_since: None,
            accumulated_ticks: 0,
            cmp: u64::MAX,
            irq_enabled: false,
            irq_latched: false,
        }
    }

    /// Applies tick parameters. Rejected while the counter runs.
    pub fn set_tick_params(&mut self, params: TickParams) -> Result<(), DeviceError> {
        if self.running_since.is_some() {
            return Err(DeviceError::InvalidState);
        }
        if params.tick_step == 0 {
            return Err(DeviceError::BadArg);
        }
        self.params = Some(params);
        Ok(())
    }

    fn tick_hz(&self) -> Option<u64> {
        let params = self.params?;
        let hz = self.clock_hz / (u64::from(params.prescale) + 1);
        Some(hz * u64::from(params.tick_step))
    }

    /// Reads the current counter value in ticks.
    pub fn counter_read(&self) -> Result<u64, DeviceError> {
        let hz = self.tick_hz().ok_or(DeviceError::InvalidState)?;
        let live = self
            .running_since
            .map_or(0, |since| since.elapsed().as_nanos() as u64 * hz / 1_000_000_000);
        Ok(self.accumulated_ticks + live)
    }

    /// Arms the comparator at `threshold` ticks and clears any stale latch.
    pub fn arm(&mut self, threshold: u64) -> Result<(), DeviceError> {
        if self.params.is_none() {
            return Err(DeviceError::InvalidState);
        }
        self.cmp = threshold;
        self.irq_latched = false;
        Ok(())
    }

    /// Starts or stops the counter. Stopping folds the elapsed ticks into
    /// the held counter value.
    pub fn counter_set_enabled(&mut self, enabled: bool) -> Result<(), DeviceError> {
        if self.params.is_none() {
            return Err(DeviceError::InvalidState);
        }
        if enabled && self.running_since.is_none() {
            self.running_since = Some(Instant::now());
        } else if !enabled {
            if self.running_since.is_some() {
                self.accumulated_ticks = self.counter_read()?;
                self.running_since = None;
            }
        }
        Ok(())
    }

    /// Enables or disables the comparator interrupt output.
    pub fn irq_enable(&mut self, enabled: bool) {
        self.irq_enabled = enabled;
    }

    /// Latches the comparator interrupt if the running counter has reached
    /// the armed value. Called by the host between dispatches.
    pub fn poll(&mut self) {
        if self.running_since.is_some() {
            if let Ok(counter) = self.counter_read() {
                if counter >= self.cmp {
                    self.irq_latched = true;
                }
            }
        }
    }

    /// Reads the comparator interrupt latch.
    pub fn irq_get(&self) -> bool {
        self.irq_latched
    }

    /// Clears the comparator interrupt latch.
    pub fn irq_clear(&mut self) {
        self.irq_latched = false;
    }

    /// Whether the timer line to the CPU is asserted.
    pub fn line_asserted(&self) -> bool {
        self.irq_enabled && self.irq_latched
    }
}
