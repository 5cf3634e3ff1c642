//! Clock manager: gateable and hintable clock controls.
//!
//! Gateable clocks are switched directly by software. Hintable clocks take
//! a hint: the clock stays enabled while its consuming unit is busy, and
//! follows the hint once the unit goes idle.

use crate::common::error::DeviceError;

/// Clocks directly gated by software.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateableClock {
    /// Divided-by-four peripheral I/O clock.
    IoDiv4Peri,
    /// USB peripheral clock.
    UsbPeri,
}

impl GateableClock {
    /// Every gateable clock.
    pub const ALL: [Self; 2] = [Self::IoDiv4Peri, Self::UsbPeri];

    fn index(self) -> usize {
        match self {
            Self::IoDiv4Peri => 0,
            Self::UsbPeri => 1,
        }
    }
}

/// Clocks controlled indirectly through a hint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HintableClock {
    /// HMAC unit clock.
    MainHmac,
    /// KMAC unit clock.
    MainKmac,
}

impl HintableClock {
    /// Every hintable clock.
    pub const ALL: [Self; 2] = [Self::MainHmac, Self::MainKmac];

    fn index(self) -> usize {
        match self {
            Self::MainHmac => 0,
            Self::MainKmac => 1,
        }
    }
}

/// Clock manager state.
#[derive(Debug)]
pub struct Clkmgr {
    gate_enabled: [bool; 2],
    hints: [bool; 2],
    unit_busy: [bool; 2],
}

impl Default for Clkmgr {
    fn default() -> Self {
        Self {
            gate_enabled: [true; 2],
            hints: [true; 2],
            unit_busy: [false; 2],
        }
    }
}

impl Clkmgr {
    /// Creates a clock manager in its power-up state (everything enabled,
    /// no unit busy).
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads whether a gateable clock is enabled.
    pub fn gateable_get_enabled(&self, clock: GateableClock) -> Result<bool, DeviceError> {
        Ok(self.gate_enabled[clock.index()])
    }

    /// Switches a gateable clock.
    pub fn gateable_set_enabled(
        &mut self,
        clock: GateableClock,
        enabled: bool,
    ) -> Result<(), DeviceError> {
        self.gate_enabled[clock.index()] = enabled;
        Ok(())
    }

    /// Reads the hint programmed for a hintable clock.
    pub fn hintable_get_hint(&self, clock: HintableClock) -> Result<bool, DeviceError> {
        Ok(self.hints[clock.index()])
    }

    /// Programs the hint for a hintable clock.
    pub fn hintable_set_hint(
        &mut self,
        clock: HintableClock,
        enabled: bool,
    ) -> Result<(), DeviceError> {
        self.hints[clock.index()] = enabled;
        Ok(())
    }

    /// Reads whether a hintable clock is actually running. An enabled hint
    /// always implies an enabled clock; a busy unit keeps its clock running
    /// regardless of the hint.
    pub fn hintable_get_enabled(&self, clock: HintableClock) -> Result<bool, DeviceError> {
        let idx = clock.index();
        Ok(self.hints[idx] || self.unit_busy[idx])
    }

    /// Marks the unit behind a hintable clock busy or idle.
    pub fn set_unit_busy(&mut self, clock: HintableClock, busy: bool) {
        self.unit_busy[clock.index()] = busy;
    }
}
