//! Reset manager: the sticky reset-cause bitfield.

/// Power-on reset.
pub const RESET_INFO_POR: u32 = 1 << 0;
/// Wakeup from a low-power state.
pub const RESET_INFO_LOW_POWER_EXIT: u32 = 1 << 1;
/// Software-requested reset.
pub const RESET_INFO_SW_REQUEST: u32 = 1 << 2;
/// Watchdog bite.
pub const RESET_INFO_WATCHDOG: u32 = 1 << 3;

/// Reset manager state.
#[derive(Debug)]
pub struct Rstmgr {
    reset_info: u32,
}

impl Default for Rstmgr {
    fn default() -> Self {
        // A fresh power-up records exactly the POR cause.
        Self {
            reset_info: RESET_INFO_POR,
        }
    }
}

impl Rstmgr {
    /// Creates a reset manager in its power-up state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads the sticky reset-cause bitfield.
    pub fn reset_info(&self) -> u32 {
        self.reset_info
    }

    /// Records an additional reset cause.
    pub fn record(&mut self, cause: u32) {
        self.reset_info |= cause;
    }

    /// Clears the bitfield.
    pub fn reset_info_clear(&mut self) {
        self.reset_info = 0;
    }
}
