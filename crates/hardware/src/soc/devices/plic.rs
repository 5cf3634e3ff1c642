//! Platform-level interrupt controller.
//!
//! Owns the global routing state: per-cause trigger kind and priority,
//! per-target enable bitmap and priority threshold, and the outstanding
//! claim per target. It multiplexes every wired cause onto one external
//! line per target and arbitrates with `claim`/`complete`.
//!
//! The contract the dispatch router relies on:
//! * `claim` is non-blocking and never returns a disabled or
//!   at-or-under-threshold cause; with nothing qualified it returns `None`.
//! * `claim` clears the controller-side pending bit and opens the
//!   in-service window; `complete` with anything but the outstanding id is
//!   an invalid state.

use crate::common::error::DeviceError;
use crate::dispatch::table::{CauseId, LAST_IRQ_ID, NUM_CAUSES};

/// Highest programmable cause priority.
pub const MAX_PRIORITY: u8 = 3;
/// Lowest priority / threshold value; a threshold of this value lets every
/// nonzero-priority cause through.
pub const MIN_PRIORITY: u8 = 0;
/// Number of interrupt targets served by the controller.
pub const NUM_TARGETS: usize = 1;

/// An interrupt target (a CPU-like consumer of the external line).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Target(pub u32);

/// The single hart target of this chip.
pub const TARGET_HART0: Target = Target(0);

/// Trigger sensitivity configured per cause.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerKind {
    /// Latch on a low-to-high transition of the source line.
    EdgeRising,
    /// Latch on a high-to-low transition of the source line.
    EdgeFalling,
    /// Pending while the source line is high.
    Level,
}

/// Controller routing state.
#[derive(Debug)]
pub struct Plic {
    priorities: [u8; NUM_CAUSES],
    triggers: [TriggerKind; NUM_CAUSES],
    pending: u32,
    enables: [u32; NUM_TARGETS],
    thresholds: [u8; NUM_TARGETS],
    outstanding: [Option<CauseId>; NUM_TARGETS],
}

impl Default for Plic {
    fn default() -> Self {
        Self {
            priorities: [MIN_PRIORITY; NUM_CAUSES],
            triggers: [TriggerKind::Level; NUM_CAUSES],
            pending: 0,
            enables: [0; NUM_TARGETS],
            thresholds: [MIN_PRIORITY; NUM_TARGETS],
            outstanding: [None; NUM_TARGETS],
        }
    }
}

impl Plic {
    /// Creates a controller with every cause at minimum priority, disabled,
    /// and nothing pending.
    pub fn new() -> Self {
        Self::default()
    }

    fn check_id(id: CauseId) -> Result<(), DeviceError> {
        if id.0 == 0 || id.0 > LAST_IRQ_ID {
            Err(DeviceError::BadArg)
        } else {
            Ok(())
        }
    }

    fn target_index(target: Target) -> Result<usize, DeviceError> {
        let idx = target.0 as usize;
        if idx < NUM_TARGETS {
            Ok(idx)
        } else {
            Err(DeviceError::BadArg)
        }
    }

    /// Sets the trigger kind for a cause.
    pub fn set_trigger(&mut self, id: CauseId, kind: TriggerKind) -> Result<(), DeviceError> {
        Self::check_id(id)?;
        self.triggers[id.0 as usize] = kind;
        Ok(())
    }

    /// Reads the trigger kind configured for a cause.
    pub fn trigger(&self, id: CauseId) -> Result<TriggerKind, DeviceError> {
        Self::check_id(id)?;
        Ok(self.triggers[id.0 as usize])
    }

    /// Sets a cause priority, `MIN_PRIORITY..=MAX_PRIORITY`.
    pub fn set_priority(&mut self, id: CauseId, priority: u8) -> Result<(), DeviceError> {
        Self::check_id(id)?;
        if priority > MAX_PRIORITY {
            return Err(DeviceError::BadArg);
        }
        self.priorities[id.0 as usize] = priority;
        Ok(())
    }

    /// Sets a target's priority threshold. Only causes with priority
    /// strictly above the threshold are delivered.
    pub fn set_threshold(&mut self, target: Target, priority: u8) -> Result<(), DeviceError> {
        let idx = Self::target_index(target)?;
        if priority > MAX_PRIORITY {
            return Err(DeviceError::BadArg);
        }
        self.thresholds[idx] = priority;
        Ok(())
    }

    /// Enables or disables delivery of a cause to a target.
    pub fn set_enabled(
        &mut self,
        id: CauseId,
        target: Target,
        enabled: bool,
    ) -> Result<(), DeviceError> {
        Self::check_id(id)?;
        let idx = Self::target_index(target)?;
        if enabled {
            self.enables[idx] |= 1 << id.0;
        } else {
            self.enables[idx] &= !(1 << id.0);
        }
        Ok(())
    }

    /// Latches the controller-side pending bit for a cause. Driven by the
    /// chip when a peripheral presents the cause.
    pub fn raise(&mut self, id: CauseId) -> Result<(), DeviceError> {
        Self::check_id(id)?;
        self.pending |= 1 << id.0;
        Ok(())
    }

    /// Reads the controller-side pending bit for a cause.
    pub fn is_raised(&self, id: CauseId) -> Result<bool, DeviceError> {
        Self::check_id(id)?;
        Ok(self.pending & (1 << id.0) != 0)
    }

    /// Whether any pending, enabled, above-threshold cause asserts the
    /// target's external line.
    pub fn line_asserted(&self, target: Target) -> bool {
        let Ok(idx) = Self::target_index(target) else {
            return false;
        };
        self.best_qualified(idx).is_some()
    }

    /// Highest-priority pending, enabled, strictly-above-threshold cause
    /// for the target context; ties broken by lowest id.
    fn best_qualified(&self, idx: usize) -> Option<CauseId> {
        let threshold = self.thresholds[idx];
        let active = self.pending & self.enables[idx];
        let mut best: Option<(u8, CauseId)> = None;
        for bit in 1..=LAST_IRQ_ID {
            if active & (1 << bit) == 0 {
                continue;
            }
            let prio = self.priorities[bit as usize];
            if prio <= threshold {
                continue;
            }
            if best.is_none_or(|(p, _)| prio > p) {
                best = Some((prio, CauseId(bit)));
            }
        }
        best.map(|(_, id)| id)
    }

    /// Claims the highest-priority qualified cause for `target`, clearing
    /// its pending bit and opening the in-service window. Returns `None`
    /// when nothing qualifies. Safe to call from the interrupt context.
    ///
    /// Claiming while a claim is outstanding is undefined by the hardware
    /// contract; the model rejects it.
    pub fn claim(&mut self, target: Target) -> Result<Option<CauseId>, DeviceError> {
        let idx = Self::target_index(target)?;
        if self.outstanding[idx].is_some() {
            return Err(DeviceError::InvalidState);
        }
        let Some(id) = self.best_qualified(idx) else {
            return Ok(None);
        };
        self.pending &= !(1 << id.0);
        self.outstanding[idx] = Some(id);
        tracing::trace!(target = target.0, %id, "claimed");
        Ok(Some(id))
    }

    /// Completes the in-service window. `id` must match the outstanding
    /// claim on `target`.
    pub fn complete(&mut self, target: Target, id: CauseId) -> Result<(), DeviceError> {
        Self::check_id(id)?;
        let idx = Self::target_index(target)?;
        if self.outstanding[idx] != Some(id) {
            return Err(DeviceError::InvalidState);
        }
        self.outstanding[idx] = None;
        tracing::trace!(target = target.0, %id, "completed");
        Ok(())
    }

    /// The cause currently in service on `target`, if any.
    pub fn outstanding_claim(&self, target: Target) -> Option<CauseId> {
        Self::target_index(target)
            .ok()
            .and_then(|idx| self.outstanding[idx])
    }
}
