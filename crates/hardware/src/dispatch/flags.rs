//! Per-cause observation flags shared across execution contexts.
//!
//! One flag per dispatch-table cause, written by the interrupt context when
//! a cause is serviced and read by the polling context to decide pass/fail.
//! The flags stand in for the firmware's `volatile bool` block: each is an
//! atomic accessed only through these operations, with release stores and
//! acquire loads so a flag observed `true` implies the handler's writes
//! before it are visible.

use std::sync::atomic::{AtomicBool, Ordering};

use crate::dispatch::table::{CauseId, NUM_CAUSES};

/// Observation flags indexed by cause id.
#[derive(Debug, Default)]
pub struct ObservationFlags {
    slots: [AtomicBool; NUM_CAUSES],
}

impl ObservationFlags {
    /// Creates a flag set with every slot clear.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads the flag for `id` (acquire).
    pub fn get(&self, id: CauseId) -> bool {
        self.slots[id.0 as usize].load(Ordering::Acquire)
    }

    /// Sets the flag for `id` (release).
    pub fn set(&self, id: CauseId) {
        self.slots[id.0 as usize].store(true, Ordering::Release);
    }

    /// Clears the flag for `id` ahead of a forced-cause round.
    pub fn reset(&self, id: CauseId) {
        self.slots[id.0 as usize].store(false, Ordering::Release);
    }

    /// Returns every cause id whose flag is currently set.
    pub fn set_ids(&self) -> Vec<CauseId> {
        (0..NUM_CAUSES as u32)
            .map(CauseId)
            .filter(|id| self.get(*id))
            .collect()
    }
}
