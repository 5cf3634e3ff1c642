//! Device model unit tests.


/// Clock manager gating and hinting.
pub mod clkmgr;

/// GPIO edge latching and cause bookkeeping.
pub mod gpio;

/// Reset manager cause bitfield.
pub mod rstmgr;


/// UART configuration, FIFOs, and interrupt conditions.
pub mod uart;
