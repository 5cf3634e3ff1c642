//! Device models of the chip under test: the interrupt controller, the two
//! interrupt-source peripheral variants (edge-pin GPIO, cause-coded UART),
//! and the secondary smoketest peripherals.

/// Always-on timer (wakeup and watchdog one-shots).
pub mod aon_timer;
/// Clock manager (gateable/hintable clocks).
pub mod clkmgr;
/// GPIO block (edge-pin interrupt source).
pub mod gpio;
/// Platform-level interrupt controller.
pub mod plic;
/// Reset manager (reset-cause bitfield).
pub mod rstmgr;
/// Platform timer (prescaled counter with comparator).
pub mod rv_timer;
/// UART (cause-coded interrupt source, FIFO byte path).
pub mod uart;

pub use aon_timer::AonTimer;
pub use clkmgr::Clkmgr;
pub use gpio::Gpio;
pub use plic::Plic;
pub use rstmgr::Rstmgr;
pub use rv_timer::RvTimer;
pub use uart::Uart;

pub use crate::soc::traits::IrqSource;
