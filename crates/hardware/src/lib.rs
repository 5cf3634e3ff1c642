//! SoC interrupt-fabric smoketest library.
//!
//! This crate implements a host-side model of an SoC interrupt fabric and a
//! smoketest harness over it, with the following:
//! 1. **Common:** Error taxonomy (device status codes, protocol violations,
//!    suite outcomes).
//! 2. **Dispatch:** The static cause table, per-cause observation flags, and
//!    the claim/route/acknowledge/complete router.
//! 3. **SoC:** The chip aggregate and its device models (PLIC, GPIO, UART,
//!    AON timer, platform timer, clock manager, reset manager).
//! 4. **Sim:** The service-thread host and the smoketest orchestrator.

/// Common types (errors and status codes).
pub mod common;
/// Harness configuration (timing, clock rates, round counts).
pub mod config;
/// Cause table, observation flags, and the dispatch router.
pub mod dispatch;
/// Service-thread host and smoketest suites.
pub mod sim;
/// System-on-chip aggregate and device models.
pub mod soc;

/// Root configuration type; use `Config::default()` or deserialize from JSON.
pub use crate::config::Config;
/// Device status codes surfaced by every device operation.
pub use crate::common::error::{DeviceError, ProtocolViolation, SmokeError};
/// Observation flags shared between the two contexts.
pub use crate::dispatch::flags::ObservationFlags;
/// The claim/route/acknowledge/complete state machine.
pub use crate::dispatch::router::Router;
/// The chip aggregate; construct with `Chip::new` and share via `SharedChip`.
pub use crate::soc::{Chip, SharedChip};
/// Interrupt-context host; construct, register handlers, then `spawn`.
pub use crate::sim::host::{Host, ServiceThread};
/// Suite runner and its report.
pub use crate::sim::orchestrator::{run_all, run_filtered, TestReport, SUITES};
