//! Host-side simulation scaffolding.
//!
//! [`host`] owns the interrupt context: a service thread that watches the
//! controller's external line and the platform timer line. [`orchestrator`]
//! owns the main context: the smoketest suites that drive stimulus and
//! check observations.

pub mod host;
pub mod orchestrator;

pub use host::{Host, LineHandler, ServiceThread};
pub use orchestrator::{run_all, run_filtered, SuiteResult, TestReport, SUITES};
