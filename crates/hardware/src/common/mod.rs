//! Common types shared across the chip model and the harness.

/// Error taxonomy: device status codes, protocol violations, suite failures.
pub mod error;

pub use error::{DeviceError, ProtocolViolation, SmokeError};
