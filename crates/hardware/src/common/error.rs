//! Error definitions for the chip model and the smoketest harness.
//!
//! Three layers, from innermost to outermost:
//! 1. **Device status:** every controller/peripheral operation returns a
//!    [`DeviceError`]-bearing `Result`, mirroring per-device status codes.
//! 2. **Protocol violations:** a [`ProtocolViolation`] means the
//!    claim/route/acknowledge/complete cycle itself broke: a hardware or
//!    configuration mismatch, never a transient condition.
//! 3. **Suite failures:** a [`SmokeError`] is the final, fatal outcome of a
//!    smoketest. There is no retry path; correctness is binary per run.

use thiserror::Error;

use crate::dispatch::table::{CauseId, Peripheral};

/// Status code returned by controller and peripheral operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DeviceError {
    /// An argument is outside the device's accepted range (unknown cause,
    /// out-of-range priority, invalid target).
    #[error("invalid argument")]
    BadArg,

    /// The operation is not legal in the device's current state (completing
    /// a claim that is not outstanding, receiving from an empty FIFO).
    #[error("invalid peripheral state")]
    InvalidState,
}

/// A breakage of the claim → route → acknowledge → complete contract.
///
/// All variants are fatal: they indicate a misconfigured or misbehaving
/// interrupt fabric, and the harness defines no recovery from them.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProtocolViolation {
    /// The external line was asserted but `claim` returned nothing.
    #[error("external interrupt asserted with nothing claimable")]
    SpuriousClaim,

    /// A claimed cause id has no entry in the dispatch table.
    #[error("claimed cause {0} is not in the dispatch table")]
    UnmappedCause(CauseId),

    /// The dispatch table routed the claimed id to a peripheral other than
    /// the one this build services.
    #[error("claimed cause {id} belongs to {found}, expected {expected}")]
    WrongPeripheral {
        /// The claimed cause id.
        id: CauseId,
        /// The peripheral this router was built to service.
        expected: Peripheral,
        /// The peripheral the table actually maps `id` to.
        found: Peripheral,
    },

    /// A cause's observation flag was already set when the handler ran.
    /// The cause fired more than once without a new forced event.
    #[error("`{label}` IRQ asserted more than once")]
    DoubleObservation {
        /// Diagnostic label of the offending cause.
        label: &'static str,
    },

    /// `complete` was called with an id that does not match the outstanding
    /// claim on that target.
    #[error("complete({id}) does not match the outstanding claim")]
    StaleComplete {
        /// The id passed to `complete`.
        id: CauseId,
    },

    /// An interrupt line was asserted with no handler registered for it.
    #[error("{line} interrupt asserted with no handler registered")]
    UnhandledLine {
        /// Name of the offending line.
        line: &'static str,
    },

    /// A device operation failed in the middle of a dispatch cycle.
    #[error("{op} failed during dispatch: {source}")]
    Device {
        /// The operation that failed.
        op: &'static str,
        /// The device's status code.
        #[source]
        source: DeviceError,
    },
}

/// Fatal outcome of a smoketest suite.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SmokeError {
    /// A configuration call was rejected before the test proper began.
    #[error("configuration failed: {op}: {source}")]
    Config {
        /// The configuration operation that failed.
        op: &'static str,
        /// The device's status code.
        #[source]
        source: DeviceError,
    },

    /// The dispatch cycle broke while servicing a forced cause.
    #[error(transparent)]
    Protocol(#[from] ProtocolViolation),

    /// A forced cause was not observed within the bounded wait.
    #[error("`{cause}` IRQ has not been handled")]
    Unhandled {
        /// Diagnostic label of the unobserved cause.
        cause: &'static str,
    },

    /// A cause was observed that was never forced in this round.
    #[error("`{cause}` IRQ observed without being forced")]
    Unexpected {
        /// Diagnostic label of the stray cause.
        cause: &'static str,
    },

    /// A non-interrupt property check failed (clock gating round-trip,
    /// loopback data comparison, timer pending state).
    #[error("check failed: {0}")]
    Check(String),
}

impl SmokeError {
    /// Builds a [`SmokeError::Config`] from a device status, for use with
    /// `map_err` at configuration call sites.
    pub fn config(op: &'static str) -> impl FnOnce(DeviceError) -> Self {
        move |source| Self::Config { op, source }
    }
}
