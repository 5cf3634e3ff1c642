//! Interrupt dispatch: cause identities, the id → peripheral table, shared
//! observation flags, and the external-line router.

/// Cross-context observation flags with acquire/release semantics.
pub mod flags;
/// The claim → route → acknowledge → complete state machine.
pub mod router;
/// Cause ids, peripheral identities, and the static dispatch table.
pub mod table;

pub use flags::ObservationFlags;
pub use router::Router;
pub use table::{CauseId, Peripheral};
