//! Capability seam for interrupt-raising peripherals.
//!
//! Every interrupt source exposes the same four operations over its own
//! cause type: enable, acknowledge, force, and read-pending. The dispatch
//! router and the harness consume sources only through this seam; register
//! maps and byte paths stay private to each device.

use crate::common::error::DeviceError;

/// A peripheral that owns independently enable/acknowledge/force-able
/// interrupt causes.
pub trait IrqSource {
    /// The peripheral's cause type (one value names exactly one condition).
    type Cause: Copy;

    /// Enables or disables delivery of `cause` to the interrupt controller.
    fn set_irq_enabled(&mut self, cause: Self::Cause, enabled: bool) -> Result<(), DeviceError>;

    /// Clears the pending bit for `cause`. Must not disturb any other cause.
    fn irq_acknowledge(&mut self, cause: Self::Cause) -> Result<(), DeviceError>;

    /// Latches the pending bit for `cause` as if the hardware condition had
    /// occurred.
    fn irq_force(&mut self, cause: Self::Cause) -> Result<(), DeviceError>;

    /// Reads the pending bit for `cause`.
    fn irq_is_pending(&self, cause: Self::Cause) -> Result<bool, DeviceError>;

    /// Whether the cause is currently presented to the controller
    /// (pending and enabled).
    fn irq_line(&self, cause: Self::Cause) -> Result<bool, DeviceError> {
        Ok(self.irq_is_pending(cause)? && self.irq_enabled(cause)?)
    }

    /// Reads the enable bit for `cause`.
    fn irq_enabled(&self, cause: Self::Cause) -> Result<bool, DeviceError>;
}
