//! The external-line dispatch router.
//!
//! One invocation runs the full cycle:
//! `Idle → Claimed → Routed → Acknowledged → Completed → Idle`.
//! The router claims a cause id from the controller, resolves it through
//! the static dispatch table, runs the owning peripheral's handler (which
//! maps the id to one semantic cause, guards against double observation,
//! records the observation, and acknowledges at the peripheral), then
//! completes the claim. The cycle runs to completion under the chip lock;
//! any failed transition aborts the cycle as a fatal protocol violation.

use crate::common::error::ProtocolViolation;
use crate::dispatch::flags::ObservationFlags;
use crate::dispatch::table::{self, CauseId, Peripheral};
use crate::soc::devices::plic::Target;
use crate::soc::devices::IrqSource;
use crate::soc::{Chip, SharedChip};
use std::sync::Arc;

/// Routes claimed causes for one target to one expected peripheral.
pub struct Router {
    chip: SharedChip,
    flags: Arc<ObservationFlags>,
    target: Target,
    expected: Peripheral,
}

impl Router {
    /// Builds a router that services `target` and accepts only causes owned
    /// by `expected`.
    pub fn new(
        chip: SharedChip,
        flags: Arc<ObservationFlags>,
        target: Target,
        expected: Peripheral,
    ) -> Self {
        Self {
            chip,
            flags,
            target,
            expected,
        }
    }

    /// Services one assertion of the external line.
    pub fn service_external_irq(&self) -> Result<(), ProtocolViolation> {
        let mut chip = self.chip.lock();

        // Idle → Claimed. The line was asserted, so an empty claim means
        // the fabric raised an interrupt with nothing claimable.
        let id = chip
            .plic
            .claim(self.target)
            .map_err(|source| ProtocolViolation::Device {
                op: "plic claim",
                source,
            })?
            .ok_or(ProtocolViolation::SpuriousClaim)?;

        // Claimed → Routed.
        let peripheral = table::peripheral_for(id)?;
        if peripheral != self.expected {
            return Err(ProtocolViolation::WrongPeripheral {
                id,
                expected: self.expected,
                found: peripheral,
            });
        }

        // Routed → Acknowledged.
        match peripheral {
            Peripheral::Gpio => self.handle_gpio(&mut chip, id)?,
            Peripheral::Uart0 => self.handle_uart(&mut chip, id)?,
        }

        // Acknowledged → Completed.
        chip.plic
            .complete(self.target, id)
            .map_err(|_| ProtocolViolation::StaleComplete { id })?;

        tracing::debug!(%id, label = table::label_for(id), "serviced external irq");
        Ok(())
    }

    /// Records and acknowledges a claimed GPIO cause.
    fn handle_gpio(&self, chip: &mut Chip, id: CauseId) -> Result<(), ProtocolViolation> {
        let irq = table::gpio_irq_for(id)?;
        self.observe(id)?;
        chip.gpio
            .irq_acknowledge(irq)
            .map_err(|source| ProtocolViolation::Device {
                op: "gpio irq_acknowledge",
                source,
            })
    }

    /// Records and acknowledges a claimed UART cause.
    fn handle_uart(&self, chip: &mut Chip, id: CauseId) -> Result<(), ProtocolViolation> {
        let irq = table::uart_irq_for(id)?;
        self.observe(id)?;
        chip.uart0
            .irq_acknowledge(irq)
            .map_err(|source| ProtocolViolation::Device {
                op: "uart0 irq_acknowledge",
                source,
            })
    }

    /// Sets the observation flag for `id`, rejecting a repeat observation
    /// of a cause that was never re-forced.
    fn observe(&self, id: CauseId) -> Result<(), ProtocolViolation> {
        if self.flags.get(id) {
            return Err(ProtocolViolation::DoubleObservation {
                label: table::label_for(id),
            });
        }
        self.flags.set(id);
        Ok(())
    }
}

impl std::fmt::Debug for Router {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Router")
            .field("target", &self.target)
            .field("expected", &self.expected)
            .finish_non_exhaustive()
    }
}
