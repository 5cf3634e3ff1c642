//! General-purpose I/O block: the edge-pin interrupt source.
//!
//! Each pin owns two independent causes, one per edge direction. Pending
//! bits latch on an input transition (or on `irq_force`) and clear only on
//! an acknowledge of that specific edge; acknowledging one edge of a pin
//! never disturbs the other.

use crate::common::error::DeviceError;
use crate::soc::traits::IrqSource;

/// Number of pins in the block.
pub const GPIO_PINS: u8 = 8;

/// Edge direction of a pin cause.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    /// Low-to-high input transition.
    Rising,
    /// High-to-low input transition.
    Falling,
}

/// A single GPIO interrupt cause: one pin, one edge direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GpioIrq {
    /// Pin index, `0..GPIO_PINS`.
    pub pin: u8,
    /// Edge direction the cause detects.
    pub edge: Edge,
}

/// GPIO block state. Bitmaps are indexed by pin.
#[derive(Debug, Default)]
pub struct Gpio {
    input: u8,
    pending_rising: u8,
    pending_falling: u8,
    enabled_rising: u8,
    enabled_falling: u8,
}

impl Gpio {
    /// Creates a GPIO block with all inputs low and all causes disabled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Drives a pin input and latches the matching edge cause on a
    /// transition.
    pub fn set_input(&mut self, pin: u8, level: bool) -> Result<(), DeviceError> {
        let bit = Self::pin_bit(pin)?;
        let was_high = self.input & bit != 0;
        if level && !was_high {
            self.pending_rising |= bit;
        }
        if !level && was_high {
            self.pending_falling |= bit;
        }
        if level {
            self.input |= bit;
        } else {
            self.input &= !bit;
        }
        Ok(())
    }

    /// Reads the current input level of a pin.
    pub fn read_input(&self, pin: u8) -> Result<bool, DeviceError> {
        Ok(self.input & Self::pin_bit(pin)? != 0)
    }

    fn pin_bit(pin: u8) -> Result<u8, DeviceError> {
        if pin < GPIO_PINS {
            Ok(1 << pin)
        } else {
            Err(DeviceError::BadArg)
        }
    }

    fn maps(&mut self, edge: Edge) -> (&mut u8, &mut u8) {
        match edge {
            Edge::Rising => (&mut self.pending_rising, &mut self.enabled_rising),
            Edge::Falling => (&mut self.pending_falling, &mut self.enabled_falling),
        }
    }
}

impl IrqSource for Gpio {
    type Cause = GpioIrq;

    fn set_irq_enabled(&mut self, cause: GpioIrq, enabled: bool) -> Result<(), DeviceError> {
        let bit = Self::pin_bit(cause.pin)?;
        let (_, enable_map) = self.maps(cause.edge);
        if enabled {
            *enable_map |= bit;
        } else {
            *enable_map &= !bit;
        }
        Ok(())
    }

    fn irq_acknowledge(&mut self, cause: GpioIrq) -> Result<(), DeviceError> {
        let bit = Self::pin_bit(cause.pin)?;
        let (pending_map, _) = self.maps(cause.edge);
        *pending_map &= !bit;
        Ok(())
    }

    fn irq_force(&mut self, cause: GpioIrq) -> Result<(), DeviceError> {
        let bit = Self::pin_bit(cause.pin)?;
        let (pending_map, _) = self.maps(cause.edge);
        *pending_map |= bit;
        Ok(())
    }

    fn irq_is_pending(&self, cause: GpioIrq) -> Result<bool, DeviceError> {
        let bit = Self::pin_bit(cause.pin)?;
        let map = match cause.edge {
            Edge::Rising => self.pending_rising,
            Edge::Falling => self.pending_falling,
        };
        Ok(map & bit != 0)
    }

    fn irq_enabled(&self, cause: GpioIrq) -> Result<bool, DeviceError> {
        let bit = Self::pin_bit(cause.pin)?;
        let map = match cause.edge {
            Edge::Rising => self.enabled_rising,
            Edge::Falling => self.enabled_falling,
        };
        Ok(map & bit != 0)
    }
}
