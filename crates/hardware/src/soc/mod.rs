//! The chip under test: device singletons and their interrupt wiring.
//!
//! [`Chip`] owns one instance of every device, constructed once at startup
//! and passed around by reference; there is no ambient global state.
//! [`SharedChip`] is the cross-context handle: a mutex-guarded `Arc` that
//! both the interrupt-service thread and the orchestrator lock per
//! operation. The dispatch router holds the lock across an entire
//! claim → complete cycle, so the polling context never observes a
//! partially dispatched cause.

/// Device models.
pub mod devices;
/// The interrupt-source capability seam.
pub mod traits;

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::common::error::DeviceError;
use crate::config::Config;
use crate::dispatch::table::{self, Peripheral, DISPATCH_TABLE};
use crate::soc::devices::gpio::GpioIrq;
use crate::soc::devices::uart::UartIrq;
use crate::soc::devices::{AonTimer, Clkmgr, Gpio, IrqSource, Plic, Rstmgr, RvTimer, Uart};

/// All device singletons of the modeled chip.
#[derive(Debug)]
pub struct Chip {
    /// Platform-level interrupt controller.
    pub plic: Plic,
    /// Edge-pin interrupt source.
    pub gpio: Gpio,
    /// Cause-coded interrupt source.
    pub uart0: Uart,
    /// Always-on timer.
    pub aon_timer: AonTimer,
    /// Platform timer.
    pub rv_timer: RvTimer,
    /// Clock manager.
    pub clkmgr: Clkmgr,
    /// Reset manager.
    pub rstmgr: Rstmgr,
}

impl Chip {
    /// Builds the chip in its power-up state.
    pub fn new(config: &Config) -> Self {
        Self {
            plic: Plic::new(),
            gpio: Gpio::new(),
            uart0: Uart::new(),
            aon_timer: AonTimer::new(config.aon_clk_hz),
            rv_timer: RvTimer::new(config.peripheral_clk_hz),
            clkmgr: Clkmgr::new(),
            rstmgr: Rstmgr::new(),
        }
    }

    /// Presents every pending-and-enabled wired cause to the controller.
    ///
    /// This is the interrupt wiring of the chip: peripherals do not talk to
    /// the controller themselves; the chip mirrors their asserted lines
    /// into controller pending bits after every source mutation.
    pub fn sync_irq_lines(&mut self) -> Result<(), DeviceError> {
        for entry in DISPATCH_TABLE {
            let asserted = match entry.peripheral {
                Peripheral::Gpio => {
                    let irq = table::gpio_irq_for(entry.id).map_err(|_| DeviceError::BadArg)?;
                    self.gpio.irq_line(irq)?
                }
                Peripheral::Uart0 => {
                    let irq = table::uart_irq_for(entry.id).map_err(|_| DeviceError::BadArg)?;
                    self.uart0.irq_line(irq)?
                }
            };
            if asserted {
                self.plic.raise(entry.id)?;
            }
        }
        Ok(())
    }

    /// Forces a GPIO cause and presents it to the controller.
    pub fn force_gpio(&mut self, irq: GpioIrq) -> Result<(), DeviceError> {
        self.gpio.irq_force(irq)?;
        self.sync_irq_lines()
    }

    /// Forces a UART cause and presents it to the controller.
    pub fn force_uart(&mut self, irq: UartIrq) -> Result<(), DeviceError> {
        self.uart0.irq_force(irq)?;
        self.sync_irq_lines()
    }

    /// Drives a GPIO input pin; a detected edge is presented to the
    /// controller like any other cause.
    pub fn set_gpio_input(&mut self, pin: u8, level: bool) -> Result<(), DeviceError> {
        self.gpio.set_input(pin, level)?;
        self.sync_irq_lines()
    }
}

/// Cross-context handle to the chip singletons.
#[derive(Debug, Clone)]
pub struct SharedChip(Arc<Mutex<Chip>>);

impl SharedChip {
    /// Wraps a freshly built chip.
    pub fn new(chip: Chip) -> Self {
        Self(Arc::new(Mutex::new(chip)))
    }

    /// Locks the chip for one or more device operations. Poisoning is
    /// discarded; device state is plain data and stays usable.
    pub fn lock(&self) -> MutexGuard<'_, Chip> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
