//! Shared test infrastructure: logging, configuration, and pre-wired
//! interrupt fabrics.

use std::sync::Arc;

use socsmoke_core::config::Config;
use socsmoke_core::dispatch::flags::ObservationFlags;
use socsmoke_core::dispatch::router::Router;
use socsmoke_core::dispatch::table::{self, Peripheral};
use socsmoke_core::soc::devices::plic::{TriggerKind, MAX_PRIORITY, MIN_PRIORITY, TARGET_HART0};
use socsmoke_core::soc::devices::uart::{Parity, UartConfig, UartIrq};
use socsmoke_core::soc::devices::IrqSource;
use socsmoke_core::soc::{Chip, SharedChip};

/// Installs a test-writer subscriber once per process.
pub fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// A configuration trimmed for test runtime: fewer always-on rounds, same
/// fabric timing.
pub fn test_config() -> Config {
    init_logging();
    Config {
        aon_rounds: 2,
        ..Config::default()
    }
}

/// A chip plus the dispatch state shared between contexts, wired for one
/// expected peripheral.
pub struct FabricContext {
    /// The shared chip under test.
    pub chip: SharedChip,
    /// Flags the router sets on observation.
    pub flags: Arc<ObservationFlags>,
    /// A router expecting the fabric's peripheral.
    pub router: Router,
}

impl FabricContext {
    /// A fabric routing GPIO pin 0 causes at maximum priority.
    pub fn gpio() -> Self {
        let ctx = Self::bare(Peripheral::Gpio);
        {
            let mut chip = ctx.chip.lock();
            for id in [
                table::IRQ_ID_GPIO_PIN0_RISING,
                table::IRQ_ID_GPIO_PIN0_FALLING,
            ] {
                chip.gpio
                    .set_irq_enabled(table::gpio_irq_for(id).unwrap(), true)
                    .unwrap();
                chip.plic.set_trigger(id, TriggerKind::Level).unwrap();
                chip.plic.set_priority(id, MAX_PRIORITY).unwrap();
                chip.plic.set_enabled(id, TARGET_HART0, true).unwrap();
            }
            chip.plic.set_threshold(TARGET_HART0, MIN_PRIORITY).unwrap();
        }
        ctx
    }

    /// A fabric routing every UART cause at maximum priority.
    pub fn uart() -> Self {
        let ctx = Self::bare(Peripheral::Uart0);
        {
            let mut chip = ctx.chip.lock();
            let config = Config::default();
            chip.uart0
                .configure(UartConfig {
                    baudrate: config.baud_rate,
                    clk_freq_hz: config.peripheral_clk_hz,
                    parity_enable: false,
                    parity: Parity::Even,
                })
                .unwrap();
            for irq in UartIrq::ALL {
                let id = table::uart_cause_id(irq);
                chip.uart0.set_irq_enabled(irq, true).unwrap();
                chip.plic.set_trigger(id, TriggerKind::Level).unwrap();
                chip.plic.set_priority(id, MAX_PRIORITY).unwrap();
                chip.plic.set_enabled(id, TARGET_HART0, true).unwrap();
            }
            chip.plic.set_threshold(TARGET_HART0, MIN_PRIORITY).unwrap();
        }
        ctx
    }

    fn bare(expected: Peripheral) -> Self {
        init_logging();
        let chip = SharedChip::new(Chip::new(&Config::default()));
        let flags = Arc::new(ObservationFlags::new());
        let router = Router::new(chip.clone(), Arc::clone(&flags), TARGET_HART0, expected);
        Self {
            chip,
            flags,
            router,
        }
    }
}
