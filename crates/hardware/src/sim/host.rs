//! The host environment: interrupt lines and the service thread.
//!
//! The host owns one callback slot per interrupt line (external, timer).
//! Handlers are registered explicitly at startup; there is no implicit
//! default. `spawn` starts the interrupt context: a dedicated thread that
//! watches the lines and runs the registered handler to completion on each
//! assertion. A handler error latches into the fatal slot and stops all
//! servicing; the orchestrator reads the latch and fails the run.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crate::common::error::ProtocolViolation;
use crate::soc::devices::plic::Target;
use crate::soc::SharedChip;

/// A registered interrupt-line handler. Runs on the service thread.
pub type LineHandler = Box<dyn Fn() -> Result<(), ProtocolViolation> + Send>;

/// The host environment before the service thread starts.
pub struct Host {
    chip: SharedChip,
    target: Target,
    poll_interval: Duration,
    external: Option<LineHandler>,
    timer: Option<LineHandler>,
}

impl Host {
    /// Creates a host for `target` polling its lines every
    /// `poll_interval`.
    pub fn new(chip: SharedChip, target: Target, poll_interval: Duration) -> Self {
        Self {
            chip,
            target,
            poll_interval,
            external: None,
            timer: None,
        }
    }

    /// Registers the external-line handler (the dispatch router).
    pub fn register_external(&mut self, handler: LineHandler) {
        self.external = Some(handler);
    }

    /// Registers the timer-line handler.
    pub fn register_timer(&mut self, handler: LineHandler) {
        self.timer = Some(handler);
    }

    /// Starts the interrupt context.
    pub fn spawn(self) -> ServiceThread {
        let stop = Arc::new(AtomicBool::new(false));
        let fatal: Arc<Mutex<Option<ProtocolViolation>>> = Arc::new(Mutex::new(None));

        let thread_stop = Arc::clone(&stop);
        let thread_fatal = Arc::clone(&fatal);
        let handle = thread::spawn(move || {
            let Host {
                chip,
                target,
                poll_interval,
                external,
                timer,
            } = self;

            while !thread_stop.load(Ordering::Acquire) {
                let (external_asserted, timer_asserted) = {
                    let mut chip = chip.lock();
                    chip.rv_timer.poll();
                    (chip.plic.line_asserted(target), chip.rv_timer.line_asserted())
                };

                let mut serviced = false;
                if external_asserted {
                    serviced = true;
                    if let Err(violation) = Self::run_line(external.as_ref(), "external") {
                        Self::latch(&thread_fatal, violation);
                        return;
                    }
                }
                if timer_asserted {
                    serviced = true;
                    if let Err(violation) = Self::run_line(timer.as_ref(), "timer") {
                        Self::latch(&thread_fatal, violation);
                        return;
                    }
                }
                if !serviced {
                    thread::sleep(poll_interval);
                }
            }
        });

        ServiceThread {
            stop,
            fatal,
            handle: Some(handle),
        }
    }

    fn run_line(
        handler: Option<&LineHandler>,
        line: &'static str,
    ) -> Result<(), ProtocolViolation> {
        match handler {
            Some(handler) => handler(),
            None => Err(ProtocolViolation::UnhandledLine { line }),
        }
    }

    fn latch(fatal: &Mutex<Option<ProtocolViolation>>, violation: ProtocolViolation) {
        tracing::error!(%violation, "interrupt context aborted");
        let mut slot = fatal.lock().unwrap_or_else(PoisonError::into_inner);
        if slot.is_none() {
            *slot = Some(violation);
        }
    }
}

impl std::fmt::Debug for Host {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Host")
            .field("target", &self.target)
            .field("poll_interval", &self.poll_interval)
            .field("external_registered", &self.external.is_some())
            .field("timer_registered", &self.timer.is_some())
            .finish()
    }
}

/// Handle to the running interrupt context.
#[derive(Debug)]
pub struct ServiceThread {
    stop: Arc<AtomicBool>,
    fatal: Arc<Mutex<Option<ProtocolViolation>>>,
    handle: Option<JoinHandle<()>>,
}

impl ServiceThread {
    /// Reads the fatal latch: the violation that stopped servicing, if any.
    pub fn fatal(&self) -> Option<ProtocolViolation> {
        self.fatal
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Stops the interrupt context and joins it.
    pub fn stop(mut self) -> Option<ProtocolViolation> {
        self.shutdown();
        self.fatal()
    }

    fn shutdown(&mut self) {
        self.stop.store(true, Ordering::Release);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for ServiceThread {
    fn drop(&mut self) {
        self.shutdown();
    }
}
