//! Cooperative cancellation for long running commands.
//!
//! A `Shutdown` is a cheap cloneable flag. The `watch` command additionally
//! routes SIGINT/SIGTERM (Ctrl-C off unix) into it from a background thread
//! driving a small tokio runtime.

use std::io;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use tracing::{debug, warn};

#[derive(Debug, Clone, Default)]
pub struct Shutdown {
    requested: Arc<AtomicBool>,
}

impl Shutdown {
    pub fn new() -> Self {
        Self::default()
    }

    /// A token that also trips when the process receives SIGINT or SIGTERM.
    ///
    /// The handlers are registered before this returns, so a signal delivered
    /// afterwards is never lost.
    pub fn on_interrupt() -> io::Result<Self> {
        let shutdown = Shutdown::new();

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        let signals = {
            let _guard = runtime.enter();
            Signals::install()?
        };

        let requested = shutdown.clone();
        thread::Builder::new()
            .name("fileward-signals".to_string())
            .spawn(move || match runtime.block_on(signals.recv()) {
                Ok(()) => {
                    debug!("Interrupt received, stopping");
                    requested.request();
                }
                Err(e) => warn!("Failed to listen for interrupts: {}", e),
            })?;

        Ok(shutdown)
    }

    pub fn request(&self) {
        self.requested.store(true, Ordering::SeqCst);
    }

    pub fn is_requested(&self) -> bool {
        self.requested.load(Ordering::SeqCst)
    }
}

#[cfg(unix)]
struct Signals {
    interrupt: tokio::signal::unix::Signal,
    terminate: tokio::signal::unix::Signal,
}

#[cfg(unix)]
impl Signals {
    fn install() -> io::Result<Self> {
        use tokio::signal::unix::{SignalKind, signal};

        Ok(Signals {
            interrupt: signal(SignalKind::interrupt())?,
            terminate: signal(SignalKind::terminate())?,
        })
    }

    async fn recv(mut self) -> io::Result<()> {
        tokio::select! {
            _ = self.interrupt.recv() => {},
            _ = self.terminate.recv() => {},
        }
        Ok(())
    }
}

#[cfg(not(unix))]
struct Signals;

#[cfg(not(unix))]
impl Signals {
    fn install() -> io::Result<Self> {
        Ok(Signals)
    }

    async fn recv(self) -> io::Result<()> {
        tokio::signal::ctrl_c().await
    }
}
