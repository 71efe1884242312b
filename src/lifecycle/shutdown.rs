//! Shutdown coordination for the watchdog.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::broadcast;

/// Why the watchdog is stopping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownReason {
    /// SIGINT, usually Ctrl+C at a terminal.
    Interrupt,
    /// SIGTERM from a service manager.
    Terminate,
}

impl ShutdownReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            ShutdownReason::Interrupt => "interrupt",
            ShutdownReason::Terminate => "terminate",
        }
    }
}

impl fmt::Display for ShutdownReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Delivers the shutdown reason to the monitor loop.
///
/// Only the first trigger is sent. A second signal while the loop is
/// finishing a policy change would otherwise make the receiver lag.
#[derive(Debug, Clone)]
pub struct Shutdown {
    tx: broadcast::Sender<ShutdownReason>,
    triggered: Arc<AtomicBool>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1);
        Self {
            tx,
            triggered: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Subscribe before the loop starts; later subscribers miss the trigger.
    pub fn subscribe(&self) -> broadcast::Receiver<ShutdownReason> {
        self.tx.subscribe()
    }

    /// Send `reason` to every subscriber. Returns false if already triggered.
    pub fn trigger(&self, reason: ShutdownReason) -> bool {
        if self.triggered.swap(true, Ordering::SeqCst) {
            tracing::debug!(reason = %reason, "Shutdown already in progress");
            return false;
        }
        let _ = self.tx.send(reason);
        true
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}
