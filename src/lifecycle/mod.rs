//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → Shutdown::trigger(ShutdownReason)
//!
//! Shutdown (shutdown.rs):
//!     broadcast (first reason only) → Monitor::run leaves its select! loop
//!               → optional ICMP restore → Stopped event → exit 0
//! ```
//!
//! # Design Decisions
//! - One broadcast channel; every long-running task subscribes
//! - A probe in flight is abandoned; a policy change in flight is finished
//!   and committed, so the recorded state matches the host on exit

pub mod shutdown;
pub mod signals;

pub use shutdown::{Shutdown, ShutdownReason};
