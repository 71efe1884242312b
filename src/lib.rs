//! ICMP connectivity watchdog library.

pub mod cli;
pub mod config;
pub mod error;
pub mod lifecycle;
pub mod monitor;
pub mod observability;
pub mod policy;
pub mod probe;

pub use config::WatchdogConfig;
pub use error::WatchdogError;
pub use lifecycle::{Shutdown, ShutdownReason};
pub use monitor::{Monitor, MonitorSettings, MonitorState};
