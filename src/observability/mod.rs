//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Monitor emits WatchdogEvent
//!     → events.rs (EventSink; TracingSink in production)
//!     → logging.rs (structured log lines)
//!     → metrics.rs (counters and gauges)
//!
//! Consumers:
//!     → stdout (pretty or JSON)
//!     → Metrics endpoint (Prometheus scrape, optional)
//! ```
//!
//! # Design Decisions
//! - The monitor depends on EventSink, not on the logger
//! - Metric updates are no-ops when no exporter is installed

pub mod events;
pub mod logging;
pub mod metrics;

pub use events::{EventSink, TracingSink, WatchdogEvent};
