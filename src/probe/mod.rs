//! Connectivity probing.
//!
//! # Data Flow
//! ```text
//! Monitor tick
//!     → Probe::check() (one GET, bounded timeout)
//!     → ProbeOutcome (Success | BadStatus | Timeout | Transport)
//!     → is_success() feeds the failure counter
//! ```
//!
//! # Design Decisions
//! - Transport errors are outcomes, never program errors
//! - No retries within a probe; the tick interval is the retry
//! - Only 2xx counts as success

pub mod http;

use std::fmt;
use std::future::Future;
use std::sync::Arc;

pub use http::HttpProbe;

/// Result of a single probe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    /// The target answered with a 2xx status.
    Success { status: u16 },
    /// The target answered outside the 2xx range.
    BadStatus { status: u16 },
    /// The request did not complete before the probe timeout.
    Timeout,
    /// Connection, DNS, or TLS level failure.
    Transport { error: String },
}

impl ProbeOutcome {
    /// Classify an HTTP status code.
    pub fn from_status(status: u16) -> Self {
        if (200..300).contains(&status) {
            ProbeOutcome::Success { status }
        } else {
            ProbeOutcome::BadStatus { status }
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ProbeOutcome::Success { .. })
    }
}

impl fmt::Display for ProbeOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProbeOutcome::Success { status } => write!(f, "status {}", status),
            ProbeOutcome::BadStatus { status } => write!(f, "non-success status {}", status),
            ProbeOutcome::Timeout => write!(f, "timed out"),
            ProbeOutcome::Transport { error } => write!(f, "transport error: {}", error),
        }
    }
}

/// A single bounded health check against the target.
pub trait Probe {
    /// Run one check.
    fn check(&self) -> impl Future<Output = ProbeOutcome> + Send;

    /// The target being probed, for log context.
    fn target(&self) -> &str;
}

impl<T: Probe + ?Sized> Probe for Arc<T> {
    fn check(&self) -> impl Future<Output = ProbeOutcome> + Send {
        (**self).check()
    }

    fn target(&self) -> &str {
        (**self).target()
    }
}
