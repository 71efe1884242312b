//! Watchdog events and the sinks that receive them.
//!
//! The monitor never calls the logger directly. It reports discrete
//! events to an [`EventSink`]; [`TracingSink`] turns them into structured
//! log lines and metric updates.

use std::sync::Arc;
use std::time::Duration;

use crate::observability::metrics;
use crate::policy::PolicyAction;
use crate::probe::ProbeOutcome;

/// Something the monitor did or observed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WatchdogEvent {
    Started {
        target_url: String,
        interval: Duration,
        max_failures: u32,
        icmp_suppressed: bool,
    },
    ProbeSucceeded {
        outcome: ProbeOutcome,
    },
    ProbeFailed {
        consecutive_failures: u64,
        outcome: ProbeOutcome,
    },
    Suppressed {
        consecutive_failures: u64,
    },
    Restored,
    PolicyToggleFailed {
        action: PolicyAction,
        error: String,
    },
    Stopped {
        icmp_suppressed: bool,
    },
}

/// Receiver of watchdog events.
pub trait EventSink {
    fn record(&self, event: &WatchdogEvent);
}

impl<T: EventSink + ?Sized> EventSink for Arc<T> {
    fn record(&self, event: &WatchdogEvent) {
        (**self).record(event)
    }
}

/// Sink that logs through `tracing` and updates metrics.
#[derive(Debug, Clone)]
pub struct TracingSink {
    target_url: String,
}

impl TracingSink {
    pub fn new(target_url: impl Into<String>) -> Self {
        Self {
            target_url: target_url.into(),
        }
    }
}

impl EventSink for TracingSink {
    fn record(&self, event: &WatchdogEvent) {
        let target_url = self.target_url.as_str();
        match event {
            WatchdogEvent::Started {
                target_url,
                interval,
                max_failures,
                icmp_suppressed,
            } => {
                tracing::info!(
                    %target_url,
                    check_interval = ?interval,
                    max_failures,
                    icmp_suppressed,
                    "Monitoring started"
                );
                metrics::record_suppressed(*icmp_suppressed);
            }
            WatchdogEvent::ProbeSucceeded { outcome } => {
                tracing::info!(%target_url, %outcome, "Connection check succeeded");
                metrics::record_probe(true, 0);
            }
            WatchdogEvent::ProbeFailed {
                consecutive_failures,
                outcome,
            } => {
                tracing::info!(
                    %target_url,
                    consecutive_failures,
                    %outcome,
                    "Connection check failed"
                );
                metrics::record_probe(false, *consecutive_failures);
            }
            WatchdogEvent::Suppressed {
                consecutive_failures,
            } => {
                tracing::warn!(
                    %target_url,
                    consecutive_failures,
                    "Failure threshold reached, ICMP echo responses disabled"
                );
                metrics::record_suppressed(true);
            }
            WatchdogEvent::Restored => {
                tracing::warn!(%target_url, "Connection recovered, ICMP echo responses enabled");
                metrics::record_suppressed(false);
            }
            WatchdogEvent::PolicyToggleFailed { action, error } => {
                tracing::error!(%target_url, %action, %error, "Failed to change ICMP echo policy");
                metrics::record_policy_error(*action);
            }
            WatchdogEvent::Stopped { icmp_suppressed } => {
                tracing::info!(%target_url, icmp_suppressed, "Monitoring stopped");
            }
        }
    }
}
