//! Failure-counting state machine.
//!
//! # States
//! - Normal: ICMP echo answered
//! - Suppressed: ICMP echo ignored
//!
//! # State Transitions
//! ```text
//! Normal → Suppressed: failure with consecutive_failures >= max_failures
//! Suppressed → Normal: first success
//! ```
//!
//! Transitions are edge-triggered: the recorder only asks for a policy
//! change when the flag disagrees with what the outcome calls for. The flag
//! moves only after the caller confirms the change with [`MonitorState::commit`],
//! so a failed toggle is asked for again on the next qualifying tick.

use crate::policy::PolicyAction;

/// Counters owned by the monitor task.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MonitorState {
    consecutive_failures: u64,
    icmp_suppressed: bool,
}

impl MonitorState {
    /// Fresh state: no failures, ICMP answered.
    pub fn new() -> Self {
        Self::default()
    }

    /// State for a host that is already suppressed.
    pub fn suppressed() -> Self {
        Self {
            consecutive_failures: 0,
            icmp_suppressed: true,
        }
    }

    pub fn consecutive_failures(&self) -> u64 {
        self.consecutive_failures
    }

    pub fn icmp_suppressed(&self) -> bool {
        self.icmp_suppressed
    }

    /// Record a successful probe. Returns `Restore` if echo should come back.
    pub fn record_success(&mut self) -> Option<PolicyAction> {
        self.consecutive_failures = 0;
        self.icmp_suppressed.then_some(PolicyAction::Restore)
    }

    /// Record a failed probe. Returns `Suppress` once the threshold is reached.
    pub fn record_failure(&mut self, max_failures: u32) -> Option<PolicyAction> {
        self.consecutive_failures = self.consecutive_failures.saturating_add(1);
        let at_threshold = self.consecutive_failures >= u64::from(max_failures);
        (at_threshold && !self.icmp_suppressed).then_some(PolicyAction::Suppress)
    }

    /// Mark a policy change as applied on the host.
    pub fn commit(&mut self, action: PolicyAction) {
        self.icmp_suppressed = !action.echo_enabled();
    }
}
