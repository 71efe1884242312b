//! The monitoring loop.
//!
//! # Responsibilities
//! - Run one probe per tick and feed the outcome to `MonitorState`
//! - Call the ICMP policy when the state machine asks for a transition
//! - Report every step to the event sink
//! - Stop cleanly on the shutdown broadcast

use std::time::Duration;

use tokio::sync::broadcast::{self, error::RecvError};
use tokio::time::{self, Instant, MissedTickBehavior};

use crate::config::{PolicyErrorAction, WatchdogConfig};
use crate::error::WatchdogError;
use crate::lifecycle::ShutdownReason;
use crate::monitor::state::MonitorState;
use crate::observability::{EventSink, WatchdogEvent};
use crate::policy::{IcmpPolicy, PolicyAction, PolicyError};
use crate::probe::{Probe, ProbeOutcome};

/// Loop parameters taken from configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct MonitorSettings {
    pub interval: Duration,
    pub max_failures: u32,
    pub on_policy_error: PolicyErrorAction,
    pub restore_on_shutdown: bool,
}

impl MonitorSettings {
    pub fn from_config(config: &WatchdogConfig) -> Self {
        Self {
            interval: config.probe.interval(),
            max_failures: config.probe.max_failures,
            on_policy_error: config.policy.on_error,
            restore_on_shutdown: config.policy.restore_on_shutdown,
        }
    }
}

impl Default for MonitorSettings {
    fn default() -> Self {
        Self::from_config(&WatchdogConfig::default())
    }
}

/// Connectivity monitor driving the ICMP policy.
pub struct Monitor<P, C, S> {
    probe: P,
    policy: C,
    sink: S,
    settings: MonitorSettings,
    state: MonitorState,
}

impl<P, C, S> Monitor<P, C, S>
where
    P: Probe,
    C: IcmpPolicy,
    S: EventSink,
{
    pub fn new(probe: P, policy: C, sink: S, settings: MonitorSettings) -> Self {
        Self {
            probe,
            policy,
            sink,
            settings,
            state: MonitorState::new(),
        }
    }

    /// Start from a known state instead of the fresh one.
    pub fn with_state(mut self, state: MonitorState) -> Self {
        self.state = state;
        self
    }

    pub fn state(&self) -> MonitorState {
        self.state
    }

    pub fn settings(&self) -> &MonitorSettings {
        &self.settings
    }

    /// Run a single probe and apply the resulting transition, if any.
    pub async fn tick(&mut self) -> Result<(), WatchdogError> {
        let outcome = self.probe.check().await;
        self.observe(outcome).await
    }

    /// Feed one probe outcome to the state machine and the policy.
    async fn observe(&mut self, outcome: ProbeOutcome) -> Result<(), WatchdogError> {
        let action = if outcome.is_success() {
            let action = self.state.record_success();
            self.sink.record(&WatchdogEvent::ProbeSucceeded { outcome });
            action
        } else {
            let action = self.state.record_failure(self.settings.max_failures);
            self.sink.record(&WatchdogEvent::ProbeFailed {
                consecutive_failures: self.state.consecutive_failures(),
                outcome,
            });
            action
        };

        let Some(action) = action else {
            return Ok(());
        };

        match self.transition(action).await {
            Err(source) if self.settings.on_policy_error == PolicyErrorAction::Exit => {
                Err(WatchdogError::Policy { action, source })
            }
            _ => Ok(()),
        }
    }

    /// Apply a policy change and commit it to the state on success.
    async fn transition(&mut self, action: PolicyAction) -> Result<(), PolicyError> {
        let result = match action {
            PolicyAction::Suppress => self.policy.disable().await,
            PolicyAction::Restore => self.policy.enable().await,
        };

        match result {
            Ok(()) => {
                self.state.commit(action);
                let event = match action {
                    PolicyAction::Suppress => WatchdogEvent::Suppressed {
                        consecutive_failures: self.state.consecutive_failures(),
                    },
                    PolicyAction::Restore => WatchdogEvent::Restored,
                };
                self.sink.record(&event);
                Ok(())
            }
            Err(e) => {
                self.sink.record(&WatchdogEvent::PolicyToggleFailed {
                    action,
                    error: e.to_string(),
                });
                Err(e)
            }
        }
    }

    /// Tick every interval until shutdown is signalled.
    ///
    /// The first probe runs one interval after start. A shutdown that
    /// arrives during a policy change takes effect once the change is
    /// committed. Returns the final state, or the policy error when
    /// escalation is set to exit.
    pub async fn run(
        mut self,
        mut shutdown: broadcast::Receiver<ShutdownReason>,
    ) -> Result<MonitorState, WatchdogError> {
        let interval = self.settings.interval;
        let mut ticker = time::interval_at(Instant::now() + interval, interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        self.sink.record(&WatchdogEvent::Started {
            target_url: self.probe.target().to_string(),
            interval,
            max_failures: self.settings.max_failures,
            icmp_suppressed: self.state.icmp_suppressed(),
        });

        let result = loop {
            tokio::select! {
                biased;
                received = shutdown.recv() => {
                    log_shutdown(received);
                    break Ok(());
                }
                _ = ticker.tick() => {}
            }

            // Only the probe is abandoned on shutdown. A policy change that
            // has started always runs to completion and is committed.
            let outcome = tokio::select! {
                biased;
                received = shutdown.recv() => {
                    tracing::debug!("Shutdown during probe, abandoning it");
                    log_shutdown(received);
                    break Ok(());
                }
                outcome = self.probe.check() => outcome,
            };

            if let Err(e) = self.observe(outcome).await {
                break Err(e);
            }
        };

        if self.settings.restore_on_shutdown && self.state.icmp_suppressed() {
            // Failure is already reported; the exit status reflects the loop.
            let _ = self.transition(PolicyAction::Restore).await;
        }

        self.sink.record(&WatchdogEvent::Stopped {
            icmp_suppressed: self.state.icmp_suppressed(),
        });

        result.map(|()| self.state)
    }
}

fn log_shutdown(received: Result<ShutdownReason, RecvError>) {
    match received {
        Ok(reason) => tracing::info!(reason = %reason, "Stopping monitor"),
        // A closed channel can never fire again; treat it as a stop request.
        Err(e) => tracing::warn!(error = %e, "Shutdown channel failed, stopping monitor"),
    }
}
