//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the watchdog.
//! All types derive Serde traits for deserialization from config files.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Root configuration for the watchdog.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct WatchdogConfig {
    /// Connectivity probe settings.
    pub probe: ProbeConfig,

    /// ICMP policy toggle settings.
    pub policy: PolicyConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Probe configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ProbeConfig {
    /// URL fetched with a single GET on every tick.
    pub target_url: String,

    /// Tick period in milliseconds.
    pub interval_ms: u64,

    /// Per-probe request timeout in milliseconds.
    pub timeout_ms: u64,

    /// Consecutive failures before ICMP echo is suppressed.
    pub max_failures: u32,

    /// User-Agent header sent with each probe.
    pub user_agent: String,
}

impl ProbeConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            target_url: "http://www.google.com/generate_204".to_string(),
            interval_ms: 5_000,
            timeout_ms: 10_000,
            max_failures: 3,
            user_agent: concat!("icmp-watchdog/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// What the monitor does when the policy command fails.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum PolicyErrorAction {
    /// Log, keep the previous state, retry on the next qualifying tick.
    #[default]
    Continue,
    /// Stop the monitor and exit the process with an error.
    Exit,
}

/// ICMP policy configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct PolicyConfig {
    /// Path or name of the `sysctl` binary.
    pub sysctl_path: String,

    /// Apply the same toggle to `net.ipv6.icmp.echo_ignore_all`.
    pub mirror_ipv6: bool,

    /// Log intended changes instead of running `sysctl`.
    pub dry_run: bool,

    /// Escalation policy for toggle failures.
    pub on_error: PolicyErrorAction,

    /// Re-enable ICMP echo on shutdown if it is currently suppressed.
    pub restore_on_shutdown: bool,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            sysctl_path: "sysctl".to_string(),
            mirror_ipv6: true,
            dry_run: false,
            on_error: PolicyErrorAction::Continue,
            restore_on_shutdown: false,
        }
    }
}

/// Log encoder selection.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Log output format.
    pub log_format: LogFormat,

    /// Prometheus exporter bind address. Disabled when unset.
    pub metrics_address: Option<String>,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_address: None,
        }
    }
}
