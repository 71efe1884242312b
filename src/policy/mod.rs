//! Host ICMP echo policy control.
//!
//! # Data Flow
//! ```text
//! Monitor decides a transition
//!     → IcmpPolicy::disable() / enable()
//!     → sysctl.rs: `sysctl -w net.ipv4.icmp_echo_ignore_all=<1|0>`
//!                  (mirrored to net.ipv6.icmp.echo_ignore_all)
//!     → Ok(()) or PolicyError back to the Monitor
//! ```
//!
//! # Design Decisions
//! - Controllers are stateless; the Monitor owns the suppression flag
//! - Errors are returned, never retried here
//! - The OS setting is idempotent, so repeated calls are harmless

pub mod dry_run;
pub mod sysctl;

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use thiserror::Error;

use crate::config::PolicyConfig;

pub use dry_run::DryRunPolicy;
pub use sysctl::SysctlPolicy;

/// Error raised when the host policy could not be changed.
#[derive(Debug, Error)]
pub enum PolicyError {
    #[error("failed to run {program} for {key}: {source}")]
    Spawn {
        program: String,
        key: &'static str,
        #[source]
        source: std::io::Error,
    },

    #[error("{program} exited with {status} setting {key}: {stderr}")]
    CommandFailed {
        program: String,
        key: &'static str,
        status: String,
        stderr: String,
    },
}

/// Address family whose echo policy is toggled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressFamily {
    Ipv4,
    Ipv6,
}

impl AddressFamily {
    /// Kernel parameter that makes the stack ignore echo requests.
    pub fn sysctl_key(self) -> &'static str {
        match self {
            AddressFamily::Ipv4 => "net.ipv4.icmp_echo_ignore_all",
            AddressFamily::Ipv6 => "net.ipv6.icmp.echo_ignore_all",
        }
    }

    /// Families covered by a policy configuration, IPv4 first.
    pub fn for_config(config: &PolicyConfig) -> Vec<AddressFamily> {
        if config.mirror_ipv6 {
            vec![AddressFamily::Ipv4, AddressFamily::Ipv6]
        } else {
            vec![AddressFamily::Ipv4]
        }
    }
}

/// Direction of a policy change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolicyAction {
    /// Stop answering echo requests.
    Suppress,
    /// Answer echo requests again.
    Restore,
}

impl PolicyAction {
    pub fn echo_enabled(self) -> bool {
        matches!(self, PolicyAction::Restore)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PolicyAction::Suppress => "suppress",
            PolicyAction::Restore => "restore",
        }
    }
}

impl fmt::Display for PolicyAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Host-wide ICMP echo response policy.
pub trait IcmpPolicy {
    /// Set whether the host answers ICMP echo requests.
    fn apply(&self, echo_enabled: bool) -> impl Future<Output = Result<(), PolicyError>> + Send;

    fn enable(&self) -> impl Future<Output = Result<(), PolicyError>> + Send {
        self.apply(true)
    }

    fn disable(&self) -> impl Future<Output = Result<(), PolicyError>> + Send {
        self.apply(false)
    }
}

impl<T: IcmpPolicy + ?Sized> IcmpPolicy for Arc<T> {
    fn apply(&self, echo_enabled: bool) -> impl Future<Output = Result<(), PolicyError>> + Send {
        (**self).apply(echo_enabled)
    }
}

/// Policy backend selected from configuration.
#[derive(Debug, Clone)]
pub enum HostPolicy {
    Sysctl(SysctlPolicy),
    DryRun(DryRunPolicy),
}

impl HostPolicy {
    pub fn from_config(config: &PolicyConfig) -> Self {
        if config.dry_run {
            HostPolicy::DryRun(DryRunPolicy::new(AddressFamily::for_config(config)))
        } else {
            HostPolicy::Sysctl(SysctlPolicy::from_config(config))
        }
    }
}

impl IcmpPolicy for HostPolicy {
    async fn apply(&self, echo_enabled: bool) -> Result<(), PolicyError> {
        match self {
            HostPolicy::Sysctl(policy) => policy.apply(echo_enabled).await,
            HostPolicy::DryRun(policy) => policy.apply(echo_enabled).await,
        }
    }
}
