//! `sysctl`-backed ICMP policy.
//!
//! Runs `sysctl -w <key>=<value>` once per address family. The value is
//! the kernel's "ignore" flag, so disabling echo writes `1`.
//!
//! A toggle is all-or-nothing: if a later family fails, the families
//! already written are set back before the error is returned, so the host
//! never ends up half-toggled behind the monitor's back.

use std::path::Path;
use std::process::Stdio;

use tokio::process::Command;

use crate::config::PolicyConfig;
use crate::policy::{AddressFamily, IcmpPolicy, PolicyError};

/// Toggles echo responses through the `sysctl` binary.
#[derive(Debug, Clone)]
pub struct SysctlPolicy {
    program: String,
    families: Vec<AddressFamily>,
}

impl SysctlPolicy {
    pub fn new(program: impl Into<String>, families: Vec<AddressFamily>) -> Self {
        Self {
            program: program.into(),
            families,
        }
    }

    /// Build from configuration, dropping IPv6 when the host has no IPv6 stack.
    pub fn from_config(config: &PolicyConfig) -> Self {
        let families = retain_available(AddressFamily::for_config(config), Path::new("/proc"));
        Self::new(config.sysctl_path.clone(), families)
    }

    pub fn families(&self) -> &[AddressFamily] {
        &self.families
    }

    /// Arguments passed to `sysctl` for one family.
    pub fn command_args(family: AddressFamily, echo_enabled: bool) -> [String; 2] {
        let ignore = if echo_enabled { 0 } else { 1 };
        ["-w".to_string(), format!("{}={}", family.sysctl_key(), ignore)]
    }

    async fn apply_family(&self, family: AddressFamily, echo_enabled: bool) -> Result<(), PolicyError> {
        let key = family.sysctl_key();
        let output = Command::new(&self.program)
            .args(Self::command_args(family, echo_enabled))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|source| PolicyError::Spawn {
                program: self.program.clone(),
                key,
                source,
            })?;

        if !output.status.success() {
            return Err(PolicyError::CommandFailed {
                program: self.program.clone(),
                key,
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        tracing::debug!(key, echo_enabled, "Applied ICMP echo policy");
        Ok(())
    }
}

impl IcmpPolicy for SysctlPolicy {
    async fn apply(&self, echo_enabled: bool) -> Result<(), PolicyError> {
        for (applied, family) in self.families.iter().enumerate() {
            if let Err(e) = self.apply_family(*family, echo_enabled).await {
                for done in self.families[..applied].iter().rev() {
                    if let Err(rollback) = self.apply_family(*done, !echo_enabled).await {
                        tracing::error!(
                            key = done.sysctl_key(),
                            error = %rollback,
                            "Failed to roll back ICMP echo policy, host state may be inconsistent"
                        );
                    }
                }
                return Err(e);
            }
        }
        Ok(())
    }
}

/// Keep only the families whose sysctl exists under `proc_root`.
///
/// IPv4 is always kept. IPv6 is dropped with a warning when the kernel was
/// booted without it, since every write to its key would fail.
pub fn retain_available(families: Vec<AddressFamily>, proc_root: &Path) -> Vec<AddressFamily> {
    families
        .into_iter()
        .filter(|family| match family {
            AddressFamily::Ipv4 => true,
            AddressFamily::Ipv6 => {
                let path = proc_root.join("sys/net/ipv6/icmp/echo_ignore_all");
                let present = path.exists();
                if !present {
                    tracing::warn!(
                        path = %path.display(),
                        "IPv6 echo policy not available, toggling IPv4 only"
                    );
                }
                present
            }
        })
        .collect()
}
