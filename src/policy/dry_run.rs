//! Policy that only logs what it would change.

use crate::policy::{AddressFamily, IcmpPolicy, PolicyError};

#[derive(Debug, Clone)]
pub struct DryRunPolicy {
    families: Vec<AddressFamily>,
}

impl DryRunPolicy {
    pub fn new(families: Vec<AddressFamily>) -> Self {
        Self { families }
    }
}

impl IcmpPolicy for DryRunPolicy {
    async fn apply(&self, echo_enabled: bool) -> Result<(), PolicyError> {
        for family in &self.families {
            tracing::info!(
                key = family.sysctl_key(),
                value = if echo_enabled { 0 } else { 1 },
                "Dry run: would set ICMP echo policy"
            );
        }
        Ok(())
    }
}
