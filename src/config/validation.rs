//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (interval and timeout > 0)
//! - Check the probe target is an http(s) URL
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: WatchdogConfig → Result<(), Vec<ValidationError>>
//! - `max_failures = 0` is allowed; the first failure suppresses immediately

use std::net::SocketAddr;

use thiserror::Error;
use url::Url;

use crate::config::schema::WatchdogConfig;

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("probe.target_url '{url}' is not a valid URL: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("probe.target_url scheme '{0}' is not http or https")]
    UnsupportedScheme(String),

    #[error("probe.interval_ms must be greater than zero")]
    ZeroInterval,

    #[error("probe.timeout_ms must be greater than zero")]
    ZeroTimeout,

    #[error("policy.sysctl_path must not be empty")]
    EmptySysctlPath,

    #[error("observability.metrics_address '{0}' is not a socket address")]
    InvalidMetricsAddress(String),
}

/// Check a configuration for semantic errors.
pub fn validate_config(config: &WatchdogConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    match Url::parse(&config.probe.target_url) {
        Ok(url) if url.scheme() != "http" && url.scheme() != "https" => {
            errors.push(ValidationError::UnsupportedScheme(url.scheme().to_string()));
        }
        Ok(_) => {}
        Err(e) => errors.push(ValidationError::InvalidUrl {
            url: config.probe.target_url.clone(),
            reason: e.to_string(),
        }),
    }

    if config.probe.interval_ms == 0 {
        errors.push(ValidationError::ZeroInterval);
    }
    if config.probe.timeout_ms == 0 {
        errors.push(ValidationError::ZeroTimeout);
    }
    if config.policy.sysctl_path.trim().is_empty() {
        errors.push(ValidationError::EmptySysctlPath);
    }
    if let Some(addr) = &config.observability.metrics_address {
        if addr.parse::<SocketAddr>().is_err() {
            errors.push(ValidationError::InvalidMetricsAddress(addr.clone()));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
