//! Top-level error type.

use thiserror::Error;

use crate::config::ConfigError;
use crate::policy::{PolicyAction, PolicyError};

#[derive(Debug, Error)]
pub enum WatchdogError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("failed to {action} ICMP echo responses: {source}")]
    Policy {
        action: PolicyAction,
        #[source]
        source: PolicyError,
    },

    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("failed to install metrics exporter: {0}")]
    Metrics(#[from] metrics_exporter_prometheus::BuildError),

    #[error("failed to initialize logging: {0}")]
    Logging(#[from] tracing_subscriber::util::TryInitError),
}
