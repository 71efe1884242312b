//! HTTP GET probe.
//!
//! # Responsibilities
//! - Issue one GET against the target per check
//! - Enforce the probe timeout
//! - Drain the response body so pooled connections are released

use std::time::Duration;

use reqwest::Client;

use crate::config::ProbeConfig;
use crate::probe::{Probe, ProbeOutcome};

/// Probe that fetches a URL and classifies the response status.
#[derive(Debug, Clone)]
pub struct HttpProbe {
    client: Client,
    target_url: String,
}

impl HttpProbe {
    /// Build a probe with its own client from configuration.
    pub fn new(config: &ProbeConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(config.timeout())
            .user_agent(config.user_agent.clone())
            .build()?;

        Ok(Self::with_client(client, config.target_url.clone()))
    }

    /// Use a caller-supplied client. The client's timeout applies.
    pub fn with_client(client: Client, target_url: impl Into<String>) -> Self {
        Self {
            client,
            target_url: target_url.into(),
        }
    }

    /// Build a probe with an explicit timeout and no proxy lookup.
    pub fn direct(target_url: impl Into<String>, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).no_proxy().build()?;
        Ok(Self::with_client(client, target_url))
    }
}

impl Probe for HttpProbe {
    async fn check(&self) -> ProbeOutcome {
        let mut response = match self.client.get(&self.target_url).send().await {
            Ok(response) => response,
            Err(e) if e.is_timeout() => {
                tracing::debug!(target_url = %self.target_url, "Probe timed out");
                return ProbeOutcome::Timeout;
            }
            Err(e) => {
                tracing::debug!(target_url = %self.target_url, error = %e, "Probe request failed");
                return ProbeOutcome::Transport { error: e.to_string() };
            }
        };

        let outcome = ProbeOutcome::from_status(response.status().as_u16());

        // Drain whatever body there is; a read error doesn't change the verdict.
        loop {
            match response.chunk().await {
                Ok(Some(_)) => continue,
                Ok(None) => break,
                Err(e) => {
                    tracing::debug!(target_url = %self.target_url, error = %e, "Failed to drain probe body");
                    break;
                }
            }
        }

        outcome
    }

    fn target(&self) -> &str {
        &self.target_url
    }
}
