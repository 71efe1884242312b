//! Command-line interface.
//!
//! Flags override values from the optional TOML file, which in turn
//! override the built-in defaults.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, ValueEnum};

use crate::config::{
    load_config, validate_config, ConfigError, LogFormat, PolicyErrorAction, WatchdogConfig,
};

#[derive(Debug, Parser)]
#[command(name = "icmp-watchdog")]
#[command(
    about = "Disable ICMP echo responses while an HTTP endpoint is unreachable",
    long_about = None,
    version
)]
pub struct Cli {
    /// TOML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// URL probed with a GET on every tick [default: http://www.google.com/generate_204]
    #[arg(long)]
    pub url: Option<String>,

    /// Time between probes, e.g. 500ms, 5s, 5m, 1h [default: 5s]
    #[arg(long, value_parser = parse_duration)]
    pub interval: Option<Duration>,

    /// Probe request timeout [default: 10s]
    #[arg(long, value_parser = parse_duration)]
    pub timeout: Option<Duration>,

    /// Consecutive failures before ICMP echo is disabled [default: 3]
    #[arg(long)]
    pub max_failures: Option<u32>,

    /// Only toggle IPv4, leave IPv6 echo policy alone
    #[arg(long)]
    pub no_ipv6: bool,

    /// Log policy changes instead of running sysctl
    #[arg(long)]
    pub dry_run: bool,

    /// What to do when sysctl fails [default: continue]
    #[arg(long, value_enum)]
    pub on_policy_error: Option<PolicyErrorArg>,

    /// Re-enable ICMP echo on shutdown if it is disabled
    #[arg(long)]
    pub restore_on_shutdown: bool,

    /// Log output format [default: pretty]
    #[arg(long, value_enum)]
    pub log_format: Option<LogFormatArg>,

    /// Serve Prometheus metrics on this address
    #[arg(long)]
    pub metrics_address: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PolicyErrorArg {
    Continue,
    Exit,
}

impl From<PolicyErrorArg> for PolicyErrorAction {
    fn from(arg: PolicyErrorArg) -> Self {
        match arg {
            PolicyErrorArg::Continue => PolicyErrorAction::Continue,
            PolicyErrorArg::Exit => PolicyErrorAction::Exit,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Json,
}

impl From<LogFormatArg> for LogFormat {
    fn from(arg: LogFormatArg) -> Self {
        match arg {
            LogFormatArg::Pretty => LogFormat::Pretty,
            LogFormatArg::Json => LogFormat::Json,
        }
    }
}

impl Cli {
    /// Build the effective configuration: defaults, then file, then flags.
    pub fn resolve(&self) -> Result<WatchdogConfig, ConfigError> {
        let mut config = match &self.config {
            Some(path) => load_config(path)?,
            None => WatchdogConfig::default(),
        };
        self.apply_overrides(&mut config);
        validate_config(&config).map_err(ConfigError::Validation)?;
        Ok(config)
    }

    fn apply_overrides(&self, config: &mut WatchdogConfig) {
        if let Some(url) = &self.url {
            config.probe.target_url = url.clone();
        }
        if let Some(interval) = self.interval {
            config.probe.interval_ms = duration_to_millis(interval);
        }
        if let Some(timeout) = self.timeout {
            config.probe.timeout_ms = duration_to_millis(timeout);
        }
        if let Some(max_failures) = self.max_failures {
            config.probe.max_failures = max_failures;
        }
        if self.no_ipv6 {
            config.policy.mirror_ipv6 = false;
        }
        if self.dry_run {
            config.policy.dry_run = true;
        }
        if let Some(action) = self.on_policy_error {
            config.policy.on_error = action.into();
        }
        if self.restore_on_shutdown {
            config.policy.restore_on_shutdown = true;
        }
        if let Some(format) = self.log_format {
            config.observability.log_format = format.into();
        }
        if let Some(addr) = &self.metrics_address {
            config.observability.metrics_address = Some(addr.clone());
        }
    }
}

fn duration_to_millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

/// Parse a duration such as `500ms`, `5s`, `2m`, `1h` or `1h30m`.
pub fn parse_duration(input: &str) -> Result<Duration, String> {
    let input = input.trim();
    if input.is_empty() {
        return Err("empty duration".to_string());
    }

    let mut total = Duration::ZERO;
    let mut rest = input;
    while !rest.is_empty() {
        let digits = rest.find(|c: char| !c.is_ascii_digit()).unwrap_or(rest.len());
        if digits == 0 {
            return Err(format!("expected a number in '{}'", input));
        }
        let value: u64 = rest[..digits]
            .parse()
            .map_err(|e| format!("invalid number in '{}': {}", input, e))?;
        rest = &rest[digits..];

        let unit_len = rest.find(|c: char| c.is_ascii_digit()).unwrap_or(rest.len());
        let part = match &rest[..unit_len] {
            "ms" => Duration::from_millis(value),
            "s" => Duration::from_secs(value),
            "m" => Duration::from_secs(value.saturating_mul(60)),
            "h" => Duration::from_secs(value.saturating_mul(3600)),
            "" => return Err(format!("missing unit in '{}' (use ms, s, m or h)", input)),
            unit => return Err(format!("unknown unit '{}' in '{}'", unit, input)),
        };
        total = total.saturating_add(part);
        rest = &rest[unit_len..];
    }

    Ok(total)
}
