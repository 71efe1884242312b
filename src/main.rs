//! ICMP connectivity watchdog.
//!
//! Probes an HTTP endpoint on a fixed interval and disables the host's ICMP
//! echo responses after too many consecutive failures, re-enabling them once
//! the endpoint answers again.
//!
//! # Architecture Overview
//!
//! ```text
//!   ┌──────────────┐   tick   ┌─────────────┐  GET   ┌──────────────┐
//!   │  lifecycle   │─────────▶│   monitor   │───────▶│    probe     │──▶ target URL
//!   │ signals +    │ shutdown │ state.rs +  │        └──────────────┘
//!   │ shutdown     │─────────▶│ engine.rs   │ toggle ┌──────────────┐
//!   └──────────────┘          └──────┬──────┘───────▶│    policy    │──▶ sysctl -w
//!                                    │ events        └──────────────┘
//!                                    ▼
//!                             ┌─────────────┐
//!                             │observability│──▶ logs, metrics
//!                             └─────────────┘
//! ```

use std::net::SocketAddr;
use std::process::ExitCode;

use clap::Parser;

use icmp_watchdog::cli::Cli;
use icmp_watchdog::lifecycle::{signals, Shutdown};
use icmp_watchdog::monitor::{Monitor, MonitorSettings};
use icmp_watchdog::observability::{logging, metrics, TracingSink};
use icmp_watchdog::policy::HostPolicy;
use icmp_watchdog::probe::HttpProbe;
use icmp_watchdog::WatchdogError;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Logging is not up yet; configuration errors go to stderr.
    let config = match cli.resolve() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("icmp-watchdog: {}", e);
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = logging::init_tracing(&config.observability) {
        eprintln!("icmp-watchdog: {}", WatchdogError::from(e));
        return ExitCode::FAILURE;
    }

    match run(config).await {
        Ok(()) => {
            tracing::info!("Shutdown complete");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(error = %e, "Watchdog terminated");
            ExitCode::FAILURE
        }
    }
}

async fn run(config: icmp_watchdog::WatchdogConfig) -> Result<(), WatchdogError> {
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "icmp-watchdog starting");

    if config.probe.max_failures == 0 {
        tracing::warn!("max_failures is 0, the first failed probe will disable ICMP echo");
    }
    if config.probe.timeout() >= config.probe.interval() {
        tracing::warn!(
            timeout_ms = config.probe.timeout_ms,
            interval_ms = config.probe.interval_ms,
            "Probe timeout is not shorter than the check interval, slow probes will delay ticks"
        );
    }

    if let Some(addr) = &config.observability.metrics_address {
        // Validated during config resolution.
        if let Ok(addr) = addr.parse::<SocketAddr>() {
            metrics::init_metrics(addr)?;
        }
    }

    tracing::info!(
        dry_run = config.policy.dry_run,
        mirror_ipv6 = config.policy.mirror_ipv6,
        on_policy_error = ?config.policy.on_error,
        "ICMP policy configured"
    );

    let probe = HttpProbe::new(&config.probe)?;
    let policy = HostPolicy::from_config(&config.policy);
    let sink = TracingSink::new(config.probe.target_url.clone());
    let monitor = Monitor::new(probe, policy, sink, MonitorSettings::from_config(&config));

    let shutdown = Shutdown::new();
    let monitor_shutdown = shutdown.subscribe();
    let signal_task = signals::spawn_signal_listener(shutdown);

    let result = monitor.run(monitor_shutdown).await;
    signal_task.abort();

    result.map(|_| ())
}
