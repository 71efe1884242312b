//! A toggle that fails on one address family leaves the host as it found it.

#![cfg(unix)]

use std::sync::Arc;

use icmp_watchdog::monitor::{Monitor, MonitorSettings};
use icmp_watchdog::policy::{AddressFamily, IcmpPolicy, PolicyError, SysctlPolicy};

mod common;

use common::{FakeSysctl, RecordingSink, ScriptedProbe};

const IPV4: &str = "net.ipv4.icmp_echo_ignore_all";
const IPV6: &str = "net.ipv6.icmp.echo_ignore_all";

// Freshly written scripts can hit ETXTBSY if another test forks while one is open.
static SERIAL: tokio::sync::Mutex<()> = tokio::sync::Mutex::const_new(());

fn both_families(sysctl: &FakeSysctl) -> SysctlPolicy {
    SysctlPolicy::new(sysctl.program(), vec![AddressFamily::Ipv4, AddressFamily::Ipv6])
}

fn settings(max_failures: u32) -> MonitorSettings {
    MonitorSettings {
        max_failures,
        ..MonitorSettings::default()
    }
}

#[tokio::test]
async fn test_ipv6_failure_rolls_back_ipv4() {
    let _serial = SERIAL.lock().await;
    let sysctl = FakeSysctl::install("rollback", None);

    let err = both_families(&sysctl).disable().await.unwrap_err();
    match err {
        PolicyError::CommandFailed { key, .. } => assert_eq!(key, IPV6),
        other => panic!("expected CommandFailed, got {:?}", other),
    }

    assert_eq!(
        sysctl.writes(),
        vec![
            format!("{}=1", IPV4),
            format!("{}=1", IPV6),
            format!("{}=0", IPV4),
        ]
    );
}

#[tokio::test]
async fn test_host_matches_state_after_failed_suppress() {
    let _serial = SERIAL.lock().await;
    let sysctl = FakeSysctl::install("consistent", None);
    let mut monitor = Monitor::new(
        ScriptedProbe::from_bools(&[false, false, false, true, true]),
        both_families(&sysctl),
        Arc::new(RecordingSink::new()),
        settings(3),
    );

    for _ in 0..5 {
        monitor.tick().await.unwrap();
    }

    assert!(!monitor.state().icmp_suppressed());
    assert_eq!(monitor.state().consecutive_failures(), 0);
    assert_eq!(sysctl.current(IPV4).as_deref(), Some("0"), "IPv4 echo left disabled");
}

#[tokio::test]
async fn test_recovery_after_transient_ipv6_failure() {
    let _serial = SERIAL.lock().await;
    let sysctl = FakeSysctl::install("transient", Some(1));
    let mut monitor = Monitor::new(
        ScriptedProbe::from_bools(&[false, false, false, false, true]),
        both_families(&sysctl),
        Arc::new(RecordingSink::new()),
        settings(3),
    );

    for _ in 0..3 {
        monitor.tick().await.unwrap();
    }
    assert!(!monitor.state().icmp_suppressed());
    assert_eq!(sysctl.current(IPV4).as_deref(), Some("0"));

    monitor.tick().await.unwrap();
    assert!(monitor.state().icmp_suppressed());
    assert_eq!(sysctl.current(IPV4).as_deref(), Some("1"));
    assert_eq!(sysctl.current(IPV6).as_deref(), Some("1"));

    monitor.tick().await.unwrap();
    assert!(!monitor.state().icmp_suppressed());
    assert_eq!(sysctl.current(IPV4).as_deref(), Some("0"));
    assert_eq!(sysctl.current(IPV6).as_deref(), Some("0"));

    assert_eq!(
        sysctl.writes(),
        vec![
            format!("{}=1", IPV4),
            format!("{}=1", IPV6),
            format!("{}=0", IPV4),
            format!("{}=1", IPV4),
            format!("{}=1", IPV6),
            format!("{}=0", IPV4),
            format!("{}=0", IPV6),
        ]
    );
}
