//! Shared fakes and fixtures for integration tests.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use icmp_watchdog::observability::{EventSink, WatchdogEvent};
use icmp_watchdog::policy::{IcmpPolicy, PolicyError};
use icmp_watchdog::probe::{Probe, ProbeOutcome};

/// Start a programmable HTTP backend on an ephemeral port.
///
/// `f` is called once per connection and returns the status to answer with.
pub async fn start_programmable_backend<F, Fut>(f: F) -> SocketAddr
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = u16> + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let f = Arc::new(f);

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    let f = f.clone();
                    tokio::spawn(async move {
                        let mut buf = [0u8; 1024];
                        let _ = socket.read(&mut buf).await;

                        let status = f().await;
                        let status_text = match status {
                            200 => "200 OK",
                            204 => "204 No Content",
                            404 => "404 Not Found",
                            500 => "500 Internal Server Error",
                            503 => "503 Service Unavailable",
                            _ => "200 OK",
                        };
                        let body = if status == 204 { "" } else { "ok" };

                        let response = format!(
                            "HTTP/1.1 {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                            status_text,
                            body.len(),
                            body
                        );
                        let _ = socket.write_all(response.as_bytes()).await;
                        let _ = socket.shutdown().await;
                        tokio::time::sleep(Duration::from_millis(10)).await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    addr
}

/// Backend that always answers with `status`.
pub async fn start_fixed_backend(status: u16) -> SocketAddr {
    start_programmable_backend(move || async move { status }).await
}

pub fn success() -> ProbeOutcome {
    ProbeOutcome::Success { status: 204 }
}

pub fn failure() -> ProbeOutcome {
    ProbeOutcome::Transport {
        error: "connection refused".into(),
    }
}

/// Probe that replays a fixed list of outcomes, then fails.
#[derive(Debug, Default)]
pub struct ScriptedProbe {
    script: Mutex<VecDeque<ProbeOutcome>>,
    calls: AtomicUsize,
}

impl ScriptedProbe {
    pub fn new(outcomes: impl IntoIterator<Item = ProbeOutcome>) -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(outcomes.into_iter().collect()),
            calls: AtomicUsize::new(0),
        })
    }

    /// Shorthand: `true` is a 204, `false` a refused connection.
    pub fn from_bools(outcomes: &[bool]) -> Arc<Self> {
        Self::new(outcomes.iter().map(|ok| if *ok { success() } else { failure() }))
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Probe for ScriptedProbe {
    async fn check(&self) -> ProbeOutcome {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let next = self.script.lock().unwrap().pop_front();
        next.unwrap_or_else(failure)
    }

    fn target(&self) -> &str {
        "http://scripted.invalid/"
    }
}

/// Policy that records every call and can be told to fail.
#[derive(Debug, Default)]
pub struct RecordingPolicy {
    calls: Mutex<Vec<bool>>,
    failures_left: AtomicUsize,
    delay: Duration,
}

impl RecordingPolicy {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Fail the next `n` calls.
    pub fn failing(n: usize) -> Arc<Self> {
        let policy = Self::default();
        policy.failures_left.store(n, Ordering::SeqCst);
        Arc::new(policy)
    }

    /// Take `delay` to finish every call, like a slow sysctl.
    pub fn slow(delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            delay,
            ..Self::default()
        })
    }

    /// Every `echo_enabled` value passed so far.
    pub fn calls(&self) -> Vec<bool> {
        self.calls.lock().unwrap().clone()
    }

    pub fn disable_calls(&self) -> usize {
        self.calls().iter().filter(|enabled| !**enabled).count()
    }

    pub fn enable_calls(&self) -> usize {
        self.calls().iter().filter(|enabled| **enabled).count()
    }
}

impl IcmpPolicy for RecordingPolicy {
    async fn apply(&self, echo_enabled: bool) -> Result<(), PolicyError> {
        self.calls.lock().unwrap().push(echo_enabled);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        let failed = self
            .failures_left
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if failed {
            return Err(PolicyError::CommandFailed {
                program: "sysctl".into(),
                key: "net.ipv4.icmp_echo_ignore_all",
                status: "exit status: 255".into(),
                stderr: "permission denied".into(),
            });
        }
        Ok(())
    }
}

/// Sink that keeps every event in memory.
#[derive(Debug, Default)]
pub struct RecordingSink {
    events: Mutex<Vec<WatchdogEvent>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<WatchdogEvent> {
        self.events.lock().unwrap().clone()
    }
}

impl EventSink for RecordingSink {
    fn record(&self, event: &WatchdogEvent) {
        self.events.lock().unwrap().push(event.clone());
    }
}

/// A stand-in `sysctl` that logs its `key=value` argument and rejects IPv6 keys.
///
/// With `ipv6_failures = Some(n)` only the first `n` IPv6 writes fail;
/// with `None` every IPv6 write fails.
#[cfg(unix)]
pub struct FakeSysctl {
    dir: std::path::PathBuf,
}

#[cfg(unix)]
impl FakeSysctl {
    pub fn install(name: &str, ipv6_failures: Option<usize>) -> Self {
        use std::os::unix::fs::PermissionsExt;

        let dir = std::env::temp_dir().join(format!("icmp-watchdog-{}-{}", name, std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();

        let limit = match ipv6_failures {
            Some(n) => format!(
                "count=$(wc -l < \"{dir}/ipv6_failures\" 2>/dev/null || echo 0)\n    \
                 if [ \"$count\" -ge {n} ]; then exit 0; fi\n    \
                 echo x >> \"{dir}/ipv6_failures\"\n    ",
                dir = dir.display(),
                n = n
            ),
            None => String::new(),
        };
        let script = format!(
            "#!/bin/sh\n\
             echo \"$2\" >> \"{dir}/writes\"\n\
             case \"$2\" in\n  net.ipv6.*)\n    {limit}echo \"sysctl: permission denied\" >&2\n    exit 255\n    ;;\nesac\n\
             exit 0\n",
            dir = dir.display(),
            limit = limit
        );
        let path = dir.join("sysctl");
        std::fs::write(&path, script).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();

        Self { dir }
    }

    pub fn program(&self) -> String {
        self.dir.join("sysctl").display().to_string()
    }

    /// Every `key=value` written so far, in order.
    pub fn writes(&self) -> Vec<String> {
        std::fs::read_to_string(self.dir.join("writes"))
            .unwrap_or_default()
            .lines()
            .map(str::to_string)
            .collect()
    }

    /// Last value written for a key, as the host would now hold it.
    pub fn current(&self, key: &str) -> Option<String> {
        let prefix = format!("{}=", key);
        self.writes()
            .iter()
            .rev()
            .find_map(|w| w.strip_prefix(&prefix).map(str::to_string))
    }
}

#[cfg(unix)]
impl Drop for FakeSysctl {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.dir);
    }
}
