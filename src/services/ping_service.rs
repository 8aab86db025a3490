//! Host reachability checks
//!
//! A single ICMP echo through the system `ping` binary. The probe sits behind
//! [`ReachabilityProbe`] so tests can swap in a deterministic implementation.

use std::process::Stdio;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use tokio::process::Command;
use tracing::{debug, info};

use crate::errors::{LinkpingError, Result};

/// 单次探测上限（秒）
pub const PING_TIMEOUT_SECS: u64 = 5;

/// Extra time granted to the child process on top of its own deadline
/// before the outer timer gives up on it.
const OUTER_TIMER_GRACE: Duration = Duration::from_secs(1);

const MAX_HOST_LEN: usize = 253;

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PingResult {
    pub host: String,
    pub alive: bool,
    /// Round trip in milliseconds
    pub time: Option<f64>,
    pub output: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeOutcome {
    pub success: bool,
    pub output: String,
}

#[async_trait]
pub trait ReachabilityProbe: Send + Sync {
    /// `Err` only when the probe mechanism itself is broken. An unreachable
    /// host is a successful probe with `success == false`.
    async fn probe(&self, host: &str, timeout: Duration) -> Result<ProbeOutcome>;

    fn name(&self) -> &'static str;
}

/// Runs the platform `ping` binary
pub struct SystemPingProbe {
    binary: String,
}

impl SystemPingProbe {
    pub fn new() -> Self {
        Self::with_binary("ping")
    }

    pub fn with_binary(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    #[cfg(windows)]
    fn build_args(host: &str, timeout: Duration) -> Vec<String> {
        vec![
            "-n".to_string(),
            "1".to_string(),
            "-w".to_string(),
            timeout.as_millis().to_string(),
            host.to_string(),
        ]
    }

    #[cfg(target_os = "macos")]
    fn build_args(host: &str, timeout: Duration) -> Vec<String> {
        vec![
            "-c".to_string(),
            "1".to_string(),
            "-t".to_string(),
            timeout.as_secs().max(1).to_string(),
            host.to_string(),
        ]
    }

    #[cfg(not(any(windows, target_os = "macos")))]
    fn build_args(host: &str, timeout: Duration) -> Vec<String> {
        vec![
            "-c".to_string(),
            "1".to_string(),
            "-W".to_string(),
            timeout.as_secs().max(1).to_string(),
            host.to_string(),
        ]
    }
}

impl Default for SystemPingProbe {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ReachabilityProbe for SystemPingProbe {
    async fn probe(&self, host: &str, timeout: Duration) -> Result<ProbeOutcome> {
        let child = Command::new(&self.binary)
            .args(Self::build_args(host, timeout))
            .env("LC_ALL", "C")
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                LinkpingError::probe_failed(format!("Failed to spawn {}: {}", self.binary, e))
            })?;

        // 超时后 child 被 drop，kill_on_drop 负责结束进程
        let output = match tokio::time::timeout(timeout + OUTER_TIMER_GRACE, child.wait_with_output())
            .await
        {
            Ok(result) => result.map_err(|e| {
                LinkpingError::probe_failed(format!("Failed to wait for {}: {}", self.binary, e))
            })?,
            Err(_) => {
                debug!("Ping probe for {} hit the outer timer", host);
                return Ok(ProbeOutcome {
                    success: false,
                    output: format!("Request timed out after {}s", timeout.as_secs()),
                });
            }
        };

        let mut transcript = String::from_utf8_lossy(&output.stdout).into_owned();
        transcript.push_str(&String::from_utf8_lossy(&output.stderr));

        Ok(ProbeOutcome {
            success: output.status.success(),
            output: transcript,
        })
    }

    fn name(&self) -> &'static str {
        "system-ping"
    }
}

/// Reject anything that is not a plausible hostname or IP literal.
///
/// A leading `-` would be read as an option by `ping`.
pub fn validate_host(host: Option<&str>) -> Result<&str> {
    let host = host
        .map(str::trim)
        .filter(|h| !h.is_empty())
        .ok_or_else(|| LinkpingError::invalid_request("Host is required"))?;

    let plausible = host.len() <= MAX_HOST_LEN
        && !host.starts_with('-')
        && host
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'.' | b'-' | b':' | b'_'));

    if !plausible {
        return Err(LinkpingError::invalid_request("Invalid host"));
    }
    Ok(host)
}

/// 从 ping 输出中提取往返时间（毫秒）
///
/// Handles `time=12.3 ms` (Linux, macOS), `time=12ms` and `time<1ms` (Windows).
pub fn parse_round_trip_ms(output: &str) -> Option<f64> {
    output.lines().find_map(|line| {
        let idx = line.find("time=").or_else(|| line.find("time<"))?;
        let rest = &line[idx + 5..];
        let number: String = rest
            .chars()
            .take_while(|c| c.is_ascii_digit() || *c == '.')
            .collect();
        number.parse::<f64>().ok()
    })
}

pub struct PingService {
    probe: Arc<dyn ReachabilityProbe>,
    timeout: Duration,
}

impl PingService {
    pub fn new(probe: Arc<dyn ReachabilityProbe>) -> Self {
        Self {
            probe,
            timeout: Duration::from_secs(PING_TIMEOUT_SECS),
        }
    }

    pub fn system() -> Self {
        Self::new(Arc::new(SystemPingProbe::new()))
    }

    pub async fn check(&self, host: Option<&str>) -> Result<PingResult> {
        let host = validate_host(host)?;

        let outcome = self.probe.probe(host, self.timeout).await?;
        let time = if outcome.success {
            parse_round_trip_ms(&outcome.output)
        } else {
            None
        };

        info!(
            "PingService: {} via {} alive={} time={:?}",
            host,
            self.probe.name(),
            outcome.success,
            time
        );

        Ok(PingResult {
            host: host.to_string(),
            alive: outcome.success,
            time,
            output: outcome.output,
        })
    }
}
