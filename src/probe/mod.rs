//! Probe execution engine
//!
//! Issues a single ICMP echo per invocation by spawning the platform `ping`
//! binary with the right argument dialect. Every invocation resolves to a
//! [`ProbeOutput`], never a fault: launch failures (missing binary, permission
//! errors) degrade to a synthetic failure record so loss accounting stays
//! accurate even when probing is completely broken.

use crate::types::IpVersion;
use async_trait::async_trait;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tokio::time::timeout;

/// Extra wall-clock allowance beyond the probe timeout for process spawn and
/// output collection overhead.
pub const PROBE_TIMEOUT_SLACK: Duration = Duration::from_millis(500);

/// Parameters for a single echo probe
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProbeSpec {
    /// Per-probe reply timeout
    pub timeout: Duration,
    /// ICMP payload size in bytes
    pub payload_bytes: u32,
    /// IP protocol version
    pub ip_version: IpVersion,
}

/// Raw result of one echo probe
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeOutput {
    /// Raw textual probe output (stdout, or stderr when stdout is empty)
    pub raw: String,
    /// Whether the probe mechanism itself ran to completion successfully
    pub transport_ok: bool,
}

impl ProbeOutput {
    /// Synthetic record for a probe that could not even be launched
    fn launch_failure(program: &str, err: &std::io::Error) -> Self {
        Self {
            raw: format!("Error: failed to launch {}: {}", program, err),
            transport_ok: false,
        }
    }
}

/// Seam between the scheduler and the probe mechanism.
///
/// The production implementation shells out to the system ping; tests inject
/// delayed or scripted runners to exercise scheduling behavior.
#[async_trait]
pub trait ProbeRunner: Send + Sync + 'static {
    /// Issue exactly one echo probe against `target`.
    ///
    /// Must resolve within `spec.timeout` plus bounded overhead and must
    /// never return an error: failures are encoded in the output.
    async fn probe(&self, target: &str, spec: &ProbeSpec) -> ProbeOutput;
}

/// Probe runner backed by the platform `ping` binary
#[derive(Debug, Clone, Default)]
pub struct SystemPingRunner {
    /// Override for the ping program, used by tests
    program: Option<String>,
}

impl SystemPingRunner {
    /// Create a runner using the platform default ping binary
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a runner invoking a specific program instead of the platform
    /// default
    pub fn with_program<S: Into<String>>(program: S) -> Self {
        Self {
            program: Some(program.into()),
        }
    }

    /// Resolve the program and argument list for one probe
    fn command_for(&self, target: &str, spec: &ProbeSpec) -> (String, Vec<String>) {
        let (default_program, args) = ping_command(target, spec);
        let program = self
            .program
            .clone()
            .unwrap_or_else(|| default_program.to_string());
        (program, args)
    }
}

#[async_trait]
impl ProbeRunner for SystemPingRunner {
    async fn probe(&self, target: &str, spec: &ProbeSpec) -> ProbeOutput {
        let (program, args) = self.command_for(target, spec);

        let mut cmd = Command::new(&program);
        cmd.args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        #[cfg(windows)]
        cmd.creation_flags(0x0800_0000); // CREATE_NO_WINDOW

        let child = match cmd.spawn() {
            Ok(child) => child,
            Err(err) => return ProbeOutput::launch_failure(&program, &err),
        };

        // The ping binary enforces its own reply timeout; the outer bound only
        // guards against a wedged process. Dropping the future kills the child.
        match timeout(spec.timeout + PROBE_TIMEOUT_SLACK, child.wait_with_output()).await {
            Ok(Ok(output)) => {
                let stdout = String::from_utf8_lossy(&output.stdout);
                let raw = if stdout.trim().is_empty() {
                    String::from_utf8_lossy(&output.stderr).trim().to_string()
                } else {
                    stdout.trim().to_string()
                };
                ProbeOutput {
                    raw,
                    transport_ok: output.status.success(),
                }
            }
            Ok(Err(err)) => ProbeOutput {
                raw: format!("Error: probe process failed: {}", err),
                transport_ok: false,
            },
            Err(_) => ProbeOutput {
                raw: format!(
                    "Error: probe produced no output within {}ms",
                    (spec.timeout + PROBE_TIMEOUT_SLACK).as_millis()
                ),
                transport_ok: false,
            },
        }
    }
}

/// Build the platform-correct single-echo ping invocation.
///
/// Windows ping takes the timeout in milliseconds (`-w`), Linux iputils in
/// whole seconds (`-W`), and macOS expects milliseconds (`-W`) with a
/// separate `ping6` binary for IPv6.
#[cfg(target_os = "windows")]
fn ping_command(target: &str, spec: &ProbeSpec) -> (&'static str, Vec<String>) {
    let version_flag = match spec.ip_version {
        IpVersion::V4 => "-4",
        IpVersion::V6 => "-6",
    };
    (
        "ping",
        vec![
            target.to_string(),
            "-n".to_string(),
            "1".to_string(),
            "-w".to_string(),
            spec.timeout.as_millis().max(1).to_string(),
            "-l".to_string(),
            spec.payload_bytes.to_string(),
            version_flag.to_string(),
        ],
    )
}

#[cfg(target_os = "macos")]
fn ping_command(target: &str, spec: &ProbeSpec) -> (&'static str, Vec<String>) {
    let program = match spec.ip_version {
        IpVersion::V4 => "ping",
        IpVersion::V6 => "ping6",
    };
    let mut args = vec![
        "-c".to_string(),
        "1".to_string(),
        "-s".to_string(),
        spec.payload_bytes.to_string(),
    ];
    if spec.ip_version == IpVersion::V4 {
        args.push("-W".to_string());
        args.push(spec.timeout.as_millis().max(1).to_string());
    }
    args.push(target.to_string());
    (program, args)
}

#[cfg(not(any(target_os = "windows", target_os = "macos")))]
fn ping_command(target: &str, spec: &ProbeSpec) -> (&'static str, Vec<String>) {
    let version_flag = match spec.ip_version {
        IpVersion::V4 => "-4",
        IpVersion::V6 => "-6",
    };
    // iputils -W takes whole seconds; round up so sub-second timeouts still
    // wait at least one second at the binary level (the outer bound is exact).
    let timeout_secs = spec.timeout.as_millis().div_ceil(1000).max(1);
    (
        "ping",
        vec![
            "-c".to_string(),
            "1".to_string(),
            "-W".to_string(),
            timeout_secs.to_string(),
            "-s".to_string(),
            spec.payload_bytes.to_string(),
            version_flag.to_string(),
            target.to_string(),
        ],
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec() -> ProbeSpec {
        ProbeSpec {
            timeout: Duration::from_millis(1000),
            payload_bytes: 32,
            ip_version: IpVersion::V4,
        }
    }

    #[test]
    fn test_command_single_echo() {
        let (_, args) = ping_command("8.8.8.8", &spec());
        // Exactly one echo per invocation on every platform
        let joined = args.join(" ");
        assert!(joined.contains("-n 1") || joined.contains("-c 1"));
        assert!(args.iter().any(|a| a == "8.8.8.8"));
        assert!(args.iter().any(|a| a == "32"));
    }

    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    #[test]
    fn test_linux_timeout_rounds_up_to_seconds() {
        let mut s = spec();
        s.timeout = Duration::from_millis(1);
        let (program, args) = ping_command("8.8.8.8", &s);
        assert_eq!(program, "ping");
        let w_pos = args.iter().position(|a| a == "-W").unwrap();
        assert_eq!(args[w_pos + 1], "1");

        s.timeout = Duration::from_millis(2500);
        let (_, args) = ping_command("8.8.8.8", &s);
        let w_pos = args.iter().position(|a| a == "-W").unwrap();
        assert_eq!(args[w_pos + 1], "3");
    }

    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    #[test]
    fn test_ip_version_flag() {
        let mut s = spec();
        s.ip_version = IpVersion::V6;
        let (_, args) = ping_command("2001:4860:4860::8888", &s);
        assert!(args.iter().any(|a| a == "-6"));
    }

    #[tokio::test]
    async fn test_launch_failure_is_synthetic_record() {
        let runner = SystemPingRunner::with_program("definitely-not-a-ping-binary");
        let output = runner.probe("8.8.8.8", &spec()).await;
        assert!(!output.transport_ok);
        assert!(output.raw.starts_with("Error:"), "raw: {}", output.raw);
    }

    #[tokio::test]
    async fn test_wedged_process_is_bounded() {
        // `sleep` produces no output and outlives the probe window; the outer
        // bound must cut it off and report a failure record.
        let runner = SystemPingRunner::with_program("sleep");
        let mut s = spec();
        s.timeout = Duration::from_millis(10);
        let output = runner.probe("30", &s).await;
        assert!(!output.transport_ok);
    }

    #[test]
    fn test_program_override() {
        let runner = SystemPingRunner::with_program("fake-ping");
        let (program, _) = runner.command_for("8.8.8.8", &spec());
        assert_eq!(program, "fake-ping");

        let runner = SystemPingRunner::new();
        let (program, _) = runner.command_for("8.8.8.8", &spec());
        assert!(program.starts_with("ping"));
    }
}
