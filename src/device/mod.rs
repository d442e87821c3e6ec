//! Device management channel
//!
//! The host device exposes its own CLI to the checker. Only two things are
//! needed from it: the configured address of an interface, and a way to
//! write a line into its log.

pub mod host_cli;

use std::net::Ipv4Addr;
use std::sync::OnceLock;

use async_trait::async_trait;
use regex::Regex;

pub use host_cli::HostCli;

/// Syslog severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Emergency,
    Alert,
    Critical,
    Error,
    Warning,
    Notice,
    Informational,
    Debug,
}

impl Severity {
    /// Numeric syslog level
    pub fn level(self) -> u8 {
        match self {
            Severity::Emergency => 0,
            Severity::Alert => 1,
            Severity::Critical => 2,
            Severity::Error => 3,
            Severity::Warning => 4,
            Severity::Notice => 5,
            Severity::Informational => 6,
            Severity::Debug => 7,
        }
    }
}

/// Narrow view of the device management plane
#[async_trait]
pub trait DeviceManager: Send + Sync {
    /// Configured IPv4 address of the named interface
    async fn interface_address(&self, name: &str) -> Result<Ipv4Addr, DeviceError>;

    /// Write one line into the device log
    async fn emit_log(&self, message: &str, severity: Severity) -> Result<(), DeviceError>;
}

/// First valid dotted-quad address found in free text
pub fn parse_ipv4(text: &str) -> Option<Ipv4Addr> {
    static DOTTED_QUAD: OnceLock<Regex> = OnceLock::new();
    let pattern = DOTTED_QUAD
        .get_or_init(|| Regex::new(r"[0-9]+(?:\.[0-9]+){3}").expect("valid dotted-quad pattern"));

    pattern
        .find_iter(text)
        .find_map(|m| m.as_str().parse().ok())
}

/// Device channel errors
#[derive(Debug, thiserror::Error)]
pub enum DeviceError {
    #[error("Failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Command {command:?} exited with {status}: {stderr}")]
    CommandFailed {
        command: String,
        status: std::process::ExitStatus,
        stderr: String,
    },

    #[error("No IPv4 address configured on interface {0}")]
    NoAddress(String),
}
