//! Reachability checks
//!
//! Each check walks the host list in order with one [`Probe`] and stops at
//! the first host that fails. A [`CheckBatch`] is the logical AND of its
//! checks.

pub mod dns;
pub mod http;
pub mod runner;

use async_trait::async_trait;

pub use dns::DnsProbe;
pub use http::HttpProbe;
pub use runner::{run_check, CheckBatch};

/// Kind of reachability check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckKind {
    Dns,
    Web,
}

impl CheckKind {
    /// Prefix used in per-host status lines
    pub fn label(self) -> &'static str {
        match self {
            CheckKind::Dns => "DNS",
            CheckKind::Web => "Web",
        }
    }

    /// Line reported when every host passed
    pub fn summary(self) -> &'static str {
        match self {
            CheckKind::Dns => "All dns checks passed successfully!",
            CheckKind::Web => "All web checks passed successfully!",
        }
    }
}

/// A single-host probe
#[async_trait]
pub trait Probe: Send + Sync {
    fn kind(&self) -> CheckKind;

    /// Probe one URL; any error means the host failed the check
    async fn probe(&self, url: &str) -> Result<(), ProbeError>;
}

/// Reasons a host fails a probe
#[derive(Debug, thiserror::Error)]
pub enum ProbeError {
    #[error("{0}")]
    InvalidUrl(String),

    #[error("{0}")]
    Resolution(String),

    #[error("no A record for {0}")]
    NoAddress(String),

    #[error("no response within {0:?}")]
    Timeout(std::time::Duration),

    #[error("{0}")]
    Connection(String),

    #[error("{0}")]
    Status(String),

    #[error("{0}")]
    Request(String),
}

impl ProbeError {
    /// Short error class name, safe to send to the external log
    pub fn kind(&self) -> &'static str {
        match self {
            ProbeError::InvalidUrl(_) => "InvalidUrl",
            ProbeError::Resolution(_) => "ResolutionError",
            ProbeError::NoAddress(_) => "NoAddress",
            ProbeError::Timeout(_) => "Timeout",
            ProbeError::Connection(_) => "ConnectionError",
            ProbeError::Status(_) => "HTTPError",
            ProbeError::Request(_) => "RequestError",
        }
    }
}

/// Hostname component of a probe URL
pub(crate) fn hostname(url: &str) -> Result<String, ProbeError> {
    let parsed = reqwest::Url::parse(url)
        .map_err(|e| ProbeError::InvalidUrl(format!("{}: {}", url, e)))?;
    parsed
        .host_str()
        .map(|h| h.trim_start_matches('[').trim_end_matches(']').to_string())
        .ok_or_else(|| ProbeError::InvalidUrl(format!("{} has no host", url)))
}
