use std::time::Duration;

use async_trait::async_trait;

use super::{hostname, CheckKind, Probe, ProbeError};

/// Resolves the hostname of each URL to an IPv4 address through the system resolver.
///
/// Resolution goes through `getaddrinfo`, so IPv4 literals and `/etc/hosts`
/// entries pass without a DNS query being sent.
#[derive(Debug, Clone)]
pub struct DnsProbe {
    timeout: Duration,
}

impl DnsProbe {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

#[async_trait]
impl Probe for DnsProbe {
    fn kind(&self) -> CheckKind {
        CheckKind::Dns
    }

    async fn probe(&self, url: &str) -> Result<(), ProbeError> {
        let host = hostname(url)?;

        let addrs = tokio::time::timeout(self.timeout, tokio::net::lookup_host((host.as_str(), 0u16)))
            .await
            .map_err(|_| ProbeError::Timeout(self.timeout))?
            .map_err(|e| ProbeError::Resolution(format!("{}: {}", host, e)))?;

        let found = addrs.into_iter().find(|addr| addr.is_ipv4());
        match found {
            Some(addr) => {
                tracing::debug!(host = %host, addr = %addr.ip(), "Resolved");
                Ok(())
            }
            None => Err(ProbeError::NoAddress(host)),
        }
    }
}
