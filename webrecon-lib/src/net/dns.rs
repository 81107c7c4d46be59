//! Host-address resolution through the system resolver.

use super::HostResolver;
use crate::error::ReconError;
use async_trait::async_trait;
use std::net::IpAddr;
use tokio::net::lookup_host;

/// Resolver backed by the operating system (`getaddrinfo`).
///
/// No timeout is applied here; the lookup is bounded only by the system
/// resolver's own retry and timeout settings.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemResolver;

impl SystemResolver {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl HostResolver for SystemResolver {
    async fn resolve(&self, name: &str) -> Result<Vec<IpAddr>, ReconError> {
        let addrs = lookup_host((name, 0))
            .await
            .map_err(|e| ReconError::resolve_failed(name, e.to_string()))?;

        let mut ips: Vec<IpAddr> = addrs.map(|addr| addr.ip()).collect();
        ips.sort();
        ips.dedup();

        if ips.is_empty() {
            return Err(ReconError::resolve_failed(name, "no addresses returned"));
        }

        Ok(ips)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn resolves_ip_literal() {
        let ips = SystemResolver::new().resolve("127.0.0.1").await.unwrap();
        assert_eq!(ips, vec!["127.0.0.1".parse::<IpAddr>().unwrap()]);
    }

    #[tokio::test]
    async fn reserved_tld_fails() {
        let err = SystemResolver::new()
            .resolve("doesnotexist-xyz123.invalid")
            .await
            .unwrap_err();
        assert!(matches!(err, ReconError::ResolveFailed { .. }));
    }
}
