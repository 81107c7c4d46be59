//! Main scanner implementation.
//!
//! This module provides the `ReconScanner` struct that owns the engine
//! configuration and network backends and exposes the two scan operations.

use crate::error::ReconError;
use crate::net::{Connector, HostResolver, SystemResolver, TcpConnector};
use crate::ports;
use crate::subdomains;
use crate::types::{PortRange, PortResult, ScanConfig};
use std::path::Path;
use std::sync::Arc;
use tokio::io::AsyncBufRead;
use tracing::debug;

/// Entry point for port probing and subdomain discovery.
///
/// Each call to a scan method is independent: result collections, channels
/// and worker pools are created per call and torn down before it returns.
/// Cloning a scanner is cheap and shares the backends.
///
/// # Example
///
/// ```rust,no_run
/// use webrecon_lib::ReconScanner;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let scanner = ReconScanner::new();
///
///     let open = scanner.scan_ports("127.0.0.1", 1, 1024).await;
///     for result in open {
///         println!("TCP/{} open", result.port);
///     }
///
///     let found = scanner.scan_subdomains("example.com", "wordlist.txt").await?;
///     println!("{} subdomains resolved", found.len());
///     Ok(())
/// }
/// ```
#[derive(Clone)]
pub struct ReconScanner {
    /// Configuration settings for this scanner instance
    config: ScanConfig,
    /// Backend used for every connection attempt
    connector: Arc<dyn Connector>,
    /// Backend used for every host-address lookup
    resolver: Arc<dyn HostResolver>,
}

impl ReconScanner {
    /// Create a scanner with default configuration and the real network.
    ///
    /// Default settings:
    /// - Port concurrency: 100
    /// - Connect timeout: 1 second
    /// - Resolver workers: 50
    pub fn new() -> Self {
        Self::with_config(ScanConfig::default())
    }

    /// Create a scanner with custom configuration and the real network.
    ///
    /// # Example
    ///
    /// ```rust
    /// use webrecon_lib::{ReconScanner, ScanConfig};
    /// use std::time::Duration;
    ///
    /// let config = ScanConfig::default()
    ///     .with_port_concurrency(200)
    ///     .with_connect_timeout(Duration::from_millis(500));
    ///
    /// let scanner = ReconScanner::with_config(config);
    /// assert_eq!(scanner.config().port_concurrency, 200);
    /// ```
    pub fn with_config(config: ScanConfig) -> Self {
        Self::with_backends(
            config,
            Arc::new(TcpConnector::new()),
            Arc::new(SystemResolver::new()),
        )
    }

    /// Create a scanner with explicit network backends.
    pub fn with_backends(
        config: ScanConfig,
        connector: Arc<dyn Connector>,
        resolver: Arc<dyn HostResolver>,
    ) -> Self {
        Self {
            config,
            connector,
            resolver,
        }
    }

    /// Probe `host` on every port in `start..=end`.
    ///
    /// Returns the open ports in unspecified order. Never fails: closed,
    /// filtered and unreachable ports are simply absent.
    pub async fn scan_ports(&self, host: &str, start: u16, end: u16) -> Vec<PortResult> {
        ports::scan_ports(host, start, end, &self.config, Arc::clone(&self.connector)).await
    }

    /// Probe `host` on every port of an already validated range.
    pub async fn scan_port_range(&self, host: &str, range: PortRange) -> Vec<PortResult> {
        self.scan_ports(host, range.start, range.end).await
    }

    /// Brute-force subdomains of `domain` using the labels in `wordlist`.
    ///
    /// # Errors
    ///
    /// Returns [`ReconError::SourceUnavailable`] if the wordlist cannot be
    /// opened. Resolution failures of individual candidates are never errors.
    pub async fn scan_subdomains<P: AsRef<Path>>(
        &self,
        domain: &str,
        wordlist: P,
    ) -> Result<Vec<String>, ReconError> {
        let reader = match subdomains::open_wordlist(wordlist.as_ref()).await {
            Ok(reader) => reader,
            Err(e) => {
                debug!(domain, error = %e, "subdomain scan skipped");
                return Err(e);
            }
        };

        Ok(self.scan_subdomains_from_reader(domain, reader).await)
    }

    /// Brute-force subdomains of `domain` from an already open line source.
    pub async fn scan_subdomains_from_reader<R>(&self, domain: &str, source: R) -> Vec<String>
    where
        R: AsyncBufRead + Unpin,
    {
        subdomains::resolve_candidates(domain, source, &self.config, Arc::clone(&self.resolver))
            .await
    }

    /// Get the current configuration for this scanner.
    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    /// Replace the configuration, keeping the backends.
    pub fn set_config(&mut self, config: ScanConfig) {
        self.config = config;
    }
}

impl Default for ReconScanner {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ReconScanner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReconScanner")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ProbeTarget;
    use async_trait::async_trait;
    use std::net::IpAddr;
    use std::time::Duration;

    struct EverythingOpen;

    #[async_trait]
    impl Connector for EverythingOpen {
        async fn connect(
            &self,
            _target: &ProbeTarget,
            _timeout: Duration,
        ) -> Result<(), ReconError> {
            Ok(())
        }
    }

    struct NothingResolves;

    #[async_trait]
    impl HostResolver for NothingResolves {
        async fn resolve(&self, name: &str) -> Result<Vec<IpAddr>, ReconError> {
            Err(ReconError::resolve_failed(name, "NXDOMAIN"))
        }
    }

    fn fake_scanner() -> ReconScanner {
        ReconScanner::with_backends(
            ScanConfig::default(),
            Arc::new(EverythingOpen),
            Arc::new(NothingResolves),
        )
    }

    #[tokio::test]
    async fn result_never_leaves_range() {
        let scanner = fake_scanner();
        let range = PortRange::new(100, 199).unwrap();

        let results = scanner.scan_port_range("host", range).await;

        assert_eq!(results.len(), range.len());
        assert!(results.iter().all(|r| range.contains(r.port)));
    }

    #[tokio::test]
    async fn missing_wordlist_is_source_unavailable() {
        let scanner = fake_scanner();
        let result = scanner
            .scan_subdomains("example.com", "/no/such/dir/wordlist.txt")
            .await;

        tokio_test::assert_err!(&result);
        assert!(result.unwrap_err().is_source_unavailable());
    }

    #[tokio::test]
    async fn unresolvable_wordlist_is_empty_not_error() {
        let scanner = fake_scanner();
        let source: &[u8] = b"www\nmail\n";

        let found = scanner.scan_subdomains_from_reader("example.com", source).await;
        assert!(found.is_empty());
    }

    #[test]
    fn set_config_replaces_settings() {
        let mut scanner = fake_scanner();
        scanner.set_config(ScanConfig::default().with_resolver_workers(5));
        assert_eq!(scanner.config().resolver_workers, 5);
    }
}
