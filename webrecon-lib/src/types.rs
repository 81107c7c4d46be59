//! Core data types for port probing and subdomain discovery.
//!
//! This module defines the values that flow through both scanners:
//! probe targets, port results, port ranges and the engine configuration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::RangeInclusive;
use std::time::Duration;

/// Admission gate size used by the port prober unless configured otherwise.
pub const DEFAULT_PORT_CONCURRENCY: usize = 100;

/// Size of the resolver worker pool unless configured otherwise.
pub const DEFAULT_RESOLVER_WORKERS: usize = 50;

/// Per-attempt connect timeout unless configured otherwise.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(1);

/// Upper bound accepted for the admission gate.
pub const MAX_PORT_CONCURRENCY: usize = 1000;

/// Upper bound accepted for the resolver pool.
pub const MAX_RESOLVER_WORKERS: usize = 500;

/// A single (host, port) pair to probe.
///
/// Built fresh for every connection attempt and dropped afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ProbeTarget {
    pub host: String,
    pub port: u16,
}

impl ProbeTarget {
    pub fn new<H: Into<String>>(host: H, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }

    /// `host:port` form accepted by the tokio connect and lookup functions.
    ///
    /// IPv6 literals are bracketed so the port separator stays unambiguous.
    pub fn address(&self) -> String {
        if self.host.contains(':') && !self.host.starts_with('[') {
            format!("[{}]:{}", self.host, self.port)
        } else {
            format!("{}:{}", self.host, self.port)
        }
    }
}

impl fmt::Display for ProbeTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.address())
    }
}

/// Outcome of a successful probe.
///
/// Only open ports are ever reported; a closed or filtered port simply
/// has no entry in the result collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PortResult {
    pub port: u16,
    pub is_open: bool,
}

impl PortResult {
    pub fn open(port: u16) -> Self {
        Self {
            port,
            is_open: true,
        }
    }
}

/// Closed, inclusive range of TCP ports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortRange {
    pub start: u16,
    pub end: u16,
}

impl PortRange {
    /// Build a range, rejecting port 0 and reversed bounds.
    pub fn new(start: u16, end: u16) -> Option<Self> {
        if start == 0 || start > end {
            return None;
        }
        Some(Self { start, end })
    }

    /// Number of ports in the range.
    pub fn len(&self) -> usize {
        usize::from(self.end) - usize::from(self.start) + 1
    }

    /// A valid range always holds at least one port.
    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn contains(&self, port: u16) -> bool {
        (self.start..=self.end).contains(&port)
    }

    pub fn ports(&self) -> RangeInclusive<u16> {
        self.start..=self.end
    }
}

impl Default for PortRange {
    /// The range scanned when the caller's range string is unusable.
    fn default() -> Self {
        Self { start: 1, end: 1024 }
    }
}

impl fmt::Display for PortRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

/// Tunables for both scanners.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanConfig {
    /// Maximum number of in-flight connection attempts
    /// Default: 100, Range: 1-1000
    pub port_concurrency: usize,

    /// Timeout for each individual connection attempt
    /// Default: 1 second
    #[serde(skip)]
    pub connect_timeout: Duration,

    /// Number of concurrent DNS resolver workers
    /// Default: 50, Range: 1-500
    pub resolver_workers: usize,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            port_concurrency: DEFAULT_PORT_CONCURRENCY,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            resolver_workers: DEFAULT_RESOLVER_WORKERS,
        }
    }
}

impl ScanConfig {
    /// Set the admission gate size, clamped to 1..=1000.
    pub fn with_port_concurrency(mut self, concurrency: usize) -> Self {
        self.port_concurrency = concurrency.clamp(1, MAX_PORT_CONCURRENCY);
        self
    }

    /// Set the per-attempt connect timeout.
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Set the resolver pool size, clamped to 1..=500.
    pub fn with_resolver_workers(mut self, workers: usize) -> Self {
        self.resolver_workers = workers.clamp(1, MAX_RESOLVER_WORKERS);
        self
    }
}
