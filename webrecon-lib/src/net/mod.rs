//! Network backends used by the scanners.
//!
//! The two blocking points of the engine, the TCP connect and the host-address
//! lookup, sit behind the [`Connector`] and [`HostResolver`] traits so the
//! scanners can be driven by in-memory doubles as well as the real network.

use crate::error::ReconError;
use crate::types::ProbeTarget;
use async_trait::async_trait;
use std::net::IpAddr;
use std::time::Duration;

/// TCP connect probing
pub mod tcp;

/// Host-address resolution through the system resolver
pub mod dns;

pub use dns::SystemResolver;
pub use tcp::TcpConnector;

/// Attempts a single connection to a probe target.
#[async_trait]
pub trait Connector: Send + Sync {
    /// Returns `Ok(())` if a connection was established within `timeout`.
    ///
    /// Any established connection must be closed before returning; no data
    /// is exchanged.
    async fn connect(&self, target: &ProbeTarget, timeout: Duration) -> Result<(), ReconError>;
}

/// Looks up the addresses a host name resolves to.
#[async_trait]
pub trait HostResolver: Send + Sync {
    async fn resolve(&self, name: &str) -> Result<Vec<IpAddr>, ReconError>;
}
