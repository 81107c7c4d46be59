//! # Web Recon Library
//!
//! Concurrent reconnaissance primitives: a TCP port prober with bounded
//! parallelism and a producer/consumer subdomain resolver.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use webrecon_lib::{parse_port_range, ReconScanner};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let scanner = ReconScanner::new();
//!
//!     let subdomains = scanner.scan_subdomains("example.com", "wordlist.txt").await?;
//!     println!("Subdomains: {:?}", subdomains);
//!
//!     let range = parse_port_range("1-1024");
//!     for result in scanner.scan_port_range("example.com", range).await {
//!         println!("TCP/{} open", result.port);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Port Probing**: Every port of a range probed concurrently behind an admission gate
//! - **Subdomain Discovery**: Wordlist brute-force through a fixed resolver pool
//! - **Deduplication**: Each resolved name reported once, however often it is listed
//! - **Pluggable Network**: `Connector` and `HostResolver` traits for custom backends
//! - **Configurable**: TOML files and `WEBRECON_*` environment variables

// Re-export main public API types and functions
// This makes them available as webrecon_lib::TypeName
pub use config::{
    load_env_config, load_env_config_from, parse_timeout_string, ConfigManager, DefaultsConfig,
    EnvConfig, FileConfig, OutputConfig, OUTPUT_FORMATS,
};
pub use error::ReconError;
pub use net::{Connector, HostResolver, SystemResolver, TcpConnector};
pub use scanner::ReconScanner;
pub use subdomains::open_wordlist;
pub use types::{
    PortRange, PortResult, ProbeTarget, ScanConfig, DEFAULT_CONNECT_TIMEOUT,
    DEFAULT_PORT_CONCURRENCY, DEFAULT_RESOLVER_WORKERS, MAX_PORT_CONCURRENCY,
    MAX_RESOLVER_WORKERS,
};
pub use utils::{build_fqdn, parse_port_range, try_parse_port_range, validate_target};

// Public modules
pub mod net;

// Internal modules - these are not part of the public API
mod concurrent;
mod config;
mod error;
mod ports;
mod scanner;
mod subdomains;
mod types;
mod utils;

// Type alias for convenience
pub type Result<T> = std::result::Result<T, ReconError>;

// Library version and metadata
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const AUTHOR: &str = env!("CARGO_PKG_AUTHORS");

/// Get library information for debugging or display purposes.
pub fn info() -> LibraryInfo {
    LibraryInfo {
        version: VERSION,
        author: AUTHOR,
        defaults: ScanConfig::default(),
    }
}

/// Information about the library build and its default engine settings
#[derive(Debug, Clone)]
pub struct LibraryInfo {
    pub version: &'static str,
    pub author: &'static str,
    pub defaults: ScanConfig,
}
