//! Error handling for reconnaissance operations.
//!
//! Per-attempt failures (`ConnectFailed`, `ResolveFailed`) are produced by the
//! network backends and swallowed by the scanners; they never reach callers.
//! `SourceUnavailable` is the only error the subdomain scan surfaces.

use std::fmt;

/// Main error type for reconnaissance operations.
#[derive(Debug, Clone)]
pub enum ReconError {
    /// A TCP connection attempt failed, was refused, or timed out
    ConnectFailed {
        target: String,
        message: String,
    },

    /// A host-address lookup failed or returned no addresses
    ResolveFailed {
        name: String,
        message: String,
    },

    /// The wordlist could not be opened
    SourceUnavailable {
        path: String,
        message: String,
    },

    /// Target host or domain rejected before scanning
    InvalidTarget {
        target: String,
        reason: String,
    },

    /// Configuration errors (invalid settings, malformed TOML, etc.)
    ConfigError {
        message: String,
    },

    /// File I/O errors outside the wordlist source
    FileError {
        path: String,
        message: String,
    },

    /// Generic internal errors that don't fit other categories
    Internal {
        message: String,
    },
}

impl ReconError {
    /// Create a new connect failure.
    pub fn connect_failed<T: Into<String>, M: Into<String>>(target: T, message: M) -> Self {
        Self::ConnectFailed {
            target: target.into(),
            message: message.into(),
        }
    }

    /// Create a new resolve failure.
    pub fn resolve_failed<N: Into<String>, M: Into<String>>(name: N, message: M) -> Self {
        Self::ResolveFailed {
            name: name.into(),
            message: message.into(),
        }
    }

    /// Create a new source-unavailable error.
    pub fn source_unavailable<P: Into<String>, M: Into<String>>(path: P, message: M) -> Self {
        Self::SourceUnavailable {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a new invalid target error.
    pub fn invalid_target<T: Into<String>, R: Into<String>>(target: T, reason: R) -> Self {
        Self::InvalidTarget {
            target: target.into(),
            reason: reason.into(),
        }
    }

    /// Create a new configuration error.
    pub fn config<M: Into<String>>(message: M) -> Self {
        Self::ConfigError {
            message: message.into(),
        }
    }

    /// Create a new file error.
    pub fn file_error<P: Into<String>, M: Into<String>>(path: P, message: M) -> Self {
        Self::FileError {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a new internal error.
    pub fn internal<M: Into<String>>(message: M) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Per-attempt failures that the scanners absorb without reporting.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::ConnectFailed { .. } | Self::ResolveFailed { .. })
    }

    /// Check if this error means the wordlist could not be read.
    pub fn is_source_unavailable(&self) -> bool {
        matches!(self, Self::SourceUnavailable { .. })
    }
}

impl fmt::Display for ReconError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConnectFailed { target, message } => {
                write!(f, "Connection to {} failed: {}", target, message)
            }
            Self::ResolveFailed { name, message } => {
                write!(f, "Could not resolve '{}': {}", name, message)
            }
            Self::SourceUnavailable { path, message } => {
                write!(f, "Wordlist '{}' is unavailable: {}", path, message)
            }
            Self::InvalidTarget { target, reason } => {
                write!(f, "Invalid target '{}': {}", target, reason)
            }
            Self::ConfigError { message } => {
                write!(f, "Configuration error: {}", message)
            }
            Self::FileError { path, message } => {
                write!(f, "File error at '{}': {}", path, message)
            }
            Self::Internal { message } => {
                write!(f, "Internal error: {}", message)
            }
        }
    }
}

impl std::error::Error for ReconError {}

impl From<std::io::Error> for ReconError {
    fn from(err: std::io::Error) -> Self {
        Self::Internal {
            message: format!("I/O error: {}", err),
        }
    }
}

impl From<toml::de::Error> for ReconError {
    fn from(err: toml::de::Error) -> Self {
        Self::ConfigError {
            message: format!("Failed to parse TOML configuration: {}", err),
        }
    }
}
