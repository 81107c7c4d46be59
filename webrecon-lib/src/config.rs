//! Configuration file parsing and management.
//!
//! This module handles loading configuration from TOML files and environment
//! variables and merging them with proper precedence rules.

use crate::error::ReconError;
use crate::types::{MAX_PORT_CONCURRENCY, MAX_RESOLVER_WORKERS};
use crate::utils::try_parse_port_range;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, warn};

/// Output formats understood by the CLI.
pub const OUTPUT_FORMATS: [&str; 3] = ["text", "json", "csv"];

/// Configuration loaded from TOML files.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct FileConfig {
    /// Default values for CLI options
    #[serde(skip_serializing_if = "Option::is_none")]
    pub defaults: Option<DefaultsConfig>,

    /// Output formatting preferences
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<OutputConfig>,
}

/// Default configuration values that map to CLI options.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct DefaultsConfig {
    /// Default port range string (e.g., "1-1024")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ports: Option<String>,

    /// Default wordlist path
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wordlist: Option<String>,

    /// Admission gate size for the port prober
    #[serde(skip_serializing_if = "Option::is_none")]
    pub concurrency: Option<usize>,

    /// Resolver pool size
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workers: Option<usize>,

    /// Connect timeout (as string, e.g., "500ms", "1s")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout: Option<String>,
}

/// Output formatting configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct OutputConfig {
    /// Default output format: text, json or csv
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_format: Option<String>,
}

/// Configuration discovery and loading functionality.
pub struct ConfigManager {
    /// Whether to log which files were picked up
    pub verbose: bool,
}

impl ConfigManager {
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }

    /// Load configuration from a specific file.
    pub fn load_file<P: AsRef<Path>>(&self, path: P) -> Result<FileConfig, ReconError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ReconError::file_error(
                path.to_string_lossy(),
                "Configuration file not found",
            ));
        }

        let content = fs::read_to_string(path).map_err(|e| {
            ReconError::file_error(
                path.to_string_lossy(),
                format!("Failed to read configuration file: {}", e),
            )
        })?;

        let config: FileConfig = toml::from_str(&content)?;

        self.validate_config(&config)?;

        Ok(config)
    }

    /// Discover and load configuration files in precedence order.
    ///
    /// XDG config is applied first, then the home directory file, then the
    /// file in the current directory; later files override earlier ones.
    pub fn discover_and_load(&self) -> Result<FileConfig, ReconError> {
        let mut merged_config = FileConfig::default();
        let mut loaded_files = Vec::new();

        let candidates = [
            self.get_xdg_config_path(),
            self.get_global_config_path(),
            self.get_local_config_path(),
        ];

        for path in candidates.into_iter().flatten() {
            match self.load_file(&path) {
                Ok(config) => {
                    merged_config = self.merge_configs(merged_config, config);
                    loaded_files.push(path);
                }
                Err(e) => warn!(path = %path.display(), error = %e, "ignoring config file"),
            }
        }

        if self.verbose {
            for path in &loaded_files {
                info!(path = %path.display(), "loaded config file");
            }
        }

        Ok(merged_config)
    }

    /// Get the local configuration file path.
    fn get_local_config_path(&self) -> Option<PathBuf> {
        let candidates = ["./webrecon.toml", "./.webrecon.toml"];

        candidates
            .iter()
            .map(Path::new)
            .find(|path| path.exists())
            .map(Path::to_path_buf)
    }

    /// Get the global configuration file path.
    fn get_global_config_path(&self) -> Option<PathBuf> {
        let home = env::var_os("HOME")?;
        let path = Path::new(&home).join(".webrecon.toml");
        path.exists().then_some(path)
    }

    /// Get the XDG configuration file path.
    fn get_xdg_config_path(&self) -> Option<PathBuf> {
        let config_dir = env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| env::var_os("HOME").map(|home| Path::new(&home).join(".config")))?;

        let path = config_dir.join("webrecon").join("config.toml");
        path.exists().then_some(path)
    }

    /// Merge two configurations; values from `higher` win.
    fn merge_configs(&self, lower: FileConfig, higher: FileConfig) -> FileConfig {
        FileConfig {
            defaults: match (lower.defaults, higher.defaults) {
                (Some(lower_defaults), Some(higher_defaults)) => Some(DefaultsConfig {
                    ports: higher_defaults.ports.or(lower_defaults.ports),
                    wordlist: higher_defaults.wordlist.or(lower_defaults.wordlist),
                    concurrency: higher_defaults.concurrency.or(lower_defaults.concurrency),
                    workers: higher_defaults.workers.or(lower_defaults.workers),
                    timeout: higher_defaults.timeout.or(lower_defaults.timeout),
                }),
                (lower_defaults, higher_defaults) => higher_defaults.or(lower_defaults),
            },
            output: match (lower.output, higher.output) {
                (Some(lower_output), Some(higher_output)) => Some(OutputConfig {
                    default_format: higher_output.default_format.or(lower_output.default_format),
                }),
                (lower_output, higher_output) => higher_output.or(lower_output),
            },
        }
    }

    /// Validate a configuration for common issues.
    fn validate_config(&self, config: &FileConfig) -> Result<(), ReconError> {
        if let Some(defaults) = &config.defaults {
            if let Some(concurrency) = defaults.concurrency {
                if concurrency == 0 || concurrency > MAX_PORT_CONCURRENCY {
                    return Err(ReconError::config(format!(
                        "Concurrency must be between 1 and {}",
                        MAX_PORT_CONCURRENCY
                    )));
                }
            }

            if let Some(workers) = defaults.workers {
                if workers == 0 || workers > MAX_RESOLVER_WORKERS {
                    return Err(ReconError::config(format!(
                        "Workers must be between 1 and {}",
                        MAX_RESOLVER_WORKERS
                    )));
                }
            }

            if let Some(timeout_str) = &defaults.timeout {
                if parse_timeout_string(timeout_str).is_none() {
                    return Err(ReconError::config(format!(
                        "Invalid timeout format '{}'. Use format like '500ms', '1s', '2m'",
                        timeout_str
                    )));
                }
            }

            if let Some(ports) = &defaults.ports {
                if try_parse_port_range(ports).is_none() {
                    return Err(ReconError::config(format!(
                        "Invalid port range '{}'. Use format like '1-1024'",
                        ports
                    )));
                }
            }

            if let Some(wordlist) = &defaults.wordlist {
                if wordlist.trim().is_empty() {
                    return Err(ReconError::config("Wordlist path cannot be empty"));
                }
            }
        }

        if let Some(format) = config.output.as_ref().and_then(|o| o.default_format.as_ref()) {
            if !OUTPUT_FORMATS.contains(&format.as_str()) {
                return Err(ReconError::config(format!(
                    "Unknown output format '{}'. Use one of: {}",
                    format,
                    OUTPUT_FORMATS.join(", ")
                )));
            }
        }

        Ok(())
    }
}

/// Environment variable configuration that mirrors CLI options.
///
/// Values come from `WEBRECON_*` variables.
#[derive(Debug, Clone, Default)]
pub struct EnvConfig {
    pub ports: Option<String>,
    pub wordlist: Option<String>,
    pub concurrency: Option<usize>,
    pub workers: Option<usize>,
    pub timeout: Option<String>,
    pub json: Option<bool>,
    pub csv: Option<bool>,
    pub config: Option<String>,
}

impl EnvConfig {
    /// Check if output format conflicts exist (JSON and CSV both set).
    pub fn has_output_format_conflict(&self) -> bool {
        matches!((self.json, self.csv), (Some(true), Some(true)))
    }
}

/// Load configuration from environment variables.
///
/// Invalid values are ignored; with `verbose` each decision is logged.
pub fn load_env_config(verbose: bool) -> EnvConfig {
    load_env_config_from(verbose, |key| env::var(key).ok())
}

/// Same as [`load_env_config`] but reading variables through `lookup`.
pub fn load_env_config_from<F>(verbose: bool, lookup: F) -> EnvConfig
where
    F: Fn(&str) -> Option<String>,
{
    let mut env_config = EnvConfig::default();

    let report = |key: &str, value: &str, accepted: bool| {
        if !verbose {
            return;
        }
        if accepted {
            info!("Using {}={}", key, value);
        } else {
            warn!("Ignoring invalid {}='{}'", key, value);
        }
    };

    if let Some(val) = lookup("WEBRECON_PORTS") {
        let accepted = try_parse_port_range(&val).is_some();
        report("WEBRECON_PORTS", &val, accepted);
        if accepted {
            env_config.ports = Some(val);
        }
    }

    if let Some(val) = lookup("WEBRECON_WORDLIST") {
        let accepted = !val.trim().is_empty();
        report("WEBRECON_WORDLIST", &val, accepted);
        if accepted {
            env_config.wordlist = Some(val);
        }
    }

    if let Some(val) = lookup("WEBRECON_CONCURRENCY") {
        let parsed = val
            .parse::<usize>()
            .ok()
            .filter(|n| (1..=MAX_PORT_CONCURRENCY).contains(n));
        report("WEBRECON_CONCURRENCY", &val, parsed.is_some());
        env_config.concurrency = parsed;
    }

    if let Some(val) = lookup("WEBRECON_WORKERS") {
        let parsed = val
            .parse::<usize>()
            .ok()
            .filter(|n| (1..=MAX_RESOLVER_WORKERS).contains(n));
        report("WEBRECON_WORKERS", &val, parsed.is_some());
        env_config.workers = parsed;
    }

    if let Some(val) = lookup("WEBRECON_TIMEOUT") {
        let accepted = parse_timeout_string(&val).is_some();
        report("WEBRECON_TIMEOUT", &val, accepted);
        if accepted {
            env_config.timeout = Some(val);
        }
    }

    if let Some(val) = lookup("WEBRECON_JSON") {
        let parsed = parse_bool_flag(&val);
        report("WEBRECON_JSON", &val, parsed.is_some());
        env_config.json = parsed;
    }

    if let Some(val) = lookup("WEBRECON_CSV") {
        let parsed = parse_bool_flag(&val);
        report("WEBRECON_CSV", &val, parsed.is_some());
        env_config.csv = parsed;
    }

    if let Some(val) = lookup("WEBRECON_CONFIG") {
        let accepted = !val.trim().is_empty();
        report("WEBRECON_CONFIG", &val, accepted);
        if accepted {
            env_config.config = Some(val);
        }
    }

    env_config
}

fn parse_bool_flag(value: &str) -> Option<bool> {
    match value.to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Parse a timeout string like "500ms", "5s", "2m" into a duration.
///
/// A bare number is taken as seconds. Zero is rejected.
pub fn parse_timeout_string(timeout_str: &str) -> Option<Duration> {
    let timeout_str = timeout_str.trim().to_lowercase();

    let duration = if let Some(ms) = timeout_str.strip_suffix("ms") {
        Duration::from_millis(ms.trim().parse::<u64>().ok()?)
    } else if let Some(secs) = timeout_str.strip_suffix('s') {
        Duration::from_secs(secs.trim().parse::<u64>().ok()?)
    } else if let Some(mins) = timeout_str.strip_suffix('m') {
        Duration::from_secs(mins.trim().parse::<u64>().ok()?.checked_mul(60)?)
    } else {
        Duration::from_secs(timeout_str.parse::<u64>().ok()?)
    };

    (!duration.is_zero()).then_some(duration)
}
