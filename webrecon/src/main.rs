//! Web Recon CLI Application
//!
//! A command-line interface for subdomain brute-forcing and TCP port discovery
//! against a single target. This CLI drives the webrecon-lib scanning engine.

mod ui;

use clap::builder::styling::{AnsiColor, Effects, Styles};
use clap::Parser;
use serde::Serialize;
use std::process;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;
use webrecon_lib::{load_env_config, ConfigManager, EnvConfig, FileConfig};
use webrecon_lib::{parse_timeout_string, try_parse_port_range, validate_target};
use webrecon_lib::{
    PortRange, ReconScanner, ScanConfig, DEFAULT_PORT_CONCURRENCY, DEFAULT_RESOLVER_WORKERS,
    MAX_PORT_CONCURRENCY, MAX_RESOLVER_WORKERS,
};

const STYLES: Styles = Styles::styled()
    .header(AnsiColor::Yellow.on_default().effects(Effects::BOLD))
    .usage(AnsiColor::Yellow.on_default().effects(Effects::BOLD))
    .literal(AnsiColor::Green.on_default().effects(Effects::BOLD))
    .placeholder(AnsiColor::Cyan.on_default());

/// Default port range string when nothing else is configured
const DEFAULT_PORTS: &str = "1-1024";

/// Default wordlist path when nothing else is configured
const DEFAULT_WORDLIST: &str = "wordlist.txt";

/// CLI arguments for webrecon
#[derive(Parser, Debug)]
#[command(name = "webrecon")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Subdomain brute-forcing and TCP port discovery for a single target")]
#[command(
    long_about = "Resolve <word>.<domain> for every word of a wordlist, \
                  then probe the domain's TCP ports.\n\n\
                  Probes run concurrently behind a configurable limit; \
                  results are deduplicated and sorted."
)]
#[command(styles = STYLES)]
pub struct Args {
    /// Target domain
    #[arg(
        short = 'd',
        long = "domain",
        value_name = "DOMAIN",
        required_unless_present = "list_defaults",
        help_heading = "Target"
    )]
    pub domain: Option<String>,

    /// Port range to probe, as start-end (default: 1-1024)
    #[arg(short = 'p', long = "ports", value_name = "RANGE", help_heading = "Target")]
    pub ports: Option<String>,

    /// Wordlist with one subdomain label per line (default: wordlist.txt)
    #[arg(short = 'w', long = "wordlist", value_name = "FILE", help_heading = "Target")]
    pub wordlist: Option<String>,

    /// Skip the subdomain scan
    #[arg(long = "skip-subdomains", help_heading = "Target")]
    pub skip_subdomains: bool,

    /// Skip the port scan
    #[arg(long = "skip-ports", help_heading = "Target")]
    pub skip_ports: bool,

    /// Output results in JSON format
    #[arg(short = 'j', long = "json", help_heading = "Output Format")]
    pub json: bool,

    /// Output results in CSV format
    #[arg(long = "csv", help_heading = "Output Format")]
    pub csv: bool,

    /// Plain text output without colors or spinner
    #[arg(long = "plain", help_heading = "Output Format")]
    pub plain: bool,

    /// Max simultaneous connection attempts (default: 100, max: 1000)
    #[arg(short = 'c', long = "concurrency", value_name = "N", help_heading = "Performance")]
    pub concurrency: Option<usize>,

    /// Resolver worker pool size (default: 50, max: 500)
    #[arg(long = "workers", value_name = "N", help_heading = "Performance")]
    pub workers: Option<usize>,

    /// Per-connection timeout, e.g. 500ms, 1s, 2m (default: 1s)
    #[arg(long = "timeout", value_name = "DURATION", help_heading = "Performance")]
    pub timeout: Option<String>,

    /// Use specific config file instead of automatic discovery
    #[arg(long = "config", value_name = "FILE", help_heading = "Configuration")]
    pub config: Option<String>,

    /// Print the effective settings and exit
    #[arg(long = "list-defaults", help_heading = "Configuration")]
    pub list_defaults: bool,

    /// Show debug-level logs
    #[arg(long = "debug", help_heading = "Configuration")]
    pub debug: bool,

    /// Verbose logging
    #[arg(short = 'v', long = "verbose", help_heading = "Configuration")]
    pub verbose: bool,
}

/// How the final report is rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum OutputFormat {
    Text,
    Json,
    Csv,
}

impl OutputFormat {
    fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "text" => Some(Self::Text),
            "json" => Some(Self::Json),
            "csv" => Some(Self::Csv),
            _ => None,
        }
    }
}

/// Settings after CLI, environment and config files have been merged
#[derive(Debug, Clone)]
pub(crate) struct RunSettings {
    pub(crate) scan: ScanConfig,
    pub(crate) ports: String,
    pub(crate) wordlist: String,
    pub(crate) format: OutputFormat,
}

impl Default for RunSettings {
    fn default() -> Self {
        Self {
            scan: ScanConfig::default(),
            ports: DEFAULT_PORTS.to_string(),
            wordlist: DEFAULT_WORDLIST.to_string(),
            format: OutputFormat::Text,
        }
    }
}

/// Everything one run found, in display order
#[derive(Debug, Clone, Serialize)]
pub(crate) struct ReconReport {
    pub(crate) target: String,
    pub(crate) port_range: String,
    pub(crate) subdomains: Vec<String>,
    pub(crate) open_ports: Vec<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) subdomain_error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) subdomain_scan_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) port_scan_ms: Option<u64>,
    #[serde(skip)]
    pub(crate) subdomains_scanned: bool,
    #[serde(skip)]
    pub(crate) ports_scanned: bool,
}

impl ReconReport {
    fn new(target: &str, range: PortRange) -> Self {
        Self {
            target: target.to_string(),
            port_range: range.to_string(),
            subdomains: Vec::new(),
            open_ports: Vec::new(),
            subdomain_error: None,
            subdomain_scan_ms: None,
            port_scan_ms: None,
            subdomains_scanned: false,
            ports_scanned: false,
        }
    }

    /// Sort both result lists; the engine returns them in completion order.
    fn sort(&mut self) {
        self.subdomains.sort();
        self.open_ports.sort_unstable();
    }
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    // Validate arguments
    if let Err(e) = validate_args(&args) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }

    init_logging(&args);

    info!("webrecon v{} starting", env!("CARGO_PKG_VERSION"));

    // Handle --list-defaults early
    if args.list_defaults {
        match build_settings(&args) {
            Ok(settings) => print_settings(&settings),
            Err(e) => {
                eprintln!("Error: {}", e);
                process::exit(1);
            }
        }
        return;
    }

    if let Err(e) = run_recon(args).await {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

/// Install the stderr log subscriber.
///
/// `RUST_LOG` wins; otherwise `--debug` and `--verbose` pick the level.
fn init_logging(args: &Args) {
    let level = if args.debug {
        "debug"
    } else if args.verbose {
        "info"
    } else {
        "warn"
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Validate command line arguments
fn validate_args(args: &Args) -> Result<(), String> {
    // --list-defaults is self-contained, skip other validation
    if args.list_defaults {
        return Ok(());
    }

    match &args.domain {
        Some(domain) => validate_target(domain).map_err(|e| e.to_string())?,
        None => return Err("You must specify a target domain with -d/--domain".to_string()),
    }

    // Can't have multiple output formats
    if args.json && args.csv {
        return Err("Cannot specify multiple output formats (--json, --csv)".to_string());
    }

    if args.plain && (args.json || args.csv) {
        return Err("--plain only applies to text output".to_string());
    }

    if let Some(concurrency) = args.concurrency {
        if concurrency == 0 || concurrency > MAX_PORT_CONCURRENCY {
            return Err(format!(
                "Concurrency must be between 1 and {}",
                MAX_PORT_CONCURRENCY
            ));
        }
    }

    if let Some(workers) = args.workers {
        if workers == 0 || workers > MAX_RESOLVER_WORKERS {
            return Err(format!(
                "Workers must be between 1 and {}",
                MAX_RESOLVER_WORKERS
            ));
        }
    }

    if let Some(timeout) = &args.timeout {
        if parse_timeout_string(timeout).is_none() {
            return Err(format!(
                "Invalid timeout '{}'. Use format like '500ms', '1s', '2m'",
                timeout
            ));
        }
    }

    if args.skip_subdomains && args.skip_ports {
        return Err("Nothing to do: both --skip-subdomains and --skip-ports given".to_string());
    }

    Ok(())
}

/// Build run settings from CLI arguments with config file integration.
///
/// Precedence order (highest to lowest):
/// 1. CLI arguments (explicit user input)
/// 2. Environment variables (WEBRECON_*)
/// 3. Explicit config file (--config or WEBRECON_CONFIG)
/// 4. Local config file (./webrecon.toml or ./.webrecon.toml)
/// 5. Global config file (~/.webrecon.toml)
/// 6. XDG config file (~/.config/webrecon/config.toml)
/// 7. Built-in defaults
fn build_settings(args: &Args) -> Result<RunSettings, Box<dyn std::error::Error>> {
    let config_manager = ConfigManager::new(args.verbose);
    let env_config = load_env_config(args.verbose);

    // Step 1: Determine config file path and load config files
    let file_config = if let Some(explicit_config_path) = &args.config {
        info!("Using explicit config file (CLI --config): {}", explicit_config_path);
        config_manager
            .load_file(explicit_config_path)
            .map_err(|e| format!("Failed to load config file '{}': {}", explicit_config_path, e))?
    } else if let Some(env_config_path) = &env_config.config {
        info!("Using explicit config file (WEBRECON_CONFIG env var): {}", env_config_path);
        config_manager
            .load_file(env_config_path)
            .map_err(|e| format!("Failed to load config file '{}': {}", env_config_path, e))?
    } else {
        debug!("Discovering config files");
        config_manager.discover_and_load().unwrap_or_else(|e| {
            warn!("Config discovery warning: {}", e);
            FileConfig::default()
        })
    };

    // Steps 2 and 3: environment, then CLI
    let settings = merge_file_config(RunSettings::default(), file_config);
    let settings = apply_environment_config(settings, &env_config);
    apply_cli_args(settings, args)
}

/// Merge FileConfig into RunSettings
fn merge_file_config(mut settings: RunSettings, file_config: FileConfig) -> RunSettings {
    if let Some(defaults) = file_config.defaults {
        if let Some(ports) = defaults.ports {
            settings.ports = ports;
        }
        if let Some(wordlist) = defaults.wordlist {
            settings.wordlist = wordlist;
        }
        if let Some(concurrency) = defaults.concurrency {
            settings.scan = settings.scan.with_port_concurrency(concurrency);
        }
        if let Some(workers) = defaults.workers {
            settings.scan = settings.scan.with_resolver_workers(workers);
        }
        if let Some(timeout) = defaults.timeout.as_deref().and_then(parse_timeout_string) {
            settings.scan = settings.scan.with_connect_timeout(timeout);
        }
    }

    if let Some(format) = file_config
        .output
        .and_then(|o| o.default_format)
        .as_deref()
        .and_then(OutputFormat::from_name)
    {
        settings.format = format;
    }

    settings
}

/// Apply WEBRECON_* environment variables to settings.
fn apply_environment_config(mut settings: RunSettings, env_config: &EnvConfig) -> RunSettings {
    if env_config.has_output_format_conflict() {
        warn!(
            "Both WEBRECON_JSON and WEBRECON_CSV are set, using JSON unless CLI args say otherwise"
        );
    }

    if let Some(ports) = &env_config.ports {
        settings.ports = ports.clone();
    }
    if let Some(wordlist) = &env_config.wordlist {
        settings.wordlist = wordlist.clone();
    }
    if let Some(concurrency) = env_config.concurrency {
        settings.scan = settings.scan.with_port_concurrency(concurrency);
    }
    if let Some(workers) = env_config.workers {
        settings.scan = settings.scan.with_resolver_workers(workers);
    }
    if let Some(timeout) = env_config.timeout.as_deref().and_then(parse_timeout_string) {
        settings.scan = settings.scan.with_connect_timeout(timeout);
    }

    if env_config.json == Some(true) {
        settings.format = OutputFormat::Json;
    } else if env_config.csv == Some(true) {
        settings.format = OutputFormat::Csv;
    }

    settings
}

/// Apply CLI arguments to settings (highest precedence).
fn apply_cli_args(
    mut settings: RunSettings,
    args: &Args,
) -> Result<RunSettings, Box<dyn std::error::Error>> {
    if let Some(ports) = &args.ports {
        settings.ports = ports.clone();
    }
    if let Some(wordlist) = &args.wordlist {
        settings.wordlist = wordlist.clone();
    }
    if let Some(concurrency) = args.concurrency {
        settings.scan = settings.scan.with_port_concurrency(concurrency);
    }
    if let Some(workers) = args.workers {
        settings.scan = settings.scan.with_resolver_workers(workers);
    }
    if let Some(timeout) = &args.timeout {
        let timeout = parse_timeout_string(timeout)
            .ok_or_else(|| format!("Invalid timeout '{}'", timeout))?;
        settings.scan = settings.scan.with_connect_timeout(timeout);
    }

    // Only explicit flags override; --plain forces text
    if args.json {
        settings.format = OutputFormat::Json;
    } else if args.csv {
        settings.format = OutputFormat::Csv;
    } else if args.plain {
        settings.format = OutputFormat::Text;
    }

    Ok(settings)
}

/// Resolve the configured port range, falling back to the default on bad input.
fn resolve_port_range(ports: &str) -> PortRange {
    try_parse_port_range(ports).unwrap_or_else(|| {
        let fallback = PortRange::default();
        warn!("Invalid port range '{}', using {}", ports, fallback);
        fallback
    })
}

/// Print the effective settings for --list-defaults.
fn print_settings(settings: &RunSettings) {
    println!("ports        = {}", resolve_port_range(&settings.ports));
    println!("wordlist     = {}", settings.wordlist);
    println!(
        "concurrency  = {} (built-in {})",
        settings.scan.port_concurrency, DEFAULT_PORT_CONCURRENCY
    );
    println!(
        "workers      = {} (built-in {})",
        settings.scan.resolver_workers, DEFAULT_RESOLVER_WORKERS
    );
    println!("timeout      = {}ms", settings.scan.connect_timeout.as_millis());
    println!("format       = {:?}", settings.format);
}

/// Main recon logic: subdomains first, then ports on the bare domain.
async fn run_recon(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let settings = build_settings(&args)?;
    let domain = args
        .domain
        .as_deref()
        .ok_or("You must specify a target domain with -d/--domain")?;

    let range = resolve_port_range(&settings.ports);
    let scanner = ReconScanner::with_config(settings.scan.clone());
    let styled = settings.format == OutputFormat::Text && !args.plain;

    debug!(?settings, "effective settings");

    if styled {
        ui::print_header(domain, &range, &settings);
    }

    let mut report = ReconReport::new(domain, range);

    if !args.skip_subdomains {
        let spinner = spinner_if(styled, format!("Resolving subdomains of {}...", domain));
        let start_time = Instant::now();

        let outcome = scanner.scan_subdomains(domain, &settings.wordlist).await;

        report.subdomain_scan_ms = Some(elapsed_ms(start_time));
        report.subdomains_scanned = true;
        if let Some(s) = spinner {
            s.stop().await;
        }

        match outcome {
            Ok(found) => report.subdomains = found,
            Err(e) => {
                // Missing wordlist only disables this phase
                eprintln!("Error: {}", e);
                report.subdomain_error = Some(e.to_string());
            }
        }
    }

    if !args.skip_ports {
        let spinner = spinner_if(
            styled,
            format!("Probing {} ports on {}...", range.len(), domain),
        );
        let start_time = Instant::now();

        let results = scanner.scan_port_range(domain, range).await;

        report.port_scan_ms = Some(elapsed_ms(start_time));
        report.ports_scanned = true;
        if let Some(s) = spinner {
            s.stop().await;
        }

        report.open_ports = results.into_iter().map(|r| r.port).collect();
    }

    report.sort();
    display_report(&report, settings.format, styled)?;

    Ok(())
}

fn spinner_if(enabled: bool, message: String) -> Option<ui::Spinner> {
    if enabled {
        ui::Spinner::start(message)
    } else {
        None
    }
}

fn display_report(
    report: &ReconReport,
    format: OutputFormat,
    styled: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(report)?),
        OutputFormat::Csv => print!("{}", format_csv(report)),
        OutputFormat::Text if styled => ui::print_report(report),
        OutputFormat::Text => print!("{}", format_plain(report)),
    }

    Ok(())
}

/// Render the report as CSV rows of `kind,value`.
fn format_csv(report: &ReconReport) -> String {
    let mut out = String::from("kind,value\n");
    for subdomain in &report.subdomains {
        out.push_str(&format!("subdomain,{}\n", subdomain));
    }
    for port in &report.open_ports {
        out.push_str(&format!("port,{}\n", port));
    }
    out
}

/// Render the report as unstyled text suitable for piping.
fn format_plain(report: &ReconReport) -> String {
    let mut lines = vec![format!("[+] Recon target: {}", report.target)];

    if report.subdomains_scanned {
        lines.push(String::new());
        if report.subdomains.is_empty() {
            lines.push("[-] No subdomains found.".to_string());
        } else {
            lines.push(format!("[+] Found {} subdomains:", report.subdomains.len()));
            lines.extend(report.subdomains.iter().map(|s| format!("  - {}", s)));
        }
    }

    if report.ports_scanned {
        lines.push(String::new());
        if report.open_ports.is_empty() {
            lines.push(format!(
                "[-] No open ports found in range {}.",
                report.port_range
            ));
        } else {
            lines.push("[+] Open ports:".to_string());
            lines.extend(report.open_ports.iter().map(|p| format!("  - TCP/{}", p)));
        }
    }

    lines.push(String::new());
    lines.push("[+] Recon complete.".to_string());

    let mut out = lines.join("\n");
    out.push('\n');
    out
}

/// Total wall time spent across both phases.
pub(crate) fn total_duration(report: &ReconReport) -> Duration {
    let ms = report
        .subdomain_scan_ms
        .unwrap_or(0)
        .saturating_add(report.port_scan_ms.unwrap_or(0));
    Duration::from_millis(ms)
}

fn elapsed_ms(start_time: Instant) -> u64 {
    u64::try_from(start_time.elapsed().as_millis()).unwrap_or(u64::MAX)
}
