//! Styled display logic for the webrecon CLI.
//!
//! This module handles the default text output: header, spinner animation,
//! result sections and the summary bar. Uses only the `console` crate.

use console::{measure_text_width, pad_str, style, Alignment, Term};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use webrecon_lib::PortRange;

use crate::{total_duration, ReconReport, RunSettings};

// ── Spinner ──────────────────────────────────────────────────────────────────

const SPINNER_FRAMES: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// An async braille-dot spinner that writes to stderr so stdout stays clean.
pub struct Spinner {
    running: Arc<AtomicBool>,
    handle: Option<tokio::task::JoinHandle<()>>,
}

impl Spinner {
    /// Start a spinner with the given message.
    ///
    /// Returns `None` if stderr is not a terminal.
    pub fn start(message: String) -> Option<Self> {
        if !Term::stderr().is_term() {
            return None;
        }

        let running = Arc::new(AtomicBool::new(true));
        let running_clone = running.clone();

        let handle = tokio::spawn(async move {
            let term = Term::stderr();
            let mut idx = 0usize;
            while running_clone.load(Ordering::Relaxed) {
                let frame = SPINNER_FRAMES[idx % SPINNER_FRAMES.len()];
                let _ = term.clear_line();
                let _ = term.write_str(&format!("{} {}", style(frame).cyan(), message));
                idx += 1;
                tokio::time::sleep(Duration::from_millis(80)).await;
            }
            let _ = term.clear_line();
        });

        Some(Self {
            running,
            handle: Some(handle),
        })
    }

    /// Stop the spinner and clear the line.
    pub async fn stop(mut self) {
        self.running.store(false, Ordering::Relaxed);
        if let Some(h) = self.handle.take() {
            let _ = h.await;
        }
    }
}

// ── Header ───────────────────────────────────────────────────────────────────

/// Print a styled header at the start of a run.
pub fn print_header(target: &str, range: &PortRange, settings: &RunSettings) {
    println!(
        "{} {} {}",
        style("webrecon").bold(),
        style(format!("v{}", env!("CARGO_PKG_VERSION"))).dim(),
        style(format!("· Recon for {}", target)).dim(),
    );

    let meta_parts = [
        format!("Ports: {}", range),
        format!("Wordlist: {}", settings.wordlist),
        format!("Concurrency: {}", settings.scan.port_concurrency),
        format!("Workers: {}", settings.scan.resolver_workers),
    ];

    println!("{}", style(meta_parts.join(" | ")).dim());
    println!();
}

// ── Result sections ──────────────────────────────────────────────────────────

/// Print every scanned section followed by the summary bar.
pub fn print_report(report: &ReconReport) {
    if report.subdomains_scanned {
        print_subdomains(report);
    }
    if report.ports_scanned {
        print_ports(report);
    }
    print_summary(report);
}

/// Pad a section title with a rule so the line is `width` columns wide.
fn section_rule(title: String, width: usize) -> String {
    let fill = width.saturating_sub(measure_text_width(&title) + 1);
    format!("{} {}", title, "─".repeat(fill))
}

/// Fixed-width `TCP/<port>` column.
fn port_label(port: u16) -> String {
    let text = format!("TCP/{}", port);
    pad_str(&text, 12, Alignment::Left, None).into_owned()
}

/// Print resolved subdomains, or why the section is empty.
fn print_subdomains(report: &ReconReport) {
    println!(
        "  {}",
        style(section_rule(
            format!("── Subdomains ({}) ", report.subdomains.len()),
            52
        ))
        .green()
        .bold(),
    );

    if let Some(error) = &report.subdomain_error {
        println!("    {}", style(format!("skipped: {}", error)).yellow());
    } else if report.subdomains.is_empty() {
        println!("    {}", style("none found").dim());
    } else {
        for subdomain in &report.subdomains {
            println!("    {}", style(subdomain).white());
        }
    }
    println!();
}

/// Print open ports, one per line.
fn print_ports(report: &ReconReport) {
    println!(
        "  {}",
        style(section_rule(
            format!("── Open ports ({}) ", report.open_ports.len()),
            52
        ))
        .cyan()
        .bold(),
    );

    if report.open_ports.is_empty() {
        println!(
            "    {}",
            style(format!("none in range {}", report.port_range)).dim()
        );
    } else {
        for port in &report.open_ports {
            println!(
                "    {}{}",
                style(port_label(*port)).white(),
                style("open").green().bold()
            );
        }
    }
    println!();
}

// ── Summary ──────────────────────────────────────────────────────────────────

/// Print the final summary bar with colored counts.
fn print_summary(report: &ReconReport) {
    println!(
        "  {}",
        style("────────────────────────────────────────────────────").dim()
    );
    println!(
        "  {} in {:.1}s  {}  {}  {}  {}",
        style(&report.target).bold(),
        total_duration(report).as_secs_f64(),
        style("|").dim(),
        style(plural(report.subdomains.len(), "subdomain")).green(),
        style("|").dim(),
        style(plural(report.open_ports.len(), "open port")).cyan(),
    );
}

// ── Helpers ──────────────────────────────────────────────────────────────────

fn plural(count: usize, noun: &str) -> String {
    format!("{} {}{}", count, noun, if count == 1 { "" } else { "s" })
}

// ── Tests ────────────────────────────────────────────────────────────────────
