//! Utility functions for input parsing and validation.
//!
//! Port-range parsing, wordlist line handling and target validation live here
//! so that both the scanners and the CLI agree on the same rules.

use crate::error::ReconError;
use crate::types::PortRange;
use regex::Regex;

lazy_static::lazy_static! {
    static ref PORT_RANGE_RE: Regex =
        Regex::new(r"^\s*(\d{1,5})\s*-\s*(\d{1,5})\s*$").expect("port range pattern is valid");
}

/// Parse a `start-end` port range string.
///
/// Anything that is not a well-formed range of ports in 1..=65535 with
/// `start <= end` falls back to [`PortRange::default`] (1-1024).
///
/// # Example
///
/// ```rust
/// use webrecon_lib::parse_port_range;
///
/// assert_eq!(parse_port_range("20-25").to_string(), "20-25");
/// assert_eq!(parse_port_range("80,443").to_string(), "1-1024");
/// ```
pub fn parse_port_range(input: &str) -> PortRange {
    try_parse_port_range(input).unwrap_or_default()
}

/// Strict variant of [`parse_port_range`] that reports failure instead of
/// substituting the default range.
pub fn try_parse_port_range(input: &str) -> Option<PortRange> {
    let caps = PORT_RANGE_RE.captures(input)?;
    let start = caps[1].parse::<u16>().ok()?;
    let end = caps[2].parse::<u16>().ok()?;
    PortRange::new(start, end)
}

/// Turn a raw wordlist line into a candidate label.
///
/// Only a trailing carriage return is stripped and only empty lines yield
/// `None`. Anything else is sent as-is; malformed labels fail to resolve.
pub fn candidate_label(line: &str) -> Option<&str> {
    let label = line.strip_suffix('\r').unwrap_or(line);
    (!label.is_empty()).then_some(label)
}

/// Join a label and the target domain into `<label>.<domain>`.
pub fn build_fqdn(label: &str, domain: &str) -> String {
    let label = label.trim_end_matches('.');
    let domain = domain.trim_start_matches('.');
    format!("{}.{}", label, domain)
}

/// Basic sanity check for a target domain or host.
///
/// This only rejects input that can never be dialed or resolved; anything
/// else is left for the network layer to accept or refuse.
pub fn validate_target(target: &str) -> Result<(), ReconError> {
    let target = target.trim();

    if target.is_empty() {
        return Err(ReconError::invalid_target(target, "Target cannot be empty"));
    }

    if target.len() > 253 {
        return Err(ReconError::invalid_target(
            target,
            "Target exceeds 253 characters",
        ));
    }

    if target.chars().any(|c| c.is_whitespace() || c == '/') {
        return Err(ReconError::invalid_target(
            target,
            "Target must be a bare host name or IP address",
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_port_range_valid() {
        assert_eq!(parse_port_range("8999-9001"), PortRange::new(8999, 9001).unwrap());
        assert_eq!(parse_port_range(" 22 - 80 "), PortRange::new(22, 80).unwrap());
        assert_eq!(parse_port_range("443-443"), PortRange::new(443, 443).unwrap());
        assert_eq!(parse_port_range("1-65535"), PortRange::new(1, 65535).unwrap());
    }

    #[test]
    fn test_parse_port_range_fallback() {
        let default = PortRange::default();
        assert_eq!(parse_port_range(""), default);
        assert_eq!(parse_port_range("80"), default);
        assert_eq!(parse_port_range("80,443"), default);
        assert_eq!(parse_port_range("a-b"), default);
        assert_eq!(parse_port_range("1-2-3"), default);
        assert_eq!(parse_port_range("0-100"), default);
        assert_eq!(parse_port_range("100-20"), default);
        assert_eq!(parse_port_range("1-70000"), default);
        assert_eq!(parse_port_range("-5-10"), default);
    }

    #[test]
    fn test_try_parse_port_range() {
        assert!(try_parse_port_range("10-20").is_some());
        assert!(try_parse_port_range("20-10").is_none());
        assert!(try_parse_port_range("junk").is_none());
    }

    #[test]
    fn test_candidate_label() {
        assert_eq!(candidate_label("www"), Some("www"));
        assert_eq!(candidate_label("mail\r"), Some("mail"));
        assert_eq!(candidate_label(""), None);
        assert_eq!(candidate_label("\r"), None);
        assert_eq!(candidate_label(" www "), Some(" www "));
        assert_eq!(candidate_label("#www"), Some("#www"));
        // Not validated: malformed labels are left for the resolver to reject
        assert_eq!(candidate_label("bad_label!"), Some("bad_label!"));
    }

    #[test]
    fn test_build_fqdn() {
        assert_eq!(build_fqdn("www", "example.com"), "www.example.com");
        assert_eq!(build_fqdn("api.", ".example.com"), "api.example.com");
        assert_eq!(build_fqdn("a.b", "example.com"), "a.b.example.com");
    }

    #[test]
    fn test_validate_target() {
        assert!(validate_target("example.com").is_ok());
        assert!(validate_target("127.0.0.1").is_ok());
        assert!(validate_target("localhost").is_ok());
        assert!(validate_target("").is_err());
        assert!(validate_target("   ").is_err());
        assert!(validate_target("http://example.com").is_err());
        assert!(validate_target("two words").is_err());
        assert!(validate_target(&"a".repeat(254)).is_err());
    }
}
