// webrecon-lib/tests/integration.rs

//! Integration tests for webrecon-lib exports and core functionality

use std::collections::HashSet;
use std::io::Write;
use std::time::Duration;
use tempfile::NamedTempFile;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use webrecon_lib::{
    parse_port_range, PortRange, PortResult, ReconError, ReconScanner, ScanConfig,
    DEFAULT_PORT_CONCURRENCY,
};

fn fast_scanner() -> ReconScanner {
    ReconScanner::with_config(
        ScanConfig::default().with_connect_timeout(Duration::from_millis(300)),
    )
}

/// Serve accepts on `listener` until the returned task is aborted.
fn serve(listener: TcpListener) -> JoinHandle<()> {
    tokio::spawn(async move {
        while listener.accept().await.is_ok() {}
    })
}

/// Bind a loopback listener and keep accepting so connects never back up.
async fn accepting_listener() -> (JoinHandle<()>, u16) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    (serve(listener), port)
}

/// A loopback port that was free a moment ago and has nothing listening.
async fn unbound_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap().port()
}

#[test]
fn test_library_exports_work() {
    let range = parse_port_range("20-25");
    assert_eq!(range, PortRange::new(20, 25).unwrap());

    let config = ScanConfig::default();
    assert_eq!(config.port_concurrency, DEFAULT_PORT_CONCURRENCY);

    let info = webrecon_lib::info();
    assert!(!info.version.is_empty());
}

#[tokio::test]
async fn test_loopback_listener_is_found() {
    let (server, port) = accepting_listener().await;

    let start = port.saturating_sub(5).max(1);
    let end = port.saturating_add(5);
    let results = fast_scanner().scan_ports("127.0.0.1", start, end).await;

    let open: HashSet<u16> = results.iter().map(|r| r.port).collect();
    assert!(open.contains(&port), "listener port {} not reported", port);
    assert!(open.iter().all(|p| (start..=end).contains(p)));
    assert!(results.iter().all(|r| r.is_open));

    server.abort();
}

#[tokio::test]
async fn test_refusing_port_yields_empty_result() {
    let port = unbound_port().await;

    let results = fast_scanner().scan_ports("127.0.0.1", port, port).await;
    assert!(results.is_empty(), "closed port {} reported open", port);
}

#[tokio::test]
async fn test_missing_wordlist_is_source_unavailable() {
    let result = fast_scanner()
        .scan_subdomains("example.com", "/no/such/wordlist.txt")
        .await;

    match result {
        Err(ReconError::SourceUnavailable { path, .. }) => {
            assert!(path.contains("wordlist.txt"));
        }
        other => panic!("expected SourceUnavailable, got {:?}", other),
    }
}

#[tokio::test]
async fn test_literal_wordlist_resolves_once() {
    let mut file = NamedTempFile::new().unwrap();
    // "127" + "0.0.1" forms an IP literal, which resolves without DNS
    writeln!(file, "127").unwrap();
    writeln!(file, "127").unwrap();
    file.flush().unwrap();

    let found = fast_scanner()
        .scan_subdomains("0.0.1", file.path())
        .await
        .unwrap();

    assert_eq!(found, vec!["127.0.0.1".to_string()]);
}

#[tokio::test]
#[ignore] // Requires network access
async fn test_real_dns_wordlist() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "www").unwrap();
    writeln!(file, "www").unwrap();
    writeln!(file, "doesnotexist-xyz123").unwrap();
    file.flush().unwrap();

    let found = ReconScanner::new()
        .scan_subdomains("example.com", file.path())
        .await
        .unwrap();

    assert_eq!(found, vec!["www.example.com".to_string()]);
}

#[tokio::test]
async fn test_listener_on_9000_only_open_port_in_window() {
    // The window must be free on the test host; binding proves nothing listens there
    let (Ok(below), Ok(listener), Ok(above)) = (
        TcpListener::bind("127.0.0.1:8999").await,
        TcpListener::bind("127.0.0.1:9000").await,
        TcpListener::bind("127.0.0.1:9001").await,
    ) else {
        return;
    };
    drop(below);
    drop(above);
    let server = serve(listener);

    let results = fast_scanner().scan_ports("127.0.0.1", 8999, 9001).await;
    assert_eq!(results, vec![PortResult::open(9000)]);

    server.abort();
}
