//! Producer/consumer subdomain resolver.
//!
//! Three stages joined by two channels:
//!
//! 1. the calling task reads the wordlist and feeds labels into the jobs channel
//! 2. a fixed pool of resolver workers turns labels into FQDNs and looks them up
//! 3. a collector task inserts every resolved FQDN into a deduplication set
//!
//! Shutdown runs strictly in order: jobs sender dropped, worker pool joined,
//! results channel closed (the workers held its last senders), collector
//! joined, set read out.

use crate::concurrent::{JobQueue, ResultSink};
use crate::error::ReconError;
use crate::net::HostResolver;
use crate::types::ScanConfig;
use crate::utils::{build_fqdn, candidate_label};
use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tokio::fs::File;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tracing::{debug, warn};

/// Open a wordlist for reading.
///
/// Fails with [`ReconError::SourceUnavailable`] if the path does not exist,
/// is not readable, or is a directory.
pub async fn open_wordlist(path: &Path) -> Result<BufReader<File>, ReconError> {
    let unavailable =
        |message: String| ReconError::source_unavailable(path.display().to_string(), message);

    let file = File::open(path).await.map_err(|e| unavailable(e.to_string()))?;
    let metadata = file.metadata().await.map_err(|e| unavailable(e.to_string()))?;
    if metadata.is_dir() {
        return Err(unavailable("path is a directory".to_string()));
    }

    Ok(BufReader::new(file))
}

/// Resolve every candidate label from `source` under `domain`.
///
/// Returns each FQDN that resolved to at least one address exactly once, in
/// no particular order. Lookup failures are dropped silently.
pub async fn resolve_candidates<R>(
    domain: &str,
    source: R,
    config: &ScanConfig,
    resolver: Arc<dyn HostResolver>,
) -> Vec<String>
where
    R: AsyncBufRead + Unpin,
{
    let workers = config.resolver_workers.max(1);
    let started = Instant::now();

    let (jobs_tx, jobs) = JobQueue::<String>::channel(workers);
    let (results_tx, mut results_rx) = mpsc::channel::<String>(workers);
    let found: ResultSink<HashSet<String>> = ResultSink::new();

    debug!(domain, workers, "starting subdomain resolution");

    let collector = {
        let found = found.clone();
        tokio::spawn(async move {
            while let Some(fqdn) = results_rx.recv().await {
                found.record(fqdn);
            }
        })
    };

    let mut pool = JoinSet::new();
    for _ in 0..workers {
        let jobs = jobs.clone();
        let results = results_tx.clone();
        let resolver = Arc::clone(&resolver);
        let domain = domain.to_string();

        pool.spawn(async move {
            while let Some(label) = jobs.next().await {
                let fqdn = build_fqdn(&label, &domain);
                match resolver.resolve(&fqdn).await {
                    Ok(addrs) if !addrs.is_empty() => {
                        if results.send(fqdn).await.is_err() {
                            break;
                        }
                    }
                    _ => {}
                }
            }
        });
    }

    // From here on only the workers hold result senders
    drop(results_tx);
    drop(jobs);

    let queued = feed_jobs(source, &jobs_tx).await;
    drop(jobs_tx);

    while let Some(joined) = pool.join_next().await {
        if let Err(e) = joined {
            warn!(error = %e, "resolver worker did not complete");
        }
    }

    if let Err(e) = collector.await {
        warn!(error = %e, "result collector did not complete");
    }

    let resolved: Vec<String> = found.take().into_iter().collect();
    debug!(
        domain,
        candidates = queued,
        resolved = resolved.len(),
        elapsed = ?started.elapsed(),
        "subdomain resolution finished"
    );
    resolved
}

/// Producer stage: push each usable line into the jobs channel.
///
/// Returns the number of labels queued. A read error ends production early.
async fn feed_jobs<R>(source: R, jobs: &mpsc::Sender<String>) -> usize
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = source.lines();
    let mut queued = 0;

    loop {
        match lines.next_line().await {
            Ok(Some(line)) => {
                let Some(label) = candidate_label(&line) else {
                    continue;
                };
                if jobs.send(label.to_string()).await.is_err() {
                    warn!("all resolver workers exited early, stopping wordlist read");
                    break;
                }
                queued += 1;
            }
            Ok(None) => break,
            Err(e) => {
                warn!(error = %e, "failed to read wordlist line, treating as end of input");
                break;
            }
        }
    }

    queued
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::io::Write;
    use std::net::IpAddr;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tempfile::NamedTempFile;

    /// Resolver answering from a static table.
    #[derive(Default)]
    struct StaticResolver {
        table: HashMap<String, Vec<IpAddr>>,
        lookups: AtomicUsize,
    }

    impl StaticResolver {
        fn answer(mut self, name: &str, ips: &[&str]) -> Self {
            let ips = ips.iter().map(|ip| ip.parse().unwrap()).collect();
            self.table.insert(name.to_string(), ips);
            self
        }
    }

    #[async_trait]
    impl HostResolver for StaticResolver {
        async fn resolve(&self, name: &str) -> Result<Vec<IpAddr>, ReconError> {
            self.lookups.fetch_add(1, Ordering::SeqCst);
            match self.table.get(name) {
                Some(ips) => Ok(ips.clone()),
                None => Err(ReconError::resolve_failed(name, "NXDOMAIN")),
            }
        }
    }

    fn sorted(mut names: Vec<String>) -> Vec<String> {
        names.sort();
        names
    }

    #[tokio::test]
    async fn duplicates_collapse_and_misses_drop() {
        let resolver =
            Arc::new(StaticResolver::default().answer("www.example.com", &["93.184.216.34"]));
        let source: &[u8] = b"www\nwww\ndoesnotexist-xyz123\n";

        let found =
            resolve_candidates("example.com", source, &ScanConfig::default(), resolver.clone())
                .await;

        assert_eq!(found, vec!["www.example.com".to_string()]);
        assert_eq!(resolver.lookups.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn multi_address_name_recorded_once() {
        let resolver = Arc::new(
            StaticResolver::default()
                .answer("api.example.com", &["10.0.0.1", "10.0.0.2", "::1"])
                .answer("mail.example.com", &["10.0.0.3"]),
        );
        let source: &[u8] = b"api\nmail\nftp\n";

        let found =
            resolve_candidates("example.com", source, &ScanConfig::default(), resolver).await;

        assert_eq!(
            sorted(found),
            vec!["api.example.com".to_string(), "mail.example.com".to_string()]
        );
    }

    #[tokio::test]
    async fn empty_answer_is_not_a_hit() {
        let resolver = Arc::new(StaticResolver::default().answer("ghost.example.com", &[]));
        let source: &[u8] = b"ghost\n";

        let found =
            resolve_candidates("example.com", source, &ScanConfig::default(), resolver).await;
        assert!(found.is_empty());
    }

    #[tokio::test]
    async fn lines_are_sent_unvalidated_and_empty_ones_skipped() {
        let resolver = Arc::new(
            StaticResolver::default()
                .answer("www.example.com", &["10.1.1.1"])
                .answer("dev.example.com", &["10.1.1.2"]),
        );
        let source: &[u8] = b" www \n#www\n\r\ndev\r\n\n";

        let found =
            resolve_candidates("example.com", source, &ScanConfig::default(), resolver.clone())
                .await;

        // " www " and "#www" are looked up verbatim and miss
        assert_eq!(found, vec!["dev.example.com".to_string()]);
        assert_eq!(resolver.lookups.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn empty_source_yields_empty_result() {
        let resolver = Arc::new(StaticResolver::default());
        let source: &[u8] = b"";

        let found =
            resolve_candidates("example.com", source, &ScanConfig::default(), resolver.clone())
                .await;
        assert!(found.is_empty());
        assert_eq!(resolver.lookups.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn large_wordlist_with_small_pool_drains() {
        let resolver = (0..40).fold(StaticResolver::default(), |resolver, i| {
            resolver.answer(&format!("host{}.example.com", i), &["10.0.0.1"])
        });
        let resolver = Arc::new(resolver);

        let wordlist: String = (0..400).map(|i| format!("host{}\n", i % 40)).collect();
        let config = ScanConfig::default().with_resolver_workers(3);

        let found =
            resolve_candidates("example.com", wordlist.as_bytes(), &config, resolver.clone())
                .await;

        assert_eq!(found.len(), 40);
        assert_eq!(resolver.lookups.load(Ordering::SeqCst), 400);
    }

    #[tokio::test]
    async fn open_wordlist_reports_missing_file() {
        let err = open_wordlist(Path::new("/definitely/not/here/wordlist.txt"))
            .await
            .unwrap_err();
        assert!(err.is_source_unavailable());
    }

    #[tokio::test]
    async fn open_wordlist_rejects_directory() {
        let dir = tempfile::tempdir().unwrap();
        let err = open_wordlist(dir.path()).await.unwrap_err();
        assert!(err.is_source_unavailable());
    }

    #[tokio::test]
    async fn open_wordlist_reads_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "www").unwrap();
        writeln!(file, "www").unwrap();
        file.flush().unwrap();

        let resolver = Arc::new(StaticResolver::default().answer("www.example.org", &["10.0.0.9"]));
        let reader = open_wordlist(file.path()).await.unwrap();
        let found =
            resolve_candidates("example.org", reader, &ScanConfig::default(), resolver).await;

        assert_eq!(found, vec!["www.example.org".to_string()]);
    }
}
