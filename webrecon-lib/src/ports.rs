//! Bounded-parallelism TCP port prober.
//!
//! Every port in the range becomes its own spawned probe task. The dispatcher
//! takes a slot from the [`AdmissionGate`] before spawning, and the task holds
//! that slot until it finishes, so no more than `port_concurrency` connection
//! attempts are ever in flight.

use crate::concurrent::{AdmissionGate, ResultSink};
use crate::net::Connector;
use crate::types::{PortResult, ProbeTarget, ScanConfig};
use std::sync::Arc;
use std::time::Instant;
use tokio::task::{JoinError, JoinSet};
use tracing::{debug, warn};

/// Probe every port in `start..=end` on `host` and return the open ones.
///
/// Closed, filtered and unreachable ports are absent from the result; a host
/// that refuses everything yields an empty vector. Port 0 is never probed and
/// a reversed range probes nothing. Result order is unspecified.
pub async fn scan_ports(
    host: &str,
    start: u16,
    end: u16,
    config: &ScanConfig,
    connector: Arc<dyn Connector>,
) -> Vec<PortResult> {
    let start = start.max(1);
    if start > end {
        debug!(host, start, end, "empty port range, nothing to probe");
        return Vec::new();
    }

    let gate = AdmissionGate::new(config.port_concurrency);
    let open: ResultSink<Vec<PortResult>> = ResultSink::new();
    let mut probes = JoinSet::new();
    let started = Instant::now();

    debug!(
        host,
        start,
        end,
        concurrency = gate.capacity(),
        timeout = ?config.connect_timeout,
        "starting port scan"
    );

    for port in start..=end {
        let permit = match gate.admit().await {
            Ok(permit) => permit,
            Err(e) => {
                warn!(error = %e, "stopping port dispatch");
                break;
            }
        };

        let target = ProbeTarget::new(host, port);
        let connector = Arc::clone(&connector);
        let open = open.clone();
        let limit = config.connect_timeout;

        probes.spawn(async move {
            let _permit = permit;
            if connector.connect(&target, limit).await.is_ok() {
                open.record(PortResult::open(target.port));
            }
        });

        // Reap finished probes so the set stays proportional to the gate size
        while let Some(joined) = probes.try_join_next() {
            report_join(joined);
        }
    }

    while let Some(joined) = probes.join_next().await {
        report_join(joined);
    }
    debug_assert_eq!(gate.available(), gate.capacity());

    let results = open.take();
    debug!(
        host,
        open = results.len(),
        elapsed = ?started.elapsed(),
        "port scan finished"
    );
    results
}

fn report_join(joined: Result<(), JoinError>) {
    if let Err(e) = joined {
        warn!(error = %e, "probe task did not complete");
    }
}
