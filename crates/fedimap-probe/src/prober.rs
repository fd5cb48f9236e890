//! Debounced, generation-guarded pair probing.

use std::sync::Arc;
use std::time::Duration;

use fedimap_util::{Generation, ResettableTask};
use futures::future::join_all;
use tokio::sync::mpsc;
use tracing::debug;

use crate::{ConnectivityEdge, DirectionResult, ProbeError, ProbeTransport};

/// Tunables for the prober.
#[derive(Debug, Clone)]
pub struct ProberConfig {
    /// Quiet period after a viewpoint edit before probing starts.
    pub debounce: Duration,
    /// Deadline per directional probe.
    pub timeout: Duration,
}

impl Default for ProberConfig {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(300),
            timeout: Duration::from_secs(5),
        }
    }
}

/// One completed probe run over a viewpoint set.
#[derive(Debug, Clone)]
pub struct ProbeReport {
    /// Generation of the viewpoint set this run probed.
    pub generation: u64,
    /// One classified edge per unordered viewpoint pair.
    pub edges: Vec<ConnectivityEdge>,
}

/// Probes all unordered viewpoint pairs whenever the set changes.
///
/// Rapid successive edits are debounced; each edit bumps the generation, and
/// a run whose generation went stale between start and finish is discarded
/// without publishing. All pairs (and both directions of each pair) are in
/// flight concurrently, so total latency is bounded by the slowest single
/// probe.
pub struct ConnectivityProber {
    transport: Arc<dyn ProbeTransport>,
    config: ProberConfig,
    generation: Generation,
    debounce: ResettableTask,
    report_tx: mpsc::UnboundedSender<ProbeReport>,
}

impl ConnectivityProber {
    /// Create a prober and the channel its reports arrive on.
    pub fn new(
        transport: Arc<dyn ProbeTransport>,
        config: ProberConfig,
    ) -> (Self, mpsc::UnboundedReceiver<ProbeReport>) {
        let (report_tx, report_rx) = mpsc::unbounded_channel();
        let prober = Self {
            transport,
            config,
            generation: Generation::new(),
            debounce: ResettableTask::new(),
            report_tx,
        };
        (prober, report_rx)
    }

    /// The generation counter shared with consumers of the reports.
    pub fn generation(&self) -> &Generation {
        &self.generation
    }

    /// Schedule a probe run for a new viewpoint set.
    ///
    /// Replaces any pending debounce timer; the run only starts after the
    /// quiet period and only publishes if no newer set arrived meanwhile.
    pub fn set_viewpoints(&mut self, viewpoints: Vec<String>) {
        let snapshot = self.generation.bump();
        let generation = self.generation.clone();
        let transport = Arc::clone(&self.transport);
        let timeout = self.config.timeout;
        let report_tx = self.report_tx.clone();

        self.debounce.arm_after(self.config.debounce, async move {
            if !generation.is_current(snapshot) {
                return;
            }
            let edges = probe_all_pairs(&transport, &viewpoints, timeout).await;
            if !generation.is_current(snapshot) {
                debug!(generation = snapshot, "discarding stale probe run");
                return;
            }
            let _ = report_tx.send(ProbeReport {
                generation: snapshot,
                edges,
            });
        });
    }

    /// Cancel pending and in-flight work. Nothing publishes after this.
    pub fn shutdown(&mut self) {
        self.generation.bump();
        self.debounce.cancel();
    }
}

impl Drop for ConnectivityProber {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Probe both directions of one pair concurrently.
pub async fn probe_pair(
    transport: &Arc<dyn ProbeTransport>,
    source: &str,
    target: &str,
    timeout: Duration,
) -> ConnectivityEdge {
    let (forward, backward) = tokio::join!(
        probe_direction(transport, source, target, timeout),
        probe_direction(transport, target, source, timeout),
    );
    ConnectivityEdge::from_directions(source, target, forward, backward)
}

async fn probe_direction(
    transport: &Arc<dyn ProbeTransport>,
    source: &str,
    target: &str,
    timeout: Duration,
) -> DirectionResult {
    match tokio::time::timeout(timeout, transport.probe(source, target)).await {
        Ok(Ok(result)) => result,
        Ok(Err(error)) => DirectionResult::failed(error),
        // An elapsed deadline is TIMEOUT, never CONNECTION_FAILED.
        Err(_) => DirectionResult::failed(ProbeError::Timeout),
    }
}

async fn probe_all_pairs(
    transport: &Arc<dyn ProbeTransport>,
    viewpoints: &[String],
    timeout: Duration,
) -> Vec<ConnectivityEdge> {
    let mut runs = Vec::new();
    for (i, source) in viewpoints.iter().enumerate() {
        for target in &viewpoints[i + 1..] {
            runs.push(probe_pair(transport, source, target, timeout));
        }
    }
    debug!(pairs = runs.len(), "probing viewpoint pairs");
    join_all(runs).await
}
