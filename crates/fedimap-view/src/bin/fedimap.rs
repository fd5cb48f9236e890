//! Fedimap Offline Workbench
//!
//! Build a federation map from JSON snapshots and print the render lists.
//!
//! Usage: `fedimap <catalog.json> <observations.json> <viewpoint>...`
//!
//! The catalog file holds an array of server records; the observations file
//! an array of federation observations. Connectivity is answered from the
//! observation snapshot instead of live probes: a direction counts as
//! reachable when the snapshot contains any observation along it.

use std::collections::{HashMap, HashSet};
use std::env;
use std::fs;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use fedimap_graph::{FederationObservation, ServerCatalog, ServerRecord};
use fedimap_probe::{DirectionResult, ProbeError, ProbeTransport};
use fedimap_view::{
    FederationResponse, FederationSource, FetchError, MapSession, SessionConfig,
};
use futures::future::BoxFuture;
use serde::Serialize;

/// Serves federation lists out of the loaded snapshot, grouped by seed.
struct SnapshotSource {
    by_seed: HashMap<String, Vec<FederationObservation>>,
}

impl SnapshotSource {
    fn new(observations: Vec<FederationObservation>) -> Self {
        let mut by_seed: HashMap<String, Vec<FederationObservation>> = HashMap::new();
        for obs in observations {
            by_seed.entry(obs.source_host.clone()).or_default().push(obs);
        }
        Self { by_seed }
    }
}

impl FederationSource for SnapshotSource {
    fn fetch(&self, seed: &str) -> BoxFuture<'static, Result<FederationResponse, FetchError>> {
        let result = match self.by_seed.get(seed) {
            Some(federations) => Ok(FederationResponse {
                federations: federations.clone(),
                authenticated: None,
            }),
            None => Err(FetchError::Failed(format!(
                "snapshot has no observations from {seed}"
            ))),
        };
        Box::pin(async move { result })
    }
}

/// Answers directional probes from the snapshot's directed pairs.
struct SnapshotTransport {
    directions: HashSet<(String, String)>,
}

impl SnapshotTransport {
    fn new(observations: &[FederationObservation]) -> Self {
        let directions = observations
            .iter()
            .map(|obs| (obs.source_host.clone(), obs.target_host.clone()))
            .collect();
        Self { directions }
    }
}

impl ProbeTransport for SnapshotTransport {
    fn probe(
        &self,
        source: &str,
        target: &str,
    ) -> BoxFuture<'static, fedimap_probe::Result<DirectionResult>> {
        let known = self
            .directions
            .contains(&(source.to_string(), target.to_string()));
        Box::pin(async move {
            if known {
                Ok(DirectionResult::ok(0))
            } else {
                Ok(DirectionResult::failed(ProbeError::NotFederated))
            }
        })
    }
}

#[derive(Serialize)]
struct MapOutput<'a> {
    nodes: &'a [fedimap_view::RenderNode],
    edges: &'a [fedimap_view::RenderEdge],
}

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize logging
    tracing_subscriber::fmt::init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 4 {
        eprintln!("usage: fedimap <catalog.json> <observations.json> <viewpoint>...");
        return ExitCode::FAILURE;
    }

    let (catalog, observations) = match load_snapshot(&args[1], &args[2]) {
        Ok(loaded) => loaded,
        Err(error) => {
            eprintln!("failed to load snapshot: {error}");
            return ExitCode::FAILURE;
        }
    };
    let viewpoints: Vec<String> = args[3..].to_vec();

    let transport = Arc::new(SnapshotTransport::new(&observations));
    let source = Arc::new(SnapshotSource::new(observations));
    let (mut session, _channels) =
        MapSession::new(catalog, source, transport, SessionConfig::default());

    session.set_viewpoints(viewpoints);
    session.refresh().await;

    // Let the debounced probe run finish before collecting its report.
    tokio::time::sleep(Duration::from_secs(1)).await;
    session.apply_probe_reports();

    for notice in session.notices() {
        eprintln!("{}: {} ({})", notice.host, notice.message, notice.code);
    }

    let (nodes, edges) = session.render();
    let output = MapOutput {
        nodes: &nodes,
        edges: &edges,
    };
    match serde_json::to_string_pretty(&output) {
        Ok(json) => {
            println!("{json}");
            session.shutdown();
            ExitCode::SUCCESS
        }
        Err(error) => {
            eprintln!("failed to serialize map: {error}");
            ExitCode::FAILURE
        }
    }
}

fn load_snapshot(
    catalog_path: &str,
    observations_path: &str,
) -> fedimap_view::Result<(ServerCatalog, Vec<FederationObservation>)> {
    let catalog_text = fs::read_to_string(catalog_path)?;
    let records: Vec<ServerRecord> = serde_json::from_str(&catalog_text)?;

    let observations_text = fs::read_to_string(observations_path)?;
    let observations: Vec<FederationObservation> = serde_json::from_str(&observations_text)?;

    Ok((ServerCatalog::from_records(records), observations))
}
