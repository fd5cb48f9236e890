//! The map session: owner of the live graph model.
//!
//! All producers (rebuilds, probe-edge injection, interaction styling) go
//! through this type. Updates are last-writer-wins per logical field, and
//! every async completion is fenced by a generation so two rebuilds can
//! never interleave into the model.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;

use fedimap_graph::{
    build_graph_model, normalize_observations, FederationObservation, GraphModel, ModelInput,
    ServerCatalog,
};
use fedimap_interact::{
    FocusController, FocusEvent, InertiaConfig, PanController, SelectionMachine, FOCUS_DURATION,
};
use fedimap_probe::{
    ConnectivityEdge, ConnectivityProber, ProbeReport, ProbeTransport, ProberConfig,
};
use fedimap_util::Generation;
use futures::future::join_all;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::render::{render_model, RenderBackend, RenderEdge, RenderNode};
use crate::{FederationSource, FetchError};

/// Session tunables.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// The logged-in user's home server, if any.
    pub home_host: Option<String>,
    /// Prober debounce and timeout.
    pub prober: ProberConfig,
    /// Pan inertia feel.
    pub inertia: InertiaConfig,
    /// Focus highlight duration.
    pub focus_duration: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            home_host: None,
            prober: ProberConfig::default(),
            inertia: InertiaConfig::default(),
            focus_duration: FOCUS_DURATION,
        }
    }
}

/// A dismissable user-facing notice. Never blocks rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    /// The viewpoint the notice is about.
    pub host: String,
    /// Machine-readable code (`CREDENTIAL_REQUIRED`, `FETCH_FAILED`, ...).
    pub code: &'static str,
    /// Human-readable message.
    pub message: String,
}

/// Receivers for the session's interaction side effects.
pub struct SessionChannels {
    /// Focus highlight apply/clear effects.
    pub focus_events: mpsc::UnboundedReceiver<FocusEvent>,
    /// Inertial pan deltas after a drag release.
    pub pan_deltas: mpsc::UnboundedReceiver<(f64, f64)>,
}

/// The live map session.
pub struct MapSession {
    source: Arc<dyn FederationSource>,
    catalog: ServerCatalog,
    viewpoints: Vec<String>,
    observations: HashMap<String, Vec<FederationObservation>>,
    private_hosts: HashSet<String>,
    home_host: Option<String>,
    notices: Vec<Notice>,
    model: GraphModel,
    connectivity: Vec<ConnectivityEdge>,
    rebuild_generation: Generation,
    prober: ConnectivityProber,
    probe_reports: mpsc::UnboundedReceiver<ProbeReport>,
    selection: SelectionMachine,
    focus: FocusController,
    pan: PanController,
}

impl MapSession {
    /// Create a session over the given boundaries.
    pub fn new(
        catalog: ServerCatalog,
        source: Arc<dyn FederationSource>,
        probe_transport: Arc<dyn ProbeTransport>,
        config: SessionConfig,
    ) -> (Self, SessionChannels) {
        let (prober, probe_reports) = ConnectivityProber::new(probe_transport, config.prober);
        let (focus, focus_events) = FocusController::new(config.focus_duration);
        let (pan, pan_deltas) = PanController::new(config.inertia);

        let session = Self {
            source,
            catalog,
            viewpoints: Vec::new(),
            observations: HashMap::new(),
            private_hosts: HashSet::new(),
            home_host: config.home_host,
            notices: Vec::new(),
            model: GraphModel::default(),
            connectivity: Vec::new(),
            rebuild_generation: Generation::new(),
            prober,
            probe_reports,
            selection: SelectionMachine::new(),
            focus,
            pan,
        };
        (
            session,
            SessionChannels {
                focus_events,
                pan_deltas,
            },
        )
    }

    /// Current viewpoint hosts.
    pub fn viewpoints(&self) -> &[String] {
        &self.viewpoints
    }

    /// The live graph model.
    pub fn model(&self) -> &GraphModel {
        &self.model
    }

    /// Current connectivity edges.
    pub fn connectivity(&self) -> &[ConnectivityEdge] {
        &self.connectivity
    }

    /// Pending notices, oldest first.
    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    /// Dismiss a notice by index.
    pub fn dismiss_notice(&mut self, index: usize) -> Option<Notice> {
        (index < self.notices.len()).then(|| self.notices.remove(index))
    }

    /// The selection state machine.
    pub fn selection(&mut self) -> &mut SelectionMachine {
        &mut self.selection
    }

    /// The pan/inertia controller.
    pub fn pan(&mut self) -> &mut PanController {
        &mut self.pan
    }

    /// Programmatically focus a host (search result, deep link).
    pub fn focus(&mut self, host: &str) {
        self.focus.focus(host);
    }

    /// Replace the viewpoint set.
    ///
    /// Node flags mutate in place (no rebuild); connectivity results for the
    /// old set are dropped and a new probe run is scheduled. Observations
    /// for newly added viewpoints arrive with the next [`MapSession::refresh`].
    pub fn set_viewpoints(&mut self, hosts: Vec<String>) {
        info!(viewpoints = hosts.len(), "viewpoint set changed");
        self.viewpoints = hosts;
        let viewpoint_set: HashSet<String> = self.viewpoints.iter().cloned().collect();
        self.model.set_viewpoints(&viewpoint_set);
        self.connectivity.clear();
        self.prober.set_viewpoints(self.viewpoints.clone());
    }

    /// Replace the server catalog wholesale and rebuild.
    pub fn set_catalog(&mut self, catalog: ServerCatalog) {
        self.rebuild_generation.bump();
        self.catalog = catalog;
        self.rebuild_model();
    }

    /// Fetch federation lists for all viewpoints and rebuild the model.
    ///
    /// Fetches run concurrently; a refresh superseded while suspended at the
    /// fetch boundary discards its results without touching the model. A
    /// failed seed degrades to "no edges for this viewpoint" plus a notice.
    /// Privacy-restricted seeds are skipped; use
    /// [`MapSession::refresh_seed`] after authenticating.
    pub async fn refresh(&mut self) {
        let snapshot = self.rebuild_generation.bump();

        let seeds: Vec<String> = self
            .viewpoints
            .iter()
            .filter(|seed| !self.private_hosts.contains(*seed))
            .cloned()
            .collect();
        let fetches = seeds.into_iter().map(|seed| {
            let source = Arc::clone(&self.source);
            async move {
                let result = source.fetch(&seed).await;
                (seed, result)
            }
        });
        let results = join_all(fetches).await;

        if !self.rebuild_generation.is_current(snapshot) {
            debug!(generation = snapshot, "discarding superseded refresh");
            return;
        }

        for (seed, result) in results {
            self.apply_fetch_result(seed, result);
        }
        self.rebuild_model();
    }

    /// Fetch one seed regardless of its private marking (the authenticated
    /// refetch path) and rebuild.
    pub async fn refresh_seed(&mut self, seed: &str) {
        let snapshot = self.rebuild_generation.bump();
        let result = self.source.fetch(seed).await;
        if !self.rebuild_generation.is_current(snapshot) {
            debug!(generation = snapshot, seed, "discarding superseded seed refresh");
            return;
        }
        self.apply_fetch_result(seed.to_string(), result);
        self.rebuild_model();
    }

    fn apply_fetch_result(
        &mut self,
        seed: String,
        result: Result<crate::FederationResponse, FetchError>,
    ) {
        match result {
            Ok(response) => {
                if response.authenticated == Some(true) {
                    self.private_hosts.remove(&seed);
                }
                self.observations.insert(seed, response.federations);
            }
            Err(error @ FetchError::CredentialRequired(_)) => {
                warn!(seed, "federation data requires credentials");
                self.private_hosts.insert(seed.clone());
                self.observations.remove(&seed);
                self.notices.push(Notice {
                    host: seed,
                    code: error.code(),
                    message: error.message().to_string(),
                });
            }
            Err(error) => {
                warn!(seed, %error, "federation fetch failed");
                self.observations.remove(&seed);
                self.notices.push(Notice {
                    host: seed,
                    code: error.code(),
                    message: error.message().to_string(),
                });
            }
        }
    }

    fn rebuild_model(&mut self) {
        // Flatten in viewpoint order so the rebuild is deterministic.
        let mut all: Vec<FederationObservation> = Vec::new();
        for seed in &self.viewpoints {
            if let Some(observations) = self.observations.get(seed) {
                all.extend(observations.iter().cloned());
            }
        }

        let edges = normalize_observations(&all, &self.catalog);
        let viewpoint_set: HashSet<String> = self.viewpoints.iter().cloned().collect();
        self.model = build_graph_model(ModelInput {
            catalog: &self.catalog,
            edges: &edges,
            viewpoints: &viewpoint_set,
            private_hosts: &self.private_hosts,
            home_host: self.home_host.as_deref(),
        });
        debug!(
            nodes = self.model.nodes.len(),
            edges = self.model.edges.activity_edges.len(),
            "model rebuilt"
        );
    }

    /// Drain completed probe runs into the model.
    ///
    /// A report whose generation no longer matches the prober's current one
    /// belongs to a superseded viewpoint set and is dropped silently.
    pub fn apply_probe_reports(&mut self) {
        while let Ok(report) = self.probe_reports.try_recv() {
            if self.prober.generation().is_current(report.generation) {
                self.connectivity = report.edges;
            } else {
                debug!(generation = report.generation, "dropping stale probe report");
            }
        }
    }

    /// Convert the current model to render lists.
    pub fn render(&self) -> (Vec<RenderNode>, Vec<RenderEdge>) {
        render_model(&self.model, &self.connectivity)
    }

    /// Push the current model into a rendering backend.
    pub fn sync_renderer(&self, backend: &mut dyn RenderBackend) {
        let (nodes, edges) = self.render();
        backend.apply(&nodes, &edges);
    }

    /// The single teardown path: cancel all timers and in-flight work.
    ///
    /// Anything still suspended at an I/O boundary finds a bumped generation
    /// on completion and is discarded.
    pub fn shutdown(&mut self) {
        info!("map session shutting down");
        self.rebuild_generation.bump();
        self.prober.shutdown();
        self.focus.clear();
        self.pan.stop();
    }
}
