//! Graph model: the node/edge set handed to a rendering backend.
//!
//! Node sizes are log-scaled and re-normalized against the currently visible
//! set on every rebuild. Absolute scale is deliberately discarded so
//! clusters stay legible no matter which servers are in view.

use std::collections::{BTreeSet, HashSet};

use crate::{NormalizedEdges, ServerCatalog, NODE_SIZE_MAX, NODE_SIZE_MIN};

/// Marker prefix for the user's home server.
const HOME_MARKER: &str = "🏠 ";

/// Marker prefix for servers whose federation data needs authentication.
const PRIVATE_MARKER: &str = "🔒 ";

/// A rendering-agnostic graph node.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GraphNode {
    /// Host, the node id.
    pub host: String,
    /// Display size in `[12, 70]` units, log-scaled over the visible set.
    pub size: f64,
    /// Decorated display label.
    pub label: String,
    /// Software repository URL, if known.
    pub repository_url: Option<String>,
    /// Server icon URL, if known.
    pub icon_url: Option<String>,
    /// Host is in the current viewpoint set.
    pub is_viewpoint: bool,
    /// Federation data unavailable without authentication.
    pub is_private: bool,
    /// The user's home server.
    pub is_user_home: bool,
}

/// Inputs to a model rebuild.
#[derive(Debug, Clone, Copy)]
pub struct ModelInput<'a> {
    /// Known-server catalog.
    pub catalog: &'a ServerCatalog,
    /// Normalizer output for the active viewpoint set.
    pub edges: &'a NormalizedEdges,
    /// Current viewpoint hosts.
    pub viewpoints: &'a HashSet<String>,
    /// Hosts marked privacy-restricted.
    pub private_hosts: &'a HashSet<String>,
    /// The user's home host, if logged in.
    pub home_host: Option<&'a str>,
}

/// The node/edge set currently shown.
///
/// Fully rebuilt when the catalog or federation snapshot changes; when only
/// the viewpoint set changes, [`GraphModel::set_viewpoints`] mutates flags
/// in place instead.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GraphModel {
    /// Visible nodes, sorted by host.
    pub nodes: Vec<GraphNode>,
    /// Weighted activity edges.
    pub edges: NormalizedEdges,
}

impl GraphModel {
    /// Look up a node by host.
    pub fn node(&self, host: &str) -> Option<&GraphNode> {
        self.nodes.iter().find(|n| n.host == host)
    }

    /// Update viewpoint flags in place without rebuilding nodes.
    pub fn set_viewpoints(&mut self, viewpoints: &HashSet<String>) {
        for node in &mut self.nodes {
            node.is_viewpoint = viewpoints.contains(&node.host);
        }
    }
}

/// Build the graph model from a catalog and normalized edges.
///
/// The node set is the union of all hosts touched by an edge or block
/// relation, plus every viewpoint host present in the catalog — viewpoints
/// stay visible even with zero edges.
pub fn build_graph_model(input: ModelInput<'_>) -> GraphModel {
    let ModelInput {
        catalog,
        edges,
        viewpoints,
        private_hosts,
        home_host,
    } = input;

    let mut hosts: BTreeSet<&str> = BTreeSet::new();
    for edge in &edges.activity_edges {
        hosts.insert(edge.pair.first());
        hosts.insert(edge.pair.second());
    }
    for relation in &edges.block_relations {
        hosts.insert(relation.pair.first());
        hosts.insert(relation.pair.second());
    }
    for viewpoint in viewpoints {
        if catalog.contains(viewpoint) {
            hosts.insert(viewpoint);
        }
    }

    // Log-scale user counts, normalized over the visible set only.
    let log_users = |host: &str| {
        let users = catalog.get(host).map(|r| r.users_count).unwrap_or(1);
        ((users + 1) as f64).log10()
    };
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for host in &hosts {
        let log = log_users(host);
        min = min.min(log);
        max = max.max(log);
    }
    let range = if max - min > 0.0 { max - min } else { 1.0 };

    let nodes = hosts
        .into_iter()
        .map(|host| {
            let record = catalog.get(host);
            let is_user_home = home_host == Some(host);
            let is_private = private_hosts.contains(host);

            let base = record.map(|r| r.display_name()).unwrap_or(host);
            let label = if is_user_home {
                format!("{HOME_MARKER}{base}")
            } else if is_private {
                format!("{PRIVATE_MARKER}{base}")
            } else {
                base.to_string()
            };

            let normalized = (log_users(host) - min) / range;
            GraphNode {
                host: host.to_string(),
                size: NODE_SIZE_MIN + normalized * (NODE_SIZE_MAX - NODE_SIZE_MIN),
                label,
                repository_url: record.and_then(|r| r.repository_url.clone()),
                icon_url: record.and_then(|r| r.icon_url.clone()),
                is_viewpoint: viewpoints.contains(host),
                is_private,
                is_user_home,
            }
        })
        .collect();

    GraphModel {
        nodes,
        edges: edges.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{normalize_observations, FederationObservation, ServerRecord};

    fn set(hosts: &[&str]) -> HashSet<String> {
        hosts.iter().map(|h| h.to_string()).collect()
    }

    fn simple_input<'a>(
        catalog: &'a ServerCatalog,
        edges: &'a NormalizedEdges,
        viewpoints: &'a HashSet<String>,
        private_hosts: &'a HashSet<String>,
    ) -> ModelInput<'a> {
        ModelInput {
            catalog,
            edges,
            viewpoints,
            private_hosts,
            home_host: None,
        }
    }

    #[test]
    fn end_to_end_single_observation() {
        let catalog = ServerCatalog::from_records([
            ServerRecord::new("misskey.io", 50_000),
            ServerRecord::new("example.social", 300),
        ]);
        let obs = [FederationObservation::activity(
            "misskey.io",
            "example.social",
            100,
            500,
        )];
        let edges = normalize_observations(&obs, &catalog);
        let viewpoints = set(&["misskey.io"]);
        let private_hosts = HashSet::new();

        let model = build_graph_model(simple_input(&catalog, &edges, &viewpoints, &private_hosts));

        assert_eq!(model.nodes.len(), 2);
        assert_eq!(model.edges.activity_edges.len(), 1);
        assert_eq!(model.edges.activity_edges[0].weight, crate::WEIGHT_MAX);
        assert!(model.node("misskey.io").unwrap().is_viewpoint);
        assert!(!model.node("example.social").unwrap().is_viewpoint);
    }

    #[test]
    fn viewpoint_visible_with_zero_edges() {
        let catalog = ServerCatalog::from_records([ServerRecord::new("lonely.example", 5)]);
        let edges = NormalizedEdges::default();
        let viewpoints = set(&["lonely.example"]);
        let private_hosts = HashSet::new();

        let model = build_graph_model(simple_input(&catalog, &edges, &viewpoints, &private_hosts));

        assert_eq!(model.nodes.len(), 1);
        assert_eq!(model.nodes[0].host, "lonely.example");
    }

    #[test]
    fn uncatalogued_viewpoint_not_invented() {
        let catalog = ServerCatalog::new();
        let edges = NormalizedEdges::default();
        let viewpoints = set(&["ghost.example"]);
        let private_hosts = HashSet::new();

        let model = build_graph_model(simple_input(&catalog, &edges, &viewpoints, &private_hosts));
        assert!(model.nodes.is_empty());
    }

    #[test]
    fn sizes_span_display_range() {
        let catalog = ServerCatalog::from_records([
            ServerRecord::new("big.example", 1_000_000),
            ServerRecord::new("small.example", 1),
        ]);
        let obs = [FederationObservation::activity(
            "big.example",
            "small.example",
            10,
            0,
        )];
        let edges = normalize_observations(&obs, &catalog);
        let viewpoints = HashSet::new();
        let private_hosts = HashSet::new();

        let model = build_graph_model(simple_input(&catalog, &edges, &viewpoints, &private_hosts));

        let big = model.node("big.example").unwrap();
        let small = model.node("small.example").unwrap();
        assert_eq!(big.size, NODE_SIZE_MAX);
        assert_eq!(small.size, NODE_SIZE_MIN);
    }

    #[test]
    fn unknown_host_sized_as_single_user() {
        let catalog = ServerCatalog::from_records([ServerRecord::new("known.example", 10_000)]);
        let obs = [FederationObservation::activity(
            "offgrid.example",
            "known.example",
            5,
            0,
        )];
        let edges = normalize_observations(&obs, &catalog);
        let viewpoints = HashSet::new();
        let private_hosts = HashSet::new();

        let model = build_graph_model(simple_input(&catalog, &edges, &viewpoints, &private_hosts));

        let unknown = model.node("offgrid.example").unwrap();
        let known = model.node("known.example").unwrap();
        assert!(unknown.size < known.size);
        assert_eq!(unknown.size, NODE_SIZE_MIN);
    }

    #[test]
    fn home_marker_takes_precedence_over_private() {
        let catalog = ServerCatalog::from_records([
            ServerRecord::new("home.example", 10),
            ServerRecord::new("locked.example", 10),
        ]);
        let obs = [FederationObservation::activity(
            "home.example",
            "locked.example",
            1,
            0,
        )];
        let edges = normalize_observations(&obs, &catalog);
        let viewpoints = HashSet::new();
        let private_hosts = set(&["home.example", "locked.example"]);

        let model = build_graph_model(ModelInput {
            catalog: &catalog,
            edges: &edges,
            viewpoints: &viewpoints,
            private_hosts: &private_hosts,
            home_host: Some("home.example"),
        });

        let home = model.node("home.example").unwrap();
        let locked = model.node("locked.example").unwrap();
        assert!(home.label.starts_with("🏠 "));
        assert!(!home.label.contains("🔒"));
        assert!(locked.label.starts_with("🔒 "));
    }

    #[test]
    fn set_viewpoints_mutates_flags_only() {
        let catalog = ServerCatalog::from_records([
            ServerRecord::new("a.example", 10),
            ServerRecord::new("b.example", 10),
        ]);
        let obs = [FederationObservation::activity("a.example", "b.example", 1, 0)];
        let edges = normalize_observations(&obs, &catalog);
        let viewpoints = set(&["a.example"]);
        let private_hosts = HashSet::new();

        let mut model =
            build_graph_model(simple_input(&catalog, &edges, &viewpoints, &private_hosts));
        let sizes_before: Vec<f64> = model.nodes.iter().map(|n| n.size).collect();

        model.set_viewpoints(&set(&["b.example"]));

        assert!(!model.node("a.example").unwrap().is_viewpoint);
        assert!(model.node("b.example").unwrap().is_viewpoint);
        let sizes_after: Vec<f64> = model.nodes.iter().map(|n| n.size).collect();
        assert_eq!(sizes_before, sizes_after);
    }

    #[test]
    fn rebuild_is_deterministic() {
        let catalog = ServerCatalog::from_records([
            ServerRecord::new("a.example", 100),
            ServerRecord::new("b.example", 2000),
            ServerRecord::new("c.example", 30),
        ]);
        let obs = [
            FederationObservation::activity("a.example", "b.example", 10, 100),
            FederationObservation::activity("b.example", "c.example", 20, 0),
        ];
        let edges = normalize_observations(&obs, &catalog);
        let viewpoints = set(&["a.example"]);
        let private_hosts = HashSet::new();

        let first = build_graph_model(simple_input(&catalog, &edges, &viewpoints, &private_hosts));
        let second = build_graph_model(simple_input(&catalog, &edges, &viewpoints, &private_hosts));
        assert_eq!(first, second);
    }
}
