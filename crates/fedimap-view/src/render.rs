//! Rendering-backend contract.
//!
//! The model converts into plain node/edge lists; any force-directed
//! renderer can consume them. Connectivity edges are additive: a probed
//! pair keeps its activity edge or block relation and gains a second,
//! distinctly colored edge.

use fedimap_graph::GraphModel;
use fedimap_probe::{ConnectivityClass, ConnectivityEdge};
use serde::{Deserialize, Serialize};

/// Default node fill.
const COLOR_NODE: &str = "#5a9bd4";
/// Viewpoint node fill.
const COLOR_NODE_VIEWPOINT: &str = "#f5a623";
/// Privacy-restricted node fill.
const COLOR_NODE_PRIVATE: &str = "#9b9b9b";
/// Activity edge stroke.
const COLOR_EDGE_ACTIVITY: &str = "#95a5a6";
/// Block/suspend edge stroke.
const COLOR_EDGE_BLOCK: &str = "#c0392b";
/// Connectivity edge strokes per class.
const COLOR_CONNECTIVITY_MUTUAL: &str = "#2ecc71";
const COLOR_CONNECTIVITY_PARTIAL: &str = "#f1c40f";
const COLOR_CONNECTIVITY_NG: &str = "#e74c3c";

/// Opacity used for block and connectivity edges.
const OVERLAY_EDGE_OPACITY: f64 = 0.85;
/// Weight used for block and connectivity edges.
const OVERLAY_EDGE_WEIGHT: f64 = 3.0;

/// A node as the renderer sees it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderNode {
    /// Node id (the host).
    pub id: String,
    /// Display size.
    pub size: f64,
    /// Decorated label.
    pub label: String,
    /// Fill color.
    pub color: String,
    /// Icon, if known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon_url: Option<String>,
}

/// An edge as the renderer sees it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderEdge {
    /// Edge id, unique across all edge kinds.
    pub id: String,
    /// Source endpoint.
    pub source: String,
    /// Target endpoint.
    pub target: String,
    /// Stroke weight.
    pub weight: f64,
    /// Stroke color.
    pub color: String,
    /// Stroke opacity.
    pub opacity: f64,
    /// Arrowhead at the target end.
    pub arrow_forward: bool,
    /// Arrowhead at the source end.
    pub arrow_backward: bool,
}

/// The far side of the rendering boundary.
///
/// Implementations own layout and styling; they hold no interaction state
/// and are replaced wholesale on every sync.
pub trait RenderBackend {
    /// Replace the displayed node/edge sets.
    fn apply(&mut self, nodes: &[RenderNode], edges: &[RenderEdge]);
}

/// Convert the model plus current connectivity results to render lists.
pub fn render_model(
    model: &GraphModel,
    connectivity: &[ConnectivityEdge],
) -> (Vec<RenderNode>, Vec<RenderEdge>) {
    let nodes = model
        .nodes
        .iter()
        .map(|node| {
            let color = if node.is_viewpoint {
                COLOR_NODE_VIEWPOINT
            } else if node.is_private {
                COLOR_NODE_PRIVATE
            } else {
                COLOR_NODE
            };
            RenderNode {
                id: node.host.clone(),
                size: node.size,
                label: node.label.clone(),
                color: color.to_string(),
                icon_url: node.icon_url.clone(),
            }
        })
        .collect();

    let mut edges: Vec<RenderEdge> = Vec::new();
    for edge in &model.edges.activity_edges {
        edges.push(RenderEdge {
            id: edge.pair.to_string(),
            source: edge.pair.first().to_string(),
            target: edge.pair.second().to_string(),
            weight: edge.weight,
            color: COLOR_EDGE_ACTIVITY.to_string(),
            opacity: edge.opacity,
            arrow_forward: false,
            arrow_backward: false,
        });
    }
    for relation in &model.edges.block_relations {
        edges.push(RenderEdge {
            id: format!("block-{}", relation.pair),
            source: relation.pair.first().to_string(),
            target: relation.pair.second().to_string(),
            weight: OVERLAY_EDGE_WEIGHT,
            color: COLOR_EDGE_BLOCK.to_string(),
            opacity: OVERLAY_EDGE_OPACITY,
            // A mutual relation carries arrowheads on both ends.
            arrow_forward: relation.forward,
            arrow_backward: relation.backward,
        });
    }
    for edge in connectivity {
        let color = match edge.class {
            ConnectivityClass::MutualOk => COLOR_CONNECTIVITY_MUTUAL,
            ConnectivityClass::Partial => COLOR_CONNECTIVITY_PARTIAL,
            ConnectivityClass::Ng => COLOR_CONNECTIVITY_NG,
        };
        edges.push(RenderEdge {
            id: edge.id(),
            source: edge.source.clone(),
            target: edge.target.clone(),
            weight: OVERLAY_EDGE_WEIGHT,
            color: color.to_string(),
            opacity: OVERLAY_EDGE_OPACITY,
            arrow_forward: edge.forward.reachable,
            arrow_backward: edge.backward.reachable,
        });
    }

    (nodes, edges)
}

#[cfg(test)]
mod tests {
    use super::*;
    use fedimap_graph::{
        build_graph_model, normalize_observations, FederationObservation, ModelInput,
        ServerCatalog, ServerRecord,
    };
    use fedimap_probe::DirectionResult;
    use std::collections::HashSet;

    fn sample_model() -> GraphModel {
        let catalog = ServerCatalog::from_records([
            ServerRecord::new("a.example", 100),
            ServerRecord::new("b.example", 200),
        ]);
        let obs = [FederationObservation::activity("a.example", "b.example", 10, 0)];
        let edges = normalize_observations(&obs, &catalog);
        let viewpoints: HashSet<String> = ["a.example".to_string()].into();
        let private_hosts = HashSet::new();
        build_graph_model(ModelInput {
            catalog: &catalog,
            edges: &edges,
            viewpoints: &viewpoints,
            private_hosts: &private_hosts,
            home_host: None,
        })
    }

    #[test]
    fn connectivity_edges_are_additive() {
        let model = sample_model();
        let probe = ConnectivityEdge::from_directions(
            "a.example",
            "b.example",
            DirectionResult::ok(10),
            DirectionResult::ok(15),
        );

        let (nodes, edges) = render_model(&model, std::slice::from_ref(&probe));

        assert_eq!(nodes.len(), 2);
        // Activity edge and connectivity edge coexist for the same pair.
        assert_eq!(edges.len(), 2);
        assert!(edges.iter().any(|e| e.id == "a.example-b.example"));
        assert!(edges
            .iter()
            .any(|e| e.id == "connectivity-a.example-b.example"));
    }

    #[test]
    fn viewpoint_gets_distinct_color() {
        let model = sample_model();
        let (nodes, _) = render_model(&model, &[]);

        let viewpoint = nodes.iter().find(|n| n.id == "a.example").unwrap();
        let plain = nodes.iter().find(|n| n.id == "b.example").unwrap();
        assert_ne!(viewpoint.color, plain.color);
    }

    #[test]
    fn connectivity_classes_get_distinct_colors() {
        let model = sample_model();
        let mutual = ConnectivityEdge::from_directions(
            "a.example",
            "b.example",
            DirectionResult::ok(10),
            DirectionResult::ok(10),
        );
        let ng = ConnectivityEdge::from_directions(
            "a.example",
            "b.example",
            DirectionResult::failed(fedimap_probe::ProbeError::Timeout),
            DirectionResult::failed(fedimap_probe::ProbeError::ConnectionFailed),
        );

        let (_, with_mutual) = render_model(&model, std::slice::from_ref(&mutual));
        let (_, with_ng) = render_model(&model, std::slice::from_ref(&ng));

        let mutual_color = &with_mutual.last().unwrap().color;
        let ng_color = &with_ng.last().unwrap().color;
        assert_ne!(mutual_color, ng_color);
    }
}
