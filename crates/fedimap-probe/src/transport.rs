//! Probe transport seam and connectivity result types.

use fedimap_graph::HostPair;
use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};

use crate::{ProbeError, Result};

/// Wire request for the connectivity endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectivityRequest {
    /// Host the probe is issued from.
    pub source: String,
    /// Host whose reachability is being checked.
    pub target: String,
    /// Always true: the endpoint probes both directions.
    pub bidirectional: bool,
}

/// Result of one directional probe.
///
/// `reachable` is true only when the remote endpoint responded, reports the
/// target as known, and does not itself block or suspend it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectionResult {
    /// Target reachable from source.
    pub reachable: bool,
    /// Why not, when unreachable. Preserved verbatim, never coalesced.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ProbeError>,
    /// Round-trip latency in milliseconds when the probe completed.
    #[serde(rename = "latency", skip_serializing_if = "Option::is_none")]
    pub latency_ms: Option<u64>,
}

impl DirectionResult {
    /// A successful probe with measured latency.
    pub fn ok(latency_ms: u64) -> Self {
        Self {
            reachable: true,
            error: None,
            latency_ms: Some(latency_ms),
        }
    }

    /// A failed probe with its classification.
    pub fn failed(error: ProbeError) -> Self {
        Self {
            reachable: false,
            error: Some(error),
            latency_ms: None,
        }
    }
}

/// Tri-state classification of a probed pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectivityClass {
    /// Both directions reachable.
    MutualOk,
    /// Exactly one direction reachable.
    Partial,
    /// Neither direction reachable.
    Ng,
}

impl ConnectivityClass {
    /// Classify from the two directional outcomes.
    pub fn classify(forward_ok: bool, backward_ok: bool) -> Self {
        match (forward_ok, backward_ok) {
            (true, true) => Self::MutualOk,
            (false, false) => Self::Ng,
            _ => Self::Partial,
        }
    }
}

/// A probed pair, materialized as an additional graph edge.
///
/// Additive to any activity edge or block relation between the same pair,
/// never a replacement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectivityEdge {
    /// Probe source (forward direction starts here).
    pub source: String,
    /// Probe target.
    pub target: String,
    /// Source → target outcome.
    pub forward: DirectionResult,
    /// Target → source outcome.
    pub backward: DirectionResult,
    /// Combined classification.
    pub class: ConnectivityClass,
}

impl ConnectivityEdge {
    /// Combine two directional results into a classified edge.
    pub fn from_directions(
        source: impl Into<String>,
        target: impl Into<String>,
        forward: DirectionResult,
        backward: DirectionResult,
    ) -> Self {
        let class = ConnectivityClass::classify(forward.reachable, backward.reachable);
        Self {
            source: source.into(),
            target: target.into(),
            forward,
            backward,
            class,
        }
    }

    /// Canonical edge id: `connectivity-<a>-<b>` with sorted endpoints.
    pub fn id(&self) -> String {
        format!("connectivity-{}", self.pair())
    }

    /// Unordered endpoint pair.
    pub fn pair(&self) -> HostPair {
        HostPair::new(&self.source, &self.target)
    }

    /// The endpoint's `mutuallyReachable` flag: both directions reachable.
    pub fn mutually_reachable(&self) -> bool {
        self.class == ConnectivityClass::MutualOk
    }
}

/// One directional reachability check against the probe endpoint.
///
/// Implementations perform the actual I/O (the HTTP side of the boundary is
/// injected by the embedding application). A transport-level failure maps
/// to the matching [`ProbeError`]; the prober itself applies the deadline
/// and maps elapsed timers to [`ProbeError::Timeout`].
pub trait ProbeTransport: Send + Sync {
    /// Ask `source` whether `target` is reachable from it.
    fn probe(&self, source: &str, target: &str) -> BoxFuture<'static, Result<DirectionResult>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_wire_shape() {
        let request = ConnectivityRequest {
            source: "a.example".into(),
            target: "b.example".into(),
            bidirectional: true,
        };
        let json = serde_json::to_string(&request).unwrap();
        assert_eq!(
            json,
            r#"{"source":"a.example","target":"b.example","bidirectional":true}"#
        );
    }

    #[test]
    fn classification_matrix() {
        assert_eq!(
            ConnectivityClass::classify(true, true),
            ConnectivityClass::MutualOk
        );
        assert_eq!(
            ConnectivityClass::classify(true, false),
            ConnectivityClass::Partial
        );
        assert_eq!(
            ConnectivityClass::classify(false, true),
            ConnectivityClass::Partial
        );
        assert_eq!(ConnectivityClass::classify(false, false), ConnectivityClass::Ng);
    }

    #[test]
    fn edge_id_is_order_independent() {
        let forward = DirectionResult::ok(12);
        let backward = DirectionResult::failed(ProbeError::NotFederated);

        let ab = ConnectivityEdge::from_directions("b.example", "a.example", forward, backward);
        assert_eq!(ab.id(), "connectivity-a.example-b.example");
        assert_eq!(ab.class, ConnectivityClass::Partial);
        assert!(!ab.mutually_reachable());
    }

    #[test]
    fn direction_errors_preserved_per_direction() {
        let edge = ConnectivityEdge::from_directions(
            "a.example",
            "b.example",
            DirectionResult::failed(ProbeError::Timeout),
            DirectionResult::failed(ProbeError::ApiError(502)),
        );

        assert_eq!(edge.forward.error, Some(ProbeError::Timeout));
        assert_eq!(edge.backward.error, Some(ProbeError::ApiError(502)));
        assert_eq!(edge.class, ConnectivityClass::Ng);
    }
}
