//! Edge normalization: raw observations to canonical weighted edges.
//!
//! Observations are split into normal activity and block/suspend reports.
//! Activity collapses to at most one undirected edge per unordered host
//! pair, weighted on a square-root scale so mid-strength ties stay visually
//! distinguishable. Block/suspend reports aggregate per pair with direction
//! tracking.

use std::collections::{HashMap, HashSet};

use crate::{
    FederationObservation, HostPair, ServerCatalog, OPACITY_MAX, OPACITY_MIN, WEIGHT_MAX,
    WEIGHT_MIN,
};

/// Canonical undirected activity edge.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActivityEdge {
    /// Unordered endpoint pair; `pair.to_string()` is the edge id.
    pub pair: HostPair,
    /// Raw activity of the winning observation (`users + notes/10`).
    pub raw_activity: f64,
    /// Normalized weight in `[1, 30]`.
    pub weight: f64,
    /// Derived opacity in `[0.3, 0.9]`.
    pub opacity: f64,
}

/// Aggregated block/suspend relationship for one unordered pair.
///
/// `forward` means the relation was reported from `pair.first()` toward
/// `pair.second()`; `backward` is the opposite direction.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BlockRelation {
    /// Unordered endpoint pair.
    pub pair: HostPair,
    /// Reported from `pair.first()` to `pair.second()`.
    pub forward: bool,
    /// Reported from `pair.second()` to `pair.first()`.
    pub backward: bool,
    /// Union of `is_blocked` over the contributing observations.
    pub is_blocked: bool,
    /// Union of `is_suspended` over the contributing observations.
    pub is_suspended: bool,
}

impl BlockRelation {
    /// Both directions reported: the rendered edge carries arrowheads on
    /// both ends.
    pub fn is_mutual(&self) -> bool {
        self.forward && self.backward
    }
}

/// Output of the normalizer.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NormalizedEdges {
    /// Deduplicated weighted activity edges, sorted by pair.
    pub activity_edges: Vec<ActivityEdge>,
    /// Aggregated block/suspend relations, sorted by pair.
    pub block_relations: Vec<BlockRelation>,
}

/// Normalize a batch of federation observations.
///
/// Endpoints of activity edges must each be a known catalog host or a host
/// that itself reports federation data (appears as some observation's
/// source). Unknown targets that never report anything are dropped rather
/// than shown as unreachable islands. Self-referential observations are
/// dropped up front.
pub fn normalize_observations(
    observations: &[FederationObservation],
    catalog: &ServerCatalog,
) -> NormalizedEdges {
    let source_hosts: HashSet<&str> = observations
        .iter()
        .map(|o| o.source_host.as_str())
        .collect();
    let endpoint_allowed =
        |host: &str| catalog.contains(host) || source_hosts.contains(host);

    let mut normal: Vec<&FederationObservation> = Vec::new();
    let mut restricted: Vec<&FederationObservation> = Vec::new();
    for obs in observations {
        if obs.is_self_referential() {
            continue;
        }
        if obs.is_restricted() {
            restricted.push(obs);
        } else if endpoint_allowed(&obs.source_host) && endpoint_allowed(&obs.target_host) {
            normal.push(obs);
        }
    }

    // Global min/max over the filtered set, before dedup, so a dropped
    // duplicate still anchors the scale it was observed on.
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for obs in &normal {
        let a = obs.raw_activity();
        min = min.min(a);
        max = max.max(a);
    }

    let mut winners: HashMap<HostPair, f64> = HashMap::new();
    for obs in &normal {
        let pair = HostPair::new(&obs.source_host, &obs.target_host);
        let a = obs.raw_activity();
        winners
            .entry(pair)
            .and_modify(|kept| {
                if a > *kept {
                    *kept = a;
                }
            })
            .or_insert(a);
    }

    let mut activity_edges: Vec<ActivityEdge> = winners
        .into_iter()
        .map(|(pair, raw_activity)| {
            let weight = normalize_weight(raw_activity, min, max);
            ActivityEdge {
                pair,
                raw_activity,
                weight,
                opacity: opacity_for_weight(weight),
            }
        })
        .collect();
    activity_edges.sort_by(|a, b| a.pair.cmp(&b.pair));

    let mut relations: HashMap<HostPair, BlockRelation> = HashMap::new();
    for obs in &restricted {
        let pair = HostPair::new(&obs.source_host, &obs.target_host);
        let forward = obs.source_host == pair.first();
        let relation = relations.entry(pair.clone()).or_insert(BlockRelation {
            pair,
            forward: false,
            backward: false,
            is_blocked: false,
            is_suspended: false,
        });
        if forward {
            relation.forward = true;
        } else {
            relation.backward = true;
        }
        relation.is_blocked |= obs.is_blocked;
        relation.is_suspended |= obs.is_suspended;
    }

    let mut block_relations: Vec<BlockRelation> = relations.into_values().collect();
    block_relations.sort_by(|a, b| a.pair.cmp(&b.pair));

    NormalizedEdges {
        activity_edges,
        block_relations,
    }
}

/// Map raw activity onto the `[1, 30]` weight scale.
///
/// The square root compresses the high end so mid-strength ties remain
/// distinguishable. A degenerate scale (all observations equal, including
/// the single-edge case) collapses to the maximum weight: a lone edge is
/// the strongest tie in view, not the weakest.
fn normalize_weight(raw: f64, min: f64, max: f64) -> f64 {
    let range = max - min;
    let normalized = if range <= 0.0 {
        1.0
    } else {
        ((raw - min) / range.max(1.0)).sqrt()
    };
    WEIGHT_MIN + normalized * (WEIGHT_MAX - WEIGHT_MIN)
}

/// Opacity tracks weight, clamped to `[0.3, 0.9]`.
fn opacity_for_weight(weight: f64) -> f64 {
    (OPACITY_MIN + weight / WEIGHT_MAX * 0.6).min(OPACITY_MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ServerRecord;
    use proptest::prelude::*;

    fn catalog(hosts: &[&str]) -> ServerCatalog {
        ServerCatalog::from_records(hosts.iter().map(|h| ServerRecord::new(*h, 10)))
    }

    #[test]
    fn empty_input_empty_output() {
        let out = normalize_observations(&[], &catalog(&[]));
        assert!(out.activity_edges.is_empty());
        assert!(out.block_relations.is_empty());
    }

    #[test]
    fn single_edge_collapses_to_max_weight() {
        let obs = [FederationObservation::activity(
            "misskey.io",
            "example.social",
            100,
            500,
        )];
        let out = normalize_observations(&obs, &catalog(&["misskey.io", "example.social"]));

        assert_eq!(out.activity_edges.len(), 1);
        let edge = &out.activity_edges[0];
        assert_eq!(edge.weight, WEIGHT_MAX);
        assert_eq!(edge.raw_activity, 150.0);
        assert_eq!(edge.opacity, OPACITY_MAX);
    }

    #[test]
    fn dedup_keeps_higher_activity() {
        let obs = [
            FederationObservation::activity("a.example", "b.example", 10, 0),
            FederationObservation::activity("b.example", "a.example", 200, 0),
            FederationObservation::activity("c.example", "a.example", 50, 0),
        ];
        let out = normalize_observations(&obs, &catalog(&["a.example", "b.example", "c.example"]));

        assert_eq!(out.activity_edges.len(), 2);
        let ab = out
            .activity_edges
            .iter()
            .find(|e| e.pair == HostPair::new("a.example", "b.example"))
            .unwrap();
        assert_eq!(ab.raw_activity, 200.0);
        // 200 is the max of the batch, so the kept edge sits at full weight.
        assert_eq!(ab.weight, WEIGHT_MAX);
    }

    #[test]
    fn self_referential_dropped() {
        let obs = [FederationObservation::activity("a.example", "a.example", 100, 0)];
        let out = normalize_observations(&obs, &catalog(&["a.example"]));
        assert!(out.activity_edges.is_empty());
    }

    #[test]
    fn unknown_target_without_source_role_dropped() {
        let obs = [
            FederationObservation::activity("a.example", "ghost.example", 10, 0),
            FederationObservation::activity("a.example", "b.example", 10, 0),
        ];
        let out = normalize_observations(&obs, &catalog(&["a.example", "b.example"]));

        assert_eq!(out.activity_edges.len(), 1);
        assert_eq!(
            out.activity_edges[0].pair,
            HostPair::new("a.example", "b.example")
        );
    }

    #[test]
    fn unknown_source_is_allowed_as_endpoint() {
        // A host outside the catalog that reports its own federation list is
        // a legitimate endpoint.
        let obs = [FederationObservation::activity(
            "offgrid.example",
            "a.example",
            5,
            0,
        )];
        let out = normalize_observations(&obs, &catalog(&["a.example"]));
        assert_eq!(out.activity_edges.len(), 1);
    }

    #[test]
    fn mutual_block_detected() {
        let mut forward = FederationObservation::activity("a.example", "b.example", 0, 0);
        forward.is_blocked = true;
        let mut backward = FederationObservation::activity("b.example", "a.example", 0, 0);
        backward.is_suspended = true;

        let out = normalize_observations(&[forward, backward], &catalog(&["a.example", "b.example"]));

        assert!(out.activity_edges.is_empty());
        assert_eq!(out.block_relations.len(), 1);
        let relation = &out.block_relations[0];
        assert!(relation.is_mutual());
        assert!(relation.is_blocked);
        assert!(relation.is_suspended);
    }

    #[test]
    fn one_directional_block_is_not_mutual() {
        let mut obs = FederationObservation::activity("a.example", "b.example", 0, 0);
        obs.is_blocked = true;

        let out = normalize_observations(&[obs], &catalog(&["a.example", "b.example"]));

        assert_eq!(out.block_relations.len(), 1);
        let relation = &out.block_relations[0];
        assert!(!relation.is_mutual());
        assert!(relation.forward ^ relation.backward);
        assert!(relation.is_blocked);
        assert!(!relation.is_suspended);
    }

    #[test]
    fn blocked_observation_never_becomes_activity() {
        let mut obs = FederationObservation::activity("a.example", "b.example", 1000, 0);
        obs.is_blocked = true;

        let out = normalize_observations(&[obs], &catalog(&["a.example", "b.example"]));
        assert!(out.activity_edges.is_empty());
        assert_eq!(out.block_relations.len(), 1);
    }

    #[test]
    fn output_is_deterministic() {
        let obs = [
            FederationObservation::activity("c.example", "a.example", 1, 0),
            FederationObservation::activity("a.example", "b.example", 2, 0),
            FederationObservation::activity("b.example", "c.example", 3, 0),
        ];
        let cat = catalog(&["a.example", "b.example", "c.example"]);
        let first = normalize_observations(&obs, &cat);
        let second = normalize_observations(&obs, &cat);
        assert_eq!(first, second);
    }

    proptest! {
        #[test]
        fn weights_and_opacities_stay_in_range(
            entries in proptest::collection::vec((0u64..100_000, 0u64..1_000_000), 1..64)
        ) {
            let hosts: Vec<String> = (0..8).map(|i| format!("host{i}.example")).collect();
            let obs: Vec<FederationObservation> = entries
                .iter()
                .enumerate()
                .map(|(i, (users, notes))| {
                    FederationObservation::activity(
                        hosts[i % hosts.len()].clone(),
                        hosts[(i + 1 + i % (hosts.len() - 1)) % hosts.len()].clone(),
                        *users,
                        *notes,
                    )
                })
                .collect();
            let cat = ServerCatalog::from_records(
                hosts.iter().map(|h| ServerRecord::new(h.clone(), 1)),
            );

            let out = normalize_observations(&obs, &cat);
            for edge in &out.activity_edges {
                prop_assert!(edge.weight >= WEIGHT_MIN && edge.weight <= WEIGHT_MAX);
                prop_assert!(edge.opacity >= OPACITY_MIN && edge.opacity <= OPACITY_MAX);
            }
        }

        #[test]
        fn at_most_one_edge_per_pair(
            entries in proptest::collection::vec((0usize..6, 0usize..6, 0u64..1000), 0..64)
        ) {
            let hosts: Vec<String> = (0..6).map(|i| format!("host{i}.example")).collect();
            let obs: Vec<FederationObservation> = entries
                .iter()
                .filter(|(s, t, _)| s != t)
                .map(|(s, t, users)| {
                    FederationObservation::activity(hosts[*s].clone(), hosts[*t].clone(), *users, 0)
                })
                .collect();
            let cat = ServerCatalog::from_records(
                hosts.iter().map(|h| ServerRecord::new(h.clone(), 1)),
            );

            let out = normalize_observations(&obs, &cat);
            let mut seen = std::collections::HashSet::new();
            for edge in &out.activity_edges {
                prop_assert!(seen.insert(edge.pair.clone()));
            }
        }
    }
}
