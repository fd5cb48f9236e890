//! Fedimap Graph Engine
//!
//! Turns raw per-server federation observations into a deduplicated,
//! weighted, rendering-agnostic graph.
//!
//! # Pipeline
//!
//! 1. **Normalize**: raw [`FederationObservation`]s are split into normal
//!    activity and block/suspend reports, deduplicated per unordered host
//!    pair, and weighted on a square-root scale ([`normalize_observations`]).
//! 2. **Build**: the normalized edges plus the [`ServerCatalog`] produce a
//!    [`GraphModel`] whose node sizes are log-scaled against the currently
//!    visible set only ([`build_graph_model`]).
//!
//! The engine is pure: identical inputs always produce identical output, and
//! degenerate inputs (empty sets, single edges, self-referential reports)
//! are handled by construction rather than at runtime.

mod model;
mod normalize;
mod observation;
mod pair;
mod server;

pub use model::{build_graph_model, GraphModel, GraphNode, ModelInput};
pub use normalize::{normalize_observations, ActivityEdge, BlockRelation, NormalizedEdges};
pub use observation::FederationObservation;
pub use pair::HostPair;
pub use server::{ServerCatalog, ServerRecord};

/// Minimum edge weight after normalization.
pub const WEIGHT_MIN: f64 = 1.0;

/// Maximum edge weight after normalization.
pub const WEIGHT_MAX: f64 = 30.0;

/// Minimum edge opacity.
pub const OPACITY_MIN: f64 = 0.3;

/// Maximum edge opacity.
pub const OPACITY_MAX: f64 = 0.9;

/// Minimum node size in display units.
pub const NODE_SIZE_MIN: f64 = 12.0;

/// Maximum node size in display units.
pub const NODE_SIZE_MAX: f64 = 70.0;

/// Divisor applied to the fetched-post count when computing raw activity.
///
/// Raw activity is `users + notes / NOTES_ACTIVITY_DIVISOR`: remote follows
/// dominate, fetched posts contribute a tenth each.
pub const NOTES_ACTIVITY_DIVISOR: f64 = 10.0;
