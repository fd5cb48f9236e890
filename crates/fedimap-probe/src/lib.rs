//! Fedimap Connectivity Prober
//!
//! For every unordered pair among the current viewpoint servers, issues two
//! independent directional reachability probes in parallel and classifies
//! the combined result:
//!
//! - **mutual**: both directions reachable
//! - **partial**: exactly one direction reachable
//! - **ng**: neither direction reachable
//!
//! Probing is O(n²) in the viewpoint count, so it runs over viewpoints only
//! (never the whole visible node set), is debounced against rapid viewpoint
//! edits, and publishes results tagged with a generation so a probe set
//! whose viewpoint context went stale can never write into the live model.
//!
//! The far side of the probe endpoint is out of scope; it is consumed
//! through the [`ProbeTransport`] trait.

mod error;
mod prober;
mod transport;

pub use error::{ProbeError, Result};
pub use prober::{probe_pair, ConnectivityProber, ProbeReport, ProberConfig};
pub use transport::{
    ConnectivityClass, ConnectivityEdge, ConnectivityRequest, DirectionResult, ProbeTransport,
};
