//! Fedimap View Session
//!
//! Ties the engine together around the single piece of mutable shared
//! state: the current graph model.
//!
//! # Architecture
//!
//! - **Session**: owns catalog, observations, viewpoint set, and the live
//!   [`fedimap_graph::GraphModel`]; rebuilds are generation-guarded so two
//!   rebuilds can never interleave into the model.
//! - **Boundaries**: federation data and connectivity probes are consumed
//!   through injected async transports with typed DTOs; loosely-shaped
//!   payloads are rejected at the edge, not propagated inward.
//! - **Render contract**: the model converts to plain node/edge lists any
//!   force-directed renderer can consume; the renderer holds no state.
//! - **Settings**: an opaque client-side blob of which only the
//!   viewpoint-host list is interpreted.

mod dto;
mod error;
mod render;
mod session;
mod settings;

pub use dto::{FederationRequest, FederationResponse, FederationSource, FetchError};
pub use error::{Error, Result};
pub use render::{render_model, RenderBackend, RenderEdge, RenderNode};
pub use session::{MapSession, Notice, SessionChannels, SessionConfig};
pub use settings::SettingsBlob;
