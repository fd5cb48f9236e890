//! Federation-fetch boundary: typed DTOs and the transport seam.

use fedimap_graph::FederationObservation;
use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Wire request for the federation endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FederationRequest {
    /// The viewpoint server whose federation list is requested.
    pub seed_server: String,
}

/// Wire response: one viewpoint's reported federation list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FederationResponse {
    /// The observations the seed reports.
    pub federations: Vec<FederationObservation>,
    /// Whether the fetch ran with the user's credentials.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authenticated: Option<bool>,
}

/// Why a federation fetch failed.
///
/// Non-fatal: a failed seed degrades to "no edges for this viewpoint" and a
/// dismissable notice. `CREDENTIAL_REQUIRED` additionally marks the seed
/// private and suppresses automatic retries.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// The seed withholds federation data without authentication.
    #[error("CREDENTIAL_REQUIRED: {0}")]
    CredentialRequired(String),

    /// Any other fetch failure, with a human-readable message.
    #[error("FETCH_FAILED: {0}")]
    Failed(String),
}

impl FetchError {
    /// Machine-readable code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::CredentialRequired(_) => "CREDENTIAL_REQUIRED",
            Self::Failed(_) => "FETCH_FAILED",
        }
    }

    /// Human-readable message.
    pub fn message(&self) -> &str {
        match self {
            Self::CredentialRequired(msg) | Self::Failed(msg) => msg,
        }
    }
}

/// One federation-list fetch against the directory boundary.
///
/// Implementations perform the actual I/O; the HTTP side is injected by the
/// embedding application.
pub trait FederationSource: Send + Sync {
    /// Fetch the federation list reported by `seed`.
    fn fetch(&self, seed: &str) -> BoxFuture<'static, std::result::Result<FederationResponse, FetchError>>;
}
