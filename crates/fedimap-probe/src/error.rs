//! Probe error taxonomy.
//!
//! Each variant is a distinct non-reachable outcome and is preserved
//! verbatim per direction. Collapsing them into a generic "failed" state
//! loses the diagnostic the hover tooltip shows, so conversion to and from
//! the wire codes is lossless.

use thiserror::Error;

/// Result type for probe operations.
pub type Result<T> = std::result::Result<T, ProbeError>;

/// Why a directional probe did not reach its target.
///
/// The `Display` form is the wire code (`API_ERROR:<status>` carries the
/// HTTP status).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[derive(serde::Serialize, serde::Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum ProbeError {
    /// The source does not federate with the target at all.
    #[error("NOT_FEDERATED")]
    NotFederated,

    /// The source requires authentication before revealing federation data.
    #[error("CREDENTIAL_REQUIRED")]
    CredentialRequired,

    /// The probe did not complete within the deadline.
    #[error("TIMEOUT")]
    Timeout,

    /// The remote endpoint could not be reached at all.
    #[error("CONNECTION_FAILED")]
    ConnectionFailed,

    /// The remote endpoint answered with a non-2xx status.
    #[error("API_ERROR:{0}")]
    ApiError(u16),
}

impl From<ProbeError> for String {
    fn from(error: ProbeError) -> Self {
        error.to_string()
    }
}

impl TryFrom<String> for ProbeError {
    type Error = String;

    fn try_from(code: String) -> std::result::Result<Self, Self::Error> {
        match code.as_str() {
            "NOT_FEDERATED" => Ok(Self::NotFederated),
            "CREDENTIAL_REQUIRED" => Ok(Self::CredentialRequired),
            "TIMEOUT" => Ok(Self::Timeout),
            "CONNECTION_FAILED" => Ok(Self::ConnectionFailed),
            other => match other.strip_prefix("API_ERROR:") {
                Some(status) => status
                    .parse()
                    .map(Self::ApiError)
                    .map_err(|_| format!("invalid API_ERROR status: {other}")),
                None => Err(format!("unknown probe error code: {other}")),
            },
        }
    }
}
