//! Raw federation observations as reported by viewpoint servers.

use crate::NOTES_ACTIVITY_DIVISOR;

/// One directional, source-reported federation relationship.
///
/// Many observations may exist for the same unordered host pair (each
/// viewpoint reports its own view); they are never assumed symmetric.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct FederationObservation {
    /// The server reporting the relationship.
    pub source_host: String,
    /// The remote server the relationship points at.
    pub target_host: String,
    /// Remote-follow count from source to target.
    pub users_count: u64,
    /// Fetched-post count from source to target.
    pub notes_count: u64,
    /// Source has blocked the target.
    pub is_blocked: bool,
    /// Source has suspended delivery to the target.
    pub is_suspended: bool,
}

impl FederationObservation {
    /// A plain activity observation with no block/suspend flags.
    pub fn activity(
        source: impl Into<String>,
        target: impl Into<String>,
        users_count: u64,
        notes_count: u64,
    ) -> Self {
        Self {
            source_host: source.into(),
            target_host: target.into(),
            users_count,
            notes_count,
            is_blocked: false,
            is_suspended: false,
        }
    }

    /// Whether the source reports any block or suspension.
    pub fn is_restricted(&self) -> bool {
        self.is_blocked || self.is_suspended
    }

    /// Whether source and target are the same host (degenerate loop).
    pub fn is_self_referential(&self) -> bool {
        self.source_host == self.target_host
    }

    /// Raw activity score: `users + notes / 10`.
    pub fn raw_activity(&self) -> f64 {
        self.users_count as f64 + self.notes_count as f64 / NOTES_ACTIVITY_DIVISOR
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_activity_weights_notes_down() {
        let obs = FederationObservation::activity("a", "b", 100, 500);
        assert_eq!(obs.raw_activity(), 150.0);
    }

    #[test]
    fn self_referential_detection() {
        let obs = FederationObservation::activity("a.example", "a.example", 1, 0);
        assert!(obs.is_self_referential());
    }

    #[test]
    fn restricted_covers_both_flags() {
        let mut obs = FederationObservation::activity("a", "b", 0, 0);
        assert!(!obs.is_restricted());

        obs.is_blocked = true;
        assert!(obs.is_restricted());

        obs.is_blocked = false;
        obs.is_suspended = true;
        assert!(obs.is_restricted());
    }
}
