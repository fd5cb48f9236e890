//! Unordered host pair, the canonical edge key.

/// An unordered pair of hosts.
///
/// The constructor sorts the endpoints, so `HostPair::new("b", "a")` and
/// `HostPair::new("a", "b")` are equal and hash identically. At most one
/// activity edge and one block relation exist per pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HostPair {
    first: String,
    second: String,
}

impl HostPair {
    /// Create a pair, normalizing endpoint order.
    pub fn new(a: impl Into<String>, b: impl Into<String>) -> Self {
        let a = a.into();
        let b = b.into();
        if a <= b {
            Self { first: a, second: b }
        } else {
            Self { first: b, second: a }
        }
    }

    /// The lexicographically smaller endpoint.
    pub fn first(&self) -> &str {
        &self.first
    }

    /// The lexicographically larger endpoint.
    pub fn second(&self) -> &str {
        &self.second
    }

    /// Whether the given host is one of the endpoints.
    pub fn contains(&self, host: &str) -> bool {
        self.first == host || self.second == host
    }
}

impl std::fmt::Display for HostPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.first, self.second)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_is_normalized() {
        let ab = HostPair::new("a.example", "b.example");
        let ba = HostPair::new("b.example", "a.example");
        assert_eq!(ab, ba);
        assert_eq!(ab.first(), "a.example");
        assert_eq!(ab.second(), "b.example");
    }

    #[test]
    fn display_is_canonical_id() {
        let pair = HostPair::new("misskey.io", "example.social");
        assert_eq!(pair.to_string(), "example.social-misskey.io");
    }

    #[test]
    fn contains_both_endpoints() {
        let pair = HostPair::new("a.example", "b.example");
        assert!(pair.contains("a.example"));
        assert!(pair.contains("b.example"));
        assert!(!pair.contains("c.example"));
    }
}
