//! Known-server catalog.

use std::collections::HashMap;

/// A known server from the directory catalog.
///
/// Immutable snapshot: loaded once per page load and replaced wholesale on
/// refresh, never patched in place.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct ServerRecord {
    /// Hostname, the unique key.
    pub host: String,
    /// Display name, if the server reports one.
    pub name: Option<String>,
    /// Registered local accounts.
    pub users_count: u64,
    /// Local posts.
    pub notes_count: u64,
    /// Software repository URL, identifies the software family.
    pub repository_url: Option<String>,
    /// Server icon.
    pub icon_url: Option<String>,
    /// Whether the server accepts new registrations.
    pub open_registrations: bool,
    /// Whether the server is flagged as age-restricted.
    pub age_restricted: bool,
}

impl ServerRecord {
    /// Create a minimal record with only a host and user count.
    pub fn new(host: impl Into<String>, users_count: u64) -> Self {
        Self {
            host: host.into(),
            name: None,
            users_count,
            notes_count: 0,
            repository_url: None,
            icon_url: None,
            open_registrations: false,
            age_restricted: false,
        }
    }

    /// Display name, falling back to the host.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.host)
    }
}

/// The catalog of known servers, keyed by host.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ServerCatalog {
    servers: HashMap<String, ServerRecord>,
}

impl ServerCatalog {
    /// Empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a catalog from records. Later duplicates of a host replace
    /// earlier ones (the directory is authoritative on order).
    pub fn from_records(records: impl IntoIterator<Item = ServerRecord>) -> Self {
        let servers = records
            .into_iter()
            .map(|r| (r.host.clone(), r))
            .collect();
        Self { servers }
    }

    /// Look up a server by host.
    pub fn get(&self, host: &str) -> Option<&ServerRecord> {
        self.servers.get(host)
    }

    /// Whether a host is known.
    pub fn contains(&self, host: &str) -> bool {
        self.servers.contains_key(host)
    }

    /// Number of known servers.
    pub fn len(&self) -> usize {
        self.servers.len()
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.servers.is_empty()
    }

    /// Iterate all records.
    pub fn iter(&self) -> impl Iterator<Item = &ServerRecord> {
        self.servers.values()
    }
}
