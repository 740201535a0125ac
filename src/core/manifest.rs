//! Manifest type.
//!
//! Tracks the names of secrets previously written to a scope. Secrets cannot
//! be listed back by value, so the manifest is stored next to them as a
//! plaintext variable holding a JSON array of names.

use std::collections::HashSet;

use tracing::debug;

use crate::core::constants::MANIFEST_SEED_KEY;
use crate::core::domain::DesiredSet;
use crate::core::types::VarName;

/// Ordered, duplicate-free list of tracked key names.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Manifest {
    names: Vec<VarName>,
}

impl Manifest {
    /// Create a manifest from names, dropping duplicates (first occurrence wins).
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<VarName>,
    {
        let mut seen = HashSet::new();
        let names = names
            .into_iter()
            .map(Into::into)
            .filter(|name: &VarName| seen.insert(name.clone()))
            .collect();
        Self { names }
    }

    /// Serialize to the JSON array stored in the manifest variable.
    pub fn encode(&self) -> String {
        // Serializing a Vec<String> cannot fail.
        serde_json::to_string(&self.names).unwrap_or_else(|_| "[]".to_string())
    }

    /// Parse a stored manifest.
    ///
    /// Missing, empty, or malformed input yields an empty manifest: absence
    /// means nothing has been tracked yet, not a failure.
    pub fn decode(raw: &str) -> Self {
        match serde_json::from_str::<Vec<VarName>>(raw) {
            Ok(names) => Self::new(names),
            Err(e) => {
                if !raw.trim().is_empty() {
                    debug!(error = %e, "ignoring unreadable manifest");
                }
                Self::default()
            }
        }
    }

    /// Parse an optional stored manifest.
    pub fn decode_opt(raw: Option<&str>) -> Self {
        raw.map(Self::decode).unwrap_or_default()
    }

    /// Tracked names that are no longer part of `desired`, in manifest order.
    ///
    /// The seed key itself is never reported as removed.
    pub fn removed(&self, desired: &DesiredSet) -> Vec<VarName> {
        self.names
            .iter()
            .filter(|name| name.as_str() != MANIFEST_SEED_KEY && !desired.contains(name))
            .cloned()
            .collect()
    }

    /// Tracked names.
    pub fn names(&self) -> &[VarName] {
        &self.names
    }

    /// Whether `name` is tracked.
    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    /// Number of tracked names.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Whether nothing is tracked.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
