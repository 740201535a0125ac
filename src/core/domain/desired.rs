//! DesiredSet type.
//!
//! The key-value set a reconciliation pass should leave behind, plus the
//! reserved seed entry listing every other key.

use std::collections::BTreeMap;
use std::fmt;

use zeroize::Zeroize;

use crate::core::constants::MANIFEST_SEED_KEY;
use crate::core::manifest::Manifest;
use crate::core::types::{PlainValue, VarName};
use crate::error::{Result, SyncError};

/// Desired variables for one scope.
///
/// Always holds the [`MANIFEST_SEED_KEY`] entry whose value is the JSON array
/// of all other key names. Values are wiped from memory on drop.
#[derive(Clone, PartialEq, Eq)]
pub struct DesiredSet {
    vars: BTreeMap<VarName, PlainValue>,
}

impl DesiredSet {
    /// Build a desired set and compute its seed.
    ///
    /// Any seed already present in `vars` is replaced.
    pub fn new(mut vars: BTreeMap<VarName, PlainValue>) -> Self {
        vars.remove(MANIFEST_SEED_KEY);
        let seed = Manifest::new(vars.keys().cloned()).encode();
        vars.insert(MANIFEST_SEED_KEY.to_string(), seed);
        Self { vars }
    }

    /// Accept a caller-built map that already carries a seed.
    ///
    /// # Errors
    ///
    /// Returns `SyncError::Encoding` if the seed is missing or does not list
    /// exactly the other keys.
    pub fn parse(vars: BTreeMap<VarName, PlainValue>) -> Result<Self> {
        let seed = vars
            .get(MANIFEST_SEED_KEY)
            .ok_or_else(|| SyncError::Encoding(format!("missing {} entry", MANIFEST_SEED_KEY)))?;

        let mut listed: Vec<String> = serde_json::from_str(seed)
            .map_err(|e| SyncError::Encoding(format!("invalid {}: {}", MANIFEST_SEED_KEY, e)))?;
        listed.sort_unstable();
        listed.dedup();

        let expected = vars
            .keys()
            .map(String::as_str)
            .filter(|k| *k != MANIFEST_SEED_KEY);

        if listed.iter().map(String::as_str).ne(expected) {
            return Err(SyncError::Encoding(format!(
                "{} does not match the variable names",
                MANIFEST_SEED_KEY
            ))
            .into());
        }

        Ok(Self { vars })
    }

    /// Prefix every key with `ENV_` (environment name upper-cased).
    pub fn with_prefix(mut self, environment: &str) -> Self {
        let prefix = environment.to_uppercase();
        let vars = std::mem::take(&mut self.vars)
            .into_iter()
            .filter(|(k, _)| k != MANIFEST_SEED_KEY)
            .map(|(k, v)| (format!("{}_{}", prefix, k), v))
            .collect();
        Self::new(vars)
    }

    /// The seed value (JSON array of key names).
    pub fn seed(&self) -> &str {
        self.vars
            .get(MANIFEST_SEED_KEY)
            .map(String::as_str)
            .unwrap_or("[]")
    }

    /// The seed decoded as a manifest.
    pub fn manifest(&self) -> Manifest {
        Manifest::decode(self.seed())
    }

    /// Non-seed entries in key order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.vars
            .iter()
            .filter(|(k, _)| k.as_str() != MANIFEST_SEED_KEY)
            .map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Non-seed key names in order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries().map(|(k, _)| k)
    }

    /// Look up a non-seed value.
    pub fn get(&self, key: &str) -> Option<&str> {
        if key == MANIFEST_SEED_KEY {
            return None;
        }
        self.vars.get(key).map(String::as_str)
    }

    /// Whether a non-seed key is present.
    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Number of non-seed entries.
    pub fn len(&self) -> usize {
        self.vars.len() - 1
    }

    /// Whether there are no non-seed entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Debug for DesiredSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DesiredSet")
            .field("keys", &self.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl Drop for DesiredSet {
    fn drop(&mut self) {
        for value in self.vars.values_mut() {
            value.zeroize();
        }
    }
}
