//! The JSON blob stored per keybind configuration.
//!
//! Layout: `{"version": 1, "keys": {"<name>": {"purpose", "value", "required"}}}`.
//! Records written before versioning carry no `version` and are read as 1.

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};
use transpose_types::{Binding, KeyValue};

use super::PersistenceError;

/// Keybind record schema understood by this build.
pub const KEYBIND_SCHEMA_VERSION: u32 = 1;

fn legacy_version() -> u32 {
    1
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeybindRecord {
    #[serde(default = "legacy_version")]
    pub version: u32,
    #[serde(default)]
    pub keys: BTreeMap<String, StoredBinding>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoredBinding {
    #[serde(default)]
    pub purpose: Option<String>,
    #[serde(default)]
    pub value: Option<KeyValue>,
    #[serde(default)]
    pub required: Option<bool>,
}

impl KeybindRecord {
    pub fn from_bindings(bindings: &[Binding]) -> Self {
        let keys = bindings
            .iter()
            .map(|b| {
                (
                    b.name.clone(),
                    StoredBinding {
                        purpose: Some(b.purpose.clone()),
                        value: b.value(),
                        required: Some(b.required),
                    },
                )
            })
            .collect();
        Self {
            version: KEYBIND_SCHEMA_VERSION,
            keys,
        }
    }

    pub fn encode(&self) -> Result<String, PersistenceError> {
        serde_json::to_string(self).map_err(|e| PersistenceError::Json(e.to_string()))
    }

    /// Parse a stored blob. Records from a newer schema are refused.
    pub fn decode(json: &str) -> Result<Self, PersistenceError> {
        let record: KeybindRecord =
            serde_json::from_str(json).map_err(|e| PersistenceError::Json(e.to_string()))?;
        if record.version > KEYBIND_SCHEMA_VERSION {
            return Err(PersistenceError::UnsupportedVersion {
                found: record.version,
                supported: KEYBIND_SCHEMA_VERSION,
            });
        }
        Ok(record)
    }
}

/// Merge a stored record over the defaults.
///
/// Stored fields win; names absent from the record keep their default; names
/// not in `defaults` are dropped. Restricted keys and any key already held by
/// an earlier binding are cleared so the result never violates uniqueness.
pub fn merge(defaults: &[Binding], record: KeybindRecord, is_restricted: impl Fn(&str) -> bool) -> Vec<Binding> {
    let mut keys = record.keys;
    let mut taken: HashSet<String> = HashSet::new();
    let mut merged = Vec::with_capacity(defaults.len());

    for default in defaults {
        let mut binding = default.clone();
        if let Some(stored) = keys.remove(&default.name) {
            if let Some(purpose) = stored.purpose {
                binding.purpose = purpose;
            }
            if let Some(required) = stored.required {
                binding.required = required;
            }
            match stored.value {
                Some(value) => binding.assign(value),
                None => binding.clear(),
            }
        }

        if let Some(key) = binding.key.clone() {
            if is_restricted(&key) {
                log::warn!(target: "persistence", "dropping restricted key '{}' from '{}'", key, binding.name);
                binding.clear();
            } else if !taken.insert(key.clone()) {
                log::warn!(target: "persistence", "dropping duplicate key '{}' from '{}'", key, binding.name);
                binding.clear();
            }
        }
        merged.push(binding);
    }

    for name in keys.keys() {
        log::debug!(target: "persistence", "dropping unknown keybind '{}'", name);
    }

    merged
}
