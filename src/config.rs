//! Round-trippable configuration types.
//!
//! A [`MotionList`](crate::MotionList) exports its full state as a
//! [`MotionListConfig`] and can be reconstructed from one through the
//! factory registries. Exclusion and layer parameters travel as an
//! [`ItemConfig`]: a type tag plus an open parameter bag, so variants
//! registered outside this crate round-trip without any changes here.
//!
//! Persisting these mappings to TOML/JSON files is the job of an external
//! collaborator; the serde derives are the hook it uses.

use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{MotionError, Result};

/// Declared configuration of a single exclusion or layer.
///
/// Serializes flat: `{"type": "circle", "radius": 5.0, ...}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemConfig {
    /// Registry type tag selecting the variant.
    #[serde(rename = "type")]
    pub kind: String,
    /// The variant's declared parameters, keyed by name.
    #[serde(flatten)]
    pub params: Map<String, Value>,
}

impl ItemConfig {
    /// Creates a config with an empty parameter bag.
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            params: Map::new(),
        }
    }

    /// Sets a single parameter, returning the config for chaining.
    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.params.insert(key.to_string(), value.into());
        self
    }

    /// Packs a typed parameter struct under the given tag.
    pub fn pack<P: Serialize>(kind: &str, params: &P) -> Result<Self> {
        match serde_json::to_value(params) {
            Ok(Value::Object(map)) => Ok(Self {
                kind: kind.to_string(),
                params: map,
            }),
            Ok(_) => Err(MotionError::validation(
                "config",
                format!("parameters for '{kind}' did not serialize to a mapping"),
            )),
            Err(err) => Err(MotionError::validation("config", err.to_string())),
        }
    }

    /// Unpacks the parameter bag into a typed parameter struct.
    ///
    /// Missing, unknown, or mistyped parameters surface as
    /// [`MotionError::Validation`].
    pub fn unpack<P: DeserializeOwned>(&self) -> Result<P> {
        serde_json::from_value(Value::Object(self.params.clone())).map_err(|err| {
            MotionError::validation("config", format!("'{}' parameters: {err}", self.kind))
        })
    }
}

/// Per-axis space definition in parallel-vector form:
/// `{label: [...], range: [...], num: [...]}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpaceConfig {
    pub label: Vec<String>,
    pub range: Vec<[f64; 2]>,
    pub num: Vec<usize>,
}

/// Full, reconstructible configuration of a [`MotionList`](crate::MotionList).
///
/// Exclusions and layers are keyed by their insertion index so that a
/// rebuilt list applies them in the same order and reproduces an identical
/// final point sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MotionListConfig {
    pub space: SpaceConfig,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub exclusion: BTreeMap<usize, ItemConfig>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub layer: BTreeMap<usize, ItemConfig>,
}
