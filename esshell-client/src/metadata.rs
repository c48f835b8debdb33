//! Cluster metadata and the listing views built from it.
//!
//! Mapping, settings and warmer listings are all read from the cluster
//! state. Each view keys the result by index name and leaves out indices
//! that have nothing to show.

use crate::error::Result;
use crate::glob::NameFilter;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// The subset of a cluster state response the shell reads.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ClusterStateResponse {
    /// Name of the cluster.
    pub cluster_name: Option<String>,
    /// Cluster metadata.
    pub metadata: MetaData,
}

impl ClusterStateResponse {
    /// Parse a raw cluster state body.
    pub fn from_value(value: Value) -> Result<Self> {
        Ok(serde_json::from_value(value)?)
    }
}

/// Cluster-wide metadata.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MetaData {
    /// Per-index metadata, ordered by index name.
    pub indices: BTreeMap<String, IndexMetaData>,
}

/// Metadata of a single index.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexMetaData {
    /// `open` or `close`.
    pub state: Option<String>,
    /// Index settings.
    pub settings: Value,
    /// Mappings keyed by type.
    pub mappings: Map<String, Value>,
    /// Alias names.
    pub aliases: Vec<String>,
    /// Registered warmers keyed by name.
    pub warmers: BTreeMap<String, WarmerEntry>,
}

/// A registered warmer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WarmerEntry {
    /// Mapping types the warmer applies to.
    pub types: Vec<String>,
    /// Warmer search source.
    pub source: Value,
}

/// Listing of mappings: `{index: {"mappings": {type: mapping}}}`.
pub fn mappings_view(state: &ClusterStateResponse, types: &NameFilter) -> Value {
    listing(state, "mappings", |meta| {
        meta.mappings
            .iter()
            .filter(|(name, _)| types.matches(name))
            .map(|(name, mapping)| (name.clone(), mapping.clone()))
            .collect()
    })
}

/// Listing of settings: `{index: {"settings": {...}}}`.
pub fn settings_view(state: &ClusterStateResponse) -> Value {
    listing(state, "settings", |meta| match &meta.settings {
        Value::Object(settings) => settings.clone(),
        _ => Map::new(),
    })
}

/// Listing of warmers: `{index: {"warmers": {name: {"types", "source"}}}}`.
pub fn warmers_view(state: &ClusterStateResponse, name: &NameFilter) -> Value {
    listing(state, "warmers", |meta| {
        meta.warmers
            .iter()
            .filter(|(warmer, _)| name.matches(warmer))
            .map(|(warmer, entry)| {
                let mut body = Map::new();
                body.insert(
                    "types".to_string(),
                    Value::from(entry.types.clone()),
                );
                body.insert("source".to_string(), entry.source.clone());
                (warmer.clone(), Value::Object(body))
            })
            .collect()
    })
}

fn listing<F>(state: &ClusterStateResponse, category: &str, entries: F) -> Value
where
    F: Fn(&IndexMetaData) -> Map<String, Value>,
{
    let mut out = Map::new();
    for (index, meta) in &state.metadata.indices {
        let entries = entries(meta);
        if entries.is_empty() {
            continue;
        }
        let mut section = Map::new();
        section.insert(category.to_string(), Value::Object(entries));
        out.insert(index.clone(), Value::Object(section));
    }
    Value::Object(out)
}
