//! Administrative request types.
//!
//! Every operation has its own request value, configured with chained
//! `self -> Self` setters. Requests are moved into the executor when they
//! are submitted. All of them (de)serialize with serde so a script can pass
//! a request as a plain map.

use crate::error::Result;
use crate::glob::NameFilter;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Target index names; empty means every index.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Indices(Vec<String>);

impl Indices {
    /// Marker the engine understands as "all indices".
    pub const ALL: &'static str = "_all";

    /// Target every index.
    pub fn all() -> Self {
        Self(Vec::new())
    }

    /// Target the given indices.
    pub fn of<I, T>(names: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        Self(names.into_iter().map(Into::into).collect())
    }

    /// Whether this targets every index.
    pub fn is_all(&self) -> bool {
        self.0.is_empty() || self.0.iter().any(|name| name == Self::ALL)
    }

    /// Add an index.
    pub fn push(&mut self, name: impl Into<String>) {
        self.0.push(name.into());
    }

    /// The explicit index names.
    pub fn names(&self) -> &[String] {
        &self.0
    }

    /// Borrowed names, as the transport wants them.
    pub fn as_strs(&self) -> Vec<&str> {
        self.0.iter().map(String::as_str).collect()
    }
}

impl fmt::Display for Indices {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_all() {
            f.write_str(Self::ALL)
        } else {
            f.write_str(&self.0.join(","))
        }
    }
}

impl<T: Into<String>> FromIterator<T> for Indices {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::of(iter)
    }
}

// =============================================================================
// Index lifecycle
// =============================================================================

/// Create an index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateIndexRequest {
    /// Index name.
    pub index: String,
    /// Raw JSON body as supplied by the user.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    /// Index settings, merged over the raw body.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settings: Option<Value>,
    /// Mappings by type, merged over the raw body.
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub mappings: Map<String, Value>,
    /// Acknowledgement timeout (engine time unit, e.g. `30s`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<String>,
}

impl CreateIndexRequest {
    /// Create a request for the given index.
    pub fn new(index: impl Into<String>) -> Self {
        Self {
            index: index.into(),
            source: None,
            settings: None,
            mappings: Map::new(),
            timeout: None,
        }
    }

    /// Set the raw JSON body.
    pub fn source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Set index settings.
    pub fn settings(mut self, settings: Value) -> Self {
        self.settings = Some(settings);
        self
    }

    /// Add a mapping for a type.
    pub fn mapping(mut self, name: impl Into<String>, mapping: Value) -> Self {
        self.mappings.insert(name.into(), mapping);
        self
    }

    /// Set the acknowledgement timeout.
    pub fn timeout(mut self, timeout: impl Into<String>) -> Self {
        self.timeout = Some(timeout.into());
        self
    }

    /// The body sent to the engine.
    ///
    /// The raw source is parsed here, so a malformed payload fails at
    /// submission.
    pub fn body(&self) -> Result<Value> {
        let mut body = match &self.source {
            Some(source) if !source.trim().is_empty() => serde_json::from_str(source)?,
            _ => Value::Object(Map::new()),
        };

        if let Value::Object(map) = &mut body {
            if let Some(settings) = &self.settings {
                map.insert("settings".to_string(), settings.clone());
            }
            if !self.mappings.is_empty() {
                let mappings = map
                    .entry("mappings")
                    .or_insert_with(|| Value::Object(Map::new()));
                if let Value::Object(existing) = mappings {
                    for (name, mapping) in &self.mappings {
                        existing.insert(name.clone(), mapping.clone());
                    }
                }
            }
        }

        Ok(body)
    }
}

/// Delete one or more indices.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DeleteIndexRequest {
    /// Indices to delete.
    pub indices: Indices,
    /// Acknowledgement timeout.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<String>,
}

impl DeleteIndexRequest {
    /// Delete a single index.
    pub fn new(index: impl Into<String>) -> Self {
        Self {
            indices: Indices::of([index]),
            timeout: None,
        }
    }

    /// Also delete another index.
    pub fn index(mut self, index: impl Into<String>) -> Self {
        self.indices.push(index);
        self
    }

    /// Set the acknowledgement timeout.
    pub fn timeout(mut self, timeout: impl Into<String>) -> Self {
        self.timeout = Some(timeout.into());
        self
    }
}

/// Open closed indices.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OpenIndexRequest {
    /// Indices to open.
    pub indices: Indices,
    /// Acknowledgement timeout.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<String>,
}

impl OpenIndexRequest {
    /// Open a single index.
    pub fn new(index: impl Into<String>) -> Self {
        Self {
            indices: Indices::of([index]),
            timeout: None,
        }
    }

    /// Also open another index.
    pub fn index(mut self, index: impl Into<String>) -> Self {
        self.indices.push(index);
        self
    }

    /// Set the acknowledgement timeout.
    pub fn timeout(mut self, timeout: impl Into<String>) -> Self {
        self.timeout = Some(timeout.into());
        self
    }
}

/// Close open indices.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CloseIndexRequest {
    /// Indices to close.
    pub indices: Indices,
    /// Acknowledgement timeout.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<String>,
}

impl CloseIndexRequest {
    /// Close a single index.
    pub fn new(index: impl Into<String>) -> Self {
        Self {
            indices: Indices::of([index]),
            timeout: None,
        }
    }

    /// Also close another index.
    pub fn index(mut self, index: impl Into<String>) -> Self {
        self.indices.push(index);
        self
    }

    /// Set the acknowledgement timeout.
    pub fn timeout(mut self, timeout: impl Into<String>) -> Self {
        self.timeout = Some(timeout.into());
        self
    }
}

// =============================================================================
// Maintenance
// =============================================================================

/// Flush indices to disk.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FlushRequest {
    /// Target indices.
    pub indices: Indices,
    /// Force a flush even when nothing is pending.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub force: Option<bool>,
    /// Block until a concurrent flush finishes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wait_if_ongoing: Option<bool>,
}

impl FlushRequest {
    /// Flush the given indices (empty for all).
    pub fn new(indices: Indices) -> Self {
        Self {
            indices,
            ..Self::default()
        }
    }

    /// Force the flush.
    pub fn force(mut self, force: bool) -> Self {
        self.force = Some(force);
        self
    }

    /// Wait for a running flush.
    pub fn wait_if_ongoing(mut self, wait: bool) -> Self {
        self.wait_if_ongoing = Some(wait);
        self
    }
}

/// Refresh indices so recent changes become searchable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RefreshRequest {
    /// Target indices.
    pub indices: Indices,
}

impl RefreshRequest {
    /// Refresh the given indices (empty for all).
    pub fn new(indices: Indices) -> Self {
        Self { indices }
    }
}

/// Merge index segments.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OptimizeRequest {
    /// Target indices.
    pub indices: Indices,
    /// Number of segments to merge down to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_num_segments: Option<i64>,
    /// Only expunge deleted documents.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub only_expunge_deletes: Option<bool>,
    /// Flush after merging.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flush: Option<bool>,
}

impl OptimizeRequest {
    /// Optimize the given indices (empty for all).
    pub fn new(indices: Indices) -> Self {
        Self {
            indices,
            ..Self::default()
        }
    }

    /// Merge down to this many segments.
    pub fn max_num_segments(mut self, segments: i64) -> Self {
        self.max_num_segments = Some(segments);
        self
    }

    /// Only expunge deletes.
    pub fn only_expunge_deletes(mut self, only: bool) -> Self {
        self.only_expunge_deletes = Some(only);
        self
    }

    /// Flush after merging.
    pub fn flush(mut self, flush: bool) -> Self {
        self.flush = Some(flush);
        self
    }
}

/// Index status (shard and store statistics).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StatusRequest {
    /// Target indices.
    pub indices: Indices,
}

impl StatusRequest {
    /// Status for the given indices (empty for all).
    pub fn new(indices: Indices) -> Self {
        Self { indices }
    }
}

// =============================================================================
// Metadata listings
// =============================================================================

/// List mappings by index.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GetMappingRequest {
    /// Target indices.
    pub indices: Indices,
    /// Mapping type filter.
    pub types: NameFilter,
}

impl GetMappingRequest {
    /// Mappings of the given indices (empty for all).
    pub fn new(indices: Indices) -> Self {
        Self {
            indices,
            types: NameFilter::any(),
        }
    }

    /// Only include mapping types matching a glob.
    pub fn types(mut self, pattern: impl Into<String>) -> Self {
        self.types = NameFilter::pattern(pattern);
        self
    }
}

/// List settings by index.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GetSettingsRequest {
    /// Target indices.
    pub indices: Indices,
}

impl GetSettingsRequest {
    /// Settings of the given indices (empty for all).
    pub fn new(indices: Indices) -> Self {
        Self { indices }
    }
}

/// List warmers by index.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GetWarmerRequest {
    /// Target indices.
    pub indices: Indices,
    /// Warmer name filter.
    pub name: NameFilter,
}

impl GetWarmerRequest {
    /// Warmers of the given indices (empty for all).
    pub fn new(indices: Indices) -> Self {
        Self {
            indices,
            name: NameFilter::any(),
        }
    }

    /// Restrict to the given indices.
    pub fn indices<I, T>(mut self, indices: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.indices = Indices::of(indices);
        self
    }

    /// Only include warmers whose name matches a glob.
    pub fn name(mut self, pattern: impl Into<String>) -> Self {
        self.name = NameFilter::pattern(pattern);
        self
    }
}

/// Cluster metadata request shared by the listing operations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClusterStateRequest {
    /// Indices whose metadata is wanted.
    pub indices: Indices,
}

// =============================================================================
// Engine-facing request
// =============================================================================

/// A request as the transport sees it.
#[derive(Debug, Clone, PartialEq)]
pub enum AdminRequest {
    /// Create an index.
    CreateIndex(CreateIndexRequest),
    /// Delete indices.
    DeleteIndex(DeleteIndexRequest),
    /// Open indices.
    OpenIndex(OpenIndexRequest),
    /// Close indices.
    CloseIndex(CloseIndexRequest),
    /// Flush indices.
    Flush(FlushRequest),
    /// Refresh indices.
    Refresh(RefreshRequest),
    /// Optimize (force merge) indices.
    Optimize(OptimizeRequest),
    /// Index statistics.
    Status(StatusRequest),
    /// Cluster metadata.
    ClusterState(ClusterStateRequest),
}

impl AdminRequest {
    /// Short operation name, used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            AdminRequest::CreateIndex(_) => "create_index",
            AdminRequest::DeleteIndex(_) => "delete_index",
            AdminRequest::OpenIndex(_) => "open_index",
            AdminRequest::CloseIndex(_) => "close_index",
            AdminRequest::Flush(_) => "flush",
            AdminRequest::Refresh(_) => "refresh",
            AdminRequest::Optimize(_) => "optimize",
            AdminRequest::Status(_) => "status",
            AdminRequest::ClusterState(_) => "cluster_state",
        }
    }
}
