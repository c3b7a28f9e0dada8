// SPDX-License-Identifier: Apache-2.0
//! The interchange document: serde types and JSON parsing.
//!
//! Times in the document are seconds; the store works in microseconds. The
//! conversion happens in the import/export replay code, not here.
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::DocumentError;

/// A complete persisted graph: nodes, per-domain primitives, and the
/// surrounding activity metadata.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphDocument {
    /// Activity name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Free-form description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Configured activity id this graph defines.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub activity_id: Option<i64>,
    /// Spatial matching window.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_spatial_window: Option<f64>,
    /// Temporal matching window, seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_temporal_window: Option<f64>,
    /// Events shared between matched instances.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub num_common_events: Option<u32>,
    /// Minimum event count for a match.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_num_events: Option<u32>,
    /// Per-domain threshold parameter values, keyed by domain name.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub primitive_params: BTreeMap<String, f64>,
    /// Every vertex, in creation-replay order.
    #[serde(default)]
    pub nodes: Vec<NodeElement>,
    /// One block per domain carrying that domain's links.
    #[serde(default)]
    pub primitives: Vec<PrimitiveElement>,
}

impl GraphDocument {
    /// Parses a document from its JSON text.
    ///
    /// # Errors
    /// [`DocumentError::Parse`] when the text is not valid JSON of this
    /// shape.
    pub fn from_json(text: &str) -> Result<Self, DocumentError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Renders the document as pretty-printed JSON.
    ///
    /// # Errors
    /// [`DocumentError::Parse`] on serializer failure.
    pub fn to_json(&self) -> Result<String, DocumentError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// One persisted vertex.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeElement {
    /// Explicit vertex id for replay.
    pub id: i64,
    /// Display label.
    pub label: String,
    /// Type label.
    pub event_type: String,
    /// Layout x.
    pub x: f64,
    /// Layout y.
    pub y: f64,
    /// Raw spatial x, when the vertex has a spatial fix.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spatial_x: Option<f64>,
    /// Raw spatial y.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spatial_y: Option<f64>,
    /// Linked external event id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_id: Option<i64>,
    /// Start time, seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_start_time: Option<f64>,
    /// Start frame number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_start_frame: Option<u32>,
    /// End time, seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_end_time: Option<f64>,
    /// End frame number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_end_frame: Option<u32>,
    /// Start display anchor x.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_start_position_x: Option<f64>,
    /// Start display anchor y.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_start_position_y: Option<f64>,
    /// End display anchor x.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_end_position_x: Option<f64>,
    /// End display anchor y.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_end_position_y: Option<f64>,
    /// Temporal-layout group id.
    #[serde(default)]
    pub group_id: u32,
    /// Default edge attribute, by configured name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_edge_attr: Option<String>,
}

/// One domain's persisted edges.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PrimitiveElement {
    /// Domain name.
    pub name: String,
    /// Directedness, persisted as the strings `"true"`/`"false"`.
    #[serde(with = "bool_string")]
    pub directed: bool,
    /// Edges of this domain, in replay order.
    #[serde(default)]
    pub links: Vec<LinkElement>,
}

/// One persisted edge.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LinkElement {
    /// Explicit edge id for replay.
    pub id: i64,
    /// Parent endpoint vertex id.
    pub parent_id: i64,
    /// Child endpoint vertex id.
    pub child_id: i64,
    /// Parent-side attribute names.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parent_attributes: Vec<String>,
    /// Child-side attribute names.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub child_attributes: Vec<String>,
}

mod bool_string {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &bool, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(if *value { "true" } else { "false" })
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
        let text = String::deserialize(deserializer)?;
        match text.as_str() {
            "true" => Ok(true),
            "false" => Ok(false),
            other => Err(serde::de::Error::custom(format!(
                "expected \"true\" or \"false\", got {other:?}"
            ))),
        }
    }
}
