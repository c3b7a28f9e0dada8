// SPDX-License-Identifier: Apache-2.0
//! Error taxonomy for graph mutations.
//!
//! Every variant is local and recoverable: the offending operation is
//! abandoned with the store unchanged, and nothing here is fatal to the
//! rest of the model. Batch operations (multi-vertex/edge deletion) are
//! all-or-nothing per batch.
use thiserror::Error;

use crate::ident::{EdgeId, NodeId};

/// Failure of a single graph operation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
    /// Vertex creation referenced a type label the type registry rejects.
    #[error("unknown node type: {0}")]
    UnknownType(String),
    /// Edge creation referenced a domain the domain registry cannot resolve.
    #[error("unknown domain: {0}")]
    UnknownDomain(String),
    /// The operation targeted a reserved or redeclared domain.
    #[error("invalid domain: {0}")]
    InvalidDomain(String),
    /// An operation referenced a vertex id that is not live.
    #[error("unknown vertex id: {0}")]
    UnknownVertex(NodeId),
    /// Explicit-id vertex creation named an id that is already live.
    #[error("vertex id already live: {0}")]
    DuplicateVertex(NodeId),
    /// An operation referenced an edge id not present in its domain.
    #[error("unknown edge id {id} in domain {domain:?}")]
    UnknownEdge {
        /// Domain the lookup was scoped to.
        domain: String,
        /// The offending edge id.
        id: EdgeId,
    },
    /// A time-range setter would have made start exceed end.
    #[error("start time/frame must not exceed end time/frame")]
    InvalidTimeRange,
}
