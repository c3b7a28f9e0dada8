// SPDX-License-Identifier: Apache-2.0
//! Identifier newtypes shared across the graph model.
use std::fmt;

/// Stable external identity of a vertex in the master table.
///
/// Node ids are assigned monotonically by the store and never reused while
/// the vertex is live. They are shared by every domain overlay: vertex *i*
/// of any overlay denotes the same `NodeId` as vertex *i* of the master.
#[repr(transparent)]
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct NodeId(pub i64);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Identity of an edge *within one domain overlay*.
///
/// Edge ids are unique per domain only; the same numeric id may exist in
/// several domains and means nothing across them.
#[repr(transparent)]
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct EdgeId(pub i64);

impl fmt::Display for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Identity of an edge attribute in the attribute registry.
#[repr(transparent)]
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct AttrId(pub i32);

impl fmt::Display for AttrId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Identity of an external entity (e.g. a detected event) a vertex may be
/// linked to. A vertex with no linked entity is "virtual" (user-created).
#[repr(transparent)]
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct EntityId(pub i64);

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}
