// SPDX-License-Identifier: Apache-2.0
//! Per-domain overlay graphs.
//!
//! Each named domain owns its edges and an edge-id counter; vertices are
//! shared with the master table, so an overlay only tracks how many it has
//! mirrored. Directedness is a per-domain tag carried alongside the edge
//! storage, never a separate representation.
use std::collections::BTreeMap;

use crate::ident::{AttrId, EdgeId, NodeId};

/// Reserved name of the master, vertex-only graph. It never carries edges.
pub const MASTER_DOMAIN: &str = "None";

/// Whether a domain's edges are ordered pairs or unordered ones.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Directedness {
    /// Parent → child is meaningful.
    Directed,
    /// Parent/child roles are storage order only.
    Undirected,
}

/// One edge within a single domain.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EdgeRecord {
    /// Parent (source) endpoint, by stable vertex id.
    pub parent: NodeId,
    /// Child (target) endpoint, by stable vertex id.
    pub child: NodeId,
    /// Attribute ids attached at the parent endpoint.
    pub parent_attrs: Vec<AttrId>,
    /// Attribute ids attached at the child endpoint.
    pub child_attrs: Vec<AttrId>,
    /// Per-domain edge selection flag.
    pub selected: bool,
}

impl EdgeRecord {
    /// True when this edge joins `a` and `b` in either orientation.
    #[must_use]
    pub fn connects(&self, a: NodeId, b: NodeId) -> bool {
        (self.parent == a && self.child == b) || (self.parent == b && self.child == a)
    }
}

/// One overlay relation graph: edge storage, id counter, directedness tag.
///
/// Edges live in a `BTreeMap` so iteration order is deterministic by id,
/// which the codec and render bookkeeping rely on.
#[derive(Clone, Debug)]
pub struct DomainGraph {
    directedness: Directedness,
    edges: BTreeMap<EdgeId, EdgeRecord>,
    next_edge_id: i64,
    vertex_count: usize,
}

impl DomainGraph {
    /// Creates an empty overlay mirroring `vertex_count` master vertices.
    #[must_use]
    pub fn new(directedness: Directedness, vertex_count: usize) -> Self {
        Self {
            directedness,
            edges: BTreeMap::new(),
            next_edge_id: 0,
            vertex_count,
        }
    }

    /// The domain's directedness tag.
    #[must_use]
    pub fn directedness(&self) -> Directedness {
        self.directedness
    }

    /// Number of vertices mirrored from the master table.
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.vertex_count
    }

    /// Mirrors one newly created master vertex.
    pub fn mirror_vertex(&mut self) {
        self.vertex_count += 1;
    }

    /// Mirrors the removal of `n` master vertices, dropping their incident
    /// edges.
    pub fn unmirror_vertices(&mut self, removed: &[NodeId]) {
        self.vertex_count -= removed.len();
        self.edges
            .retain(|_, e| !removed.contains(&e.parent) && !removed.contains(&e.child));
    }

    /// Number of edges in this domain.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Inserts an edge under an explicit id, advancing the id counter to
    /// `max(id + 1, current)`.
    pub fn insert_edge(&mut self, id: EdgeId, record: EdgeRecord) {
        self.next_edge_id = self.next_edge_id.max(id.0 + 1);
        self.edges.insert(id, record);
    }

    /// Allocates the next free edge id without consuming it.
    #[must_use]
    pub fn peek_next_edge_id(&self) -> EdgeId {
        EdgeId(self.next_edge_id)
    }

    /// Looks up an edge by id.
    #[must_use]
    pub fn edge(&self, id: EdgeId) -> Option<&EdgeRecord> {
        self.edges.get(&id)
    }

    /// Mutable lookup of an edge by id.
    pub fn edge_mut(&mut self, id: EdgeId) -> Option<&mut EdgeRecord> {
        self.edges.get_mut(&id)
    }

    /// True when `id` names a live edge in this domain.
    #[must_use]
    pub fn has_edge(&self, id: EdgeId) -> bool {
        self.edges.contains_key(&id)
    }

    /// Id of an edge joining `a` and `b` (either orientation), if any.
    #[must_use]
    pub fn edge_between(&self, a: NodeId, b: NodeId) -> Option<EdgeId> {
        self.edges
            .iter()
            .find(|(_, e)| e.connects(a, b))
            .map(|(id, _)| *id)
    }

    /// Iterates `(id, edge)` pairs in ascending id order.
    pub fn edges(&self) -> impl Iterator<Item = (EdgeId, &EdgeRecord)> {
        self.edges.iter().map(|(id, e)| (*id, e))
    }

    /// Removes the listed edges. Ids were validated by the caller.
    pub fn remove_edges(&mut self, ids: &[EdgeId]) {
        for id in ids {
            self.edges.remove(id);
        }
    }

    /// Ids of the currently selected edges, ascending.
    #[must_use]
    pub fn selected_edges(&self) -> Vec<EdgeId> {
        self.edges
            .iter()
            .filter(|(_, e)| e.selected)
            .map(|(id, _)| *id)
            .collect()
    }

    /// Clears every edge selection flag in this domain.
    pub fn clear_selection(&mut self) {
        for e in self.edges.values_mut() {
            e.selected = false;
        }
    }
}
