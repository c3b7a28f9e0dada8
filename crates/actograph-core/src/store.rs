// SPDX-License-Identifier: Apache-2.0
//! The multi-domain graph store.
//!
//! Single source of truth for vertices, domains, edges, and selection sets.
//! Every overlay graph mirrors the master vertex set 1:1; the store enforces
//! that parity by being the only writer of both sides. Failed operations
//! leave the store untouched, batch deletions included.
use std::collections::BTreeMap;

use glam::{DVec2, DVec3};
use rustc_hash::FxHashSet;

use crate::domain::{Directedness, DomainGraph, EdgeRecord, MASTER_DOMAIN};
use crate::error::GraphError;
use crate::ident::{AttrId, EdgeId, EntityId, NodeId};
use crate::registry::{DomainRegistry, TypeRegistry};
use crate::table::{AttributeTable, PositionSpace, VertexRow};
use crate::time::TimeMark;

/// Everything a caller supplies to create one vertex.
///
/// Only the type label and the layout position are mandatory; the rest
/// defaults to "unset" the way an interactively placed node starts out.
#[derive(Clone, Debug)]
pub struct VertexSeed {
    /// Type label, validated against the type registry.
    pub type_label: String,
    /// Layout position (written to both the user and cached columns).
    pub position: DVec3,
    /// Display label. Empty means the caller has none.
    pub label: String,
    /// Attribute seeded onto new edges touching this vertex.
    pub default_edge_attr: Option<AttrId>,
    /// Cluster id for the temporal layout.
    pub group_id: u32,
    /// Start of the represented time range.
    pub start: TimeMark,
    /// End of the represented time range.
    pub end: TimeMark,
    /// Raw spatial position, when the vertex has a spatial fix.
    pub spatial: Option<DVec2>,
    /// Start display anchor; defaults to the layout position.
    pub start_position: Option<DVec2>,
    /// End display anchor; defaults to the layout position.
    pub end_position: Option<DVec2>,
    /// Originating external entity. `None` marks the vertex as virtual.
    pub linked_entity: Option<EntityId>,
}

impl VertexSeed {
    /// Seed with just a type and a position; everything else unset.
    #[must_use]
    pub fn new(type_label: impl Into<String>, position: DVec3) -> Self {
        Self {
            type_label: type_label.into(),
            position,
            label: String::new(),
            default_edge_attr: None,
            group_id: 0,
            start: TimeMark::UNSET,
            end: TimeMark::UNSET,
            spatial: None,
            start_position: None,
            end_position: None,
            linked_entity: None,
        }
    }
}

/// Master vertex table plus one overlay relation graph per domain.
#[derive(Debug, Default, Clone)]
pub struct GraphStore {
    table: AttributeTable,
    domains: BTreeMap<String, DomainGraph>,
    next_node_id: i64,
    position_locked: bool,
    revision: u64,
}

impl GraphStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Monotonic counter bumped on every successful mutation. Consumers
    /// poll it to detect change.
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    fn touch(&mut self) {
        self.revision += 1;
    }

    /// The master attribute table, for index-based iteration.
    #[must_use]
    pub fn table(&self) -> &AttributeTable {
        &self.table
    }

    /// Number of master vertices.
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.table.len()
    }

    /// The id the next implicit vertex creation will assign.
    #[must_use]
    pub fn peek_next_vertex_id(&self) -> NodeId {
        NodeId(self.next_node_id)
    }

    /// Looks up one domain overlay by name.
    #[must_use]
    pub fn domain(&self, name: &str) -> Option<&DomainGraph> {
        self.domains.get(name)
    }

    /// Iterates `(name, overlay)` pairs in name order.
    pub fn domains(&self) -> impl Iterator<Item = (&str, &DomainGraph)> {
        self.domains.iter().map(|(n, d)| (n.as_str(), d))
    }

    /// Freezes or unfreezes position writes that do not override the lock.
    pub fn set_position_locked(&mut self, locked: bool) {
        self.position_locked = locked;
    }

    /// Current state of the global position lock.
    #[must_use]
    pub fn is_position_locked(&self) -> bool {
        self.position_locked
    }

    /// Creates a vertex with an implicitly assigned id.
    ///
    /// # Errors
    /// [`GraphError::UnknownType`] when the registry rejects the seed's type
    /// label; the store is unchanged.
    pub fn create_vertex(
        &mut self,
        types: &dyn TypeRegistry,
        seed: VertexSeed,
    ) -> Result<NodeId, GraphError> {
        let id = NodeId(self.next_node_id);
        self.create_vertex_with_id(types, id, seed)
    }

    /// Creates a vertex under an explicit id (deserialization replay).
    ///
    /// Advances the id counter to `max(id + 1, current)` so later implicit
    /// creations never collide.
    ///
    /// # Errors
    /// [`GraphError::UnknownType`] when the registry rejects the type
    /// label, [`GraphError::DuplicateVertex`] when `id` is already live;
    /// the store is unchanged either way.
    pub fn create_vertex_with_id(
        &mut self,
        types: &dyn TypeRegistry,
        id: NodeId,
        seed: VertexSeed,
    ) -> Result<NodeId, GraphError> {
        if !types.is_known_type(&seed.type_label) {
            return Err(GraphError::UnknownType(seed.type_label));
        }
        if self.table.index_of(id).is_some() {
            return Err(GraphError::DuplicateVertex(id));
        }
        self.next_node_id = self.next_node_id.max(id.0 + 1);

        let anchor = DVec2::new(seed.position.x, seed.position.y);
        let spatial = seed
            .spatial
            .map_or(DVec3::new(f64::NAN, f64::NAN, 0.0), |s| {
                DVec3::new(s.x, s.y, 0.0)
            });
        self.table.push_row(VertexRow {
            id,
            type_label: seed.type_label,
            label: seed.label,
            group_id: seed.group_id,
            default_edge_attr: seed.default_edge_attr,
            linked_entity: seed.linked_entity,
            start: seed.start,
            end: seed.end,
            position: seed.position,
            spatial,
            start_position: seed.start_position.unwrap_or(anchor),
            end_position: seed.end_position.unwrap_or(anchor),
        });
        for overlay in self.domains.values_mut() {
            overlay.mirror_vertex();
        }
        self.touch();
        Ok(id)
    }

    /// Retypes an existing vertex, replacing its label and default edge
    /// attribute along with the type label.
    ///
    /// # Errors
    /// [`GraphError::UnknownType`] or [`GraphError::UnknownVertex`].
    pub fn set_vertex_type(
        &mut self,
        types: &dyn TypeRegistry,
        id: NodeId,
        type_label: impl Into<String>,
        label: impl Into<String>,
        default_edge_attr: Option<AttrId>,
    ) -> Result<(), GraphError> {
        let type_label = type_label.into();
        if !types.is_known_type(&type_label) {
            return Err(GraphError::UnknownType(type_label));
        }
        let index = self.index_of(id)?;
        self.table.set_type_label(index, type_label);
        self.table.set_label(index, label.into());
        self.table.set_default_edge_attr(index, default_edge_attr);
        self.touch();
        Ok(())
    }

    /// Explicitly declares a domain before any edge references it.
    ///
    /// # Errors
    /// [`GraphError::InvalidDomain`] for the reserved master name or a name
    /// already declared.
    pub fn create_domain(
        &mut self,
        name: impl Into<String>,
        directedness: Directedness,
    ) -> Result<(), GraphError> {
        let name = name.into();
        if name == MASTER_DOMAIN || self.domains.contains_key(&name) {
            return Err(GraphError::InvalidDomain(name));
        }
        let overlay = DomainGraph::new(directedness, self.table.len());
        self.domains.insert(name, overlay);
        self.touch();
        Ok(())
    }

    /// Creates an edge with an implicitly assigned per-domain id.
    ///
    /// # Errors
    /// [`GraphError::InvalidDomain`] for the master domain,
    /// [`GraphError::UnknownVertex`] for a dead endpoint,
    /// [`GraphError::UnknownDomain`] when a fresh domain name cannot be
    /// resolved by the registry.
    pub fn create_edge(
        &mut self,
        registry: &dyn DomainRegistry,
        domain: &str,
        parent: NodeId,
        child: NodeId,
        parent_attrs: Option<Vec<AttrId>>,
        child_attrs: Option<Vec<AttrId>>,
    ) -> Result<EdgeId, GraphError> {
        self.create_edge_inner(registry, domain, None, parent, child, parent_attrs, child_attrs)
    }

    /// Creates an edge under an explicit id (deserialization replay),
    /// advancing the domain's id counter to `max(id + 1, current)`.
    ///
    /// # Errors
    /// Same failure cases as [`Self::create_edge`].
    #[allow(clippy::too_many_arguments)]
    pub fn create_edge_with_id(
        &mut self,
        registry: &dyn DomainRegistry,
        domain: &str,
        id: EdgeId,
        parent: NodeId,
        child: NodeId,
        parent_attrs: Option<Vec<AttrId>>,
        child_attrs: Option<Vec<AttrId>>,
    ) -> Result<EdgeId, GraphError> {
        self.create_edge_inner(registry, domain, Some(id), parent, child, parent_attrs, child_attrs)
    }

    #[allow(clippy::too_many_arguments)]
    fn create_edge_inner(
        &mut self,
        registry: &dyn DomainRegistry,
        domain: &str,
        id: Option<EdgeId>,
        parent: NodeId,
        child: NodeId,
        parent_attrs: Option<Vec<AttrId>>,
        child_attrs: Option<Vec<AttrId>>,
    ) -> Result<EdgeId, GraphError> {
        if domain == MASTER_DOMAIN {
            return Err(GraphError::InvalidDomain(domain.to_owned()));
        }
        let parent_index = self.index_of(parent)?;
        let child_index = self.index_of(child)?;

        if !self.domains.contains_key(domain) {
            let spec = registry
                .resolve(domain)
                .ok_or_else(|| GraphError::UnknownDomain(domain.to_owned()))?;
            let overlay = DomainGraph::new(spec.directedness, self.table.len());
            self.domains.insert(domain.to_owned(), overlay);
        }

        let parent_attrs = parent_attrs.unwrap_or_else(|| {
            self.table
                .default_edge_attr(parent_index)
                .map_or_else(Vec::new, |a| vec![a])
        });
        let child_attrs = child_attrs.unwrap_or_else(|| {
            self.table
                .default_edge_attr(child_index)
                .map_or_else(Vec::new, |a| vec![a])
        });

        let overlay = self
            .domains
            .get_mut(domain)
            .ok_or_else(|| GraphError::UnknownDomain(domain.to_owned()))?;
        let id = id.unwrap_or_else(|| overlay.peek_next_edge_id());
        overlay.insert_edge(
            id,
            EdgeRecord {
                parent,
                child,
                parent_attrs,
                child_attrs,
                selected: false,
            },
        );
        self.touch();
        Ok(id)
    }

    /// True when `id` names a live edge in `domain`.
    #[must_use]
    pub fn has_edge(&self, domain: &str, id: EdgeId) -> bool {
        self.domains.get(domain).is_some_and(|d| d.has_edge(id))
    }

    /// Id of an edge joining `a` and `b` in `domain` (either orientation).
    #[must_use]
    pub fn edge_between(&self, domain: &str, a: NodeId, b: NodeId) -> Option<EdgeId> {
        self.domains.get(domain).and_then(|d| d.edge_between(a, b))
    }

    /// Deletes a batch of vertices and their incident edges in every domain.
    ///
    /// All-or-nothing: every id is resolved before any mutation. Ids
    /// repeated within the batch count once.
    ///
    /// # Errors
    /// [`GraphError::UnknownVertex`] names the first dead id; nothing was
    /// deleted.
    pub fn delete_vertices(&mut self, ids: &[NodeId]) -> Result<(), GraphError> {
        let mut seen = FxHashSet::default();
        let mut doomed = Vec::with_capacity(ids.len());
        for id in ids {
            self.index_of(*id)?;
            if seen.insert(*id) {
                doomed.push(*id);
            }
        }
        if doomed.is_empty() {
            return Ok(());
        }
        for overlay in self.domains.values_mut() {
            overlay.unmirror_vertices(&doomed);
        }
        self.table.remove_rows(&doomed);
        self.touch();
        Ok(())
    }

    /// Deletes a batch of edges within one domain, all-or-nothing.
    ///
    /// # Errors
    /// [`GraphError::UnknownDomain`] for an undeclared domain,
    /// [`GraphError::UnknownEdge`] naming the first dead id; nothing was
    /// deleted.
    pub fn delete_edges(&mut self, domain: &str, ids: &[EdgeId]) -> Result<(), GraphError> {
        let overlay = self
            .domains
            .get_mut(domain)
            .ok_or_else(|| GraphError::UnknownDomain(domain.to_owned()))?;
        for id in ids {
            if !overlay.has_edge(*id) {
                return Err(GraphError::UnknownEdge {
                    domain: domain.to_owned(),
                    id: *id,
                });
            }
        }
        if ids.is_empty() {
            return Ok(());
        }
        overlay.remove_edges(ids);
        self.touch();
        Ok(())
    }

    /// Replaces the vertex selection with `ids`.
    ///
    /// # Errors
    /// [`GraphError::UnknownVertex`]; the previous selection is kept.
    pub fn set_selected_vertices(&mut self, ids: &[NodeId]) -> Result<(), GraphError> {
        let indices = self.resolve_all(ids)?;
        self.table.clear_selection();
        for index in indices {
            self.table.set_selected(index, true);
        }
        self.touch();
        Ok(())
    }

    /// Adds `ids` to the vertex selection.
    ///
    /// # Errors
    /// [`GraphError::UnknownVertex`]; the selection is unchanged.
    pub fn add_selected_vertices(&mut self, ids: &[NodeId]) -> Result<(), GraphError> {
        let indices = self.resolve_all(ids)?;
        for index in indices {
            self.table.set_selected(index, true);
        }
        self.touch();
        Ok(())
    }

    /// Currently selected vertex ids, in row order.
    #[must_use]
    pub fn selected_vertices(&self) -> Vec<NodeId> {
        (0..self.table.len())
            .filter(|&i| self.table.selected(i))
            .map(|i| self.table.id_at(i))
            .collect()
    }

    /// Replaces the edge selection with `ids` in `domain`, clearing edge
    /// selection in every other domain first.
    ///
    /// # Errors
    /// [`GraphError::UnknownDomain`] / [`GraphError::UnknownEdge`]; no
    /// selection was changed.
    pub fn set_selected_edges(&mut self, domain: &str, ids: &[EdgeId]) -> Result<(), GraphError> {
        {
            let overlay = self
                .domains
                .get(domain)
                .ok_or_else(|| GraphError::UnknownDomain(domain.to_owned()))?;
            for id in ids {
                if !overlay.has_edge(*id) {
                    return Err(GraphError::UnknownEdge {
                        domain: domain.to_owned(),
                        id: *id,
                    });
                }
            }
        }
        for overlay in self.domains.values_mut() {
            overlay.clear_selection();
        }
        self.mark_edges_selected(domain, ids);
        self.touch();
        Ok(())
    }

    /// Adds `ids` to the edge selection of `domain`.
    ///
    /// # Errors
    /// [`GraphError::UnknownDomain`] / [`GraphError::UnknownEdge`]; no
    /// selection was changed.
    pub fn add_selected_edges(&mut self, domain: &str, ids: &[EdgeId]) -> Result<(), GraphError> {
        let overlay = self
            .domains
            .get(domain)
            .ok_or_else(|| GraphError::UnknownDomain(domain.to_owned()))?;
        for id in ids {
            if !overlay.has_edge(*id) {
                return Err(GraphError::UnknownEdge {
                    domain: domain.to_owned(),
                    id: *id,
                });
            }
        }
        self.mark_edges_selected(domain, ids);
        self.touch();
        Ok(())
    }

    fn mark_edges_selected(&mut self, domain: &str, ids: &[EdgeId]) {
        if let Some(overlay) = self.domains.get_mut(domain) {
            for id in ids {
                if let Some(edge) = overlay.edge_mut(*id) {
                    edge.selected = true;
                }
            }
        }
    }

    /// Clears edge selection across every domain.
    pub fn clear_selected_edges(&mut self) {
        for overlay in self.domains.values_mut() {
            overlay.clear_selection();
        }
        self.touch();
    }

    /// Clears the vertex selection.
    pub fn clear_selected_vertices(&mut self) {
        self.table.clear_selection();
        self.touch();
    }

    /// Currently selected edge ids of `domain`, ascending. Empty for an
    /// undeclared domain.
    #[must_use]
    pub fn selected_edges(&self, domain: &str) -> Vec<EdgeId> {
        self.domains
            .get(domain)
            .map(DomainGraph::selected_edges)
            .unwrap_or_default()
    }

    /// Writes a vertex position in `space`.
    ///
    /// A no-op while the global position lock is set, unless
    /// `override_lock`. Writing the spatial space of a virtual vertex also
    /// mirrors the value into the start/end display anchors (a vertex with
    /// no linked entity has no independent anchor).
    ///
    /// # Errors
    /// [`GraphError::UnknownVertex`].
    pub fn move_vertex(
        &mut self,
        space: PositionSpace,
        id: NodeId,
        pos: DVec3,
        override_lock: bool,
    ) -> Result<(), GraphError> {
        let index = self.index_of(id)?;
        if self.position_locked && !override_lock {
            return Ok(());
        }
        self.table.set_position(space, index, pos);
        if space == PositionSpace::Spatial && self.table.linked_entity(index).is_none() {
            let anchor = DVec2::new(pos.x, pos.y);
            self.table.set_start_position(index, anchor);
            self.table.set_end_position(index, anchor);
        }
        self.touch();
        Ok(())
    }

    /// Reads a vertex position in `space`.
    ///
    /// # Errors
    /// [`GraphError::UnknownVertex`].
    pub fn position(&self, space: PositionSpace, id: NodeId) -> Result<DVec3, GraphError> {
        Ok(self.table.position(space, self.index_of(id)?))
    }

    /// Sets a vertex's time range, rejecting an inverted one.
    ///
    /// # Errors
    /// [`GraphError::UnknownVertex`], or [`GraphError::InvalidTimeRange`]
    /// when both ends carry a time (or frame) and start exceeds end; the
    /// previous range is kept.
    pub fn set_time_range(
        &mut self,
        id: NodeId,
        start: TimeMark,
        end: TimeMark,
    ) -> Result<(), GraphError> {
        let index = self.index_of(id)?;
        if let (Some(s), Some(e)) = (start.time, end.time) {
            if s > e {
                return Err(GraphError::InvalidTimeRange);
            }
        }
        if let (Some(s), Some(e)) = (start.frame, end.frame) {
            if s > e {
                return Err(GraphError::InvalidTimeRange);
            }
        }
        *self.table.start_mut(index) = start;
        *self.table.end_mut(index) = end;
        self.touch();
        Ok(())
    }

    /// Clears all domains, vertices, and counters back to the empty state.
    pub fn reset(&mut self) {
        self.table.reset();
        self.domains.clear();
        self.next_node_id = 0;
        self.position_locked = false;
        self.touch();
    }

    fn index_of(&self, id: NodeId) -> Result<usize, GraphError> {
        self.table
            .index_of(id)
            .ok_or(GraphError::UnknownVertex(id))
    }

    fn resolve_all(&self, ids: &[NodeId]) -> Result<Vec<usize>, GraphError> {
        let mut seen = FxHashSet::default();
        let mut indices = Vec::with_capacity(ids.len());
        for id in ids {
            let index = self.index_of(*id)?;
            if seen.insert(index) {
                indices.push(index);
            }
        }
        Ok(indices)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::registry::{
        ConfigDomainRegistry, DomainSpec, StaticTypeRegistry,
    };

    fn types() -> StaticTypeRegistry {
        StaticTypeRegistry::new(["A", "B"])
    }

    fn domains() -> ConfigDomainRegistry {
        ConfigDomainRegistry::new([(
            "before",
            DomainSpec {
                directedness: Directedness::Directed,
                param: None,
            },
        )])
    }

    #[test]
    fn overlay_backfills_and_mirrors() {
        let types = types();
        let registry = domains();
        let mut store = GraphStore::new();
        let a = store
            .create_vertex(&types, VertexSeed::new("A", DVec3::ZERO))
            .unwrap();
        let b = store
            .create_vertex(&types, VertexSeed::new("A", DVec3::X))
            .unwrap();
        store
            .create_edge(&registry, "before", b, a, None, None)
            .unwrap();
        assert_eq!(store.domain("before").unwrap().vertex_count(), 2);
        store
            .create_vertex(&types, VertexSeed::new("B", DVec3::Y))
            .unwrap();
        assert_eq!(store.domain("before").unwrap().vertex_count(), 3);
    }

    #[test]
    fn batch_delete_is_all_or_nothing() {
        let types = types();
        let mut store = GraphStore::new();
        let a = store
            .create_vertex(&types, VertexSeed::new("A", DVec3::ZERO))
            .unwrap();
        let err = store
            .delete_vertices(&[a, NodeId(99)])
            .unwrap_err();
        assert_eq!(err, GraphError::UnknownVertex(NodeId(99)));
        assert_eq!(store.vertex_count(), 1);
    }
}
