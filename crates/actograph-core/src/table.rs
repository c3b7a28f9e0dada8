// SPDX-License-Identifier: Apache-2.0
//! Columnar per-vertex attribute storage.
//!
//! One row per master vertex, addressed by a dense internal index. External
//! [`NodeId`]s map to indices through a hash lookup; the reverse mapping is
//! a plain vector so row *i* always knows its external id. All per-field
//! access is O(1) after the id lookup.
use glam::{DVec2, DVec3};
use rustc_hash::FxHashMap;

use crate::ident::{AttrId, EntityId, NodeId};
use crate::time::TimeMark;

/// Names one of the five parallel position columns a vertex carries.
///
/// The five coordinate systems coexist; layout modes decide which column is
/// "active" for display, but writes through any space never disturb the
/// others.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PositionSpace {
    /// Free-form user layout (where the vertex was created or dragged).
    User,
    /// Remembered baseline used by the default layout.
    Cached,
    /// Raw spatial (world/image) coordinates. NaN when the vertex has no
    /// spatial fix.
    Spatial,
    /// Spatial coordinates normalized into the current render extents.
    NormalizedSpatial,
    /// Temporal-sort coordinates normalized into the current render extents.
    NormalizedTemporal,
}

/// All columns for one appended row.
#[derive(Clone, Debug)]
pub struct VertexRow {
    /// External id of the new vertex.
    pub id: NodeId,
    /// Type label (drives color and edge-attribute defaults).
    pub type_label: String,
    /// Display label.
    pub label: String,
    /// Cluster id for the temporal layout.
    pub group_id: u32,
    /// Attribute seeded onto new edges touching this vertex.
    pub default_edge_attr: Option<AttrId>,
    /// Originating external entity, if any.
    pub linked_entity: Option<EntityId>,
    /// Start of the represented time range.
    pub start: TimeMark,
    /// End of the represented time range.
    pub end: TimeMark,
    /// Initial user/cached position.
    pub position: DVec3,
    /// Raw spatial position, NaN components when unset.
    pub spatial: DVec3,
    /// Start display anchor.
    pub start_position: DVec2,
    /// End display anchor.
    pub end_position: DVec2,
}

/// Columnar storage for every per-vertex attribute.
#[derive(Debug, Default, Clone)]
pub struct AttributeTable {
    index: FxHashMap<NodeId, usize>,
    ids: Vec<NodeId>,

    type_labels: Vec<String>,
    labels: Vec<String>,
    group_ids: Vec<u32>,
    default_edge_attrs: Vec<Option<AttrId>>,
    linked_entities: Vec<Option<EntityId>>,
    starts: Vec<TimeMark>,
    ends: Vec<TimeMark>,
    selected: Vec<bool>,

    user_positions: Vec<DVec3>,
    cached_positions: Vec<DVec3>,
    spatial_positions: Vec<DVec3>,
    normalized_spatial_positions: Vec<DVec3>,
    normalized_temporal_positions: Vec<DVec3>,
    start_positions: Vec<DVec2>,
    end_positions: Vec<DVec2>,
}

impl AttributeTable {
    /// Number of rows (master vertex count).
    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// True when the table holds no vertices.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Internal index of an external id, if live.
    #[must_use]
    pub fn index_of(&self, id: NodeId) -> Option<usize> {
        self.index.get(&id).copied()
    }

    /// External id of row `index`.
    #[must_use]
    pub fn id_at(&self, index: usize) -> NodeId {
        self.ids[index]
    }

    /// Iterates external ids in row order.
    pub fn ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.ids.iter().copied()
    }

    /// Appends one row. The caller guarantees the id is not already live.
    pub fn push_row(&mut self, row: VertexRow) {
        debug_assert!(!self.index.contains_key(&row.id));
        self.index.insert(row.id, self.ids.len());
        self.ids.push(row.id);
        self.type_labels.push(row.type_label);
        self.labels.push(row.label);
        self.group_ids.push(row.group_id);
        self.default_edge_attrs.push(row.default_edge_attr);
        self.linked_entities.push(row.linked_entity);
        self.starts.push(row.start);
        self.ends.push(row.end);
        self.selected.push(false);
        self.user_positions.push(row.position);
        self.cached_positions.push(row.position);
        self.spatial_positions.push(row.spatial);
        self.normalized_spatial_positions.push(DVec3::ZERO);
        self.normalized_temporal_positions.push(DVec3::ZERO);
        self.start_positions.push(row.start_position);
        self.end_positions.push(row.end_position);
    }

    /// Removes the rows for `ids`, preserving the relative order of the
    /// survivors and rebuilding the id→index map.
    ///
    /// The caller has already validated every id; unknown ids here are a
    /// logic error upstream.
    pub fn remove_rows(&mut self, ids: &[NodeId]) {
        let doomed: FxHashMap<NodeId, ()> = ids.iter().map(|id| (*id, ())).collect();
        let mut keep = Vec::with_capacity(self.ids.len());
        for id in &self.ids {
            keep.push(!doomed.contains_key(id));
        }

        retain_by_mask(&mut self.ids, &keep);
        retain_by_mask(&mut self.type_labels, &keep);
        retain_by_mask(&mut self.labels, &keep);
        retain_by_mask(&mut self.group_ids, &keep);
        retain_by_mask(&mut self.default_edge_attrs, &keep);
        retain_by_mask(&mut self.linked_entities, &keep);
        retain_by_mask(&mut self.starts, &keep);
        retain_by_mask(&mut self.ends, &keep);
        retain_by_mask(&mut self.selected, &keep);
        retain_by_mask(&mut self.user_positions, &keep);
        retain_by_mask(&mut self.cached_positions, &keep);
        retain_by_mask(&mut self.spatial_positions, &keep);
        retain_by_mask(&mut self.normalized_spatial_positions, &keep);
        retain_by_mask(&mut self.normalized_temporal_positions, &keep);
        retain_by_mask(&mut self.start_positions, &keep);
        retain_by_mask(&mut self.end_positions, &keep);

        self.index.clear();
        for (i, id) in self.ids.iter().enumerate() {
            self.index.insert(*id, i);
        }
    }

    /// Drops every row and mapping.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Position of row `index` in `space`.
    #[must_use]
    pub fn position(&self, space: PositionSpace, index: usize) -> DVec3 {
        self.column(space)[index]
    }

    /// Writes the position of row `index` in `space`.
    pub fn set_position(&mut self, space: PositionSpace, index: usize, pos: DVec3) {
        self.column_mut(space)[index] = pos;
    }

    fn column(&self, space: PositionSpace) -> &[DVec3] {
        match space {
            PositionSpace::User => &self.user_positions,
            PositionSpace::Cached => &self.cached_positions,
            PositionSpace::Spatial => &self.spatial_positions,
            PositionSpace::NormalizedSpatial => &self.normalized_spatial_positions,
            PositionSpace::NormalizedTemporal => &self.normalized_temporal_positions,
        }
    }

    fn column_mut(&mut self, space: PositionSpace) -> &mut [DVec3] {
        match space {
            PositionSpace::User => &mut self.user_positions,
            PositionSpace::Cached => &mut self.cached_positions,
            PositionSpace::Spatial => &mut self.spatial_positions,
            PositionSpace::NormalizedSpatial => &mut self.normalized_spatial_positions,
            PositionSpace::NormalizedTemporal => &mut self.normalized_temporal_positions,
        }
    }

    /// Type label of row `index`.
    #[must_use]
    pub fn type_label(&self, index: usize) -> &str {
        &self.type_labels[index]
    }

    /// Overwrites the type label of row `index`.
    pub fn set_type_label(&mut self, index: usize, type_label: String) {
        self.type_labels[index] = type_label;
    }

    /// Display label of row `index`.
    #[must_use]
    pub fn label(&self, index: usize) -> &str {
        &self.labels[index]
    }

    /// Overwrites the display label of row `index`.
    pub fn set_label(&mut self, index: usize, label: String) {
        self.labels[index] = label;
    }

    /// Group id of row `index`.
    #[must_use]
    pub fn group_id(&self, index: usize) -> u32 {
        self.group_ids[index]
    }

    /// Default edge attribute of row `index`.
    #[must_use]
    pub fn default_edge_attr(&self, index: usize) -> Option<AttrId> {
        self.default_edge_attrs[index]
    }

    /// Overwrites the default edge attribute of row `index`.
    pub fn set_default_edge_attr(&mut self, index: usize, attr: Option<AttrId>) {
        self.default_edge_attrs[index] = attr;
    }

    /// Linked external entity of row `index`.
    #[must_use]
    pub fn linked_entity(&self, index: usize) -> Option<EntityId> {
        self.linked_entities[index]
    }

    /// Start mark of row `index`.
    #[must_use]
    pub fn start(&self, index: usize) -> TimeMark {
        self.starts[index]
    }

    /// Mutable start mark of row `index`.
    pub fn start_mut(&mut self, index: usize) -> &mut TimeMark {
        &mut self.starts[index]
    }

    /// End mark of row `index`.
    #[must_use]
    pub fn end(&self, index: usize) -> TimeMark {
        self.ends[index]
    }

    /// Mutable end mark of row `index`.
    pub fn end_mut(&mut self, index: usize) -> &mut TimeMark {
        &mut self.ends[index]
    }

    /// Selection flag of row `index`.
    #[must_use]
    pub fn selected(&self, index: usize) -> bool {
        self.selected[index]
    }

    /// Writes the selection flag of row `index`.
    pub fn set_selected(&mut self, index: usize, selected: bool) {
        self.selected[index] = selected;
    }

    /// Clears every vertex selection flag.
    pub fn clear_selection(&mut self) {
        for flag in &mut self.selected {
            *flag = false;
        }
    }

    /// Start display anchor of row `index`.
    #[must_use]
    pub fn start_position(&self, index: usize) -> DVec2 {
        self.start_positions[index]
    }

    /// Writes the start display anchor of row `index`.
    pub fn set_start_position(&mut self, index: usize, pos: DVec2) {
        self.start_positions[index] = pos;
    }

    /// End display anchor of row `index`.
    #[must_use]
    pub fn end_position(&self, index: usize) -> DVec2 {
        self.end_positions[index]
    }

    /// Writes the end display anchor of row `index`.
    pub fn set_end_position(&mut self, index: usize, pos: DVec2) {
        self.end_positions[index] = pos;
    }
}

fn retain_by_mask<T>(column: &mut Vec<T>, keep: &[bool]) {
    let mut i = 0;
    column.retain(|_| {
        let k = keep[i];
        i += 1;
        k
    });
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::cast_precision_loss)]
mod tests {
    use super::*;

    fn row(id: i64) -> VertexRow {
        VertexRow {
            id: NodeId(id),
            type_label: "A".into(),
            label: format!("A_{id}"),
            group_id: 0,
            default_edge_attr: None,
            linked_entity: None,
            start: TimeMark::UNSET,
            end: TimeMark::UNSET,
            position: DVec3::new(id as f64, 0.0, 0.0),
            spatial: DVec3::new(f64::NAN, f64::NAN, 0.0),
            start_position: DVec2::ZERO,
            end_position: DVec2::ZERO,
        }
    }

    #[test]
    fn remove_rows_preserves_order_and_remaps() {
        let mut t = AttributeTable::default();
        for id in 0..5 {
            t.push_row(row(id));
        }
        t.remove_rows(&[NodeId(1), NodeId(3)]);
        assert_eq!(t.len(), 3);
        let ids: Vec<_> = t.ids().collect();
        assert_eq!(ids, vec![NodeId(0), NodeId(2), NodeId(4)]);
        assert_eq!(t.index_of(NodeId(4)), Some(2));
        assert_eq!(t.index_of(NodeId(3)), None);
        assert_eq!(t.position(PositionSpace::User, 1).x, 2.0);
    }
}
