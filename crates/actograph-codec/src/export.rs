// SPDX-License-Identifier: Apache-2.0
//! Store → document serialization.
use actograph_core::registry::AttributeRegistry;
use actograph_core::{AttrId, GraphStore, PositionSpace};

use crate::document::{GraphDocument, LinkElement, NodeElement, PrimitiveElement};

/// Microseconds per second; document times are seconds.
pub(crate) const MICROS_PER_SECOND: f64 = 1e6;

/// Serializes the whole store into a document.
///
/// Node positions are the cached-layout baseline. Attribute ids with no
/// configured name are dropped with a warning so the document only ever
/// carries resolvable names. Metadata fields are left for the caller.
#[must_use]
pub fn export(store: &GraphStore, attrs: &dyn AttributeRegistry) -> GraphDocument {
    let table = store.table();
    let mut doc = GraphDocument::default();

    for i in 0..table.len() {
        let spatial = table.position(PositionSpace::Spatial, i);
        let has_spatial = !spatial.x.is_nan() && !spatial.y.is_nan();
        let position = table.position(PositionSpace::Cached, i);
        let linked = table.linked_entity(i);
        let start = table.start(i);
        let end = table.end(i);
        let (start_anchor, end_anchor) = if linked.is_some() {
            (
                Some(table.start_position(i)),
                Some(table.end_position(i)),
            )
        } else {
            (None, None)
        };

        doc.nodes.push(NodeElement {
            id: table.id_at(i).0,
            label: table.label(i).to_owned(),
            event_type: table.type_label(i).to_owned(),
            x: position.x,
            y: position.y,
            spatial_x: has_spatial.then_some(spatial.x),
            spatial_y: has_spatial.then_some(spatial.y),
            event_id: linked.map(|e| e.0),
            event_start_time: start.time.map(|t| t / MICROS_PER_SECOND),
            event_start_frame: start.frame,
            event_end_time: end.time.map(|t| t / MICROS_PER_SECOND),
            event_end_frame: end.frame,
            event_start_position_x: start_anchor.map(|p| p.x),
            event_start_position_y: start_anchor.map(|p| p.y),
            event_end_position_x: end_anchor.map(|p| p.x),
            event_end_position_y: end_anchor.map(|p| p.y),
            group_id: table.group_id(i),
            default_edge_attr: table
                .default_edge_attr(i)
                .and_then(|id| attr_name(attrs, id)),
        });
    }

    for (name, overlay) in store.domains() {
        let mut primitive = PrimitiveElement {
            name: name.to_owned(),
            directed: matches!(
                overlay.directedness(),
                actograph_core::Directedness::Directed
            ),
            links: Vec::with_capacity(overlay.edge_count()),
        };
        for (id, edge) in overlay.edges() {
            primitive.links.push(LinkElement {
                id: id.0,
                parent_id: edge.parent.0,
                child_id: edge.child.0,
                parent_attributes: attr_names(attrs, &edge.parent_attrs),
                child_attributes: attr_names(attrs, &edge.child_attrs),
            });
        }
        doc.primitives.push(primitive);
    }

    doc
}

fn attr_name(attrs: &dyn AttributeRegistry, id: AttrId) -> Option<String> {
    let name = attrs.name_for_id(id);
    if name.is_none() {
        tracing::warn!(%id, "dropping attribute with no configured name");
    }
    name.map(ToOwned::to_owned)
}

fn attr_names(attrs: &dyn AttributeRegistry, ids: &[AttrId]) -> Vec<String> {
    ids.iter()
        .filter_map(|id| attr_name(attrs, *id))
        .collect()
}
