// SPDX-License-Identifier: Apache-2.0
//! Document → store replay.
use actograph_core::registry::{AttributeRegistry, DomainRegistry, TypeRegistry};
use actograph_core::{
    AttrId, EdgeId, EntityId, GraphStore, NodeId, TimeMark, VertexSeed,
};
use glam::{DVec2, DVec3};

use crate::document::GraphDocument;
use crate::export::MICROS_PER_SECOND;

/// What an import replayed and what it had to skip.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ImportReport {
    /// Vertices created.
    pub nodes: usize,
    /// Edges created.
    pub edges: usize,
    /// Elements skipped with a diagnostic (nodes the store rejected, links
    /// of skipped primitives or with dead endpoints).
    pub skipped: usize,
}

/// Replays a document into the store: nodes first under their explicit
/// ids, then every primitive block's links in file order.
///
/// Replay failures are local: a node the store rejects, an attribute name
/// the registry does not know, or a primitive whose domain cannot be
/// resolved is skipped with a warning, never fatal. Structural problems
/// are caught earlier, at [`GraphDocument::from_json`] time.
pub fn import(
    store: &mut GraphStore,
    types: &dyn TypeRegistry,
    domains: &dyn DomainRegistry,
    attrs: &dyn AttributeRegistry,
    doc: &GraphDocument,
) -> ImportReport {
    let mut report = ImportReport::default();

    for node in &doc.nodes {
        let mut seed = VertexSeed::new(
            node.event_type.clone(),
            DVec3::new(node.x, node.y, 0.0),
        );
        seed.label = node.label.clone();
        seed.group_id = node.group_id;
        seed.default_edge_attr = node
            .default_edge_attr
            .as_deref()
            .and_then(|name| resolve_attr(attrs, name));
        seed.linked_entity = node.event_id.map(EntityId);
        seed.start = TimeMark {
            time: node.event_start_time.map(|t| t * MICROS_PER_SECOND),
            frame: node.event_start_frame,
        };
        seed.end = TimeMark {
            time: node.event_end_time.map(|t| t * MICROS_PER_SECOND),
            frame: node.event_end_frame,
        };
        seed.spatial = pair(node.spatial_x, node.spatial_y);
        seed.start_position = pair(node.event_start_position_x, node.event_start_position_y);
        seed.end_position = pair(node.event_end_position_x, node.event_end_position_y);

        match store.create_vertex_with_id(types, NodeId(node.id), seed) {
            Ok(_) => report.nodes += 1,
            Err(err) => {
                tracing::warn!(id = node.id, %err, "skipping node the store rejected");
                report.skipped += 1;
            }
        }
    }

    for primitive in &doc.primitives {
        if domains.resolve(&primitive.name).is_none() {
            tracing::warn!(domain = %primitive.name, "skipping primitive with unknown domain");
            report.skipped += primitive.links.len();
            continue;
        }
        for link in &primitive.links {
            let outcome = store.create_edge_with_id(
                domains,
                &primitive.name,
                EdgeId(link.id),
                NodeId(link.parent_id),
                NodeId(link.child_id),
                Some(resolve_attrs(attrs, &link.parent_attributes)),
                Some(resolve_attrs(attrs, &link.child_attributes)),
            );
            match outcome {
                Ok(_) => report.edges += 1,
                Err(err) => {
                    tracing::warn!(
                        domain = %primitive.name,
                        id = link.id,
                        %err,
                        "skipping link the store rejected"
                    );
                    report.skipped += 1;
                }
            }
        }
    }
    report
}

fn pair(x: Option<f64>, y: Option<f64>) -> Option<DVec2> {
    match (x, y) {
        (Some(x), Some(y)) => Some(DVec2::new(x, y)),
        _ => None,
    }
}

fn resolve_attr(attrs: &dyn AttributeRegistry, name: &str) -> Option<AttrId> {
    let id = attrs.id_for_name(name);
    if id.is_none() {
        tracing::warn!(attribute = %name, "skipping unknown attribute name");
    }
    id
}

fn resolve_attrs(attrs: &dyn AttributeRegistry, names: &[String]) -> Vec<AttrId> {
    names
        .iter()
        .filter_map(|name| resolve_attr(attrs, name))
        .collect()
}
