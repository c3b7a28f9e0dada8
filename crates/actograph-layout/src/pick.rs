// SPDX-License-Identifier: Apache-2.0
//! Point and rectangle picking over the active layout.
use actograph_core::{EdgeId, GraphStore, NodeId, PositionSpace};
use glam::{DVec2, DVec3};

/// The query region of a pick, in layout coordinates.
#[derive(Clone, Copy, Debug)]
pub enum PickRegion {
    /// A single point with the engine's pick tolerances applied.
    Point(DVec2),
    /// An axis-aligned rectangle; containment is exact.
    Rect {
        /// Lower-left corner.
        min: DVec2,
        /// Upper-right corner.
        max: DVec2,
    },
}

impl PickRegion {
    fn contains_with_tolerance(&self, p: DVec2, tolerance: f64) -> bool {
        match self {
            Self::Point(q) => q.distance(p) <= tolerance,
            Self::Rect { min, max } => {
                p.x >= min.x && p.x <= max.x && p.y >= min.y && p.y <= max.y
            }
        }
    }
}

/// Outcome of a pick query. Vertex hits take priority over edge hits.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PickResult {
    /// Nothing under the region.
    None,
    /// One or more vertices matched.
    Vertices(Vec<NodeId>),
    /// One or more edges of a single domain matched.
    Edges {
        /// Domain the matched edges belong to.
        domain: String,
        /// Matched edge ids, ascending.
        ids: Vec<EdgeId>,
    },
}

pub(crate) fn pick(
    store: &GraphStore,
    region: &PickRegion,
    space: PositionSpace,
    visible_domain: Option<&str>,
    vertex_radius: f64,
    edge_tolerance: f64,
) -> PickResult {
    let table = store.table();
    let flatten = |p: DVec3| DVec2::new(p.x, p.y);

    let vertices: Vec<NodeId> = (0..table.len())
        .filter(|&i| {
            region.contains_with_tolerance(flatten(table.position(space, i)), vertex_radius)
        })
        .map(|i| table.id_at(i))
        .collect();
    if !vertices.is_empty() {
        return PickResult::Vertices(vertices);
    }

    for (name, overlay) in store.domains() {
        if visible_domain.is_some_and(|v| v != name) {
            continue;
        }
        let mut ids = Vec::new();
        for (id, edge) in overlay.edges() {
            let (Some(pi), Some(ci)) = (
                table.index_of(edge.parent),
                table.index_of(edge.child),
            ) else {
                continue;
            };
            let a = flatten(table.position(space, pi));
            let b = flatten(table.position(space, ci));
            if edge_hits(region, a, b, edge_tolerance) {
                ids.push(id);
            }
        }
        if !ids.is_empty() {
            return PickResult::Edges {
                domain: name.to_owned(),
                ids,
            };
        }
    }
    PickResult::None
}

fn edge_hits(region: &PickRegion, a: DVec2, b: DVec2, tolerance: f64) -> bool {
    match region {
        PickRegion::Point(p) => distance_to_segment(*p, a, b) <= tolerance,
        // A rect picks an edge when it contains either endpoint or the
        // segment midpoint; cheap and good enough for marquee selection.
        PickRegion::Rect { .. } => {
            region.contains_with_tolerance(a, 0.0)
                || region.contains_with_tolerance(b, 0.0)
                || region.contains_with_tolerance((a + b) / 2.0, 0.0)
        }
    }
}

fn distance_to_segment(p: DVec2, a: DVec2, b: DVec2) -> f64 {
    let ab = b - a;
    let len_sq = ab.length_squared();
    if len_sq == 0.0 {
        return p.distance(a);
    }
    let t = ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    p.distance(a + ab * t)
}
