// SPDX-License-Identifier: Apache-2.0
//! The layout engine: modes, targets, transitions, coordinate transforms.
use actograph_core::{GraphError, GraphStore, NodeId, PositionSpace, TimeMark};
use glam::{DAffine2, DVec2, DVec3};
use rustc_hash::FxHashMap;

use crate::pick::{self, PickRegion, PickResult};
use crate::render::RenderSet;
use crate::transition::Transition;

/// Fraction of the extents used to park vertices that have no valid
/// coordinate in the current mode.
const PARK_MARGIN: f64 = 0.1;

/// Y-stagger applied to temporal-sort vertices sharing an x, as a fraction
/// of the extents height.
const STAGGER_FRACTION: f64 = 0.01;

/// The four layout modes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LayoutMode {
    /// Vertices sit at their remembered baseline positions.
    Default,
    /// Vertices sorted left-to-right by start time, one row per group.
    SortByStartTime,
    /// Spatial positions normalized into the render extents.
    Spatial,
    /// Spatial positions drawn as-is, no transform.
    RawSpatial,
}

impl LayoutMode {
    /// The position space downstream position queries read in this mode.
    #[must_use]
    pub fn active_space(self) -> PositionSpace {
        match self {
            Self::Default => PositionSpace::Cached,
            Self::SortByStartTime => PositionSpace::NormalizedTemporal,
            Self::Spatial => PositionSpace::NormalizedSpatial,
            Self::RawSpatial => PositionSpace::Spatial,
        }
    }
}

/// The axis-aligned region layouts target, in layout coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RenderExtents {
    /// Left edge.
    pub x_min: f64,
    /// Right edge.
    pub x_max: f64,
    /// Bottom edge.
    pub y_min: f64,
    /// Top edge.
    pub y_max: f64,
}

impl RenderExtents {
    /// Horizontal size.
    #[must_use]
    pub fn width(&self) -> f64 {
        self.x_max - self.x_min
    }

    /// Vertical size.
    #[must_use]
    pub fn height(&self) -> f64 {
        self.y_max - self.y_min
    }

    /// Center point.
    #[must_use]
    pub fn center(&self) -> DVec2 {
        DVec2::new(
            (self.x_min + self.x_max) / 2.0,
            (self.y_min + self.y_max) / 2.0,
        )
    }
}

/// Coefficients of the temporal layout's x ↦ time mapping, retained so a
/// dragged x-position can be mapped back to an implied time and frame.
#[derive(Clone, Copy, Debug)]
pub struct TimelineScale {
    x_min: f64,
    width: f64,
    min_time: f64,
    max_time: f64,
    frames: Option<(u32, u32)>,
}

impl TimelineScale {
    /// Time (and frame, when the layout saw any) implied by an x-position.
    /// Positions left of the timeline origin clamp to the earliest time.
    #[must_use]
    pub fn time_at(&self, x: f64) -> TimeMark {
        let u = if self.width > 0.0 {
            ((x - self.x_min) / self.width).max(0.0)
        } else {
            0.0
        };
        let time = self.min_time + u * (self.max_time - self.min_time);
        let frame = self.frames.map(|(min_f, max_f)| {
            let span = f64::from(max_f) - f64::from(min_f);
            (f64::from(min_f) + u * span).round() as u32
        });
        TimeMark { time: Some(time), frame }
    }
}

/// Computes per-mode vertex positions and animates mode changes.
///
/// Holds no reference to the store; every operation borrows it for the
/// call, which keeps the single-threaded ownership story explicit.
#[derive(Debug)]
pub struct LayoutEngine {
    mode: LayoutMode,
    extents: RenderExtents,
    transition: Option<Transition>,
    timeline: Option<TimelineScale>,
    graph_from_spatial: Option<DAffine2>,
    spatial_from_graph: Option<DAffine2>,
    visible_domain: Option<String>,
    vertex_pick_radius: f64,
    edge_pick_tolerance: f64,
    needs_render: bool,
    render: RenderSet,
}

impl LayoutEngine {
    /// Creates an engine in the default mode over `extents`.
    #[must_use]
    pub fn new(extents: RenderExtents) -> Self {
        Self {
            mode: LayoutMode::Default,
            extents,
            transition: None,
            timeline: None,
            graph_from_spatial: None,
            spatial_from_graph: None,
            visible_domain: None,
            vertex_pick_radius: 0.1,
            edge_pick_tolerance: 0.05,
            needs_render: false,
            render: RenderSet::default(),
        }
    }

    /// The current layout mode.
    #[must_use]
    pub fn mode(&self) -> LayoutMode {
        self.mode
    }

    /// The position space downstream position queries should read.
    #[must_use]
    pub fn active_space(&self) -> PositionSpace {
        self.mode.active_space()
    }

    /// The extents the current layout was computed for.
    #[must_use]
    pub fn extents(&self) -> RenderExtents {
        self.extents
    }

    /// True while a transition still has steps to play.
    #[must_use]
    pub fn is_animating(&self) -> bool {
        self.transition.as_ref().is_some_and(|t| !t.is_finished())
    }

    /// Restricts edge rendering and picking to one domain. `None` shows
    /// every domain; the master vertex layer is always visible.
    pub fn set_visible_domain(&mut self, domain: Option<String>) {
        self.visible_domain = domain;
        self.needs_render = true;
    }

    /// The currently visible domain filter.
    #[must_use]
    pub fn visible_domain(&self) -> Option<&str> {
        self.visible_domain.as_deref()
    }

    /// Consumes the redraw request flag.
    pub fn take_needs_render(&mut self) -> bool {
        std::mem::take(&mut self.needs_render)
    }

    /// Switches to `mode`, animating every vertex from its position in the
    /// previous mode's space to its target in the new one.
    ///
    /// A transition already in flight is superseded immediately; its
    /// remaining steps are dropped and the new one starts from the current
    /// (possibly partially interpolated) positions. `RawSpatial` is exempt
    /// from animation and leaves the drag lock untouched.
    ///
    /// # Errors
    /// Propagates store position-write failures.
    pub fn set_layout_mode(
        &mut self,
        store: &mut GraphStore,
        mode: LayoutMode,
        extents: RenderExtents,
    ) -> Result<(), GraphError> {
        let previous_space = self.mode.active_space();
        self.mode = mode;
        self.extents = extents;
        self.needs_render = true;

        if mode == LayoutMode::RawSpatial {
            self.transition = None;
            return Ok(());
        }

        let ids: Vec<NodeId> = store.table().ids().collect();
        let mut from = Vec::with_capacity(ids.len());
        for id in &ids {
            from.push(store.position(previous_space, *id)?);
        }

        let targets = match mode {
            LayoutMode::Default => {
                store.set_position_locked(false);
                self.cached_targets(store)
            }
            LayoutMode::SortByStartTime => {
                store.set_position_locked(true);
                self.temporal_targets(store)
            }
            LayoutMode::Spatial => {
                store.set_position_locked(false);
                self.spatial_targets(store)
            }
            LayoutMode::RawSpatial => unreachable!("handled above"),
        };

        self.transition = Some(Transition::new(mode.active_space(), ids, from, targets));
        Ok(())
    }

    /// Recomputes the current mode's layout over its recorded extents.
    ///
    /// # Errors
    /// Propagates store position-write failures.
    pub fn refresh_layout(&mut self, store: &mut GraphStore) -> Result<(), GraphError> {
        self.set_layout_mode(store, self.mode, self.extents)
    }

    /// Plays one transition step and requests a redraw. Returns `true`
    /// while more steps remain.
    ///
    /// # Errors
    /// Propagates store position-write failures.
    pub fn tick(&mut self, store: &mut GraphStore) -> Result<bool, GraphError> {
        let Some(transition) = self.transition.as_mut() else {
            return Ok(false);
        };
        let more = transition.advance(store)?;
        self.needs_render = true;
        if !more {
            self.transition = None;
        }
        Ok(more)
    }

    /// Copies every vertex's active-space position into the cached column,
    /// making the current arrangement the new default-mode baseline.
    ///
    /// # Errors
    /// Propagates store position-write failures.
    pub fn reset_cached_positions(&self, store: &mut GraphStore) -> Result<(), GraphError> {
        let space = self.mode.active_space();
        let ids: Vec<NodeId> = store.table().ids().collect();
        for id in ids {
            let pos = store.position(space, id)?;
            store.move_vertex(PositionSpace::Cached, id, pos, true)?;
        }
        Ok(())
    }

    /// Maps a dragged x-position back to the time and frame it implies
    /// under the last temporal layout. `None` outside that mode or before
    /// any temporal layout ran.
    #[must_use]
    pub fn compute_time_from_position(&self, x: f64) -> Option<TimeMark> {
        self.timeline.map(|scale| scale.time_at(x))
    }

    /// Converts a normalized-spatial-space point back into raw spatial
    /// coordinates using the inverse of the last spatial-layout transform.
    #[must_use]
    pub fn graph_to_spatial(&self, point: DVec2) -> Option<DVec2> {
        self.spatial_from_graph.map(|t| t.transform_point2(point))
    }

    /// Queries vertices (then edges) under a point or rectangle in the
    /// active space. Vertex hits win over edge hits; edges are tested only
    /// for the visible domain when one is set.
    #[must_use]
    pub fn pick(&self, store: &GraphStore, region: &PickRegion) -> PickResult {
        pick::pick(
            store,
            region,
            self.mode.active_space(),
            self.visible_domain.as_deref(),
            self.vertex_pick_radius,
            self.edge_pick_tolerance,
        )
    }

    /// Rebuilds the render-object sets for the current graph contents.
    pub fn update(&mut self, store: &GraphStore) {
        self.render.rebuild(store, self.visible_domain.as_deref());
        self.needs_render = true;
    }

    /// Render objects created by the last [`Self::update`].
    #[must_use]
    pub fn new_render_objects(&self) -> &[crate::render::RenderObject] {
        self.render.new_objects()
    }

    /// Render objects still current after the last [`Self::update`].
    #[must_use]
    pub fn active_render_objects(&self) -> &[crate::render::RenderObject] {
        self.render.active_objects()
    }

    /// Render objects invalidated by the last [`Self::update`].
    #[must_use]
    pub fn expired_render_objects(&self) -> &[crate::render::RenderObject] {
        self.render.expired_objects()
    }

    fn cached_targets(&self, store: &GraphStore) -> Vec<DVec3> {
        let table = store.table();
        (0..table.len())
            .map(|i| table.position(PositionSpace::Cached, i))
            .collect()
    }

    fn temporal_targets(&mut self, store: &GraphStore) -> Vec<DVec3> {
        let table = store.table();
        let ext = self.extents;
        let n = table.len();

        let mut min_time = f64::INFINITY;
        let mut max_time = f64::NEG_INFINITY;
        // The frame scale runs between the frames of the earliest- and
        // latest-time vertices, not the global frame extrema; the two
        // differ when frame numbering is not monotone with time.
        let mut first_frame: Option<u32> = None;
        let mut last_frame: Option<u32> = None;
        for i in 0..n {
            let start = table.start(i);
            let Some(t) = start.time else { continue };
            if t < min_time {
                min_time = t;
                first_frame = start.frame;
            }
            if t > max_time {
                max_time = t;
                last_frame = start.frame;
            }
        }
        let frames = first_frame.zip(last_frame);

        if min_time > max_time {
            // No vertex carries a time at all: park everything.
            self.timeline = None;
            return (0..n)
                .map(|i| {
                    DVec3::new(
                        ext.x_min - PARK_MARGIN * ext.width(),
                        ext.y_min - PARK_MARGIN * ext.height() * ((i + 1) as f64),
                        0.0,
                    )
                })
                .collect();
        }
        if max_time == min_time {
            // Degenerate span: widen it downward so the single column does
            // not collapse the scale.
            min_time = max_time * 0.5;
        }
        let span = max_time - min_time;

        // One row per group id, bottom-up in ascending group order.
        let mut group_rows: Vec<u32> = (0..n).map(|i| table.group_id(i)).collect();
        group_rows.sort_unstable();
        group_rows.dedup();
        let row_of: FxHashMap<u32, usize> = group_rows
            .iter()
            .enumerate()
            .map(|(row, g)| (*g, row))
            .collect();
        let group_count = group_rows.len().max(1);

        let mut targets = vec![DVec3::ZERO; n];
        let mut parked = 0usize;
        let mut seen_x: FxHashMap<(usize, u64), usize> = FxHashMap::default();
        for i in 0..n {
            let start = table.start(i);
            let Some(t) = start.time else {
                parked += 1;
                targets[i] = DVec3::new(
                    ext.x_min - PARK_MARGIN * ext.width(),
                    ext.y_min - PARK_MARGIN * ext.height() * (parked as f64),
                    0.0,
                );
                continue;
            };
            let x = if span > 0.0 {
                ext.x_min + (t - min_time) / span * ext.width()
            } else {
                ext.x_min + ext.width() / 2.0
            };
            let row = row_of.get(&table.group_id(i)).copied().unwrap_or(0);
            let mut y = ext.y_min + (row as f64) / (group_count as f64) * ext.height();

            // Stagger nodes of one row that land on the same x so they stay
            // individually clickable.
            let key = (row, x.to_bits());
            let dup = seen_x.entry(key).or_insert(0);
            y += STAGGER_FRACTION * ext.height() * (*dup as f64);
            *dup += 1;

            targets[i] = DVec3::new(x, y, 0.0);
        }

        self.timeline = Some(TimelineScale {
            x_min: ext.x_min,
            width: ext.width(),
            min_time,
            max_time,
            frames,
        });
        targets
    }

    fn spatial_targets(&mut self, store: &GraphStore) -> Vec<DVec3> {
        let table = store.table();
        let ext = self.extents;
        let n = table.len();

        let mut min = DVec2::splat(f64::INFINITY);
        let mut max = DVec2::splat(f64::NEG_INFINITY);
        for i in 0..n {
            let p = table.position(PositionSpace::Spatial, i);
            if p.x.is_nan() || p.y.is_nan() {
                continue;
            }
            min = min.min(DVec2::new(p.x, p.y));
            max = max.max(DVec2::new(p.x, p.y));
        }

        if min.x > max.x {
            tracing::warn!("no vertex has a spatial fix; spatial layout parks everything");
            self.graph_from_spatial = None;
            self.spatial_from_graph = None;
            return (0..n)
                .map(|i| {
                    DVec3::new(
                        ext.x_max + PARK_MARGIN * ext.width(),
                        ext.y_min + PARK_MARGIN * ext.height() * (i as f64),
                        0.0,
                    )
                })
                .collect();
        }

        let size = max - min;
        let scale_x = (size.x > 0.0).then(|| ext.width() / size.x);
        let scale_y = (size.y > 0.0).then(|| ext.height() / size.y);
        // Uniform min-scale preserves aspect ratio; a degenerate axis
        // borrows the other axis's scale.
        let scale = match (scale_x, scale_y) {
            (Some(sx), Some(sy)) => sx.min(sy),
            (Some(s), None) | (None, Some(s)) => s,
            (None, None) => 1.0,
        };

        let bbox_center = (min + max) / 2.0;
        let transform = DAffine2::from_translation(ext.center())
            * DAffine2::from_scale(DVec2::splat(scale))
            * DAffine2::from_translation(-bbox_center);
        self.graph_from_spatial = Some(transform);
        self.spatial_from_graph = Some(transform.inverse());

        let mut parked = 0usize;
        (0..n)
            .map(|i| {
                let p = table.position(PositionSpace::Spatial, i);
                if p.x.is_nan() || p.y.is_nan() {
                    parked += 1;
                    return DVec3::new(
                        ext.x_max + PARK_MARGIN * ext.width(),
                        ext.y_min + PARK_MARGIN * ext.height() * (parked as f64),
                        0.0,
                    );
                }
                let q = transform.transform_point2(DVec2::new(p.x, p.y));
                DVec3::new(q.x, q.y, 0.0)
            })
            .collect()
    }
}
