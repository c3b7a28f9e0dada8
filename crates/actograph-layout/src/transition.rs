// SPDX-License-Identifier: Apache-2.0
//! Discrete-step layout transitions.
use actograph_core::{GraphError, GraphStore, NodeId, PositionSpace};
use glam::DVec3;

/// Number of interpolation steps a transition plays over.
pub const TRANSITION_STEPS: u32 = 20;

/// One in-flight animated move of a set of vertices.
///
/// Each step is idempotent and self-contained: it writes the interpolated
/// position for its step counter into the destination space, overriding the
/// global position lock. Abandoning a transition mid-flight therefore needs
/// no cleanup; the next one starts from whatever positions the store holds.
#[derive(Clone, Debug)]
pub struct Transition {
    space: PositionSpace,
    ids: Vec<NodeId>,
    from: Vec<DVec3>,
    to: Vec<DVec3>,
    step: u32,
}

impl Transition {
    /// Builds a transition moving `ids` from `from` to `to` in `space`.
    /// The three slices correspond index-wise.
    #[must_use]
    pub fn new(space: PositionSpace, ids: Vec<NodeId>, from: Vec<DVec3>, to: Vec<DVec3>) -> Self {
        debug_assert_eq!(ids.len(), from.len());
        debug_assert_eq!(ids.len(), to.len());
        Self {
            space,
            ids,
            from,
            to,
            step: 0,
        }
    }

    /// The position space this transition writes into.
    #[must_use]
    pub fn space(&self) -> PositionSpace {
        self.space
    }

    /// True once every step has been played.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.step >= TRANSITION_STEPS
    }

    /// Plays one step, writing interpolated positions into the store.
    /// Returns `false` once the transition has finished.
    ///
    /// Vertices deleted mid-flight are skipped; the transition keeps
    /// playing for the survivors.
    ///
    /// # Errors
    /// None in practice; the signature propagates store write failures.
    pub fn advance(&mut self, store: &mut GraphStore) -> Result<bool, GraphError> {
        if self.is_finished() {
            return Ok(false);
        }
        self.step += 1;
        let t = f64::from(self.step) / f64::from(TRANSITION_STEPS);
        for ((id, from), to) in self.ids.iter().zip(&self.from).zip(&self.to) {
            if store.table().index_of(*id).is_none() {
                continue;
            }
            store.move_vertex(self.space, *id, from.lerp(*to, t), true)?;
        }
        Ok(!self.is_finished())
    }
}
