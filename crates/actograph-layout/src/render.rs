// SPDX-License-Identifier: Apache-2.0
//! Render-object bookkeeping.
//!
//! The engine describes what a host renderer should draw as opaque
//! handles: each [`RenderSet::rebuild`] expires the previous generation and
//! produces one object per domain plus the master vertex layer, the master
//! layer last so it draws on top.
use actograph_core::GraphStore;

/// Opaque handle a host renderer keys its visual objects by.
#[repr(transparent)]
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct RenderHandle(pub u64);

/// What one render object draws.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RenderLayer {
    /// The edges of one domain.
    Edges {
        /// Owning domain.
        domain: String,
    },
    /// The master vertex layer. Always visible.
    Vertices,
}

/// One drawable unit handed to the host renderer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderObject {
    /// Stable handle for this object's lifetime.
    pub handle: RenderHandle,
    /// What the object draws.
    pub layer: RenderLayer,
    /// Whether the current domain filter leaves it visible.
    pub visible: bool,
}

/// Three disjoint render-object sets: newly created, currently active, and
/// expired by the last rebuild.
#[derive(Clone, Debug, Default)]
pub struct RenderSet {
    new: Vec<RenderObject>,
    active: Vec<RenderObject>,
    expired: Vec<RenderObject>,
    next_handle: u64,
}

impl RenderSet {
    /// Replaces the active generation: everything previously active moves
    /// to expired, and a fresh object per domain plus the master vertex
    /// layer becomes both new and active.
    pub fn rebuild(&mut self, store: &GraphStore, visible_domain: Option<&str>) {
        self.expired = std::mem::take(&mut self.active);
        self.new.clear();

        for (name, _) in store.domains() {
            let visible = visible_domain.is_none_or(|v| v == name);
            self.push(RenderLayer::Edges {
                domain: name.to_owned(),
            }, visible);
        }
        // Master vertex layer last, on top of every edge layer.
        self.push(RenderLayer::Vertices, true);

        self.active = self.new.clone();
    }

    fn push(&mut self, layer: RenderLayer, visible: bool) {
        let handle = RenderHandle(self.next_handle);
        self.next_handle += 1;
        self.new.push(RenderObject {
            handle,
            layer,
            visible,
        });
    }

    /// Objects created by the last rebuild.
    #[must_use]
    pub fn new_objects(&self) -> &[RenderObject] {
        &self.new
    }

    /// Objects current after the last rebuild.
    #[must_use]
    pub fn active_objects(&self) -> &[RenderObject] {
        &self.active
    }

    /// Objects invalidated by the last rebuild.
    #[must_use]
    pub fn expired_objects(&self) -> &[RenderObject] {
        &self.expired
    }
}
