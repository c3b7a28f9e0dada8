// SPDX-License-Identifier: Apache-2.0
//! Whole-document snapshot undo.
//!
//! Each undo step is a complete exported document captured before a
//! mutation. O(graph size) per step, which is fine at interactive scale.
use actograph_core::registry::{AttributeRegistry, DomainRegistry, TypeRegistry};
use actograph_core::GraphStore;

use crate::document::GraphDocument;
use crate::export::export;
use crate::import::{import, ImportReport};

/// Captures the store as an opaque restorable document.
#[must_use]
pub fn snapshot(store: &GraphStore, attrs: &dyn AttributeRegistry) -> GraphDocument {
    export(store, attrs)
}

/// Clears the store and replays a snapshot into it.
///
/// Snapshots taken by [`snapshot`] replay cleanly against the registries
/// they were taken under; the report's skip count is zero in that case.
pub fn restore(
    store: &mut GraphStore,
    types: &dyn TypeRegistry,
    domains: &dyn DomainRegistry,
    attrs: &dyn AttributeRegistry,
    doc: &GraphDocument,
) -> ImportReport {
    store.reset();
    import(store, types, domains, attrs, doc)
}

/// A linear undo/redo history of document snapshots.
#[derive(Clone, Debug, Default)]
pub struct UndoStack {
    undo: Vec<GraphDocument>,
    redo: Vec<GraphDocument>,
}

impl UndoStack {
    /// Creates an empty history.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the pre-mutation snapshot, discarding any redo branch.
    pub fn record(&mut self, before: GraphDocument) {
        self.undo.push(before);
        self.redo.clear();
    }

    /// Steps back, trading `current` onto the redo stack. `None` when
    /// nothing is left to undo.
    pub fn undo(&mut self, current: GraphDocument) -> Option<GraphDocument> {
        let doc = self.undo.pop()?;
        self.redo.push(current);
        Some(doc)
    }

    /// Steps forward, trading `current` onto the undo stack. `None` when
    /// nothing was undone.
    pub fn redo(&mut self, current: GraphDocument) -> Option<GraphDocument> {
        let doc = self.redo.pop()?;
        self.undo.push(current);
        Some(doc)
    }

    /// True when a step back is available.
    #[must_use]
    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    /// True when a step forward is available.
    #[must_use]
    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }
}
