// SPDX-License-Identifier: Apache-2.0
//! Policy facade over [`GraphStore`].
//!
//! Adds the ergonomics the store does not need to know about: ambient
//! "current type" state, generated labels, event-node import, domain-aware
//! edge generation, and the mutual exclusivity between vertex and edge
//! selections. Consumers observe its side effects only through the drained
//! event queue.
use glam::{DVec2, DVec3};

use crate::error::GraphError;
use crate::ident::{AttrId, EdgeId, EntityId, NodeId};
use crate::registry::{DomainRegistry, TypeRegistry};
use crate::store::{GraphStore, VertexSeed};
use crate::table::PositionSpace;
use crate::time::TimeMark;

/// Spacing between imported event nodes on the anchor line.
const EVENT_NODE_SPACING: f64 = 0.3;

/// Change notification emitted by facade operations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GraphEvent {
    /// A vertex was created.
    NodeCreated(NodeId),
    /// An edge was created in a domain.
    EdgeCreated {
        /// Owning domain.
        domain: String,
        /// The new edge's id.
        id: EdgeId,
    },
    /// A batch of vertices (and their incident edges) was deleted.
    NodesDeleted(Vec<NodeId>),
    /// The vertex selection was replaced.
    SelectedNodesChanged(Vec<NodeId>),
    /// The edge selection of one domain was replaced.
    SelectedEdgesChanged {
        /// Domain whose selection changed.
        domain: String,
        /// The new selection.
        ids: Vec<EdgeId>,
    },
}

/// One detected event handed to [`MutationFacade::create_event_nodes`].
#[derive(Clone, Debug)]
pub struct EventSummary {
    /// External id of the event.
    pub entity: EntityId,
    /// Event type label (must be known to the type registry).
    pub event_type: String,
    /// Start of the event's time range.
    pub start: TimeMark,
    /// End of the event's time range.
    pub end: TimeMark,
    /// Display position of the event at its start.
    pub start_position: DVec2,
    /// Display position of the event at its end.
    pub end_position: DVec2,
}

/// Ambient configuration the facade resolves defaults from.
#[derive(Clone, Debug, Default)]
pub struct FacadeConfig {
    /// Type label given to interactively created nodes.
    pub node_type: String,
    /// Attribute applied when no per-type rule matches.
    pub default_edge_attr: Option<AttrId>,
    /// Type labels treated as "start-like" during event import.
    pub start_types: Vec<String>,
    /// Attribute for start-like event nodes.
    pub start_attr: Option<AttrId>,
    /// Type labels treated as "stop-like" during event import.
    pub stop_types: Vec<String>,
    /// Attribute for stop-like event nodes.
    pub stop_attr: Option<AttrId>,
}

/// Thin policy wrapper over [`GraphStore`].
#[derive(Debug, Default)]
pub struct MutationFacade {
    config: FacadeConfig,
    next_group_id: u32,
    events: Vec<GraphEvent>,
}

impl MutationFacade {
    /// Creates a facade with the given ambient configuration.
    #[must_use]
    pub fn new(config: FacadeConfig) -> Self {
        Self {
            config,
            next_group_id: 0,
            events: Vec::new(),
        }
    }

    /// Replaces the ambient type for newly created nodes.
    pub fn set_node_type(&mut self, label: impl Into<String>) {
        self.config.node_type = label.into();
    }

    /// Replaces the ambient default edge attribute.
    pub fn set_default_edge_attr(&mut self, attr: Option<AttrId>) {
        self.config.default_edge_attr = attr;
    }

    /// Drains the accumulated change notifications, oldest first.
    pub fn drain_events(&mut self) -> Vec<GraphEvent> {
        std::mem::take(&mut self.events)
    }

    /// Creates one node at `(x, y)` using the ambient type and attribute,
    /// with an id-derived label.
    ///
    /// # Errors
    /// [`GraphError::UnknownType`] when the ambient type is not registered.
    pub fn create_node(
        &mut self,
        store: &mut GraphStore,
        types: &dyn TypeRegistry,
        x: f64,
        y: f64,
    ) -> Result<NodeId, GraphError> {
        let next = store.peek_next_vertex_id();
        let mut seed = VertexSeed::new(self.config.node_type.clone(), DVec3::new(x, y, 0.0));
        seed.label = format!("{}_{next}", self.config.node_type);
        seed.default_edge_attr = self.config.default_edge_attr;
        let id = store.create_vertex(types, seed)?;
        self.events.push(GraphEvent::NodeCreated(id));
        Ok(id)
    }

    /// Imports one vertex per event, evenly spaced on a horizontal line
    /// centered at `anchor_x`.
    ///
    /// Every node created by one call shares a fresh import-order group id.
    /// The per-type attribute rule maps stop-like types to the configured
    /// stop attribute, start-like types to the start attribute, and
    /// everything else to the ambient default. A node's spatial seed is the
    /// event's end position for stop-like types, else its start position.
    ///
    /// # Errors
    /// [`GraphError::UnknownType`]; nodes created earlier in the batch
    /// remain.
    pub fn create_event_nodes(
        &mut self,
        store: &mut GraphStore,
        types: &dyn TypeRegistry,
        events: &[EventSummary],
        anchor_x: f64,
        anchor_y: f64,
    ) -> Result<Vec<NodeId>, GraphError> {
        if events.is_empty() {
            return Ok(Vec::new());
        }
        // Never merge a batch into a group already present in the store
        // (imported documents carry their own group ids).
        let floor = (0..store.table().len())
            .map(|i| store.table().group_id(i))
            .max()
            .map_or(0, |g| g + 1);
        let group_id = self.next_group_id.max(floor);
        self.next_group_id = group_id + 1;

        let span = EVENT_NODE_SPACING * (events.len() - 1) as f64;
        let mut x = anchor_x - span / 2.0;
        let mut created = Vec::with_capacity(events.len());
        for event in events {
            let stop_like = self.config.stop_types.iter().any(|t| t == &event.event_type);
            let start_like = self.config.start_types.iter().any(|t| t == &event.event_type);
            let attr = if stop_like {
                self.config.stop_attr
            } else if start_like {
                self.config.start_attr
            } else {
                self.config.default_edge_attr
            };
            let spatial = if stop_like {
                event.end_position
            } else {
                event.start_position
            };

            let mut seed = VertexSeed::new(
                event.event_type.clone(),
                DVec3::new(x, anchor_y, 0.0),
            );
            seed.label = format!("Event: {}_{}", event.event_type, event.entity);
            seed.default_edge_attr = attr;
            seed.group_id = group_id;
            seed.start = event.start;
            seed.end = event.end;
            seed.spatial = Some(spatial);
            seed.start_position = Some(event.start_position);
            seed.end_position = Some(event.end_position);
            seed.linked_entity = Some(event.entity);

            let id = store.create_vertex(types, seed)?;
            self.events.push(GraphEvent::NodeCreated(id));
            created.push(id);
            x += EVENT_NODE_SPACING;
        }
        Ok(created)
    }

    /// Generates edges for a domain with a known generation rule.
    ///
    /// `"before"` sorts candidates by descending x in `space` and connects
    /// every later (larger-x) vertex to every earlier one with a directed
    /// edge; `"adjacent"` connects every unordered pair. Pairs already
    /// connected in either orientation are skipped; any other domain name
    /// is a no-op. Returns the number of edges created.
    ///
    /// # Errors
    /// Propagates [`GraphStore::create_edge`] failures; edges created
    /// earlier in the run remain.
    pub fn auto_create_edges(
        &mut self,
        store: &mut GraphStore,
        registry: &dyn DomainRegistry,
        domain: &str,
        selection_only: bool,
        space: PositionSpace,
    ) -> Result<usize, GraphError> {
        if domain != "before" && domain != "adjacent" {
            return Ok(0);
        }
        let mut candidates: Vec<NodeId> = if selection_only {
            store.selected_vertices()
        } else {
            store.table().ids().collect()
        };
        if domain == "before" {
            candidates.sort_by(|a, b| {
                let xa = store
                    .position(space, *a)
                    .map_or(f64::NEG_INFINITY, |p| p.x);
                let xb = store
                    .position(space, *b)
                    .map_or(f64::NEG_INFINITY, |p| p.x);
                xb.total_cmp(&xa)
            });
        }

        let mut created = 0;
        for i in 0..candidates.len() {
            for j in (i + 1)..candidates.len() {
                let (parent, child) = (candidates[i], candidates[j]);
                if store.edge_between(domain, parent, child).is_some() {
                    continue;
                }
                let id = store.create_edge(registry, domain, parent, child, None, None)?;
                self.events.push(GraphEvent::EdgeCreated {
                    domain: domain.to_owned(),
                    id,
                });
                created += 1;
            }
        }
        Ok(created)
    }

    /// Creates one edge, recording the notification.
    ///
    /// # Errors
    /// Propagates [`GraphStore::create_edge`] failures.
    pub fn create_edge(
        &mut self,
        store: &mut GraphStore,
        registry: &dyn DomainRegistry,
        domain: &str,
        parent: NodeId,
        child: NodeId,
    ) -> Result<EdgeId, GraphError> {
        let id = store.create_edge(registry, domain, parent, child, None, None)?;
        self.events.push(GraphEvent::EdgeCreated {
            domain: domain.to_owned(),
            id,
        });
        Ok(id)
    }

    /// Deletes vertices, recording the notification after the store has
    /// removed them from every overlay.
    ///
    /// # Errors
    /// Propagates [`GraphStore::delete_vertices`] failures; nothing was
    /// deleted and no event is recorded.
    pub fn delete_nodes(
        &mut self,
        store: &mut GraphStore,
        ids: &[NodeId],
    ) -> Result<(), GraphError> {
        store.delete_vertices(ids)?;
        self.events.push(GraphEvent::NodesDeleted(ids.to_vec()));
        Ok(())
    }

    /// Replaces the vertex selection, clearing all edge selections first.
    ///
    /// # Errors
    /// Propagates [`GraphStore::set_selected_vertices`] failures; selection
    /// state is unchanged.
    pub fn select_nodes(
        &mut self,
        store: &mut GraphStore,
        ids: &[NodeId],
    ) -> Result<(), GraphError> {
        store.set_selected_vertices(ids)?;
        if !ids.is_empty() {
            store.clear_selected_edges();
        }
        self.events
            .push(GraphEvent::SelectedNodesChanged(ids.to_vec()));
        Ok(())
    }

    /// Replaces the edge selection of `domain`, clearing the vertex
    /// selection first.
    ///
    /// # Errors
    /// Propagates [`GraphStore::set_selected_edges`] failures; selection
    /// state is unchanged.
    pub fn select_edges(
        &mut self,
        store: &mut GraphStore,
        domain: &str,
        ids: &[EdgeId],
    ) -> Result<(), GraphError> {
        store.set_selected_edges(domain, ids)?;
        if !ids.is_empty() {
            store.clear_selected_vertices();
        }
        self.events.push(GraphEvent::SelectedEdgesChanged {
            domain: domain.to_owned(),
            ids: ids.to_vec(),
        });
        Ok(())
    }
}
