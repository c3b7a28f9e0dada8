// SPDX-License-Identifier: Apache-2.0

#![allow(missing_docs)]
#![allow(clippy::unwrap_used, clippy::expect_used)]

use glam::{DVec2, DVec3};

use actograph_core::{
    registry::{ConfigDomainRegistry, DomainSpec, StaticTypeRegistry},
    AttrId, Directedness, EntityId, EventSummary, FacadeConfig, GraphEvent, GraphStore,
    MutationFacade, PositionSpace, TimeMark, VertexSeed,
};

fn types() -> StaticTypeRegistry {
    StaticTypeRegistry::new(["EVENT", "STARTING", "STOPPING"])
}

fn registry() -> ConfigDomainRegistry {
    ConfigDomainRegistry::new([
        (
            "before",
            DomainSpec {
                directedness: Directedness::Directed,
                param: None,
            },
        ),
        (
            "adjacent",
            DomainSpec {
                directedness: Directedness::Undirected,
                param: None,
            },
        ),
    ])
}

fn facade() -> MutationFacade {
    MutationFacade::new(FacadeConfig {
        node_type: "EVENT".into(),
        default_edge_attr: Some(AttrId(1)),
        start_types: vec!["STARTING".into()],
        start_attr: Some(AttrId(2)),
        stop_types: vec!["STOPPING".into()],
        stop_attr: Some(AttrId(3)),
    })
}

fn event(id: i64, event_type: &str) -> EventSummary {
    EventSummary {
        entity: EntityId(id),
        event_type: event_type.into(),
        start: TimeMark::new(id as f64 * 1e6, id as u32),
        end: TimeMark::new(id as f64 * 1e6 + 5e5, id as u32 + 10),
        start_position: DVec2::new(id as f64, 0.0),
        end_position: DVec2::new(id as f64 + 1.0, 1.0),
    }
}

#[test]
fn created_nodes_get_id_derived_labels() {
    let types = types();
    let mut store = GraphStore::new();
    let mut facade = facade();
    let id = facade.create_node(&mut store, &types, 2.0, 3.0).unwrap();
    let index = store.table().index_of(id).unwrap();
    assert_eq!(store.table().label(index), "EVENT_0");
    assert_eq!(store.table().default_edge_attr(index), Some(AttrId(1)));
    assert_eq!(
        store.position(PositionSpace::User, id).unwrap(),
        DVec3::new(2.0, 3.0, 0.0)
    );
    assert_eq!(facade.drain_events(), vec![GraphEvent::NodeCreated(id)]);
}

#[test]
fn before_edges_follow_the_descending_x_rule() {
    // Vertices at x = 0, 1, 2: every later-x vertex points at every
    // earlier-x one, three edges total.
    let types = types();
    let registry = registry();
    let mut store = GraphStore::new();
    let mut facade = facade();

    let v0 = store
        .create_vertex(&types, VertexSeed::new("EVENT", DVec3::new(0.0, 0.0, 0.0)))
        .unwrap();
    let v1 = store
        .create_vertex(&types, VertexSeed::new("EVENT", DVec3::new(1.0, 0.0, 0.0)))
        .unwrap();
    let v2 = store
        .create_vertex(&types, VertexSeed::new("EVENT", DVec3::new(2.0, 0.0, 0.0)))
        .unwrap();

    let created = facade
        .auto_create_edges(&mut store, &registry, "before", false, PositionSpace::User)
        .unwrap();
    assert_eq!(created, 3);

    let overlay = store.domain("before").unwrap();
    assert_eq!(overlay.edge_count(), 3);
    let pairs: Vec<_> = overlay.edges().map(|(_, e)| (e.parent, e.child)).collect();
    assert!(pairs.contains(&(v1, v0)));
    assert!(pairs.contains(&(v2, v0)));
    assert!(pairs.contains(&(v2, v1)));

    // Re-running skips every already-connected pair.
    let again = facade
        .auto_create_edges(&mut store, &registry, "before", false, PositionSpace::User)
        .unwrap();
    assert_eq!(again, 0);
}

#[test]
fn adjacent_edges_connect_every_unconnected_pair() {
    let types = types();
    let registry = registry();
    let mut store = GraphStore::new();
    let mut facade = facade();
    for x in 0..4 {
        store
            .create_vertex(
                &types,
                VertexSeed::new("EVENT", DVec3::new(f64::from(x), 0.0, 0.0)),
            )
            .unwrap();
    }
    let created = facade
        .auto_create_edges(&mut store, &registry, "adjacent", false, PositionSpace::User)
        .unwrap();
    assert_eq!(created, 6);
}

#[test]
fn unknown_generation_domain_is_a_no_op() {
    let types = types();
    let registry = registry();
    let mut store = GraphStore::new();
    let mut facade = facade();
    store
        .create_vertex(&types, VertexSeed::new("EVENT", DVec3::ZERO))
        .unwrap();
    store
        .create_vertex(&types, VertexSeed::new("EVENT", DVec3::X))
        .unwrap();
    let created = facade
        .auto_create_edges(&mut store, &registry, "during", false, PositionSpace::User)
        .unwrap();
    assert_eq!(created, 0);
    assert!(store.domain("during").is_none());
}

#[test]
fn event_import_spaces_labels_and_groups_nodes() {
    let types = types();
    let mut store = GraphStore::new();
    let mut facade = facade();

    let first = facade
        .create_event_nodes(
            &mut store,
            &types,
            &[event(10, "STARTING"), event(11, "EVENT"), event(12, "STOPPING")],
            5.0,
            2.0,
        )
        .unwrap();
    assert_eq!(first.len(), 3);

    // Evenly spaced by 0.3 and centered on the anchor.
    let xs: Vec<f64> = first
        .iter()
        .map(|id| store.position(PositionSpace::User, *id).unwrap().x)
        .collect();
    assert!((xs[0] - 4.7).abs() < 1e-12);
    assert!((xs[1] - 5.0).abs() < 1e-12);
    assert!((xs[2] - 5.3).abs() < 1e-12);

    let i0 = store.table().index_of(first[0]).unwrap();
    assert_eq!(store.table().label(i0), "Event: STARTING_10");
    assert_eq!(store.table().default_edge_attr(i0), Some(AttrId(2)));
    assert_eq!(store.table().linked_entity(i0), Some(EntityId(10)));

    // Plain types fall back to the ambient attribute; stop-like types get
    // the stop attribute and seed their spatial fix from the end position.
    let i1 = store.table().index_of(first[1]).unwrap();
    assert_eq!(store.table().default_edge_attr(i1), Some(AttrId(1)));
    let i2 = store.table().index_of(first[2]).unwrap();
    assert_eq!(store.table().default_edge_attr(i2), Some(AttrId(3)));
    let spatial = store.position(PositionSpace::Spatial, first[2]).unwrap();
    assert_eq!(DVec2::new(spatial.x, spatial.y), event(12, "STOPPING").end_position);

    // A second import call gets the next group id.
    let second = facade
        .create_event_nodes(&mut store, &types, &[event(20, "EVENT")], 0.0, 0.0)
        .unwrap();
    let g_first = store.table().group_id(i0);
    let gi = store.table().index_of(second[0]).unwrap();
    assert_eq!(store.table().group_id(gi), g_first + 1);
}

#[test]
fn event_groups_start_above_groups_already_in_the_store() {
    let types = types();
    let mut store = GraphStore::new();
    let mut facade = facade();

    // A loaded document's nodes carry their own group ids.
    let mut imported = VertexSeed::new("EVENT", DVec3::ZERO);
    imported.group_id = 5;
    store.create_vertex(&types, imported).unwrap();

    let created = facade
        .create_event_nodes(&mut store, &types, &[event(1, "EVENT")], 0.0, 0.0)
        .unwrap();
    let index = store.table().index_of(created[0]).unwrap();
    assert_eq!(store.table().group_id(index), 6);

    // The counter keeps advancing from there.
    let next = facade
        .create_event_nodes(&mut store, &types, &[event(2, "EVENT")], 0.0, 0.0)
        .unwrap();
    let index = store.table().index_of(next[0]).unwrap();
    assert_eq!(store.table().group_id(index), 7);
}

#[test]
fn vertex_and_edge_selections_are_mutually_exclusive() {
    let types = types();
    let registry = registry();
    let mut store = GraphStore::new();
    let mut facade = facade();

    let a = store
        .create_vertex(&types, VertexSeed::new("EVENT", DVec3::ZERO))
        .unwrap();
    let b = store
        .create_vertex(&types, VertexSeed::new("EVENT", DVec3::X))
        .unwrap();
    let edge = store
        .create_edge(&registry, "before", b, a, None, None)
        .unwrap();

    facade.select_nodes(&mut store, &[a, b]).unwrap();
    assert_eq!(store.selected_vertices(), vec![a, b]);

    facade.select_edges(&mut store, "before", &[edge]).unwrap();
    assert!(store.selected_vertices().is_empty());
    assert_eq!(store.selected_edges("before"), vec![edge]);

    facade.select_nodes(&mut store, &[a]).unwrap();
    assert!(store.selected_edges("before").is_empty());
    assert_eq!(store.selected_vertices(), vec![a]);
}

#[test]
fn deletions_surface_through_the_event_queue() {
    let types = types();
    let mut store = GraphStore::new();
    let mut facade = facade();
    let a = facade.create_node(&mut store, &types, 0.0, 0.0).unwrap();
    facade.drain_events();

    facade.delete_nodes(&mut store, &[a]).unwrap();
    assert_eq!(
        facade.drain_events(),
        vec![GraphEvent::NodesDeleted(vec![a])]
    );
    assert!(facade.drain_events().is_empty());
}
