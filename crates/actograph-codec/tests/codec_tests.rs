// SPDX-License-Identifier: Apache-2.0

#![allow(missing_docs)]
#![allow(clippy::unwrap_used, clippy::expect_used)]

use glam::{DVec2, DVec3};

use actograph_codec::{export, import, restore, snapshot, GraphDocument, UndoStack};
use actograph_core::{
    registry::{
        ConfigDomainRegistry, DomainSpec, StaticAttributeRegistry, StaticTypeRegistry,
    },
    AttrId, Directedness, EntityId, GraphStore, NodeId, TimeMark, VertexSeed,
};

fn types() -> StaticTypeRegistry {
    StaticTypeRegistry::new(["EVENT", "STARTING"])
}

fn domains() -> ConfigDomainRegistry {
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

fn attrs() -> StaticAttributeRegistry {
    StaticAttributeRegistry::new([(AttrId(1), "begin"), (AttrId(2), "end")])
}

fn populated_store() -> GraphStore {
    let types = types();
    let registry = domains();
    let mut store = GraphStore::new();

    let mut linked = VertexSeed::new("STARTING", DVec3::new(1.0, 2.0, 0.0));
    linked.label = "Event: STARTING_7".into();
    linked.default_edge_attr = Some(AttrId(1));
    linked.group_id = 3;
    linked.start = TimeMark::new(2_500_000.0, 25);
    linked.end = TimeMark::new(4_000_000.0, 40);
    linked.spatial = Some(DVec2::new(640.0, 480.0));
    linked.start_position = Some(DVec2::new(600.0, 400.0));
    linked.end_position = Some(DVec2::new(700.0, 500.0));
    linked.linked_entity = Some(EntityId(7));
    let a = store.create_vertex(&types, linked).unwrap();

    let mut plain = VertexSeed::new("EVENT", DVec3::new(5.0, 6.0, 0.0));
    plain.label = "EVENT_1".into();
    let b = store.create_vertex(&types, plain).unwrap();

    store
        .create_edge(&registry, "before", b, a, None, Some(vec![AttrId(2)]))
        .unwrap();
    store
        .create_edge(&registry, "adjacent", a, b, None, None)
        .unwrap();
    store
}

#[test]
fn export_import_round_trips() {
    let types = types();
    let registry = domains();
    let attrs = attrs();
    let store = populated_store();

    let doc = export(&store, &attrs);

    // Times are persisted in seconds.
    assert_eq!(doc.nodes[0].event_start_time, Some(2.5));
    assert_eq!(doc.nodes[0].event_end_time, Some(4.0));
    assert_eq!(doc.nodes[0].event_start_frame, Some(25));
    assert_eq!(doc.nodes[0].default_edge_attr.as_deref(), Some("begin"));
    // Virtual nodes have no independent anchors to persist.
    assert_eq!(doc.nodes[1].event_start_position_x, None);

    let mut replayed = GraphStore::new();
    let report = import(&mut replayed, &types, &registry, &attrs, &doc);
    assert_eq!((report.nodes, report.edges, report.skipped), (2, 2, 0));

    // The replayed store carries microsecond times again.
    let index = replayed.table().index_of(NodeId(0)).unwrap();
    assert_eq!(replayed.table().start(index).time, Some(2_500_000.0));

    // Seeded and explicit edge attributes both survive.
    let before = replayed.domain("before").unwrap();
    let (_, edge) = before.edges().next().unwrap();
    assert_eq!(edge.parent_attrs, Vec::<AttrId>::new());
    assert_eq!(edge.child_attrs, vec![AttrId(2)]);

    // A second export reproduces the document exactly.
    assert_eq!(export(&replayed, &attrs), doc);
}

#[test]
fn json_round_trips_and_stringifies_directedness() {
    let attrs = attrs();
    let store = populated_store();
    let doc = export(&store, &attrs);

    let text = doc.to_json().unwrap();
    assert!(text.contains("\"directed\": \"true\""));
    assert!(text.contains("\"directed\": \"false\""));
    assert_eq!(GraphDocument::from_json(&text).unwrap(), doc);
}

#[test]
fn unknown_attribute_names_are_skipped_not_fatal() {
    let types = types();
    let registry = domains();
    let attrs = attrs();

    let text = r#"{
        "nodes": [
            { "id": 0, "label": "a", "event_type": "EVENT", "x": 0.0, "y": 0.0,
              "default_edge_attr": "nonsense" },
            { "id": 1, "label": "b", "event_type": "EVENT", "x": 1.0, "y": 0.0 }
        ],
        "primitives": [
            { "name": "before", "directed": "true",
              "links": [ { "id": 0, "parent_id": 1, "child_id": 0,
                           "parent_attributes": ["nonsense", "begin"] } ] }
        ]
    }"#;
    let doc = GraphDocument::from_json(text).unwrap();
    let mut store = GraphStore::new();
    import(&mut store, &types, &registry, &attrs, &doc);

    let index = store.table().index_of(NodeId(0)).unwrap();
    assert_eq!(store.table().default_edge_attr(index), None);
    let (_, edge) = store.domain("before").unwrap().edges().next().unwrap();
    assert_eq!(edge.parent_attrs, vec![AttrId(1)]);
}

#[test]
fn repeated_node_ids_are_skipped_not_fatal() {
    let types = types();
    let registry = domains();
    let attrs = attrs();

    let text = r#"{
        "nodes": [
            { "id": 0, "label": "first", "event_type": "EVENT", "x": 0.0, "y": 0.0 },
            { "id": 0, "label": "second", "event_type": "EVENT", "x": 1.0, "y": 0.0 }
        ],
        "primitives": []
    }"#;
    let doc = GraphDocument::from_json(text).unwrap();
    let mut store = GraphStore::new();
    let report = import(&mut store, &types, &registry, &attrs, &doc);
    assert_eq!((report.nodes, report.skipped), (1, 1));

    // The first occurrence wins.
    assert_eq!(store.vertex_count(), 1);
    let index = store.table().index_of(NodeId(0)).unwrap();
    assert_eq!(store.table().label(index), "first");
}

#[test]
fn unknown_primitive_blocks_are_skipped_entirely() {
    let types = types();
    let registry = domains();
    let attrs = attrs();

    let text = r#"{
        "nodes": [
            { "id": 0, "label": "a", "event_type": "EVENT", "x": 0.0, "y": 0.0 },
            { "id": 1, "label": "b", "event_type": "EVENT", "x": 1.0, "y": 0.0 }
        ],
        "primitives": [
            { "name": "mystery", "directed": "true",
              "links": [ { "id": 0, "parent_id": 1, "child_id": 0 } ] },
            { "name": "before", "directed": "true",
              "links": [ { "id": 0, "parent_id": 1, "child_id": 0 } ] }
        ]
    }"#;
    let doc = GraphDocument::from_json(text).unwrap();
    let mut store = GraphStore::new();
    let report = import(&mut store, &types, &registry, &attrs, &doc);
    assert_eq!(report.skipped, 1);

    assert!(store.domain("mystery").is_none());
    assert_eq!(store.domain("before").unwrap().edge_count(), 1);
}

#[test]
fn malformed_documents_fail_to_parse() {
    let err = GraphDocument::from_json("{ \"nodes\": [ { \"label\": 3 } ] }").unwrap_err();
    assert!(err.to_string().contains("malformed document"));
}

#[test]
fn explicit_ids_keep_later_creations_monotonic() {
    let types = types();
    let registry = domains();
    let attrs = attrs();
    let store = populated_store();
    let doc = export(&store, &attrs);

    let mut replayed = GraphStore::new();
    import(&mut replayed, &types, &registry, &attrs, &doc);
    let next = replayed
        .create_vertex(&types, VertexSeed::new("EVENT", DVec3::ZERO))
        .unwrap();
    assert_eq!(next, NodeId(2));
}

#[test]
fn snapshot_restore_undoes_a_mutation() {
    let types = types();
    let registry = domains();
    let attrs = attrs();
    let mut store = populated_store();
    let mut history = UndoStack::new();

    let before = snapshot(&store, &attrs);
    history.record(before);
    store.delete_vertices(&[NodeId(1)]).unwrap();
    assert_eq!(store.vertex_count(), 1);

    let current = snapshot(&store, &attrs);
    let target = history.undo(current).unwrap();
    restore(&mut store, &types, &registry, &attrs, &target);
    assert_eq!(store.vertex_count(), 2);
    assert_eq!(store.domain("before").unwrap().edge_count(), 1);

    // Redo replays the deletion.
    let current = snapshot(&store, &attrs);
    let target = history.redo(current).unwrap();
    restore(&mut store, &types, &registry, &attrs, &target);
    assert_eq!(store.vertex_count(), 1);
    assert!(!history.can_redo());
}
