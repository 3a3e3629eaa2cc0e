//! Integration Tests for the Attribute Graph
//!
//! These tests verify that nodes, connections, schemas and the dirty
//! indicator work together correctly through the public API.

use std::sync::{Arc, Mutex};
use std::thread;

use kukulkan_core::error::{Error, ErrorCategory, ValidationError};
use kukulkan_core::graph::{ChangeEvent, Graph, Node, Session, SharedSession};
use kukulkan_core::identity::AttributeId;
use kukulkan_core::kinds::{AttributeKind, NodeSchema, SchemaRegistry};
use kukulkan_core::nodes::Transform;
use kukulkan_core::value::Value;

fn scalar_schema() -> NodeSchema {
    NodeSchema::from_attributes("Scalar", [("value", AttributeKind::Float)]).unwrap()
}

fn scalar(session: &mut Session, graph: &mut Graph, name: &str) -> AttributeId {
    let node = Node::new(&scalar_schema(), name, session);
    let value = node.get_attribute("value").unwrap();
    graph.add_node(node);
    value
}

fn identity_with_translation(x: f64, y: f64, z: f64) -> [[f64; 4]; 4] {
    [
        [1.0, 0.0, 0.0, x],
        [0.0, 1.0, 0.0, y],
        [0.0, 0.0, 1.0, z],
        [0.0, 0.0, 0.0, 1.0],
    ]
}

/// Test that a connected transform reads its driver's matrix and refuses
/// direct writes.
#[test]
fn connected_transform_follows_driver() {
    let mut session = Session::new();
    let mut graph = Graph::new();

    let (hip_node, hip) = Transform::create("hip", &mut session).unwrap();
    let (knee_node, knee) = Transform::create("knee", &mut session).unwrap();
    graph.add_node(hip_node);
    graph.add_node(knee_node);

    session.connect(hip.xform(), knee.xform()).unwrap();

    let matrix = identity_with_translation(1.0, 2.0, 3.0);
    hip.set_matrix(&mut session, matrix).unwrap();

    // Knee resolves through the connection
    assert_eq!(knee.matrix(&session).unwrap(), matrix);
    assert_eq!(session.get(knee.xform()).unwrap(), Value::from(matrix));

    // Writing to the driven side is a state error and changes nothing
    let err = knee.set_matrix(&mut session, [[0.0; 4]; 4]).unwrap_err();
    assert!(matches!(err, Error::DrivenAttribute { .. }));
    assert_eq!(err.category(), ErrorCategory::State);
    assert_eq!(knee.matrix(&session).unwrap(), matrix);
}

/// Test that a matrix of the wrong shape is rejected with a validation
/// error naming the expected shape.
#[test]
fn wrong_shape_matrix_is_rejected() {
    let mut session = Session::new();
    let (_, trs) = Transform::create("trs", &mut session).unwrap();

    let three = Value::filled(3, 3, Value::Float(1.0));
    let err = session.set(trs.xform(), three).unwrap_err();

    assert!(err.is_validation());
    assert!(err.to_string().contains("4x4"), "{}", err);
    // The stored matrix is still the zero default
    assert_eq!(trs.matrix(&session).unwrap(), [[0.0; 4]; 4]);
    assert!(!session.is_dirty());
}

/// Test that an integer 3x3 matrix is rejected as the wrong shape for an
/// xform.
#[test]
fn integer_three_by_three_is_wrong_shape() {
    let mut session = Session::new();
    let (_, trs) = Transform::create("trs", &mut session).unwrap();

    let three = Value::from(vec![vec![1, 2, 3], vec![4, 5, 6], vec![7, 8, 9]]);
    let err = session.set(trs.xform(), three).unwrap_err();

    assert!(matches!(
        err,
        Error::Validation(ValidationError::Shape { rows: 4, cols: 4, .. })
    ));
    assert_eq!(
        err.to_string(),
        "[[1, 2, 3], [4, 5, 6], [7, 8, 9]] cannot be converted to a 4x4 matrix"
    );
    assert_eq!(trs.matrix(&session).unwrap(), [[0.0; 4]; 4]);
}

/// Test that values flow down a chain and that disconnecting restores the
/// downstream local value.
#[test]
fn chain_propagates_until_disconnected() {
    let mut session = Session::new();
    let mut graph = Graph::new();
    let a = scalar(&mut session, &mut graph, "a");
    let b = scalar(&mut session, &mut graph, "b");
    let c = scalar(&mut session, &mut graph, "c");

    session.connect(a, b).unwrap();
    session.connect(b, c).unwrap();
    session.set(a, 3.5).unwrap();

    assert_eq!(session.get(c).unwrap(), Value::Float(3.5));
    assert_eq!(session.downstream(a).unwrap(), vec![b, c]);

    session.disconnect(b, c).unwrap();
    assert_eq!(session.get(b).unwrap(), Value::Float(3.5));
    assert_eq!(session.get(c).unwrap(), Value::Float(0.0));
}

/// Test that every forbidden connection leaves the wiring untouched.
#[test]
fn invalid_connections_are_refused() {
    let mut session = Session::new();
    let mut graph = Graph::new();
    let a = scalar(&mut session, &mut graph, "a");
    let b = scalar(&mut session, &mut graph, "b");
    let c = scalar(&mut session, &mut graph, "c");

    session.connect(a, b).unwrap();
    session.connect(b, c).unwrap();

    // Closing the loop
    let err = session.connect(c, a).unwrap_err();
    assert!(matches!(err, Error::Cycle { .. }));
    assert!(err.is_state());

    // A second input for an already driven attribute
    let err = session.connect(a, c).unwrap_err();
    assert!(matches!(err, Error::AlreadyDriven { .. }));

    // Self connection
    assert!(session.connect(a, a).unwrap_err().is_state());

    // Disconnecting an edge that does not exist
    assert!(session.disconnect(a, c).unwrap_err().is_lookup());

    assert_eq!(session.attribute(a).unwrap().input(), None);
    assert_eq!(session.attribute(c).unwrap().input(), Some(b));
}

/// Test that removing a node the graph does not hold is a lookup error.
#[test]
fn removing_unknown_node_fails() {
    let mut session = Session::new();
    let mut graph = Graph::new();
    scalar(&mut session, &mut graph, "kept");

    let stray = Node::new(&scalar_schema(), "stray", &mut session);
    let err = graph.remove_node(&stray).unwrap_err();

    assert_eq!(err.category(), ErrorCategory::Lookup);
    assert_eq!(graph.node_count(), 1);
    assert_eq!(graph.to_string(), "kept");
}

/// Test that tearing a node out of the session cleans up both sides of its
/// connections.
#[test]
fn destroying_a_node_after_disconnecting() {
    let mut session = Session::new();
    let mut graph = Graph::new();
    let a = scalar(&mut session, &mut graph, "a");
    let b = scalar(&mut session, &mut graph, "b");
    let c = scalar(&mut session, &mut graph, "c");
    session.connect(a, b).unwrap();
    session.connect(b, c).unwrap();

    let middle = graph.find_node("b").unwrap().id();
    let middle = graph.remove_node(middle).unwrap();

    // Still wired, so the session refuses to drop it
    let err = session.destroy_node(middle.clone()).unwrap_err();
    assert!(matches!(err, Error::StillConnected { count: 2, .. }));

    assert_eq!(session.disconnect_node(&middle).unwrap(), 2);
    session.destroy_node(middle).unwrap();

    assert!(!session.contains(b));
    assert!(session.attribute(a).unwrap().outputs().is_empty());
    assert_eq!(session.attribute(c).unwrap().input(), None);
}

/// Test that an attribute list sets paired members and ignores the extras.
#[test]
fn attribute_list_sets_paired_members() {
    let mut session = Session::new();
    let schema = NodeSchema::from_attributes(
        "Finger",
        [
            ("base", AttributeKind::Float),
            ("mid", AttributeKind::Float),
            ("tip", AttributeKind::Float),
        ],
    )
    .unwrap();
    let finger = Node::new(&schema, "index", &mut session);
    let joints = finger.attribute_list("joints", &["base", "mid", "tip"]).unwrap();

    // Shorter value list: only the first two are written
    joints.set_values(&mut session, [1.0, 2.0]).unwrap();
    assert_eq!(
        joints.get_values(&session).unwrap(),
        vec![Value::Float(1.0), Value::Float(2.0), Value::Float(0.0)]
    );

    // A bad value anywhere leaves every member untouched
    let err = joints
        .set_values(&mut session, [Value::from(5.0), Value::from("x")])
        .unwrap_err();
    assert!(err.is_validation());
    assert_eq!(session.get(joints[0]).unwrap(), Value::Float(1.0));
}

/// Test that schemas loaded from JSON build working nodes.
#[test]
fn registry_from_json_instantiates_nodes() {
    let json = r#"{
        "Blend": {
            "name": "Blend",
            "attributes": {
                "weight": { "type": "float" },
                "label": { "type": "string" },
                "steps": { "type": "integer" }
            }
        }
    }"#;

    let mut registry = SchemaRegistry::with_builtins();
    registry.merge(SchemaRegistry::from_json(json).unwrap());
    assert!(registry.contains("Transform"));

    let mut session = Session::new();
    let blend = registry.instantiate("Blend", "blend1", &mut session).unwrap();
    let weight = blend.get_attribute("weight").unwrap();
    let steps = blend.get_attribute("steps").unwrap();

    session.set(weight, "0.25").unwrap();
    session.set(steps, 2.9).unwrap();
    assert_eq!(session.get(weight).unwrap(), Value::Float(0.25));
    assert_eq!(session.get(steps).unwrap(), Value::Integer(2));

    let err = registry
        .instantiate("Missing", "nope", &mut session)
        .unwrap_err();
    assert!(err.is_lookup());
}

/// Test that subscribers see every mutation and the dirty flag tracks them.
#[test]
fn subscribers_and_dirty_flag() {
    let mut session = Session::new();
    let mut graph = Graph::new();
    let a = scalar(&mut session, &mut graph, "a");
    let b = scalar(&mut session, &mut graph, "b");

    let events = Arc::new(Mutex::new(Vec::new()));
    let sink = events.clone();
    let id = session.subscribe(move |event| sink.lock().unwrap().push(*event));

    session.set(a, 1.0).unwrap();
    session.connect(a, b).unwrap();
    assert!(session.is_dirty());

    session.mark_clean();
    // Failed mutations neither notify nor dirty
    assert!(session.set(b, 2.0).is_err());
    assert!(!session.is_dirty());

    session.disconnect(a, b).unwrap();
    assert!(session.unsubscribe(id));
    session.set(b, 4.0).unwrap();

    assert_eq!(
        *events.lock().unwrap(),
        vec![
            ChangeEvent::ValueSet { attribute: a },
            ChangeEvent::Connected {
                source: a,
                destination: b
            },
            ChangeEvent::Disconnected {
                source: a,
                destination: b
            },
        ]
    );
}

/// Test that a shared session serializes writers from several threads.
#[test]
fn shared_session_across_threads() {
    let mut session = Session::new();
    let mut graph = Graph::new();
    let root = scalar(&mut session, &mut graph, "root");
    let leaves: Vec<_> = (0..8)
        .map(|i| scalar(&mut session, &mut graph, &format!("leaf{}", i)))
        .collect();

    let shared = SharedSession::new(session);
    let handles: Vec<_> = leaves
        .iter()
        .map(|leaf| {
            let shared = shared.clone();
            let leaf = *leaf;
            thread::spawn(move || shared.connect(root, leaf).unwrap())
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    shared.set(root, 7.0).unwrap();
    for leaf in &leaves {
        assert_eq!(shared.get(*leaf).unwrap(), Value::Float(7.0));
    }
    assert_eq!(shared.with(|s| s.downstream(root).unwrap().len()), 8);
    assert!(shared.take_dirty());
}
