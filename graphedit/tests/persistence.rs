use graphedit::{Attributes, EditSession, EditorConfig, GraphError, InputEvent, Key, NodeId, Vec2};
use serde_json::json;

fn session_at(path: std::path::PathBuf) -> EditSession {
    EditSession::new(EditorConfig {
        document_path: path,
        ..EditorConfig::default()
    })
}

fn triangle(s: &mut EditSession) {
    let a = s.add_node(Vec2::new(0.0, 0.0), Attributes::new()).unwrap();
    let b = s.add_node(Vec2::new(3.0, 0.0), Attributes::new()).unwrap();
    let c = s.add_node(Vec2::new(0.0, 4.0), Attributes::new()).unwrap();
    s.connect(a, b).unwrap();
    s.connect(b, c).unwrap();
    s.connect(c, a).unwrap();
}

#[test]
fn save_then_load_restores_graph_and_clears_history() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("graph.json");
    let mut s = session_at(path.clone());
    triangle(&mut s);
    s.delete_node(NodeId(1)).unwrap();
    s.undo().unwrap();

    s.handle(InputEvent::KeyUp { key: Key::Char('s') });
    assert!(s.status().starts_with("3 nodes written to"), "{}", s.status());

    let mut fresh = session_at(path);
    fresh.handle(InputEvent::KeyUp { key: Key::Char('l') });
    assert!(fresh.status().starts_with("3 nodes loaded from"), "{}", fresh.status());
    assert_eq!(fresh.store().node_count(), 3);
    assert_eq!(fresh.store().edge_count(), 3);
    assert_eq!(fresh.store().edge_between(NodeId(1), NodeId(2)).map(|e| e.weight), Some(5.0));
    assert!(fresh.history().is_empty());
    assert_eq!(fresh.selection(), None);
    // the id counter resumes past every loaded id
    let d = fresh.add_node(Vec2::ZERO, Attributes::new()).unwrap();
    assert_eq!(d, NodeId(3));
}

#[test]
fn missing_file_reports_status_and_keeps_state() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.json");
    let mut s = session_at(path.clone());
    triangle(&mut s);
    let err = s.load(&path).unwrap_err();
    assert!(matches!(err, GraphError::Io(_)));
    assert_eq!(s.status(), format!("File {} not found", path.display()));
    assert_eq!(s.store().node_count(), 3);
    assert_eq!(s.history().len(), 6);
}

#[test]
fn failed_import_leaves_session_untouched() {
    let mut s = EditSession::default();
    triangle(&mut s);
    let before = s.export().unwrap();
    let bad = json!({
        "version": 1,
        "nodes": [ {"id": 0, "x": 0.0, "y": 0.0} ],
        "edges": [ {"u": 0, "v": 2} ]
    });
    let err = s.import(bad.to_string().as_bytes()).unwrap_err();
    assert_eq!(err.code(), "invalid_structure");
    assert_eq!(s.status(), err.to_string());
    assert_eq!(s.export().unwrap(), before);
    assert_eq!(s.history().len(), 6);
    assert!(s.undo().is_ok());
}

#[test]
fn import_keeps_attributes_and_ignores_stored_weights() {
    let mut s = EditSession::default();
    let doc = json!({
        "version": 1,
        "next_id": 10,
        "nodes": [
            {"id": 2, "x": 0.0, "y": 0.0, "attributes": {"label": "start"}},
            {"id": 5, "x": 0.0, "y": 2.0}
        ],
        "edges": [ {"u": 2, "v": 5, "weight": 99.0, "attributes": {"color": "red"}} ]
    });
    s.import(doc.to_string().as_bytes()).unwrap();
    let n = s.store().node(NodeId(2)).unwrap();
    assert_eq!(n.attributes.get("label"), Some(&json!("start")));
    let e = s.store().edge_between(NodeId(5), NodeId(2)).unwrap();
    assert_eq!(e.weight, 2.0);
    assert_eq!(e.attributes.get("color"), Some(&json!("red")));
    assert_eq!(s.store().next_id(), NodeId(10));
}

#[test]
fn oversized_documents_are_rejected() {
    let nodes: Vec<_> = (0..200_001u32)
        .map(|i| json!({"id": i, "x": 0.0, "y": 0.0}))
        .collect();
    let doc = json!({"version": 1, "nodes": nodes});
    let mut s = EditSession::default();
    let err = s.import(doc.to_string().as_bytes()).unwrap_err();
    assert_eq!(err.code(), "caps_exceeded");
}
