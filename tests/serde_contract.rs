use depgraph3d::events::{Event, PayloadFocus, PayloadNodeMove};
use depgraph3d::layouts::LayoutMode;
use depgraph3d::{Filters, GraphPayload, Settings, StatusFilter, VisualModifiers};
use serde_json::json;

#[test]
fn test_contract_graph_payload_to_graph() {
    let payload = json!({
        "nodes": [
            {"id": "core::io", "position": [0.0, 10.0, 0.0], "service": "core"},
            {"id": "core::fs", "position": [5.0, 10.0, 0.0], "role": "adapter"},
        ],
        "edges": [
            {"id": "io-fs", "source": "core::io", "target": "core::fs", "weight": 3.0},
        ],
    });
    let g = GraphPayload::from_json(&payload.to_string())
        .expect("decode")
        .into_graph();

    assert_eq!(g.node_count(), 2);
    let edge = g.edge("io-fs").expect("edge");
    assert_eq!(edge.weight(), 3.0);
    assert_eq!(edge.thickness(), 1.0);
    assert_eq!(g.node("core::fs").and_then(|n| n.role()), Some("adapter"));
}

#[test]
fn test_contract_modifiers_shape() {
    let m: VisualModifiers = serde_json::from_value(json!({
        "addedNodeIds": ["x"],
        "removedEdgeIds": ["a->b"],
        "focusNodeId": "x",
    }))
    .expect("decode");
    assert!(m.is_node_added("x"));
    assert!(m.is_edge_removed("a->b"));
    assert_eq!(m.focus_node_id.as_deref(), Some("x"));
    assert_eq!(m.highlighted_node_id, None);
}

#[test]
fn test_contract_filters_shape() {
    let f: Filters = serde_json::from_value(json!({
        "languages": ["rust"],
        "statuses": ["circularDependency"],
        "thirdPartyOnly": false,
    }))
    .expect("decode");
    assert!(f.is_active());
    assert!(f.statuses.contains(&StatusFilter::CircularDependency));
}

#[test]
fn test_contract_layout_mode_names() {
    assert_eq!(
        serde_json::to_value(LayoutMode::ForceDirected).expect("encode"),
        json!("forceDirected")
    );
    assert_eq!(
        serde_json::from_value::<LayoutMode>(json!("circular")).expect("decode"),
        LayoutMode::Circular
    );
}

#[test]
fn test_contract_node_move_event() {
    let ev = Event::NodeMove(PayloadNodeMove {
        id: "a".into(),
        diff: [1.0, 0.0, -1.0],
        new_pos: [6.0, 0.0, 2.0],
    });
    assert_eq!(
        serde_json::to_value(&ev).expect("encode"),
        json!({"NodeMove": {"id": "a", "diff": [1.0, 0.0, -1.0], "new_pos": [6.0, 0.0, 2.0]}})
    );

    let cleared = Event::Focus(PayloadFocus { id: None });
    assert_eq!(
        serde_json::to_value(&cleared).expect("encode"),
        json!({"Focus": {"id": null}})
    );
}

#[test]
fn test_contract_settings_survive_json() {
    let mut s = Settings::default();
    s.layout.force.seed = Some(7);
    s.render.curve_segments = 4;
    let json = serde_json::to_string(&s).expect("encode");
    let back = Settings::from_json(&json).expect("decode");
    assert_eq!(back.layout.force.seed, Some(7));
    assert_eq!(back.render.curve_segments, 4);
    assert_eq!(back.style.palette, s.style.palette);
}
