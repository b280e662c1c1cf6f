use depgraph3d::layouts::{
    apply, Circular, CircularState, ForceDirected, ForceDirectedState, Layout, LayoutMode,
    Positions,
};
use depgraph3d::render::{NodeStatus, RenderBatches};
use depgraph3d::{
    Camera, Edge, Graph, GraphSession, Interaction, Node, NodeMetrics, PointerTarget, Ray,
    SettingsLayout, SpatialStore,
};
use glam::Vec3;
use proptest::prelude::*;

fn chain(n: usize) -> Graph {
    Graph::from_parts(
        (0..n).map(|i| Node::new(format!("n{i}"), Vec3::new(i as f32 * 5.0, 0.0, 0.0))),
        (1..n).map(|i| Edge::between(&format!("n{}", i - 1), &format!("n{i}"))),
    )
}

fn store_for(g: &Graph) -> SpatialStore {
    let mut s = SpatialStore::new();
    s.initialize(g);
    s
}

fn session_with(g: Graph) -> GraphSession {
    let mut s = GraphSession::default();
    s.set_graph(Some(g));
    s
}

#[test]
fn circular_layout_is_an_even_ring() {
    for n in [1_usize, 2, 7, 40] {
        let g = chain(n);
        let pos = Circular::from_state(CircularState::default()).compute(&g, &store_for(&g));
        let radius = 30_f32.max(n as f32 * 2.0);

        let ring: Vec<Vec3> = g.nodes_iter().map(|(_, node)| pos[node.id()]).collect();
        for p in &ring {
            assert!((p.length() - radius).abs() < 1e-3, "n={n} {p:?}");
            assert_eq!(p.y, 0.0);
        }
        if n == 1 {
            assert!(ring[0].distance(Vec3::new(radius, 0.0, 0.0)) < 1e-4);
        } else {
            let chord = 2.0 * radius * (std::f32::consts::PI / n as f32).sin();
            for i in 0..n {
                let d = ring[i].distance(ring[(i + 1) % n]);
                assert!((d - chord).abs() < 1e-2, "n={n} i={i} d={d} chord={chord}");
            }
        }
    }
}

fn distance_stats(g: &Graph, pos: &Positions) -> (f32, f32) {
    let ids: Vec<&str> = g.nodes_iter().map(|(_, n)| n.id()).collect();
    let (mut edge_sum, mut edge_n, mut other_sum, mut other_n) = (0.0, 0, 0.0, 0);
    for (i, a) in ids.iter().enumerate() {
        for b in &ids[i + 1..] {
            let d = pos[*a].distance(pos[*b]);
            let linked = g.edge(&format!("{a}->{b}")).is_some() || g.edge(&format!("{b}->{a}")).is_some();
            if linked {
                edge_sum += d;
                edge_n += 1;
            } else {
                other_sum += d;
                other_n += 1;
            }
        }
    }
    (edge_sum / edge_n as f32, other_sum / other_n as f32)
}

#[test]
fn force_layout_shape_is_seed_independent() {
    let g = chain(10);
    let store = store_for(&g);

    let mut stats = Vec::new();
    for seed in [1, 99] {
        let pos = ForceDirected::from_state(ForceDirectedState::default())
            .with_seed(seed)
            .compute(&g, &store);
        let max = pos.values().map(|p| p.length()).fold(0.0, f32::max);
        assert!((max - 30.0).abs() < 1e-3);
        stats.push(distance_stats(&g, &pos));
    }

    for (linked, other) in &stats {
        assert!(linked < other, "linked {linked} vs other {other}");
    }
    let (a, b) = (stats[0].1, stats[1].1);
    assert!(a.max(b) / a.min(b) < 2.0);
}

#[derive(Debug, Clone)]
struct RawGraph {
    nodes: Vec<(i8, i8, i8)>,
    edges: Vec<(usize, usize)>,
}

fn raw_graph() -> impl Strategy<Value = RawGraph> {
    prop::collection::vec((-2_i8..=2, -2_i8..=2, -2_i8..=2), 0..12).prop_flat_map(|nodes| {
        let n = nodes.len().max(1);
        prop::collection::vec((0..n, 0..n + 1), 0..20).prop_map(move |edges| RawGraph {
            nodes: nodes.clone(),
            edges,
        })
    })
}

impl RawGraph {
    /// Edge endpoints past the node list become dangling references.
    fn build(&self) -> Graph {
        Graph::from_parts(
            self.nodes.iter().enumerate().map(|(i, (x, y, z))| {
                Node::new(format!("n{i}"), Vec3::new(f32::from(*x), f32::from(*y), f32::from(*z)))
            }),
            self.edges
                .iter()
                .enumerate()
                .map(|(i, (s, t))| Edge::new(format!("e{i}"), format!("n{s}"), format!("n{t}"))),
        )
    }
}

proptest! {
    #[test]
    fn layouts_never_produce_non_finite_positions(raw in raw_graph(), seed in any::<u64>()) {
        let g = raw.build();
        let mut settings = SettingsLayout::default();
        settings.force.seed = Some(seed);

        for mode in [LayoutMode::ForceDirected, LayoutMode::Circular, LayoutMode::Hierarchical] {
            let mut store = store_for(&g);
            apply(mode, &g, &mut store, &settings);
            for id in store.ids() {
                let p = store.get(id);
                prop_assert!(p.is_some_and(Vec3::is_finite), "{mode:?} {id} {p:?}");
            }
        }
    }
}

#[test]
fn coincident_nodes_and_self_loop_stay_finite() {
    let g = Graph::from_parts(
        vec![Node::new("a", Vec3::ONE), Node::new("b", Vec3::ONE)],
        vec![Edge::between("a", "a"), Edge::between("a", "b")],
    );
    let mut settings = SettingsLayout::default();
    settings.force.jitter = 0.0;
    let mut store = store_for(&g);
    apply(LayoutMode::ForceDirected, &g, &mut store, &settings);
    assert!(store.get("a").is_some_and(Vec3::is_finite));
    assert!(store.get("b").is_some_and(Vec3::is_finite));
}

#[test]
fn hierarchical_reset_is_idempotent() {
    let mut s = session_with(chain(6));
    s.set_layout(LayoutMode::ForceDirected);
    s.set_layout(LayoutMode::Hierarchical);
    let once: Vec<_> = s.spatial().ids().map(|id| (id.to_string(), s.spatial().get(id))).collect();

    let g = s.graph().cloned().expect("graph");
    let settings = s.settings().layout.clone();
    apply(LayoutMode::Hierarchical, &g, s.spatial_mut(), &settings);
    for (id, pos) in once {
        assert_eq!(s.spatial().get(&id), pos);
    }
    assert_eq!(s.spatial().get("n3"), Some(Vec3::new(15.0, 0.0, 0.0)));
}

#[test]
fn drag_commit_moves_node_and_edge_start() {
    let mut s = session_with(Graph::from_parts(
        vec![Node::new("a", Vec3::ZERO), Node::new("b", Vec3::new(20.0, 0.0, 0.0))],
        vec![Edge::between("a", "b")],
    ));
    let mut camera = Camera::default();
    let mut interaction = Interaction::new();
    let mut batches = RenderBatches::new(&s);
    let down = |x: f32, z: f32| Ray::new(Vec3::new(x, 10.0, z), Vec3::NEG_Y);
    let a = PointerTarget::Node("a".into());

    interaction.pointer_down(&mut s, &mut camera, &a, down(0.0, 0.0));
    interaction.pointer_up(&mut s, &mut camera, down(0.0, 0.0));
    interaction.pointer_down(&mut s, &mut camera, &a, down(0.0, 0.0));
    interaction.pointer_move(&mut s, &mut camera, down(2.0, 2.0));
    interaction.pointer_up(&mut s, &mut camera, down(5.0, 3.0));

    assert_eq!(s.spatial().get("a"), Some(Vec3::new(5.0, 0.0, 3.0)));

    batches.rebuild(&s);
    let curve = &batches.edges.curves()[0];
    assert_eq!(batches.edges.curve_points(curve)[0], Vec3::new(5.0, 0.0, 3.0));
    assert_eq!(batches.edges.curve_points(curve).last(), Some(&Vec3::new(20.0, 0.0, 0.0)));
}

#[test]
fn dangling_edges_are_not_rendered_or_laid_out() {
    let mut s = session_with(Graph::from_parts(
        vec![Node::new("a", Vec3::ZERO), Node::new("b", Vec3::X)],
        vec![Edge::between("a", "b"), Edge::between("a", "ghost")],
    ));
    assert!(s.set_layout(LayoutMode::ForceDirected));
    assert!(s.spatial().get("a").is_some_and(Vec3::is_finite));
    assert!(!s.spatial().contains("ghost"));

    let mut batches = RenderBatches::new(&s);
    batches.rebuild(&s);
    assert_eq!(batches.edges.len(), 1);
    assert_eq!(batches.nodes.len(), 2);
}

type Snapshot = (Vec<(String, Vec3)>, Vec<String>, Vec<String>, Vec<(String, Option<Vec3>)>);

fn snapshot(s: &GraphSession) -> Snapshot {
    let g = s.graph().expect("graph");
    let mut nodes: Vec<_> = g.nodes_iter().map(|(_, n)| (n.id().to_string(), n.position())).collect();
    nodes.sort_by(|a, b| a.0.cmp(&b.0));
    let mut edges: Vec<_> = g.edges_iter().map(|(_, e, _, _)| e.id().to_string()).collect();
    edges.sort();
    let mut dangling: Vec<_> = g.dangling_edges().iter().map(|e| e.id().to_string()).collect();
    dangling.sort();
    let mut positions: Vec<_> = s
        .spatial()
        .ids()
        .map(|id| (id.to_string(), s.spatial().get(id)))
        .collect();
    positions.sort_by(|a, b| a.0.cmp(&b.0));
    (nodes, edges, dangling, positions)
}

#[test]
fn undo_restores_pre_addition_state() {
    let mut s = session_with(Graph::from_parts(
        vec![Node::new("a", Vec3::ZERO), Node::new("b", Vec3::X), Node::new("c", Vec3::Z)],
        vec![Edge::between("a", "b"), Edge::between("c", "d")],
    ));
    s.mark_removed("c");
    let before = snapshot(&s);
    let modifiers = s.modifiers().clone();

    assert!(s.add_node(
        Node::new("d", Vec3::ONE),
        vec![Edge::between("d", "a"), Edge::between("d", "b")],
    ));
    assert!(s.modifiers().is_node_added("d"));
    assert!(s.modifiers().is_edge_added("d->a"));
    assert_eq!(s.graph().map(Graph::edge_count), Some(4));
    assert!(s.spatial().contains("d"));

    assert!(s.undo());
    assert_eq!(snapshot(&s), before);
    assert_eq!(s.modifiers(), &modifiers);
}

#[test]
fn removed_status_beats_hot_zone() {
    let mut s = session_with(Graph::from_parts(
        vec![Node::new("a", Vec3::ZERO).with_metrics(NodeMetrics {
            hot_zone: true,
            ..Default::default()
        })],
        vec![],
    ));
    s.mark_removed("a");

    let mut batches = RenderBatches::new(&s);
    batches.rebuild(&s);
    let inst = batches.nodes.instances()[0];
    assert_eq!(inst.status, NodeStatus::Removed);
    assert_eq!(inst.fill, s.settings().style.removed_color);
    assert_ne!(inst.fill, s.settings().style.hot_zone_color);
}

#[test]
fn node_batch_drops_overflow() {
    let mut s = session_with(chain(5));
    s.settings_mut().render.node_capacity = 3;
    let mut batches = RenderBatches::new(&s);
    batches.rebuild(&s);
    assert_eq!(batches.nodes.len(), 3);
    assert_eq!(batches.nodes.dropped(), 2);
}

#[test]
fn edge_batch_drops_overflow() {
    let mut s = session_with(chain(6));
    s.settings_mut().render.edge_capacity = 2;
    let mut batches = RenderBatches::new(&s);
    batches.rebuild(&s);
    assert_eq!(batches.edges.len(), 2);
    assert_eq!(batches.edges.dropped(), 3);
    assert!(batches.edges.arrows().len() <= 2);
    for curve in batches.edges.curves() {
        assert!(!batches.edges.curve_points(curve).is_empty());
    }
}

#[test]
fn empty_graph_short_circuits() {
    let mut s = session_with(Graph::new());
    assert!(s.set_layout(LayoutMode::ForceDirected));
    let mut batches = RenderBatches::new(&s);
    batches.rebuild(&s);
    assert!(batches.nodes.is_empty());
    assert!(batches.edges.is_empty());
    assert_eq!(batches.overlays.selection, None);
}
