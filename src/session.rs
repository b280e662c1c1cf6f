use log::{debug, info};

use crate::changes::Change;
use crate::events::{
    Event, EventSink, PayloadEdgeDeselect, PayloadEdgeSelect, PayloadFocus, PayloadLayoutChange,
    PayloadNodeDeselect, PayloadNodeHoverEnter, PayloadNodeHoverLeave, PayloadNodeSelect,
    PayloadUndo,
};
use crate::layouts::{self, LayoutMode};
use crate::payload::MetricsPayload;
use crate::settings::Settings;
use crate::{
    Cluster, Edge, Filters, Graph, ImpactAnalysis, Node, SpatialStore, VisualModifiers,
};

/// Graph session context: the current graph snapshot and all discrete UI state
/// around it.
///
/// Positions are not part of the discrete state: they live in the
/// [`SpatialStore`] owned here and are read and written directly by the render
/// loop, drags and layouts without going through any notification. Discrete
/// state changes are published to the optional [`EventSink`].
///
/// Every operation is total. Ids that do not resolve are ignored.
#[derive(Default)]
pub struct GraphSession {
    graph: Option<Graph>,
    spatial: SpatialStore,
    modifiers: VisualModifiers,

    selected_node: Option<String>,
    selected_edge: Option<String>,
    hovered_node: Option<String>,
    layout_mode: LayoutMode,

    filters: Filters,
    impact: Option<ImpactAnalysis>,
    clusters: Vec<Cluster>,

    settings: Settings,
    changes: Vec<Change>,
    revision: u64,

    events_sink: Option<Box<dyn EventSink>>,
}

impl std::fmt::Debug for GraphSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GraphSession")
            .field("graph", &self.graph.as_ref().map(Graph::identity))
            .field("tracked", &self.spatial.len())
            .field("selected_node", &self.selected_node)
            .field("selected_edge", &self.selected_edge)
            .field("hovered_node", &self.hovered_node)
            .field("layout_mode", &self.layout_mode)
            .field("revision", &self.revision)
            .finish_non_exhaustive()
    }
}

impl GraphSession {
    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
            ..Default::default()
        }
    }

    /// Publishes discrete state changes to `sink`. Works with closures
    /// `Fn(Event)`, `crossbeam::channel::Sender<Event>` (feature `events`) or
    /// custom implementations.
    pub fn with_event_sink(mut self, sink: impl EventSink + 'static) -> Self {
        self.events_sink = Some(Box::new(sink));
        self
    }

    pub fn set_event_sink(&mut self, sink: Option<Box<dyn EventSink>>) {
        self.events_sink = sink;
    }

    pub fn graph(&self) -> Option<&Graph> {
        self.graph.as_ref()
    }

    pub fn spatial(&self) -> &SpatialStore {
        &self.spatial
    }

    /// Direct write access to live positions. Writes here bypass every
    /// notification on purpose.
    pub fn spatial_mut(&mut self) -> &mut SpatialStore {
        &mut self.spatial
    }

    pub fn modifiers(&self) -> &VisualModifiers {
        &self.modifiers
    }

    pub fn selected_node(&self) -> Option<&str> {
        self.selected_node.as_deref()
    }

    pub fn selected_edge(&self) -> Option<&str> {
        self.selected_edge.as_deref()
    }

    pub fn hovered_node(&self) -> Option<&str> {
        self.hovered_node.as_deref()
    }

    pub fn layout_mode(&self) -> LayoutMode {
        self.layout_mode
    }

    pub fn filters(&self) -> &Filters {
        &self.filters
    }

    pub fn impact(&self) -> Option<&ImpactAnalysis> {
        self.impact.as_ref()
    }

    pub fn clusters(&self) -> &[Cluster] {
        &self.clusters
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut Settings {
        &mut self.settings
    }

    /// Bumped on every structural change (graph, metrics, what-if edits).
    /// Per-tick consumers compare it to know when cached handles are stale.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Number of edits [`Self::undo`] can revert.
    pub fn undo_depth(&self) -> usize {
        self.changes.len()
    }

    /// Replaces the graph snapshot.
    ///
    /// The store is reconciled only when the graph identity changed, so live
    /// positions survive content updates of the same graph. Selection, hover and
    /// layout mode persist, unless `graph` is `None`, which clears them.
    pub fn set_graph(&mut self, graph: Option<Graph>) {
        self.revision += 1;
        let Some(g) = graph else {
            info!("graph cleared");
            self.graph = None;
            self.spatial.clear();
            self.modifiers = VisualModifiers::default();
            self.selected_node = None;
            self.selected_edge = None;
            self.hovered_node = None;
            self.layout_mode = LayoutMode::default();
            self.impact = None;
            self.changes.clear();
            return;
        };

        info!(
            "ingesting graph: {} nodes, {} edges, {} dangling",
            g.node_count(),
            g.edge_count(),
            g.dangling_edges().len()
        );
        if self.spatial.initialize(&g) {
            self.changes.clear();
        }
        self.graph = Some(g);
    }

    /// Replaces the caller-supplied presentation overlays.
    pub fn set_modifiers(&mut self, modifiers: VisualModifiers) {
        self.modifiers = modifiers;
    }

    /// Merges per-node metrics and stores clusters and impact analysis.
    pub fn apply_metrics(&mut self, metrics: MetricsPayload) {
        self.revision += 1;
        if let Some(g) = self.graph.as_mut() {
            for (id, m) in metrics.node_metrics {
                match g.node_mut(&id) {
                    Some(n) => n.set_metrics(m),
                    None => debug!("metrics for unknown node {id}"),
                }
            }
        }
        self.clusters = metrics.clusters;
        self.impact = metrics.impact;
    }

    pub fn set_filters(&mut self, filters: Filters) {
        self.filters = filters;
    }

    pub fn set_impact(&mut self, impact: Option<ImpactAnalysis>) {
        self.impact = impact;
    }

    /// Selects a node, or clears node selection with `None`. Either way the edge
    /// selection and the impact overlay are cleared. Unknown ids are ignored.
    pub fn select_node(&mut self, id: Option<&str>) {
        if let Some(id) = id {
            if !self.has_node(id) {
                debug!("ignoring selection of unknown node {id}");
                return;
            }
        }

        self.deselect_edge();
        self.impact = None;

        if self.selected_node.as_deref() == id {
            return;
        }
        if let Some(old) = self.selected_node.take() {
            self.publish_event(Event::NodeDeselect(PayloadNodeDeselect { id: old }));
        }
        if let Some(id) = id {
            self.selected_node = Some(id.to_string());
            self.publish_event(Event::NodeSelect(PayloadNodeSelect { id: id.to_string() }));
        }
    }

    /// Selects an edge, clearing node selection. Unknown ids are ignored.
    pub fn select_edge(&mut self, id: Option<&str>) {
        let Some(id) = id else {
            self.deselect_edge();
            return;
        };
        if self.graph.as_ref().and_then(|g| g.edge(id)).is_none() {
            debug!("ignoring selection of unknown edge {id}");
            return;
        }

        self.select_node(None);
        self.selected_edge = Some(id.to_string());
        self.publish_event(Event::EdgeSelect(PayloadEdgeSelect { id: id.to_string() }));
    }

    /// Clears node and edge selection.
    pub fn clear_selection(&mut self) {
        self.select_node(None);
    }

    pub fn hover_node(&mut self, id: Option<&str>) {
        let known = id.is_none_or(|id| self.has_node(id));
        if !known || self.hovered_node.as_deref() == id {
            return;
        }
        if let Some(old) = self.hovered_node.take() {
            self.publish_event(Event::NodeHoverLeave(PayloadNodeHoverLeave { id: old }));
        }
        if let Some(id) = id {
            self.hovered_node = Some(id.to_string());
            self.publish_event(Event::NodeHoverEnter(PayloadNodeHoverEnter { id: id.to_string() }));
        }
    }

    pub fn set_highlight(&mut self, id: Option<&str>) {
        self.modifiers.highlighted_node_id = id.map(str::to_string);
    }

    /// Records the camera focus target. Resolution against live nodes happens
    /// when the focus controller picks it up.
    pub fn set_focus(&mut self, id: Option<&str>) {
        if self.modifiers.focus_node_id.as_deref() == id {
            return;
        }
        self.modifiers.focus_node_id = id.map(str::to_string);
        self.publish_event(Event::Focus(PayloadFocus {
            id: id.map(str::to_string),
        }));
    }

    /// Switches the layout mode. Positions are recomputed and committed into the
    /// store only when the mode actually changes; returns whether it did.
    pub fn set_layout(&mut self, mode: LayoutMode) -> bool {
        if self.layout_mode == mode {
            return false;
        }
        let old = self.layout_mode;
        self.layout_mode = mode;

        let written = match self.graph.as_ref() {
            Some(g) => layouts::apply(mode, g, &mut self.spatial, &self.settings.layout),
            None => 0,
        };
        info!("layout {old:?} -> {mode:?}, {written} positions committed");

        self.publish_event(Event::LayoutChange(PayloadLayoutChange { old, new: mode }));
        true
    }

    /// What-if edit: adds `node` and `edges`, marking them as added.
    ///
    /// Returns `false` without changing anything when there is no graph or the
    /// node id is taken. Edges whose id is already taken are skipped.
    pub fn add_node(&mut self, node: Node, edges: Vec<Edge>) -> bool {
        let Some(g) = self.graph.as_mut() else {
            return false;
        };
        if g.contains_node(node.id()) {
            return false;
        }

        let node_id = node.id().to_string();
        let position = node.position();
        g.add_node(node);
        self.spatial.insert(&node_id, position);
        let marked_node = self.modifiers.added_node_ids.insert(node_id.clone());

        let mut edge_ids = Vec::with_capacity(edges.len());
        let mut marked_edges = Vec::new();
        for e in edges {
            if g.contains_edge(e.id()) {
                debug!("what-if edge {} already exists", e.id());
                continue;
            }
            let id = e.id().to_string();
            g.add_edge(e);
            if self.modifiers.added_edge_ids.insert(id.clone()) {
                marked_edges.push(id.clone());
            }
            edge_ids.push(id);
        }
        self.spatial.sync_identity(g.identity());

        self.revision += 1;
        self.changes.push(Change::AddedNode {
            node_id,
            edge_ids,
            marked_node,
            marked_edges,
        });
        true
    }

    /// What-if edit: marks a node and its incident edges as removed. The graph
    /// itself keeps them.
    pub fn mark_removed(&mut self, id: &str) -> bool {
        let Some(g) = self.graph.as_ref() else {
            return false;
        };
        if !g.contains_node(id) {
            return false;
        }

        let marked_node = self.modifiers.removed_node_ids.insert(id.to_string());
        let marked_edges = g
            .incident_edge_ids(id)
            .into_iter()
            .filter(|e| self.modifiers.removed_edge_ids.insert(e.clone()))
            .collect();

        self.revision += 1;
        self.changes.push(Change::MarkedRemoved {
            node_id: id.to_string(),
            marked_node,
            marked_edges,
        });
        true
    }

    /// Reverts the latest what-if edit exactly. Returns `false` if there is none.
    pub fn undo(&mut self) -> bool {
        let Some(change) = self.changes.pop() else {
            return false;
        };
        let node_id = change.node_id().to_string();

        match change {
            Change::AddedNode {
                node_id,
                edge_ids,
                marked_node,
                marked_edges,
            } => {
                if let Some(g) = self.graph.as_mut() {
                    for id in &edge_ids {
                        g.remove_edge(id);
                    }
                    // Edges that only resolved because the node existed go back to dangling.
                    if let Some((_, orphaned)) = g.remove_node(&node_id) {
                        for e in orphaned {
                            g.add_edge(e);
                        }
                    }
                    self.spatial.remove(&node_id);
                    self.spatial.sync_identity(g.identity());
                } else {
                    self.spatial.remove(&node_id);
                }
                if marked_node {
                    self.modifiers.added_node_ids.remove(&node_id);
                }
                for id in &marked_edges {
                    self.modifiers.added_edge_ids.remove(id);
                }
                self.drop_references(&node_id, &edge_ids);
            }
            Change::MarkedRemoved {
                node_id,
                marked_node,
                marked_edges,
            } => {
                if marked_node {
                    self.modifiers.removed_node_ids.remove(&node_id);
                }
                for id in &marked_edges {
                    self.modifiers.removed_edge_ids.remove(id);
                }
            }
        }

        self.revision += 1;
        info!("undo edit on {node_id}");
        self.publish_event(Event::Undo(PayloadUndo { node_id }));
        true
    }

    pub(crate) fn publish_event(&self, event: Event) {
        if let Some(sink) = self.events_sink.as_deref() {
            sink.send(event);
        }
    }

    fn has_node(&self, id: &str) -> bool {
        self.graph.as_ref().is_some_and(|g| g.contains_node(id))
    }

    fn deselect_edge(&mut self) {
        if let Some(old) = self.selected_edge.take() {
            self.publish_event(Event::EdgeDeselect(PayloadEdgeDeselect { id: old }));
        }
    }

    /// Clears discrete state pointing at entities that no longer exist.
    fn drop_references(&mut self, node_id: &str, edge_ids: &[String]) {
        if self.selected_node.as_deref() == Some(node_id) {
            self.select_node(None);
        }
        if self.hovered_node.as_deref() == Some(node_id) {
            self.hover_node(None);
        }
        if self
            .selected_edge
            .as_ref()
            .is_some_and(|e| edge_ids.contains(e))
        {
            self.deselect_edge();
        }
        if self.modifiers.highlighted_node_id.as_deref() == Some(node_id) {
            self.modifiers.highlighted_node_id = None;
        }
        if self.modifiers.focus_node_id.as_deref() == Some(node_id) {
            self.modifiers.focus_node_id = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use glam::Vec3;

    use super::*;

    fn session() -> GraphSession {
        let g = Graph::from_parts(
            vec![
                Node::new("a", Vec3::ZERO),
                Node::new("b", Vec3::X * 10.),
                Node::new("c", Vec3::Z * 10.),
            ],
            vec![Edge::between("a", "b"), Edge::between("b", "c")],
        );
        let mut s = GraphSession::default();
        s.set_graph(Some(g));
        s
    }

    fn recording() -> (GraphSession, Rc<RefCell<Vec<Event>>>) {
        let log = Rc::new(RefCell::new(Vec::new()));
        let sink_log = Rc::clone(&log);
        let s = session().with_event_sink(move |e: Event| sink_log.borrow_mut().push(e));
        (s, log)
    }

    #[test]
    fn selecting_node_clears_edge_and_impact() {
        let (mut s, log) = recording();
        s.select_edge(Some("a->b"));
        s.set_impact(Some(ImpactAnalysis::default()));
        s.select_node(Some("a"));

        assert_eq!(s.selected_node(), Some("a"));
        assert_eq!(s.selected_edge(), None);
        assert!(s.impact().is_none());
        assert_eq!(
            log.borrow().last(),
            Some(&Event::NodeSelect(PayloadNodeSelect { id: "a".into() }))
        );
    }

    #[test]
    fn selecting_edge_clears_node() {
        let mut s = session();
        s.select_node(Some("a"));
        s.select_edge(Some("b->c"));
        assert_eq!(s.selected_node(), None);
        assert_eq!(s.selected_edge(), Some("b->c"));
    }

    #[test]
    fn unknown_ids_are_ignored() {
        let mut s = session();
        s.select_node(Some("a"));
        s.select_node(Some("ghost"));
        s.hover_node(Some("ghost"));
        s.select_edge(Some("ghost"));
        assert_eq!(s.selected_node(), Some("a"));
        assert_eq!(s.hovered_node(), None);
    }

    #[test]
    fn hover_publishes_enter_and_leave() {
        let (mut s, log) = recording();
        s.hover_node(Some("a"));
        s.hover_node(Some("b"));
        s.hover_node(None);
        assert_eq!(log.borrow().len(), 4);
        assert_eq!(s.hovered_node(), None);
    }

    #[test]
    fn layout_recomputes_only_on_change() {
        let (mut s, log) = recording();
        assert!(s.set_layout(LayoutMode::Circular));
        assert!(!s.set_layout(LayoutMode::Circular));
        assert_eq!(s.spatial().get("a"), Some(Vec3::new(30., 0., 0.)));
        assert_eq!(log.borrow().len(), 1);

        assert!(s.set_layout(LayoutMode::Hierarchical));
        assert_eq!(s.spatial().get("b"), Some(Vec3::X * 10.));
    }

    #[test]
    fn null_graph_clears_discrete_state() {
        let mut s = session();
        s.select_node(Some("a"));
        s.hover_node(Some("b"));
        s.set_layout(LayoutMode::Circular);
        s.set_graph(None);
        assert!(s.graph().is_none());
        assert!(s.spatial().is_empty());
        assert_eq!(s.selected_node(), None);
        assert_eq!(s.hovered_node(), None);
        assert_eq!(s.layout_mode(), LayoutMode::Hierarchical);
    }

    #[test]
    fn content_update_keeps_selection_and_positions() {
        let mut s = session();
        s.select_node(Some("b"));
        s.spatial_mut().set("b", 1., 1., 1.);
        let same = s.graph().cloned();
        s.set_graph(same);
        assert_eq!(s.selected_node(), Some("b"));
        assert_eq!(s.spatial().get("b"), Some(Vec3::ONE));
    }

    #[test]
    fn mark_removed_keeps_graph_and_undoes() {
        let mut s = session();
        let before = s.modifiers().clone();
        assert!(s.mark_removed("b"));
        assert!(s.modifiers().is_node_removed("b"));
        assert!(s.modifiers().is_edge_removed("a->b"));
        assert!(s.modifiers().is_edge_removed("b->c"));
        assert!(s.graph().is_some_and(|g| g.contains_node("b")));

        assert!(s.undo());
        assert_eq!(s.modifiers(), &before);
        assert!(!s.undo());
    }

    #[test]
    fn undo_of_added_node_forgets_selection() {
        let mut s = session();
        assert!(s.add_node(Node::new("d", Vec3::ONE), vec![Edge::between("d", "a")]));
        s.select_node(Some("d"));
        assert!(s.undo());
        assert_eq!(s.selected_node(), None);
        assert!(!s.spatial().contains("d"));
    }

    #[test]
    fn add_node_rejects_taken_id() {
        let mut s = session();
        assert!(!s.add_node(Node::new("a", Vec3::ONE), vec![]));
        assert_eq!(s.undo_depth(), 0);
    }

    #[test]
    fn refresh_after_what_if_edit_prunes_added_node() {
        let mut s = session();
        let base = s.graph().cloned().expect("graph");
        assert!(s.add_node(Node::new("d", Vec3::ONE), vec![Edge::between("d", "a")]));

        s.set_graph(Some(base));
        assert!(s.graph().is_some_and(|g| !g.contains_node("d")));
        assert!(!s.spatial().contains("d"));
        assert_eq!(s.spatial().len(), 3);
    }

    #[test]
    fn refresh_with_current_graph_keeps_undo_log() {
        let mut s = session();
        assert!(s.mark_removed("b"));
        assert!(s.add_node(Node::new("d", Vec3::ONE), vec![]));

        let current = s.graph().cloned();
        s.set_graph(current);
        assert_eq!(s.undo_depth(), 2);
        assert!(s.undo());
        assert!(!s.spatial().contains("d"));

        let current = s.graph().cloned();
        s.set_graph(current);
        assert_eq!(s.undo_depth(), 1);
    }
}
