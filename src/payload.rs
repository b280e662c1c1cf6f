//! Shapes of the payloads delivered by the external analysis service.

use std::collections::HashMap;

use egui::Color32;
use glam::Vec3;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::{Cluster, Edge, Error, Graph, ImpactAnalysis, Node, NodeKind, NodeMetrics};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GraphPayload {
    pub nodes: Vec<NodePayload>,
    pub edges: Vec<EdgePayload>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodePayload {
    pub id: String,
    #[serde(default)]
    pub position: [f32; 3],
    #[serde(default)]
    pub kind: NodeKind,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub service: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub metrics: NodeMetrics,
    #[serde(default)]
    pub cluster_id: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EdgePayload {
    pub id: String,
    pub source: String,
    pub target: String,
    #[serde(default = "one")]
    pub weight: f32,
    #[serde(default = "one")]
    pub thickness: f32,
    /// `#rrggbb` override, e.g. for circular dependency edges
    #[serde(default)]
    pub color: Option<String>,
}

fn one() -> f32 {
    1.
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MetricsPayload {
    pub clusters: Vec<Cluster>,
    /// Replaces the metrics record of the listed nodes
    pub node_metrics: HashMap<String, NodeMetrics>,
    pub impact: Option<ImpactAnalysis>,
}

impl GraphPayload {
    /// Decodes a graph payload.
    ///
    /// # Errors
    /// Returns [`Error::Decode`] when `s` is not valid JSON of this shape.
    pub fn from_json(s: &str) -> Result<Self, Error> {
        Ok(serde_json::from_str(s)?)
    }

    /// Converts into a [`Graph`]. Never fails: duplicates keep their first
    /// occurrence, dangling edges are kept aside, bad colors are dropped.
    pub fn into_graph(self) -> Graph {
        let nodes = self.nodes.into_iter().map(NodePayload::into_node);
        let edges = self.edges.into_iter().map(EdgePayload::into_edge);
        Graph::from_parts(nodes, edges)
    }
}

impl MetricsPayload {
    /// Decodes a metrics payload.
    ///
    /// # Errors
    /// Returns [`Error::Decode`] when `s` is not valid JSON of this shape.
    pub fn from_json(s: &str) -> Result<Self, Error> {
        Ok(serde_json::from_str(s)?)
    }
}

impl NodePayload {
    pub fn into_node(self) -> Node {
        let [x, y, z] = self.position;
        let position = Vec3::new(x, y, z);
        let mut n = Node::new(self.id, if position.is_finite() { position } else { Vec3::ZERO })
            .with_kind(self.kind)
            .with_metrics(self.metrics);
        if let Some(l) = self.language {
            n = n.with_language(l);
        }
        if let Some(s) = self.service {
            n = n.with_service(s);
        }
        if let Some(r) = self.role {
            n = n.with_role(r);
        }
        if let Some(c) = self.cluster_id {
            n = n.with_cluster(c);
        }
        n
    }
}

impl EdgePayload {
    pub fn into_edge(self) -> Edge {
        let mut e = Edge::new(self.id, self.source, self.target)
            .with_weight(self.weight)
            .with_thickness(self.thickness);
        if let Some(hex) = self.color {
            match Color32::from_hex(&hex) {
                Ok(c) => e = e.with_color(c),
                Err(err) => debug!("ignoring edge color {hex:?} of {}: {err:?}", e.id()),
            }
        }
        e
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_camel_case_graph() {
        let json = r##"{
            "nodes": [
                {"id": "app", "position": [1, 2, 3], "language": "rust", "clusterId": 2,
                 "metrics": {"cyclomaticComplexity": 12, "hotZone": true}},
                {"id": "serde", "kind": "thirdParty"}
            ],
            "edges": [
                {"id": "e1", "source": "app", "target": "serde", "color": "#ff0000"},
                {"id": "e2", "source": "app", "target": "missing"}
            ]
        }"##;
        let g = GraphPayload::from_json(json).expect("valid payload").into_graph();
        assert_eq!(g.node_count(), 2);
        assert_eq!(g.edge_count(), 1);
        assert_eq!(g.dangling_edges().len(), 1);

        let app = g.node("app").expect("app");
        assert_eq!(app.position(), Vec3::new(1., 2., 3.));
        assert_eq!(app.cluster_id(), Some(2));
        assert_eq!(app.metrics().cyclomatic_complexity, 12);
        assert!(g.node("serde").is_some_and(Node::is_third_party));
        assert_eq!(g.edge("e1").and_then(Edge::color), Some(Color32::from_rgb(255, 0, 0)));
    }

    #[test]
    fn bad_edge_color_is_dropped() {
        let e = EdgePayload {
            id: "e".into(),
            source: "a".into(),
            target: "b".into(),
            weight: 1.,
            thickness: 1.,
            color: Some("not a color".into()),
        }
        .into_edge();
        assert_eq!(e.color(), None);
    }

    #[test]
    fn decodes_metrics() {
        let json = r#"{
            "clusters": [{"id": 1, "name": "core"}],
            "nodeMetrics": {"app": {"highCoupling": true}},
            "impact": {"source": "app", "affected": {"lib": 1}}
        }"#;
        let m = MetricsPayload::from_json(json).expect("valid metrics");
        assert_eq!(m.clusters, vec![Cluster::new(1, "core")]);
        assert!(m.node_metrics["app"].high_coupling);
        assert_eq!(m.impact.and_then(|i| i.hops("lib")), Some(1));
    }

    #[test]
    fn malformed_payload_is_an_error() {
        assert!(matches!(GraphPayload::from_json("[1,2"), Err(Error::Decode(_))));
    }
}
