use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::NodeMetrics;

/// Whether a code unit belongs to the analysed project or is pulled in from outside.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NodeKind {
    #[default]
    Internal,
    ThirdParty,
}

/// A code unit of the dependency graph.
///
/// `position` is the ingested position. The live position of a node is owned by
/// [`crate::SpatialStore`] and is never written back here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    id: String,
    position: Vec3,
    kind: NodeKind,
    language: Option<String>,
    service: Option<String>,
    role: Option<String>,
    metrics: NodeMetrics,
    cluster_id: Option<u32>,
}

impl Node {
    pub fn new(id: impl Into<String>, position: Vec3) -> Self {
        Self {
            id: id.into(),
            position,
            kind: NodeKind::default(),
            language: None,
            service: None,
            role: None,
            metrics: NodeMetrics::default(),
            cluster_id: None,
        }
    }

    pub fn with_kind(mut self, kind: NodeKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    pub fn with_service(mut self, service: impl Into<String>) -> Self {
        self.service = Some(service.into());
        self
    }

    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.role = Some(role.into());
        self
    }

    pub fn with_metrics(mut self, metrics: NodeMetrics) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn with_cluster(mut self, cluster_id: u32) -> Self {
        self.cluster_id = Some(cluster_id);
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Position the node had when it was ingested.
    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    pub fn is_third_party(&self) -> bool {
        self.kind == NodeKind::ThirdParty
    }

    pub fn language(&self) -> Option<&str> {
        self.language.as_deref()
    }

    pub fn service(&self) -> Option<&str> {
        self.service.as_deref()
    }

    pub fn role(&self) -> Option<&str> {
        self.role.as_deref()
    }

    pub fn metrics(&self) -> &NodeMetrics {
        &self.metrics
    }

    pub fn set_metrics(&mut self, metrics: NodeMetrics) {
        self.metrics = metrics;
    }

    pub fn cluster_id(&self) -> Option<u32> {
        self.cluster_id
    }
}
