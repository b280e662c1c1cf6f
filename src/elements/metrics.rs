use serde::{Deserialize, Serialize};

/// Per-node metrics supplied by the external analysis service.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NodeMetrics {
    /// Number of nodes depending on this one.
    pub afferent_coupling: u32,
    /// Number of nodes this one depends on.
    pub efferent_coupling: u32,
    pub cyclomatic_complexity: u32,
    pub hot_zone: bool,
    /// Hot zone severity in `0.0..=1.0`, meaningful only when `hot_zone` is set.
    pub hot_zone_severity: f32,
    pub circular_dependency: bool,
    pub high_coupling: bool,
}

impl NodeMetrics {
    pub fn coupling(&self) -> u32 {
        self.afferent_coupling + self.efferent_coupling
    }
}
