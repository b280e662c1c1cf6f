use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::Node;

/// Status flags a node may be required to carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StatusFilter {
    HotZone,
    CircularDependency,
    HighCoupling,
}

/// Active filter predicates. Empty sets mean "everything passes".
///
/// Nodes failing the filters are still rendered (shrunk and faded), so layout
/// and selection stay stable while filters change.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Filters {
    pub languages: HashSet<String>,
    pub services: HashSet<String>,
    /// A node passes if it carries any of these statuses
    pub statuses: HashSet<StatusFilter>,
    pub third_party_only: bool,
}

impl Filters {
    pub fn is_active(&self) -> bool {
        !self.languages.is_empty()
            || !self.services.is_empty()
            || !self.statuses.is_empty()
            || self.third_party_only
    }

    pub fn passes(&self, n: &Node) -> bool {
        if self.third_party_only && !n.is_third_party() {
            return false;
        }
        if !self.languages.is_empty() && !n.language().is_some_and(|l| self.languages.contains(l)) {
            return false;
        }
        if !self.services.is_empty() && !n.service().is_some_and(|s| self.services.contains(s)) {
            return false;
        }
        if !self.statuses.is_empty() {
            let m = n.metrics();
            let any = self.statuses.iter().any(|s| match s {
                StatusFilter::HotZone => m.hot_zone,
                StatusFilter::CircularDependency => m.circular_dependency,
                StatusFilter::HighCoupling => m.high_coupling,
            });
            if !any {
                return false;
            }
        }
        true
    }
}

/// Result of an external impact analysis: nodes reachable from `source` with
/// their hop distance. Only used for styling.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ImpactAnalysis {
    pub source: String,
    pub affected: HashMap<String, u32>,
}

impl ImpactAnalysis {
    /// Hop distance of `id`; `Some(0)` for the source itself.
    pub fn hops(&self, id: &str) -> Option<u32> {
        if id == self.source {
            return Some(0);
        }
        self.affected.get(id).copied()
    }
}
