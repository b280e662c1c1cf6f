use serde::{Deserialize, Serialize};

use crate::layouts::{Layout, LayoutState, Positions};
use crate::{Graph, SpatialStore};

/// Hierarchical layout has nothing to tune: it restores ingested positions.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HierarchicalState {}

impl LayoutState for HierarchicalState {}

/// Resets every node to the position it had when it was ingested.
///
/// The ingest service already lays nodes out by architectural layer, so
/// "hierarchical" is the identity over the store's original positions.
#[derive(Debug, Clone, Default)]
pub struct Hierarchical {
    state: HierarchicalState,
}

impl Layout<HierarchicalState> for Hierarchical {
    fn from_state(state: HierarchicalState) -> Self {
        Self { state }
    }

    fn compute(&mut self, g: &Graph, store: &SpatialStore) -> Positions {
        g.nodes_iter()
            .map(|(_, n)| {
                let pos = store.original(n.id()).unwrap_or_else(|| n.position());
                (n.id().to_string(), pos)
            })
            .collect()
    }

    fn state(&self) -> HierarchicalState {
        self.state.clone()
    }
}
