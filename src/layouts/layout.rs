use std::collections::HashMap;
use std::fmt::Debug;

use glam::Vec3;
use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::settings::SettingsLayout;
use crate::{Graph, SpatialStore};

/// Full replacement mapping of node id to position produced by a layout.
pub type Positions = HashMap<String, Vec3>;

/// Which layout drives node positions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LayoutMode {
    /// Positions as ingested.
    #[default]
    Hierarchical,
    Circular,
    ForceDirected,
}

/// Serializable parameters of a layout.
pub trait LayoutState: Serialize + DeserializeOwned + Default + Debug + Clone {}

pub trait Layout<S>: Default
where
    S: LayoutState,
{
    /// Creates a new layout from the given state.
    fn from_state(state: S) -> Self;

    /// Computes positions for every node of `g`. Runs to completion synchronously.
    /// Must return finite coordinates only.
    fn compute(&mut self, g: &Graph, store: &SpatialStore) -> Positions;

    /// Returns the current state of the layout.
    fn state(&self) -> S;
}

/// Radius used by circular layout and by the force layout's final rescale.
pub fn target_radius(node_count: usize, min_radius: f32, radius_per_node: f32) -> f32 {
    min_radius.max(node_count as f32 * radius_per_node)
}

/// Writes `positions` into the store in place. Unknown ids and non-finite values
/// are skipped. Returns the number of positions written.
pub fn commit(positions: &Positions, store: &mut SpatialStore) -> usize {
    positions
        .iter()
        .filter(|(id, pos)| store.set_vec(id, **pos))
        .count()
}

/// Computes the layout for `mode` and commits it into `store`.
pub fn apply(mode: LayoutMode, g: &Graph, store: &mut SpatialStore, settings: &SettingsLayout) -> usize {
    if g.is_empty() {
        return 0;
    }

    let positions = match mode {
        LayoutMode::Hierarchical => {
            super::Hierarchical::from_state(super::HierarchicalState::default()).compute(g, store)
        }
        LayoutMode::Circular => super::Circular::from_state(settings.circular.clone()).compute(g, store),
        LayoutMode::ForceDirected => {
            super::ForceDirected::from_state(settings.force.clone()).compute(g, store)
        }
    };

    commit(&positions, store)
}
