use std::f32::consts::TAU;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::layouts::{target_radius, Layout, LayoutState, Positions};
use crate::{Graph, SpatialStore};

/// Configuration for the radius of the circular layout.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CircularState {
    /// Radius used when there are few nodes
    pub min_radius: f32,
    /// Radius per node once `node_count * radius_per_node` exceeds `min_radius`
    pub radius_per_node: f32,
}

impl Default for CircularState {
    fn default() -> Self {
        Self {
            min_radius: 30.,
            radius_per_node: 2.,
        }
    }
}

impl LayoutState for CircularState {}

/// Circular layout arranges nodes on a circle in the horizontal plane.
///
/// Node `i` of `n` sits at angle `i * 2π / n`, `y = 0`, radius
/// `max(min_radius, n * radius_per_node)`. Nodes keep graph insertion order.
#[derive(Debug, Clone, Default)]
pub struct Circular {
    state: CircularState,
}

impl Layout<CircularState> for Circular {
    fn from_state(state: CircularState) -> Self {
        Self { state }
    }

    fn compute(&mut self, g: &Graph, _store: &SpatialStore) -> Positions {
        let node_count = g.node_count();
        if node_count == 0 {
            return Positions::new();
        }

        let radius = target_radius(node_count, self.state.min_radius, self.state.radius_per_node);
        let step = TAU / node_count as f32;

        g.nodes_iter()
            .enumerate()
            .map(|(i, (_, n))| {
                let angle = i as f32 * step;
                let pos = Vec3::new(radius * angle.cos(), 0., radius * angle.sin());
                (n.id().to_string(), pos)
            })
            .collect()
    }

    fn state(&self) -> CircularState {
        self.state.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Edge, Node};

    fn graph(n: usize) -> Graph {
        Graph::from_parts(
            (0..n).map(|i| Node::new(format!("n{i}"), Vec3::ZERO)),
            Vec::<Edge>::new(),
        )
    }

    #[test]
    fn single_node_sits_at_radius_on_x() {
        let positions = Circular::default().compute(&graph(1), &SpatialStore::new());
        assert_eq!(positions.get("n0"), Some(&Vec3::new(30., 0., 0.)));
    }

    #[test]
    fn radius_grows_with_node_count() {
        let g = graph(40);
        let positions = Circular::default().compute(&g, &SpatialStore::new());
        for p in positions.values() {
            assert!((p.length() - 80.).abs() < 1e-3);
            assert_eq!(p.y, 0.);
        }
    }

    #[test]
    fn empty_graph_yields_nothing() {
        assert!(Circular::default().compute(&graph(0), &SpatialStore::new()).is_empty());
    }
}
