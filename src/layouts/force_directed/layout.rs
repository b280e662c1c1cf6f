use glam::Vec3;
use log::debug;
use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use super::core::{apply_center_gravity, centroid, compute_attraction, compute_repulsion, integrate, rescale};
use crate::layouts::{target_radius, Layout, LayoutState, Positions};
use crate::{Graph, SpatialStore};

/// Parameters of the force simulation. The constants are empirically tuned and
/// only their qualitative balance matters: the final rescale fixes the size.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ForceDirectedState {
    pub iterations: usize,
    /// Max random offset per axis added to the seed positions
    pub jitter: f32,
    pub c_repulse: f32,
    pub c_attract: f32,
    pub c_center: f32,
    /// Velocity multiplier applied after each step, below 1
    pub damping: f32,
    /// Cap on the magnitude of a single pairwise or spring force
    pub max_force: f32,
    pub max_velocity: f32,
    /// Squared distance under which two nodes count as coincident
    pub epsilon: f32,
    pub min_radius: f32,
    pub radius_per_node: f32,
    /// Fixed RNG seed; a fresh one is drawn when `None`
    pub seed: Option<u64>,
}

impl Default for ForceDirectedState {
    fn default() -> Self {
        Self {
            iterations: 50,
            jitter: 5.,
            c_repulse: 1000.,
            c_attract: 0.05,
            c_center: 0.01,
            damping: 0.85,
            max_force: 50.,
            max_velocity: 10.,
            epsilon: 1e-4,
            min_radius: 30.,
            radius_per_node: 2.,
            seed: None,
        }
    }
}

impl LayoutState for ForceDirectedState {}

/// Force-directed layout: jittered seed, fixed number of damped simulation
/// steps, then a uniform rescale to the target radius.
#[derive(Debug, Default)]
pub struct ForceDirected {
    state: ForceDirectedState,
    // Reusable buffers to avoid reallocating between runs
    scratch_pos: Vec<Vec3>,
    scratch_vel: Vec<Vec3>,
}

impl ForceDirected {
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.state.seed = Some(seed);
        self
    }

    fn seed_positions(&mut self, g: &Graph, store: &SpatialStore, rng: &mut StdRng) {
        let jitter = self.state.jitter.abs();
        self.scratch_pos.clear();
        for (_, n) in g.nodes_iter() {
            let current = store.get(n.id()).unwrap_or_else(|| n.position());
            let offset = if jitter > 0.0 {
                Vec3::new(
                    rng.random_range(-jitter..=jitter),
                    rng.random_range(-jitter..=jitter),
                    rng.random_range(-jitter..=jitter),
                )
            } else {
                Vec3::ZERO
            };
            self.scratch_pos.push(current + offset);
        }
        self.scratch_vel.clear();
        self.scratch_vel.resize(self.scratch_pos.len(), Vec3::ZERO);
    }
}

impl Layout<ForceDirectedState> for ForceDirected {
    fn from_state(state: ForceDirectedState) -> Self {
        Self {
            state,
            scratch_pos: Vec::new(),
            scratch_vel: Vec::new(),
        }
    }

    fn compute(&mut self, g: &Graph, store: &SpatialStore) -> Positions {
        let node_count = g.node_count();
        if node_count == 0 {
            return Positions::new();
        }

        let mut rng = match self.state.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::seed_from_u64(rand::random()),
        };
        self.seed_positions(g, store, &mut rng);

        // Node indices of a StableGraph may have holes; springs use dense positions.
        let dense: std::collections::HashMap<_, _> = g
            .nodes_iter()
            .enumerate()
            .map(|(i, (idx, _))| (idx, i))
            .collect();
        let springs: Vec<(usize, usize)> = g
            .edges_iter()
            .filter_map(|(_, _, s, t)| Some((*dense.get(&s)?, *dense.get(&t)?)))
            .collect();

        let params = &self.state;
        for _ in 0..params.iterations {
            let center = centroid(&self.scratch_pos);
            compute_repulsion(
                &self.scratch_pos,
                &mut self.scratch_vel,
                params.c_repulse,
                params.max_force,
                params.epsilon,
            );
            compute_attraction(
                &self.scratch_pos,
                &mut self.scratch_vel,
                &springs,
                params.c_attract,
                params.max_force,
                params.epsilon,
            );
            apply_center_gravity(&self.scratch_pos, &mut self.scratch_vel, center, params.c_center);
            integrate(
                &mut self.scratch_pos,
                &mut self.scratch_vel,
                params.max_velocity,
                params.damping,
            );
        }

        let radius = target_radius(node_count, params.min_radius, params.radius_per_node);
        rescale(&mut self.scratch_pos, radius, params.epsilon);
        debug!(
            "force layout: {node_count} nodes, {} springs, {} iterations",
            springs.len(),
            params.iterations
        );

        g.nodes_iter()
            .zip(self.scratch_pos.iter())
            .filter(|(_, p)| p.is_finite())
            .map(|((_, n), p)| (n.id().to_string(), *p))
            .collect()
    }

    fn state(&self) -> ForceDirectedState {
        self.state.clone()
    }
}
