use std::collections::HashMap;

use glam::Vec3;

use crate::graph::{Graph, GraphIdentity};

/// Stable reference to one position slot of a [`SpatialStore`].
///
/// Handles stay valid while the node is tracked, no matter how often its position
/// changes. Once the node is pruned the handle resolves to `None`, even if the slot
/// is later reused for another node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PositionHandle {
    index: u32,
    generation: u32,
}

#[derive(Debug, Clone)]
struct Slot {
    position: Vec3,
    original: Vec3,
    generation: u32,
    occupied: bool,
}

/// Owned arena of live node positions addressed by stable node id.
///
/// This is the high-frequency channel: drags and layouts write here, the render
/// loop reads here every tick. Nothing in it notifies anyone. Every operation is
/// total, unknown ids are silently ignored.
#[derive(Debug, Clone, Default)]
pub struct SpatialStore {
    slots: Vec<Slot>,
    free: Vec<u32>,
    index: HashMap<String, PositionHandle>,
    identity: Option<GraphIdentity>,
}

impl SpatialStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reconciles the store with `graph`.
    ///
    /// Untracked nodes get a slot seeded from their ingested position and a frozen
    /// copy of it as original position. Tracked ids missing from the graph are
    /// pruned. Tracked nodes keep their live position. Does nothing when the graph
    /// identity did not change since the last call; returns whether it ran.
    pub fn initialize(&mut self, graph: &Graph) -> bool {
        let identity = graph.identity();
        if self.identity.as_ref() == Some(&identity) {
            return false;
        }

        for (_, n) in graph.nodes_iter() {
            if !self.index.contains_key(n.id()) {
                self.insert(n.id(), n.position());
            }
        }

        let stale: Vec<String> = self
            .index
            .keys()
            .filter(|id| !graph.contains_node(id))
            .cloned()
            .collect();
        for id in &stale {
            self.remove(id);
        }

        self.identity = Some(identity);
        true
    }

    /// Records `identity` as already reconciled. Called after in-place edits
    /// that keep the store and the graph in step.
    pub(crate) fn sync_identity(&mut self, identity: GraphIdentity) {
        self.identity = Some(identity);
    }

    /// Drops every entry.
    pub fn clear(&mut self) {
        self.slots.clear();
        self.free.clear();
        self.index.clear();
        self.identity = None;
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.index.keys().map(String::as_str)
    }

    pub fn handle(&self, id: &str) -> Option<PositionHandle> {
        self.index.get(id).copied()
    }

    pub fn get(&self, id: &str) -> Option<Vec3> {
        self.handle(id).and_then(|h| self.resolve(h))
    }

    /// Position the node had when it started being tracked.
    pub fn original(&self, id: &str) -> Option<Vec3> {
        let h = self.handle(id)?;
        self.slot(h).map(|s| s.original)
    }

    /// Live position behind a handle. This is the per-tick read path.
    pub fn resolve(&self, handle: PositionHandle) -> Option<Vec3> {
        self.slot(handle).map(|s| s.position)
    }

    /// Updates the position of `id` in place. Unknown ids and non-finite
    /// coordinates are ignored; returns whether the write happened.
    pub fn set(&mut self, id: &str, x: f32, y: f32, z: f32) -> bool {
        self.set_vec(id, Vec3::new(x, y, z))
    }

    pub fn set_vec(&mut self, id: &str, position: Vec3) -> bool {
        match self.handle(id) {
            Some(h) => self.set_by_handle(h, position),
            None => false,
        }
    }

    pub fn set_by_handle(&mut self, handle: PositionHandle, position: Vec3) -> bool {
        if !position.is_finite() {
            return false;
        }
        let Some(slot) = self.slot_mut(handle) else {
            return false;
        };
        slot.position = position;
        true
    }

    /// Starts tracking `id` at `position`. An already tracked id keeps its slot
    /// untouched.
    pub(crate) fn insert(&mut self, id: &str, position: Vec3) -> PositionHandle {
        if let Some(h) = self.handle(id) {
            return h;
        }
        let position = if position.is_finite() { position } else { Vec3::ZERO };
        let handle = if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.position = position;
            slot.original = position;
            slot.occupied = true;
            PositionHandle {
                index,
                generation: slot.generation,
            }
        } else {
            let index = self.slots.len() as u32;
            self.slots.push(Slot {
                position,
                original: position,
                generation: 0,
                occupied: true,
            });
            PositionHandle {
                index,
                generation: 0,
            }
        };
        self.index.insert(id.to_string(), handle);
        handle
    }

    /// Stops tracking `id`, invalidating its handle.
    pub(crate) fn remove(&mut self, id: &str) -> Option<Vec3> {
        let h = self.index.remove(id)?;
        let slot = self.slots.get_mut(h.index as usize)?;
        slot.occupied = false;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(h.index);
        Some(slot.position)
    }

    fn slot(&self, h: PositionHandle) -> Option<&Slot> {
        self.slots
            .get(h.index as usize)
            .filter(|s| s.occupied && s.generation == h.generation)
    }

    fn slot_mut(&mut self, h: PositionHandle) -> Option<&mut Slot> {
        self.slots
            .get_mut(h.index as usize)
            .filter(|s| s.occupied && s.generation == h.generation)
    }
}
