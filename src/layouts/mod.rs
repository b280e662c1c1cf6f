mod circular;
mod force_directed;
mod hierarchical;
mod layout;

pub use circular::{Circular, CircularState};
pub use force_directed::{ForceDirected, ForceDirectedState};
pub use hierarchical::{Hierarchical, HierarchicalState};
pub use layout::{apply, commit, target_radius, Layout, LayoutMode, LayoutState, Positions};
