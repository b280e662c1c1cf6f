mod core;
mod layout;

pub use layout::{ForceDirected, ForceDirectedState};
