mod cluster;
mod edge;
mod metrics;
mod node;

pub use self::cluster::Cluster;
pub use self::edge::Edge;
pub use self::metrics::NodeMetrics;
pub use self::node::{Node, NodeKind};
