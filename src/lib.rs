mod camera;
mod changes;
mod clusters;
mod elements;
mod error;
mod filters;
mod graph;
mod interaction;
mod modifiers;
mod payload;
mod picking;
mod scene;
mod session;
mod settings;
mod spatial;

pub mod events;
pub mod layouts;
pub mod render;

pub use self::camera::{screen_to_ndc, Camera, FocusController, Plane, Ray};
pub use self::changes::Change;
pub use self::clusters::{ClusterBox, ClusterVisualizer};
pub use self::elements::{Cluster, Edge, Node, NodeKind, NodeMetrics};
pub use self::error::Error;
pub use self::filters::{Filters, ImpactAnalysis, StatusFilter};
pub use self::graph::{Graph, GraphIdentity};
pub use self::interaction::Interaction;
pub use self::modifiers::VisualModifiers;
pub use self::payload::{EdgePayload, GraphPayload, MetricsPayload, NodePayload};
pub use self::picking::{pick, ray_polyline, ray_sphere, PointerTarget};
pub use self::scene::{PointerEvent, Scene};
pub use self::session::GraphSession;
pub use self::settings::{
    Settings, SettingsCamera, SettingsInteraction, SettingsLayout, SettingsRender, SettingsStyle,
};
pub use self::spatial::{PositionHandle, SpatialStore};
