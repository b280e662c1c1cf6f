use egui::Color32;

use crate::settings::SettingsStyle;
use crate::{Edge, Filters, GraphSession, ImpactAnalysis, Node, VisualModifiers};

/// Status of a node, in precedence order: the first matching rule wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeStatus {
    Removed,
    Added,
    CircularDependency,
    HotZone,
    HighCoupling,
    Default,
}

type NodeRule = (NodeStatus, fn(&Node, &VisualModifiers) -> bool);

const NODE_RULES: [NodeRule; 5] = [
    (NodeStatus::Removed, |n, m| m.is_node_removed(n.id())),
    (NodeStatus::Added, |n, m| m.is_node_added(n.id())),
    (NodeStatus::CircularDependency, |n, _| n.metrics().circular_dependency),
    (NodeStatus::HotZone, |n, _| n.metrics().hot_zone),
    (NodeStatus::HighCoupling, |n, _| n.metrics().high_coupling),
];

impl NodeStatus {
    pub fn resolve(node: &Node, modifiers: &VisualModifiers) -> Self {
        NODE_RULES
            .iter()
            .find(|(_, applies)| applies(node, modifiers))
            .map_or(Self::Default, |(status, _)| *status)
    }

    pub fn color(self, style: &SettingsStyle) -> Color32 {
        match self {
            Self::Removed => style.removed_color,
            Self::Added => style.added_color,
            Self::CircularDependency => style.circular_color,
            Self::HotZone => style.hot_zone_color,
            Self::HighCoupling => style.high_coupling_color,
            Self::Default => style.default_color,
        }
    }
}

/// Status of an edge, in precedence order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeStatus {
    Removed,
    Added,
    Selected,
    /// Color carried by the edge itself
    Override(Color32),
    Default,
}

impl EdgeStatus {
    pub fn resolve(edge: &Edge, modifiers: &VisualModifiers, selected_edge: Option<&str>) -> Self {
        if modifiers.is_edge_removed(edge.id()) {
            Self::Removed
        } else if modifiers.is_edge_added(edge.id()) {
            Self::Added
        } else if selected_edge == Some(edge.id()) {
            Self::Selected
        } else if let Some(c) = edge.color() {
            Self::Override(c)
        } else {
            Self::Default
        }
    }

    pub fn color(self, style: &SettingsStyle) -> Color32 {
        match self {
            Self::Removed => style.removed_color,
            Self::Added => style.added_color,
            Self::Selected => style.edge_selected_color,
            Self::Override(c) => c,
            Self::Default => style.edge_color,
        }
    }
}

/// Everything per-entity styling reads, borrowed once per frame.
#[derive(Debug, Clone, Copy)]
pub struct StyleContext<'a> {
    pub style: &'a SettingsStyle,
    pub modifiers: &'a VisualModifiers,
    pub filters: &'a Filters,
    pub impact: Option<&'a ImpactAnalysis>,
    pub selected_node: Option<&'a str>,
    pub selected_edge: Option<&'a str>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodeStyle {
    pub status: NodeStatus,
    pub fill: Color32,
    pub outline: Color32,
    pub scale: f32,
    pub opacity: f32,
}

impl<'a> StyleContext<'a> {
    pub fn from_session(session: &'a GraphSession) -> Self {
        Self {
            style: &session.settings().style,
            modifiers: session.modifiers(),
            filters: session.filters(),
            impact: session.impact(),
            selected_node: session.selected_node(),
            selected_edge: session.selected_edge(),
        }
    }

    pub fn node(&self, node: &Node) -> NodeStyle {
        let status = NodeStatus::resolve(node, self.modifiers);

        let mut scale = if self.selected_node == Some(node.id()) {
            self.style.selected_scale
        } else {
            complexity_scale(node.metrics().cyclomatic_complexity, self.style)
        };
        let mut opacity = self.node_opacity(node.id());
        if !self.passes_filters(node) {
            scale *= self.style.filtered_scale;
            opacity = opacity.min(self.style.filtered_opacity);
        }

        NodeStyle {
            status,
            fill: status.color(self.style),
            outline: self.outline(node),
            scale,
            opacity,
        }
    }

    pub fn edge(&self, edge: &Edge, source: &Node, target: &Node) -> (EdgeStatus, f32) {
        let status = EdgeStatus::resolve(edge, self.modifiers, self.selected_edge);
        let mut opacity = self.node_opacity(source.id()).min(self.node_opacity(target.id()));
        if !self.passes_filters(source) || !self.passes_filters(target) {
            opacity = opacity.min(self.style.filtered_opacity);
        }
        (status, opacity)
    }

    fn passes_filters(&self, node: &Node) -> bool {
        !self.filters.is_active() || self.filters.passes(node)
    }

    /// Opacity from the impact overlay alone.
    fn node_opacity(&self, id: &str) -> f32 {
        let Some(impact) = self.impact else {
            return 1.;
        };
        let fade = self.style.impact_fade_opacity;
        match impact.hops(id) {
            Some(h) => (1. - h as f32 * self.style.impact_hop_falloff).max(fade),
            None => fade,
        }
    }

    fn outline(&self, node: &Node) -> Color32 {
        if node.is_third_party() {
            return self.style.third_party_outline;
        }
        node.language()
            .and_then(|lang| {
                self.style
                    .language_outlines
                    .iter()
                    .find(|(l, _)| l.eq_ignore_ascii_case(lang))
            })
            .map_or(self.style.default_outline, |(_, c)| *c)
    }
}

/// `1 + min(ln(1 + complexity) * gain, cap)`
pub fn complexity_scale(complexity: u32, style: &SettingsStyle) -> f32 {
    1. + ((complexity as f32).ln_1p() * style.complexity_gain).min(style.complexity_cap)
}
