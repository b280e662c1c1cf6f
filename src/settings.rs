use egui::Color32;
use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::layouts::{CircularState, ForceDirectedState};
use crate::Error;

/// All tunables of the engine. Every section falls back to its defaults when
/// missing from a JSON document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub layout: SettingsLayout,
    pub style: SettingsStyle,
    pub render: SettingsRender,
    pub interaction: SettingsInteraction,
    pub camera: SettingsCamera,
}

impl Settings {
    /// Reads settings from JSON. Missing fields take their defaults.
    ///
    /// # Errors
    /// Returns [`Error::Decode`] when `s` is not valid JSON of settings.
    pub fn from_json(s: &str) -> Result<Self, Error> {
        Ok(serde_json::from_str(s)?)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SettingsLayout {
    pub circular: CircularState,
    pub force: ForceDirectedState,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SettingsStyle {
    /// Cluster palette, indexed by `cluster_id mod len`
    pub palette: Vec<Color32>,

    pub default_color: Color32,
    pub removed_color: Color32,
    pub added_color: Color32,
    pub circular_color: Color32,
    pub hot_zone_color: Color32,
    pub high_coupling_color: Color32,

    pub edge_color: Color32,
    pub edge_selected_color: Color32,

    /// Outline for third-party nodes, wins over any language outline
    pub third_party_outline: Color32,
    /// Outline per language; unknown languages use `default_outline`
    pub language_outlines: Vec<(String, Color32)>,
    pub default_outline: Color32,

    pub selection_color: Color32,
    pub hover_color: Color32,
    pub highlight_color: Color32,

    /// Scale of the selected node
    pub selected_scale: f32,
    /// Growth per `ln(1 + complexity)`
    pub complexity_gain: f32,
    /// Max extra scale from complexity
    pub complexity_cap: f32,

    /// Scale multiplier for nodes failing the active filters
    pub filtered_scale: f32,
    /// Opacity of nodes failing the active filters
    pub filtered_opacity: f32,
    /// Opacity of nodes outside the active impact analysis
    pub impact_fade_opacity: f32,
    /// Opacity lost per hop inside the impact set
    pub impact_hop_falloff: f32,
}

impl Default for SettingsStyle {
    fn default() -> Self {
        Self {
            palette: vec![
                Color32::from_rgb(0x4e, 0x79, 0xa7),
                Color32::from_rgb(0xf2, 0x8e, 0x2b),
                Color32::from_rgb(0x59, 0xa1, 0x4f),
                Color32::from_rgb(0xb0, 0x7a, 0xa1),
                Color32::from_rgb(0x76, 0xb7, 0xb2),
                Color32::from_rgb(0xed, 0xc9, 0x48),
                Color32::from_rgb(0xff, 0x9d, 0xa7),
                Color32::from_rgb(0x9c, 0x75, 0x5f),
            ],
            default_color: Color32::from_rgb(0x60, 0x7d, 0x8b),
            removed_color: Color32::from_rgb(0x55, 0x55, 0x55),
            added_color: Color32::from_rgb(0x22, 0xc5, 0x5e),
            circular_color: Color32::from_rgb(0xef, 0x44, 0x44),
            hot_zone_color: Color32::from_rgb(0xf9, 0x73, 0x16),
            high_coupling_color: Color32::from_rgb(0xea, 0xb3, 0x08),
            edge_color: Color32::from_rgb(0x94, 0xa3, 0xb8),
            edge_selected_color: Color32::from_rgb(0x38, 0xbd, 0xf8),
            third_party_outline: Color32::from_rgb(0xa8, 0x55, 0xf7),
            language_outlines: vec![
                ("rust".to_string(), Color32::from_rgb(0xde, 0xa5, 0x84)),
                ("typescript".to_string(), Color32::from_rgb(0x31, 0x78, 0xc6)),
                ("javascript".to_string(), Color32::from_rgb(0xf7, 0xdf, 0x1e)),
                ("python".to_string(), Color32::from_rgb(0x37, 0x76, 0xab)),
                ("go".to_string(), Color32::from_rgb(0x00, 0xad, 0xd8)),
                ("java".to_string(), Color32::from_rgb(0xb0, 0x72, 0x19)),
            ],
            default_outline: Color32::from_rgb(0xcb, 0xd5, 0xe1),
            selection_color: Color32::WHITE,
            hover_color: Color32::from_rgb(0x7d, 0xd3, 0xfc),
            highlight_color: Color32::from_rgb(0xfa, 0xcc, 0x15),
            selected_scale: 1.8,
            complexity_gain: 0.15,
            complexity_cap: 0.8,
            filtered_scale: 0.4,
            filtered_opacity: 0.05,
            impact_fade_opacity: 0.15,
            impact_hop_falloff: 0.15,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SettingsRender {
    /// Max node instances per frame; the excess is not drawn
    pub node_capacity: usize,
    /// Max edge curves per frame; the excess is not drawn
    pub edge_capacity: usize,
    /// Line segments per edge curve
    pub curve_segments: usize,
    /// Arc height as a fraction of endpoint separation
    pub arc_bulge: f32,
    /// Curve parameter where the arrow head sits
    pub arrow_t: f32,
    pub arrow_size: f32,
    /// Sphere radius of a node at scale 1
    pub node_radius: f32,
    /// Minimum radius of the invisible edge hit volume
    pub edge_hit_radius: f32,
    /// Margin added around every cluster box
    pub cluster_padding: f32,
    /// Filtered nodes fainter than this cannot be picked
    pub pick_min_opacity: f32,
}

impl Default for SettingsRender {
    fn default() -> Self {
        Self {
            node_capacity: 10_000,
            edge_capacity: 20_000,
            curve_segments: 12,
            arc_bulge: 0.2,
            arrow_t: 0.9,
            arrow_size: 1.5,
            node_radius: 2.,
            edge_hit_radius: 1.,
            cluster_padding: 4.,
            pick_min_opacity: 0.1,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SettingsInteraction {
    /// Dragging of the selected node
    pub node_drag: bool,

    /// Hover feedback on nodes
    pub node_hover: bool,

    /// Clicking an edge selects it
    pub edge_select: bool,
}

impl Default for SettingsInteraction {
    fn default() -> Self {
        Self {
            node_drag: true,
            node_hover: true,
            edge_select: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SettingsCamera {
    /// Camera position relative to a focused node
    pub focus_offset: Vec3,
    /// Seconds spent moving the camera to a focused node
    pub focus_duration: f32,
    /// Seconds after which the orbit target returns to the origin
    pub focus_reset_after: f32,
    /// Vertical field of view in radians
    pub fov_y: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for SettingsCamera {
    fn default() -> Self {
        Self {
            focus_offset: Vec3::new(0., 20., 40.),
            focus_duration: 0.6,
            focus_reset_after: 1.5,
            fov_y: 60_f32.to_radians(),
            near: 0.1,
            far: 5000.,
        }
    }
}
