use egui::Color32;
use serde::{Deserialize, Serialize};

/// A dependency from `source` onto `target`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    id: String,
    source: String,
    target: String,
    weight: f32,
    thickness: f32,

    /// If `color` is None the status color is used.
    color: Option<Color32>,
}

impl Edge {
    pub fn new(id: impl Into<String>, source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            source: source.into(),
            target: target.into(),
            weight: 1.,
            thickness: 1.,
            color: None,
        }
    }

    /// Edge with an id derived from its endpoints, as created by the what-if editor.
    pub fn between(source: &str, target: &str) -> Self {
        Self::new(format!("{source}->{target}"), source, target)
    }

    pub fn with_weight(mut self, weight: f32) -> Self {
        self.weight = weight;
        self
    }

    pub fn with_thickness(mut self, thickness: f32) -> Self {
        self.thickness = thickness;
        self
    }

    pub fn with_color(mut self, color: Color32) -> Self {
        self.color = Some(color);
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn weight(&self) -> f32 {
        self.weight
    }

    pub fn thickness(&self) -> f32 {
        self.thickness
    }

    pub fn color(&self) -> Option<Color32> {
        self.color
    }

    pub fn is_self_loop(&self) -> bool {
        self.source == self.target
    }
}
