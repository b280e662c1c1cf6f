use egui::Color32;
use serde::{Deserialize, Serialize};

/// Cluster as reported by the metrics payload.
///
/// Members are not stored here: they are derived from the graph by filtering
/// nodes on their cluster id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cluster {
    pub id: u32,
    #[serde(default)]
    pub name: String,
}

impl Cluster {
    pub fn new(id: u32, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }

    /// Display color, `palette[id mod len]`. Gray for an empty palette.
    pub fn color(&self, palette: &[Color32]) -> Color32 {
        if palette.is_empty() {
            return Color32::GRAY;
        }
        palette[self.id as usize % palette.len()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn color_wraps_around_palette() {
        let palette = [Color32::RED, Color32::GREEN, Color32::BLUE];
        assert_eq!(Cluster::new(0, "a").color(&palette), Color32::RED);
        assert_eq!(Cluster::new(4, "b").color(&palette), Color32::GREEN);
        assert_eq!(Cluster::new(5, "c").color(&[]), Color32::GRAY);
    }
}
