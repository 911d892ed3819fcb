use serde::{Deserialize, Serialize};

/// Rounded `(productivity, quality)` coordinate, each axis in `1..=5`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "camelCase")]
pub struct GridCell {
    pub productivity: u8,
    pub quality: u8,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PlacedNode {
    pub participant_id: String,
    pub x: f64,
    pub y: f64,
    pub cell: GridCell,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PlotArea {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl PlotArea {
    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatrixLayoutResponse {
    pub size: f64,
    pub plot_area: PlotArea,
    pub node_radius: f64,
    #[serde(default)]
    pub nodes: Vec<PlacedNode>,
}
