//! Editor mode choices: which gesture draws, which tiles show

use serde::{Deserialize, Serialize};

/// Gesture a drawing session turns into geometry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GestureKind {
    /// Press-drag-release axis-aligned rectangle (the "circle" tool of the boundary screens)
    #[default]
    Box,
    /// Click-per-vertex polygon, finished explicitly
    Freeform,
    /// Single click waypoint
    Point,
}

/// Base tile layer shown under the overlays
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BaseLayer {
    #[default]
    Standard,
    Satellite,
    Hybrid,
}

impl BaseLayer {
    pub fn label(self) -> &'static str {
        match self {
            BaseLayer::Standard => "Standard",
            BaseLayer::Satellite => "Satellite",
            BaseLayer::Hybrid => "Hybrid",
        }
    }
}
