//! Role-aware overlay styling
//!
//! The active record stands out, context records stay muted, and the draft
//! being drawn is dashed so the operator can tell it is not saved yet.

use serde::{Deserialize, Serialize};

use crate::domain::Role;

/// Serializable RGBA color, components in 0.0-1.0
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OverlayColor {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl OverlayColor {
    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Convert to 8-bit RGBA (0-255)
    pub fn to_rgba_u8(self) -> [u8; 4] {
        [
            (self.r * 255.0).round() as u8,
            (self.g * 255.0).round() as u8,
            (self.b * 255.0).round() as u8,
            (self.a * 255.0).round() as u8,
        ]
    }

    /// CSS-style hex string, e.g. `#e61a1aff`
    pub fn to_hex(self) -> String {
        let [r, g, b, a] = self.to_rgba_u8();
        format!("#{r:02x}{g:02x}{b:02x}{a:02x}")
    }
}

/// Paint parameters for one overlay feature
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OverlayStyle {
    pub stroke: OverlayColor,
    pub fill: OverlayColor,
    pub stroke_width: f32,
    /// Marker radius in pixels for point geometries
    pub point_radius: f32,
    pub dashed: bool,
}

/// One style per overlay role
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoleStyles {
    pub active: OverlayStyle,
    pub context: OverlayStyle,
    pub draft: OverlayStyle,
}

impl RoleStyles {
    pub fn for_role(&self, role: Role) -> &OverlayStyle {
        match role {
            Role::Active => &self.active,
            Role::Context => &self.context,
            Role::Draft => &self.draft,
        }
    }
}

impl Default for RoleStyles {
    fn default() -> Self {
        Self {
            active: OverlayStyle {
                stroke: OverlayColor::rgba(0.9, 0.1, 0.1, 1.0),
                fill: OverlayColor::rgba(0.9, 0.1, 0.1, 0.25),
                stroke_width: 3.0,
                point_radius: 8.0,
                dashed: false,
            },
            context: OverlayStyle {
                stroke: OverlayColor::rgba(0.2, 0.4, 0.9, 0.8),
                fill: OverlayColor::rgba(0.2, 0.4, 0.9, 0.1),
                stroke_width: 1.5,
                point_radius: 5.0,
                dashed: false,
            },
            draft: OverlayStyle {
                stroke: OverlayColor::rgba(1.0, 0.9, 0.0, 1.0),
                fill: OverlayColor::rgba(1.0, 0.9, 0.0, 0.2),
                stroke_width: 2.0,
                point_radius: 7.0,
                dashed: true,
            },
        }
    }
}
