//! Overlay entries rendered on top of the base map
//!
//! All overlay geometries are stored in projected coordinates; they are
//! derived from geographic data whenever the store is (re)populated.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::geometry::ProjectedGeometry;

/// Identity of a rendered geometry, numeric or textual as the record store hands it out
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OverlayId {
    Number(i64),
    Text(String),
}

impl fmt::Display for OverlayId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OverlayId::Number(n) => write!(f, "{n}"),
            OverlayId::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for OverlayId {
    fn from(n: i64) -> Self {
        OverlayId::Number(n)
    }
}

impl From<&str> for OverlayId {
    fn from(s: &str) -> Self {
        OverlayId::Text(s.to_string())
    }
}

impl From<String> for OverlayId {
    fn from(s: String) -> Self {
        OverlayId::Text(s)
    }
}

/// Visual role of an overlay
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// The record currently being edited
    Active,
    /// Other saved records shown for context
    Context,
    /// Geometry drawn in this session, not yet persisted
    Draft,
}

/// One geometry in the overlay store
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct OverlayEntry {
    pub id: OverlayId,
    pub geometry: ProjectedGeometry,
    pub role: Role,
}

impl OverlayEntry {
    pub fn new(id: impl Into<OverlayId>, geometry: ProjectedGeometry, role: Role) -> Self {
        Self {
            id: id.into(),
            geometry,
            role,
        }
    }
}
