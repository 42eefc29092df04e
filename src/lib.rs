//! Map-based geofence and waypoint editor core
//!
//! Saved boundaries and stops arrive as WKT text in geographic coordinates.
//! They are decoded, projected to Web Mercator and kept in an overlay store
//! that a [`MapSurface`](editor::MapSurface) renders. Drawing gestures go the
//! other way: projected pointer positions become a polygon or point that is
//! converted back and written out as WKT for the save handler.

pub mod config;
pub mod domain;
pub mod editor;
pub mod error;
pub mod overlays;
pub mod projection;
pub mod session;
pub mod wkt;

pub use config::EditorConfig;
pub use domain::{BaseLayer, GeoPoint, Geometry, GestureKind, OverlayId, ProjectedPoint, Role};
pub use editor::{GeofenceEditorController, HeadlessSurface, MapSurface};
pub use error::{DegenerateGeometryError, MalformedGeometryError, SearchError};
