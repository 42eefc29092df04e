//! Geofence / waypoint editor
//!
//! - `surface`: the rendering engine seam and a headless implementation
//! - `search`: free-text location lookup
//! - `controller`: the editor that ties session, store, codec and surface together

pub mod controller;
pub mod search;
pub mod surface;

pub use controller::{
    CompletedDrawing, DRAFT_ID, GeofenceEditorController, LoadReport, SavedGeometry,
    SkippedGeometry,
};
pub use search::{GeocodeResult, Geocoder, NominatimGeocoder};
pub use surface::{HeadlessSurface, MapSurface};
