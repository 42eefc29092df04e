//! Overlay management
//!
//! - `store`: the set of geometries currently on the map, keyed by id
//! - `style`: how each overlay role is painted

pub mod store;
pub mod style;

pub use store::{GeometryOverlayStore, OverlaySnapshot};
pub use style::{OverlayColor, OverlayStyle, RoleStyles};
