//! Pure domain types with minimal dependencies
//!
//! This module contains the value types shared by the codec, the drawing
//! session, the overlay store and the editor controller. Nothing here knows
//! about the rendering engine or the network.

pub mod geometry;
pub mod overlay;
pub mod selection;

pub use geometry::*;
pub use overlay::*;
pub use selection::*;
