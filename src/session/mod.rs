//! Drawing session management
//!
//! This module contains:
//! - Gesture event types fed in by the map surface
//! - The drawing session state machine

pub mod messages;
pub mod state;

pub use messages::GestureEvent;
pub use state::{DrawingSession, PartialGeometry, SessionState, Transition};
