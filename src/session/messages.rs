//! Raw pointer input for a drawing session
//!
//! Positions are already in projected map coordinates; the map surface does
//! the pixel-to-map conversion before forwarding.

use crate::domain::ProjectedPoint;

/// One discrete pointer event dispatched on the editor's event loop
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GestureEvent {
    /// Button pressed (starts a box)
    PointerDown(ProjectedPoint),
    /// Pointer moved, pressed or not
    PointerMove(ProjectedPoint),
    /// Button released (finishes a box)
    PointerUp(ProjectedPoint),
    /// Click without drag (places a point or a freeform vertex)
    Click(ProjectedPoint),
    /// Close the freeform polygon (double click or enter in the host)
    Finish,
    /// Drop the last freeform vertex
    UndoVertex,
}
