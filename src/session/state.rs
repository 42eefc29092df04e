//! Drawing session state machine
//!
//! ```text
//! Idle --arm--> Armed --first press/click--> InProgress --release/finish--> Completed
//!                 ^                               |
//!                 +------- degenerate finalize ---+
//! any state --cancel--> Cancelled
//! ```
//!
//! `Completed` and `Cancelled` are terminal; the controller discards the
//! session and builds a new one for the next drawing.

use crate::domain::{
    GestureKind, Geometry, ProjectedGeometry, ProjectedPoint, Ring, distinct_count, shoelace_area,
};
use crate::error::DegenerateGeometryError;

use super::messages::GestureEvent;

/// Gesture geometry that is still being drawn
#[derive(Debug, Clone, PartialEq)]
pub enum PartialGeometry {
    /// Box spanned between the press point and the pointer
    Box {
        anchor: ProjectedPoint,
        current: ProjectedPoint,
    },
    /// Clicked vertices plus the rubber-band pointer position
    Freeform {
        vertices: Vec<ProjectedPoint>,
        cursor: Option<ProjectedPoint>,
    },
}

impl PartialGeometry {
    /// Ring that finalizing right now would produce
    pub fn candidate(&self) -> Vec<ProjectedPoint> {
        match self {
            PartialGeometry::Box { anchor, current } => box_ring(*anchor, *current).to_vec(),
            PartialGeometry::Freeform { vertices, .. } => close_ring(vertices.clone()),
        }
    }

    /// Geometry to show while drawing, rubber band included
    ///
    /// `None` until there are enough points to form a ring.
    pub fn preview(&self) -> Option<ProjectedGeometry> {
        let points = match self {
            PartialGeometry::Box { .. } => self.candidate(),
            PartialGeometry::Freeform { vertices, cursor } => {
                let mut points = vertices.clone();
                points.extend(cursor.iter().copied().filter(|c| vertices.last() != Some(c)));
                close_ring(points)
            }
        };
        Ring::new(points).ok().map(Geometry::Polygon)
    }
}

/// Axis-aligned quadrilateral spanning two corners, closed (5 vertices)
pub fn box_ring(anchor: ProjectedPoint, current: ProjectedPoint) -> [ProjectedPoint; 5] {
    [
        anchor,
        ProjectedPoint::new(current.x, anchor.y),
        current,
        ProjectedPoint::new(anchor.x, current.y),
        anchor,
    ]
}

/// Repeat the first vertex at the end unless it is already there
fn close_ring(mut points: Vec<ProjectedPoint>) -> Vec<ProjectedPoint> {
    if let Some(first) = points.first().copied() {
        if points.last() != Some(&first) {
            points.push(first);
        }
    }
    points
}

#[derive(Debug, Clone, Default, PartialEq)]
pub enum SessionState {
    #[default]
    Idle,
    /// Drawing enabled, no gesture started
    Armed,
    InProgress(PartialGeometry),
    Completed(ProjectedGeometry),
    Cancelled,
}

/// What a single input did to the session
#[derive(Debug, Clone, PartialEq)]
pub enum Transition {
    /// Input not meaningful in the current state
    Ignored,
    /// Now armed, either freshly or after the gesture was undone
    Armed,
    Started,
    Updated,
    Completed,
    /// Finalize produced a degenerate shape; back to armed
    Rejected(DegenerateGeometryError),
    Cancelled,
}

/// One gesture's worth of drawing
#[derive(Debug, Clone)]
pub struct DrawingSession {
    kind: GestureKind,
    state: SessionState,
}

impl DrawingSession {
    pub fn new(kind: GestureKind) -> Self {
        Self {
            kind,
            state: SessionState::Idle,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Finished geometry, if the session completed
    pub fn completed(&self) -> Option<&ProjectedGeometry> {
        match &self.state {
            SessionState::Completed(geometry) => Some(geometry),
            _ => None,
        }
    }

    /// In-progress geometry for live rendering
    pub fn preview(&self) -> Option<ProjectedGeometry> {
        match &self.state {
            SessionState::InProgress(partial) => partial.preview(),
            _ => None,
        }
    }

    /// Enter draw mode
    pub fn arm(&mut self) -> Transition {
        if self.state != SessionState::Idle {
            return Transition::Ignored;
        }
        self.state = SessionState::Armed;
        Transition::Armed
    }

    pub fn cancel(&mut self) -> Transition {
        if self.state == SessionState::Cancelled {
            return Transition::Ignored;
        }
        self.state = SessionState::Cancelled;
        Transition::Cancelled
    }

    /// Feed one pointer event through the state machine
    pub fn handle(&mut self, event: GestureEvent) -> Transition {
        let state = std::mem::take(&mut self.state);
        let (next, transition) = self.step(state, event);
        self.state = next;
        transition
    }

    fn step(&self, state: SessionState, event: GestureEvent) -> (SessionState, Transition) {
        use GestureEvent as E;
        use GestureKind as K;
        use PartialGeometry as G;
        use SessionState as S;

        match (self.kind, state, event) {
            (K::Point, S::Armed, E::Click(p)) => {
                (S::Completed(Geometry::Point(p)), Transition::Completed)
            }

            (K::Box, S::Armed, E::PointerDown(p)) => (
                S::InProgress(G::Box {
                    anchor: p,
                    current: p,
                }),
                Transition::Started,
            ),
            (K::Box, S::InProgress(G::Box { anchor, .. }), E::PointerMove(p)) => (
                S::InProgress(G::Box { anchor, current: p }),
                Transition::Updated,
            ),
            (K::Box, S::InProgress(G::Box { anchor, .. }), E::PointerUp(p)) => {
                finalize(&G::Box { anchor, current: p })
            }

            (K::Freeform, S::Armed, E::Click(p)) => (
                S::InProgress(G::Freeform {
                    vertices: vec![p],
                    cursor: None,
                }),
                Transition::Started,
            ),
            (K::Freeform, S::InProgress(G::Freeform { mut vertices, .. }), E::Click(p)) => {
                // A double click delivers the same vertex twice
                if vertices.last() != Some(&p) {
                    vertices.push(p);
                }
                (
                    S::InProgress(G::Freeform {
                        vertices,
                        cursor: None,
                    }),
                    Transition::Updated,
                )
            }
            (K::Freeform, S::InProgress(G::Freeform { vertices, .. }), E::PointerMove(p)) => (
                S::InProgress(G::Freeform {
                    vertices,
                    cursor: Some(p),
                }),
                Transition::Updated,
            ),
            (K::Freeform, S::InProgress(G::Freeform { mut vertices, cursor }), E::UndoVertex) => {
                vertices.pop();
                if vertices.is_empty() {
                    (S::Armed, Transition::Armed)
                } else {
                    (
                        S::InProgress(G::Freeform { vertices, cursor }),
                        Transition::Updated,
                    )
                }
            }
            (K::Freeform, S::InProgress(partial @ G::Freeform { .. }), E::Finish) => {
                finalize(&partial)
            }

            (_, state, _) => (state, Transition::Ignored),
        }
    }
}

/// Turn the candidate ring into a finished polygon or fall back to armed
fn finalize(partial: &PartialGeometry) -> (SessionState, Transition) {
    let points = partial.candidate();
    let distinct_vertices = distinct_count(&points);
    let area = shoelace_area(&points);
    if distinct_vertices >= 3 && area > 0.0 {
        if let Ok(ring) = Ring::new(points) {
            return (
                SessionState::Completed(Geometry::Polygon(ring)),
                Transition::Completed,
            );
        }
    }
    let err = DegenerateGeometryError {
        distinct_vertices,
        area,
    };
    log::debug!("Discarding gesture: {err}");
    (SessionState::Armed, Transition::Rejected(err))
}
