//! In-progress shape capture, modelled as an explicit state machine.
//!
//! The UI layer only dispatches events (begin / add point / finish /
//! cancel) into this type; all transition rules live here so they can be
//! tested without any egui involvement. An unfinished sketch is never
//! visible to export or persistence — only committed measurements are.

use crate::data::geometry::{self, PlanPoint};
use crate::error::EngineError;

/// Pixel radius around the first vertex within which a click closes a
/// polygon instead of adding a vertex.
pub const CLOSE_RADIUS_PX: f64 = 10.0;

/// Which kind of shape is being drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SketchKind {
    /// Open polyline, finished by double-click.
    Distance,
    /// Closed polygon, finished by clicking near the first vertex.
    Area,
}

impl SketchKind {
    /// Minimum committed vertex count: 2 for a polyline, 3 for a polygon
    /// (the closing edge is implicit).
    pub fn min_points(self) -> usize {
        match self {
            SketchKind::Distance => 2,
            SketchKind::Area => 3,
        }
    }
}

/// Idle / Drawing state of the capture tool.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum SketchState {
    #[default]
    Idle,
    Drawing {
        kind: SketchKind,
        points: Vec<PlanPoint>,
    },
}

impl SketchState {
    /// `Idle → Drawing(kind)`. Beginning while already drawing abandons the
    /// previous in-progress shape; abandonment has no side effects.
    pub fn begin(&mut self, kind: SketchKind) {
        *self = SketchState::Drawing {
            kind,
            points: Vec::new(),
        };
    }

    /// Append a vertex while drawing.
    ///
    /// A non-finite point (a glitched pointer event) is dropped with
    /// `InvalidVertex`; the sketch itself keeps going. Adding while idle is
    /// a no-op.
    pub fn add_point(&mut self, p: PlanPoint) -> Result<(), EngineError> {
        if !geometry::is_finite_point(p) {
            return Err(EngineError::InvalidVertex);
        }
        if let SketchState::Drawing { points, .. } = self {
            points.push(p);
        }
        Ok(())
    }

    /// True when drawing a polygon with enough vertices and `p` falls within
    /// [`CLOSE_RADIUS_PX`] of the first vertex — i.e. this click should close
    /// the shape rather than add a vertex.
    pub fn would_close(&self, p: PlanPoint) -> bool {
        match self {
            SketchState::Drawing {
                kind: SketchKind::Area,
                points,
            } => {
                points.len() >= SketchKind::Area.min_points()
                    && geometry::is_finite_point(p)
                    && geometry::dist(points[0], p) <= CLOSE_RADIUS_PX
            }
            _ => false,
        }
    }

    /// `Drawing → Idle`. Returns the captured shape when it has enough
    /// vertices for its kind; a shorter sketch is discarded as a silent
    /// no-op (an accidental click, not an error). Finishing while idle
    /// returns `None`.
    pub fn finish(&mut self) -> Option<(SketchKind, Vec<PlanPoint>)> {
        match std::mem::take(self) {
            SketchState::Idle => None,
            SketchState::Drawing { kind, points } => {
                if points.len() >= kind.min_points() {
                    Some((kind, points))
                } else {
                    None
                }
            }
        }
    }

    /// Abandon the in-progress shape, if any.
    pub fn cancel(&mut self) {
        *self = SketchState::Idle;
    }

    pub fn is_drawing(&self) -> bool {
        matches!(self, SketchState::Drawing { .. })
    }

    pub fn kind(&self) -> Option<SketchKind> {
        match self {
            SketchState::Drawing { kind, .. } => Some(*kind),
            SketchState::Idle => None,
        }
    }

    /// Vertices captured so far; empty while idle.
    pub fn points(&self) -> &[PlanPoint] {
        match self {
            SketchState::Drawing { points, .. } => points,
            SketchState::Idle => &[],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn begin_enters_drawing() {
        let mut s = SketchState::default();
        assert!(!s.is_drawing());
        s.begin(SketchKind::Distance);
        assert!(s.is_drawing());
        assert_eq!(s.kind(), Some(SketchKind::Distance));
        assert!(s.points().is_empty());
    }

    #[test]
    fn non_finite_vertex_is_dropped_but_drawing_continues() {
        let mut s = SketchState::default();
        s.begin(SketchKind::Distance);
        s.add_point([0.0, 0.0]).unwrap();
        assert_eq!(
            s.add_point([f64::NAN, 1.0]),
            Err(EngineError::InvalidVertex)
        );
        assert!(s.is_drawing());
        assert_eq!(s.points().len(), 1);
        s.add_point([3.0, 4.0]).unwrap();
        assert_eq!(s.points().len(), 2);
    }

    #[test]
    fn short_polyline_finish_is_silent_noop() {
        let mut s = SketchState::default();
        s.begin(SketchKind::Distance);
        s.add_point([1.0, 1.0]).unwrap();
        assert_eq!(s.finish(), None);
        assert_eq!(s, SketchState::Idle);
    }

    #[test]
    fn short_polygon_finish_is_silent_noop() {
        let mut s = SketchState::default();
        s.begin(SketchKind::Area);
        s.add_point([0.0, 0.0]).unwrap();
        s.add_point([10.0, 0.0]).unwrap();
        assert_eq!(s.finish(), None);
        assert_eq!(s, SketchState::Idle);
    }

    #[test]
    fn finish_returns_captured_points() {
        let mut s = SketchState::default();
        s.begin(SketchKind::Area);
        for p in [[0.0, 0.0], [10.0, 0.0], [10.0, 10.0]] {
            s.add_point(p).unwrap();
        }
        let (kind, pts) = s.finish().unwrap();
        assert_eq!(kind, SketchKind::Area);
        assert_eq!(pts.len(), 3);
        assert_eq!(s, SketchState::Idle);
    }

    #[test]
    fn close_click_detected_within_radius() {
        let mut s = SketchState::default();
        s.begin(SketchKind::Area);
        for p in [[0.0, 0.0], [100.0, 0.0], [100.0, 100.0]] {
            s.add_point(p).unwrap();
        }
        assert!(s.would_close([4.0, 3.0])); // 5px from the first vertex
        assert!(!s.would_close([50.0, 50.0]));
    }

    #[test]
    fn polyline_never_closes_on_first_vertex() {
        let mut s = SketchState::default();
        s.begin(SketchKind::Distance);
        for p in [[0.0, 0.0], [100.0, 0.0], [100.0, 100.0]] {
            s.add_point(p).unwrap();
        }
        assert!(!s.would_close([0.0, 0.0]));
    }

    #[test]
    fn begin_abandons_previous_sketch() {
        let mut s = SketchState::default();
        s.begin(SketchKind::Distance);
        s.add_point([0.0, 0.0]).unwrap();
        s.begin(SketchKind::Area);
        assert!(s.points().is_empty());
        assert_eq!(s.kind(), Some(SketchKind::Area));
    }
}
