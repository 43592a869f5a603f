//! Region-of-interest polygon that limits tracking.

use kurbo::{BezPath, Point, Shape as _};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TrackingState {
    #[default]
    None,
    Drawing,
    Drawn,
}

/// A polygon drawn independently of the annotation shapes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrackingArea {
    state: TrackingState,
    polygon: Vec<Point>,
}

impl TrackingArea {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> TrackingState {
        self.state
    }

    pub fn polygon(&self) -> &[Point] {
        &self.polygon
    }

    pub fn is_active(&self) -> bool {
        self.state != TrackingState::None
    }

    pub fn is_drawing(&self) -> bool {
        self.state == TrackingState::Drawing
    }

    /// Start a fresh polygon.
    pub fn start_drawing(&mut self) {
        self.polygon.clear();
        self.state = TrackingState::Drawing;
    }

    pub fn add_vertex(&mut self, point: Point) {
        if self.is_drawing() {
            self.polygon.push(point);
        }
    }

    /// Finish the polygon. Returns false when nothing was being drawn.
    pub fn finish(&mut self) -> bool {
        if !self.is_drawing() {
            return false;
        }
        self.state = TrackingState::Drawn;
        log::info!("Tracking area drawn with {} vertices", self.polygon.len());
        true
    }

    pub fn clear(&mut self) {
        self.polygon.clear();
        self.state = TrackingState::None;
    }

    /// Whether a point falls inside the finished area. An unset area contains everything.
    pub fn contains(&self, point: Point) -> bool {
        if self.state != TrackingState::Drawn || self.polygon.len() < 3 {
            return true;
        }
        let mut path = BezPath::new();
        path.move_to(self.polygon[0]);
        for p in &self.polygon[1..] {
            path.line_to(*p);
        }
        path.close_path();
        path.winding(point) % 2 != 0
    }
}
