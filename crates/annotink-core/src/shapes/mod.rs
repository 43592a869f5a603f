//! Annotation shapes.

mod kind;
mod record;

pub use kind::{KindRules, ShapeKind, UndoBehavior};
pub use record::ShapeRecord;

use crate::geometry::{bbox_of, distance, point_to_segment_dist};
use kurbo::{BezPath, Circle, Point, Rect, Shape as _, Vec2};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

/// Unique identifier for shapes.
pub type ShapeId = Uuid;

/// Serializable color representation (RGBA8).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShapeColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl ShapeColor {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    pub const fn with_alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }

    pub fn black() -> Self {
        Self::rgb(0, 0, 0)
    }

    pub fn white() -> Self {
        Self::rgb(255, 255, 255)
    }
}

/// Colors used to paint one shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShapeColors {
    pub line: ShapeColor,
    pub fill: ShapeColor,
    pub select_line: ShapeColor,
    pub select_fill: ShapeColor,
    pub vertex_fill: ShapeColor,
    /// Fill of the highlighted vertex.
    pub hvertex_fill: ShapeColor,
}

impl Default for ShapeColors {
    fn default() -> Self {
        Self::from_base(ShapeColor::rgb(0, 255, 0))
    }
}

impl ShapeColors {
    /// Derive a full color set from one base color.
    pub fn from_base(base: ShapeColor) -> Self {
        Self {
            line: base.with_alpha(128),
            fill: base.with_alpha(128),
            select_line: ShapeColor::white(),
            select_fill: base.with_alpha(155),
            vertex_fill: base,
            hvertex_fill: ShapeColor::white(),
        }
    }

    /// Color set keyed on a label through the shared palette.
    pub fn for_label(label: &str) -> Self {
        Self::from_base(crate::palette::label_color(label))
    }
}

/// How a highlighted vertex is emphasised.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum HighlightMode {
    /// The pointer hovers within pick distance.
    Near,
    /// The vertex is being dragged.
    #[default]
    Move,
}

impl HighlightMode {
    /// Size multiplier applied to the vertex marker.
    pub fn size_factor(self) -> f64 {
        match self {
            HighlightMode::Near => 4.0,
            HighlightMode::Move => 1.5,
        }
    }
}

/// One annotation primitive in image pixel space.
///
/// `Clone` keeps the identifier, which is what history snapshots need.
/// [`Shape::duplicate`] produces an independent shape with a new identifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shape {
    id: ShapeId,
    kind: ShapeKind,
    points: Vec<Point>,
    closed: bool,
    pub label: Option<String>,
    pub group_id: Option<u32>,
    pub flags: BTreeMap<String, bool>,
    pub content: Option<String>,
    pub colors: ShapeColors,
    #[serde(skip)]
    highlighted_vertex: Option<usize>,
    #[serde(skip)]
    highlight_mode: HighlightMode,
    #[serde(skip)]
    pub selected: bool,
    #[serde(skip)]
    pub fill: bool,
}

impl Shape {
    pub fn new(kind: ShapeKind) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            points: Vec::new(),
            closed: false,
            label: None,
            group_id: None,
            flags: BTreeMap::new(),
            content: None,
            colors: ShapeColors::default(),
            highlighted_vertex: None,
            highlight_mode: HighlightMode::default(),
            selected: false,
            fill: false,
        }
    }

    /// Create an open shape holding the given vertices.
    pub fn with_points(kind: ShapeKind, points: Vec<Point>) -> Self {
        Self {
            points,
            ..Self::new(kind)
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        let label = label.into();
        self.colors = ShapeColors::for_label(&label);
        self.label = Some(label);
        self
    }

    pub fn with_group_id(mut self, group_id: u32) -> Self {
        self.group_id = Some(group_id);
        self
    }

    pub fn closed(mut self) -> Self {
        self.closed = true;
        self
    }

    pub fn id(&self) -> ShapeId {
        self.id
    }

    pub fn kind(&self) -> ShapeKind {
        self.kind
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn first_point(&self) -> Option<Point> {
        self.points.first().copied()
    }

    pub fn last_point(&self) -> Option<Point> {
        self.points.last().copied()
    }

    /// Replace every vertex at once.
    pub fn set_points(&mut self, points: Vec<Point>) {
        self.points = points;
        self.validate_highlight();
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn close(&mut self) {
        self.closed = true;
    }

    pub fn set_open(&mut self) {
        self.closed = false;
    }

    /// Whether more vertices can be appended while drawing.
    pub fn can_add_point(&self) -> bool {
        matches!(self.kind, ShapeKind::Polygon | ShapeKind::Linestrip)
    }

    /// Append a vertex. Clicking the first vertex again closes the shape instead.
    pub fn add_point(&mut self, point: Point) {
        if self.points.first() == Some(&point) {
            self.close();
        } else {
            self.points.push(point);
        }
    }

    /// Remove and return the last vertex.
    pub fn pop_point(&mut self) -> Option<Point> {
        let point = self.points.pop();
        self.validate_highlight();
        point
    }

    /// Insert a vertex so that it becomes index `index`.
    ///
    /// Only polygons and line strips accept new vertices; other kinds and indices past the
    /// end are ignored.
    pub fn insert_point(&mut self, index: usize, point: Point) {
        if !self.kind.is_vertex_editable() || index > self.points.len() {
            log::debug!("Ignoring vertex insert at {index} on {}", self.kind);
            return;
        }
        self.points.insert(index, point);
        self.highlighted_vertex = None;
    }

    /// Remove vertex `index`. Refused when the shape would drop below its minimum size.
    pub fn remove_point(&mut self, index: usize) {
        if !self.kind.is_vertex_editable() || index >= self.points.len() {
            log::debug!("Ignoring vertex removal at {index} on {}", self.kind);
            return;
        }
        if self.points.len() <= self.kind.min_points() {
            log::warn!(
                "Cannot remove point from a {} with {} points",
                self.kind,
                self.points.len()
            );
            return;
        }
        self.points.remove(index);
        self.highlighted_vertex = None;
    }

    /// Move one vertex by `delta`.
    pub fn move_vertex(&mut self, index: usize, delta: Vec2) {
        if let Some(p) = self.points.get_mut(index) {
            *p += delta;
        }
    }

    /// Move one vertex to an absolute position.
    pub fn set_vertex(&mut self, index: usize, point: Point) {
        if let Some(p) = self.points.get_mut(index) {
            *p = point;
        }
    }

    /// Translate the whole shape.
    pub fn move_by(&mut self, delta: Vec2) {
        for p in &mut self.points {
            *p += delta;
        }
    }

    /// Index of the closest vertex within `tolerance`.
    pub fn nearest_vertex(&self, point: Point, tolerance: f64) -> Option<usize> {
        let mut best = None;
        let mut min_dist = f64::INFINITY;
        for (i, p) in self.points.iter().enumerate() {
            let d = distance(*p, point);
            if d <= tolerance && d < min_dist {
                min_dist = d;
                best = Some(i);
            }
        }
        best
    }

    /// Index `i` of the closest edge within `tolerance`, where edge `i` joins vertex `i - 1`
    /// to vertex `i` (edge 0 is the closing edge from the last vertex).
    pub fn nearest_edge(&self, point: Point, tolerance: f64) -> Option<usize> {
        let n = self.points.len();
        if n < 2 {
            return None;
        }
        let mut best = None;
        let mut min_dist = f64::INFINITY;
        for i in 0..n {
            let a = self.points[(i + n - 1) % n];
            let b = self.points[i];
            let d = point_to_segment_dist(point, a, b);
            if d <= tolerance && d < min_dist {
                min_dist = d;
                best = Some(i);
            }
        }
        best
    }

    /// Point-in-shape test appropriate to the kind. Lines and points contain nothing.
    pub fn contains_point(&self, point: Point) -> bool {
        match self.kind {
            ShapeKind::Polygon | ShapeKind::Linestrip => {
                if self.points.len() < 3 {
                    return false;
                }
                self.polygon_path().winding(point) % 2 != 0
            }
            ShapeKind::Rectangle => match self.points.as_slice() {
                [a, b, ..] => Rect::from_points(*a, *b).contains(point),
                _ => false,
            },
            ShapeKind::Circle => match self.circle() {
                Some(circle) => circle.contains(point),
                None => false,
            },
            ShapeKind::Line | ShapeKind::Point => false,
        }
    }

    /// The circle described by centre and rim point.
    pub fn circle(&self) -> Option<Circle> {
        match self.points.as_slice() {
            [center, rim, ..] if self.kind == ShapeKind::Circle => {
                Some(Circle::new(*center, distance(*center, *rim)))
            }
            _ => None,
        }
    }

    /// Closed path through all vertices.
    pub fn polygon_path(&self) -> BezPath {
        let mut path = BezPath::new();
        let mut iter = self.points.iter();
        if let Some(first) = iter.next() {
            path.move_to(*first);
            for p in iter {
                path.line_to(*p);
            }
            path.close_path();
        }
        path
    }

    /// Axis-aligned bounds of the drawn shape.
    pub fn bounding_rect(&self) -> Rect {
        if let Some(circle) = self.circle() {
            return circle.bounding_box();
        }
        bbox_of(&self.points).unwrap_or(Rect::ZERO)
    }

    pub fn highlighted_vertex(&self) -> Option<usize> {
        self.highlighted_vertex
    }

    pub fn highlight_mode(&self) -> HighlightMode {
        self.highlight_mode
    }

    pub fn highlight_vertex(&mut self, index: usize, mode: HighlightMode) {
        if index < self.points.len() {
            self.highlighted_vertex = Some(index);
            self.highlight_mode = mode;
        }
    }

    pub fn highlight_clear(&mut self) {
        self.highlighted_vertex = None;
    }

    fn validate_highlight(&mut self) {
        if self
            .highlighted_vertex
            .is_some_and(|i| i >= self.points.len())
        {
            self.highlighted_vertex = None;
        }
    }

    /// Copy with a fresh identifier and cleared transient state.
    pub fn duplicate(&self) -> Self {
        Self {
            id: Uuid::new_v4(),
            highlighted_vertex: None,
            selected: false,
            ..self.clone()
        }
    }

    /// Give this shape a new identifier.
    pub fn regenerate_id(&mut self) {
        self.id = Uuid::new_v4();
    }

    /// Text shown while hovering: label and content, prefixed by the track id when asked.
    pub fn hover_text(&self, with_group_id: bool) -> String {
        let mut text = String::new();
        if with_group_id {
            if let Some(id) = self.group_id {
                text.push_str(&format!("ID {id} "));
            }
        }
        text.push_str(self.label.as_deref().unwrap_or(""));
        text.push(' ');
        text.push_str(self.content.as_deref().unwrap_or(""));
        text.trim_end().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> Shape {
        Shape::with_points(
            ShapeKind::Polygon,
            vec![
                Point::new(0.0, 0.0),
                Point::new(100.0, 0.0),
                Point::new(100.0, 100.0),
                Point::new(0.0, 100.0),
            ],
        )
        .closed()
    }

    #[test]
    fn test_add_point_closes_on_first() {
        let mut shape = Shape::new(ShapeKind::Polygon);
        shape.add_point(Point::new(1.0, 1.0));
        shape.add_point(Point::new(5.0, 1.0));
        shape.add_point(Point::new(5.0, 5.0));
        assert!(!shape.is_closed());
        shape.add_point(Point::new(1.0, 1.0));
        assert!(shape.is_closed());
        assert_eq!(shape.len(), 3);
    }

    #[test]
    fn test_contains_point_polygon() {
        let shape = square();
        assert!(shape.contains_point(Point::new(50.0, 50.0)));
        assert!(!shape.contains_point(Point::new(500.0, 50.0)));
    }

    #[test]
    fn test_contains_point_concave() {
        // U shape; the notch is outside.
        let shape = Shape::with_points(
            ShapeKind::Polygon,
            vec![
                Point::new(0.0, 0.0),
                Point::new(30.0, 0.0),
                Point::new(30.0, 30.0),
                Point::new(20.0, 30.0),
                Point::new(20.0, 10.0),
                Point::new(10.0, 10.0),
                Point::new(10.0, 30.0),
                Point::new(0.0, 30.0),
            ],
        );
        assert!(shape.contains_point(Point::new(5.0, 20.0)));
        assert!(!shape.contains_point(Point::new(15.0, 20.0)));
    }

    #[test]
    fn test_contains_point_by_kind() {
        let rect = Shape::with_points(
            ShapeKind::Rectangle,
            vec![Point::new(50.0, 50.0), Point::new(10.0, 10.0)],
        );
        assert!(rect.contains_point(Point::new(20.0, 30.0)));
        assert!(!rect.contains_point(Point::new(60.0, 30.0)));

        let circle = Shape::with_points(
            ShapeKind::Circle,
            vec![Point::new(0.0, 0.0), Point::new(10.0, 0.0)],
        );
        assert!(circle.contains_point(Point::new(5.0, 5.0)));
        assert!(!circle.contains_point(Point::new(8.0, 8.0)));

        let line = Shape::with_points(
            ShapeKind::Line,
            vec![Point::new(0.0, 0.0), Point::new(10.0, 0.0)],
        );
        assert!(!line.contains_point(Point::new(5.0, 0.0)));
    }

    #[test]
    fn test_nearest_vertex_picks_closest() {
        let shape = square();
        assert_eq!(shape.nearest_vertex(Point::new(97.0, 2.0), 10.0), Some(1));
        assert_eq!(shape.nearest_vertex(Point::new(50.0, 50.0), 10.0), None);
    }

    #[test]
    fn test_nearest_edge_indexing() {
        let shape = square();
        // Top edge joins vertex 0 and 1.
        assert_eq!(shape.nearest_edge(Point::new(50.0, 3.0), 5.0), Some(1));
        // Left edge is the closing edge.
        assert_eq!(shape.nearest_edge(Point::new(2.0, 50.0), 5.0), Some(0));
        assert_eq!(shape.nearest_edge(Point::new(50.0, 50.0), 5.0), None);
    }

    #[test]
    fn test_insert_and_remove_point() {
        let mut shape = square();
        shape.insert_point(1, Point::new(50.0, 0.0));
        assert_eq!(shape.len(), 5);
        assert_eq!(shape.points()[1], Point::new(50.0, 0.0));

        shape.remove_point(1);
        assert_eq!(shape.len(), 4);

        // Out of range is a no-op.
        shape.remove_point(10);
        shape.insert_point(10, Point::new(1.0, 1.0));
        assert_eq!(shape.len(), 4);
    }

    #[test]
    fn test_remove_point_respects_minimum() {
        let mut tri = Shape::with_points(
            ShapeKind::Polygon,
            vec![Point::new(0.0, 0.0), Point::new(1.0, 0.0), Point::new(0.0, 1.0)],
        );
        tri.remove_point(0);
        assert_eq!(tri.len(), 3);
    }

    #[test]
    fn test_rectangle_rejects_vertex_edits() {
        let mut rect = Shape::with_points(
            ShapeKind::Rectangle,
            vec![Point::new(0.0, 0.0), Point::new(1.0, 1.0)],
        );
        rect.insert_point(1, Point::new(0.5, 0.0));
        assert_eq!(rect.len(), 2);
    }

    #[test]
    fn test_move_operations() {
        let mut shape = square();
        shape.move_by(Vec2::new(10.0, 5.0));
        assert_eq!(shape.points()[0], Point::new(10.0, 5.0));
        shape.move_vertex(2, Vec2::new(-10.0, 0.0));
        assert_eq!(shape.points()[2], Point::new(100.0, 105.0));
        shape.move_vertex(9, Vec2::new(1.0, 1.0));
    }

    #[test]
    fn test_bounding_rect() {
        assert_eq!(square().bounding_rect(), Rect::new(0.0, 0.0, 100.0, 100.0));
        let circle = Shape::with_points(
            ShapeKind::Circle,
            vec![Point::new(10.0, 10.0), Point::new(10.0, 15.0)],
        );
        assert_eq!(circle.bounding_rect(), Rect::new(5.0, 5.0, 15.0, 15.0));
    }

    #[test]
    fn test_highlight_invalidated_by_pop() {
        let mut shape = square();
        shape.highlight_vertex(3, HighlightMode::Near);
        assert_eq!(shape.highlighted_vertex(), Some(3));
        shape.pop_point();
        assert_eq!(shape.highlighted_vertex(), None);
        shape.highlight_vertex(7, HighlightMode::Near);
        assert_eq!(shape.highlighted_vertex(), None);
    }

    #[test]
    fn test_clone_and_duplicate_ids() {
        let shape = square();
        assert_eq!(shape.clone().id(), shape.id());
        let dup = shape.duplicate();
        assert_ne!(dup.id(), shape.id());
        assert_eq!(dup.points(), shape.points());
    }

    #[test]
    fn test_hover_text() {
        let mut shape = square().with_label("car").with_group_id(7);
        shape.content = Some("0.93".to_string());
        assert_eq!(shape.hover_text(false), "car 0.93");
        assert_eq!(shape.hover_text(true), "ID 7 car 0.93");
    }
}
