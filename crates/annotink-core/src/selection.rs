//! Hit testing and image-bounded dragging.

use crate::geometry::boundary_intersection;
use crate::shapes::{Shape, ShapeId};
use kurbo::{Point, Rect, Vec2};

/// What the pointer is over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HoverState {
    pub shape: Option<ShapeId>,
    pub vertex: Option<usize>,
    pub edge: Option<usize>,
}

impl HoverState {
    pub fn is_empty(&self) -> bool {
        self.shape.is_none()
    }
}

/// Result of a hit test against the visible shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HitResult {
    pub shape: ShapeId,
    /// Vertex within pick distance, if the hit came from a vertex.
    pub vertex: Option<usize>,
    /// Edge within pick distance on the winning shape.
    pub edge: Option<usize>,
}

impl From<HitResult> for HoverState {
    fn from(hit: HitResult) -> Self {
        Self {
            shape: Some(hit.shape),
            vertex: hit.vertex,
            edge: hit.edge,
        }
    }
}

/// Find what lies under `point`, topmost shape first.
///
/// `shapes` is in z-order (back to front). A vertex within `tolerance` on any shape wins
/// over containment; otherwise the topmost shape containing the point wins. The edge is
/// looked up on the winning shape.
pub fn hit_test<'a, I>(shapes: I, point: Point, tolerance: f64) -> Option<HitResult>
where
    I: IntoIterator<Item = &'a Shape>,
    I::IntoIter: DoubleEndedIterator + Clone,
{
    let iter = shapes.into_iter();

    let vertex_hit = iter.clone().rev().find_map(|shape| {
        shape
            .nearest_vertex(point, tolerance)
            .map(|vertex| (shape, Some(vertex)))
    });
    let (shape, vertex) = match vertex_hit {
        Some(hit) => hit,
        None => (iter.rev().find(|s| s.contains_point(point))?, None),
    };

    Some(HitResult {
        shape: shape.id(),
        vertex,
        edge: shape.nearest_edge(point, tolerance),
    })
}

/// Offsets from the grab point to the top-left and bottom-right corners of `bounds`.
pub fn grab_offsets(bounds: Rect, point: Point) -> (Vec2, Vec2) {
    (
        Vec2::new(bounds.x0 - point.x, bounds.y0 - point.y),
        Vec2::new(bounds.x1 - point.x, bounds.y1 - point.y),
    )
}

/// Combined bounds of several shapes.
pub fn union_bounds<'a>(shapes: impl IntoIterator<Item = &'a Shape>) -> Option<Rect> {
    shapes
        .into_iter()
        .map(Shape::bounding_rect)
        .reduce(|a, b| a.union(b))
}

fn outside(point: Point, image: Rect) -> bool {
    !(image.x0 <= point.x && point.x <= image.x1 && image.y0 <= point.y && point.y <= image.y1)
}

/// Where a dragged vertex lands: the pointer itself, or its projection onto the image
/// boundary when the pointer left the image.
pub fn bounded_vertex_target(vertex: Point, pointer: Point, image: Rect) -> Point {
    if outside(pointer, image) {
        boundary_intersection(vertex, pointer, image)
    } else {
        pointer
    }
}

/// Translation for a shape drag from `anchor` to `pointer`.
///
/// The grab `offsets` keep the dragged bounds inside `image`. Returns `None` when the
/// pointer is outside the image or the shapes would not move.
pub fn bounded_shape_delta(
    anchor: Point,
    pointer: Point,
    offsets: (Vec2, Vec2),
    image: Rect,
) -> Option<Vec2> {
    if outside(pointer, image) {
        return None;
    }
    let mut pos = pointer;
    let top_left = pos + offsets.0;
    if outside(top_left, image) {
        pos -= Vec2::new(
            (top_left.x - image.x0).min(0.0),
            (top_left.y - image.y0).min(0.0),
        );
    }
    let bottom_right = pos + offsets.1;
    if outside(bottom_right, image) {
        pos += Vec2::new(
            (image.x1 - bottom_right.x).min(0.0),
            (image.y1 - bottom_right.y).min(0.0),
        );
    }
    let delta = pos - anchor;
    if delta == Vec2::ZERO {
        None
    } else {
        Some(delta)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::ShapeKind;

    fn image() -> Rect {
        Rect::new(0.0, 0.0, 1199.0, 799.0)
    }

    fn rect_shape(x0: f64, y0: f64, x1: f64, y1: f64) -> Shape {
        Shape::with_points(
            ShapeKind::Rectangle,
            vec![Point::new(x0, y0), Point::new(x1, y1)],
        )
        .closed()
    }

    #[test]
    fn test_hit_test_topmost_containment() {
        let below = rect_shape(0.0, 0.0, 100.0, 100.0);
        let above = rect_shape(50.0, 50.0, 150.0, 150.0);
        let shapes = vec![below.clone(), above.clone()];
        let hit = hit_test(&shapes, Point::new(75.0, 75.0), 5.0).unwrap();
        assert_eq!(hit.shape, above.id());
        assert_eq!(hit.vertex, None);

        let hit = hit_test(&shapes, Point::new(25.0, 25.0), 5.0).unwrap();
        assert_eq!(hit.shape, below.id());
        assert!(hit_test(&shapes, Point::new(500.0, 500.0), 5.0).is_none());
    }

    #[test]
    fn test_hit_test_vertex_beats_containment() {
        // The lower shape's corner lies inside the upper shape.
        let below = rect_shape(0.0, 0.0, 60.0, 60.0);
        let above = rect_shape(40.0, 40.0, 150.0, 150.0);
        let shapes = vec![below.clone(), above];
        let hit = hit_test(&shapes, Point::new(59.0, 59.0), 5.0).unwrap();
        assert_eq!(hit.shape, below.id());
        assert_eq!(hit.vertex, Some(1));
    }

    #[test]
    fn test_hit_test_reports_edge() {
        let poly = Shape::with_points(
            ShapeKind::Polygon,
            vec![
                Point::new(0.0, 0.0),
                Point::new(100.0, 0.0),
                Point::new(100.0, 100.0),
            ],
        )
        .closed();
        let shapes = [poly];
        let hit = hit_test(&shapes, Point::new(98.0, 50.0), 5.0).unwrap();
        assert_eq!(hit.vertex, None);
        assert_eq!(hit.edge, Some(2));
    }

    #[test]
    fn test_bounded_vertex_target() {
        let target = bounded_vertex_target(Point::new(5.0, 5.0), Point::new(-50.0, -50.0), image());
        assert!(target.x >= 0.0 && target.y >= 0.0);
        assert!((target - Point::ZERO).hypot() < 1e-9);
        let inside = bounded_vertex_target(Point::new(5.0, 5.0), Point::new(20.0, 30.0), image());
        assert_eq!(inside, Point::new(20.0, 30.0));
    }

    #[test]
    fn test_bounded_shape_delta_clamps() {
        // Shape spans 10..110 horizontally, grabbed at x = 60.
        let bounds = Rect::new(10.0, 10.0, 110.0, 60.0);
        let grab = Point::new(60.0, 30.0);
        let offsets = grab_offsets(bounds, grab);

        let delta = bounded_shape_delta(grab, Point::new(30.0, 30.0), offsets, image()).unwrap();
        // Left edge stops at 0.
        assert_eq!(delta, Vec2::new(-10.0, 0.0));

        let delta = bounded_shape_delta(grab, Point::new(1190.0, 790.0), offsets, image()).unwrap();
        assert_eq!(delta, Vec2::new(1089.0, 739.0));
    }

    #[test]
    fn test_bounded_shape_delta_rejects_outside_pointer() {
        let offsets = (Vec2::ZERO, Vec2::ZERO);
        assert_eq!(
            bounded_shape_delta(Point::ZERO, Point::new(-1.0, 5.0), offsets, image()),
            None
        );
        assert_eq!(
            bounded_shape_delta(Point::new(5.0, 5.0), Point::new(5.0, 5.0), offsets, image()),
            None
        );
    }
}
