//! Shape store and snapshot history.

use crate::error::{CanvasError, CanvasResult};
use crate::shapes::{Shape, ShapeId, ShapeRecord};
use kurbo::{Point, Rect};

/// Default number of snapshots kept for undo.
pub const DEFAULT_NUM_BACKUPS: usize = 10;

/// A snapshot of every shape, taken after a committed edit.
type Snapshot = Vec<Shape>;

/// Ordered shape list plus its bounded undo history.
///
/// Insertion order is z-order: later shapes draw on top and win hit tests.
#[derive(Debug, Clone)]
pub struct ShapeDocument {
    shapes: Vec<Shape>,
    history: Vec<Snapshot>,
    max_history: usize,
}

impl Default for ShapeDocument {
    fn default() -> Self {
        Self::new(DEFAULT_NUM_BACKUPS)
    }
}

impl ShapeDocument {
    /// Create an empty document keeping at most `max_history` snapshots.
    pub fn new(max_history: usize) -> Self {
        Self {
            shapes: Vec::new(),
            history: Vec::new(),
            max_history: max_history.max(1),
        }
    }

    pub fn set_max_history(&mut self, max_history: usize) {
        self.max_history = max_history.max(1);
        self.trim_history();
    }

    fn trim_history(&mut self) {
        if self.history.len() > self.max_history {
            let excess = self.history.len() - self.max_history;
            self.history.drain(..excess);
        }
    }

    /// Deep-copy the current shapes onto the history, dropping the oldest beyond the cap.
    pub fn commit_snapshot(&mut self) {
        let snapshot: Snapshot = self
            .shapes
            .iter()
            .map(|s| {
                let mut copy = s.clone();
                copy.selected = false;
                copy.highlight_clear();
                copy
            })
            .collect();
        self.history.push(snapshot);
        self.trim_history();
    }

    /// Whether there is a previous state to go back to.
    pub fn can_restore(&self) -> bool {
        self.history.len() >= 2
    }

    /// Drop the newest snapshot and make the one before it live.
    ///
    /// The restored state is no longer on the history; callers re-commit it to keep the
    /// newest snapshot equal to the live shapes.
    pub fn restore_previous(&mut self) -> CanvasResult<()> {
        if !self.can_restore() {
            return Err(CanvasError::NoHistory);
        }
        self.history.pop();
        let previous = self.history.pop().ok_or(CanvasError::NoHistory)?;
        self.shapes = previous;
        log::debug!(
            "Restored {} shapes, {} snapshots left",
            self.shapes.len(),
            self.history.len()
        );
        Ok(())
    }

    /// Forget the newest snapshot without touching the live shapes.
    pub fn discard_latest_snapshot(&mut self) -> bool {
        self.history.pop().is_some()
    }

    /// Whether the newest snapshot holds the live shapes, compared by id, label and geometry.
    pub fn snapshot_matches_live(&self) -> bool {
        self.latest_snapshot().is_some_and(|snapshot| {
            snapshot.len() == self.shapes.len()
                && snapshot.iter().zip(&self.shapes).all(|(a, b)| {
                    a.id() == b.id()
                        && a.label == b.label
                        && a.is_closed() == b.is_closed()
                        && a.points() == b.points()
                })
        })
    }

    pub fn latest_snapshot(&self) -> Option<&[Shape]> {
        self.history.last().map(Vec::as_slice)
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    pub fn shapes_mut(&mut self) -> &mut [Shape] {
        &mut self.shapes
    }

    pub fn set_shapes(&mut self, shapes: Vec<Shape>) {
        self.shapes = shapes;
    }

    pub fn add_shape(&mut self, shape: Shape) {
        self.shapes.push(shape);
    }

    pub fn extend(&mut self, shapes: impl IntoIterator<Item = Shape>) {
        self.shapes.extend(shapes);
    }

    pub fn remove_shape(&mut self, id: ShapeId) -> Option<Shape> {
        let index = self.index_of(id)?;
        Some(self.shapes.remove(index))
    }

    /// Remove and return the topmost shape.
    pub fn pop_shape(&mut self) -> Option<Shape> {
        self.shapes.pop()
    }

    pub fn clear(&mut self) {
        self.shapes.clear();
    }

    pub fn index_of(&self, id: ShapeId) -> Option<usize> {
        self.shapes.iter().position(|s| s.id() == id)
    }

    pub fn get_shape(&self, id: ShapeId) -> Option<&Shape> {
        self.shapes.iter().find(|s| s.id() == id)
    }

    pub fn get_shape_mut(&mut self, id: ShapeId) -> Option<&mut Shape> {
        self.shapes.iter_mut().find(|s| s.id() == id)
    }

    pub fn contains(&self, id: ShapeId) -> bool {
        self.index_of(id).is_some()
    }

    pub fn last_shape_mut(&mut self) -> Option<&mut Shape> {
        self.shapes.last_mut()
    }

    /// Shapes containing a point, topmost first.
    pub fn shapes_at_point(&self, point: Point) -> Vec<ShapeId> {
        self.shapes
            .iter()
            .rev()
            .filter(|s| s.contains_point(point))
            .map(Shape::id)
            .collect()
    }

    /// Bounding box of all shapes.
    pub fn bounds(&self) -> Option<Rect> {
        self.shapes
            .iter()
            .map(Shape::bounding_rect)
            .reduce(|a, b| a.union(b))
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    /// Persisted form of every shape, in z-order.
    pub fn to_records(&self) -> Vec<ShapeRecord> {
        self.shapes.iter().map(ShapeRecord::from).collect()
    }

    /// Replace the live shapes with loaded records. Nothing changes if any record is invalid.
    pub fn load_records(&mut self, records: Vec<ShapeRecord>) -> CanvasResult<()> {
        let shapes = records
            .into_iter()
            .map(Shape::try_from)
            .collect::<CanvasResult<Vec<_>>>()?;
        self.shapes = shapes;
        Ok(())
    }

    /// Serialize the shapes as a JSON array of records.
    pub fn to_json(&self) -> CanvasResult<String> {
        Ok(serde_json::to_string_pretty(&self.to_records())?)
    }

    /// Parse a JSON array of records into shapes.
    pub fn shapes_from_json(json: &str) -> CanvasResult<Vec<Shape>> {
        let records: Vec<ShapeRecord> = serde_json::from_str(json)?;
        records.into_iter().map(Shape::try_from).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::ShapeKind;

    fn point_shape(x: f64) -> Shape {
        Shape::with_points(ShapeKind::Point, vec![Point::new(x, x)]).closed()
    }

    fn xs(doc: &ShapeDocument) -> Vec<f64> {
        doc.shapes().iter().map(|s| s.points()[0].x).collect()
    }

    #[test]
    fn test_restore_ping_pong() {
        let mut doc = ShapeDocument::default();
        for x in [1.0, 2.0, 3.0] {
            doc.add_shape(point_shape(x));
            doc.commit_snapshot();
        }
        assert!(doc.can_restore());
        doc.restore_previous().unwrap();
        assert_eq!(xs(&doc), vec![1.0, 2.0]);
        // Re-commit keeps the newest snapshot equal to the live state.
        doc.commit_snapshot();
        doc.restore_previous().unwrap();
        assert_eq!(xs(&doc), vec![1.0]);
    }

    #[test]
    fn test_restore_without_history() {
        let mut doc = ShapeDocument::default();
        doc.add_shape(point_shape(1.0));
        doc.commit_snapshot();
        assert!(!doc.can_restore());
        assert_eq!(doc.restore_previous(), Err(CanvasError::NoHistory));
        assert_eq!(xs(&doc), vec![1.0]);
        assert_eq!(doc.history_len(), 1);
    }

    #[test]
    fn test_history_cap_drops_oldest() {
        let mut doc = ShapeDocument::new(3);
        for x in 0..6 {
            doc.add_shape(point_shape(x as f64));
            doc.commit_snapshot();
        }
        assert_eq!(doc.history_len(), 3);
        assert_eq!(doc.latest_snapshot().map(<[Shape]>::len), Some(6));
    }

    #[test]
    fn test_snapshot_is_deep_copy() {
        let mut doc = ShapeDocument::default();
        doc.add_shape(point_shape(1.0));
        doc.commit_snapshot();
        doc.shapes_mut()[0].move_by(kurbo::Vec2::new(5.0, 0.0));
        assert_eq!(doc.latest_snapshot().unwrap()[0].points()[0].x, 1.0);
    }

    #[test]
    fn test_shapes_at_point_topmost_first() {
        let mut doc = ShapeDocument::default();
        let square = |offset: f64| {
            Shape::with_points(
                ShapeKind::Rectangle,
                vec![Point::new(offset, offset), Point::new(offset + 10.0, offset + 10.0)],
            )
        };
        let a = square(0.0);
        let b = square(5.0);
        let (a_id, b_id) = (a.id(), b.id());
        doc.add_shape(a);
        doc.add_shape(b);
        assert_eq!(doc.shapes_at_point(Point::new(7.0, 7.0)), vec![b_id, a_id]);
        assert_eq!(doc.shapes_at_point(Point::new(2.0, 2.0)), vec![a_id]);
    }

    #[test]
    fn test_json_records_roundtrip() {
        let mut doc = ShapeDocument::default();
        doc.add_shape(point_shape(4.0).with_label("nose"));
        let json = doc.to_json().unwrap();
        let shapes = ShapeDocument::shapes_from_json(&json).unwrap();
        assert_eq!(shapes.len(), 1);
        assert_eq!(shapes[0].label.as_deref(), Some("nose"));
        assert_eq!(shapes[0].kind(), ShapeKind::Point);

        let mut other = ShapeDocument::default();
        other.load_records(doc.to_records()).unwrap();
        assert_eq!(other.len(), 1);
    }
}
