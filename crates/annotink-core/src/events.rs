//! Notifications returned to the host after each state change.

use crate::shapes::ShapeId;
use kurbo::{Point, Vec2};

/// Something the host should react to.
///
/// Canvas operations mutate state first and then return the events they produced,
/// in the order they happened.
#[derive(Debug, Clone, PartialEq)]
pub enum CanvasEvent {
    /// The set of selected shapes changed.
    SelectionChanged(Vec<ShapeId>),
    /// A shape was finalised; the host usually asks for a label next.
    NewShape,
    /// A drag changed the geometry of at least one shape.
    ShapeMoved,
    /// Shapes were removed from the canvas.
    ShapesDeleted(Vec<ShapeId>),
    /// Whether a vertex is under the pointer.
    VertexSelected(bool),
    /// Whether an edge is under the pointer, and on which shape.
    EdgeSelected(bool, Option<ShapeId>),
    /// Whether a shape is being drawn.
    DrawingPolygon(bool),
    /// A prompt point or rectangle was recorded.
    AiPointAdded,
    /// The user asked to run inference on the collected prompt.
    AiSessionFinished,
    /// The host should refresh its shape views; `true` when a snapshot was committed.
    RefreshRequested(bool),
    /// Visual state changed.
    Repaint,
    /// Secondary button released; show the context menu.
    ContextMenuRequested { with_shadow_copy: bool },
    /// Ctrl+wheel over the canvas.
    ZoomRequested { delta: f64, position: Point },
    /// Plain wheel over the canvas.
    ScrollRequested { delta: Vec2 },
}

/// Accumulates events while an operation runs.
#[derive(Debug, Default)]
pub(crate) struct EventSink {
    events: Vec<CanvasEvent>,
    repaint: bool,
}

impl EventSink {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, event: CanvasEvent) {
        self.events.push(event);
    }

    /// Request a repaint without any other notification.
    pub(crate) fn repaint(&mut self) {
        self.repaint = true;
    }

    /// Collect events; a single trailing `Repaint` follows any change.
    pub(crate) fn finish(mut self) -> Vec<CanvasEvent> {
        if self.repaint || !self.events.is_empty() {
            self.events.push(CanvasEvent::Repaint);
        }
        self.events
    }
}
