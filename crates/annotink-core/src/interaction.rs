//! Pointer and keyboard handling.
//!
//! Every handler converts surface positions to image coordinates, mutates the canvas and
//! returns the events produced, ending with a single `Repaint` when anything changed.

use crate::canvas::{Canvas, CursorHint, DragTarget};
use crate::config::{AnnotationMode, DoubleClickAction};
use crate::events::{CanvasEvent, EventSink};
use crate::geometry::{boundary_intersection, clamp_to_rect, distance};
use crate::input::{Buttons, Key, KeyEvent, Modifiers, MouseButton, PointerEvent};
use crate::prompt::{AiMode, PromptLabel};
use crate::selection::{HoverState, bounded_vertex_target, hit_test};
use crate::shapes::{HighlightMode, Shape, ShapeKind};
use kurbo::Point;

const MOVE_POINT_HINT: &str = "Click & drag to move point";

impl Canvas {
    /// Process one pointer event in surface coordinates.
    pub fn handle_pointer(&mut self, event: PointerEvent) -> Vec<CanvasEvent> {
        let mut sink = EventSink::new();
        match event {
            PointerEvent::Move {
                position, buttons, ..
            } => {
                let pos = self.viewport.screen_to_image(position);
                self.on_pointer_move(pos, buttons, &mut sink);
            }
            PointerEvent::Down {
                position,
                button,
                modifiers,
            } => {
                let pos = self.viewport.screen_to_image(position);
                self.on_pointer_down(pos, button, modifiers, &mut sink);
            }
            PointerEvent::Up {
                position,
                button,
                modifiers,
            } => {
                let pos = self.viewport.screen_to_image(position);
                self.on_pointer_up(pos, button, modifiers, &mut sink);
            }
            PointerEvent::DoubleClick { button, .. } => {
                self.on_double_click(button, &mut sink);
            }
            PointerEvent::Scroll {
                position,
                delta,
                modifiers,
            } => {
                // Zoom and scroll belong to the host's view; no repaint of our own.
                return if modifiers.ctrl {
                    vec![CanvasEvent::ZoomRequested {
                        delta: delta.y,
                        position,
                    }]
                } else {
                    vec![CanvasEvent::ScrollRequested { delta }]
                };
            }
        }
        sink.finish()
    }

    /// Process a key event.
    pub fn handle_key(&mut self, event: KeyEvent) -> Vec<CanvasEvent> {
        let mut sink = EventSink::new();
        let KeyEvent::Pressed(key) = event else {
            return sink.finish();
        };
        match key {
            Key::Enter => {
                if self.ai.is_active() {
                    log::info!(
                        "Prompt finished with {} points",
                        self.ai.points().len()
                    );
                    sink.push(CanvasEvent::AiSessionFinished);
                } else if self.tracking.is_active() {
                    self.tracking.finish();
                    sink.repaint();
                } else if self.can_close_shape() {
                    self.finalise(&mut sink);
                }
            }
            Key::Escape => {
                if self.current.is_some() {
                    self.current = None;
                    self.set_hiding(false);
                    sink.push(CanvasEvent::DrawingPolygon(false));
                }
            }
            Key::Other(_) => {}
        }
        sink.finish()
    }

    fn on_pointer_move(&mut self, pos: Point, buttons: Buttons, sink: &mut EventSink) {
        self.prev_move_point = pos;
        self.cursor = CursorHint::Default;
        sink.repaint();

        if self.is_drawing() {
            self.cursor = CursorHint::Draw;
            self.update_preview(pos);
            return;
        }

        if buttons.right {
            if !self.shadow_copies.is_empty() && self.prev_point.is_some() {
                self.cursor = CursorHint::Move;
                self.bounded_move_shapes(DragTarget::ShadowCopies, pos);
            } else if !self.selection.is_empty() {
                self.shadow_copies = self.selected_shapes().map(Shape::duplicate).collect();
            }
            return;
        }

        if buttons.left {
            if self.selected_vertex() {
                self.bounded_move_vertex(pos);
                self.moving_shape = true;
            } else if !self.selection.is_empty() && self.prev_point.is_some() {
                self.cursor = CursorHint::Move;
                if self.bounded_move_shapes(DragTarget::Selection, pos) {
                    self.moving_shape = true;
                }
            }
            return;
        }

        self.refresh_hover(pos);
        sink.push(CanvasEvent::EdgeSelected(
            self.hover.edge.is_some(),
            self.hover.shape,
        ));
        sink.push(CanvasEvent::VertexSelected(self.hover.vertex.is_some()));
    }

    fn on_pointer_down(
        &mut self,
        pos: Point,
        button: MouseButton,
        modifiers: Modifiers,
        sink: &mut EventSink,
    ) {
        match button {
            MouseButton::Left => {
                if self.is_drawing() && !self.ai.is_active() {
                    self.update_preview(pos);
                    self.press_create(pos, modifiers, sink);
                } else if matches!(self.ai.mode(), AiMode::AddPoint | AiMode::RemovePoint) {
                    if !self.out_of_image(pos) {
                        let label = if self.ai.mode() == AiMode::AddPoint {
                            PromptLabel::Foreground
                        } else {
                            PromptLabel::Background
                        };
                        self.ai.add_point(pos, label);
                        sink.push(CanvasEvent::AiPointAdded);
                    }
                } else if self.ai.mode() == AiMode::SelectRect {
                    let corner = clamp_to_rect(pos, self.image_rect());
                    if self.ai.push_corner(corner) {
                        sink.push(CanvasEvent::AiPointAdded);
                    }
                    sink.repaint();
                } else if self.tracking.is_drawing() {
                    if !self.out_of_image(pos) {
                        self.tracking.add_vertex(pos);
                    }
                    sink.repaint();
                } else {
                    self.press_edit(pos, modifiers, sink);
                }
            }
            MouseButton::Right if self.is_editing() => {
                self.press_edit(pos, modifiers, sink);
            }
            _ => {}
        }
    }

    fn press_edit(&mut self, pos: Point, modifiers: Modifiers, sink: &mut EventSink) {
        self.refresh_hover(pos);
        self.select_shape_point(pos, modifiers.ctrl, sink);
        self.prev_point = Some(pos);
        sink.repaint();
    }

    /// Add a vertex, or start or finish a shape, at the preview's end point.
    fn press_create(&mut self, pos: Point, modifiers: Modifiers, sink: &mut EventSink) {
        let end = self.line.last_point().unwrap_or(pos);
        if let Some(current) = self.current.as_mut() {
            let finish = match current.kind() {
                ShapeKind::Polygon => {
                    if current.first_point() == Some(end) && current.len() < 3 {
                        return;
                    }
                    current.add_point(end);
                    current.is_closed()
                }
                ShapeKind::Linestrip => {
                    current.add_point(end);
                    modifiers.ctrl
                }
                ShapeKind::Rectangle | ShapeKind::Circle | ShapeKind::Line => {
                    current.set_points(self.line.points().to_vec());
                    true
                }
                ShapeKind::Point => true,
            };
            if let Some(last) = current.last_point() {
                self.line.set_vertex(0, last);
            }
            if finish {
                self.finalise(sink);
            }
            sink.repaint();
        } else if !self.out_of_image(pos) {
            let mut shape = Shape::new(self.create_kind);
            shape.add_point(pos);
            self.current = Some(shape);
            if self.create_kind == ShapeKind::Point {
                self.finalise(sink);
            } else {
                self.line.set_points(vec![pos, pos]);
                self.set_hiding(true);
                sink.push(CanvasEvent::DrawingPolygon(true));
            }
        }
    }

    fn on_pointer_up(
        &mut self,
        pos: Point,
        button: MouseButton,
        modifiers: Modifiers,
        sink: &mut EventSink,
    ) {
        match button {
            MouseButton::Right => {
                sink.push(CanvasEvent::ContextMenuRequested {
                    with_shadow_copy: !self.shadow_copies.is_empty(),
                });
                self.cursor = CursorHint::Default;
            }
            MouseButton::Left => {
                if !self.selection.is_empty() {
                    self.cursor = CursorHint::Grab;
                    if self.is_editing() && modifiers.shift {
                        self.add_point_to_edge();
                    }
                } else if self.selected_vertex() {
                    if self.is_editing() && modifiers.shift {
                        self.remove_selected_point();
                    }
                } else if self.ai.pending_corner().is_some() {
                    let corner = clamp_to_rect(pos, self.image_rect());
                    if self
                        .ai
                        .finish_drag(corner, self.config.ai_rect_drag_threshold)
                    {
                        sink.push(CanvasEvent::AiPointAdded);
                    }
                }
            }
            MouseButton::Middle => {}
        }

        if self.moving_shape {
            let changed = match self.document.latest_snapshot() {
                Some(snapshot) => {
                    snapshot.len() != self.document.len()
                        || snapshot
                            .iter()
                            .zip(self.document.shapes())
                            .any(|(old, new)| old.points() != new.points())
                }
                None => true,
            };
            if changed {
                self.document.commit_snapshot();
                sink.push(CanvasEvent::ShapeMoved);
            }
            self.moving_shape = false;
            sink.push(CanvasEvent::RefreshRequested(true));
        }
        sink.repaint();
    }

    fn on_double_click(&mut self, button: MouseButton, sink: &mut EventSink) {
        if button != MouseButton::Left {
            return;
        }
        if self.config.double_click == DoubleClickAction::Close
            && self.can_close_shape()
            && self.current.as_ref().is_some_and(|c| c.len() > 3)
        {
            // The press that preceded the double click added a duplicate vertex.
            if let Some(current) = self.current.as_mut() {
                current.pop_point();
            }
            self.finalise(sink);
        }
        if self.tracking.is_drawing() {
            self.tracking.finish();
            sink.repaint();
        }
    }

    /// Move the preview line to follow the pointer while drawing.
    ///
    /// Positions outside the image are pulled back onto its border, and a polygon with at
    /// least three vertices snaps to its first vertex when the pointer comes close.
    fn update_preview(&mut self, pos: Point) {
        if self.line.kind() != self.create_kind {
            self.line = Shape::new(self.create_kind);
        }
        let image = self.viewport.image_rect();
        let tolerance = self.tolerance();
        let out_of_image = self.out_of_image(pos);
        let Some(current) = self.current.as_mut() else {
            return;
        };
        current.highlight_clear();
        let (Some(first), Some(last)) = (current.first_point(), current.last_point()) else {
            return;
        };

        let mut pos = pos;
        if out_of_image {
            pos = boundary_intersection(last, pos, image);
        } else if current.kind() == ShapeKind::Polygon
            && current.len() >= 3
            && distance(pos, first) < tolerance
        {
            pos = first;
            current.highlight_vertex(0, HighlightMode::Near);
            self.cursor = CursorHint::Point;
        }

        let points = match current.kind() {
            ShapeKind::Polygon | ShapeKind::Linestrip => vec![last, pos],
            ShapeKind::Rectangle | ShapeKind::Circle | ShapeKind::Line => vec![first, pos],
            ShapeKind::Point => vec![first],
        };
        self.line.set_points(points);
    }

    /// Hit-test the visible shapes and update hover, highlight, cursor and tooltip.
    pub(crate) fn refresh_hover(&mut self, pos: Point) {
        let tolerance = self.tolerance();
        let hit = hit_test(
            self.document
                .shapes()
                .iter()
                .filter(|s| self.is_visible(s.id())),
            pos,
            tolerance,
        );
        let Some(hit) = hit else {
            self.unhighlight();
            self.tooltip = None;
            return;
        };

        if let Some(previous) = self.hover.shape {
            if let Some(shape) = self.document.get_shape_mut(previous) {
                shape.highlight_clear();
            }
        }
        self.hover = HoverState::from(hit);
        self.prev_hover = self.hover;

        let with_group_id = self.config.annotation_mode == AnnotationMode::Video;
        let Some(shape) = self.document.get_shape_mut(hit.shape) else {
            return;
        };
        match hit.vertex {
            Some(vertex) => {
                shape.highlight_vertex(vertex, HighlightMode::Move);
                self.cursor = CursorHint::Point;
                self.tooltip = Some(MOVE_POINT_HINT.to_string());
            }
            None => {
                self.cursor = CursorHint::Grab;
                self.tooltip = Some(shape.hover_text(with_group_id));
            }
        }
    }

    /// Press in edit mode: grab a vertex, or select the topmost shape under the pointer.
    fn select_shape_point(&mut self, pos: Point, multiple: bool, sink: &mut EventSink) {
        if self.selected_vertex() {
            if let (Some(id), Some(vertex)) = (self.hover.shape, self.hover.vertex) {
                if let Some(shape) = self.document.get_shape_mut(id) {
                    shape.highlight_vertex(vertex, HighlightMode::Move);
                }
            }
        } else {
            let found = self
                .document
                .shapes()
                .iter()
                .rev()
                .find(|s| self.is_visible(s.id()) && s.contains_point(pos))
                .map(Shape::id);
            if let Some(id) = found {
                if multiple {
                    if !self.selection.contains(&id) {
                        let mut ids = self.selection.clone();
                        ids.push(id);
                        self.select_shapes_into(ids, sink);
                    }
                } else if self.selection != [id] {
                    self.select_shapes_into(vec![id], sink);
                } else {
                    self.set_hiding(true);
                }
                self.calculate_offsets(pos);
                return;
            }
        }
        self.deselect_shape_into(sink);
    }

    fn bounded_move_vertex(&mut self, pos: Point) {
        let (Some(id), Some(index)) = (self.hover.shape, self.hover.vertex) else {
            return;
        };
        let image = self.viewport.image_rect();
        let Some(shape) = self.document.get_shape_mut(id) else {
            return;
        };
        let Some(&vertex) = shape.points().get(index) else {
            return;
        };
        let target = bounded_vertex_target(vertex, pos, image);
        shape.move_vertex(index, target - vertex);
    }

    /// Insert a vertex on the last hovered edge at the pointer.
    fn add_point_to_edge(&mut self) {
        let (Some(id), Some(edge)) = (self.prev_hover.shape, self.prev_hover.edge) else {
            return;
        };
        let point = self.prev_move_point;
        let Some(shape) = self.document.get_shape_mut(id) else {
            return;
        };
        if !shape.kind().is_vertex_editable() {
            return;
        }
        shape.insert_point(edge, point);
        shape.highlight_vertex(edge, HighlightMode::Move);
        self.hover = HoverState {
            shape: Some(id),
            vertex: Some(edge),
            edge: None,
        };
        self.moving_shape = true;
    }

    /// Delete the vertex nearest the pointer on the last hovered shape.
    fn remove_selected_point(&mut self) {
        let Some(id) = self.prev_hover.shape else {
            return;
        };
        let point = self.prev_move_point;
        let tolerance = self.tolerance();
        let Some(shape) = self.document.get_shape_mut(id) else {
            return;
        };
        let Some(index) = shape.nearest_vertex(point, tolerance) else {
            return;
        };
        shape.remove_point(index);
        shape.highlight_clear();
        self.hover = HoverState {
            shape: Some(id),
            vertex: None,
            edge: None,
        };
        self.moving_shape = true;
    }
}
