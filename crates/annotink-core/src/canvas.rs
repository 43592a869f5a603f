//! Canvas state and the operations a host invokes directly.
//!
//! Pointer and keyboard handling lives in [`crate::interaction`].

use crate::config::{AnnotationMode, CanvasConfig};
use crate::document::ShapeDocument;
use crate::error::CanvasResult;
use crate::events::{CanvasEvent, EventSink};
use crate::prompt::{AiMode, AiPrompt};
use crate::selection::{HoverState, bounded_shape_delta, grab_offsets, union_bounds};
use crate::shapes::{Shape, ShapeColors, ShapeId, ShapeKind, UndoBehavior};
use crate::tracking::TrackingArea;
use crate::trajectory::Trajectories;
use crate::viewport::Viewport;
use kurbo::{Point, Rect, Size, Vec2};
use std::collections::{BTreeMap, HashMap};

/// Distance a copied shape is shifted from its original.
const COPY_SHIFT: f64 = 2.0;

/// Degrees the loading indicator turns per frame.
const LOADING_STEP_DEGREES: f64 = 5.0;

const DEFAULT_LOADING_TEXT: &str = "Loading...";

/// Edit selects and drags shapes; Create draws new ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CanvasMode {
    #[default]
    Edit,
    Create,
}

/// Cursor the host should show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CursorHint {
    #[default]
    Default,
    /// Crosshair while drawing.
    Draw,
    /// Over a vertex.
    Point,
    /// Dragging shapes.
    Move,
    /// Over a shape that can be dragged.
    Grab,
}

/// Busy overlay shown while a long operation runs.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadingState {
    pub active: bool,
    pub text: String,
    /// Rotation of the spinner in degrees.
    pub angle: f64,
}

impl Default for LoadingState {
    fn default() -> Self {
        Self {
            active: false,
            text: DEFAULT_LOADING_TEXT.to_string(),
            angle: 0.0,
        }
    }
}

/// Which set of shapes a drag moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum DragTarget {
    Selection,
    ShadowCopies,
}

/// The interactive annotation canvas.
#[derive(Debug, Clone)]
pub struct Canvas {
    pub(crate) config: CanvasConfig,
    pub(crate) document: ShapeDocument,
    pub(crate) mode: CanvasMode,
    pub(crate) create_kind: ShapeKind,
    /// Shape being drawn.
    pub(crate) current: Option<Shape>,
    /// Preview from the last vertex (or anchor corner) to the pointer.
    pub(crate) line: Shape,
    pub(crate) selection: Vec<ShapeId>,
    /// Transient duplicates dragged with the secondary button.
    pub(crate) shadow_copies: Vec<Shape>,
    pub(crate) hover: HoverState,
    pub(crate) prev_hover: HoverState,
    /// Drag anchor in image coordinates.
    pub(crate) prev_point: Option<Point>,
    /// Last pointer position in image coordinates.
    pub(crate) prev_move_point: Point,
    pub(crate) offsets: (Vec2, Vec2),
    pub(crate) moving_shape: bool,
    pub(crate) viewport: Viewport,
    pub(crate) image_loaded: bool,
    pub(crate) ai: AiPrompt,
    pub(crate) tracking: TrackingArea,
    pub(crate) trajectories: Trajectories,
    pub(crate) current_frame: usize,
    pub(crate) loading: LoadingState,
    pub(crate) visible: HashMap<ShapeId, bool>,
    pub(crate) hide_background: bool,
    /// Effective hiding of unselected shapes.
    pub(crate) hiding: bool,
    pub(crate) cursor: CursorHint,
    pub(crate) tooltip: Option<String>,
}

impl Default for Canvas {
    fn default() -> Self {
        Self::with_config(CanvasConfig::default())
    }
}

impl Canvas {
    /// Create a canvas after validating the configuration.
    pub fn new(config: CanvasConfig) -> CanvasResult<Self> {
        if let Err(err) = config.validate() {
            log::warn!("Rejected canvas configuration: {err}");
            return Err(err);
        }
        Ok(Self::with_config(config))
    }

    fn with_config(config: CanvasConfig) -> Self {
        let create_kind = ShapeKind::default();
        Self {
            document: ShapeDocument::new(config.num_backups),
            config,
            mode: CanvasMode::Edit,
            create_kind,
            current: None,
            line: Shape::new(create_kind),
            selection: Vec::new(),
            shadow_copies: Vec::new(),
            hover: HoverState::default(),
            prev_hover: HoverState::default(),
            prev_point: None,
            prev_move_point: Point::ZERO,
            offsets: (Vec2::ZERO, Vec2::ZERO),
            moving_shape: false,
            viewport: Viewport::default(),
            image_loaded: false,
            ai: AiPrompt::new(),
            tracking: TrackingArea::new(),
            trajectories: Trajectories::new(),
            current_frame: 0,
            loading: LoadingState::default(),
            visible: HashMap::new(),
            hide_background: false,
            hiding: false,
            cursor: CursorHint::Default,
            tooltip: None,
        }
    }

    pub fn config(&self) -> &CanvasConfig {
        &self.config
    }

    pub fn set_fill_drawing(&mut self, value: bool) {
        self.config.fill_drawing = value;
    }

    pub fn set_show_cross_line(&mut self, enabled: bool) {
        self.config.show_cross_line = enabled;
    }

    pub fn set_annotation_mode(&mut self, mode: AnnotationMode) {
        self.config.annotation_mode = mode;
    }

    pub fn document(&self) -> &ShapeDocument {
        &self.document
    }

    pub fn shapes(&self) -> &[Shape] {
        self.document.shapes()
    }

    pub fn shape(&self, id: ShapeId) -> Option<&Shape> {
        self.document.get_shape(id)
    }

    // --- Modes -----------------------------------------------------------

    pub fn mode(&self) -> CanvasMode {
        self.mode
    }

    pub fn is_drawing(&self) -> bool {
        self.mode == CanvasMode::Create
    }

    pub fn is_editing(&self) -> bool {
        self.mode == CanvasMode::Edit
    }

    /// Switch between editing and creating. Entering Create drops hover and selection.
    pub fn set_editing(&mut self, editing: bool) -> Vec<CanvasEvent> {
        let mut sink = EventSink::new();
        if editing {
            self.mode = CanvasMode::Edit;
        } else {
            self.mode = CanvasMode::Create;
            self.unhighlight();
            self.deselect_shape_into(&mut sink);
        }
        sink.repaint();
        sink.finish()
    }

    pub fn create_kind(&self) -> ShapeKind {
        self.create_kind
    }

    pub fn set_create_kind(&mut self, kind: ShapeKind) {
        self.create_kind = kind;
        self.line = Shape::new(kind);
    }

    /// Set the kind to draw from its name. Unknown names are rejected.
    pub fn set_create_mode(&mut self, name: &str) -> CanvasResult<()> {
        let kind = name.parse::<ShapeKind>().inspect_err(|err| {
            log::warn!("{err}");
        })?;
        self.set_create_kind(kind);
        Ok(())
    }

    // --- Drawing state ---------------------------------------------------

    pub fn current(&self) -> Option<&Shape> {
        self.current.as_ref()
    }

    pub fn preview_line(&self) -> &Shape {
        &self.line
    }

    /// Whether the shape being drawn has enough vertices to close.
    pub fn can_close_shape(&self) -> bool {
        self.is_drawing() && self.current.as_ref().is_some_and(|c| c.len() > 2)
    }

    /// Close the shape being drawn and commit it.
    pub(crate) fn finalise(&mut self, sink: &mut EventSink) {
        let Some(mut shape) = self.current.take() else {
            return;
        };
        shape.close();
        shape.highlight_clear();
        log::debug!("Finalised {} with {} points", shape.kind(), shape.len());
        self.document.add_shape(shape);
        self.document.commit_snapshot();
        self.set_hiding(false);
        sink.push(CanvasEvent::NewShape);
        sink.push(CanvasEvent::DrawingPolygon(false));
    }

    /// Drop the shape being drawn.
    pub fn cancel_manual_drawing(&mut self) -> Vec<CanvasEvent> {
        let mut sink = EventSink::new();
        self.current = None;
        self.set_hiding(false);
        sink.push(CanvasEvent::DrawingPolygon(false));
        sink.finish()
    }

    /// Remove the last vertex of the shape being drawn, cancelling it when none remain.
    pub fn undo_last_point(&mut self) -> Vec<CanvasEvent> {
        let mut sink = EventSink::new();
        let Some(current) = self.current.as_mut() else {
            return sink.finish();
        };
        if current.is_closed() {
            return sink.finish();
        }
        current.pop_point();
        match current.last_point() {
            Some(last) => self.line.set_vertex(0, last),
            None => {
                self.current = None;
                sink.push(CanvasEvent::DrawingPolygon(false));
            }
        }
        sink.repaint();
        sink.finish()
    }

    /// Take the newest committed shape back into drawing.
    ///
    /// Polygons and line strips reopen with all vertices; rectangles, circles and lines keep
    /// their first corner; points are dropped. The canvas switches to Create mode.
    ///
    /// The newest snapshot is dropped when it recorded the shape; afterwards the newest
    /// snapshot always equals the live shapes.
    pub fn undo_last_line(&mut self) -> Vec<CanvasEvent> {
        let mut sink = EventSink::new();
        let recorded = self.document.snapshot_matches_live();
        let Some(mut shape) = self.document.pop_shape() else {
            return sink.finish();
        };
        if recorded {
            self.document.discard_latest_snapshot();
        }
        if !self.document.snapshot_matches_live() {
            self.document.commit_snapshot();
        }
        self.selection.retain(|id| *id != shape.id());
        if self.mode != CanvasMode::Create {
            self.mode = CanvasMode::Create;
            self.unhighlight();
            self.deselect_shape_into(&mut sink);
        }
        shape.set_open();
        shape.selected = false;
        self.set_create_kind(shape.kind());

        match shape.kind().rules().undo {
            UndoBehavior::Reopen => {
                if let (Some(first), Some(last)) = (shape.first_point(), shape.last_point()) {
                    self.line.set_points(vec![last, first]);
                }
                self.current = Some(shape);
            }
            UndoBehavior::TruncateToFirst => {
                if let Some(first) = shape.first_point() {
                    shape.set_points(vec![first]);
                    self.line.set_points(vec![first, first]);
                }
                self.current = Some(shape);
            }
            UndoBehavior::Discard => self.current = None,
        }
        sink.push(CanvasEvent::DrawingPolygon(self.current.is_some()));
        sink.finish()
    }

    // --- Selection -------------------------------------------------------

    pub fn selection(&self) -> &[ShapeId] {
        &self.selection
    }

    pub fn selected_shapes(&self) -> impl Iterator<Item = &Shape> {
        self.selection
            .iter()
            .filter_map(|id| self.document.get_shape(*id))
    }

    pub fn is_selected(&self, id: ShapeId) -> bool {
        self.selection.contains(&id)
    }

    pub fn shadow_copies(&self) -> &[Shape] {
        &self.shadow_copies
    }

    /// Select exactly these shapes. Unknown ids are skipped.
    pub fn select_shapes(&mut self, ids: &[ShapeId]) -> Vec<CanvasEvent> {
        let mut sink = EventSink::new();
        self.select_shapes_into(ids.to_vec(), &mut sink);
        sink.finish()
    }

    pub(crate) fn select_shapes_into(&mut self, ids: Vec<ShapeId>, sink: &mut EventSink) {
        self.set_hiding(true);
        for shape in self.document.shapes_mut() {
            shape.selected = false;
        }
        let ids: Vec<ShapeId> = ids
            .into_iter()
            .filter(|id| self.document.contains(*id))
            .collect();
        for id in &ids {
            if let Some(shape) = self.document.get_shape_mut(*id) {
                shape.selected = true;
            }
        }
        self.selection = ids.clone();
        sink.push(CanvasEvent::SelectionChanged(ids));
    }

    pub fn deselect_shape(&mut self) -> Vec<CanvasEvent> {
        let mut sink = EventSink::new();
        self.deselect_shape_into(&mut sink);
        sink.finish()
    }

    pub(crate) fn deselect_shape_into(&mut self, sink: &mut EventSink) {
        if self.selection.is_empty() {
            return;
        }
        self.set_hiding(false);
        for shape in self.document.shapes_mut() {
            shape.selected = false;
        }
        self.selection.clear();
        sink.push(CanvasEvent::SelectionChanged(Vec::new()));
    }

    /// Remove every selected shape and commit.
    pub fn delete_selected(&mut self) -> Vec<CanvasEvent> {
        let mut sink = EventSink::new();
        if self.selection.is_empty() {
            return sink.finish();
        }
        let ids = std::mem::take(&mut self.selection);
        for id in &ids {
            self.document.remove_shape(*id);
            self.visible.remove(id);
        }
        self.document.commit_snapshot();
        self.set_hiding(false);
        log::debug!("Deleted {} shapes", ids.len());
        sink.push(CanvasEvent::ShapesDeleted(ids));
        sink.push(CanvasEvent::SelectionChanged(Vec::new()));
        sink.finish()
    }

    /// Remove one shape and commit.
    pub fn delete_shape(&mut self, id: ShapeId) -> Vec<CanvasEvent> {
        let mut sink = EventSink::new();
        let was_selected = self.selection.contains(&id);
        self.selection.retain(|s| *s != id);
        if self.document.remove_shape(id).is_some() {
            self.visible.remove(&id);
            self.document.commit_snapshot();
            sink.push(CanvasEvent::ShapesDeleted(vec![id]));
            if was_selected {
                sink.push(CanvasEvent::SelectionChanged(self.selection.clone()));
            }
        }
        sink.finish()
    }

    /// Duplicate the selection a couple of pixels away and select the duplicates.
    pub fn copy_selected_shapes(&mut self) -> Vec<CanvasEvent> {
        if self.selection.is_empty() {
            return Vec::new();
        }
        self.shadow_copies = self.selected_shapes().map(Shape::duplicate).collect();
        self.bounded_shift_shadow_copies();
        self.end_move(true)
    }

    /// Shift the shadow copies diagonally up-left, or down-right when that is blocked.
    fn bounded_shift_shadow_copies(&mut self) {
        let Some(point) = self
            .shadow_copies
            .first()
            .and_then(|s| s.first_point())
        else {
            return;
        };
        let offset = Vec2::new(COPY_SHIFT, COPY_SHIFT);
        self.offsets = (Vec2::ZERO, Vec2::ZERO);
        self.prev_point = Some(point);
        if !self.bounded_move_shapes(DragTarget::ShadowCopies, point - offset) {
            self.bounded_move_shapes(DragTarget::ShadowCopies, point + offset);
        }
    }

    /// Finish a shadow-copy drag: add the copies as new shapes, or move the originals to
    /// where the copies are.
    pub fn end_move(&mut self, copy: bool) -> Vec<CanvasEvent> {
        let mut sink = EventSink::new();
        if self.selection.is_empty()
            || self.shadow_copies.is_empty()
            || self.shadow_copies.len() != self.selection.len()
        {
            log::debug!("No shadow copies to apply");
            return sink.finish();
        }
        let copies = std::mem::take(&mut self.shadow_copies);
        if copy {
            for id in &self.selection {
                if let Some(shape) = self.document.get_shape_mut(*id) {
                    shape.selected = false;
                }
            }
            let ids: Vec<ShapeId> = copies.iter().map(Shape::id).collect();
            for mut shape in copies {
                shape.selected = true;
                self.document.add_shape(shape);
            }
            self.selection = ids.clone();
            sink.push(CanvasEvent::SelectionChanged(ids));
        } else {
            for (id, copy) in self.selection.iter().zip(copies) {
                if let Some(shape) = self.document.get_shape_mut(*id) {
                    shape.set_points(copy.points().to_vec());
                }
            }
            sink.push(CanvasEvent::ShapeMoved);
        }
        self.document.commit_snapshot();
        sink.push(CanvasEvent::RefreshRequested(true));
        sink.finish()
    }

    /// Cancel a shadow-copy drag.
    pub fn discard_shadow_copies(&mut self) -> Vec<CanvasEvent> {
        let mut sink = EventSink::new();
        if !self.shadow_copies.is_empty() {
            self.shadow_copies.clear();
            sink.repaint();
        }
        sink.finish()
    }

    /// Translate the selection or the shadow copies towards `pos`, keeping them in the image.
    pub(crate) fn bounded_move_shapes(&mut self, target: DragTarget, pos: Point) -> bool {
        let Some(anchor) = self.prev_point else {
            return false;
        };
        let image = self.viewport.image_rect();
        let Some(delta) = bounded_shape_delta(anchor, pos, self.offsets, image) else {
            return false;
        };
        match target {
            DragTarget::Selection => {
                for id in &self.selection {
                    if let Some(shape) = self.document.get_shape_mut(*id) {
                        shape.move_by(delta);
                    }
                }
            }
            DragTarget::ShadowCopies => {
                for shape in &mut self.shadow_copies {
                    shape.move_by(delta);
                }
            }
        }
        self.prev_point = Some(anchor + delta);
        true
    }

    /// Record grab offsets so the selection's bounds stay inside the image while dragging.
    pub(crate) fn calculate_offsets(&mut self, point: Point) {
        if let Some(bounds) = union_bounds(self.selected_shapes()) {
            self.offsets = grab_offsets(bounds, point);
        }
    }

    // --- Hover -----------------------------------------------------------

    pub fn hover(&self) -> HoverState {
        self.hover
    }

    pub fn cursor(&self) -> CursorHint {
        self.cursor
    }

    /// Hint text for whatever is under the pointer.
    pub fn tooltip(&self) -> Option<&str> {
        self.tooltip.as_deref()
    }

    /// Whether the hovered vertex still exists.
    pub fn selected_vertex(&self) -> bool {
        match (self.hover.shape, self.hover.vertex) {
            (Some(id), Some(index)) => self
                .document
                .get_shape(id)
                .is_some_and(|s| index < s.len()),
            _ => false,
        }
    }

    /// Clear hover state, remembering it as the previous hover.
    pub fn unhighlight(&mut self) {
        if let Some(id) = self.hover.shape {
            if let Some(shape) = self.document.get_shape_mut(id) {
                shape.highlight_clear();
            }
        }
        self.prev_hover = self.hover;
        self.hover = HoverState::default();
    }

    // --- Image and viewport ----------------------------------------------

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn set_scale(&mut self, scale: f64) {
        if scale > 0.0 {
            self.viewport.scale = scale;
        }
    }

    pub fn set_widget_size(&mut self, size: Size) {
        self.viewport.widget_size = size;
    }

    /// Pick distance in image pixels.
    pub fn tolerance(&self) -> f64 {
        self.config.epsilon / self.viewport.scale
    }

    /// Show a new image of `width` x `height` pixels.
    pub fn load_image(&mut self, width: u32, height: u32, clear_shapes: bool) -> Vec<CanvasEvent> {
        let mut sink = EventSink::new();
        self.viewport.image_size = Size::new(f64::from(width), f64::from(height));
        self.image_loaded = true;
        if clear_shapes {
            self.document.clear();
            self.visible.clear();
            self.selection.clear();
            self.hover = HoverState::default();
            self.prev_hover = HoverState::default();
        }
        sink.repaint();
        sink.finish()
    }

    pub fn has_image(&self) -> bool {
        self.image_loaded
    }

    pub fn image_rect(&self) -> Rect {
        self.viewport.image_rect()
    }

    pub fn out_of_image(&self, point: Point) -> bool {
        self.viewport.out_of_image(point)
    }

    /// Pointer position in image coordinates as of the last move.
    pub fn pointer(&self) -> Point {
        self.prev_move_point
    }

    // --- Shape list management -------------------------------------------

    /// Replace or extend the shapes and commit a snapshot.
    pub fn load_shapes(&mut self, shapes: Vec<Shape>, replace: bool) -> Vec<CanvasEvent> {
        let mut sink = EventSink::new();
        if replace {
            self.document.set_shapes(shapes);
        } else {
            self.document.extend(shapes);
        }
        self.document.commit_snapshot();
        self.current = None;
        self.hover = HoverState::default();
        let document = &self.document;
        self.selection.retain(|id| document.contains(*id));
        sink.repaint();
        sink.finish()
    }

    /// Parse persisted records and load them.
    pub fn load_shapes_json(&mut self, json: &str, replace: bool) -> CanvasResult<Vec<CanvasEvent>> {
        let shapes = ShapeDocument::shapes_from_json(json)?;
        Ok(self.load_shapes(shapes, replace))
    }

    /// Label the newest shape, rewriting the newest snapshot to match.
    pub fn set_last_label(
        &mut self,
        label: &str,
        flags: BTreeMap<String, bool>,
    ) -> Option<ShapeId> {
        let shape = self.document.last_shape_mut()?;
        shape.label = Some(label.to_string());
        shape.colors = ShapeColors::for_label(label);
        shape.flags = flags;
        let id = shape.id();
        self.document.discard_latest_snapshot();
        self.document.commit_snapshot();
        Some(id)
    }

    /// Go back to the previous committed state.
    ///
    /// The restored state is committed again so the history keeps ending with the live
    /// shapes. Fails with [`CanvasError::NoHistory`] when there is nothing to go back to.
    pub fn undo_shape_edit(&mut self) -> CanvasResult<Vec<CanvasEvent>> {
        let mut sink = EventSink::new();
        self.document.restore_previous()?;
        if !self.selection.is_empty() {
            self.selection.clear();
            sink.push(CanvasEvent::SelectionChanged(Vec::new()));
        }
        for shape in self.document.shapes_mut() {
            shape.selected = false;
        }
        self.shadow_copies.clear();
        self.hover = HoverState::default();
        self.set_hiding(false);
        self.document.commit_snapshot();
        log::info!("Undo restored {} shapes", self.document.len());
        sink.push(CanvasEvent::RefreshRequested(true));
        Ok(sink.finish())
    }

    pub fn can_undo(&self) -> bool {
        self.document.can_restore()
    }

    /// Forget the image and the history.
    pub fn reset_state(&mut self) {
        self.image_loaded = false;
        self.viewport.image_size = Size::ZERO;
        self.document.clear_history();
        self.current = None;
        self.shadow_copies.clear();
        self.hover = HoverState::default();
        self.prev_hover = HoverState::default();
        self.moving_shape = false;
        self.cursor = CursorHint::Default;
    }

    // --- Visibility ------------------------------------------------------

    pub fn set_shape_visible(&mut self, id: ShapeId, visible: bool) {
        self.visible.insert(id, visible);
    }

    pub fn is_visible(&self, id: ShapeId) -> bool {
        self.visible.get(&id).copied().unwrap_or(true)
    }

    /// Hide unselected shapes while something is selected or being drawn.
    pub fn hide_background_shapes(&mut self, value: bool) {
        self.hide_background = value;
        if !self.selection.is_empty() {
            self.set_hiding(true);
        }
    }

    pub(crate) fn set_hiding(&mut self, enable: bool) {
        self.hiding = enable && self.hide_background;
    }

    /// Whether a shape is painted.
    pub fn is_shape_shown(&self, shape: &Shape) -> bool {
        (shape.selected || !self.hiding) && self.is_visible(shape.id())
    }

    // --- AI prompt -------------------------------------------------------

    pub fn ai_prompt(&self) -> &AiPrompt {
        &self.ai
    }

    pub fn set_ai_mode(&mut self, mode: AiMode) -> Vec<CanvasEvent> {
        let mut sink = EventSink::new();
        self.ai.set_mode(mode);
        sink.repaint();
        sink.finish()
    }

    pub fn clear_ai_prompt(&mut self) -> Vec<CanvasEvent> {
        let mut sink = EventSink::new();
        self.ai.clear();
        sink.repaint();
        sink.finish()
    }

    /// Add shapes returned by the segmentation service as one committed edit.
    pub fn accept_ai_shapes(&mut self, shapes: Vec<Shape>) -> Vec<CanvasEvent> {
        let mut sink = EventSink::new();
        self.ai.clear();
        if shapes.is_empty() {
            sink.repaint();
            return sink.finish();
        }
        let count = shapes.len();
        for mut shape in shapes {
            shape.close();
            self.document.add_shape(shape);
        }
        self.document.commit_snapshot();
        self.set_hiding(false);
        log::info!("Accepted {count} segmented shapes");
        sink.push(CanvasEvent::NewShape);
        sink.finish()
    }

    // --- Tracking area, trajectories, loading ----------------------------

    pub fn tracking_area(&self) -> &TrackingArea {
        &self.tracking
    }

    pub fn start_tracking_area(&mut self) -> Vec<CanvasEvent> {
        let mut sink = EventSink::new();
        self.tracking.start_drawing();
        sink.repaint();
        sink.finish()
    }

    pub fn clear_tracking_area(&mut self) -> Vec<CanvasEvent> {
        let mut sink = EventSink::new();
        self.tracking.clear();
        sink.repaint();
        sink.finish()
    }

    pub fn trajectories(&self) -> &Trajectories {
        &self.trajectories
    }

    pub fn trajectories_mut(&mut self) -> &mut Trajectories {
        &mut self.trajectories
    }

    pub fn current_frame(&self) -> usize {
        self.current_frame
    }

    /// Move to a video frame and record the centres of its tracked shapes.
    pub fn set_current_frame(&mut self, frame: usize) {
        self.current_frame = frame;
        self.trajectories
            .record_shapes(frame, self.document.shapes().iter());
    }

    pub fn loading(&self) -> &LoadingState {
        &self.loading
    }

    pub fn set_loading(&mut self, active: bool, text: Option<&str>) -> Vec<CanvasEvent> {
        let mut sink = EventSink::new();
        self.loading.active = active;
        self.loading.text = text.unwrap_or(DEFAULT_LOADING_TEXT).to_string();
        sink.repaint();
        sink.finish()
    }

    /// Turn the spinner one step.
    pub fn advance_loading_animation(&mut self) {
        self.loading.angle += LOADING_STEP_DEGREES;
        if self.loading.angle >= 360.0 {
            self.loading.angle = 0.0;
        }
    }
}
