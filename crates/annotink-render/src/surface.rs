//! Drawing surface abstraction and a recording implementation.

use crate::renderer::{RenderError, RenderResult};
use kurbo::{Affine, BezPath, Circle, Point, Rect, Shape as _, Stroke};
use peniko::Color;
use std::sync::Arc;

/// Tolerance used when flattening curves into paths.
const PATH_TOLERANCE: f64 = 0.1;

/// Stage of the frame being drawn, reported to the surface before its primitives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layer {
    Image,
    Trajectories,
    Masks,
    Shapes,
    Drawing,
    ShadowCopies,
    FillPreview,
    Crosshair,
    AiRectInProgress,
    AiPoints,
    AiRect,
    TrackingArea,
    Loading,
}

/// Decoded RGBA8 pixels of the frame under annotation.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameImage {
    width: u32,
    height: u32,
    rgba: Arc<Vec<u8>>,
}

impl FrameImage {
    /// Wrap raw pixels. The buffer must hold exactly `width * height * 4` bytes.
    pub fn new(width: u32, height: u32, rgba: Vec<u8>) -> RenderResult<Self> {
        let expected = width as usize * height as usize * 4;
        if rgba.len() != expected {
            return Err(RenderError::InvalidImage {
                expected,
                actual: rgba.len(),
            });
        }
        Ok(Self {
            width,
            height,
            rgba: Arc::new(rgba),
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn rgba(&self) -> &Arc<Vec<u8>> {
        &self.rgba
    }
}

/// Target of the compositor.
///
/// Every call receives the image-to-surface transform; geometry is in image pixels.
pub trait Surface {
    /// Called before the primitives of each layer.
    fn begin_layer(&mut self, _layer: Layer) {}

    fn fill(&mut self, transform: Affine, color: Color, path: &BezPath);

    fn stroke(&mut self, transform: Affine, stroke: &Stroke, color: Color, path: &BezPath);

    fn draw_image(&mut self, transform: Affine, image: &FrameImage);

    /// Draw `text` centred in `bounds`.
    fn draw_text(&mut self, transform: Affine, text: &str, bounds: Rect, font_size: f64, color: Color);

    fn fill_polygon(&mut self, transform: Affine, color: Color, points: &[Point]) {
        if let Some(path) = polyline_path(points, true) {
            self.fill(transform, color, &path);
        }
    }

    fn stroke_polyline(
        &mut self,
        transform: Affine,
        stroke: &Stroke,
        color: Color,
        points: &[Point],
        closed: bool,
    ) {
        if let Some(path) = polyline_path(points, closed) {
            self.stroke(transform, stroke, color, &path);
        }
    }

    fn stroke_line(&mut self, transform: Affine, stroke: &Stroke, color: Color, from: Point, to: Point) {
        self.stroke_polyline(transform, stroke, color, &[from, to], false);
    }

    fn stroke_rect(&mut self, transform: Affine, stroke: &Stroke, color: Color, rect: Rect) {
        self.stroke(transform, stroke, color, &rect.to_path(PATH_TOLERANCE));
    }

    fn fill_rect(&mut self, transform: Affine, color: Color, rect: Rect) {
        self.fill(transform, color, &rect.to_path(PATH_TOLERANCE));
    }

    fn stroke_ellipse(
        &mut self,
        transform: Affine,
        stroke: &Stroke,
        color: Color,
        center: Point,
        radius: f64,
    ) {
        let path = Circle::new(center, radius).to_path(PATH_TOLERANCE);
        self.stroke(transform, stroke, color, &path);
    }

    fn fill_ellipse(&mut self, transform: Affine, color: Color, center: Point, radius: f64) {
        let path = Circle::new(center, radius).to_path(PATH_TOLERANCE);
        self.fill(transform, color, &path);
    }
}

/// Path through `points`, closed back to the first when asked.
pub fn polyline_path(points: &[Point], closed: bool) -> Option<BezPath> {
    let (first, rest) = points.split_first()?;
    let mut path = BezPath::new();
    path.move_to(*first);
    for p in rest {
        path.line_to(*p);
    }
    if closed {
        path.close_path();
    }
    Some(path)
}

/// One primitive captured by [`CommandRecorder`].
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Layer(Layer),
    Fill {
        transform: Affine,
        color: Color,
        path: BezPath,
    },
    Stroke {
        transform: Affine,
        width: f64,
        dashed: bool,
        color: Color,
        path: BezPath,
    },
    Image {
        transform: Affine,
        width: u32,
        height: u32,
    },
    Text {
        transform: Affine,
        text: String,
        bounds: Rect,
        font_size: f64,
        color: Color,
    },
}

/// Surface that stores draw calls instead of rasterizing them.
#[derive(Debug, Default)]
pub struct CommandRecorder {
    commands: Vec<DrawCommand>,
}

impl CommandRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn take_commands(&mut self) -> Vec<DrawCommand> {
        std::mem::take(&mut self.commands)
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }

    /// Layers in the order they were started.
    pub fn layers(&self) -> Vec<Layer> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Layer(layer) => Some(*layer),
                _ => None,
            })
            .collect()
    }

    /// Commands drawn inside `layer`.
    pub fn layer_commands(&self, layer: Layer) -> Vec<&DrawCommand> {
        let mut inside = false;
        let mut result = Vec::new();
        for command in &self.commands {
            match command {
                DrawCommand::Layer(l) => inside = *l == layer,
                other if inside => result.push(other),
                _ => {}
            }
        }
        result
    }
}

impl Surface for CommandRecorder {
    fn begin_layer(&mut self, layer: Layer) {
        self.commands.push(DrawCommand::Layer(layer));
    }

    fn fill(&mut self, transform: Affine, color: Color, path: &BezPath) {
        self.commands.push(DrawCommand::Fill {
            transform,
            color,
            path: path.clone(),
        });
    }

    fn stroke(&mut self, transform: Affine, stroke: &Stroke, color: Color, path: &BezPath) {
        self.commands.push(DrawCommand::Stroke {
            transform,
            width: stroke.width,
            dashed: !stroke.dash_pattern.is_empty(),
            color,
            path: path.clone(),
        });
    }

    fn draw_image(&mut self, transform: Affine, image: &FrameImage) {
        self.commands.push(DrawCommand::Image {
            transform,
            width: image.width(),
            height: image.height(),
        });
    }

    fn draw_text(&mut self, transform: Affine, text: &str, bounds: Rect, font_size: f64, color: Color) {
        self.commands.push(DrawCommand::Text {
            transform,
            text: text.to_string(),
            bounds,
            font_size,
            color,
        });
    }
}
