//! Render context and renderer trait.

use crate::compositor::compose;
use crate::surface::{FrameImage, Surface};
use annotink_core::canvas::Canvas;
use peniko::Color;
use thiserror::Error;

/// Renderer errors.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Image buffer holds {actual} bytes, expected {expected}")]
    InvalidImage { expected: usize, actual: usize },
    #[error("Surface error: {0}")]
    Surface(String),
}

/// Result type for renderer operations.
pub type RenderResult<T> = Result<T, RenderError>;

/// Context for a single render frame.
pub struct RenderContext<'a> {
    /// The canvas to render.
    pub canvas: &'a Canvas,
    /// Pixels of the frame; hosts that draw the image themselves leave this empty.
    pub image: Option<&'a FrameImage>,
    /// Crosshair colour.
    pub crosshair_color: Color,
    /// Current video frame index, used to draw trajectories.
    pub frame: usize,
}

impl<'a> RenderContext<'a> {
    /// Create a new render context.
    pub fn new(canvas: &'a Canvas) -> Self {
        Self {
            canvas,
            image: None,
            crosshair_color: Color::from_rgb8(0x00, 0xFF, 0x00),
            frame: canvas.current_frame(),
        }
    }

    /// Set the frame pixels.
    pub fn with_image(mut self, image: &'a FrameImage) -> Self {
        self.image = Some(image);
        self
    }

    pub fn with_crosshair_color(mut self, color: Color) -> Self {
        self.crosshair_color = color;
        self
    }

    pub fn with_frame(mut self, frame: usize) -> Self {
        self.frame = frame;
        self
    }
}

/// Something that can turn a [`RenderContext`] into draw calls.
pub trait Renderer {
    /// Build the draw calls for a frame.
    fn build_scene(&mut self, ctx: &RenderContext);
}

impl<S: Surface> Renderer for S {
    fn build_scene(&mut self, ctx: &RenderContext) {
        compose(ctx, self);
    }
}
