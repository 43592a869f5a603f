//! Mapping between surface pixels and image pixels.

use kurbo::{Affine, Point, Rect, Size, Vec2};
use serde::{Deserialize, Serialize};

/// Zoom scale and centring of the image inside the widget.
///
/// The image is drawn scaled by `scale` and, when smaller than the widget, centred in it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub scale: f64,
    /// Size of the drawing surface in surface pixels.
    pub widget_size: Size,
    /// Size of the loaded image in image pixels.
    pub image_size: Size,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            scale: 1.0,
            widget_size: Size::ZERO,
            image_size: Size::ZERO,
        }
    }
}

impl Viewport {
    pub fn new(scale: f64, widget_size: Size, image_size: Size) -> Self {
        Self {
            scale,
            widget_size,
            image_size,
        }
    }

    /// Offset in image pixels that centres the scaled image in the widget.
    pub fn offset_to_center(&self) -> Vec2 {
        let s = self.scale;
        let w = self.image_size.width * s;
        let h = self.image_size.height * s;
        let aw = self.widget_size.width;
        let ah = self.widget_size.height;
        let x = if aw > w { (aw - w) / (2.0 * s) } else { 0.0 };
        let y = if ah > h { (ah - h) / (2.0 * s) } else { 0.0 };
        Vec2::new(x, y)
    }

    /// Image-to-surface transform handed to the drawing surface.
    pub fn transform(&self) -> Affine {
        Affine::scale(self.scale) * Affine::translate(self.offset_to_center())
    }

    /// Convert a surface position to image coordinates.
    pub fn screen_to_image(&self, point: Point) -> Point {
        (point.to_vec2() / self.scale - self.offset_to_center()).to_point()
    }

    pub fn image_to_screen(&self, point: Point) -> Point {
        self.transform() * point
    }

    /// Pixel rectangle of the image; valid coordinates run to `size - 1`.
    pub fn image_rect(&self) -> Rect {
        Rect::new(
            0.0,
            0.0,
            (self.image_size.width - 1.0).max(0.0),
            (self.image_size.height - 1.0).max(0.0),
        )
    }

    /// Whether an image point lies outside the image.
    pub fn out_of_image(&self, point: Point) -> bool {
        let r = self.image_rect();
        !(0.0 <= point.x && point.x <= r.x1 && 0.0 <= point.y && point.y <= r.y1)
    }

    /// Surface size needed to show the whole image at the current scale.
    pub fn size_hint(&self) -> Size {
        self.image_size * self.scale
    }
}
