//! Vello implementation of the drawing surface.

use crate::surface::{FrameImage, Surface};
use kurbo::{Affine, BezPath, Rect, Stroke};
use parley::layout::PositionedLayoutItem;
use parley::{FontContext, LayoutContext, StyleProperty};
use peniko::{Blob, Brush, Color, Fill};
use std::sync::Arc;
use vello::Scene;

/// Surface that records into a Vello scene.
pub struct VelloSurface {
    scene: Scene,
    /// Font context for text rendering (cached to avoid re-scanning fonts).
    font_cx: FontContext,
    layout_cx: LayoutContext<Brush>,
    /// Decoded frame, kept while the host passes the same pixels.
    image_cache: Option<(FrameImage, peniko::ImageData)>,
}

impl Default for VelloSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl VelloSurface {
    pub fn new() -> Self {
        Self {
            scene: Scene::new(),
            font_cx: FontContext::new(),
            layout_cx: LayoutContext::new(),
            image_cache: None,
        }
    }

    /// Get the built scene for rendering.
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Take ownership of the scene (resets internal scene).
    pub fn take_scene(&mut self) -> Scene {
        std::mem::take(&mut self.scene)
    }

    fn image_data(&mut self, image: &FrameImage) -> peniko::ImageData {
        if let Some((cached, data)) = &self.image_cache {
            if Arc::ptr_eq(cached.rgba(), image.rgba()) {
                return data.clone();
            }
        }
        let data = peniko::ImageData {
            data: Blob::new(image.rgba().clone()),
            format: peniko::ImageFormat::Rgba8,
            width: image.width(),
            height: image.height(),
            alpha_type: peniko::ImageAlphaType::Alpha,
        };
        self.image_cache = Some((image.clone(), data.clone()));
        data
    }
}

impl Surface for VelloSurface {
    fn fill(&mut self, transform: Affine, color: Color, path: &BezPath) {
        self.scene.fill(Fill::NonZero, transform, color, None, path);
    }

    fn stroke(&mut self, transform: Affine, stroke: &Stroke, color: Color, path: &BezPath) {
        self.scene.stroke(stroke, transform, color, None, path);
    }

    fn draw_image(&mut self, transform: Affine, image: &FrameImage) {
        let data = self.image_data(image);
        self.scene.draw_image(&data.into(), transform);
    }

    fn draw_text(&mut self, transform: Affine, text: &str, bounds: Rect, font_size: f64, color: Color) {
        if text.is_empty() {
            return;
        }
        let brush = Brush::Solid(color);
        let mut builder = self
            .layout_cx
            .ranged_builder(&mut self.font_cx, text, 1.0, false);
        builder.push_default(StyleProperty::FontSize(font_size as f32));
        builder.push_default(StyleProperty::Brush(brush.clone()));
        let mut layout = builder.build(text);
        layout.break_all_lines(None);
        layout.align(None, parley::Alignment::Start, parley::AlignmentOptions::default());

        let origin = bounds.center()
            - kurbo::Vec2::new(layout.width() as f64 / 2.0, layout.height() as f64 / 2.0);
        let text_transform = transform * Affine::translate(origin.to_vec2());

        let mut glyph_count = 0;
        for line in layout.lines() {
            for item in line.items() {
                let PositionedLayoutItem::GlyphRun(glyph_run) = item else {
                    continue;
                };
                let mut x = glyph_run.offset();
                let y = glyph_run.baseline();
                let run = glyph_run.run();
                let synthesis = run.synthesis();
                let glyph_xform = synthesis
                    .skew()
                    .map(|angle| Affine::skew(angle.to_radians().tan() as f64, 0.0));
                let glyphs: Vec<vello::Glyph> = glyph_run
                    .glyphs()
                    .map(|glyph| {
                        let gx = x + glyph.x;
                        let gy = y - glyph.y;
                        x += glyph.advance;
                        vello::Glyph {
                            id: glyph.id,
                            x: gx,
                            y: gy,
                        }
                    })
                    .collect();
                glyph_count += glyphs.len();
                if !glyphs.is_empty() {
                    self.scene
                        .draw_glyphs(run.font())
                        .brush(&brush)
                        .hint(true)
                        .transform(text_transform)
                        .glyph_transform(glyph_xform)
                        .font_size(run.font_size())
                        .normalized_coords(run.normalized_coords())
                        .draw(Fill::NonZero, glyphs.into_iter());
                }
            }
        }
        if glyph_count == 0 {
            log::debug!("No font available for overlay text {text:?}");
        }
    }
}
