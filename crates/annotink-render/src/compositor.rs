//! Frame composition in a fixed draw order.

use crate::overlays::{
    paint_crosshair, paint_loading, paint_prompt_points, paint_prompt_rect,
    paint_rect_in_progress, paint_tracking_area, paint_trajectory,
};
use crate::painter::{outline_path, paint_shape, to_color};
use crate::renderer::RenderContext;
use crate::surface::{Layer, Surface};
use annotink_core::shapes::{Shape, ShapeKind};

/// Draw a frame of the canvas onto `surface`.
///
/// Order: image, trajectories and masks, committed shapes, the shape being drawn with its
/// preview line, shadow copies, the polygon fill preview, the crosshair, prompt overlays,
/// the tracking area. The loading overlay replaces everything after the image.
pub fn compose<S: Surface + ?Sized>(ctx: &RenderContext, surface: &mut S) {
    let canvas = ctx.canvas;
    if !canvas.has_image() && !canvas.loading().active {
        return;
    }
    let transform = canvas.viewport().transform();
    let scale = canvas.viewport().scale;

    if canvas.loading().active {
        surface.begin_layer(Layer::Loading);
        paint_loading(surface, transform, canvas, ctx.image);
        return;
    }

    if let Some(image) = ctx.image {
        surface.begin_layer(Layer::Image);
        surface.draw_image(transform, image);
    }

    let trajectories = canvas.trajectories();
    let visible: Vec<&Shape> = canvas
        .shapes()
        .iter()
        .filter(|s| canvas.is_shape_shown(s))
        .collect();
    if trajectories.flags.traj {
        let paths = trajectories.paths(ctx.frame, visible.iter().copied());
        if !paths.is_empty() {
            surface.begin_layer(Layer::Trajectories);
            for path in &paths {
                paint_trajectory(surface, transform, path);
            }
        }
    }
    if trajectories.flags.mask {
        surface.begin_layer(Layer::Masks);
        let alpha = trajectories.mask_alpha as f32;
        for shape in visible.iter().filter(|s| s.group_id.is_some()) {
            if let Some(path) = outline_path(shape) {
                let color = to_color(shape.colors.vertex_fill.with_alpha(255));
                surface.fill(transform, color.multiply_alpha(alpha), &path);
            }
        }
    }

    if !visible.is_empty() {
        surface.begin_layer(Layer::Shapes);
        let hovered = canvas.hover().shape;
        for shape in &visible {
            let fill = shape.selected || hovered == Some(shape.id());
            paint_shape(surface, transform, shape, scale, fill);
        }
    }

    if let Some(current) = canvas.current() {
        surface.begin_layer(Layer::Drawing);
        paint_shape(surface, transform, current, scale, false);
        paint_shape(surface, transform, canvas.preview_line(), scale, false);
    }

    if !canvas.shadow_copies().is_empty() {
        surface.begin_layer(Layer::ShadowCopies);
        for shape in canvas.shadow_copies() {
            paint_shape(surface, transform, shape, scale, false);
        }
    }

    if canvas.config().fill_drawing && canvas.create_kind() == ShapeKind::Polygon {
        if let Some(current) = canvas.current().filter(|c| c.len() >= 2) {
            let mut preview = current.clone();
            if let Some(end) = canvas.preview_line().last_point() {
                preview.add_point(end);
            }
            surface.begin_layer(Layer::FillPreview);
            paint_shape(surface, transform, &preview, scale, true);
        }
    }

    if canvas.config().show_cross_line {
        surface.begin_layer(Layer::Crosshair);
        paint_crosshair(surface, transform, canvas, ctx.crosshair_color);
    }

    let prompt = canvas.ai_prompt();
    if let Some(corner) = prompt.pending_corner() {
        surface.begin_layer(Layer::AiRectInProgress);
        paint_rect_in_progress(surface, transform, canvas, corner);
    }
    if !prompt.points().is_empty() {
        surface.begin_layer(Layer::AiPoints);
        paint_prompt_points(surface, transform, canvas);
    }
    if let Some(rect) = prompt.rect_bounds() {
        surface.begin_layer(Layer::AiRect);
        paint_prompt_rect(surface, transform, canvas, rect);
    }

    if canvas.tracking_area().is_active() && !canvas.tracking_area().polygon().is_empty() {
        surface.begin_layer(Layer::TrackingArea);
        paint_tracking_area(surface, transform, canvas);
    }
}
