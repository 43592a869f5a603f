//! Guides and overlays drawn on top of the shapes.

use crate::painter::{pen_width, to_color};
use crate::surface::{FrameImage, Surface};
use annotink_core::canvas::Canvas;
use annotink_core::geometry::clamp_to_rect;
use annotink_core::prompt::PromptLabel;
use annotink_core::tracking::TrackingState;
use annotink_core::trajectory::TrajectoryPath;
use kurbo::{Affine, Cap, Point, Rect, Stroke};
use peniko::Color;

const FOREGROUND_POINT: Color = Color::from_rgb8(0x19, 0xEB, 0x25);
const BACKGROUND_POINT: Color = Color::from_rgb8(0xFF, 0x00, 0x00);
const RECT_IN_PROGRESS: Color = Color::from_rgb8(0xFF, 0x00, 0x00);
const PROMPT_RECT: Color = Color::from_rgb8(0x2D, 0x7C, 0xFA);
const TRACKING_AREA: Color = Color::from_rgb8(0xFF, 0x00, 0x00);
const OVERLAY_OPACITY: f32 = 0.8;

/// Radius of the black markers along a trajectory, in image pixels.
const TRAJECTORY_DOT_RADIUS: f64 = 3.0;

/// Dashed guides through the pointer across the whole image.
pub fn paint_crosshair<S: Surface + ?Sized>(
    surface: &mut S,
    transform: Affine,
    canvas: &Canvas,
    color: Color,
) {
    let scale = canvas.viewport().scale;
    let size = canvas.viewport().image_size;
    let pointer = canvas.pointer();
    let width = pen_width(scale);
    let stroke = Stroke::new(width).with_dashes(0.0, [4.0 * width, 2.0 * width]);
    let color = color.multiply_alpha(0.5);
    surface.stroke_line(
        transform,
        &stroke,
        color,
        Point::new(pointer.x, 0.0),
        Point::new(pointer.x, size.height),
    );
    surface.stroke_line(
        transform,
        &stroke,
        color,
        Point::new(0.0, pointer.y),
        Point::new(size.width, pointer.y),
    );
}

/// Box from the first prompt corner to the pointer.
pub fn paint_rect_in_progress<S: Surface + ?Sized>(
    surface: &mut S,
    transform: Affine,
    canvas: &Canvas,
    corner: Point,
) {
    let pointer = clamp_to_rect(canvas.pointer(), canvas.image_rect());
    let stroke = Stroke::new(2.0 * pen_width(canvas.viewport().scale));
    surface.stroke_rect(
        transform,
        &stroke,
        RECT_IN_PROGRESS.multiply_alpha(OVERLAY_OPACITY),
        Rect::from_points(corner, pointer),
    );
}

/// Prompt points: green for foreground, red for background.
pub fn paint_prompt_points<S: Surface + ?Sized>(surface: &mut S, transform: Affine, canvas: &Canvas) {
    let diameter = 5.0 * pen_width(canvas.viewport().scale);
    for point in canvas.ai_prompt().points() {
        let color = match point.label {
            PromptLabel::Foreground => FOREGROUND_POINT,
            PromptLabel::Background => BACKGROUND_POINT,
        };
        surface.fill_ellipse(
            transform,
            color.multiply_alpha(OVERLAY_OPACITY),
            point.position,
            diameter / 2.0,
        );
    }
}

/// The committed prompt box.
pub fn paint_prompt_rect<S: Surface + ?Sized>(
    surface: &mut S,
    transform: Affine,
    canvas: &Canvas,
    rect: Rect,
) {
    let stroke = Stroke::new(2.0 * pen_width(canvas.viewport().scale));
    surface.stroke_rect(
        transform,
        &stroke,
        PROMPT_RECT.multiply_alpha(OVERLAY_OPACITY),
        rect,
    );
}

/// Tracking area: a faint fill plus an outline. While drawing, the outline runs open to
/// the pointer.
pub fn paint_tracking_area<S: Surface + ?Sized>(surface: &mut S, transform: Affine, canvas: &Canvas) {
    let area = canvas.tracking_area();
    if area.state() == TrackingState::None || area.polygon().is_empty() {
        return;
    }
    let drawing = area.state() == TrackingState::Drawing;
    let mut points = area.polygon().to_vec();
    if drawing {
        points.push(canvas.pointer());
    }
    let stroke = Stroke::new(2.0 * pen_width(canvas.viewport().scale));
    surface.fill_polygon(transform, TRACKING_AREA.multiply_alpha(0.1), &points);
    surface.stroke_polyline(
        transform,
        &stroke,
        TRACKING_AREA.multiply_alpha(0.7),
        &points,
        !drawing,
    );
}

/// One track's trail and its frame markers.
pub fn paint_trajectory<S: Surface + ?Sized>(
    surface: &mut S,
    transform: Affine,
    path: &TrajectoryPath,
) {
    let color = to_color(path.color);
    for segment in &path.segments {
        let stroke = Stroke::new(segment.width).with_caps(Cap::Round);
        surface.stroke_line(transform, &stroke, color, segment.from, segment.to);
    }
    for dot in &path.dots {
        surface.fill_ellipse(transform, Color::BLACK, *dot, TRAJECTORY_DOT_RADIUS);
    }
}

/// Busy overlay: scrim, a spinner above the centre and the status text.
pub fn paint_loading<S: Surface + ?Sized>(
    surface: &mut S,
    transform: Affine,
    canvas: &Canvas,
    image: Option<&FrameImage>,
) {
    let size = canvas.viewport().image_size;
    let bounds = Rect::from_origin_size(Point::ZERO, size);
    if let Some(image) = image {
        surface.draw_image(transform, image);
    }
    surface.fill_rect(transform, Color::from_rgba8(0, 0, 0, 100), bounds);

    let loading = canvas.loading();
    let spinner = transform
        * Affine::translate((size.width / 2.0, size.height / 2.0 - 50.0))
        * Affine::rotate(loading.angle.to_radians());
    let stroke = Stroke::new(1.0);
    surface.stroke_ellipse(spinner, &stroke, Color::WHITE, Point::ZERO, 20.0);
    surface.stroke_line(
        spinner,
        &stroke,
        Color::WHITE,
        Point::ZERO,
        Point::new(0.0, -20.0),
    );

    let font_size = if size.width > 0.0 {
        size.width / 50.0
    } else {
        20.0
    };
    surface.draw_text(transform, &loading.text, bounds, font_size, Color::WHITE);
}
