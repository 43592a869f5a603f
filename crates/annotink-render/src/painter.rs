//! Painting of individual annotation shapes.

use crate::surface::{Surface, polyline_path};
use annotink_core::geometry::distance;
use annotink_core::shapes::{HighlightMode, Shape, ShapeColor, ShapeKind};
use kurbo::{Affine, BezPath, Circle, Rect, Shape as _, Stroke};
use peniko::Color;

/// Vertex marker size in screen pixels.
const VERTEX_SIZE: f64 = 8.0;

const PATH_TOLERANCE: f64 = 0.1;

pub fn to_color(color: ShapeColor) -> Color {
    Color::from_rgba8(color.r, color.g, color.b, color.a)
}

/// Outline width in image pixels: two screen pixels, never thinner than one image pixel.
pub fn pen_width(scale: f64) -> f64 {
    (2.0 / scale).round().max(1.0)
}

/// The outline of a shape, or `None` when it has too few points to draw one.
pub fn outline_path(shape: &Shape) -> Option<BezPath> {
    let points = shape.points();
    match shape.kind() {
        ShapeKind::Rectangle => match points {
            [a, b] => Some(Rect::from_points(*a, *b).to_path(PATH_TOLERANCE)),
            _ => None,
        },
        ShapeKind::Circle => match points {
            [center, edge] => {
                Some(Circle::new(*center, distance(*center, *edge)).to_path(PATH_TOLERANCE))
            }
            _ => None,
        },
        ShapeKind::Point => None,
        ShapeKind::Polygon | ShapeKind::Line | ShapeKind::Linestrip => {
            let closed = shape.is_closed() && shape.kind().rules().closed_outline;
            polyline_path(points, closed)
        }
    }
}

/// Vertex markers, split into the plain ones and the highlighted one.
///
/// Plain vertices are round. A highlighted vertex grows by its mode's factor and is round
/// when the pointer is near it, square while it can be dragged.
pub fn vertex_paths(shape: &Shape, scale: f64) -> (Option<BezPath>, Option<BezPath>) {
    let mut plain = BezPath::new();
    let mut highlighted = None;
    let base = VERTEX_SIZE / scale;
    for (i, p) in shape.points().iter().enumerate() {
        if shape.highlighted_vertex() == Some(i) {
            let mode = shape.highlight_mode();
            let d = base * mode.size_factor();
            let path = match mode {
                HighlightMode::Near => Circle::new(*p, d / 2.0).to_path(PATH_TOLERANCE),
                HighlightMode::Move => {
                    Rect::new(p.x - d / 2.0, p.y - d / 2.0, p.x + d / 2.0, p.y + d / 2.0)
                        .to_path(PATH_TOLERANCE)
                }
            };
            highlighted = Some(path);
        } else {
            plain.extend(Circle::new(*p, base / 2.0).path_elements(PATH_TOLERANCE));
        }
    }
    let plain = (!plain.elements().is_empty()).then_some(plain);
    (plain, highlighted)
}

/// Paint one shape: outline, vertices, then the translucent fill when `fill` is set.
pub fn paint_shape<S: Surface + ?Sized>(
    surface: &mut S,
    transform: Affine,
    shape: &Shape,
    scale: f64,
    fill: bool,
) {
    if shape.is_empty() {
        return;
    }
    let colors = &shape.colors;
    let line_color = to_color(if shape.selected {
        colors.select_line
    } else {
        colors.line
    });
    let stroke = Stroke::new(pen_width(scale));

    let outline = outline_path(shape);
    if let Some(path) = &outline {
        surface.stroke(transform, &stroke, line_color, path);
    }

    let (plain, highlighted) = vertex_paths(shape, scale);
    if let Some(path) = &plain {
        surface.stroke(transform, &stroke, line_color, path);
        surface.fill(transform, to_color(colors.vertex_fill), path);
    }
    if let Some(path) = &highlighted {
        surface.stroke(transform, &stroke, line_color, path);
        surface.fill(transform, to_color(colors.hvertex_fill), path);
    }

    if fill {
        if let Some(path) = &outline {
            let fill_color = if shape.selected {
                colors.select_fill
            } else {
                colors.fill
            };
            surface.fill(transform, to_color(fill_color), path);
        }
    }
}
