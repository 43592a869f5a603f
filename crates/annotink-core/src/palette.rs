//! The shared 16-colour palette used for labels and tracks.

use crate::shapes::ShapeColor;

/// Sixteen visually distinct colours.
pub const PALETTE: [ShapeColor; 16] = [
    ShapeColor::rgb(230, 25, 75),
    ShapeColor::rgb(60, 180, 75),
    ShapeColor::rgb(255, 225, 25),
    ShapeColor::rgb(0, 130, 200),
    ShapeColor::rgb(245, 130, 49),
    ShapeColor::rgb(145, 30, 180),
    ShapeColor::rgb(70, 240, 240),
    ShapeColor::rgb(240, 50, 230),
    ShapeColor::rgb(210, 245, 60),
    ShapeColor::rgb(250, 190, 190),
    ShapeColor::rgb(0, 128, 128),
    ShapeColor::rgb(230, 190, 255),
    ShapeColor::rgb(170, 110, 40),
    ShapeColor::rgb(255, 250, 200),
    ShapeColor::rgb(128, 0, 0),
    ShapeColor::rgb(170, 255, 195),
];

/// Palette entry for an index, wrapping around.
pub fn palette_color(index: usize) -> ShapeColor {
    PALETTE[index % PALETTE.len()]
}

/// Stable colour for a label (FNV-1a over its bytes).
pub fn label_color(label: &str) -> ShapeColor {
    let hash = label.bytes().fold(0x811c_9dc5_u32, |h, b| {
        (h ^ u32::from(b)).wrapping_mul(0x0100_0193)
    });
    palette_color(hash as usize)
}
