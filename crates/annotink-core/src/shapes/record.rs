//! Persisted shape form exchanged with collaborators.

use super::{Shape, ShapeColors, ShapeKind};
use crate::error::CanvasError;
use kurbo::Point;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A shape as it appears in annotation files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShapeRecord {
    pub label: Option<String>,
    pub points: Vec<[f64; 2]>,
    #[serde(default)]
    pub group_id: Option<u32>,
    pub shape_type: String,
    #[serde(default)]
    pub flags: BTreeMap<String, bool>,
    #[serde(default)]
    pub content: Option<String>,
}

impl From<&Shape> for ShapeRecord {
    fn from(shape: &Shape) -> Self {
        Self {
            label: shape.label.clone(),
            points: shape.points().iter().map(|p| [p.x, p.y]).collect(),
            group_id: shape.group_id,
            shape_type: shape.kind().to_string(),
            flags: shape.flags.clone(),
            content: shape.content.clone(),
        }
    }
}

impl TryFrom<ShapeRecord> for Shape {
    type Error = CanvasError;

    /// Loaded shapes are finished, so they come back closed.
    fn try_from(record: ShapeRecord) -> Result<Self, Self::Error> {
        let kind: ShapeKind = record.shape_type.parse()?;
        let points = record
            .points
            .iter()
            .map(|[x, y]| Point::new(*x, *y))
            .collect();
        let mut shape = Shape::with_points(kind, points).closed();
        if let Some(label) = &record.label {
            shape.colors = ShapeColors::for_label(label);
        }
        shape.label = record.label;
        shape.group_id = record.group_id;
        shape.flags = record.flags;
        shape.content = record.content;
        Ok(shape)
    }
}
