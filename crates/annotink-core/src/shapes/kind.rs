//! Shape kinds and the per-kind construction rules.

use crate::error::CanvasError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The six annotation primitives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    #[default]
    Polygon,
    Rectangle,
    Circle,
    Line,
    Point,
    Linestrip,
}

/// What undoing the most recent committed shape does to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UndoBehavior {
    /// Reopen the shape and keep all its vertices.
    Reopen,
    /// Keep only the first vertex; the second is redrawn.
    TruncateToFirst,
    /// Throw the shape away.
    Discard,
}

/// Construction rules for a shape kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KindRules {
    /// Fewest vertices a finished shape of this kind may have.
    pub min_points: usize,
    /// Number of clicks that complete the shape, if fixed.
    pub defining_points: Option<usize>,
    /// Vertices may be inserted on edges or removed individually.
    pub vertex_editable: bool,
    /// The outline returns to the first vertex when drawn.
    pub closed_outline: bool,
    pub undo: UndoBehavior,
}

const POLYGON_RULES: KindRules = KindRules {
    min_points: 3,
    defining_points: None,
    vertex_editable: true,
    closed_outline: true,
    undo: UndoBehavior::Reopen,
};

const LINESTRIP_RULES: KindRules = KindRules {
    min_points: 2,
    defining_points: None,
    vertex_editable: true,
    closed_outline: false,
    undo: UndoBehavior::Reopen,
};

const RECTANGLE_RULES: KindRules = KindRules {
    min_points: 2,
    defining_points: Some(2),
    vertex_editable: false,
    closed_outline: true,
    undo: UndoBehavior::TruncateToFirst,
};

const CIRCLE_RULES: KindRules = KindRules {
    min_points: 2,
    defining_points: Some(2),
    vertex_editable: false,
    closed_outline: true,
    undo: UndoBehavior::TruncateToFirst,
};

const LINE_RULES: KindRules = KindRules {
    min_points: 2,
    defining_points: Some(2),
    vertex_editable: false,
    closed_outline: false,
    undo: UndoBehavior::TruncateToFirst,
};

const POINT_RULES: KindRules = KindRules {
    min_points: 1,
    defining_points: Some(1),
    vertex_editable: false,
    closed_outline: false,
    undo: UndoBehavior::Discard,
};

impl ShapeKind {
    pub const ALL: [ShapeKind; 6] = [
        ShapeKind::Polygon,
        ShapeKind::Rectangle,
        ShapeKind::Circle,
        ShapeKind::Line,
        ShapeKind::Point,
        ShapeKind::Linestrip,
    ];

    pub fn rules(self) -> &'static KindRules {
        match self {
            ShapeKind::Polygon => &POLYGON_RULES,
            ShapeKind::Rectangle => &RECTANGLE_RULES,
            ShapeKind::Circle => &CIRCLE_RULES,
            ShapeKind::Line => &LINE_RULES,
            ShapeKind::Point => &POINT_RULES,
            ShapeKind::Linestrip => &LINESTRIP_RULES,
        }
    }

    pub fn min_points(self) -> usize {
        self.rules().min_points
    }

    pub fn defining_points(self) -> Option<usize> {
        self.rules().defining_points
    }

    pub fn is_vertex_editable(self) -> bool {
        self.rules().vertex_editable
    }

    pub fn name(self) -> &'static str {
        match self {
            ShapeKind::Polygon => "polygon",
            ShapeKind::Rectangle => "rectangle",
            ShapeKind::Circle => "circle",
            ShapeKind::Line => "line",
            ShapeKind::Point => "point",
            ShapeKind::Linestrip => "linestrip",
        }
    }
}

impl fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ShapeKind {
    type Err = CanvasError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ShapeKind::ALL
            .into_iter()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| CanvasError::UnsupportedShapeKind(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_names_roundtrip() {
        for kind in ShapeKind::ALL {
            assert_eq!(kind.to_string().parse::<ShapeKind>().unwrap(), kind);
        }
    }

    #[test]
    fn test_unknown_kind() {
        assert_eq!(
            "hexagon".parse::<ShapeKind>(),
            Err(CanvasError::UnsupportedShapeKind("hexagon".to_string()))
        );
    }

    #[test]
    fn test_rules() {
        assert_eq!(ShapeKind::Polygon.min_points(), 3);
        assert_eq!(ShapeKind::Linestrip.min_points(), 2);
        assert_eq!(ShapeKind::Rectangle.defining_points(), Some(2));
        assert_eq!(ShapeKind::Point.defining_points(), Some(1));
        assert!(ShapeKind::Polygon.is_vertex_editable());
        assert!(!ShapeKind::Circle.is_vertex_editable());
        assert_eq!(ShapeKind::Point.rules().undo, UndoBehavior::Discard);
    }

    #[test]
    fn test_serde_lowercase() {
        let json = serde_json::to_string(&ShapeKind::Linestrip).unwrap();
        assert_eq!(json, "\"linestrip\"");
    }
}
