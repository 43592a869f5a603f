//! Prompt collection for point/box guided segmentation.

use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};

/// Which prompt a primary click contributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AiMode {
    #[default]
    None,
    /// Foreground point (label 1).
    AddPoint,
    /// Background point (label 0).
    RemovePoint,
    /// Two corners of a box.
    SelectRect,
}

/// Label of a prompt point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PromptLabel {
    Background = 0,
    Foreground = 1,
}

/// One prompt point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PromptPoint {
    pub position: Point,
    pub label: PromptLabel,
}

/// Payload handed to the segmentation service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptRequest {
    pub points: Vec<[i64; 2]>,
    pub labels: Vec<u8>,
    /// `[xmin, ymin, xmax, ymax]`.
    pub boxes: Vec<[i64; 4]>,
}

impl PromptRequest {
    pub fn is_empty(&self) -> bool {
        self.points.is_empty() && self.boxes.is_empty()
    }
}

/// Accumulated prompt state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AiPrompt {
    mode: AiMode,
    points: Vec<PromptPoint>,
    /// First corner of a box still being placed.
    pending_corner: Option<Point>,
    /// The committed box as its two corners.
    rect: Option<(Point, Point)>,
}

impl AiPrompt {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> AiMode {
        self.mode
    }

    pub fn is_active(&self) -> bool {
        self.mode != AiMode::None
    }

    /// Switch mode. Entering or leaving prompting clears everything collected; moving between
    /// point and box modes keeps the prompt so both kinds can be combined.
    pub fn set_mode(&mut self, mode: AiMode) {
        if (mode == AiMode::None) != (self.mode == AiMode::None) {
            self.clear();
        }
        if mode != AiMode::SelectRect {
            self.pending_corner = None;
        }
        self.mode = mode;
    }

    pub fn clear(&mut self) {
        self.points.clear();
        self.pending_corner = None;
        self.rect = None;
    }

    pub fn points(&self) -> &[PromptPoint] {
        &self.points
    }

    pub fn add_point(&mut self, position: Point, label: PromptLabel) {
        self.points.push(PromptPoint { position, label });
    }

    pub fn pending_corner(&self) -> Option<Point> {
        self.pending_corner
    }

    pub fn rect(&self) -> Option<(Point, Point)> {
        self.rect
    }

    /// Normalised committed box.
    pub fn rect_bounds(&self) -> Option<Rect> {
        self.rect.map(|(a, b)| Rect::from_points(a, b))
    }

    /// Record a box corner. The second corner replaces any committed box and returns true.
    pub fn push_corner(&mut self, corner: Point) -> bool {
        match self.pending_corner.take() {
            Some(first) => {
                self.rect = Some((first, corner));
                true
            }
            None => {
                self.pending_corner = Some(corner);
                false
            }
        }
    }

    /// Complete a box on release when the pointer travelled far enough from the first corner.
    pub fn finish_drag(&mut self, corner: Point, threshold: f64) -> bool {
        let Some(first) = self.pending_corner else {
            return false;
        };
        let manhattan = (corner.x - first.x).abs() + (corner.y - first.y).abs();
        if manhattan > threshold {
            self.push_corner(corner)
        } else {
            false
        }
    }

    /// Build the service payload with rounded integer coordinates.
    pub fn request(&self) -> PromptRequest {
        let points = self
            .points
            .iter()
            .map(|p| [p.position.x.round() as i64, p.position.y.round() as i64])
            .collect();
        let labels = self.points.iter().map(|p| p.label as u8).collect();
        let boxes = self
            .rect_bounds()
            .map(|r| {
                vec![[
                    r.x0.round() as i64,
                    r.y0.round() as i64,
                    r.x1.round() as i64,
                    r.y1.round() as i64,
                ]]
            })
            .unwrap_or_default();
        PromptRequest {
            points,
            labels,
            boxes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_rounds_and_labels() {
        let mut prompt = AiPrompt::new();
        prompt.set_mode(AiMode::AddPoint);
        prompt.add_point(Point::new(100.4, 99.6), PromptLabel::Foreground);
        prompt.set_mode(AiMode::RemovePoint);
        prompt.add_point(Point::new(200.0, 200.0), PromptLabel::Background);
        let request = prompt.request();
        assert_eq!(request.points, vec![[100, 100], [200, 200]]);
        assert_eq!(request.labels, vec![1, 0]);
        assert!(request.boxes.is_empty());
    }

    #[test]
    fn test_box_normalised_and_replaced() {
        let mut prompt = AiPrompt::new();
        prompt.set_mode(AiMode::SelectRect);
        assert!(!prompt.push_corner(Point::new(50.0, 80.0)));
        assert!(prompt.push_corner(Point::new(10.0, 20.0)));
        assert_eq!(prompt.request().boxes, vec![[10, 20, 50, 80]]);

        prompt.push_corner(Point::new(0.0, 0.0));
        prompt.push_corner(Point::new(5.0, 5.0));
        assert_eq!(prompt.request().boxes, vec![[0, 0, 5, 5]]);
    }

    #[test]
    fn test_finish_drag_threshold() {
        let mut prompt = AiPrompt::new();
        prompt.set_mode(AiMode::SelectRect);
        prompt.push_corner(Point::new(0.0, 0.0));
        assert!(!prompt.finish_drag(Point::new(20.0, 20.0), 50.0));
        assert_eq!(prompt.pending_corner(), Some(Point::new(0.0, 0.0)));
        assert!(prompt.finish_drag(Point::new(30.0, 30.0), 50.0));
        assert_eq!(prompt.pending_corner(), None);
    }

    #[test]
    fn test_leaving_prompt_mode_clears() {
        let mut prompt = AiPrompt::new();
        prompt.set_mode(AiMode::AddPoint);
        prompt.add_point(Point::new(1.0, 1.0), PromptLabel::Foreground);
        prompt.set_mode(AiMode::None);
        assert!(prompt.points().is_empty());
        assert!(prompt.request().is_empty());
    }
}
