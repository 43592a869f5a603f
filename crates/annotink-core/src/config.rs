//! Canvas configuration.

use crate::error::{CanvasError, CanvasResult};
use serde::{Deserialize, Serialize};

/// What a double click does while a shape is being drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DoubleClickAction {
    /// Close the shape under construction.
    #[default]
    Close,
    /// Ignore double clicks.
    None,
}

impl std::str::FromStr for DoubleClickAction {
    type Err = CanvasError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "close" => Ok(DoubleClickAction::Close),
            "none" => Ok(DoubleClickAction::None),
            other => Err(CanvasError::UnsupportedDoubleClick(other.to_string())),
        }
    }
}

/// Whether the canvas annotates a single image or frames of a video.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnnotationMode {
    #[default]
    Image,
    Video,
}

/// Tunables of the interaction engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasConfig {
    /// Pick distance in screen pixels; divided by the zoom scale for image-space tests.
    pub epsilon: f64,
    pub double_click: DoubleClickAction,
    /// Maximum number of snapshots kept for undo.
    pub num_backups: usize,
    /// Fill the shape under construction while drawing.
    pub fill_drawing: bool,
    /// Draw crosshair guides through the pointer.
    pub show_cross_line: bool,
    pub annotation_mode: AnnotationMode,
    /// Manhattan distance (image pixels) the pointer must travel for a dragged AI box.
    pub ai_rect_drag_threshold: f64,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            epsilon: 10.0,
            double_click: DoubleClickAction::Close,
            num_backups: 10,
            fill_drawing: false,
            show_cross_line: true,
            annotation_mode: AnnotationMode::Image,
            ai_rect_drag_threshold: 50.0,
        }
    }
}

impl CanvasConfig {
    /// Parse a configuration from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> CanvasResult<Self> {
        let value: serde_json::Value = serde_json::from_str(json)?;
        // Report unknown double-click actions with a dedicated error.
        if let Some(action) = value.get("double_click").and_then(|v| v.as_str()) {
            action.parse::<DoubleClickAction>()?;
        }
        let config: CanvasConfig = serde_json::from_value(value)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> CanvasResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> CanvasResult<()> {
        if self.epsilon.is_nan() || self.epsilon <= 0.0 {
            return Err(CanvasError::InvalidConfig(format!(
                "epsilon must be positive, got {}",
                self.epsilon
            )));
        }
        if self.num_backups == 0 {
            return Err(CanvasError::InvalidConfig(
                "num_backups must be at least 1".to_string(),
            ));
        }
        if self.ai_rect_drag_threshold < 0.0 {
            return Err(CanvasError::InvalidConfig(format!(
                "ai_rect_drag_threshold must not be negative, got {}",
                self.ai_rect_drag_threshold
            )));
        }
        Ok(())
    }

    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    pub fn with_double_click(mut self, action: DoubleClickAction) -> Self {
        self.double_click = action;
        self
    }

    pub fn with_num_backups(mut self, num_backups: usize) -> Self {
        self.num_backups = num_backups;
        self
    }

    pub fn with_annotation_mode(mut self, mode: AnnotationMode) -> Self {
        self.annotation_mode = mode;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = CanvasConfig::default();
        assert_eq!(config.epsilon, 10.0);
        assert_eq!(config.double_click, DoubleClickAction::Close);
        assert_eq!(config.num_backups, 10);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_json_partial() {
        let config = CanvasConfig::from_json(r#"{"epsilon": 4.5, "double_click": "none"}"#).unwrap();
        assert_eq!(config.epsilon, 4.5);
        assert_eq!(config.double_click, DoubleClickAction::None);
        assert_eq!(config.num_backups, 10);
    }

    #[test]
    fn test_from_json_bad_double_click() {
        let err = CanvasConfig::from_json(r#"{"double_click": "open"}"#).unwrap_err();
        assert_eq!(err, CanvasError::UnsupportedDoubleClick("open".to_string()));
    }

    #[test]
    fn test_from_json_invalid_values() {
        assert!(matches!(
            CanvasConfig::from_json(r#"{"epsilon": 0}"#),
            Err(CanvasError::InvalidConfig(_))
        ));
        assert!(matches!(
            CanvasConfig::from_json(r#"{"num_backups": 0}"#),
            Err(CanvasError::InvalidConfig(_))
        ));
        assert!(matches!(
            CanvasConfig::from_json("not json"),
            Err(CanvasError::Serialization(_))
        ));
    }

    #[test]
    fn test_json_roundtrip() {
        let config = CanvasConfig::default()
            .with_epsilon(3.0)
            .with_annotation_mode(AnnotationMode::Video);
        let json = config.to_json().unwrap();
        assert_eq!(CanvasConfig::from_json(&json).unwrap(), config);
    }
}
