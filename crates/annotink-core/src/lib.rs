//! AnnotInk Core Library
//!
//! Canvas interaction engine for image and video annotation: shape model, undo history,
//! the pointer/keyboard state machine and the geometry it relies on.

pub mod canvas;
pub mod config;
pub mod document;
pub mod error;
pub mod events;
pub mod geometry;
pub mod input;
mod interaction;
pub mod palette;
pub mod prompt;
pub mod selection;
pub mod shapes;
pub mod tracking;
pub mod trajectory;
pub mod viewport;

pub use canvas::{Canvas, CanvasMode, CursorHint, LoadingState};
pub use config::{AnnotationMode, CanvasConfig, DoubleClickAction};
pub use document::ShapeDocument;
pub use error::{CanvasError, CanvasResult};
pub use events::CanvasEvent;
pub use input::{Buttons, DoubleClickDetector, Key, KeyEvent, Modifiers, MouseButton, PointerEvent};
pub use prompt::{AiMode, AiPrompt, PromptLabel, PromptRequest};
pub use selection::{HitResult, HoverState};
pub use shapes::{HighlightMode, Shape, ShapeColor, ShapeColors, ShapeId, ShapeKind, ShapeRecord};
pub use tracking::{TrackingArea, TrackingState};
pub use trajectory::{Trajectories, TrajectoryFlags, TrajectoryPath};
pub use viewport::Viewport;
