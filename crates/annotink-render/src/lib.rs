//! AnnotInk Render Library
//!
//! Composes the annotation canvas into draw calls on a [`Surface`].
//! The recording surface is always available; the Vello surface sits behind the
//! `vello-surface` feature.

mod compositor;
pub mod overlays;
pub mod painter;
mod renderer;
pub mod surface;

#[cfg(feature = "vello-surface")]
mod vello_surface;

pub use compositor::compose;
pub use renderer::{RenderContext, RenderError, RenderResult, Renderer};
pub use surface::{CommandRecorder, DrawCommand, FrameImage, Layer, Surface};

#[cfg(feature = "vello-surface")]
pub use vello_surface::VelloSurface;
