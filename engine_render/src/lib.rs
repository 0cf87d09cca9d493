//! Engine Render - render pass and drawing surfaces
//!
//! This crate turns the renderer components of a scene into pixels on a
//! [`Surface`]. It knows nothing about the UI layer.

pub mod rect_renderer;
pub mod renderer;
pub mod surface;

pub use rect_renderer::*;
pub use renderer::*;
pub use surface::*;
