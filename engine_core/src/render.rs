//! Renderer contract
//!
//! Components implementing [`Renderer`] are discovered by the render pass each
//! frame; nothing has to register them.

use crate::components::Color;
use crate::scene::{GameObject, Scene};

/// Minimal 2D drawing context a surface hands to the render pass
pub trait DrawContext2D {
    /// Pixel dimensions (width, height)
    fn size(&self) -> (u32, u32);

    fn clear(&mut self, color: Color);

    fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32, color: Color);
}

pub trait Renderer: Send + Sync {
    fn draw(&self, scene: &Scene, owner: GameObject, gfx: &mut dyn DrawContext2D);
}
