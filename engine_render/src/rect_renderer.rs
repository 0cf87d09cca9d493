//! Filled-rectangle renderer component

use engine_core::{Color, Component, DrawContext2D, GameObject, Renderer, Scene};
use glam::Vec2;

/// Draws a solid rectangle centred on its owner's world position
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RectRenderer {
    pub size: Vec2,
    pub color: Color,
}

impl RectRenderer {
    pub fn new(size: Vec2, color: Color) -> Self {
        Self { size, color }
    }
}

impl Default for RectRenderer {
    fn default() -> Self {
        Self::new(Vec2::splat(32.0), Color::WHITE)
    }
}

impl Component for RectRenderer {
    fn as_renderer(&self) -> Option<&dyn Renderer> {
        Some(self)
    }
}

impl Renderer for RectRenderer {
    fn draw(&self, scene: &Scene, owner: GameObject, gfx: &mut dyn DrawContext2D) {
        let Ok(position) = scene.position(owner) else {
            return;
        };
        let scale = scene
            .transform(owner)
            .map(|t| t.local_scale.truncate())
            .unwrap_or(Vec2::ONE);
        let size = self.size * scale;
        let corner = position.truncate() - size * 0.5;
        gfx.fill_rect(corner.x, corner.y, size.x, size.y, self.color);
    }
}
