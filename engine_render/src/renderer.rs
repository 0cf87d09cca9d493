//! Render pass - draws the scene's renderer components onto a surface
//!
//! The pass clears the surface, then calls every enabled renderer on an
//! active GameObject in scene traversal order.

use engine_core::{Color, RenderSystem, Renderable, Scene};

use crate::surface::Surface;

/// Render pass configuration
#[derive(Debug, Clone, Copy)]
pub struct RenderConfig {
    pub clear_color: Color,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            clear_color: Color::rgb(26, 26, 26),
        }
    }
}

/// Scene renderer - owns the render system and the pass configuration
pub struct SceneRenderer {
    config: RenderConfig,
    render_system: RenderSystem,
}

impl Default for SceneRenderer {
    fn default() -> Self {
        Self::new(RenderConfig::default())
    }
}

impl SceneRenderer {
    pub fn new(config: RenderConfig) -> Self {
        Self {
            config,
            render_system: RenderSystem,
        }
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    pub fn set_clear_color(&mut self, color: Color) {
        self.config.clear_color = color;
    }

    /// Render the scene and report what was drawn
    pub fn render(&mut self, scene: &Scene, surface: &mut dyn Surface) -> RenderOutput {
        let renderables = self.render_system.update(scene);
        let Some(gfx) = surface.context_2d() else {
            log::warn!("render pass skipped: surface has no 2D context");
            return RenderOutput {
                renderables: Vec::new(),
            };
        };

        gfx.clear(self.config.clear_color);
        for renderable in &renderables {
            if let Some(renderer) = scene.renderer(renderable.component) {
                renderer.draw(scene, renderable.owner, gfx);
            }
        }

        RenderOutput { renderables }
    }
}

/// Output from a render call
#[derive(Debug, Default)]
pub struct RenderOutput {
    pub renderables: Vec<Renderable>,
}

impl RenderOutput {
    pub fn drawn(&self) -> usize {
        self.renderables.len()
    }
}
