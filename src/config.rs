//! Engine configuration

use std::time::Duration;

use engine_core::Color;
use engine_render::RenderConfig;

/// Engine configuration
#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub scene_name: String,
    pub clear_color: Color,
    /// Frame interval used when the host offers no refresh-aligned scheduler
    pub fallback_interval: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            scene_name: "Main".to_string(),
            clear_color: Color::rgb(26, 26, 26),
            fallback_interval: Duration::from_millis(16),
        }
    }
}

impl EngineConfig {
    pub fn render_config(&self) -> RenderConfig {
        RenderConfig {
            clear_color: self.clear_color,
        }
    }
}
