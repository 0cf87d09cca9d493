//! Viewport - displays the rendered scene
//!
//! The viewport uploads the render pass output as an egui texture and draws
//! it inside a framed area.

use egui::{Align2, Color32, ColorImage, FontId, Pos2, Rect, Stroke, TextureHandle, TextureOptions, Ui, Vec2};

use engine_render::PixelSurface;

/// Viewport state for the debug panel
pub struct ViewportPanel {
    texture: Option<TextureHandle>,
    label: String,
}

impl Default for ViewportPanel {
    fn default() -> Self {
        Self::new("Viewport")
    }
}

impl ViewportPanel {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            texture: None,
            label: label.into(),
        }
    }

    /// Upload the surface and draw it scaled to fit the available space
    pub fn show(&mut self, ui: &mut Ui, surface: &PixelSurface) {
        let image = surface.image();
        let size = [image.width() as usize, image.height() as usize];
        let pixels = ColorImage::from_rgba_unmultiplied(size, surface.as_raw());
        match &mut self.texture {
            Some(texture) => texture.set(pixels, TextureOptions::NEAREST),
            None => {
                self.texture = Some(ui.ctx().load_texture(
                    "scene_viewport",
                    pixels,
                    TextureOptions::NEAREST,
                ));
            }
        }

        let available = ui.available_rect_before_wrap();
        if available.width() < 50.0 || available.height() < 50.0 {
            return;
        }

        let source = Vec2::new(size[0].max(1) as f32, size[1].max(1) as f32);
        let scale = (available.width() / source.x).min(available.height() / source.y);
        let viewport_rect = Rect::from_center_size(available.center(), source * scale);

        ui.painter()
            .rect_filled(available, 0.0, Color32::from_rgb(22, 22, 24));

        if let Some(texture) = &self.texture {
            ui.painter().image(
                texture.id(),
                viewport_rect,
                Rect::from_min_max(Pos2::ZERO, Pos2::new(1.0, 1.0)),
                Color32::WHITE,
            );
        }

        ui.painter().rect_stroke(
            viewport_rect,
            0.0,
            Stroke::new(1.0, Color32::from_rgb(58, 58, 62)),
            egui::StrokeKind::Middle,
        );

        ui.painter().text(
            Pos2::new(viewport_rect.left() + 12.0, viewport_rect.top() + 10.0),
            Align2::LEFT_TOP,
            &self.label,
            FontId::proportional(13.0),
            Color32::from_gray(210),
        );

        ui.allocate_rect(available, egui::Sense::hover());
    }

    /// Drop the uploaded texture
    pub fn clear_texture(&mut self) {
        self.texture = None;
    }

    pub fn has_texture(&self) -> bool {
        self.texture.is_some()
    }
}
