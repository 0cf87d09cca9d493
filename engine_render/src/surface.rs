//! Drawable surfaces
//!
//! A [`Surface`] is anything that can hand out a 2D drawing context. The
//! engine refuses to start against a surface that cannot.

use engine_core::{Color, DrawContext2D};
use image::{Rgba, RgbaImage};

pub trait Surface {
    fn width(&self) -> u32;

    fn height(&self) -> u32;

    /// The drawing context, or `None` when this surface cannot draw
    fn context_2d(&mut self) -> Option<&mut dyn DrawContext2D>;
}

/// CPU-side RGBA framebuffer
pub struct PixelSurface {
    image: RgbaImage,
}

impl PixelSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            image: RgbaImage::new(width, height),
        }
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    /// Raw RGBA bytes, row-major
    pub fn as_raw(&self) -> &[u8] {
        self.image.as_raw()
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Color> {
        if x >= self.image.width() || y >= self.image.height() {
            return None;
        }
        let Rgba([r, g, b, a]) = *self.image.get_pixel(x, y);
        Some(Color::rgba(r, g, b, a))
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        if (width, height) != self.image.dimensions() {
            self.image = RgbaImage::new(width, height);
        }
    }
}

fn blend(dst: Rgba<u8>, src: Color) -> Rgba<u8> {
    if src.is_opaque() {
        return Rgba(src.to_array());
    }
    let alpha = src.a as u32;
    let inverse = 255 - alpha;
    let mix = |s: u8, d: u8| ((s as u32 * alpha + d as u32 * inverse) / 255) as u8;
    Rgba([
        mix(src.r, dst[0]),
        mix(src.g, dst[1]),
        mix(src.b, dst[2]),
        dst[3].max(src.a),
    ])
}

impl DrawContext2D for PixelSurface {
    fn size(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    fn clear(&mut self, color: Color) {
        let fill = Rgba(color.to_array());
        for pixel in self.image.pixels_mut() {
            *pixel = fill;
        }
    }

    fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32, color: Color) {
        if color.a == 0 || width <= 0.0 || height <= 0.0 {
            return;
        }
        let (surface_w, surface_h) = self.image.dimensions();
        let x0 = x.max(0.0).round() as u32;
        let y0 = y.max(0.0).round() as u32;
        let x1 = ((x + width).round().max(0.0) as u32).min(surface_w);
        let y1 = ((y + height).round().max(0.0) as u32).min(surface_h);

        for py in y0..y1 {
            for px in x0..x1 {
                let dst = *self.image.get_pixel(px, py);
                self.image.put_pixel(px, py, blend(dst, color));
            }
        }
    }
}

impl Surface for PixelSurface {
    fn width(&self) -> u32 {
        self.image.width()
    }

    fn height(&self) -> u32 {
        self.image.height()
    }

    fn context_2d(&mut self) -> Option<&mut dyn DrawContext2D> {
        Some(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fill_rect_clips_to_bounds() {
        let mut surface = PixelSurface::new(4, 4);
        surface.clear(Color::BLACK);
        surface.fill_rect(2.0, -3.0, 10.0, 5.0, Color::WHITE);
        assert_eq!(surface.pixel(3, 0), Some(Color::WHITE));
        assert_eq!(surface.pixel(2, 1), Some(Color::WHITE));
        assert_eq!(surface.pixel(1, 1), Some(Color::BLACK));
        assert_eq!(surface.pixel(3, 2), Some(Color::BLACK));
        assert_eq!(surface.pixel(4, 0), None);
    }

    #[test]
    fn test_translucent_fill_blends() {
        let mut surface = PixelSurface::new(1, 1);
        surface.clear(Color::BLACK);
        surface.fill_rect(0.0, 0.0, 1.0, 1.0, Color::rgba(255, 255, 255, 51));
        assert_eq!(surface.pixel(0, 0), Some(Color::rgba(51, 51, 51, 255)));
    }

    #[test]
    fn test_pixel_surface_provides_context() {
        let mut surface = PixelSurface::new(8, 2);
        let size = surface.context_2d().map(|gfx| gfx.size());
        assert_eq!(size, Some((8, 2)));
    }
}
