// surface.rs - egui texture as a presentation surface

use conway::{Rgba, Surface};
use egui::{Color32, ColorImage, TextureHandle, TextureOptions};

/// Collects presented frames and uploads them as a nearest-filtered texture.
pub struct TextureSurface {
    image   : ColorImage,
    texture : TextureHandle,
    dirty   : bool,
}

impl TextureSurface {
    pub fn new(ctx: &egui::Context, width: usize, height: usize) -> Self {
        let image = ColorImage::new([width, height], Color32::BLACK);
        let texture = ctx.load_texture("cells", image.clone(), TextureOptions::NEAREST);
        Self { image, texture, dirty: false }
    }

    pub fn texture(&self) -> &TextureHandle {
        &self.texture
    }

    /// Pushes the last presented frame to the GPU if it changed.
    pub fn upload(&mut self) {
        if self.dirty {
            self.texture.set(self.image.clone(), TextureOptions::NEAREST);
            self.dirty = false;
        }
    }
}

impl Surface for TextureSurface {
    fn size(&self) -> (usize, usize) {
        (self.image.size[0], self.image.size[1])
    }

    fn present(&mut self, width: usize, height: usize, pixels: &[Rgba]) {
        self.image.size = [width, height];
        self.image.pixels.clear();
        self.image.pixels.extend(
            pixels
                .iter()
                .map(|p| Color32::from_rgba_unmultiplied(p.r, p.g, p.b, p.a)),
        );
        self.dirty = true;
    }
}
