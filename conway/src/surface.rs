// surface.rs - Presentation targets for rendered frames

use crate::color::Rgba;

/// A fixed-size pixel surface that receives one frame per executed step.
pub trait Surface {
    /// Width and height in pixels; must equal the grid dimensions.
    fn size(&self) -> (usize, usize);

    /// Shows a frame of `width * height` row-major pixels.
    fn present(&mut self, width: usize, height: usize, pixels: &[Rgba]);
}

/// In-memory surface that keeps the last presented frame.
#[derive(Debug, Clone)]
pub struct FrameBuffer {
    width    : usize,
    height   : usize,
    pixels   : Vec<Rgba>,
    presents : u64,
}

impl FrameBuffer {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            pixels: vec![Rgba::BLACK; width * height],
            presents: 0,
        }
    }

    pub fn pixels(&self) -> &[Rgba] {
        &self.pixels
    }

    pub fn pixel(&self, x: usize, y: usize) -> Option<Rgba> {
        (x < self.width && y < self.height).then(|| self.pixels[y * self.width + x])
    }

    /// How many frames have been presented so far.
    pub fn presents(&self) -> u64 {
        self.presents
    }
}

impl Surface for FrameBuffer {
    fn size(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    fn present(&mut self, width: usize, height: usize, pixels: &[Rgba]) {
        self.width = width;
        self.height = height;
        self.pixels.clear();
        self.pixels.extend_from_slice(pixels);
        self.presents += 1;
    }
}
