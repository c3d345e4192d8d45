// color.rs - Palette and the cell-to-color mapping

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::cell::Cell;

/// Straight (non-premultiplied) 8-bit RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const BLACK: Rgba = Rgba::rgb(0, 0, 0);
    pub const WHITE: Rgba = Rgba::rgb(255, 255, 255);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// Linear blend, `t = 0` gives `self` and `t = 1` gives `other`.
    pub fn lerp(self, other: Rgba, t: f32) -> Rgba {
        let t = t.clamp(0.0, 1.0);
        let mix = |from: u8, to: u8| (from as f32 + (to as f32 - from as f32) * t).round() as u8;
        Rgba {
            r: mix(self.r, other.r),
            g: mix(self.g, other.g),
            b: mix(self.b, other.b),
            a: mix(self.a, other.a),
        }
    }
}

/// Which palette entry an update targets. Order matches the share codec.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColorRole {
    Young,
    Old,
    Trail,
    Dead,
}

impl ColorRole {
    pub const ALL: [ColorRole; 4] = [ColorRole::Young, ColorRole::Old, ColorRole::Trail, ColorRole::Dead];
}

/// The four display colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Palette {
    pub young : Rgba,   // just born
    pub old   : Rgba,   // alive long enough for age to saturate
    pub trail : Rgba,   // recently died
    pub dead  : Rgba,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            young: Rgba::rgb(255, 0, 0),
            old: Rgba::rgb(255, 0, 255),
            trail: Rgba::rgb(0, 255, 0),
            dead: Rgba::BLACK,
        }
    }
}

impl Palette {
    pub fn get(&self, role: ColorRole) -> Rgba {
        match role {
            ColorRole::Young => self.young,
            ColorRole::Old => self.old,
            ColorRole::Trail => self.trail,
            ColorRole::Dead => self.dead,
        }
    }

    pub fn set(&mut self, role: ColorRole, color: Rgba) {
        match role {
            ColorRole::Young => self.young = color,
            ColorRole::Old => self.old = color,
            ColorRole::Trail => self.trail = color,
            ColorRole::Dead => self.dead = color,
        }
    }

    pub fn colors(&self) -> [Rgba; 4] {
        ColorRole::ALL.map(|role| self.get(role))
    }

    pub fn from_colors(colors: [Rgba; 4]) -> Self {
        let [young, old, trail, dead] = colors;
        Self { young, old, trail, dead }
    }

    /// Displayed color of a single cell.
    #[inline]
    pub fn shade(&self, cell: &Cell) -> Rgba {
        if cell.is_alive() {
            self.young.lerp(self.old, cell.age)
        } else if cell.trail > 0.0 {
            self.dead.lerp(self.trail, cell.trail)
        } else {
            self.dead
        }
    }

    /// Shades every cell into `pixels`, which must match `cells` in length.
    pub fn render(&self, cells: &[Cell], pixels: &mut [Rgba]) {
        debug_assert_eq!(cells.len(), pixels.len());
        pixels
            .par_iter_mut()
            .zip(cells.par_iter())
            .for_each(|(pixel, cell)| *pixel = self.shade(cell));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn newborn_is_young_and_saturated_is_old() {
        let palette = Palette::default();
        assert_eq!(palette.shade(&Cell::ALIVE), palette.young);

        let old = Cell { age: 1.0, ..Cell::ALIVE };
        assert_eq!(palette.shade(&old), palette.old);
    }

    #[test]
    fn trail_fades_toward_dead() {
        let palette = Palette::default();
        let fresh = Cell { trail: 1.0, ..Cell::DEAD };
        assert_eq!(palette.shade(&fresh), palette.trail);

        let half = palette.shade(&Cell { trail: 0.5, ..Cell::DEAD });
        assert_eq!(half, Rgba::rgb(0, 128, 0));

        assert_eq!(palette.shade(&Cell::DEAD), palette.dead);
    }

    #[test]
    fn roles_address_their_own_entry() {
        let mut palette = Palette::default();
        palette.set(ColorRole::Trail, Rgba::WHITE);
        assert_eq!(palette.trail, Rgba::WHITE);
        assert_eq!(palette.colors()[2], Rgba::WHITE);
        assert_eq!(Palette::from_colors(palette.colors()), palette);
    }

    #[test]
    fn render_fills_every_pixel() {
        let palette = Palette::default();
        let cells = [Cell::ALIVE, Cell::DEAD, Cell { trail: 1.0, ..Cell::DEAD }];
        let mut pixels = [Rgba::WHITE; 3];
        palette.render(&cells, &mut pixels);
        assert_eq!(pixels, [palette.young, palette.dead, palette.trail]);
    }
}
