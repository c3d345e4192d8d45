// seed.rs - Initial conditions: seeded random fill and pattern placement

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::ConfigError;
use crate::grid::BufferPair;
use crate::patterns::Pattern;

/// Checks a fill percentage and turns it into a probability.
pub fn fill_probability(percent: f64) -> Result<f64, ConfigError> {
    if !(0.0..=100.0).contains(&percent) {
        return Err(ConfigError::FillPercent(percent));
    }
    Ok(percent / 100.0)
}

/// Pokes each cell alive with probability `probability`, visiting cells in
/// row-major order with a generator seeded from `seed`.
pub fn random_fill(buffers: &mut BufferPair, probability: f64, seed: u64) {
    let probability = probability.clamp(0.0, 1.0);
    let mut rng = StdRng::seed_from_u64(seed);
    let (width, height) = buffers.dimensions();

    for y in 0..height as isize {
        for x in 0..width as isize {
            if rng.gen_bool(probability) {
                buffers.poke(x, y, 1.0);
            }
        }
    }
    log::debug!("random fill p={probability:.3} seed={seed:#x} -> {} alive", buffers.population());
}

/// Pokes a pattern with its top-left corner at `(x, y)`. Cells wrap.
pub fn place_pattern(buffers: &mut BufferPair, pattern: &Pattern, x: isize, y: isize) {
    for &(dx, dy) in pattern.cells {
        buffers.poke(x + dx, y + dy, 1.0);
    }
}

/// Pokes a pattern centred on the grid.
pub fn place_pattern_centered(buffers: &mut BufferPair, pattern: &Pattern) {
    let (extent_x, extent_y) = pattern.extent();
    let x = (buffers.width() as isize - extent_x) / 2;
    let y = (buffers.height() as isize - extent_y) / 2;
    place_pattern(buffers, pattern, x, y);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fill_percent_is_validated() {
        assert_eq!(fill_probability(25.0).unwrap(), 0.25);
        assert!(matches!(fill_probability(101.0), Err(ConfigError::FillPercent(_))));
        assert!(fill_probability(-0.5).is_err());
        assert!(fill_probability(f64::NAN).is_err());
    }

    #[test]
    fn same_seed_same_fill() {
        let mut a = BufferPair::new(40, 30).unwrap();
        let mut b = BufferPair::new(40, 30).unwrap();
        random_fill(&mut a, 0.5, 1234);
        random_fill(&mut b, 0.5, 1234);
        assert_eq!(a.alive_mask(), b.alive_mask());

        let mut c = BufferPair::new(40, 30).unwrap();
        random_fill(&mut c, 0.5, 4321);
        assert_ne!(a.alive_mask(), c.alive_mask());
    }

    #[test]
    fn fill_extremes() {
        let mut empty = BufferPair::new(10, 10).unwrap();
        random_fill(&mut empty, 0.0, 1);
        assert_eq!(empty.population(), 0);

        let mut full = BufferPair::new(10, 10).unwrap();
        random_fill(&mut full, 1.0, 1);
        assert_eq!(full.population(), 100);
    }

    #[test]
    fn centered_pattern_lands_in_the_middle() {
        let mut buffers = BufferPair::new(9, 9).unwrap();
        place_pattern_centered(&mut buffers, Pattern::find("blinker").unwrap());
        assert!(buffers.is_alive(3, 4));
        assert!(buffers.is_alive(4, 4));
        assert!(buffers.is_alive(5, 4));
        assert_eq!(buffers.population(), 3);
    }

    #[test]
    fn pattern_wraps_past_edges() {
        let mut buffers = BufferPair::new(4, 4).unwrap();
        place_pattern(&mut buffers, Pattern::find("blinker").unwrap(), 3, 0);
        assert!(buffers.is_alive(3, 0));
        assert!(buffers.is_alive(0, 0));
        assert!(buffers.is_alive(1, 0));
    }
}
