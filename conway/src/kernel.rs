// kernel.rs - Neighbor counting and per-cell update over the whole grid
//
// Every cell reads only the back buffer and writes only its own slot of
// the front buffer, so cells can be evaluated in any order or in parallel.

use rayon::prelude::*;

use crate::cell::Cell;
use crate::grid::BufferPair;
use crate::rules::RuleTable;

const OFFSETS: [(isize, isize); 8] = [
    (-1, -1), (0, -1), (1, -1),
    (-1,  0),          (1,  0),
    (-1,  1), (0,  1), (1,  1),
];

/// Live neighbors of `index` in `cells`, wrapping at the edges.
#[inline]
pub fn live_neighbors(cells: &[Cell], width: usize, height: usize, index: usize) -> u8 {
    let x = (index % width) as isize;
    let y = (index / width) as isize;
    let (w, h) = (width as isize, height as isize);

    let mut count = 0;
    for &(dx, dy) in &OFFSETS {
        let nx = (x + dx).rem_euclid(w) as usize;
        let ny = (y + dy).rem_euclid(h) as usize;
        if cells[ny * width + nx].is_alive() {
            count += 1;
        }
    }
    count
}

/// Next state of one cell.
#[inline]
pub fn evaluate(cells: &[Cell], width: usize, height: usize, index: usize, rules: &RuleTable) -> Cell {
    let current = cells[index];
    let neighbors = live_neighbors(cells, width, height, index);
    current.advance(rules.next_state(current.is_alive(), neighbors))
}

/// Writes the next generation into the front buffer in parallel.
/// The caller swaps afterwards.
pub fn step_parallel(buffers: &mut BufferPair, rules: &RuleTable) {
    let (width, height) = buffers.dimensions();
    let (back, front) = buffers.split();

    front.par_iter_mut().enumerate().for_each(|(index, cell)| {
        *cell = evaluate(back, width, height, index, rules);
    });
}

/// Writes the next generation visiting cells in the given order.
/// `order` must be a permutation of `0..width*height`.
pub fn step_in_order(buffers: &mut BufferPair, rules: &RuleTable, order: &[usize]) {
    let (width, height) = buffers.dimensions();
    let (back, front) = buffers.split();

    for &index in order {
        front[index] = evaluate(back, width, height, index, rules);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::seq::SliceRandom;
    use rand::{Rng, SeedableRng};

    fn random_buffers(width: usize, height: usize, seed: u64) -> BufferPair {
        let mut buffers = BufferPair::new(width, height).unwrap();
        let mut rng = StdRng::seed_from_u64(seed);
        for y in 0..height as isize {
            for x in 0..width as isize {
                if rng.gen_bool(0.4) {
                    buffers.poke(x, y, 1.0);
                }
            }
        }
        buffers
    }

    #[test]
    fn corner_cell_neighbors_wrap() {
        let (width, height) = (5, 4);
        let mut buffers = BufferPair::new(width, height).unwrap();
        buffers.poke(0, 0, 1.0);
        let cells = buffers.back();

        for (x, y) in [(width - 1, height - 1), (width - 1, 0), (0, height - 1)] {
            assert_eq!(live_neighbors(cells, width, height, y * width + x), 1, "({x}, {y})");
        }
        assert_eq!(live_neighbors(cells, width, height, 2 * width + 2), 0);
    }

    #[test]
    fn full_grid_counts_eight() {
        let mut buffers = BufferPair::new(4, 4).unwrap();
        for y in 0..4 {
            for x in 0..4 {
                buffers.poke(x, y, 1.0);
            }
        }
        for index in 0..16 {
            assert_eq!(live_neighbors(buffers.back(), 4, 4, index), 8);
        }
    }

    #[test]
    fn evaluation_order_does_not_matter() {
        let rules = RuleTable::highlife();
        let mut parallel = random_buffers(37, 23, 7);
        let mut shuffled = parallel.clone();

        let mut order: Vec<usize> = (0..parallel.len()).collect();
        order.shuffle(&mut StdRng::seed_from_u64(99));

        for _ in 0..5 {
            step_parallel(&mut parallel, &rules);
            parallel.swap();
            step_in_order(&mut shuffled, &rules, &order);
            shuffled.swap();
            assert_eq!(parallel.back(), shuffled.back());
        }
    }

    #[test]
    fn kernel_never_touches_back_buffer() {
        let rules = RuleTable::conway();
        let mut buffers = random_buffers(16, 16, 3);
        let before = buffers.back().to_vec();
        step_parallel(&mut buffers, &rules);
        assert_eq!(buffers.back(), &before[..]);
    }
}
