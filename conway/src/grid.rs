// grid.rs - Double-buffered toroidal grid storage

use crate::cell::Cell;
use crate::error::EngineError;

/// Two equally sized cell buffers in back (read) and front (write) roles.
///
/// The back buffer always holds the current generation. A step writes the
/// front buffer and then [`BufferPair::swap`]s, so the freshly written cells
/// become the new back buffer.
#[derive(Debug, Clone)]
pub struct BufferPair {
    width  : usize,
    height : usize,
    back   : Vec<Cell>,
    front  : Vec<Cell>,
}

/// Allocates `cells` copies of `value`, reporting failure instead of aborting.
pub(crate) fn allocate<T: Clone>(cells: usize, value: T) -> Result<Vec<T>, EngineError> {
    let mut buffer = Vec::new();
    buffer
        .try_reserve_exact(cells)
        .map_err(|source| EngineError::Allocation { cells, source })?;
    buffer.resize(cells, value);
    Ok(buffer)
}

impl BufferPair {
    /// Allocates both buffers filled with dead cells.
    pub fn new(width: usize, height: usize) -> Result<Self, EngineError> {
        if width == 0 || height == 0 {
            return Err(EngineError::InvalidDimensions { width, height });
        }
        let cells = width
            .checked_mul(height)
            .ok_or(EngineError::SizeOverflow { width, height })?;

        let back = allocate(cells, Cell::DEAD)?;
        let front = allocate(cells, Cell::DEAD)?;
        log::info!("allocated {width}x{height} grid ({cells} cells per buffer)");

        Ok(Self { width, height, back, front })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn dimensions(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    pub fn len(&self) -> usize {
        self.back.len()
    }

    pub fn is_empty(&self) -> bool {
        self.back.is_empty()
    }

    /// Flat index of a coordinate, wrapping both axes.
    #[inline]
    pub fn wrap_index(&self, x: isize, y: isize) -> usize {
        let x = x.rem_euclid(self.width as isize) as usize;
        let y = y.rem_euclid(self.height as isize) as usize;
        y * self.width + x
    }

    /// Current generation.
    pub fn back(&self) -> &[Cell] {
        &self.back
    }

    /// Read-only current generation plus the writable next generation.
    pub fn split(&mut self) -> (&[Cell], &mut [Cell]) {
        (&self.back, &mut self.front)
    }

    /// Exchanges the buffer roles. Only the vector handles move.
    pub fn swap(&mut self) {
        std::mem::swap(&mut self.back, &mut self.front);
    }

    /// Cell of the current generation at a wrapped coordinate.
    pub fn get(&self, x: isize, y: isize) -> Cell {
        self.back[self.wrap_index(x, y)]
    }

    pub fn is_alive(&self, x: isize, y: isize) -> bool {
        self.get(x, y).is_alive()
    }

    /// Writes a raw alive value into the current generation.
    /// Meant for initialization; trail and age reset to the dead baseline.
    pub fn poke(&mut self, x: isize, y: isize, value: f32) {
        let index = self.wrap_index(x, y);
        self.back[index] = Cell::raw(value);
    }

    /// Resets both buffers to dead cells.
    pub fn clear(&mut self) {
        self.back.fill(Cell::DEAD);
        self.front.fill(Cell::DEAD);
    }

    pub fn population(&self) -> usize {
        self.back.iter().filter(|cell| cell.is_alive()).count()
    }

    /// Alive flags of the current generation in row-major order.
    pub fn alive_mask(&self) -> Vec<bool> {
        self.back.iter().map(Cell::is_alive).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_dimensions() {
        assert!(matches!(
            BufferPair::new(0, 4),
            Err(EngineError::InvalidDimensions { width: 0, height: 4 })
        ));
        assert!(BufferPair::new(4, 0).is_err());
    }

    #[test]
    fn rejects_overflowing_dimensions() {
        assert!(matches!(
            BufferPair::new(usize::MAX, 2),
            Err(EngineError::SizeOverflow { .. })
        ));
    }

    #[test]
    fn oversized_allocation_is_an_error() {
        assert!(matches!(
            allocate(usize::MAX, 0u64),
            Err(EngineError::Allocation { cells: usize::MAX, .. })
        ));
    }

    #[test]
    fn poke_wraps_coordinates() {
        let mut buffers = BufferPair::new(4, 3).unwrap();
        buffers.poke(-1, -1, 1.0);
        assert!(buffers.is_alive(3, 2));
        assert_eq!(buffers.population(), 1);
    }

    #[test]
    fn swap_exchanges_roles_without_copying() {
        let mut buffers = BufferPair::new(2, 2).unwrap();
        buffers.poke(0, 0, 1.0);
        let back_ptr = buffers.back().as_ptr();

        buffers.swap();
        assert_eq!(buffers.population(), 0);
        buffers.swap();

        assert_eq!(buffers.back().as_ptr(), back_ptr);
        assert!(buffers.is_alive(0, 0));
    }

    #[test]
    fn clear_resets_both_buffers() {
        let mut buffers = BufferPair::new(3, 3).unwrap();
        buffers.poke(1, 1, 1.0);
        buffers.swap();
        buffers.poke(2, 2, 1.0);
        buffers.clear();
        assert_eq!(buffers.population(), 0);
        buffers.swap();
        assert_eq!(buffers.population(), 0);
    }
}
