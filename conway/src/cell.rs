// cell.rs - Per-cell state channels

/// A cell counts as alive when its alive channel is above this value.
pub const ALIVE_THRESHOLD: f32 = 0.5;

/// Age gained by a living cell on every step it survives.
pub const AGE_STEP: f32 = 0.01;

/// Multiplier applied to the trail of a dead cell on every step.
pub const TRAIL_DECAY: f32 = 0.95;

/// Trails below this are snapped to zero (one 8-bit color level).
pub const TRAIL_EPSILON: f32 = 1.0 / 255.0;

/// Raw state of one cell. Every channel lives in `0.0..=1.0`.
///
/// `alive` is the only authoritative channel. `trail` and `age` are
/// derived by the evaluator and only feed the color mapping.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Cell {
    pub alive : f32,
    pub trail : f32,   // fades after death
    pub age   : f32,   // grows while alive, saturates at 1.0
}

impl Cell {
    pub const DEAD: Cell = Cell { alive: 0.0, trail: 0.0, age: 0.0 };
    pub const ALIVE: Cell = Cell { alive: 1.0, trail: 0.0, age: 0.0 };

    /// Cell holding only a raw alive value, as written by a poke.
    pub fn raw(value: f32) -> Self {
        Self { alive: value.clamp(0.0, 1.0), ..Self::DEAD }
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        self.alive > ALIVE_THRESHOLD
    }

    /// Derives the next cell from this one given the next alive state.
    #[inline]
    pub fn advance(&self, next_alive: bool) -> Cell {
        match (self.is_alive(), next_alive) {
            (false, true) => Cell::ALIVE, // just born
            (true, true) => Cell {
                alive: 1.0,
                trail: 0.0,
                age: (self.age + AGE_STEP).min(1.0),
            },
            (true, false) => Cell { alive: 0.0, trail: 1.0, age: 0.0 },
            (false, false) => {
                let trail = self.trail * TRAIL_DECAY;
                Cell {
                    alive: 0.0,
                    trail: if trail < TRAIL_EPSILON { 0.0 } else { trail },
                    age: 0.0,
                }
            }
        }
    }
}
