//! Rule-table cellular automaton on a double-buffered toroidal grid.
//!
//! A [`Simulation`] owns two cell buffers. Each step counts the live
//! neighbors of every cell in the back buffer, looks the count up in a
//! nine-entry [`RuleTable`] and writes the result to the front buffer; the
//! buffers then swap and the new generation is shaded through a
//! [`Palette`] onto a [`Surface`].
//!
//! ```
//! use conway::{FrameBuffer, InitialCondition, RuleTable, SimOptions, Simulation};
//!
//! let mut options = SimOptions::new(64, 48);
//! options.rules = RuleTable::highlife();
//! options.initial = InitialCondition::Random { probability: 0.25 };
//! options.seed = Some(7);
//!
//! let mut sim = Simulation::new(options).unwrap();
//! let mut surface = FrameBuffer::new(64, 48);
//! sim.tick(&mut surface).unwrap();
//! assert_eq!(sim.clock(), 1);
//! ```

pub mod cell;
pub mod color;
pub mod config;
pub mod driver;
pub mod error;
pub mod grid;
pub mod kernel;
pub mod patterns;
pub mod rules;
pub mod seed;
pub mod share;
pub mod surface;

pub use cell::Cell;
pub use color::{ColorRole, Palette, Rgba};
pub use config::SimConfig;
pub use driver::{ConfigHandle, ConfigUpdate, InitialCondition, RunState, SimOptions, Simulation, TickOutcome};
pub use error::{ConfigError, EngineError};
pub use grid::BufferPair;
pub use patterns::{PATTERNS, Pattern};
pub use rules::{Outcome, PRESETS, RuleTable};
pub use share::ShareCode;
pub use surface::{FrameBuffer, Surface};
