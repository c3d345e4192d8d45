// driver.rs - Simulation context: step loop, throttling, pause and restart
//
// The driver owns every piece of mutable simulation state. Collaborators
// never touch it directly; they push `ConfigUpdate`s through a
// `ConfigHandle` and the driver drains the queue at the start of each tick.

use std::num::NonZeroU32;

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use crate::color::{ColorRole, Palette, Rgba};
use crate::error::{ConfigError, EngineError};
use crate::grid::{self, BufferPair};
use crate::kernel;
use crate::patterns::Pattern;
use crate::rules::RuleTable;
use crate::seed;
use crate::share::{self, ShareCode};
use crate::surface::Surface;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Running,
    Paused,
}

/// How the back buffer is populated on start and on every restart.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InitialCondition {
    Empty,
    /// Each cell alive with this probability.
    Random { probability: f64 },
    /// A named pattern centred on the grid.
    Pattern(&'static Pattern),
}

impl Default for InitialCondition {
    fn default() -> Self {
        InitialCondition::Random { probability: 0.5 }
    }
}

/// A change requested by a collaborator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConfigUpdate {
    Rules(RuleTable),
    Palette(Palette),
    Color(ColorRole, Rgba),
    Delay(NonZeroU32),
    Initial(InitialCondition),
    Pause,
    Resume,
    TogglePause,
    /// Restart from a fresh initial condition. `None` draws a new seed.
    Restart { seed: Option<u64> },
}

/// Cloneable sender side of the update queue.
///
/// Textual inputs are validated here, so a rejected input never reaches
/// the queue and the running configuration is left alone.
#[derive(Debug, Clone)]
pub struct ConfigHandle {
    tx: UnboundedSender<ConfigUpdate>,
}

impl ConfigHandle {
    pub fn send(&self, update: ConfigUpdate) {
        if self.tx.send(update).is_err() {
            log::debug!("simulation dropped, ignoring {update:?}");
        }
    }

    pub fn set_rules(&self, rules: RuleTable) {
        self.send(ConfigUpdate::Rules(rules));
    }

    pub fn set_rules_str(&self, text: &str) -> Result<(), ConfigError> {
        let rules = share::decode_rules(text).inspect_err(|err| log::warn!("rejected rules {text:?}: {err}"))?;
        self.set_rules(rules);
        Ok(())
    }

    pub fn set_preset(&self, name: &str) -> Result<(), ConfigError> {
        self.set_rules(RuleTable::preset(name)?);
        Ok(())
    }

    pub fn set_palette(&self, palette: Palette) {
        self.send(ConfigUpdate::Palette(palette));
    }

    pub fn set_color(&self, role: ColorRole, color: Rgba) {
        self.send(ConfigUpdate::Color(role, color));
    }

    pub fn set_color_hex(&self, role: ColorRole, text: &str) -> Result<(), ConfigError> {
        let color = share::decode_color(text).inspect_err(|err| log::warn!("rejected color {text:?}: {err}"))?;
        self.set_color(role, color);
        Ok(())
    }

    /// Applies a whole share code. Nothing is queued unless all of it parses.
    pub fn apply_share(&self, text: &str) -> Result<(), ConfigError> {
        let code: ShareCode = text.parse().inspect_err(|err| log::warn!("rejected share code {text:?}: {err}"))?;
        if let Some(rules) = code.rules {
            self.set_rules(rules);
        }
        if let Some(palette) = code.palette {
            self.set_palette(palette);
        }
        Ok(())
    }

    pub fn set_delay(&self, ticks: u32) -> Result<(), ConfigError> {
        let delay = NonZeroU32::new(ticks).ok_or(ConfigError::ZeroDelay)?;
        self.send(ConfigUpdate::Delay(delay));
        Ok(())
    }

    pub fn pause(&self) {
        self.send(ConfigUpdate::Pause);
    }

    pub fn resume(&self) {
        self.send(ConfigUpdate::Resume);
    }

    pub fn toggle_pause(&self) {
        self.send(ConfigUpdate::TogglePause);
    }

    pub fn restart(&self, seed: Option<u64>) {
        self.send(ConfigUpdate::Restart { seed });
    }
}

/// Result of one tick of the host clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    Paused,
    /// Running, but the delay skipped this tick.
    Throttled,
    /// A step ran and a frame was presented; carries the new clock.
    Stepped { clock: u64 },
}

/// Everything needed to build a [`Simulation`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimOptions {
    pub width        : usize,
    pub height       : usize,
    pub rules        : RuleTable,
    pub palette      : Palette,
    pub delay        : NonZeroU32,
    pub initial      : InitialCondition,
    pub seed         : Option<u64>,
    pub start_paused : bool,
}

impl SimOptions {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            rules: RuleTable::default(),
            palette: Palette::default(),
            delay: NonZeroU32::MIN,
            initial: InitialCondition::default(),
            seed: None,
            start_paused: false,
        }
    }
}

/// Rule and palette changes waiting for the next executed step.
#[derive(Debug, Default)]
struct Pending {
    rules   : Option<RuleTable>,
    palette : Option<Palette>,
}

impl Pending {
    fn is_empty(&self) -> bool {
        self.rules.is_none() && self.palette.is_none()
    }
}

pub struct Simulation {
    buffers : BufferPair,
    pixels  : Vec<Rgba>,
    rules   : RuleTable,
    palette : Palette,
    pending : Pending,
    state   : RunState,
    delay   : NonZeroU32,
    initial : InitialCondition,
    seed    : u64,
    clock   : u64,              // executed steps since the last restart
    ticks   : u64,              // running ticks since the last restart
    restart : Option<Option<u64>>,
    tx      : UnboundedSender<ConfigUpdate>,
    rx      : UnboundedReceiver<ConfigUpdate>,
}

impl Simulation {
    /// Allocates the grid and seeds the first generation.
    pub fn new(options: SimOptions) -> Result<Self, EngineError> {
        let buffers = BufferPair::new(options.width, options.height)?;
        let pixels = grid::allocate(buffers.len(), options.palette.dead)?;
        let (tx, rx) = mpsc::unbounded_channel();

        let mut sim = Self {
            buffers,
            pixels,
            rules: options.rules,
            palette: options.palette,
            pending: Pending::default(),
            state: RunState::Running,
            delay: options.delay,
            initial: options.initial,
            seed: 0,
            clock: 0,
            ticks: 0,
            restart: None,
            tx,
            rx,
        };
        sim.reinitialize(options.seed);
        if options.start_paused {
            sim.state = RunState::Paused;
        }
        Ok(sim)
    }

    pub fn handle(&self) -> ConfigHandle {
        ConfigHandle { tx: self.tx.clone() }
    }

    pub fn width(&self) -> usize {
        self.buffers.width()
    }

    pub fn height(&self) -> usize {
        self.buffers.height()
    }

    pub fn buffers(&self) -> &BufferPair {
        &self.buffers
    }

    pub fn rules(&self) -> &RuleTable {
        &self.rules
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn is_paused(&self) -> bool {
        self.state == RunState::Paused
    }

    pub fn delay(&self) -> NonZeroU32 {
        self.delay
    }

    pub fn initial(&self) -> InitialCondition {
        self.initial
    }

    /// Seed used for the current initial condition.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn clock(&self) -> u64 {
        self.clock
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn population(&self) -> usize {
        self.buffers.population()
    }

    /// Share code of the active rules and palette.
    pub fn share_code(&self) -> ShareCode {
        ShareCode::new(self.rules, self.palette)
    }

    /// Applies an update immediately, as if it had been drained from the
    /// queue. Callers hold `&mut self`, so this is always between steps.
    pub fn submit(&mut self, update: ConfigUpdate) {
        self.absorb(update);
        self.settle();
    }

    pub fn pause(&mut self) {
        self.submit(ConfigUpdate::Pause);
    }

    pub fn resume(&mut self) {
        self.submit(ConfigUpdate::Resume);
    }

    pub fn restart(&mut self, seed: Option<u64>) {
        self.submit(ConfigUpdate::Restart { seed });
    }

    /// Writes a raw alive value into the current generation. Between steps only.
    pub fn poke(&mut self, x: isize, y: isize, value: f32) {
        self.buffers.poke(x, y, value);
    }

    /// One host frame. Drains the update queue, then runs a step unless
    /// paused or throttled.
    pub fn tick<S: Surface + ?Sized>(&mut self, surface: &mut S) -> Result<TickOutcome, EngineError> {
        self.check_surface(surface)?;
        self.drain_queue();

        if self.state == RunState::Paused {
            return Ok(TickOutcome::Paused);
        }

        let due = self.ticks % u64::from(self.delay.get()) == 0;
        self.ticks += 1;
        if !due {
            log::trace!("tick {} throttled", self.ticks);
            return Ok(TickOutcome::Throttled);
        }

        let clock = self.execute_step(surface)?;
        Ok(TickOutcome::Stepped { clock })
    }

    /// Runs exactly one step whether or not the simulation is paused.
    pub fn step_once<S: Surface + ?Sized>(&mut self, surface: &mut S) -> Result<u64, EngineError> {
        self.check_surface(surface)?;
        self.drain_queue();
        self.execute_step(surface)
    }

    /// Presents the current generation without stepping.
    pub fn render_to<S: Surface + ?Sized>(&mut self, surface: &mut S) -> Result<(), EngineError> {
        self.check_surface(surface)?;
        let (width, height) = self.buffers.dimensions();
        self.palette.render(self.buffers.back(), &mut self.pixels);
        surface.present(width, height, &self.pixels);
        Ok(())
    }

    /// A mis-sized surface is rejected before anything is drained or stepped.
    fn check_surface<S: Surface + ?Sized>(&self, surface: &S) -> Result<(), EngineError> {
        let expected = self.buffers.dimensions();
        let found = surface.size();
        if found != expected {
            return Err(EngineError::SurfaceSize { expected, found });
        }
        Ok(())
    }

    fn execute_step<S: Surface + ?Sized>(&mut self, surface: &mut S) -> Result<u64, EngineError> {
        self.apply_pending();

        kernel::step_parallel(&mut self.buffers, &self.rules);
        self.buffers.swap();
        self.clock += 1;
        log::trace!("step {} population {}", self.clock, self.buffers.population());

        self.render_to(surface)?;
        Ok(self.clock)
    }

    fn drain_queue(&mut self) {
        while let Ok(update) = self.rx.try_recv() {
            self.absorb(update);
        }
        self.settle();
    }

    fn absorb(&mut self, update: ConfigUpdate) {
        match update {
            ConfigUpdate::Rules(rules) => self.pending.rules = Some(rules),
            ConfigUpdate::Palette(palette) => self.pending.palette = Some(palette),
            ConfigUpdate::Color(role, color) => {
                let mut palette = self.pending.palette.unwrap_or(self.palette);
                palette.set(role, color);
                self.pending.palette = Some(palette);
            }
            ConfigUpdate::Delay(delay) => self.delay = delay,
            ConfigUpdate::Initial(initial) => self.initial = initial,
            ConfigUpdate::Pause => self.state = RunState::Paused,
            ConfigUpdate::Resume => self.state = RunState::Running,
            ConfigUpdate::TogglePause => {
                self.state = match self.state {
                    RunState::Running => RunState::Paused,
                    RunState::Paused => RunState::Running,
                };
            }
            ConfigUpdate::Restart { seed } => {
                if !self.pending.is_empty() {
                    log::debug!("restart discards pending {:?}", self.pending);
                }
                self.pending = Pending::default();
                self.state = RunState::Running;
                self.restart = Some(seed);
            }
        }
    }

    fn settle(&mut self) {
        if let Some(seed) = self.restart.take() {
            self.reinitialize(seed);
        }
    }

    fn apply_pending(&mut self) {
        let pending = std::mem::take(&mut self.pending);
        if let Some(rules) = pending.rules {
            log::debug!("rules {} -> {}", self.rules, rules);
            self.rules = rules;
        }
        if let Some(palette) = pending.palette {
            log::debug!("palette {} -> {}", share::encode_palette(&self.palette), share::encode_palette(&palette));
            self.palette = palette;
        }
    }

    fn reinitialize(&mut self, requested: Option<u64>) {
        self.seed = requested.unwrap_or_else(rand::random);
        self.buffers.clear();
        self.clock = 0;
        self.ticks = 0;

        match self.initial {
            InitialCondition::Empty => {}
            InitialCondition::Random { probability } => {
                seed::random_fill(&mut self.buffers, probability, self.seed)
            }
            InitialCondition::Pattern(pattern) => seed::place_pattern_centered(&mut self.buffers, pattern),
        }
        log::info!(
            "restarted {}x{} grid with {:?} (seed {:#x}, {} alive)",
            self.buffers.width(),
            self.buffers.height(),
            self.initial,
            self.seed,
            self.buffers.population(),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::FrameBuffer;

    fn empty_sim(width: usize, height: usize) -> Simulation {
        let mut options = SimOptions::new(width, height);
        options.initial = InitialCondition::Empty;
        options.seed = Some(1);
        Simulation::new(options).unwrap()
    }

    #[test]
    fn tick_steps_and_presents() {
        let mut sim = empty_sim(4, 4);
        let mut surface = FrameBuffer::new(4, 4);
        assert_eq!(sim.tick(&mut surface).unwrap(), TickOutcome::Stepped { clock: 1 });
        assert_eq!(surface.presents(), 1);
        assert_eq!(sim.clock(), 1);
    }

    #[test]
    fn mis_sized_surface_is_rejected() {
        let mut sim = empty_sim(4, 4);
        let mut surface = FrameBuffer::new(3, 4);
        assert!(matches!(
            sim.tick(&mut surface),
            Err(EngineError::SurfaceSize { expected: (4, 4), found: (3, 4) })
        ));
    }

    #[test]
    fn mis_sized_surface_leaves_state_untouched() {
        let mut sim = empty_sim(4, 4);
        let mut surface = FrameBuffer::new(3, 4);
        sim.poke(1, 1, 1.0);
        let before = sim.buffers().alive_mask();
        sim.handle().set_rules(RuleTable::caves());

        assert!(sim.tick(&mut surface).is_err());
        assert!(sim.step_once(&mut surface).is_err());
        assert_eq!(sim.clock(), 0);
        assert_eq!(sim.ticks(), 0);
        assert_eq!(*sim.rules(), RuleTable::conway());
        assert_eq!(sim.buffers().alive_mask(), before);
        assert_eq!(surface.presents(), 0);

        // The queued rules are still there for the next good tick.
        let mut surface = FrameBuffer::new(4, 4);
        sim.tick(&mut surface).unwrap();
        assert_eq!(*sim.rules(), RuleTable::caves());
    }

    #[test]
    fn delay_throttles_steps() {
        let mut sim = empty_sim(4, 4);
        let mut surface = FrameBuffer::new(4, 4);
        sim.handle().set_delay(3).unwrap();

        let outcomes: Vec<_> = (0..7).map(|_| sim.tick(&mut surface).unwrap()).collect();
        assert_eq!(outcomes[0], TickOutcome::Stepped { clock: 1 });
        assert_eq!(outcomes[1], TickOutcome::Throttled);
        assert_eq!(outcomes[2], TickOutcome::Throttled);
        assert_eq!(outcomes[3], TickOutcome::Stepped { clock: 2 });
        assert_eq!(outcomes[6], TickOutcome::Stepped { clock: 3 });
        assert_eq!(surface.presents(), 3);
    }

    #[test]
    fn zero_delay_is_rejected() {
        let sim = empty_sim(2, 2);
        assert_eq!(sim.handle().set_delay(0), Err(ConfigError::ZeroDelay));
        assert_eq!(sim.delay().get(), 1);
    }

    #[test]
    fn paused_ticks_keep_updates_pending() {
        let mut sim = empty_sim(4, 4);
        let mut surface = FrameBuffer::new(4, 4);
        let handle = sim.handle();

        handle.pause();
        handle.set_rules(RuleTable::caves());
        assert_eq!(sim.tick(&mut surface).unwrap(), TickOutcome::Paused);
        assert_eq!(*sim.rules(), RuleTable::conway());
        assert_eq!(surface.presents(), 0);

        handle.resume();
        sim.tick(&mut surface).unwrap();
        assert_eq!(*sim.rules(), RuleTable::caves());
    }

    #[test]
    fn color_updates_merge_into_one_palette() {
        let mut sim = empty_sim(2, 2);
        let mut surface = FrameBuffer::new(2, 2);
        let handle = sim.handle();

        handle.set_color(ColorRole::Dead, Rgba::WHITE);
        handle.set_color_hex(ColorRole::Young, "00ff00").unwrap();
        assert!(handle.set_color_hex(ColorRole::Old, "nope").is_err());
        sim.tick(&mut surface).unwrap();

        assert_eq!(sim.palette().dead, Rgba::WHITE);
        assert_eq!(sim.palette().young, Rgba::rgb(0, 255, 0));
        assert_eq!(sim.palette().old, Palette::default().old);
        assert_eq!(surface.pixel(0, 0), Some(Rgba::WHITE));
    }

    #[test]
    fn restart_preempts_queued_updates() {
        let mut sim = empty_sim(4, 4);
        let mut surface = FrameBuffer::new(4, 4);
        let handle = sim.handle();

        handle.set_rules(RuleTable::caves());
        handle.restart(Some(5));
        handle.set_palette(Palette::from_colors([Rgba::WHITE; 4]));
        sim.tick(&mut surface).unwrap();

        assert_eq!(*sim.rules(), RuleTable::conway());
        assert_eq!(sim.palette().dead, Rgba::WHITE);
        assert_eq!(sim.seed(), 5);
    }

    #[test]
    fn step_once_ignores_pause() {
        let mut sim = empty_sim(3, 3);
        let mut surface = FrameBuffer::new(3, 3);
        sim.pause();
        assert_eq!(sim.step_once(&mut surface).unwrap(), 1);
        assert!(sim.is_paused());
        assert_eq!(sim.tick(&mut surface).unwrap(), TickOutcome::Paused);
    }

    #[test]
    fn toggle_pause_flips_state() {
        let mut sim = empty_sim(2, 2);
        sim.submit(ConfigUpdate::TogglePause);
        assert!(sim.is_paused());
        sim.submit(ConfigUpdate::TogglePause);
        assert!(!sim.is_paused());
    }
}
