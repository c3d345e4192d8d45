// main.rs - Viewer and headless runner for the rule-table automaton

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use conway::{RuleTable, ShareCode, SimConfig, Simulation, share};
use eframe::egui;

mod headless;
mod surface;
mod ui;

use ui::Viewer;

#[derive(Debug, Parser)]
#[command(name = "grid_display", about = "Double-buffered rule-table cellular automaton")]
struct Args {
    /// JSON settings file; flags below override it.
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long)]
    width: Option<usize>,

    #[arg(long)]
    height: Option<usize>,

    /// Percentage of cells alive after a restart.
    #[arg(long)]
    fill: Option<f64>,

    /// Run one step every DELAY frames.
    #[arg(long)]
    delay: Option<u32>,

    /// Seed of the first random fill.
    #[arg(long)]
    seed: Option<u64>,

    /// conway, caves or highlife.
    #[arg(long)]
    preset: Option<String>,

    /// Share code, e.g. `rules=001300000&colors=ff0000ff00ff00ff00000000`.
    #[arg(long)]
    share: Option<String>,

    /// Start from a named pattern instead of a random fill.
    #[arg(long)]
    pattern: Option<String>,

    /// Start paused.
    #[arg(long)]
    paused: bool,

    /// Run STEPS steps without a window and print the final share code.
    #[arg(long, value_name = "STEPS")]
    headless: Option<u64>,

    /// Tick rate of the headless runner.
    #[arg(long, default_value_t = 60)]
    fps: u32,

    /// Screen pixels per cell in the viewer.
    #[arg(long, default_value_t = 4.0)]
    cell_size: f32,
}

impl Args {
    fn settings(&self) -> anyhow::Result<SimConfig> {
        let mut config = match &self.config {
            Some(path) => SimConfig::load_from_disk(path)
                .with_context(|| format!("loading {}", path.display()))?,
            None => SimConfig::default(),
        };

        if let Some(width) = self.width {
            config.width = width;
        }
        if let Some(height) = self.height {
            config.height = height;
        }
        if let Some(fill) = self.fill {
            config.fill_percent = fill;
        }
        if let Some(delay) = self.delay {
            config.delay = delay;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
        if let Some(name) = &self.preset {
            config.rules = RuleTable::preset(name)?;
        }
        if let Some(text) = &self.share {
            let code: ShareCode = text.parse().context("invalid share code")?;
            if let Some(rules) = code.rules {
                config.rules = rules;
            }
            if let Some(palette) = code.palette {
                config.colors = Some(share::encode_palette(&palette));
            }
        }
        if self.pattern.is_some() {
            config.pattern = self.pattern.clone();
        }
        config.start_paused |= self.paused;
        Ok(config)
    }
}

fn main() -> anyhow::Result<()> {
    use env_logger::Env;
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let settings = args.settings()?;
    let options = settings.to_options().context("invalid settings")?;

    if let Some(steps) = args.headless {
        let fps = std::num::NonZeroU32::new(args.fps).context("--fps must be at least 1")?;
        return headless::run(options, steps, fps);
    }

    let sim = Simulation::new(options).context("failed to create the simulation")?;
    let cell_size = args.cell_size.max(1.0);
    let inner = [
        sim.width() as f32 * cell_size + 16.0,
        sim.height() as f32 * cell_size + 96.0,
    ];
    let native = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size(inner),
        ..Default::default()
    };

    eframe::run_native(
        "Rule-table Life",
        native,
        Box::new(move |cc| Box::new(Viewer::new(&cc.egui_ctx, sim, cell_size))),
    )
    .map_err(|err| anyhow::anyhow!("viewer failed: {err}"))
}
