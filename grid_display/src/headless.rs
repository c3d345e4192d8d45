// headless.rs - Windowless runner driven by a tokio interval

use std::num::NonZeroU32;
use std::time::Duration;

use anyhow::Context;
use conway::{FrameBuffer, SimOptions, Simulation, TickOutcome};

/// Log a progress line every this many generations.
const REPORT_EVERY: u64 = 100;

/// Runs `steps` generations at `fps` ticks per second, then prints the
/// share code of the final configuration. Ctrl-C stops early.
pub fn run(options: SimOptions, steps: u64, fps: NonZeroU32) -> anyhow::Result<()> {
    let runtime = tokio::runtime::Runtime::new().context("failed to start the tokio runtime")?;
    runtime.block_on(drive(options, steps, fps))
}

/// Interval between ticks. Never zero, which `tokio::time::interval` rejects.
fn tick_period(fps: NonZeroU32) -> Duration {
    Duration::from_secs_f64(1.0 / f64::from(fps.get())).max(Duration::from_nanos(1))
}

async fn drive(options: SimOptions, steps: u64, fps: NonZeroU32) -> anyhow::Result<()> {
    let mut sim = Simulation::new(options).context("failed to create the simulation")?;
    let mut frame = FrameBuffer::new(sim.width(), sim.height());
    if sim.is_paused() {
        log::warn!("headless runs ignore --paused");
        sim.resume();
    }

    let mut interval = tokio::time::interval(tick_period(fps));
    let mut clock = 0;
    while clock < steps {
        tokio::select! {
            _ = interval.tick() => {
                if let TickOutcome::Stepped { clock: now } = sim.tick(&mut frame)? {
                    clock = now;
                    if clock % REPORT_EVERY == 0 {
                        log::info!("generation {clock}: {} alive", sim.population());
                    }
                }
            }
            _ = tokio::signal::ctrl_c() => {
                log::warn!("interrupted at generation {clock}");
                break;
            }
        }
    }

    log::info!(
        "finished at generation {} with {} alive ({} frames presented)",
        sim.clock(),
        sim.population(),
        frame.presents(),
    );
    println!("{}", sim.share_code());
    Ok(())
}
