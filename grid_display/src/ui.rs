// ui.rs - eframe app: ticks the simulation once per frame and shows it
//
// Controls only push updates through the ConfigHandle; the simulation
// applies them at the next step boundary.

use eframe::egui;
use egui::{Color32, Key, Rect, Sense, Vec2, pos2};

use conway::{
    ConfigHandle, ConfigUpdate, InitialCondition, PATTERNS, PRESETS, Simulation, TickOutcome,
};

use crate::surface::TextureSurface;

const MAX_DELAY: u32 = 120;

pub struct Viewer {
    sim           : Simulation,
    handle        : ConfigHandle,
    surface       : TextureSurface,
    cell_size     : f32,
    fill          : f64,                // probability used by the "Random" start
    share_text    : String,
    share_status  : Option<String>,
}

impl Viewer {
    pub fn new(ctx: &egui::Context, mut sim: Simulation, cell_size: f32) -> Self {
        let mut surface = TextureSurface::new(ctx, sim.width(), sim.height());
        if let Err(err) = sim.render_to(&mut surface) {
            log::error!("initial frame: {err}");
        }
        let fill = match sim.initial() {
            InitialCondition::Random { probability } => probability,
            _ => 0.5,
        };
        let share_text = sim.share_code().to_string();

        Self {
            handle: sim.handle(),
            sim,
            surface,
            cell_size,
            fill,
            share_text,
            share_status: None,
        }
    }

    fn handle_keys(&mut self, ctx: &egui::Context) {
        // Keys are ignored while a text field has focus.
        if ctx.wants_keyboard_input() {
            return;
        }
        let delay = self.sim.delay().get();
        ctx.input(|input| {
            if input.key_pressed(Key::Space) {
                self.handle.toggle_pause();
            }
            if input.key_pressed(Key::R) {
                self.handle.restart(None);
            }
            let requested = if input.key_pressed(Key::ArrowUp) {
                Some((delay + 1).min(MAX_DELAY))
            } else if input.key_pressed(Key::ArrowDown) {
                Some(delay.saturating_sub(1).max(1))
            } else {
                None
            };
            if let Some(ticks) = requested {
                if let Err(err) = self.handle.set_delay(ticks) {
                    log::warn!("delay {ticks}: {err}");
                }
            }
            for (key, preset) in [Key::Num1, Key::Num2, Key::Num3].into_iter().zip(PRESETS) {
                if input.key_pressed(key) {
                    self.handle.set_rules(preset.table);
                }
            }
        });
    }

    fn step_once(&mut self) {
        if let Err(err) = self.sim.step_once(&mut self.surface) {
            log::error!("step failed: {err}");
        }
    }

    fn controls(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            let button_text = if self.sim.is_paused() { "▶ Start" } else { "⏸ Pause" };
            if ui.button(button_text).clicked() {
                self.handle.toggle_pause();
            }
            if ui.button("⏭ Step").clicked() {
                self.step_once();
            }
            if ui.button("🔄 Restart").clicked() {
                self.handle.restart(None);
            }

            ui.separator();

            let current = self.sim.rules().preset_name().unwrap_or("custom");
            egui::ComboBox::from_id_source("rule_preset")
                .selected_text(current)
                .show_ui(ui, |ui| {
                    for preset in PRESETS {
                        if ui.selectable_label(current == preset.name, preset.name).clicked() {
                            self.handle.set_rules(preset.table);
                        }
                    }
                });

            let start = match self.sim.initial() {
                InitialCondition::Pattern(pattern) => pattern.name,
                InitialCondition::Random { .. } => "Random",
                InitialCondition::Empty => "Empty",
            };
            egui::ComboBox::from_id_source("start_pattern")
                .selected_text(start)
                .show_ui(ui, |ui| {
                    if ui.selectable_label(start == "Random", "Random").clicked() {
                        let initial = InitialCondition::Random { probability: self.fill };
                        self.handle.send(ConfigUpdate::Initial(initial));
                        self.handle.restart(None);
                    }
                    for pattern in PATTERNS {
                        if ui.selectable_label(start == pattern.name, pattern.name).clicked() {
                            self.handle.send(ConfigUpdate::Initial(InitialCondition::Pattern(pattern)));
                            self.handle.restart(None);
                        }
                    }
                });

            ui.separator();
            ui.label(format!("Generation: {}", self.sim.clock()));
            ui.label(format!("Live cells: {}", self.sim.population()));
            ui.label(format!("Delay: {}", self.sim.delay()));
        });

        ui.horizontal(|ui| {
            ui.label("Share:");
            ui.add(egui::TextEdit::singleline(&mut self.share_text).desired_width(360.0));
            if ui.button("Apply").clicked() {
                self.share_status = match self.handle.apply_share(&self.share_text) {
                    Ok(()) => None,
                    Err(err) => Some(err.to_string()),
                };
            }
            if ui.button("Current").clicked() {
                self.share_text = self.sim.share_code().to_string();
                self.share_status = None;
            }
            if let Some(status) = &self.share_status {
                ui.colored_label(Color32::LIGHT_RED, status.as_str());
            }
        });
    }

    fn grid(&mut self, ui: &mut egui::Ui) {
        let size = Vec2::new(
            self.sim.width() as f32 * self.cell_size,
            self.sim.height() as f32 * self.cell_size,
        );
        let (response, painter) = ui.allocate_painter(size, Sense::click());
        let rect = response.rect;

        painter.image(
            self.surface.texture().id(),
            rect,
            Rect::from_min_max(pos2(0.0, 0.0), pos2(1.0, 1.0)),
            Color32::WHITE,
        );

        // Toggle cells by clicking while paused
        if self.sim.is_paused() && response.clicked() {
            if let Some(pos) = response.interact_pointer_pos() {
                let x = ((pos.x - rect.min.x) / self.cell_size) as isize;
                let y = ((pos.y - rect.min.y) / self.cell_size) as isize;
                let alive = self.sim.buffers().is_alive(x, y);
                self.sim.poke(x, y, if alive { 0.0 } else { 1.0 });
                if let Err(err) = self.sim.render_to(&mut self.surface) {
                    log::error!("redraw failed: {err}");
                }
            }
        }
    }
}

impl eframe::App for Viewer {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.handle_keys(ctx);
        if !ctx.wants_keyboard_input() && ctx.input(|input| input.key_pressed(Key::N)) {
            self.step_once();
        }

        match self.sim.tick(&mut self.surface) {
            Ok(TickOutcome::Stepped { clock }) => log::trace!("presented generation {clock}"),
            Ok(_) => {}
            Err(err) => log::error!("tick failed: {err}"),
        }

        egui::TopBottomPanel::top("controls").show(ctx, |ui| self.controls(ui));

        self.surface.upload();
        egui::CentralPanel::default()
            .frame(egui::Frame::none().fill(Color32::BLACK))
            .show(ctx, |ui| self.grid(ui));

        // Keep ticking; pause state is handled inside the simulation
        ctx.request_repaint();
    }
}
