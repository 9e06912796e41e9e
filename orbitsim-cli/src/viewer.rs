//! Interactive orbit viewer
//!
//! Draws bodies and their trails, labels each planet with its distance to the
//! reference body and reloads the scenario file whenever it changes on disk.

use crate::{load_scenario, ScenarioSource};
use eframe::egui;
use glam::DVec2;
use notify::{Event, RecommendedWatcher, Watcher};
use orbitsim_core::{build_simulation_context, step_simulation, SimulationContext, AU};
use std::collections::HashSet;
use std::sync::mpsc;

const ZOOM_STEP: f64 = 1.1;

const PALETTE: [egui::Color32; 9] = [
    egui::Color32::WHITE,
    egui::Color32::from_rgb(100, 150, 237),
    egui::Color32::from_rgb(190, 40, 50),
    egui::Color32::from_rgb(80, 75, 80),
    egui::Color32::from_rgb(230, 220, 200),
    egui::Color32::from_rgb(255, 200, 100),
    egui::Color32::from_rgb(210, 180, 140),
    egui::Color32::from_rgb(173, 216, 230),
    egui::Color32::from_rgb(70, 130, 180),
];

pub fn launch(source: ScenarioSource, steps: Option<u64>) -> Result<(), Box<dyn std::error::Error>> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([800.0, 800.0])
            .with_title("orbitsim"),
        ..Default::default()
    };

    eframe::run_native(
        "orbitsim",
        options,
        Box::new(move |cc| Ok(Box::new(OrbitViewer::new(source, steps, cc)))),
    )
    .map_err(|e| format!("viewer failed: {}", e))?;
    Ok(())
}

/// Screen radius for a body, growing with the order of magnitude of its mass
fn body_radius(mass: f64) -> f32 {
    ((mass.log10() - 20.0) * 2.5).clamp(4.0, 30.0) as f32
}

pub struct OrbitViewer {
    source: ScenarioSource,
    steps_override: Option<u64>,
    ctx_opt: Option<SimulationContext>,
    last_load_error: Option<String>,
    playing: bool,
    steps_per_frame: usize,
    scale_factor: f64,
    selected: HashSet<usize>,
    #[allow(dead_code)] // Kept alive to maintain file watching
    file_watcher: Option<RecommendedWatcher>,
    file_receiver: mpsc::Receiver<notify::Result<Event>>,
}

impl OrbitViewer {
    pub fn new(
        source: ScenarioSource,
        steps_override: Option<u64>,
        _cc: &eframe::CreationContext<'_>,
    ) -> Self {
        let (tx, rx) = mpsc::channel();
        let mut watcher = notify::recommended_watcher(move |res| {
            let _ = tx.send(res);
        })
        .ok();

        if let (Some(w), Some(path)) = (watcher.as_mut(), source.file.as_ref()) {
            if let Err(e) = w.watch(path, notify::RecursiveMode::NonRecursive) {
                log::warn!("not watching {}: {}", path.display(), e);
            }
        }

        let mut app = Self {
            source,
            steps_override,
            ctx_opt: None,
            last_load_error: None,
            playing: false,
            steps_per_frame: 1,
            scale_factor: 1.0,
            selected: HashSet::new(),
            file_watcher: watcher,
            file_receiver: rx,
        };

        app.reload_context();
        app
    }

    fn reload_context(&mut self) {
        let built = load_scenario(&self.source).and_then(|mut scenario| {
            if let Some(steps) = self.steps_override {
                scenario.simulate.steps = steps;
            }
            build_simulation_context(&scenario).map_err(Into::into)
        });

        match built {
            Ok(ctx) => {
                self.ctx_opt = Some(ctx);
                self.last_load_error = None;
                self.selected.clear();
            }
            Err(e) => {
                log::warn!("reload failed: {}", e);
                self.last_load_error = Some(e.to_string());
                self.ctx_opt = None;
                self.playing = false;
            }
        }
    }

    fn check_file_changes(&mut self) {
        let mut needs_reload = false;
        while let Ok(event) = self.file_receiver.try_recv() {
            match event {
                Ok(Event {
                    kind: notify::EventKind::Modify(_),
                    ..
                }) => needs_reload = true,
                Ok(_) => {}
                Err(e) => log::warn!("file watcher error: {}", e),
            }
        }

        if needs_reload {
            log::info!("scenario changed on disk, reloading");
            self.reload_context();
        }
    }

    fn handle_zoom_keys(&mut self, ctx: &egui::Context) {
        ctx.input(|i| {
            if i.key_pressed(egui::Key::Num0) {
                self.scale_factor *= ZOOM_STEP;
            }
            if i.key_pressed(egui::Key::Minus) {
                self.scale_factor /= ZOOM_STEP;
            }
        });
    }

    fn advance(&mut self) {
        let Some(ctx) = self.ctx_opt.as_mut() else {
            return;
        };
        for _ in 0..self.steps_per_frame {
            match step_simulation(ctx) {
                Ok(false) => {}
                Ok(true) => {
                    self.playing = false;
                    break;
                }
                Err(e) => {
                    self.last_load_error = Some(e.to_string());
                    self.playing = false;
                    break;
                }
            }
        }
    }

    fn draw_system(&mut self, ui: &mut egui::Ui) {
        let (response, painter) =
            ui.allocate_painter(ui.available_size(), egui::Sense::click());
        let rect = response.rect;
        painter.rect_filled(rect, 0.0, egui::Color32::BLACK);

        let Some(ctx) = self.ctx_opt.as_ref() else {
            return;
        };

        // 1 AU spans a quarter of the shorter side at zoom 1
        let center = rect.center();
        let scale = f64::from(rect.width().min(rect.height())) / 4.0 / AU * self.scale_factor;
        let to_screen = |p: DVec2| {
            egui::pos2(
                center.x + (p.x * scale) as f32,
                center.y - (p.y * scale) as f32,
            )
        };

        let bodies = ctx.simulator.bodies();

        if response.clicked() {
            if let Some(pointer) = response.interact_pointer_pos() {
                for (i, body) in bodies.iter().enumerate() {
                    let screen = to_screen(body.position);
                    if screen.distance(pointer) <= body_radius(body.mass()) {
                        if !self.selected.remove(&i) {
                            self.selected.insert(i);
                        }
                    }
                }
            }
        }

        for (i, body) in bodies.iter().enumerate() {
            let color = PALETTE[i % PALETTE.len()];
            if body.trail.len() >= 2 {
                let points: Vec<egui::Pos2> = body.trail.iter().map(to_screen).collect();
                painter.add(egui::Shape::line(points, egui::Stroke::new(2.0, color)));
            }
        }

        for &i in &self.selected {
            let Some(body) = bodies.get(i) else { continue };
            let from = to_screen(body.position);
            for (j, other) in bodies.iter().enumerate() {
                if j != i {
                    painter.line_segment(
                        [from, to_screen(other.position)],
                        egui::Stroke::new(1.0, egui::Color32::GRAY),
                    );
                }
            }
        }

        for (i, body) in bodies.iter().enumerate() {
            let screen = to_screen(body.position);
            let radius = body_radius(body.mass());
            painter.circle_filled(screen, radius, PALETTE[i % PALETTE.len()]);

            if self.selected.contains(&i) {
                painter.circle_stroke(
                    screen,
                    radius + 5.0,
                    egui::Stroke::new(2.0, egui::Color32::YELLOW),
                );
            }

            if !body.is_reference {
                painter.text(
                    screen,
                    egui::Align2::CENTER_CENTER,
                    format!("{:.1}km", body.reference_distance / 1000.0),
                    egui::FontId::proportional(12.0),
                    egui::Color32::WHITE,
                );
            }
        }
    }
}

impl eframe::App for OrbitViewer {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.check_file_changes();
        self.handle_zoom_keys(ctx);

        // Top bar with controls
        egui::TopBottomPanel::top("controls").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if ui.button(if self.playing { "⏸ Pause" } else { "▶ Play" }).clicked() {
                    self.playing = !self.playing;
                }

                if ui.button("⏮ Reset").clicked() {
                    self.reload_context();
                    self.playing = false;
                }

                if ui.button("⏭ Step").clicked() {
                    let steps = self.steps_per_frame;
                    self.steps_per_frame = 1;
                    self.advance();
                    self.steps_per_frame = steps;
                }

                ui.separator();
                ui.label("Days/frame:");
                ui.add(egui::Slider::new(&mut self.steps_per_frame, 1..=30));

                ui.separator();
                ui.label(format!("Zoom: {:.2}×", self.scale_factor));

                if let Some(ref ctx) = self.ctx_opt {
                    ui.separator();
                    ui.label(format!("Step: {} / {}", ctx.current_step, ctx.max_steps));
                }
            });
        });

        if let Some(ref sim) = self.ctx_opt {
            let bodies = sim.simulator.bodies();
            let lines: Vec<String> = self
                .selected
                .iter()
                .filter_map(|&i| bodies.get(i))
                .map(|b| {
                    format!(
                        "Body: {} Distance: {:.1} km",
                        b.label(),
                        b.reference_distance / 1000.0
                    )
                })
                .collect();
            if !lines.is_empty() {
                egui::TopBottomPanel::bottom("selection").show(ctx, |ui| {
                    for line in lines {
                        ui.label(line);
                    }
                });
            }
        }

        if let Some(ref error) = self.last_load_error {
            let error = error.clone();
            egui::TopBottomPanel::bottom("errors").show(ctx, |ui| {
                ui.label(egui::RichText::new(format!("Error: {}", error)).color(egui::Color32::RED));
            });
        }

        egui::CentralPanel::default()
            .frame(egui::Frame::none())
            .show(ctx, |ui| self.draw_system(ui));

        if self.playing {
            self.advance();
            ctx.request_repaint();
        }
    }
}
