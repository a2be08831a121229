use bevy::prelude::*;
use bevy_egui::EguiContexts;
use bevy_egui::egui;

use crate::render_loop::RenderLoop;
use crate::resources::{ResetSimulation, SimSettings};
use crate::simulation::Simulation;

/// Panel for the live-tunable constants.
pub fn ui_controls(
    mut contexts: EguiContexts,
    mut settings: ResMut<SimSettings>,
    mut sim: ResMut<Simulation>,
    render_loop: Res<RenderLoop>,
    mut frames_rendered: Local<usize>,
    mut reset: ResMut<ResetSimulation>,
) {
    if *frames_rendered < 5 {
        *frames_rendered += 1;
        return;
    }

    if let Ok(ctx) = contexts.ctx_mut() {
        egui::Window::new("Gravity Controls")
            .default_pos(egui::pos2(10.0, 10.0))
            .max_size([320.0, 360.0])
            .vscroll(true)
            .show(ctx, |ui| {
                ui.heading("Physics");
                let config = &mut sim.config;
                ui.add(egui::Slider::new(&mut config.g, 0.0..=2000.0).text("G (Gravity)"));
                ui.add(egui::Slider::new(&mut config.restitution, 0.0..=1.0).text("Restitution"));
                ui.add(egui::Slider::new(&mut config.body_radius, 2.0..=30.0).text("Body Radius"));
                ui.add(
                    egui::Slider::new(&mut config.dt, 0.001..=0.05)
                        .logarithmic(true)
                        .text("Timestep (dt)"),
                );
                ui.add(egui::Slider::new(&mut config.path_steps, 1..=200).text("Prediction Steps"));
                ui.add(
                    egui::Slider::new(&mut config.pi, 0.1..=std::f32::consts::PI)
                        .text("Arc Sweep (PI)"),
                );

                ui.separator();
                ui.heading("Drawing");
                ui.checkbox(&mut settings.show_links, "Show Links");
                ui.checkbox(&mut settings.show_ghosts, "Show Wrap Images");

                ui.separator();
                ui.heading("Status");
                if sim.bodies.is_empty() {
                    ui.label("No bodies: click to add one");
                } else {
                    ui.label(format!("Bodies: {}", sim.bodies.len()));
                }
                ui.label(format!("Kinetic Energy: {:.0}", sim.kinetic_energy()));
                ui.label(format!("Momentum: {:.1}", sim.total_momentum().length()));
                ui.label(format!("Frames: {}", render_loop.frames()));
                if let Some(drag) = sim.drag() {
                    ui.label(format!("Aiming body {}", drag.body_index));
                }

                ui.separator();
                ui.heading("Controls");
                ui.label("Click empty space: spawn a body");
                ui.label("Drag a body: aim, release to launch");

                if ui
                    .add_enabled(render_loop.is_running(), egui::Button::new("Stop Loop"))
                    .clicked()
                {
                    render_loop.token().cancel();
                    info!("render loop stopped");
                }
                if ui.button("Reset Simulation").clicked() {
                    reset.pending = true;
                }
            });
    }
}
