mod body;
mod interaction;
mod physics;
mod render_loop;
mod resources;
mod simulation;
mod systems;

use bevy::prelude::*;
use bevy::window::WindowResolution;
use bevy_egui::{EguiPlugin, EguiPrimaryContextPass};

use crate::render_loop::RenderLoop;
use crate::resources::{ResetSimulation, SimSettings};
use crate::simulation::Simulation;
use crate::systems::*;

fn main() {
    let (render_loop, _cancel) = RenderLoop::start();

    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Gravity Field".into(),
                resolution: WindowResolution::new(1000, 1000),
                ..default()
            }),
            ..default()
        }))
        .add_plugins(EguiPlugin::default())
        .insert_resource(ClearColor(Color::BLACK))
        .init_resource::<Simulation>()
        .init_resource::<SimSettings>()
        .init_resource::<ResetSimulation>()
        .insert_resource(render_loop)
        .add_systems(EguiPrimaryContextPass, ui_controls)
        .add_systems(Startup, setup_scene)
        .add_systems(
            Update,
            (
                apply_reset_request,
                sync_viewport,
                pointer_input,
                drive_render_loop.run_if(render_loop_running),
            )
                .chain(),
        )
        .run();
}
