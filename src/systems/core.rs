use bevy::prelude::MessageReader;
use bevy::prelude::*;
use bevy::window::{CursorLeft, CursorMoved, PrimaryWindow};
use bevy_egui::input::EguiWantsInput;

use crate::interaction::PointerEvent;
use crate::render_loop::{RenderLoop, Surface};
use crate::resources::*;
use crate::simulation::Simulation;

/// Maps viewport coordinates (top-left origin, y down) into the centred,
/// y-up space of the default 2D camera.
pub fn viewport_to_world(point: Vec2, viewport: Vec2) -> Vec2 {
    vec2(point.x - viewport.x / 2.0, viewport.y / 2.0 - point.y)
}

/// [`Surface`] backed by Bevy's immediate-mode gizmos.
pub struct GizmoSurface<'a, 'w, 's> {
    gizmos: &'a mut Gizmos<'w, 's>,
    viewport: Vec2,
}

impl<'a, 'w, 's> GizmoSurface<'a, 'w, 's> {
    pub fn new(gizmos: &'a mut Gizmos<'w, 's>, viewport: Vec2) -> Self {
        Self { gizmos, viewport }
    }
}

impl Surface for GizmoSurface<'_, '_, '_> {
    fn line(&mut self, from: Vec2, to: Vec2, color: Color) {
        let viewport = self.viewport;
        self.gizmos.line_2d(
            viewport_to_world(from, viewport),
            viewport_to_world(to, viewport),
            color,
        );
    }

    fn polyline(&mut self, points: &[Vec2], color: Color) {
        let viewport = self.viewport;
        self.gizmos.linestrip_2d(
            points.iter().map(|&p| viewport_to_world(p, viewport)),
            color,
        );
    }

    fn disc(&mut self, center: Vec2, radius: f32, sweep: f32, color: Color) {
        let isometry = Isometry2d::from_translation(viewport_to_world(center, self.viewport));
        if sweep >= std::f32::consts::TAU {
            self.gizmos.circle_2d(isometry, radius, color);
        } else {
            self.gizmos.arc_2d(isometry, sweep, radius, color);
        }
    }
}

/// Applies `GRAVITY_FIELD_OVERRIDES` on top of the current constants.
fn load_overrides(config: &mut SimConfig) {
    let Ok(overrides) = std::env::var(OVERRIDES_ENV) else {
        return;
    };
    match config.apply_overrides(&overrides) {
        Ok(()) => info!("applied overrides: {overrides}"),
        Err(err) => warn!("ignoring {OVERRIDES_ENV}: {err}"),
    }
}

/// Sets up the camera, sizes the world to the window and seeds the bodies.
pub fn setup_scene(
    mut commands: Commands,
    windows: Query<&Window, With<PrimaryWindow>>,
    mut sim: ResMut<Simulation>,
) {
    commands.spawn(Camera2d);

    if let Ok(window) = windows.single() {
        sim.resize(window.width(), window.height());
    }
    load_overrides(&mut sim.config);

    if let Err(err) = sim.reseed(SEED_BODIES) {
        error!("failed to seed bodies: {err}");
    }
}

/// Keeps the toroidal bounds equal to the window size.
pub fn sync_viewport(windows: Query<&Window, With<PrimaryWindow>>, mut sim: ResMut<Simulation>) {
    if let Ok(window) = windows.single() {
        let (width, height) = (window.width(), window.height());
        if sim.config.width != width || sim.config.height != height {
            sim.resize(width, height);
        }
    }
}

/// Tracks whether the current press grabbed a body, so its release is not
/// also treated as a click.
#[derive(Default, Clone, Copy, Debug)]
pub struct PressState {
    pressed: bool,
    started_drag: bool,
}

/// Pointer activity gathered over one frame.
#[derive(Default, Debug)]
pub struct PointerFrame {
    pub moves: Vec<Vec2>,
    pub left: bool,
    pub pressed: bool,
    pub released: bool,
    pub cursor: Option<Vec2>,
    /// The UI owns the pointer: no new drags or spawns.
    pub blocked: bool,
}

/// Turns one frame of raw pointer activity into [`PointerEvent`]s.
pub fn apply_pointer_frame(sim: &mut Simulation, press: &mut PressState, frame: PointerFrame) {
    for position in frame.moves {
        sim.handle(PointerEvent::Move(position));
    }

    if frame.left {
        sim.handle(PointerEvent::Leave);
        *press = PressState::default();
    }

    if frame.pressed
        && !frame.blocked
        && let Some(p) = frame.cursor
    {
        sim.handle(PointerEvent::Down(p));
        *press = PressState {
            pressed: true,
            started_drag: sim.is_dragging(),
        };
    }

    if frame.released {
        sim.handle(PointerEvent::Up);
        if press.pressed
            && !press.started_drag
            && !frame.blocked
            && let Some(p) = frame.cursor
        {
            sim.handle(PointerEvent::Click(p));
        }
        *press = PressState::default();
    }
}

/// Feeds mouse input to the simulation unless egui is using the pointer.
pub fn pointer_input(
    buttons: Res<ButtonInput<MouseButton>>,
    mut cursor_moved: MessageReader<CursorMoved>,
    mut cursor_left: MessageReader<CursorLeft>,
    windows: Query<&Window, With<PrimaryWindow>>,
    egui_input: Res<EguiWantsInput>,
    mut sim: ResMut<Simulation>,
    mut press: Local<PressState>,
) {
    let frame = PointerFrame {
        moves: cursor_moved.read().map(|moved| moved.position).collect(),
        left: cursor_left.read().count() > 0,
        pressed: buttons.just_pressed(MouseButton::Left),
        released: buttons.just_released(MouseButton::Left),
        cursor: windows.single().ok().and_then(Window::cursor_position),
        blocked: egui_input.wants_any_pointer_input(),
    };

    apply_pointer_frame(&mut sim, &mut press, frame);
}

/// Run condition: true until the loop's cancel token fires.
pub fn render_loop_running(render_loop: Res<RenderLoop>) -> bool {
    render_loop.is_running()
}

/// One tick of the render loop: maybe step physics, always redraw.
pub fn drive_render_loop(
    time: Res<Time>,
    mut render_loop: ResMut<RenderLoop>,
    mut sim: ResMut<Simulation>,
    settings: Res<SimSettings>,
    windows: Query<&Window, With<PrimaryWindow>>,
    mut gizmos: Gizmos,
) {
    let now_ms = time.elapsed_secs_f64() * 1000.0;

    let report = match windows.single() {
        Ok(window) => {
            let mut surface = GizmoSurface::new(&mut gizmos, window.size());
            render_loop.frame(now_ms, &mut sim, &settings, Some(&mut surface))
        }
        Err(_) => render_loop.frame(now_ms, &mut sim, &settings, None),
    };
    trace!("frame stepped={} drew={}", report.stepped, report.drew);
}

/// Responds to a pending reset: restores default constants, reseeds the
/// bodies and restarts the render loop.
pub fn apply_reset_request(
    mut reset: ResMut<ResetSimulation>,
    mut sim: ResMut<Simulation>,
    mut settings: ResMut<SimSettings>,
    mut render_loop: ResMut<RenderLoop>,
) {
    if !reset.pending {
        return;
    }
    reset.pending = false;

    *settings = SimSettings::default();
    let (width, height) = (sim.config.width, sim.config.height);
    sim.config = SimConfig {
        width,
        height,
        ..default()
    };

    if let Err(err) = sim.reseed(SEED_BODIES) {
        error!("failed to reseed bodies: {err}");
    }

    let (restarted, _) = RenderLoop::start();
    *render_loop = restarted;
    info!("simulation reset");
}
