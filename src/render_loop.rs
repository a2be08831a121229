use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use bevy::prelude::*;

use crate::physics::split_at_wraps;
use crate::resources::{STEP_INTERVAL_MS, SimSettings};
use crate::simulation::Simulation;

/// Colour of the faint lines joining every pair of bodies.
pub const LINK_COLOR: Color = Color::srgba(100.0 / 255.0, 150.0 / 255.0, 230.0 / 255.0, 0.1);
/// Colour of the line from a dragged body to the pointer.
pub const DRAG_COLOR: Color = Color::srgba(1.0, 1.0, 1.0, 0.5);
/// Colour of the predicted trajectory.
pub const PATH_COLOR: Color = Color::srgba(1.0, 1.0, 1.0, 0.2);

/// Drawing commands in viewport coordinates.
pub trait Surface {
    fn line(&mut self, from: Vec2, to: Vec2, color: Color);
    fn polyline(&mut self, points: &[Vec2], color: Color);
    /// A disc outline swept through `sweep` radians.
    fn disc(&mut self, center: Vec2, radius: f32, sweep: f32, color: Color);
}

/// Shared flag that stops a [`RenderLoop`] before its next frame.
#[derive(Clone, Default, Debug)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// What a single frame did.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameReport {
    pub stepped: bool,
    pub drew: bool,
}

/// Throttles physics to a fixed wall-clock cadence while redrawing every
/// frame.
#[derive(Resource, Debug)]
pub struct RenderLoop {
    token: CancelToken,
    last_step_ms: Option<f64>,
    frames: u64,
}

impl RenderLoop {
    pub fn start() -> (Self, CancelToken) {
        let token = CancelToken::default();
        let render_loop = Self {
            token: token.clone(),
            last_step_ms: None,
            frames: 0,
        };
        (render_loop, token)
    }

    pub fn is_running(&self) -> bool {
        !self.token.is_cancelled()
    }

    pub fn token(&self) -> &CancelToken {
        &self.token
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Runs one frame at `now_ms`.
    ///
    /// Steps the simulation once when at least [`STEP_INTERVAL_MS`] passed
    /// since the last step and nothing is being dragged, then draws if a
    /// surface is available. The first frame only records the clock.
    pub fn frame(
        &mut self,
        now_ms: f64,
        sim: &mut Simulation,
        settings: &SimSettings,
        surface: Option<&mut dyn Surface>,
    ) -> FrameReport {
        self.frames += 1;
        let last = *self.last_step_ms.get_or_insert(now_ms);

        let mut report = FrameReport::default();
        if now_ms - last >= STEP_INTERVAL_MS && !sim.is_dragging() {
            sim.step();
            self.last_step_ms = Some(now_ms);
            report.stepped = true;
        }

        if let Some(surface) = surface {
            draw_scene(surface, sim, settings);
            report.drew = true;
        }
        report
    }
}

/// Links, then bodies with their wrap ghosts, then the drag overlay.
pub fn draw_scene(surface: &mut dyn Surface, sim: &Simulation, settings: &SimSettings) {
    let bodies = sim.bodies.as_slice();
    let config = &sim.config;
    let sweep = config.pi * 2.0;

    if settings.show_links {
        for (i, a) in bodies.iter().enumerate() {
            for b in &bodies[i + 1..] {
                surface.line(a.position, b.position, LINK_COLOR);
            }
        }
    }

    for body in bodies {
        surface.disc(body.position, body.radius, sweep, body.color);

        if !settings.show_ghosts {
            continue;
        }
        for ix in -1..=1 {
            for iy in -1..=1 {
                if ix == 0 && iy == 0 {
                    continue;
                }
                let ghost = body.position + vec2(ix as f32 * config.width, iy as f32 * config.height);
                let visible = ghost.x + body.radius > 0.0
                    && ghost.x - body.radius < config.width
                    && ghost.y + body.radius > 0.0
                    && ghost.y - body.radius < config.height;
                if visible {
                    surface.disc(ghost, body.radius, sweep, body.color);
                }
            }
        }
    }

    let Some(drag) = sim.drag() else {
        return;
    };
    surface.line(drag.start_pos, drag.current_pos, DRAG_COLOR);

    if let Some(path) = sim.predicted_path() {
        for run in split_at_wraps(&path, config.width, config.height) {
            if run.len() >= 2 {
                surface.polyline(&run, PATH_COLOR);
            }
        }
    }
}
