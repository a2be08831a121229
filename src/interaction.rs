use bevy::prelude::*;

use crate::body::{Body, random_color, random_mass, random_radius};
use crate::resources::LAUNCH_SCALE;
use crate::simulation::Simulation;

/// Pointer input in viewport coordinates (origin top-left, y down).
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PointerEvent {
    Down(Vec2),
    Move(Vec2),
    Up,
    /// The pointer left the surface; treated as a release.
    Leave,
    /// A press and release that did not start a drag.
    Click(Vec2),
}

/// A body being pulled back for launch.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DragState {
    pub body_index: usize,
    pub start_pos: Vec2,
    pub current_pos: Vec2,
}

impl DragState {
    /// Slingshot velocity: pulling away from the body launches it back past
    /// its start.
    pub fn launch_velocity(&self) -> Vec2 {
        (self.start_pos - self.current_pos) * LAUNCH_SCALE
    }
}

impl Simulation {
    pub fn handle(&mut self, event: PointerEvent) {
        match event {
            PointerEvent::Down(p) => self.pointer_down(p),
            PointerEvent::Move(p) => self.pointer_move(p),
            PointerEvent::Up | PointerEvent::Leave => self.pointer_up(),
            PointerEvent::Click(p) => self.click(p),
        }
    }

    /// Starts dragging the first body under `p`, if any.
    pub fn pointer_down(&mut self, p: Vec2) {
        let Some(index) = self.bodies.find_at(p) else {
            return;
        };
        let Some(body) = self.bodies.get(index) else {
            return;
        };
        self.drag = Some(DragState {
            body_index: index,
            start_pos: body.position,
            current_pos: p,
        });
        debug!("dragging body {index}");
    }

    pub fn pointer_move(&mut self, p: Vec2) {
        if let Some(drag) = self.drag.as_mut() {
            drag.current_pos = p;
        }
    }

    /// Releases the drag, writing the launch velocity into the dragged body.
    pub fn pointer_up(&mut self) {
        let Some(drag) = self.drag.take() else {
            return;
        };
        let velocity = drag.launch_velocity();
        if let Some(body) = self.bodies.get_mut(drag.body_index) {
            body.velocity = velocity;
            info!("launched body {} with velocity {velocity}", drag.body_index);
        }
    }

    pub fn click(&mut self, p: Vec2) {
        if self.is_dragging() {
            return;
        }
        self.spawn_body(p);
    }

    /// Appends a resting body at `p` unless an existing centre lies within
    /// twice the candidate's radius. Returns the new body's index.
    pub fn spawn_body(&mut self, p: Vec2) -> Option<usize> {
        let radius = random_radius(&mut self.rng, self.config.body_radius);
        if !self.bodies.is_clear(p, radius * 2.0) {
            debug!("spawn at {p} rejected: too close to an existing body");
            return None;
        }

        let mass = random_mass(&mut self.rng);
        let color = random_color(&mut self.rng);
        match Body::new(p, Vec2::ZERO, mass, radius, color) {
            Ok(body) => {
                let index = self.bodies.push(body);
                info!("spawned body {index} at {p}");
                Some(index)
            }
            Err(err) => {
                warn!("spawn at {p} failed: {err}");
                None
            }
        }
    }
}
