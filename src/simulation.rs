use bevy::prelude::*;
use rand::{Rng, SeedableRng, rngs::StdRng};

use crate::body::{Body, BodyError, BodyStore, random_color, random_mass, random_radius};
use crate::interaction::DragState;
use crate::physics;
use crate::resources::{SEED_SPEED, SimConfig};

/// Owns everything the gravity toy mutates: the bodies, the world constants,
/// the current drag and the spawn RNG. Pointer events and physics steps both
/// go through this one object.
#[derive(Resource)]
pub struct Simulation {
    pub bodies: BodyStore,
    pub config: SimConfig,
    pub(crate) drag: Option<DragState>,
    pub(crate) rng: StdRng,
}

impl Simulation {
    pub fn new(config: SimConfig, rng: StdRng) -> Self {
        Self {
            bodies: BodyStore::default(),
            config,
            drag: None,
            rng,
        }
    }

    /// Replaces all bodies with `count` random ones scattered over the world.
    pub fn reseed(&mut self, count: usize) -> Result<(), BodyError> {
        self.drag = None;
        self.bodies.clear();

        for _ in 0..count {
            let position = vec2(
                self.rng.random_range(0.0..self.config.width),
                self.rng.random_range(0.0..self.config.height),
            );
            let velocity = vec2(
                self.rng.random_range(-SEED_SPEED..SEED_SPEED),
                self.rng.random_range(-SEED_SPEED..SEED_SPEED),
            );
            let mass = random_mass(&mut self.rng);
            let radius = random_radius(&mut self.rng, self.config.body_radius);
            let color = random_color(&mut self.rng);
            self.bodies
                .push(Body::new(position, velocity, mass, radius, color)?);
        }

        info!("seeded {} bodies", self.bodies.len());
        Ok(())
    }

    /// Advances the live bodies by one timestep.
    pub fn step(&mut self) {
        physics::step(self.bodies.as_mut_slice(), &self.config);
    }

    /// Updates the toroidal bounds. Bodies keep their positions and are
    /// wrapped back in by the next step.
    pub fn resize(&mut self, width: f32, height: f32) {
        if !(width > 0.0 && height > 0.0) {
            debug!("ignoring degenerate viewport {width}x{height}");
            return;
        }
        if self.config.width == width && self.config.height == height {
            return;
        }
        debug!("world resized to {width}x{height}");
        self.config.width = width;
        self.config.height = height;
    }

    pub fn total_momentum(&self) -> Vec2 {
        self.bodies.iter().map(Body::momentum).sum()
    }

    pub fn kinetic_energy(&self) -> f32 {
        self.bodies.iter().map(Body::kinetic_energy).sum()
    }

    pub fn drag(&self) -> Option<&DragState> {
        self.drag.as_ref()
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Forecast for the body currently being dragged, if any.
    pub fn predicted_path(&self) -> Option<Vec<Vec2>> {
        let drag = self.drag.as_ref()?;
        Some(physics::predict_path(
            self.bodies.as_slice(),
            drag.body_index,
            drag.launch_velocity(),
            self.config.path_steps,
            &self.config,
        ))
    }
}

impl Default for Simulation {
    fn default() -> Self {
        Self::new(SimConfig::default(), StdRng::from_os_rng())
    }
}
