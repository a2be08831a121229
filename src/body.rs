use bevy::prelude::*;
use rand::Rng;
use thiserror::Error;

use crate::resources::{HUE_PALETTE, MASS_MAX, MASS_MIN, RADIUS_JITTER};

#[derive(Debug, Error, PartialEq)]
pub enum BodyError {
    #[error("body mass must be finite and positive, got {0}")]
    InvalidMass(f32),
    #[error("body radius must be finite and positive, got {0}")]
    InvalidRadius(f32),
    #[error("body position and velocity must be finite")]
    NonFinite,
}

/// A single simulated particle. Mass, radius and colour never change after
/// creation.
#[derive(Clone, Debug, PartialEq)]
pub struct Body {
    pub position: Vec2,
    pub velocity: Vec2,
    pub mass: f32,
    pub radius: f32,
    pub color: Color,
}

impl Body {
    pub fn new(
        position: Vec2,
        velocity: Vec2,
        mass: f32,
        radius: f32,
        color: Color,
    ) -> Result<Self, BodyError> {
        if !(mass.is_finite() && mass > 0.0) {
            return Err(BodyError::InvalidMass(mass));
        }
        if !(radius.is_finite() && radius > 0.0) {
            return Err(BodyError::InvalidRadius(radius));
        }
        if !position.is_finite() || !velocity.is_finite() {
            return Err(BodyError::NonFinite);
        }
        Ok(Self {
            position,
            velocity,
            mass,
            radius,
            color,
        })
    }

    /// True when `point` lies strictly inside the body's disc.
    pub fn contains(&self, point: Vec2) -> bool {
        (point - self.position).length_squared() < self.radius * self.radius
    }

    pub fn kinetic_energy(&self) -> f32 {
        0.5 * self.mass * self.velocity.length_squared()
    }

    pub fn momentum(&self) -> Vec2 {
        self.velocity * self.mass
    }
}

/// Semi-transparent pastel from the fixed hue palette.
pub fn random_color(rng: &mut impl Rng) -> Color {
    let hue = HUE_PALETTE[rng.random_range(0..HUE_PALETTE.len())];
    Color::hsla(hue, 0.7, 0.7, 0.7)
}

/// Radius drawn from `base + [0, RADIUS_JITTER)`.
pub fn random_radius(rng: &mut impl Rng, base: f32) -> f32 {
    base + rng.random_range(0.0..RADIUS_JITTER)
}

pub fn random_mass(rng: &mut impl Rng) -> f32 {
    rng.random_range(MASS_MIN..MASS_MAX)
}

/// Arena of bodies addressed by index. Bodies are only ever appended or
/// cleared wholesale, so an index stays valid until the next reset.
#[derive(Clone, Debug, Default)]
pub struct BodyStore {
    bodies: Vec<Body>,
}

impl BodyStore {
    pub fn from_bodies(bodies: Vec<Body>) -> Self {
        Self { bodies }
    }

    pub fn push(&mut self, body: Body) -> usize {
        self.bodies.push(body);
        self.bodies.len() - 1
    }

    pub fn clear(&mut self) {
        self.bodies.clear();
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Body> {
        self.bodies.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Body> {
        self.bodies.get_mut(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Body> {
        self.bodies.iter()
    }

    pub fn as_slice(&self) -> &[Body] {
        &self.bodies
    }

    pub fn as_mut_slice(&mut self) -> &mut [Body] {
        &mut self.bodies
    }

    /// Index of the first body, in storage order, whose disc contains `point`.
    pub fn find_at(&self, point: Vec2) -> Option<usize> {
        self.bodies.iter().position(|body| body.contains(point))
    }

    /// True when no body centre lies within `clearance` of `point`.
    pub fn is_clear(&self, point: Vec2, clearance: f32) -> bool {
        !self
            .bodies
            .iter()
            .any(|body| body.position.distance(point) < clearance)
    }
}
