use bevy::prelude::*;

use crate::body::Body;
use crate::resources::CONTACT_EPSILON;

/// Resolves a possible contact between `a` and `b`.
///
/// Returns the post-collision velocities, leaving the bodies' own velocities
/// untouched for the caller to write back. Overlapping, approaching pairs are
/// also pushed apart by half the overlap each. Pairs that already separate
/// keep both their velocities and their overlap.
pub fn resolve(a: &mut Body, b: &mut Body, restitution: f32) -> (Vec2, Vec2) {
    let delta = b.position - a.position;
    let distance = delta.length();

    if distance >= a.radius + b.radius || distance < CONTACT_EPSILON {
        return (a.velocity, b.velocity);
    }

    let normal = delta / distance;
    let vel_along_normal = (b.velocity - a.velocity).dot(normal);
    if vel_along_normal > 0.0 {
        return (a.velocity, b.velocity);
    }

    let j = -(1.0 + restitution) * vel_along_normal;
    let impulse = j / (1.0 / a.mass + 1.0 / b.mass);

    let va = a.velocity - normal * impulse / a.mass;
    let vb = b.velocity + normal * impulse / b.mass;

    let overlap = a.radius + b.radius - distance;
    let separation = normal * overlap / 2.0;
    a.position -= separation;
    b.position += separation;

    (va, vb)
}
