use bevy::prelude::*;

use crate::body::Body;
use crate::resources::{MIN_IMAGE_DISTANCE, SimConfig};

/// Wraps one coordinate into `[0, extent)`.
#[inline]
pub fn wrap_coord(value: f32, extent: f32) -> f32 {
    let wrapped = value.rem_euclid(extent);
    // rem_euclid may round up to `extent` for tiny negative inputs.
    if wrapped >= extent { 0.0 } else { wrapped }
}

#[inline]
pub fn wrap_position(position: Vec2, bounds: Vec2) -> Vec2 {
    vec2(wrap_coord(position.x, bounds.x), wrap_coord(position.y, bounds.y))
}

/// Gravitational force exerted on `a` by the nearest periodic image of `b`.
///
/// The nine images of `b` are scanned and the closest one farther than
/// [`MIN_IMAGE_DISTANCE`] wins. Returns zero when every image is too close.
pub fn compute_force(a: &Body, b: &Body, config: &SimConfig) -> Vec2 {
    let mut nearest = f32::INFINITY;
    let mut force = Vec2::ZERO;

    for ix in -1..=1 {
        for iy in -1..=1 {
            let image = b.position + vec2(ix as f32 * config.width, iy as f32 * config.height);
            let delta = image - a.position;
            let dist_sq = delta.length_squared();
            let dist = dist_sq.sqrt();

            if dist < nearest && dist > MIN_IMAGE_DISTANCE {
                nearest = dist;
                let magnitude = (config.g * a.mass * b.mass) / dist_sq;
                force = delta / dist * magnitude;
            }
        }
    }

    force
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body(position: Vec2, mass: f32) -> Body {
        Body::new(position, Vec2::ZERO, mass, 5.0, Color::WHITE).unwrap()
    }

    fn config(width: f32, height: f32) -> SimConfig {
        SimConfig {
            g: 100.0,
            width,
            height,
            ..default()
        }
    }

    #[test]
    fn wrap_keeps_coordinates_in_bounds() {
        let bounds = vec2(500.0, 300.0);
        for p in [
            vec2(-1.0, -1.0),
            vec2(500.0, 300.0),
            vec2(1234.5, -987.25),
            vec2(-1.0e-8, 299.999),
        ] {
            let wrapped = wrap_position(p, bounds);
            assert!((0.0..500.0).contains(&wrapped.x), "{wrapped:?}");
            assert!((0.0..300.0).contains(&wrapped.y), "{wrapped:?}");
            assert_eq!(wrap_position(wrapped, bounds), wrapped);
        }
    }

    #[test]
    fn wrap_handles_negative_values() {
        assert_eq!(wrap_coord(-10.0, 100.0), 90.0);
        assert_eq!(wrap_coord(250.0, 100.0), 50.0);
    }

    #[test]
    fn force_follows_inverse_square() {
        let a = body(vec2(100.0, 100.0), 2.0);
        let b = body(vec2(110.0, 100.0), 3.0);
        let force = compute_force(&a, &b, &config(1000.0, 1000.0));

        assert!((force.x - 100.0 * 2.0 * 3.0 / 100.0).abs() < 1e-4);
        assert_eq!(force.y, 0.0);
    }

    #[test]
    fn force_uses_nearest_image_across_the_seam() {
        let a = body(vec2(5.0, 50.0), 1.0);
        let b = body(vec2(95.0, 50.0), 1.0);
        let force = compute_force(&a, &b, &config(100.0, 100.0));

        // Image at x = -5 is 10 units away, to the left.
        assert!(force.x < 0.0);
        assert!((force.x + 100.0 / 100.0).abs() < 1e-4);
    }

    #[test]
    fn near_singular_images_are_skipped() {
        let a = body(vec2(50.0, 50.0), 1.0);
        let b = body(vec2(50.05, 50.0), 1.0);
        let force = compute_force(&a, &b, &config(100.0, 100.0));

        // The direct image is skipped and the next nearest is a full world away.
        assert!((force.length() - 100.0 / (99.95 * 99.95)).abs() < 1e-4);
    }

    #[test]
    fn coincident_bodies_in_a_tiny_world_feel_nothing() {
        let a = body(vec2(0.0, 0.0), 1.0);
        let b = body(vec2(0.0, 0.0), 1.0);
        let force = compute_force(&a, &b, &config(0.05, 0.05));
        assert_eq!(force, Vec2::ZERO);
    }

    #[test]
    fn forces_are_equal_and_opposite() {
        let cfg = config(400.0, 400.0);
        let a = body(vec2(10.0, 20.0), 7.0);
        let b = body(vec2(380.0, 350.0), 2.0);
        let on_a = compute_force(&a, &b, &cfg);
        let on_b = compute_force(&b, &a, &cfg);
        assert!((on_a + on_b).length() < 1e-4);
    }
}
