use bevy::prelude::*;

use super::collision::resolve;
use super::force::{compute_force, wrap_position};
use crate::body::Body;
use crate::resources::SimConfig;

/// Advances every body by one fixed timestep, in place.
///
/// Forces are accumulated against the start-of-step positions, then motion is
/// integrated and wrapped into the torus. Contacts are resolved last, pair by
/// pair in index-ascending order; each pair sees the corrections already
/// applied by earlier pairs. Corrections can nudge a body across a seam, so
/// positions are wrapped once more at the end.
pub fn step(bodies: &mut [Body], config: &SimConfig) {
    let n = bodies.len();
    if n == 0 {
        return;
    }

    let forces: Vec<Vec2> = (0..n)
        .map(|i| {
            let mut total = Vec2::ZERO;
            for j in 0..n {
                if i != j {
                    total += compute_force(&bodies[i], &bodies[j], config);
                }
            }
            total
        })
        .collect();

    let bounds = config.bounds();
    for (body, force) in bodies.iter_mut().zip(forces) {
        let acceleration = force / body.mass;
        body.velocity += acceleration * config.dt;
        body.position += body.velocity * config.dt;
        body.position = wrap_position(body.position, bounds);
    }

    for i in 0..n {
        for j in (i + 1)..n {
            let (head, tail) = bodies.split_at_mut(j);
            let (a, b) = (&mut head[i], &mut tail[0]);
            let (va, vb) = resolve(a, b, config.restitution);
            a.velocity = va;
            b.velocity = vb;
        }
    }

    for body in bodies.iter_mut() {
        body.position = wrap_position(body.position, bounds);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body(position: Vec2, velocity: Vec2, mass: f32, radius: f32) -> Body {
        Body::new(position, velocity, mass, radius, Color::WHITE).unwrap()
    }

    fn pair_config() -> SimConfig {
        SimConfig {
            g: 500.0,
            dt: 0.016,
            width: 1000.0,
            height: 1000.0,
            ..default()
        }
    }

    #[test]
    fn empty_slice_is_a_no_op() {
        let mut bodies: Vec<Body> = Vec::new();
        step(&mut bodies, &pair_config());
        assert!(bodies.is_empty());
    }

    #[test]
    fn two_bodies_attract_symmetrically() {
        let config = pair_config();
        let mut bodies = vec![
            body(vec2(300.0, 500.0), Vec2::ZERO, 1000.0, 10.0),
            body(vec2(700.0, 500.0), Vec2::ZERO, 1000.0, 10.0),
        ];

        step(&mut bodies, &config);

        assert!(bodies[0].velocity.x > 0.0);
        assert!(bodies[1].velocity.x < 0.0);
        assert_eq!(bodies[0].velocity, -bodies[1].velocity);
        // G * m / d^2 * dt = 500 * 1000 / 160000 * 0.016
        assert!((bodies[0].velocity.x - 0.05).abs() < 1e-6);
    }

    #[test]
    fn attracting_pair_collides_and_separates() {
        let config = pair_config();
        let mut bodies = vec![
            body(vec2(300.0, 500.0), Vec2::ZERO, 1000.0, 10.0),
            body(vec2(700.0, 500.0), Vec2::ZERO, 1000.0, 10.0),
        ];

        let mut separated = false;
        for _ in 0..2000 {
            step(&mut bodies, &config);
            let momentum = bodies[0].momentum() + bodies[1].momentum();
            let scale = bodies[0].momentum().length() + bodies[1].momentum().length();
            assert!(
                momentum.length() <= scale * 1e-3 + 1e-3,
                "momentum drifted: {momentum:?}"
            );

            if bodies[0].velocity.x < 0.0 && bodies[1].velocity.x > 0.0 {
                separated = true;
                break;
            }
        }
        assert!(separated, "bodies never bounced");
    }

    #[test]
    fn repeated_runs_are_bit_identical() {
        let config = SimConfig {
            width: 400.0,
            height: 300.0,
            ..default()
        };
        let seed = vec![
            body(vec2(10.0, 20.0), vec2(3.0, -4.0), 800.0, 10.0),
            body(vec2(390.0, 290.0), vec2(-1.0, 2.0), 650.0, 12.0),
            body(vec2(200.0, 150.0), vec2(0.0, 0.0), 900.0, 11.0),
            body(vec2(205.0, 160.0), vec2(5.0, 5.0), 500.0, 14.0),
        ];

        let mut first = seed.clone();
        let mut second = seed;
        for _ in 0..300 {
            step(&mut first, &config);
            step(&mut second, &config);
        }

        let bits = |v: Vec2| v.to_array().map(f32::to_bits);
        for (a, b) in first.iter().zip(&second) {
            assert_eq!(bits(a.position), bits(b.position));
            assert_eq!(bits(a.velocity), bits(b.velocity));
        }
    }

    #[test]
    fn lone_body_wraps_without_velocity_change() {
        let config = SimConfig {
            width: 500.0,
            height: 500.0,
            dt: 0.016,
            ..default()
        };
        let mut bodies = vec![body(vec2(10.0, 250.0), vec2(1000.0, 0.0), 800.0, 10.0)];

        let mut wrapped = false;
        let mut previous_x = bodies[0].position.x;
        for _ in 0..100 {
            step(&mut bodies, &config);
            let body = &bodies[0];
            assert!((0.0..500.0).contains(&body.position.x));
            assert_eq!(body.velocity, vec2(1000.0, 0.0));
            if body.position.x < previous_x {
                wrapped = true;
            }
            previous_x = body.position.x;
        }
        assert!(wrapped);
    }

    #[test]
    fn collision_pairs_resolve_in_index_order() {
        // Three overlapping bodies in a row: the (0, 1) correction moves body 1
        // before the (1, 2) pair is examined.
        let config = SimConfig {
            g: 0.0,
            restitution: 1.0,
            ..pair_config()
        };
        let mut bodies = vec![
            body(vec2(100.0, 100.0), vec2(10.0, 0.0), 1.0, 10.0),
            body(vec2(115.0, 100.0), Vec2::ZERO, 1.0, 10.0),
            body(vec2(130.0, 100.0), vec2(-10.0, 0.0), 1.0, 10.0),
        ];

        let mut sequential = bodies.clone();
        step(&mut bodies, &config);

        // Reproduce by hand: motion, then (0,1), (0,2), (1,2).
        for b in sequential.iter_mut() {
            b.position = wrap_position(b.position + b.velocity * config.dt, config.bounds());
        }
        for (i, j) in [(0, 1), (0, 2), (1, 2)] {
            let (head, tail) = sequential.split_at_mut(j);
            let (va, vb) = resolve(&mut head[i], &mut tail[0], config.restitution);
            head[i].velocity = va;
            tail[0].velocity = vb;
        }
        for b in sequential.iter_mut() {
            b.position = wrap_position(b.position, config.bounds());
        }

        assert_eq!(bodies, sequential);
    }
}
