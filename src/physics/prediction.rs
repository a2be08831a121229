use bevy::prelude::*;

use super::integrator::step;
use crate::body::Body;
use crate::resources::SimConfig;

/// Forecasts where body `dragged` would go if launched with `velocity`.
///
/// Steps a private copy of `bodies` and records the dragged body's position
/// after each step. The result always has `steps` points, or is empty when
/// `dragged` is out of range.
pub fn predict_path(
    bodies: &[Body],
    dragged: usize,
    velocity: Vec2,
    steps: usize,
    config: &SimConfig,
) -> Vec<Vec2> {
    let mut forecast = bodies.to_vec();
    let Some(body) = forecast.get_mut(dragged) else {
        return Vec::new();
    };
    body.velocity = velocity;

    let mut path = Vec::with_capacity(steps);
    for _ in 0..steps {
        step(&mut forecast, config);
        path.push(forecast[dragged].position);
    }
    path
}

/// Splits a wrapped path into drawable runs.
///
/// A jump of half the world or more on either axis means the body crossed a
/// seam; the line is broken there instead of being drawn across the screen.
pub fn split_at_wraps(path: &[Vec2], width: f32, height: f32) -> Vec<Vec<Vec2>> {
    let mut runs: Vec<Vec<Vec2>> = Vec::new();
    let mut current: Vec<Vec2> = Vec::new();

    for &point in path {
        if let Some(&previous) = current.last() {
            let jump = (point - previous).abs();
            if jump.x >= width / 2.0 || jump.y >= height / 2.0 {
                runs.push(std::mem::take(&mut current));
            }
        }
        current.push(point);
    }
    if !current.is_empty() {
        runs.push(current);
    }
    runs
}
