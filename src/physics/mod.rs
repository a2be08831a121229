//! Pure physics over a slice of bodies: no Bevy systems, no randomness.

pub mod collision;
pub mod force;
pub mod integrator;
pub mod prediction;

pub use integrator::step;
pub use prediction::{predict_path, split_at_wraps};
