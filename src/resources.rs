use bevy::prelude::*;
use thiserror::Error;

// --- Simulation Defaults ---
/// Default gravitational constant.
pub const DEFAULT_G: f32 = 500.0;
/// Default fixed integration timestep (seconds).
pub const DEFAULT_DT: f32 = 0.016;
/// Default number of forward steps in a trajectory preview.
pub const DEFAULT_PATH_STEPS: usize = 25;
/// Default base radius for new bodies.
pub const DEFAULT_BODY_RADIUS: f32 = 10.0;
/// Default coefficient of restitution.
pub const DEFAULT_RESTITUTION: f32 = 0.8;
/// Default viewport extent used until the window reports its size.
pub const DEFAULT_EXTENT: f32 = 1000.0;

/// Images closer than this are ignored by the force solver.
pub const MIN_IMAGE_DISTANCE: f32 = 0.1;
/// Centres closer than this have no usable contact normal.
pub const CONTACT_EPSILON: f32 = 1.0e-6;
/// Random extra radius added on top of the base radius.
pub const RADIUS_JITTER: f32 = 5.0;
/// Mass range of spawned bodies.
pub const MASS_MIN: f32 = 500.0;
pub const MASS_MAX: f32 = 1000.0;
/// Bodies created at startup and on reset.
pub const SEED_BODIES: usize = 4;
/// Per-axis speed bound for seeded bodies.
pub const SEED_SPEED: f32 = 20.0;
/// Slingshot sensitivity: launch velocity per unit of drag.
pub const LAUNCH_SCALE: f32 = 2.0;
/// Minimum wall time between physics steps (milliseconds).
pub const STEP_INTERVAL_MS: f64 = 16.0;
/// Hues a spawned body may take.
pub const HUE_PALETTE: [f32; 5] = [210.0, 180.0, 140.0, 270.0, 330.0];

/// Environment variable holding startup overrides, e.g. `G=300,restitution=1`.
pub const OVERRIDES_ENV: &str = "GRAVITY_FIELD_OVERRIDES";

/// Tunable physical constants plus the toroidal bounds of the world.
///
/// Every field is read fresh on each step, so edits made between frames
/// apply to the next step.
#[derive(Clone, Debug, PartialEq)]
pub struct SimConfig {
    pub g: f32,
    pub dt: f32,
    pub path_steps: usize,
    pub body_radius: f32,
    pub restitution: f32,
    /// Half of the sweep angle used to draw discs. Cosmetic only.
    pub pi: f32,
    pub width: f32,
    pub height: f32,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            g: DEFAULT_G,
            dt: DEFAULT_DT,
            path_steps: DEFAULT_PATH_STEPS,
            body_radius: DEFAULT_BODY_RADIUS,
            restitution: DEFAULT_RESTITUTION,
            pi: std::f32::consts::PI,
            width: DEFAULT_EXTENT,
            height: DEFAULT_EXTENT,
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("unrecognized configuration key `{0}`")]
    UnknownKey(String),
    #[error("expected `key=value`, found `{0}`")]
    MalformedPair(String),
    #[error("invalid value `{value}` for `{key}`")]
    InvalidValue { key: String, value: String },
}

impl SimConfig {
    pub fn bounds(&self) -> Vec2 {
        vec2(self.width, self.height)
    }

    /// Sets one recognized option by the name the constants panel uses.
    pub fn set(&mut self, key: &str, raw: &str) -> Result<(), ConfigError> {
        let invalid = || ConfigError::InvalidValue {
            key: key.to_string(),
            value: raw.to_string(),
        };

        if key == "pathSteps" {
            self.path_steps = raw.parse().map_err(|_| invalid())?;
            return Ok(());
        }

        let value: f32 = raw.parse().map_err(|_| invalid())?;
        if !value.is_finite() {
            return Err(invalid());
        }

        match key {
            "G" => self.g = value,
            "restitution" if (0.0..=1.0).contains(&value) => self.restitution = value,
            "bodyRadius" if value > 0.0 => self.body_radius = value,
            "dt" if value > 0.0 => self.dt = value,
            "PI" => self.pi = value,
            "width" if value > 0.0 => self.width = value,
            "height" if value > 0.0 => self.height = value,
            "restitution" | "bodyRadius" | "dt" | "width" | "height" => return Err(invalid()),
            _ => return Err(ConfigError::UnknownKey(key.to_string())),
        }
        Ok(())
    }

    /// Applies comma separated `key=value` pairs. Stops at the first bad pair;
    /// pairs before it stay applied.
    pub fn apply_overrides(&mut self, overrides: &str) -> Result<(), ConfigError> {
        for pair in overrides.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            let (key, value) = pair
                .split_once('=')
                .ok_or_else(|| ConfigError::MalformedPair(pair.to_string()))?;
            self.set(key.trim(), value.trim())?;
        }
        Ok(())
    }
}

/// User-facing toggles that only affect drawing.
#[derive(Resource, Clone)]
pub struct SimSettings {
    pub show_links: bool,
    pub show_ghosts: bool,
}

impl Default for SimSettings {
    fn default() -> Self {
        Self {
            show_links: true,
            show_ghosts: true,
        }
    }
}

/// Marker resource to request a simulation reset from the UI.
#[derive(Resource, Default)]
pub struct ResetSimulation {
    pub pending: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overrides_update_recognized_keys() {
        let mut config = SimConfig::default();
        config
            .apply_overrides("G=300, restitution=1,bodyRadius=6,dt=0.01,pathSteps=40,PI=1.5")
            .unwrap();

        assert_eq!(config.g, 300.0);
        assert_eq!(config.restitution, 1.0);
        assert_eq!(config.body_radius, 6.0);
        assert_eq!(config.dt, 0.01);
        assert_eq!(config.path_steps, 40);
        assert_eq!(config.pi, 1.5);
    }

    #[test]
    fn unknown_key_is_rejected() {
        let mut config = SimConfig::default();
        assert_eq!(
            config.apply_overrides("theta=0.5"),
            Err(ConfigError::UnknownKey("theta".into()))
        );
    }

    #[test]
    fn out_of_range_restitution_is_rejected() {
        let mut config = SimConfig::default();
        assert!(matches!(
            config.set("restitution", "1.5"),
            Err(ConfigError::InvalidValue { .. })
        ));
        assert_eq!(config.restitution, DEFAULT_RESTITUTION);
    }

    #[test]
    fn malformed_pair_stops_parsing() {
        let mut config = SimConfig::default();
        let result = config.apply_overrides("G=10,dt");
        assert_eq!(result, Err(ConfigError::MalformedPair("dt".into())));
        assert_eq!(config.g, 10.0);
    }

    #[test]
    fn empty_overrides_are_a_no_op() {
        let mut config = SimConfig::default();
        config.apply_overrides("").unwrap();
        assert_eq!(config, SimConfig::default());
    }
}
