//! Configuration for both sandbox scenes, loadable from YAML.
//!
//! Every field has a default, so a config file only needs the values it
//! changes:
//!
//! ```yaml
//! spawn:
//!   gravity: { dt: 0.05 }
//!   max_bodies: 2000
//! three_body:
//!   trail_length: 500
//!   bodies:
//!     - { position: [10.0, 0.0, 0.0], velocity: [0.0, 0.8, 0.0], color: [1.0, 0.4, 0.3, 1.0] }
//!     - { position: [-5.0, 8.66, 0.0], velocity: [-0.69, -0.4, 0.1], color: [0.3, 0.9, 0.4, 1.0] }
//!     - { position: [-5.0, -8.66, 0.0], velocity: [0.69, -0.4, -0.1], color: [0.3, 0.5, 1.0, 1.0] }
//! ```

use std::path::Path;

use glam::Vec3;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{ConfigError, ConfigResult};
use crate::physics_3d::{Body3D, GravityParams};
use crate::trail::TRAIL_LENGTH;

/// Gravity constants as written in a file. Missing values keep the scene's preset.
#[derive(Debug, Deserialize)]
struct GravityOverrides {
    g: Option<f32>,
    mass: Option<f32>,
    dt: Option<f32>,
    softening: Option<f32>,
}

impl GravityOverrides {
    fn apply(self, preset: GravityParams) -> GravityParams {
        GravityParams {
            g: self.g.unwrap_or(preset.g),
            mass: self.mass.unwrap_or(preset.mass),
            dt: self.dt.unwrap_or(preset.dt),
            softening: self.softening.unwrap_or(preset.softening),
        }
    }
}

fn spawn_gravity<'de, D: Deserializer<'de>>(deserializer: D) -> Result<GravityParams, D::Error> {
    Ok(GravityOverrides::deserialize(deserializer)?.apply(GravityParams::spawn()))
}

fn three_body_gravity<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<GravityParams, D::Error> {
    Ok(GravityOverrides::deserialize(deserializer)?.apply(GravityParams::three_body()))
}

/// Click-to-spawn scene settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnConfig {
    #[serde(deserialize_with = "spawn_gravity")]
    pub gravity: GravityParams,
    pub max_bodies: usize, // also the renderer's instance budget
    pub body_radius: f32,
    pub camera_distance: f32,
    pub camera_fov_degrees: f32,
}

impl Default for SpawnConfig {
    fn default() -> Self {
        Self {
            gravity: GravityParams::spawn(),
            max_bodies: 2000,
            body_radius: 0.5,
            camera_distance: 50.0,
            camera_fov_degrees: 75.0,
        }
    }
}

/// Initial state of one body in the three-body scene
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BodyConfig {
    pub position: Vec3,
    pub velocity: Vec3,
    #[serde(default = "default_body_color")]
    pub color: [f32; 4],
}

fn default_body_color() -> [f32; 4] {
    [1.0, 1.0, 1.0, 1.0]
}

impl BodyConfig {
    pub fn to_body(&self) -> Body3D {
        Body3D::new(self.position, self.velocity).with_color(self.color)
    }
}

/// Three-body scene settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThreeBodyConfig {
    #[serde(deserialize_with = "three_body_gravity")]
    pub gravity: GravityParams,
    pub trail_length: usize,
    pub camera_distance: f32,
    pub bodies: Vec<BodyConfig>,
}

impl Default for ThreeBodyConfig {
    fn default() -> Self {
        Self {
            gravity: GravityParams::three_body(),
            trail_length: TRAIL_LENGTH,
            camera_distance: 40.0,
            bodies: vec![
                BodyConfig {
                    position: Vec3::new(10.0, 0.0, 0.0),
                    velocity: Vec3::new(0.0, 0.8, 0.0),
                    color: [1.0, 0.4, 0.3, 1.0],
                },
                BodyConfig {
                    position: Vec3::new(-5.0, 8.66, 0.0),
                    velocity: Vec3::new(-0.69, -0.4, 0.1),
                    color: [0.3, 0.9, 0.4, 1.0],
                },
                BodyConfig {
                    position: Vec3::new(-5.0, -8.66, 0.0),
                    velocity: Vec3::new(0.69, -0.4, -0.1),
                    color: [0.3, 0.5, 1.0, 1.0],
                },
            ],
        }
    }
}

impl ThreeBodyConfig {
    pub fn initial_bodies(&self) -> ConfigResult<[Body3D; 3]> {
        match self.bodies.as_slice() {
            [a, b, c] => Ok([a.to_body(), b.to_body(), c.to_body()]),
            other => Err(ConfigError::Invalid(format!(
                "three_body.bodies must list exactly 3 bodies, got {}",
                other.len()
            ))),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub spawn: SpawnConfig,
    pub three_body: ThreeBodyConfig,
}

impl SimConfig {
    /// Parse and validate a YAML document
    pub fn from_yaml_str(text: &str) -> ConfigResult<Self> {
        let config: SimConfig = serde_yaml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a YAML file
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_yaml_str(&text)?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Defaults when no path is given
    pub fn load_or_default(path: Option<&Path>) -> ConfigResult<Self> {
        match path {
            Some(path) => Self::load(path),
            None => {
                log::info!("No config file given, using defaults");
                Ok(Self::default())
            }
        }
    }

    pub fn validate(&self) -> ConfigResult<()> {
        check_gravity("spawn", &self.spawn.gravity)?;
        check_gravity("three_body", &self.three_body.gravity)?;

        if self.spawn.max_bodies == 0 {
            return Err(ConfigError::Invalid("spawn.max_bodies must be at least 1".into()));
        }
        if self.three_body.trail_length == 0 {
            return Err(ConfigError::Invalid(
                "three_body.trail_length must be at least 1".into(),
            ));
        }
        self.three_body.initial_bodies()?;

        Ok(())
    }
}

fn check_gravity(section: &str, params: &GravityParams) -> ConfigResult<()> {
    if !(params.dt > 0.0) {
        return Err(ConfigError::Invalid(format!(
            "{section}.gravity.dt must be positive, got {}",
            params.dt
        )));
    }
    if !(params.softening > 0.0) {
        return Err(ConfigError::Invalid(format!(
            "{section}.gravity.softening must be positive, got {}",
            params.softening
        )));
    }
    Ok(())
}
