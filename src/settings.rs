//! Simulation configuration
//!
//! Everything tunable is fixed at startup. Values come from `consts` unless a
//! JSON file overrides them; missing fields keep their defaults.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;
use crate::sim::{IntegrationModel, ResolverStrategy};

/// Errors raised while loading or validating a configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to access config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid `{field}`: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

/// Startup configuration for a `World`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    // === World ===
    pub world_width: f32,
    pub world_height: f32,
    /// Distance of the ceiling above the top of the screen
    pub ceiling_offset: f32,

    // === Bodies ===
    pub body_count: usize,
    pub min_radius: f32,
    pub max_radius: f32,
    pub grid_padding: f32,
    pub seed: u64,

    // === Dynamics ===
    pub gravity: f32,
    pub restitution: f32,
    pub max_displacement: f32,
    pub max_frame_dt: f32,
    pub integration: IntegrationModel,

    // === Resolution ===
    pub resolver: ResolverStrategy,
    pub resolver_iterations: u32,

    // === Explosions ===
    pub explosion_radius: f32,
    pub explosion_strength: f32,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            world_width: WORLD_WIDTH,
            world_height: WORLD_HEIGHT,
            ceiling_offset: CEILING_OFFSET,

            body_count: BODY_COUNT,
            min_radius: MIN_RADIUS,
            max_radius: MAX_RADIUS,
            grid_padding: GRID_PADDING,
            seed: SEED,

            gravity: GRAVITY,
            restitution: RESTITUTION,
            max_displacement: MAX_DISPLACEMENT,
            max_frame_dt: MAX_FRAME_DT,
            integration: IntegrationModel::default(),

            resolver: ResolverStrategy::default(),
            resolver_iterations: RESOLVER_ITERATIONS,

            explosion_radius: EXPLOSION_RADIUS,
            explosion_strength: EXPLOSION_STRENGTH,
        }
    }
}

impl SimConfig {
    /// Check the invariants the pipeline relies on
    pub fn validate(&self) -> Result<(), ConfigError> {
        fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
            if value.is_finite() && value > 0.0 {
                Ok(())
            } else {
                Err(ConfigError::Invalid {
                    field,
                    reason: "must be finite and positive",
                })
            }
        }

        positive("world_width", self.world_width)?;
        positive("world_height", self.world_height)?;
        positive("min_radius", self.min_radius)?;
        positive("max_radius", self.max_radius)?;
        positive("max_displacement", self.max_displacement)?;
        positive("max_frame_dt", self.max_frame_dt)?;
        positive("explosion_radius", self.explosion_radius)?;

        if self.max_radius < self.min_radius {
            return Err(ConfigError::Invalid {
                field: "max_radius",
                reason: "must not be smaller than min_radius",
            });
        }
        if 2.0 * self.max_radius > self.world_width {
            return Err(ConfigError::Invalid {
                field: "max_radius",
                reason: "bodies must fit between the walls",
            });
        }
        if !self.ceiling_offset.is_finite() || self.ceiling_offset < 0.0 {
            return Err(ConfigError::Invalid {
                field: "ceiling_offset",
                reason: "must be finite and non-negative",
            });
        }
        if 2.0 * self.max_radius > self.world_height + self.ceiling_offset {
            return Err(ConfigError::Invalid {
                field: "max_radius",
                reason: "bodies must fit between the ceiling and the floor",
            });
        }
        if !self.grid_padding.is_finite() || self.grid_padding < 0.0 {
            return Err(ConfigError::Invalid {
                field: "grid_padding",
                reason: "must be finite and non-negative",
            });
        }
        if !self.gravity.is_finite() {
            return Err(ConfigError::Invalid {
                field: "gravity",
                reason: "must be finite",
            });
        }
        if !(0.0..=1.0).contains(&self.restitution) {
            return Err(ConfigError::Invalid {
                field: "restitution",
                reason: "must lie in [0, 1]",
            });
        }
        if !self.explosion_strength.is_finite() {
            return Err(ConfigError::Invalid {
                field: "explosion_strength",
                reason: "must be finite",
            });
        }
        Ok(())
    }

    /// Parse and validate a JSON config
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to pretty JSON
    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load a config file from disk
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let config = Self::from_json(&json)?;
        log::info!("Loaded config from {}", path.as_ref().display());
        Ok(config)
    }

    /// Load a config file, falling back to defaults on any error
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        match Self::load(path.as_ref()) {
            Ok(config) => config,
            Err(e) => {
                log::warn!(
                    "Using default config ({}: {})",
                    path.as_ref().display(),
                    e
                );
                Self::default()
            }
        }
    }

    /// Write the config to disk as JSON
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        std::fs::write(path.as_ref(), self.to_json()?)?;
        log::info!("Config saved to {}", path.as_ref().display());
        Ok(())
    }

    /// Distance between neighbouring seeds in the spawn grid
    pub fn grid_step(&self) -> f32 {
        self.min_radius + self.max_radius + self.grid_padding
    }
}
