//! Game tuning
//!
//! Every gameplay constant can be overridden from JSON. Missing fields fall
//! back to the defaults in [`crate::consts`].

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::ConfigError;

/// Tunable game parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    // === Body ===
    pub gravity: f32,
    pub jump_velocity: f32,
    pub body_size: f32,
    pub body_x_fraction: f32,
    pub body_texture: String,

    // === Ground ===
    pub ground_height: f32,
    pub ground_rest_offset: f32,

    // === Obstacles ===
    pub obstacle_interval_ms: f64,
    pub obstacle_speed: f32,
    pub obstacle_gap: f32,
    pub obstacle_width: f32,
    pub obstacle_spawn_offset: f32,
    pub obstacle_top_margin: f32,
    pub obstacle_bottom_margin: f32,

    // === Particles ===
    pub burst_size: usize,
    pub particle_lifetime: u32,
    pub particle_speed: f32,
    pub particle_size: f32,

    // === Ambient ===
    pub cloud_count: usize,
    pub cloud_speed: f32,
    pub day_night_cycle: u32,
    pub day_color: u32,
    pub night_color: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            gravity: GRAVITY,
            jump_velocity: JUMP_VELOCITY,
            body_size: BODY_SIZE,
            body_x_fraction: BODY_X_FRACTION,
            body_texture: BODY_TEXTURE.to_string(),

            ground_height: GROUND_HEIGHT,
            ground_rest_offset: GROUND_REST_OFFSET,

            obstacle_interval_ms: OBSTACLE_INTERVAL_MS,
            obstacle_speed: OBSTACLE_SPEED,
            obstacle_gap: OBSTACLE_GAP,
            obstacle_width: OBSTACLE_WIDTH,
            obstacle_spawn_offset: OBSTACLE_SPAWN_OFFSET,
            obstacle_top_margin: OBSTACLE_TOP_MARGIN,
            obstacle_bottom_margin: OBSTACLE_BOTTOM_MARGIN,

            burst_size: BURST_SIZE,
            particle_lifetime: PARTICLE_LIFETIME,
            particle_speed: PARTICLE_SPEED,
            particle_size: PARTICLE_SIZE,

            cloud_count: CLOUD_COUNT,
            cloud_speed: CLOUD_SPEED,
            day_night_cycle: DAY_NIGHT_CYCLE,
            day_color: DAY_COLOR,
            night_color: NIGHT_COLOR,
        }
    }
}

impl GameConfig {
    /// Parse and validate a JSON config
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the simulation can't work with
    pub fn validate(&self) -> Result<(), ConfigError> {
        fn positive(field: &'static str, value: f64) -> Result<(), ConfigError> {
            if value > 0.0 && value.is_finite() {
                Ok(())
            } else {
                Err(ConfigError::Invalid {
                    field,
                    reason: format!("must be positive, got {value}"),
                })
            }
        }

        positive("gravity", self.gravity as f64)?;
        positive("body_size", self.body_size as f64)?;
        positive("ground_height", self.ground_height as f64)?;
        positive("obstacle_interval_ms", self.obstacle_interval_ms)?;
        positive("obstacle_speed", self.obstacle_speed as f64)?;
        positive("obstacle_gap", self.obstacle_gap as f64)?;
        positive("obstacle_width", self.obstacle_width as f64)?;
        positive("particle_lifetime", self.particle_lifetime as f64)?;
        positive("day_night_cycle", self.day_night_cycle as f64)?;

        if self.jump_velocity >= 0.0 || self.jump_velocity.is_nan() {
            return Err(ConfigError::Invalid {
                field: "jump_velocity",
                reason: format!("must be negative (upward), got {}", self.jump_velocity),
            });
        }
        if !(0.0..=1.0).contains(&self.body_x_fraction) {
            return Err(ConfigError::Invalid {
                field: "body_x_fraction",
                reason: format!("must be within 0..=1, got {}", self.body_x_fraction),
            });
        }
        if self.obstacle_top_margin < 0.0 || self.obstacle_bottom_margin < 0.0 {
            return Err(ConfigError::Invalid {
                field: "obstacle_top_margin",
                reason: "obstacle margins can't be negative".to_string(),
            });
        }
        Ok(())
    }

    /// Load config from a JSON file (native only)
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_from_path(path: impl AsRef<std::path::Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let config = Self::from_json(&json)?;
        log::info!("Loaded config from {}", path.as_ref().display());
        Ok(config)
    }

    /// LocalStorage key (used only in wasm32)
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "tower_flap_config";

    /// Load config overrides from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match Self::from_json(&json) {
                    Ok(config) => {
                        log::info!("Loaded config from LocalStorage");
                        return config;
                    }
                    Err(e) => log::warn!("Ignoring stored config: {e}"),
                }
            }
        }

        log::info!("Using default config");
        Self::default()
    }

    /// Native stub
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(GameConfig::default().validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = GameConfig::from_json(r#"{ "gravity": 0.5, "burst_size": 4 }"#).unwrap();
        assert_eq!(config.gravity, 0.5);
        assert_eq!(config.burst_size, 4);
        assert_eq!(config.obstacle_gap, OBSTACLE_GAP);
        assert_eq!(config.jump_velocity, JUMP_VELOCITY);
    }

    #[test]
    fn test_rejects_upward_gravity() {
        let err = GameConfig::from_json(r#"{ "gravity": -1.0 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "gravity", .. }));
    }

    #[test]
    fn test_rejects_downward_jump() {
        let err = GameConfig::from_json(r#"{ "jump_velocity": 3.0 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "jump_velocity", .. }));
    }

    #[test]
    fn test_malformed_json() {
        let err = GameConfig::from_json("{ gravity: ").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
