//! Tunable constants and level layout, stored as RON.

use crate::probe::{BoxCollider, Colliders};
use glam::Vec2;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read `{path}`")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config")]
    Parse(#[from] ron::error::SpannedError),
    #[error("failed to write config")]
    Serialize(#[from] ron::Error),
    #[error("`{field}` {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

/// Speeds are in units per second, times in seconds.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tunables {
    pub walking_speed: f32,
    /// Lateral speed while airborne.
    pub airborne_speed: f32,
    pub gravity: f32,
    pub jump_up_velocity: f32,
    pub jump_forward_velocity: f32,
    pub jump_cooldown: f32,
    /// Time spent lying down before getting up.
    pub settle_time: f32,
    /// Length of the downward ground probe.
    pub ground_probe: f32,
}

impl Default for Tunables {
    fn default() -> Self {
        Self {
            walking_speed: 3.0,
            airborne_speed: 5.5,
            gravity: -18.0,
            jump_up_velocity: 9.0,
            jump_forward_velocity: 6.5,
            jump_cooldown: 0.5,
            settle_time: 1.0,
            ground_probe: 0.01,
        }
    }
}

impl Tunables {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let fields = [
            ("walking_speed", self.walking_speed),
            ("airborne_speed", self.airborne_speed),
            ("jump_up_velocity", self.jump_up_velocity),
            ("jump_forward_velocity", self.jump_forward_velocity),
            ("jump_cooldown", self.jump_cooldown),
            ("settle_time", self.settle_time),
        ];
        for (field, value) in fields {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::Invalid {
                    field,
                    reason: "must be a finite, non-negative number",
                });
            }
        }

        if !self.gravity.is_finite() || self.gravity > 0.0 {
            return Err(ConfigError::Invalid {
                field: "gravity",
                reason: "must point down (zero or negative)",
            });
        }

        if !self.ground_probe.is_finite() || self.ground_probe <= 0.0 {
            return Err(ConfigError::Invalid {
                field: "ground_probe",
                reason: "must be positive",
            });
        }

        Ok(())
    }
}

/// Linear RGBA per link.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Palette {
    pub body: [f32; 4],
    pub upper_arm: [f32; 4],
    pub lower_arm: [f32; 4],
    pub head: [f32; 4],
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            body: [0.20, 0.22, 0.25, 1.0],
            upper_arm: [0.85, 0.55, 0.10, 1.0],
            lower_arm: [0.85, 0.55, 0.10, 1.0],
            head: [0.95, 0.90, 0.60, 1.0],
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub locomotion: Tunables,
    pub palette: Palette,
    pub colliders: Vec<BoxCollider>,
    /// Screen scale used by the demo window.
    pub pixels_per_unit: f32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            locomotion: Tunables::default(),
            palette: Palette::default(),
            colliders: vec![
                // floor
                BoxCollider::from_corners(Vec2::new(-12.0, -3.0), Vec2::new(12.0, -2.0)),
                // walls
                BoxCollider::from_corners(Vec2::new(-11.0, -2.0), Vec2::new(-10.0, 8.0)),
                BoxCollider::from_corners(Vec2::new(10.0, -2.0), Vec2::new(11.0, 8.0)),
            ],
            pixels_per_unit: 40.0,
        }
    }
}

impl Config {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_ron(&text)?;
        tracing::info!("loaded config from {}", path.display());
        Ok(config)
    }

    pub fn from_ron(text: &str) -> Result<Self, ConfigError> {
        let config: Self = ron::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_ron(&self) -> Result<String, ConfigError> {
        let pretty = ron::ser::PrettyConfig::default().struct_names(false);
        Ok(ron::ser::to_string_pretty(self, pretty)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.locomotion.validate()?;
        if !self.pixels_per_unit.is_finite() || self.pixels_per_unit <= 0.0 {
            return Err(ConfigError::Invalid {
                field: "pixels_per_unit",
                reason: "must be positive",
            });
        }
        Ok(())
    }

    pub fn probe(&self) -> Colliders {
        Colliders::new(self.colliders.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let config = Config::from_ron("(locomotion: (gravity: -9.5, jump_cooldown: 0.25))").unwrap();
        assert_eq!(config.locomotion.gravity, -9.5);
        assert_eq!(config.locomotion.jump_cooldown, 0.25);
        assert_eq!(config.locomotion.walking_speed, 3.0);
        assert_eq!(config.palette, Palette::default());
        assert_eq!(config.colliders.len(), 3);
    }

    #[test]
    fn colliders_parse_from_tuples() {
        let config = Config::from_ron(
            "(colliders: [(center: (0.0, -2.5), half_extents: (12.0, 0.5))])",
        )
        .unwrap();
        assert_eq!(
            config.colliders,
            vec![BoxCollider::new(Vec2::new(0.0, -2.5), Vec2::new(12.0, 0.5))]
        );
    }

    #[test]
    fn written_config_reads_back() {
        let config = Config::default();
        let text = config.to_ron().unwrap();
        assert_eq!(Config::from_ron(&text).unwrap(), config);
    }

    #[test]
    fn shipped_config_matches_defaults() {
        let config = Config::from_ron(include_str!("../assets/lampbot.ron")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn upward_gravity_is_rejected() {
        let err = Config::from_ron("(locomotion: (gravity: 3.0))").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "gravity", .. }));
    }

    #[test]
    fn negative_speed_is_rejected() {
        let err = Config::from_ron("(locomotion: (walking_speed: -1.0))").unwrap_err();
        assert_eq!(
            err.to_string(),
            "`walking_speed` must be a finite, non-negative number"
        );
    }

    #[test]
    fn malformed_text_is_a_parse_error() {
        assert!(matches!(
            Config::from_ron("(locomotion: ("),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = Config::load("/definitely/not/here.ron").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
