use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Largest spawn half-extent accepted. Spawning samples `[-h, h]`, whose
/// width must stay finite in `f32`.
pub const MAX_SPAWN_HALF_EXTENT: f32 = 1.0e6;

/// Tunable constants of the clustering simulation.
///
/// Missing fields in a JSON document fall back to [`Config::default`].
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Distance an entity moves towards its centroid per tick.
    pub step_size: f32,
    /// Entities whose centroid distance falls below this are removed.
    pub prune_threshold: f32,
    /// Distances at or below this produce a zero direction.
    pub normalize_epsilon: f32,
    /// Half-width of the square spawn region on the ground plane.
    pub spawn_half_extent: f32,
    /// Population used when the scene is (re)populated.
    pub initial_population: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            step_size: 0.1,
            prune_threshold: 0.05,
            normalize_epsilon: 1e-6,
            spawn_half_extent: 2.0,
            initial_population: 200,
        }
    }
}

impl Config {
    /// Parses a (possibly partial) JSON document and validates it.
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        let cfg: Config = serde_json::from_str(s)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Checks that every field holds a value the simulator can run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("step_size", self.step_size)?;
        positive("prune_threshold", self.prune_threshold)?;
        non_negative("normalize_epsilon", self.normalize_epsilon)?;
        non_negative("spawn_half_extent", self.spawn_half_extent)?;
        if self.spawn_half_extent > MAX_SPAWN_HALF_EXTENT {
            return Err(ConfigError::InvalidValue {
                field: "spawn_half_extent",
                value: self.spawn_half_extent,
                reason: "must be <= 1e6",
            });
        }
        Ok(())
    }
}

fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidValue {
            field,
            value,
            reason: "must be finite and > 0",
        })
    }
}

fn non_negative(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidValue {
            field,
            value,
            reason: "must be finite and >= 0",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_valid() {
        let cfg = Config::default();
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.step_size, 0.1);
        assert_eq!(cfg.prune_threshold, 0.05);
    }

    #[test]
    fn partial_json_keeps_defaults_for_missing_fields() {
        let cfg = Config::from_json_str(r#"{ "step_size": 0.25, "initial_population": 12 }"#)
            .expect("valid config");
        assert_eq!(cfg.step_size, 0.25);
        assert_eq!(cfg.initial_population, 12);
        assert_eq!(cfg.prune_threshold, Config::default().prune_threshold);
    }

    #[test]
    fn non_positive_step_is_rejected() {
        let err = Config::from_json_str(r#"{ "step_size": 0.0 }"#).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidValue {
                field: "step_size",
                ..
            }
        ));
    }

    #[test]
    fn negative_extent_is_rejected() {
        let cfg = Config {
            spawn_half_extent: -1.0,
            ..Config::default()
        };
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::InvalidValue {
                field: "spawn_half_extent",
                ..
            })
        ));
    }

    #[test]
    fn oversized_extent_is_rejected() {
        for h in [MAX_SPAWN_HALF_EXTENT * 2.0, f32::MAX, f32::INFINITY] {
            let cfg = Config {
                spawn_half_extent: h,
                ..Config::default()
            };
            assert!(
                matches!(
                    cfg.validate(),
                    Err(ConfigError::InvalidValue {
                        field: "spawn_half_extent",
                        ..
                    })
                ),
                "h={h}"
            );
        }

        let at_limit = Config {
            spawn_half_extent: MAX_SPAWN_HALF_EXTENT,
            ..Config::default()
        };
        assert!(at_limit.validate().is_ok());
    }

    #[test]
    fn nan_threshold_is_rejected() {
        let cfg = Config {
            prune_threshold: f32::NAN,
            ..Config::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        let err = Config::from_json_str("{ step_size: ").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = Config::from_json_file("/definitely/not/here/cluster.json").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
