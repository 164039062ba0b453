//! Game configuration: the tunable constants of the economy.
//!
//! A [`GameConfig`] is fixed at engine construction and never mutated during
//! play; every numeric knob that affects a state transition lives here so
//! that two engines built from the same config replay identically.

use serde::{Deserialize, Serialize};

/// Tunable constants for one universe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    /// Global time speedup applied to growth, in hundredths. 100 = real
    /// time, 400 = 4x. Travel times are not scaled.
    pub time_factor_hundredths: u64,

    /// Fleet logistics overhead subtracted from every arriving force, as a
    /// percentage of the destination's energy cap.
    pub overhead_pct: u64,

    /// Starting energy of a freshly claimed homeworld, as a percentage of
    /// its energy cap.
    pub homeworld_energy_pct: u64,

    /// World radius before any expansion.
    pub initial_world_radius: u64,

    /// Planets at or above this level expand the world radius to their
    /// distance from the origin when first touched.
    pub radius_expand_min_level: u8,

    /// Maximum rank of a single upgrade branch.
    pub max_branch_rank: u8,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            time_factor_hundredths: 100,
            overhead_pct: 5,
            homeworld_energy_pct: 25,
            initial_world_radius: 8_000,
            radius_expand_min_level: 4,
            max_branch_rank: 4,
        }
    }
}

/// Errors from loading a config from JSON.
#[cfg(feature = "config-loader")]
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

#[cfg(feature = "config-loader")]
impl GameConfig {
    /// Load a config from a JSON document. Missing fields are an error;
    /// out-of-range values are rejected.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = serde_json::from_str(json)?;
        config.validate().map_err(ConfigError::Invalid)?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), String> {
        if self.time_factor_hundredths == 0 {
            return Err("time_factor_hundredths must be nonzero".into());
        }
        if self.overhead_pct > 100 {
            return Err("overhead_pct must be at most 100".into());
        }
        if self.homeworld_energy_pct > 100 {
            return Err("homeworld_energy_pct must be at most 100".into());
        }
        Ok(())
    }
}
