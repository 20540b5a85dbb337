use serde::{Deserialize, Serialize};

use crate::constants::MAX_OCTAVES;
use crate::error::ConfigError;

/// Parameters of the fractal height function. Applied uniformly to every
/// chunk generated after a change.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// World units per noise lattice cell of the first octave.
    pub grid_size: u32,
    /// Number of noise octaves summed.
    pub octaves: u32,
    /// Frequency multiplier between octaves.
    pub lacunarity: f32,
    /// Amplitude multiplier between octaves.
    pub gain: f32,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            grid_size: 200,
            octaves: 12,
            lacunarity: 2.0,
            gain: 0.5,
        }
    }
}

impl GenerationConfig {
    /// Check that the parameters produce a finite, bounded height function.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.grid_size == 0 {
            return Err(ConfigError::InvalidGeneration(
                "grid_size must be at least 1".into(),
            ));
        }
        if self.octaves > MAX_OCTAVES {
            return Err(ConfigError::InvalidGeneration(format!(
                "octaves {} exceeds maximum {}",
                self.octaves, MAX_OCTAVES
            )));
        }
        if !self.lacunarity.is_finite() || !self.gain.is_finite() {
            return Err(ConfigError::InvalidGeneration(
                "lacunarity and gain must be finite".into(),
            ));
        }
        Ok(())
    }

    /// Parse a generation config from a RON string and validate it.
    pub fn from_ron_str(ron_str: &str) -> Result<Self, ConfigError> {
        let config: Self = parse_ron(ron_str)?;
        config.validate()?;
        Ok(config)
    }
}

/// Parse any RON document with the default options used across the workspace.
pub fn parse_ron<T: for<'de> Deserialize<'de>>(ron_str: &str) -> Result<T, ConfigError> {
    let options = ron::Options::default();
    options
        .from_str(ron_str)
        .map_err(|e| ConfigError::Parse(e.to_string()))
}
