use std::path::Path;

use glam::Vec3;
use ridgeline_core::config::{parse_ron, GenerationConfig};
use ridgeline_core::constants::MAX_RENDER_RADIUS;
use ridgeline_core::error::ConfigError;
use ridgeline_render::ShadingParams;
use serde::{Deserialize, Serialize};

use crate::input::MoveSpeeds;

/// Everything a flight needs besides the route. Every field has a default,
/// so a config file only names what it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    /// Manhattan radius of the resident neighbourhood, in chunks.
    pub render_radius: i32,
    pub start_position: [f32; 3],
    pub speeds: MoveSpeeds,
    /// Degrees of rotation per pixel of cursor motion.
    pub mouse_sensitivity: f32,
    pub viewport: [u32; 2],
    pub shading: ShadingParams,
    pub generation: GenerationConfig,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            render_radius: MAX_RENDER_RADIUS,
            start_position: [200_000.0, 400.0, 200_000.0],
            speeds: MoveSpeeds::default(),
            mouse_sensitivity: 0.2,
            viewport: [1280, 720],
            shading: ShadingParams::default(),
            generation: GenerationConfig::default(),
        }
    }
}

impl ViewerConfig {
    pub fn from_ron_str(ron_str: &str) -> Result<Self, ConfigError> {
        let config: Self = parse_ron(ron_str)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(format!("{}: {e}", path.display())))?;
        Self::from_ron_str(&contents)
    }

    pub fn to_ron_string(&self) -> Result<String, ConfigError> {
        ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
            .map_err(|e| ConfigError::Parse(e.to_string()))
    }

    pub fn start_position(&self) -> Vec3 {
        Vec3::from_array(self.start_position)
    }

    pub fn aspect(&self) -> f32 {
        self.viewport[0] as f32 / self.viewport[1].max(1) as f32
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0..=MAX_RENDER_RADIUS).contains(&self.render_radius) {
            return Err(ConfigError::InvalidViewer(format!(
                "render_radius {} outside 0..={}",
                self.render_radius, MAX_RENDER_RADIUS
            )));
        }
        if self.viewport[0] == 0 || self.viewport[1] == 0 {
            return Err(ConfigError::InvalidViewer("viewport must be non-empty".into()));
        }
        if self.shading.fog_distance[0] > self.shading.fog_distance[1] {
            return Err(ConfigError::InvalidViewer(
                "fog_distance start must not exceed end".into(),
            ));
        }
        if !self.start_position.iter().all(|v| v.is_finite()) {
            return Err(ConfigError::InvalidViewer(
                "start_position must be finite".into(),
            ));
        }
        self.generation.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ViewerConfig::default();
        assert_eq!(config.render_radius, 4);
        assert_eq!(config.speeds.normal, 400.0);
        assert_eq!(config.speeds.fast, 1000.0);
        assert_eq!(config.mouse_sensitivity, 0.2);
        assert_eq!(config.start_position(), Vec3::new(200_000.0, 400.0, 200_000.0));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_ron_fills_defaults() {
        let config = ViewerConfig::from_ron_str(
            "(render_radius: 2, generation: (octaves: 8), shading: (height_scale: 350.0))",
        )
        .expect("parse");
        assert_eq!(config.render_radius, 2);
        assert_eq!(config.generation.octaves, 8);
        assert_eq!(config.generation.grid_size, 200);
        assert_eq!(config.shading.height_scale, 350.0);
        assert_eq!(config.shading.fog_distance, [700.0, 2500.0]);
        assert_eq!(config.viewport, [1280, 720]);
    }

    #[test]
    fn test_rejects_radius_out_of_range() {
        let err = ViewerConfig::from_ron_str("(render_radius: 9)").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidViewer(_)));
    }

    #[test]
    fn test_rejects_bad_generation() {
        let err = ViewerConfig::from_ron_str("(generation: (grid_size: 0))").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidGeneration(_)));
    }

    #[test]
    fn test_parse_error() {
        let err = ViewerConfig::from_ron_str("(render_radius: )").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = ViewerConfig::load(Path::new("/nonexistent/viewer.ron")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn test_ron_string_reparses() {
        let config = ViewerConfig {
            render_radius: 3,
            ..Default::default()
        };
        let text = config.to_ron_string().expect("serialize");
        assert_eq!(ViewerConfig::from_ron_str(&text).expect("parse"), config);
    }

    #[test]
    fn test_sample_config_parses() {
        let sample = include_str!("../../../config/viewer.ron");
        let config = ViewerConfig::from_ron_str(sample).expect("sample config");
        assert_eq!(config, ViewerConfig::default());
    }
}
