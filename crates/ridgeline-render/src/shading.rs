//! Terrain shading parameters.
//! Heights leave the pool in [0, 1]; the vertex shader raises them to
//! `height_power` and multiplies by `height_scale`. Fog blends linearly
//! (smoothstep) toward `sky_color` between the two fog distances.

use serde::{Deserialize, Serialize};

/// Default sky and fog color, also used to clear the frame.
pub const DEFAULT_SKY_COLOR: [f32; 3] = [0.0, 0.0, 0.0];

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShadingParams {
    /// World units of the highest possible point.
    pub height_scale: f32,
    /// Exponent applied to normalized heights before scaling.
    pub height_power: f32,
    /// Fog start and full-fog distance from the camera.
    pub fog_distance: [f32; 2],
    pub sky_color: [f32; 3],
}

impl Default for ShadingParams {
    fn default() -> Self {
        Self {
            height_scale: 200.0,
            height_power: 1.0,
            fog_distance: [700.0, 2500.0],
            sky_color: DEFAULT_SKY_COLOR,
        }
    }
}

impl ShadingParams {
    /// World-space height of a normalized sample, as the vertex shader computes it.
    pub fn world_height(&self, normalized: f32) -> f32 {
        normalized.max(0.0).powf(self.height_power) * self.height_scale
    }

    pub fn clear_color(&self) -> wgpu::Color {
        wgpu::Color {
            r: self.sky_color[0] as f64,
            g: self.sky_color[1] as f64,
            b: self.sky_color[2] as f64,
            a: 1.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let params = ShadingParams::default();
        assert_eq!(params.height_scale, 200.0);
        assert_eq!(params.height_power, 1.0);
        assert_eq!(params.fog_distance, [700.0, 2500.0]);
        assert!(params.fog_distance[0] < params.fog_distance[1]);
    }

    #[test]
    fn test_world_height() {
        let params = ShadingParams {
            height_power: 2.0,
            ..Default::default()
        };
        assert_eq!(params.world_height(0.0), 0.0);
        assert_eq!(params.world_height(1.0), 200.0);
        assert_eq!(params.world_height(0.5), 50.0);
    }

    #[test]
    fn test_sky_color_valid() {
        for c in DEFAULT_SKY_COLOR {
            assert!((0.0..=1.0).contains(&c));
        }
    }
}
