use serde::{Deserialize, Serialize};

use crate::spatial::DEFAULT_CELL_SIZE;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StarMapConfig {
    /// Edge length of a grid cell, in map units.
    pub cell_size: f32,
    /// On-screen edge length of an unscaled marker, in points.
    pub marker_size: f32,
    /// Hover search radius, in screen points.
    pub hover_radius: f32,
    /// Neighbor search radius around the selected system, in map units.
    pub neighbor_radius: f32,
    pub sample_seed: u64,
    pub sample_count: usize,
    /// Half-width of the cube the sample catalog is scattered in.
    pub sample_extent: f32,
}

impl Default for StarMapConfig {
    fn default() -> Self {
        Self {
            cell_size: DEFAULT_CELL_SIZE,
            marker_size: 6.0,
            hover_radius: 12.0,
            neighbor_radius: 40.0,
            sample_seed: 1,
            sample_count: 2_000,
            sample_extent: 600.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: StarMapConfig = serde_json::from_str(r#"{ "cell_size": 25.0 }"#).unwrap();
        assert_eq!(config.cell_size, 25.0);
        assert_eq!(config.marker_size, StarMapConfig::default().marker_size);
    }
}
