//! Canvas configuration.
//!
//! Every tunable of the canvas lives in [`CanvasConfig`]. It serializes to
//! pretty JSON so a session can be reproduced with `pointzero my.json`.
//! Missing fields fall back to their defaults.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CanvasConfig {
    /// World size as a multiple of the viewport size.
    pub world_multiple: u32,
    /// Per-axis clamp on the world size, in pixels.
    pub max_world_dimension: u32,
    pub min_zoom: f32,
    pub max_zoom: f32,
    pub zoom_step: f32,
    /// World units moved per frame while a pan key is held.
    pub pan_step: f32,
    /// Per-frame momentum decay factor.
    pub pan_friction: f32,
    pub pan_epsilon: f32,
    pub max_pan_velocity: f32,
    /// Weight of the previous smoothed drag delta.
    pub drag_smoothing: f32,
    pub label_anim_ms: f64,
    pub star_count: usize,
    pub initial_nebulae: usize,
    pub initial_galaxies: usize,
    pub initial_black_holes: usize,
    pub background: [u8; 3],
    /// Fixed RNG seed. `None` seeds from entropy.
    pub seed: Option<u64>,
    /// TTF/OTF font for the overlay.
    pub font_path: Option<PathBuf>,
    pub export_path: PathBuf,
    pub window_title: String,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            world_multiple: 6,
            max_world_dimension: 8192,
            min_zoom: 0.2,
            max_zoom: 5.0,
            zoom_step: 0.08,
            pan_step: 30.0,
            pan_friction: 0.97,
            pan_epsilon: 0.08,
            max_pan_velocity: 1000.0,
            drag_smoothing: 0.7,
            label_anim_ms: 200.0,
            star_count: 1200,
            initial_nebulae: 3,
            initial_galaxies: 3,
            initial_black_holes: 2,
            background: [5, 5, 5],
            seed: None,
            font_path: None,
            export_path: PathBuf::from("galaxy_map_full.png"),
            window_title: "Point Zer0".into(),
        }
    }
}

impl CanvasConfig {
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_zoom_range(mut self, min: f32, max: f32) -> Self {
        self.min_zoom = min;
        self.max_zoom = max;
        self
    }

    pub fn with_world_multiple(mut self, multiple: u32) -> Self {
        self.world_multiple = multiple;
        self
    }

    pub fn with_star_count(mut self, count: usize) -> Self {
        self.star_count = count;
        self
    }

    /// Startup population: nebulae, galaxies, black holes.
    pub fn with_initial_population(mut self, nebulae: usize, galaxies: usize, black_holes: usize) -> Self {
        self.initial_nebulae = nebulae;
        self.initial_galaxies = galaxies;
        self.initial_black_holes = black_holes;
        self
    }

    pub fn with_label_anim_ms(mut self, ms: f64) -> Self {
        self.label_anim_ms = ms;
        self
    }

    pub fn with_font_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.font_path = Some(path.into());
        self
    }

    pub fn with_export_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.export_path = path.into();
        self
    }

    /// Save the configuration to a JSON file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Load and validate a configuration from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.min_zoom > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "min_zoom must be positive, got {}",
                self.min_zoom
            )));
        }
        if !self.max_zoom.is_finite() || self.min_zoom > self.max_zoom {
            return Err(ConfigError::Invalid(format!(
                "min_zoom {} exceeds max_zoom {}",
                self.min_zoom, self.max_zoom
            )));
        }
        if !(self.max_pan_velocity >= 0.0) {
            return Err(ConfigError::Invalid(format!(
                "max_pan_velocity must be non-negative, got {}",
                self.max_pan_velocity
            )));
        }
        if self.world_multiple == 0 {
            return Err(ConfigError::Invalid("world_multiple must be at least 1".into()));
        }
        if !(self.pan_friction > 0.0 && self.pan_friction <= 1.0) {
            return Err(ConfigError::Invalid(format!(
                "pan_friction must be in (0, 1], got {}",
                self.pan_friction
            )));
        }
        if !(self.label_anim_ms > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "label_anim_ms must be positive, got {}",
                self.label_anim_ms
            )));
        }
        Ok(())
    }

    /// World size for a viewport, clamped per axis.
    pub fn world_size_for(&self, width: u32, height: u32) -> (u32, u32) {
        let clamp = |v: u32| v.saturating_mul(self.world_multiple).clamp(1, self.max_world_dimension.max(1));
        (clamp(width), clamp(height))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = CanvasConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.star_count, 1200);
        assert_eq!(config.world_size_for(800, 600), (4800, 3600));
    }

    #[test]
    fn test_world_size_clamped() {
        let config = CanvasConfig::default();
        assert_eq!(config.world_size_for(2560, 1440), (8192, 8192));
        assert_eq!(config.world_size_for(0, 10), (1, 60));
    }

    #[test]
    fn test_validation_rejects() {
        let bad = [
            CanvasConfig::default().with_zoom_range(0.0, 5.0),
            CanvasConfig::default().with_zoom_range(3.0, 2.0),
            CanvasConfig::default().with_world_multiple(0),
            CanvasConfig::default().with_label_anim_ms(0.0),
            CanvasConfig {
                pan_friction: 1.5,
                ..Default::default()
            },
            CanvasConfig {
                max_zoom: f32::NAN,
                ..Default::default()
            },
            CanvasConfig {
                max_pan_velocity: -1.0,
                ..Default::default()
            },
        ];
        for config in bad {
            assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
        }
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: CanvasConfig = serde_json::from_str(r#"{ "max_zoom": 2.5, "seed": 7 }"#).unwrap();
        assert_eq!(config.max_zoom, 2.5);
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.min_zoom, 0.2);
    }

    #[test]
    fn test_save_load() {
        let path = std::env::temp_dir().join(format!("pointzero-config-{}.json", std::process::id()));
        let config = CanvasConfig::default().with_seed(42).with_star_count(10);
        config.save(&path).unwrap();
        let loaded = CanvasConfig::load(&path).unwrap();
        let _ = fs::remove_file(&path);
        assert_eq!(config, loaded);
    }
}
