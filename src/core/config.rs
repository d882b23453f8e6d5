//! Configuration system for animation, distortion, selection and benchmark tuning
//!
//! This module provides a hierarchical configuration that callers build once
//! at construction, either from a preset profile or from a JSON document.

use crate::core::constants::{DEFAULT_TARGET_FPS, FRAME_HISTORY_CAPACITY};
use crate::{ProjletError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq)]
pub enum EngineProfile {
    Balanced,
    Responsive,
    Smooth,
    Custom(EngineConfig),
}

impl EngineProfile {
    pub fn resolve(&self) -> EngineConfig {
        match self {
            Self::Balanced => EngineConfig::default(),
            Self::Responsive => EngineConfig {
                animation: AnimationConfig {
                    smoothing_base: 0.2,
                    scale_smoothing_base: 0.25,
                    settle_debounce_ms: 100.0,
                    default_duration_ms: 600.0,
                    ..AnimationConfig::default()
                },
                ..EngineConfig::default()
            },
            Self::Smooth => EngineConfig {
                animation: AnimationConfig {
                    smoothing_base: 0.06,
                    scale_smoothing_base: 0.1,
                    settle_debounce_ms: 300.0,
                    default_duration_ms: 1500.0,
                    ..AnimationConfig::default()
                },
                tissot: TissotConfig {
                    outline_segments: 96,
                    ..TissotConfig::default()
                },
                ..EngineConfig::default()
            },
            Self::Custom(config) => config.clone(),
        }
    }
}

impl Default for EngineProfile {
    fn default() -> Self {
        Self::Balanced
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub animation: AnimationConfig,
    pub tissot: TissotConfig,
    pub selector: SelectorConfig,
    pub benchmark: BenchmarkConfig,
}

impl EngineConfig {
    /// Parse a configuration from JSON; missing fields fall back to defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let data = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&data)
    }

    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<()> {
        let (min, max) = self.animation.scale_extent;
        if !(min > 0.0 && max >= min) {
            return Err(ProjletError::Config(format!(
                "scale extent must satisfy 0 < min <= max, got [{}, {}]",
                min, max
            )));
        }
        if !(self.animation.smoothing_base > 0.0 && self.animation.smoothing_base <= 1.0) {
            return Err(ProjletError::Config(format!(
                "smoothing base must be in (0, 1], got {}",
                self.animation.smoothing_base
            )));
        }
        if !(self.tissot.grid_spacing_deg > 0.0 && self.tissot.grid_spacing_deg < 90.0) {
            return Err(ProjletError::Config(format!(
                "tissot grid spacing must be in (0, 90), got {}",
                self.tissot.grid_spacing_deg
            )));
        }
        if self.tissot.radius_meters <= 0.0 {
            return Err(ProjletError::Config(
                "tissot radius must be positive".to_string(),
            ));
        }
        if self.selector.global_threshold >= self.selector.regional_threshold {
            return Err(ProjletError::Config(format!(
                "global threshold {} must be below regional threshold {}",
                self.selector.global_threshold, self.selector.regional_threshold
            )));
        }
        if self.benchmark.history_capacity == 0 {
            return Err(ProjletError::Config(
                "benchmark history capacity must be non-zero".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationConfig {
    /// Per-frame rotation lerp factor at relative scale 1.
    pub smoothing_base: f64,
    /// Per-frame scale spring factor at relative scale 1.
    pub scale_smoothing_base: f64,
    /// Allowed scale range as multiples of the initial scale.
    pub scale_extent: (f64, f64),
    /// Velocity multiplier applied every frame.
    pub friction: f64,
    /// Extra velocity multiplier once the scale gap is small.
    pub near_target_damping: f64,
    /// Gap (fraction of the initial scale) under which extra damping applies.
    pub near_target_fraction: f64,
    /// Degrees of rotation per dragged pixel at relative scale 1.
    pub pan_sensitivity: f64,
    /// Exponent of the relative scale that reduces pan sensitivity when zoomed in.
    pub pan_scale_alpha: f64,
    /// Scale multiplier per wheel notch.
    pub wheel_zoom_factor: f64,
    /// Fraction of a scale-target jump added to the scale velocity.
    pub zoom_impulse: f64,
    /// Quiet period after settling before the projection type is re-evaluated.
    pub settle_debounce_ms: f64,
    /// Default duration of programmatic animations.
    pub default_duration_ms: f64,
    /// Re-evaluate the projection type when the view settles.
    pub dynamic_projection: bool,
}

impl AnimationConfig {
    pub fn min_scale(&self, initial_scale: f64) -> f64 {
        self.scale_extent.0 * initial_scale
    }

    pub fn max_scale(&self, initial_scale: f64) -> f64 {
        self.scale_extent.1 * initial_scale
    }
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            smoothing_base: 0.1,
            scale_smoothing_base: 0.15,
            scale_extent: (0.5, 8.0),
            friction: 0.75,
            near_target_damping: 0.8,
            near_target_fraction: 0.1,
            pan_sensitivity: 0.25,
            pan_scale_alpha: 1.0,
            wheel_zoom_factor: 1.1,
            zoom_impulse: 0.05,
            settle_debounce_ms: 200.0,
            default_duration_ms: 1000.0,
            dynamic_projection: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TissotConfig {
    pub grid_spacing_deg: f64,
    pub radius_meters: f64,
    /// Finite-difference step in degrees.
    pub epsilon_deg: f64,
    /// Vertices per ellipse outline.
    pub outline_segments: usize,
}

impl Default for TissotConfig {
    fn default() -> Self {
        Self {
            grid_spacing_deg: 15.0,
            radius_meters: 500_000.0,
            epsilon_deg: 1e-6,
            outline_segments: 48,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectorConfig {
    pub global_threshold: f64,
    pub regional_threshold: f64,
    /// Relative band around the last triggering scale inside which it is reused.
    pub hysteresis: f64,
    pub orthographic_threshold: f64,
    pub polar_local_latitude: f64,
    pub polar_regional_latitude: f64,
    pub mid_latitude: f64,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            global_threshold: 1.5,
            regional_threshold: 6.0,
            hysteresis: 0.1,
            orthographic_threshold: 0.8,
            polar_local_latitude: 70.0,
            polar_regional_latitude: 60.0,
            mid_latitude: 20.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BenchmarkConfig {
    pub target_fps: f64,
    pub frame_count: usize,
    pub history_capacity: usize,
    pub viewport_sizes: Vec<u32>,
}

impl BenchmarkConfig {
    pub fn passes(&self, avg_fps: f64) -> bool {
        avg_fps >= self.target_fps
    }
}

impl Default for BenchmarkConfig {
    fn default() -> Self {
        Self {
            target_fps: DEFAULT_TARGET_FPS,
            frame_count: 60,
            history_capacity: FRAME_HISTORY_CAPACITY,
            viewport_sizes: vec![256, 512, 1024],
        }
    }
}
