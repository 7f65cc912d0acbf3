//! Shared configuration for airdraw
//!
//! This crate provides the single source of truth for stroke geometry,
//! patch spacing, brush sizing and gesture thresholds shared by the drawing
//! core and whatever host drives it.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[cfg(feature = "bevy")]
use bevy::prelude::Resource;

/// Default number of vertices per tube ring
pub const DEFAULT_TUBE_SEGMENTS: u32 = 16;

/// Default minimum distance between accepted tube samples (meters)
pub const DEFAULT_TUBE_MIN_SPACING: f32 = 0.005;

/// Default minimum distance between accepted patch samples (meters)
pub const DEFAULT_PATCH_MIN_SPACING: f32 = 0.01;

/// Default activation (pinch) strength above which a hand draws
pub const DEFAULT_ACTIVATION_THRESHOLD: f32 = 0.8;

/// Default step used by increase/decrease scale
pub const DEFAULT_SCALE_STEP: f32 = 0.1;

/// Default brush diameter (meters)
pub const DEFAULT_BRUSH_SIZE: f32 = 0.01;

/// Input channel identifier: the hand a sample stream comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum HandSide {
    Left,
    Right,
}

impl HandSide {
    /// Both hands, in update order
    pub const ALL: [HandSide; 2] = [HandSide::Left, HandSide::Right];
}

/// Errors produced while loading or validating configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to parse config: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Tube stroke geometry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TubeConfig {
    /// Vertices per ring (`k`)
    pub segments: u32,
    /// Samples closer than this to the last accepted point are dropped
    pub min_spacing: f32,
}

impl Default for TubeConfig {
    fn default() -> Self {
        Self {
            segments: DEFAULT_TUBE_SEGMENTS,
            min_spacing: DEFAULT_TUBE_MIN_SPACING,
        }
    }
}

/// Planar patch sampling
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PatchConfig {
    pub min_spacing: f32,
}

impl Default for PatchConfig {
    fn default() -> Self {
        Self {
            min_spacing: DEFAULT_PATCH_MIN_SPACING,
        }
    }
}

/// Uniform scale applied to the container of all strokes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScaleConfig {
    pub initial: f32,
    /// Increment for increase/decrease, also the floor for decrease
    pub step: f32,
}

impl Default for ScaleConfig {
    fn default() -> Self {
        Self {
            initial: 1.0,
            step: DEFAULT_SCALE_STEP,
        }
    }
}

/// Two-handed brush size gesture
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrushSizeConfig {
    /// Brush diameter at startup
    pub default_size: f32,
    pub min_size: f32,
    pub max_size: f32,
    /// Pinch points must be closer than this to arm the gesture
    pub hands_close_threshold: f32,
    /// Size change per meter of hand separation change
    pub sensitivity: f32,
}

impl Default for BrushSizeConfig {
    fn default() -> Self {
        Self {
            default_size: DEFAULT_BRUSH_SIZE,
            min_size: 0.001,
            max_size: 0.1,
            hands_close_threshold: 0.1,
            sensitivity: 2.0,
        }
    }
}

/// Swipe-to-undo gesture
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SwipeConfig {
    pub enabled: bool,
    pub hand: HandSide,
    /// Minimum x velocity (m/s) that counts as a swipe
    pub velocity_threshold: f32,
    pub cooldown_ms: u64,
}

impl Default for SwipeConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            hand: HandSide::Right,
            velocity_threshold: 1.5,
            cooldown_ms: 1000,
        }
    }
}

/// Per-hand brush colors (linear RGBA)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorConfig {
    pub left: [f32; 4],
    pub right: [f32; 4],
}

impl Default for ColorConfig {
    fn default() -> Self {
        Self {
            left: [1.0, 0.0, 0.0, 1.0],
            right: [0.0, 0.0, 1.0, 1.0],
        }
    }
}

impl ColorConfig {
    /// Color configured for a hand
    pub fn for_hand(&self, hand: HandSide) -> [f32; 4] {
        match hand {
            HandSide::Left => self.left,
            HandSide::Right => self.right,
        }
    }
}

/// Complete drawing configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "bevy", derive(Resource))]
#[serde(default)]
pub struct DrawingConfig {
    pub tube: TubeConfig,
    pub patch: PatchConfig,
    pub activation_threshold: f32,
    pub scale: ScaleConfig,
    pub brush_size: BrushSizeConfig,
    pub swipe: SwipeConfig,
    pub colors: ColorConfig,
}

impl DrawingConfig {
    /// Parse a JSON document, filling missing fields with defaults, then validate it
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to pretty JSON
    pub fn to_json_string(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check value ranges that the drawing core relies on
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tube.segments < 3 {
            return Err(invalid(format!(
                "tube.segments must be at least 3, got {}",
                self.tube.segments
            )));
        }
        if !(self.tube.min_spacing > 0.0) {
            return Err(invalid(format!(
                "tube.min_spacing must be positive, got {}",
                self.tube.min_spacing
            )));
        }
        if !(self.patch.min_spacing > 0.0) {
            return Err(invalid(format!(
                "patch.min_spacing must be positive, got {}",
                self.patch.min_spacing
            )));
        }
        if !(0.0..=1.0).contains(&self.activation_threshold) {
            return Err(invalid(format!(
                "activation_threshold must be within [0, 1], got {}",
                self.activation_threshold
            )));
        }
        if !(self.scale.step > 0.0) || !(self.scale.initial > 0.0) {
            return Err(invalid("scale.initial and scale.step must be positive".to_string()));
        }
        let size = &self.brush_size;
        if !(size.min_size > 0.0) || size.min_size > size.max_size {
            return Err(invalid(format!(
                "brush_size range [{}, {}] is empty or non-positive",
                size.min_size, size.max_size
            )));
        }
        if !(size.min_size..=size.max_size).contains(&size.default_size) {
            return Err(invalid(format!(
                "brush_size.default_size {} outside [{}, {}]",
                size.default_size, size.min_size, size.max_size
            )));
        }
        Ok(())
    }
}

impl Default for DrawingConfig {
    fn default() -> Self {
        Self {
            tube: TubeConfig::default(),
            patch: PatchConfig::default(),
            activation_threshold: DEFAULT_ACTIVATION_THRESHOLD,
            scale: ScaleConfig::default(),
            brush_size: BrushSizeConfig::default(),
            swipe: SwipeConfig::default(),
            colors: ColorConfig::default(),
        }
    }
}

fn invalid(message: String) -> ConfigError {
    ConfigError::Invalid(message)
}
