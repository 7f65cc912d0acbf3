//! Two-handed brush size gesture
//!
//! Bring both pinch points together and pinch with both hands to grab the
//! brush; pulling the hands apart grows it, pushing them together shrinks it.
//! Releasing either pinch ends the adjustment.

use glam::Vec3;
use tracing::debug;

use airdraw_config::BrushSizeConfig;

use crate::tracking::{BrushRadius, RadiusProvider, TrackingSource};
use crate::types::HandSide;

/// Where to draw the size preview sphere, and how big
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SizeIndicator {
    /// Midpoint between the two pinch points
    pub center: Vec3,
    /// Brush diameter
    pub size: f32,
}

/// Brush size state machine; the single writer of [`BrushRadius`]
#[derive(Debug)]
pub struct BrushSizeAdjuster {
    config: BrushSizeConfig,
    activation_threshold: f32,
    radius: BrushRadius,
    /// Diameter
    size: f32,
    adjusting: bool,
    indicator: Option<SizeIndicator>,
    initial_distance: f32,
    initial_size: f32,
}

impl BrushSizeAdjuster {
    pub fn new(config: &BrushSizeConfig, activation_threshold: f32, radius: BrushRadius) -> Self {
        let size = config.default_size.clamp(config.min_size, config.max_size);
        radius.set(size * 0.5);
        Self {
            config: config.clone(),
            activation_threshold,
            radius,
            size,
            adjusting: false,
            indicator: None,
            initial_distance: 0.0,
            initial_size: size,
        }
    }

    /// Advance one frame. Returns whether the size is being adjusted.
    pub fn update(&mut self, source: &impl TrackingSource) -> bool {
        let pinches = HandSide::ALL.map(|hand| {
            source
                .is_tracked(hand)
                .then(|| source.current_sample(hand))
                .flatten()
                .map(|sample| (sample.position, source.activation_strength(hand)))
        });
        let [Some((left, left_strength)), Some((right, right_strength))] = pinches else {
            if self.adjusting {
                debug!("Brush size adjustment lost tracking at size {:.4}", self.size);
                self.adjusting = false;
            }
            self.indicator = None;
            return false;
        };

        let distance = left.distance(right);
        let both_pinching =
            left_strength >= self.activation_threshold && right_strength >= self.activation_threshold;

        if !self.adjusting {
            if distance >= self.config.hands_close_threshold {
                self.indicator = None;
                return false;
            }
            if both_pinching {
                self.adjusting = true;
                self.initial_distance = distance;
                self.initial_size = self.size;
                debug!("Brush size adjustment started at size {:.4}", self.size);
            }
        } else if !both_pinching {
            self.adjusting = false;
            self.indicator = None;
            debug!("Brush size adjustment finished at size {:.4}", self.size);
            return false;
        } else {
            let delta = distance - self.initial_distance;
            self.set_size(self.initial_size + delta * self.config.sensitivity);
        }

        self.indicator = Some(SizeIndicator {
            center: (left + right) * 0.5,
            size: self.size,
        });
        self.adjusting
    }

    /// Set the brush diameter, clamped to the configured range
    pub fn set_size(&mut self, size: f32) {
        self.size = size.clamp(self.config.min_size, self.config.max_size);
        self.radius.set(self.size * 0.5);
    }

    /// Brush diameter
    pub fn size(&self) -> f32 {
        self.size
    }

    pub fn is_adjusting(&self) -> bool {
        self.adjusting
    }

    /// Preview shown while the hands are close or the size is being adjusted
    pub fn indicator(&self) -> Option<SizeIndicator> {
        self.indicator
    }
}

impl RadiusProvider for BrushSizeAdjuster {
    fn current_radius(&self) -> f32 {
        self.size * 0.5
    }

    fn is_adjusting_radius(&self) -> bool {
        self.adjusting
    }
}
