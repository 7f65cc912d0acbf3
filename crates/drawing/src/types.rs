//! Shared value types for samples and strokes

use std::fmt;

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

use crate::constants::DEVICE_FORWARD;
use crate::geometry::OrderingStrategy;

pub use airdraw_config::HandSide;

/// Linear RGBA color
pub type Rgba = [f32; 4];

/// One tracked sample: where the drawing point is, how the device is
/// oriented, and the color it paints with.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub position: Vec3,
    pub color: Rgba,
    pub orientation: Quat,
    pub timestamp_ms: u64,
}

impl Sample {
    pub fn new(position: Vec3, color: Rgba, orientation: Quat, timestamp_ms: u64) -> Self {
        Self {
            position,
            color,
            orientation,
            timestamp_ms,
        }
    }

    /// Direction the tracked device points along
    pub fn forward(&self) -> Vec3 {
        self.orientation * DEVICE_FORWARD
    }
}

/// Identifier of a stroke, unique within a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StrokeId(pub u64);

impl fmt::Display for StrokeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "stroke#{}", self.0)
    }
}

/// Mesh-generation strategy for new strokes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BrushKind {
    /// Fixed-radius tube extruded along the path
    #[default]
    Tube,
    /// Flat patch over the convex hull of the path, PCA plane
    HullPatch,
    /// Flat patch over every point sorted by angle, plane facing the device
    AngularPatch,
}

impl BrushKind {
    /// Point ordering used by the patch brushes, `None` for tubes
    pub fn ordering(self) -> Option<OrderingStrategy> {
        match self {
            BrushKind::Tube => None,
            BrushKind::HullPatch => Some(OrderingStrategy::Hull),
            BrushKind::AngularPatch => Some(OrderingStrategy::Angular),
        }
    }
}
