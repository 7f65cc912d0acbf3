//! Contracts with the tracking and brush-size collaborators
//!
//! The drawing core never talks to hand-tracking hardware directly. A host
//! implements [`TrackingSource`] over whatever runtime it uses, and the
//! brush radius travels through a shared [`BrushRadius`] handle.

use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

use tracing::info;

use crate::types::{HandSide, Sample};

/// Per-frame view of the hand-tracking runtime
pub trait TrackingSource {
    /// Whether the skeleton/bone transforms are initialized
    fn is_ready(&self) -> bool;

    /// Whether `hand` is currently tracked
    fn is_tracked(&self, hand: HandSide) -> bool;

    /// Current drawing-point sample for `hand`, if available
    fn current_sample(&self, hand: HandSide) -> Option<Sample>;

    /// Pinch/activation strength in `[0, 1]`
    fn activation_strength(&self, hand: HandSide) -> f32;
}

/// Provider of the brush radius and the "size is being adjusted" gate
pub trait RadiusProvider {
    fn current_radius(&self) -> f32;

    /// While true, no stroke sample is accepted anywhere
    fn is_adjusting_radius(&self) -> bool;
}

/// Shared brush radius: one writer, any number of readers.
///
/// Stored as f32 bits in an atomic so clones can live on other threads.
#[derive(Debug, Clone)]
pub struct BrushRadius(Arc<AtomicU32>);

impl BrushRadius {
    pub fn new(radius: f32) -> Self {
        Self(Arc::new(AtomicU32::new(radius.to_bits())))
    }

    pub fn get(&self) -> f32 {
        f32::from_bits(self.0.load(Ordering::Relaxed))
    }

    pub fn set(&self, radius: f32) {
        self.0.store(radius.to_bits(), Ordering::Relaxed);
    }
}

impl Default for BrushRadius {
    fn default() -> Self {
        Self::new(airdraw_config::DEFAULT_BRUSH_SIZE * 0.5)
    }
}

/// Poll-based gate that stays closed until the tracking source reports ready.
///
/// Checked once per frame; logs the transition once.
#[derive(Debug, Default)]
pub struct ReadinessGate {
    ready: bool,
}

impl ReadinessGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true once `source` has been ready at least once
    pub fn poll(&mut self, source: &impl TrackingSource) -> bool {
        if !self.ready && source.is_ready() {
            info!("Tracking source ready, accepting samples");
            self.ready = true;
        }
        self.ready
    }

    pub fn is_ready(&self) -> bool {
        self.ready
    }
}
