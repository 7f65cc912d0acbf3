//! Swipe-to-undo gesture

use glam::Vec3;
use tracing::debug;

use airdraw_config::SwipeConfig;

use crate::tracking::TrackingSource;

/// Fires once when the watched hand moves fast enough along +x
#[derive(Debug)]
pub struct SwipeDetector {
    config: SwipeConfig,
    /// Previous position and its timestamp
    last: Option<(Vec3, u64)>,
    last_swipe_ms: Option<u64>,
}

impl SwipeDetector {
    pub fn new(config: &SwipeConfig) -> Self {
        Self {
            config: config.clone(),
            last: None,
            last_swipe_ms: None,
        }
    }

    /// Advance one frame. Returns true when a swipe fires.
    pub fn update(&mut self, source: &impl TrackingSource) -> bool {
        if !self.config.enabled {
            return false;
        }
        let hand = self.config.hand;
        let Some(sample) = source.is_tracked(hand).then(|| source.current_sample(hand)).flatten() else {
            self.last = None;
            return false;
        };
        let now = sample.timestamp_ms;

        if let Some(last_swipe) = self.last_swipe_ms {
            if now.saturating_sub(last_swipe) < self.config.cooldown_ms {
                return false;
            }
        }

        let previous = self.last.replace((sample.position, now));
        let Some((last_position, last_ms)) = previous else {
            return false;
        };
        if now <= last_ms {
            return false;
        }

        let dt = (now - last_ms) as f32 / 1000.0;
        let velocity_x = (sample.position.x - last_position.x) / dt;
        if velocity_x > self.config.velocity_threshold {
            debug!("Swipe detected on {:?} hand: {:.2} m/s", hand, velocity_x);
            self.last_swipe_ms = Some(now);
            return true;
        }
        false
    }
}
