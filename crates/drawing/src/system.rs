//! Per-frame drawing driver
//!
//! Wires a [`TrackingSource`] to the session manager. Each [`update`] runs:
//! 1. readiness gate (nothing happens until tracking is initialized)
//! 2. swipe-to-undo
//! 3. brush size gesture; while adjusting no samples are accepted
//! 4. painting toggle; when off, every active stroke is finished
//! 5. per hand: pinch above threshold draws, otherwise the stroke ends
//!
//! [`update`]: DrawingSystem::update

use tracing::debug;

use airdraw_config::{ColorConfig, DrawingConfig};

#[cfg(feature = "bevy")]
use bevy::prelude::Resource;

use crate::brush_size::BrushSizeAdjuster;
use crate::session::StrokeSessionManager;
use crate::swipe::SwipeDetector;
use crate::tracking::{BrushRadius, RadiusProvider, ReadinessGate, TrackingSource};
use crate::types::{BrushKind, HandSide, Rgba};

/// Everything needed to turn tracked hands into stroke meshes
#[cfg_attr(feature = "bevy", derive(Resource))]
pub struct DrawingSystem {
    gate: ReadinessGate,
    swipe: SwipeDetector,
    brush_size: BrushSizeAdjuster,
    session: StrokeSessionManager,
    colors: ColorConfig,
    activation_threshold: f32,
    painting_allowed: bool,
}

impl DrawingSystem {
    pub fn new(config: &DrawingConfig) -> Self {
        let radius = BrushRadius::new(config.brush_size.default_size * 0.5);
        Self {
            gate: ReadinessGate::new(),
            swipe: SwipeDetector::new(&config.swipe),
            brush_size: BrushSizeAdjuster::new(
                &config.brush_size,
                config.activation_threshold,
                radius.clone(),
            ),
            session: StrokeSessionManager::new(config, radius),
            colors: config.colors.clone(),
            activation_threshold: config.activation_threshold,
            painting_allowed: true,
        }
    }

    /// Run one frame against `source`
    pub fn update(&mut self, source: &impl TrackingSource) {
        if !self.gate.poll(source) {
            return;
        }

        if self.swipe.update(source) {
            self.session.undo();
        }

        self.brush_size.update(source);
        if self.brush_size.is_adjusting_radius() {
            return;
        }

        if !self.painting_allowed {
            self.session.end_all();
            return;
        }

        for hand in HandSide::ALL {
            self.update_hand(source, hand);
        }
    }

    fn update_hand(&mut self, source: &impl TrackingSource, hand: HandSide) {
        if !source.is_tracked(hand) {
            return;
        }

        if source.activation_strength(hand) >= self.activation_threshold {
            if let Some(sample) = source.current_sample(hand) {
                let color = self.colors.for_hand(hand);
                let radius = self.brush_size.current_radius();
                self.session.add_point_with_radius(
                    hand,
                    sample.position,
                    color,
                    sample.orientation,
                    radius,
                );
            }
        } else {
            self.session.end_stroke(hand);
        }
    }

    /// Change the paint color of `hand` for strokes started from now on
    pub fn set_brush_color(&mut self, hand: HandSide, color: Rgba) {
        debug!("Brush color for {:?} hand set to {:?}", hand, color);
        match hand {
            HandSide::Left => self.colors.left = color,
            HandSide::Right => self.colors.right = color,
        }
    }

    pub fn brush_color(&self, hand: HandSide) -> Rgba {
        self.colors.for_hand(hand)
    }

    pub fn set_painting_allowed(&mut self, allowed: bool) {
        self.painting_allowed = allowed;
    }

    pub fn painting_allowed(&self) -> bool {
        self.painting_allowed
    }

    pub fn set_brush(&mut self, brush: BrushKind) {
        self.session.set_brush(brush);
    }

    pub fn is_ready(&self) -> bool {
        self.gate.is_ready()
    }

    pub fn session(&self) -> &StrokeSessionManager {
        &self.session
    }

    /// Direct access for undo, scale and brush selection from UI
    pub fn session_mut(&mut self) -> &mut StrokeSessionManager {
        &mut self.session
    }

    pub fn brush_size(&self) -> &BrushSizeAdjuster {
        &self.brush_size
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec3;

    use super::*;
    use crate::tracking::test_support::FakeTracking;

    fn system() -> DrawingSystem {
        DrawingSystem::new(&DrawingConfig::default())
    }

    /// Right hand pinching and moving along +z, one sample per frame
    fn draw_frames(system: &mut DrawingSystem, source: &mut FakeTracking, frames: u64, start_ms: u64) {
        for i in 0..frames {
            let z = (start_ms + i) as f32 * 0.01;
            source.set_hand(HandSide::Right, Vec3::new(0.0, 1.0, z), 1.0, start_ms + i * 16);
            system.update(source);
        }
    }

    #[test]
    fn test_nothing_before_ready() {
        let mut system = system();
        let mut source = FakeTracking::default();
        source.set_hand(HandSide::Right, Vec3::ZERO, 1.0, 0);
        system.update(&source);
        assert!(!system.is_ready());
        assert_eq!(system.session().active_count(), 0);

        source.ready = true;
        system.update(&source);
        assert!(system.is_ready());
        assert!(system.session().is_stroking(HandSide::Right));
    }

    #[test]
    fn test_pinch_draws_and_release_ends() {
        let mut system = system();
        let mut source = FakeTracking::ready();
        draw_frames(&mut system, &mut source, 3, 0);

        let stroke = system.session().active_stroke(HandSide::Right).map(|s| s.mesh().vertex_count());
        assert_eq!(stroke, Some(3 * 16));
        assert_eq!(
            system.session().active_stroke(HandSide::Right).map(|s| s.color()),
            Some([0.0, 0.0, 1.0, 1.0])
        );

        source.release(HandSide::Right);
        system.update(&source);
        assert!(!system.session().is_stroking(HandSide::Right));
        assert_eq!(system.session().undo_count(), 1);
    }

    #[test]
    fn test_untracked_hand_keeps_stroke() {
        let mut system = system();
        let mut source = FakeTracking::ready();
        draw_frames(&mut system, &mut source, 2, 0);

        source.hands.clear();
        system.update(&source);
        assert!(system.session().is_stroking(HandSide::Right));
    }

    #[test]
    fn test_painting_disabled_ends_strokes() {
        let mut system = system();
        let mut source = FakeTracking::ready();
        draw_frames(&mut system, &mut source, 2, 0);

        system.set_painting_allowed(false);
        system.update(&source);
        assert_eq!(system.session().active_count(), 0);
        assert_eq!(system.session().undo_count(), 1);

        // still pinching, but nothing new starts
        system.update(&source);
        assert_eq!(system.session().active_count(), 0);
    }

    #[test]
    fn test_adjusting_brush_blocks_drawing() {
        let mut system = system();
        let mut source = FakeTracking::ready();
        source.set_hand(HandSide::Left, Vec3::new(-0.02, 1.0, 0.0), 1.0, 0);
        source.set_hand(HandSide::Right, Vec3::new(0.02, 1.0, 0.0), 1.0, 0);
        system.update(&source);

        assert!(system.brush_size().is_adjusting());
        assert_eq!(system.session().active_count(), 0);
    }

    #[test]
    fn test_rings_use_adjusted_brush_radius() {
        let mut system = system();
        system.brush_size.set_size(0.04);

        let mut source = FakeTracking::ready();
        draw_frames(&mut system, &mut source, 2, 0);
        let mesh = system
            .session()
            .active_stroke(HandSide::Right)
            .map(|s| s.mesh().clone())
            .unwrap();
        for v in mesh.positions() {
            let offset = *v - Vec3::new(0.0, 1.0, v.z);
            assert!((offset.length() - 0.02).abs() < 1e-6);
        }
    }

    #[test]
    fn test_set_brush_color_applies_to_new_strokes() {
        let mut system = system();
        let green = [0.0, 1.0, 0.0, 1.0];
        system.set_brush_color(HandSide::Right, green);
        assert_eq!(system.brush_color(HandSide::Right), green);

        let mut source = FakeTracking::ready();
        draw_frames(&mut system, &mut source, 1, 0);
        assert_eq!(
            system.session().active_stroke(HandSide::Right).map(|s| s.color()),
            Some(green)
        );
    }

    #[test]
    fn test_swipe_undoes_last_stroke() {
        let mut system = system();
        let mut source = FakeTracking::ready();
        draw_frames(&mut system, &mut source, 2, 0);
        source.release(HandSide::Right);
        system.update(&source);
        assert_eq!(system.session().undo_count(), 1);

        // fast move along +x without pinching
        source.set_hand(HandSide::Right, Vec3::new(0.0, 1.0, 0.0), 0.0, 2000);
        system.update(&source);
        source.set_hand(HandSide::Right, Vec3::new(0.1, 1.0, 0.0), 0.0, 2020);
        system.update(&source);
        assert_eq!(system.session().undo_count(), 0);
    }
}
