//! Stroke session manager
//!
//! Owns everything drawn in a session:
//! - at most one active stroke per hand (tube or planar patch)
//! - the history of finished strokes, undone in LIFO order
//! - the uniform scale of the container all strokes live in
//!
//! Incoming points are in world space; meshes are kept in container space,
//! so rescaling the container rescales every stroke at once.

mod stroke;
mod undo;

use std::collections::HashMap;

use glam::{Affine3A, Vec3};
use tracing::{debug, warn};

use airdraw_config::{DrawingConfig, PatchConfig, TubeConfig};

use crate::constants::MIN_CONTAINER_SCALE;
use crate::mesh::MeshBuffer;
use crate::tracking::BrushRadius;
use crate::types::{BrushKind, HandSide, Rgba, StrokeId};

pub use stroke::ActiveStroke;
pub use undo::FinishedStroke;

/// Borrowed view of one stroke for the renderer
#[derive(Debug, Clone, Copy)]
pub struct StrokeView<'a> {
    pub id: StrokeId,
    pub hand: HandSide,
    pub kind: BrushKind,
    pub color: Rgba,
    pub mesh: &'a MeshBuffer,
    /// Still receiving points
    pub active: bool,
}

/// Per-hand stroke bookkeeping plus undo history
pub struct StrokeSessionManager {
    /// In-progress stroke per hand
    pub(crate) active: HashMap<HandSide, ActiveStroke>,
    /// Finished strokes, oldest first
    pub(crate) history: Vec<FinishedStroke>,
    pub(crate) next_id: u64,
    /// Brush used by strokes started from now on
    pub(crate) brush: BrushKind,
    /// Read on every tube ring
    pub(crate) radius: BrushRadius,
    pub(crate) tube: TubeConfig,
    pub(crate) patch: PatchConfig,
    /// Uniform scale of the stroke container
    pub(crate) scale: f32,
    pub(crate) scale_step: f32,
}

impl StrokeSessionManager {
    pub fn new(config: &DrawingConfig, radius: BrushRadius) -> Self {
        Self {
            active: HashMap::new(),
            history: Vec::new(),
            next_id: 0,
            brush: BrushKind::default(),
            radius,
            tube: config.tube.clone(),
            patch: config.patch.clone(),
            scale: config.scale.initial.max(MIN_CONTAINER_SCALE),
            scale_step: config.scale.step,
        }
    }

    /// Select the brush for strokes started after this call
    pub fn set_brush(&mut self, brush: BrushKind) {
        self.brush = brush;
    }

    pub fn brush(&self) -> BrushKind {
        self.brush
    }

    /// Handle to the radius read by tube strokes
    pub fn radius(&self) -> &BrushRadius {
        &self.radius
    }

    /// Set the container scale; values below a small positive floor are raised to it
    pub fn set_scale(&mut self, factor: f32) {
        if !factor.is_finite() {
            warn!("Ignoring non-finite container scale {}", factor);
            return;
        }
        self.scale = factor.max(MIN_CONTAINER_SCALE);
        debug!("Container scale set to {:.3}", self.scale);
    }

    pub fn increase_scale(&mut self) {
        self.scale += self.scale_step;
        debug!("Container scale increased to {:.3}", self.scale);
    }

    /// Step the scale down, never below one step
    pub fn decrease_scale(&mut self) {
        self.scale = (self.scale - self.scale_step).max(self.scale_step);
        debug!("Container scale decreased to {:.3}", self.scale);
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    /// Container-to-world transform applied to every stroke mesh
    pub fn container_transform(&self) -> Affine3A {
        Affine3A::from_scale(Vec3::splat(self.scale))
    }

    /// World-to-container transform used for incoming points
    pub fn world_to_local(&self) -> Affine3A {
        self.container_transform().inverse()
    }

    /// All strokes in creation order, finished and active
    pub fn strokes(&self) -> Vec<StrokeView<'_>> {
        let mut views: Vec<StrokeView<'_>> = self
            .history
            .iter()
            .map(|stroke| StrokeView {
                id: stroke.id,
                hand: stroke.hand,
                kind: stroke.kind,
                color: stroke.color,
                mesh: &stroke.mesh,
                active: false,
            })
            .chain(self.active.iter().map(|(hand, stroke)| StrokeView {
                id: stroke.id(),
                hand: *hand,
                kind: stroke.kind(),
                color: stroke.color(),
                mesh: stroke.mesh(),
                active: true,
            }))
            .collect();
        views.sort_by_key(|view| view.id);
        views
    }

    pub(crate) fn allocate_id(&mut self) -> StrokeId {
        let id = StrokeId(self.next_id);
        self.next_id += 1;
        id
    }
}
