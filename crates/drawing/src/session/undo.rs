//! Stroke history and undo

use tracing::debug;

use crate::mesh::MeshBuffer;
use crate::types::{BrushKind, HandSide, Rgba, StrokeId};

use super::StrokeSessionManager;

/// A stroke that no longer receives points; kept for rendering and undo
#[derive(Debug, Clone)]
pub struct FinishedStroke {
    pub id: StrokeId,
    pub hand: HandSide,
    pub kind: BrushKind,
    pub color: Rgba,
    pub mesh: MeshBuffer,
}

impl StrokeSessionManager {
    /// Check if undo is available
    pub fn can_undo(&self) -> bool {
        !self.history.is_empty()
    }

    pub fn undo_count(&self) -> usize {
        self.history.len()
    }

    /// Finished strokes, oldest first
    pub fn history(&self) -> &[FinishedStroke] {
        &self.history
    }

    /// Remove the most recently finished stroke.
    ///
    /// Active strokes are never touched. Returns the removed stroke's id, or
    /// `None` when the history is empty.
    pub fn undo(&mut self) -> Option<StrokeId> {
        let Some(stroke) = self.history.pop() else {
            debug!("Undo: no finished strokes");
            return None;
        };

        debug!(
            "Undoing {} ({} triangles, {} left)",
            stroke.id,
            stroke.mesh.triangle_count(),
            self.history.len()
        );
        Some(stroke.id)
    }
}
