//! Per-hand stroke lifecycle

use glam::{Affine3A, Quat, Vec3};
use tracing::debug;

use crate::geometry::OrderingStrategy;
use crate::mesh::MeshBuffer;
use crate::patch::PlanarPatchBuilder;
use crate::tube::TubeStrokeBuilder;
use crate::types::{BrushKind, HandSide, Rgba, StrokeId};

use super::{FinishedStroke, StrokeSessionManager};

#[derive(Debug, Clone)]
enum StrokeBuilder {
    Tube(TubeStrokeBuilder),
    Patch(PlanarPatchBuilder),
}

/// A stroke still receiving points on one hand
#[derive(Debug, Clone)]
pub struct ActiveStroke {
    id: StrokeId,
    builder: StrokeBuilder,
}

impl ActiveStroke {
    pub fn id(&self) -> StrokeId {
        self.id
    }

    pub fn kind(&self) -> BrushKind {
        match &self.builder {
            StrokeBuilder::Tube(_) => BrushKind::Tube,
            StrokeBuilder::Patch(patch) => match patch.strategy() {
                OrderingStrategy::Hull => BrushKind::HullPatch,
                OrderingStrategy::Angular => BrushKind::AngularPatch,
            },
        }
    }

    pub fn color(&self) -> Rgba {
        match &self.builder {
            StrokeBuilder::Tube(tube) => tube.color(),
            StrokeBuilder::Patch(patch) => patch.color(),
        }
    }

    pub fn mesh(&self) -> &MeshBuffer {
        match &self.builder {
            StrokeBuilder::Tube(tube) => tube.mesh(),
            StrokeBuilder::Patch(patch) => patch.mesh(),
        }
    }

    fn append(&mut self, point: Vec3, orientation: Quat, radius: f32, world_to_local: &Affine3A) -> bool {
        match &mut self.builder {
            StrokeBuilder::Tube(tube) => tube.append_point(point, orientation, radius, world_to_local),
            StrokeBuilder::Patch(patch) => patch.add_point(point, world_to_local),
        }
    }

    fn finish(self, hand: HandSide) -> FinishedStroke {
        let kind = self.kind();
        let color = self.color();
        let mesh = match self.builder {
            StrokeBuilder::Tube(tube) => tube.finish(),
            StrokeBuilder::Patch(mut patch) => {
                patch.end();
                patch.into_mesh()
            }
        };
        FinishedStroke {
            id: self.id,
            hand,
            kind,
            color,
            mesh,
        }
    }
}

impl StrokeSessionManager {
    /// Feed a world-space point for `hand`.
    ///
    /// Starts a stroke with the current brush if the hand has none, otherwise
    /// appends to it (subject to the brush's spacing threshold). `color` is
    /// only used when a stroke starts. Returns the id of the stroke touched.
    pub fn add_point(&mut self, hand: HandSide, point: Vec3, color: Rgba, orientation: Quat) -> StrokeId {
        let radius = self.radius.get();
        self.add_point_with_radius(hand, point, color, orientation, radius)
    }

    /// [`add_point`](Self::add_point) with the tube radius supplied by the caller
    pub fn add_point_with_radius(
        &mut self,
        hand: HandSide,
        point: Vec3,
        color: Rgba,
        orientation: Quat,
        radius: f32,
    ) -> StrokeId {
        let world_to_local = self.world_to_local();

        if let Some(stroke) = self.active.get_mut(&hand) {
            stroke.append(point, orientation, radius, &world_to_local);
            return stroke.id();
        }

        let id = self.allocate_id();
        let builder = match self.brush.ordering() {
            None => StrokeBuilder::Tube(TubeStrokeBuilder::start(
                &self.tube,
                point,
                color,
                orientation,
                radius,
                &world_to_local,
            )),
            Some(strategy) => {
                let mut patch = PlanarPatchBuilder::new(&self.patch, strategy);
                patch.begin(point, color, orientation, &world_to_local);
                StrokeBuilder::Patch(patch)
            }
        };
        debug!("Started {} ({:?}) on {:?} hand", id, self.brush, hand);
        self.active.insert(hand, ActiveStroke { id, builder });
        id
    }

    /// Finish the active stroke of `hand`, if any. Geometry is kept.
    pub fn end_stroke(&mut self, hand: HandSide) -> Option<StrokeId> {
        let stroke = self.active.remove(&hand)?;
        let finished = stroke.finish(hand);
        let id = finished.id;
        debug!(
            "Finished {} on {:?} hand: {} vertices, {} triangles",
            id,
            hand,
            finished.mesh.vertex_count(),
            finished.mesh.triangle_count()
        );
        self.history.push(finished);
        Some(id)
    }

    /// Finish every active stroke, oldest first
    pub fn end_all(&mut self) {
        let mut hands: Vec<(StrokeId, HandSide)> =
            self.active.iter().map(|(hand, stroke)| (stroke.id, *hand)).collect();
        hands.sort_unstable();
        for (_, hand) in hands {
            self.end_stroke(hand);
        }
    }

    pub fn is_stroking(&self, hand: HandSide) -> bool {
        self.active.contains_key(&hand)
    }

    pub fn active_stroke(&self, hand: HandSide) -> Option<&ActiveStroke> {
        self.active.get(&hand)
    }

    pub fn active_count(&self) -> usize {
        self.active.len()
    }
}

#[cfg(test)]
mod tests {
    use airdraw_config::DrawingConfig;

    use super::*;
    use crate::tracking::BrushRadius;

    const RED: Rgba = [1.0, 0.0, 0.0, 1.0];
    const BLUE: Rgba = [0.0, 0.0, 1.0, 1.0];

    fn manager() -> StrokeSessionManager {
        StrokeSessionManager::new(&DrawingConfig::default(), BrushRadius::default())
    }

    fn draw_line(session: &mut StrokeSessionManager, hand: HandSide, from: Vec3, samples: usize) -> StrokeId {
        let mut id = StrokeId(u64::MAX);
        for i in 0..samples {
            let p = from + Vec3::new(0.0, 0.0, i as f32 * 0.02);
            id = session.add_point(hand, p, RED, Quat::IDENTITY);
        }
        id
    }

    #[test]
    fn test_one_active_stroke_per_hand() {
        let mut session = manager();
        let left = draw_line(&mut session, HandSide::Left, Vec3::ZERO, 3);
        let right = draw_line(&mut session, HandSide::Right, Vec3::X, 2);

        assert_ne!(left, right);
        assert_eq!(session.active_count(), 2);
        assert_eq!(session.active_stroke(HandSide::Left).map(|s| s.id()), Some(left));

        let tube = session.active_stroke(HandSide::Left).map(|s| s.mesh().vertex_count());
        assert_eq!(tube, Some(3 * 16));
    }

    #[test]
    fn test_color_fixed_at_start() {
        let mut session = manager();
        session.add_point(HandSide::Left, Vec3::ZERO, RED, Quat::IDENTITY);
        session.add_point(HandSide::Left, Vec3::new(0.0, 0.0, 0.1), BLUE, Quat::IDENTITY);
        assert_eq!(session.active_stroke(HandSide::Left).map(|s| s.color()), Some(RED));
    }

    #[test]
    fn test_end_stroke_is_idempotent() {
        let mut session = manager();
        let id = draw_line(&mut session, HandSide::Right, Vec3::ZERO, 2);

        assert_eq!(session.end_stroke(HandSide::Right), Some(id));
        assert_eq!(session.end_stroke(HandSide::Right), None);
        assert_eq!(session.end_stroke(HandSide::Left), None);
        assert!(!session.is_stroking(HandSide::Right));
        assert_eq!(session.undo_count(), 1);
        assert_eq!(session.history()[0].mesh.triangle_count(), 32);
    }

    #[test]
    fn test_next_point_after_end_starts_new_stroke() {
        let mut session = manager();
        let first = draw_line(&mut session, HandSide::Left, Vec3::ZERO, 2);
        session.end_stroke(HandSide::Left);
        let second = draw_line(&mut session, HandSide::Left, Vec3::ZERO, 2);
        assert_ne!(first, second);
    }

    #[test]
    fn test_end_all_oldest_first() {
        let mut session = manager();
        let right = draw_line(&mut session, HandSide::Right, Vec3::ZERO, 2);
        let left = draw_line(&mut session, HandSide::Left, Vec3::X, 2);
        session.end_all();

        assert_eq!(session.active_count(), 0);
        let ids: Vec<StrokeId> = session.history().iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![right, left]);
    }

    #[test]
    fn test_brush_kind_kept_until_stroke_ends() {
        let mut session = manager();
        session.add_point(HandSide::Left, Vec3::ZERO, RED, Quat::IDENTITY);
        session.set_brush(BrushKind::HullPatch);
        session.add_point(HandSide::Left, Vec3::new(0.0, 0.0, 0.1), RED, Quat::IDENTITY);
        assert_eq!(session.active_stroke(HandSide::Left).map(|s| s.kind()), Some(BrushKind::Tube));

        session.end_stroke(HandSide::Left);
        session.add_point(HandSide::Left, Vec3::ZERO, RED, Quat::IDENTITY);
        assert_eq!(
            session.active_stroke(HandSide::Left).map(|s| s.kind()),
            Some(BrushKind::HullPatch)
        );
    }

    #[test]
    fn test_patch_stroke_through_session() {
        let mut session = manager();
        session.set_brush(BrushKind::HullPatch);
        for p in [
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(0.1, 0.0, 0.0),
            Vec3::new(0.1, 0.1, 0.0),
            Vec3::new(0.0, 0.1, 0.0),
        ] {
            session.add_point(HandSide::Right, p, BLUE, Quat::IDENTITY);
        }
        session.end_stroke(HandSide::Right);

        let finished = &session.history()[0];
        assert_eq!(finished.kind, BrushKind::HullPatch);
        assert_eq!(finished.color, BLUE);
        assert_eq!(finished.mesh.triangle_count(), 2);
    }

    #[test]
    fn test_radius_read_per_ring() {
        let mut session = manager();
        session.add_point(HandSide::Left, Vec3::ZERO, RED, Quat::IDENTITY);
        session.radius().set(0.05);
        session.add_point(HandSide::Left, Vec3::new(0.0, 0.0, 0.1), RED, Quat::IDENTITY);

        let mesh = session.active_stroke(HandSide::Left).map(|s| s.mesh().clone()).unwrap();
        assert!((mesh.positions()[0].truncate().length() - 0.005).abs() < 1e-6);
        assert!((mesh.positions()[16].truncate().length() - 0.05).abs() < 1e-6);
    }

    #[test]
    fn test_points_stored_in_container_space() {
        let mut session = manager();
        session.set_scale(2.0);
        session.add_point(HandSide::Left, Vec3::new(4.0, 0.0, 0.0), RED, Quat::IDENTITY);

        let mesh = session.active_stroke(HandSide::Left).map(|s| s.mesh().clone()).unwrap();
        let centroid = mesh.positions().iter().copied().sum::<Vec3>() / mesh.vertex_count() as f32;
        assert!((centroid.x - 2.0).abs() < 1e-5);
    }

    #[test]
    fn test_strokes_view_in_creation_order() {
        let mut session = manager();
        let a = draw_line(&mut session, HandSide::Left, Vec3::ZERO, 2);
        session.end_stroke(HandSide::Left);
        let b = draw_line(&mut session, HandSide::Right, Vec3::X, 2);

        let views = session.strokes();
        assert_eq!(views.len(), 2);
        assert_eq!((views[0].id, views[0].active), (a, false));
        assert_eq!((views[1].id, views[1].active), (b, true));
    }
}
