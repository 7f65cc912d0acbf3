//! Geometry kernel
//!
//! Pure functions shared by both brush strategies:
//! - [`plane`] - best-fit plane by PCA
//! - [`projection`] - 3D to 2D projection through an in-plane basis and back
//! - [`ordering`] - hull and angular ordering of projected points
//! - [`triangulate`] - ear clipping

pub mod ordering;
pub mod plane;
pub mod projection;
pub mod triangulate;

pub use ordering::{OrderingStrategy, angular_order, ensure_counter_clockwise, hull_order};
pub use plane::{Plane, PlaneFit, best_fit_plane};
pub use projection::{PlaneBasis, project_to_plane, reproject};
pub use triangulate::{triangles_area, triangulate};
