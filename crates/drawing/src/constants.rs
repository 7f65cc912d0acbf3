use glam::Vec3;

/// World up axis used to build the in-plane basis.
pub const WORLD_UP: Vec3 = Vec3::Y;

/// Fallback axis when the plane normal is (nearly) parallel to [`WORLD_UP`].
pub const WORLD_FORWARD: Vec3 = Vec3::Z;

/// Local axis a tracked orientation points along. Tube rings lie in the
/// plane perpendicular to it.
pub const DEVICE_FORWARD: Vec3 = Vec3::Z;

/// Squared length below which `cross(normal, WORLD_UP)` counts as degenerate.
pub const BASIS_PARALLEL_EPSILON: f32 = 0.001;

/// Relative tolerance of the sub-triangle area identity used by ear clipping.
pub const EAR_CONTAINMENT_TOLERANCE: f32 = 1e-3;

/// Cross products at or below this magnitude put a point on the hull baseline.
pub const COLLINEAR_EPSILON: f32 = 1e-9;

/// Minimum points for plane fitting, hulling and triangulation.
pub const MIN_POLYGON_POINTS: usize = 3;

/// Ratio of middle to largest covariance eigenvalue below which the input
/// is treated as collinear.
pub const COLLINEAR_EIGEN_RATIO: f64 = 1e-9;

/// Upper bound on cyclic Jacobi sweeps for the 3x3 eigen solve.
pub const JACOBI_MAX_SWEEPS: usize = 32;

/// Floor for the stroke container scale when set directly.
pub const MIN_CONTAINER_SCALE: f32 = 1e-3;
