use thiserror::Error;

/// Failures of the geometry kernel.
///
/// None of these are fatal: builders keep their previous mesh and log.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeometryError {
    #[error("Need at least {needed} points, got {got}")]
    InsufficientPoints { needed: usize, got: usize },
    #[error("Points are collinear, plane normal is undefined")]
    Collinear,
    #[error("Points do not span a hull")]
    NoHull,
    #[error("No ear found with {remaining} polygon vertices left")]
    NoEar { remaining: usize },
    #[error("Plane normal is zero or non-finite")]
    DegenerateBasis,
}
