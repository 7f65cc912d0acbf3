//! Airdraw drawing core - turning tracked hand paths into meshes
//!
//! This crate provides the stroke-to-mesh pipeline:
//! - [`geometry`] - Plane fitting, projection, polygon ordering, ear clipping
//! - [`mesh`] - Mesh buffer handed to the renderer
//! - [`tube`] - Tube strokes extruded ring by ring
//! - [`patch`] - Flat patches rebuilt from every point of a stroke
//! - [`session`] - Active strokes per hand, undo history, container scale
//! - [`tracking`] - Contracts with the hand-tracking runtime
//! - [`brush_size`] - Two-handed brush size gesture
//! - [`swipe`] - Swipe-to-undo gesture
//! - [`system`] - Per-frame driver tying it all together
//!
//! Nothing here depends on a particular engine; the optional `bevy` feature
//! only adds mesh conversion.

pub mod brush_size;
pub mod constants;
pub mod error;
pub mod geometry;
pub mod mesh;
pub mod patch;
pub mod session;
pub mod swipe;
pub mod system;
pub mod tracking;
pub mod tube;
pub mod types;

pub use brush_size::*;
pub use constants::*;
pub use error::*;
pub use geometry::*;
pub use mesh::*;
pub use patch::*;
pub use session::*;
pub use swipe::*;
pub use system::*;
pub use tracking::*;
pub use tube::*;
pub use types::*;
