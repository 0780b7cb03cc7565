//! Shared constants for heightmesh-mesh.

/// Distance from a cell center to its edges, in grid units.
pub(crate) const HALF_CELL: f32 = 0.5;
/// Height of the floor plane and of boundary wall feet.
pub const FLOOR_Z: f32 = 0.0;

pub(crate) const TRIS_PER_QUAD: usize = 2;
pub(crate) const VERTS_PER_TRI: usize = 3;
/// Upper bound on wall quads a single cell can emit (one per direction).
pub(crate) const MAX_WALL_QUADS_PER_CELL: usize = 4;
