//! Heightmap meshing: flat top tiles, step walls and a floor, assembled into
//! one closed triangle soup.
//!
//! Mesh space uses `x = column`, `y = row`, `z = height`; each cell is a unit
//! square centered on its integer coordinates. Every emitted triangle winds
//! counter-clockwise seen from outside the solid.
#![forbid(unsafe_code)]

pub mod assemble;
pub mod build;
pub mod constants;
pub mod direction;
mod emit;
pub mod face_list;
pub mod tile;
pub mod wall;

pub use assemble::{AssembleError, FaceSpan, IndexedMesh, Mesh, Triangle, combine};
pub use build::{BuildError, GeneratedFaces, MeshReport, PipelineConfig, build_mesh, generate_faces};
pub use direction::{Direction, Neighbor};
pub use face_list::{FaceList, FaceOrigin};
pub use tile::{TileMode, floor_faces, tile_faces};
pub use wall::{wall_directions, wall_faces, wall_faces_for_cell};

pub use heightmesh_grid::HeightGrid;
