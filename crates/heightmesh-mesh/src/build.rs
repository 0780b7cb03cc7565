//! End-to-end conversion: preprocess a grid, generate faces, assemble the mesh.

use heightmesh_grid::{GridWarning, HeightGrid, PreprocessConfig, StageError, preprocess};
use log::{debug, info};
use rayon::prelude::*;
use serde::Deserialize;
use thiserror::Error;

use crate::assemble::{AssembleError, Mesh, combine};
use crate::face_list::{FaceList, FaceOrigin};
use crate::tile::{TileMode, tile_faces, tile_faces_row};
use crate::wall::{wall_faces, wall_faces_row};

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct PipelineConfig {
    #[serde(default)]
    pub preprocess: PreprocessConfig,
    /// Generate faces row-parallel. Output order matches the sequential scan.
    #[serde(default)]
    pub parallel: bool,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum BuildError {
    #[error(transparent)]
    Preprocess(#[from] StageError),

    #[error(transparent)]
    Assemble(#[from] AssembleError),
}

/// Result of [`build_mesh`].
#[derive(Clone, Debug)]
pub struct MeshReport {
    pub mesh: Mesh,
    /// Dimensions of the grid the faces were generated from.
    pub rows: usize,
    pub cols: usize,
    pub warnings: Vec<GridWarning>,
}

/// The three face lists of a processed grid.
#[derive(Clone, Debug)]
pub struct GeneratedFaces {
    pub tiles: FaceList,
    pub walls: FaceList,
    pub floor: FaceList,
}

impl GeneratedFaces {
    /// Assembly order: tiles, walls, floor.
    pub fn into_lists(self) -> [FaceList; 3] {
        [self.tiles, self.walls, self.floor]
    }
}

/// Runs the three generators over an already processed grid.
pub fn generate_faces(grid: &HeightGrid, parallel: bool) -> GeneratedFaces {
    let faces = if parallel {
        GeneratedFaces {
            tiles: by_rows(grid, FaceOrigin::Tile, |g, r, out| {
                tile_faces_row(g, r, TileMode::Surface, out)
            }),
            walls: by_rows(grid, FaceOrigin::Wall, wall_faces_row),
            floor: by_rows(grid, FaceOrigin::Floor, |g, r, out| {
                tile_faces_row(g, r, TileMode::Floor, out)
            }),
        }
    } else {
        GeneratedFaces {
            tiles: tile_faces(grid, TileMode::Surface),
            walls: wall_faces(grid),
            floor: tile_faces(grid, TileMode::Floor),
        }
    };
    debug!(
        "generated {}x{}: tiles={} walls={} floor={} (parallel={})",
        grid.rows(),
        grid.cols(),
        faces.tiles.triangle_count(),
        faces.walls.triangle_count(),
        faces.floor.triangle_count(),
        parallel
    );
    faces
}

// Rows are generated independently and stitched back in row order.
fn by_rows(
    grid: &HeightGrid,
    origin: FaceOrigin,
    emit_row: impl Fn(&HeightGrid, usize, &mut FaceList) + Sync,
) -> FaceList {
    let mut rows: Vec<FaceList> = (0..grid.rows())
        .into_par_iter()
        .map(|r| {
            let mut fl = FaceList::with_quad_capacity(origin, grid.cols());
            emit_row(grid, r, &mut fl);
            fl
        })
        .collect();
    let total: usize = rows.iter().map(|fl| fl.pos.len()).sum();
    let mut out = FaceList::new(origin);
    out.pos.reserve_exact(total);
    for fl in rows.iter_mut() {
        out.append(fl);
    }
    out
}

/// Converts a raw grid into a closed mesh. Any stage failure aborts the call
/// without a partial mesh.
pub fn build_mesh(grid: &HeightGrid, cfg: &PipelineConfig) -> Result<MeshReport, BuildError> {
    let processed = preprocess(grid, &cfg.preprocess)?;
    let faces = generate_faces(&processed.grid, cfg.parallel);
    let mesh = combine(faces.into_lists())?;
    info!(
        "built mesh from {}x{} grid ({}x{} after preprocessing): {} triangles",
        grid.rows(),
        grid.cols(),
        processed.grid.rows(),
        processed.grid.cols(),
        mesh.triangle_count()
    );
    Ok(MeshReport {
        mesh,
        rows: processed.grid.rows(),
        cols: processed.grid.cols(),
        warnings: processed.warnings,
    })
}
