//! Flat per-cell quads: the elevated surface and the floor beneath it.

use heightmesh_geom::Vec3;
use heightmesh_grid::HeightGrid;

use crate::constants::FLOOR_Z;
use crate::emit::emit_cell_quad;
use crate::face_list::{FaceList, FaceOrigin};

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum TileMode {
    /// Quads at each cell's height, facing up.
    Surface,
    /// Quads at `z = 0`, facing down.
    Floor,
}

impl TileMode {
    #[inline]
    pub fn origin(self) -> FaceOrigin {
        match self {
            TileMode::Surface => FaceOrigin::Tile,
            TileMode::Floor => FaceOrigin::Floor,
        }
    }

    #[inline]
    fn normal(self) -> Vec3 {
        match self {
            TileMode::Surface => Vec3::UP,
            TileMode::Floor => -Vec3::UP,
        }
    }
}

/// Emits one row of tiles. Cell `(row, col)` gets triangles `2*(col + row*cols)` and `+1`
/// once rows are concatenated in order.
pub fn tile_faces_row(grid: &HeightGrid, row: usize, mode: TileMode, out: &mut FaceList) {
    let normal = mode.normal();
    for (col, &h) in grid.row(row).iter().enumerate() {
        let z = match mode {
            TileMode::Surface => h,
            TileMode::Floor => FLOOR_Z,
        };
        emit_cell_quad(out, row, col, z, normal);
    }
}

/// Two triangles per cell, row-major with the column varying fastest.
pub fn tile_faces(grid: &HeightGrid, mode: TileMode) -> FaceList {
    let mut out = FaceList::with_quad_capacity(mode.origin(), grid.cell_count());
    for row in 0..grid.rows() {
        tile_faces_row(grid, row, mode, &mut out);
    }
    out
}

/// Closes the mesh from below at `z = 0`.
#[inline]
pub fn floor_faces(grid: &HeightGrid) -> FaceList {
    tile_faces(grid, TileMode::Floor)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn winding(t: [Vec3; 3]) -> Vec3 {
        (t[1] - t[0]).cross(t[2] - t[0])
    }

    #[test]
    fn two_triangles_per_cell() {
        let g = HeightGrid::filled(3, 5, 1.0).unwrap();
        assert_eq!(tile_faces(&g, TileMode::Surface).triangle_count(), 30);
        assert_eq!(floor_faces(&g).triangle_count(), 30);
        assert_eq!(floor_faces(&g).origin, FaceOrigin::Floor);
    }

    #[test]
    fn cell_triangles_sit_at_documented_index() {
        let g = HeightGrid::from_fn(3, 4, |r, c| (r * 10 + c) as f32).unwrap();
        let tiles = tile_faces(&g, TileMode::Surface);
        let tris: Vec<_> = tiles.triangles().collect();
        for (row, col, h) in g.iter_cells() {
            let base = 2 * (col + row * g.cols());
            for t in &tris[base..base + 2] {
                for v in t {
                    assert_eq!(v.z, h);
                    assert!((v.x - col as f32).abs() == 0.5);
                    assert!((v.y - row as f32).abs() == 0.5);
                }
            }
        }
    }

    #[test]
    fn surface_faces_up_floor_faces_down() {
        let g = HeightGrid::from_rows(&[vec![2.0, -1.0]]).unwrap();
        for t in tile_faces(&g, TileMode::Surface).triangles() {
            let n = winding(t);
            assert!(n.z > 0.0 && n.x == 0.0 && n.y == 0.0);
        }
        for t in floor_faces(&g).triangles() {
            assert!(winding(t).z < 0.0);
            assert!(t.iter().all(|v| v.z == 0.0));
        }
    }
}
