use heightmesh_geom::Vec3;

use crate::constants::HALF_CELL;
use crate::direction::Direction;
use crate::face_list::FaceList;

/// Center of cell `(row, col)` in mesh space at height `z`.
#[inline]
pub(crate) fn cell_center(row: usize, col: usize, z: f32) -> Vec3 {
    Vec3::new(col as f32, row as f32, z)
}

/// Emits the flat unit quad of a cell at height `z`, facing `normal` (up for
/// the surface, down for the floor).
#[inline]
pub(crate) fn emit_cell_quad(fl: &mut FaceList, row: usize, col: usize, z: f32, normal: Vec3) {
    let (x, y) = (col as f32, row as f32);
    let nw = Vec3::new(x - HALF_CELL, y - HALF_CELL, z);
    let ne = Vec3::new(x + HALF_CELL, y - HALF_CELL, z);
    let se = Vec3::new(x + HALF_CELL, y + HALF_CELL, z);
    let sw = Vec3::new(x - HALF_CELL, y + HALF_CELL, z);
    fl.add_quad(nw, ne, se, sw, normal);
}

/// Emits the vertical quad on the `dir` edge of a cell, from `z_high` down to `z_low`.
#[inline]
pub(crate) fn emit_wall_quad(
    fl: &mut FaceList,
    row: usize,
    col: usize,
    dir: Direction,
    z_high: f32,
    z_low: f32,
) {
    let n = dir.normal();
    let edge = cell_center(row, col, 0.0) + n * HALF_CELL;
    let half = dir.tangent() * HALF_CELL;
    let left = edge - half;
    let right = edge + half;
    let tl = Vec3::new(left.x, left.y, z_high);
    let tr = Vec3::new(right.x, right.y, z_high);
    let br = Vec3::new(right.x, right.y, z_low);
    let bl = Vec3::new(left.x, left.y, z_low);
    fl.add_quad(tl, tr, br, bl, n);
}
