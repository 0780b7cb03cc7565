//! Vertical faces closing height steps between cells and at the grid edge.

use heightmesh_grid::HeightGrid;

use crate::constants::MAX_WALL_QUADS_PER_CELL;
use crate::direction::{Direction, Neighbor};
use crate::emit::emit_wall_quad;
use crate::face_list::{FaceList, FaceOrigin};

/// Which of the four sides of `(row, col)` get a wall, indexed by [`Direction::index`].
pub fn wall_directions(grid: &HeightGrid, row: usize, col: usize) -> [bool; 4] {
    let h = grid.get(row, col);
    Direction::ALL.map(|dir| Neighbor::of(grid, row, col, dir).needs_wall(h))
}

/// Emits the walls of a single cell in North, East, South, West order.
///
/// Each wall sits on the shared edge, spans the cell's width along it, and
/// drops from the cell height to the neighbor height (or to the floor at the
/// grid boundary). Walls face the lower side.
pub fn wall_faces_for_cell(grid: &HeightGrid, row: usize, col: usize, out: &mut FaceList) {
    let h = grid.get(row, col);
    for dir in Direction::ALL {
        let nb = Neighbor::of(grid, row, col, dir);
        if nb.needs_wall(h) {
            emit_wall_quad(out, row, col, dir, h, nb.base_z());
        }
    }
}

pub fn wall_faces_row(grid: &HeightGrid, row: usize, out: &mut FaceList) {
    for col in 0..grid.cols() {
        wall_faces_for_cell(grid, row, col, out);
    }
}

/// All walls of the grid, row-major by cell.
pub fn wall_faces(grid: &HeightGrid) -> FaceList {
    // Sized for the perimeter plus a quarter of the worst case; grows if needed.
    let perimeter = 2 * (grid.rows() + grid.cols());
    let mut out = FaceList::with_quad_capacity(
        FaceOrigin::Wall,
        perimeter + grid.cell_count() * MAX_WALL_QUADS_PER_CELL / 4,
    );
    for row in 0..grid.rows() {
        wall_faces_row(grid, row, &mut out);
    }
    out
}
