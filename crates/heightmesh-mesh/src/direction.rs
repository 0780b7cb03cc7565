use heightmesh_geom::Vec3;
use heightmesh_grid::HeightGrid;

use crate::constants::FLOOR_Z;

/// Cardinal direction on the grid. North is toward row 0, west toward column 0.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Direction {
    North = 0,
    East = 1,
    South = 2,
    West = 3,
}

impl Direction {
    /// Fixed evaluation order used by the wall generator.
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];

    /// Returns the `[0..4)` index of this direction.
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Converts an index `[0..4)` back into a direction.
    #[inline]
    pub fn from_index(i: usize) -> Option<Direction> {
        Direction::ALL.get(i).copied()
    }

    /// Grid step `(drow, dcol)` toward the neighbor.
    #[inline]
    pub fn delta(self) -> (isize, isize) {
        match self {
            Direction::North => (-1, 0),
            Direction::East => (0, 1),
            Direction::South => (1, 0),
            Direction::West => (0, -1),
        }
    }

    /// Unit outward normal of a wall facing this way.
    #[inline]
    pub fn normal(self) -> Vec3 {
        let (dr, dc) = self.delta();
        Vec3::new(dc as f32, dr as f32, 0.0)
    }

    /// Horizontal axis running left to right for a viewer outside the wall.
    #[inline]
    pub fn tangent(self) -> Vec3 {
        (-self.normal()).cross(Vec3::UP)
    }

    #[inline]
    pub fn opposite(self) -> Direction {
        match self {
            Direction::North => Direction::South,
            Direction::East => Direction::West,
            Direction::South => Direction::North,
            Direction::West => Direction::East,
        }
    }
}

/// What lies across a cell edge.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Neighbor {
    Interior(f32),
    /// Off the grid; behaves as ground level and always gets a wall.
    Boundary,
}

impl Neighbor {
    /// Looks up the cell adjacent to `(row, col)` in `dir`.
    #[inline]
    pub fn of(grid: &HeightGrid, row: usize, col: usize, dir: Direction) -> Neighbor {
        let (dr, dc) = dir.delta();
        let cell = row
            .checked_add_signed(dr)
            .zip(col.checked_add_signed(dc))
            .and_then(|(r, c)| grid.height(r, c));
        match cell {
            Some(h) => Neighbor::Interior(h),
            None => Neighbor::Boundary,
        }
    }

    /// Height the wall descends to.
    #[inline]
    pub fn base_z(self) -> f32 {
        match self {
            Neighbor::Interior(h) => h,
            Neighbor::Boundary => FLOOR_Z,
        }
    }

    /// A wall is needed toward the boundary or toward a strictly lower cell.
    #[inline]
    pub fn needs_wall(self, height: f32) -> bool {
        match self {
            Neighbor::Interior(h) => height > h,
            Neighbor::Boundary => true,
        }
    }
}
