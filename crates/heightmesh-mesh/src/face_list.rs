use heightmesh_geom::Vec3;

use crate::constants::{TRIS_PER_QUAD, VERTS_PER_TRI};

/// Which generator produced a face list.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum FaceOrigin {
    Tile,
    Wall,
    Floor,
}

/// An ordered triangle soup from one generator.
///
/// Vertices are stored flat, three per triangle, with no sharing.
#[derive(Clone, Debug)]
pub struct FaceList {
    pub origin: FaceOrigin,
    pub pos: Vec<Vec3>,
}

impl FaceList {
    pub fn new(origin: FaceOrigin) -> Self {
        Self {
            origin,
            pos: Vec::new(),
        }
    }

    /// Empty list with room for `n_quads` quads.
    pub fn with_quad_capacity(origin: FaceOrigin, n_quads: usize) -> Self {
        let mut fl = Self::new(origin);
        fl.reserve_quads(n_quads);
        fl
    }

    #[inline]
    pub fn reserve_quads(&mut self, n_quads: usize) {
        self.pos.reserve(n_quads * TRIS_PER_QUAD * VERTS_PER_TRI);
    }

    /// Number of complete triangles held.
    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.pos.len() / VERTS_PER_TRI
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pos.is_empty()
    }

    /// True when the vertex buffer splits evenly into triangles.
    #[inline]
    pub fn is_well_formed(&self) -> bool {
        self.pos.len() % VERTS_PER_TRI == 0
    }

    /// Appends a quad as two triangles over `{tl, tr, bl}` and `{tr, bl, br}`.
    ///
    /// Corners are named as seen from the side `n` points to. The vertex order
    /// within each triangle is chosen so its winding normal agrees with `n`,
    /// which keeps quads with inverted corners (e.g. walls below the floor)
    /// facing outward too.
    pub fn add_quad(&mut self, tl: Vec3, tr: Vec3, br: Vec3, bl: Vec3, n: Vec3) {
        let cross = (bl - tl).cross(tr - tl);
        if cross.dot(n) < 0.0 {
            self.pos.extend_from_slice(&[tl, tr, bl, tr, br, bl]);
        } else {
            self.pos.extend_from_slice(&[tl, bl, tr, tr, bl, br]);
        }
    }

    /// Appends all triangles of `other`, keeping this list's origin.
    pub fn append(&mut self, other: &mut FaceList) {
        self.pos.append(&mut other.pos);
    }

    pub fn positions(&self) -> &[Vec3] {
        &self.pos
    }

    pub fn triangles(&self) -> impl Iterator<Item = [Vec3; 3]> + '_ {
        self.pos.chunks_exact(VERTS_PER_TRI).map(|t| [t[0], t[1], t[2]])
    }
}
