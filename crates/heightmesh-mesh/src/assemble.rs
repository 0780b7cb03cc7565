//! Concatenation of face lists into a single owned mesh.

use std::ops::Range;

use hashbrown::HashMap;
use heightmesh_geom::{Aabb, Vec3};
use log::debug;
use thiserror::Error;

use crate::constants::VERTS_PER_TRI;
use crate::face_list::{FaceList, FaceOrigin};

/// Three vertices in emission order.
pub type Triangle = [Vec3; 3];

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AssembleError {
    #[error("face list {index} ({origin:?}) holds {len} vertices, not a whole number of triangles")]
    MalformedFaceList {
        index: usize,
        origin: FaceOrigin,
        len: usize,
    },
}

/// Range of triangles contributed by one face list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FaceSpan {
    pub origin: FaceOrigin,
    pub triangles: Range<usize>,
}

/// Flat triangle soup handed to exporters and renderers.
#[derive(Clone, Debug, Default)]
pub struct Mesh {
    pos: Vec<Vec3>,
    spans: Vec<FaceSpan>,
}

/// Concatenates the lists in the given order. No welding, no normals, no
/// geometric checks; the only failure is a list with a partial triangle.
pub fn combine(lists: impl IntoIterator<Item = FaceList>) -> Result<Mesh, AssembleError> {
    let lists: Vec<FaceList> = lists.into_iter().collect();
    for (index, fl) in lists.iter().enumerate() {
        if !fl.is_well_formed() {
            return Err(AssembleError::MalformedFaceList {
                index,
                origin: fl.origin,
                len: fl.pos.len(),
            });
        }
    }
    let total: usize = lists.iter().map(|fl| fl.pos.len()).sum();
    let mut pos = Vec::with_capacity(total);
    let mut spans = Vec::with_capacity(lists.len());
    for fl in lists {
        let start = pos.len() / VERTS_PER_TRI;
        pos.extend_from_slice(&fl.pos);
        spans.push(FaceSpan {
            origin: fl.origin,
            triangles: start..pos.len() / VERTS_PER_TRI,
        });
    }
    debug!(
        "assembled {} triangles from {} face lists",
        pos.len() / VERTS_PER_TRI,
        spans.len()
    );
    Ok(Mesh { pos, spans })
}

impl Mesh {
    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.pos.len() / VERTS_PER_TRI
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pos.is_empty()
    }

    /// Flat vertex array, three per triangle.
    pub fn positions(&self) -> &[Vec3] {
        &self.pos
    }

    pub fn spans(&self) -> &[FaceSpan] {
        &self.spans
    }

    pub fn triangle(&self, i: usize) -> Option<Triangle> {
        let t = self.pos.get(i * VERTS_PER_TRI..(i + 1) * VERTS_PER_TRI)?;
        Some([t[0], t[1], t[2]])
    }

    pub fn triangles(&self) -> impl ExactSizeIterator<Item = Triangle> + '_ {
        self.pos
            .chunks_exact(VERTS_PER_TRI)
            .map(|t| [t[0], t[1], t[2]])
    }

    /// Number of triangles that came from lists with the given origin.
    pub fn count_of(&self, origin: FaceOrigin) -> usize {
        self.spans
            .iter()
            .filter(|s| s.origin == origin)
            .map(|s| s.triangles.len())
            .sum()
    }

    /// Unit normal from the winding of triangle `t`; zero for degenerate triangles.
    #[inline]
    pub fn facet_normal(t: &Triangle) -> Vec3 {
        (t[1] - t[0]).cross(t[2] - t[0]).normalized()
    }

    pub fn bounds(&self) -> Option<Aabb> {
        Aabb::from_points(self.pos.iter().copied())
    }

    /// Shares bit-identical vertices and returns an indexed copy.
    pub fn welded(&self) -> IndexedMesh {
        let mut lookup: HashMap<[u32; 3], usize> = HashMap::with_capacity(self.pos.len() / 2);
        let mut vertices = Vec::new();
        let mut indices = Vec::with_capacity(self.triangle_count());
        for t in self.pos.chunks_exact(VERTS_PER_TRI) {
            let mut tri = [0usize; 3];
            for (slot, v) in tri.iter_mut().zip(t) {
                *slot = *lookup.entry(v.to_bits()).or_insert_with(|| {
                    vertices.push(*v);
                    vertices.len() - 1
                });
            }
            indices.push(tri);
        }
        IndexedMesh { vertices, indices }
    }

    pub fn into_positions(self) -> Vec<Vec3> {
        self.pos
    }
}

/// Shared-vertex form of a [`Mesh`].
#[derive(Clone, Debug, Default)]
pub struct IndexedMesh {
    pub vertices: Vec<Vec3>,
    pub indices: Vec<[usize; 3]>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list(origin: FaceOrigin, tris: usize) -> FaceList {
        let mut fl = FaceList::new(origin);
        for i in 0..tris {
            let z = i as f32;
            fl.pos.extend_from_slice(&[
                Vec3::new(0.0, 0.0, z),
                Vec3::new(1.0, 0.0, z),
                Vec3::new(0.0, 1.0, z),
            ]);
        }
        fl
    }

    #[test]
    fn counts_add_up_including_empty() {
        let m = combine([
            list(FaceOrigin::Tile, 3),
            list(FaceOrigin::Wall, 0),
            list(FaceOrigin::Floor, 5),
        ])
        .unwrap();
        assert_eq!(m.triangle_count(), 8);
        assert_eq!(m.count_of(FaceOrigin::Wall), 0);
        assert_eq!(m.spans()[2].triangles, 3..8);
        assert!(combine(Vec::new()).unwrap().is_empty());
    }

    #[test]
    fn keeps_order() {
        let m = combine([list(FaceOrigin::Floor, 1), list(FaceOrigin::Tile, 2)]).unwrap();
        assert_eq!(m.spans()[0].origin, FaceOrigin::Floor);
        assert_eq!(m.triangle(2).unwrap()[0].z, 1.0);
        assert!(m.triangle(3).is_none());
    }

    #[test]
    fn rejects_partial_triangle() {
        let mut bad = list(FaceOrigin::Wall, 1);
        bad.pos.push(Vec3::ZERO);
        let err = combine([list(FaceOrigin::Tile, 1), bad]).unwrap_err();
        assert_eq!(
            err,
            AssembleError::MalformedFaceList {
                index: 1,
                origin: FaceOrigin::Wall,
                len: 4
            }
        );
    }

    #[test]
    fn welding_shares_vertices() {
        let mut fl = FaceList::new(FaceOrigin::Tile);
        fl.add_quad(
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(1.0, 1.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
            Vec3::UP,
        );
        let m = combine([fl]).unwrap();
        let w = m.welded();
        assert_eq!(w.vertices.len(), 4);
        assert_eq!(w.indices.len(), 2);
        for (tri, idx) in m.triangles().zip(&w.indices) {
            for k in 0..3 {
                assert_eq!(tri[k], w.vertices[idx[k]]);
            }
        }
    }

    #[test]
    fn welded_indices_address_every_vertex() {
        // Every vertex distinct: indices count straight up
        let mut fl = FaceList::new(FaceOrigin::Wall);
        for i in 0..300 {
            let x = i as f32;
            fl.pos.extend_from_slice(&[
                Vec3::new(x, 0.0, 0.0),
                Vec3::new(x, 1.0, 0.0),
                Vec3::new(x, 0.0, 1.0),
            ]);
        }
        let w = combine([fl]).unwrap().welded();
        assert_eq!(w.vertices.len(), 900);
        let flat: Vec<usize> = w.indices.iter().flatten().copied().collect();
        assert_eq!(flat, (0..900).collect::<Vec<_>>());
    }

    #[test]
    fn facet_normal_of_degenerate_is_zero() {
        let t = [Vec3::ZERO, Vec3::new(1.0, 0.0, 0.0), Vec3::new(2.0, 0.0, 0.0)];
        assert_eq!(Mesh::facet_normal(&t), Vec3::ZERO);
    }
}
