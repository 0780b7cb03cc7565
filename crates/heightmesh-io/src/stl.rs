//! Binary STL export.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use heightmesh_mesh::{Mesh, Triangle};
use log::info;

use crate::error::IoError;

/// Binary STL size: 80-byte header, u32 count, 50 bytes per facet.
pub fn binary_size(triangles: usize) -> usize {
    84 + 50 * triangles
}

fn facet(t: &Triangle) -> stl_io::Triangle {
    let n = Mesh::facet_normal(t);
    stl_io::Triangle {
        normal: stl_io::Normal::new(n.to_array()),
        vertices: [
            stl_io::Vertex::new(t[0].to_array()),
            stl_io::Vertex::new(t[1].to_array()),
            stl_io::Vertex::new(t[2].to_array()),
        ],
    }
}

/// Writes every triangle of `mesh` in order, normals taken from the winding.
pub fn write<W: Write>(mesh: &Mesh, writer: &mut W) -> Result<(), IoError> {
    let facets = mesh.triangles().map(|t| facet(&t));
    stl_io::write_stl(writer, facets).map_err(|source| IoError::Stl { path: None, source })
}

pub fn save(mesh: &Mesh, path: impl AsRef<Path>) -> Result<(), IoError> {
    let path = path.as_ref();
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    write(mesh, &mut writer)
        .and_then(|()| {
            writer
                .flush()
                .map_err(|source| IoError::Stl { path: None, source })
        })
        .map_err(|e| e.at_path(path))?;
    info!(
        "wrote {} triangles to {}",
        mesh.triangle_count(),
        path.display()
    );
    Ok(())
}
