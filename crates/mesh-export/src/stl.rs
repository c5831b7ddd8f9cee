//! STL encoding of a [`RenderMesh`], binary and ASCII, plus reading back.

use std::fs::File;
use std::io::{self, BufReader, Write};
use std::path::Path;

use kernel_bridge::RenderMesh;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::atomic::write_atomically;
use crate::errors::StlError;

/// On-disk STL flavour.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum StlFormat {
    #[default]
    Binary,
    Ascii,
}

/// Convert a mesh to `stl_io` triangles with unit face normals.
fn triangles(mesh: &RenderMesh) -> Result<Vec<stl_io::Triangle>, StlError> {
    if mesh.triangle_count() == 0 {
        return Err(StlError::EmptyMesh);
    }
    if let Some(index) = mesh.find_bad_index() {
        return Err(StlError::IndexOutOfRange {
            index,
            vertex_count: mesh.vertex_count(),
        });
    }

    let corner = |i: u32| {
        let i = i as usize * 3;
        [mesh.vertices[i], mesh.vertices[i + 1], mesh.vertices[i + 2]]
    };
    Ok(mesh
        .indices
        .chunks_exact(3)
        .map(|tri| {
            let [p0, p1, p2] = [corner(tri[0]), corner(tri[1]), corner(tri[2])];
            stl_io::Triangle {
                normal: stl_io::Normal::new(face_normal(p0, p1, p2)),
                vertices: [
                    stl_io::Vertex::new(p0),
                    stl_io::Vertex::new(p1),
                    stl_io::Vertex::new(p2),
                ],
            }
        })
        .collect())
}

/// Unit normal by the right-hand rule; +Z for degenerate triangles.
fn face_normal(p0: [f32; 3], p1: [f32; 3], p2: [f32; 3]) -> [f32; 3] {
    let a = [p1[0] - p0[0], p1[1] - p0[1], p1[2] - p0[2]];
    let b = [p2[0] - p0[0], p2[1] - p0[1], p2[2] - p0[2]];
    let n = [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ];
    let len = (n[0] * n[0] + n[1] * n[1] + n[2] * n[2]).sqrt();
    if len > 1e-12 {
        n.map(|c| c / len)
    } else {
        [0.0, 0.0, 1.0]
    }
}

fn write_ascii<W: Write>(
    writer: &mut W,
    triangles: &[stl_io::Triangle],
    name: &str,
) -> io::Result<()> {
    writeln!(writer, "solid {name}")?;
    for tri in triangles {
        let n = tri.normal.0;
        writeln!(writer, "  facet normal {} {} {}", n[0], n[1], n[2])?;
        writeln!(writer, "    outer loop")?;
        for v in &tri.vertices {
            writeln!(writer, "      vertex {} {} {}", v.0[0], v.0[1], v.0[2])?;
        }
        writeln!(writer, "    endloop")?;
        writeln!(writer, "  endfacet")?;
    }
    writeln!(writer, "endsolid {name}")
}

/// Encode `mesh` into `writer`. `name` only appears in ASCII output.
///
/// Returns the number of triangles written.
pub fn write_stl<W: Write>(
    writer: &mut W,
    mesh: &RenderMesh,
    format: StlFormat,
    name: &str,
) -> Result<usize, StlError> {
    let tris = triangles(mesh)?;
    let wrap = |source| StlError::Write {
        path: name.into(),
        source,
    };
    match format {
        StlFormat::Binary => stl_io::write_stl(writer, tris.iter()).map_err(wrap)?,
        StlFormat::Ascii => write_ascii(writer, &tris, name).map_err(wrap)?,
    }
    Ok(tris.len())
}

/// Write `mesh` to `path`, replacing it only after a complete write.
pub fn write_stl_file(path: &Path, mesh: &RenderMesh, format: StlFormat) -> Result<usize, StlError> {
    // Encode up front so mesh errors never touch the filesystem.
    let tris = triangles(mesh)?;
    let name = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "mesh".to_string());

    write_atomically(path, |w| match format {
        StlFormat::Binary => stl_io::write_stl(w, tris.iter()),
        StlFormat::Ascii => write_ascii(w, &tris, &name),
    })?;
    debug!(path = %path.display(), triangles = tris.len(), ?format, "wrote STL");
    Ok(tris.len())
}

/// Read a binary or ASCII STL file into an indexed mesh.
pub fn read_stl_file(path: &Path) -> Result<RenderMesh, StlError> {
    let wrap = |source| StlError::Read {
        path: path.to_path_buf(),
        source,
    };
    let file = File::open(path).map_err(wrap)?;
    let mut reader = BufReader::new(file);
    let stl = stl_io::read_stl(&mut reader).map_err(wrap)?;

    let vertices = stl.vertices.iter().flat_map(|v| v.0).collect();
    let indices = stl
        .faces
        .iter()
        .flat_map(|f| f.vertices.map(|i| i as u32))
        .collect();
    let mesh = RenderMesh { vertices, indices };
    debug!(
        path = %path.display(),
        vertices = mesh.vertex_count(),
        triangles = mesh.triangle_count(),
        "read STL"
    );
    Ok(mesh)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    /// Unit right triangle in the XY plane plus one above it.
    fn two_triangles() -> RenderMesh {
        RenderMesh {
            vertices: vec![
                0.0, 0.0, 0.0, //
                1.0, 0.0, 0.0, //
                0.0, 1.0, 0.0, //
                0.0, 0.0, 1.0,
            ],
            indices: vec![0, 1, 2, 0, 1, 3],
        }
    }

    #[test]
    fn binary_layout() {
        let mut buf = Vec::new();
        let n = write_stl(&mut buf, &two_triangles(), StlFormat::Binary, "t").unwrap();
        assert_eq!(n, 2);
        assert_eq!(buf.len(), 80 + 4 + 2 * 50);
        assert_eq!(u32::from_le_bytes([buf[80], buf[81], buf[82], buf[83]]), 2);
    }

    #[test]
    fn ascii_layout() {
        let mut buf = Vec::new();
        write_stl(&mut buf, &two_triangles(), StlFormat::Ascii, "part").unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.starts_with("solid part\n"));
        assert!(text.trim_end().ends_with("endsolid part"));
        assert_eq!(text.matches("facet normal").count(), 2);
        assert_eq!(text.matches("vertex ").count(), 6);
        assert!(text.contains("facet normal 0 0 1"));
    }

    #[test]
    fn normals_follow_winding() {
        let n = face_normal([0.0; 3], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]);
        assert_eq!(n, [0.0, 0.0, 1.0]);
        let n = face_normal([0.0; 3], [0.0, 1.0, 0.0], [1.0, 0.0, 0.0]);
        assert_eq!(n, [0.0, 0.0, -1.0]);
        let n = face_normal([0.0; 3], [1.0, 0.0, 0.0], [2.0, 0.0, 0.0]);
        assert_eq!(n, [0.0, 0.0, 1.0]);
    }

    #[test]
    fn empty_mesh_is_rejected() {
        let mut buf = Vec::new();
        let err = write_stl(&mut buf, &RenderMesh::default(), StlFormat::Binary, "e").unwrap_err();
        assert!(matches!(err, StlError::EmptyMesh));
        assert!(buf.is_empty());
    }

    #[test]
    fn bad_index_is_rejected() {
        let mut mesh = two_triangles();
        mesh.indices[5] = 9;
        let err = write_stl(&mut Vec::new(), &mesh, StlFormat::Ascii, "e").unwrap_err();
        assert!(matches!(
            err,
            StlError::IndexOutOfRange {
                index: 9,
                vertex_count: 4
            }
        ));
    }

    #[test]
    fn file_reads_back_in_both_formats() {
        let dir = tempfile::tempdir().unwrap();
        for format in [StlFormat::Binary, StlFormat::Ascii] {
            let path = dir.path().join(format!("{format:?}.stl"));
            write_stl_file(&path, &two_triangles(), format).unwrap();

            let back = read_stl_file(&path).unwrap();
            assert_eq!(back.triangle_count(), 2);
            // stl_io merges the shared corners.
            assert_eq!(back.vertex_count(), 4);
            let b = back.bounds().unwrap();
            assert_relative_eq!(b[3], 1.0);
            assert_relative_eq!(b[5], 1.0);
        }
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_stl_file(&dir.path().join("absent.stl")).unwrap_err();
        assert!(matches!(err, StlError::Read { .. }));
    }
}
