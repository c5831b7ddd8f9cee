use serde::{Deserialize, Serialize};

/// Opaque handle to a solid in the geometry kernel.
/// NEVER persisted. Valid only for the kernel session that issued it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KernelSolidHandle(pub(crate) u64);

impl KernelSolidHandle {
    pub(crate) fn id(&self) -> u64 {
        self.0
    }
}

/// Transient identifier for a standalone face awaiting extrusion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct KernelId(pub u64);

/// Errors from kernel operations.
#[derive(Debug, Clone, thiserror::Error)]
pub enum KernelError {
    #[error("invalid geometry: {reason}")]
    InvalidGeometry { reason: String },

    #[error("boolean operation failed: {reason}")]
    BooleanFailed { reason: String },

    #[error("tessellation failed: {reason}")]
    TessellationFailed { reason: String },

    #[error("face not found: {id:?}")]
    FaceNotFound { id: KernelId },

    #[error("solid not found: {handle:?}")]
    SolidNotFound { handle: KernelSolidHandle },

    #[error("kernel error: {message}")]
    Other { message: String },
}

/// Triangle mesh produced by tessellating a solid.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RenderMesh {
    /// Flat array of vertex positions [x0, y0, z0, x1, y1, z1, ...].
    pub vertices: Vec<f32>,
    /// Triangle indices into the vertex array.
    pub indices: Vec<u32>,
}

impl RenderMesh {
    pub fn vertex_count(&self) -> usize {
        self.vertices.len() / 3
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Axis-aligned bounds [min_x, min_y, min_z, max_x, max_y, max_z].
    pub fn bounds(&self) -> Option<[f64; 6]> {
        if self.vertices.is_empty() {
            return None;
        }
        let mut b = [
            f64::MAX,
            f64::MAX,
            f64::MAX,
            f64::MIN,
            f64::MIN,
            f64::MIN,
        ];
        for p in self.vertices.chunks_exact(3) {
            for axis in 0..3 {
                let c = p[axis] as f64;
                b[axis] = b[axis].min(c);
                b[axis + 3] = b[axis + 3].max(c);
            }
        }
        Some(b)
    }

    /// First index that points past the vertex array, if any.
    pub fn find_bad_index(&self) -> Option<u32> {
        let count = self.vertex_count();
        self.indices
            .iter()
            .copied()
            .find(|&idx| idx as usize >= count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounds_of_triangle() {
        let mesh = RenderMesh {
            vertices: vec![0.0, 0.0, 0.0, 2.0, 0.0, 1.0, 0.0, -3.0, 0.0],
            indices: vec![0, 1, 2],
        };
        assert_eq!(mesh.bounds(), Some([0.0, -3.0, 0.0, 2.0, 0.0, 1.0]));
        assert_eq!(mesh.triangle_count(), 1);
        assert_eq!(mesh.find_bad_index(), None);
    }

    #[test]
    fn empty_mesh_has_no_bounds() {
        assert_eq!(RenderMesh::default().bounds(), None);
    }
}
