//! Tessellation wrapper: truck-meshalgo solid → flat [`RenderMesh`].

use tracing::debug;
use truck_meshalgo::tessellation::{MeshableShape, MeshedShape};

use crate::types::*;

type TruckSolid = truck_modeling::Solid;

/// Tessellate a truck Solid into a single triangle mesh.
///
/// Quads are split along their first diagonal; n-gons are fanned.
pub fn tessellate_solid(
    solid: &TruckSolid,
    tolerance: f64,
) -> std::result::Result<RenderMesh, KernelError> {
    if !(tolerance.is_finite() && tolerance > 0.0) {
        return Err(KernelError::TessellationFailed {
            reason: format!("tolerance must be positive, got {tolerance}"),
        });
    }

    let polygon = solid.triangulation(tolerance).to_polygon();

    let positions = polygon.positions();
    let mut vertices = Vec::with_capacity(positions.len() * 3);
    for pos in positions {
        vertices.push(pos[0] as f32);
        vertices.push(pos[1] as f32);
        vertices.push(pos[2] as f32);
    }

    let mut indices: Vec<u32> = Vec::new();
    for tri in polygon.tri_faces() {
        indices.extend(tri.iter().map(|v| v.pos as u32));
    }
    for quad in polygon.quad_faces() {
        let [a, b, c, d] = [quad[0].pos, quad[1].pos, quad[2].pos, quad[3].pos];
        indices.extend([a, b, c, a, c, d].map(|p| p as u32));
    }
    for face in polygon.other_faces() {
        for i in 1..face.len().saturating_sub(1) {
            indices.extend([face[0].pos, face[i].pos, face[i + 1].pos].map(|p| p as u32));
        }
    }

    if indices.is_empty() {
        return Err(KernelError::TessellationFailed {
            reason: "solid produced no triangles".to_string(),
        });
    }

    debug!(
        vertices = vertices.len() / 3,
        triangles = indices.len() / 3,
        tolerance,
        "tessellated solid"
    );

    Ok(RenderMesh { vertices, indices })
}
