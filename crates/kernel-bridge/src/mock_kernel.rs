//! MockKernel: deterministic test double implementing Kernel.
//!
//! Tracks each solid as an axis-aligned box plus the operation that made
//! it. Tessellation returns that box as 12 triangles. Individual
//! operations can be made to fail for error-path tests.

use std::collections::{HashMap, HashSet};

use resonator_types::PlanarRegion;

use crate::traits::Kernel;
use crate::types::*;
use crate::wires::{loop_area, loop_bounds, validate_region};

/// Operations the mock can be told to fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MockOp {
    MakeFace,
    Extrude,
    Union,
    Subtract,
    Translate,
    Rotate,
    Tessellate,
}

#[derive(Debug, Clone)]
struct MockFace {
    /// [min_x, min_y, max_x, max_y]
    bounds: [f64; 4],
    area: f64,
    elevation: f64,
}

/// A synthetic solid: bounding box plus provenance.
#[derive(Debug, Clone)]
pub struct MockSolid {
    /// [min_x, min_y, min_z, max_x, max_y, max_z]
    pub bounds: [f64; 6],
    /// Material cross-section of the originating face (extrusions only).
    pub section_area: Option<f64>,
    pub origin: MockOp,
}

/// Deterministic test double for the geometry kernel.
pub struct MockKernel {
    next_id: u64,
    next_handle: u64,
    solids: HashMap<u64, MockSolid>,
    standalone_faces: HashMap<u64, MockFace>,
    failing: HashSet<MockOp>,
    log: Vec<MockOp>,
}

impl MockKernel {
    pub fn new() -> Self {
        Self {
            next_id: 1,
            next_handle: 1,
            solids: HashMap::new(),
            standalone_faces: HashMap::new(),
            failing: HashSet::new(),
            log: Vec::new(),
        }
    }

    /// Make every future call of `op` fail.
    pub fn fail_on(&mut self, op: MockOp) {
        self.failing.insert(op);
    }

    /// Operations executed so far, in call order (failed calls included).
    pub fn op_log(&self) -> &[MockOp] {
        &self.log
    }

    pub fn count_ops(&self, op: MockOp) -> usize {
        self.log.iter().filter(|&&o| o == op).count()
    }

    pub fn solid(&self, handle: &KernelSolidHandle) -> Option<&MockSolid> {
        self.solids.get(&handle.id())
    }

    fn enter(&mut self, op: MockOp) -> Result<(), KernelError> {
        self.log.push(op);
        if self.failing.contains(&op) {
            return Err(KernelError::Other {
                message: format!("mock failure injected for {op:?}"),
            });
        }
        Ok(())
    }

    fn alloc_id(&mut self) -> KernelId {
        let id = KernelId(self.next_id);
        self.next_id += 1;
        id
    }

    fn store(&mut self, solid: MockSolid) -> KernelSolidHandle {
        let h = KernelSolidHandle(self.next_handle);
        self.next_handle += 1;
        self.solids.insert(h.id(), solid);
        h
    }

    fn lookup(&self, handle: &KernelSolidHandle) -> Result<&MockSolid, KernelError> {
        self.solids
            .get(&handle.id())
            .ok_or_else(|| KernelError::SolidNotFound {
                handle: handle.clone(),
            })
    }

    fn box_corners(b: &[f64; 6]) -> [[f64; 3]; 8] {
        [
            [b[0], b[1], b[2]],
            [b[3], b[1], b[2]],
            [b[3], b[4], b[2]],
            [b[0], b[4], b[2]],
            [b[0], b[1], b[5]],
            [b[3], b[1], b[5]],
            [b[3], b[4], b[5]],
            [b[0], b[4], b[5]],
        ]
    }

    fn bounds_of(points: &[[f64; 3]]) -> [f64; 6] {
        points.iter().fold(
            [f64::MAX, f64::MAX, f64::MAX, f64::MIN, f64::MIN, f64::MIN],
            |b, p| {
                [
                    b[0].min(p[0]),
                    b[1].min(p[1]),
                    b[2].min(p[2]),
                    b[3].max(p[0]),
                    b[4].max(p[1]),
                    b[5].max(p[2]),
                ]
            },
        )
    }
}

impl Default for MockKernel {
    fn default() -> Self {
        Self::new()
    }
}

/// Rodrigues rotation of `p` about the unit axis `k` through `o`.
fn rotate_point(p: [f64; 3], o: [f64; 3], k: [f64; 3], angle: f64) -> [f64; 3] {
    let v = [p[0] - o[0], p[1] - o[1], p[2] - o[2]];
    let (s, c) = angle.sin_cos();
    let cross = [
        k[1] * v[2] - k[2] * v[1],
        k[2] * v[0] - k[0] * v[2],
        k[0] * v[1] - k[1] * v[0],
    ];
    let dot = k[0] * v[0] + k[1] * v[1] + k[2] * v[2];
    let mut out = [0.0; 3];
    for i in 0..3 {
        out[i] = o[i] + v[i] * c + cross[i] * s + k[i] * dot * (1.0 - c);
    }
    out
}

impl Kernel for MockKernel {
    fn make_face(&mut self, region: &PlanarRegion, elevation: f64) -> Result<KernelId, KernelError> {
        self.enter(MockOp::MakeFace)?;
        validate_region(region)?;
        let area = loop_area(&region.outer) - region.holes.iter().map(loop_area).sum::<f64>();
        let id = self.alloc_id();
        self.standalone_faces.insert(
            id.0,
            MockFace {
                bounds: loop_bounds(&region.outer),
                area,
                elevation,
            },
        );
        Ok(id)
    }

    fn extrude_face(
        &mut self,
        face: KernelId,
        direction: [f64; 3],
        depth: f64,
    ) -> Result<KernelSolidHandle, KernelError> {
        self.enter(MockOp::Extrude)?;
        let f = self
            .standalone_faces
            .remove(&face.0)
            .ok_or(KernelError::FaceNotFound { id: face })?;
        if !(depth.is_finite() && depth > 0.0) {
            return Err(KernelError::InvalidGeometry {
                reason: format!("extrude depth must be positive, got {depth}"),
            });
        }
        let len = (direction[0].powi(2) + direction[1].powi(2) + direction[2].powi(2)).sqrt();
        if len < 1e-12 {
            return Err(KernelError::InvalidGeometry {
                reason: "extrude direction has zero length".to_string(),
            });
        }

        let sweep = direction.map(|c| c / len * depth);
        let base = [
            f.bounds[0],
            f.bounds[1],
            f.elevation,
            f.bounds[2],
            f.bounds[3],
            f.elevation,
        ];
        let mut corners = Self::box_corners(&base).to_vec();
        corners.extend(
            Self::box_corners(&base)
                .iter()
                .map(|p| [p[0] + sweep[0], p[1] + sweep[1], p[2] + sweep[2]]),
        );
        Ok(self.store(MockSolid {
            bounds: Self::bounds_of(&corners),
            section_area: Some(f.area),
            origin: MockOp::Extrude,
        }))
    }

    fn boolean_union(
        &mut self,
        a: &KernelSolidHandle,
        b: &KernelSolidHandle,
    ) -> Result<KernelSolidHandle, KernelError> {
        self.enter(MockOp::Union)?;
        let ba = self.lookup(a)?.bounds;
        let bb = self.lookup(b)?.bounds;
        let mut corners = Self::box_corners(&ba).to_vec();
        corners.extend(Self::box_corners(&bb));
        Ok(self.store(MockSolid {
            bounds: Self::bounds_of(&corners),
            section_area: None,
            origin: MockOp::Union,
        }))
    }

    fn boolean_subtract(
        &mut self,
        a: &KernelSolidHandle,
        b: &KernelSolidHandle,
    ) -> Result<KernelSolidHandle, KernelError> {
        self.enter(MockOp::Subtract)?;
        let ba = self.lookup(a)?.bounds;
        self.lookup(b)?;
        Ok(self.store(MockSolid {
            bounds: ba,
            section_area: None,
            origin: MockOp::Subtract,
        }))
    }

    fn translate(
        &mut self,
        solid: &KernelSolidHandle,
        offset: [f64; 3],
    ) -> Result<KernelSolidHandle, KernelError> {
        self.enter(MockOp::Translate)?;
        let src = self.lookup(solid)?.clone();
        let mut bounds = src.bounds;
        for i in 0..3 {
            bounds[i] += offset[i];
            bounds[i + 3] += offset[i];
        }
        Ok(self.store(MockSolid {
            bounds,
            section_area: src.section_area,
            origin: MockOp::Translate,
        }))
    }

    fn rotate(
        &mut self,
        solid: &KernelSolidHandle,
        axis_origin: [f64; 3],
        axis_direction: [f64; 3],
        angle: f64,
    ) -> Result<KernelSolidHandle, KernelError> {
        self.enter(MockOp::Rotate)?;
        let len = (axis_direction[0].powi(2) + axis_direction[1].powi(2) + axis_direction[2].powi(2))
            .sqrt();
        if len < 1e-12 {
            return Err(KernelError::InvalidGeometry {
                reason: "rotation axis has zero length".to_string(),
            });
        }
        let k = axis_direction.map(|c| c / len);
        let src = self.lookup(solid)?.clone();
        let corners: Vec<[f64; 3]> = Self::box_corners(&src.bounds)
            .iter()
            .map(|&p| rotate_point(p, axis_origin, k, angle))
            .collect();
        Ok(self.store(MockSolid {
            bounds: Self::bounds_of(&corners),
            section_area: src.section_area,
            origin: MockOp::Rotate,
        }))
    }

    fn tessellate(
        &mut self,
        solid: &KernelSolidHandle,
        _tolerance: f64,
    ) -> Result<RenderMesh, KernelError> {
        self.enter(MockOp::Tessellate)?;
        let b = self.lookup(solid)?.bounds;
        let vertices = Self::box_corners(&b)
            .iter()
            .flat_map(|p| p.map(|c| c as f32))
            .collect();
        // Outward-facing box triangles.
        let indices = vec![
            0, 2, 1, 0, 3, 2, // bottom
            4, 5, 6, 4, 6, 7, // top
            0, 1, 5, 0, 5, 4, // front
            2, 3, 7, 2, 7, 6, // back
            0, 4, 7, 0, 7, 3, // left
            1, 2, 6, 1, 6, 5, // right
        ];
        Ok(RenderMesh { vertices, indices })
    }

    fn release(&mut self, solid: &KernelSolidHandle) {
        self.solids.remove(&solid.id());
    }

    fn solid_count(&self) -> usize {
        self.solids.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::extrude_region;
    use approx::assert_relative_eq;

    #[test]
    fn extrude_annulus_tracks_bounds_and_area() {
        let mut k = MockKernel::new();
        let h = extrude_region(&mut k, &PlanarRegion::annulus(2.0, 1.0), 0.0, 10.0).unwrap();
        let s = k.solid(&h).unwrap();
        assert_eq!(s.bounds, [-2.0, -2.0, 0.0, 2.0, 2.0, 10.0]);
        assert_relative_eq!(s.section_area.unwrap(), 3.0 * std::f64::consts::PI);
        assert_eq!(k.op_log(), &[MockOp::MakeFace, MockOp::Extrude]);
    }

    #[test]
    fn rotate_half_turn_about_x() {
        let mut k = MockKernel::new();
        let h = extrude_region(&mut k, &PlanarRegion::disc(1.0), 0.0, 4.0).unwrap();
        let r = k
            .rotate(&h, [0.0; 3], [1.0, 0.0, 0.0], std::f64::consts::PI)
            .unwrap();
        let b = k.solid(&r).unwrap().bounds;
        assert_relative_eq!(b[2], -4.0, epsilon = 1e-12);
        assert_relative_eq!(b[5], 0.0, epsilon = 1e-12);
    }

    #[test]
    fn injected_failure_is_reported() {
        let mut k = MockKernel::new();
        k.fail_on(MockOp::Union);
        let a = extrude_region(&mut k, &PlanarRegion::disc(1.0), 0.0, 1.0).unwrap();
        let b = extrude_region(&mut k, &PlanarRegion::disc(1.0), 0.0, 1.0).unwrap();
        assert!(k.boolean_union(&a, &b).is_err());
        assert_eq!(k.count_ops(MockOp::Union), 1);
        assert_eq!(k.solid_count(), 2);
    }

    #[test]
    fn rejected_extrude_consumes_face() {
        let mut k = MockKernel::new();
        let face = k.make_face(&PlanarRegion::disc(1.0), 0.0).unwrap();
        assert!(matches!(
            k.extrude_face(face, [0.0, 0.0, 0.0], 1.0),
            Err(KernelError::InvalidGeometry { .. })
        ));
        assert!(k.standalone_faces.is_empty());
        assert!(matches!(
            k.extrude_face(face, [0.0, 0.0, 1.0], 1.0),
            Err(KernelError::FaceNotFound { .. })
        ));
    }

    #[test]
    fn tessellate_gives_closed_box() {
        let mut k = MockKernel::new();
        let h = extrude_region(&mut k, &PlanarRegion::disc(1.0), 0.0, 1.0).unwrap();
        let mesh = k.tessellate(&h, 0.1).unwrap();
        assert_eq!(mesh.vertex_count(), 8);
        assert_eq!(mesh.triangle_count(), 12);
        assert_eq!(mesh.bounds(), Some([-1.0, -1.0, 0.0, 1.0, 1.0, 1.0]));
    }
}
