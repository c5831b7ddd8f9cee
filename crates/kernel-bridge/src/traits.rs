use resonator_types::PlanarRegion;

use crate::types::*;

/// Solid-modeling capabilities the designer consumes.
/// Implemented by TruckKernel (wraps real truck) and MockKernel (deterministic test double).
pub trait Kernel {
    /// Build a planar face in the plane z = `elevation` from a region
    /// (outer loop plus holes). The face waits for [`Kernel::extrude_face`].
    fn make_face(&mut self, region: &PlanarRegion, elevation: f64) -> Result<KernelId, KernelError>;

    /// Extrude a planar face along a direction vector. Consumes the face.
    fn extrude_face(
        &mut self,
        face: KernelId,
        direction: [f64; 3],
        depth: f64,
    ) -> Result<KernelSolidHandle, KernelError>;

    /// Boolean union of two solids.
    fn boolean_union(
        &mut self,
        a: &KernelSolidHandle,
        b: &KernelSolidHandle,
    ) -> Result<KernelSolidHandle, KernelError>;

    /// Boolean subtraction: a minus b.
    fn boolean_subtract(
        &mut self,
        a: &KernelSolidHandle,
        b: &KernelSolidHandle,
    ) -> Result<KernelSolidHandle, KernelError>;

    /// Translated copy of a solid.
    fn translate(
        &mut self,
        solid: &KernelSolidHandle,
        offset: [f64; 3],
    ) -> Result<KernelSolidHandle, KernelError>;

    /// Rotated copy of a solid; `angle` in radians.
    fn rotate(
        &mut self,
        solid: &KernelSolidHandle,
        axis_origin: [f64; 3],
        axis_direction: [f64; 3],
        angle: f64,
    ) -> Result<KernelSolidHandle, KernelError>;

    /// Tessellate a solid to a triangle mesh.
    fn tessellate(
        &mut self,
        solid: &KernelSolidHandle,
        tolerance: f64,
    ) -> Result<RenderMesh, KernelError>;

    /// Drop a solid. Releasing an unknown handle is a no-op.
    fn release(&mut self, solid: &KernelSolidHandle);

    /// Number of solids currently held.
    fn solid_count(&self) -> usize;
}

/// Convenience: face from `region` at `elevation`, extruded along +Z.
pub fn extrude_region(
    kernel: &mut dyn Kernel,
    region: &PlanarRegion,
    elevation: f64,
    depth: f64,
) -> Result<KernelSolidHandle, KernelError> {
    let face = kernel.make_face(region, elevation)?;
    kernel.extrude_face(face, [0.0, 0.0, 1.0], depth)
}
