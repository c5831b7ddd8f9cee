//! TruckKernel: real geometry kernel wrapping truck's API.

use std::any::Any;
use std::collections::HashMap;
use std::panic::{catch_unwind, AssertUnwindSafe};

use resonator_types::PlanarRegion;
use tracing::{debug, warn};
// Import truck types selectively to avoid shadowing std::result::Result
use truck_modeling::builder;
use truck_modeling::topology::{Face, Solid, Wire};
use truck_modeling::{InnerSpace, Point3, Rad, Vector3};

use crate::tessellation;
use crate::traits::Kernel;
use crate::types::*;
use crate::wires::{loop_wire, validate_region};

/// Tolerance handed to truck's boolean operations.
pub const BOOLEAN_TOLERANCE: f64 = 0.05;

/// Real geometry kernel backed by the truck BREP library.
pub struct TruckKernel {
    next_handle: u64,
    next_id: u64,
    solids: HashMap<u64, Solid>,
    /// Standalone faces created by make_face, awaiting extrude.
    standalone_faces: HashMap<u64, Face>,
}

impl TruckKernel {
    pub fn new() -> Self {
        Self {
            next_handle: 1,
            next_id: 1,
            solids: HashMap::new(),
            standalone_faces: HashMap::new(),
        }
    }

    fn alloc_handle(&mut self) -> KernelSolidHandle {
        let h = KernelSolidHandle(self.next_handle);
        self.next_handle += 1;
        h
    }

    fn alloc_id(&mut self) -> KernelId {
        let id = KernelId(self.next_id);
        self.next_id += 1;
        id
    }

    pub(crate) fn store_solid(&mut self, solid: Solid) -> KernelSolidHandle {
        let handle = self.alloc_handle();
        self.solids.insert(handle.id(), solid);
        handle
    }

    /// Borrow the truck solid behind a handle.
    pub fn get_solid(&self, handle: &KernelSolidHandle) -> Option<&Solid> {
        self.solids.get(&handle.id())
    }

    fn cloned_solid(&self, handle: &KernelSolidHandle) -> Result<Solid, KernelError> {
        self.solids
            .get(&handle.id())
            .cloned()
            .ok_or_else(|| KernelError::SolidNotFound {
                handle: handle.clone(),
            })
    }
}

impl Default for TruckKernel {
    fn default() -> Self {
        Self::new()
    }
}

/// Run a truck boolean, turning its topology panics into errors.
///
/// `Solid::new` inside truck_shapeops panics when the result shell is not
/// closed and oriented, which happens on touching or coplanar faces.
fn guarded_boolean(
    what: &str,
    op: impl FnOnce() -> Option<Solid>,
) -> Result<Solid, KernelError> {
    match catch_unwind(AssertUnwindSafe(op)) {
        Ok(Some(solid)) => Ok(solid),
        Ok(None) => Err(KernelError::BooleanFailed {
            reason: format!("truck {what}() returned None"),
        }),
        Err(payload) => {
            let message = panic_message(&*payload);
            warn!(op = what, %message, "truck boolean panicked");
            Err(KernelError::BooleanFailed {
                reason: format!("truck {what}() panicked: {message}"),
            })
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_string())
}

fn unit_vector(v: [f64; 3], what: &str) -> Result<Vector3, KernelError> {
    let v = Vector3::new(v[0], v[1], v[2]);
    if v.magnitude() < 1e-12 {
        return Err(KernelError::InvalidGeometry {
            reason: format!("{what} has zero length"),
        });
    }
    Ok(v.normalize())
}

impl Kernel for TruckKernel {
    fn make_face(&mut self, region: &PlanarRegion, elevation: f64) -> Result<KernelId, KernelError> {
        validate_region(region)?;

        let mut wires: Vec<Wire> = Vec::with_capacity(1 + region.holes.len());
        wires.push(loop_wire(&region.outer, elevation));
        // Holes run opposite to the outer boundary.
        wires.extend(
            region
                .holes
                .iter()
                .map(|hole| loop_wire(hole, elevation).inverse()),
        );

        let face = builder::try_attach_plane(&wires).map_err(|e| KernelError::InvalidGeometry {
            reason: format!("failed to create planar face: {e}"),
        })?;

        let face_id = self.alloc_id();
        self.standalone_faces.insert(face_id.0, face);
        debug!(?face_id, holes = region.holes.len(), elevation, "planar face");
        Ok(face_id)
    }

    fn extrude_face(
        &mut self,
        face: KernelId,
        direction: [f64; 3],
        depth: f64,
    ) -> Result<KernelSolidHandle, KernelError> {
        // The face is consumed even when the extrusion is rejected.
        let truck_face = self
            .standalone_faces
            .remove(&face.0)
            .ok_or(KernelError::FaceNotFound { id: face })?;
        if !(depth.is_finite() && depth > 0.0) {
            return Err(KernelError::InvalidGeometry {
                reason: format!("extrude depth must be positive, got {depth}"),
            });
        }
        let dir = unit_vector(direction, "extrude direction")?;

        let solid = builder::tsweep(&truck_face, dir * depth);
        Ok(self.store_solid(solid))
    }

    fn boolean_union(
        &mut self,
        a: &KernelSolidHandle,
        b: &KernelSolidHandle,
    ) -> Result<KernelSolidHandle, KernelError> {
        let solid_a = self.cloned_solid(a)?;
        let solid_b = self.cloned_solid(b)?;

        let result = guarded_boolean("or", || {
            truck_shapeops::or(&solid_a, &solid_b, BOOLEAN_TOLERANCE)
        })?;
        Ok(self.store_solid(result))
    }

    fn boolean_subtract(
        &mut self,
        a: &KernelSolidHandle,
        b: &KernelSolidHandle,
    ) -> Result<KernelSolidHandle, KernelError> {
        let solid_a = self.cloned_solid(a)?;
        let mut solid_b = self.cloned_solid(b)?;

        // Subtraction = A ∩ ¬B. not() mutates in place.
        solid_b.not();
        let result = guarded_boolean("and", || {
            truck_shapeops::and(&solid_a, &solid_b, BOOLEAN_TOLERANCE)
        })?;
        Ok(self.store_solid(result))
    }

    fn translate(
        &mut self,
        solid: &KernelSolidHandle,
        offset: [f64; 3],
    ) -> Result<KernelSolidHandle, KernelError> {
        let source = self
            .get_solid(solid)
            .ok_or_else(|| KernelError::SolidNotFound {
                handle: solid.clone(),
            })?;
        let moved = builder::translated(source, Vector3::new(offset[0], offset[1], offset[2]));
        Ok(self.store_solid(moved))
    }

    fn rotate(
        &mut self,
        solid: &KernelSolidHandle,
        axis_origin: [f64; 3],
        axis_direction: [f64; 3],
        angle: f64,
    ) -> Result<KernelSolidHandle, KernelError> {
        let axis = unit_vector(axis_direction, "rotation axis")?;
        let origin = Point3::new(axis_origin[0], axis_origin[1], axis_origin[2]);
        let source = self
            .get_solid(solid)
            .ok_or_else(|| KernelError::SolidNotFound {
                handle: solid.clone(),
            })?;
        let turned = builder::rotated(source, origin, axis, Rad(angle));
        Ok(self.store_solid(turned))
    }

    fn tessellate(
        &mut self,
        solid: &KernelSolidHandle,
        tolerance: f64,
    ) -> Result<RenderMesh, KernelError> {
        let truck_solid = self
            .get_solid(solid)
            .ok_or_else(|| KernelError::SolidNotFound {
                handle: solid.clone(),
            })?;
        tessellation::tessellate_solid(truck_solid, tolerance)
    }

    fn release(&mut self, solid: &KernelSolidHandle) {
        self.solids.remove(&solid.id());
    }

    fn solid_count(&self) -> usize {
        self.solids.len()
    }
}
