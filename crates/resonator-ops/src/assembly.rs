use std::time::Instant;

use kernel_bridge::{extrude_region, Kernel, KernelError, KernelSolidHandle};
use resonator_geometry::{compute_areas, generate_profile, EquivalentCylinder, Profile};
use resonator_types::{PartKind, PlanarRegion, ResonatorParams};
use tracing::{info, warn};
use uuid::Uuid;

use crate::snapshot::{Dimensions, GeometrySnapshot, PartHandles};
use crate::types::{AssemblyError, Diagnostics};

/// How far the cavity tool extends past the cap's open face.
///
/// A tool ending exactly on the face would leave coplanar faces, which
/// truck's boolean rejects.
pub const CUT_OVERSHOOT: f64 = 0.01;

/// How deep the insert sinks into the cavity floor before the union.
///
/// An insert resting exactly on the floor shares a plane with it and
/// truck cannot close the fused shell.
pub const SEAT_OVERLAP: f64 = 0.01;

/// Build the five parts from `params`.
///
/// Fails only on parameters that make the whole assembly meaningless
/// (non-positive length or inner diameter). Any single part the kernel
/// cannot build is left out and reported in the diagnostics; parts that
/// depend on it are left out too.
pub fn recompute(
    params: &ResonatorParams,
    kernel: &mut dyn Kernel,
) -> Result<GeometrySnapshot, AssemblyError> {
    let length = params.tube.length;
    let d1 = params.tube.inner_diameter;
    if !(length.is_finite() && length > 0.0) {
        return Err(AssemblyError::InvalidParameters {
            reason: format!("length must be positive, got {length}"),
        });
    }
    if !(d1.is_finite() && d1 > 0.0) {
        return Err(AssemblyError::InvalidParameters {
            reason: format!("inner diameter must be positive, got {d1}"),
        });
    }

    let started = Instant::now();
    let dims = Dimensions::from_params(params);
    let mut diagnostics = Diagnostics::default();
    let mut parts = PartHandles::default();

    parts.resonator = record(
        PartKind::Resonator,
        build_tube(kernel, &dims, length),
        &mut diagnostics,
    );

    let profile = generate_profile(&params.inner.shape(), dims.target_insert_area);
    if !profile.is_empty() {
        parts.inner_object = record(
            PartKind::InnerObject,
            build_insert(kernel, &profile, length),
            &mut diagnostics,
        );
    }

    parts.cap = record(
        PartKind::Cap,
        build_cap(kernel, params, &dims),
        &mut diagnostics,
    );

    match (&parts.cap, &parts.inner_object) {
        (Some(cap), Some(insert)) => {
            parts.cap_with_inner_object = record(
                PartKind::CapWithInnerObject,
                build_cap_with_insert(kernel, cap, insert, params.cap.wall_thickness),
                &mut diagnostics,
            );
        }
        // A degenerate shape has no insert to seat; nothing to report.
        _ if profile.is_empty() => {}
        _ => {
            let kind = PartKind::CapWithInnerObject;
            warn!(part = %kind, "part omitted: a prerequisite failed");
            diagnostics
                .warnings
                .push(format!("{kind}: not built (cap or inner object missing)"));
        }
    }

    let insert_area = parts
        .inner_object
        .is_some()
        .then_some(dims.target_insert_area);
    let areas = compute_areas(&params.tube, insert_area);

    match areas.equivalent {
        EquivalentCylinder::Valid {
            inner_radius,
            outer_radius,
            ..
        } => {
            parts.equivalent_cylinder = record(
                PartKind::EquivalentCylinder,
                build_equivalent(kernel, inner_radius, outer_radius, length),
                &mut diagnostics,
            );
        }
        other => {
            diagnostics
                .warnings
                .push(format!("{}: not built ({other:?})", PartKind::EquivalentCylinder));
        }
    }

    diagnostics.kernel_time_ms = started.elapsed().as_secs_f64() * 1000.0;

    let snapshot = GeometrySnapshot {
        id: Uuid::new_v4(),
        params: *params,
        dimensions: dims,
        profile,
        areas,
        parts,
        diagnostics,
    };
    info!(
        snapshot = %snapshot.id,
        parts = snapshot.parts.present().count(),
        warnings = snapshot.diagnostics.warnings.len(),
        kernel_time_ms = snapshot.diagnostics.kernel_time_ms,
        "recomputed resonator geometry"
    );
    Ok(snapshot)
}

fn record(
    kind: PartKind,
    result: Result<KernelSolidHandle, KernelError>,
    diagnostics: &mut Diagnostics,
) -> Option<KernelSolidHandle> {
    match result {
        Ok(handle) => Some(handle),
        Err(e) => {
            warn!(part = %kind, "part omitted: {e}");
            diagnostics.warnings.push(format!("{kind}: {e}"));
            None
        }
    }
}

/// Annulus R2 ⊃ R1 extruded over L.
fn build_tube(
    kernel: &mut dyn Kernel,
    dims: &Dimensions,
    length: f64,
) -> Result<KernelSolidHandle, KernelError> {
    let region = PlanarRegion::annulus(dims.outer_radius, dims.inner_radius);
    extrude_region(kernel, &region, 0.0, length)
}

fn build_insert(
    kernel: &mut dyn Kernel,
    profile: &Profile,
    length: f64,
) -> Result<KernelSolidHandle, KernelError> {
    let outer = profile.to_loop().ok_or_else(|| KernelError::InvalidGeometry {
        reason: format!("profile has only {} points", profile.len()),
    })?;
    let region = PlanarRegion {
        outer,
        holes: Vec::new(),
    };
    extrude_region(kernel, &region, 0.0, length)
}

/// Disc of R2 + wall, minus a cavity of R2 over the top `cavity_depth`.
fn build_cap(
    kernel: &mut dyn Kernel,
    params: &ResonatorParams,
    dims: &Dimensions,
) -> Result<KernelSolidHandle, KernelError> {
    let wall = params.cap.wall_thickness;
    let cavity = params.cap.cavity_depth;
    if !(wall > 0.0 && cavity > 0.0) {
        return Err(KernelError::InvalidGeometry {
            reason: format!("cap wall ({wall}) and cavity depth ({cavity}) must be positive"),
        });
    }

    let base = extrude_region(
        kernel,
        &PlanarRegion::disc(dims.cap_outer_radius),
        0.0,
        dims.cap_height,
    )?;
    // The tool rises from the cavity floor and overshoots the open face.
    let tool = match extrude_region(
        kernel,
        &PlanarRegion::disc(dims.outer_radius),
        wall,
        cavity + CUT_OVERSHOOT,
    ) {
        Ok(tool) => tool,
        Err(e) => {
            kernel.release(&base);
            return Err(e);
        }
    };

    let cap = kernel.boolean_subtract(&base, &tool);
    kernel.release(&base);
    kernel.release(&tool);
    cap
}

/// Cap fused with the insert seated on the cavity floor.
fn build_cap_with_insert(
    kernel: &mut dyn Kernel,
    cap: &KernelSolidHandle,
    insert: &KernelSolidHandle,
    wall: f64,
) -> Result<KernelSolidHandle, KernelError> {
    let moved = kernel.translate(insert, [0.0, 0.0, wall - SEAT_OVERLAP])?;
    let fused = kernel.boolean_union(cap, &moved);
    kernel.release(&moved);
    fused
}

fn build_equivalent(
    kernel: &mut dyn Kernel,
    inner_radius: f64,
    outer_radius: f64,
    length: f64,
) -> Result<KernelSolidHandle, KernelError> {
    let region = if inner_radius > 0.0 {
        PlanarRegion::annulus(outer_radius, inner_radius)
    } else {
        PlanarRegion::disc(outer_radius)
    };
    extrude_region(kernel, &region, 0.0, length)
}
