//! Planar loops → truck wires, plus the region checks shared by both kernels.
//!
//! truck has no circle primitive: a circle is a vertex swept 2π around
//! the loop center.

use std::f64::consts::PI;

use resonator_types::{Loop2d, PlanarRegion};
use truck_modeling::builder;
use truck_modeling::topology::{Edge, Vertex, Wire};
use truck_modeling::{Point3, Rad, Vector3};

use crate::types::KernelError;

/// Bounds of a loop: [min_x, min_y, max_x, max_y].
pub fn loop_bounds(lp: &Loop2d) -> [f64; 4] {
    match lp {
        Loop2d::Circle { center, radius } => [
            center[0] - radius,
            center[1] - radius,
            center[0] + radius,
            center[1] + radius,
        ],
        Loop2d::Polyline { points } => points.iter().fold(
            [f64::MAX, f64::MAX, f64::MIN, f64::MIN],
            |b, p| [b[0].min(p[0]), b[1].min(p[1]), b[2].max(p[0]), b[3].max(p[1])],
        ),
    }
}

/// Area enclosed by a loop.
pub fn loop_area(lp: &Loop2d) -> f64 {
    match lp {
        Loop2d::Circle { radius, .. } => PI * radius * radius,
        Loop2d::Polyline { points } => {
            let n = points.len();
            let twice: f64 = (0..n)
                .map(|i| {
                    let a = points[i];
                    let b = points[(i + 1) % n];
                    a[0] * b[1] - b[0] * a[1]
                })
                .sum();
            (twice / 2.0).abs()
        }
    }
}

fn check_loop(lp: &Loop2d) -> Result<(), KernelError> {
    match lp {
        Loop2d::Circle { center, radius } => {
            if !(radius.is_finite() && *radius > 0.0) || !center.iter().all(|c| c.is_finite()) {
                return Err(KernelError::InvalidGeometry {
                    reason: format!("circle radius must be positive, got {radius}"),
                });
            }
        }
        Loop2d::Polyline { points } => {
            if points.len() < 3 {
                return Err(KernelError::InvalidGeometry {
                    reason: format!("polyline needs at least 3 points, got {}", points.len()),
                });
            }
            if !points.iter().flatten().all(|c| c.is_finite()) {
                return Err(KernelError::InvalidGeometry {
                    reason: "polyline has a non-finite coordinate".to_string(),
                });
            }
            if loop_area(lp) <= 1e-12 {
                return Err(KernelError::InvalidGeometry {
                    reason: "polyline encloses no area".to_string(),
                });
            }
        }
    }
    Ok(())
}

/// Reject regions that cannot form a face: bad loops, or holes that are
/// not strictly inside the outer loop (an annulus needs outer > inner).
pub fn validate_region(region: &PlanarRegion) -> Result<(), KernelError> {
    check_loop(&region.outer)?;
    let outer = loop_bounds(&region.outer);
    for hole in &region.holes {
        check_loop(hole)?;
        let inner = loop_bounds(hole);
        let inside = inner[0] > outer[0]
            && inner[1] > outer[1]
            && inner[2] < outer[2]
            && inner[3] < outer[3];
        if !inside {
            return Err(KernelError::InvalidGeometry {
                reason: "hole is not strictly inside the outer boundary".to_string(),
            });
        }
    }
    Ok(())
}

/// Build a closed wire for `lp` in the plane z = `elevation`.
/// Loops are counter-clockwise seen from +Z.
pub fn loop_wire(lp: &Loop2d, elevation: f64) -> Wire {
    match lp {
        Loop2d::Circle { center, radius } => {
            let v = builder::vertex(Point3::new(center[0] + radius, center[1], elevation));
            builder::rsweep(
                &v,
                Point3::new(center[0], center[1], elevation),
                Vector3::unit_z(),
                Rad(2.0 * PI),
            )
        }
        Loop2d::Polyline { points } => {
            // Shared vertices so consecutive edges meet.
            let vertices: Vec<Vertex> = points
                .iter()
                .map(|p| builder::vertex(Point3::new(p[0], p[1], elevation)))
                .collect();
            let n = vertices.len();
            let edges: Vec<Edge> = (0..n)
                .map(|i| builder::line(&vertices[i], &vertices[(i + 1) % n]))
                .collect();
            Wire::from_iter(edges)
        }
    }
}
