use std::f64::consts::PI;

use resonator_types::TubeParams;
use serde::{Deserialize, Serialize};

/// Net material area at or below this is treated as "insert too large".
pub const NET_AREA_EPSILON: f64 = 1e-9;

/// Outcome of sizing the equivalent cylinder.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum EquivalentCylinder {
    /// Annulus R2 ⊃ `inner_radius` with `material_area` of material.
    Valid {
        inner_radius: f64,
        outer_radius: f64,
        material_area: f64,
    },
    /// The derived inner radius reached the outer radius.
    InnerExceedsOuter { inner_radius: f64, outer_radius: f64 },
    /// The insert leaves no material (net area ≤ [`NET_AREA_EPSILON`]).
    NetAreaTooSmall,
}

impl EquivalentCylinder {
    pub fn is_valid(&self) -> bool {
        matches!(self, EquivalentCylinder::Valid { .. })
    }
}

/// Cross-section areas of the assembly, derived from parameters only.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AreaReport {
    /// π(R2² − R1²).
    pub resonator_material: f64,
    /// Target area when an insert exists, else 0.
    pub inner_object: f64,
    /// Resonator material minus insert.
    pub net_material: f64,
    pub equivalent: EquivalentCylinder,
}

impl AreaReport {
    /// Label for the resonator material area.
    pub fn resonator_label(&self) -> String {
        format_area(self.resonator_material)
    }

    pub fn inner_object_label(&self) -> String {
        format_area(self.inner_object)
    }

    /// Net area label; replaced by an error when nothing is left.
    pub fn net_material_label(&self) -> String {
        match self.equivalent {
            EquivalentCylinder::NetAreaTooSmall => "Error: object too large".to_string(),
            _ => format_area(self.net_material),
        }
    }

    pub fn equivalent_label(&self) -> String {
        match self.equivalent {
            EquivalentCylinder::Valid { material_area, .. } => format_area(material_area),
            EquivalentCylinder::InnerExceedsOuter { .. } => "Error: R_in > R_out".to_string(),
            EquivalentCylinder::NetAreaTooSmall => "N/A".to_string(),
        }
    }
}

/// Format an area the way the form displays it.
pub fn format_area(area: f64) -> String {
    format!("{area:.2} mm²")
}

/// Area bookkeeping for a tube with an optional insert of `insert_area`.
///
/// The equivalent cylinder keeps R2 and takes its hole radius from
/// π(R2² − R_eq²) = net material area.
pub fn compute_areas(tube: &TubeParams, insert_area: Option<f64>) -> AreaReport {
    let r1 = tube.inner_radius();
    let r2 = tube.outer_radius();
    let resonator_material = PI * (r2.powi(2) - r1.powi(2));
    let inner_object = insert_area.unwrap_or(0.0);
    let net_material = resonator_material - inner_object;

    AreaReport {
        resonator_material,
        inner_object,
        net_material,
        equivalent: size_equivalent(r2, net_material),
    }
}

/// Size an annulus of outer radius `outer_radius` holding `net_material`.
pub fn size_equivalent(outer_radius: f64, net_material: f64) -> EquivalentCylinder {
    if !(net_material > NET_AREA_EPSILON) {
        return EquivalentCylinder::NetAreaTooSmall;
    }
    // More material than a full disc of R2 leaves no hole at all.
    let hole_sq = (outer_radius.powi(2) - net_material / PI).max(0.0);
    let inner_radius = hole_sq.sqrt();
    if inner_radius < outer_radius {
        EquivalentCylinder::Valid {
            inner_radius,
            outer_radius,
            material_area: PI * (outer_radius.powi(2) - inner_radius.powi(2)),
        }
    } else {
        EquivalentCylinder::InnerExceedsOuter {
            inner_radius,
            outer_radius,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn tube(d1: f64, t: f64) -> TubeParams {
        TubeParams {
            length: 100.0,
            inner_diameter: d1,
            wall_thickness: t,
        }
    }

    #[test]
    fn no_insert_keeps_full_material() {
        let r = compute_areas(&tube(19.0, 2.0), None);
        assert_eq!(r.inner_object, 0.0);
        assert_eq!(r.net_material, r.resonator_material);
    }

    #[test]
    fn insert_larger_than_material_is_an_error() {
        let t = tube(19.0, 2.0);
        let r = compute_areas(&t, Some(500.0));
        assert_eq!(r.equivalent, EquivalentCylinder::NetAreaTooSmall);
        assert_eq!(r.net_material_label(), "Error: object too large");
        assert_eq!(r.equivalent_label(), "N/A");
    }

    #[test]
    fn error_labels_replace_numbers() {
        let r = AreaReport {
            resonator_material: 10.0,
            inner_object: 2.0,
            net_material: 8.0,
            equivalent: EquivalentCylinder::InnerExceedsOuter {
                inner_radius: 3.0,
                outer_radius: 3.0,
            },
        };
        assert_eq!(r.equivalent_label(), "Error: R_in > R_out");
        assert_eq!(r.net_material_label(), "8.00 mm²");
    }

    #[test]
    fn zero_outer_radius_has_no_room() {
        assert!(!size_equivalent(0.0, 1.0).is_valid());
    }

    #[test]
    fn labels_use_two_decimals() {
        let r = compute_areas(&tube(19.0, 2.0), None);
        assert_eq!(r.resonator_label(), "131.95 mm²");
        assert_eq!(r.inner_object_label(), "0.00 mm²");
    }

    #[test]
    fn equivalent_material_matches_net() {
        let r = compute_areas(&tube(19.0, 2.0), Some(28.35));
        let EquivalentCylinder::Valid { material_area, .. } = r.equivalent else {
            panic!("expected a valid equivalent cylinder");
        };
        assert_relative_eq!(material_area, r.net_material, epsilon = 1e-9);
    }
}
