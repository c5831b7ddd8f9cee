use serde::{Deserialize, Serialize};

use crate::shape::{InnerShape, ShapeKind};

/// Main tube dimensions, in millimetres.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TubeParams {
    /// Internal length L.
    pub length: f64,
    /// Internal diameter D1.
    pub inner_diameter: f64,
    /// Wall thickness added outside D1.
    pub wall_thickness: f64,
}

impl TubeParams {
    /// R1 = D1 / 2.
    pub fn inner_radius(&self) -> f64 {
        self.inner_diameter / 2.0
    }

    /// R2 = R1 + wall thickness.
    pub fn outer_radius(&self) -> f64 {
        self.inner_radius() + self.wall_thickness
    }

    /// S1 = π·R1², the internal cross-section.
    pub fn inner_section_area(&self) -> f64 {
        std::f64::consts::PI * self.inner_radius().powi(2)
    }
}

/// Cap dimensions, in millimetres.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CapParams {
    pub wall_thickness: f64,
    pub cavity_depth: f64,
}

impl CapParams {
    /// Total cap height: cavity plus the closed bottom wall.
    pub fn total_height(&self) -> f64 {
        self.cavity_depth + self.wall_thickness
    }
}

/// Shape-specific values for every inner-object kind.
///
/// The form keeps all of them at once so switching the selected shape
/// never discards the values typed for the others.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShapeSettings {
    pub ellipse_axis_ratio: f64,
    pub star_tips: u32,
    pub star_radius_ratio: f64,
    pub polygon_sides: u32,
}

impl ShapeSettings {
    /// Resolve the concrete shape for the selected kind.
    pub fn shape(&self, kind: ShapeKind) -> InnerShape {
        match kind {
            ShapeKind::Ellipse => InnerShape::Ellipse {
                axis_ratio: self.ellipse_axis_ratio,
            },
            ShapeKind::Star => InnerShape::Star {
                tips: self.star_tips,
                radius_ratio: self.star_radius_ratio,
            },
            ShapeKind::Polygon => InnerShape::Polygon {
                sides: self.polygon_sides,
            },
        }
    }
}

/// Inner insert selection plus the shared S2/S1 area ratio.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InnerObjectParams {
    pub kind: ShapeKind,
    /// Target insert area as a fraction of S1.
    pub area_ratio: f64,
    pub settings: ShapeSettings,
}

impl InnerObjectParams {
    pub fn shape(&self) -> InnerShape {
        self.settings.shape(self.kind)
    }
}

/// Every input the designer needs to build the assembly.
///
/// Defaults are the form's initial values.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ResonatorParams {
    pub tube: TubeParams,
    pub inner: InnerObjectParams,
    pub cap: CapParams,
}

impl Default for TubeParams {
    fn default() -> Self {
        Self {
            length: 100.0,
            inner_diameter: 19.0,
            wall_thickness: 2.0,
        }
    }
}

impl Default for CapParams {
    fn default() -> Self {
        Self {
            wall_thickness: 2.0,
            cavity_depth: 5.0,
        }
    }
}

impl Default for ShapeSettings {
    fn default() -> Self {
        Self {
            ellipse_axis_ratio: 1.5,
            star_tips: 5,
            star_radius_ratio: 0.5,
            polygon_sides: 6,
        }
    }
}

impl Default for InnerObjectParams {
    fn default() -> Self {
        Self {
            kind: ShapeKind::Ellipse,
            area_ratio: 0.1,
            settings: ShapeSettings::default(),
        }
    }
}

impl ResonatorParams {
    /// S2 target = ratio · S1.
    pub fn target_insert_area(&self) -> f64 {
        self.inner.area_ratio * self.tube.inner_section_area()
    }
}
