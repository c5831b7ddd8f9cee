use serde::{Deserialize, Serialize};

/// A closed planar boundary loop in the XY plane.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Loop2d {
    /// Full circle.
    Circle { center: [f64; 2], radius: f64 },
    /// Closed polyline. The closing segment is implicit: the last point
    /// is joined back to the first.
    Polyline { points: Vec<[f64; 2]> },
}

impl Loop2d {
    pub fn circle(radius: f64) -> Self {
        Loop2d::Circle {
            center: [0.0, 0.0],
            radius,
        }
    }
}

/// A planar region: one outer loop and any number of holes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanarRegion {
    pub outer: Loop2d,
    #[serde(default)]
    pub holes: Vec<Loop2d>,
}

impl PlanarRegion {
    pub fn disc(radius: f64) -> Self {
        Self {
            outer: Loop2d::circle(radius),
            holes: Vec::new(),
        }
    }

    /// Concentric annulus between `inner` and `outer` radii.
    pub fn annulus(outer: f64, inner: f64) -> Self {
        Self {
            outer: Loop2d::circle(outer),
            holes: vec![Loop2d::circle(inner)],
        }
    }
}
