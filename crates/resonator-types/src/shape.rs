use serde::{Deserialize, Serialize};

/// Inner-object shape selector, as offered by the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShapeKind {
    Ellipse,
    Star,
    Polygon,
}

impl ShapeKind {
    pub const ALL: [ShapeKind; 3] = [ShapeKind::Ellipse, ShapeKind::Star, ShapeKind::Polygon];

    pub fn label(&self) -> &'static str {
        match self {
            ShapeKind::Ellipse => "Ellipse",
            ShapeKind::Star => "Star",
            ShapeKind::Polygon => "Polygon",
        }
    }
}

impl std::str::FromStr for ShapeKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "ellipse" | "elipse" => Ok(ShapeKind::Ellipse),
            "star" | "estrella" => Ok(ShapeKind::Star),
            "polygon" | "poligono" | "polígono" => Ok(ShapeKind::Polygon),
            other => Err(format!("unknown shape kind: {other}")),
        }
    }
}

/// A fully-specified inner-object shape.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum InnerShape {
    /// Ellipse with a/b = `axis_ratio`.
    Ellipse { axis_ratio: f64 },
    /// Star with `tips` points and r_inner/r_outer = `radius_ratio`.
    Star { tips: u32, radius_ratio: f64 },
    /// Regular polygon.
    Polygon { sides: u32 },
}

impl InnerShape {
    pub fn kind(&self) -> ShapeKind {
        match self {
            InnerShape::Ellipse { .. } => ShapeKind::Ellipse,
            InnerShape::Star { .. } => ShapeKind::Star,
            InnerShape::Polygon { .. } => ShapeKind::Polygon,
        }
    }
}
