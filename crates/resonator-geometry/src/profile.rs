use std::f64::consts::PI;

use resonator_types::{InnerShape, Loop2d};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Number of samples taken around an ellipse (first and last coincide).
pub const ELLIPSE_SAMPLES: usize = 200;

/// Why a shape produced no profile.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ProfileError {
    #[error("target area {area} is not positive")]
    NonPositiveArea { area: f64 },

    #[error("area factor {factor} is not positive")]
    NonPositiveAreaFactor { factor: f64 },

    #[error("{shape} needs at least 3 {what}, got {count}")]
    TooFewVertices {
        shape: &'static str,
        what: &'static str,
        count: u32,
    },

    #[error("derived radius {radius} is not a usable length")]
    InvalidRadius { radius: f64 },
}

/// Ordered boundary points of an inner-object cross-section.
///
/// Ellipse and polygon profiles repeat their first point at the end;
/// star profiles are open and closed by the consumer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub points: Vec<[f64; 2]>,
}

impl Profile {
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Distinct vertices, without a repeated closing point.
    pub fn vertices(&self) -> &[[f64; 2]] {
        match (self.points.first(), self.points.last()) {
            (Some(first), Some(last)) if self.points.len() > 1 && first == last => {
                &self.points[..self.points.len() - 1]
            }
            _ => &self.points,
        }
    }

    /// Area enclosed by the closed polygon through the points (shoelace).
    pub fn enclosed_area(&self) -> f64 {
        let pts = self.vertices();
        if pts.len() < 3 {
            return 0.0;
        }
        let twice: f64 = pts
            .iter()
            .zip(pts.iter().cycle().skip(1))
            .map(|(a, b)| a[0] * b[1] - b[0] * a[1])
            .sum();
        (twice / 2.0).abs()
    }

    /// Closed polyline loop for face construction, or `None` when the
    /// profile has fewer than three distinct vertices.
    pub fn to_loop(&self) -> Option<Loop2d> {
        let pts = self.vertices();
        if pts.len() < 3 {
            return None;
        }
        Some(Loop2d::Polyline {
            points: pts.to_vec(),
        })
    }
}

/// Sample the boundary of `shape` scaled so it encloses `target_area`.
///
/// Degenerate input yields an empty profile; callers skip the inner
/// object in that case.
pub fn generate_profile(shape: &InnerShape, target_area: f64) -> Profile {
    match try_generate_profile(shape, target_area) {
        Ok(profile) => profile,
        Err(e) => {
            debug!(?shape, target_area, "no inner profile: {e}");
            Profile::default()
        }
    }
}

/// Like [`generate_profile`], but reports why a shape is degenerate.
pub fn try_generate_profile(
    shape: &InnerShape,
    target_area: f64,
) -> Result<Profile, ProfileError> {
    if !(target_area > 0.0) || !target_area.is_finite() {
        return Err(ProfileError::NonPositiveArea { area: target_area });
    }

    match *shape {
        InnerShape::Ellipse { axis_ratio } => ellipse(axis_ratio, target_area),
        InnerShape::Star { tips, radius_ratio } => star(tips, radius_ratio, target_area),
        InnerShape::Polygon { sides } => polygon(sides, target_area),
    }
}

fn checked_radius(radius: f64) -> Result<f64, ProfileError> {
    if radius.is_finite() && radius > 0.0 {
        Ok(radius)
    } else {
        Err(ProfileError::InvalidRadius { radius })
    }
}

/// a = sqrt(S·k/π), b = a/k.
fn ellipse(axis_ratio: f64, target_area: f64) -> Result<Profile, ProfileError> {
    if !(axis_ratio > 0.0) {
        return Err(ProfileError::NonPositiveAreaFactor { factor: axis_ratio });
    }
    let a = checked_radius((target_area * axis_ratio / PI).sqrt())?;
    let b = checked_radius(a / axis_ratio)?;

    let step = 2.0 * PI / (ELLIPSE_SAMPLES - 1) as f64;
    let mut points: Vec<[f64; 2]> = (0..ELLIPSE_SAMPLES)
        .map(|i| {
            let t = i as f64 * step;
            [a * t.cos(), b * t.sin()]
        })
        .collect();
    // sin(2π) is not exactly zero; pin the closing sample.
    points[ELLIPSE_SAMPLES - 1] = points[0];
    Ok(Profile { points })
}

/// 2n samples alternating r_outer / r_inner at step π/n.
///
/// The sampled 2n-gon is made of 2n triangles of area
/// ½·r_outer·r_inner·sin(π/n), so A(r) = n·ρ·sin(π/n)·r².
fn star(tips: u32, radius_ratio: f64, target_area: f64) -> Result<Profile, ProfileError> {
    if tips < 3 {
        return Err(ProfileError::TooFewVertices {
            shape: "star",
            what: "tips",
            count: tips,
        });
    }
    let n = tips as f64;
    // r_inner must stay strictly inside r_outer for a star shape.
    if !(radius_ratio > 0.0 && radius_ratio < 1.0) {
        return Err(ProfileError::NonPositiveAreaFactor {
            factor: 1.0 - radius_ratio.powi(2),
        });
    }
    let factor = n * radius_ratio * (PI / n).sin();
    if !(factor > 0.0) {
        return Err(ProfileError::NonPositiveAreaFactor { factor });
    }
    let r_outer = checked_radius((target_area / factor).sqrt())?;
    let r_inner = r_outer * radius_ratio;

    let count = 2 * tips as usize;
    let step = PI / n;
    let points = (0..count)
        .map(|i| {
            let r = if i % 2 == 0 { r_outer } else { r_inner };
            let t = i as f64 * step;
            [r * t.cos(), r * t.sin()]
        })
        .collect();
    Ok(Profile { points })
}

/// A(r) = (n/2)·sin(2π/n)·r²; n vertices plus the first repeated.
fn polygon(sides: u32, target_area: f64) -> Result<Profile, ProfileError> {
    if sides < 3 {
        return Err(ProfileError::TooFewVertices {
            shape: "polygon",
            what: "sides",
            count: sides,
        });
    }
    let n = sides as f64;
    let factor = 0.5 * n * (2.0 * PI / n).sin();
    if !(factor > 0.0) {
        return Err(ProfileError::NonPositiveAreaFactor { factor });
    }
    let radius = checked_radius((target_area / factor).sqrt())?;

    let step = 2.0 * PI / n;
    let mut points: Vec<[f64; 2]> = (0..sides as usize)
        .map(|i| {
            let t = i as f64 * step;
            [radius * t.cos(), radius * t.sin()]
        })
        .collect();
    points.push(points[0]);
    Ok(Profile { points })
}
