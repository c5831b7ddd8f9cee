//! Parameter flags and `--params` files.

use std::path::PathBuf;

use anyhow::{Context, Result};
use app_bridge::{Field, FormState};
use clap::{Args, ValueEnum};
use resonator_types::{ResonatorParams, ShapeKind};
use tracing::warn;

#[derive(Clone, Copy, PartialEq, Eq, Debug, ValueEnum)]
pub enum ShapeArg {
    Ellipse,
    Star,
    Polygon,
}

impl From<ShapeArg> for ShapeKind {
    fn from(arg: ShapeArg) -> Self {
        match arg {
            ShapeArg::Ellipse => ShapeKind::Ellipse,
            ShapeArg::Star => ShapeKind::Star,
            ShapeArg::Polygon => ShapeKind::Polygon,
        }
    }
}

/// Design parameters. Unset flags keep the `--params` file's value, or
/// the form default.
#[derive(Args, Debug, Default)]
pub struct ParamArgs {
    /// JSON file holding a full parameter set
    #[arg(long = "params", global = true, value_name = "FILE")]
    pub file: Option<PathBuf>,

    /// Internal length L (mm)
    #[arg(long, global = true)]
    pub length: Option<f64>,

    /// Internal diameter D1 (mm)
    #[arg(long, global = true)]
    pub inner_diameter: Option<f64>,

    /// Tube wall thickness (mm)
    #[arg(long, global = true)]
    pub wall_thickness: Option<f64>,

    /// Inner object area as a fraction of the tube's inner section
    #[arg(long, global = true)]
    pub area_ratio: Option<f64>,

    /// Inner object shape
    #[arg(long, global = true)]
    pub shape: Option<ShapeArg>,

    /// Ellipse axis ratio a/b
    #[arg(long, global = true)]
    pub ellipse_axis_ratio: Option<f64>,

    /// Number of star tips
    #[arg(long, global = true)]
    pub star_tips: Option<u32>,

    /// Star inner/outer radius ratio
    #[arg(long, global = true)]
    pub star_radius_ratio: Option<f64>,

    /// Number of polygon sides
    #[arg(long, global = true)]
    pub polygon_sides: Option<u32>,

    /// Cap wall thickness (mm)
    #[arg(long, global = true)]
    pub cap_wall_thickness: Option<f64>,

    /// Cap cavity depth (mm)
    #[arg(long, global = true)]
    pub cap_cavity_depth: Option<f64>,
}

impl ParamArgs {
    fn overrides(&self) -> Vec<(Field, f64)> {
        [
            (Field::Length, self.length),
            (Field::InnerDiameter, self.inner_diameter),
            (Field::WallThickness, self.wall_thickness),
            (Field::AreaRatio, self.area_ratio),
            (Field::EllipseAxisRatio, self.ellipse_axis_ratio),
            (Field::StarTips, self.star_tips.map(f64::from)),
            (Field::StarRadiusRatio, self.star_radius_ratio),
            (Field::PolygonSides, self.polygon_sides.map(f64::from)),
            (Field::CapWallThickness, self.cap_wall_thickness),
            (Field::CapCavityDepth, self.cap_cavity_depth),
        ]
        .into_iter()
        .filter_map(|(field, value)| value.map(|v| (field, v)))
        .collect()
    }
}

/// Build the form from the `--params` file and the flags, clamping each
/// value the way the form does.
pub fn load_form(args: &ParamArgs) -> Result<FormState> {
    let mut form = match &args.file {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read parameters from {:?}", path))?;
            let params: ResonatorParams = serde_json::from_str(&text)
                .with_context(|| format!("Failed to parse parameters in {:?}", path))?;
            FormState::from_params(&params)?
        }
        None => FormState::new(),
    };

    if let Some(shape) = args.shape {
        form.select_shape(shape.into());
    }
    for (field, value) in args.overrides() {
        let stored = form.set(field, value)?;
        if stored != value {
            warn!(?field, requested = value, stored, "value adjusted to the form's range");
        }
    }
    Ok(form)
}
