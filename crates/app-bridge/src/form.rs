//! Form schema and the values behind it.
//!
//! Every numeric input behaves like a spin box: values are clamped into
//! the field's range and rounded to its number of decimals.

use resonator_types::{ResonatorParams, ShapeKind};
use serde::{Deserialize, Serialize};

use crate::app::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Length,
    InnerDiameter,
    WallThickness,
    AreaRatio,
    EllipseAxisRatio,
    StarTips,
    StarRadiusRatio,
    PolygonSides,
    CapWallThickness,
    CapCavityDepth,
}

impl Field {
    /// Form order.
    pub const ALL: [Field; 10] = [
        Field::Length,
        Field::InnerDiameter,
        Field::WallThickness,
        Field::AreaRatio,
        Field::EllipseAxisRatio,
        Field::StarTips,
        Field::StarRadiusRatio,
        Field::PolygonSides,
        Field::CapWallThickness,
        Field::CapCavityDepth,
    ];

    pub fn group(&self) -> FieldGroup {
        match self {
            Field::Length | Field::InnerDiameter | Field::WallThickness => FieldGroup::Resonator,
            Field::AreaRatio => FieldGroup::InnerObject,
            Field::EllipseAxisRatio => FieldGroup::Ellipse,
            Field::StarTips | Field::StarRadiusRatio => FieldGroup::Star,
            Field::PolygonSides => FieldGroup::Polygon,
            Field::CapWallThickness | Field::CapCavityDepth => FieldGroup::Cap,
        }
    }

    /// Read this field out of a parameter set.
    pub fn get(&self, p: &ResonatorParams) -> f64 {
        let s = &p.inner.settings;
        match self {
            Field::Length => p.tube.length,
            Field::InnerDiameter => p.tube.inner_diameter,
            Field::WallThickness => p.tube.wall_thickness,
            Field::AreaRatio => p.inner.area_ratio,
            Field::EllipseAxisRatio => s.ellipse_axis_ratio,
            Field::StarTips => f64::from(s.star_tips),
            Field::StarRadiusRatio => s.star_radius_ratio,
            Field::PolygonSides => f64::from(s.polygon_sides),
            Field::CapWallThickness => p.cap.wall_thickness,
            Field::CapCavityDepth => p.cap.cavity_depth,
        }
    }

    /// Store an already-normalized value.
    fn put(&self, p: &mut ResonatorParams, value: f64) {
        let s = &mut p.inner.settings;
        match self {
            Field::Length => p.tube.length = value,
            Field::InnerDiameter => p.tube.inner_diameter = value,
            Field::WallThickness => p.tube.wall_thickness = value,
            Field::AreaRatio => p.inner.area_ratio = value,
            Field::EllipseAxisRatio => s.ellipse_axis_ratio = value,
            // Integer fields are rounded to 0 decimals and at least 3.
            Field::StarTips => s.star_tips = value as u32,
            Field::StarRadiusRatio => s.star_radius_ratio = value,
            Field::PolygonSides => s.polygon_sides = value as u32,
            Field::CapWallThickness => p.cap.wall_thickness = value,
            Field::CapCavityDepth => p.cap.cavity_depth = value,
        }
    }

    pub fn spec(&self) -> FieldSpec {
        let (label, min, max, step, decimals, suffix) = match self {
            Field::Length => ("Internal length (L)", 0.0, 10000.0, 10.0, 2, "mm"),
            Field::InnerDiameter => ("Internal diameter (D1)", 0.0, 1000.0, 1.0, 2, "mm"),
            Field::WallThickness => ("Wall thickness", 0.0, 100.0, 0.5, 2, "mm"),
            Field::AreaRatio => ("Area ratio (S2/S1)", 0.0, 1.0, 0.05, 3, ""),
            Field::EllipseAxisRatio => ("Axis ratio (a/b)", 1.0, 10.0, 0.1, 2, ""),
            Field::StarTips => ("Tips", 3.0, 50.0, 1.0, 0, ""),
            Field::StarRadiusRatio => ("Radius ratio (r_in/r_out)", 0.1, 0.99, 0.05, 2, ""),
            Field::PolygonSides => ("Number of sides", 3.0, 50.0, 1.0, 0, ""),
            Field::CapWallThickness => ("Cap wall thickness", 0.5, 100.0, 0.1, 2, "mm"),
            Field::CapCavityDepth => ("Cavity depth", 1.0, 100.0, 0.5, 2, "mm"),
        };
        FieldSpec {
            field: *self,
            group: self.group(),
            label,
            min,
            max,
            step,
            decimals,
            default: self.get(&ResonatorParams::default()),
            suffix,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldGroup {
    Resonator,
    InnerObject,
    Ellipse,
    Star,
    Polygon,
    Cap,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldSpec {
    pub field: Field,
    pub group: FieldGroup,
    pub label: &'static str,
    pub min: f64,
    pub max: f64,
    pub step: f64,
    pub decimals: u32,
    pub default: f64,
    pub suffix: &'static str,
}

impl FieldSpec {
    /// Clamp into range, then round to the displayed precision.
    pub fn normalize(&self, value: f64) -> f64 {
        let scale = 10f64.powi(self.decimals as i32);
        let rounded = (value.clamp(self.min, self.max) * scale).round() / scale;
        // Rounding can step just past a bound that is not on the grid.
        rounded.clamp(self.min, self.max)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FormSchema {
    pub fields: Vec<FieldSpec>,
    pub shapes: Vec<ShapeKind>,
    pub default_shape: ShapeKind,
}

impl FormSchema {
    pub fn standard() -> Self {
        Self {
            fields: Field::ALL.iter().map(Field::spec).collect(),
            shapes: ShapeKind::ALL.to_vec(),
            default_shape: ResonatorParams::default().inner.kind,
        }
    }
}

/// Which shape-parameter groups the form shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShapeGroups {
    pub ellipse: bool,
    pub star: bool,
    pub polygon: bool,
}

/// Exactly the selected shape's group is visible.
pub fn visible_groups(shape: ShapeKind) -> ShapeGroups {
    ShapeGroups {
        ellipse: shape == ShapeKind::Ellipse,
        star: shape == ShapeKind::Star,
        polygon: shape == ShapeKind::Polygon,
    }
}

/// Current form values.
#[derive(Debug, Clone, PartialEq)]
pub struct FormState {
    params: ResonatorParams,
}

impl FormState {
    pub fn new() -> Self {
        Self {
            params: ResonatorParams::default(),
        }
    }

    /// Load a whole parameter set, normalizing every field.
    pub fn from_params(params: &ResonatorParams) -> Result<Self, AppError> {
        let mut form = Self::new();
        form.params.inner.kind = params.inner.kind;
        for field in Field::ALL {
            form.set(field, field.get(params))?;
        }
        Ok(form)
    }

    pub fn params(&self) -> &ResonatorParams {
        &self.params
    }

    pub fn get(&self, field: Field) -> f64 {
        field.get(&self.params)
    }

    /// Set a field the way a spin box would; returns the stored value.
    pub fn set(&mut self, field: Field, value: f64) -> Result<f64, AppError> {
        if !value.is_finite() {
            return Err(AppError::InvalidValue { field, value });
        }
        let value = field.spec().normalize(value);
        field.put(&mut self.params, value);
        Ok(value)
    }

    pub fn shape(&self) -> ShapeKind {
        self.params.inner.kind
    }

    /// Switch the selected shape; the other shapes keep their values.
    pub fn select_shape(&mut self, shape: ShapeKind) -> ShapeGroups {
        self.params.inner.kind = shape;
        visible_groups(shape)
    }

    pub fn groups(&self) -> ShapeGroups {
        visible_groups(self.shape())
    }
}

impl Default for FormState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_defaults_match_params() {
        let schema = FormSchema::standard();
        assert_eq!(schema.fields.len(), 10);
        let get = |f: Field| schema.fields.iter().find(|s| s.field == f).unwrap().clone();
        assert_eq!(get(Field::Length).default, 100.0);
        assert_eq!(get(Field::InnerDiameter).default, 19.0);
        assert_eq!(get(Field::AreaRatio).decimals, 3);
        assert_eq!(get(Field::StarTips).default, 5.0);
        assert_eq!(get(Field::CapCavityDepth).min, 1.0);
        assert_eq!(schema.default_shape, ShapeKind::Ellipse);
    }

    #[test]
    fn set_clamps_like_a_spin_box() {
        let mut form = FormState::new();
        assert_eq!(form.set(Field::Length, 20000.0).unwrap(), 10000.0);
        assert_eq!(form.set(Field::WallThickness, -1.0).unwrap(), 0.0);
        assert_eq!(form.set(Field::StarRadiusRatio, 1.0).unwrap(), 0.99);
        assert_eq!(form.set(Field::CapWallThickness, 0.0).unwrap(), 0.5);
        assert_eq!(form.params().tube.length, 10000.0);
    }

    #[test]
    fn set_rounds_to_decimals() {
        let mut form = FormState::new();
        assert_eq!(form.set(Field::InnerDiameter, 19.456).unwrap(), 19.46);
        assert_eq!(form.set(Field::AreaRatio, 0.12345).unwrap(), 0.123);
        assert_eq!(form.set(Field::PolygonSides, 6.6).unwrap(), 7.0);
        assert_eq!(form.params().inner.settings.polygon_sides, 7);
    }

    #[test]
    fn non_finite_is_rejected() {
        let mut form = FormState::new();
        assert!(form.set(Field::Length, f64::NAN).is_err());
        assert!(form.set(Field::Length, f64::INFINITY).is_err());
        assert_eq!(form.get(Field::Length), 100.0);
    }

    #[test]
    fn exactly_one_group_visible() {
        for shape in ShapeKind::ALL {
            let g = visible_groups(shape);
            let shown = [g.ellipse, g.star, g.polygon].iter().filter(|&&v| v).count();
            assert_eq!(shown, 1, "{shape:?}");
        }
        assert!(visible_groups(ShapeKind::Star).star);
    }

    #[test]
    fn switching_shape_keeps_other_values() {
        let mut form = FormState::new();
        form.set(Field::EllipseAxisRatio, 3.0).unwrap();
        form.select_shape(ShapeKind::Polygon);
        form.set(Field::PolygonSides, 8.0).unwrap();
        form.select_shape(ShapeKind::Ellipse);
        assert_eq!(form.get(Field::EllipseAxisRatio), 3.0);
        assert_eq!(form.get(Field::PolygonSides), 8.0);
    }

    #[test]
    fn from_params_normalizes() {
        let mut p = ResonatorParams::default();
        p.inner.kind = ShapeKind::Star;
        p.inner.settings.star_tips = 99;
        p.tube.inner_diameter = 12.3456;
        let form = FormState::from_params(&p).unwrap();
        assert_eq!(form.shape(), ShapeKind::Star);
        assert_eq!(form.params().inner.settings.star_tips, 50);
        assert_eq!(form.params().tube.inner_diameter, 12.35);
    }

    #[test]
    fn field_names_are_snake_case() {
        let json = serde_json::to_string(&Field::CapCavityDepth).unwrap();
        assert_eq!(json, "\"cap_cavity_depth\"");
    }
}
