use std::path::PathBuf;

use mesh_export::ExportReport;
use resonator_geometry::{format_area, AreaReport};
use resonator_types::{ResonatorParams, ShapeKind};
use serde::{Deserialize, Serialize};

use crate::form::{Field, FormSchema, ShapeGroups};
use crate::viewer::Scene;

/// Messages from the presentation layer to the app.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum UiToApp {
    /// Change one numeric input.
    SetField { field: Field, value: f64 },
    /// Switch the inner-object shape.
    SelectShape { shape: ShapeKind },
    /// Replace every input at once.
    SetParams { params: ResonatorParams },
    /// Recompute the geometry and rebuild the scene.
    Update,
    /// Write the STL files next to `path`.
    Export {
        path: PathBuf,
        #[serde(default)]
        ascii: bool,
    },
    DescribeForm,
}

/// Messages from the app to the presentation layer.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type")]
pub enum AppToUi {
    /// Geometry was recomputed. `error` is set when the parameters were
    /// rejected outright; the scene is then empty.
    ModelUpdated {
        scene: Scene,
        readout: AreaReadout,
        groups: ShapeGroups,
        warnings: Vec<String>,
        error: Option<String>,
    },

    /// A field was stored, after clamping and rounding.
    FieldChanged { field: Field, value: f64 },

    ShapeSelected {
        shape: ShapeKind,
        groups: ShapeGroups,
    },

    ExportFinished { report: ExportReport },

    FormDescribed {
        schema: FormSchema,
        values: ResonatorParams,
        groups: ShapeGroups,
    },

    Error { message: String },
}

/// The cross-section readout, formatted for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AreaReadout {
    pub resonator_material: String,
    pub inner_object: String,
    pub net_material: String,
    pub equivalent_material: String,
}

impl AreaReadout {
    pub fn from_report(report: &AreaReport) -> Self {
        Self {
            resonator_material: report.resonator_label(),
            inner_object: report.inner_object_label(),
            net_material: report.net_material_label(),
            equivalent_material: report.equivalent_label(),
        }
    }

    /// Shown before the first successful recompute.
    pub fn unavailable() -> Self {
        let na = || "N/A mm²".to_string();
        Self {
            resonator_material: na(),
            inner_object: na(),
            net_material: na(),
            equivalent_material: na(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ui_messages_are_type_tagged() {
        let msg: UiToApp =
            serde_json::from_str(r#"{"type":"SetField","field":"inner_diameter","value":20}"#)
                .unwrap();
        assert!(matches!(
            msg,
            UiToApp::SetField {
                field: Field::InnerDiameter,
                value
            } if value == 20.0
        ));

        let msg: UiToApp = serde_json::from_str(r#"{"type":"Export","path":"out.stl"}"#).unwrap();
        assert!(matches!(msg, UiToApp::Export { ascii: false, .. }));

        let msg: UiToApp =
            serde_json::from_str(r#"{"type":"SelectShape","shape":"Polygon"}"#).unwrap();
        assert!(matches!(
            msg,
            UiToApp::SelectShape {
                shape: ShapeKind::Polygon
            }
        ));
    }

    #[test]
    fn error_reply_serializes() {
        let json = serde_json::to_value(AppToUi::Error {
            message: "boom".into(),
        })
        .unwrap();
        assert_eq!(json["type"], "Error");
        assert_eq!(json["message"], "boom");
    }

    #[test]
    fn unavailable_readout() {
        let r = AreaReadout::unavailable();
        assert_eq!(r.net_material, "N/A mm²");
    }

    #[test]
    fn readout_uses_area_labels() {
        let report = resonator_geometry::compute_areas(&ResonatorParams::default().tube, None);
        let r = AreaReadout::from_report(&report);
        assert_eq!(r.resonator_material, format_area(report.resonator_material));
        assert_eq!(r.inner_object, "0.00 mm²");
    }
}
