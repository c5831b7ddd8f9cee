use std::path::Path;

use kernel_bridge::{Kernel, KernelError};
use mesh_export::{export_parts, ExportError, ExportOptions, ExportReport, StlError, StlFormat};
use resonator_ops::{recompute, GeometrySnapshot};
use resonator_types::{ResonatorParams, ShapeKind};
use tracing::{info, warn};

use crate::form::{Field, FormState, ShapeGroups};
use crate::messages::{AppToUi, AreaReadout};
use crate::viewer::{build_scene, Scene, ViewerOptions};

/// Errors from the app layer.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("invalid value for {field:?}: {value}")]
    InvalidValue { field: Field, value: f64 },

    #[error(transparent)]
    Export(#[from] ExportError),

    #[error("preview mesh: {0}")]
    Stl(#[from] StlError),

    #[error(transparent)]
    Kernel(#[from] KernelError),

    #[error("temporary file: {0}")]
    Io(#[from] std::io::Error),

    #[error("bad message: {0}")]
    Message(#[from] serde_json::Error),
}

/// The designer's state: form values, the kernel, and the latest geometry.
///
/// Messages are handled one at a time; each recompute replaces the
/// previous snapshot and hands its solids back to the kernel.
pub struct App {
    kernel: Box<dyn Kernel>,
    form: FormState,
    snapshot: Option<GeometrySnapshot>,
    scene: Scene,
    readout: AreaReadout,
    warnings: Vec<String>,
    error: Option<String>,
    viewer: ViewerOptions,
    export_tolerance: f64,
}

impl App {
    /// Create the app and run the first update with the default values.
    pub fn new(kernel: Box<dyn Kernel>) -> Self {
        Self::with_options(kernel, FormState::new(), ViewerOptions::default())
    }

    pub fn with_options(kernel: Box<dyn Kernel>, form: FormState, viewer: ViewerOptions) -> Self {
        let mut app = Self {
            kernel,
            form,
            snapshot: None,
            scene: Scene::empty(),
            readout: AreaReadout::unavailable(),
            warnings: Vec::new(),
            error: None,
            viewer,
            export_tolerance: ExportOptions::default().tolerance,
        };
        app.update();
        app
    }

    pub fn form(&self) -> &FormState {
        &self.form
    }

    pub fn params(&self) -> &ResonatorParams {
        self.form.params()
    }

    pub fn snapshot(&self) -> Option<&GeometrySnapshot> {
        self.snapshot.as_ref()
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn readout(&self) -> &AreaReadout {
        &self.readout
    }

    pub fn kernel(&self) -> &dyn Kernel {
        &*self.kernel
    }

    pub fn set_field(&mut self, field: Field, value: f64) -> Result<f64, AppError> {
        self.form.set(field, value)
    }

    pub fn select_shape(&mut self, shape: ShapeKind) -> ShapeGroups {
        self.form.select_shape(shape)
    }

    pub fn set_params(&mut self, params: &ResonatorParams) -> Result<(), AppError> {
        self.form = FormState::from_params(params)?;
        Ok(())
    }

    /// Recompute from the current form values and rebuild the scene.
    pub fn update(&mut self) {
        if let Some(old) = self.snapshot.take() {
            old.release(&mut *self.kernel);
        }

        match recompute(self.form.params(), &mut *self.kernel) {
            Ok(snapshot) => {
                self.scene = build_scene(&snapshot, &mut *self.kernel, &self.viewer);
                self.readout = AreaReadout::from_report(&snapshot.areas);
                self.warnings = snapshot
                    .diagnostics
                    .warnings
                    .iter()
                    .chain(&self.scene.warnings)
                    .cloned()
                    .collect();
                self.error = None;
                self.snapshot = Some(snapshot);
            }
            Err(e) => {
                warn!("recompute rejected: {e}");
                self.scene = Scene::empty();
                self.readout = AreaReadout::unavailable();
                self.warnings.clear();
                self.error = Some(e.to_string());
            }
        }
        info!(
            items = self.scene.items.len(),
            warnings = self.warnings.len(),
            solids = self.kernel.solid_count(),
            "model updated"
        );
    }

    /// The current model as a UI message.
    pub fn model_updated(&self) -> AppToUi {
        AppToUi::ModelUpdated {
            scene: self.scene.clone(),
            readout: self.readout.clone(),
            groups: self.form.groups(),
            warnings: self.warnings.clone(),
            error: self.error.clone(),
        }
    }

    /// Export the current snapshot's parts next to `path`.
    pub fn export(&mut self, path: &Path, format: StlFormat) -> Result<ExportReport, AppError> {
        let snapshot = self.snapshot.as_ref().ok_or(ExportError::NoGeometry)?;
        let options = ExportOptions {
            format,
            tolerance: self.export_tolerance,
        };
        Ok(export_parts(snapshot, &mut *self.kernel, path, &options)?)
    }
}
