use std::ffi::OsString;
use std::path::{Path, PathBuf};

use kernel_bridge::Kernel;
use resonator_ops::GeometrySnapshot;
use resonator_types::PartKind;
use serde::Serialize;
use tracing::{info, warn};

use crate::errors::ExportError;
use crate::stl::{write_stl_file, StlFormat};

/// Chordal tolerance used when tessellating parts for export, in mm.
pub const DEFAULT_TOLERANCE: f64 = 0.05;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExportOptions {
    pub format: StlFormat,
    pub tolerance: f64,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            format: StlFormat::Binary,
            tolerance: DEFAULT_TOLERANCE,
        }
    }
}

/// What happened to one part.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum ExportStatus {
    Written { triangles: usize },
    Failed { reason: String },
    /// The part was not built in this snapshot.
    Skipped,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportedFile {
    pub part: PartKind,
    pub path: PathBuf,
    pub status: ExportStatus,
}

/// Per-part outcome of one export action, in export order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportReport {
    pub base: PathBuf,
    pub files: Vec<ExportedFile>,
}

impl ExportReport {
    pub fn written(&self) -> impl Iterator<Item = &ExportedFile> {
        self.files
            .iter()
            .filter(|f| matches!(f.status, ExportStatus::Written { .. }))
    }

    pub fn failed(&self) -> impl Iterator<Item = &ExportedFile> {
        self.files
            .iter()
            .filter(|f| matches!(f.status, ExportStatus::Failed { .. }))
    }

    pub fn all_written(&self) -> bool {
        self.files
            .iter()
            .all(|f| matches!(f.status, ExportStatus::Written { .. }))
    }
}

/// File for `kind` next to `base`: `<base><suffix>.stl`.
pub fn part_path(base: &Path, kind: PartKind) -> Option<PathBuf> {
    let mut name = OsString::from(base.file_name()?);
    name.push(kind.file_suffix());
    name.push(".stl");
    Some(base.with_file_name(name))
}

/// Export every built part of `snapshot` next to `path`.
///
/// `path` is the user's chosen file; its extension is dropped and each
/// part gets its own suffix. Parts are independent: a failed part is
/// recorded in the report and the rest are still written.
pub fn export_parts(
    snapshot: &GeometrySnapshot,
    kernel: &mut dyn Kernel,
    path: &Path,
    options: &ExportOptions,
) -> Result<ExportReport, ExportError> {
    if !snapshot.has_geometry() {
        return Err(ExportError::NoGeometry);
    }
    let base = path.with_extension("");
    if base.file_name().is_none() {
        return Err(ExportError::InvalidPath {
            path: path.to_path_buf(),
        });
    }

    let mut files = Vec::with_capacity(PartKind::ALL.len());
    for kind in PartKind::ALL {
        let Some(file) = part_path(&base, kind) else {
            continue;
        };
        let status = match snapshot.part(kind) {
            None => ExportStatus::Skipped,
            Some(handle) => {
                let written = kernel
                    .tessellate(handle, options.tolerance)
                    .map_err(ExportError::from)
                    .and_then(|mesh| {
                        write_stl_file(&file, &mesh, options.format).map_err(ExportError::from)
                    });
                match written {
                    Ok(triangles) => {
                        info!(part = %kind, path = %file.display(), triangles, "exported");
                        ExportStatus::Written { triangles }
                    }
                    Err(e) => {
                        warn!(part = %kind, path = %file.display(), "export failed: {e}");
                        ExportStatus::Failed {
                            reason: e.to_string(),
                        }
                    }
                }
            }
        };
        files.push(ExportedFile {
            part: kind,
            path: file,
            status,
        });
    }

    let report = ExportReport { base, files };
    info!(
        base = %report.base.display(),
        written = report.written().count(),
        failed = report.failed().count(),
        "export finished"
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn part_paths_use_suffixes() {
        let base = Path::new("/tmp/out/design");
        assert_eq!(
            part_path(base, PartKind::Resonator).unwrap(),
            Path::new("/tmp/out/design_resonador_hueco.stl")
        );
        assert_eq!(
            part_path(base, PartKind::CapWithInnerObject).unwrap(),
            Path::new("/tmp/out/design_tapa_con_objeto_interno.stl")
        );
    }

    #[test]
    fn root_has_no_part_path() {
        assert!(part_path(Path::new("/"), PartKind::Cap).is_none());
    }

    #[test]
    fn default_options_are_binary() {
        let o = ExportOptions::default();
        assert_eq!(o.format, StlFormat::Binary);
        assert_eq!(o.tolerance, DEFAULT_TOLERANCE);
    }
}
