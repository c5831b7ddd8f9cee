//! resonator export - write each part as STL.

use std::path::Path;

use anyhow::{Context, Result};
use app_bridge::FormState;
use colored::Colorize;
use kernel_bridge::{Kernel, TruckKernel};
use mesh_export::{export_parts, ExportOptions, ExportReport, ExportStatus, StlFormat};
use resonator_ops::recompute;
use resonator_types::ResonatorParams;

use crate::{output, Cli, OutputFormat};

/// Build the parts and write them next to `path`. No preview is built.
pub fn export_design(
    params: &ResonatorParams,
    kernel: &mut dyn Kernel,
    path: &Path,
    format: StlFormat,
) -> Result<ExportReport> {
    let snapshot = recompute(params, kernel).context("Failed to build the resonator")?;
    let options = ExportOptions {
        format,
        ..ExportOptions::default()
    };
    let report = export_parts(&snapshot, kernel, path, &options);
    snapshot.release(kernel);
    Ok(report?)
}

pub fn run(form: FormState, path: &Path, ascii: bool, cli: &Cli) -> Result<()> {
    let format = if ascii {
        StlFormat::Ascii
    } else {
        StlFormat::Binary
    };
    let report = export_design(form.params(), &mut TruckKernel::new(), path, format)?;

    match cli.format {
        OutputFormat::Json => output::print_json(&report)?,
        OutputFormat::Text if !cli.quiet => {
            println!("{}: {}", "Base".bold(), report.base.display());
            for file in &report.files {
                match &file.status {
                    ExportStatus::Written { triangles } => println!(
                        "  {} {} ({} triangles)",
                        "OK".green(),
                        file.path.display(),
                        triangles
                    ),
                    ExportStatus::Failed { reason } => println!(
                        "  {} {}: {}",
                        "FAILED".red(),
                        file.path.display(),
                        reason
                    ),
                    ExportStatus::Skipped => {
                        println!("  {} {} (not built)", "SKIPPED".yellow(), file.part)
                    }
                }
            }
        }
        OutputFormat::Text => {}
    }

    let failed = report.failed().count();
    if failed > 0 {
        anyhow::bail!("{failed} of {} parts could not be exported", report.files.len());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use kernel_bridge::{MockKernel, MockOp};

    #[test]
    fn export_skips_preview_tessellation() {
        let dir = tempfile::tempdir().unwrap();
        let mut kernel = MockKernel::new();
        let report = export_design(
            &ResonatorParams::default(),
            &mut kernel,
            &dir.path().join("res.stl"),
            StlFormat::Binary,
        )
        .unwrap();

        assert!(report.all_written());
        assert_eq!(report.files.len(), 5);
        // One tessellation per exported part and nothing else.
        assert_eq!(kernel.count_ops(MockOp::Tessellate), 5);
        assert_eq!(kernel.count_ops(MockOp::Rotate), 0);
        assert_eq!(kernel.solid_count(), 0);
        assert!(dir.path().join("res_tapa_sola.stl").exists());
    }

    #[test]
    fn rejected_parameters_write_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let mut params = ResonatorParams::default();
        params.tube.length = 0.0;
        let mut kernel = MockKernel::new();

        let err = export_design(&params, &mut kernel, &dir.path().join("res"), StlFormat::Binary)
            .unwrap_err();
        assert!(format!("{err:#}").contains("length must be positive"));
        assert!(kernel.op_log().is_empty());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }
}
