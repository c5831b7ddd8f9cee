//! resonator preview - recompute and build the preview scene.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use app_bridge::{App, FormState, ViewerOptions};
use colored::Colorize;
use kernel_bridge::TruckKernel;

use crate::{output, Cli, OutputFormat};

pub fn run(form: FormState, scene_out: Option<&Path>, cli: &Cli) -> Result<()> {
    let app = App::with_options(Box::new(TruckKernel::new()), form, ViewerOptions::default());
    let update = app.model_updated();

    if let Some(path) = scene_out {
        let file =
            File::create(path).with_context(|| format!("Failed to create {:?}", path))?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer(&mut writer, &update)
            .with_context(|| format!("Failed to write scene to {:?}", path))?;
        writer.flush()?;
    }

    match cli.format {
        OutputFormat::Json if scene_out.is_none() => output::print_json(&update)?,
        OutputFormat::Json => {}
        OutputFormat::Text if !cli.quiet => {
            let scene = app.scene();
            println!("{}", "Preview".bold().underline());
            for item in &scene.items {
                println!(
                    "  {:<24} {:>8} triangles  {}",
                    item.part.label().cyan(),
                    item.mesh.triangle_count(),
                    item.style.color
                );
            }
            let readout = app.readout();
            println!("  {}: {}", "Net material".cyan(), readout.net_material);
            println!("  {}: {}", "Equivalent cylinder".cyan(), readout.equivalent_material);
            if let Some(snapshot) = app.snapshot() {
                for warning in &snapshot.diagnostics.warnings {
                    println!("  {}: {}", "Warning".yellow(), warning);
                }
            }
            for warning in &scene.warnings {
                println!("  {}: {}", "Warning".yellow(), warning);
            }
            if let Some(path) = scene_out {
                println!("  {}: {}", "Scene".cyan(), path.display());
            }
        }
        OutputFormat::Text => {}
    }

    if app.snapshot().is_none() {
        anyhow::bail!("parameters rejected; nothing to preview");
    }
    Ok(())
}
