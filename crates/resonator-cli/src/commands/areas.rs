//! resonator areas - cross-section readout without building solids.

use anyhow::Result;
use app_bridge::{AreaReadout, FormState};
use colored::Colorize;
use resonator_geometry::{compute_areas, generate_profile, AreaReport};
use serde::Serialize;

use crate::{output, Cli, OutputFormat};

#[derive(Serialize)]
struct AreasOutput {
    readout: AreaReadout,
    report: AreaReport,
    profile_points: usize,
}

pub fn run(form: &FormState, cli: &Cli) -> Result<()> {
    let params = form.params();
    let target = params.target_insert_area();
    let profile = generate_profile(&params.inner.shape(), target);
    let report = compute_areas(&params.tube, (!profile.is_empty()).then_some(target));
    let out = AreasOutput {
        readout: AreaReadout::from_report(&report),
        report,
        profile_points: profile.len(),
    };

    match cli.format {
        OutputFormat::Json => output::print_json(&out)?,
        OutputFormat::Text if !cli.quiet => {
            println!("{}", "Cross-section".bold().underline());
            println!("  {}: {}", "Resonator material".cyan(), out.readout.resonator_material);
            println!("  {}: {}", "Inner object".cyan(), out.readout.inner_object);
            println!("  {}: {}", "Net material".cyan(), out.readout.net_material);
            println!(
                "  {}: {}",
                "Equivalent cylinder".cyan(),
                out.readout.equivalent_material
            );
            if profile.is_empty() && target > 0.0 {
                println!("  {}", "Inner object shape is degenerate; omitted".yellow());
            }
        }
        OutputFormat::Text => {}
    }
    Ok(())
}
